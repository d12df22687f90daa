//! Tree Configuration

/// DOM tree configuration options
#[derive(Debug, Clone)]
pub struct DomConfig {
    /// Enqueue mutation records for structural, attribute and data changes
    pub queue_mutation_records: bool,

    /// Maximum queued records before the oldest is dropped
    pub mutation_record_limit: usize,

    /// URL given to documents created without one
    pub default_url: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            queue_mutation_records: true,
            mutation_record_limit: 10_000,
            default_url: "about:blank".to_string(),
        }
    }
}

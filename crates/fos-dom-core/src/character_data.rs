//! Character Data
//!
//! Text, CDATA section, comment and processing-instruction payloads. Offsets
//! and counts are in UTF-16 code units.

use crate::mutation_record::MutationRecord;
use crate::node::NodeData;
use crate::{DomException, DomResult, DomTree, NodeId};

fn utf16_len(data: &str) -> usize {
    data.encode_utf16().count()
}

/// Code units `[start, end)` of `data`; a split surrogate pair decodes to U+FFFD
fn utf16_slice(units: &[u16], start: usize, end: usize) -> String {
    String::from_utf16_lossy(&units[start..end])
}

impl DomTree {
    /// `CharacterData.data`
    pub fn data(&self, node: NodeId) -> Option<&str> {
        self.node(node).data.character_data()
    }

    fn character_data_or_err(&self, node: NodeId) -> DomResult<&str> {
        self.data(node).ok_or(DomException::InvalidNodeType)
    }

    /// `CharacterData.length`, in UTF-16 code units
    pub fn data_length(&self, node: NodeId) -> usize {
        self.data(node).map_or(0, utf16_len)
    }

    /// Replace `count` code units at `offset` with `data`. Counts running past
    /// the end are clamped.
    pub fn replace_data(&mut self, node: NodeId, offset: usize, count: usize, data: &str) -> DomResult<()> {
        let current = self.character_data_or_err(node)?;
        let units: Vec<u16> = current.encode_utf16().collect();
        let length = units.len();

        if offset > length {
            return Err(DomException::IndexSize);
        }
        let count = count.min(length - offset);

        let old_value = current.to_string();
        let mut new_value = utf16_slice(&units, 0, offset);
        new_value.push_str(data);
        new_value.push_str(&utf16_slice(&units, offset + count, length));

        self.queue_record(MutationRecord::character_data(node, old_value));

        if let Some(slot) = self.node_mut(node).data.character_data_mut() {
            *slot = new_value;
        }
        tracing::trace!("Replaced {} code unit(s) at {} in {:?}", count, offset, node);
        Ok(())
    }

    /// `CharacterData.data` setter
    pub fn set_data(&mut self, node: NodeId, data: &str) -> DomResult<()> {
        let length = utf16_len(self.character_data_or_err(node)?);
        self.replace_data(node, 0, length, data)
    }

    /// `CharacterData.substringData`
    pub fn substring_data(&self, node: NodeId, offset: usize, count: usize) -> DomResult<String> {
        let units: Vec<u16> = self.character_data_or_err(node)?.encode_utf16().collect();
        let length = units.len();
        if offset > length {
            return Err(DomException::IndexSize);
        }
        let end = offset.saturating_add(count).min(length);
        Ok(utf16_slice(&units, offset, end))
    }

    pub fn append_data(&mut self, node: NodeId, data: &str) -> DomResult<()> {
        let length = utf16_len(self.character_data_or_err(node)?);
        self.replace_data(node, length, 0, data)
    }

    pub fn insert_data(&mut self, node: NodeId, offset: usize, data: &str) -> DomResult<()> {
        self.replace_data(node, offset, 0, data)
    }

    pub fn delete_data(&mut self, node: NodeId, offset: usize, count: usize) -> DomResult<()> {
        self.replace_data(node, offset, count, "")
    }

    /// `Text.splitText`: the tail moves into a new Text node placed right
    /// after `node` when it has a parent.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> DomResult<NodeId> {
        if !self.node(node).is_text_like() {
            return Err(DomException::InvalidNodeType);
        }

        let length = self.data_length(node);
        if offset > length {
            return Err(DomException::IndexSize);
        }
        let count = length - offset;
        let tail = self.substring_data(node, offset, count)?;

        let document = self.node_document(node);
        let new_node = self.alloc(Some(document), NodeData::Text(tail));

        if let Some(parent) = self.parent(node) {
            let next_sibling = self.next_sibling(node);
            self.insert(new_node, parent, next_sibling, false);
        }

        self.replace_data(node, offset, count, "")?;
        Ok(new_node)
    }

    /// `Text.wholeText`: data of the contiguous run of text nodes around `node`
    pub fn whole_text(&self, node: NodeId) -> Option<String> {
        if !self.node(node).is_text_like() {
            return None;
        }

        let mut run: Vec<NodeId> = self
            .preceding_siblings(node)
            .into_iter()
            .take_while(|&sibling| self.node(sibling).is_text_like())
            .collect();
        run.reverse();
        run.push(node);
        run.extend(
            self.following_siblings(node)
                .into_iter()
                .take_while(|&sibling| self.node(sibling).is_text_like()),
        );

        Some(run.into_iter().filter_map(|text| self.data(text)).collect())
    }
}

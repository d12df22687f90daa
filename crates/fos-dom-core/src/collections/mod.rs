//! Container primitives
//!
//! `List` and `OrderedSet` back child lists, attribute lists and token sets.

mod list;
mod ordered_set;

pub use list::List;
pub use ordered_set::OrderedSet;

//! Positional insertion of fresh children.

use tracing::{debug, instrument};

use crate::domain::node::Node;
use crate::domain::value::Value;

/// Where [`Node::index_new_child`] places the new child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// Before the first child (index `-1`).
    Front,
    /// Immediately after the child at this index.
    After(usize),
}

impl InsertAt {
    /// Maps the signed convention (`-1` = front) onto a position.
    /// Anything below `-1` has no position.
    pub fn from_offset(idx: isize) -> Option<Self> {
        match idx {
            -1 => Some(InsertAt::Front),
            i if i >= 0 => Some(InsertAt::After(i as usize)),
            _ => None,
        }
    }

    /// Slot in a child list of length `len`; `After(len)` appends.
    fn slot(self, len: usize) -> Option<usize> {
        match self {
            InsertAt::Front => Some(0),
            InsertAt::After(idx) if idx <= len => Some((idx + 1).min(len)),
            InsertAt::After(_) => None,
        }
    }
}

impl Node {
    /// Inserts a fresh child at `at`.
    ///
    /// Only defined relative to existing children: on a childless node this
    /// fails, as does a position past the end. Failure leaves the child
    /// list unchanged and returns `None`.
    pub fn index_new_child(&self, at: InsertAt) -> Option<Node> {
        self.insert_seeded(at, None, &[])
    }

    pub fn index_new_child_with_tags(&self, at: InsertAt, tags: &[&str]) -> Option<Node> {
        self.insert_seeded(at, None, tags)
    }

    /// Also `None` if `data` is rejected.
    pub fn index_new_child_with_data(&self, at: InsertAt, data: impl Into<Value>) -> Option<Node> {
        self.insert_seeded(at, Some(data.into()), &[])
    }

    pub fn index_new_child_with_data_and_tags(
        &self,
        at: InsertAt,
        data: impl Into<Value>,
        tags: &[&str],
    ) -> Option<Node> {
        self.insert_seeded(at, Some(data.into()), tags)
    }

    #[instrument(level = "trace", skip(self, data))]
    fn insert_seeded(&self, at: InsertAt, data: Option<Value>, tags: &[&str]) -> Option<Node> {
        let len = self.len();
        // TODO: decide whether the first child may be placed positionally too.
        if len == 0 {
            debug!("positional insert needs an existing child");
            return None;
        }
        let Some(slot) = at.slot(len) else {
            debug!(len, "insert position out of range");
            return None;
        };
        let child = Node::seeded(data, tags)?;
        child.set_parent(Some(self));
        self.0.borrow_mut().children.insert(slot, child.clone());
        Some(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Node {
        let n = Node::new();
        for tag in ["k0", "k1", "k2"] {
            n.new_child_with_tags(&[tag]);
        }
        n
    }

    fn order(n: &Node) -> Vec<String> {
        n.iter().map(|c| c.tags().join(",")).collect()
    }

    #[test]
    fn childless_node_refuses_every_position() {
        let n = Node::new();
        assert!(n.index_new_child(InsertAt::Front).is_none());
        assert!(n.index_new_child(InsertAt::After(0)).is_none());
        assert!(n.is_empty());
    }

    #[test]
    fn front_and_after_positions() {
        let n = three();
        n.index_new_child_with_tags(InsertAt::Front, &["f"]).unwrap();
        n.index_new_child_with_tags(InsertAt::After(1), &["x"]).unwrap();
        assert_eq!(order(&n), vec!["f", "k0", "x", "k1", "k2"]);
    }

    #[test]
    fn after_len_appends_and_beyond_fails() {
        let n = three();
        assert!(n.index_new_child(InsertAt::After(4)).is_none());
        let last = n.index_new_child_with_tags(InsertAt::After(3), &["end"]).unwrap();
        assert_eq!(last.index(), Some(3));
        assert_eq!(n.len(), 4);
    }

    #[test]
    fn rejected_payload_leaves_children_alone() {
        let n = three();
        assert!(n.index_new_child_with_data(InsertAt::Front, Node::new()).is_none());
        assert!(n
            .index_new_child_with_data_and_tags(InsertAt::After(0), Node::new(), &["bad"])
            .is_none());
        assert_eq!(n.len(), 3);

        let half = n
            .index_new_child_with_data_and_tags(InsertAt::Front, 2.5, &["half"])
            .unwrap();
        assert_eq!(half.data(), Some(Value::Float(2.5)));
        assert_eq!(half.parent(), Some(n.clone()));
        assert_eq!(n.child(0), Some(half));
    }

    #[test]
    fn signed_offsets() {
        assert_eq!(InsertAt::from_offset(-1), Some(InsertAt::Front));
        assert_eq!(InsertAt::from_offset(2), Some(InsertAt::After(2)));
        assert_eq!(InsertAt::from_offset(-2), None);
    }
}

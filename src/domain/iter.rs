use std::vec;

use crate::domain::node::Node;

/// Snapshot of a node's children taken when the iterator was created.
///
/// Later structural changes to the node are not observed; clone the
/// iterator to walk the same snapshot again.
#[derive(Debug, Clone)]
pub struct Children {
    inner: vec::IntoIter<Node>,
}

impl Iterator for Children {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Children {}

/// Pre-order walk below a node (the node itself excluded).
///
/// Each node's children are read when that node is reached.
pub struct Descendants {
    stack: Vec<Node>,
}

impl Descendants {
    fn new(start: &Node) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_children(start);
        walk
    }

    fn push_children(&mut self, node: &Node) {
        // Reverse order for left-to-right traversal
        self.stack
            .extend(node.0.borrow().children.iter().rev().cloned());
    }
}

impl Iterator for Descendants {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.push_children(&current);
        Some(current)
    }
}

impl Node {
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn iter(&self) -> Children {
        Children {
            inner: self.children().into_iter(),
        }
    }

    pub fn descendants(&self) -> Descendants {
        Descendants::new(self)
    }
}

impl IntoIterator for &Node {
    type Item = Node;
    type IntoIter = Children;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_ignores_later_mutation() {
        let n = Node::new();
        n.new_child_with_tags(&["a"]);
        n.new_child_with_tags(&["b"]);

        let mut walk = n.iter();
        let replay = walk.clone();
        n.rm_all_children();
        assert_eq!(walk.next().map(|c| c.tags()), Some(vec!["a".to_string()]));
        assert_eq!(replay.count(), 2);
        assert_eq!(n.iter().count(), 0);
    }

    #[test]
    fn descendants_are_pre_order() {
        let root = Node::new();
        let a = root.new_child_with_tags(&["a"]);
        a.new_child_with_tags(&["a1"]);
        a.new_child_with_tags(&["a2"]);
        root.new_child_with_tags(&["b"]);

        let seen: Vec<String> = root.descendants().map(|n| n.tags().join("")).collect();
        assert_eq!(seen, vec!["a", "a1", "a2", "b"]);
    }
}

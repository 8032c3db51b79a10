//! Ordered, duplicate-free tag set of a node.

use crate::domain::node::Node;

impl Node {
    /// True iff every tag in `tags` is present. An empty query matches.
    pub fn has_tag(&self, tags: &[&str]) -> bool {
        let inner = self.0.borrow();
        tags.iter().all(|tag| inner.tags.iter().any(|t| t == tag))
    }

    /// Appends the tags not yet present, in the given order.
    pub fn add_tag(&self, tags: &[&str]) {
        for &tag in tags {
            self.insert_tag(tag);
        }
    }

    pub(crate) fn insert_tag(&self, tag: impl AsRef<str> + Into<String>) {
        let mut inner = self.0.borrow_mut();
        if !inner.tags.iter().any(|t| t == tag.as_ref()) {
            inner.tags.push(tag.into());
        }
    }

    pub fn rm_tag(&self, tags: &[&str]) {
        self.0
            .borrow_mut()
            .tags
            .retain(|t| !tags.contains(&t.as_str()));
    }

    pub fn rm_all_tags(&self) {
        self.0.borrow_mut().tags.clear();
    }

    /// Snapshot of the tags in insertion order.
    pub fn tags(&self) -> Vec<String> {
        self.0.borrow().tags.clone()
    }
}

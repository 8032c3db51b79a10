//! Outline rendering of node subtrees with `termtree`.

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::Node;

/// What goes into each rendered label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_tags: bool,
    pub show_data: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_tags: true,
            show_data: true,
        }
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with(&RenderOptions::default())
    }

    fn to_tree_string_with(&self, options: &RenderOptions) -> Tree<String>;
}

/// `[tag, tag] = data`, or `·` when there is nothing to show.
fn label(node: &Node, options: &RenderOptions) -> String {
    let mut parts = Vec::new();
    if options.show_tags {
        let tags = node.tags();
        if !tags.is_empty() {
            parts.push(format!("[{}]", tags.iter().join(", ")));
        }
    }
    if options.show_data {
        if let Some(data) = node.data() {
            parts.push(format!("= {}", data));
        }
    }
    if parts.is_empty() {
        "·".to_string()
    } else {
        parts.join(" ")
    }
}

impl TreeNodeConvert for Node {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_string_with(&self, options: &RenderOptions) -> Tree<String> {
        let leaves: Vec<_> = self
            .iter()
            .map(|c| c.to_tree_string_with(options))
            .collect();

        Tree::new(label(self, options)).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tags_and_data() {
        let root = Node::new();
        let a = root.new_child_with_data_and_tags(1, &["a", "x"]).unwrap();
        a.new_child();
        root.new_child_with_data("b").unwrap();

        let rendered = root.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[root]");
        assert!(lines[1].ends_with("[a, x] = 1"));
        assert!(lines[2].ends_with("·"));
        assert!(lines[3].ends_with("= \"b\""));
    }

    #[test]
    fn options_hide_fields() {
        let root = Node::with_data("payload").unwrap();
        let options = RenderOptions {
            show_tags: false,
            show_data: true,
        };
        assert_eq!(root.to_tree_string_with(&options).to_string().trim_end(), "= \"payload\"");
    }
}

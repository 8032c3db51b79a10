//! Mutable in-memory tree of tagged nodes.
//!
//! Every [`Node`] carries an ordered tag set, an optional [`Value`] payload,
//! owned children and a weak link to its parent. Nodes are addressed by
//! position or by tag and round-trip through `{Data, Tags, Children}`
//! documents.
//!
//! ```
//! use nodegraph::{InsertAt, Node};
//!
//! let root = Node::new();
//! let config = root.new_child_with_tags(&["config"]);
//! config.new_child_with_data_and_tags(8080, &["port"]).unwrap();
//! root.index_new_child_with_tags(InsertAt::Front, &["header"]).unwrap();
//!
//! let port = root.child_by_tag_deep(&["port"]).unwrap();
//! assert_eq!(port.depth(), 1);
//! assert_eq!(config.index(), Some(1));
//!
//! let copy = Node::from_json(&root.to_json().unwrap()).unwrap();
//! assert_eq!(copy.to_json().unwrap(), root.to_json().unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{InsertAt, Node, NodeError, NodeResult, Value, ROOT_TAG};

//! Domain layer: the node graph
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod codec;
pub mod error;
pub mod insert;
pub mod iter;
pub mod node;
pub mod tags;
pub mod value;

pub use error::{NodeError, NodeResult};
pub use insert::InsertAt;
pub use iter::{Children, Descendants};
pub use node::{Node, ROOT_TAG};
pub use value::Value;

//! Encoding of node subtrees as nested `{Data, Tags, Children}` documents.
//!
//! Encoding goes straight through `serde::Serialize`; decoding builds the
//! tree directly from the deserializer with seeds, without an intermediate
//! document value.
//!
//! Nesting depth is unbounded in both directions: serde_json's recursion
//! limit is disabled and the stack grows on demand while descending.

use std::fmt;

use serde::de::{
    self, Deserialize, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor,
};
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use tracing::{debug, instrument};

use crate::domain::error::{NodeError, NodeResult};
use crate::domain::node::Node;
use crate::domain::value::Value;

/// Remaining stack below which a nested level switches to a fresh segment.
pub(crate) const RED_ZONE: usize = 64 * 1024;
/// Size of each freshly allocated stack segment.
pub(crate) const STACK_SEGMENT: usize = 1024 * 1024;

pub const DATA_KEY: &str = "Data";
pub const TAGS_KEY: &str = "Tags";
pub const CHILDREN_KEY: &str = "Children";

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
            let inner = self.0.borrow();
            let len = usize::from(inner.data.is_some())
                + usize::from(!inner.tags.is_empty())
                + usize::from(!inner.children.is_empty());
            let mut map = serializer.serialize_map(Some(len))?;
            if let Some(data) = &inner.data {
                map.serialize_entry(DATA_KEY, data)?;
            }
            if !inner.tags.is_empty() {
                map.serialize_entry(TAGS_KEY, &inner.tags)?;
            }
            if !inner.children.is_empty() {
                map.serialize_entry(CHILDREN_KEY, &inner.children)?;
            }
            map.end()
        })
    }
}

/// Fills `node` from one document object.
struct NodeVisitor<'a> {
    node: &'a Node,
}

impl<'de> Visitor<'de> for NodeVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a node object with optional Data, Tags and Children")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                DATA_KEY => {
                    let data: Value = map.next_value()?;
                    self.node.set_data(data).map_err(de::Error::custom)?;
                }
                TAGS_KEY => {
                    let tags: Option<Vec<String>> = map.next_value()?;
                    for tag in tags.unwrap_or_default() {
                        self.node.insert_tag(tag);
                    }
                }
                CHILDREN_KEY => map.next_value_seed(ChildrenSeed { parent: self.node })?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(())
    }
}

/// Decodes one object into a fresh child of `parent`.
struct ChildSeed<'a> {
    parent: &'a Node,
}

impl<'de> DeserializeSeed<'de> for ChildSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let child = self.parent.new_child();
        deserializer.deserialize_map(NodeVisitor { node: &child })
    }
}

/// Decodes a `Children` array (or `null`) under `parent`, in order.
struct ChildrenSeed<'a> {
    parent: &'a Node,
}

impl<'de> DeserializeSeed<'de> for ChildrenSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ChildrenSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of node objects")
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while seq
            .next_element_seed(ChildSeed {
                parent: self.parent,
            })?
            .is_some()
        {}
        Ok(())
    }
}

impl Node {
    /// Makes this node represent the decoded document.
    ///
    /// The document is built as a synthetic last child first; on success
    /// its data, tags and children replace this node's own and the
    /// synthetic child is discarded. On failure the synthetic child is
    /// removed again and this node is left as it was.
    #[instrument(level = "debug", skip_all)]
    pub fn deserialize_into<'de, D>(&self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        let scratch = self.new_child();
        if let Err(err) = deserializer.deserialize_map(NodeVisitor { node: &scratch }) {
            debug!(%err, "discarding partially decoded tree");
            scratch.detach();
            return Err(err);
        }
        self.absorb(&scratch);
        Ok(())
    }

    /// Moves `scratch`'s payload, tags and children onto `self`.
    fn absorb(&self, scratch: &Node) {
        scratch.detach();
        self.rm_all_children();
        let (tags, data, children) = {
            let mut s = scratch.0.borrow_mut();
            (
                std::mem::take(&mut s.tags),
                s.data.take(),
                std::mem::take(&mut s.children),
            )
        };
        {
            let mut inner = self.0.borrow_mut();
            inner.tags = tags;
            inner.data = data;
        }
        for child in children {
            child.set_parent(Some(self));
            self.0.borrow_mut().children.push(child);
        }
    }

    /// Replaces this node's contents with the JSON document in `json`.
    pub fn load_json(&self, json: &str) -> NodeResult<()> {
        // Reject syntax errors and trailing input before touching the tree.
        let mut check = json_deserializer(json);
        IgnoredAny::deserialize(serde_stacker::Deserializer::new(&mut check))?;
        check.end()?;

        let mut deserializer = json_deserializer(json);
        self.deserialize_into(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Ok(())
    }

    /// Decodes a JSON document into a new parentless node.
    pub fn from_json(json: &str) -> NodeResult<Node> {
        let node = Node::empty();
        node.load_json(json)?;
        Ok(node)
    }

    pub fn to_json(&self) -> NodeResult<String> {
        let mut out = Vec::new();
        self.serialize(&mut serde_json::Serializer::new(&mut out))?;
        utf8(out)
    }

    pub fn to_json_pretty(&self) -> NodeResult<String> {
        let mut out = Vec::new();
        self.serialize(&mut serde_json::Serializer::pretty(&mut out))?;
        utf8(out)
    }
}

fn json_deserializer(json: &str) -> serde_json::Deserializer<serde_json::de::StrRead<'_>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    deserializer
}

fn utf8(bytes: Vec<u8>) -> NodeResult<String> {
    String::from_utf8(bytes).map_err(|e| NodeError::Json(ser::Error::custom(e)))
}

//! Untyped manifest tree built from YAML.

use serde_yaml::{Number, Value};

use crate::error::ManifestError;

/// A scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

/// One node of a parsed manifest.
///
/// Mappings keep their entries in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Depth-first search over every mapping entry reachable from this node.
    ///
    /// `visit` is called with each key/value pair; the first `Some` it returns
    /// stops the walk.
    pub fn find_entry<T, F>(&self, visit: &mut F) -> Option<T>
    where
        F: FnMut(&Node, &Node) -> Option<T>,
    {
        match self {
            Self::Mapping(entries) => entries.iter().find_map(|(key, value)| {
                visit(key, value).or_else(|| value.find_entry(&mut *visit))
            }),
            Self::Sequence(items) => items.iter().find_map(|item| item.find_entry(&mut *visit)),
            Self::Scalar(_) => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(mapping) => Self::Mapping(
                mapping
                    .into_iter()
                    .map(|(k, v)| (Node::from(k), Node::from(v)))
                    .collect(),
            ),
            // Custom tags such as `!Ref foo` are transparent.
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// A parsed manifest whose root is guaranteed to be a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Node,
}

impl ManifestDocument {
    /// Parse manifest text. Empty documents and non-mapping roots are rejected.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_yaml::from_str(text).map_err(ManifestError::InvalidManifest)?;
        match Node::from(value) {
            root @ Node::Mapping(_) => Ok(Self { root }),
            _ => Err(ManifestError::RootNotMapping),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

//! Host tree nodes
//!
//! Links to parent, children and siblings are `NodeId`s into the arena.
//! `NodeId::NONE` marks a missing link.

use crate::{NamedNodeMap, NodeId};

/// Arena slot of the host tree
#[derive(Debug, Clone)]
pub struct Node {
    /// `NONE` for the document and detached nodes
    pub parent: NodeId,
    /// Head of the child list
    pub first_child: NodeId,
    /// Tail of the child list
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Detached element with no attributes
    pub fn element(name: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(name)))
    }

    /// Detached text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(TextData {
            content: content.to_string(),
        }))
    }

    /// Document node, only used for the arena root
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Text data, `None` unless this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Payload of a host node
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(TextData),
}

/// Tag name and attributes of a host element
#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: String,
    /// Attributes in insertion order
    pub attrs: NamedNodeMap,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: NamedNodeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

//! View Node
//!
//! Elements own their child list; every node keeps a plain `NodeId` back
//! reference to its parent. `class` and `style` never live in the generic
//! attribute map: they are split into a `ClassList` and a `StyleMap` when the
//! element is built and synthesized back on read.

use std::borrow::Cow;

use crate::{ClassList, NodeId, StyleMap};

/// View node
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent element (None if root or detached)
    pub parent: Option<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn element(data: ElementData) -> Self {
        Self {
            parent: None,
            data: NodeData::Element(data),
        }
    }

    pub(crate) fn text(data: &str) -> Self {
        Self {
            parent: None,
            data: NodeData::Text(TextData {
                data: data.to_string(),
            }),
        }
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
            NodeData::Text(_) => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&TextData> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    /// Child count for elements, character count for text
    pub fn length(&self) -> usize {
        match &self.data {
            NodeData::Element(e) => e.children.len(),
            NodeData::Text(t) => t.len(),
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(TextData),
}

/// Text node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextData {
    pub data: String,
}

impl TextData {
    /// Length in characters
    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `len` characters starting at character `offset`
    pub fn slice(&self, offset: usize, len: usize) -> &str {
        let start = byte_offset(&self.data, offset);
        let end = start + byte_offset(&self.data[start..], len);
        &self.data[start..end]
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, fixed at construction
    name: String,
    /// Literal attributes in insertion order, never `class` or `style`
    attrs: Vec<(String, String)>,
    classes: ClassList,
    styles: StyleMap,
    pub(crate) children: Vec<NodeId>,
}

impl ElementData {
    /// Build element data, routing `class` and `style` into their own stores
    pub fn new<I, K, V>(name: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut data = Self {
            name: name.to_string(),
            attrs: Vec::new(),
            classes: ClassList::new(),
            styles: StyleMap::new(),
            children: Vec::new(),
        };
        for (key, value) in attrs {
            data.set_attribute(key.as_ref(), value.as_ref());
        }
        data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    pub(crate) fn classes_mut(&mut self) -> &mut ClassList {
        &mut self.classes
    }

    pub(crate) fn styles_mut(&mut self) -> &mut StyleMap {
        &mut self.styles
    }

    /// Attribute keys: `class` and `style` first (only when non-empty),
    /// then literal attributes in insertion order.
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> + '_ {
        let class = (!self.classes.is_empty()).then_some("class");
        let style = (!self.styles.is_empty()).then_some("style");
        class
            .into_iter()
            .chain(style)
            .chain(self.attrs.iter().map(|(k, _)| k.as_str()))
    }

    /// Attribute entries: literal attributes in insertion order, then the
    /// synthesized `class` and `style` entries. Values are built on demand.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> + '_ {
        let literal = self
            .attrs
            .iter()
            .map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str())));
        let class = (!self.classes.is_empty())
            .then_some(())
            .into_iter()
            .map(move |_| ("class", Cow::Owned(self.classes.value())));
        let style = (!self.styles.is_empty())
            .then_some(())
            .into_iter()
            .map(move |_| ("style", Cow::Owned(self.styles.value())));
        literal.chain(class).chain(style)
    }

    /// Number of entries `attribute_keys` yields
    pub fn attribute_count(&self) -> usize {
        self.attrs.len()
            + usize::from(!self.classes.is_empty())
            + usize::from(!self.styles.is_empty())
    }

    pub fn get_attribute(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "class" => (!self.classes.is_empty()).then(|| Cow::Owned(self.classes.value())),
            "style" => (!self.styles.is_empty()).then(|| Cow::Owned(self.styles.value())),
            _ => self
                .attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| Cow::Borrowed(v.as_str())),
        }
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        match key {
            "class" => !self.classes.is_empty(),
            "style" => !self.styles.is_empty(),
            _ => self.attrs.iter().any(|(k, _)| k == key),
        }
    }

    pub(crate) fn set_attribute(&mut self, key: &str, value: &str) {
        match key {
            "class" => self.classes.set_value(value),
            "style" => self.styles.set_value(value),
            _ => match self.attrs.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value.to_string(),
                None => self.attrs.push((key.to_string(), value.to_string())),
            },
        }
    }

    pub(crate) fn remove_attribute(&mut self, key: &str) -> bool {
        match key {
            "class" => {
                let had = !self.classes.is_empty();
                self.classes.clear();
                had
            }
            "style" => {
                let had = !self.styles.is_empty();
                self.styles.clear();
                had
            }
            _ => {
                let before = self.attrs.len();
                self.attrs.retain(|(k, _)| k != key);
                self.attrs.len() != before
            }
        }
    }

    /// Same name, attributes, classes and styles. Children are not compared.
    pub fn is_similar(&self, other: &ElementData) -> bool {
        if self.name != other.name
            || self.attrs.len() != other.attrs.len()
            || !self.classes.same_set(&other.classes)
            || !self.styles.same_declarations(&other.styles)
        {
            return false;
        }
        self.attrs.iter().all(|(key, value)| {
            other
                .attrs
                .iter()
                .any(|(k, v)| k == key && v == value)
        })
    }

    /// Copy of everything but the children
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            classes: self.classes.clone(),
            styles: self.styles.clone(),
            children: Vec::new(),
        }
    }
}

//! View ↔ host conversion
//!
//! A converter builds host nodes from view nodes (and back) and owns the
//! correspondence map between the two trees.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::node::NodeData;
use crate::{HostTree, NodeId, ViewError, ViewResult, ViewTree};

/// Conversion flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Record a correspondence for every converted node
    pub bind: bool,
    /// Convert descendants too
    pub with_children: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            bind: false,
            with_children: true,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind(mut self, bind: bool) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_children(mut self, with_children: bool) -> Self {
        self.with_children = with_children;
        self
    }
}

/// Renderer-facing converter contract
pub trait Converter {
    type Host: HostTree;

    /// Host node bound to `view`
    fn corresponding_dom(&self, view: NodeId) -> Option<<Self::Host as HostTree>::Handle>;

    /// View node bound to `dom`
    fn corresponding_view(&self, dom: <Self::Host as HostTree>::Handle) -> Option<NodeId>;

    /// Record that `view` and `dom` correspond, replacing older pairings of
    /// either node
    fn bind(&mut self, view: NodeId, dom: <Self::Host as HostTree>::Handle);

    /// Forget the correspondences of `dom` and its host descendants
    fn unbind_dom(&mut self, host: &Self::Host, dom: <Self::Host as HostTree>::Handle);

    /// Create a host node (and optionally its subtree) for `view`
    fn view_to_dom(
        &mut self,
        tree: &ViewTree,
        host: &mut Self::Host,
        view: NodeId,
        options: ConvertOptions,
    ) -> ViewResult<<Self::Host as HostTree>::Handle>;

    /// Whether `dom` can stand for `view` when aligning child lists
    fn compare_nodes(
        &self,
        tree: &ViewTree,
        host: &Self::Host,
        dom: <Self::Host as HostTree>::Handle,
        view: NodeId,
    ) -> bool;
}

/// Converter keeping a bidirectional correspondence map
pub struct DomConverter<H: HostTree> {
    view_to_dom: HashMap<NodeId, H::Handle>,
    dom_to_view: HashMap<H::Handle, NodeId>,
    _host: PhantomData<fn(&H)>,
}

impl<H: HostTree> DomConverter<H> {
    pub fn new() -> Self {
        Self {
            view_to_dom: HashMap::new(),
            dom_to_view: HashMap::new(),
            _host: PhantomData,
        }
    }

    /// Number of bound pairs
    pub fn len(&self) -> usize {
        self.view_to_dom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_dom.is_empty()
    }

    /// Build view nodes for `dom` and its subtree inside `tree`.
    ///
    /// Returns `None` for host nodes with no view counterpart; such children
    /// are skipped. New view elements are created already holding their
    /// children, so no change notification is fired.
    pub fn dom_to_view(
        &mut self,
        tree: &mut ViewTree,
        host: &H,
        dom: H::Handle,
        options: ConvertOptions,
    ) -> ViewResult<Option<NodeId>> {
        let view = if let Some(data) = host.text_data(dom) {
            tree.create_text(data)
        } else if let Some(name) = host.tag_name(dom) {
            let mut children = Vec::new();
            if options.with_children {
                for child in host.child_nodes(dom) {
                    if let Some(view_child) = self.dom_to_view(tree, host, child, options)? {
                        children.push(view_child);
                    }
                }
            }
            let attrs: Vec<(String, String)> = host
                .attribute_names(dom)
                .into_iter()
                .filter_map(|key| {
                    let value = host.get_attribute(dom, &key)?.to_string();
                    Some((key, value))
                })
                .collect();
            tree.create_element_with_children(name, attrs, children)?
        } else {
            tracing::trace!("Skipping unconvertible host node {:?}", dom);
            return Ok(None);
        };

        if options.bind {
            self.bind(view, dom);
        }
        Ok(Some(view))
    }

    fn attributes_match(
        &self,
        tree: &ViewTree,
        host: &H,
        dom: H::Handle,
        view: NodeId,
    ) -> bool {
        let Ok(element) = tree.element(view) else {
            return false;
        };
        if host.tag_name(dom) != Some(element.name()) {
            return false;
        }
        element.attribute_count() == host.attribute_names(dom).len()
            && element
                .attributes()
                .all(|(key, value)| host.get_attribute(dom, key) == Some(&*value))
    }
}

impl<H: HostTree> Default for DomConverter<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HostTree> fmt::Debug for DomConverter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomConverter")
            .field("bindings", &self.view_to_dom)
            .finish()
    }
}

impl<H: HostTree> Converter for DomConverter<H> {
    type Host = H;

    fn corresponding_dom(&self, view: NodeId) -> Option<H::Handle> {
        self.view_to_dom.get(&view).copied()
    }

    fn corresponding_view(&self, dom: H::Handle) -> Option<NodeId> {
        self.dom_to_view.get(&dom).copied()
    }

    fn bind(&mut self, view: NodeId, dom: H::Handle) {
        if let Some(old_dom) = self.view_to_dom.insert(view, dom) {
            if old_dom != dom {
                self.dom_to_view.remove(&old_dom);
            }
        }
        if let Some(old_view) = self.dom_to_view.insert(dom, view) {
            if old_view != view {
                self.view_to_dom.remove(&old_view);
            }
        }
    }

    fn unbind_dom(&mut self, host: &H, dom: H::Handle) {
        if let Some(view) = self.dom_to_view.remove(&dom) {
            if self.view_to_dom.get(&view) == Some(&dom) {
                self.view_to_dom.remove(&view);
            }
        }
        for child in host.child_nodes(dom) {
            self.unbind_dom(host, child);
        }
    }

    fn view_to_dom(
        &mut self,
        tree: &ViewTree,
        host: &mut H,
        view: NodeId,
        options: ConvertOptions,
    ) -> ViewResult<H::Handle> {
        let dom = match &tree.node(view)?.data {
            NodeData::Text(text) => host.create_text(&text.data),
            NodeData::Element(element) => {
                let dom = host.create_element(element.name());
                for (key, value) in element.attributes() {
                    host.set_attribute(dom, key, &value)
                        .map_err(ViewError::host)?;
                }
                if options.with_children {
                    for &child in element.children() {
                        let dom_child = self.view_to_dom(tree, host, child, options)?;
                        host.insert_before(dom, dom_child, None)
                            .map_err(ViewError::host)?;
                    }
                }
                dom
            }
        };

        if options.bind {
            self.bind(view, dom);
        }
        Ok(dom)
    }

    fn compare_nodes(&self, tree: &ViewTree, host: &H, dom: H::Handle, view: NodeId) -> bool {
        let Some(node) = tree.get(view) else {
            return false;
        };
        match &node.data {
            NodeData::Text(text) => host.text_data(dom) == Some(text.data.as_str()),
            NodeData::Element(_) => match self.corresponding_dom(view) {
                Some(bound) => bound == dom,
                None => {
                    self.corresponding_view(dom).is_none()
                        && self.attributes_match(tree, host, dom, view)
                }
            },
        }
    }
}

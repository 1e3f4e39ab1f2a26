//! Renderer
//!
//! Collects change notifications into three dirty sets and, on `render`,
//! patches the host tree so it mirrors the view tree again. Host nodes that
//! did not change are left alone so that focus, selection and composition
//! anchored to them survive.

use std::collections::HashSet;

use crate::{
    ChangeObserver, ChangeType, ConvertOptions, Converter, DiffAction, HostTree, NodeId, ViewError,
    ViewResult, ViewTree, diff,
};

type Handle<C> = <<C as Converter>::Host as HostTree>::Handle;

/// Insertion-ordered set of view nodes
#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returns `false` if it was already present
    pub fn insert(&mut self, node: NodeId) -> bool {
        if !self.members.insert(node) {
            return false;
        }
        self.order.push(node);
        true
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Nodes in the order they were first added
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }
}

/// Host mutations performed by one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub texts_updated: usize,
    pub attributes_set: usize,
    pub attributes_removed: usize,
    pub nodes_inserted: usize,
    pub nodes_removed: usize,
}

impl RenderStats {
    /// No host mutation happened
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Dirty tracking and host tree reconciliation
#[derive(Debug)]
pub struct Renderer<C: Converter> {
    converter: C,
    marked_attributes: DirtySet,
    marked_children: DirtySet,
    marked_texts: DirtySet,
}

impl<C: Converter> Renderer<C> {
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            marked_attributes: DirtySet::new(),
            marked_children: DirtySet::new(),
            marked_texts: DirtySet::new(),
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn converter_mut(&mut self) -> &mut C {
        &mut self.converter
    }

    /// Elements whose attributes need syncing
    pub fn marked_attributes(&self) -> &DirtySet {
        &self.marked_attributes
    }

    /// Elements whose child lists need syncing
    pub fn marked_children(&self) -> &DirtySet {
        &self.marked_children
    }

    /// Text nodes whose data needs syncing
    pub fn marked_texts(&self) -> &DirtySet {
        &self.marked_texts
    }

    /// Mark `node` for the next render pass.
    ///
    /// Only nodes already present in the host tree are tracked: texts whose
    /// parent is bound, and elements that are bound themselves. Anything else
    /// is rendered in full when its ancestor gets inserted.
    pub fn mark_to_sync(&mut self, tree: &ViewTree, kind: ChangeType, node: NodeId) {
        let (set, bound) = match kind {
            ChangeType::Text => {
                let bound = tree
                    .parent(node)
                    .is_some_and(|parent| self.converter.corresponding_dom(parent).is_some());
                (&mut self.marked_texts, bound)
            }
            ChangeType::Attributes => (
                &mut self.marked_attributes,
                self.converter.corresponding_dom(node).is_some(),
            ),
            ChangeType::Children => (
                &mut self.marked_children,
                self.converter.corresponding_dom(node).is_some(),
            ),
        };
        if bound {
            if set.insert(node) {
                tracing::trace!("Marked {} for {} sync", node, kind);
            }
        } else {
            tracing::trace!("Not marking unrendered {} for {} sync", node, kind);
        }
    }

    /// Apply all pending changes to `host`.
    ///
    /// Texts are synced first, then attributes, then child lists. The dirty
    /// sets are emptied before any host call, so they are empty afterwards
    /// even when a host operation fails. The first host failure is returned.
    pub fn render(&mut self, tree: &ViewTree, host: &mut C::Host) -> ViewResult<RenderStats> {
        let texts = std::mem::take(&mut self.marked_texts);
        let attributes = std::mem::take(&mut self.marked_attributes);
        let children = std::mem::take(&mut self.marked_children);
        let mut stats = RenderStats::default();

        for node in texts.iter() {
            let Some(parent) = tree.parent(node) else {
                tracing::trace!("Skipping detached text {}", node);
                continue;
            };
            if children.contains(parent) || self.converter.corresponding_dom(parent).is_none() {
                continue;
            }
            self.update_text(tree, host, node, &mut stats)?;
        }

        for element in attributes.iter() {
            self.update_attributes(tree, host, element, &mut stats)?;
        }

        for element in children.iter() {
            self.update_children(tree, host, element, &mut stats)?;
        }

        tracing::debug!(
            "Rendered {} text(s), {} attribute set(s), {} child list(s): {:?}",
            texts.len(),
            attributes.len(),
            children.len(),
            stats
        );
        Ok(stats)
    }

    fn update_text(
        &self,
        tree: &ViewTree,
        host: &mut C::Host,
        node: NodeId,
        stats: &mut RenderStats,
    ) -> ViewResult<()> {
        let Some(dom) = self.converter.corresponding_dom(node) else {
            tracing::trace!("Skipping unbound text {}", node);
            return Ok(());
        };
        let data = &tree.text(node)?.data;
        if host.text_data(dom) != Some(data.as_str()) {
            host.set_text_data(dom, data).map_err(ViewError::host)?;
            stats.texts_updated += 1;
        }
        Ok(())
    }

    fn update_attributes(
        &self,
        tree: &ViewTree,
        host: &mut C::Host,
        node: NodeId,
        stats: &mut RenderStats,
    ) -> ViewResult<()> {
        let Some(dom) = self.converter.corresponding_dom(node) else {
            tracing::trace!("Skipping unbound element {}", node);
            return Ok(());
        };
        let element = tree.element(node)?;
        let stale = host.attribute_names(dom);

        for key in element.attribute_keys() {
            if let Some(value) = element.get_attribute(key) {
                host.set_attribute(dom, key, &value)
                    .map_err(ViewError::host)?;
                stats.attributes_set += 1;
            }
        }
        for key in stale {
            if !element.has_attribute(&key) {
                host.remove_attribute(dom, &key).map_err(ViewError::host)?;
                stats.attributes_removed += 1;
            }
        }
        Ok(())
    }

    fn update_children(
        &mut self,
        tree: &ViewTree,
        host: &mut C::Host,
        node: NodeId,
        stats: &mut RenderStats,
    ) -> ViewResult<()> {
        let Some(dom) = self.converter.corresponding_dom(node) else {
            tracing::trace!("Skipping unbound element {}", node);
            return Ok(());
        };
        let view_children = tree.element(node)?.children();
        let mut dom_children = host.child_nodes(dom);

        let actions = {
            let converter = &self.converter;
            let host = &*host;
            diff(&dom_children, view_children, |&dom_child, &view_child| {
                converter.compare_nodes(tree, host, dom_child, view_child)
            })
        };

        // dom_children[..i] mirrors view_children[..i]
        let mut i = 0;
        for action in actions {
            match action {
                DiffAction::Insert => {
                    let view_child = child_at(view_children, i)?;
                    let options = ConvertOptions::new().with_bind(true);
                    let dom_child = self.converter.view_to_dom(tree, host, view_child, options)?;
                    host.insert_before(dom, dom_child, dom_children.get(i).copied())
                        .map_err(ViewError::host)?;
                    dom_children.insert(i, dom_child);
                    stats.nodes_inserted += 1;
                    i += 1;
                }
                DiffAction::Delete => {
                    let dom_child = child_at(&dom_children, i)?;
                    host.remove_child(dom, dom_child).map_err(ViewError::host)?;
                    dom_children.remove(i);
                    self.converter.unbind_dom(host, dom_child);
                    stats.nodes_removed += 1;
                }
                DiffAction::Equal => {
                    let view_child = child_at(view_children, i)?;
                    let dom_child = child_at(&dom_children, i)?;
                    self.adopt(tree, host, view_child, dom_child, stats)?;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    /// Bind a retained host node to a view node that was not bound to it yet
    /// and bring its subtree in line.
    fn adopt(
        &mut self,
        tree: &ViewTree,
        host: &mut C::Host,
        view: NodeId,
        dom: Handle<C>,
        stats: &mut RenderStats,
    ) -> ViewResult<()> {
        if self.converter.corresponding_dom(view) == Some(dom) {
            return Ok(());
        }
        tracing::trace!("Adopting host node {:?} for {}", dom, view);
        self.converter.bind(view, dom);
        if tree.is_element(view) {
            self.update_attributes(tree, host, view, stats)?;
            self.update_children(tree, host, view, stats)?;
        }
        Ok(())
    }
}

fn child_at<T: Copy>(children: &[T], index: usize) -> ViewResult<T> {
    children
        .get(index)
        .copied()
        .ok_or(ViewError::IndexOutOfRange {
            index,
            length: children.len(),
        })
}

impl<C: Converter> ChangeObserver for Renderer<C> {
    fn on_change(&mut self, tree: &ViewTree, kind: ChangeType, node: NodeId) {
        self.mark_to_sync(tree, kind, node);
    }
}

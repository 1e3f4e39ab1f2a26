//! Tree view session
//!
//! Owns one view tree, the host tree it is rendered into and the renderer
//! that keeps them in sync. The renderer observes the view tree, so callers
//! only mutate the tree and call `render` once per batch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    ChangeType, ConvertOptions, Converter, DomConverter, HostTree, NodeId, RenderStats, Renderer,
    ViewError, ViewResult, ViewTree,
};

/// Editing view bound to a host tree
pub struct TreeView<H: HostTree + 'static> {
    tree: ViewTree,
    dom: H,
    renderer: Rc<RefCell<Renderer<DomConverter<H>>>>,
    roots: HashMap<String, NodeId>,
}

impl<H: HostTree + 'static> TreeView<H> {
    /// Create a session over `dom` with an empty view tree
    pub fn new(dom: H) -> Self {
        let renderer = Rc::new(RefCell::new(Renderer::new(DomConverter::new())));
        let mut tree = ViewTree::new();
        tree.observe(renderer.clone());
        Self {
            tree,
            dom,
            renderer,
            roots: HashMap::new(),
        }
    }

    /// Turn the host element `dom_root` into a bound view root named `name`
    pub fn create_root(&mut self, dom_root: H::Handle, name: &str) -> ViewResult<NodeId> {
        if !self.dom.is_element(dom_root) {
            return Err(ViewError::HostNodeNotConvertible);
        }
        let mut renderer = self
            .renderer
            .try_borrow_mut()
            .map_err(|_| ViewError::RenderInProgress)?;
        let options = ConvertOptions::new().with_bind(true);
        let root = renderer
            .converter_mut()
            .dom_to_view(&mut self.tree, &self.dom, dom_root, options)?
            .ok_or(ViewError::HostNodeNotConvertible)?;
        // Content already in the host is treated as unverified
        renderer.mark_to_sync(&self.tree, ChangeType::Children, root);

        tracing::debug!("Created view root {:?} as {}", name, root);
        self.roots.insert(name.to_string(), root);
        Ok(root)
    }

    /// View root registered under `name`
    pub fn root(&self, name: &str) -> Option<NodeId> {
        self.roots.get(name).copied()
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn dom(&self) -> &H {
        &self.dom
    }

    /// Mutable host tree. Changes made here are not tracked.
    pub fn dom_mut(&mut self) -> &mut H {
        &mut self.dom
    }

    pub fn renderer(&self) -> &Rc<RefCell<Renderer<DomConverter<H>>>> {
        &self.renderer
    }

    /// Host node currently bound to `view`
    pub fn corresponding_dom(&self, view: NodeId) -> Option<H::Handle> {
        self.renderer.borrow().converter().corresponding_dom(view)
    }

    /// Sync every pending change into the host tree, stopping at the first
    /// host failure
    pub fn render(&mut self) -> ViewResult<RenderStats> {
        let mut renderer = self
            .renderer
            .try_borrow_mut()
            .map_err(|_| ViewError::RenderInProgress)?;
        renderer.render(&self.tree, &mut self.dom)
    }
}

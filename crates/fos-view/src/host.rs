//! Host tree abstraction
//!
//! The mutable tree the renderer patches (a browser document, or
//! `fos_dom::DomTree`). Handles are cheap copyable node references.

use std::fmt::Debug;
use std::hash::Hash;

use fos_dom::{DomError, DomTree};

/// Operations the renderer and converter need from a host tree
pub trait HostTree {
    /// Node reference
    type Handle: Copy + Eq + Hash + Debug;
    /// Failure reported by mutating operations
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_element(&mut self, name: &str) -> Self::Handle;
    fn create_text(&mut self, data: &str) -> Self::Handle;

    /// Tag name, `None` for anything but elements
    fn tag_name(&self, node: Self::Handle) -> Option<&str>;
    /// Text data, `None` for anything but text nodes
    fn text_data(&self, node: Self::Handle) -> Option<&str>;
    fn set_text_data(&mut self, node: Self::Handle, data: &str) -> Result<(), Self::Error>;

    fn attribute_names(&self, node: Self::Handle) -> Vec<String>;
    fn get_attribute(&self, node: Self::Handle, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, node: Self::Handle, name: &str, value: &str)
        -> Result<(), Self::Error>;
    fn remove_attribute(&mut self, node: Self::Handle, name: &str) -> Result<(), Self::Error>;

    /// Snapshot of the child list
    fn child_nodes(&self, node: Self::Handle) -> Vec<Self::Handle>;
    /// Insert `child` before `reference`, or at the end when `None`
    fn insert_before(
        &mut self,
        parent: Self::Handle,
        child: Self::Handle,
        reference: Option<Self::Handle>,
    ) -> Result<(), Self::Error>;
    fn remove_child(&mut self, parent: Self::Handle, child: Self::Handle)
        -> Result<(), Self::Error>;

    fn is_element(&self, node: Self::Handle) -> bool {
        self.tag_name(node).is_some()
    }

    fn is_text(&self, node: Self::Handle) -> bool {
        self.text_data(node).is_some()
    }
}

impl HostTree for DomTree {
    type Handle = fos_dom::NodeId;
    type Error = DomError;

    fn create_element(&mut self, name: &str) -> Self::Handle {
        DomTree::create_element(self, name)
    }

    fn create_text(&mut self, data: &str) -> Self::Handle {
        DomTree::create_text(self, data)
    }

    fn tag_name(&self, node: Self::Handle) -> Option<&str> {
        DomTree::tag_name(self, node)
    }

    fn text_data(&self, node: Self::Handle) -> Option<&str> {
        self.text(node)
    }

    fn set_text_data(&mut self, node: Self::Handle, data: &str) -> Result<(), DomError> {
        self.set_text(node, data)
    }

    fn attribute_names(&self, node: Self::Handle) -> Vec<String> {
        self.attributes(node)
            .map(|attrs| attrs.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn get_attribute(&self, node: Self::Handle, name: &str) -> Option<&str> {
        DomTree::get_attribute(self, node, name)
    }

    fn set_attribute(&mut self, node: Self::Handle, name: &str, value: &str) -> Result<(), DomError> {
        DomTree::set_attribute(self, node, name, value)
    }

    fn remove_attribute(&mut self, node: Self::Handle, name: &str) -> Result<(), DomError> {
        DomTree::remove_attribute(self, node, name)
    }

    fn child_nodes(&self, node: Self::Handle) -> Vec<Self::Handle> {
        self.child_ids(node)
    }

    fn insert_before(
        &mut self,
        parent: Self::Handle,
        child: Self::Handle,
        reference: Option<Self::Handle>,
    ) -> Result<(), DomError> {
        DomTree::insert_before(self, parent, child, reference).map(|_| ())
    }

    fn remove_child(&mut self, parent: Self::Handle, child: Self::Handle) -> Result<(), DomError> {
        DomTree::remove_child(self, parent, child).map(|_| ())
    }
}

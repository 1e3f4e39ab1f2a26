//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, NamedNodeMap, Node, NodeData, NodeId};

/// Arena-based DOM tree for memory efficiency
///
/// Slot 0 always holds the document node. Removed nodes stay in the arena,
/// detached, so their IDs never dangle.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node ID
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .map(|n| n.parent)
            .filter(|parent| parent.is_valid())
    }

    /// Iterate over the children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let next = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    /// Snapshot of the child IDs of a node
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| e.name.as_str())
    }

    /// Text content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_text)
    }

    /// Replace the content of a text node
    pub fn set_text(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(text) => {
                text.content.clear();
                text.content.push_str(content);
                Ok(())
            }
            _ => Err(DomError::InvalidNodeType(id)),
        }
    }

    /// Attributes of an element
    pub fn attributes(&self, id: NodeId) -> Option<&NamedNodeMap> {
        self.get(id).and_then(Node::as_element).map(|e| &e.attrs)
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id).and_then(|attrs| attrs.get_attribute(name))
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let element = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))?;
        element.attrs.set_attribute(name, value);
        Ok(())
    }

    /// Remove an attribute from an element. Removing a missing attribute is not an error.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        let element = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))?;
        element.attrs.remove_attribute(name);
        Ok(())
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append a child node, moving it out of its current parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if self.node(parent)?.is_text() {
            return Err(DomError::InvalidNodeType(parent));
        }
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        // Inserting a node before itself means inserting before its next sibling
        let reference = match reference {
            Some(r) if r == child => Some(self.node(child)?.next_sibling).filter(|n| n.is_valid()),
            other => other,
        };

        self.detach(child)?;

        let (prev, next) = match reference {
            Some(next) => (self.node(next)?.prev_sibling, next),
            None => (self.node(parent)?.last_child, NodeId::NONE),
        };

        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = child;
        } else {
            self.node_mut(parent)?.last_child = child;
        }

        tracing::trace!("Inserted {} into {} before {:?}", child, parent, reference);
        Ok(child)
    }

    /// Remove a child node; the node stays in the arena, detached
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)?;
        tracing::trace!("Removed {} from {}", child, parent);
        Ok(child)
    }

    fn detach(&mut self, child: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(child)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }

        let node = self.node_mut(child)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

//! View Tree (arena-based allocation)

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use crate::node::{ElementData, Node, NodeData, TextData};
use crate::{ChangeDispatcher, ChangeObserver, ChangeType, NodeId, ViewError, ViewResult};

/// Nodes accepted by `insert_children`: one node, a list, or raw text that is
/// wrapped into a new text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSource {
    Node(NodeId),
    Nodes(Vec<NodeId>),
    Text(String),
}

impl From<NodeId> for NodeSource {
    fn from(id: NodeId) -> Self {
        NodeSource::Node(id)
    }
}

impl From<Vec<NodeId>> for NodeSource {
    fn from(ids: Vec<NodeId>) -> Self {
        NodeSource::Nodes(ids)
    }
}

impl From<&[NodeId]> for NodeSource {
    fn from(ids: &[NodeId]) -> Self {
        NodeSource::Nodes(ids.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for NodeSource {
    fn from(ids: [NodeId; N]) -> Self {
        NodeSource::Nodes(ids.to_vec())
    }
}

impl From<&str> for NodeSource {
    fn from(text: &str) -> Self {
        NodeSource::Text(text.to_string())
    }
}

impl From<String> for NodeSource {
    fn from(text: String) -> Self {
        NodeSource::Text(text)
    }
}

/// Arena-based view tree
///
/// Elements own their children through their child list; nodes point back at
/// their parent by ID. Removed nodes stay in the arena, detached.
///
/// Every mutating method validates its arguments, then notifies the
/// dispatcher, then applies the change.
#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: Vec<Node>,
    dispatcher: ChangeDispatcher,
}

impl ViewTree {
    /// Create an empty tree with its own dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree reporting to `dispatcher`
    pub fn with_dispatcher(dispatcher: ChangeDispatcher) -> Self {
        Self {
            nodes: Vec::new(),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &ChangeDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut ChangeDispatcher {
        &mut self.dispatcher
    }

    /// Shorthand for `dispatcher_mut().subscribe(observer)`
    pub fn observe(&mut self, observer: Rc<RefCell<dyn ChangeObserver>>) {
        self.dispatcher.subscribe(observer);
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn notify(&self, kind: ChangeType, node: NodeId) {
        self.dispatcher.notify(self, kind, node);
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> ViewResult<&Node> {
        self.get(id).ok_or(ViewError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> ViewResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(ViewError::NodeNotFound(id))
    }

    /// Element data of `id`
    pub fn element(&self, id: NodeId) -> ViewResult<&ElementData> {
        self.node(id)?
            .as_element()
            .ok_or(ViewError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> ViewResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(ViewError::NotAnElement(id))
    }

    /// Text payload of `id`
    pub fn text(&self, id: NodeId) -> ViewResult<&TextData> {
        self.node(id)?.as_text().ok_or(ViewError::NotAText(id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_text)
    }

    /// Tag name of an element
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(Node::as_element)
            .map(ElementData::name)
    }

    /// Parent element, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of an element (empty for text and unknown IDs)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(Node::as_element)
            .map(ElementData::children)
            .unwrap_or_default()
    }

    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// Index of `node` within `parent`'s children
    pub fn child_index(&self, parent: NodeId, node: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == node)
    }

    /// Index of `node` within its own parent
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        self.parent(node)
            .and_then(|parent| self.child_index(parent, node))
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Child count for elements, character count for texts
    pub fn length(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, Node::length)
    }

    /// Create a detached element. `class` and `style` entries are parsed into
    /// the class list and style map.
    pub fn create_element<I, K, V>(&mut self, name: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.push(Node::element(ElementData::new(name, attrs)))
    }

    /// Create a detached element that already owns `children`.
    ///
    /// No notification is sent: nothing can be observing a node that did not
    /// exist yet.
    pub fn create_element_with_children<I, K, V>(
        &mut self,
        name: &str,
        attrs: I,
        children: impl Into<NodeSource>,
    ) -> ViewResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let children = self.resolve(children.into())?;
        let id = self.create_element(name, attrs);
        self.attach(id, 0, &children)?;
        Ok(id)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.push(Node::text(data))
    }

    fn resolve(&mut self, nodes: NodeSource) -> ViewResult<Vec<NodeId>> {
        match nodes {
            NodeSource::Node(id) => {
                self.node(id)?;
                Ok(vec![id])
            }
            NodeSource::Nodes(ids) => {
                for &id in &ids {
                    self.node(id)?;
                }
                Ok(ids)
            }
            NodeSource::Text(data) => Ok(vec![self.create_text(&data)]),
        }
    }

    fn attach(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) -> ViewResult<()> {
        for &node in nodes {
            self.node_mut(node)?.parent = Some(parent);
        }
        let children = &mut self.element_mut(parent)?.children;
        let tail = children.split_off(index);
        children.extend_from_slice(nodes);
        children.extend(tail);
        Ok(())
    }

    /// Insert nodes into `parent` at `index`, returns how many were inserted.
    ///
    /// Inserted nodes must not be attached elsewhere; remove them first.
    pub fn insert_children(
        &mut self,
        parent: NodeId,
        index: usize,
        nodes: impl Into<NodeSource>,
    ) -> ViewResult<usize> {
        let length = self.element(parent)?.children.len();
        if index > length {
            return Err(ViewError::IndexOutOfRange { index, length });
        }
        let nodes = self.resolve(nodes.into())?;

        self.notify(ChangeType::Children, parent);
        self.attach(parent, index, &nodes)?;
        tracing::trace!("Inserted {} node(s) into {} at {}", nodes.len(), parent, index);
        Ok(nodes.len())
    }

    /// Insert nodes at the end of `parent`
    pub fn append_children(
        &mut self,
        parent: NodeId,
        nodes: impl Into<NodeSource>,
    ) -> ViewResult<usize> {
        let index = self.element(parent)?.children.len();
        self.insert_children(parent, index, nodes)
    }

    /// Detach `how_many` children starting at `index` and return them
    pub fn remove_children(
        &mut self,
        parent: NodeId,
        index: usize,
        how_many: usize,
    ) -> ViewResult<Vec<NodeId>> {
        let length = self.element(parent)?.children.len();
        let end = index.saturating_add(how_many);
        if end > length {
            return Err(ViewError::IndexOutOfRange { index: end, length });
        }

        self.notify(ChangeType::Children, parent);
        let removed: Vec<NodeId> = self
            .element_mut(parent)?
            .children
            .drain(index..end)
            .collect();
        for &node in &removed {
            self.node_mut(node)?.parent = None;
        }
        tracing::trace!("Removed {} node(s) from {} at {}", removed.len(), parent, index);
        Ok(removed)
    }

    pub fn get_attribute(&self, id: NodeId, key: &str) -> Option<Cow<'_, str>> {
        self.get(id)?.as_element()?.get_attribute(key)
    }

    pub fn has_attribute(&self, id: NodeId, key: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_attribute(key))
    }

    /// Set an attribute; `class` and `style` replace the whole class list or
    /// style map.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: &str) -> ViewResult<()> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        self.element_mut(id)?.set_attribute(key, value);
        Ok(())
    }

    /// Remove an attribute, returns `true` if it was present
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) -> ViewResult<bool> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        Ok(self.element_mut(id)?.remove_attribute(key))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> ViewResult<()> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        self.element_mut(id)?.classes_mut().add(class);
        Ok(())
    }

    /// Remove a class, returns `true` if it was present
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> ViewResult<bool> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        Ok(self.element_mut(id)?.classes_mut().remove(class))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_ok_and(|e| e.classes().contains(class))
    }

    /// Class names in insertion order
    pub fn class_names(&self, id: NodeId) -> Vec<&str> {
        self.element(id)
            .map(|e| e.classes().iter().collect())
            .unwrap_or_default()
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> ViewResult<()> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        self.element_mut(id)?.styles_mut().set(property, value);
        Ok(())
    }

    /// Set several properties with a single notification
    pub fn set_styles<'a>(
        &mut self,
        id: NodeId,
        styles: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> ViewResult<()> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        let map = self.element_mut(id)?.styles_mut();
        for (property, value) in styles {
            map.set(property, value);
        }
        Ok(())
    }

    /// Remove a style property, returns `true` if it was present
    pub fn remove_style(&mut self, id: NodeId, property: &str) -> ViewResult<bool> {
        self.element(id)?;
        self.notify(ChangeType::Attributes, id);
        Ok(self.element_mut(id)?.styles_mut().remove(property))
    }

    pub fn get_style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.get(id)?.as_element()?.styles().get(property)
    }

    pub fn has_style(&self, id: NodeId, property: &str) -> bool {
        self.get_style(id, property).is_some()
    }

    /// Style property names in insertion order
    pub fn style_names(&self, id: NodeId) -> Vec<&str> {
        self.element(id)
            .map(|e| e.styles().properties().collect())
            .unwrap_or_default()
    }

    /// Same element, or two elements with equal name, attributes, classes
    /// and styles. Children are ignored.
    pub fn is_similar(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return self.get(a).is_some();
        }
        match (self.element(a), self.element(b)) {
            (Ok(a), Ok(b)) => a.is_similar(b),
            _ => false,
        }
    }

    /// Copy a node into a new detached node. With `deep`, children are
    /// cloned recursively; otherwise the clone is childless.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> ViewResult<NodeId> {
        let copy = match &self.node(id)?.data {
            NodeData::Text(text) => Node::text(&text.data),
            NodeData::Element(element) => Node::element(element.shallow_clone()),
        };
        let clone = self.push(copy);
        if deep && self.is_element(id) {
            let children = self.children(id).to_vec();
            let mut cloned = Vec::with_capacity(children.len());
            for child in children {
                cloned.push(self.clone_node(child, true)?);
            }
            self.attach(clone, 0, &cloned)?;
        }
        Ok(clone)
    }

    /// Replace the data of a text node
    pub fn set_text_data(&mut self, id: NodeId, data: &str) -> ViewResult<()> {
        self.text(id)?;
        self.notify(ChangeType::Text, id);
        if let NodeData::Text(text) = &mut self.node_mut(id)?.data {
            text.data.clear();
            text.data.push_str(data);
        }
        Ok(())
    }

    /// Nearest ancestor element of `id` accepted by `predicate`
    pub fn find_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(&ElementData) -> bool,
    ) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if self
                .get(ancestor)
                .and_then(Node::as_element)
                .is_some_and(&predicate)
            {
                return Some(ancestor);
            }
            current = self.parent(ancestor);
        }
        None
    }

    /// Topmost ancestor of `id` (itself when detached)
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChangeRecord, ChangeRecorder};

    fn recording_tree() -> (ViewTree, Rc<RefCell<ChangeRecorder>>) {
        let mut tree = ViewTree::new();
        let recorder = Rc::new(RefCell::new(ChangeRecorder::new()));
        tree.observe(recorder.clone());
        (tree, recorder)
    }

    const NO_ATTRS: [(&str, &str); 0] = [];

    #[test]
    fn test_insert_children_variants() {
        let mut tree = ViewTree::new();
        let p = tree.create_element("p", NO_ATTRS);
        let a = tree.create_element("a", NO_ATTRS);
        let b = tree.create_element("b", NO_ATTRS);
        let c = tree.create_element("c", NO_ATTRS);

        assert_eq!(tree.insert_children(p, 0, a).unwrap(), 1);
        assert_eq!(tree.insert_children(p, 0, vec![b, c]).unwrap(), 2);
        assert_eq!(tree.insert_children(p, 1, "foo").unwrap(), 1);

        let children = tree.children(p).to_vec();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0], b);
        assert_eq!(tree.text(children[1]).unwrap().data, "foo");
        assert_eq!(&children[2..], &[c, a]);
        for child in children {
            assert_eq!(tree.parent(child), Some(p));
        }
        assert_eq!(tree.child_index(p, a), Some(3));
        assert_eq!(tree.index_in_parent(c), Some(2));
    }

    #[test]
    fn test_insert_children_validation() {
        let mut tree = ViewTree::new();
        let p = tree.create_element("p", NO_ATTRS);
        let t = tree.create_text("x");
        assert!(matches!(
            tree.insert_children(p, 1, "x"),
            Err(ViewError::IndexOutOfRange { index: 1, length: 0 })
        ));
        assert!(matches!(
            tree.insert_children(t, 0, p),
            Err(ViewError::NotAnElement(id)) if id == t
        ));
    }

    #[test]
    fn test_remove_children() {
        let mut tree = ViewTree::new();
        let p = tree.create_element("p", NO_ATTRS);
        tree.append_children(p, "a").unwrap();
        tree.append_children(p, "b").unwrap();
        tree.append_children(p, "c").unwrap();
        let before = tree.children(p).to_vec();

        let removed = tree.remove_children(p, 1, 2).unwrap();
        assert_eq!(removed, before[1..].to_vec());
        assert_eq!(tree.children(p), &before[..1]);
        assert!(removed.iter().all(|&n| tree.parent(n).is_none()));
        assert!(tree.remove_children(p, 0, 2).is_err());
    }

    #[test]
    fn test_notifications_fire_before_mutation() {
        struct Snapshot(Vec<usize>);
        impl ChangeObserver for Snapshot {
            fn on_change(&mut self, tree: &ViewTree, _kind: ChangeType, node: NodeId) {
                self.0.push(tree.child_count(node));
            }
        }

        let mut tree = ViewTree::new();
        let snapshot = Rc::new(RefCell::new(Snapshot(Vec::new())));
        tree.observe(snapshot.clone());
        let p = tree.create_element("p", NO_ATTRS);
        tree.append_children(p, "a").unwrap();
        tree.append_children(p, "b").unwrap();
        tree.remove_children(p, 0, 1).unwrap();
        assert_eq!(snapshot.borrow().0, vec![0, 1, 2]);
    }

    #[test]
    fn test_change_kinds() {
        let (mut tree, recorder) = recording_tree();
        let p = tree.create_element("p", NO_ATTRS);
        let t = tree.create_text("x");
        tree.append_children(p, t).unwrap();
        tree.set_attribute(p, "id", "a").unwrap();
        tree.add_class(p, "big").unwrap();
        tree.set_style(p, "color", "red").unwrap();
        tree.set_text_data(t, "y").unwrap();

        let kinds: Vec<ChangeRecord> = recorder.borrow_mut().take_records();
        assert_eq!(
            kinds.iter().map(|r| (r.kind, r.node)).collect::<Vec<_>>(),
            vec![
                (ChangeType::Children, p),
                (ChangeType::Attributes, p),
                (ChangeType::Attributes, p),
                (ChangeType::Attributes, p),
                (ChangeType::Text, t),
            ]
        );
        assert_eq!(tree.text(t).unwrap().data, "y");
    }

    #[test]
    fn test_failed_validation_does_not_notify() {
        let (mut tree, recorder) = recording_tree();
        let t = tree.create_text("x");
        assert!(tree.set_attribute(t, "id", "a").is_err());
        assert!(tree.set_text_data(NodeId(99), "y").is_err());
        assert!(recorder.borrow().records().is_empty());
    }

    #[test]
    fn test_class_and_style_operations() {
        let mut tree = ViewTree::new();
        let p = tree.create_element("p", [("class", "one two"), ("style", "color:red")]);

        assert!(tree.has_class(p, "one"));
        tree.add_class(p, "three").unwrap();
        assert!(tree.remove_class(p, "one").unwrap());
        assert!(!tree.remove_class(p, "one").unwrap());
        assert_eq!(tree.class_names(p), vec!["two", "three"]);
        assert_eq!(tree.get_attribute(p, "class").as_deref(), Some("two three"));

        tree.set_styles(p, [("margin", "0"), ("color", "blue")]).unwrap();
        assert_eq!(tree.style_names(p), vec!["color", "margin"]);
        assert_eq!(tree.get_style(p, "color"), Some("blue"));
        assert!(tree.remove_style(p, "margin").unwrap());
        assert!(!tree.has_style(p, "margin"));

        tree.set_attribute(p, "class", "x  y").unwrap();
        assert_eq!(tree.class_names(p), vec!["x", "y"]);
        assert!(tree.remove_attribute(p, "style").unwrap());
        assert!(!tree.has_attribute(p, "style"));
    }

    #[test]
    fn test_is_similar() {
        let mut tree = ViewTree::new();
        let a = tree.create_element("p", [("id", "x"), ("class", "a b")]);
        let b = tree.create_element("p", [("class", "b a"), ("id", "x")]);
        let c = tree.create_element("p", [("id", "y")]);
        tree.append_children(b, "child").unwrap();

        assert!(tree.is_similar(a, a));
        assert!(tree.is_similar(a, b));
        assert!(!tree.is_similar(a, c));
    }

    #[test]
    fn test_clone_node() {
        let mut tree = ViewTree::new();
        let p = tree.create_element("p", [("id", "x"), ("class", "c"), ("style", "top:0")]);
        let b = tree.create_element("b", NO_ATTRS);
        tree.append_children(b, "bold").unwrap();
        tree.append_children(p, vec![b]).unwrap();
        tree.append_children(p, "tail").unwrap();

        let shallow = tree.clone_node(p, false).unwrap();
        assert!(tree.is_similar(p, shallow));
        assert_eq!(tree.child_count(shallow), 0);

        tree.add_class(shallow, "extra").unwrap();
        assert!(!tree.has_class(p, "extra"));

        let deep = tree.clone_node(p, true).unwrap();
        let cloned = tree.children(deep).to_vec();
        assert_eq!(cloned.len(), 2);
        assert_ne!(cloned[0], b);
        assert_eq!(tree.parent(cloned[0]), Some(deep));
        assert_eq!(tree.name(cloned[0]), Some("b"));
        let inner = tree.child(cloned[0], 0).unwrap();
        assert_eq!(tree.text(inner).unwrap().data, "bold");
        assert_eq!(tree.parent(deep), None);
    }

    #[test]
    fn test_deep_clone_copies_text_leaves() {
        let mut tree = ViewTree::new();
        let b = tree.create_element("b", NO_ATTRS);
        tree.append_children(b, "bold").unwrap();
        let p = tree.create_element_with_children("p", NO_ATTRS, vec![b]).unwrap();
        tree.append_children(p, "tail").unwrap();

        let deep = tree.clone_node(p, true).unwrap();
        let cloned = tree.children(deep).to_vec();
        assert_eq!(cloned.len(), 2);
        let grandchild = tree.child(cloned[0], 0).unwrap();
        assert_eq!(tree.text(grandchild).unwrap().data, "bold");
        assert_eq!(tree.parent(grandchild), Some(cloned[0]));
        assert_eq!(tree.text(cloned[1]).unwrap().data, "tail");
        assert_ne!(cloned[1], tree.child(p, 1).unwrap());

        // Cloning a lone text node, deep or not
        let tail = tree.child(p, 1).unwrap();
        let copy = tree.clone_node(tail, true).unwrap();
        assert_eq!(tree.text(copy).unwrap().data, "tail");
        assert_eq!(tree.parent(copy), None);
    }

    #[test]
    fn test_create_element_with_children_is_silent() {
        let (mut tree, recorder) = recording_tree();
        let t = tree.create_text("x");
        let p = tree
            .create_element_with_children("p", NO_ATTRS, vec![t])
            .unwrap();
        assert_eq!(tree.children(p), &[t]);
        assert_eq!(tree.parent(t), Some(p));
        assert!(recorder.borrow().records().is_empty());
    }

    #[test]
    fn test_find_ancestor_and_root() {
        let mut tree = ViewTree::new();
        let root = tree.create_element("div", [("contenteditable", "true")]);
        let p = tree.create_element("p", NO_ATTRS);
        tree.append_children(root, p).unwrap();
        tree.append_children(p, "x").unwrap();
        let text = tree.child(p, 0).unwrap();

        assert_eq!(tree.find_ancestor(text, |e| e.name() == "div"), Some(root));
        assert_eq!(tree.find_ancestor(text, |e| e.name() == "p"), Some(p));
        assert_eq!(tree.find_ancestor(text, |e| e.name() == "ul"), None);
        assert_eq!(tree.root_of(text), root);
        assert_eq!(tree.length(text), 1);
        assert_eq!(tree.length(root), 1);
    }
}

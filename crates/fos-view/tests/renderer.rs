//! Rendering tests
//!
//! Every test edits the view tree of a `TreeView` and checks what reached the
//! host `DomTree` after `render`.

use fos_dom::{DomError, DomTree};
use fos_view::{Converter, HostTree, NodeId, TreeView, ViewError};

const NO_ATTRS: [(&str, &str); 0] = [];

/// Host `<div>` holding `<x/><y/><z/>`, turned into a view root
fn xyz() -> (TreeView<DomTree>, fos_dom::NodeId, NodeId) {
    let mut dom = DomTree::new();
    let div = dom.create_element("div");
    for name in ["x", "y", "z"] {
        let child = dom.create_element(name);
        dom.append_child(div, child).unwrap();
    }
    dom.append_child(dom.root(), div).unwrap();

    let mut view = TreeView::new(dom);
    let root = view.create_root(div, "main").unwrap();
    assert!(view.render().unwrap().is_empty());
    (view, div, root)
}

fn tag_names(dom: &DomTree, parent: fos_dom::NodeId) -> Vec<String> {
    dom.child_ids(parent)
        .into_iter()
        .map(|id| match dom.tag_name(id) {
            Some(name) => name.to_string(),
            None => format!("#{}", dom.text(id).unwrap_or_default()),
        })
        .collect()
}

// ============================================================================
// CHILD LISTS
// ============================================================================

#[test]
fn test_insert_in_middle_keeps_neighbours() {
    let (mut view, div, root) = xyz();
    let before = view.dom().child_ids(div);

    let w = view.tree_mut().create_element("w", NO_ATTRS);
    view.tree_mut().insert_children(root, 2, w).unwrap();
    let stats = view.render().unwrap();

    assert_eq!(stats.nodes_inserted, 1);
    assert_eq!(stats.nodes_removed, 0);
    let after = view.dom().child_ids(div);
    assert_eq!(tag_names(view.dom(), div), ["x", "y", "w", "z"]);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[1]);
    assert_eq!(after[3], before[2]);
    assert_eq!(view.corresponding_dom(w), Some(after[2]));
}

#[test]
fn test_remove_child() {
    let (mut view, div, root) = xyz();
    let before = view.dom().child_ids(div);
    let removed = view.tree_mut().remove_children(root, 1, 1).unwrap();

    let stats = view.render().unwrap();
    assert_eq!(stats.nodes_removed, 1);
    assert_eq!(stats.nodes_inserted, 0);
    assert_eq!(view.dom().child_ids(div), vec![before[0], before[2]]);
    assert_eq!(view.corresponding_dom(removed[0]), None);
}

#[test]
fn test_moved_node_is_reinserted() {
    let (mut view, div, root) = xyz();
    let before = view.dom().child_ids(div);

    let x = view.tree_mut().remove_children(root, 0, 1).unwrap();
    view.tree_mut().append_children(root, x).unwrap();
    let stats = view.render().unwrap();

    assert_eq!(tag_names(view.dom(), div), ["y", "z", "x"]);
    assert_eq!(stats.nodes_removed, 1);
    assert_eq!(stats.nodes_inserted, 1);
    let after = view.dom().child_ids(div);
    assert_eq!(after[0], before[1]);
    assert_eq!(after[1], before[2]);
    assert_ne!(after[2], before[0]);
}

#[test]
fn test_replace_all_children_with_text() {
    let (mut view, div, root) = xyz();
    view.tree_mut().remove_children(root, 0, 3).unwrap();
    view.tree_mut().append_children(root, "plain").unwrap();

    let stats = view.render().unwrap();
    assert_eq!(stats.nodes_removed, 3);
    assert_eq!(stats.nodes_inserted, 1);
    assert_eq!(tag_names(view.dom(), div), ["#plain"]);
}

#[test]
fn test_inserted_subtree_rendered_whole() {
    let (mut view, div, root) = xyz();
    let tree = view.tree_mut();
    let em = tree.create_element("em", [("title", "t")]);
    let p = tree.create_element("p", [("class", "lead")]);
    tree.append_children(em, "inner").unwrap();
    tree.append_children(p, vec![em]).unwrap();
    tree.append_children(p, "tail").unwrap();
    tree.append_children(root, p).unwrap();

    let stats = view.render().unwrap();
    assert_eq!(stats.nodes_inserted, 1);

    let dom_p = view.dom().child_ids(div)[3];
    assert_eq!(view.dom().get_attribute(dom_p, "class"), Some("lead"));
    assert_eq!(tag_names(view.dom(), dom_p), ["em", "#tail"]);
    let dom_em = view.dom().child_ids(dom_p)[0];
    assert_eq!(view.dom().get_attribute(dom_em, "title"), Some("t"));
    assert_eq!(tag_names(view.dom(), dom_em), ["#inner"]);
    assert_eq!(view.corresponding_dom(em), Some(dom_em));
}

#[test]
fn test_nested_changes_render_in_one_pass() {
    let (mut view, div, root) = xyz();
    let y = view.tree().child(root, 1).unwrap();
    view.tree_mut().append_children(y, "deep").unwrap();
    view.tree_mut().append_children(root, "shallow").unwrap();

    let stats = view.render().unwrap();
    assert_eq!(stats.nodes_inserted, 2);
    assert_eq!(tag_names(view.dom(), div), ["x", "y", "z", "#shallow"]);
    let dom_y = view.dom().child_ids(div)[1];
    assert_eq!(tag_names(view.dom(), dom_y), ["#deep"]);
}

// ============================================================================
// ATTRIBUTES AND TEXT
// ============================================================================

#[test]
fn test_attribute_symmetric_diff() {
    let mut dom = DomTree::new();
    let div = dom.create_element("div");
    dom.set_attribute(div, "a", "1").unwrap();
    dom.set_attribute(div, "b", "2").unwrap();
    dom.append_child(dom.root(), div).unwrap();

    let mut view = TreeView::new(dom);
    let root = view.create_root(div, "main").unwrap();
    view.tree_mut().remove_attribute(root, "a").unwrap();
    view.tree_mut().set_attribute(root, "b", "3").unwrap();
    view.tree_mut().set_attribute(root, "c", "4").unwrap();

    let stats = view.render().unwrap();
    assert_eq!(stats.attributes_removed, 1);
    let mut names: Vec<_> = view.dom().attributes(div).unwrap().names().collect();
    names.sort_unstable();
    assert_eq!(names, ["b", "c"]);
    assert_eq!(view.dom().get_attribute(div, "b"), Some("3"));
    assert_eq!(view.dom().get_attribute(div, "c"), Some("4"));
}

#[test]
fn test_class_and_style_serialized() {
    let (mut view, div, root) = xyz();
    let tree = view.tree_mut();
    tree.add_class(root, "a").unwrap();
    tree.add_class(root, "b").unwrap();
    tree.set_style(root, "color", "red").unwrap();
    view.render().unwrap();

    assert_eq!(view.dom().get_attribute(div, "class"), Some("a b"));
    assert_eq!(view.dom().get_attribute(div, "style"), Some("color:red;"));

    view.tree_mut().remove_class(root, "a").unwrap();
    view.tree_mut().remove_style(root, "color").unwrap();
    let stats = view.render().unwrap();
    assert_eq!(stats.attributes_removed, 1);
    assert_eq!(view.dom().get_attribute(div, "class"), Some("b"));
    assert_eq!(view.dom().get_attribute(div, "style"), None);
}

#[test]
fn test_text_change_keeps_host_node() {
    let mut dom = DomTree::new();
    let p = dom.create_element("p");
    let text = dom.create_text("foo");
    dom.append_child(p, text).unwrap();
    dom.append_child(dom.root(), p).unwrap();

    let mut view = TreeView::new(dom);
    let root = view.create_root(p, "main").unwrap();
    let view_text = view.tree().child(root, 0).unwrap();
    assert_eq!(view.corresponding_dom(view_text), Some(text));
    view.render().unwrap();

    view.tree_mut().set_text_data(view_text, "foobar").unwrap();
    let stats = view.render().unwrap();
    assert_eq!(stats.texts_updated, 1);
    assert_eq!(stats.nodes_inserted, 0);
    assert_eq!(view.dom().child_ids(p), vec![text]);
    assert_eq!(view.dom().text(text), Some("foobar"));
}

// ============================================================================
// RENDER CYCLE
// ============================================================================

#[test]
fn test_second_render_is_noop() {
    let (mut view, div, root) = xyz();
    view.tree_mut().append_children(root, "t").unwrap();
    view.tree_mut().set_attribute(root, "id", "main").unwrap();
    assert!(!view.render().unwrap().is_empty());

    let snapshot = view.dom().child_ids(div);
    assert!(view.render().unwrap().is_empty());
    assert_eq!(view.dom().child_ids(div), snapshot);
}

#[test]
fn test_render_clears_marks() {
    let (mut view, _, root) = xyz();
    view.tree_mut().set_attribute(root, "id", "main").unwrap();
    view.tree_mut().append_children(root, "t").unwrap();
    {
        let renderer = view.renderer().borrow();
        assert_eq!(renderer.marked_attributes().len(), 1);
        assert_eq!(renderer.marked_children().len(), 1);
    }

    view.render().unwrap();
    let renderer = view.renderer().borrow();
    assert!(renderer.marked_attributes().is_empty());
    assert!(renderer.marked_children().is_empty());
    assert!(renderer.marked_texts().is_empty());
}

#[test]
fn test_detached_nodes_not_marked() {
    let (mut view, _, _) = xyz();
    let loose = view.tree_mut().create_element("span", NO_ATTRS);
    view.tree_mut().set_attribute(loose, "id", "x").unwrap();
    view.tree_mut().append_children(loose, "t").unwrap();

    let renderer = view.renderer().borrow();
    assert!(renderer.marked_attributes().is_empty());
    assert!(renderer.marked_children().is_empty());
}

#[test]
fn test_multiple_roots() {
    let mut dom = DomTree::new();
    let title = dom.create_element("h1");
    let body = dom.create_element("div");
    dom.append_child(dom.root(), title).unwrap();
    dom.append_child(dom.root(), body).unwrap();

    let mut view = TreeView::new(dom);
    let title_root = view.create_root(title, "title").unwrap();
    let body_root = view.create_root(body, "main").unwrap();
    view.tree_mut().append_children(title_root, "Title").unwrap();
    view.tree_mut().append_children(body_root, "Body").unwrap();
    view.render().unwrap();

    assert_eq!(tag_names(view.dom(), title), ["#Title"]);
    assert_eq!(tag_names(view.dom(), body), ["#Body"]);
    assert_eq!(view.root("title"), Some(title_root));
}

#[test]
fn test_first_render_verifies_root() {
    let mut dom = DomTree::new();
    let p = dom.create_element("p");
    let text = dom.create_text("foo");
    dom.append_child(p, text).unwrap();

    let mut view = TreeView::new(dom);
    let root = view.create_root(p, "main").unwrap();
    assert!(view.renderer().borrow().marked_children().contains(root));

    // A text edit before the first render is folded into the child diff
    let view_text = view.tree().child(root, 0).unwrap();
    view.tree_mut().set_text_data(view_text, "bar").unwrap();
    let stats = view.render().unwrap();
    assert_eq!(stats.texts_updated, 0);
    assert_eq!(stats.nodes_removed, 1);
    assert_eq!(stats.nodes_inserted, 1);
    assert_eq!(tag_names(view.dom(), p), ["#bar"]);
}

#[test]
fn test_text_host_cannot_be_root() {
    let mut dom = DomTree::new();
    let text = dom.create_text("x");
    let mut view = TreeView::new(dom);
    let err = view.create_root(text, "main").unwrap_err();
    assert!(matches!(err, ViewError::HostNodeNotConvertible));
}

// ============================================================================
// SKIPPED AND FAILING NODES
// ============================================================================

#[test]
fn test_marked_node_losing_binding_is_skipped() {
    let (mut view, div, root) = xyz();
    let y = view.tree().child(root, 1).unwrap();
    let dom_y = view.dom().child_ids(div)[1];
    view.tree_mut().set_attribute(y, "id", "gone").unwrap();
    view.tree_mut().append_children(y, "t").unwrap();

    let renderer = view.renderer().clone();
    renderer.borrow_mut().converter_mut().unbind_dom(view.dom(), dom_y);
    assert_eq!(view.corresponding_dom(y), None);

    let stats = view.render().unwrap();
    assert!(stats.is_empty());
    assert_eq!(view.dom().get_attribute(dom_y, "id"), None);
    assert!(view.dom().child_ids(dom_y).is_empty());

    let renderer = renderer.borrow();
    assert!(renderer.marked_attributes().is_empty());
    assert!(renderer.marked_children().is_empty());
    assert!(renderer.marked_texts().is_empty());
}

#[test]
fn test_marked_node_removed_before_render() {
    let (mut view, div, root) = xyz();
    let y = view.tree().child(root, 1).unwrap();
    view.tree_mut().set_attribute(y, "id", "gone").unwrap();
    view.tree_mut().remove_children(root, 1, 1).unwrap();

    let stats = view.render().unwrap();
    assert_eq!(stats.nodes_removed, 1);
    assert_eq!(tag_names(view.dom(), div), ["x", "z"]);
    assert_eq!(view.corresponding_dom(y), None);
    let renderer = view.renderer().borrow();
    assert!(renderer.marked_attributes().is_empty());
    assert!(renderer.marked_children().is_empty());
}

/// Host whose elements reject attribute writes
struct ReadOnlyAttributes {
    inner: DomTree,
}

impl HostTree for ReadOnlyAttributes {
    type Handle = fos_dom::NodeId;
    type Error = DomError;

    fn create_element(&mut self, name: &str) -> Self::Handle {
        HostTree::create_element(&mut self.inner, name)
    }

    fn create_text(&mut self, data: &str) -> Self::Handle {
        HostTree::create_text(&mut self.inner, data)
    }

    fn tag_name(&self, node: Self::Handle) -> Option<&str> {
        HostTree::tag_name(&self.inner, node)
    }

    fn text_data(&self, node: Self::Handle) -> Option<&str> {
        HostTree::text_data(&self.inner, node)
    }

    fn set_text_data(&mut self, node: Self::Handle, data: &str) -> Result<(), DomError> {
        HostTree::set_text_data(&mut self.inner, node, data)
    }

    fn attribute_names(&self, node: Self::Handle) -> Vec<String> {
        HostTree::attribute_names(&self.inner, node)
    }

    fn get_attribute(&self, node: Self::Handle, name: &str) -> Option<&str> {
        HostTree::get_attribute(&self.inner, node, name)
    }

    fn set_attribute(&mut self, node: Self::Handle, _: &str, _: &str) -> Result<(), DomError> {
        Err(DomError::InvalidNodeType(node))
    }

    fn remove_attribute(&mut self, node: Self::Handle, name: &str) -> Result<(), DomError> {
        HostTree::remove_attribute(&mut self.inner, node, name)
    }

    fn child_nodes(&self, node: Self::Handle) -> Vec<Self::Handle> {
        HostTree::child_nodes(&self.inner, node)
    }

    fn insert_before(
        &mut self,
        parent: Self::Handle,
        child: Self::Handle,
        reference: Option<Self::Handle>,
    ) -> Result<(), DomError> {
        HostTree::insert_before(&mut self.inner, parent, child, reference)
    }

    fn remove_child(&mut self, parent: Self::Handle, child: Self::Handle) -> Result<(), DomError> {
        HostTree::remove_child(&mut self.inner, parent, child)
    }
}

#[test]
fn test_host_failure_reaches_caller() {
    let mut inner = DomTree::new();
    let div = inner.create_element("div");
    inner.append_child(inner.root(), div).unwrap();

    let mut view = TreeView::new(ReadOnlyAttributes { inner });
    let root = view.create_root(div, "main").unwrap();
    assert!(view.render().unwrap().is_empty());

    view.tree_mut().set_attribute(root, "id", "x").unwrap();
    view.tree_mut().append_children(root, "t").unwrap();
    let err = view.render().unwrap_err();
    match &err {
        ViewError::Host(source) => assert_eq!(
            source.downcast_ref::<DomError>(),
            Some(&DomError::InvalidNodeType(div))
        ),
        other => panic!("expected a host error, got {other:?}"),
    }
    assert_eq!(view.dom().inner.get_attribute(div, "id"), None);

    // Pending work is dropped with the failed pass
    {
        let renderer = view.renderer().borrow();
        assert!(renderer.marked_attributes().is_empty());
        assert!(renderer.marked_children().is_empty());
    }
    assert!(view.render().unwrap().is_empty());
}

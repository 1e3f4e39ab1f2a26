//! Change notifications
//!
//! The view tree announces every mutation to a per-tree `ChangeDispatcher`
//! before the mutation is applied, so observers see the old shape.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::{NodeId, ViewError, ViewTree};

/// Kind of view change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// Attributes, classes or styles of an element
    Attributes,
    /// Child list of an element
    Children,
    /// Data of a text node
    Text,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Attributes => "ATTRIBUTES",
            ChangeType::Children => "CHILDREN",
            ChangeType::Text => "TEXT",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATTRIBUTES" => Ok(ChangeType::Attributes),
            "CHILDREN" => Ok(ChangeType::Children),
            "TEXT" => Ok(ChangeType::Text),
            other => Err(ViewError::UnknownChangeType(other.to_string())),
        }
    }
}

/// Receives view changes
pub trait ChangeObserver {
    /// Called before `node` changes; `tree` still has the old state
    fn on_change(&mut self, tree: &ViewTree, kind: ChangeType, node: NodeId);
}

/// Fans out change notifications to registered observers
#[derive(Default)]
pub struct ChangeDispatcher {
    observers: Vec<Rc<RefCell<dyn ChangeObserver>>>,
}

impl ChangeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it is called after those registered before it
    pub fn subscribe(&mut self, observer: Rc<RefCell<dyn ChangeObserver>>) {
        self.observers.push(observer);
    }

    /// Drop a previously registered observer (compared by pointer)
    pub fn unsubscribe(&mut self, observer: &Rc<RefCell<dyn ChangeObserver>>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !Rc::ptr_eq(o, observer));
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn notify(&self, tree: &ViewTree, kind: ChangeType, node: NodeId) {
        for observer in &self.observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.on_change(tree, kind, node),
                Err(_) => tracing::warn!("Observer busy, dropped {} change of {}", kind, node),
            }
        }
    }
}

impl fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDispatcher")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// One recorded change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeType,
    pub node: NodeId,
}

/// Observer that queues every change until `take_records`
#[derive(Debug, Default)]
pub struct ChangeRecorder {
    records: Vec<ChangeRecord>,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records queued so far, in notification order
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Drain the queue
    pub fn take_records(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.records)
    }
}

impl ChangeObserver for ChangeRecorder {
    fn on_change(&mut self, _tree: &ViewTree, kind: ChangeType, node: NodeId) {
        self.records.push(ChangeRecord { kind, node });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_from_str() {
        assert_eq!("TEXT".parse::<ChangeType>().unwrap(), ChangeType::Text);
        assert_eq!("CHILDREN".parse::<ChangeType>().unwrap(), ChangeType::Children);
        assert_eq!(ChangeType::Attributes.to_string(), "ATTRIBUTES");

        let err = "FOO".parse::<ChangeType>().unwrap_err();
        assert!(matches!(err, ViewError::UnknownChangeType(ref s) if s == "FOO"));
    }

    #[test]
    fn test_dispatcher_subscribe_unsubscribe() {
        let mut tree = ViewTree::new();
        let recorder = Rc::new(RefCell::new(ChangeRecorder::new()));
        let observer: Rc<RefCell<dyn ChangeObserver>> = recorder.clone();
        tree.observe(observer.clone());

        let p = tree.create_element("p", [("id", "x")]);
        tree.set_attribute(p, "id", "y").unwrap();
        assert_eq!(
            recorder.borrow_mut().take_records(),
            vec![ChangeRecord {
                kind: ChangeType::Attributes,
                node: p
            }]
        );

        assert!(tree.dispatcher_mut().unsubscribe(&observer));
        tree.set_attribute(p, "id", "z").unwrap();
        assert!(recorder.borrow().records().is_empty());
    }
}

//! Position
//!
//! A `(parent, offset)` address in the view tree. For an element parent the
//! offset counts children; for a text parent it counts characters. Positions
//! are plain values and do not follow later mutations.

use std::cmp::Ordering;
use std::fmt;

use crate::{NodeId, ViewError, ViewResult, ViewTree};

/// Address between two children of an element or two characters of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    parent: NodeId,
    offset: usize,
}

/// Document order of two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionRelation {
    Before,
    Same,
    After,
    /// Positions in different (detached) trees
    Different,
}

impl Position {
    /// Create a position, rejecting offsets past the end of `parent`
    pub fn new(tree: &ViewTree, parent: NodeId, offset: usize) -> ViewResult<Self> {
        let length = tree.node(parent)?.length();
        if offset > length {
            return Err(ViewError::OffsetOutOfRange { offset, length });
        }
        Ok(Self { parent, offset })
    }

    /// Position known to be in range
    pub(crate) fn at(parent: NodeId, offset: usize) -> Self {
        Self { parent, offset }
    }

    /// Position just before `node`
    pub fn create_before(tree: &ViewTree, node: NodeId) -> ViewResult<Self> {
        let parent = tree.parent(node).ok_or(ViewError::NoParent(node))?;
        let offset = tree
            .child_index(parent, node)
            .ok_or(ViewError::NoParent(node))?;
        Ok(Self { parent, offset })
    }

    /// Position just after `node`
    pub fn create_after(tree: &ViewTree, node: NodeId) -> ViewResult<Self> {
        let before = Self::create_before(tree, node)?;
        Ok(Self {
            offset: before.offset + 1,
            ..before
        })
    }

    #[inline]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Same parent, different offset
    pub(crate) fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    pub fn is_at_start(&self) -> bool {
        self.offset == 0
    }

    pub fn is_at_end(&self, tree: &ViewTree) -> bool {
        self.offset == tree.length(self.parent)
    }

    /// Child just before this position (None inside text)
    pub fn node_before(&self, tree: &ViewTree) -> Option<NodeId> {
        let index = self.offset.checked_sub(1)?;
        tree.child(self.parent, index)
    }

    /// Child just after this position (None inside text)
    pub fn node_after(&self, tree: &ViewTree) -> Option<NodeId> {
        tree.child(self.parent, self.offset)
    }

    /// Child indices from the root down to this position, ending with the offset
    pub fn path(&self, tree: &ViewTree) -> Vec<usize> {
        let mut path = vec![self.offset];
        let mut current = self.parent;
        while let Some(index) = tree.index_in_parent(current) {
            path.push(index);
            current = tree.parent(current).unwrap_or(current);
        }
        path.reverse();
        path
    }

    /// Where `self` lies relative to `other` in document order
    pub fn compare(&self, tree: &ViewTree, other: &Position) -> PositionRelation {
        if self == other {
            return PositionRelation::Same;
        }
        if tree.root_of(self.parent) != tree.root_of(other.parent) {
            return PositionRelation::Different;
        }
        match self.path(tree).cmp(&other.path(tree)) {
            Ordering::Less => PositionRelation::Before,
            Ordering::Equal => PositionRelation::Same,
            Ordering::Greater => PositionRelation::After,
        }
    }

    pub fn is_before(&self, tree: &ViewTree, other: &Position) -> bool {
        self.compare(tree, other) == PositionRelation::Before
    }

    pub fn is_after(&self, tree: &ViewTree, other: &Position) -> bool {
        self.compare(tree, other) == PositionRelation::After
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.parent, self.offset)
    }
}

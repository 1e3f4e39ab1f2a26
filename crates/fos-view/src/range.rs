//! Range
//!
//! An ordered pair of positions. `start` is not required to precede `end`.

use std::fmt;

use crate::{NodeId, Position, PositionRelation, ViewResult, ViewTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range starting and ending at `position`
    pub fn collapsed(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Build `(start_parent, start_offset)..(end_parent, end_offset)`.
    /// Offsets are range-checked; their order is not.
    pub fn from_parents_and_offsets(
        tree: &ViewTree,
        start_parent: NodeId,
        start_offset: usize,
        end_parent: NodeId,
        end_offset: usize,
    ) -> ViewResult<Self> {
        Ok(Self::new(
            Position::new(tree, start_parent, start_offset)?,
            Position::new(tree, end_parent, end_offset)?,
        ))
    }

    /// Range from just before to just after `node`
    pub fn from_node(tree: &ViewTree, node: NodeId) -> ViewResult<Self> {
        Ok(Self::new(
            Position::create_before(tree, node)?,
            Position::create_after(tree, node)?,
        ))
    }

    /// Range covering everything inside `node`
    pub fn from_node_contents(tree: &ViewTree, node: NodeId) -> ViewResult<Self> {
        let end = Position::new(tree, node, tree.length(node))?;
        Ok(Self::new(end.with_offset(0), end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Collapse onto the start or the end
    pub fn collapse(&self, to_start: bool) -> Self {
        Self::collapsed(if to_start { self.start } else { self.end })
    }

    /// `position` lies strictly between `start` and `end`
    pub fn contains_position(&self, tree: &ViewTree, position: &Position) -> bool {
        position.compare(tree, &self.start) == PositionRelation::After
            && position.compare(tree, &self.end) == PositionRelation::Before
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

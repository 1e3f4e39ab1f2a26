//! Tree Walker
//!
//! Restartable, bidirectional traversal over a view tree driven by a
//! `Position`. Each step yields the item next to the current position in the
//! walking direction and moves past it.

use std::fmt;
use std::str::FromStr;

use crate::node::{NodeData, TextData};
use crate::{NodeId, Position, Range, ViewError, ViewResult, ViewTree};

/// Walking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl FromStr for Direction {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FORWARD" => Ok(Direction::Forward),
            "BACKWARD" => Ok(Direction::Backward),
            other => Err(ViewError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Forward => "FORWARD",
            Direction::Backward => "BACKWARD",
        })
    }
}

/// Walker configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeWalkerOptions {
    /// Where walking starts; defaults to the boundary edge for the direction
    pub start_position: Option<Position>,
    /// Range the walker stays within
    pub boundaries: Option<Range>,
    pub direction: Direction,
    /// Yield one TEXT step per character
    pub single_characters: bool,
    /// Do not enter elements and never yield ELEMENT_END
    pub shallow: bool,
    /// Enter elements but never yield ELEMENT_END
    pub ignore_element_end: bool,
}

impl TreeWalkerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_position(mut self, position: Position) -> Self {
        self.start_position = Some(position);
        self
    }

    pub fn with_boundaries(mut self, boundaries: Range) -> Self {
        self.boundaries = Some(boundaries);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_single_characters(mut self, single_characters: bool) -> Self {
        self.single_characters = single_characters;
        self
    }

    pub fn with_shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    pub fn with_ignore_element_end(mut self, ignore_element_end: bool) -> Self {
        self.ignore_element_end = ignore_element_end;
        self
    }
}

/// Kind of traversal step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerStepKind {
    ElementStart,
    ElementEnd,
    Text,
}

impl WalkerStepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WalkerStepKind::ElementStart => "ELEMENT_START",
            WalkerStepKind::ElementEnd => "ELEMENT_END",
            WalkerStepKind::Text => "TEXT",
        }
    }
}

impl fmt::Display for WalkerStepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slice of a text node yielded by a TEXT step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextProxy<'a> {
    /// Text node the slice comes from
    pub text_node: NodeId,
    /// Character offset of the slice in the text node
    pub offset: usize,
    pub data: &'a str,
}

/// Item a step is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeItem<'a> {
    Element(NodeId),
    Text(TextProxy<'a>),
}

impl<'a> TreeItem<'a> {
    pub fn as_element(&self) -> Option<NodeId> {
        match self {
            TreeItem::Element(id) => Some(*id),
            TreeItem::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextProxy<'a>> {
        match self {
            TreeItem::Text(proxy) => Some(proxy),
            TreeItem::Element(_) => None,
        }
    }
}

/// One traversal step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkerValue<'a> {
    pub kind: WalkerStepKind,
    pub item: TreeItem<'a>,
    /// Position before the step, in walking direction
    pub previous_position: Position,
    /// Position after the step, in walking direction
    pub next_position: Position,
    /// 1 for ELEMENT_START, character count for TEXT, None for ELEMENT_END
    pub length: Option<usize>,
}

/// Iterator over traversal steps. Never mutates the tree.
#[derive(Debug, Clone)]
pub struct TreeWalker<'a> {
    tree: &'a ViewTree,
    options: TreeWalkerOptions,
    start: Position,
    position: Position,
}

impl<'a> TreeWalker<'a> {
    /// Create a walker; needs a start position, boundaries, or both
    pub fn new(tree: &'a ViewTree, options: TreeWalkerOptions) -> ViewResult<Self> {
        let start = match (options.start_position, options.boundaries, options.direction) {
            (Some(position), _, _) => position,
            (None, Some(range), Direction::Forward) => range.start,
            (None, Some(range), Direction::Backward) => range.end,
            (None, None, _) => return Err(ViewError::NoStartPosition),
        };
        Ok(Self {
            tree,
            options,
            start,
            position: start,
        })
    }

    /// Current position
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn options(&self) -> &TreeWalkerOptions {
        &self.options
    }

    pub fn direction(&self) -> Direction {
        self.options.direction
    }

    /// Move back to where walking started
    pub fn reset(&mut self) {
        self.position = self.start;
    }

    fn boundary_start(&self) -> Option<Position> {
        self.options.boundaries.map(|range| range.start)
    }

    fn boundary_end(&self) -> Option<Position> {
        self.options.boundaries.map(|range| range.end)
    }

    fn next_forward(&mut self) -> Option<WalkerValue<'a>> {
        let tree = self.tree;
        loop {
            let position = self.position;
            let offset = position.offset();
            let parent_id = position.parent();
            let parent = tree.get(parent_id)?;

            if self.boundary_end() == Some(position) {
                return None;
            }
            if parent.parent.is_none() && offset >= parent.length() {
                return None;
            }

            match &parent.data {
                NodeData::Text(text) => {
                    if offset >= text.len() {
                        self.position = Position::create_after(tree, parent_id).ok()?;
                        continue;
                    }
                    let limit = match self.boundary_end() {
                        Some(end) if end.parent() == parent_id => end.offset(),
                        _ => text.len(),
                    };
                    let end = if self.options.single_characters {
                        offset + 1
                    } else {
                        limit
                    };
                    if end <= offset {
                        return None;
                    }
                    let next = position.with_offset(end);
                    self.position = next;
                    return Some(text_value(parent_id, text, offset, end - offset, position, next));
                }
                NodeData::Element(element) => {
                    let Some(&child) = element.children().get(offset) else {
                        if self.options.shallow {
                            return None;
                        }
                        let next = Position::create_after(tree, parent_id).ok()?;
                        self.position = next;
                        if self.options.ignore_element_end {
                            continue;
                        }
                        return Some(element_value(
                            WalkerStepKind::ElementEnd,
                            parent_id,
                            position,
                            next,
                        ));
                    };

                    match &tree.get(child)?.data {
                        NodeData::Element(_) => {
                            let next = if self.options.shallow {
                                position.with_offset(offset + 1)
                            } else {
                                Position::at(child, 0)
                            };
                            self.position = next;
                            return Some(element_value(
                                WalkerStepKind::ElementStart,
                                child,
                                position,
                                next,
                            ));
                        }
                        NodeData::Text(text) => {
                            let ends_inside = self
                                .boundary_end()
                                .is_some_and(|end| end.parent() == child);
                            if self.options.single_characters || ends_inside {
                                self.position = Position::at(child, 0);
                                continue;
                            }
                            let next = position.with_offset(offset + 1);
                            self.position = next;
                            if text.is_empty() {
                                continue;
                            }
                            return Some(text_value(child, text, 0, text.len(), position, next));
                        }
                    }
                }
            }
        }
    }

    fn next_backward(&mut self) -> Option<WalkerValue<'a>> {
        let tree = self.tree;
        loop {
            let position = self.position;
            let offset = position.offset();
            let parent_id = position.parent();
            let parent = tree.get(parent_id)?;

            if self.boundary_start() == Some(position) {
                return None;
            }
            if parent.parent.is_none() && offset == 0 {
                return None;
            }

            match &parent.data {
                NodeData::Text(text) => {
                    if offset == 0 {
                        self.position = Position::create_before(tree, parent_id).ok()?;
                        continue;
                    }
                    let offset = offset.min(text.len());
                    let limit = match self.boundary_start() {
                        Some(start) if start.parent() == parent_id => start.offset(),
                        _ => 0,
                    };
                    let start = if self.options.single_characters {
                        offset - 1
                    } else {
                        limit
                    };
                    if start >= offset {
                        return None;
                    }
                    let next = position.with_offset(start);
                    self.position = next;
                    return Some(text_value(parent_id, text, start, offset - start, position, next));
                }
                NodeData::Element(element) => {
                    if offset == 0 {
                        if self.options.shallow {
                            return None;
                        }
                        let next = Position::create_before(tree, parent_id).ok()?;
                        self.position = next;
                        return Some(element_value(
                            WalkerStepKind::ElementStart,
                            parent_id,
                            position,
                            next,
                        ));
                    }

                    let child = *element.children().get(offset - 1)?;
                    match &tree.get(child)?.data {
                        NodeData::Element(inner) => {
                            if self.options.shallow {
                                let next = position.with_offset(offset - 1);
                                self.position = next;
                                return Some(element_value(
                                    WalkerStepKind::ElementStart,
                                    child,
                                    position,
                                    next,
                                ));
                            }
                            let next = Position::at(child, inner.children().len());
                            self.position = next;
                            if self.options.ignore_element_end {
                                continue;
                            }
                            return Some(element_value(
                                WalkerStepKind::ElementEnd,
                                child,
                                position,
                                next,
                            ));
                        }
                        NodeData::Text(text) => {
                            let starts_inside = self
                                .boundary_start()
                                .is_some_and(|start| start.parent() == child);
                            if self.options.single_characters || starts_inside {
                                self.position = Position::at(child, text.len());
                                continue;
                            }
                            let next = position.with_offset(offset - 1);
                            self.position = next;
                            // Empty texts yield nothing, as in single character mode
                            if text.is_empty() {
                                continue;
                            }
                            return Some(text_value(child, text, 0, text.len(), position, next));
                        }
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for TreeWalker<'a> {
    type Item = WalkerValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.options.direction {
            Direction::Forward => self.next_forward(),
            Direction::Backward => self.next_backward(),
        }
    }
}

fn element_value<'a>(
    kind: WalkerStepKind,
    element: NodeId,
    previous_position: Position,
    next_position: Position,
) -> WalkerValue<'a> {
    WalkerValue {
        kind,
        item: TreeItem::Element(element),
        previous_position,
        next_position,
        length: (kind == WalkerStepKind::ElementStart).then_some(1),
    }
}

fn text_value<'a>(
    text_node: NodeId,
    text: &'a TextData,
    offset: usize,
    length: usize,
    previous_position: Position,
    next_position: Position,
) -> WalkerValue<'a> {
    WalkerValue {
        kind: WalkerStepKind::Text,
        item: TreeItem::Text(TextProxy {
            text_node,
            offset,
            data: text.slice(offset, length),
        }),
        previous_position,
        next_position,
        length: Some(length),
    }
}

//! fOS View - editing view and DOM synchronization
//!
//! An arena-allocated, mutation-tracked view tree plus the pieces built on it:
//! - `Position`/`Range` addressing and the bidirectional `TreeWalker`
//! - the `Renderer`, which collects change notifications into dirty sets and
//!   patches a host tree (see `HostTree`) through a `Converter`
//! - `TreeView`, a session tying a view tree to a host tree

mod classlist;
mod converter;
mod diff;
mod error;
mod host;
mod node;
mod observer;
mod position;
mod range;
mod renderer;
mod style;
mod tree;
mod tree_walker;
mod view;

pub use classlist::ClassList;
pub use converter::{ConvertOptions, Converter, DomConverter};
pub use diff::{DiffAction, diff};
pub use error::{ViewError, ViewResult};
pub use host::HostTree;
pub use node::{ElementData, Node, NodeData, TextData};
pub use observer::{ChangeDispatcher, ChangeObserver, ChangeRecord, ChangeRecorder, ChangeType};
pub use position::{Position, PositionRelation};
pub use range::Range;
pub use renderer::{DirtySet, RenderStats, Renderer};
pub use style::StyleMap;
pub use tree::{NodeSource, ViewTree};
pub use tree_walker::{
    Direction, TextProxy, TreeItem, TreeWalker, TreeWalkerOptions, WalkerStepKind, WalkerValue,
};
pub use view::TreeView;

/// View node identifier (index into the view arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

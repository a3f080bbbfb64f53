//! Handle types for elements and loops of a network.

use std::fmt;

/// Index of a load in its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub usize);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}", self.0)
    }
}

/// Index of a source in its network.
///
/// Source ids are stable for the lifetime of the network, so they also fix
/// the order of the auxiliary unknowns of current sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Index of a loop in its network. Also the row and column of its
/// mesh current in the impedance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopId(pub usize);

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Which loops reference a branch element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Membership {
    /// Not part of any loop.
    #[default]
    Unused,
    /// Part of exactly one loop.
    Single(LoopId),
    /// Shared by two loops, lower index first.
    Shared(LoopId, LoopId),
}

impl Membership {
    /// Record one more loop. Returns `None` if that would be a third loop.
    pub fn with(self, id: LoopId) -> Option<Self> {
        match self {
            Membership::Unused => Some(Membership::Single(id)),
            Membership::Single(a) if a == id => Some(self),
            Membership::Single(a) if a < id => Some(Membership::Shared(a, id)),
            Membership::Single(a) => Some(Membership::Shared(id, a)),
            Membership::Shared(..) => None,
        }
    }

    /// The loop on the other side of a shared branch, seen from `id`.
    pub fn other(&self, id: LoopId) -> Option<LoopId> {
        match *self {
            Membership::Shared(a, b) if a == id => Some(b),
            Membership::Shared(a, b) if b == id => Some(a),
            _ => None,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Membership::Shared(..))
    }
}

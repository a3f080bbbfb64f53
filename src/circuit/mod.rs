//! Network representation and validation.
//!
//! This module provides the internal representation of a network: the
//! [`Network`] arena that owns every load and source, the [`Loop`]s that
//! reference them by id, and the topology checks run before solving.

mod mesh;
mod network;
mod types;
mod validate;

pub use mesh::Loop;
pub use network::Network;
pub use types::*;
pub use validate::validate_network;

//! Network validation.

use log::warn;

use super::types::Membership;
use super::Network;
use crate::error::{MeshworkError, Result};
use crate::solver::{SharedBranchSet, SolverConfig};

/// Validate a network for solving.
///
/// Checks:
/// - Loops are linked by shared branches (an error with
///   `require_connected`, otherwise a warning)
/// - AC sources agree on one frequency (logged)
///
/// Membership limits are checked when the shared-branch set is computed.
pub fn validate_network(network: &Network, shared: &SharedBranchSet, config: &SolverConfig) -> Result<()> {
    let groups = loop_groups(network, shared);
    if groups > 1 {
        if config.require_connected {
            return Err(MeshworkError::topology(format!(
                "loops form {} groups with no shared branch between them",
                groups
            )));
        }
        warn!("Network splits into {} independent loop groups", groups);
    }

    let mut frequencies = network
        .sources()
        .iter()
        .filter_map(|s| s.frequency().map(|f| (s, f.hertz())));
    if let Some((first, f0)) = frequencies.next() {
        for (source, f) in frequencies {
            if (f - f0).abs() > 1e-9 * f0.abs().max(1.0) {
                warn!(
                    "AC source '{}' runs at {} Hz but '{}' runs at {} Hz; phasors are combined as if at one frequency",
                    source.name, f, first.name, f0
                );
            }
        }
    }

    Ok(())
}

/// Count groups of loops connected through shared loads or sources.
fn loop_groups(network: &Network, shared: &SharedBranchSet) -> usize {
    let n = network.loops().len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for membership in shared.memberships() {
        if let Membership::Shared(a, b) = membership {
            let ra = find(&mut parent, a.0);
            let rb = find(&mut parent, b.0);
            if ra != rb {
                parent[ra] = rb;
            }
        }
    }

    (0..n).filter(|&i| find(&mut parent, i) == i).count()
}

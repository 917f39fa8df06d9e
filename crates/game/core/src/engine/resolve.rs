//! Delay resolution.
//!
//! A delayed move waits on the entity currently standing on its destination.
//! Entries are scanned in insertion order with wraparound. An entry resolves
//! once the entity it waits on is no longer waiting itself: if that entity
//! moved, the delayed move is promoted, otherwise the waiter stays put. When a
//! whole pass over the remaining entries resolves nothing, every remaining
//! entry is part of (or hangs off) a wait cycle and is dropped as deadlocked.
//!
//! Each resolution removes one entry and a stall lasts at most one pass, so
//! the scan performs at most `n * (n + 1) / 2` probes for `n` entries.

use std::collections::BTreeSet;

use crate::grid::Pos;
use crate::state::EntityId;

/// A move waiting for the occupant of its destination to leave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delay {
    pub waiting: EntityId,
    pub wait_for: EntityId,
    pub start: Pos,
    pub end: Pos,
}

/// Where every delayed entry ended up. Each input entry appears in exactly
/// one of the three lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelayResolution {
    /// Promoted to real moves, in resolution order.
    pub promoted: Vec<Delay>,
    /// Resolved, but the awaited entity stayed put or the cell was taken.
    pub cannot_move: Vec<Delay>,
    /// Left over when a full pass made no progress.
    pub deadlocked: Vec<Delay>,
    /// Number of entries examined, for diagnostics.
    pub probes: usize,
}

/// Resolves `delays` against the set of entities that already move this tick.
///
/// `moved` gains every promoted waiter, and `claimed` gains their destination
/// cells. A promotion whose destination is already claimed becomes
/// `cannot_move`.
pub fn resolve_delays(
    delays: Vec<Delay>,
    moved: &mut BTreeSet<EntityId>,
    claimed: &mut BTreeSet<Pos>,
) -> DelayResolution {
    let mut out = DelayResolution::default();
    let mut pending = delays;
    let mut is_delaying: BTreeSet<EntityId> = pending.iter().map(|d| d.waiting).collect();

    let mut index = 0;
    let mut stalled = 0;

    while !pending.is_empty() {
        if stalled >= pending.len() {
            out.deadlocked.append(&mut pending);
            break;
        }

        out.probes += 1;
        let delay = pending[index];
        if is_delaying.contains(&delay.wait_for) {
            index = (index + 1) % pending.len();
            stalled += 1;
            continue;
        }

        pending.remove(index);
        is_delaying.remove(&delay.waiting);
        if moved.contains(&delay.wait_for) && claimed.insert(delay.end) {
            moved.insert(delay.waiting);
            out.promoted.push(delay);
        } else {
            out.cannot_move.push(delay);
        }

        stalled = 0;
        if !pending.is_empty() {
            index %= pending.len();
        }
    }

    out
}

use std::collections::BTreeSet;

use super::GameEngine;
use super::ai::PathCache;
use super::resolve::Delay;
use crate::action::{Action, ProposedAction};
use crate::grid::Pos;
use crate::state::{ControllerId, EntityFlags, EntityId, HandlerId, HandlerKind};

/// A move with both ends known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct PlannedMove {
    pub entity: EntityId,
    pub start: Pos,
    pub end: Pos,
}

/// A mover held in place by a web on its own cell.
#[derive(Clone, Copy, Debug)]
pub(super) struct Stuck {
    pub planned: PlannedMove,
    pub web: HandlerId,
}

/// Everything gathered while polling controllers.
#[derive(Default)]
pub(super) struct Collected {
    pub immediate: Vec<PlannedMove>,
    pub delays: Vec<Delay>,
    pub blocked: Vec<PlannedMove>,
    pub stuck: Vec<Stuck>,
    /// Non-move actions, collection order.
    pub actions: Vec<ProposedAction>,
    /// Entities whose move is settled as happening.
    pub moved: BTreeSet<EntityId>,
    /// Destination cells already taken this tick.
    pub claimed: BTreeSet<Pos>,
    movers: BTreeSet<EntityId>,
}

impl GameEngine<'_> {
    pub(super) fn collect(&mut self) -> Collected {
        let mut out = Collected::default();
        let mut paths = PathCache::default();

        let ids: Vec<ControllerId> = self.state.controllers().iter().map(|c| c.id).collect();
        for id in ids {
            let Some(kind) = self.state.controller(id).map(|c| c.kind.clone()) else {
                continue;
            };
            let (kind, proposals) = self.propose(kind, &mut paths);
            if let Some(controller) = self.state.controller_mut(id) {
                controller.kind = kind;
            }
            for proposal in proposals {
                self.classify(proposal, &mut out);
            }
        }

        tracing::trace!(
            immediate = out.immediate.len(),
            delayed = out.delays.len(),
            blocked = out.blocked.len() + out.stuck.len(),
            actions = out.actions.len(),
            "collected proposals"
        );
        out
    }

    /// Sorts a proposal into immediate move, delayed move, blocked move or
    /// plain action.
    ///
    /// Explicit `DelayMove` proposals are classified like ordinary moves:
    /// whether to wait, and on whom, follows from who stands on the
    /// destination.
    fn classify(&self, proposal: ProposedAction, out: &mut Collected) {
        let ProposedAction { entity, action } = proposal;
        let (start, end) = match action {
            Action::Move { start, end } | Action::DelayMove { start, end, .. } => (start, end),
            Action::None => return,
            _ => {
                out.actions.push(proposal);
                return;
            }
        };
        if !out.movers.insert(entity) {
            return;
        }
        let Some(mover) = self.state.entity(entity) else {
            return;
        };
        debug_assert_eq!(mover.pos, start, "move must start at the mover's cell");
        debug_assert!(start.is_adjacent(end), "moves are single steps");

        let movement = mover.movement_type;
        let planned = PlannedMove { entity, start, end };

        if !mover.flags.contains(EntityFlags::WEB_WALKER) {
            if let Some(web) = self.web_at(start, entity) {
                out.stuck.push(Stuck { planned, web });
                return;
            }
        }

        if self.entry_prevented(end)
            || !self.state.tile_at(end).is_passable(movement)
            || out.claimed.contains(&end)
        {
            out.blocked.push(planned);
            return;
        }

        match self.state.blocker_at(end, movement) {
            Some(blocker) if self.state.is_controlled(blocker.id) => {
                out.delays.push(Delay {
                    waiting: entity,
                    wait_for: blocker.id,
                    start,
                    end,
                });
            }
            Some(_) => out.blocked.push(planned),
            None => {
                out.claimed.insert(end);
                out.moved.insert(entity);
                out.immediate.push(planned);
            }
        }
    }

    /// A web holding whoever stands at `pos`, other than its own owner.
    fn web_at(&self, pos: Pos, mover: EntityId) -> Option<HandlerId> {
        self.state
            .handlers()
            .iter()
            .find(|h| {
                matches!(h.kind, HandlerKind::PreventExit { pos: p } if p == pos)
                    && h.owner != Some(mover)
            })
            .map(|h| h.id)
    }

    fn entry_prevented(&self, pos: Pos) -> bool {
        self.state
            .handlers()
            .iter()
            .any(|h| matches!(h.kind, HandlerKind::PreventEnter { pos: p } if p == pos))
    }
}

use super::collect::{Collected, PlannedMove};
use super::resolve::{Delay, DelayResolution};
use super::{GameEngine, MoveReport};
use crate::action::{Action, ProposedAction};
use crate::event::Event;
use crate::state::{Appearance, BlockMask, DefaultAction, EntityFlags, EntityId};

impl From<Delay> for PlannedMove {
    fn from(delay: Delay) -> Self {
        Self {
            entity: delay.waiting,
            start: delay.start,
            end: delay.end,
        }
    }
}

impl GameEngine<'_> {
    /// Applies the settled moves, reports the movers that stayed, runs the
    /// remaining actions and refreshes the player's field of vision.
    pub(super) fn commit(&mut self, mut collected: Collected, resolution: DelayResolution) -> MoveReport {
        let mut report = MoveReport::default();
        self.reserved = std::mem::take(&mut collected.claimed);

        for mv in collected.immediate {
            self.apply_move(mv);
            report.moved.push(mv.entity);
        }
        for delay in resolution.promoted {
            self.apply_move(delay.into());
            report.promoted.push(delay.waiting);
        }

        for stuck in collected.stuck {
            let mv = stuck.planned;
            self.emit(Event::Stuck {
                entity: mv.entity,
                pos: mv.start,
            });
            // The web tears once it has caught something.
            if let Some(web) = self.state.remove_handler(stuck.web) {
                if let Some(owner) = web.owner {
                    self.state.remove_entity(owner);
                }
            }
            report.blocked.push(mv.entity);
        }
        for mv in collected.blocked {
            self.emit_blocked(mv);
            report.blocked.push(mv.entity);
        }
        for delay in resolution.cannot_move {
            self.emit_blocked(delay.into());
            report.cannot_move.push(delay.waiting);
        }
        for delay in resolution.deadlocked {
            self.emit_blocked(delay.into());
            report.deadlocked.push(delay.waiting);
        }

        for action in collected.actions {
            self.perform(action);
        }

        if self.state.update_fov() {
            self.emit(Event::FieldOfVisionChanged);
        }
        report
    }

    fn emit_blocked(&mut self, mv: PlannedMove) {
        self.emit(Event::MoveBlocked {
            entity: mv.entity,
            start: mv.start,
            end: mv.end,
        });
    }

    /// Runs a non-move action. Actors that died earlier in the tick do nothing.
    fn perform(&mut self, proposal: ProposedAction) {
        let ProposedAction { entity, action } = proposal;
        if !self.state.entity(entity).is_some_and(|e| e.is_alive()) {
            return;
        }
        match action {
            Action::None | Action::Move { .. } | Action::DelayMove { .. } => {}
            Action::BumpAttack { target } => self.bump_attack(entity, target, false),
            Action::BumpAttackPoison { target } => self.bump_attack(entity, target, true),
            Action::OpenDoor { door } => self.open_door(entity, door),
            Action::Heal { target, amount } => {
                let Some(patient) = self.state.entity_mut(target).filter(|e| e.is_alive()) else {
                    return;
                };
                patient.hit_points = (patient.hit_points + amount).min(patient.max_hit_points);
                self.emit(Event::Heal {
                    healer: entity,
                    target,
                    amount,
                });
            }
            Action::ShootWeb { target } => {
                self.state.spawn_web(target, self.rng);
                self.emit(Event::ShootWeb {
                    shooter: entity,
                    target,
                });
            }
            Action::PlayCard { card } => {
                if self.state.cards.play(card) {
                    self.emit(Event::PlayCard { card });
                }
            }
            Action::SetInvisible { invisible } => {
                let Some(me) = self.state.entity_mut(entity) else {
                    return;
                };
                me.flags.set(EntityFlags::INVISIBLE, invisible);
                self.emit(if invisible {
                    Event::TurnInvisible { entity }
                } else {
                    Event::TurnVisible { entity }
                });
            }
        }
    }

    /// Swing at an adjacent target. A target that moved away is missed.
    fn bump_attack(&mut self, attacker: EntityId, target: EntityId, poison: bool) {
        let (Some(from), Some(to)) = (
            self.state.entity(attacker).map(|e| e.pos),
            self.state
                .entity(target)
                .filter(|e| e.is_alive())
                .map(|e| e.pos),
        ) else {
            return;
        };
        if !from.is_adjacent(to) {
            return;
        }
        self.emit(Event::BumpAttack { attacker, target });
        self.damage(target, self.config.combat.bump_damage, attacker);

        if poison && target.is_player() && self.state.player_alive() {
            let card = self.state.cards.add_to_discard(Appearance::CardPoison);
            self.emit(Event::Poisoned { entity: target });
            self.emit(Event::AddCardToDiscard {
                card: card.id,
                appearance: card.appearance,
            });
        }
    }

    fn open_door(&mut self, opener: EntityId, door: EntityId) {
        let Some(from) = self.state.entity(opener).map(|e| e.pos) else {
            return;
        };
        let Some(entity) = self.state.entity_mut(door) else {
            return;
        };
        if !from.is_adjacent(entity.pos) || entity.default_action != DefaultAction::OpenDoor {
            return;
        }
        entity.appearance = Appearance::DoorOpen;
        entity.flags.remove(EntityFlags::BLOCKS_VISION);
        entity.block_mask = BlockMask::empty();
        entity.default_action = DefaultAction::None;
        self.emit(Event::DoorOpened { door, by: opener });
    }
}

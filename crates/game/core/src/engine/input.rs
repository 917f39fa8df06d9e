//! Commands arriving from outside the simulation between ticks.

use crate::action::Action;
use crate::error::{ActionError, ErrorContext};
use crate::event::Event;
use crate::grid::Pos;
use crate::rng::GameRng;
use crate::state::{ControllerKind, Draw, EntityId, GameState};

impl GameState {
    /// Validates and queues an action for a player-controlled entity. It runs
    /// on the next tick; a later submission replaces an earlier one.
    ///
    /// Move starts are normalised to the entity's current cell.
    pub fn submit_action(&mut self, entity: EntityId, action: Action) -> Result<(), ActionError> {
        let actor = self
            .entity(entity)
            .ok_or(ActionError::UnknownEntity(entity))?;
        let context = ErrorContext::new(self.turn())
            .with_actor(entity)
            .with_position(actor.pos);
        let from = actor.pos;

        let driven_by_player = self
            .controller_of(entity)
            .is_some_and(|c| matches!(c.kind, ControllerKind::Player { .. }));
        if !driven_by_player {
            return Err(ActionError::NotPlayerControlled { actor: entity });
        }
        if !actor.is_alive() {
            return Err(ActionError::PlayerDead { context });
        }

        let action = match action {
            Action::Move { end, .. } => {
                self.require_adjacent(from, end, &context)?;
                require_interior(end, &context)?;
                Action::Move { start: from, end }
            }
            Action::DelayMove { end, wait_for, .. } => {
                self.require_adjacent(from, end, &context)?;
                require_interior(end, &context)?;
                Action::DelayMove {
                    start: from,
                    end,
                    wait_for,
                }
            }
            Action::BumpAttack { target: other }
            | Action::BumpAttackPoison { target: other }
            | Action::OpenDoor { door: other } => {
                let to = self
                    .entity(other)
                    .ok_or(ActionError::UnknownEntity(other))?
                    .pos;
                self.require_adjacent(from, to, &context)?;
                action
            }
            Action::Heal { target, .. } => {
                self.entity(target)
                    .ok_or(ActionError::UnknownEntity(target))?;
                action
            }
            Action::ShootWeb { target } => {
                require_interior(target, &context)?;
                action
            }
            Action::None
            | Action::PlayCard { .. }
            | Action::SetInvisible { .. } => action,
        };

        tracing::debug!(%entity, kind = %action.kind(), "queued player action");
        self.set_pending_action(entity, action);
        Ok(())
    }

    fn require_adjacent(&self, from: Pos, target: Pos, context: &ErrorContext) -> Result<(), ActionError> {
        if from.is_adjacent(target) {
            Ok(())
        } else {
            Err(ActionError::NotAdjacent {
                from,
                target,
                context: context.clone(),
            })
        }
    }

    /// Draws up to `count` cards into the player's hand.
    pub fn draw_cards(&mut self, count: usize, rng: &mut GameRng) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..count {
            match self.cards.draw(rng) {
                Draw::Drawn(card) => events.push(Event::DrawCard { card: card.id }),
                Draw::ShuffledThenDrawn(card) => {
                    events.push(Event::ShuffleDiscardToDeck);
                    events.push(Event::DrawCard { card: card.id });
                }
                Draw::Exhausted => break,
            }
        }
        events
    }

    /// Moves the hand and the cards in play to the discard pile.
    pub fn discard_hand(&mut self) -> Vec<Event> {
        let count = self.cards.discard_hand();
        vec![Event::DiscardHand { count }]
    }
}

/// The outermost ring of the grid is never walkable.
fn require_interior(target: Pos, context: &ErrorContext) -> Result<(), ActionError> {
    if target.is_interior() {
        Ok(())
    } else {
        Err(ActionError::OutOfBounds {
            target,
            context: context.clone(),
        })
    }
}

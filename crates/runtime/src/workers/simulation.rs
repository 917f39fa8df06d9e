//! Simulation worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs ticks
//! through [`game_core::GameEngine`], and publishes what they changed to the
//! [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use game_core::{
    Action, EntityId, FieldOfVision, GameConfig, GameEngine, GameError, GameRng, GameState,
};

use crate::api::{Result, TickSummary};
use crate::events::{Event, EventBus, GameStateEvent, TurnEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Queue the player's action for the next tick.
    SubmitAction {
        action: Action,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Run one full tick.
    Step { reply: oneshot::Sender<TickSummary> },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Query the player's field of vision.
    QueryFov {
        reply: oneshot::Sender<FieldOfVision>,
    },
    /// Stop after answering every command sent before this one.
    Shutdown,
}

/// Background task that processes gameplay commands.
///
/// The worker is the only owner of the world. Commands are handled strictly
/// in arrival order, so a step always sees every action submitted before it.
pub struct SimulationWorker {
    state: GameState,
    config: GameConfig,
    rng: GameRng,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        state: GameState,
        config: GameConfig,
        rng: GameRng,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            entities = state.entities().len(),
            controllers = state.controllers().len(),
            handlers = state.handlers().len(),
            turn = state.turn(),
            "simulation worker initialized"
        );

        Self {
            state,
            config,
            rng,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends on [`Command::Shutdown`] or when every handle
    /// has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }
        debug!(turn = self.state.turn(), "simulation worker stopped");
    }

    /// Returns false once the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::SubmitAction { action, reply } => {
                let result = self.submit_player_action(action);
                if reply.send(result).is_err() {
                    debug!("SubmitAction reply channel closed (caller dropped)");
                }
            }
            Command::Step { reply } => {
                let summary = self.step();
                if reply.send(summary).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::QueryFov { reply } => {
                if reply.send(self.state.field_of_vision().clone()).is_err() {
                    debug!("QueryFov reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn submit_player_action(&mut self, action: Action) -> Result<()> {
        let turn = self.state.turn();
        match self.state.submit_action(EntityId::PLAYER, action) {
            Ok(()) => {
                debug!(target: "runtime::worker", %turn, kind = %action.kind(), "player action queued");
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionQueued { turn, action }));
                Ok(())
            }
            Err(error) => {
                debug!(
                    target: "runtime::worker",
                    %turn,
                    ?action,
                    code = error.error_code(),
                    error = %error,
                    "player action rejected"
                );
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionRejected {
                        turn,
                        action,
                        code: error.error_code().to_owned(),
                        error: error.to_string(),
                    }));
                Err(error.into())
            }
        }
    }

    fn step(&mut self) -> TickSummary {
        let outcome = GameEngine::new(&mut self.state, &self.config, &mut self.rng).tick();
        let turn = outcome.turn;

        for event in &outcome.events {
            self.event_bus
                .publish(Event::GameState(GameStateEvent::Applied {
                    turn,
                    event: *event,
                }));
        }
        self.event_bus.publish(Event::Turn(TurnEvent {
            turn,
            phase: outcome.phase,
            moves: outcome.moves.clone(),
            player_alive: self.state.player_alive(),
        }));

        debug!(
            target: "runtime::worker",
            turn,
            events = outcome.events.len(),
            moved = outcome.moves.all_moved().count(),
            stayed = outcome.moves.all_stayed().count(),
            "tick committed"
        );

        TickSummary::from(outcome)
    }
}

//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the simulation or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Action, FieldOfVision, GameState, MoveReport, TickOutcome, TurnPhase};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// What one tick did, as reported back to the caller that stepped it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickSummary {
    pub turn: u64,
    pub phase: TurnPhase,
    pub events: Vec<game_core::Event>,
    pub moves: MoveReport,
}

impl From<TickOutcome> for TickSummary {
    fn from(outcome: TickOutcome) -> Self {
        Self {
            turn: outcome.turn,
            phase: outcome.phase,
            events: outcome.events,
            moves: outcome.moves,
        }
    }
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queue the player's action for the next tick.
    ///
    /// Invalid actions are rejected here and never reach the world.
    pub async fn submit_player_action(&self, action: Action) -> Result<()> {
        self.request(|reply| Command::SubmitAction { action, reply })
            .await?
    }

    /// Run one tick and wait for its summary.
    pub async fn step(&self) -> Result<TickSummary> {
        self.request(|reply| Command::Step { reply }).await
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Query the player's current field of vision
    pub async fn query_fov(&self) -> Result<FieldOfVision> {
        self.request(|reply| Command::QueryFov { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Player input and committed changes
    /// - `Topic::Turn` - One summary per tick
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn summaries
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Ask the worker to stop once it has answered everything sent so far.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

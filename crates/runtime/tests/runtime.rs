use game_content::build_from_ascii;
use game_core::{
    Action, ActionError, EntityId, ErrorSeverity, Event as WorldEvent, GameConfig, GameRng,
    GameState, Pos, TurnPhase,
};
use runtime::{Event, GameStateEvent, Runtime, RuntimeConfig, RuntimeError, Topic};

fn corridor() -> GameState {
    build_from_ascii(
        &GameConfig::default(),
        &mut GameRng::new(1),
        "#######\n#@....#\n#######",
    )
}

async fn corridor_runtime() -> Runtime {
    Runtime::builder()
        .initial_state(corridor())
        .build()
        .await
        .expect("runtime should start")
}

fn step_east(from: Pos) -> Action {
    Action::Move {
        start: from,
        end: Pos::new(from.x + 1, from.y),
    }
}

#[tokio::test]
async fn submitted_move_runs_on_the_next_step() {
    let runtime = corridor_runtime().await;
    let handle = runtime.handle();
    let start = handle.query_state().await.unwrap().player().pos;
    assert_eq!(start, Pos::new(2, 2));

    handle.submit_player_action(step_east(start)).await.unwrap();
    let summary = handle.step().await.unwrap();

    assert_eq!(summary.phase, TurnPhase::Committed);
    assert_eq!(summary.moves.moved, vec![EntityId::PLAYER]);
    assert!(summary.events.iter().any(|e| matches!(
        e,
        WorldEvent::Move { entity, end, .. } if *entity == EntityId::PLAYER && *end == Pos::new(3, 2)
    )));
    assert_eq!(
        handle.query_state().await.unwrap().player().pos,
        Pos::new(3, 2)
    );
    assert!(handle.query_fov().await.unwrap().is_visible(Pos::new(3, 2)));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn events_are_published_per_topic() {
    let runtime = corridor_runtime().await;
    let handle = runtime.handle();
    let mut game = handle.subscribe(Topic::GameState);
    let mut turns = runtime.subscribe(Topic::Turn);

    let action = step_east(Pos::new(2, 2));
    handle.submit_player_action(action).await.unwrap();
    let summary = runtime.step().await.unwrap();

    match game.recv().await.unwrap() {
        Event::GameState(GameStateEvent::ActionQueued { action: queued, .. }) => {
            assert_eq!(queued, action)
        }
        other => panic!("expected the queued action first, got {other:?}"),
    }
    let mut applied = Vec::new();
    while let Ok(Event::GameState(GameStateEvent::Applied { turn, event })) = game.try_recv() {
        assert_eq!(turn, summary.turn);
        applied.push(event);
    }
    assert_eq!(applied, summary.events);

    match turns.recv().await.unwrap() {
        Event::Turn(turn) => {
            assert_eq!(turn.turn, summary.turn);
            assert_eq!(turn.moves, summary.moves);
            assert!(turn.player_alive);
        }
        other => panic!("expected a turn summary, got {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_actions_are_rejected_and_announced() {
    let runtime = corridor_runtime().await;
    let handle = runtime.handle();
    let mut game = handle.subscribe(Topic::GameState);

    let far = Action::Move {
        start: Pos::new(2, 2),
        end: Pos::new(5, 2),
    };
    let err = handle.submit_player_action(far).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::InvalidAction(ActionError::NotAdjacent { .. })
    ));
    assert_eq!(err.severity(), ErrorSeverity::Validation);

    match game.recv().await.unwrap() {
        Event::GameState(GameStateEvent::ActionRejected { code, action, .. }) => {
            assert_eq!(code, "ACTION_NOT_ADJACENT");
            assert_eq!(action, far);
        }
        other => panic!("expected a rejection, got {other:?}"),
    }

    // nothing was queued, so the player stays put
    let summary = handle.step().await.unwrap();
    assert!(summary.moves.moved.is_empty());
    assert_eq!(
        handle.query_state().await.unwrap().player().pos,
        Pos::new(2, 2)
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn ticks_are_numbered_consecutively() {
    let runtime = corridor_runtime().await;
    let first = runtime.step().await.unwrap().turn;
    let second = runtime.step().await.unwrap().turn;
    assert_eq!(second, first + 1);
    assert_eq!(runtime.handle().query_state().await.unwrap().turn(), second);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_levels_are_refused() {
    let result = Runtime::from_level("no_such_level", RuntimeConfig::default()).await;
    assert!(matches!(
        result,
        Err(RuntimeError::UnknownLevel { ref name }) if name == "no_such_level"
    ));
}

#[tokio::test]
async fn same_seed_replays_the_same_game() {
    async fn play(seed: u64) -> Vec<runtime::TickSummary> {
        let config = RuntimeConfig {
            seed,
            ..RuntimeConfig::default()
        };
        let runtime = Runtime::from_level("default", config).await.unwrap();
        let mut summaries = Vec::new();
        for _ in 0..8 {
            summaries.push(runtime.step().await.unwrap());
        }
        runtime.shutdown().await.unwrap();
        summaries
    }

    assert_eq!(play(7).await, play(7).await);
}

#[tokio::test]
async fn registered_levels_start_with_the_player_in_view() {
    let runtime = Runtime::from_level("lich_test", RuntimeConfig::default())
        .await
        .unwrap();
    let handle = runtime.handle();
    let state = handle.query_state().await.unwrap();
    let fov = handle.query_fov().await.unwrap();
    assert!(fov.is_visible(state.player().pos));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn handles_fail_cleanly_after_shutdown() {
    let runtime = corridor_runtime().await;
    let handle = runtime.handle();
    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.step().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
    assert!(matches!(
        handle.submit_player_action(Action::None).await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

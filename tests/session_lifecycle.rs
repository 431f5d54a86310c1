//! Store lifetimes: QR token expiry and inactivity eviction.

mod common;

use std::time::Duration;

use tokio::time;

use common::{single_choice, World};
use live_quiz::adapters::{SessionStoreConfig, SessionSweeper, SweeperConfig};
use live_quiz::application::{
    GameCommand, GameCommandOutput, GetGameStateQuery, IssueQrTokenCommand, ResolveQrTokenQuery,
};
use live_quiz::domain::game::{GameError, GameState, QrToken, SessionPin};
use live_quiz::ports::SessionStore;

async fn let_background_run() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

async fn resolve(world: &World, token: &QrToken) -> Result<SessionPin, GameError> {
    world
        .bus
        .dispatch(
            GameCommand::ResolveQrToken(ResolveQrTokenQuery {
                token: token.clone(),
            }),
            &world.metadata(),
        )
        .await
        .map(|output| match output {
            GameCommandOutput::QrTokenResolved(resolved) => resolved.pin,
            other => panic!("unexpected output {:?}", other),
        })
}

async fn state(world: &World, pin: &SessionPin) -> Result<GameState, GameError> {
    world
        .bus
        .dispatch(
            GameCommand::GetGameState(GetGameStateQuery { pin: pin.clone() }),
            &world.metadata(),
        )
        .await
        .map(|output| match output {
            GameCommandOutput::State(view) => view.state,
            other => panic!("unexpected output {:?}", other),
        })
}

#[tokio::test(start_paused = true)]
async fn qr_token_resolves_before_ttl_and_not_after() {
    let world = World::new(vec![single_choice("Capital of France?", 1000, 20)]).await;
    let game = world.create().await;

    time::advance(Duration::from_secs(9 * 60)).await;
    assert_eq!(resolve(&world, &game.qr_token).await.unwrap(), game.pin);

    time::advance(Duration::from_secs(60)).await;
    assert!(matches!(
        resolve(&world, &game.qr_token).await,
        Err(GameError::NotFound { .. })
    ));

    // The session outlives its first token.
    assert_eq!(state(&world, &game.pin).await.unwrap(), GameState::Lobby);
}

#[tokio::test(start_paused = true)]
async fn reissued_token_starts_a_fresh_ttl() {
    let world = World::new(vec![single_choice("Capital of France?", 1000, 20)]).await;
    let game = world.create().await;

    time::advance(Duration::from_secs(8 * 60)).await;
    let GameCommandOutput::QrTokenIssued(fresh) = world
        .bus
        .dispatch(
            GameCommand::IssueQrToken(IssueQrTokenCommand {
                pin: game.pin.clone(),
                host_id: world.host.clone(),
            }),
            &world.metadata(),
        )
        .await
        .unwrap()
    else {
        panic!("expected a token");
    };

    time::advance(Duration::from_secs(5 * 60)).await;
    assert!(resolve(&world, &game.qr_token).await.is_err());
    assert_eq!(resolve(&world, &fresh).await.unwrap(), game.pin);
}

#[tokio::test(start_paused = true)]
async fn sweeper_evicts_idle_games_and_frees_their_pins() {
    let world = World::with_store_config(
        vec![single_choice("Capital of France?", 1000, 20)],
        SessionStoreConfig {
            qr_token_ttl: Duration::from_secs(600),
            inactivity_threshold: Duration::from_secs(3600),
        },
    )
    .await;
    let idle = world.create().await;
    let busy = world.create().await;
    let sweeper = SessionSweeper::start(world.sessions.clone(), SweeperConfig::default());

    // Keep one game active every 20 minutes.
    for _ in 0..4 {
        time::advance(Duration::from_secs(20 * 60)).await;
        let_background_run().await;
        assert_eq!(state(&world, &busy.pin).await.unwrap(), GameState::Lobby);
    }

    assert!(matches!(
        state(&world, &idle.pin).await,
        Err(GameError::NotFound { .. })
    ));
    assert!(!world.pins.contains(&idle.pin).await);
    assert!(world.pins.contains(&busy.pin).await);
    assert_eq!(world.sessions.count().await.unwrap(), 1);
    // Expired tokens of both games were purged by the token sweep.
    assert_eq!(world.sessions.token_count().await, 0);

    sweeper.stop().await;
}

//! GameCommandBus - Startup-time routing table from command tags to handlers.
//!
//! The gateway layer turns each inbound message into a [`GameCommand`] and
//! hands it to [`GameCommandBus::dispatch`]. Handlers are built once here
//! from the ports, so nothing registers itself implicitly.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::foundation::CommandMetadata;
use crate::domain::game::{GameError, GameStateView, PlayerFactory, QrToken};
use crate::domain::services::PinGenerator;
use crate::ports::{
    ActivePinStore, EventPublisher, QuizRepository, SessionArchiveRepository, SessionStore,
};

use super::handlers::*;

/// Ports and limits the handlers are built from.
#[derive(Clone)]
pub struct GameServices {
    pub quizzes: Arc<dyn QuizRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub pins: Arc<dyn ActivePinStore>,
    pub archive: Arc<dyn SessionArchiveRepository>,
    pub events: Arc<dyn EventPublisher>,
    pub pin_max_attempts: u32,
    pub max_nickname_length: usize,
}

#[derive(Debug, Clone)]
pub enum GameCommand {
    CreateGame(CreateGameCommand),
    JoinGame(JoinGameCommand),
    StartGame(StartGameCommand),
    SubmitAnswer(SubmitAnswerCommand),
    SubmitSoloAnswers(SubmitSoloAnswersCommand),
    AdvancePhase(AdvancePhaseCommand),
    IssueQrToken(IssueQrTokenCommand),
    ResolveQrToken(ResolveQrTokenQuery),
    GetGameState(GetGameStateQuery),
}

impl GameCommand {
    /// Every tag the bus routes.
    pub const TAGS: [&'static str; 9] = [
        "game.create",
        "game.join",
        "game.start",
        "game.submit_answer",
        "game.submit_solo_answers",
        "game.advance_phase",
        "game.issue_qr_token",
        "game.resolve_qr_token",
        "game.get_state",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            GameCommand::CreateGame(_) => Self::TAGS[0],
            GameCommand::JoinGame(_) => Self::TAGS[1],
            GameCommand::StartGame(_) => Self::TAGS[2],
            GameCommand::SubmitAnswer(_) => Self::TAGS[3],
            GameCommand::SubmitSoloAnswers(_) => Self::TAGS[4],
            GameCommand::AdvancePhase(_) => Self::TAGS[5],
            GameCommand::IssueQrToken(_) => Self::TAGS[6],
            GameCommand::ResolveQrToken(_) => Self::TAGS[7],
            GameCommand::GetGameState(_) => Self::TAGS[8],
        }
    }
}

#[derive(Debug, Clone)]
pub enum GameCommandOutput {
    Created(CreateGameResult),
    Joined(JoinGameResult),
    Started(StartGameResult),
    AnswerRecorded(SubmitAnswerResult),
    SoloSlideClosed(SubmitSoloAnswersResult),
    Advanced(AdvancePhaseResult),
    QrTokenIssued(QrToken),
    QrTokenResolved(ResolveQrTokenResult),
    State(GameStateView),
}

pub struct GameCommandBus {
    create: CreateGameHandler,
    join: JoinGameHandler,
    start: StartGameHandler,
    submit: SubmitAnswerHandler,
    solo: SubmitSoloAnswersHandler,
    advance: AdvancePhaseHandler,
    issue_qr: IssueQrTokenHandler,
    resolve_qr: ResolveQrTokenHandler,
    state: GetGameStateHandler,
}

impl GameCommandBus {
    pub fn new(services: GameServices) -> Self {
        let GameServices {
            quizzes,
            sessions,
            pins,
            archive,
            events,
            pin_max_attempts,
            max_nickname_length,
        } = services;

        Self {
            create: CreateGameHandler::new(
                quizzes.clone(),
                sessions.clone(),
                PinGenerator::new(pins, pin_max_attempts),
                events.clone(),
            ),
            join: JoinGameHandler::new(
                quizzes.clone(),
                sessions.clone(),
                PlayerFactory::new(max_nickname_length),
                events.clone(),
            ),
            start: StartGameHandler::new(quizzes.clone(), sessions.clone(), events.clone()),
            submit: SubmitAnswerHandler::new(quizzes.clone(), sessions.clone()),
            solo: SubmitSoloAnswersHandler::new(quizzes.clone(), sessions.clone(), events.clone()),
            advance: AdvancePhaseHandler::new(quizzes.clone(), sessions.clone(), archive, events),
            issue_qr: IssueQrTokenHandler::new(sessions.clone()),
            resolve_qr: ResolveQrTokenHandler::new(quizzes.clone(), sessions.clone()),
            state: GetGameStateHandler::new(quizzes, sessions),
        }
    }

    /// Routes a command to its handler.
    ///
    /// Caller-visible rejections are logged at `warn`. `Exhaustion` and
    /// `Consistency` are logged at `error` and still returned to the caller.
    pub async fn dispatch(
        &self,
        command: GameCommand,
        metadata: &CommandMetadata,
    ) -> Result<GameCommandOutput, GameError> {
        let tag = command.tag();
        debug!(command = tag, trace_id = ?metadata.trace_id(), "Dispatching");

        let result = match command {
            GameCommand::CreateGame(cmd) => self
                .create
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::Created),
            GameCommand::JoinGame(cmd) => self
                .join
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::Joined),
            GameCommand::StartGame(cmd) => self
                .start
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::Started),
            GameCommand::SubmitAnswer(cmd) => self
                .submit
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::AnswerRecorded),
            GameCommand::SubmitSoloAnswers(cmd) => self
                .solo
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::SoloSlideClosed),
            GameCommand::AdvancePhase(cmd) => self
                .advance
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::Advanced),
            GameCommand::IssueQrToken(cmd) => self
                .issue_qr
                .handle(cmd, metadata)
                .await
                .map(GameCommandOutput::QrTokenIssued),
            GameCommand::ResolveQrToken(query) => self
                .resolve_qr
                .handle(query, metadata)
                .await
                .map(GameCommandOutput::QrTokenResolved),
            GameCommand::GetGameState(query) => self
                .state
                .handle(query, metadata)
                .await
                .map(GameCommandOutput::State),
        };

        if let Err(err) = &result {
            if err.is_fatal() {
                error!(command = tag, code = ?err.code(), error = %err, "Game invariant violated");
            } else {
                warn!(command = tag, code = ?err.code(), error = %err, "Command rejected");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::game::testing::Harness;
    use crate::domain::foundation::{GuestId, UserId};
    use crate::domain::game::{GameState, PlayerIdentity, SessionPin};
    use crate::domain::quiz::{QuizContent, Submission};
    use std::collections::HashSet;

    fn bus(harness: &Harness) -> GameCommandBus {
        GameCommandBus::new(GameServices {
            quizzes: harness.quizzes.clone(),
            sessions: harness.sessions.clone(),
            pins: harness.pins.clone(),
            archive: harness.archive.clone(),
            events: harness.events.clone(),
            pin_max_attempts: 20,
            max_nickname_length: 20,
        })
    }

    #[test]
    fn tags_are_unique() {
        let tags: HashSet<_> = GameCommand::TAGS.iter().collect();
        assert_eq!(tags.len(), GameCommand::TAGS.len());
    }

    #[tokio::test]
    async fn routes_a_full_single_question_game() {
        let harness = Harness::with_questions(1).await;
        let bus = bus(&harness);
        let metadata = harness.metadata();

        let GameCommandOutput::Created(created) = bus
            .dispatch(
                GameCommand::CreateGame(CreateGameCommand {
                    host_id: harness.host.clone(),
                    kahoot_id: harness.quiz.id(),
                }),
                &metadata,
            )
            .await
            .unwrap()
        else {
            panic!("expected Created");
        };
        let pin = created.pin;

        let GameCommandOutput::Joined(joined) = bus
            .dispatch(
                GameCommand::JoinGame(JoinGameCommand {
                    pin: pin.clone(),
                    identity: PlayerIdentity::Guest(GuestId::new()),
                    nickname: "Ada".into(),
                }),
                &metadata,
            )
            .await
            .unwrap()
        else {
            panic!("expected Joined");
        };

        let host_cmd = || AdvancePhaseCommand {
            pin: pin.clone(),
            host_id: harness.host.clone(),
        };
        bus.dispatch(
            GameCommand::StartGame(StartGameCommand {
                pin: pin.clone(),
                host_id: harness.host.clone(),
            }),
            &metadata,
        )
        .await
        .unwrap();
        bus.dispatch(
            GameCommand::SubmitAnswer(SubmitAnswerCommand {
                pin: pin.clone(),
                player_id: joined.player_id,
                submission: Submission::new(harness.slide_id(0), vec![0], 20_000),
            }),
            &metadata,
        )
        .await
        .unwrap();
        bus.dispatch(GameCommand::AdvancePhase(host_cmd()), &metadata)
            .await
            .unwrap();

        let GameCommandOutput::Advanced(ended) = bus
            .dispatch(GameCommand::AdvancePhase(host_cmd()), &metadata)
            .await
            .unwrap()
        else {
            panic!("expected Advanced");
        };

        assert_eq!(ended.state, GameState::End);
        assert_eq!(harness.archive.len().await, 1);
        let archived = harness.archive.get(&created.session_id).await.unwrap();
        assert_eq!(archived.players[0].score, 500);
    }

    #[tokio::test]
    async fn rejected_commands_are_returned_to_the_caller() {
        let harness = Harness::with_questions(1).await;
        let bus = bus(&harness);

        let result = bus
            .dispatch(
                GameCommand::GetGameState(GetGameStateQuery {
                    pin: SessionPin::new("123456").unwrap(),
                }),
                &harness.metadata(),
            )
            .await;
        assert!(matches!(result, Err(GameError::NotFound { .. })));

        let result = bus
            .dispatch(
                GameCommand::CreateGame(CreateGameCommand {
                    host_id: UserId::new("not-the-author").unwrap(),
                    kahoot_id: harness.quiz.id(),
                }),
                &harness.metadata(),
            )
            .await;
        assert!(matches!(result, Err(GameError::Unauthorized(_))));
    }
}

//! In-memory wiring for handler tests.

use std::sync::Arc;

use crate::adapters::{
    InMemoryArchiveRepository, InMemoryEventBus, InMemoryPinStore, InMemoryQuizRepository,
    InMemorySessionStore,
};
use crate::domain::foundation::{
    CommandMetadata, GuestId, KahootId, PlayerId, SlideId, UserId,
};
use crate::domain::game::{GameError, PlayerFactory, PlayerIdentity, SessionPin};
use crate::domain::quiz::{AnswerOption, Quiz, QuizContent, SlideKind, SlideSnapshot, Submission};
use crate::domain::services::PinGenerator;

use super::*;

pub(crate) fn question(base_points: u32, time_limit_secs: u32) -> SlideSnapshot {
    SlideSnapshot {
        id: SlideId::new(),
        position: 0,
        kind: SlideKind::SingleChoice,
        question: "Which one?".into(),
        media_id: None,
        time_limit_secs,
        base_points,
        options: vec![
            AnswerOption::text("right", true),
            AnswerOption::text("wrong", false),
            AnswerOption::text("also wrong", false),
        ],
    }
}

pub(crate) fn display() -> SlideSnapshot {
    SlideSnapshot {
        id: SlideId::new(),
        position: 0,
        kind: SlideKind::Display,
        question: "Welcome".into(),
        media_id: None,
        time_limit_secs: 5,
        base_points: 0,
        options: vec![],
    }
}

pub(crate) struct Harness {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub pins: Arc<InMemoryPinStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub archive: Arc<InMemoryArchiveRepository>,
    pub events: Arc<InMemoryEventBus>,
    pub quiz: Quiz,
    pub host: UserId,
}

impl Harness {
    pub async fn new(slides: Vec<SlideSnapshot>) -> Self {
        let host = UserId::new("host-1").unwrap();
        let quiz = Quiz::new(KahootId::new(), host.clone(), "Capitals", slides).unwrap();
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        quizzes.insert(quiz.clone()).await;
        let pins = Arc::new(InMemoryPinStore::new());
        Self {
            quizzes,
            sessions: Arc::new(InMemorySessionStore::new(pins.clone())),
            pins,
            archive: Arc::new(InMemoryArchiveRepository::new()),
            events: Arc::new(InMemoryEventBus::new()),
            quiz,
            host,
        }
    }

    /// Quiz of `count` single-choice questions worth 1000 points over 20s.
    pub async fn with_questions(count: usize) -> Self {
        Self::new((0..count).map(|_| question(1000, 20)).collect()).await
    }

    pub fn slide_id(&self, index: usize) -> SlideId {
        self.quiz.slides()[index].id
    }

    pub fn metadata(&self) -> CommandMetadata {
        CommandMetadata::test_fixture()
    }

    pub fn create_handler(&self) -> CreateGameHandler {
        CreateGameHandler::new(
            self.quizzes.clone(),
            self.sessions.clone(),
            PinGenerator::new(self.pins.clone(), 20),
            self.events.clone(),
        )
    }

    pub fn join_handler(&self) -> JoinGameHandler {
        JoinGameHandler::new(
            self.quizzes.clone(),
            self.sessions.clone(),
            PlayerFactory::default(),
            self.events.clone(),
        )
    }

    pub fn start_handler(&self) -> StartGameHandler {
        StartGameHandler::new(self.quizzes.clone(), self.sessions.clone(), self.events.clone())
    }

    pub fn submit_handler(&self) -> SubmitAnswerHandler {
        SubmitAnswerHandler::new(self.quizzes.clone(), self.sessions.clone())
    }

    pub fn advance_handler(&self) -> AdvancePhaseHandler {
        AdvancePhaseHandler::new(
            self.quizzes.clone(),
            self.sessions.clone(),
            self.archive.clone(),
            self.events.clone(),
        )
    }

    pub fn solo_handler(&self) -> SubmitSoloAnswersHandler {
        SubmitSoloAnswersHandler::new(
            self.quizzes.clone(),
            self.sessions.clone(),
            self.events.clone(),
        )
    }

    pub fn state_handler(&self) -> GetGameStateHandler {
        GetGameStateHandler::new(self.quizzes.clone(), self.sessions.clone())
    }

    pub fn issue_token_handler(&self) -> IssueQrTokenHandler {
        IssueQrTokenHandler::new(self.sessions.clone())
    }

    pub fn resolve_token_handler(&self) -> ResolveQrTokenHandler {
        ResolveQrTokenHandler::new(self.quizzes.clone(), self.sessions.clone())
    }

    pub async fn create_game(&self) -> CreateGameResult {
        self.create_handler()
            .handle(
                CreateGameCommand {
                    host_id: self.host.clone(),
                    kahoot_id: self.quiz.id(),
                },
                &self.metadata(),
            )
            .await
            .unwrap()
    }

    pub async fn join(&self, pin: &SessionPin, nickname: &str) -> PlayerId {
        self.join_handler()
            .handle(
                JoinGameCommand {
                    pin: pin.clone(),
                    identity: PlayerIdentity::Guest(GuestId::new()),
                    nickname: nickname.to_string(),
                },
                &self.metadata(),
            )
            .await
            .unwrap()
            .player_id
    }

    pub async fn start(&self, pin: &SessionPin) {
        self.start_handler()
            .handle(
                StartGameCommand {
                    pin: pin.clone(),
                    host_id: self.host.clone(),
                },
                &self.metadata(),
            )
            .await
            .unwrap();
    }

    pub async fn advance(&self, pin: &SessionPin) -> Result<AdvancePhaseResult, GameError> {
        self.advance_handler()
            .handle(
                AdvancePhaseCommand {
                    pin: pin.clone(),
                    host_id: self.host.clone(),
                },
                &self.metadata(),
            )
            .await
    }

    pub async fn submit(
        &self,
        pin: &SessionPin,
        player_id: PlayerId,
        slide_id: SlideId,
        selected: Vec<usize>,
        response_time_ms: u64,
    ) -> Result<SubmitAnswerResult, GameError> {
        self.submit_handler()
            .handle(
                SubmitAnswerCommand {
                    pin: pin.clone(),
                    player_id,
                    submission: Submission::new(slide_id, selected, response_time_ms),
                },
                &self.metadata(),
            )
            .await
    }
}

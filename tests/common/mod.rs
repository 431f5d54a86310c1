//! Shared wiring for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use live_quiz::adapters::{
    InMemoryArchiveRepository, InMemoryEventBus, InMemoryPinStore, InMemoryQuizRepository,
    InMemorySessionStore, SessionStoreConfig,
};
use live_quiz::application::{
    AdvancePhaseCommand, AdvancePhaseResult, CreateGameCommand, CreateGameResult, GameCommand,
    GameCommandBus, GameCommandOutput, GameServices, JoinGameCommand, StartGameCommand,
    SubmitAnswerCommand, SubmitAnswerResult,
};
use live_quiz::domain::foundation::{CommandMetadata, GuestId, KahootId, PlayerId, SlideId, UserId};
use live_quiz::domain::game::{GameError, PlayerIdentity, SessionPin};
use live_quiz::domain::quiz::{AnswerOption, Quiz, QuizContent, SlideKind, SlideSnapshot, Submission};

pub fn single_choice(question: &str, base_points: u32, time_limit_secs: u32) -> SlideSnapshot {
    SlideSnapshot {
        id: SlideId::new(),
        position: 0,
        kind: SlideKind::SingleChoice,
        question: question.into(),
        media_id: None,
        time_limit_secs,
        base_points,
        options: vec![
            AnswerOption::text("Paris", true),
            AnswerOption::text("Lyon", false),
            AnswerOption::text("Nice", false),
            AnswerOption::text("Lille", false),
        ],
    }
}

pub fn multiple_choice(question: &str) -> SlideSnapshot {
    SlideSnapshot {
        id: SlideId::new(),
        position: 0,
        kind: SlideKind::MultipleChoice,
        question: question.into(),
        media_id: None,
        time_limit_secs: 30,
        base_points: 1000,
        options: vec![
            AnswerOption::text("2", true),
            AnswerOption::text("4", false),
            AnswerOption::text("5", true),
        ],
    }
}

pub struct World {
    pub bus: GameCommandBus,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub pins: Arc<InMemoryPinStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub archive: Arc<InMemoryArchiveRepository>,
    pub events: Arc<InMemoryEventBus>,
    pub host: UserId,
    pub quiz: Quiz,
}

impl World {
    pub async fn new(slides: Vec<SlideSnapshot>) -> Self {
        Self::with_store_config(slides, SessionStoreConfig::default()).await
    }

    pub async fn with_store_config(slides: Vec<SlideSnapshot>, config: SessionStoreConfig) -> Self {
        let host = UserId::new("host-h").unwrap();
        let quiz = Quiz::new(KahootId::new(), host.clone(), "Geography", slides).unwrap();
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        quizzes.insert(quiz.clone()).await;

        let pins = Arc::new(InMemoryPinStore::new());
        let sessions = Arc::new(InMemorySessionStore::with_config(pins.clone(), config));
        let archive = Arc::new(InMemoryArchiveRepository::new());
        let events = Arc::new(InMemoryEventBus::new());

        let bus = GameCommandBus::new(GameServices {
            quizzes: quizzes.clone(),
            sessions: sessions.clone(),
            pins: pins.clone(),
            archive: archive.clone(),
            events: events.clone(),
            pin_max_attempts: 20,
            max_nickname_length: 20,
        });

        Self {
            bus,
            quizzes,
            pins,
            sessions,
            archive,
            events,
            host,
            quiz,
        }
    }

    pub fn slide(&self, index: usize) -> SlideId {
        self.quiz.slides()[index].id
    }

    pub fn metadata(&self) -> CommandMetadata {
        CommandMetadata::new()
            .with_correlation_id("it-correlation")
            .with_source("integration-test")
    }

    pub async fn create(&self) -> CreateGameResult {
        match self
            .bus
            .dispatch(
                GameCommand::CreateGame(CreateGameCommand {
                    host_id: self.host.clone(),
                    kahoot_id: self.quiz.id(),
                }),
                &self.metadata(),
            )
            .await
            .unwrap()
        {
            GameCommandOutput::Created(created) => created,
            other => panic!("unexpected output {:?}", other),
        }
    }

    pub async fn join(&self, pin: &SessionPin, nickname: &str) -> PlayerId {
        match self
            .bus
            .dispatch(
                GameCommand::JoinGame(JoinGameCommand {
                    pin: pin.clone(),
                    identity: PlayerIdentity::Guest(GuestId::new()),
                    nickname: nickname.into(),
                }),
                &self.metadata(),
            )
            .await
            .unwrap()
        {
            GameCommandOutput::Joined(joined) => joined.player_id,
            other => panic!("unexpected output {:?}", other),
        }
    }

    pub async fn start(&self, pin: &SessionPin) {
        self.bus
            .dispatch(
                GameCommand::StartGame(StartGameCommand {
                    pin: pin.clone(),
                    host_id: self.host.clone(),
                }),
                &self.metadata(),
            )
            .await
            .unwrap();
    }

    pub async fn answer(
        &self,
        pin: &SessionPin,
        player_id: PlayerId,
        slide_id: SlideId,
        selected: Vec<usize>,
        response_time_ms: u64,
    ) -> Result<SubmitAnswerResult, GameError> {
        self.bus
            .dispatch(
                GameCommand::SubmitAnswer(SubmitAnswerCommand {
                    pin: pin.clone(),
                    player_id,
                    submission: Submission::new(slide_id, selected, response_time_ms),
                }),
                &self.metadata(),
            )
            .await
            .map(|output| match output {
                GameCommandOutput::AnswerRecorded(result) => result,
                other => panic!("unexpected output {:?}", other),
            })
    }

    pub async fn advance(&self, pin: &SessionPin) -> Result<AdvancePhaseResult, GameError> {
        self.bus
            .dispatch(
                GameCommand::AdvancePhase(AdvancePhaseCommand {
                    pin: pin.clone(),
                    host_id: self.host.clone(),
                }),
                &self.metadata(),
            )
            .await
            .map(|output| match output {
                GameCommandOutput::Advanced(result) => result,
                other => panic!("unexpected output {:?}", other),
            })
    }
}

//! Game session aggregate.
//!
//! A session is one live game of one quiz run by one host. It owns its
//! players, the per-slide answer results and the scoreboard, and enforces
//! the phase order `Lobby → Question → Results → {Question | End}`.
//!
//! # Concurrency
//!
//! The aggregate is plain data with `&mut self` mutations. Callers
//! serialize operations on one session through the lock handed out by the
//! session store.

use std::collections::HashMap;

use crate::domain::foundation::{
    KahootId, PlayerId, SessionId, SlideId, StateMachine, Timestamp, UserId,
};

use super::{
    ArchivedSession, GameError, GameState, Player, Progress, Scoreboard, SessionPin,
    SessionPlayerAnswer, SlideResult,
};

/// Live game state for one session.
///
/// # Invariants
///
/// - `state` only moves along the transitions of [`GameState`]
/// - exactly one slide is current (`progress.current_slide_id`)
/// - a slide result never changes once its slide has been closed
/// - a player has at most one answer per slide
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    host_id: UserId,
    kahoot_id: KahootId,
    pin: SessionPin,
    state: GameState,
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
    progress: Progress,
    ranking: Scoreboard,

    /// Players in join order.
    players: Vec<Player>,

    answers: HashMap<SlideId, SlideResult>,

    /// Closed slides in the order they were played.
    closed_slides: Vec<SlideId>,

    /// Slides whose scores were already applied to players.
    scored_slides: Vec<SlideId>,
}

impl GameSession {
    pub(crate) fn new(
        id: SessionId,
        host_id: UserId,
        kahoot_id: KahootId,
        pin: SessionPin,
        progress: Progress,
    ) -> Self {
        Self {
            id,
            host_id,
            kahoot_id,
            pin,
            state: GameState::Lobby,
            started_at: Timestamp::now(),
            completed_at: None,
            progress,
            ranking: Scoreboard::empty(),
            players: Vec::new(),
            answers: HashMap::new(),
            closed_slides: Vec::new(),
            scored_slides: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn host_id(&self) -> &UserId {
        &self.host_id
    }

    pub fn kahoot_id(&self) -> KahootId {
        self.kahoot_id
    }

    pub fn pin(&self) -> &SessionPin {
        &self.pin
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn current_slide_id(&self) -> SlideId {
        self.progress.current_slide_id()
    }

    pub fn ranking(&self) -> &Scoreboard {
        &self.ranking
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id() == player_id)
    }

    /// Resolves a player id to the session's player.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the player never joined this session
    pub fn require_player(&self, player_id: &PlayerId) -> Result<&Player, GameError> {
        self.player(player_id)
            .ok_or_else(|| GameError::not_found("Player", player_id))
    }

    pub fn slide_result(&self, slide_id: &SlideId) -> Option<&SlideResult> {
        self.answers.get(slide_id)
    }

    /// Results of closed slides, in play order.
    pub fn closed_results(&self) -> impl Iterator<Item = &SlideResult> {
        self.closed_slides
            .iter()
            .filter_map(move |slide_id| self.answers.get(slide_id))
    }

    pub fn is_slide_closed(&self, slide_id: &SlideId) -> bool {
        self.closed_slides.contains(slide_id)
    }

    /// Players who have not answered the current slide yet.
    pub fn players_without_answer(&self) -> Vec<PlayerId> {
        let result = self.answers.get(&self.current_slide_id());
        self.players
            .iter()
            .map(Player::id)
            .filter(|id| result.map_or(true, |r| !r.has_answered(id)))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_host(&self, user_id: &UserId) -> bool {
        &self.host_id == user_id
    }

    /// # Errors
    ///
    /// - `Unauthorized` if `user_id` is not the host
    pub fn authorize_host(&self, user_id: &UserId) -> Result<(), GameError> {
        if self.is_host(user_id) {
            Ok(())
        } else {
            Err(GameError::unauthorized(format!(
                "user {} is not the host of session {}",
                user_id, self.pin
            )))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Phase transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens the first slide.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in the lobby
    pub fn start_session(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Lobby {
            return Err(self.invalid_transition("start"));
        }
        self.transition(GameState::Question)
    }

    /// Moves to the next phase.
    ///
    /// - `Question → Results` closes the current slide and applies its scores
    /// - `Results → Question` opens the slide progress points at
    /// - `Results → End` once progress is complete
    ///
    /// # Errors
    ///
    /// - `InvalidState` from `Lobby` or `End`
    /// - `Consistency` if progress was not moved after the last close
    pub fn advance_to_next_phase(&mut self) -> Result<GameState, GameError> {
        match self.state {
            GameState::Lobby | GameState::End => Err(self.invalid_transition("advance")),
            GameState::Question => {
                self.close_current_slide();
                self.transition(GameState::Results)?;
                Ok(self.state)
            }
            GameState::Results => {
                if self.progress.is_complete() {
                    self.transition(GameState::End)?;
                    self.completed_at = Some(Timestamp::now());
                } else if !self.is_slide_closed(&self.current_slide_id()) {
                    self.transition(GameState::Question)?;
                } else {
                    return Err(GameError::consistency(format!(
                        "slide {} is closed but progress was not advanced",
                        self.current_slide_id()
                    )));
                }
                Ok(self.state)
            }
        }
    }

    fn close_current_slide(&mut self) {
        let slide_id = self.current_slide_id();
        let result = self
            .answers
            .entry(slide_id)
            .or_insert_with(|| SlideResult::empty(slide_id))
            .clone();
        if !self.closed_slides.contains(&slide_id) {
            self.closed_slides.push(slide_id);
        }
        self.update_players_scores(&result);
        self.update_ranking();
    }

    fn transition(&mut self, target: GameState) -> Result<(), GameError> {
        self.state = self
            .state
            .transition_to(target)
            .map_err(|e| GameError::invalid_state(e.to_string()))?;
        Ok(())
    }

    fn invalid_transition(&self, action: &str) -> GameError {
        GameError::invalid_state(format!(
            "cannot {} session {} while in {}",
            action, self.pin, self.state
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a player and gives them a scoreboard row.
    ///
    /// # Errors
    ///
    /// - `InvalidState` once the game has started
    /// - `Validation` if the id, the account or guest behind the player, or the
    ///   nickname (case-insensitive) is taken
    pub fn join_player(&mut self, player: Player) -> Result<(), GameError> {
        if !self.state.accepts_players() {
            return Err(self.invalid_transition("join"));
        }
        if self.player(&player.id()).is_some() {
            return Err(GameError::validation(
                "player_id",
                format!("player {} already joined", player.id()),
            ));
        }
        if self
            .players
            .iter()
            .any(|existing| existing.identity() == player.identity())
        {
            return Err(GameError::validation(
                "identity",
                format!("{} already joined this game", player.identity()),
            ));
        }
        let folded = player.nickname().folded();
        if self
            .players
            .iter()
            .any(|existing| existing.nickname().folded() == folded)
        {
            return Err(GameError::validation(
                "nickname",
                format!("nickname '{}' is already taken", player.nickname()),
            ));
        }

        self.ranking.seed(&player);
        self.players.push(player);
        Ok(())
    }

    /// Records an evaluated answer for the current slide.
    ///
    /// # Errors
    ///
    /// - `InvalidState` outside `Question`, for a non-current slide, or a closed one
    /// - `NotFound` if the player is not in this session
    /// - `Consistency` if the answer addresses a different slide than `slide_id`
    /// - `DuplicateAnswer` if the player already answered
    pub fn add_player_answer(
        &mut self,
        slide_id: SlideId,
        answer: SessionPlayerAnswer,
    ) -> Result<(), GameError> {
        if !self.state.accepts_answers() {
            return Err(self.invalid_transition("answer in"));
        }
        if slide_id != self.current_slide_id() {
            return Err(GameError::invalid_state(format!(
                "slide {} is not the current slide",
                slide_id
            )));
        }
        if self.is_slide_closed(&slide_id) {
            return Err(GameError::invalid_state(format!(
                "slide {} is already closed",
                slide_id
            )));
        }
        self.require_player(&answer.player_id)?;

        let next = match self.answers.get(&slide_id) {
            Some(existing) => existing.with_answer(answer)?,
            None => SlideResult::empty(slide_id).with_answer(answer)?,
        };
        self.answers.insert(slide_id, next);
        Ok(())
    }

    /// Adds each answer's points to its player. A slide is applied once.
    pub fn update_players_scores(&mut self, result: &SlideResult) {
        if self.scored_slides.contains(&result.slide_id()) {
            return;
        }
        for answer in result.answers() {
            if let Some(player) = self.players.iter_mut().find(|p| p.id() == answer.player_id) {
                player.add_score(answer.score);
            }
        }
        self.scored_slides.push(result.slide_id());
    }

    /// Rebuilds the scoreboard from current scores.
    pub fn update_ranking(&mut self) {
        self.ranking = self.ranking.recompute(&self.players);
    }

    /// Points progress at the next slide.
    ///
    /// # Errors
    ///
    /// - `InvalidState` outside `Results`
    /// - `Consistency` if progress is already complete
    pub fn update_progress(&mut self, next_slide_id: SlideId) -> Result<(), GameError> {
        self.ensure_results("update progress of")?;
        if self.progress.is_complete() {
            return Err(GameError::consistency(format!(
                "session {} has no slides left to advance to",
                self.pin
            )));
        }
        self.progress.advance(next_slide_id);
        Ok(())
    }

    /// Marks every slide as played.
    ///
    /// # Errors
    ///
    /// - `InvalidState` outside `Results`
    pub fn complete_progress(&mut self) -> Result<(), GameError> {
        self.ensure_results("complete progress of")?;
        self.progress.complete();
        Ok(())
    }

    fn ensure_results(&self, action: &str) -> Result<(), GameError> {
        if self.state == GameState::Results {
            Ok(())
        } else {
            Err(self.invalid_transition(action))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completion
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks the session is fit for archival.
    ///
    /// # Errors
    ///
    /// - `Consistency` if not ended, a slide was never closed, or a result
    ///   names an unknown player
    pub fn validate_all_invariants_for_completion(&self) -> Result<(), GameError> {
        if self.state != GameState::End {
            return Err(GameError::consistency(format!(
                "session {} is in {}, not END",
                self.pin, self.state
            )));
        }
        if self.completed_at.is_none() {
            return Err(GameError::consistency("ended session has no completion time"));
        }
        if self.closed_slides.len() != self.progress.total_slides() {
            return Err(GameError::consistency(format!(
                "{} of {} slides have a final result",
                self.closed_slides.len(),
                self.progress.total_slides()
            )));
        }
        for result in self.answers.values() {
            if !self.is_slide_closed(&result.slide_id()) {
                return Err(GameError::consistency(format!(
                    "slide {} has answers but was never closed",
                    result.slide_id()
                )));
            }
            if let Some(unknown) = result.player_ids().find(|id| self.player(id).is_none()) {
                return Err(GameError::consistency(format!(
                    "slide {} holds an answer from unknown player {}",
                    result.slide_id(),
                    unknown
                )));
            }
        }
        Ok(())
    }

    /// Flattens the session for durable storage.
    pub fn to_archive(&self, last_activity: Timestamp) -> ArchivedSession {
        ArchivedSession::from_session(self, last_activity)
    }
}

//! Game command and query handlers.
//!
//! Every handler that touches a session holds its lock for the whole
//! mutation and publishes events only after releasing it.

mod advance_phase;
mod create_game;
mod get_game_state;
mod join_game;
mod qr_token;
mod start_game;
mod submit_answer;
mod submit_solo_answers;
mod support;

#[cfg(test)]
pub(crate) mod testing;

pub use advance_phase::{
    AdvanceOutcome, AdvancePhaseCommand, AdvancePhaseHandler, AdvancePhaseResult,
};
pub use create_game::{CreateGameCommand, CreateGameHandler, CreateGameResult};
pub use get_game_state::{GetGameStateHandler, GetGameStateQuery};
pub use join_game::{JoinGameCommand, JoinGameHandler, JoinGameResult};
pub use qr_token::{
    IssueQrTokenCommand, IssueQrTokenHandler, ResolveQrTokenHandler, ResolveQrTokenQuery,
    ResolveQrTokenResult,
};
pub use start_game::{StartGameCommand, StartGameHandler, StartGameResult};
pub use submit_answer::{SubmitAnswerCommand, SubmitAnswerHandler, SubmitAnswerResult};
pub use submit_solo_answers::{
    SubmitSoloAnswersCommand, SubmitSoloAnswersHandler, SubmitSoloAnswersResult,
};

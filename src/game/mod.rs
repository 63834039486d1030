//! Matches and the command surface.
//!
//! - [`Match`]: one match as a serialized state machine (lobby, rounds,
//!   scoring, terminal outcome)
//! - [`MatchRegistry`]: many matches by id, plus listener fan-out
//! - [`MatchEvent`] / [`EventEnvelope`]: what commands emit, and to whom
//! - [`MatchSnapshot`] / [`MatchView`]: persistence and viewer-scoped state
//!
//! No command suspends or performs I/O. Collaborators that do (transport,
//! storage) plug in through [`MatchListener`].

mod event;
mod match_state;
mod registry;
mod snapshot;

pub use event::{Audience, EventEnvelope, MatchEvent};
pub use match_state::{LegalMoves, Match, MatchOutcome, MatchStatus};
pub use registry::{CommandOutcome, MatchListener, MatchRegistry};
pub use snapshot::{HandView, MatchSnapshot, MatchView, ParticipantView};

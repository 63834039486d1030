//! Round scoring and match progression.
//!
//! Scoring runs in two steps:
//!
//! 1. [`resolve`] turns a [`RoundEnd`](crate::round::RoundEnd) and the final
//!    hand scores into a seat-level [`Resolution`] (domino, block or tie).
//! 2. [`apply_resolution`] pays it out: deferred points from earlier ties,
//!    award rounding, and the anti-stalling reset.
//!
//! [`match_winner`] is checked after every score change, including the
//! mid-round placement awards of the telephone variant.

mod result;
mod standings;

pub use result::{resolve, Resolution, RoundResult, WinReason};
pub use standings::{apply_resolution, credit, match_winner, Award};

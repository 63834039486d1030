//! Deck and hand utilities.
//!
//! - [`full_set`]: the 28-tile double-six set
//! - [`hand_score`] / [`should_reshuffle_hand`]: hand evaluation
//! - [`Deal`] / [`Boneyard`]: dealing with capped re-deal attempts
//!
//! Tiles are never created or destroyed after [`full_set`]: a round moves
//! them between hands, the board and the boneyard only.

mod deal;
mod set;

pub use deal::{deal_fair, deal_once, deal_with, draw_count, untouchable_count, Boneyard, Deal};
pub use set::{full_set, hand_score, should_reshuffle_hand, shuffle, FULL_SET_PIPS, FULL_SET_SIZE};

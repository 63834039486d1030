//! Match and rule configuration.
//!
//! - `Variant`: which rule set (and board engine) a match plays
//! - `MatchConfig`: table shape chosen when a match is created
//! - `RuleConfig`: numeric rules derived from the variant
//!
//! Configuration is immutable once a match exists.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Rule variant. Selected once per match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Two-ended line; points come only from opponents' hands at round end.
    BlockScoring,
    /// Branching "telephone" board; points for multiples of five on the board.
    Telephone,
}

/// Table configuration supplied to `create_match`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Rule variant.
    pub variant: Variant,

    /// Seats at the table (2-4).
    pub max_players: usize,

    /// Participants required before the start vote can pass.
    pub min_players: usize,

    /// Two teams of two (positions 0+2 vs 1+3). Four players only.
    pub team_mode: bool,

    /// Never reveal other participants' hands, even after a round ends.
    pub anonymous: bool,

    /// Fixed RNG seed. `None` draws one from the registry's stream.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            variant: Variant::BlockScoring,
            max_players: 4,
            min_players: 2,
            team_mode: false,
            anonymous: false,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Create a config for the given variant with default table shape.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Set the seat count.
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    /// Set the minimum participants needed to start.
    #[must_use]
    pub fn with_min_players(mut self, min: usize) -> Self {
        self.min_players = min;
        self
    }

    /// Enable team play.
    #[must_use]
    pub fn with_teams(mut self) -> Self {
        self.team_mode = true;
        self
    }

    /// Hide other hands permanently.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the table shape.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(2..=4).contains(&self.max_players) {
            return Err(EngineError::InvalidConfig(format!(
                "max_players must be 2-4, got {}",
                self.max_players
            )));
        }
        if self.min_players < 2 || self.min_players > self.max_players {
            return Err(EngineError::InvalidConfig(format!(
                "min_players must be 2..={}, got {}",
                self.max_players, self.min_players
            )));
        }
        if self.team_mode && (self.max_players != 4 || self.min_players != 4) {
            return Err(EngineError::InvalidConfig(
                "team mode requires exactly 4 players".to_string(),
            ));
        }
        Ok(())
    }

    /// Numeric rules for this configuration.
    #[must_use]
    pub fn rules(&self) -> RuleConfig {
        RuleConfig::for_variant(self.variant)
    }
}

/// Numeric rule parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Tiles dealt to each participant.
    pub tiles_per_player: usize,

    /// Deals tried before an unfair or stranded deal is accepted anyway.
    pub max_deal_attempts: u32,

    /// Team-mode voided openings tolerated per round before the deal stands.
    pub max_void_redeals: u32,

    /// Round wins below this margin count towards the anti-stalling penalty.
    /// Zero disables the penalty.
    pub low_win_margin: u32,

    /// Consecutive low wins that reset a side's score.
    pub low_win_limit: u32,

    /// Running total that ends the match.
    pub target_score: u32,

    /// Round awards are rounded up to a multiple of this.
    pub award_step: u32,
}

impl RuleConfig {
    /// Standard rules for a variant.
    #[must_use]
    pub const fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::BlockScoring => Self {
                tiles_per_player: 7,
                max_deal_attempts: 10,
                max_void_redeals: 10,
                low_win_margin: 13,
                low_win_limit: 3,
                target_score: 101,
                award_step: 1,
            },
            Variant::Telephone => Self {
                tiles_per_player: 7,
                max_deal_attempts: 10,
                max_void_redeals: 10,
                low_win_margin: 0,
                low_win_limit: 3,
                target_score: 365,
                award_step: 5,
            },
        }
    }

    /// `points` rounded up to the award step.
    #[must_use]
    pub const fn round_award(&self, points: u32) -> u32 {
        if self.award_step <= 1 {
            points
        } else {
            points.div_ceil(self.award_step) * self.award_step
        }
    }

    /// Whether the anti-stalling penalty applies.
    #[must_use]
    pub const fn anti_stalling(&self) -> bool {
        self.low_win_margin > 0
    }
}

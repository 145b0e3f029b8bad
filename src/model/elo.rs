use crate::model::{
    constants::{K_FACTOR, RATING_SCALE},
    error::{ProcessorError, Result},
    structures::match_outcome::MatchOutcome
};

/// The signed adjustment pair one match outcome applies to its two
/// participants. Stored on the match record so a later transition can
/// reverse it exactly, without recomputation drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingDelta {
    pub participant_1: i32,
    pub participant_2: i32
}

impl RatingDelta {
    pub const ZERO: RatingDelta = RatingDelta {
        participant_1: 0,
        participant_2: 0
    };

    /// The pair that undoes this one.
    pub fn reversed(&self) -> RatingDelta {
        RatingDelta {
            participant_1: -self.participant_1,
            participant_2: -self.participant_2
        }
    }
}

/// Pure Elo update rule: no side effects, the caller applies what it returns.
pub struct RatingLedger;

impl RatingLedger {
    /// Probability of the first rating scoring against the second, on the
    /// standard 400-point logistic curve.
    pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
        1.0 / (1.0 + 10f64.powf((opponent_rating - rating) as f64 / RATING_SCALE))
    }

    /// Computes the delta pair for an outcome with K = 32.
    ///
    /// Both deltas are derived from the same pre-update rating pair, so
    /// applying them simultaneously is order-independent. Rounding is to
    /// the nearest integer, halves away from zero (`f64::round`).
    ///
    /// `NotPlayed` carries no delta and is rejected here.
    pub fn compute_delta(rating_1: i32, rating_2: i32, outcome: MatchOutcome) -> Result<RatingDelta> {
        let (actual_1, actual_2) = outcome.scores().ok_or(ProcessorError::UnplayedOutcome)?;

        let expected_1 = Self::expected_score(rating_1, rating_2);
        let expected_2 = Self::expected_score(rating_2, rating_1);

        Ok(RatingDelta {
            participant_1: (K_FACTOR * (actual_1 - expected_1)).round() as i32,
            participant_2: (K_FACTOR * (actual_2 - expected_2)).round() as i32
        })
    }
}

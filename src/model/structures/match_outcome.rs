use crate::model::structures::participant_result::ParticipantResult;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::EnumIter;

/// Recorded result state of a match. `NotPlayed` is the initial state of
/// every match and the implicit state of a deleted one.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[repr(u8)]
pub enum MatchOutcome {
    NotPlayed = 0,
    Participant1Wins = 1,
    Participant2Wins = 2,
    Draw = 3
}

impl MatchOutcome {
    /// Actual scores for (participant 1, participant 2) as fed into the
    /// rating update. `None` when the match has not been played.
    pub fn scores(&self) -> Option<(f64, f64)> {
        match self {
            MatchOutcome::NotPlayed => None,
            MatchOutcome::Participant1Wins => Some((1.0, 0.0)),
            MatchOutcome::Participant2Wins => Some((0.0, 1.0)),
            MatchOutcome::Draw => Some((0.5, 0.5))
        }
    }

    /// Per-participant win/loss/draw effect of this outcome, or `None` for
    /// an unplayed match.
    pub fn effects(&self) -> Option<(ParticipantResult, ParticipantResult)> {
        match self {
            MatchOutcome::NotPlayed => None,
            MatchOutcome::Participant1Wins => Some((ParticipantResult::Win, ParticipantResult::Loss)),
            MatchOutcome::Participant2Wins => Some((ParticipantResult::Loss, ParticipantResult::Win)),
            MatchOutcome::Draw => Some((ParticipantResult::Draw, ParticipantResult::Draw))
        }
    }

    /// The same outcome seen with the two participants swapped.
    pub fn mirrored(&self) -> MatchOutcome {
        match self {
            MatchOutcome::Participant1Wins => MatchOutcome::Participant2Wins,
            MatchOutcome::Participant2Wins => MatchOutcome::Participant1Wins,
            other => *other
        }
    }

    pub fn is_played(&self) -> bool {
        !matches!(self, MatchOutcome::NotPlayed)
    }
}

impl TryFrom<i32> for MatchOutcome {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(MatchOutcome::NotPlayed),
            1 => Ok(MatchOutcome::Participant1Wins),
            2 => Ok(MatchOutcome::Participant2Wins),
            3 => Ok(MatchOutcome::Draw),
            _ => Err(())
        }
    }
}

use crate::model::{
    constants::{DEFAULT_PEAK_RATING, DEFAULT_RATING},
    structures::match_outcome::MatchOutcome
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<FixedOffset>,
    pub created_by: i32
}

/// One user's membership in one competition. Unique per
/// (user_id, competition_id); the rating is mutated only by the processor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i32,
    pub user_id: i32,
    pub competition_id: i32,
    pub rating: i32
}

impl Participant {
    pub fn new(id: i32, user_id: i32, competition_id: i32) -> Participant {
        Participant {
            id,
            user_id,
            competition_id,
            rating: DEFAULT_RATING
        }
    }
}

/// Aggregate counters derived from the currently recorded match outcomes.
/// Lives and dies with its participant. Invariant:
/// `matches_played == wins + losses + draws`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    pub participant_id: i32,
    pub matches_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub peak_rating: i32
}

impl ParticipantStats {
    pub fn new(participant_id: i32) -> ParticipantStats {
        ParticipantStats {
            participant_id,
            matches_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            peak_rating: DEFAULT_PEAK_RATING
        }
    }
}

/// One pairing of two distinct participants. The delta fields record the
/// exact adjustment last applied for the current outcome (both 0 while
/// `NotPlayed`), so an edit or deletion can reverse it without drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i32,
    pub competition_id: i32,
    pub participant_1_id: i32,
    pub participant_2_id: i32,
    pub outcome: MatchOutcome,
    pub played_at: DateTime<FixedOffset>,
    pub participant_1_delta: i32,
    pub participant_2_delta: i32
}

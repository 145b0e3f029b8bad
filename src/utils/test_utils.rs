use crate::{
    database::db_structs::{Competition, Match, Participant},
    model::{store::CompetitionStore, structures::match_outcome::MatchOutcome}
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn fixed_timestamp() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap().fixed_offset()
}

pub fn generate_competition(id: i32) -> Competition {
    Competition {
        id,
        name: format!("Test Competition {}", id),
        created_at: fixed_timestamp(),
        created_by: 1
    }
}

pub fn generate_participant(id: i32, user_id: i32, competition_id: i32, rating: i32) -> Participant {
    Participant {
        id,
        user_id,
        competition_id,
        rating
    }
}

pub fn generate_match(
    id: i32,
    competition_id: i32,
    participant_1_id: i32,
    participant_2_id: i32,
    outcome: MatchOutcome
) -> Match {
    Match {
        id,
        competition_id,
        participant_1_id,
        participant_2_id,
        outcome,
        played_at: fixed_timestamp(),
        participant_1_delta: 0,
        participant_2_delta: 0
    }
}

/// Store seeded with competition 1 and one participant per (id, rating)
/// entry. User ids mirror participant ids.
pub fn generate_store(participant_ratings: &[(i32, i32)]) -> CompetitionStore {
    let mut store = CompetitionStore::new();
    store.insert_competition(generate_competition(1));

    for (id, rating) in participant_ratings {
        store
            .insert_participant(generate_participant(*id, *id, 1, *rating))
            .expect("Expected test participant registration to succeed");
    }

    store
}

/// Reproducible rating spread for sequence tests.
pub fn generate_random_ratings(n: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(800..=1600)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_store() {
        let store = generate_store(&[(1, 1200), (2, 1450)]);

        assert!(store.competition(1).is_some());
        assert_eq!(store.participant(1).unwrap().rating, 1200);
        assert_eq!(store.participant(2).unwrap().rating, 1450);
        assert!(store.stats(1).is_some());
        assert!(store.stats(2).is_some());
    }

    #[test]
    fn test_random_ratings_reproducible() {
        assert_eq!(generate_random_ratings(8, 42), generate_random_ratings(8, 42));
        assert!(generate_random_ratings(8, 42).iter().all(|r| (800..=1600).contains(r)));
    }
}

mod common;

use ladder_processor::{
    database::db_structs::Participant,
    model::{
        error::ProcessorError,
        processor::MatchOutcomeProcessor,
        store::CompetitionStore,
        structures::match_outcome::MatchOutcome
    },
    utils::test_utils::{generate_competition, generate_match, generate_participant, generate_random_ratings, generate_store}
};

fn stats_invariant_holds(store: &CompetitionStore) -> bool {
    store.participants().all(|p| {
        let stats = store.stats(p.id).expect("Expected every participant to carry stats");
        stats.matches_played == stats.wins + stats.losses + stats.draws
    })
}

#[test]
fn test_season_flow() {
    common::init_test_env();

    let mut store = CompetitionStore::new();
    store.insert_competition(generate_competition(1));
    let mut processor = MatchOutcomeProcessor::new(store);

    for id in 1..=4 {
        processor
            .register_participant(generate_participant(id, id, 1, 1200))
            .unwrap();
    }

    // Round 1: two matches recorded with outcomes up front.
    processor
        .record_match(generate_match(1, 1, 1, 2, MatchOutcome::Participant1Wins))
        .unwrap();
    processor
        .record_match(generate_match(2, 1, 3, 4, MatchOutcome::Draw))
        .unwrap();

    assert_eq!(processor.store().participant(1).unwrap().rating, 1216);
    assert_eq!(processor.store().participant(2).unwrap().rating, 1184);
    assert_eq!(processor.store().participant(3).unwrap().rating, 1200);
    assert_eq!(processor.store().participant(4).unwrap().rating, 1200);

    // Round 2: winners meet, recorded unplayed then resolved.
    processor
        .record_match(generate_match(3, 1, 1, 3, MatchOutcome::NotPlayed))
        .unwrap();
    processor.update_outcome(3, MatchOutcome::Participant1Wins).unwrap();

    // 1216 vs 1200 favorite win rounds to +15.
    assert_eq!(processor.store().participant(1).unwrap().rating, 1231);
    assert_eq!(processor.store().participant(3).unwrap().rating, 1185);

    // The round 1 draw is corrected to a win for participant 4. The draw's
    // (0, 0) deltas reverse to nothing, then the win is applied against
    // participant 3's post-round-2 rating of 1185: +/-15 after rounding.
    processor.update_outcome(2, MatchOutcome::Participant2Wins).unwrap();
    assert_eq!(processor.store().participant(3).unwrap().rating, 1170);
    assert_eq!(processor.store().participant(4).unwrap().rating, 1215);

    assert!(stats_invariant_holds(processor.store()));

    let standings = processor.store().standings(1);
    let ids = standings.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 4, 2, 3]);
}

#[test]
fn test_change_winner_equals_reverse_then_apply() {
    common::init_test_env();

    let mut direct = MatchOutcomeProcessor::new(generate_store(&[(1, 1200), (2, 1200)]));
    direct
        .record_match(generate_match(1, 1, 1, 2, MatchOutcome::Participant1Wins))
        .unwrap();
    direct.update_outcome(1, MatchOutcome::Participant2Wins).unwrap();

    let mut stepped = MatchOutcomeProcessor::new(generate_store(&[(1, 1200), (2, 1200)]));
    stepped
        .record_match(generate_match(1, 1, 1, 2, MatchOutcome::Participant1Wins))
        .unwrap();
    stepped.update_outcome(1, MatchOutcome::NotPlayed).unwrap();
    stepped.update_outcome(1, MatchOutcome::Participant2Wins).unwrap();

    for id in [1, 2] {
        assert_eq!(
            direct.store().participant(id).unwrap().rating,
            stepped.store().participant(id).unwrap().rating
        );
        assert_eq!(direct.store().stats(id).unwrap(), stepped.store().stats(id).unwrap());
    }

    let direct_match = direct.store().match_by_id(1).unwrap();
    let stepped_match = stepped.store().match_by_id(1).unwrap();
    assert_eq!(direct_match.participant_1_delta, stepped_match.participant_1_delta);
    assert_eq!(direct_match.participant_2_delta, stepped_match.participant_2_delta);
}

#[test]
fn test_apply_and_revert_restores_seeded_ratings() {
    common::init_test_env();

    let ratings = generate_random_ratings(8, 42);
    let pairs = ratings
        .iter()
        .enumerate()
        .map(|(i, r)| (i as i32 + 1, *r))
        .collect::<Vec<_>>();

    let mut processor = MatchOutcomeProcessor::new(generate_store(&pairs));

    // Pair participants off, record every outcome kind, then revert all.
    let outcomes = [
        MatchOutcome::Participant1Wins,
        MatchOutcome::Participant2Wins,
        MatchOutcome::Draw,
        MatchOutcome::Participant1Wins
    ];
    for (i, outcome) in outcomes.iter().enumerate() {
        let match_id = i as i32 + 1;
        let p1 = (i as i32) * 2 + 1;
        let p2 = (i as i32) * 2 + 2;
        processor
            .record_match(generate_match(match_id, 1, p1, p2, *outcome))
            .unwrap();
    }
    assert!(stats_invariant_holds(processor.store()));

    for match_id in 1..=4 {
        processor.update_outcome(match_id, MatchOutcome::NotPlayed).unwrap();
    }

    for (id, rating) in pairs {
        assert_eq!(
            processor.store().participant(id).unwrap().rating,
            rating,
            "participant {} rating not restored",
            id
        );
        let stats = processor.store().stats(id).unwrap();
        assert_eq!((stats.matches_played, stats.wins, stats.losses, stats.draws), (0, 0, 0, 0));
    }
    assert!(stats_invariant_holds(processor.store()));
}

#[test]
fn test_delete_played_match_restores_state() {
    common::init_test_env();

    let mut processor = MatchOutcomeProcessor::new(generate_store(&[(1, 1300), (2, 1100)]));
    processor
        .record_match(generate_match(1, 1, 1, 2, MatchOutcome::Participant2Wins))
        .unwrap();

    // Upset applied; both sides moved.
    assert_ne!(processor.store().participant(1).unwrap().rating, 1300);
    assert_ne!(processor.store().participant(2).unwrap().rating, 1100);

    let removed = processor.delete_match(1).unwrap();
    assert_eq!(removed.id, 1);

    let store = processor.into_store();
    assert_eq!(store.participant(1).unwrap().rating, 1300);
    assert_eq!(store.participant(2).unwrap().rating, 1100);
    assert!(stats_invariant_holds(&store));
    assert!(store.match_by_id(1).is_none());
}

#[test]
fn test_registration_rules() {
    common::init_test_env();

    let mut processor = MatchOutcomeProcessor::new(generate_store(&[]));
    processor
        .register_participant(generate_participant(1, 10, 1, 1200))
        .unwrap();

    assert!(processor.store().stats(1).is_some());

    let duplicate = processor.register_participant(generate_participant(2, 10, 1, 1200));
    assert_eq!(
        duplicate,
        Err(ProcessorError::DuplicateParticipant {
            user_id: 10,
            competition_id: 1
        })
    );

    let orphan = processor.register_participant(generate_participant(3, 11, 99, 1200));
    assert_eq!(orphan, Err(ProcessorError::CompetitionNotFound(99)));

    // New registrations without a seeded rating start at the default.
    processor.register_participant(Participant::new(4, 12, 1)).unwrap();
    assert_eq!(processor.store().participant(4).unwrap().rating, 1200);
    assert_eq!(processor.store().stats(4).unwrap().peak_rating, 1200);
}

use crate::{
    database::db_structs::{Match, Participant},
    model::{
        elo::{RatingDelta, RatingLedger},
        error::{ProcessorError, Result},
        store::CompetitionStore,
        structures::{match_outcome::MatchOutcome, participant_result::ParticipantResult}
    }
};
use std::convert::TryFrom;
use tracing::info;

/// # Match outcome processing
///
/// Every rating-affecting write funnels through this processor. A match
/// write (create, outcome edit, delete) is treated as one transition from
/// the previously recorded outcome to the new one:
///
/// 1. The previous outcome's effect is reversed by subtracting the delta
///    pair stored on the match record, never by recomputing it.
/// 2. The new outcome's delta pair is computed from the post-reversal
///    ratings, applied to both participants, and stored on the match.
/// 3. The aggregate counters move by the signed difference between the two
///    outcomes, so each recorded result is counted exactly once.
///
/// A transition is not idempotent: callers supply the actual previous
/// outcome, and resubmitting the current outcome is detected as a no-op.
pub struct MatchOutcomeProcessor {
    store: CompetitionStore
}

impl MatchOutcomeProcessor {
    pub fn new(store: CompetitionStore) -> MatchOutcomeProcessor {
        MatchOutcomeProcessor { store }
    }

    pub fn store(&self) -> &CompetitionStore {
        &self.store
    }

    pub fn into_store(self) -> CompetitionStore {
        self.store
    }

    /// Registers a participant; the stats row is created in the same step.
    pub fn register_participant(&mut self, participant: Participant) -> Result<()> {
        let participant_id = participant.id;
        self.store.insert_participant(participant)?;

        info!(participant_id, "registered participant");
        Ok(())
    }

    /// Records a new match. A match created directly with a played outcome
    /// runs the NotPlayed -> outcome transition immediately.
    pub fn record_match(&mut self, match_: Match) -> Result<()> {
        self.validate_pairing(&match_)?;

        let match_id = match_.id;
        let outcome = match_.outcome;

        let mut inserted = match_;
        inserted.outcome = MatchOutcome::NotPlayed;
        inserted.participant_1_delta = 0;
        inserted.participant_2_delta = 0;
        self.store.insert_match(inserted)?;

        if outcome.is_played() {
            self.apply_outcome_change(match_id, MatchOutcome::NotPlayed, outcome)?;
        }

        Ok(())
    }

    /// Records or edits a match outcome. Resubmitting the currently
    /// recorded outcome leaves ratings, deltas, and stats untouched.
    pub fn update_outcome(&mut self, match_id: i32, new_outcome: MatchOutcome) -> Result<()> {
        let previous = self
            .store
            .match_by_id(match_id)
            .ok_or(ProcessorError::MatchNotFound(match_id))?
            .outcome;

        if previous == new_outcome {
            return Ok(());
        }

        self.apply_outcome_change(match_id, previous, new_outcome)
    }

    /// Like [`Self::update_outcome`], taking the raw wire value.
    pub fn update_outcome_value(&mut self, match_id: i32, value: i32) -> Result<()> {
        let outcome = MatchOutcome::try_from(value).map_err(|_| ProcessorError::UnknownOutcome(value))?;
        self.update_outcome(match_id, outcome)
    }

    /// Deletes a match. A played outcome is reversed through the same
    /// transition path before the record is removed, leaving no residue on
    /// ratings or stats.
    pub fn delete_match(&mut self, match_id: i32) -> Result<Match> {
        let previous = self
            .store
            .match_by_id(match_id)
            .ok_or(ProcessorError::MatchNotFound(match_id))?
            .outcome;

        if previous.is_played() {
            self.apply_outcome_change(match_id, previous, MatchOutcome::NotPlayed)?;
        }

        self.store
            .remove_match(match_id)
            .ok_or(ProcessorError::MatchNotFound(match_id))
    }

    fn validate_pairing(&self, match_: &Match) -> Result<()> {
        if match_.participant_1_id == match_.participant_2_id {
            return Err(ProcessorError::IdenticalParticipants(match_.participant_1_id));
        }

        self.store
            .competition(match_.competition_id)
            .ok_or(ProcessorError::CompetitionNotFound(match_.competition_id))?;

        for participant_id in [match_.participant_1_id, match_.participant_2_id] {
            let participant = self
                .store
                .participant(participant_id)
                .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;

            if participant.competition_id != match_.competition_id {
                return Err(ProcessorError::CompetitionMismatch {
                    participant_id,
                    competition_id: match_.competition_id
                });
            }
        }

        Ok(())
    }

    /// One outcome transition. `previous` must be the outcome whose deltas
    /// are currently stored on the match record.
    fn apply_outcome_change(&mut self, match_id: i32, previous: MatchOutcome, new: MatchOutcome) -> Result<()> {
        let (participant_1_id, participant_2_id, stored) = {
            let match_ = self
                .store
                .match_by_id(match_id)
                .ok_or(ProcessorError::MatchNotFound(match_id))?;
            (
                match_.participant_1_id,
                match_.participant_2_id,
                RatingDelta {
                    participant_1: match_.participant_1_delta,
                    participant_2: match_.participant_2_delta
                }
            )
        };

        // Reference checks precede every mutation.
        if participant_1_id == participant_2_id {
            return Err(ProcessorError::IdenticalParticipants(participant_1_id));
        }
        for participant_id in [participant_1_id, participant_2_id] {
            if self.store.participant(participant_id).is_none() || self.store.stats(participant_id).is_none() {
                return Err(ProcessorError::ParticipantNotFound(participant_id));
            }
        }

        // 1. Reverse the previously applied deltas, exactly as stored.
        if previous.is_played() {
            self.shift_rating(participant_1_id, -stored.participant_1)?;
            self.shift_rating(participant_2_id, -stored.participant_2)?;
        }

        // 2. Compute and apply the new outcome from the post-reversal pair.
        let applied = if new.is_played() {
            let rating_1 = self.rating_of(participant_1_id)?;
            let rating_2 = self.rating_of(participant_2_id)?;

            let delta = RatingLedger::compute_delta(rating_1, rating_2, new)?;
            self.shift_rating(participant_1_id, delta.participant_1)?;
            self.shift_rating(participant_2_id, delta.participant_2)?;
            self.raise_peak(participant_1_id)?;
            self.raise_peak(participant_2_id)?;

            delta
        } else {
            RatingDelta::ZERO
        };

        {
            let match_ = self
                .store
                .match_by_id_mut(match_id)
                .ok_or(ProcessorError::MatchNotFound(match_id))?;
            match_.outcome = new;
            match_.participant_1_delta = applied.participant_1;
            match_.participant_2_delta = applied.participant_2;
        }

        // 3. Move the aggregate counters by the outcome difference.
        if new != previous {
            self.shift_stats(participant_1_id, participant_2_id, previous, new)?;
        }

        info!(match_id, ?previous, ?new, "applied outcome transition");
        Ok(())
    }

    fn rating_of(&self, participant_id: i32) -> Result<i32> {
        Ok(self
            .store
            .participant(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?
            .rating)
    }

    fn shift_rating(&mut self, participant_id: i32, amount: i32) -> Result<()> {
        let participant = self
            .store
            .participant_mut(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;
        participant.rating += amount;
        Ok(())
    }

    /// Raises the recorded peak to the current rating when exceeded.
    /// Reversals never lower a peak that was actually reached.
    fn raise_peak(&mut self, participant_id: i32) -> Result<()> {
        let rating = self.rating_of(participant_id)?;
        let stats = self
            .store
            .stats_mut(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;

        if rating > stats.peak_rating {
            stats.peak_rating = rating;
        }
        Ok(())
    }

    fn shift_stats(
        &mut self,
        participant_1_id: i32,
        participant_2_id: i32,
        previous: MatchOutcome,
        new: MatchOutcome
    ) -> Result<()> {
        if let Some((effect_1, effect_2)) = previous.effects() {
            self.shift_counter(participant_1_id, effect_1, -1)?;
            self.shift_counter(participant_2_id, effect_2, -1)?;
        }
        if let Some((effect_1, effect_2)) = new.effects() {
            self.shift_counter(participant_1_id, effect_1, 1)?;
            self.shift_counter(participant_2_id, effect_2, 1)?;
        }

        // matches_played moves only when the played/unplayed boundary is
        // crossed. Reverting to NotPlayed decrements, keeping the counter
        // equal to wins + losses + draws.
        let played_shift = match (previous.is_played(), new.is_played()) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0
        };
        if played_shift != 0 {
            for participant_id in [participant_1_id, participant_2_id] {
                let stats = self
                    .store
                    .stats_mut(participant_id)
                    .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;
                stats.matches_played += played_shift;
            }
        }

        Ok(())
    }

    fn shift_counter(&mut self, participant_id: i32, result: ParticipantResult, amount: i32) -> Result<()> {
        let stats = self
            .store
            .stats_mut(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;

        match result {
            ParticipantResult::Win => stats.wins += amount,
            ParticipantResult::Loss => stats.losses += amount,
            ParticipantResult::Draw => stats.draws += amount
        }
        Ok(())
    }
}

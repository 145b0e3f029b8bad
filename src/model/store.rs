use crate::{
    database::db_structs::{Competition, Match, Participant, ParticipantStats},
    model::error::{ProcessorError, Result}
};
use indexmap::IndexMap;
use itertools::Itertools;

/// In-memory entity store the core operates against. It is hydrated from
/// the database before a transition and written back afterwards; the
/// processor never talks to the database directly.
///
/// Stats rows are keyed by participant id and share their participant's
/// lifetime: `insert_participant` creates the zeroed stats row in the same
/// step, and every removal cascades.
#[derive(Debug, Default)]
pub struct CompetitionStore {
    competitions: IndexMap<i32, Competition>,
    participants: IndexMap<i32, Participant>,
    stats: IndexMap<i32, ParticipantStats>,
    matches: IndexMap<i32, Match>
}

impl CompetitionStore {
    pub fn new() -> CompetitionStore {
        CompetitionStore::default()
    }

    pub fn insert_competition(&mut self, competition: Competition) {
        self.competitions.insert(competition.id, competition);
    }

    pub fn competition(&self, id: i32) -> Option<&Competition> {
        self.competitions.get(&id)
    }

    /// Registers a participant and creates its stats row in the same step,
    /// keeping the 1:1 lifetime visible at the only place it can be
    /// violated.
    pub fn insert_participant(&mut self, participant: Participant) -> Result<()> {
        if self.participants.contains_key(&participant.id) {
            return Err(ProcessorError::DuplicateParticipantId(participant.id));
        }

        self.competition(participant.competition_id)
            .ok_or(ProcessorError::CompetitionNotFound(participant.competition_id))?;

        let duplicate = self
            .participants
            .values()
            .any(|p| p.user_id == participant.user_id && p.competition_id == participant.competition_id);
        if duplicate {
            return Err(ProcessorError::DuplicateParticipant {
                user_id: participant.user_id,
                competition_id: participant.competition_id
            });
        }

        self.stats
            .insert(participant.id, ParticipantStats::new(participant.id));
        self.participants.insert(participant.id, participant);
        Ok(())
    }

    /// Restores a participant together with previously persisted stats.
    /// Used when hydrating from the database; the same pairing rule applies.
    pub fn hydrate_participant(&mut self, participant: Participant, stats: ParticipantStats) -> Result<()> {
        let participant_id = participant.id;
        self.insert_participant(participant)?;
        self.stats.insert(participant_id, stats);
        Ok(())
    }

    pub fn participant(&self, id: i32) -> Option<&Participant> {
        self.participants.get(&id)
    }

    pub fn participant_mut(&mut self, id: i32) -> Option<&mut Participant> {
        self.participants.get_mut(&id)
    }

    pub fn stats(&self, participant_id: i32) -> Option<&ParticipantStats> {
        self.stats.get(&participant_id)
    }

    pub fn stats_mut(&mut self, participant_id: i32) -> Option<&mut ParticipantStats> {
        self.stats.get_mut(&participant_id)
    }

    pub fn insert_match(&mut self, match_: Match) -> Result<()> {
        if self.matches.contains_key(&match_.id) {
            return Err(ProcessorError::DuplicateMatch(match_.id));
        }
        self.matches.insert(match_.id, match_);
        Ok(())
    }

    pub fn match_by_id(&self, id: i32) -> Option<&Match> {
        self.matches.get(&id)
    }

    pub fn match_by_id_mut(&mut self, id: i32) -> Option<&mut Match> {
        self.matches.get_mut(&id)
    }

    pub fn remove_match(&mut self, id: i32) -> Option<Match> {
        self.matches.shift_remove(&id)
    }

    /// Removes a participant, its stats, and every match it appears in,
    /// mirroring the cascade the persisted schema enforces.
    pub fn remove_participant(&mut self, id: i32) -> Option<Participant> {
        let removed = self.participants.shift_remove(&id)?;
        self.stats.shift_remove(&id);
        self.matches
            .retain(|_, m| m.participant_1_id != id && m.participant_2_id != id);
        Some(removed)
    }

    /// Removes a competition and everything it owns.
    pub fn remove_competition(&mut self, id: i32) -> Option<Competition> {
        let removed = self.competitions.shift_remove(&id)?;

        let participant_ids = self
            .participants
            .values()
            .filter(|p| p.competition_id == id)
            .map(|p| p.id)
            .collect::<Vec<_>>();
        for participant_id in participant_ids {
            self.remove_participant(participant_id);
        }
        self.matches.retain(|_, m| m.competition_id != id);

        Some(removed)
    }

    /// Participants of one competition ordered by rating descending, ties
    /// broken by id ascending.
    pub fn standings(&self, competition_id: i32) -> Vec<&Participant> {
        self.participants
            .values()
            .filter(|p| p.competition_id == competition_id)
            .sorted_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)))
            .collect()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }
}

use crate::{
    database::db_structs::{Competition, Match, Participant, ParticipantStats},
    model::{error::ProcessorError, store::CompetitionStore, structures::match_outcome::MatchOutcome}
};
use postgres_types::ToSql;
use std::{convert::TryFrom, sync::Arc};
use thiserror::Error;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database failure: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Processor(#[from] ProcessorError)
}

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, DbError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Hydrates every competition, participant (with its stats row), and
    /// match into an in-memory store for processing.
    pub async fn load_store(&self) -> Result<CompetitionStore, DbError> {
        let mut store = CompetitionStore::new();

        info!("Fetching competitions...");
        let rows = self
            .client
            .query("SELECT id, name, created_at, created_by FROM competitions ORDER BY id", &[])
            .await?;
        for row in rows {
            store.insert_competition(Self::competition_from_row(&row));
        }

        info!("Fetching participants...");
        let rows = self
            .client
            .query(
                "SELECT p.id, p.user_id, p.competition_id, p.rating, \
                 s.matches_played, s.wins, s.losses, s.draws, s.peak_rating \
                 FROM participants p \
                 JOIN participant_stats s ON s.participant_id = p.id \
                 ORDER BY p.id",
                &[]
            )
            .await?;
        for row in &rows {
            store.hydrate_participant(Self::participant_from_row(row), Self::stats_from_row(row))?;
        }

        info!("Fetching matches...");
        let rows = self
            .client
            .query(
                "SELECT id, competition_id, participant_1_id, participant_2_id, outcome, played_at, \
                 participant_1_delta, participant_2_delta \
                 FROM matches ORDER BY id",
                &[]
            )
            .await?;
        for row in &rows {
            store.insert_match(Self::match_from_row(row)?)?;
        }

        info!("Store hydration complete");
        Ok(store)
    }

    /// Persists the result of one match transition: both participant rows,
    /// both stats rows, and the match row land in a single transaction, or
    /// none of them do.
    pub async fn persist_transition(&self, store: &CompetitionStore, match_id: i32) -> Result<(), DbError> {
        let match_ = store
            .match_by_id(match_id)
            .ok_or(ProcessorError::MatchNotFound(match_id))?;

        self.client.batch_execute("BEGIN").await?;
        let result = self.write_transition(store, match_).await;
        self.finish_transaction(result).await
    }

    /// Inserts a newly recorded match together with any rating effect it
    /// already applied, in one transaction.
    pub async fn persist_recorded_match(&self, store: &CompetitionStore, match_id: i32) -> Result<(), DbError> {
        let match_ = store
            .match_by_id(match_id)
            .ok_or(ProcessorError::MatchNotFound(match_id))?;

        self.client.batch_execute("BEGIN").await?;
        let result = self.write_recorded_match(store, match_).await;
        self.finish_transaction(result).await
    }

    /// Removes a deleted match row. The participant and stats rows carrying
    /// the reversal are written in the same transaction.
    pub async fn persist_deletion(&self, store: &CompetitionStore, match_: &Match) -> Result<(), DbError> {
        self.client.batch_execute("BEGIN").await?;
        let result = self.write_deletion(store, match_).await;
        self.finish_transaction(result).await
    }

    /// Inserts a participant and its stats row in one transaction, so a
    /// participant row can never exist without its aggregate.
    pub async fn persist_registration(&self, store: &CompetitionStore, participant_id: i32) -> Result<(), DbError> {
        let participant = store
            .participant(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;
        let stats = store
            .stats(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;

        self.client.batch_execute("BEGIN").await?;
        let result = self.write_registration(participant, stats).await;
        self.finish_transaction(result).await
    }

    async fn write_transition(&self, store: &CompetitionStore, match_: &Match) -> Result<(), DbError> {
        for participant_id in [match_.participant_1_id, match_.participant_2_id] {
            self.update_participant_rows(store, participant_id).await?;
        }

        self.client
            .execute(
                "UPDATE matches SET outcome = $1, participant_1_delta = $2, participant_2_delta = $3 \
                 WHERE id = $4",
                &[
                    &(match_.outcome as i32),
                    &match_.participant_1_delta,
                    &match_.participant_2_delta,
                    &match_.id
                ]
            )
            .await?;
        Ok(())
    }

    async fn write_recorded_match(&self, store: &CompetitionStore, match_: &Match) -> Result<(), DbError> {
        for participant_id in [match_.participant_1_id, match_.participant_2_id] {
            self.update_participant_rows(store, participant_id).await?;
        }

        self.client
            .execute(
                "INSERT INTO matches \
                 (id, competition_id, participant_1_id, participant_2_id, outcome, played_at, \
                 participant_1_delta, participant_2_delta) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &match_.id,
                    &match_.competition_id,
                    &match_.participant_1_id,
                    &match_.participant_2_id,
                    &(match_.outcome as i32),
                    &match_.played_at,
                    &match_.participant_1_delta,
                    &match_.participant_2_delta
                ]
            )
            .await?;
        Ok(())
    }

    async fn write_deletion(&self, store: &CompetitionStore, match_: &Match) -> Result<(), DbError> {
        for participant_id in [match_.participant_1_id, match_.participant_2_id] {
            self.update_participant_rows(store, participant_id).await?;
        }

        self.client
            .execute("DELETE FROM matches WHERE id = $1", &[&match_.id])
            .await?;
        Ok(())
    }

    async fn write_registration(&self, participant: &Participant, stats: &ParticipantStats) -> Result<(), DbError> {
        self.client
            .execute(
                "INSERT INTO participants (id, user_id, competition_id, rating) VALUES ($1, $2, $3, $4)",
                &[
                    &participant.id,
                    &participant.user_id,
                    &participant.competition_id,
                    &participant.rating
                ]
            )
            .await?;

        self.client
            .execute(
                "INSERT INTO participant_stats \
                 (participant_id, matches_played, wins, losses, draws, peak_rating) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &stats.participant_id,
                    &stats.matches_played,
                    &stats.wins,
                    &stats.losses,
                    &stats.draws,
                    &stats.peak_rating
                ]
            )
            .await?;
        Ok(())
    }

    async fn update_participant_rows(&self, store: &CompetitionStore, participant_id: i32) -> Result<(), DbError> {
        let participant = store
            .participant(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;
        let stats = store
            .stats(participant_id)
            .ok_or(ProcessorError::ParticipantNotFound(participant_id))?;

        self.client
            .execute(
                "UPDATE participants SET rating = $1 WHERE id = $2",
                &[&participant.rating, &participant.id]
            )
            .await?;

        let params: Vec<&(dyn ToSql + Sync)> = vec![
            &stats.matches_played,
            &stats.wins,
            &stats.losses,
            &stats.draws,
            &stats.peak_rating,
            &stats.participant_id
        ];
        self.client
            .execute(
                "UPDATE participant_stats SET matches_played = $1, wins = $2, losses = $3, draws = $4, \
                 peak_rating = $5 WHERE participant_id = $6",
                &params
            )
            .await?;
        Ok(())
    }

    async fn finish_transaction(&self, result: Result<(), DbError>) -> Result<(), DbError> {
        match result {
            Ok(()) => {
                self.client.batch_execute("COMMIT").await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.client.batch_execute("ROLLBACK").await {
                    error!("rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    fn competition_from_row(row: &Row) -> Competition {
        Competition {
            id: row.get("id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
            created_by: row.get("created_by")
        }
    }

    fn participant_from_row(row: &Row) -> Participant {
        Participant {
            id: row.get("id"),
            user_id: row.get("user_id"),
            competition_id: row.get("competition_id"),
            rating: row.get("rating")
        }
    }

    fn stats_from_row(row: &Row) -> ParticipantStats {
        ParticipantStats {
            participant_id: row.get("id"),
            matches_played: row.get("matches_played"),
            wins: row.get("wins"),
            losses: row.get("losses"),
            draws: row.get("draws"),
            peak_rating: row.get("peak_rating")
        }
    }

    fn match_from_row(row: &Row) -> Result<Match, ProcessorError> {
        let outcome_value = row.get::<_, i32>("outcome");
        let outcome = MatchOutcome::try_from(outcome_value).map_err(|_| ProcessorError::UnknownOutcome(outcome_value))?;

        Ok(Match {
            id: row.get("id"),
            competition_id: row.get("competition_id"),
            participant_1_id: row.get("participant_1_id"),
            participant_2_id: row.get("participant_2_id"),
            outcome,
            played_at: row.get("played_at"),
            participant_1_delta: row.get("participant_1_delta"),
            participant_2_delta: row.get("participant_2_delta")
        })
    }
}

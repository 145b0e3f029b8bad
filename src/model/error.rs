use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Failures raised by the rating core. Validation variants reject the
/// request payload; not-found variants name the missing entity. Nothing is
/// retried and nothing is swallowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("both sides of a match must be different participants (got {0} twice)")]
    IdenticalParticipants(i32),

    #[error("{0} is not a recognized match outcome")]
    UnknownOutcome(i32),

    #[error("a rating delta is undefined for an unplayed match")]
    UnplayedOutcome,

    #[error("user {user_id} is already a participant in competition {competition_id}")]
    DuplicateParticipant { user_id: i32, competition_id: i32 },

    #[error("participant {0} already exists")]
    DuplicateParticipantId(i32),

    #[error("participant {participant_id} does not belong to competition {competition_id}")]
    CompetitionMismatch { participant_id: i32, competition_id: i32 },

    #[error("match {0} already exists")]
    DuplicateMatch(i32),

    #[error("competition {0} not found")]
    CompetitionNotFound(i32),

    #[error("participant {0} not found")]
    ParticipantNotFound(i32),

    #[error("match {0} not found")]
    MatchNotFound(i32)
}

impl ProcessorError {
    /// True for rejections of the supplied data, false for missing
    /// resources. Lets callers map failures onto their own surfaces without
    /// matching every variant.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ProcessorError::CompetitionNotFound(_) | ProcessorError::ParticipantNotFound(_) | ProcessorError::MatchNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ProcessorError;

    #[test]
    fn test_validation_classification() {
        assert!(ProcessorError::IdenticalParticipants(1).is_validation());
        assert!(ProcessorError::UnknownOutcome(9).is_validation());
        assert!(ProcessorError::DuplicateParticipant {
            user_id: 1,
            competition_id: 2
        }
        .is_validation());
        assert!(ProcessorError::DuplicateParticipantId(1).is_validation());

        assert!(!ProcessorError::CompetitionNotFound(1).is_validation());
        assert!(!ProcessorError::ParticipantNotFound(1).is_validation());
        assert!(!ProcessorError::MatchNotFound(1).is_validation());
    }
}

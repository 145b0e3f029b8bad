pub mod match_outcome;
pub mod participant_result;

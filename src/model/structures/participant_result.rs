use serde_repr::{Deserialize_repr, Serialize_repr};

/// How one match outcome lands on a single participant's record.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParticipantResult {
    Win = 0,
    Loss = 1,
    Draw = 2
}

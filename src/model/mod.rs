pub mod constants;
pub mod elo;
pub mod error;
pub mod processor;
pub mod store;
pub mod structures;

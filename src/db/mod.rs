//! Persistence module split across logical submodules.

mod connection;
mod places;

pub use connection::{Database, PlaceStore, RunOutcome};

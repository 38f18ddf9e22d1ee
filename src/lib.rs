//! Core library surface for Place Keeper.
//!
//! The persistence layer (`db`) owns the single `place` table, the
//! controller (`places`) keeps the session's snapshot in sync with it, and
//! `ui` renders that snapshot in the terminal.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod places;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{Database, PlaceStore, RunOutcome};

pub use error::PlaceError;

/// The domain types that other layers manipulate.
pub use models::{Coordinate, FocusRegion, Place};

pub use places::PlaceList;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

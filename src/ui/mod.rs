//! Ratatui front-end: tabs for the map, the place list, favorites, search,
//! and an about page, all reading from one [`PlaceList`](crate::PlaceList).

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;

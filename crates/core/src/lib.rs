//! Domain logic for TuneIQ quiz games.
//!
//! Pure building blocks (round construction, game assembly, stale-game
//! reaping) plus the collaborator traits the outer crates implement. No
//! database or HTTP dependencies live here.

pub mod catalog;
pub mod error;
pub mod game;
pub mod reaper;
pub mod rounds;
pub mod store;
pub mod types;

//! A falling-block gap runner for the terminal.
//!
//! The game logic ([`session`] and the modules it owns) is independent of the
//! terminal; [`render`] and [`input`] adapt it to crossterm, [`storage`] keeps
//! the best score, and [`sound`] plays cues.

pub mod body;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod obstacles;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod storage;

pub use config::{Settings, Surface, Tuning};
pub use session::{GameEvent, Phase, Session, Signal};

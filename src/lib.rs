//! # Q Connect Four
//!
//! Connect Four with a tabular Q-learning agent that learns by playing
//! against random, self-play or stored opponents.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, win detection, game session
//! - [`ai`]: Agent trait, random agent, Q-learning agent, board fingerprints and value table
//! - [`training`]: Episode loop, trainer, metrics collection
//! - [`checkpoint`]: Agent persistence by name
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;

//! Asteroid Defender
//!
//! An 8x16 LED-matrix shooter: steer the base along the bottom row, shoot
//! the asteroids before they land on you. Everything hardware specific sits
//! behind the traits in [`hal`], so the same game runs on the Pico firmware
//! and under `cargo test`.
//!
//! Frontends supply the status readout: the Pico firmware draws a HUD next
//! to the field, while boards without an LCD can hand any `core::fmt::Write`
//! serial port to [`status::TerminalReadout`].

#![cfg_attr(not(test), no_std)]

pub mod colour;
pub mod config;
pub mod effects;
pub mod engine;
pub mod game_loop;
pub mod game_over;
pub mod hal;
pub mod input;
pub mod matrix;
pub mod position;
pub mod rng;
pub mod status;

#[cfg(test)]
mod mock;

pub use colour::PixelColour;
pub use config::Tuning;
pub use engine::{Cue, Engine};
pub use game_loop::{GameLoop, GameOver, Status};
pub use hal::{Board, Millis};
pub use input::{Axis, Button, ButtonLatch, Command, Direction};
pub use matrix::MatrixDisplay;
pub use position::Position;

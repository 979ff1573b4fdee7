//! Seams to the hardware. The core never touches a register; a board
//! implements these traits and the game is generic over [`Board`].

use crate::colour::PixelColour;
use crate::input::{Axis, Button};

/// Milliseconds since power-up. Wraps after ~49 days; compare with
/// [`elapsed`].
pub type Millis = u32;

/// Wrap-safe `now - since`.
pub fn elapsed(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

pub trait Clock {
    fn now(&self) -> Millis;
}

/// A 16-row by 8-column LED matrix.
pub trait PixelSink {
    fn set_pixel(&mut self, row: u8, col: u8, colour: PixelColour);
    fn clear(&mut self);
}

pub trait Buzzer {
    fn play_tone(&mut self, hz: u16);
    fn stop_tone(&mut self);
    /// State of the physical sound-enable switch.
    fn audio_enabled(&self) -> bool;
}

pub trait Scoreboard {
    fn add(&mut self, amount: u32);
    fn score(&self) -> u32;
    fn reset(&mut self);
}

/// Terminal / seven-segment / LED readout of the game counters.
pub trait StatusReadout {
    fn render_status(&mut self, score: u32, lives: u8);
    fn render_game_over(&mut self, _score: u32) {}
}

pub trait Controls {
    /// Latest button press, cleared by the read.
    fn poll_button(&mut self) -> Option<Button>;
    fn read_serial(&mut self) -> Option<u8>;
    /// One analog sample scaled to `0..=1023`. May block for the conversion.
    fn sample_axis(&mut self, axis: Axis) -> u16;
}

/// Everything the game needs from a board.
pub trait Board: Clock + PixelSink + Buzzer + Scoreboard + StatusReadout + Controls {}

impl<T> Board for T where T: Clock + PixelSink + Buzzer + Scoreboard + StatusReadout + Controls {}

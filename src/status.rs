//! Score and lives readouts: the serial terminal layout and the four
//! lives LEDs.

use core::fmt::{self, Write};

use heapless::String;

use crate::hal::StatusReadout;

/// Port bits of the lives LEDs, in the order they go dark.
const LIVES_LED_ORDER: [u8; 4] = [5, 2, 4, 3];

/// Port value for the lives LEDs: all four lit at full lives, one more
/// switched off for every life lost.
pub fn lives_leds(lives: u8) -> u8 {
    let lost = 4usize.saturating_sub(usize::from(lives)).min(LIVES_LED_ORDER.len());
    LIVES_LED_ORDER[lost..]
        .iter()
        .fold(0, |mask, bit| mask | (1 << bit))
}

/// Terminal column that keeps "Score: N" right-aligned as N grows.
pub fn score_column(score: u32) -> u8 {
    let mut digits = 1;
    let mut rest = score / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    12 - digits
}

pub fn score_line(score: u32) -> String<24> {
    let mut line = String::new();
    if write!(line, "Score: {}", score).is_err() {
        log::warn!("score line truncated");
    }
    line
}

pub fn lives_line(lives: u8) -> String<16> {
    let mut line = String::new();
    if write!(line, "Lives: {}", lives).is_err() {
        log::warn!("lives line truncated");
    }
    line
}

/// Renders the readout as ANSI text for a serial terminal. Boards without
/// an LCD wrap their UART writer in this as their [`StatusReadout`].
pub struct TerminalReadout<W> {
    out: W,
}

impl<W: Write> TerminalReadout<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_status(&mut self, score: u32, lives: u8) -> fmt::Result {
        write!(self.out, "\x1b[2J")?;
        move_cursor(&mut self.out, score_column(score), 12)?;
        self.out.write_str(&score_line(score))?;
        move_cursor(&mut self.out, 10, 13)?;
        self.out.write_str(&lives_line(lives))?;
        write!(self.out, "\x1b[?25l")
    }

    fn write_game_over(&mut self) -> fmt::Result {
        move_cursor(&mut self.out, 10, 13)?;
        write!(self.out, "\x1b[K")?;
        move_cursor(&mut self.out, 10, 13)?;
        self.out.write_str("Lives: 0")?;
        move_cursor(&mut self.out, 10, 14)?;
        self.out.write_str("GAME OVER")?;
        move_cursor(&mut self.out, 10, 15)?;
        self.out.write_str("Press a button to start again")
    }
}

impl<W: Write> StatusReadout for TerminalReadout<W> {
    fn render_status(&mut self, score: u32, lives: u8) {
        if self.write_status(score, lives).is_err() {
            log::warn!("terminal status write failed");
        }
    }

    fn render_game_over(&mut self, _score: u32) {
        if self.write_game_over().is_err() {
            log::warn!("terminal game-over write failed");
        }
    }
}

fn move_cursor<W: Write>(out: &mut W, x: u8, y: u8) -> fmt::Result {
    write!(out, "\x1b[{};{}H", y, x)
}

//! In-memory board for unit tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use crate::colour::PixelColour;
use crate::config::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::hal::{Buzzer, Clock, Controls, Millis, PixelSink, Scoreboard, StatusReadout};
use crate::input::{Axis, Button};
use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Play(u16),
    Stop,
}

pub struct MockBoard {
    time: Cell<Millis>,
    /// Added to the clock on every `now()` read.
    pub tick: Millis,
    /// Indexed `[row][col]` like the matrix.
    pub matrix: [[PixelColour; FIELD_WIDTH as usize]; FIELD_HEIGHT as usize],
    pub clears: usize,
    pub sounds: Vec<Sound>,
    pub audio: bool,
    pub score: u32,
    pub status: Vec<(u32, u8)>,
    pub game_over: Option<u32>,
    pub buttons: VecDeque<Button>,
    pub serial: VecDeque<u8>,
    pub joystick_x: u16,
    pub joystick_y: u16,
    pub samples: Vec<Axis>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            time: Cell::new(0),
            tick: 0,
            matrix: [[PixelColour::BACKGROUND; FIELD_WIDTH as usize]; FIELD_HEIGHT as usize],
            clears: 0,
            sounds: Vec::new(),
            audio: true,
            score: 0,
            status: Vec::new(),
            game_over: None,
            buttons: VecDeque::new(),
            serial: VecDeque::new(),
            joystick_x: 512,
            joystick_y: 512,
            samples: Vec::new(),
        }
    }

    pub fn set_time(&mut self, now: Millis) {
        self.time.set(now);
    }

    /// Colour at a field position.
    pub fn pixel(&self, pos: Position) -> PixelColour {
        let (row, col) = pos.matrix_cell();
        self.matrix[row as usize][col as usize]
    }

    pub fn tones(&self) -> Vec<u16> {
        self.sounds
            .iter()
            .filter_map(|s| match s {
                Sound::Play(hz) => Some(*hz),
                Sound::Stop => None,
            })
            .collect()
    }

    pub fn type_str(&mut self, text: &[u8]) {
        self.serial.extend(text.iter().copied());
    }
}

impl Clock for MockBoard {
    fn now(&self) -> Millis {
        let now = self.time.get();
        self.time.set(now.wrapping_add(self.tick));
        now
    }
}

impl PixelSink for MockBoard {
    fn set_pixel(&mut self, row: u8, col: u8, colour: PixelColour) {
        self.matrix[row as usize][col as usize] = colour;
    }

    fn clear(&mut self) {
        self.clears += 1;
        for row in self.matrix.iter_mut() {
            row.fill(PixelColour::BACKGROUND);
        }
    }
}

impl Buzzer for MockBoard {
    fn play_tone(&mut self, hz: u16) {
        self.sounds.push(Sound::Play(hz));
    }

    fn stop_tone(&mut self) {
        self.sounds.push(Sound::Stop);
    }

    fn audio_enabled(&self) -> bool {
        self.audio
    }
}

impl Scoreboard for MockBoard {
    fn add(&mut self, amount: u32) {
        self.score += amount;
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn reset(&mut self) {
        self.score = 0;
    }
}

impl StatusReadout for MockBoard {
    fn render_status(&mut self, score: u32, lives: u8) {
        self.status.push((score, lives));
    }

    fn render_game_over(&mut self, score: u32) {
        self.game_over = Some(score);
    }
}

impl Controls for MockBoard {
    fn poll_button(&mut self) -> Option<Button> {
        self.buttons.pop_front()
    }

    fn read_serial(&mut self) -> Option<u8> {
        self.serial.pop_front()
    }

    fn sample_axis(&mut self, axis: Axis) -> u16 {
        self.samples.push(axis);
        match axis {
            Axis::X => self.joystick_x,
            Axis::Y => self.joystick_y,
        }
    }
}

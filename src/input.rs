//! Input events and their decoding into game commands.
//!
//! Interrupt handlers (or async tasks) post presses into [`ButtonLatch`];
//! the game loop drains it once per iteration. A newer press overwrites an
//! unread one. Serial bytes reach the loop through [`Controls::read_serial`]
//! and are decoded here by [`EscapeDecoder`].
//!
//! [`Controls::read_serial`]: crate::hal::Controls::read_serial

use portable_atomic::{AtomicU8, Ordering};

use crate::config::{JOYSTICK_HIGH, JOYSTICK_LOW};

/// Push-buttons B0..B3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    B0,
    B1,
    B2,
    B3,
}

impl Button {
    const fn code(self) -> u8 {
        match self {
            Self::B0 => 0,
            Self::B1 => 1,
            Self::B2 => 2,
            Self::B3 => 3,
        }
    }

    const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::B0),
            1 => Some(Self::B1),
            2 => Some(Self::B2),
            3 => Some(Self::B3),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Fire,
    Pause,
}

impl Command {
    pub fn from_button(button: Button) -> Option<Self> {
        match button {
            Button::B0 => Some(Self::Move(Direction::Right)),
            // Reserved for "down"; does nothing in play.
            Button::B1 => None,
            Button::B2 => Some(Self::Fire),
            Button::B3 => Some(Self::Move(Direction::Left)),
        }
    }

    /// Joystick X deflection steers, any Y deflection fires.
    pub fn from_joystick(axis: Axis, sample: u16) -> Option<Self> {
        match axis {
            Axis::X if sample > JOYSTICK_HIGH => Some(Self::Move(Direction::Left)),
            Axis::X if sample < JOYSTICK_LOW => Some(Self::Move(Direction::Right)),
            Axis::Y if !(JOYSTICK_LOW..=JOYSTICK_HIGH).contains(&sample) => Some(Self::Fire),
            _ => None,
        }
    }

    fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Arrow(b'D') | Key::Char(b'L' | b'l') => Some(Self::Move(Direction::Left)),
            Key::Arrow(b'C') | Key::Char(b'R' | b'r') => Some(Self::Move(Direction::Right)),
            Key::Arrow(b'A') | Key::Char(b' ') => Some(Self::Fire),
            Key::Char(b'P' | b'p') => Some(Self::Pause),
            _ => None,
        }
    }
}

pub const ESCAPE: u8 = 0x1b;

/// A decoded serial keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(u8),
    /// Final byte of an `ESC [ x` cursor sequence.
    Arrow(u8),
}

impl Key {
    /// Raw pause key. While paused, bytes bypass the escape decoder.
    pub fn is_pause(self) -> bool {
        matches!(self, Self::Char(b'P' | b'p'))
    }

    pub fn command(self) -> Option<Command> {
        Command::from_key(self)
    }
}

/// Accumulates `ESC [ x` across loop iterations, one byte per call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EscapeDecoder {
    seen: u8,
}

impl EscapeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a key once a byte completes one. A broken sequence hands the
    /// offending byte back as a plain character.
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        match (self.seen, byte) {
            (0, ESCAPE) => {
                self.seen = 1;
                None
            }
            (1, b'[') => {
                self.seen = 2;
                None
            }
            (2, _) => {
                self.seen = 0;
                Some(Key::Arrow(byte))
            }
            _ => {
                self.seen = 0;
                Some(Key::Char(byte))
            }
        }
    }

    pub fn reset(&mut self) {
        self.seen = 0;
    }
}

const NO_BUTTON: u8 = u8::MAX;

/// Single pending-press slot shared between an interrupt and the loop.
pub struct ButtonLatch {
    slot: AtomicU8,
}

impl ButtonLatch {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(NO_BUTTON),
        }
    }

    /// Overwrites any press the loop hasn't read yet.
    pub fn post(&self, button: Button) {
        self.slot.store(button.code(), Ordering::Release);
    }

    pub fn take(&self) -> Option<Button> {
        Button::from_code(self.slot.swap(NO_BUTTON, Ordering::AcqRel))
    }
}

impl Default for ButtonLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(decoder: &mut EscapeDecoder, bytes: &[u8]) -> Vec<Key> {
        bytes.iter().filter_map(|b| decoder.feed(*b)).collect()
    }

    #[test]
    fn arrow_sequences_decode() {
        let mut d = EscapeDecoder::new();
        assert_eq!(feed_all(&mut d, b"\x1b[D"), [Key::Arrow(b'D')]);
        assert_eq!(feed_all(&mut d, b"\x1b[A\x1b[C"), [Key::Arrow(b'A'), Key::Arrow(b'C')]);
    }

    #[test]
    fn broken_escape_falls_back_to_plain_char() {
        let mut d = EscapeDecoder::new();
        assert_eq!(feed_all(&mut d, b"\x1bL"), [Key::Char(b'L')]);
        assert_eq!(feed_all(&mut d, b"r"), [Key::Char(b'r')]);
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Key::Arrow(b'D').command(), Some(Command::Move(Direction::Left)));
        assert_eq!(Key::Char(b'l').command(), Some(Command::Move(Direction::Left)));
        assert_eq!(Key::Arrow(b'C').command(), Some(Command::Move(Direction::Right)));
        assert_eq!(Key::Char(b' ').command(), Some(Command::Fire));
        assert_eq!(Key::Arrow(b'A').command(), Some(Command::Fire));
        assert_eq!(Key::Arrow(b'B').command(), None);
        assert_eq!(Key::Char(b'P').command(), Some(Command::Pause));
        assert_eq!(Key::Char(b'x').command(), None);
    }

    #[test]
    fn pause_key_is_a_plain_p() {
        assert!(Key::Char(b'p').is_pause());
        assert!(Key::Char(b'P').is_pause());
        assert!(!Key::Arrow(b'P').is_pause());
        assert!(!Key::Char(b' ').is_pause());
    }

    #[test]
    fn buttons_map_to_commands() {
        assert_eq!(Command::from_button(Button::B0), Some(Command::Move(Direction::Right)));
        assert_eq!(Command::from_button(Button::B1), None);
        assert_eq!(Command::from_button(Button::B2), Some(Command::Fire));
        assert_eq!(Command::from_button(Button::B3), Some(Command::Move(Direction::Left)));
    }

    #[test]
    fn joystick_thresholds() {
        assert_eq!(Command::from_joystick(Axis::X, 900), Some(Command::Move(Direction::Left)));
        assert_eq!(Command::from_joystick(Axis::X, 100), Some(Command::Move(Direction::Right)));
        assert_eq!(Command::from_joystick(Axis::X, 512), None);
        assert_eq!(Command::from_joystick(Axis::X, 700), None);
        assert_eq!(Command::from_joystick(Axis::Y, 701), Some(Command::Fire));
        assert_eq!(Command::from_joystick(Axis::Y, 299), Some(Command::Fire));
        assert_eq!(Command::from_joystick(Axis::Y, 300), None);
    }

    #[test]
    fn latch_keeps_only_the_latest_press() {
        let latch = ButtonLatch::new();
        assert_eq!(latch.take(), None);
        latch.post(Button::B1);
        latch.post(Button::B3);
        assert_eq!(latch.take(), Some(Button::B3));
        assert_eq!(latch.take(), None);
    }
}

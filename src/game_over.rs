//! Between-games screen: striped rows sweep up the matrix until a button
//! is pressed.

use crate::colour::PixelColour;
use crate::config::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::hal::{Millis, PixelSink, elapsed};

const SWEEP_STEPS: u8 = 64;
const WARM: [PixelColour; 2] = [PixelColour::Yellow, PixelColour::Orange];
const COOL: [PixelColour; 2] = [PixelColour::Red, PixelColour::Green];

pub struct GameOverScreen {
    step: u8,
    phase: u8,
    last: Millis,
    frame_time: Millis,
}

impl GameOverScreen {
    pub fn new(now: Millis, frame_time: Millis) -> Self {
        Self {
            step: 0,
            phase: 0,
            last: now,
            frame_time,
        }
    }

    /// Paint the next row if a frame is due.
    pub fn service<B: PixelSink>(&mut self, now: Millis, board: &mut B) {
        if elapsed(now, self.last) < self.frame_time {
            return;
        }
        self.last = now;

        let row = self.step % FIELD_HEIGHT;
        for col in 0..FIELD_WIDTH {
            board.set_pixel(row, col, self.colour(col));
        }
        self.phase = self.phase.wrapping_add(1);
        self.step = (self.step + 1) % SWEEP_STEPS;
    }

    /// Two sweeps in colour, each followed by a dark sweep.
    fn colour(&self, col: u8) -> PixelColour {
        let pick = usize::from(col.wrapping_add(self.phase) % 2);
        match self.step / FIELD_HEIGHT {
            0 => COOL[pick],
            2 => WARM[pick],
            _ => PixelColour::BACKGROUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBoard;

    #[test]
    fn rows_sweep_up_with_alternating_colours() {
        let mut board = MockBoard::new();
        let mut screen = GameOverScreen::new(0, 100);

        screen.service(50, &mut board);
        assert_eq!(board.matrix[0][0], PixelColour::BACKGROUND);

        screen.service(100, &mut board);
        assert_eq!(board.matrix[0][0], PixelColour::Red);
        assert_eq!(board.matrix[0][1], PixelColour::Green);

        screen.service(200, &mut board);
        assert_eq!(board.matrix[1][0], PixelColour::Green);
        assert_eq!(board.matrix[1][1], PixelColour::Red);
    }

    #[test]
    fn sweeps_cycle_through_dark_and_warm() {
        let mut board = MockBoard::new();
        let mut screen = GameOverScreen::new(0, 1);

        for now in 1..=17 {
            screen.service(now, &mut board);
        }
        // Step 16 blanks row 0 again.
        assert_eq!(board.matrix[0][0], PixelColour::BACKGROUND);
        assert_eq!(board.matrix[1][0], PixelColour::Green);

        for now in 18..=33 {
            screen.service(now, &mut board);
        }
        // Step 32 starts the warm sweep on row 0.
        assert!(WARM.contains(&board.matrix[0][0]));

        for now in 34..=65 {
            screen.service(now, &mut board);
        }
        // 64 steps later the pattern restarts from row 0.
        assert!(COOL.contains(&board.matrix[0][3]));
    }
}

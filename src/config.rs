//! Compile-time game constants and the run-time [`Tuning`] knobs.

use crate::hal::Millis;

// --- Field ---
pub const FIELD_WIDTH: u8 = 8;
pub const FIELD_HEIGHT: u8 = 16;

// --- Entities ---
pub const MAX_ASTEROIDS: usize = 20;
pub const MAX_PROJECTILES: usize = 5;
/// Asteroids are never placed in the rows below this one at game start.
pub const SPAWN_CLEAR_ROWS: u8 = 3;
/// Row new projectiles appear in, directly above the base turret.
pub const FIRING_ROW: u8 = 2;
pub const BASE_START_X: u8 = 3;

// --- Scoring ---
pub const START_LIVES: u8 = 4;
pub const HIT_POINTS: u32 = 1;

// --- Tones (Hz) ---
pub const SHOOT_TONE: u16 = 3000;
pub const HIT_TONE: u16 = 1200;
pub const ALARM_TONES: [u16; 3] = [500, 350, 200];
pub const CHIME_LEAD_IN: u16 = 500;
pub const CHIME_TONES: [u16; 4] = [800, 1500, 2000, 2500];

// --- Joystick (samples scaled to 0..=1023) ---
pub const JOYSTICK_HIGH: u16 = 700;
pub const JOYSTICK_LOW: u16 = 300;

/// Loop and effect timings, all in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    pub asteroid_interval: Millis,
    /// Tenths of a millisecond shaved off the asteroid interval per point.
    pub asteroid_speedup_tenths: u32,
    pub min_asteroid_interval: Millis,
    pub projectile_interval: Millis,
    pub joystick_interval: Millis,
    pub shoot_tone: Millis,
    pub explosion_frame: Millis,
    pub game_over_frame: Millis,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            asteroid_interval: 500,
            asteroid_speedup_tenths: 18,
            min_asteroid_interval: 50,
            projectile_interval: 500,
            joystick_interval: 50,
            shoot_tone: 100,
            explosion_frame: 10,
            game_over_frame: 100,
        }
    }
}

impl Tuning {
    /// Asteroid fall interval for the given score, never below the floor.
    pub fn asteroid_interval_for(&self, score: u32) -> Millis {
        let shaved = score.saturating_mul(self.asteroid_speedup_tenths) / 10;
        self.asteroid_interval
            .saturating_sub(shaved)
            .max(self.min_asteroid_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asteroid_interval_shrinks_with_score() {
        let t = Tuning::default();
        assert_eq!(t.asteroid_interval_for(0), 500);
        assert_eq!(t.asteroid_interval_for(10), 482);
        assert_eq!(t.asteroid_interval_for(100), 320);
    }

    #[test]
    fn asteroid_interval_is_floored() {
        let t = Tuning::default();
        assert_eq!(t.asteroid_interval_for(250), 50);
        assert_eq!(t.asteroid_interval_for(u32::MAX), 50);
    }
}

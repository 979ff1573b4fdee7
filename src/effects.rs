//! Timed sound and animation sequences.
//!
//! Nothing here sleeps. Each sequence remembers when it last stepped and is
//! polled once per loop iteration; a step happens once enough time has
//! passed, however late the poll is.

use crate::colour::PixelColour;
use crate::config::{
    ALARM_TONES, CHIME_LEAD_IN, CHIME_TONES, HIT_TONE, SHOOT_TONE, SPAWN_CLEAR_ROWS, Tuning,
};
use crate::engine::{Cue, Engine};
use crate::hal::{Buzzer, Millis, PixelSink, elapsed};
use crate::position::Position;

const EXPLOSION_COLOURS: [PixelColour; 4] = [
    PixelColour::Orange,
    PixelColour::LightOrange,
    PixelColour::Orange,
    PixelColour::BACKGROUND,
];

/// Gap before alarm step `step` (1-based): a decaying sine, not a metronome.
pub fn alarm_delay(step: u8) -> Millis {
    libm::ceilf(300.0 - 200.0 * libm::sinf(step as f32 / 0.8)) as Millis
}

/// Gap before startup chime step `step` (1-based).
pub fn chime_delay(step: u8) -> Millis {
    libm::ceilf(250.0 - 200.0 * libm::sinf(step as f32 / 1.1)) as Millis
}

/// `next` is the 1-based step waiting to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sequence {
    Idle,
    Running { next: u8, since: Millis },
}

impl Sequence {
    fn is_running(self) -> bool {
        matches!(self, Self::Running { .. })
    }

    fn shift(&mut self, by: Millis) {
        if let Self::Running { since, .. } = self {
            *since = since.wrapping_add(by);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Explosion {
    Idle,
    Frame { at: Position, next: u8, since: Millis },
}

pub struct Effects {
    alarm: Sequence,
    chime: Sequence,
    explosion: Explosion,
    /// A tone is (or may be) sounding.
    buzzing: bool,
    last_tone: Millis,
    tone_hold: Millis,
    frame_time: Millis,
}

impl Effects {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            alarm: Sequence::Idle,
            chime: Sequence::Idle,
            explosion: Explosion::Idle,
            buzzing: false,
            last_tone: 0,
            tone_hold: tuning.shoot_tone,
            frame_time: tuning.explosion_frame,
        }
    }

    pub fn reset(&mut self) {
        self.alarm = Sequence::Idle;
        self.chime = Sequence::Idle;
        self.explosion = Explosion::Idle;
        self.buzzing = false;
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_running()
    }

    pub fn chime_active(&self) -> bool {
        self.chime.is_running()
    }

    pub fn explosion_active(&self) -> bool {
        matches!(self.explosion, Explosion::Frame { .. })
    }

    /// React to something the engine did.
    pub fn handle<B: Buzzer>(&mut self, cue: Cue, now: Millis, board: &mut B) {
        match cue {
            Cue::Shoot => self.blip(SHOOT_TONE, now, board),
            Cue::Hit => self.blip(HIT_TONE, now, board),
            Cue::Explosion(at) => self.start_explosion(at, now),
            Cue::BaseHit => self.start_alarm(now),
        }
    }

    /// (Re)start the base-hit alarm from its first step.
    pub fn start_alarm(&mut self, now: Millis) {
        self.alarm = Sequence::Running { next: 1, since: now };
    }

    /// Ignored while another explosion is still playing.
    pub fn start_explosion(&mut self, at: Position, now: Millis) {
        if self.explosion == Explosion::Idle {
            self.explosion = Explosion::Frame { at, next: 1, since: now };
        }
    }

    /// Round-start fanfare. Only starts if sound is on right now.
    pub fn start_chime<B: Buzzer>(&mut self, now: Millis, board: &mut B) {
        if board.audio_enabled() {
            self.play(CHIME_LEAD_IN, now, board);
            self.chime = Sequence::Running { next: 1, since: now };
        } else {
            self.chime = Sequence::Idle;
        }
    }

    pub fn service_chime<B: Buzzer>(&mut self, now: Millis, board: &mut B) {
        let Sequence::Running { next, since } = self.chime else {
            return;
        };
        if !board.audio_enabled() {
            self.chime = Sequence::Idle;
            return;
        }
        if elapsed(now, since) < chime_delay(next) {
            return;
        }
        self.play(CHIME_TONES[usize::from(next) - 1], now, board);
        self.chime = if usize::from(next) < CHIME_TONES.len() {
            Sequence::Running { next: next + 1, since: now }
        } else {
            Sequence::Idle
        };
    }

    pub fn service_alarm<B: Buzzer>(&mut self, now: Millis, board: &mut B) {
        let Sequence::Running { next, since } = self.alarm else {
            return;
        };
        if elapsed(now, since) < alarm_delay(next) {
            return;
        }
        // Muted steps still advance so the sequence ends on time.
        if board.audio_enabled() {
            self.play(ALARM_TONES[usize::from(next) - 1], now, board);
        }
        self.alarm = if usize::from(next) < ALARM_TONES.len() {
            Sequence::Running { next: next + 1, since: now }
        } else {
            Sequence::Idle
        };
    }

    /// Paint the next splash frame, then repair the entities it covered.
    pub fn service_explosion<B: PixelSink>(&mut self, now: Millis, engine: &Engine, board: &mut B) {
        let Explosion::Frame { at, next, since } = self.explosion else {
            return;
        };
        if elapsed(now, since) < self.frame_time {
            return;
        }

        splash(board, at, EXPLOSION_COLOURS[usize::from(next) - 1]);
        engine.redraw_projectiles(board);
        engine.redraw_asteroids(board);

        self.explosion = if usize::from(next) < EXPLOSION_COLOURS.len() {
            Explosion::Frame { at, next: next + 1, since: now }
        } else {
            Explosion::Idle
        };
    }

    /// Cut the buzzer once the last tone has had its time and no sequence
    /// owns it, or straight away if sound has been switched off.
    pub fn settle_tone<B: Buzzer>(&mut self, now: Millis, board: &mut B) {
        if !self.buzzing {
            return;
        }
        let muted = !board.audio_enabled();
        let expired = !self.alarm_active()
            && !self.chime_active()
            && elapsed(now, self.last_tone) >= self.tone_hold;
        if muted || expired {
            board.stop_tone();
            self.buzzing = false;
        }
    }

    pub fn silence<B: Buzzer>(&mut self, board: &mut B) {
        board.stop_tone();
        self.buzzing = false;
    }

    /// Push every pending deadline back, e.g. after a pause.
    pub fn shift(&mut self, by: Millis) {
        self.alarm.shift(by);
        self.chime.shift(by);
        if let Explosion::Frame { since, .. } = &mut self.explosion {
            *since = since.wrapping_add(by);
        }
        self.last_tone = self.last_tone.wrapping_add(by);
    }

    fn blip<B: Buzzer>(&mut self, hz: u16, now: Millis, board: &mut B) {
        if board.audio_enabled() {
            self.play(hz, now, board);
        }
    }

    fn play<B: Buzzer>(&mut self, hz: u16, now: Millis, board: &mut B) {
        board.play_tone(hz);
        self.buzzing = true;
        self.last_tone = now;
    }
}

/// Plus-shaped splash. The arm below is skipped when it would reach into
/// the base rows.
fn splash<B: PixelSink>(board: &mut B, at: Position, colour: PixelColour) {
    let arms = [(0, 0), (-1, 0), (1, 0), (0, 1)];
    for (dx, dy) in arms {
        if let Some(cell) = at.offset(dx, dy) {
            let (row, col) = cell.matrix_cell();
            board.set_pixel(row, col, colour);
        }
    }
    if at.y > SPAWN_CLEAR_ROWS {
        if let Some(cell) = at.down() {
            let (row, col) = cell.matrix_cell();
            board.set_pixel(row, col, colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBoard, Sound};
    use pretty_assertions::assert_eq;

    fn effects() -> Effects {
        Effects::new(&Tuning::default())
    }

    #[test]
    fn sequence_delays_follow_the_decaying_sine() {
        assert_eq!([1, 2, 3].map(alarm_delay), [111, 181, 415]);
        assert_eq!([1, 2, 3, 4].map(chime_delay), [93, 57, 170, 345]);
    }

    #[test]
    fn alarm_plays_three_descending_tones_then_idles() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.handle(Cue::BaseHit, 1000, &mut board);

        fx.service_alarm(1110, &mut board);
        assert!(board.tones().is_empty());
        fx.service_alarm(1111, &mut board);
        fx.service_alarm(1111 + 181, &mut board);
        fx.service_alarm(1111 + 181 + 415, &mut board);
        assert_eq!(board.tones(), [500, 350, 200]);
        assert!(!fx.alarm_active());
    }

    #[test]
    fn retriggered_alarm_starts_over() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.start_alarm(0);
        fx.service_alarm(200, &mut board);
        fx.start_alarm(250);
        fx.service_alarm(300, &mut board);
        assert_eq!(board.tones(), [500]);
        fx.service_alarm(361, &mut board);
        assert_eq!(board.tones(), [500, 500]);
    }

    #[test]
    fn muted_alarm_still_runs_out() {
        let mut board = MockBoard::new();
        board.audio = false;
        let mut fx = effects();
        fx.start_alarm(0);
        for now in (0..2000).step_by(10) {
            fx.service_alarm(now, &mut board);
        }
        assert!(board.sounds.is_empty());
        assert!(!fx.alarm_active());
    }

    #[test]
    fn chime_aborts_when_sound_is_switched_off() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.start_chime(0, &mut board);
        fx.service_chime(93, &mut board);
        assert_eq!(board.tones(), [500, 800]);

        board.audio = false;
        fx.service_chime(400, &mut board);
        assert!(!fx.chime_active());
        fx.settle_tone(400, &mut board);
        assert_eq!(board.sounds.last(), Some(&Sound::Stop));
    }

    #[test]
    fn full_chime_ascends() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.start_chime(0, &mut board);
        for now in 0..1000 {
            fx.service_chime(now, &mut board);
        }
        assert_eq!(board.tones(), [500, 800, 1500, 2000, 2500]);
        assert!(!fx.chime_active());
    }

    #[test]
    fn chime_needs_sound_at_round_start() {
        let mut board = MockBoard::new();
        board.audio = false;
        let mut fx = effects();
        fx.start_chime(0, &mut board);
        assert!(!fx.chime_active());
        assert!(board.sounds.is_empty());
    }

    #[test]
    fn shoot_tone_is_cut_after_hold_time() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.handle(Cue::Shoot, 50, &mut board);
        fx.settle_tone(149, &mut board);
        assert_eq!(board.sounds, [Sound::Play(3000)]);
        fx.settle_tone(150, &mut board);
        assert_eq!(board.sounds, [Sound::Play(3000), Sound::Stop]);
        fx.settle_tone(500, &mut board);
        assert_eq!(board.sounds.len(), 2);
    }

    #[test]
    fn alarm_keeps_the_buzzer() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.handle(Cue::Hit, 0, &mut board);
        fx.handle(Cue::BaseHit, 0, &mut board);
        fx.settle_tone(150, &mut board);
        assert_eq!(board.sounds, [Sound::Play(1200)]);
    }

    #[test]
    fn explosion_cycles_colours_and_repairs_entities() {
        let mut board = MockBoard::new();
        let engine = Engine::arranged(0, &[(4, 7)], &[]);
        let mut fx = effects();
        let at = Position::new(4, 6);
        fx.handle(Cue::Explosion(at), 0, &mut board);

        fx.service_explosion(9, &engine, &mut board);
        assert_eq!(board.pixel(at), PixelColour::BACKGROUND);

        fx.service_explosion(10, &engine, &mut board);
        assert_eq!(board.pixel(at), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(3, 6)), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(5, 6)), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(4, 5)), PixelColour::Orange);
        // The asteroid above is painted back over the splash.
        assert_eq!(board.pixel(Position::new(4, 7)), PixelColour::ASTEROID);

        fx.service_explosion(20, &engine, &mut board);
        assert_eq!(board.pixel(at), PixelColour::LightOrange);
        fx.service_explosion(30, &engine, &mut board);
        fx.service_explosion(40, &engine, &mut board);
        assert_eq!(board.pixel(at), PixelColour::BACKGROUND);
        assert_eq!(board.pixel(Position::new(4, 7)), PixelColour::ASTEROID);
        assert!(!fx.explosion_active());
    }

    #[test]
    fn second_explosion_is_dropped_while_one_plays() {
        let mut board = MockBoard::new();
        let engine = Engine::arranged(0, &[], &[]);
        let mut fx = effects();
        fx.start_explosion(Position::new(1, 10), 0);
        fx.start_explosion(Position::new(6, 10), 0);
        fx.service_explosion(10, &engine, &mut board);
        assert_eq!(board.pixel(Position::new(1, 10)), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(6, 10)), PixelColour::BACKGROUND);
    }

    #[test]
    fn low_splash_spares_the_base_rows() {
        let mut board = MockBoard::new();
        let engine = Engine::arranged(0, &[], &[]);
        let mut fx = effects();
        fx.start_explosion(Position::new(0, 2), 0);
        fx.service_explosion(10, &engine, &mut board);
        assert_eq!(board.pixel(Position::new(0, 2)), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(1, 2)), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(0, 3)), PixelColour::Orange);
        assert_eq!(board.pixel(Position::new(0, 1)), PixelColour::BACKGROUND);
    }

    #[test]
    fn shift_postpones_deadlines() {
        let mut board = MockBoard::new();
        let mut fx = effects();
        fx.start_alarm(0);
        fx.shift(1000);
        fx.service_alarm(500, &mut board);
        assert!(board.tones().is_empty());
        fx.service_alarm(1111, &mut board);
        assert_eq!(board.tones(), [500]);
    }
}

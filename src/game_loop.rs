//! The cooperative scheduler that runs a round.
//!
//! [`GameLoop::step`] is one pass: poll input, dispatch it, advance whatever
//! is due, feed the effects sequencer. Blocking frontends call
//! [`GameLoop::play_round`]; async ones call `step` and yield in between.

use crate::config::Tuning;
use crate::effects::Effects;
use crate::engine::Engine;
use crate::game_over::GameOverScreen;
use crate::hal::{Board, Millis, elapsed};
use crate::input::{Axis, Command, EscapeDecoder, Key};

/// Returned by [`GameLoop::play_round`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOver {
    pub score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Running,
    Paused { since: Millis },
}

pub struct GameLoop {
    engine: Engine,
    effects: Effects,
    tuning: Tuning,
    decoder: EscapeDecoder,
    axis: Axis,
    mode: Mode,
    last_asteroids: Millis,
    last_projectiles: Millis,
    last_joystick: Millis,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            engine: Engine::new(1),
            effects: Effects::new(&tuning),
            tuning,
            decoder: EscapeDecoder::new(),
            axis: Axis::X,
            mode: Mode::Running,
            last_asteroids: 0,
            last_projectiles: 0,
            last_joystick: 0,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    pub fn lives(&self) -> u8 {
        self.engine.lives()
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.mode, Mode::Paused { .. })
    }

    /// Fresh field, zero score, and any input that arrived between games
    /// thrown away.
    pub fn new_game<B: Board>(&mut self, board: &mut B) {
        self.engine.initialise(board);
        board.reset();
        board.render_status(0, self.engine.lives());

        while board.poll_button().is_some() {}
        while board.read_serial().is_some() {}
        self.decoder.reset();
        self.effects.reset();
        self.mode = Mode::Running;
        log::info!("new game");
    }

    /// Restart the timers and play the chime. `play_round` does this itself.
    pub fn start_round<B: Board>(&mut self, board: &mut B) {
        let now = board.now();
        self.last_asteroids = now;
        self.last_projectiles = now;
        self.last_joystick = now;
        self.axis = Axis::X;
        self.effects.start_chime(now, board);
    }

    /// Run until the last life is gone.
    pub fn play_round<B: Board>(&mut self, board: &mut B) -> GameOver {
        self.start_round(board);
        while self.step(board) != Status::GameOver {}

        let score = board.score();
        log::info!("game over, score {}", score);
        GameOver { score }
    }

    /// One pass of the loop.
    pub fn step<B: Board>(&mut self, board: &mut B) -> Status {
        if let Mode::Paused { since } = self.mode {
            return self.step_paused(since, board);
        }

        let now = board.now();
        self.effects.service_chime(now, board);

        match self.poll_command(board) {
            Some(Command::Pause) => {
                self.mode = Mode::Paused { since: now };
                self.effects.silence(board);
                log::info!("paused");
                return Status::Paused;
            }
            Some(command) => self.dispatch(command, board),
            None => {}
        }

        let now = board.now();
        let score = board.score();
        if !self.is_game_over()
            && elapsed(now, self.last_asteroids) >= self.tuning.asteroid_interval_for(score)
        {
            self.engine.advance_asteroids(board);
            self.last_asteroids = now;
        }

        if !self.is_game_over()
            && elapsed(now, self.last_projectiles) >= self.tuning.projectile_interval
        {
            self.engine.advance_projectiles(board);
            self.last_projectiles = now;
        }

        if !self.is_game_over() && elapsed(now, self.last_joystick) >= self.tuning.joystick_interval {
            let sample = board.sample_axis(self.axis);
            if let Some(command) = Command::from_joystick(self.axis, sample) {
                self.dispatch(command, board);
            }
            self.axis = self.axis.other();
            self.last_joystick = now;
        }

        while let Some(cue) = self.engine.take_cue() {
            self.effects.handle(cue, now, board);
        }

        if !self.is_game_over() {
            self.effects.service_alarm(now, board);
            self.effects.service_explosion(now, &self.engine, board);
        }
        self.effects.settle_tone(now, board);

        if self.is_game_over() {
            Status::GameOver
        } else {
            Status::Running
        }
    }

    /// Show the game-over readout and sweep the matrix until a button is
    /// pressed.
    pub fn game_over_screen<B: Board>(&mut self, board: &mut B) {
        let mut screen = self.begin_game_over(board);
        while !self.game_over_step(&mut screen, board) {}
    }

    pub fn begin_game_over<B: Board>(&mut self, board: &mut B) -> GameOverScreen {
        let now = board.now();
        let score = board.score();
        board.render_game_over(score);
        self.effects.start_alarm(now);
        GameOverScreen::new(now, self.tuning.game_over_frame)
    }

    /// One pass of the game-over screen; `true` once a button was pressed.
    pub fn game_over_step<B: Board>(&mut self, screen: &mut GameOverScreen, board: &mut B) -> bool {
        if board.poll_button().is_some() {
            self.effects.silence(board);
            return true;
        }
        let now = board.now();
        self.effects.service_alarm(now, board);
        self.effects.settle_tone(now, board);
        screen.service(now, board);
        false
    }

    /// Buttons win over serial; serial bytes go through the escape decoder.
    fn poll_command<B: Board>(&mut self, board: &mut B) -> Option<Command> {
        if let Some(button) = board.poll_button() {
            return Command::from_button(button);
        }
        let byte = board.read_serial()?;
        self.decoder.feed(byte).and_then(Key::command)
    }

    fn dispatch<B: Board>(&mut self, command: Command, board: &mut B) {
        match command {
            Command::Move(direction) => {
                self.engine.move_base(direction, board);
            }
            Command::Fire => {
                self.engine.fire_projectile(board);
            }
            Command::Pause => {}
        }
    }

    /// Only the pause key is read while paused. Buttons stay latched for
    /// when play resumes.
    fn step_paused<B: Board>(&mut self, since: Millis, board: &mut B) -> Status {
        if !board.read_serial().map(Key::Char).is_some_and(Key::is_pause) {
            return Status::Paused;
        }

        let paused_for = elapsed(board.now(), since);
        self.last_asteroids = self.last_asteroids.wrapping_add(paused_for);
        self.last_projectiles = self.last_projectiles.wrapping_add(paused_for);
        self.last_joystick = self.last_joystick.wrapping_add(paused_for);
        self.effects.shift(paused_for);
        self.mode = Mode::Running;
        log::info!("resumed after {} ms", paused_for);
        Status::Running
    }
}

#[cfg(test)]
impl GameLoop {
    pub(crate) fn with_engine(engine: Engine) -> Self {
        Self {
            engine,
            ..Self::new()
        }
    }
}

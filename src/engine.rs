//! Entity state and collision rules.
//!
//! The engine owns the base, the asteroid and projectile bags and the life
//! counter. Score lives on the board ([`Scoreboard`]). Every state change is
//! mirrored straight onto the [`PixelSink`]; sounds and animations are left
//! as [`Cue`]s for the effects sequencer to pick up.

use heapless::{Deque, Vec};

use crate::colour::PixelColour;
use crate::config::{
    BASE_START_X, FIELD_HEIGHT, FIELD_WIDTH, FIRING_ROW, HIT_POINTS, MAX_ASTEROIDS,
    MAX_PROJECTILES, SPAWN_CLEAR_ROWS, START_LIVES,
};
use crate::hal::{Clock, PixelSink, Scoreboard, StatusReadout};
use crate::input::Direction;
use crate::position::Position;
use crate::rng::Rng;

const TOP_ROW: u8 = FIELD_HEIGHT - 1;
const CUE_QUEUE_LEN: usize = 16;
const SEED_SALT: u32 = 0x9E37_79B9;

/// Something the engine wants heard or seen beyond a pixel write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shoot,
    Hit,
    Explosion(Position),
    BaseHit,
}

pub struct Engine {
    base_x: u8,
    asteroids: Vec<Position, MAX_ASTEROIDS>,
    projectiles: Vec<Position, MAX_PROJECTILES>,
    lives: u8,
    rng: Rng,
    cues: Deque<Cue, CUE_QUEUE_LEN>,
}

impl Engine {
    /// An empty field. Call [`Engine::initialise`] before playing.
    pub fn new(seed: u32) -> Self {
        Self {
            base_x: BASE_START_X,
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            lives: START_LIVES,
            rng: Rng::new(seed),
            cues: Deque::new(),
        }
    }

    /// Fresh field: centred base, no projectiles, full lives and a full bag
    /// of asteroids above the bottom rows.
    pub fn initialise<B: Clock + PixelSink>(&mut self, board: &mut B) {
        self.rng = Rng::new(board.now() ^ SEED_SALT);
        self.base_x = BASE_START_X;
        self.lives = START_LIVES;
        self.projectiles.clear();
        self.asteroids.clear();
        self.cues.clear();

        while !self.asteroids.is_full() {
            let x = self.rng.below(FIELD_WIDTH);
            let y = SPAWN_CLEAR_ROWS + self.rng.below(FIELD_HEIGHT - SPAWN_CLEAR_ROWS);
            let pos = Position::new(x, y);
            if self.asteroid_at(pos).is_none() && self.asteroids.push(pos).is_err() {
                break;
            }
        }

        self.redraw_all(board);
    }

    pub fn base_x(&self) -> u8 {
        self.base_x
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.lives < 1
    }

    pub fn asteroids(&self) -> &[Position] {
        &self.asteroids
    }

    pub fn projectiles(&self) -> &[Position] {
        &self.projectiles
    }

    pub fn asteroid_at(&self, pos: Position) -> Option<usize> {
        self.asteroids.iter().position(|a| *a == pos)
    }

    pub fn projectile_at(&self, pos: Position) -> Option<usize> {
        self.projectiles.iter().position(|p| *p == pos)
    }

    /// Oldest pending cue, if any.
    pub fn take_cue(&mut self) -> Option<Cue> {
        self.cues.pop_front()
    }

    /// Slide the base one column. Asteroids sitting on the two cells the
    /// base is about to ram are destroyed and each costs a life.
    pub fn move_base<B>(&mut self, direction: Direction, board: &mut B) -> bool
    where
        B: PixelSink + Scoreboard + StatusReadout,
    {
        let step: i16 = match direction {
            Direction::Left => -1,
            Direction::Right => 1,
        };
        let center = self.base_x as i16;
        let target = center + step;
        if !(0..FIELD_WIDTH as i16).contains(&target) {
            return false;
        }

        let rams = [
            Position::checked(center + 2 * step, 0),
            Position::checked(center + step, 1),
        ];
        for ram in rams.into_iter().flatten() {
            if let Some(index) = self.asteroid_at(ram) {
                self.remove_asteroid(index, board);
                self.base_hit();
                self.regenerate_asteroid(board);
            }
        }

        self.draw_base(board, PixelColour::BACKGROUND);
        self.base_x = target as u8;
        self.draw_base(board, PixelColour::BASE);
        self.refresh_status(board);
        true
    }

    /// Launch a projectile from the turret. An asteroid already on the
    /// firing cell is destroyed point-blank instead.
    pub fn fire_projectile<B>(&mut self, board: &mut B) -> bool
    where
        B: PixelSink + Scoreboard + StatusReadout,
    {
        let muzzle = Position::new(self.base_x, FIRING_ROW);
        if self.projectiles.is_full() || self.projectile_at(muzzle).is_some() {
            return false;
        }

        if let Some(index) = self.asteroid_at(muzzle) {
            self.remove_asteroid(index, board);
            self.credit_hit(muzzle, board);
            self.regenerate_asteroid(board);
            return true;
        }

        if self.projectiles.push(muzzle).is_err() {
            return false;
        }
        self.cue(Cue::Shoot);
        paint(board, muzzle, PixelColour::PROJECTILE);
        true
    }

    /// Drop every asteroid one row, resolving projectile and base contact.
    ///
    /// Cells are visited column by column, bottom to top. Asteroids that wrap
    /// or regenerate into a column not yet visited fall again in the same
    /// pass.
    pub fn advance_asteroids<B>(&mut self, board: &mut B)
    where
        B: PixelSink + Scoreboard + StatusReadout,
    {
        for x in 0..FIELD_WIDTH {
            for y in 0..FIELD_HEIGHT {
                let here = Position::new(x, y);
                let Some(index) = self.asteroid_at(here) else {
                    continue;
                };
                self.remove_asteroid(index, board);

                let below = here.down();
                let struck = self
                    .projectile_at(here)
                    .or_else(|| below.and_then(|b| self.projectile_at(b)));

                if let Some(projectile) = struck {
                    self.remove_projectile(projectile, board);
                    self.credit_hit(here, board);
                    self.regenerate_asteroid(board);
                } else if self.base_covers(here) || below.is_some_and(|b| self.base_covers(b)) {
                    self.base_hit();
                    self.regenerate_asteroid(board);
                } else {
                    let next = below
                        .or_else(|| self.free_column(TOP_ROW).map(|x| Position::new(x, TOP_ROW)));
                    match next {
                        // Cannot overflow: this asteroid's slot was just freed.
                        Some(next) => {
                            if self.asteroids.push(next).is_ok() {
                                paint(board, next, PixelColour::ASTEROID);
                            }
                        }
                        None => log::warn!("asteroid at ({}, {}) could not wrap", x, y),
                    }
                }
            }
        }
        self.draw_base(board, PixelColour::BASE);
    }

    /// Lift every projectile one row, oldest first.
    pub fn advance_projectiles<B>(&mut self, board: &mut B)
    where
        B: PixelSink + Scoreboard + StatusReadout,
    {
        let mut index = 0;
        while index < self.projectiles.len() {
            let from = self.projectiles[index];
            let Some(to) = from.up() else {
                // Removal shifts the next projectile into `index`.
                self.remove_projectile(index, board);
                continue;
            };

            if let Some(hit) = self.asteroid_at(to) {
                self.remove_projectile(index, board);
                self.remove_asteroid(hit, board);
                self.credit_hit(to, board);
                self.regenerate_asteroid(board);
                continue;
            }

            paint(board, from, PixelColour::BACKGROUND);
            self.projectiles[index] = to;
            paint(board, to, PixelColour::PROJECTILE);
            index += 1;
        }
    }

    /// Spawn one asteroid on the top row and refresh the readout.
    pub fn regenerate_asteroid<B>(&mut self, board: &mut B)
    where
        B: PixelSink + Scoreboard + StatusReadout,
    {
        self.refresh_status(board);

        if self.asteroids.is_full() {
            log::warn!("asteroid bag full, skipping regeneration");
            return;
        }
        let Some(x) = self.free_column(TOP_ROW) else {
            log::warn!("top row full, skipping regeneration");
            return;
        };
        let pos = Position::new(x, TOP_ROW);
        if self.asteroids.push(pos).is_ok() {
            paint(board, pos, PixelColour::ASTEROID);
        }
    }

    pub fn redraw_all<B: PixelSink>(&self, board: &mut B) {
        board.clear();
        self.draw_base(board, PixelColour::BASE);
        self.redraw_asteroids(board);
        self.redraw_projectiles(board);
    }

    pub fn redraw_asteroids<B: PixelSink>(&self, board: &mut B) {
        for a in &self.asteroids {
            paint(board, *a, PixelColour::ASTEROID);
        }
    }

    pub fn redraw_projectiles<B: PixelSink>(&self, board: &mut B) {
        for p in &self.projectiles {
            paint(board, *p, PixelColour::PROJECTILE);
        }
    }

    /// True for the three bottom-row cells and the turret cell.
    pub fn base_covers(&self, pos: Position) -> bool {
        let dx = pos.x as i16 - self.base_x as i16;
        match pos.y {
            0 => dx.abs() <= 1,
            1 => dx == 0,
            _ => false,
        }
    }

    fn draw_base<B: PixelSink>(&self, board: &mut B, colour: PixelColour) {
        let center = self.base_x as i16;
        for x in center - 1..=center + 1 {
            if let Some(pos) = Position::checked(x, 0) {
                paint(board, pos, colour);
            }
        }
        paint(board, Position::new(self.base_x, 1), colour);
    }

    fn refresh_status<B: Scoreboard + StatusReadout>(&self, board: &mut B) {
        let score = board.score();
        board.render_status(score, self.lives);
    }

    /// A random column that has no asteroid in `row`, or `None` if the row
    /// is full.
    fn free_column(&mut self, row: u8) -> Option<u8> {
        let any_free = (0..FIELD_WIDTH).any(|x| self.asteroid_at(Position::new(x, row)).is_none());
        if !any_free {
            return None;
        }
        loop {
            let x = self.rng.below(FIELD_WIDTH);
            if self.asteroid_at(Position::new(x, row)).is_none() {
                return Some(x);
            }
        }
    }

    fn remove_asteroid<B: PixelSink>(&mut self, index: usize, board: &mut B) {
        if index >= self.asteroids.len() {
            return;
        }
        paint(board, self.asteroids[index], PixelColour::BACKGROUND);
        self.asteroids.swap_remove(index);
    }

    fn remove_projectile<B: PixelSink>(&mut self, index: usize, board: &mut B) {
        if index >= self.projectiles.len() {
            return;
        }
        let pos = self.projectiles.remove(index);
        paint(board, pos, PixelColour::BACKGROUND);
        // A fresh asteroid may have spawned onto the projectile's cell.
        if self.asteroid_at(pos).is_some() {
            paint(board, pos, PixelColour::ASTEROID);
        }
    }

    fn credit_hit<B: Scoreboard>(&mut self, at: Position, board: &mut B) {
        board.add(HIT_POINTS);
        log::debug!("asteroid destroyed at ({}, {}), score {}", at.x, at.y, board.score());
        self.cue(Cue::Hit);
        self.cue(Cue::Explosion(at));
    }

    fn base_hit(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("base hit, {} lives left", self.lives);
        self.cue(Cue::BaseHit);
    }

    fn cue(&mut self, cue: Cue) {
        if self.cues.push_back(cue).is_err() {
            log::warn!("cue queue full, dropping {:?}", cue);
        }
    }
}

fn paint<B: PixelSink>(board: &mut B, pos: Position, colour: PixelColour) {
    let (row, col) = pos.matrix_cell();
    board.set_pixel(row, col, colour);
}

#[cfg(test)]
impl Engine {
    /// Hand-placed field for scenario tests.
    pub(crate) fn arranged(base_x: u8, asteroids: &[(u8, u8)], projectiles: &[(u8, u8)]) -> Self {
        let mut engine = Self::new(0xC0FF_EE00);
        engine.base_x = base_x;
        for (x, y) in asteroids {
            engine.asteroids.push(Position::new(*x, *y)).unwrap();
        }
        for (x, y) in projectiles {
            engine.projectiles.push(Position::new(*x, *y)).unwrap();
        }
        engine
    }

    pub(crate) fn set_lives(&mut self, lives: u8) {
        self.lives = lives;
    }

    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        assert!(self.base_x < FIELD_WIDTH);
        assert!(self.lives <= START_LIVES);
        let asteroids: HashSet<_> = self.asteroids.iter().collect();
        assert_eq!(asteroids.len(), self.asteroids.len(), "asteroids overlap");
        let projectiles: HashSet<_> = self.projectiles.iter().collect();
        assert_eq!(projectiles.len(), self.projectiles.len(), "projectiles overlap");
    }

    pub(crate) fn drain_cues(&mut self) -> std::vec::Vec<Cue> {
        core::iter::from_fn(|| self.take_cue()).collect()
    }
}

//! One play session: the Playing/GameOver state machine and everything it
//! owns.
//!
//! Input arrives as [`Signal`]s that are queued and applied between frames,
//! so a jump is a single velocity assignment that never lands half way
//! through a physics step, and a restart has fully reset the session before
//! the next frame runs.

use crate::body::{Body, Contact};
use crate::config::{Surface, Tuning};
use crate::engine::{self, Scoring};
use crate::obstacles::ObstacleStream;
use crate::render;
use crate::scheduler::Scheduler;
use crate::storage::BestScoreStore;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Abstract player input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Jump key.
    Jump,
    /// Click or tap at surface pixel coordinates.
    Pointer { x: f64, y: f64 },
    /// Restart key; only meaningful after a game over.
    Restart,
}

/// Things that happened, for sound and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flapped,
    Scored(u32),
    SpeedUp,
    Crashed { score: u32, new_best: bool },
    Restarted,
}

pub struct Session {
    surface: Surface,
    tuning: Tuning,
    frame_period: Duration,
    pub body: Body,
    pub obstacles: ObstacleStream,
    scoring: Scoring,
    phase: Phase,
    scheduler: Scheduler,
    /// Total distance scrolled this run, for ground texture.
    distance: f64,
    pending: VecDeque<Signal>,
    events: Vec<GameEvent>,
    store: Box<dyn BestScoreStore>,
    rng: StdRng,
    redraw: bool,
}

impl Session {
    /// Start playing immediately: the first frame is due at `now`.
    pub fn new(
        surface: Surface,
        frame_period: Duration,
        store: Box<dyn BestScoreStore>,
        rng: StdRng,
        now: Instant,
    ) -> Self {
        let tuning = Tuning::for_surface(surface);
        let best = match store.get_best_score() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Best score unavailable, starting from 0: {}", e);
                0
            }
        };
        let mut scheduler = Scheduler::new();
        scheduler.arm_spawn(now, tuning.spawn_period);
        scheduler.request_frame(now, Duration::ZERO);
        Self {
            surface,
            tuning,
            frame_period,
            body: Body::new(&tuning, surface),
            obstacles: ObstacleStream::new(),
            scoring: Scoring::new(&tuning, best),
            phase: Phase::Playing,
            scheduler,
            distance: 0.0,
            pending: VecDeque::new(),
            events: Vec::new(),
            store,
            rng,
            redraw: true,
        }
    }

    /// Queue input for the next [`pump`](Self::pump).
    pub fn push_signal(&mut self, signal: Signal) {
        self.pending.push_back(signal);
    }

    /// Apply queued input, then service whichever timers are due. Returns
    /// true if a frame ran.
    pub fn pump(&mut self, now: Instant) -> bool {
        while let Some(signal) = self.pending.pop_front() {
            self.apply(signal, now);
        }
        if self.scheduler.spawn_fired(now) {
            self.try_spawn();
        }
        if self.scheduler.take_frame(now) {
            self.frame(now);
            return true;
        }
        false
    }

    /// Interpret one signal against the current phase.
    pub fn apply(&mut self, signal: Signal, now: Instant) {
        match (self.phase, signal) {
            (Phase::Playing, Signal::Jump) => self.flap(),
            // Clicks on the hidden restart control's spot do nothing
            (Phase::Playing, Signal::Pointer { x, y }) => {
                if !self.on_restart_button(x, y) {
                    self.flap();
                }
            }
            (Phase::GameOver, Signal::Pointer { x, y }) => {
                if self.on_restart_button(x, y) {
                    self.restart(now);
                }
            }
            (Phase::GameOver, Signal::Restart) => self.restart(now),
            _ => {}
        }
    }

    fn flap(&mut self) {
        self.body.jump();
        self.events.push(GameEvent::Flapped);
    }

    fn on_restart_button(&self, x: f64, y: f64) -> bool {
        render::restart_button(self.surface, &self.tuning).contains(x, y)
    }

    /// Add one obstacle at the right edge. No-op after a game over.
    pub fn try_spawn(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.obstacles.spawn(&mut self.rng, &self.tuning, self.surface);
        true
    }

    /// One update step. Re-arms the next frame only if still playing.
    pub fn frame(&mut self, now: Instant) {
        if self.phase != Phase::Playing {
            return;
        }

        self.body.integrate();
        if self.body.clamp(self.tuning.ground_line(self.surface)) == Contact::Ground {
            self.end_game();
            return;
        }

        let speed = self.scoring.speed;
        let dropped = self.obstacles.advance(speed, self.tuning.pipe_width);
        if dropped > 0 {
            log::debug!("Dropped {} offscreen obstacle(s)", dropped);
        }
        self.distance += speed;

        let eval = engine::evaluate(
            &self.body,
            &mut self.obstacles,
            &mut self.scoring,
            &self.tuning,
        );
        if eval.points > 0 {
            log::debug!("Score {}", self.scoring.score);
            self.events.push(GameEvent::Scored(self.scoring.score));
        }
        for _ in 0..eval.speed_ups {
            log::debug!("Scroll speed now {:.2}", self.scoring.speed);
            self.events.push(GameEvent::SpeedUp);
        }
        if eval.collided {
            self.end_game();
            return;
        }

        self.scheduler.request_frame(now, self.frame_period);
    }

    /// Enter GameOver. Idempotent.
    pub fn end_game(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        self.scheduler.cancel_all();

        let new_best = self.scoring.finish();
        if new_best {
            log::info!("New best score {}", self.scoring.best);
            if let Err(e) = self.store.set_best_score(self.scoring.best) {
                log::warn!("Could not save best score: {}", e);
            }
        }
        log::info!("Game over with score {}", self.scoring.score);
        self.events.push(GameEvent::Crashed {
            score: self.scoring.score,
            new_best,
        });
        self.redraw = true;
    }

    /// Fresh run: timers are cancelled before anything else is reset, then
    /// re-armed last.
    pub fn restart(&mut self, now: Instant) {
        self.scheduler.cancel_all();
        self.body.reset(self.surface);
        self.obstacles.clear();
        self.scoring.reset();
        self.distance = 0.0;
        self.phase = Phase::Playing;
        self.scheduler.arm_spawn(now, self.tuning.spawn_period);
        self.scheduler.request_frame(now, Duration::ZERO);
        log::info!("Restarted");
        self.events.push(GameEvent::Restarted);
        self.redraw = true;
    }

    /// Adopt a new surface size, scaling the live state by the height ratio.
    pub fn resize(&mut self, surface: Surface) {
        if surface == self.surface {
            return;
        }
        let k = if self.surface.height > 0.0 {
            surface.height / self.surface.height
        } else {
            1.0
        };
        self.surface = surface;
        self.tuning = Tuning::for_surface(surface);
        self.body.rescale(&self.tuning, k);
        self.body.clamp(self.tuning.ground_line(surface));
        self.obstacles.rescale(k, &self.tuning, surface);
        self.scoring.rescale(&self.tuning, k);
        self.distance *= k;
        log::debug!("Resized to {}x{}", surface.width, surface.height);
        self.redraw = true;
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True once after anything that needs a render outside the frame loop.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.scoring.score
    }

    pub fn best_score(&self) -> u32 {
        self.scoring.best
    }

    pub fn speed(&self) -> f64 {
        self.scoring.speed
    }

    pub fn base_speed(&self) -> f64 {
        self.scoring.base_speed()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

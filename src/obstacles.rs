//! Scrolling gap obstacles.

use crate::config::{Surface, Tuning};
use rand::Rng;

/// A top/bottom barrier pair with a passable gap between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    /// Bottom of the top barrier.
    pub gap_top: f64,
    /// Bottom barrier height, measured from `gap_top + gap`.
    pub bottom_height: f64,
    /// Set once the body has passed this obstacle.
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f64, gap_top: f64, gap: f64, surface: Surface) -> Self {
        Self {
            x,
            gap_top,
            bottom_height: surface.height - gap_top - gap,
            scored: false,
        }
    }

    pub fn right(&self, pipe_width: f64) -> f64 {
        self.x + pipe_width
    }

    /// Top edge of the bottom barrier.
    pub fn gap_bottom(&self, gap: f64) -> f64 {
        self.gap_top + gap
    }
}

/// The live obstacle collection, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    /// Scored obstacles that have since scrolled away.
    retired_scored: u32,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an obstacle at the right edge with a random gap position.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning, surface: Surface) -> Obstacle {
        let (lo, hi) = tuning.gap_top_range(surface);
        let gap_top = rng.gen_range(lo..=hi);
        log::debug!("Spawning obstacle with gap top {:.1}", gap_top);
        let obstacle = Obstacle::new(surface.width, gap_top, tuning.gap, surface);
        self.push(obstacle);
        obstacle
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Scroll every obstacle left by `speed` and drop the ones whose right
    /// edge has left the playfield. Returns how many were dropped.
    pub fn advance(&mut self, speed: f64, pipe_width: f64) -> usize {
        for o in &mut self.obstacles {
            o.x -= speed;
        }
        let before = self.obstacles.len();
        let mut retired_scored = 0;
        self.obstacles.retain(|o| {
            let keep = o.right(pipe_width) >= 0.0;
            if !keep && o.scored {
                retired_scored += 1;
            }
            keep
        });
        self.retired_scored += retired_scored;
        before - self.obstacles.len()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.retired_scored = 0;
    }

    /// Every obstacle ever marked scored since the last clear, live or not.
    pub fn scored_total(&self) -> u32 {
        self.retired_scored + self.obstacles.iter().filter(|o| o.scored).count() as u32
    }

    /// Rescale positions by `k` after a resize.
    pub fn rescale(&mut self, k: f64, tuning: &Tuning, surface: Surface) {
        for o in &mut self.obstacles {
            let scored = o.scored;
            *o = Obstacle::new(o.x * k, o.gap_top * k, tuning.gap, surface);
            o.scored = scored;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

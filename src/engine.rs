//! Collision detection, scoring and the difficulty ramp.

use crate::body::Body;
use crate::config::Tuning;
use crate::obstacles::{Obstacle, ObstacleStream};

pub fn overlaps_horizontally(body: &Body, o: &Obstacle, pipe_width: f64) -> bool {
    body.x < o.right(pipe_width) && body.right() > o.x
}

/// Body above the gap, or below the bottom barrier's far edge.
pub fn violates_vertically(body: &Body, o: &Obstacle, gap: f64) -> bool {
    body.y < o.gap_top || body.bottom() > o.gap_bottom(gap) + o.bottom_height
}

pub fn collides(body: &Body, o: &Obstacle, tuning: &Tuning) -> bool {
    overlaps_horizontally(body, o, tuning.pipe_width) && violates_vertically(body, o, tuning.gap)
}

/// The obstacle's right edge is behind the body's left edge.
pub fn has_passed(body: &Body, o: &Obstacle, pipe_width: f64) -> bool {
    o.right(pipe_width) < body.x
}

/// Result of awarding one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Award {
    Point,
    /// The point landed on a multiple of `speed_up_every`.
    SpeedUp,
}

/// Score, best score and scroll speed for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoring {
    pub score: u32,
    pub best: u32,
    pub speed: f64,
    base_speed: f64,
    step: f64,
    every: u32,
}

impl Scoring {
    pub fn new(tuning: &Tuning, best: u32) -> Self {
        Self {
            score: 0,
            best,
            speed: tuning.base_speed,
            base_speed: tuning.base_speed,
            step: tuning.speed_step,
            every: tuning.speed_up_every,
        }
    }

    pub fn award(&mut self) -> Award {
        self.score += 1;
        if self.score % self.every == 0 {
            self.speed += self.step;
            Award::SpeedUp
        } else {
            Award::Point
        }
    }

    /// Fold the run's score into the best. Returns true on a new best.
    pub fn finish(&mut self) -> bool {
        if self.score > self.best {
            self.best = self.score;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.speed = self.base_speed;
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    /// Adopt a new tuning after a resize, scaling the live speed by `k`.
    pub fn rescale(&mut self, tuning: &Tuning, k: f64) {
        self.speed *= k;
        self.base_speed = tuning.base_speed;
        self.step = tuning.speed_step;
    }
}

/// What one evaluation pass found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub points: u32,
    pub speed_ups: u32,
    pub collided: bool,
}

/// Check the body against every live obstacle, scoring the ones it has
/// passed. Scoring still runs on a colliding frame.
pub fn evaluate(
    body: &Body,
    stream: &mut ObstacleStream,
    scoring: &mut Scoring,
    tuning: &Tuning,
) -> Evaluation {
    let mut eval = Evaluation::default();
    for o in stream.iter_mut() {
        if collides(body, o, tuning) {
            eval.collided = true;
        }
        if !o.scored && has_passed(body, o, tuning.pipe_width) {
            o.scored = true;
            eval.points += 1;
            if scoring.award() == Award::SpeedUp {
                eval.speed_ups += 1;
            }
        }
    }
    eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Surface;

    fn surface() -> Surface {
        Surface::new(800.0, 400.0)
    }

    fn body_at(y: f64) -> Body {
        let mut b = Body::new(&Tuning::reference(), surface());
        b.y = y;
        b
    }

    #[test]
    fn test_body_above_gap_collides() {
        let tuning = Tuning::reference();
        let o = Obstacle::new(40.0, 50.0, tuning.gap, surface());
        assert!((o.bottom_height - 200.0).abs() < f64::EPSILON);
        let b = body_at(45.0);
        assert!(overlaps_horizontally(&b, &o, tuning.pipe_width));
        assert!(violates_vertically(&b, &o, tuning.gap));
        assert!(collides(&b, &o, &tuning));
    }

    #[test]
    fn test_body_inside_gap_clear() {
        let tuning = Tuning::reference();
        let o = Obstacle::new(40.0, 50.0, tuning.gap, surface());
        assert!(!collides(&body_at(100.0), &o, &tuning));
    }

    #[test]
    fn test_no_horizontal_overlap_clear() {
        let tuning = Tuning::reference();
        // Body spans x 50..70
        let ahead = Obstacle::new(70.0, 50.0, tuning.gap, surface());
        let behind = Obstacle::new(10.0, 50.0, tuning.gap, surface());
        let b = body_at(0.0);
        assert!(!collides(&b, &ahead, &tuning));
        assert!(!collides(&b, &behind, &tuning));
        let touching = Obstacle::new(69.0, 50.0, tuning.gap, surface());
        assert!(collides(&b, &touching, &tuning));
    }

    #[test]
    fn test_below_far_edge_of_bottom_barrier() {
        let tuning = Tuning::reference();
        let o = Obstacle::new(40.0, 50.0, tuning.gap, surface());
        // Far edge is at 50 + 150 + 200 = 400
        assert!(!violates_vertically(&body_at(380.0), &o, tuning.gap));
        assert!(violates_vertically(&body_at(381.0), &o, tuning.gap));
    }

    #[test]
    fn test_has_passed_strictly_behind() {
        let b = body_at(100.0);
        let o = Obstacle::new(10.0, 50.0, 150.0, surface());
        assert!(!has_passed(&b, &o, 40.0));
        let o = Obstacle::new(9.9, 50.0, 150.0, surface());
        assert!(has_passed(&b, &o, 40.0));
    }

    #[test]
    fn test_speed_up_every_fifth_point() {
        let tuning = Tuning::reference();
        let mut s = Scoring::new(&tuning, 0);
        for _ in 0..4 {
            assert_eq!(s.award(), Award::Point);
        }
        assert_eq!(s.award(), Award::SpeedUp);
        assert!((s.speed - 2.5).abs() < f64::EPSILON);
        for _ in 0..4 {
            s.award();
        }
        assert_eq!(s.award(), Award::SpeedUp);
        assert_eq!(s.score, 10);
        assert!((s.speed - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_finish_only_raises_best() {
        let tuning = Tuning::reference();
        let mut s = Scoring::new(&tuning, 7);
        s.score = 3;
        assert!(!s.finish());
        assert_eq!(s.best, 7);
        s.score = 9;
        assert!(s.finish());
        assert_eq!(s.best, 9);
    }

    #[test]
    fn test_reset_keeps_best() {
        let tuning = Tuning::reference();
        let mut s = Scoring::new(&tuning, 4);
        for _ in 0..6 {
            s.award();
        }
        s.finish();
        s.reset();
        assert_eq!(s.score, 0);
        assert_eq!(s.best, 6);
        assert!((s.speed - tuning.base_speed).abs() < f64::EPSILON);
    }

    #[test]
    fn test_evaluate_scores_each_obstacle_once() {
        let tuning = Tuning::reference();
        let mut stream = ObstacleStream::new();
        stream.push(Obstacle::new(0.0, 150.0, tuning.gap, surface()));
        stream.push(Obstacle::new(5.0, 150.0, tuning.gap, surface()));
        let mut scoring = Scoring::new(&tuning, 0);
        let b = body_at(200.0);

        let first = evaluate(&b, &mut stream, &mut scoring, &tuning);
        assert_eq!(first.points, 2);
        assert!(!first.collided);

        let second = evaluate(&b, &mut stream, &mut scoring, &tuning);
        assert_eq!(second.points, 0);
        assert_eq!(scoring.score, 2);
        assert_eq!(stream.scored_total(), 2);
    }

    #[test]
    fn test_evaluate_reports_collision() {
        let tuning = Tuning::reference();
        let mut stream = ObstacleStream::new();
        stream.push(Obstacle::new(40.0, 50.0, tuning.gap, surface()));
        let mut scoring = Scoring::new(&tuning, 0);
        let eval = evaluate(&body_at(45.0), &mut stream, &mut scoring, &tuning);
        assert!(eval.collided);
        assert_eq!(eval.points, 0);
    }
}

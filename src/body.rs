//! The falling, player-controlled block.

use crate::config::{Surface, Tuning};

/// Which playfield boundary the body touched after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Stopped at the top edge. Harmless.
    Ceiling,
    /// Resting on the ground band. Ends the run.
    Ground,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Positive is downward.
    pub velocity: f64,
    pub gravity: f64,
    pub lift: f64,
    pub max_fall: f64,
}

impl Body {
    /// A body at rest, vertically centered on `surface`.
    pub fn new(tuning: &Tuning, surface: Surface) -> Self {
        Self {
            x: tuning.body_x,
            y: surface.center_y(),
            width: tuning.body_width,
            height: tuning.body_height,
            velocity: 0.0,
            gravity: tuning.gravity,
            lift: tuning.lift,
            max_fall: tuning.max_fall,
        }
    }

    /// One frame of gravity. Velocity is capped before it moves the body.
    pub fn integrate(&mut self) {
        self.velocity += self.gravity;
        self.velocity = self.velocity.min(self.max_fall);
        self.y += self.velocity;
    }

    /// Overwrites velocity with the lift impulse; never additive.
    pub fn jump(&mut self) {
        self.velocity = self.lift;
    }

    /// Keep the body inside `[0, ground_line - height]`.
    pub fn clamp(&mut self, ground_line: f64) -> Contact {
        if self.y + self.height >= ground_line {
            self.y = ground_line - self.height;
            Contact::Ground
        } else if self.y <= 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
            Contact::Ceiling
        } else {
            Contact::None
        }
    }

    /// Back to the vertical center, at rest.
    pub fn reset(&mut self, surface: Surface) {
        self.y = surface.center_y();
        self.velocity = 0.0;
    }

    /// Adopt a new tuning after a resize, scaling the live position and
    /// velocity by `k`.
    pub fn rescale(&mut self, tuning: &Tuning, k: f64) {
        let y = self.y * k;
        let velocity = (self.velocity * k).min(tuning.max_fall);
        *self = Self {
            y,
            velocity,
            ..Self::new(tuning, Surface::new(0.0, 0.0))
        };
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::new(800.0, 400.0)
    }

    fn body() -> Body {
        Body::new(&Tuning::reference(), surface())
    }

    #[test]
    fn test_new_body_centered_at_rest() {
        let b = body();
        assert!((b.y - 200.0).abs() < f64::EPSILON);
        assert!((b.x - 50.0).abs() < f64::EPSILON);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut b = body();
        b.integrate();
        assert!((b.velocity - 0.5).abs() < f64::EPSILON);
        assert!((b.y - 200.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_velocity_capped_before_moving() {
        let mut b = body();
        b.velocity = 9.8;
        b.integrate();
        assert!((b.velocity - 10.0).abs() < f64::EPSILON);
        assert!((b.y - 210.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jump_overwrites_velocity() {
        let mut b = body();
        b.velocity = 7.0;
        b.jump();
        assert!((b.velocity - (-10.0)).abs() < f64::EPSILON);
        // Jumping again while rising resets rather than compounds
        b.integrate();
        b.jump();
        assert!((b.velocity - (-10.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ceiling_clamp_zeroes_velocity() {
        let mut b = body();
        b.y = 3.0;
        b.velocity = -10.0;
        b.integrate();
        assert_eq!(b.clamp(350.0), Contact::Ceiling);
        assert_eq!(b.y, 0.0);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_ground_contact_rests_on_ground() {
        let mut b = body();
        b.y = 335.0;
        b.velocity = 10.0;
        b.integrate();
        assert_eq!(b.clamp(350.0), Contact::Ground);
        assert!((b.y - 330.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_free_flight_no_contact() {
        let mut b = body();
        b.integrate();
        assert_eq!(b.clamp(350.0), Contact::None);
    }

    #[test]
    fn test_reset_restores_center() {
        let mut b = body();
        b.y = 12.0;
        b.velocity = 4.0;
        b.reset(surface());
        assert!((b.y - 200.0).abs() < f64::EPSILON);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_rescale_keeps_relative_position() {
        let mut b = body();
        b.y = 100.0;
        b.velocity = 4.0;
        let half = Tuning::for_surface(Surface::new(400.0, 200.0));
        b.rescale(&half, 0.5);
        assert!((b.y - 50.0).abs() < f64::EPSILON);
        assert!((b.velocity - 2.0).abs() < f64::EPSILON);
        assert!((b.height - 10.0).abs() < f64::EPSILON);
        assert!((b.gravity - 0.25).abs() < f64::EPSILON);
    }
}

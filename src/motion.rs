//! Needle motion model.
//!
//! A fixed-step integrator advanced once per rendered frame. While the gauge is
//! not accelerating the needle falls back with a deceleration that grows by
//! `DECELERATION_STEP` every frame; while accelerating, whatever acceleration
//! exists decays by `ACCELERATION_DECAY` per frame.
//!
//! Both regime switches reset acceleration to zero, so the accelerating branch
//! only ever decays zero. That is the observed behavior of the gauge and is
//! kept as is.

/// Multiplier applied to the acceleration on each accelerating frame.
pub const ACCELERATION_DECAY: f64 = 0.05;
/// Amount subtracted from the acceleration on each coasting frame.
pub const DECELERATION_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub speed: f64,
    pub acceleration: f64,
    pub is_accelerating: bool,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn start_accelerating(&mut self) {
        self.set_accelerating(true);
    }

    pub fn end_accelerating(&mut self) {
        self.set_accelerating(false);
    }

    fn set_accelerating(&mut self, accelerating: bool) {
        self.is_accelerating = accelerating;
        self.acceleration = 0.0;
    }

    /// Advances one frame and returns the new, unclamped speed.
    pub fn step(&mut self) -> f64 {
        if self.is_accelerating {
            self.acceleration *= ACCELERATION_DECAY;
        } else {
            self.acceleration -= DECELERATION_STEP;
        }
        self.speed += self.acceleration;
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_at_rest() {
        let state = MotionState::new();
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.acceleration, 0.0);
        assert!(!state.is_accelerating);
    }

    #[test]
    fn test_accelerating_step_leaves_speed_unchanged() {
        let mut state = MotionState::new();
        state.set_speed(42.0);
        state.start_accelerating();
        state.step();
        assert_eq!(state.acceleration, 0.0);
        assert_eq!(state.speed, 42.0);
    }

    #[test]
    fn test_coasting_matches_closed_form() {
        let mut state = MotionState::new();
        state.set_speed(120.0);
        state.end_accelerating();
        let n = 10;
        for _ in 0..n {
            state.step();
        }
        let n = n as f64;
        assert_eq!(state.acceleration, -0.5 * n);
        assert!((state.speed - (120.0 - 0.25 * n * (n + 1.0))).abs() < 1e-9);
    }

    #[test]
    fn test_regime_switch_resets_acceleration() {
        let mut state = MotionState::new();
        for _ in 0..4 {
            state.step();
        }
        assert_eq!(state.acceleration, -2.0);

        state.start_accelerating();
        assert_eq!(state.acceleration, 0.0);

        state.acceleration = 8.0;
        state.end_accelerating();
        assert_eq!(state.acceleration, 0.0);
    }

    #[test]
    fn test_accelerating_decays_existing_acceleration() {
        let mut state = MotionState::new();
        state.start_accelerating();
        state.acceleration = 10.0;
        state.step();
        assert!((state.acceleration - 0.5).abs() < 1e-12);
        assert!((state.speed - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_speed_goes_negative_when_coasting_from_rest() {
        let mut state = MotionState::new();
        assert_eq!(state.step(), -0.5);
        assert_eq!(state.step(), -1.5);
    }
}

//! Slingshot shot input: press on the cue ball, pull back, release.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shot tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    /// Power at full draw.
    pub max_power: f32,
    /// Drag length that reaches full power. `None` means a fifth of the
    /// canvas width.
    pub max_aim_length: Option<f32>,
    /// Impulse per unit of power.
    pub force_scale: f32,
    /// Hard cap on the impulse, so a full-power ball cannot tunnel through a
    /// cushion.
    pub max_force: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            max_power: 10.0,
            max_aim_length: None,
            force_scale: 600.0,
            max_force: 5000.0,
        }
    }
}

impl ShotConfig {
    pub fn aim_length(&self, canvas_width: f32) -> f32 {
        self.max_aim_length.unwrap_or(canvas_width / 5.0)
    }
}

/// Map a drag length onto `[0, max_power]`, saturating at `max_len`.
pub fn shot_power(drag_distance: f32, max_len: f32, max_power: f32) -> f32 {
    if max_len <= 0.0 {
        return if drag_distance > 0.0 { max_power } else { 0.0 };
    }
    (drag_distance / max_len * max_power).clamp(0.0, max_power)
}

/// A released shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Unit vector the cue ball is sent along.
    pub direction: Vec2,
    pub power: f32,
    /// Impulse to apply at the cue ball's centre.
    pub impulse: Vec2,
}

/// Aim line shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AimLine {
    pub start: Vec2,
    pub end: Vec2,
    pub power: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ShotState {
    Idle,
    Dragging { start: Vec2 },
}

/// Idle → Dragging on a press over the cue ball, back to Idle on release.
#[derive(Debug, Clone)]
pub struct ShotController {
    state: ShotState,
    pointer: Vec2,
    config: ShotConfig,
    max_len: f32,
}

impl ShotController {
    pub fn new(config: ShotConfig, canvas_width: f32) -> Self {
        Self {
            state: ShotState::Idle,
            pointer: Vec2::ZERO,
            config,
            max_len: config.aim_length(canvas_width),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ShotState::Dragging { .. })
    }

    /// Begin a drag if the press lands strictly inside the cue ball.
    /// `cue` is the cue ball's centre and radius, `None` when it is off the
    /// table.
    pub fn press(&mut self, at: Vec2, cue: Option<(Vec2, f32)>) -> bool {
        let Some((centre, radius)) = cue else {
            return false;
        };
        if self.is_dragging() || at.distance(centre) >= radius {
            return false;
        }
        self.state = ShotState::Dragging { start: at };
        self.pointer = at;
        true
    }

    pub fn pointer_moved(&mut self, at: Vec2) {
        self.pointer = at;
    }

    /// Finish the drag. The ball goes from the release point towards where
    /// the drag started.
    pub fn release(&mut self, at: Vec2) -> Option<Shot> {
        let ShotState::Dragging { start } = self.state else {
            return None;
        };
        self.state = ShotState::Idle;
        self.pointer = at;

        let pull = start - at;
        let direction = pull.normalize_or_zero();
        if direction == Vec2::ZERO {
            log::warn!("released on the drag start, no shot");
            return None;
        }
        let power = shot_power(pull.length(), self.max_len, self.config.max_power);
        let magnitude = (power * self.config.force_scale).min(self.config.max_force);
        log::debug!("shot power {:.2}, impulse {:.1}", power, magnitude);
        Some(Shot {
            direction,
            power,
            impulse: direction * magnitude,
        })
    }

    /// Abandon the drag without shooting.
    pub fn cancel(&mut self) {
        self.state = ShotState::Idle;
    }

    pub fn aim(&self) -> Option<AimLine> {
        let ShotState::Dragging { start } = self.state else {
            return None;
        };
        Some(AimLine {
            start,
            end: self.pointer,
            power: shot_power(start.distance(self.pointer), self.max_len, self.config.max_power),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller() -> ShotController {
        ShotController::new(ShotConfig::default(), 800.0)
    }

    const CUE: Option<(Vec2, f32)> = Some((Vec2::new(100.0, 100.0), 5.0));

    #[test]
    fn press_must_land_on_the_cue_ball() {
        let mut shot = controller();
        assert!(!shot.press(Vec2::new(110.0, 100.0), CUE));
        assert!(!shot.press(Vec2::new(100.0, 100.0), None));
        assert!(shot.press(Vec2::new(102.0, 100.0), CUE));
        assert!(shot.is_dragging());
        assert!(!shot.press(Vec2::new(101.0, 100.0), CUE));
    }

    #[test]
    fn release_shoots_away_from_the_pull() {
        let mut shot = controller();
        shot.press(Vec2::new(100.0, 100.0), CUE);
        let s = shot.release(Vec2::new(60.0, 100.0)).unwrap();
        assert_eq!(s.direction, Vec2::X);
        assert!((s.power - 2.5).abs() < 1e-4);
        assert!((s.impulse.x - 2.5 * 600.0).abs() < 1e-2);
        assert!(!shot.is_dragging());
    }

    #[test]
    fn impulse_is_capped() {
        let mut shot = controller();
        shot.press(Vec2::new(100.0, 100.0), CUE);
        let s = shot.release(Vec2::new(100.0, 900.0)).unwrap();
        assert_eq!(s.power, 10.0);
        assert!((s.impulse.length() - 5000.0).abs() < 1e-2);
        assert!(s.impulse.y < 0.0);
    }

    #[test]
    fn release_without_drag_does_nothing() {
        let mut shot = controller();
        assert!(shot.release(Vec2::new(1.0, 1.0)).is_none());
        shot.press(Vec2::new(100.0, 100.0), CUE);
        assert!(shot.release(Vec2::new(100.0, 100.0)).is_none());
        assert!(!shot.is_dragging());
    }

    #[test]
    fn aim_follows_pointer_and_cancel_drops_it() {
        let mut shot = controller();
        assert!(shot.aim().is_none());
        shot.press(Vec2::new(100.0, 100.0), CUE);
        shot.pointer_moved(Vec2::new(100.0, 260.0));
        let aim = shot.aim().unwrap();
        assert_eq!(aim.end, Vec2::new(100.0, 260.0));
        assert_eq!(aim.power, 10.0);
        shot.cancel();
        assert!(shot.aim().is_none());
        assert!(shot.release(Vec2::ZERO).is_none());
    }

    proptest! {
        #[test]
        fn power_is_monotone_and_bounded(a in 0.0f32..400.0, b in 0.0f32..400.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = shot_power(lo, 160.0, 10.0);
            let p_hi = shot_power(hi, 160.0, 10.0);
            prop_assert!(p_lo <= p_hi);
            prop_assert!((0.0..=10.0).contains(&p_lo));
            prop_assert!((0.0..=10.0).contains(&p_hi));
        }

        #[test]
        fn power_saturates_past_max_length(extra in 0.0f32..10_000.0) {
            prop_assert_eq!(shot_power(160.0 + extra, 160.0, 10.0), 10.0);
        }
    }
}

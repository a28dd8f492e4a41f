use serde::{Deserialize, Serialize};

use crate::core::geometry::TableConfig;
use crate::core::physics::Material;
use crate::error::SessionError;
use crate::rules::shot::ShotConfig;

/// How long things stay on screen, and how often holes open. Seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fault_notice_secs: f64,
    pub lost_ball_notice_secs: f64,
    pub collision_notice_secs: f64,
    pub hole_interval_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fault_notice_secs: 2.0,
            lost_ball_notice_secs: 2.0,
            collision_notice_secs: 2.0,
            hole_interval_secs: 5.0,
        }
    }
}

/// Everything tunable about a session. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub table: TableConfig,
    pub shot: ShotConfig,
    pub timing: TimingConfig,
    /// Most hazard holes open at once.
    pub hole_capacity: usize,
    /// Random draws allowed per ball or hole before giving up.
    pub placement_attempts: u32,
    /// Simulation step, seconds.
    pub fixed_dt: f32,
    pub ball_material: Material,
    pub cushion_material: Material,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            shot: ShotConfig::default(),
            timing: TimingConfig::default(),
            hole_capacity: 10,
            placement_attempts: 1000,
            fixed_dt: 1.0 / 60.0,
            ball_material: Material::ball(),
            cushion_material: Material::cushion(),
        }
    }
}

impl GameSettings {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(GameSettings::from_json("{}").unwrap(), GameSettings::default());
    }

    #[test]
    fn partial_override() {
        let s = GameSettings::from_json(
            r#"{ "hole_capacity": 4, "timing": { "hole_interval_secs": 1.5 },
                 "ball_material": { "restitution": 0.8, "friction": 0.0, "density": 0.1 } }"#,
        )
        .unwrap();
        assert_eq!(s.hole_capacity, 4);
        assert_eq!(s.timing.hole_interval_secs, 1.5);
        assert_eq!(s.timing.fault_notice_secs, 2.0);
        assert_eq!(s.ball_material.restitution, 0.8);
        assert_eq!(s.ball_material.linear_damping, 0.0);
        assert_eq!(s.placement_attempts, 1000);
    }

    #[test]
    fn bad_json_is_a_settings_error() {
        let err = GameSettings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SessionError::Settings(_)));
    }
}

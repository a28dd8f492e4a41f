//! What the renderer reads each frame.
//!
//! Balls are packed as [`BallInstance`] (8 floats each) so the host can read
//! them straight out of linear memory. Everything else travels as JSON.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::api::session::GameMode;
pub use crate::core::notice::NoticeView;
use crate::rules::holes::Hole;
use crate::rules::shot::AimLine;

/// One ball, ready for drawing.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct BallInstance {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub radius: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// See [`crate::balls::BallRole::code`].
    pub role: f32,
}

impl BallInstance {
    pub const FLOATS: usize = 8;
}

/// Everything but the balls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub mode: GameMode,
    pub instructions_shown: bool,
    pub cue_placed: bool,
    pub cue_pocketed: bool,
    pub holes: Vec<Hole>,
    pub notices: Vec<NoticeView>,
    pub aim: Option<AimLine>,
    pub fault_streak: u32,
    pub reds_left: usize,
    pub time: f64,
}

/// A full frame. The cue ball, when present, is the last ball.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub status: SessionStatus,
    pub balls: Vec<BallInstance>,
}

impl FrameSnapshot {
    /// The ball instances as a flat float slice.
    pub fn ball_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.balls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_eight_floats() {
        assert_eq!(std::mem::size_of::<BallInstance>(), BallInstance::FLOATS * 4);
    }

    #[test]
    fn floats_follow_field_order() {
        let snap = FrameSnapshot {
            status: SessionStatus {
                mode: GameMode::Standard,
                instructions_shown: false,
                cue_placed: false,
                cue_pocketed: false,
                holes: Vec::new(),
                notices: Vec::new(),
                aim: None,
                fault_streak: 0,
                reds_left: 15,
                time: 0.0,
            },
            balls: vec![BallInstance {
                x: 1.0,
                y: 2.0,
                angle: 3.0,
                radius: 4.0,
                r: 5.0,
                g: 6.0,
                b: 7.0,
                role: 8.0,
            }],
        };
        assert_eq!(snap.ball_floats(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let json = serde_json::to_string(&snap.status).unwrap();
        assert!(json.contains(r#""mode":"Standard""#));
        assert!(json.contains(r#""reds_left":15"#));
    }
}

//! Timed on-screen notices.
//!
//! A notice is a payload plus the simulated time at which it disappears.
//! The session sweeps the board once per tick; nothing is scheduled.

use serde::Serialize;

use crate::core::physics::BodyRole;

/// A payload that is visible until `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice<T> {
    pub payload: T,
    pub expires_at: f64,
}

impl<T> Notice<T> {
    pub fn new(payload: T, now: f64, duration: f64) -> Self {
        Self {
            payload,
            expires_at: now + duration,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.expires_at <= now
    }
}

fn sweep_slot<T>(slot: &mut Option<Notice<T>>, now: f64) {
    if slot.as_ref().is_some_and(|n| n.is_expired(now)) {
        *slot = None;
    }
}

/// What the cue ball just touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CueContact {
    Red,
    Color,
    Cushion,
}

impl CueContact {
    /// Classify the body the cue ball touched. Another cue ball is not a
    /// contact worth reporting.
    pub fn from_role(role: BodyRole) -> Option<Self> {
        match role {
            BodyRole::RedBall => Some(CueContact::Red),
            BodyRole::ColorBall => Some(CueContact::Color),
            BodyRole::Cushion => Some(CueContact::Cushion),
            BodyRole::CueBall => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            CueContact::Red => "cueball-red",
            CueContact::Color => "cueball-color",
            CueContact::Cushion => "cueball-cushion",
        }
    }
}

pub const FAULT_TEXT: &str = "Fault, two consecutive colored balls potted";
pub const LOST_BALL_TEXT: &str = "You lost the ball :(";

/// An active notice as shown on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeView {
    pub kind: &'static str,
    pub text: &'static str,
    pub expires_at: f64,
}

impl NoticeView {
    fn new<T>(kind: &'static str, text: &'static str, notice: &Notice<T>) -> Self {
        Self {
            kind,
            text,
            expires_at: notice.expires_at,
        }
    }
}

/// The three notice slots the game shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoticeBoard {
    pub fault: Option<Notice<()>>,
    pub lost_ball: Option<Notice<()>>,
    pub collision: Option<Notice<CueContact>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise (or restart) the fault notice.
    pub fn raise_fault(&mut self, now: f64, duration: f64) {
        self.fault = Some(Notice::new((), now, duration));
    }

    pub fn raise_lost_ball(&mut self, now: f64, duration: f64) {
        self.lost_ball = Some(Notice::new((), now, duration));
    }

    pub fn raise_collision(&mut self, contact: CueContact, now: f64, duration: f64) {
        self.collision = Some(Notice::new(contact, now, duration));
    }

    /// Drop every notice whose time is up.
    pub fn sweep(&mut self, now: f64) {
        sweep_slot(&mut self.fault, now);
        sweep_slot(&mut self.lost_ball, now);
        sweep_slot(&mut self.collision, now);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The notices currently visible, fault first.
    pub fn views(&self) -> Vec<NoticeView> {
        let mut out = Vec::with_capacity(3);
        if let Some(n) = &self.fault {
            out.push(NoticeView::new("fault", FAULT_TEXT, n));
        }
        if let Some(n) = &self.lost_ball {
            out.push(NoticeView::new("lost_ball", LOST_BALL_TEXT, n));
        }
        if let Some(n) = &self.collision {
            out.push(NoticeView::new("collision", n.payload.text(), n));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_clears_only_expired() {
        let mut board = NoticeBoard::new();
        board.raise_fault(0.0, 2.0);
        board.raise_lost_ball(1.0, 2.0);
        board.sweep(1.5);
        assert!(board.fault.is_some());
        board.sweep(2.0);
        assert!(board.fault.is_none());
        assert!(board.lost_ball.is_some());
        board.sweep(3.0);
        assert!(board.lost_ball.is_none());
    }

    #[test]
    fn raising_again_restarts_expiry() {
        let mut board = NoticeBoard::new();
        board.raise_collision(CueContact::Red, 0.0, 2.0);
        board.raise_collision(CueContact::Cushion, 1.5, 2.0);
        board.sweep(2.5);
        let n = board.collision.as_ref().unwrap();
        assert_eq!(n.payload, CueContact::Cushion);
        assert_eq!(n.expires_at, 3.5);
    }

    #[test]
    fn views_follow_active_slots() {
        let mut board = NoticeBoard::new();
        assert!(board.views().is_empty());
        board.raise_fault(0.0, 1.0);
        board.raise_collision(CueContact::Color, 0.5, 1.0);
        let views = board.views();
        let texts: Vec<_> = views.iter().map(|v| v.text).collect();
        assert_eq!(texts, vec![FAULT_TEXT, "cueball-color"]);
        assert_eq!(views[0].kind, "fault");
        assert_eq!(views[1].expires_at, 1.5);
    }

    #[test]
    fn contact_classification() {
        assert_eq!(CueContact::from_role(BodyRole::RedBall), Some(CueContact::Red));
        assert_eq!(CueContact::from_role(BodyRole::Cushion), Some(CueContact::Cushion));
        assert_eq!(CueContact::from_role(BodyRole::CueBall), None);
    }
}

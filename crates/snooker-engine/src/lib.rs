pub mod api;
pub mod balls;
pub mod bridge;
pub mod core;
pub mod error;
pub mod input;
pub mod rules;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::session::{GameMode, Session};
pub use api::settings::{GameSettings, TimingConfig};
pub use balls::{Ball, BallId, BallRegistry, BallRole, SnookerColor};
pub use bridge::snapshot::{BallInstance, FrameSnapshot, NoticeView, SessionStatus};
pub use core::geometry::{PocketId, TableConfig, TableGeometry};
pub use core::notice::{CueContact, Notice, NoticeBoard};
pub use core::physics::{
    BodyHandle, BodyRole, CollisionPair, HeadlessWorld, Material, PhysicsAdapter, TaggedBody,
};
pub use core::time::FrameClock;
pub use error::{LayoutError, PhysicsError, SessionError};
pub use input::queue::{InputEvent, InputQueue, MenuSignal};
pub use rules::holes::{Hole, HoleScheduler};
pub use rules::layout::LayoutKind;
pub use rules::pocketing::{FaultTracker, PotEvent};
pub use rules::shot::{AimLine, Shot, ShotConfig, ShotController};

#[cfg(feature = "physics")]
pub use core::rapier::RapierWorld;

//! Classifies what the cue ball runs into.

use crate::core::notice::CueContact;
use crate::core::physics::{BodyRole, CollisionPair};

/// The last contact the cue ball started this step, if any.
///
/// Ended contacts and pairs without the cue ball are ignored.
pub fn latest_cue_contact(pairs: &[CollisionPair]) -> Option<CueContact> {
    pairs
        .iter()
        .filter(|pair| pair.started)
        .filter_map(|pair| pair.other_than(BodyRole::CueBall))
        .filter_map(|other| CueContact::from_role(other.role))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::{BodyHandle, TaggedBody};

    fn body(id: u32, role: BodyRole) -> TaggedBody {
        TaggedBody {
            handle: BodyHandle(id),
            role,
        }
    }

    fn pair(a: TaggedBody, b: TaggedBody, started: bool) -> CollisionPair {
        CollisionPair { a, b, started }
    }

    #[test]
    fn ignores_pairs_without_the_cue_ball() {
        let pairs = [pair(body(1, BodyRole::RedBall), body(2, BodyRole::ColorBall), true)];
        assert_eq!(latest_cue_contact(&pairs), None);
    }

    #[test]
    fn either_side_can_be_the_cue_ball() {
        let cue = body(0, BodyRole::CueBall);
        let red = body(1, BodyRole::RedBall);
        let cushion = body(9, BodyRole::Cushion);
        assert_eq!(latest_cue_contact(&[pair(red, cue, true)]), Some(CueContact::Red));
        assert_eq!(latest_cue_contact(&[pair(cue, cushion, true)]), Some(CueContact::Cushion));
    }

    #[test]
    fn last_started_contact_wins() {
        let cue = body(0, BodyRole::CueBall);
        let pairs = [
            pair(cue, body(1, BodyRole::RedBall), true),
            pair(cue, body(2, BodyRole::ColorBall), true),
            pair(cue, body(9, BodyRole::Cushion), false),
        ];
        assert_eq!(latest_cue_contact(&pairs), Some(CueContact::Color));
    }
}

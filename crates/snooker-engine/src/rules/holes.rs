//! Hazard holes for extreme mode.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::core::geometry::TableGeometry;
use crate::rules::layout::sample_free_spot;

/// A transient opening that swallows any ball whose centre enters it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hole {
    pub position: Vec2,
    pub radius: f32,
}

/// Spawns a hole every `interval` seconds and keeps at most `capacity` of
/// them, dropping the oldest first.
#[derive(Debug, Clone)]
pub struct HoleScheduler {
    holes: VecDeque<Hole>,
    capacity: usize,
    interval: f64,
    next_spawn_at: Option<f64>,
}

impl HoleScheduler {
    pub fn new(capacity: usize, interval: f64) -> Self {
        Self {
            holes: VecDeque::with_capacity(capacity),
            capacity,
            interval,
            next_spawn_at: None,
        }
    }

    /// Drop every hole and schedule the first one `interval` from `now`.
    pub fn start(&mut self, now: f64) {
        self.holes.clear();
        self.next_spawn_at = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.holes.clear();
        self.next_spawn_at = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_spawn_at.is_some()
    }

    /// Spawn a hole if one is due. Returns the new hole.
    ///
    /// When no free spot turns up within `max_attempts` draws the spawn is
    /// skipped and the timer restarts anyway.
    pub fn tick<R: Rng>(
        &mut self,
        now: f64,
        rng: &mut R,
        geometry: &TableGeometry,
        max_attempts: u32,
    ) -> Option<Hole> {
        let due = self.next_spawn_at?;
        if now < due {
            return None;
        }
        self.next_spawn_at = Some(now + self.interval);

        let radius = geometry.pocket_radius;
        let taken: Vec<Vec2> = self.holes.iter().map(|h| h.position).collect();
        let Some(position) =
            sample_free_spot(rng, geometry.hole_rect(), &taken, radius * 2.0, max_attempts)
        else {
            log::warn!("no room for a new hole after {} attempts", max_attempts);
            return None;
        };

        let hole = Hole { position, radius };
        self.push(hole);
        log::info!("hole opened at ({:.0}, {:.0})", position.x, position.y);
        Some(hole)
    }

    fn push(&mut self, hole: Hole) {
        if self.capacity == 0 {
            return;
        }
        while self.holes.len() >= self.capacity {
            self.holes.pop_front();
        }
        self.holes.push_back(hole);
    }

    /// Holes, oldest first.
    pub fn holes(&self) -> impl Iterator<Item = &Hole> {
        self.holes.iter()
    }

    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn inactive_until_started() {
        let geo = TableGeometry::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut holes = HoleScheduler::new(10, 5.0);
        assert!(holes.tick(100.0, &mut rng, &geo, 1000).is_none());
        assert!(!holes.is_active());
    }

    #[test]
    fn first_hole_after_one_interval() {
        let geo = TableGeometry::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut holes = HoleScheduler::new(10, 5.0);
        holes.start(1.0);
        assert!(holes.tick(5.9, &mut rng, &geo, 1000).is_none());
        let hole = holes.tick(6.0, &mut rng, &geo, 1000).unwrap();
        assert_eq!(hole.radius, geo.pocket_radius);
        assert!(geo.hole_rect().contains(hole.position));
        assert!(holes.tick(10.9, &mut rng, &geo, 1000).is_none());
        assert!(holes.tick(11.0, &mut rng, &geo, 1000).is_some());
    }

    #[test]
    fn keeps_the_ten_most_recent() {
        let geo = TableGeometry::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut holes = HoleScheduler::new(10, 5.0);
        holes.start(0.0);

        let mut spawned = Vec::new();
        for i in 1..=14 {
            if let Some(h) = holes.tick(i as f64 * 5.0, &mut rng, &geo, 1000) {
                spawned.push(h);
            }
            assert!(holes.len() <= 10);
        }
        assert_eq!(spawned.len(), 14);
        let kept: Vec<Hole> = holes.holes().copied().collect();
        assert_eq!(kept, spawned[4..].to_vec());
    }

    #[test]
    fn holes_never_overlap() {
        let geo = TableGeometry::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut holes = HoleScheduler::new(10, 1.0);
        holes.start(0.0);
        for i in 1..=10 {
            holes.tick(i as f64, &mut rng, &geo, 1000);
        }
        let all: Vec<Hole> = holes.holes().copied().collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.position.distance(b.position) >= a.radius + b.radius);
            }
        }
    }

    #[test]
    fn stop_clears_holes() {
        let geo = TableGeometry::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut holes = HoleScheduler::new(10, 1.0);
        holes.start(0.0);
        holes.tick(1.0, &mut rng, &geo, 1000);
        assert_eq!(holes.len(), 1);
        holes.stop();
        assert!(holes.is_empty());
        assert!(!holes.is_active());
    }
}

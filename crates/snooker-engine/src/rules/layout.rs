//! Initial ball arrangements for each game mode.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::balls::{BallRegistry, BallRole, SnookerColor};
use crate::core::geometry::{Rect, TableGeometry};
use crate::core::physics::PhysicsAdapter;
use crate::error::LayoutError;

/// Which arrangement to rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutKind {
    /// Triangle of reds, colours on their spots.
    Standard,
    /// Reds scattered, colours on their spots.
    AllRandom,
    /// Reds and colours scattered.
    RandomReds,
    /// Standard rack with half-size balls.
    Extreme,
}

impl LayoutKind {
    /// Radius of every ball racked by this layout.
    pub fn ball_radius(self, geometry: &TableGeometry) -> f32 {
        match self {
            LayoutKind::Extreme => geometry.ball_radius / 2.0,
            _ => geometry.ball_radius,
        }
    }
}

/// Draw uniform points in `area` until one is at least `min_dist` from every
/// point in `taken`. Gives up after `max_attempts` draws.
pub fn sample_free_spot<R: Rng>(
    rng: &mut R,
    area: Rect,
    taken: &[Vec2],
    min_dist: f32,
    max_attempts: u32,
) -> Option<Vec2> {
    if area.is_empty() {
        return None;
    }
    (0..max_attempts).find_map(|_| {
        let p = Vec2::new(
            rng.random_range(area.min.x..area.max.x),
            rng.random_range(area.min.y..area.max.y),
        );
        taken.iter().all(|q| q.distance(p) >= min_dist).then_some(p)
    })
}

/// Clear the registry and rack `kind`.
///
/// On failure the registry is left empty.
pub fn build_layout<P, R>(
    kind: LayoutKind,
    registry: &mut BallRegistry,
    physics: &mut P,
    geometry: &TableGeometry,
    rng: &mut R,
    max_attempts: u32,
) -> Result<(), LayoutError>
where
    P: PhysicsAdapter + ?Sized,
    R: Rng,
{
    registry.clear(physics);
    let result = rack(kind, registry, physics, geometry, rng, max_attempts);
    if result.is_err() {
        registry.clear(physics);
    }
    result
}

fn rack<P, R>(
    kind: LayoutKind,
    registry: &mut BallRegistry,
    physics: &mut P,
    geometry: &TableGeometry,
    rng: &mut R,
    max_attempts: u32,
) -> Result<(), LayoutError>
where
    P: PhysicsAdapter + ?Sized,
    R: Rng,
{
    let radius = kind.ball_radius(geometry);
    let spots: Vec<(SnookerColor, Vec2)> = SnookerColor::ALL
        .iter()
        .map(|c| (*c, geometry.color_spot(*c)))
        .collect();

    match kind {
        LayoutKind::Standard | LayoutKind::Extreme => {
            for p in geometry.rack_positions() {
                registry.spawn(physics, p, radius, BallRole::Red)?;
            }
            for (color, p) in spots {
                registry.spawn(physics, p, radius, BallRole::Color(color))?;
            }
        }
        LayoutKind::AllRandom => {
            // Reds keep clear of the spots the colours are about to take.
            let mut taken: Vec<Vec2> = spots.iter().map(|(_, p)| *p).collect();
            scatter(registry, physics, geometry, rng, max_attempts, &mut taken, BallRole::Red, 15)?;
            for (color, p) in spots {
                registry.spawn(physics, p, radius, BallRole::Color(color))?;
            }
        }
        LayoutKind::RandomReds => {
            let mut taken = Vec::with_capacity(21);
            scatter(registry, physics, geometry, rng, max_attempts, &mut taken, BallRole::Red, 15)?;
            for color in SnookerColor::ALL {
                scatter(
                    registry,
                    physics,
                    geometry,
                    rng,
                    max_attempts,
                    &mut taken,
                    BallRole::Color(color),
                    1,
                )?;
            }
        }
    }

    log::info!("racked {:?}: {} balls", kind, registry.len());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn scatter<P, R>(
    registry: &mut BallRegistry,
    physics: &mut P,
    geometry: &TableGeometry,
    rng: &mut R,
    max_attempts: u32,
    taken: &mut Vec<Vec2>,
    role: BallRole,
    count: usize,
) -> Result<(), LayoutError>
where
    P: PhysicsAdapter + ?Sized,
    R: Rng,
{
    let area = geometry.playable_rect();
    for _ in 0..count {
        let p = sample_free_spot(rng, area, taken, geometry.ball_diameter, max_attempts).ok_or(
            LayoutError::NoSpace {
                role,
                placed: registry.len(),
                attempts: max_attempts,
            },
        )?;
        registry.spawn(physics, p, geometry.ball_radius, role)?;
        taken.push(p);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::TableConfig;
    use crate::core::physics::{HeadlessWorld, Material};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (HeadlessWorld, BallRegistry, TableGeometry, Pcg32) {
        (
            HeadlessWorld::new(),
            BallRegistry::new(Material::ball()),
            TableGeometry::default(),
            Pcg32::seed_from_u64(7),
        )
    }

    fn positions(world: &HeadlessWorld, reg: &BallRegistry) -> Vec<Vec2> {
        reg.iter().map(|b| world.position(b.body).unwrap()).collect()
    }

    fn assert_no_overlap(points: &[Vec2], min_dist: f32) {
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= min_dist - 1e-3, "{:?} too close to {:?}", a, b);
            }
        }
    }

    #[test]
    fn standard_racks_fifteen_reds_and_six_colours() {
        let (mut world, mut reg, geo, mut rng) = setup();
        build_layout(LayoutKind::Standard, &mut reg, &mut world, &geo, &mut rng, 1000).unwrap();

        assert_eq!(reg.len(), 21);
        assert_eq!(reg.red_count(), 15);
        for color in SnookerColor::ALL {
            let ball = reg.iter().find(|b| b.role == BallRole::Color(color)).unwrap();
            assert_eq!(world.position(ball.body), Some(geo.color_spot(color)));
        }
        assert_eq!(world.body_count(), 21);
    }

    #[test]
    fn extreme_halves_every_radius() {
        let (mut world, mut reg, geo, mut rng) = setup();
        build_layout(LayoutKind::Extreme, &mut reg, &mut world, &geo, &mut rng, 1000).unwrap();
        assert_eq!(reg.len(), 21);
        assert!(reg.iter().all(|b| (b.radius - geo.ball_radius / 2.0).abs() < 1e-6));
    }

    #[test]
    fn all_random_keeps_colours_on_spots() {
        let (mut world, mut reg, geo, mut rng) = setup();
        build_layout(LayoutKind::AllRandom, &mut reg, &mut world, &geo, &mut rng, 1000).unwrap();

        let area = geo.playable_rect();
        let all = positions(&world, &reg);
        assert_no_overlap(&all, geo.ball_diameter);
        for ball in reg.iter() {
            let p = world.position(ball.body).unwrap();
            match ball.role {
                BallRole::Red => assert!(area.contains(p)),
                BallRole::Color(c) => assert_eq!(p, geo.color_spot(c)),
                BallRole::Cue => unreachable!(),
            }
        }
    }

    #[test]
    fn random_reds_scatters_everything() {
        let (mut world, mut reg, geo, mut rng) = setup();
        build_layout(LayoutKind::RandomReds, &mut reg, &mut world, &geo, &mut rng, 1000).unwrap();

        assert_eq!(reg.len(), 21);
        let area = geo.playable_rect();
        let all = positions(&world, &reg);
        assert!(all.iter().all(|p| area.contains(*p)));
        assert_no_overlap(&all, geo.ball_diameter);
    }

    #[test]
    fn same_seed_same_layout() {
        let (mut w1, mut r1, geo, _) = setup();
        let (mut w2, mut r2, _, _) = setup();
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        build_layout(LayoutKind::RandomReds, &mut r1, &mut w1, &geo, &mut a, 1000).unwrap();
        build_layout(LayoutKind::RandomReds, &mut r2, &mut w2, &geo, &mut b, 1000).unwrap();
        assert_eq!(positions(&w1, &r1), positions(&w2, &r2));
    }

    #[test]
    fn cramped_table_fails_instead_of_hanging() {
        let config = TableConfig {
            layout_padding: 180.0,
            ..TableConfig::default()
        };
        let geo = TableGeometry::from_config(&config);
        let mut world = HeadlessWorld::new();
        let mut reg = BallRegistry::new(Material::ball());
        let mut rng = Pcg32::seed_from_u64(1);

        let err = build_layout(LayoutKind::RandomReds, &mut reg, &mut world, &geo, &mut rng, 50)
            .unwrap_err();
        assert!(matches!(err, LayoutError::NoSpace { role: BallRole::Red, attempts: 50, .. }));
        assert!(reg.is_empty());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn relayout_replaces_previous_balls() {
        let (mut world, mut reg, geo, mut rng) = setup();
        build_layout(LayoutKind::Standard, &mut reg, &mut world, &geo, &mut rng, 1000).unwrap();
        reg.place_cue(&mut world, Vec2::new(150.0, 200.0), geo.ball_radius).unwrap();
        build_layout(LayoutKind::Extreme, &mut reg, &mut world, &geo, &mut rng, 1000).unwrap();
        assert_eq!(world.body_count(), 21);
        assert!(reg.cue().is_none());
    }
}

//! Table measurements derived from a handful of base constants.
//!
//! Every length is in canvas pixels with the origin at the top-left corner,
//! x growing to the right (towards the black spot) and y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::balls::SnookerColor;

/// Base constants of the table. Everything in [`TableGeometry`] is derived
/// from these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Canvas width in pixels. The canvas height is half of it.
    pub canvas_width: f32,
    /// Real table length the canvas width represents.
    pub table_feet: f32,
    /// Wooden border width, in feet.
    pub border_feet: f32,
    /// How far the cushions reach onto the cloth past the border, in pixels.
    pub cushion_depth: f32,
    /// Gap kept between random layouts and the cushions, in pixels.
    pub layout_padding: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            table_feet: 12.0,
            border_feet: 0.5,
            cushion_depth: 8.0,
            layout_padding: 10.0,
        }
    }
}

/// Index of each pocket in [`TableGeometry::pockets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PocketId {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    TopMiddle,
    BottomMiddle,
}

impl PocketId {
    pub const ALL: [PocketId; 6] = [
        PocketId::TopLeft,
        PocketId::TopRight,
        PocketId::BottomLeft,
        PocketId::BottomRight,
        PocketId::TopMiddle,
        PocketId::BottomMiddle,
    ];
}

/// Axis-aligned rectangle used for sampling positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}

/// Immutable table measurements, computed once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    pub width: f32,
    pub height: f32,
    pub pixels_per_foot: f32,
    pub border: f32,
    pub cushion_depth: f32,
    pub layout_padding: f32,
    pub ball_diameter: f32,
    pub ball_radius: f32,
    pub pocket_diameter: f32,
    pub pocket_radius: f32,
    /// Pocket centres, indexed by [`PocketId`] order.
    pub pockets: [Vec2; 6],
    pub baulk_x: f32,
    pub d_center: Vec2,
    pub d_radius: f32,
}

impl TableGeometry {
    pub fn from_config(config: &TableConfig) -> Self {
        let width = config.canvas_width;
        let height = width / 2.0;
        let pixels_per_foot = width / config.table_feet;
        let border = config.border_feet * pixels_per_foot;
        let ball_diameter = height / 36.0;
        let pocket_diameter = ball_diameter * 2.7;

        let pockets = [
            Vec2::new(border, border),
            Vec2::new(width - border, border),
            Vec2::new(border, height - border),
            Vec2::new(width - border, height - border),
            Vec2::new(width / 2.0, border),
            Vec2::new(width / 2.0, height - border),
        ];

        Self {
            width,
            height,
            pixels_per_foot,
            border,
            cushion_depth: config.cushion_depth,
            layout_padding: config.layout_padding,
            ball_diameter,
            ball_radius: ball_diameter / 2.0,
            pocket_diameter,
            pocket_radius: pocket_diameter / 2.0,
            pockets,
            baulk_x: width / 5.0,
            d_center: Vec2::new(width / 5.0, height / 2.0),
            d_radius: height / 6.0,
        }
    }

    pub fn pocket(&self, id: PocketId) -> Vec2 {
        self.pockets[id as usize]
    }

    /// Six cushion quadrilaterals ringing the table.
    ///
    /// Outer edges sit on the canvas edge. Inner edges sit one cushion depth
    /// inside the border and stop short of every pocket, leaving a jaw wide
    /// enough for a ball to drop.
    pub fn cushion_polygons(&self) -> [[Vec2; 4]; 6] {
        let (w, h) = (self.width, self.height);
        let inner = self.border + self.cushion_depth;
        let jaw = self.pocket_radius + self.cushion_depth;
        let mid = w / 2.0;

        [
            // top, left half
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(mid, 0.0),
                Vec2::new(mid - jaw, inner),
                Vec2::new(self.border + jaw, inner),
            ],
            // top, right half
            [
                Vec2::new(mid, 0.0),
                Vec2::new(w, 0.0),
                Vec2::new(w - self.border - jaw, inner),
                Vec2::new(mid + jaw, inner),
            ],
            // bottom, left half
            [
                Vec2::new(0.0, h),
                Vec2::new(mid, h),
                Vec2::new(mid - jaw, h - inner),
                Vec2::new(self.border + jaw, h - inner),
            ],
            // bottom, right half
            [
                Vec2::new(mid, h),
                Vec2::new(w, h),
                Vec2::new(w - self.border - jaw, h - inner),
                Vec2::new(mid + jaw, h - inner),
            ],
            // left
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, h),
                Vec2::new(inner, h - self.border - jaw),
                Vec2::new(inner, self.border + jaw),
            ],
            // right
            [
                Vec2::new(w, 0.0),
                Vec2::new(w, h),
                Vec2::new(w - inner, h - self.border - jaw),
                Vec2::new(w - inner, self.border + jaw),
            ],
        ]
    }

    /// Canonical spot of a colored ball. Respawns always return here.
    pub fn color_spot(&self, color: SnookerColor) -> Vec2 {
        let (w, h, d) = (self.width, self.height, self.ball_diameter);
        match color {
            SnookerColor::Yellow => Vec2::new(w / 5.0, h / 3.0 * 2.0),
            SnookerColor::Green => Vec2::new(w / 5.0, h / 3.0),
            SnookerColor::Brown => Vec2::new(w / 5.0, h / 2.0),
            SnookerColor::Blue => Vec2::new(w / 2.0, h / 2.0),
            SnookerColor::Pink => Vec2::new(self.rack_back_x() - 4.0 * d - 2.0 - d - 1.0, h / 2.0),
            SnookerColor::Black => Vec2::new(w - w / 11.0, h / 2.0),
        }
    }

    /// x of the five-ball back row of the red triangle.
    fn rack_back_x(&self) -> f32 {
        self.width / 5.0 * 4.0
    }

    /// Centres of the 15 reds: rows of 5, 4, 3, 2, 1 from the back of the
    /// triangle towards the apex, which points at the pink.
    pub fn rack_positions(&self) -> [Vec2; 15] {
        let d = self.ball_diameter;
        let cy = self.height / 2.0;
        let back = self.rack_back_x();

        let mut out = [Vec2::ZERO; 15];
        let mut n = 0;
        let mut push = |x: f32, y: f32| {
            out[n] = Vec2::new(x, y);
            n += 1;
        };

        for i in 0..5 {
            push(back, cy + 2.0 * d - i as f32 * d);
        }
        for dy in [1.5, 0.5, -0.5, -1.5] {
            push(back - d - 1.0, cy + dy * d);
        }
        for dy in [1.0, 0.0, -1.0] {
            push(back - 2.0 * d - 2.0, cy + dy * d);
        }
        for dy in [0.5, -0.5] {
            push(back - 3.0 * d - 2.0, cy + dy * d);
        }
        push(back - 4.0 * d - 2.0, cy);
        out
    }

    /// Region random layouts sample ball centres from.
    pub fn playable_rect(&self) -> Rect {
        let inset = self.border + self.cushion_depth + self.layout_padding;
        Rect {
            min: Vec2::new(inset, inset),
            max: Vec2::new(self.width - inset, self.height - inset),
        }
    }

    /// Region hazard holes are sampled from.
    pub fn hole_rect(&self) -> Rect {
        let inset = self.border + self.cushion_depth;
        Rect {
            min: Vec2::new(inset, inset),
            max: Vec2::new(self.width - inset, self.height - inset),
        }
    }

    /// Whether `p` is a legal cue-ball placement: inside the D's bounding
    /// box on the baulk side, and strictly inside its radius.
    pub fn in_d(&self, p: Vec2) -> bool {
        let c = self.d_center;
        let r = self.d_radius;
        let in_box = p.x > c.x - r && p.x < c.x && p.y > c.y - r && p.y < c.y + r;
        in_box && p.distance(c) < r
    }
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn derived_measurements() {
        let g = TableGeometry::default();
        assert_eq!(g.height, 400.0);
        assert!(approx(g.border, 800.0 / 24.0));
        assert!(approx(g.ball_diameter, 400.0 / 36.0));
        assert!(approx(g.pocket_diameter, g.ball_diameter * 2.7));
        assert!(approx(g.d_radius, 400.0 / 6.0));
        assert_eq!(g.d_center, Vec2::new(160.0, 200.0));
    }

    #[test]
    fn pockets_symmetric_and_in_bounds() {
        let g = TableGeometry::default();
        for p in g.pockets {
            assert!(p.x > 0.0 && p.x < g.width);
            assert!(p.y > 0.0 && p.y < g.height);
            let mirrored_x = Vec2::new(g.width - p.x, p.y);
            let mirrored_y = Vec2::new(p.x, g.height - p.y);
            assert!(g.pockets.iter().any(|q| q.distance(mirrored_x) < 1e-3));
            assert!(g.pockets.iter().any(|q| q.distance(mirrored_y) < 1e-3));
        }
        assert_eq!(g.pocket(PocketId::TopMiddle), Vec2::new(400.0, g.border));
    }

    #[test]
    fn cushions_leave_pockets_open() {
        let g = TableGeometry::default();
        for quad in g.cushion_polygons() {
            // a pocket is outside a convex quad if it lies outside any edge
            for pocket in g.pockets {
                let sign = |i: usize| {
                    let a = quad[i];
                    let b = quad[(i + 1) % 4];
                    (b - a).perp_dot(pocket - a)
                };
                let signs: Vec<f32> = (0..4).map(sign).collect();
                let all_pos = signs.iter().all(|s| *s > 0.0);
                let all_neg = signs.iter().all(|s| *s < 0.0);
                assert!(!all_pos && !all_neg, "pocket {:?} covered by {:?}", pocket, quad);
            }
        }
    }

    #[test]
    fn d_region_is_baulk_half_only() {
        let g = TableGeometry::default();
        let c = g.d_center;
        assert!(g.in_d(c + Vec2::new(-10.0, 0.0)));
        assert!(g.in_d(c + Vec2::new(-10.0, 30.0)));
        assert!(!g.in_d(c + Vec2::new(10.0, 0.0)));
        assert!(!g.in_d(c));
        assert!(!g.in_d(c + Vec2::new(-g.d_radius, 0.0)));
        assert!(!g.in_d(c + Vec2::new(-50.0, -50.0)));
    }

    #[test]
    fn rack_is_five_four_three_two_one() {
        let g = TableGeometry::default();
        let rack = g.rack_positions();
        let mut columns: Vec<f32> = Vec::new();
        for p in rack {
            if !columns.iter().any(|x| approx(*x, p.x)) {
                columns.push(p.x);
            }
        }
        let counts: Vec<usize> = columns
            .iter()
            .map(|x| rack.iter().filter(|p| approx(p.x, *x)).count())
            .collect();
        assert_eq!(counts, vec![5, 4, 3, 2, 1]);

        for (i, a) in rack.iter().enumerate() {
            for b in &rack[i + 1..] {
                assert!(a.distance(*b) >= g.ball_diameter - 1e-3);
            }
        }
        let pink = g.color_spot(SnookerColor::Pink);
        assert!(pink.x < columns[4]);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: TableConfig = serde_json::from_str(r#"{ "canvas_width": 1200 }"#).unwrap();
        assert_eq!(cfg.canvas_width, 1200.0);
        assert_eq!(cfg.table_feet, 12.0);
        let g = TableGeometry::from_config(&cfg);
        assert_eq!(g.height, 600.0);
    }
}

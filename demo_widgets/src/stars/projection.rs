//! Star position, size and color from catalog fields.
//!
//! Everything here is a pure function of its inputs. The per-star jitter is
//! seeded from the star's index and angles, so projecting the same catalog
//! twice gives bit-identical buffers.

use std::f64::consts::PI;

pub const SKY_RADIUS: f64 = 2.25;
pub const NOISE_AMOUNT: f64 = 0.07;
pub const MIN_POINT_SIZE: f64 = 0.5;

pub const BV_MIN: f64 = -0.4;
pub const BV_MAX: f64 = 2.0;

/// Where and how one star is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedStar {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
}

/// Deterministic hash-style noise in `[0, 1)`.
pub fn pseudo_random(seed: f64) -> f64 {
    let x = seed.sin() * 43758.5453123;
    x - x.floor()
}

/// Project a star onto the sky sphere with magnitude-scaled jitter.
pub fn project(index: usize, lon: f64, lat: f64, magnitude: f64, color_index: f64) -> ProjectedStar {
    let phi = (90.0 - lat) * PI / 180.0;
    let theta = (lon + 180.0) * PI / 180.0;
    let i = index as f64;

    let nx = (pseudo_random(i * 1.13 + phi * 0.91) - 0.5) * NOISE_AMOUNT;
    let ny = (pseudo_random(i * 2.71 + theta * 1.37) - 0.5) * NOISE_AMOUNT;
    let nz = (pseudo_random(i * 3.33 + phi * 0.53 + theta * 0.77) - 0.5) * (NOISE_AMOUNT * 1.5);

    // Fainter stars scatter more.
    let mag_factor = 1.0 + ((magnitude - 2.0) * 2.0).max(0.0);

    let x = SKY_RADIUS * phi.sin() * theta.cos() + nx * mag_factor;
    let y = SKY_RADIUS * phi.cos() + ny * mag_factor;
    let z = SKY_RADIUS * phi.sin() * theta.sin() + nz * mag_factor;

    let color = star_color(color_index);

    ProjectedStar {
        position: [x as f32, y as f32, z as f32],
        size: point_size(magnitude) as f32,
        color: [color[0] as f32, color[1] as f32, color[2] as f32],
    }
}

/// Brighter (lower magnitude) stars are larger; never below [`MIN_POINT_SIZE`].
pub fn point_size(magnitude: f64) -> f64 {
    ((7.0 - magnitude) * 0.5).max(MIN_POINT_SIZE)
}

/// B-V color index to linear RGB. Band edges sit at 0, 0.5 and 1.5.
pub fn star_color(color_index: f64) -> [f64; 3] {
    let bv = color_index.clamp(BV_MIN, BV_MAX);

    let (r, g, b) = if bv < 0.0 {
        // blue
        (0.7 + bv * 0.5, 0.7 + bv * 0.3, 1.0)
    } else if bv < 0.5 {
        // white
        (0.85 + bv * 0.1, 0.85 + bv * 0.1, 0.85 - bv * 0.3)
    } else if bv < 1.5 {
        // yellow to orange
        (1.0, 0.9 - (bv - 0.5) * 0.4, 0.7 - (bv - 0.5) * 0.6)
    } else {
        // red
        (1.0, 0.4 - (bv - 1.5) * 0.4, 0.6 - (bv - 1.5) * 0.3)
    };

    [r.max(0.0), g.max(0.0), b.max(0.0)]
}

use polyclip::geometry::{Path64, Point64};
use std::f64::consts::TAU;

/// Star with `point_count` spikes alternating between two radii, self overlapping when rotated
/// copies are combined.
pub fn star(point_count: usize, outer: f64, inner: f64, rotation: f64) -> Path64 {
    let vertex_count = point_count * 2;
    (0..vertex_count)
        .map(|i| {
            let angle = rotation + i as f64 * TAU / vertex_count as f64;
            let radius = if i % 2 == 0 { outer } else { inner };
            Point64::new(
                (radius * angle.cos()).round() as i64,
                (radius * angle.sin()).round() as i64,
            )
        })
        .collect()
}

/// Self intersecting path zig zagging across a circle, every edge crosses many others.
pub fn pathological1(vertex_count: usize) -> Path64 {
    let radius = 10_000.0;
    (0..vertex_count)
        .map(|i| {
            // step almost half way around the circle each vertex
            let angle = i as f64 * TAU * 0.49;
            Point64::new(
                (radius * angle.cos()).round() as i64,
                (radius * angle.sin()).round() as i64,
            )
        })
        .collect()
}

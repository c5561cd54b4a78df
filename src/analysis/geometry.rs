// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Joint angle geometry in pixel space

/// A point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point straight above this one on the top edge of the frame
    pub fn vertical_ref(&self) -> Self {
        Self { x: self.x, y: 0.0 }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Angle in degrees at `ref_pt` between the rays to `p1` and `p2`
///
/// Degenerate rays (zero length) yield 0.0.
pub fn find_angle(p1: Point, p2: Point, ref_pt: Point) -> f32 {
    let (ax, ay) = (p1.x - ref_pt.x, p1.y - ref_pt.y);
    let (bx, by) = (p2.x - ref_pt.x, p2.y - ref_pt.y);

    let norms = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    if norms <= f32::EPSILON {
        return 0.0;
    }

    let cos_theta = ((ax * bx + ay * by) / norms).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// Angle between the segment `joint -> from` and the upward vertical through `joint`
pub fn vertical_angle(from: Point, joint: Point) -> f32 {
    find_angle(from, joint.vertical_ref(), joint)
}

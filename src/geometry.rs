use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::landmark::{HandSide, Landmark, LandmarkFrame};

/// A position on the virtual canvas, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Fixed-size pixel space targets live in, independent of the display size
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Canvas {
    /// Map a normalized landmark onto the canvas.
    ///
    /// Returns `None` for landmarks with non-finite coordinates. Out-of-range
    /// values are kept; they just land off-canvas.
    pub fn map(&self, landmark: &Landmark) -> Option<Point> {
        if !landmark.x.is_finite() || !landmark.y.is_finite() {
            trace!(x = landmark.x, y = landmark.y, "dropping non-finite landmark");
            return None;
        }
        Some(Point::new(landmark.x * self.width, landmark.y * self.height))
    }

    pub fn map_all(&self, landmarks: &[Landmark]) -> Vec<Point> {
        landmarks.iter().filter_map(|l| self.map(l)).collect()
    }
}

/// A circular hit region
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Point::new(x, y),
            radius,
        }
    }

    /// Strictly inside: a point exactly on the rim does not count
    pub fn contains(&self, point: &Point) -> bool {
        self.center.distance_to(point) < self.radius
    }
}

/// True iff any of `points` lies strictly inside `circle`
pub fn collides(points: &[Point], circle: &Circle) -> bool {
    points.iter().any(|p| circle.contains(p))
}

/// Both hands of one frame, already mapped to canvas pixels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandPoints {
    pub left: Vec<Point>,
    pub right: Vec<Point>,
}

impl HandPoints {
    pub fn from_frame(frame: &LandmarkFrame, canvas: &Canvas) -> Self {
        let map_side = |side| {
            frame
                .hand(side)
                .map(|landmarks| canvas.map_all(landmarks))
                .unwrap_or_default()
        };
        Self {
            left: map_side(HandSide::Left),
            right: map_side(HandSide::Right),
        }
    }

    pub fn side(&self, side: HandSide) -> &[Point] {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

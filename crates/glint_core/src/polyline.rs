//! Polylines sampled by arc length

use crate::geometry::Point;

/// An ordered run of points with cached cumulative lengths
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    /// Distance from the first point to each point
    cumulative: Vec<f32>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(*p);
            }
            cumulative.push(total);
        }
        Self { points, cumulative }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length
    pub fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point at `progress` (0.0 to 1.0) of the total length
    pub fn point_at(&self, progress: f32) -> Option<Point> {
        let first = *self.points.first()?;
        let total = self.length();
        if total <= 0.0 {
            return Some(first);
        }

        let target = progress.clamp(0.0, 1.0) * total;
        let idx = self.cumulative.partition_point(|d| *d < target);
        if idx == 0 {
            return Some(first);
        }
        if idx >= self.points.len() {
            return self.points.last().copied();
        }

        let (d0, d1) = (self.cumulative[idx - 1], self.cumulative[idx]);
        let span = d1 - d0;
        let local = if span > 0.0 { (target - d0) / span } else { 0.0 };
        Some(self.points[idx - 1].lerp(self.points[idx], local))
    }
}

//! Topology-preserving Douglas-Peucker simplification.
//!
//! Distances are planar in the coordinate units of the data (degrees for
//! raw KML). Only the first two components of a position take part in the
//! geometry; altitudes ride along with the vertices that are kept.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Line};

use crate::feature::{Position, Shape};

pub fn simplify(shape: &Shape, tolerance: f64) -> Shape {
    match shape {
        Shape::Line(points) => Shape::Line(simplify_line(points, tolerance)),
        Shape::Polygon(ring) => Shape::Polygon(simplify_ring(ring, tolerance)),
    }
}

fn coord(p: &Position) -> Coord<f64> {
    Coord {
        x: p.first().copied().unwrap_or_default(),
        y: p.get(1).copied().unwrap_or_default(),
    }
}

fn close_ring(ring: &mut Vec<Position>) {
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if coord(first) != coord(last) {
            ring.push(first.clone());
        }
    }
}

fn simplify_line(points: &[Position], tolerance: f64) -> Vec<Position> {
    if tolerance <= 0.0 || points.len() < 3 {
        return points.to_vec();
    }
    let coords: Vec<Coord<f64>> = points.iter().map(coord).collect();
    let keep = douglas_peucker(&coords, tolerance, vec![(0, coords.len() - 1)]);
    select(points, &keep)
}

fn simplify_ring(ring: &[Position], tolerance: f64) -> Vec<Position> {
    let mut closed = ring.to_vec();
    close_ring(&mut closed);
    if tolerance <= 0.0 || closed.len() <= 4 {
        return closed;
    }
    let coords: Vec<Coord<f64>> = closed.iter().map(coord).collect();
    let last = coords.len() - 1;
    // The ring starts and ends on the same vertex, so split it at the vertex
    // farthest from the start before looking for shortcuts.
    let (split, _) = farthest(&coords, 0, last);
    let keep = douglas_peucker(&coords, tolerance, vec![(split, last), (0, split)]);
    let simplified = select(&closed, &keep);
    if simplified.len() < 4 {
        return closed;
    }
    simplified
}

fn select(points: &[Position], keep: &[bool]) -> Vec<Position> {
    points
        .iter()
        .zip(keep)
        .filter(|(_, k)| **k)
        .map(|(p, _)| p.clone())
        .collect()
}

fn distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / length
}

/// Index and distance of the vertex strictly between `first` and `last`
/// farthest from the chord joining them.
fn farthest(coords: &[Coord<f64>], first: usize, last: usize) -> (usize, f64) {
    (first + 1..last)
        .map(|i| (i, distance(coords[i], coords[first], coords[last])))
        .fold((first, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best })
}

fn touches_only_at_shared_end(at: Coord<f64>, a: Line<f64>, b: Line<f64>) -> bool {
    (at == a.start || at == a.end) && (at == b.start || at == b.end)
}

fn conflicts(shortcut: Line<f64>, other: Line<f64>) -> bool {
    match line_intersection(shortcut, other) {
        None => false,
        Some(LineIntersection::SinglePoint { intersection, .. }) => {
            !touches_only_at_shared_end(intersection, shortcut, other)
        }
        Some(LineIntersection::Collinear { intersection }) => {
            intersection.start != intersection.end
                || !touches_only_at_shared_end(intersection.start, shortcut, other)
        }
    }
}

/// Whether replacing the vertices between `first` and `last` by a straight
/// segment would cross the input outside that span or an already kept
/// output segment.
fn crosses(coords: &[Coord<f64>], first: usize, last: usize, kept: &[(usize, usize)]) -> bool {
    let shortcut = Line::new(coords[first], coords[last]);
    let outside = (0..coords.len() - 1)
        .filter(|&i| i < first || i >= last)
        .map(|i| (i, i + 1));
    outside
        .chain(kept.iter().copied())
        .any(|(a, b)| conflicts(shortcut, Line::new(coords[a], coords[b])))
}

/// Marks the vertices to keep, starting from the given spans.
fn douglas_peucker(coords: &[Coord<f64>], tolerance: f64, spans: Vec<(usize, usize)>) -> Vec<bool> {
    let mut keep = vec![false; coords.len()];
    let mut kept_segments: Vec<(usize, usize)> = Vec::new();
    let mut stack = spans;
    for &(first, last) in &stack {
        keep[first] = true;
        keep[last] = true;
    }
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            kept_segments.push((first, last));
            continue;
        }
        let (index, dist) = farthest(coords, first, last);
        if dist <= tolerance && !crosses(coords, first, last, &kept_segments) {
            kept_segments.push((first, last));
            continue;
        }
        keep[index] = true;
        stack.push((index, last));
        stack.push((first, index));
    }
    keep
}

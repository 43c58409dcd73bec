use std::collections::HashSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::{Point, Rect};

/// Group of nearby points collapsed to a single marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub center: Point,
    pub count: usize,
}

type PointKey = (OrderedFloat<f64>, OrderedFloat<f64>);

fn key(point: Point) -> PointKey {
    (OrderedFloat(point.x), OrderedFloat(point.y))
}

/// Collapses points whose `diameter`-squares overlap.
///
/// Points are visited in input order; each point not yet absorbed seeds a
/// cluster made of every point (absorbed or not) overlapping its square.
#[must_use]
pub fn aggregate(points: &[Point], diameter: f64) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut absorbed: HashSet<PointKey> = HashSet::with_capacity(points.len());

    for &seed in points {
        if absorbed.contains(&key(seed)) {
            continue;
        }
        let seed_square = Rect::centered_square(seed, diameter);
        let members: Vec<Point> = points
            .iter()
            .copied()
            .filter(|candidate| seed_square.intersects(Rect::centered_square(*candidate, diameter)))
            .collect();

        let center = centroid(&members).unwrap_or(seed);
        trace!(x = center.x, y = center.y, count = members.len(), "point cluster");
        clusters.push(Cluster {
            center,
            count: members.len(),
        });
        absorbed.extend(members.into_iter().map(key));
    }

    clusters
}

/// Centre of the bounding box of `points`.
///
/// Each point updates at most one of the four bounds (first matching of
/// min-x, max-x, min-y, max-y), so the box may under-cover diagonal spreads.
#[must_use]
pub fn centroid(points: &[Point]) -> Option<Point> {
    let (&first, rest) = points.split_first()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);

    for point in rest {
        if min_x > point.x {
            min_x = point.x;
        } else if max_x < point.x {
            max_x = point.x;
        } else if min_y > point.y {
            min_y = point.y;
        } else if max_y < point.y {
            max_y = point.y;
        }
    }

    Some(Point::new(
        min_x + (max_x - min_x) / 2.0,
        min_y + (max_y - min_y) / 2.0,
    ))
}

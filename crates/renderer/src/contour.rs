//! Filled contour bands over an interpolated grid.
//!
//! Every grid cell is split into two triangles. The field is linear inside a
//! triangle, so the part of it lying between two levels is a convex polygon
//! found by walking the triangle's edges. Pieces of the same band share edges
//! with their neighbours; those cancel out, and the edges left over are walked
//! into boundary rings.
//!
//! Vertices are identified symbolically (a grid node, or a level crossing on
//! the edge between two nodes) so that neighbouring triangles agree on them
//! exactly and cancellation never depends on float comparison.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use ocean_common::Grid;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::style::{Color, LevelSet};

/// A ring of `[longitude, latitude]` positions.
pub type Ring = Vec<[f64; 2]>;

/// Outer ring first, then holes.
pub type Polygon = Vec<Ring>;

/// Presentation and simplification settings for contour output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourStyle {
    pub fill_opacity: f64,
    pub stroke_width: f64,
    /// Vertices turning by less than this many degrees are dropped.
    pub min_angle_deg: f64,
    /// Decimal places kept in output coordinates.
    pub ndigits: u32,
}

impl Default for ContourStyle {
    fn default() -> Self {
        Self {
            fill_opacity: 0.5,
            stroke_width: 1.0,
            min_angle_deg: 3.0,
            ndigits: 5,
        }
    }
}

/// The filled area of the grid between two consecutive breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourRegion {
    pub lower: f64,
    pub upper: f64,
    /// Used for both stroke and fill.
    pub color: Color,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    /// Closed rings (first position repeated at the end).
    pub polygons: Vec<Polygon>,
}

impl ContourRegion {
    /// Total number of positions over every ring.
    pub fn vertex_count(&self) -> usize {
        self.polygons
            .iter()
            .flat_map(|polygon| polygon.iter())
            .map(|ring| ring.len())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Bound {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum VertexKey {
    Node(usize),
    /// Crossing of a level on the edge between two nodes, lower node id first.
    Crossing(usize, usize, Bound),
}

impl VertexKey {
    fn crossing(a: usize, b: usize, bound: Bound) -> Self {
        if a < b {
            VertexKey::Crossing(a, b, bound)
        } else {
            VertexKey::Crossing(b, a, bound)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Band {
    lower: f64,
    upper: f64,
    /// Triangles lying flat on `lower` belong to the band below.
    owns_lower_plateau: bool,
}

impl Band {
    fn contains(&self, z: f64) -> bool {
        self.lower <= z && z <= self.upper
    }

    fn level(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Lower => self.lower,
            Bound::Upper => self.upper,
        }
    }

    /// Levels strictly between `za` and `zb`, ordered from `za` towards `zb`.
    fn crossings(&self, za: f64, zb: f64) -> [Option<Bound>; 2] {
        let (lo, hi) = if za <= zb { (za, zb) } else { (zb, za) };
        let strictly_inside = |level: f64| lo < level && level < hi;

        let lower = strictly_inside(self.lower).then_some(Bound::Lower);
        let upper = (self.upper != self.lower && strictly_inside(self.upper)).then_some(Bound::Upper);

        if za <= zb {
            [lower, upper]
        } else {
            [upper, lower]
        }
    }
}

/// Extract one styled region per breakpoint interval of `levels`.
///
/// Triangles touching an undefined (NaN) node are skipped, as are grid values
/// outside the outer breakpoints. Intervals that cover no part of the grid are
/// omitted, so the output may be shorter than `levels.interval_count()`.
pub fn extract(grid: &Grid, levels: &LevelSet, style: &ContourStyle) -> Vec<ContourRegion> {
    let start = Instant::now();
    let mut regions = Vec::new();

    if grid.width() < 2 || grid.height() < 2 {
        return regions;
    }

    for (k, (lower, upper, color)) in levels.intervals().enumerate() {
        if k > 0 && lower == upper {
            continue;
        }

        let band = Band {
            lower,
            upper,
            owns_lower_plateau: k == 0,
        };
        let rings: Vec<Ring> = band_boundary(grid, &band)
            .iter()
            .map(|keys| {
                keys.iter()
                    .map(|key| position(grid, &band, *key))
                    .collect::<Ring>()
            })
            .collect();

        let polygons = assemble(rings, style);
        if polygons.is_empty() {
            continue;
        }

        regions.push(ContourRegion {
            lower,
            upper,
            color,
            stroke_width: style.stroke_width,
            fill_opacity: style.fill_opacity,
            polygons,
        });
    }

    debug!(
        width = grid.width(),
        height = grid.height(),
        intervals = levels.interval_count(),
        regions = regions.len(),
        vertices = regions.iter().map(|r| r.vertex_count()).sum::<usize>(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Extracted contour regions"
    );

    regions
}

/// Boundary rings of one band, as vertex keys.
fn band_boundary(grid: &Grid, band: &Band) -> Vec<Vec<VertexKey>> {
    let width = grid.width();
    let height = grid.height();
    let values = grid.values();

    let mut edges: HashSet<(VertexKey, VertexKey)> = HashSet::new();
    let mut piece = Vec::with_capacity(6);

    for j in 0..height - 1 {
        for i in 0..width - 1 {
            let n00 = j * width + i;
            let n10 = n00 + 1;
            let n01 = n00 + width;
            let n11 = n01 + 1;

            for tri in [[n00, n10, n11], [n00, n11, n01]] {
                let z = tri.map(|n| values[n]);
                if z.iter().any(|v| v.is_nan()) {
                    continue;
                }

                let zmin = z[0].min(z[1]).min(z[2]);
                let zmax = z[0].max(z[1]).max(z[2]);
                if zmax < band.lower || zmin > band.upper {
                    continue;
                }
                if !band.owns_lower_plateau && zmax == band.lower {
                    continue;
                }

                clip_triangle(tri, z, band, &mut piece);
                if piece.len() < 3 {
                    continue;
                }

                for k in 0..piece.len() {
                    let a = piece[k];
                    let b = piece[(k + 1) % piece.len()];
                    if !edges.remove(&(b, a)) {
                        edges.insert((a, b));
                    }
                }
            }
        }
    }

    walk_rings(edges)
}

/// Vertices of the part of a counter-clockwise triangle inside `band`, in
/// counter-clockwise order.
fn clip_triangle(tri: [usize; 3], z: [f64; 3], band: &Band, out: &mut Vec<VertexKey>) {
    out.clear();
    for k in 0..3 {
        let (a, b) = (tri[k], tri[(k + 1) % 3]);
        let (za, zb) = (z[k], z[(k + 1) % 3]);

        if band.contains(za) {
            out.push(VertexKey::Node(a));
        }
        for bound in band.crossings(za, zb).into_iter().flatten() {
            out.push(VertexKey::crossing(a, b, bound));
        }
    }
}

/// Chain directed edges into closed rings, smallest key first.
fn walk_rings(edges: HashSet<(VertexKey, VertexKey)>) -> Vec<Vec<VertexKey>> {
    let mut sorted: Vec<_> = edges.into_iter().collect();
    sorted.sort_unstable();

    // Targets are stored descending so `pop` yields the smallest.
    let mut outgoing: BTreeMap<VertexKey, Vec<VertexKey>> = BTreeMap::new();
    for (a, b) in sorted.into_iter().rev() {
        outgoing.entry(a).or_default().push(b);
    }

    let mut rings = Vec::new();
    while let Some(start) = outgoing.keys().next().copied() {
        let mut ring = vec![start];
        let mut current = start;

        let closed = loop {
            match take_edge(&mut outgoing, current) {
                Some(next) if next == start => break true,
                Some(next) => {
                    ring.push(next);
                    current = next;
                }
                None => break false,
            }
        };

        if closed && ring.len() >= 3 {
            rings.push(ring);
        } else {
            debug!(vertices = ring.len(), "Discarding unclosed contour chain");
        }
    }
    rings
}

fn take_edge(outgoing: &mut BTreeMap<VertexKey, Vec<VertexKey>>, from: VertexKey) -> Option<VertexKey> {
    let targets = outgoing.get_mut(&from)?;
    let next = targets.pop();
    if targets.is_empty() {
        outgoing.remove(&from);
    }
    next
}

/// Geographic position of a vertex key.
fn position(grid: &Grid, band: &Band, key: VertexKey) -> [f64; 2] {
    let width = grid.width();
    let node = |n: usize| [grid.xs()[n % width], grid.ys()[n / width]];

    match key {
        VertexKey::Node(n) => node(n),
        VertexKey::Crossing(p, q, bound) => {
            let (zp, zq) = (grid.values()[p], grid.values()[q]);
            let t = (band.level(bound) - zp) / (zq - zp);
            let (a, b) = (node(p), node(q));
            [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
        }
    }
}

/// Group rings into polygons and finish them for output.
///
/// Counter-clockwise rings are outer boundaries; clockwise rings are holes and
/// go to the smallest outer ring containing them.
fn assemble(rings: Vec<Ring>, style: &ContourStyle) -> Vec<Polygon> {
    let mut outers: Vec<(f64, Ring, Vec<Ring>)> = Vec::new();
    let mut holes = Vec::new();

    for ring in rings {
        let area = signed_area(&ring);
        if area > 0.0 {
            outers.push((area, ring, Vec::new()));
        } else if area < 0.0 {
            holes.push(ring);
        }
    }

    for hole in holes {
        let inner = hole[0];
        let owner = outers
            .iter_mut()
            .filter(|(_, outer, _)| ring_contains(outer, inner))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        match owner {
            Some((_, _, owned)) => owned.push(hole),
            None => debug!(vertices = hole.len(), "Dropping contour hole with no outer ring"),
        }
    }

    outers
        .into_iter()
        .filter_map(|(_, outer, owned)| {
            let mut polygon = vec![finish_ring(&outer, style)?];
            polygon.extend(owned.iter().filter_map(|hole| finish_ring(hole, style)));
            Some(polygon)
        })
        .collect()
}

/// Simplify, round, deduplicate and close a ring. Returns `None` when fewer
/// than three distinct positions survive or the ring collapses or flips.
fn finish_ring(ring: &[[f64; 2]], style: &ContourStyle) -> Option<Ring> {
    let orientation = signed_area(ring).signum();
    let scale = 10f64.powi(style.ndigits as i32);
    let round = |v: f64| (v * scale).round() / scale;

    let mut out: Ring = Vec::with_capacity(ring.len() + 1);
    for p in simplify(ring, style.min_angle_deg) {
        let rounded = [round(p[0]), round(p[1])];
        if out.last() != Some(&rounded) {
            out.push(rounded);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    if out.len() < 3 || signed_area(&out).signum() != orientation || signed_area(&out) == 0.0 {
        return None;
    }

    out.push(out[0]);
    Some(out)
}

/// Drop vertices whose direction change, measured from the last kept vertex,
/// is not larger than `min_angle_deg`. The first vertex is always kept.
pub fn simplify(ring: &[[f64; 2]], min_angle_deg: f64) -> Ring {
    if ring.len() < 3 {
        return ring.to_vec();
    }

    let threshold = min_angle_deg.to_radians();
    let mut kept = vec![ring[0]];
    for k in 1..ring.len() {
        let prev = kept[kept.len() - 1];
        let next = ring[(k + 1) % ring.len()];
        if turning_angle(prev, ring[k], next) > threshold {
            kept.push(ring[k]);
        }
    }
    kept
}

/// Absolute angle in radians between `a -> b` and `b -> c`.
fn turning_angle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1]];
    let v = [c[0] - b[0], c[1] - b[1]];
    let cross = u[0] * v[1] - u[1] * v[0];
    let dot = u[0] * v[0] + u[1] * v[1];
    cross.atan2(dot).abs()
}

/// Shoelace area, positive for counter-clockwise rings. Works for open and
/// closed rings alike.
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let twice: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum();
    twice / 2.0
}

/// Even-odd point-in-ring test.
fn ring_contains(ring: &[[f64; 2]], p: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
            if p[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

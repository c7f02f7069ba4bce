//! Fixed-stride point reduction for marker display.
//!
//! Drawing one marker per sample stops being usable somewhere above ~5000
//! markers, so the point display thins its input first. The reduction keeps
//! every `stride`-th element and nothing else: it is lossy, makes no attempt
//! to be representative, and may return up to roughly `2 * target_size - 1`
//! elements because the stride is rounded down.

/// Thin `points` to about `target_size` elements, preserving order.
///
/// Inputs shorter than `target_size` are returned unchanged. Otherwise the
/// result is every `len / target_size`-th element starting at index 0.
/// A `target_size` of zero yields an empty vector.
pub fn reduce<T>(points: Vec<T>, target_size: usize) -> Vec<T> {
    if target_size == 0 {
        return Vec::new();
    }
    if points.len() < target_size {
        return points;
    }

    let stride = points.len() / target_size;
    points.into_iter().step_by(stride).collect()
}

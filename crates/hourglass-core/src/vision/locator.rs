//! Display rectangle discovery.
//!
//! Rectangles are inferred from an edge map by pairing long horizontal edge
//! runs into top/bottom borders and then looking for a vertical run on each
//! side that closes a square-looking corner with them.

use tracing::debug;

use crate::frame::Rect;

use super::edge::EdgeMap;
use super::layout::locator::{CORNER_BALANCE, MIN_RECT_HEIGHT, MIN_RECT_WIDTH};

/// A maximal run of edge pixels along one row or column.
///
/// For a horizontal run `(x, y)` is the leftmost pixel, for a vertical run
/// the topmost; `len` counts pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeRun {
    x: usize,
    y: usize,
    len: usize,
}

impl EdgeRun {
    /// Last pixel covered along the run direction
    fn end(&self, horizontal: bool) -> usize {
        if horizontal {
            self.x + self.len - 1
        } else {
            self.y + self.len - 1
        }
    }
}

/// Collect horizontal and vertical edge runs of at least the minimum length
fn collect_runs(map: &EdgeMap) -> (Vec<EdgeRun>, Vec<EdgeRun>) {
    let mut horizontal = Vec::new();
    let mut vertical = Vec::new();

    for y in 0..map.height() {
        let mut start = None;
        for x in 0..=map.width() {
            let edge = x < map.width() && map.is_edge(x, y);
            match (edge, start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    if x - s >= MIN_RECT_WIDTH {
                        horizontal.push(EdgeRun { x: s, y, len: x - s });
                    }
                    start = None;
                }
                _ => {}
            }
        }
    }

    for x in 0..map.width() {
        let mut start = None;
        for y in 0..=map.height() {
            let edge = y < map.height() && map.is_edge(x, y);
            match (edge, start) {
                (true, None) => start = Some(y),
                (false, Some(s)) => {
                    if y - s >= MIN_RECT_HEIGHT {
                        vertical.push(EdgeRun { x, y: s, len: y - s });
                    }
                    start = None;
                }
                _ => {}
            }
        }
    }

    (horizontal, vertical)
}

/// Distances from a vertical run to the corner it would close
struct CornerFit {
    diff_x: f64,
    diff_y1: f64,
    diff_y2: f64,
}

impl CornerFit {
    fn new(run: &EdgeRun, edge_x: usize, top: usize, bottom: usize) -> Self {
        let y1 = run.y.max(top);
        let y2 = run.end(false).min(bottom);
        Self {
            diff_x: run.x.abs_diff(edge_x) as f64,
            diff_y1: y1.abs_diff(top) as f64,
            diff_y2: y2.abs_diff(bottom) as f64,
        }
    }

    /// All three distances are comparable and the corner gap is small enough
    fn is_square(&self, limit: f64) -> bool {
        let min = self.diff_x.min(self.diff_y1).min(self.diff_y2);
        let max = self.diff_x.max(self.diff_y1).max(self.diff_y2);
        // A perfect corner (all zero) is balanced
        if max > 0.0 && min / max < CORNER_BALANCE {
            return false;
        }
        let gap = (self.diff_x.powi(2) + self.diff_y1.max(self.diff_y2).powi(2)).sqrt();
        gap <= limit
    }

    /// Population standard deviation of the three distances
    fn spread(&self) -> f64 {
        let mean = (self.diff_x + self.diff_y1 + self.diff_y2) / 3.0;
        let square_mean = (self.diff_x.powi(2) + self.diff_y1.powi(2) + self.diff_y2.powi(2)) / 3.0;
        (square_mean - mean * mean).max(0.0).sqrt()
    }
}

/// Best vertical border found so far for one side
#[derive(Default)]
struct SideBorder {
    best: Option<(usize, f64)>,
}

impl SideBorder {
    fn offer(&mut self, x: usize, spread: f64) {
        match self.best {
            Some((_, best)) if best <= spread => {}
            _ => self.best = Some((x, spread)),
        }
    }

    fn x(&self) -> Option<usize> {
        self.best.map(|(x, _)| x)
    }
}

/// Find candidate display rectangles in an edge map.
///
/// Returned rectangles are in frame coordinates, sorted left to right (then
/// top to bottom), and none is contained in another.
pub fn find_rectangles(map: &EdgeMap) -> Vec<Rect> {
    let (horizontal, vertical) = collect_runs(map);
    let mut rects: Vec<Rect> = Vec::new();

    for (i, a) in horizontal.iter().enumerate() {
        for b in &horizontal[i + 1..] {
            let x1 = a.x.max(b.x);
            let x2 = a.end(true).min(b.end(true));
            if x2 < x1 || x2 - x1 + 1 < MIN_RECT_WIDTH {
                continue;
            }
            let top = a.y.min(b.y);
            let bottom = a.y.max(b.y);
            if bottom - top + 1 < MIN_RECT_HEIGHT {
                continue;
            }

            let limit = (x2 - x1).min(bottom - top) as f64;
            let mut left = SideBorder::default();
            let mut right = SideBorder::default();
            for run in &vertical {
                let (edge_x, side) = if run.x <= x1 {
                    (x1, &mut left)
                } else if run.x >= x2 {
                    (x2, &mut right)
                } else {
                    continue;
                };
                let fit = CornerFit::new(run, edge_x, top, bottom);
                if fit.is_square(limit) {
                    side.offer(run.x, fit.spread());
                }
            }

            if let (Some(l), Some(r)) = (left.x(), right.x()) {
                let origin = map.origin();
                rects.push(Rect::from_corners(
                    origin.x + l,
                    origin.y + top,
                    origin.x + r,
                    origin.y + bottom,
                ));
            }
        }
    }

    let candidates = rects.len();
    let mut rects = remove_nested(rects);
    rects.sort_by_key(|r| (r.x, r.y));
    debug!(
        "Rectangle search: {} horizontal runs, {} vertical runs, {} candidates, {} kept",
        horizontal.len(),
        vertical.len(),
        candidates,
        rects.len()
    );
    rects
}

/// Drop every rectangle contained in another one; of identical rectangles
/// the first is kept
fn remove_nested(mut rects: Vec<Rect>) -> Vec<Rect> {
    let mut i = rects.len();
    while i > 0 {
        i -= 1;
        let nested = rects
            .iter()
            .enumerate()
            .any(|(j, outer)| j != i && outer.contains_rect(&rects[i]));
        if nested {
            rects.remove(i);
        }
    }
    rects
}

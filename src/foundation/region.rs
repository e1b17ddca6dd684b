//! Screen-space regions as owned sets of non-overlapping rectangles.
//!
//! The display side exposes regions as server handles that must be created and
//! destroyed explicitly. Here a region is a plain value: copying is `clone`,
//! destruction is `drop`, and a double free cannot be expressed.

use crate::foundation::core::IRect;

#[derive(Clone, Debug, Default)]
pub struct Region {
    // Invariant: rectangles are non-empty and pairwise disjoint.
    rects: Vec<IRect>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: IRect) -> Self {
        let mut region = Self::new();
        region.union_rect(rect);
        region
    }

    pub fn from_rects(rects: impl IntoIterator<Item = IRect>) -> Self {
        let mut region = Self::new();
        for rect in rects {
            region.union_rect(rect);
        }
        region
    }

    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn area(&self) -> u64 {
        self.rects.iter().map(IRect::area).sum()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains(x, y))
    }

    /// Smallest rectangle covering the whole region.
    pub fn extents(&self) -> Option<IRect> {
        let first = self.rects.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.right(), first.bottom());
        for r in &self.rects[1..] {
            x0 = x0.min(r.x);
            y0 = y0.min(r.y);
            x1 = x1.max(r.right());
            y1 = y1.max(r.bottom());
        }
        IRect::from_edges(x0, y0, x1, y1)
    }

    pub fn union_rect(&mut self, rect: IRect) {
        if rect.is_empty() {
            return;
        }
        let mut pieces = vec![rect];
        for existing in &self.rects {
            pieces = pieces
                .into_iter()
                .flat_map(|p| subtract_rect(p, existing))
                .collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    pub fn union(&mut self, other: &Region) {
        for rect in &other.rects {
            self.union_rect(*rect);
        }
    }

    pub fn subtract(&mut self, other: &Region) {
        for cut in &other.rects {
            if self.rects.is_empty() {
                return;
            }
            self.rects = self
                .rects
                .iter()
                .flat_map(|r| subtract_rect(*r, cut))
                .collect();
        }
    }

    pub fn intersect(&mut self, other: &Region) {
        let mut out = Vec::new();
        for a in &self.rects {
            for b in &other.rects {
                if let Some(i) = a.intersect(b) {
                    out.push(i);
                }
            }
        }
        self.rects = out;
    }

    pub fn intersect_rect(&mut self, rect: IRect) {
        self.rects = self
            .rects
            .iter()
            .filter_map(|r| r.intersect(&rect))
            .collect();
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for r in &mut self.rects {
            *r = r.translate(dx, dy);
        }
    }
}

/// `a` minus `b`, as up to four disjoint bands.
fn subtract_rect(a: IRect, b: &IRect) -> Vec<IRect> {
    let Some(hole) = a.intersect(b) else {
        return vec![a];
    };
    let mut out = Vec::with_capacity(4);
    // above and below span the full width of `a`
    out.extend(IRect::from_edges(a.x, a.y, a.right(), hole.y));
    out.extend(IRect::from_edges(a.x, hole.bottom(), a.right(), a.bottom()));
    // left and right stay within the hole's rows
    out.extend(IRect::from_edges(a.x, hole.y, hole.x, hole.bottom()));
    out.extend(IRect::from_edges(hole.right(), hole.y, a.right(), hole.bottom()));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/region.rs"]
mod tests;

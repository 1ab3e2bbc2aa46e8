use crate::foundation::core::Rect;
use crate::region::margin::Margin;

/// Fraction of the target that must overlap the region to count as on-screen (1%).
pub const VISIBILITY_THRESHOLD: f64 = 0.01;

/// The viewport rectangle grown by a resolved [`Margin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservationRegion {
    rect: Rect,
}

impl ObservationRegion {
    /// Build the region for `viewport` expanded by `margin`.
    pub fn new(viewport: Rect, margin: &Margin) -> Self {
        let viewport = viewport.abs();
        let insets = margin.resolve(viewport.size());
        Self {
            rect: viewport.inset(insets),
        }
    }

    /// The region rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Share of `target`'s area that lies inside the region, in `[0, 1]`.
    ///
    /// A zero-area target has ratio 1 when it overlaps or touches the region on both axes.
    pub fn intersection_ratio(&self, target: Rect) -> f64 {
        let target = target.abs();
        let area = target.area();
        if area == 0.0 {
            let touches = target.x0 <= self.rect.x1
                && target.x1 >= self.rect.x0
                && target.y0 <= self.rect.y1
                && target.y1 >= self.rect.y0;
            return if touches { 1.0 } else { 0.0 };
        }
        let overlap = self.rect.intersect(target).area();
        (overlap / area).clamp(0.0, 1.0)
    }

    /// Return `true` when at least `threshold` of `target` overlaps the region.
    pub fn is_intersecting(&self, target: Rect, threshold: f64) -> bool {
        let ratio = self.intersection_ratio(target);
        ratio > 0.0 && ratio >= threshold
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/observation.rs"]
mod tests;

pub use kurbo::{Insets, Point, Rect, Size, Vec2};

/// Content-box size of a tracked element, in pixels.
///
/// A value type: a new `Dimension` replaces the previous one, nothing mutates it in place.
/// Equality is exact on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawDimension")]
pub struct Dimension {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Dimension {
    /// The `0×0` dimension reported before anything was measured.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a dimension. Negative or NaN inputs are clamped to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_len(width),
            height: clamp_len(height),
        }
    }

    /// Return `true` when either axis differs from `other`.
    ///
    /// No tolerance is applied, so sub-pixel changes count.
    pub fn differs_from(self, other: Self) -> bool {
        self.width != other.width || self.height != other.height
    }

    /// Return `true` when both axes are zero.
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Convert to a `kurbo` size.
    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Deserialized form, clamped through [`Dimension::new`].
#[derive(serde::Deserialize)]
struct RawDimension {
    width: f64,
    height: f64,
}

impl From<RawDimension> for Dimension {
    fn from(raw: RawDimension) -> Self {
        Self::new(raw.width, raw.height)
    }
}

impl From<Size> for Dimension {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Dimension> for Size {
    fn from(dim: Dimension) -> Self {
        dim.to_size()
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn clamp_len(v: f64) -> f64 {
    // `max` maps NaN to the other operand.
    v.max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

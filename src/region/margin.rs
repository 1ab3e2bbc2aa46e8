use crate::foundation::core::{Insets, Size};
use crate::foundation::error::{SizegateError, SizegateResult};

/// Root margin used when preloading is enabled: extend the region 400px below the viewport.
pub const PRELOAD_MARGIN: &str = "0px 0px 400px 0px";

/// Root margin used when preloading is disabled: the region is exactly the viewport.
pub const ZERO_MARGIN: &str = "0px";

/// Caller-facing preload option: a flag, or a CSS-margin shorthand string.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Preload {
    /// `true` selects [`PRELOAD_MARGIN`], `false` selects [`ZERO_MARGIN`].
    Flag(bool),
    /// A custom margin such as `"100px 0px 200px 50px"`, passed through verbatim.
    Margin(String),
}

impl Default for Preload {
    fn default() -> Self {
        Self::Flag(true)
    }
}

impl From<bool> for Preload {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for Preload {
    fn from(v: &str) -> Self {
        Self::Margin(v.to_owned())
    }
}

impl From<String> for Preload {
    fn from(v: String) -> Self {
        Self::Margin(v)
    }
}

/// Margin around the viewport, in CSS-margin shorthand, as handed to the visibility source.
///
/// Construction never validates. Use [`RootMargin::offsets`] to parse it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RootMargin(String);

impl RootMargin {
    /// Wrap a margin string without interpreting it.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the margin text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the shorthand into per-side offsets.
    ///
    /// Accepts 1 to 4 whitespace-separated `<number>px` or `<number>%` tokens, expanded like CSS
    /// `margin`. Empty input is a zero margin.
    pub fn offsets(&self) -> SizegateResult<Margin> {
        let tokens = self
            .0
            .split_whitespace()
            .map(|t| MarginLength::parse(t).map_err(|e| self.reject(&e)))
            .collect::<SizegateResult<Vec<_>>>()?;

        let (top, right, bottom, left) = match tokens.as_slice() {
            [] => return Ok(Margin::ZERO),
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(self.reject("expected at most 4 lengths")),
        };
        Ok(Margin {
            top,
            right,
            bottom,
            left,
        })
    }

    fn reject(&self, why: &str) -> SizegateError {
        SizegateError::configuration(format!("root margin {:?}: {why}", self.0))
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::new(PRELOAD_MARGIN)
    }
}

impl std::fmt::Display for RootMargin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn the `preload` option into the root margin handed to the visibility source.
///
/// Strings are forwarded verbatim; a malformed one is rejected later by the source that
/// consumes it, not here.
pub fn parse_margin(preload: &Preload) -> RootMargin {
    match preload {
        Preload::Flag(true) => RootMargin::new(PRELOAD_MARGIN),
        Preload::Flag(false) => RootMargin::new(ZERO_MARGIN),
        Preload::Margin(s) => RootMargin::new(s.clone()),
    }
}

/// One side of a [`Margin`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MarginLength {
    /// Absolute length in pixels.
    Px(f64),
    /// Percentage of the viewport extent along the same axis.
    Percent(f64),
}

impl MarginLength {
    fn parse(token: &str) -> Result<Self, String> {
        let lower = token.to_ascii_lowercase();
        let (num, ctor): (&str, fn(f64) -> Self) = if let Some(n) = lower.strip_suffix('%') {
            (n, Self::Percent)
        } else if let Some(n) = lower.strip_suffix("px") {
            (n, Self::Px)
        } else {
            return Err(format!("{token:?} must be specified in pixels or percent"));
        };

        let v: f64 = num
            .parse()
            .map_err(|_| format!("{token:?} is not a number"))?;
        if !v.is_finite() {
            return Err(format!("{token:?} is not finite"));
        }
        if v < 0.0 {
            return Err(format!("{token:?} must not be negative"));
        }
        Ok(ctor(v))
    }

    /// Resolve to pixels against the viewport extent on this side's axis.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => extent * p / 100.0,
        }
    }
}

/// Per-side offsets by which the observation region extends past the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Margin {
    /// Offset above the viewport.
    pub top: MarginLength,
    /// Offset right of the viewport.
    pub right: MarginLength,
    /// Offset below the viewport.
    pub bottom: MarginLength,
    /// Offset left of the viewport.
    pub left: MarginLength,
}

impl Margin {
    /// Region equals the viewport.
    pub const ZERO: Self = Self::px(0.0, 0.0, 0.0, 0.0);

    /// Default preload margin, `0 0 400 0`.
    pub const PRELOAD: Self = Self::px(0.0, 0.0, 400.0, 0.0);

    /// Build a margin from pixel offsets in top/right/bottom/left order.
    pub const fn px(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: MarginLength::Px(top),
            right: MarginLength::Px(right),
            bottom: MarginLength::Px(bottom),
            left: MarginLength::Px(left),
        }
    }

    /// Resolve to `kurbo` insets for a viewport of the given size.
    ///
    /// Vertical sides resolve percentages against the height, horizontal ones against the width.
    pub fn resolve(&self, viewport: Size) -> Insets {
        Insets::new(
            self.left.resolve(viewport.width),
            self.top.resolve(viewport.height),
            self.right.resolve(viewport.width),
            self.bottom.resolve(viewport.height),
        )
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/margin.rs"]
mod tests;

//! The filter catalog: every look tintbox offers and the parameters it takes.
//!
//! Seven filters, three parameter kinds. Which filter accepts which kind is
//! a static table baked into [`FilterKind::parameters`] — there is no runtime
//! key probing, and an unknown filter cannot exist past parsing.
//!
//! | Filter | Intensity | Radius | Scale |
//! |---|---|---|---|
//! | Sepia Tone | ✓ | | |
//! | Unsharp Mask | ✓ | | |
//! | Crystallize | | | ✓ |
//! | Pixellate | | | ✓ |
//! | Gaussian Blur | | ✓ | |
//! | Edges | | | ✓ |
//! | Vignette | ✓ | | |
//!
//! A UI shell consults [`FilterKind::accepts`] to decide which of its
//! controls are meaningful for the current filter (e.g. enabling a radius
//! slider only for Gaussian Blur).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven supported image filters.
///
/// `Default` is Sepia Tone — the filter a fresh editing session starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    SepiaTone,
    UnsharpMask,
    Vignette,
}

/// The abstract parameter shapes a filter can accept.
///
/// Every filter maps the single user-facing strength dial onto one or more
/// of these; the concrete values come from
/// [`map_parameters`](super::mapping::map_parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    Intensity,
    Radius,
    Scale,
}

impl FilterKind {
    /// All filters in menu order (alphabetical, matching the selection menu).
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Crystallize,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::SepiaTone,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
    ];

    /// The parameter kinds this filter accepts.
    ///
    /// Pure and total. In the current catalog every filter happens to accept
    /// exactly one kind; callers must not rely on that and should treat the
    /// result as a set.
    pub fn parameters(self) -> &'static [ParameterKind] {
        match self {
            FilterKind::SepiaTone => &[ParameterKind::Intensity],
            FilterKind::UnsharpMask => &[ParameterKind::Intensity],
            FilterKind::Crystallize => &[ParameterKind::Scale],
            FilterKind::Pixellate => &[ParameterKind::Scale],
            FilterKind::GaussianBlur => &[ParameterKind::Radius],
            // Edge detection's native knob is intensity-like but rides the
            // scale mapping.
            FilterKind::Edges => &[ParameterKind::Scale],
            FilterKind::Vignette => &[ParameterKind::Intensity],
        }
    }

    /// Whether this filter accepts the given parameter kind.
    pub fn accepts(self, kind: ParameterKind) -> bool {
        self.parameters().contains(&kind)
    }

    /// Human-readable name, as shown in a filter menu.
    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
        }
    }

    /// Stable identifier used on the command line and in config files.
    pub fn slug(self) -> &'static str {
        match self {
            FilterKind::Crystallize => "crystallize",
            FilterKind::Edges => "edges",
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::Pixellate => "pixellate",
            FilterKind::SepiaTone => "sepia-tone",
            FilterKind::UnsharpMask => "unsharp-mask",
            FilterKind::Vignette => "vignette",
        }
    }
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::SepiaTone
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl ParameterKind {
    /// Lowercase identifier, as shown in listings and JSON output.
    pub fn name(self) -> &'static str {
        match self {
            ParameterKind::Intensity => "intensity",
            ParameterKind::Radius => "radius",
            ParameterKind::Scale => "scale",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized filter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter {0:?} (expected one of: crystallize, edges, gaussian-blur, pixellate, sepia-tone, unsharp-mask, vignette)")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    /// Parse a filter slug, case-insensitively.
    ///
    /// # Examples
    /// ```
    /// # use tintbox::filtering::FilterKind;
    /// assert_eq!("sepia-tone".parse(), Ok(FilterKind::SepiaTone));
    /// assert_eq!("Gaussian-Blur".parse(), Ok(FilterKind::GaussianBlur));
    /// assert!("solarize".parse::<FilterKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        FilterKind::ALL
            .iter()
            .copied()
            .find(|f| f.slug() == lower)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

//! Mapping the single strength dial onto concrete filter parameters.
//!
//! The user controls one normalized scalar. Each parameter kind stretches it
//! over its own native range with a fixed rule:
//!
//! | Kind | Rule | Range |
//! |---|---|---|
//! | Intensity | identity | 0–1 |
//! | Radius | × 200 | 0–200 |
//! | Scale | × 10 | 0–10 |
//!
//! All functions here are pure and deterministic — this runs on every slider
//! tick, so same inputs must give same outputs and the work is O(1).

use super::catalog::{FilterKind, ParameterKind};

/// Full span of the radius mapping at strength 1.0.
pub const RADIUS_SPAN: f32 = 200.0;

/// Full span of the scale mapping at strength 1.0.
pub const SCALE_SPAN: f32 = 10.0;

/// Normalized filter strength in `[0, 1]`.
///
/// Clamped on construction, so everything downstream can assume the range —
/// the shell's slider (or the CLI's argument validator) is the intended
/// source of values. `Default` is `0.5`, where a fresh session starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strength(f32);

impl Strength {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self(0.5)
    }
}

/// Concrete parameter values computed for one filter at one strength.
///
/// Contains exactly the kinds the filter declares in the
/// [catalog](super::catalog::FilterKind::parameters) — no more, no less.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParameterValues {
    intensity: Option<f32>,
    radius: Option<f32>,
    scale: Option<f32>,
}

impl ParameterValues {
    /// The value for a parameter kind, if the filter accepts it.
    pub fn get(&self, kind: ParameterKind) -> Option<f32> {
        match kind {
            ParameterKind::Intensity => self.intensity,
            ParameterKind::Radius => self.radius,
            ParameterKind::Scale => self.scale,
        }
    }

    /// The parameter kinds present, in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = ParameterKind> + '_ {
        [
            ParameterKind::Intensity,
            ParameterKind::Radius,
            ParameterKind::Scale,
        ]
        .into_iter()
        .filter(|&k| self.get(k).is_some())
    }

    pub fn len(&self) -> usize {
        self.kinds().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set(&mut self, kind: ParameterKind, value: f32) {
        match kind {
            ParameterKind::Intensity => self.intensity = Some(value),
            ParameterKind::Radius => self.radius = Some(value),
            ParameterKind::Scale => self.scale = Some(value),
        }
    }
}

/// Scale a normalized strength onto one parameter kind's native range.
fn scale_onto(kind: ParameterKind, strength: Strength) -> f32 {
    match kind {
        ParameterKind::Intensity => strength.value(),
        ParameterKind::Radius => strength.value() * RADIUS_SPAN,
        ParameterKind::Scale => strength.value() * SCALE_SPAN,
    }
}

/// Compute concrete parameter values for `filter` at `strength`.
///
/// # Examples
/// ```
/// # use tintbox::filtering::{map_parameters, FilterKind, ParameterKind, Strength};
/// let params = map_parameters(FilterKind::GaussianBlur, Strength::new(0.5));
/// assert_eq!(params.get(ParameterKind::Radius), Some(100.0));
/// assert_eq!(params.get(ParameterKind::Intensity), None);
/// ```
pub fn map_parameters(filter: FilterKind, strength: Strength) -> ParameterValues {
    let mut values = ParameterValues::default();
    for &kind in filter.parameters() {
        values.set(kind, scale_onto(kind, strength));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Strength
    // =========================================================================

    #[test]
    fn strength_clamps_to_unit_range() {
        assert_eq!(Strength::new(-0.3).value(), 0.0);
        assert_eq!(Strength::new(0.4).value(), 0.4);
        assert_eq!(Strength::new(1.7).value(), 1.0);
    }

    #[test]
    fn strength_default_is_half() {
        assert_eq!(Strength::default().value(), 0.5);
    }

    // =========================================================================
    // map_parameters
    // =========================================================================

    #[test]
    fn output_kinds_match_catalog_exactly() {
        for filter in FilterKind::ALL {
            let params = map_parameters(filter, Strength::new(0.5));
            let declared = filter.parameters();
            assert_eq!(params.len(), declared.len(), "{filter}");
            for kind in [
                ParameterKind::Intensity,
                ParameterKind::Radius,
                ParameterKind::Scale,
            ] {
                assert_eq!(
                    params.get(kind).is_some(),
                    declared.contains(&kind),
                    "{filter} / {kind}"
                );
            }
        }
    }

    #[test]
    fn intensity_is_identity() {
        let params = map_parameters(FilterKind::SepiaTone, Strength::new(0.25));
        assert_eq!(params.get(ParameterKind::Intensity), Some(0.25));
    }

    #[test]
    fn radius_scales_by_two_hundred() {
        let params = map_parameters(FilterKind::GaussianBlur, Strength::new(0.5));
        assert_eq!(params.get(ParameterKind::Radius), Some(100.0));

        let full = map_parameters(FilterKind::GaussianBlur, Strength::new(1.0));
        assert_eq!(full.get(ParameterKind::Radius), Some(RADIUS_SPAN));
    }

    #[test]
    fn scale_scales_by_ten() {
        for filter in [FilterKind::Crystallize, FilterKind::Pixellate, FilterKind::Edges] {
            let params = map_parameters(filter, Strength::new(0.25));
            assert_eq!(params.get(ParameterKind::Scale), Some(2.5), "{filter}");
        }
        let full = map_parameters(FilterKind::Edges, Strength::new(1.0));
        assert_eq!(full.get(ParameterKind::Scale), Some(SCALE_SPAN));
    }

    #[test]
    fn zero_strength_maps_to_zero_everywhere() {
        for filter in FilterKind::ALL {
            let params = map_parameters(filter, Strength::new(0.0));
            for kind in params.kinds() {
                assert_eq!(params.get(kind), Some(0.0), "{filter} / {kind}");
            }
        }
    }

    #[test]
    fn mapping_is_monotone_in_strength() {
        for filter in FilterKind::ALL {
            let mut previous = -1.0f32;
            for step in 0..=10 {
                let strength = Strength::new(step as f32 / 10.0);
                let params = map_parameters(filter, strength);
                let kind = filter.parameters()[0];
                let value = params.get(kind).unwrap();
                assert!(value >= previous, "{filter} not monotone at {strength:?}");
                previous = value;
            }
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let a = map_parameters(FilterKind::Vignette, Strength::new(0.73));
        let b = map_parameters(FilterKind::Vignette, Strength::new(0.73));
        assert_eq!(a, b);
    }
}

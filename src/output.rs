//! CLI output formatting.
//!
//! Each view has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects. The `--json` variants are
//! serialized from the same structures, so human and machine output can
//! never drift apart.

use crate::filtering::{FilterKind, Strength, map_parameters};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One catalog row, as listed by `tintbox filters`.
#[derive(Debug, Clone, Serialize)]
pub struct FilterListing {
    pub name: &'static str,
    pub slug: &'static str,
    pub parameters: Vec<String>,
}

/// The full catalog in menu order.
pub fn catalog_listing() -> Vec<FilterListing> {
    FilterKind::ALL
        .iter()
        .map(|&filter| FilterListing {
            name: filter.display_name(),
            slug: filter.slug(),
            parameters: filter
                .parameters()
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
        })
        .collect()
}

pub fn format_catalog(listing: &[FilterListing]) -> Vec<String> {
    let width = listing.iter().map(|f| f.name.len()).max().unwrap_or(0);
    listing
        .iter()
        .map(|f| {
            format!(
                "{:width$}  {}  ({})",
                f.name,
                f.parameters.join(", "),
                f.slug,
            )
        })
        .collect()
}

pub fn print_catalog(listing: &[FilterListing]) {
    for line in format_catalog(listing) {
        println!("{line}");
    }
}

/// The mapped parameter values for one filter at one strength, as shown by
/// `tintbox params`.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterReport {
    pub filter: &'static str,
    pub strength: f32,
    pub values: BTreeMap<&'static str, f32>,
}

pub fn parameter_report(filter: FilterKind, strength: Strength) -> ParameterReport {
    let params = map_parameters(filter, strength);
    let values = params
        .kinds()
        .map(|kind| (kind.name(), params.get(kind).unwrap_or(0.0)))
        .collect();
    ParameterReport {
        filter: filter.slug(),
        strength: strength.value(),
        values,
    }
}

pub fn format_parameter_report(report: &ParameterReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} @ strength {}",
        report.filter, report.strength
    )];
    for (name, value) in &report.values {
        lines.push(format!("    {name}: {value}"));
    }
    lines
}

pub fn print_parameter_report(report: &ParameterReport) {
    for line in format_parameter_report(report) {
        println!("{line}");
    }
}

/// Progress of one input during an `apply` run. Sent from rayon workers to
/// the printer thread.
#[derive(Debug)]
pub enum ApplyEvent {
    Saved { input: PathBuf, output: PathBuf },
    Failed { input: PathBuf, error: String },
}

pub fn format_apply_event(event: &ApplyEvent) -> String {
    match event {
        ApplyEvent::Saved { input, output } => {
            format!("{} → {}", display_name(input), output.display())
        }
        ApplyEvent::Failed { input, error } => {
            format!("{}: {error}", display_name(input))
        }
    }
}

pub fn format_apply_summary(saved: usize, failed: usize) -> String {
    if failed == 0 {
        format!("Saved {saved} image{}", plural(saved))
    } else {
        format!("Saved {saved} image{}, {failed} failed", plural(saved))
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn catalog_listing_covers_every_filter() {
        let listing = catalog_listing();
        assert_eq!(listing.len(), FilterKind::ALL.len());
        assert!(listing.iter().any(|f| f.slug == "sepia-tone"));
    }

    #[test]
    fn catalog_lines_carry_name_parameters_and_slug() {
        let lines = format_catalog(&catalog_listing());
        let blur = lines
            .iter()
            .find(|l| l.contains("Gaussian Blur"))
            .expect("blur row");
        assert!(blur.contains("radius"));
        assert!(blur.contains("(gaussian-blur)"));
    }

    #[test]
    fn parameter_report_reflects_the_mapping() {
        let report = parameter_report(FilterKind::GaussianBlur, Strength::new(0.5));
        assert_eq!(report.filter, "gaussian-blur");
        assert_eq!(report.values.get("radius"), Some(&100.0));
        assert_eq!(report.values.len(), 1);
    }

    #[test]
    fn parameter_report_serializes_to_stable_json() {
        let report = parameter_report(FilterKind::Pixellate, Strength::new(1.0));
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"filter":"pixellate","strength":1.0,"values":{"scale":10.0}}"#
        );
    }

    #[test]
    fn apply_event_lines() {
        let saved = ApplyEvent::Saved {
            input: PathBuf::from("/photos/dawn.jpg"),
            output: PathBuf::from("out/dawn-sepia-tone.png"),
        };
        assert_eq!(
            format_apply_event(&saved),
            "dawn.jpg → out/dawn-sepia-tone.png"
        );

        let failed = ApplyEvent::Failed {
            input: PathBuf::from("/photos/dusk.jpg"),
            error: "Processing failed: mosaic cell size rounds to zero (scale 0)".into(),
        };
        assert!(format_apply_event(&failed).starts_with("dusk.jpg: "));
    }

    #[test]
    fn apply_summary_counts() {
        assert_eq!(format_apply_summary(1, 0), "Saved 1 image");
        assert_eq!(format_apply_summary(3, 0), "Saved 3 images");
        assert_eq!(format_apply_summary(2, 1), "Saved 2 images, 1 failed");
    }
}

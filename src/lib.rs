//! # Tintbox
//!
//! A small photo-filter darkroom: pick a picture, choose one of seven
//! classic looks, drag a single strength dial, save the result. This crate
//! is the engine behind that loop; the binary is a thin command-line shell
//! over it, and a GUI shell would drive exactly the same three entry
//! points.
//!
//! # Architecture: Catalog → Mapping → Engine
//!
//! The session logic is deliberately pixel-free. Three layers, each a pure
//! function of the one before it:
//!
//! ```text
//! 1. Catalog   which filters exist, which parameter kinds each accepts
//! 2. Mapping   strength dial (0–1)  →  concrete parameter values
//! 3. Engine    session state; reprocesses via a FilterBackend on change
//! ```
//!
//! Pixel work happens only behind the [`filtering::FilterBackend`] seam
//! (production: the `image`-crate-backed [`filtering::RasterBackend`];
//! tests: a recording mock). Persistence happens behind
//! [`store::PhotoStore`], with completion delivered asynchronously through
//! a [`store::SaveTicket`]. The engine itself never blocks on either
//! collaborator's timing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`filtering`] | Filter catalog, strength→parameter mapping, backend seam, `image`-crate backend |
//! | [`engine`] | One editing session: state, reprocessing rules, save |
//! | [`preview`] | Background rendering for interactive shells; newest request supersedes older ones |
//! | [`store`] | Photo persistence seam + disk store with async completion tickets |
//! | [`config`] | `tintbox.toml` defaults (filter, strength, output format) |
//! | [`output`] | CLI output formatting — pure `format_*` functions + print wrappers |
//!
//! # Design Decisions
//!
//! ## Reprocess From the Source, Always
//!
//! Every recompute feeds the engine's *original* source image to the
//! backend. Switching from Sepia Tone to Gaussian Blur therefore blurs the
//! photo the user picked — not a sepia-toned preview of it. Filters never
//! compound, and a session can wander through the whole catalog without
//! degrading the picture.
//!
//! ## One Dial, Static Parameter Table
//!
//! Filters differ in what their single knob *means* (an intensity, a blur
//! radius in pixels, a cell scale). Rather than probing parameter names at
//! runtime, the catalog declares each filter's accepted kinds in a static
//! table and the mapper stretches the normalized dial over each kind's
//! native range. A shell asks the catalog which kinds the current filter
//! accepts to decide which of its controls to enable.
//!
//! ## Failures Are Reported, Previews Are Kept
//!
//! When the backend cannot produce output, the engine keeps the previous
//! preview on screen and returns an explicit failure report — no silent
//! no-op, no flash to blank. Saving with nothing to save is rejected up
//! front; store failures arrive through the save ticket and are always
//! retryable.

pub mod config;
pub mod engine;
pub mod filtering;
pub mod output;
pub mod preview;
pub mod store;

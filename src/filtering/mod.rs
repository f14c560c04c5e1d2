//! Filters, parameter mapping, and the pixel-work seam.
//!
//! The module is split into:
//! - **Catalog**: the seven [`FilterKind`]s and the static table of
//!   parameter kinds each accepts
//! - **Mapping**: pure scaling from the one user-facing [`Strength`] dial
//!   onto each accepted parameter's native range (unit testable)
//! - **Backend**: [`FilterBackend`] trait + [`RawImage`] currency — the
//!   boundary behind which all pixel computation happens
//! - **Raster**: the production backend delegating to the `image` crate,
//!   plus file decode/encode for the shell and the disk store

pub mod backend;
pub mod catalog;
pub mod mapping;
pub mod raster;

pub use backend::{BackendError, FilterBackend, RawImage};
pub use catalog::{FilterKind, ParameterKind, UnknownFilter};
pub use mapping::{ParameterValues, Strength, map_parameters};
pub use raster::{RasterBackend, load_raw, save_raw};

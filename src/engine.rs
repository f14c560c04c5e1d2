//! The reprocessing engine: one editing session's state and its rules.
//!
//! An [`Engine`] owns the session — current filter, strength, the source
//! image, and the derived preview — and is mutated only through three entry
//! points: [`select_image`](Engine::select_image),
//! [`select_filter`](Engine::select_filter), and
//! [`set_strength`](Engine::set_strength). Every mutation reprocesses from
//! the **original source image**, never from the previous preview, so
//! switching filters can never compound effects.
//!
//! # States
//!
//! ```text
//! Empty  — no source image; filter/strength changes are recorded but
//!          nothing is processed (Recompute::Skipped)
//! Ready  — source present; every mutation reprocesses the preview
//! ```
//!
//! The three mutators are total: they always record the new state and
//! report the recompute outcome as a value. A backend failure is surfaced
//! as [`Recompute::Failed`] while the previous preview is retained, so a
//! shell keeps showing *something* but knows the preview is stale.
//!
//! Saving is the only operation with an error channel: it rejects
//! immediately when there is nothing to save, and otherwise hands the
//! buffer to a [`PhotoStore`] whose outcome arrives through the returned
//! [`SaveTicket`].

use crate::filtering::{
    BackendError, FilterBackend, FilterKind, RawImage, Strength, map_parameters,
};
use crate::store::{PhotoStore, SaveTicket};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("no processed image to save — select a picture first")]
    NoImage,
}

/// Outcome of one state-changing call.
#[derive(Debug)]
pub enum Recompute {
    /// The preview was regenerated for the new state.
    Applied,
    /// No source image yet; the change was recorded, nothing processed.
    Skipped,
    /// The backend failed; the previous preview (if any) is retained and
    /// no longer matches the recorded state.
    Failed(BackendError),
}

impl Recompute {
    pub fn is_applied(&self) -> bool {
        matches!(self, Recompute::Applied)
    }
}

/// A photo editing session over a filter backend.
pub struct Engine<B> {
    backend: B,
    filter: FilterKind,
    strength: Strength,
    source: Option<RawImage>,
    preview: Option<RawImage>,
}

impl<B: FilterBackend> Engine<B> {
    /// A fresh session: Sepia Tone at strength 0.5, no image yet.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            filter: FilterKind::default(),
            strength: Strength::default(),
            source: None,
            preview: None,
        }
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    pub fn source(&self) -> Option<&RawImage> {
        self.source.as_ref()
    }

    /// The current processed preview, if any recompute has succeeded.
    pub fn preview(&self) -> Option<&RawImage> {
        self.preview.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Accept a newly picked image and reprocess with the current settings.
    ///
    /// The current filter and strength are kept — picking a new picture
    /// does not reset the look.
    pub fn select_image(&mut self, image: RawImage) -> Recompute {
        self.source = Some(image);
        self.reprocess()
    }

    /// Switch filters and reprocess the original source, if one is present.
    pub fn select_filter(&mut self, filter: FilterKind) -> Recompute {
        self.filter = filter;
        self.reprocess()
    }

    /// Move the strength dial and reprocess, if a source is present.
    pub fn set_strength(&mut self, strength: Strength) -> Recompute {
        self.strength = strength;
        self.reprocess()
    }

    /// Hand the current preview to a persistence collaborator.
    ///
    /// Session state is never changed by saving; the store's outcome is
    /// reported through the ticket.
    pub fn save(&self, store: &impl PhotoStore) -> Result<SaveTicket, SaveError> {
        let preview = self.preview.as_ref().ok_or(SaveError::NoImage)?;
        Ok(store.save(preview.clone()))
    }

    fn reprocess(&mut self) -> Recompute {
        let Some(source) = &self.source else {
            return Recompute::Skipped;
        };
        let params = map_parameters(self.filter, self.strength);
        match self.backend.apply(source, self.filter, &params) {
            Ok(image) => {
                self.preview = Some(image);
                Recompute::Applied
            }
            Err(error) => Recompute::Failed(error),
        }
    }
}

//! Photo persistence — the "write to the photo library" collaborator.
//!
//! Saving is asynchronous from the engine's point of view: a
//! [`PhotoStore`] accepts the buffer and immediately hands back a
//! [`SaveTicket`], and the actual outcome arrives through the ticket later.
//! Each request has exactly one resolution point; a store that disappears
//! without reporting resolves to [`StoreError::Abandoned`] instead of
//! hanging the caller.
//!
//! The production implementation is [`DiskStore`], which encodes the buffer
//! to a target path on a background thread. Tests use the recording
//! `MockStore` below.

use crate::filtering::{BackendError, RawImage, raster};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("store went away without reporting a result")]
    Abandoned,
}

/// Completion handle for one save request.
///
/// The result is delivered exactly once. [`wait`](SaveTicket::wait) blocks
/// until it arrives; [`try_complete`](SaveTicket::try_complete) polls, so an
/// event-driven shell can stay responsive while the store works.
#[derive(Debug)]
pub struct SaveTicket {
    rx: mpsc::Receiver<Result<(), StoreError>>,
}

/// The store-side half of a ticket. Consumed by resolving.
pub struct SaveCompletion {
    tx: mpsc::Sender<Result<(), StoreError>>,
}

impl SaveTicket {
    /// Create a ticket and its resolution handle.
    pub fn channel() -> (SaveCompletion, SaveTicket) {
        let (tx, rx) = mpsc::channel();
        (SaveCompletion { tx }, SaveTicket { rx })
    }

    /// Block until the store reports.
    pub fn wait(self) -> Result<(), StoreError> {
        self.rx.recv().unwrap_or(Err(StoreError::Abandoned))
    }

    /// Poll for the result without blocking.
    ///
    /// `None` while the save is still in flight.
    pub fn try_complete(&self) -> Option<Result<(), StoreError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(StoreError::Abandoned)),
        }
    }
}

impl SaveCompletion {
    /// Report the outcome. Dropping without resolving abandons the ticket.
    pub fn resolve(self, result: Result<(), StoreError>) {
        // The ticket may already be gone; nothing to report to then.
        let _ = self.tx.send(result);
    }
}

/// Trait for photo persistence providers.
///
/// Ownership of the buffer transfers to the store; the engine keeps its own
/// preview. Implementations must resolve the ticket exactly once.
pub trait PhotoStore {
    fn save(&self, image: RawImage) -> SaveTicket;
}

/// Persistence to a single target file, format chosen by extension.
///
/// Encoding runs on a background thread so the caller's event loop is never
/// blocked on PNG/JPEG work.
pub struct DiskStore {
    path: PathBuf,
}

impl DiskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl PhotoStore for DiskStore {
    fn save(&self, image: RawImage) -> SaveTicket {
        let (completion, ticket) = SaveTicket::channel();
        let path = self.path.clone();
        thread::spawn(move || {
            let result = raster::save_raw(&image, &path).map_err(|e| match e {
                BackendError::Io(io) => StoreError::Io(io),
                BackendError::ProcessingFailed(msg) => StoreError::Encode(msg),
            });
            completion.resolve(result);
        });
        ticket
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::filtering::backend::tests::test_image;
    use crate::filtering::load_raw;
    use std::sync::Mutex;

    /// Mock store that records saved buffers and resolves immediately.
    #[derive(Default)]
    pub struct MockStore {
        pub saved: Mutex<Vec<RawImage>>,
        pub fail: bool,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn saved_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    impl PhotoStore for MockStore {
        fn save(&self, image: RawImage) -> SaveTicket {
            self.saved.lock().unwrap().push(image);
            let (completion, ticket) = SaveTicket::channel();
            if self.fail {
                completion.resolve(Err(StoreError::Encode("mock store refused".into())));
            } else {
                completion.resolve(Ok(()));
            }
            ticket
        }
    }

    #[test]
    fn mock_store_records_and_resolves() {
        let store = MockStore::new();
        let ticket = store.save(test_image(1));
        assert!(ticket.wait().is_ok());
        assert_eq!(store.saved_count(), 1);
    }

    #[test]
    fn failing_mock_store_reports_through_ticket() {
        let store = MockStore::failing();
        let err = store.save(test_image(1)).wait().unwrap_err();
        assert!(matches!(err, StoreError::Encode(_)));
    }

    #[test]
    fn dropped_completion_abandons_ticket() {
        let (completion, ticket) = SaveTicket::channel();
        drop(completion);
        assert!(matches!(ticket.wait(), Err(StoreError::Abandoned)));
    }

    #[test]
    fn try_complete_is_none_while_pending() {
        let (completion, ticket) = SaveTicket::channel();
        assert!(ticket.try_complete().is_none());
        completion.resolve(Ok(()));
        assert!(matches!(ticket.try_complete(), Some(Ok(()))));
    }

    #[test]
    fn disk_store_writes_a_decodable_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("saved.png");
        let store = DiskStore::new(&path);

        store.save(test_image(9)).wait().unwrap();

        let loaded = load_raw(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (2, 1));
    }

    #[test]
    fn disk_store_surfaces_encode_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = DiskStore::new(tmp.path().join("saved.bmp"));
        let err = store.save(test_image(9)).wait().unwrap_err();
        assert!(matches!(err, StoreError::Encode(_)));
    }
}

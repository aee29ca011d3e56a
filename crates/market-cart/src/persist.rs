//! Background persistence of cart snapshots.
//!
//! Mutations hand a revision-stamped snapshot to a single writer task and
//! return immediately. The writer drains whatever is queued, keeps only the
//! newest revision and writes that one, so the stored blob always converges
//! on the last mutation regardless of how long individual writes take.

use std::sync::Arc;

use market_commerce::Cart;
use market_kv::{Cache, KvStore};
use tokio::sync::{mpsc, oneshot, watch};

use crate::error::PersistError;

/// Callback invoked for every failed read or write of the stored cart.
pub type ErrorHandler = Arc<dyn Fn(&PersistError) + Send + Sync>;

/// Where persistence of the cart currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PersistStatus {
    /// Nothing has been written since startup.
    #[default]
    Idle,
    /// A snapshot at `revision` is queued or being written.
    Pending { revision: u64 },
    /// The snapshot at `revision` is in storage.
    Saved { revision: u64 },
    /// Persisting `revision` failed. Revision 0 is the startup read.
    Failed { revision: u64, error: PersistError },
}

impl PersistStatus {
    fn revision(&self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Pending { revision }
            | Self::Saved { revision }
            | Self::Failed { revision, .. } => *revision,
        }
    }
}

/// A cart state to persist.
#[derive(Debug)]
pub(crate) struct Snapshot {
    pub revision: u64,
    pub cart: Cart,
}

pub(crate) enum PersistCommand {
    Write(Snapshot),
    /// Answered with the outcome of the last write performed.
    Flush(oneshot::Sender<Result<(), PersistError>>),
}

/// Shared reporting side of persistence: status channel plus error handler.
#[derive(Clone)]
pub(crate) struct Reporter {
    status: Arc<watch::Sender<PersistStatus>>,
    on_error: Option<ErrorHandler>,
}

impl Reporter {
    pub fn new(on_error: Option<ErrorHandler>) -> Self {
        let (status, _) = watch::channel(PersistStatus::Idle);
        Self {
            status: Arc::new(status),
            on_error,
        }
    }

    pub fn current(&self) -> PersistStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PersistStatus> {
        self.status.subscribe()
    }

    pub fn pending(&self, revision: u64) {
        self.status.send_replace(PersistStatus::Pending { revision });
    }

    pub fn saved(&self, revision: u64) {
        self.settle(PersistStatus::Saved { revision });
    }

    pub fn failed(&self, revision: u64, error: PersistError) {
        if let Some(handler) = &self.on_error {
            handler(&error);
        }
        self.settle(PersistStatus::Failed { revision, error });
    }

    /// Record a finished write unless a newer revision is already pending.
    fn settle(&self, outcome: PersistStatus) {
        self.status.send_if_modified(|current| {
            if matches!(current, PersistStatus::Pending { .. })
                && current.revision() > outcome.revision()
            {
                return false;
            }
            *current = outcome;
            true
        });
    }
}

/// The single task allowed to write the cart key.
pub(crate) struct Writer {
    cache: Cache<Arc<dyn KvStore>>,
    key: String,
    reporter: Reporter,
    rx: mpsc::UnboundedReceiver<PersistCommand>,
    last: Result<(), PersistError>,
}

impl Writer {
    pub fn new(
        cache: Cache<Arc<dyn KvStore>>,
        key: String,
        reporter: Reporter,
        rx: mpsc::UnboundedReceiver<PersistCommand>,
    ) -> Self {
        Self {
            cache,
            key,
            reporter,
            rx,
            last: Ok(()),
        }
    }

    /// Run until every sender is gone and the queue is drained.
    pub async fn run(mut self) {
        while let Some(first) = self.rx.recv().await {
            let mut latest: Option<Snapshot> = None;
            let mut waiters = Vec::new();

            let mut next = Some(first);
            while let Some(command) = next {
                match command {
                    PersistCommand::Write(snapshot) => {
                        if let Some(skipped) = latest.replace(snapshot) {
                            tracing::trace!(revision = skipped.revision, "coalesced cart write");
                        }
                    }
                    PersistCommand::Flush(tx) => waiters.push(tx),
                }
                next = self.rx.try_recv().ok();
            }

            if let Some(snapshot) = latest {
                self.last = self.write(snapshot).await;
            }
            for waiter in waiters {
                let _ = waiter.send(self.last.clone());
            }
        }
        tracing::debug!(key = %self.key, "cart writer stopped");
    }

    async fn write(&self, snapshot: Snapshot) -> Result<(), PersistError> {
        let Snapshot { revision, cart } = snapshot;
        match self.cache.set(&self.key, &cart).await {
            Ok(()) => {
                tracing::debug!(key = %self.key, revision, items = cart.len(), "persisted cart");
                self.reporter.saved(revision);
                Ok(())
            }
            Err(e) => {
                let error = PersistError::from_write(&self.key, e);
                tracing::error!(key = %self.key, revision, error = %error, "failed to persist cart");
                self.reporter.failed(revision, error.clone());
                Err(error)
            }
        }
    }
}

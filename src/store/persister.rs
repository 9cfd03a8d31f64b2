use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::KeyValueStore;

enum PersistCommand {
    Write { key: String, value: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer that applies store writes in submission order.
///
/// Submitting never waits for the store. Failed writes are logged and dropped;
/// the next submission for the same key carries the full latest state.
#[derive(Clone)]
pub struct PersistenceHandle {
    sender: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistenceHandle {
    /// Spawns the writer task on the current tokio runtime
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(store, receiver));
        (Self { sender }, handle)
    }

    /// Serializes `value` now and queues it as a full overwrite of `key`
    pub fn write_json<T>(&self, key: impl Into<String>, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        match serde_json::to_string(value) {
            Ok(value) => self.submit(PersistCommand::Write { key, value }),
            Err(err) => warn!(key = %key, error = %err, "Failed to serialize value for persistence"),
        }
    }

    /// Waits until every command submitted before this call has been applied
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        self.submit(PersistCommand::Flush(ack));
        let _ = done.await;
    }

    fn submit(&self, command: PersistCommand) {
        if self.sender.send(command).is_err() {
            warn!("Persistence writer has stopped, dropping command");
        }
    }
}

async fn run_writer(
    store: Arc<dyn KeyValueStore>,
    mut receiver: mpsc::UnboundedReceiver<PersistCommand>,
) {
    while let Some(command) = receiver.recv().await {
        match command {
            PersistCommand::Write { key, value } => match store.set(&key, value).await {
                Ok(()) => debug!(key = %key, "Persisted value"),
                Err(err) => warn!(key = %key, error = %err, "Failed to persist value"),
            },
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    debug!("Persistence writer stopped");
}

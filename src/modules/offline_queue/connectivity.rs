use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use super::OfflineQueue;

/// Shared online/offline flag
#[derive(Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Only actual changes wake subscribers
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                return false;
            }
            *current = online;
            true
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Flush the queue on every offline -> online transition
///
/// Starting while already online counts as a transition, so entries left over
/// from a previous run are delivered right away.
pub fn spawn_auto_sync(queue: Arc<OfflineQueue>) -> JoinHandle<()> {
    let mut changes = WatchStream::new(queue.connectivity().subscribe());

    tokio::spawn(async move {
        let mut was_online = false;
        while let Some(online) = changes.next().await {
            if online && !was_online {
                match queue.sync_pending().await {
                    Ok(summary) if summary.attempted > 0 => {
                        tracing::info!(
                            "Reconnected: synced {}/{} offline reports",
                            summary.synced,
                            summary.attempted
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Offline sync after reconnect failed: {}", e),
                }
            }
            was_online = online;
        }
    })
}

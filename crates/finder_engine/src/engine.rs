use std::collections::BTreeSet;
use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use finder_core::{RequestId, SearchQuery, SourceId};
use finder_logging::{finder_debug, finder_error};

use crate::{EngineEvent, OfferStore, SelectionStore};

enum EngineCommand {
    LoadSources,
    LoadSelection,
    Search {
        request_id: RequestId,
        query: SearchQuery,
    },
    SaveSelection {
        source_ids: BTreeSet<SourceId>,
    },
}

/// Runs store calls on a background tokio runtime and reports results as events.
///
/// Commands are executed concurrently; events arrive in completion order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(store: Arc<dyn OfferStore>, selection: SelectionStore) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let store = Arc::clone(&store);
                let selection = selection.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(store.as_ref(), &selection, command).await;
                    let _ = event_tx.send(event);
                });
            }
            finder_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn load_sources(&self) {
        self.send(EngineCommand::LoadSources);
    }

    pub fn load_selection(&self) {
        self.send(EngineCommand::LoadSelection);
    }

    pub fn search(&self, request_id: RequestId, query: SearchQuery) {
        self.send(EngineCommand::Search { request_id, query });
    }

    pub fn save_selection(&self, source_ids: BTreeSet<SourceId>) {
        self.send(EngineCommand::SaveSelection { source_ids });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            finder_error!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    store: &dyn OfferStore,
    selection: &SelectionStore,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::LoadSources => EngineEvent::SourcesLoaded(store.list_sources().await),
        EngineCommand::LoadSelection => {
            let selection = selection.clone();
            let ids = match tokio::task::spawn_blocking(move || selection.load()).await {
                Ok(ids) => ids,
                Err(err) => {
                    finder_error!("Selection load task failed: {}", err);
                    BTreeSet::new()
                }
            };
            EngineEvent::SelectionLoaded(ids)
        }
        EngineCommand::Search { request_id, query } => EngineEvent::SearchCompleted {
            request_id,
            result: store.search(&query).await,
        },
        EngineCommand::SaveSelection { source_ids } => {
            let selection = selection.clone();
            let error = match tokio::task::spawn_blocking(move || selection.save(&source_ids))
                .await
            {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(err) => Some(err.to_string()),
            };
            EngineEvent::SelectionSaved { error }
        }
    }
}

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use finder_core::{Effect, Msg};
use finder_engine::{EngineEvent, EngineHandle};
use finder_logging::{finder_debug, finder_info, finder_warn};

const EVENT_POLL: Duration = Duration::from_millis(100);

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// Starts forwarding engine events to `msg_tx` as core messages.
    pub fn new<T>(engine: EngineHandle, msg_tx: mpsc::Sender<T>) -> Self
    where
        T: From<Msg> + Send + 'static,
    {
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadSources => self.engine.load_sources(),
                Effect::LoadSelection => self.engine.load_selection(),
                Effect::RunSearch { request_id, query } => {
                    finder_info!(
                        "RunSearch request_id={} terms={:?} filter={:?}",
                        request_id,
                        query.keyword_terms(),
                        query.source_filter()
                    );
                    self.engine.search(request_id, query);
                }
                Effect::SaveSelection { source_ids } => {
                    finder_info!("SaveSelection ids={:?}", source_ids);
                    self.engine.save_selection(source_ids);
                }
            }
        }
    }

    fn spawn_event_loop<T>(&self, msg_tx: mpsc::Sender<T>)
    where
        T: From<Msg> + Send + 'static,
    {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(EVENT_POLL) else {
                continue;
            };
            if msg_tx.send(event_to_msg(event).into()).is_err() {
                finder_debug!("UI inbox closed; stopping engine event forwarding");
                break;
            }
        });
    }
}

/// Maps an engine event to a core message. Failed fetches degrade to empty data.
pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SourcesLoaded(result) => Msg::SourcesLoaded(result.unwrap_or_else(|err| {
            finder_warn!("Loading sources failed: {}", err);
            Vec::new()
        })),
        EngineEvent::SelectionLoaded(ids) => Msg::SelectionLoaded(ids),
        EngineEvent::SearchCompleted { request_id, result } => Msg::SearchCompleted {
            request_id,
            offers: result.unwrap_or_else(|err| {
                finder_warn!("Search {} failed: {}", request_id, err);
                Vec::new()
            }),
        },
        EngineEvent::SelectionSaved { error } => {
            if let Some(message) = &error {
                finder_warn!("Saving selection failed: {}", message);
            }
            Msg::SelectionSaved {
                ok: error.is_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use finder_core::{Offer, Source};
    use finder_engine::{FailureKind, StoreError};
    use pretty_assertions::assert_eq;

    use super::*;

    fn failure() -> StoreError {
        StoreError {
            kind: FailureKind::HttpStatus(500),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn failed_source_load_becomes_empty_list() {
        assert_eq!(
            event_to_msg(EngineEvent::SourcesLoaded(Err(failure()))),
            Msg::SourcesLoaded(Vec::new())
        );
    }

    #[test]
    fn loaded_sources_pass_through() {
        let sources = vec![Source::new(1, "SiteA")];
        assert_eq!(
            event_to_msg(EngineEvent::SourcesLoaded(Ok(sources.clone()))),
            Msg::SourcesLoaded(sources)
        );
    }

    #[test]
    fn failed_search_keeps_request_id_with_no_offers() {
        assert_eq!(
            event_to_msg(EngineEvent::SearchCompleted {
                request_id: 4,
                result: Err(failure()),
            }),
            Msg::SearchCompleted {
                request_id: 4,
                offers: Vec::new(),
            }
        );
    }

    #[test]
    fn search_offers_pass_through() {
        let offers = vec![Offer {
            id: 1,
            title: "Cinema Ticket".to_string(),
            reward_value: 500.0,
            devices: "p,i,a".to_string(),
            source_name: "SiteA".to_string(),
        }];
        assert_eq!(
            event_to_msg(EngineEvent::SearchCompleted {
                request_id: 2,
                result: Ok(offers.clone()),
            }),
            Msg::SearchCompleted {
                request_id: 2,
                offers,
            }
        );
    }

    #[test]
    fn save_outcome_maps_to_flag() {
        assert_eq!(
            event_to_msg(EngineEvent::SelectionSaved { error: None }),
            Msg::SelectionSaved { ok: true }
        );
        assert_eq!(
            event_to_msg(EngineEvent::SelectionSaved {
                error: Some("disk full".to_string())
            }),
            Msg::SelectionSaved { ok: false }
        );
    }

    #[test]
    fn selection_passes_through() {
        assert_eq!(
            event_to_msg(EngineEvent::SelectionLoaded(BTreeSet::from([2, 3]))),
            Msg::SelectionLoaded(BTreeSet::from([2, 3]))
        );
    }
}

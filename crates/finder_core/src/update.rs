use crate::{AppState, Effect, Msg, View};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted => {
            // Independent loads; the selection is materialized once both answered.
            vec![Effect::LoadSources, Effect::LoadSelection]
        }
        Msg::KeywordChanged(keyword) => {
            state.set_keyword(keyword);
            Vec::new()
        }
        Msg::SearchSubmitted => match state.begin_search() {
            Some((request_id, query)) => vec![Effect::RunSearch { request_id, query }],
            None => Vec::new(),
        },
        Msg::SourcesLoaded(sources) => {
            state.apply_sources(sources);
            Vec::new()
        }
        Msg::SelectionLoaded(persisted) => {
            state.apply_persisted_selection(persisted);
            Vec::new()
        }
        Msg::SearchCompleted { request_id, offers } => {
            // Stale responses are dropped: last search issued wins.
            state.complete_search(request_id, offers);
            Vec::new()
        }
        Msg::SourceToggled { source_id, checked } => {
            state.toggle_source(source_id, checked);
            Vec::new()
        }
        Msg::SaveClicked => match state.commit_draft() {
            Some(source_ids) => {
                state.set_view(View::Search);
                vec![Effect::SaveSelection { source_ids }]
            }
            None => Vec::new(),
        },
        Msg::SelectionSaved { ok } => {
            state.finish_save(ok);
            Vec::new()
        }
        Msg::ViewSwitched(view) => {
            state.set_view(view);
            Vec::new()
        }
    };

    (state, effects)
}

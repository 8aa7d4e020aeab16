//! Platform logging initialization for finder_app.
//!
//! Stdout belongs to the UI, so logs go to `./offer_finder.log` in the current
//! working directory. `OFFER_FINDER_LOG` overrides the level.

use finder_logging::{parse_level, LogDestination};
use log::LevelFilter;

const LEVEL_VAR: &str = "OFFER_FINDER_LOG";

pub fn initialize_from_env() {
    let level = std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|name| parse_level(&name))
        .unwrap_or(LevelFilter::Info);
    finder_logging::initialize(LogDestination::default(), level);
}

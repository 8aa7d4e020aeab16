use std::fs;
use std::sync::{Arc, Mutex, Once};

use finder_engine::{FileSlotStore, MemorySlotStore, SelectionStore, SELECTION_SLOT};
use log::{LevelFilter, Log, Metadata, Record};
use tempfile::TempDir;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = LINES.lock() {
            lines.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn capture_logs() {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
}

fn logged_containing(needle: &str) -> Vec<String> {
    LINES
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.contains(needle))
        .cloned()
        .collect()
}

#[test]
fn unreadable_slot_file_is_logged_as_corrupt_state() {
    capture_logs();
    let temp = TempDir::new().unwrap();
    let slots = FileSlotStore::new(temp.path().to_path_buf());
    fs::write(slots.path(), "garbage (").unwrap();

    let selection = SelectionStore::new(Arc::new(slots));

    assert!(selection.load().is_empty());
    let lines = logged_containing("unreadable slot file");
    assert!(!lines.is_empty());
    assert!(lines
        .iter()
        .all(|line| line.starts_with("CorruptPersistedState")));
}

#[test]
fn malformed_selection_blob_is_logged_as_corrupt_state() {
    capture_logs();
    let slots = Arc::new(MemorySlotStore::with_slot(SELECTION_SLOT, "[\"7\"]"));

    assert!(SelectionStore::new(slots).load().is_empty());
    assert!(!logged_containing("CorruptPersistedState: non-numeric").is_empty());
}

use std::fmt::Write;

use finder_core::{AppViewModel, OfferRowView, SaveStatus, SearchStatus, SourceRowView, View};

pub fn render(view: &AppViewModel) -> String {
    match view.view {
        View::Search => render_search(view),
        View::Customize => render_customize(view),
    }
}

fn render_search(view: &AppViewModel) -> String {
    let mut out = String::new();
    let sites = if view.initialized {
        format!("{} point sites selected", view.selected_count)
    } else {
        "loading point sites".to_string()
    };
    let _ = writeln!(out, "== Offer search ({sites}) ==");
    if let Some(line) = save_line(view.save_status) {
        let _ = writeln!(out, "{line}");
    }
    if !view.keyword.is_empty() {
        let _ = writeln!(out, "Keyword: {}", view.keyword);
    }

    match view.search_status {
        SearchStatus::Idle => {
            let _ = writeln!(out, "Type a keyword to search, /help for commands.");
        }
        SearchStatus::Searching => {
            let _ = writeln!(out, "Searching...");
        }
        SearchStatus::Done { count: 0 } => {
            let _ = writeln!(out, "No offers found.");
        }
        SearchStatus::Done { count } => {
            let _ = writeln!(out, "{count} offers:");
            for (index, row) in view.results.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", index + 1, format_offer_row(row));
            }
        }
    }
    out
}

fn render_customize(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Point sites ==");
    if !view.initialized {
        let _ = writeln!(out, "Loading point sites...");
        return out;
    }
    if view.sources.is_empty() {
        let _ = writeln!(out, "No point sites available.");
    }
    for row in &view.sources {
        let _ = writeln!(out, "{}", format_source_row(row));
    }
    if view.has_unsaved_changes {
        let _ = writeln!(out, "Unsaved changes: /save to apply, /back to discard.");
    } else {
        let _ = writeln!(out, "/toggle <id> to change, /back to return.");
    }
    out
}

fn save_line(status: Option<SaveStatus>) -> Option<&'static str> {
    match status? {
        SaveStatus::Saving => Some("Saving point site choice..."),
        SaveStatus::Saved => Some("Point site choice saved."),
        SaveStatus::Failed => Some("Point site choice could not be saved."),
    }
}

fn format_offer_row(row: &OfferRowView) -> String {
    format!(
        "{title} | {reward} pt | {devices} | {source}",
        title = row.title,
        reward = format_reward(row.reward_value),
        devices = row.device_label,
        source = row.source_name
    )
}

fn format_source_row(row: &SourceRowView) -> String {
    let mark = if row.checked { 'x' } else { ' ' };
    format!("[{mark}] {:>4}  {}", row.source_id, row.name)
}

/// Formats a reward with thousands separators and at most two decimals.
fn format_reward(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.2}", value.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&format_with_commas(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn format_with_commas(digits: &str) -> String {
    let mut out = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

//! Device code labels.
//!
//! Offers carry a compact, comma separated set of device codes: `p` (PC),
//! `i` (iOS) and `a` (Android). Decoding is total: unknown codes are kept
//! verbatim so newer data never breaks older clients.

/// Label shown when an offer works on every device (or carries no codes).
pub const ALL_DEVICES_LABEL: &str = "All devices";
/// Label shown for offers available on exactly iOS and Android.
pub const MOBILE_LABEL: &str = "Mobile (iOS/Android)";
/// Separator used when listing several device names.
pub const DEVICE_SEPARATOR: &str = ", ";

const CANONICAL_ORDER: [char; 3] = ['p', 'i', 'a'];

/// Display name of a single known device code.
pub fn device_name(code: char) -> Option<&'static str> {
    match code {
        'p' => Some("PC"),
        'i' => Some("iOS"),
        'a' => Some("Android"),
        _ => None,
    }
}

/// Maps a raw device code string such as `"i,a"` to a display label.
pub fn decode_devices(raw: &str) -> String {
    let mut known = [false; 3];
    let mut unknown: Vec<&str> = Vec::new();

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match known_index(token) {
            Some(idx) => known[idx] = true,
            None => {
                if !unknown.contains(&token) {
                    unknown.push(token);
                }
            }
        }
    }

    let known_count = known.iter().filter(|present| **present).count();
    if unknown.is_empty() {
        match known_count {
            0 | 3 => return ALL_DEVICES_LABEL.to_string(),
            2 if known[1] && known[2] => return MOBILE_LABEL.to_string(),
            _ => {}
        }
    }

    let mut labels: Vec<&str> = CANONICAL_ORDER
        .iter()
        .zip(known)
        .filter(|(_, present)| *present)
        .filter_map(|(code, _)| device_name(*code))
        .collect();
    labels.extend(unknown);
    labels.join(DEVICE_SEPARATOR)
}

fn known_index(token: &str) -> Option<usize> {
    let mut chars = token.chars();
    let code = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    CANONICAL_ORDER.iter().position(|c| *c == code)
}

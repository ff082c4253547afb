//! Filename safety for the flat content directory.
//!
//! Every client-supplied filename passes through [`sanitize_filename`] before
//! it touches the filesystem. The result is always a single path component
//! made of `[A-Za-z0-9_.-]`, so it cannot name a parent directory, an absolute
//! path, or a hidden file.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::defaults::MAX_FILENAME_LEN;

/// Characters allowed to survive sanitization.
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex is valid"));

/// Windows device names that cannot be used as a file stem.
const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// MIME type for Standard MIDI Files.
pub const MIDI_MIME: &str = "audio/midi";

/// Fallback MIME type for anything unrecognised.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Turn a client-supplied filename into a safe on-disk name.
///
/// Returns `None` when nothing usable remains, which callers treat the same
/// as a missing filename.
///
/// ```
/// use midibox_core::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Song.mid").as_deref(), Some("My_Song.mid"));
/// assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("etc_passwd"));
/// assert_eq!(sanitize_filename("../"), None);
/// ```
pub fn sanitize_filename(filename: &str) -> Option<String> {
    // Compatibility decomposition first, so accents fall off their base letter.
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();

    // Separators become word breaks so "a/b" keeps both parts.
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = stripped.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        return None;
    }

    let mut name = trimmed.to_string();
    if is_reserved_device_name(&name) {
        name.insert(0, '_');
    }

    Some(truncate_preserving_extension(&name, MAX_FILENAME_LEN))
}

fn is_reserved_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED_DEVICE_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

// Input is ASCII-only by the time it gets here, so byte slicing is safe.
fn truncate_preserving_extension(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot_pos) if name.len() - dot_pos < max_len => {
            let ext = &name[dot_pos..];
            format!("{}{}", &name[..max_len - ext.len()], ext)
        }
        _ => name[..max_len].to_string(),
    }
}

/// Detect the content type to serve a stored file with.
///
/// Magic bytes win; otherwise the extension decides between MIDI and a
/// generic binary download. File contents are never rejected here.
pub fn detect_content_type(filename: &str, data: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type();
    }

    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "mid" || ext == "midi" || ext == "kar" => MIDI_MIME,
        _ => OCTET_STREAM,
    }
}

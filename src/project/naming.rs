use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use std::sync::OnceLock;

/// Second precision, so runs in different seconds never collide
pub const FOLDER_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const FALLBACK_STEM: &str = "project";

/// Converts a free-text project name into a filesystem-safe identifier.
///
/// Lowercases, drops everything except word characters, whitespace and
/// hyphens, collapses whitespace/hyphen runs into one underscore and trims
/// underscores from both ends. Never fails; may return an empty string.
pub fn sanitize_folder_name(name: &str) -> String {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();

    let disallowed =
        DISALLOWED.get_or_init(|| Regex::new(r"[^\w\s-]").expect("Invalid disallowed-chars regex"));
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[-\s]+").expect("Invalid separator regex"));

    let lowered = name.to_lowercase();
    let cleaned = disallowed.replace_all(&lowered, "");
    let joined = separators.replace_all(&cleaned, "_");

    joined.trim_matches('_').to_string()
}

/// `<sanitized name>_<timestamp>`; an empty sanitized name becomes `project`
pub fn project_folder_name<Tz>(name: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stem = sanitize_folder_name(name);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem.as_str() };

    format!("{}_{}", stem, timestamp.format(FOLDER_TIMESTAMP_FORMAT))
}

/// Folder name stamped with the current local time
pub fn project_folder_name_now(name: &str) -> String {
    project_folder_name(name, &Local::now())
}

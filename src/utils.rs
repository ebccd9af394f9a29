use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Pretty-print a JSON value
pub fn to_pretty_json<T: serde::Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Write a value to a file as pretty JSON
pub fn save_json<T: serde::Serialize>(
    data: &T,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    file.write_all(to_pretty_json(data)?.as_bytes())?;
    file.write_all(b"\n")?;
    ::log::info!("Wrote {}", path.display());
    Ok(())
}

/// Shorten text to at most `max_chars` characters for log output
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

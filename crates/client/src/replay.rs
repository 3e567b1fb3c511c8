//! Recorded room feeds.
//!
//! A recording is either newline-delimited JSON (one envelope per line) or a
//! raw server-sent-event capture where each event's `data:` lines form one
//! payload. Both may appear in the same file.
use std::path::Path;

use anyhow::{Context, Result};

const SSE_FIELDS: [&str; 3] = ["event:", "id:", "retry:"];

/// Loads every payload of the recording at `path`, in order.
pub async fn read_payloads(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read feed {}", path.display()))?;
    Ok(split_payloads(&text))
}

/// Splits a recording into payload strings.
pub fn split_payloads(text: &str) -> Vec<String> {
    let mut payloads = Vec::new();
    let mut pending: Option<String> = None;

    for line in text.lines() {
        let line = line.trim_end();
        if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            match pending.as_mut() {
                Some(buffer) => {
                    buffer.push('\n');
                    buffer.push_str(data);
                }
                None => pending = Some(data.to_string()),
            }
            continue;
        }

        // Blank line ends an SSE event; any other line ends it too.
        payloads.extend(pending.take().filter(|payload| !payload.is_empty()));
        if line.is_empty()
            || line.starts_with(':')
            || SSE_FIELDS.iter().any(|field| line.starts_with(field))
        {
            continue;
        }
        payloads.push(line.trim_start().to_string());
    }
    payloads.extend(pending.filter(|payload| !payload.is_empty()));
    payloads
}

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DocMeta, LookbackDocument, LookbackEntry};
use crate::owners::OwnerDirectory;

// "1. Sweeney- 0.847"
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.\s+(.+?)[-\s]+(\d+(?:\.\d+)?|\.\d+)\s*$").unwrap());
static COMPARISON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Comparison:\s*").unwrap());

struct Pending {
    entry: LookbackEntry,
    lines: Vec<String>,
}

/// Parse the retrospective document: owners ranked by a power score.
pub fn parse_lookback(text: &str, meta: &DocMeta, owners: &OwnerDirectory) -> LookbackDocument {
    let title = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string();

    let mut intro: Vec<String> = Vec::new();
    let mut entries = Vec::new();
    let mut current: Option<Pending> = None;

    for line in text.lines().map(str::trim) {
        if let Some(entry) = parse_entry_line(line, owners) {
            if let Some(done) = current.take() {
                entries.push(finish(done));
            }
            current = Some(Pending {
                entry,
                lines: Vec::new(),
            });
            continue;
        }

        match current.as_mut() {
            Some(p) => p.lines.push(line.to_string()),
            None if line.is_empty() => {
                if !intro.is_empty() {
                    intro.push(String::new());
                }
            }
            None if line == title => {}
            None => intro.push(line.to_string()),
        }
    }
    if let Some(done) = current.take() {
        entries.push(finish(done));
    }

    LookbackDocument {
        title,
        intro: intro.join("\n").trim().to_string(),
        entries,
        meta: meta.clone(),
    }
}

fn parse_entry_line(line: &str, owners: &OwnerDirectory) -> Option<LookbackEntry> {
    let caps = ENTRY_RE.captures(line)?;
    let rank = caps[1].parse().ok()?;
    let power_score = caps[3].parse().ok()?;
    Some(LookbackEntry {
        rank,
        owner: owners.resolve(&caps[2]),
        power_score,
        writeup: String::new(),
        comparison: None,
    })
}

// "Comparison:" is the only label this grammar has; it runs to the end.
fn finish(p: Pending) -> LookbackEntry {
    let text = p.lines.join("\n");
    let text = text.trim();
    let mut entry = p.entry;
    match COMPARISON_RE.find(text) {
        Some(m) => {
            let comparison = text[m.end()..].trim();
            entry.writeup = text[..m.start()].trim().to_string();
            entry.comparison = (!comparison.is_empty()).then(|| comparison.to_string());
        }
        None => entry.writeup = text.to_string(),
    }
    entry
}

use std::sync::LazyLock;

use regex::Regex;

static TIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Tier\s+(?:One|Two|Three|Four|\d+)\s*:\s*(.+)$").unwrap()
});
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:Playoff Bracket|Mud Eater Bracket|Playoff Preview|Second Round|Final Round|Relegation Preview|Matchup Previews?|Odds\s*\(.*?\)\s*:?|Rankings History)",
    )
    .unwrap()
});
// "Championship Odds", "Last Place Odds (Week 9):"
static ODDS_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][\w' ]{0,40}\sOdds(?:\s*\([^)]*\))?\s*:?$").unwrap()
});
static RANK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2})\.\s+(.+)$").unwrap());

pub const MAX_RANK: u32 = 16;

/// One classified line of extracted document text.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Tier { name: String, full: String },
    Section(String),
    Rank { rank: u32, rest: String },
    Blank,
    Text(String),
}

pub fn classify_lines(text: &str) -> Vec<Line> {
    text.lines().map(classify_line).collect()
}

pub fn classify_line(raw: &str) -> Line {
    let line = raw.trim();

    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = TIER_RE.captures(line) {
        return Line::Tier {
            name: caps[1].trim().to_string(),
            full: line.to_string(),
        };
    }

    // A ranked team line wins over a heading that happens to share its words.
    let rank = parse_rank_line(line);
    if rank.is_none() && (SECTION_RE.is_match(line) || ODDS_HEADING_RE.is_match(line)) {
        return Line::Section(line.trim_end_matches(':').trim().to_string());
    }

    match rank {
        Some((rank, rest)) => Line::Rank { rank, rest },
        None => Line::Text(line.to_string()),
    }
}

/// `"3. Work Ass- Sweeney"` -> `(3, "Work Ass- Sweeney")`. Ranks outside 1..=16 are not rank lines.
pub fn parse_rank_line(line: &str) -> Option<(u32, String)> {
    let caps = RANK_RE.captures(line.trim())?;
    let rank: u32 = caps[1].parse().ok()?;
    if !(1..=MAX_RANK).contains(&rank) {
        return None;
    }
    Some((rank, caps[2].trim().to_string()))
}

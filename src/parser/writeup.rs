//! Turns a team's accumulated body lines into prose plus labeled subsections.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::TextMap;

static LW_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^LW[\s-]*[Rr]ank[\s:-]*\d+").unwrap());
static ALGORITHM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Algorithm['\u{2019}]?s? [Rr]oster [Ss]uggestion:\s*").unwrap()
});

enum LabelKey {
    Fixed(&'static str),
    TeamComp,
    TeamPick,
}

struct LabelRule {
    key: LabelKey,
    re: Regex,
}

fn rule(key: LabelKey, pattern: &str) -> LabelRule {
    LabelRule {
        key,
        re: Regex::new(pattern).unwrap(),
    }
}

// Order matters: the first rule matching a line names its key.
static LABEL_RULES: LazyLock<Vec<LabelRule>> = LazyLock::new(|| {
    use LabelKey::*;
    vec![
        rule(Fixed("next_up"), r"^Next [Uu]p:"),
        rule(Fixed("draft_steal"), r"^Draft Steal:"),
        rule(Fixed("draft_bust"), r"^Draft Bust:"),
        rule(Fixed("best_draft_pick"), r"^Best [Dd]raft [Pp]ick:"),
        rule(Fixed("best_pick"), r"^Best [Pp]ick:"),
        rule(Fixed("worst_pick"), r"^Worst [Pp]ick:"),
        rule(Fixed("general_strategy"), r"^General Strategy:"),
        rule(Fixed("playoff_scenario"), r"^Playoff [Ss]cenario:"),
        rule(Fixed("best_move"), r"^Best [Mm]ove[^:]{0,40}:"),
        rule(Fixed("predicted_finish"), r"^Predicted [Ff]inish:"),
        rule(Fixed("sleeper"), r"^Sleeper:"),
        rule(Fixed("a_chirp"), r"^A [Cc]hirp:"),
        rule(Fixed("looking_ahead"), r"^Looking [Aa]head:"),
        rule(Fixed("midseason_draft_checkin"), r"^Midseason [Dd]raft [Cc]heck-?in:"),
        rule(Fixed("newark_street_stat"), r"^Newark [Ss]treet [Ss]tat:"),
        rule(Fixed("nervous_about"), r"^Nervous [Aa]bout:"),
        rule(Fixed("reason_for_optimism"), r"^Reason [Ff]or [Oo]ptimism:"),
        rule(Fixed("x_factors"), r"^X-?Factors?:"),
        rule(Fixed("pick"), r"^The Pick:"),
        rule(TeamComp, r"^Team [Cc]omp(?:arison)?([^:]{0,40}):"),
        rule(
            TeamPick,
            r"(?i)^([A-Z][\w ]{1,30}[ \t]+(?:best|worst)[ \t]+(?:draft[ \t]+)?pick[^:]{0,20}):",
        ),
    ]
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Writeup {
    pub writeup: String,
    pub subsections: TextMap,
}

struct LabelHit {
    line: usize,
    key: String,
    first: String,
}

/// Finalize a team's body lines (blank lines as empty strings).
pub fn finalize_writeup(lines: &[String]) -> Writeup {
    let kept: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !is_lw_rank_line(l))
        .collect();
    let mut text = merge_page_breaks(&kept).join("\n");

    let mut subsections = TextMap::new();
    if let Some((value, rest)) = take_inline_algorithm(&text) {
        subsections.insert_first("algorithm_roster_suggestion", value);
        text = rest;
    }

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let hits = find_labels(&lines);

    for (i, hit) in hits.iter().enumerate() {
        let next_label = hits.get(i + 1).map_or(lines.len(), |h| h.line);
        let mut value = vec![hit.first.as_str()];
        value.extend(
            lines[hit.line + 1..next_label]
                .iter()
                .take_while(|l| !l.is_empty()),
        );
        subsections.insert_first(hit.key.clone(), value.join("\n").trim());
    }

    let cut = hits.first().map_or(lines.len(), |h| h.line);
    Writeup {
        writeup: lines[..cut].join("\n").trim().to_string(),
        subsections,
    }
}

pub fn is_lw_rank_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    LW_LINE_RE.is_match(line) || lower.starts_with("lw rank") || lower.starts_with("lw-rank")
}

/// Rejoin paragraphs split by a page break: a paragraph that opens lowercase
/// continues the previous one. Paragraphs come back separated by one blank line.
pub fn merge_page_breaks(lines: &[&str]) -> Vec<String> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines.iter().map(|l| l.trim()) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    let mut merged: Vec<Vec<&str>> = Vec::new();
    for para in paragraphs {
        let continues = para[0].chars().next().is_some_and(char::is_lowercase);
        match merged.last_mut() {
            Some(prev) if continues => prev.extend(para),
            _ => merged.push(para),
        }
    }

    let mut out = Vec::new();
    for (i, para) in merged.into_iter().enumerate() {
        if i > 0 {
            out.push(String::new());
        }
        out.extend(para.into_iter().map(str::to_string));
    }
    out
}

// The roster suggestion can start mid-paragraph, so it is spliced out rather
// than used as a cut point.
fn take_inline_algorithm(text: &str) -> Option<(String, String)> {
    let m = ALGORITHM_RE.find(text)?;
    let end = text[m.end()..]
        .find("\n\n")
        .map_or(text.len(), |i| m.end() + i);
    let value = text[m.end()..end].trim().to_string();
    let rest = format!("{}{}", text[..m.start()].trim_end(), &text[end..]);
    Some((value, rest))
}

fn find_labels(lines: &[&str]) -> Vec<LabelHit> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            LABEL_RULES.iter().find_map(|rule| {
                let caps = rule.re.captures(line)?;
                let whole = caps.get(0)?;
                let key = match rule.key {
                    LabelKey::Fixed(k) => k.to_string(),
                    LabelKey::TeamComp => match slug(caps.get(1)?.as_str()) {
                        s if s.is_empty() => "team_comp".to_string(),
                        s => format!("team_comp_{s}"),
                    },
                    LabelKey::TeamPick => format!("pick_{}", slug(caps.get(1)?.as_str())),
                };
                Some(LabelHit {
                    line: idx,
                    key,
                    first: line[whole.end()..].trim().to_string(),
                })
            })
        })
        .collect()
}

fn slug(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

use super::lines::{classify_lines, Line};
use super::team::extract_team_owner;
use super::writeup::finalize_writeup;
use crate::model::{DocMeta, RankingDocument, TeamEntry, TextMap, Tier};
use crate::owners::OwnerDirectory;

static TIED_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^tied[-\s]*").unwrap());
static TIE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+and\s+").unwrap());

/// The entity currently accumulating body text.
enum Open {
    /// Nothing structural seen yet; text goes to the intro.
    Intro,
    /// After a tier header, before its first team.
    Nothing,
    Team { entry: TeamEntry, lines: Vec<String> },
    Section { name: String, lines: Vec<String> },
}

struct Segmenter<'a> {
    owners: &'a OwnerDirectory,
    title: String,
    intro: Vec<String>,
    tiers: Vec<Tier>,
    teams: Vec<TeamEntry>,
    special_sections: TextMap,
    open: Open,
}

/// Segment a rankings document into intro, tiers, teams and special sections.
pub fn segment(text: &str, meta: &DocMeta, owners: &OwnerDirectory) -> RankingDocument {
    let title = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string();

    let mut s = Segmenter {
        owners,
        title,
        intro: Vec::new(),
        tiers: Vec::new(),
        teams: Vec::new(),
        special_sections: TextMap::new(),
        open: Open::Intro,
    };

    for line in classify_lines(text) {
        s.feed(line);
    }
    s.close();

    RankingDocument {
        title: s.title,
        intro: s.intro.join("\n").trim().to_string(),
        tiers: s.tiers,
        teams: s.teams,
        special_sections: s.special_sections,
        meta: meta.clone(),
    }
}

impl Segmenter<'_> {
    fn feed(&mut self, line: Line) {
        match line {
            // Blank lines keep paragraph breaks, except before the intro starts.
            Line::Blank => match &mut self.open {
                Open::Team { lines, .. } | Open::Section { lines, .. } => lines.push(String::new()),
                Open::Intro if !self.intro.is_empty() => self.intro.push(String::new()),
                _ => {}
            },
            Line::Text(text) => match &mut self.open {
                Open::Team { lines, .. } | Open::Section { lines, .. } => lines.push(text),
                // The title line is not part of the intro.
                Open::Intro => {
                    if text != self.title {
                        self.intro.push(text);
                    }
                }
                Open::Nothing => trace!(%text, "text between tier header and first team dropped"),
            },
            // A tier header closes the open team; later teams inherit it.
            Line::Tier { name, full } => {
                self.close();
                self.tiers.push(Tier { name, full });
                self.open = Open::Nothing;
            }
            // Special sections close whatever team or section was open.
            Line::Section(name) => {
                self.close();
                self.open = Open::Section {
                    name,
                    lines: Vec::new(),
                };
            }
            Line::Rank { rank, rest } => self.open_rank(rank, &rest),
        }
    }

    fn open_rank(&mut self, rank: u32, rest: &str) {
        self.close();

        let mut rest = rest;
        // "Tied- A- Owner and B- Owner": two entries at the same rank.
        if rest.to_lowercase().starts_with("tied") {
            rest = TIED_PREFIX_RE
                .find(rest)
                .map_or(rest, |m| rest[m.end()..].trim());
            let parts: Vec<&str> = TIE_SPLIT_RE.split(rest).collect();
            match parts.as_slice() {
                [first, second] => {
                    let mut entry = self.new_entry(rank, first);
                    entry.tied = true;
                    self.teams.push(entry);

                    // Body text that follows belongs to the second team.
                    let mut entry = self.new_entry(rank, second);
                    entry.tied = true;
                    self.open = Open::Team {
                        entry,
                        lines: Vec::new(),
                    };
                    return;
                }
                [_] => {}
                _ => warn!(
                    rank,
                    parts = parts.len(),
                    text = rest,
                    "tie with more than two teams, kept as a single entry"
                ),
            }
        }

        let entry = self.new_entry(rank, rest);
        self.open = Open::Team {
            entry,
            lines: Vec::new(),
        };
    }

    fn new_entry(&self, rank: u32, rest: &str) -> TeamEntry {
        let team = extract_team_owner(rest, self.owners);
        let tier = self.tiers.last();
        TeamEntry {
            rank,
            team_name: team.team_name,
            owner: team.owner,
            previous_rank: team.previous_rank,
            writeup: String::new(),
            subsections: TextMap::new(),
            tier: tier.map(|t| t.name.clone()),
            tier_full: tier.map(|t| t.full.clone()),
            tied: false,
            grouped_with: None,
            movement: None,
        }
    }

    /// Finalize whatever is open. Leaves `Open::Nothing` behind.
    fn close(&mut self) {
        match std::mem::replace(&mut self.open, Open::Nothing) {
            Open::Team { mut entry, lines } => {
                let done = finalize_writeup(&lines);
                entry.writeup = done.writeup;
                entry.subsections = done.subsections;
                self.teams.push(entry);
            }
            Open::Section { name, lines } => {
                self.special_sections
                    .insert(name, lines.join("\n").trim().to_string());
            }
            Open::Intro | Open::Nothing => {}
        }
    }
}

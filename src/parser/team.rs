//! Team name / owner recovery from the text after a rank number.
//!
//! The separator between team and owner changed from one document era to the
//! next, so extraction is a cascade of independent matchers tried in order.
//! The first one that returns `Some` wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::owners::OwnerDirectory;

static LW_RANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\s*LW[\s-]*[Rr]ank[\s:-]*(\d+)\s*\)?").unwrap());
static LW_SHORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(LW[\s-]+(\d+)\)").unwrap());
static COLON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s*$").unwrap()
});
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+\(([A-Za-z]+(?:\s+[A-Za-z]+)?)\)\s*$").unwrap()
});
static DASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)-\s+([A-Za-z]+(?:\s+[A-Za-z]+)?)\s*$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamOwner {
    pub team_name: String,
    /// Empty when no matcher could attribute the team.
    pub owner: String,
    pub previous_rank: Option<u32>,
}

type Matcher = fn(&str, &OwnerDirectory) -> Option<(String, String)>;

// Order matters: known team names first, then explicit separators, then the
// looser owner-suffix split as a last resort.
const MATCHERS: &[(&str, Matcher)] = &[
    ("team_table", by_team_table),
    ("colon", by_colon),
    ("paren", by_paren),
    ("dash", by_dash),
    ("emoji_team", by_emoji_team),
    ("owner_suffix", by_owner_suffix),
];

/// Recover `(team, owner, LW rank)` from a rank line's rest. Never fails: an
/// unattributable line comes back as the raw text with an empty owner.
pub fn extract_team_owner(rest: &str, owners: &OwnerDirectory) -> TeamOwner {
    let (text, previous_rank) = strip_lw_rank(rest);
    let text = text.trim_end_matches('(').trim();

    for (name, matcher) in MATCHERS {
        if let Some((team_name, owner)) = matcher(text, owners) {
            debug!(matcher = *name, team = %team_name, owner = %owner, "team resolved");
            return TeamOwner {
                team_name,
                owner,
                previous_rank,
            };
        }
    }

    debug!(text, "no owner found");
    TeamOwner {
        team_name: text.to_string(),
        owner: String::new(),
        previous_rank,
    }
}

/// Cut a "(LW rank: 5)" style annotation and everything after it.
pub fn strip_lw_rank(rest: &str) -> (&str, Option<u32>) {
    for re in [&*LW_RANK_RE, &*LW_SHORT_RE] {
        if let Some(caps) = re.captures(rest) {
            let Some(whole) = caps.get(0) else { continue };
            // An unparseable number still gets cut from the name.
            return (rest[..whole.start()].trim(), caps[1].parse().ok());
        }
    }
    (rest.trim(), None)
}

// Team names that embed an owner's name ("Sweeney Deez and Zaukas") must be
// looked up before any owner-suffix split is attempted.
fn by_team_table(text: &str, owners: &OwnerDirectory) -> Option<(String, String)> {
    let owner = owners.team_owner(text)?;
    let team = owners.strip_owner_suffix(text);
    Some((team.to_string(), owner.to_string()))
}

fn by_colon(text: &str, owners: &OwnerDirectory) -> Option<(String, String)> {
    let caps = COLON_RE.captures(text)?;
    Some((caps[1].trim().to_string(), owners.resolve(&caps[2])))
}

fn by_paren(text: &str, owners: &OwnerDirectory) -> Option<(String, String)> {
    let caps = PAREN_RE.captures(text)?;
    if !owners.is_known(&caps[2]) {
        return None;
    }
    Some((caps[1].trim().to_string(), owners.resolve(&caps[2])))
}

fn by_dash(text: &str, owners: &OwnerDirectory) -> Option<(String, String)> {
    let caps = DASH_RE.captures(text)?;
    let candidate = caps[2].trim().trim_end_matches('-').trim();
    if !owners.is_known(candidate) {
        return None;
    }
    Some((caps[1].trim().to_string(), owners.resolve(candidate)))
}

// Ger's team names are emoji descriptions that PDF extraction mangles.
fn by_emoji_team(text: &str, owners: &OwnerDirectory) -> Option<(String, String)> {
    let lower = text.to_lowercase();
    if lower.contains("ger") && (lower.contains("emoji") || lower.starts_with("ger")) {
        return Some((text.to_string(), owners.resolve("Ger")));
    }
    None
}

fn by_owner_suffix(text: &str, owners: &OwnerDirectory) -> Option<(String, String)> {
    let (team, owner) = owners.split_owner_suffix(text)?;
    Some((team.to_string(), owners.resolve(owner)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(rest: &str) -> TeamOwner {
        extract_team_owner(rest, &OwnerDirectory::league().unwrap())
    }

    #[test]
    fn dash_owner_with_lw_rank() {
        let t = extract("Work Ass- Sweeney (LW rank: 5)");
        assert_eq!(t.team_name, "Work Ass");
        assert_eq!(t.owner, "Sweeney");
        assert_eq!(t.previous_rank, Some(5));
    }

    #[test]
    fn lw_rank_spellings() {
        for rest in [
            "Cap Stoppers- TJ (LW rank: 7)",
            "Cap Stoppers- TJ (LW rank- 7)",
            "Cap Stoppers- TJ (LW Rank:7)",
            "Cap Stoppers- TJ LW-rank 7",
            "Cap Stoppers- TJ (LW- 7)",
            "Cap Stoppers- TJ (LW 7)",
        ] {
            let t = extract(rest);
            assert_eq!(t.previous_rank, Some(7), "{rest}");
            assert_eq!(t.team_name, "Cap Stoppers", "{rest}");
            assert_eq!(t.owner, "TJ", "{rest}");
        }
    }

    #[test]
    fn oversized_lw_rank_is_still_stripped() {
        let t = extract("Work Ass- Sweeney (LW rank: 99999999999)");
        assert_eq!(t.team_name, "Work Ass");
        assert_eq!(t.owner, "Sweeney");
        assert_eq!(t.previous_rank, None);
    }

    #[test]
    fn colon_separator() {
        let t = extract("Bench Mob: Gallo");
        assert_eq!((t.team_name.as_str(), t.owner.as_str()), ("Bench Mob", "Gallo"));
    }

    #[test]
    fn colon_owner_alias() {
        let t = extract("Bench Mob: Ron");
        assert_eq!(t.owner, "Matt");
    }

    #[test]
    fn paren_owner_must_be_known() {
        let t = extract("Bench Mob (Oscar)");
        assert_eq!((t.team_name.as_str(), t.owner.as_str()), ("Bench Mob", "Mikey"));

        let t = extract("Bench Mob (Reloaded)");
        assert_eq!(t.team_name, "Bench Mob (Reloaded)");
        assert_eq!(t.owner, "");
    }

    #[test]
    fn dash_keeps_dashes_in_team_name() {
        let t = extract("Run-DMC Forever- Chris");
        assert_eq!((t.team_name.as_str(), t.owner.as_str()), ("Run-DMC Forever", "Chris"));
    }

    #[test]
    fn team_table_beats_owner_suffix() {
        let t = extract("Sweeney Deez and Zaukas");
        assert_eq!(t.team_name, "Sweeney Deez and Zaukas");
        assert_eq!(t.owner, "Mitch");
    }

    #[test]
    fn team_table_strips_printed_owner() {
        let t = extract("Gotham Rogues (Joe)");
        assert_eq!((t.team_name.as_str(), t.owner.as_str()), ("Gotham Rogues", "Boyle"));
        let t = extract("Marvin\u{2019}s Receiver Room- Zaukas");
        assert_eq!((t.team_name.as_str(), t.owner.as_str()), ("Marvin\u{2019}s Receiver Room", "Paul"));
    }

    #[test]
    fn emoji_team() {
        let t = extract("Two hearts emoji and a suitcase, per usual Ger");
        assert_eq!(t.owner, "Ger");
    }

    #[test]
    fn loose_owner_suffix() {
        let t = extract("Los Pollos Hermanos - - north willow -");
        assert_eq!(t.team_name, "Los Pollos Hermanos");
        assert_eq!(t.owner, "Boyle");
    }

    #[test]
    fn unknown_degrades_to_raw_text() {
        let t = extract("  The Mystery Squad  ");
        assert_eq!(t.team_name, "The Mystery Squad");
        assert_eq!(t.owner, "");
        assert_eq!(t.previous_rank, None);
    }
}

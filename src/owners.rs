//! Owner lookup tables: who runs which team, and which nicknames name the same person.
//!
//! The parser never reads these as globals. A [`OwnerDirectory`] is built once
//! from [`OwnerTables`] and passed into every parse call, so a test or a league
//! file can swap the whole vocabulary.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::Deserialize;

use crate::error::DirectoryError;

const LEAGUE_OWNERS: &[&str] = &[
    "Sweeney", "Joey", "Justin", "TK", "Deez", "Mitch", "Chris", "TJ", "Papi", "Matt", "Paul",
    "Connor", "Gallo", "Ger", "Mikey", "Boyle",
];

const LEAGUE_ALIASES: &[(&str, &str)] = &[
    ("ron", "Matt"),
    ("joe", "Boyle"),
    ("north willow", "Boyle"),
    ("zaukas", "Paul"),
    ("simon", "Papi"),
    ("gerry lewis", "Ger"),
    ("oscar", "Mikey"),
];

// Historical team names, for weeks where the owner is not printed.
const LEAGUE_TEAMS: &[(&str, &str)] = &[
    ("hand me the piss", "TK"),
    ("team obama sopranos", "TK"),
    ("team obama", "TK"),
    ("stewed c", "Joey"),
    ("life with derrick", "Justin"),
    ("tony the phenom", "Justin"),
    ("work ass", "Sweeney"),
    ("alexander's unreal team", "Deez"),
    ("pigs on the 7th rank", "Deez"),
    ("deserves to be shot", "Mitch"),
    ("sweeney deez and zaukas", "Mitch"),
    ("sansa ludacris", "Chris"),
    ("ginny sack", "Chris"),
    ("cap stoppers", "TJ"),
    ("cookie monster golf cart", "TJ"),
    ("gorlock the destroyer", "Papi"),
    ("gorlock the destroyer schwartz", "Papi"),
    ("gorlock the d", "Papi"),
    ("wherestua", "Matt"),
    ("the art of the deal", "Matt"),
    ("art of the deal", "Matt"),
    ("marvin's receiver room", "Paul"),
    ("team daniel", "Paul"),
    ("sweeney.", "Connor"),
    ("here without you tishman", "Gallo"),
    ("scampi", "Gallo"),
    ("senior ai coke twins", "Mikey"),
    ("senior bag master", "Mikey"),
    ("ai coke twins", "Mikey"),
    ("gotham rogues", "Boyle"),
    ("champagne suitcase heart emoji", "Ger"),
    ("champagne suitcase heart face", "Ger"),
    ("champagne suitcase kiss face", "Ger"),
    ("ger", "Ger"),
    ("the jackson brownes", "Boyle"),
    ("jackson brownes", "Boyle"),
];

/// Raw, deserializable lookup tables.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerTables {
    /// Canonical owner names, one per real person.
    pub owners: Vec<String>,
    /// Nickname (any case) -> canonical owner.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Known team name (any case) -> owner.
    #[serde(default)]
    pub teams: BTreeMap<String, String>,
}

impl OwnerTables {
    /// The built-in tables for the league the documents come from.
    pub fn league() -> Self {
        OwnerTables {
            owners: LEAGUE_OWNERS.iter().map(|s| s.to_string()).collect(),
            aliases: LEAGUE_ALIASES
                .iter()
                .map(|(a, o)| (a.to_string(), o.to_string()))
                .collect(),
            teams: LEAGUE_TEAMS
                .iter()
                .map(|(t, o)| (t.to_string(), o.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug)]
struct OwnerSuffix {
    /// "<team> <sep> <owner>" with any dash, colon or space separator.
    loose: Regex,
    /// "<team>- <owner>", "<team>: <owner>" or "<team> (<owner>)".
    strict: Regex,
}

#[derive(Debug)]
pub struct OwnerDirectory {
    known: HashSet<String>,
    aliases: HashMap<String, String>,
    canonical: HashMap<String, String>,
    /// Normalized team name -> owner, longest name first.
    teams: Vec<(String, String)>,
    /// Known owner tokens, longest first.
    suffixes: Vec<OwnerSuffix>,
}

impl OwnerDirectory {
    pub fn new(tables: OwnerTables) -> Result<Self, DirectoryError> {
        let mut canonical = HashMap::new();
        for owner in &tables.owners {
            let owner = owner.trim();
            if owner.is_empty() {
                return Err(DirectoryError::EmptyOwner);
            }
            canonical.insert(owner.to_lowercase(), owner.to_string());
        }

        let aliases: HashMap<String, String> = tables
            .aliases
            .iter()
            .map(|(alias, owner)| (alias.trim().to_lowercase(), owner.trim().to_string()))
            .filter(|(alias, _)| !alias.is_empty())
            .collect();

        let known: HashSet<String> = canonical.keys().chain(aliases.keys()).cloned().collect();

        let mut teams = Vec::with_capacity(tables.teams.len());
        for (team, owner) in &tables.teams {
            if owner.trim().is_empty() {
                return Err(DirectoryError::EmptyTeamOwner { team: team.clone() });
            }
            teams.push((normalize_team_name(team), owner.trim().to_string()));
        }
        teams.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut tokens: Vec<&String> = known.iter().collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let suffixes = tokens
            .into_iter()
            .map(|token| build_suffix(token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OwnerDirectory {
            known,
            aliases,
            canonical,
            teams,
            suffixes,
        })
    }

    pub fn league() -> Result<Self, DirectoryError> {
        Self::new(OwnerTables::league())
    }

    /// Whether a case-folded token names an owner or one of their aliases.
    pub fn is_known(&self, token: &str) -> bool {
        self.known.contains(&token.trim().to_lowercase())
    }

    /// Canonical owner for an extracted owner token.
    ///
    /// Aliases win over canonical spellings; an unknown token comes back trimmed.
    pub fn resolve(&self, raw: &str) -> String {
        let name = raw.trim().trim_end_matches('-').trim();
        let lower = name.to_lowercase();
        if let Some(owner) = self.aliases.get(&lower) {
            return owner.clone();
        }
        if let Some(owner) = self.canonical.get(&lower) {
            return owner.clone();
        }
        name.to_string()
    }

    /// Owner of a known team whose name equals or prefixes `text`.
    pub fn team_owner(&self, text: &str) -> Option<&str> {
        let normalized = normalize_team_name(text);
        self.teams
            .iter()
            .find(|(team, _)| normalized.starts_with(team.as_str()))
            .map(|(_, owner)| owner.as_str())
    }

    /// Split a trailing known owner off `text`, trying the longest owner first.
    /// Returns `(team, owner_token)`.
    pub fn split_owner_suffix<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        self.suffixes.iter().find_map(|s| {
            let caps = s.loose.captures(text)?;
            Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str()))
        })
    }

    /// `text` without a trailing "- Owner", ": Owner" or "(Owner)".
    pub fn strip_owner_suffix<'a>(&self, text: &'a str) -> &'a str {
        self.suffixes
            .iter()
            .find_map(|s| s.strict.captures(text).and_then(|c| c.get(1)))
            .map(|m| m.as_str().trim())
            .unwrap_or(text)
    }
}

fn build_suffix(token: &str) -> Result<OwnerSuffix, DirectoryError> {
    let escaped = regex::escape(token);
    let pattern_err = |source| DirectoryError::Pattern {
        owner: token.to_string(),
        source,
    };
    let loose = Regex::new(&format!(r"(?i)^(.+?)[-:\s]+({escaped})[-\s]*$")).map_err(pattern_err)?;
    let strict = Regex::new(&format!(
        r"(?i)^(.+?)\s*(?:[-:]\s*{escaped}|\(\s*{escaped}\s*\))[-\s]*$"
    ))
    .map_err(pattern_err)?;
    Ok(OwnerSuffix { loose, strict })
}

/// Fold curly quotes to ASCII, lowercase, trim.
pub fn normalize_team_name(name: &str) -> String {
    name.replace(['\u{2019}', '\u{2018}'], "'")
        .to_lowercase()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league() -> OwnerDirectory {
        OwnerDirectory::league().unwrap()
    }

    #[test]
    fn aliases_resolve_to_canonical() {
        let d = league();
        assert_eq!(d.resolve("Ron"), "Matt");
        assert_eq!(d.resolve("joe"), "Boyle");
        assert_eq!(d.resolve("North Willow"), "Boyle");
        assert_eq!(d.resolve("Gerry Lewis-"), "Ger");
    }

    #[test]
    fn canonical_spelling_restored() {
        let d = league();
        assert_eq!(d.resolve("tk"), "TK");
        assert_eq!(d.resolve("SWEENEY"), "Sweeney");
    }

    #[test]
    fn unknown_owner_passes_through_trimmed() {
        assert_eq!(league().resolve("  Stranger- "), "Stranger");
    }

    #[test]
    fn known_tokens_include_aliases() {
        let d = league();
        assert!(d.is_known("Oscar"));
        assert!(d.is_known("gerry lewis"));
        assert!(!d.is_known("oscar the grouch"));
    }

    #[test]
    fn team_lookup_folds_curly_quotes() {
        let d = league();
        assert_eq!(d.team_owner("Marvin\u{2019}s Receiver Room"), Some("Paul"));
        assert_eq!(d.team_owner("GOTHAM ROGUES (Joe)"), Some("Boyle"));
        assert_eq!(d.team_owner("Nobody's Team"), None);
    }

    #[test]
    fn longest_team_name_wins() {
        let d = league();
        assert_eq!(d.team_owner("Sweeney Deez and Zaukas"), Some("Mitch"));
    }

    #[test]
    fn strict_suffix_needs_separator() {
        let d = league();
        assert_eq!(d.strip_owner_suffix("Work Ass- Sweeney"), "Work Ass");
        assert_eq!(d.strip_owner_suffix("Gotham Rogues (Joe)"), "Gotham Rogues");
        assert_eq!(d.strip_owner_suffix("Sweeney Deez and Zaukas"), "Sweeney Deez and Zaukas");
    }

    #[test]
    fn loose_suffix_prefers_longest_owner() {
        let d = league();
        assert_eq!(
            d.split_owner_suffix("Some Team - North Willow"),
            Some(("Some Team", "North Willow"))
        );
    }

    #[test]
    fn substitute_tables() {
        let mut aliases = BTreeMap::new();
        aliases.insert("Bobby".to_string(), "Rob".to_string());
        let d = OwnerDirectory::new(OwnerTables {
            owners: vec!["Rob".into()],
            aliases,
            teams: BTreeMap::new(),
        })
        .unwrap();
        assert_eq!(d.resolve("bobby"), "Rob");
        assert!(!d.is_known("sweeney"));
    }

    #[test]
    fn empty_owner_rejected() {
        let err = OwnerDirectory::new(OwnerTables {
            owners: vec!["  ".into()],
            aliases: BTreeMap::new(),
            teams: BTreeMap::new(),
        });
        assert!(matches!(err, Err(DirectoryError::EmptyOwner)));
    }
}

//! JSON data files consumed by the static site.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::meta::{display_label, week_id, SPECIAL_SEASON};
use crate::model::{DocType, LookbackDocument, LookbackEntry, RankingDocument};
use crate::season::OwnerStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub rank: u32,
    pub team_name: String,
    pub owner: String,
    pub movement: Option<i32>,
    pub tier: Option<String>,
    /// Subsection keys only; the text lives in the parsed document.
    pub subsections: Vec<String>,
}

/// Navigation-level view of one rankings document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    pub week_id: String,
    pub season: String,
    pub week: Option<u32>,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub title: String,
    pub label: String,
    pub teams: Vec<TeamSummary>,
    pub tiers: Vec<String>,
    pub has_special_sections: bool,
}

impl WeekSummary {
    pub fn from_document(doc: &RankingDocument) -> Self {
        WeekSummary {
            week_id: week_id(&doc.meta),
            season: doc.meta.season.clone(),
            week: doc.meta.week,
            doc_type: doc.meta.doc_type,
            title: doc.title.clone(),
            label: display_label(&doc.meta),
            teams: doc
                .teams
                .iter()
                .map(|t| TeamSummary {
                    rank: t.rank,
                    team_name: t.team_name.clone(),
                    owner: t.owner.clone(),
                    movement: t.movement,
                    tier: t.tier.clone(),
                    subsections: t.subsections.keys().map(str::to_string).collect(),
                })
                .collect(),
            tiers: doc.tiers.iter().map(|t| t.name.clone()).collect(),
            has_special_sections: !doc.special_sections.is_empty(),
        }
    }
}

#[derive(Serialize)]
struct RankingsIndex<'a> {
    seasons: Vec<&'a str>,
    weeks: &'a [WeekSummary],
    generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct LookbackData<'a> {
    title: &'a str,
    intro: &'a str,
    entries: &'a [LookbackEntry],
}

pub struct SiteWriter {
    dir: PathBuf,
}

impl SiteWriter {
    /// Prepare `dir` (and its `parsed/` subdirectory) for writing.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir.join("parsed"))
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        Ok(SiteWriter {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the week summary and the full parsed document.
    pub fn write_week(&self, doc: &RankingDocument) -> Result<WeekSummary> {
        let summary = WeekSummary::from_document(doc);
        write_json(&self.dir.join(format!("{}.json", summary.week_id)), &summary)?;
        write_json(
            &self.dir.join("parsed").join(format!("{}.json", summary.week_id)),
            doc,
        )?;
        Ok(summary)
    }

    pub fn write_index(&self, weeks: &[WeekSummary]) -> Result<()> {
        let mut seasons: Vec<&str> = weeks
            .iter()
            .map(|w| w.season.as_str())
            .filter(|s| *s != SPECIAL_SEASON)
            .collect();
        seasons.sort_unstable();
        seasons.dedup();
        let index = RankingsIndex {
            seasons,
            weeks,
            generated_at: Utc::now(),
        };
        write_json(&self.dir.join("rankings.json"), &index)
    }

    pub fn write_owners(&self, owners: &BTreeMap<String, OwnerStats>) -> Result<()> {
        write_json(&self.dir.join("owners.json"), owners)
    }

    pub fn write_lookback(&self, doc: &LookbackDocument) -> Result<()> {
        let data = LookbackData {
            title: &doc.title,
            intro: &doc.intro,
            entries: &doc.entries,
        };
        write_json(&self.dir.join("lookback.json"), &data)
    }
}

/// Warn about every week whose team count is off. Returns how many were.
pub fn check_team_counts(weeks: &[WeekSummary], expected: usize) -> usize {
    weeks
        .iter()
        .filter(|w| w.teams.len() != expected)
        .inspect(|w| {
            warn!(
                week_id = %w.week_id,
                teams = w.teams.len(),
                expected,
                "unexpected team count"
            )
        })
        .count()
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)
        .with_context(|| format!("serializing {}", path.display()))?;
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocMeta, TeamEntry, TextMap, Tier};
    use serde_json::Value;

    fn doc(week: u32) -> RankingDocument {
        let mut subsections = TextMap::new();
        subsections.insert("best_pick", "Puka Nacua");
        let mut special_sections = TextMap::new();
        special_sections.insert("Championship Odds", "Sweeney 40%");
        RankingDocument {
            title: format!("Week {week} Rankings"),
            intro: String::new(),
            tiers: vec![Tier {
                name: "Contenders".into(),
                full: "Tier 1: Contenders".into(),
            }],
            teams: vec![TeamEntry {
                rank: 1,
                team_name: "Work Ass".into(),
                owner: "Sweeney".into(),
                previous_rank: Some(2),
                writeup: "Rolling.".into(),
                subsections,
                tier: Some("Contenders".into()),
                tier_full: Some("Tier 1: Contenders".into()),
                tied: false,
                grouped_with: None,
                movement: Some(1),
            }],
            special_sections,
            meta: DocMeta {
                filename: format!("2025 Week {week} Power Rankings.txt"),
                season: "2025".into(),
                week: Some(week),
                doc_type: DocType::Regular,
            },
        }
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn week_files() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = SiteWriter::create(tmp.path()).unwrap();
        let summary = writer.write_week(&doc(3)).unwrap();
        assert_eq!(summary.week_id, "2025-week-3");

        let json = read(&tmp.path().join("2025-week-3.json"));
        assert_eq!(json["type"], "regular");
        assert_eq!(json["label"], "Week 3");
        assert_eq!(json["tiers"][0], "Contenders");
        assert_eq!(json["has_special_sections"], true);
        let team = &json["teams"][0];
        assert_eq!(team["movement"], 1);
        assert_eq!(team["subsections"][0], "best_pick");

        let parsed = read(&tmp.path().join("parsed/2025-week-3.json"));
        assert_eq!(parsed["teams"][0]["subsections"]["best_pick"], "Puka Nacua");
        assert_eq!(parsed["special_sections"]["Championship Odds"], "Sweeney 40%");
    }

    #[test]
    fn index_lists_numeric_seasons() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = SiteWriter::create(tmp.path()).unwrap();
        let mut weeks = vec![
            WeekSummary::from_document(&doc(2)),
            WeekSummary::from_document(&doc(1)),
        ];
        weeks[1].season = "2024".into();
        writer.write_index(&weeks).unwrap();

        let json = read(&tmp.path().join("rankings.json"));
        assert_eq!(json["seasons"], serde_json::json!(["2024", "2025"]));
        assert_eq!(json["weeks"].as_array().unwrap().len(), 2);
        assert!(json["generated_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn lookback_file() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = SiteWriter::create(tmp.path()).unwrap();
        let lookback = LookbackDocument {
            title: "Lookback".into(),
            intro: "Four years.".into(),
            entries: vec![LookbackEntry {
                rank: 1,
                owner: "Sweeney".into(),
                power_score: 0.847,
                writeup: "Dominant.".into(),
                comparison: Some("FDR".into()),
            }],
            meta: DocMeta {
                filename: "Lookback.txt".into(),
                season: SPECIAL_SEASON.into(),
                week: None,
                doc_type: DocType::Lookback,
            },
        };
        writer.write_lookback(&lookback).unwrap();
        let json = read(&tmp.path().join("lookback.json"));
        assert_eq!(json["entries"][0]["comparison"], "FDR");
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn counts_short_weeks() {
        let weeks = vec![WeekSummary::from_document(&doc(1))];
        assert_eq!(check_team_counts(&weeks, 16), 1);
        assert_eq!(check_team_counts(&weeks, 1), 0);
    }
}

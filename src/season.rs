//! Cross-document passes. These run only after every document of the season
//! has been parsed on its own.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::meta::{week_id, SPECIAL_SEASON};
use crate::model::{DocMeta, DocType, RankingDocument};

const LAST_PLACE: u32 = 16;

fn season_order(season: &str) -> (u8, u32) {
    match season.parse::<u32>() {
        Ok(year) => (0, year),
        Err(_) if season == SPECIAL_SEASON => (1, 0),
        Err(_) => (2, 0),
    }
}

fn type_order(doc_type: DocType) -> u8 {
    match doc_type {
        DocType::Regular => 0,
        DocType::Midseason => 1,
        DocType::PlayoffPreview => 2,
        DocType::Final => 3,
        DocType::Lookback => 4,
    }
}

/// Key that orders documents chronologically: season, week, then type.
pub fn chronological_key(meta: &DocMeta) -> ((u8, u32), u32, u8) {
    (
        season_order(&meta.season),
        meta.week.unwrap_or(0),
        type_order(meta.doc_type),
    )
}

pub fn sort_chronologically(docs: &mut [RankingDocument]) {
    docs.sort_by_key(|d| chronological_key(&d.meta));
}

/// Attach each team's rank movement against the document before it.
///
/// `docs` must already be in chronological order. The owner -> rank map of the
/// previous document is the fold's accumulator; teams without an owner, or
/// whose owner did not appear last time, get no movement.
pub fn apply_movement(docs: &mut [RankingDocument]) {
    docs.iter_mut()
        .fold(HashMap::<String, u32>::new(), |previous, doc| {
            for team in &mut doc.teams {
                team.movement = previous
                    .get(&team.owner)
                    .filter(|_| !team.owner.is_empty())
                    .map(|&before| before as i32 - team.rank as i32);
            }
            doc.teams
                .iter()
                .filter(|t| !t.owner.is_empty())
                .map(|t| (t.owner.clone(), t.rank))
                .collect()
        });
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    pub season: String,
    pub week: Option<u32>,
    pub week_id: String,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerStats {
    pub name: String,
    pub team_names: Vec<String>,
    pub seasons: Vec<String>,
    pub total_weeks: usize,
    pub avg_rank: f64,
    pub best_rank: u32,
    pub worst_rank: u32,
    pub weeks_at_1: usize,
    pub weeks_at_16: usize,
    pub rankings: Vec<Appearance>,
}

/// Aggregate per-owner statistics over every ranked appearance.
pub fn owner_stats(docs: &[RankingDocument]) -> BTreeMap<String, OwnerStats> {
    #[derive(Default)]
    struct Acc {
        rankings: Vec<Appearance>,
        team_names: BTreeSet<String>,
        seasons: BTreeSet<String>,
    }

    let mut by_owner: BTreeMap<String, Acc> = BTreeMap::new();
    for doc in docs {
        let id = week_id(&doc.meta);
        for team in doc.teams.iter().filter(|t| !t.owner.is_empty()) {
            let acc = by_owner.entry(team.owner.clone()).or_default();
            acc.rankings.push(Appearance {
                season: doc.meta.season.clone(),
                week: doc.meta.week,
                week_id: id.clone(),
                rank: team.rank,
            });
            acc.team_names.insert(team.team_name.clone());
            acc.seasons.insert(doc.meta.season.clone());
        }
    }

    by_owner
        .into_iter()
        .filter(|(_, acc)| !acc.rankings.is_empty())
        .map(|(owner, mut acc)| {
            let ranks: Vec<u32> = acc.rankings.iter().map(|r| r.rank).collect();
            let total: u32 = ranks.iter().sum();
            let avg = total as f64 / ranks.len() as f64;
            acc.rankings
                .sort_by(|a, b| (season_order(&a.season), a.week).cmp(&(season_order(&b.season), b.week)));
            let stats = OwnerStats {
                name: owner.clone(),
                team_names: acc.team_names.into_iter().collect(),
                seasons: acc.seasons.into_iter().collect(),
                total_weeks: ranks.len(),
                avg_rank: (avg * 100.0).round() / 100.0,
                best_rank: ranks.iter().copied().min().unwrap_or_default(),
                worst_rank: ranks.iter().copied().max().unwrap_or_default(),
                weeks_at_1: ranks.iter().filter(|&&r| r == 1).count(),
                weeks_at_16: ranks.iter().filter(|&&r| r == LAST_PLACE).count(),
                rankings: acc.rankings,
            };
            (owner, stats)
        })
        .collect()
}

//! Document metadata recovered from a source filename.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DocMeta, DocType};

static WEEK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"week\s*(\d+)").unwrap());
static YEAR_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\s*-\s*(?:19|20)\d{2}\b").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

pub const SPECIAL_SEASON: &str = "special";
const DEFAULT_MIDSEASON_WEEK: u32 = 8;
const DEFAULT_PLAYOFF_WEEK: u32 = 15;
const FINAL_WEEK: u32 = 99;

/// Derive season, week and document type from a filename such as
/// `Free Chee 2025 Week 3 Power Rankings.txt`.
///
/// Files that name no year belong to `default_season`.
pub fn parse_filename(path: &Path, default_season: &str) -> DocMeta {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = filename.to_lowercase();
    let week_in_name = WEEK_RE
        .captures(&lower)
        .and_then(|c| c[1].parse::<u32>().ok());

    let season = if lower.contains("lookback") || YEAR_RANGE_RE.is_match(&filename) {
        SPECIAL_SEASON.to_string()
    } else {
        YEAR_RE
            .captures(&filename)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| default_season.to_string())
    };

    let (doc_type, week) = if lower.contains("lookback") {
        (DocType::Lookback, None)
    } else if lower.contains("midseason") {
        (DocType::Midseason, Some(week_in_name.unwrap_or(DEFAULT_MIDSEASON_WEEK)))
    } else if lower.contains("final") {
        (DocType::Final, Some(FINAL_WEEK))
    } else if lower.contains("playoff") && lower.contains("week") {
        (DocType::PlayoffPreview, Some(week_in_name.unwrap_or(DEFAULT_PLAYOFF_WEEK)))
    } else {
        (DocType::Regular, week_in_name)
    };

    DocMeta {
        filename,
        season,
        week,
        doc_type,
    }
}

/// Stable identifier used for output filenames, e.g. `2025-week-3`.
pub fn week_id(meta: &DocMeta) -> String {
    match meta.doc_type {
        DocType::Lookback => "lookback".to_string(),
        DocType::Midseason => format!("{}-midseason", meta.season),
        DocType::Final => format!("{}-final", meta.season),
        DocType::Regular | DocType::PlayoffPreview => match meta.week {
            Some(week) => format!("{}-week-{}", meta.season, week),
            None => format!("{}-week-unknown", meta.season),
        },
    }
}

/// Human-readable label for navigation.
pub fn display_label(meta: &DocMeta) -> String {
    let week = meta.week.map(|w| w.to_string()).unwrap_or_else(|| "?".into());
    match meta.doc_type {
        DocType::Lookback => "First Term Lookback".to_string(),
        DocType::Midseason => "Midseason Review".to_string(),
        DocType::Final => "Final Rankings".to_string(),
        DocType::PlayoffPreview => format!("Week {week} + Playoff Preview"),
        DocType::Regular => format!("Week {week}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> DocMeta {
        parse_filename(Path::new(name), "2024")
    }

    #[test]
    fn regular_week_with_year() {
        let m = meta("Free Chee 2025 Week 3 Power Rankings.txt");
        assert_eq!(m.season, "2025");
        assert_eq!(m.week, Some(3));
        assert_eq!(m.doc_type, DocType::Regular);
        assert_eq!(week_id(&m), "2025-week-3");
        assert_eq!(display_label(&m), "Week 3");
    }

    #[test]
    fn missing_year_uses_default_season() {
        let m = meta("dir/Week12 Power Rankings.txt");
        assert_eq!(m.filename, "Week12 Power Rankings.txt");
        assert_eq!(m.season, "2024");
        assert_eq!(m.week, Some(12));
    }

    #[test]
    fn lookback_is_special() {
        let m = meta("Free Chee First Term Lookback (2022-2025).txt");
        assert_eq!(m.season, SPECIAL_SEASON);
        assert_eq!(m.doc_type, DocType::Lookback);
        assert_eq!(m.week, None);
        assert_eq!(week_id(&m), "lookback");
    }

    #[test]
    fn midseason_defaults_to_week_8() {
        let m = meta("2025 Midseason Review.txt");
        assert_eq!((m.doc_type, m.week), (DocType::Midseason, Some(8)));
        assert_eq!(week_id(&m), "2025-midseason");
        let m = meta("2025 Midseason Review Week 9.txt");
        assert_eq!(m.week, Some(9));
    }

    #[test]
    fn final_sorts_last() {
        let m = meta("Final Power Rankings 2024.txt");
        assert_eq!((m.doc_type, m.week), (DocType::Final, Some(99)));
        assert_eq!(week_id(&m), "2024-final");
    }

    #[test]
    fn playoff_preview() {
        let m = meta("2025 Week 14 Rankings and Playoff Preview.txt");
        assert_eq!((m.doc_type, m.week), (DocType::PlayoffPreview, Some(14)));
        assert_eq!(display_label(&m), "Week 14 + Playoff Preview");
        assert_eq!(week_id(&m), "2025-week-14");
    }
}

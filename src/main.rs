mod error;
mod meta;
mod model;
mod owners;
mod parser;
mod season;
mod settings;
mod site;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::model::{Document, LookbackDocument, RankingDocument};
use crate::owners::OwnerDirectory;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "power_rankings", about = "Fantasy league power rankings parser and site data builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one extracted text file and print it as JSON
    Parse {
        file: PathBuf,
        /// Filename to derive season/week/type from (default: FILE's name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Parse every document and write the site data files
    Build {
        /// Directory of extracted *.txt documents
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory the JSON files are written to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Owner statistics table
    Owners {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "16")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    let result = match cli.command {
        Commands::Parse { file, name } => {
            let owners = settings.owner_directory()?;
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let meta_path = name.map(PathBuf::from).unwrap_or_else(|| file.clone());
            let meta = meta::parse_filename(&meta_path, &settings.default_season);
            let mut doc = parser::parse_document(&text, &meta, &owners);
            if let Document::Rankings(rankings) = &mut doc {
                parser::group::mark_grouped_teams(&mut rankings.teams);
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
        Commands::Build { input, output } => {
            if let Some(dir) = input {
                settings.input_dir = dir;
            }
            if let Some(dir) = output {
                settings.output_dir = dir;
            }
            build(&settings)
        }
        Commands::Owners { input, limit } => {
            if let Some(dir) = input {
                settings.input_dir = dir;
            }
            let owners = settings.owner_directory()?;
            let mut corpus = load_corpus(&settings, &owners)?;
            season::sort_chronologically(&mut corpus.rankings);
            let stats = season::owner_stats(&corpus.rankings);
            if stats.is_empty() {
                println!("No ranked owners found in {}.", settings.input_dir.display());
                return Ok(());
            }

            let mut rows: Vec<_> = stats.values().collect();
            rows.sort_by(|a, b| a.avg_rank.total_cmp(&b.avg_rank).then_with(|| a.name.cmp(&b.name)));

            println!(
                "{:>3} | {:<10} | {:>5} | {:>5} | {:>4} | {:>5} | {:>3} | {:>3} | {:<30}",
                "#", "Owner", "Weeks", "Avg", "Best", "Worst", "#1", "#16", "Teams"
            );
            println!("{}", "-".repeat(90));
            for (i, s) in rows.iter().take(limit).enumerate() {
                println!(
                    "{:>3} | {:<10} | {:>5} | {:>5.2} | {:>4} | {:>5} | {:>3} | {:>3} | {:<30}",
                    i + 1,
                    truncate(&s.name, 10),
                    s.total_weeks,
                    s.avg_rank,
                    s.best_rank,
                    s.worst_rank,
                    s.weeks_at_1,
                    s.weeks_at_16,
                    truncate(&s.team_names.join(", "), 30),
                );
            }
            println!("\n{} owners across {} documents", stats.len(), corpus.rankings.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Every parsed document of the input directory, split by grammar.
struct Corpus {
    rankings: Vec<RankingDocument>,
    lookback: Option<LookbackDocument>,
}

fn list_documents(settings: &Settings) -> Result<Vec<PathBuf>> {
    let dir = &settings.input_dir;
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "txt") {
            paths.push(path);
        }
    }
    paths.sort();
    paths.retain(|p| {
        let skip = file_name(p).is_some_and(|n| settings.skip_files.iter().any(|s| s == n));
        if skip {
            info!(file = %p.display(), "skipping listed file");
        }
        !skip
    });
    Ok(paths)
}

fn load_corpus(settings: &Settings, owners: &OwnerDirectory) -> Result<Corpus> {
    let paths = list_documents(settings)?;
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut corpus = Corpus {
        rankings: Vec::new(),
        lookback: None,
    };
    for path in &paths {
        pb.set_message(file_name(path).unwrap_or_default().to_string());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let meta = meta::parse_filename(path, &settings.default_season);
        match parser::parse_document(&text, &meta, owners) {
            Document::Rankings(doc) => {
                info!(
                    file = %meta.filename,
                    teams = doc.teams.len(),
                    tiers = doc.tiers.len(),
                    "parsed rankings"
                );
                corpus.rankings.push(doc);
            }
            Document::Lookback(doc) => {
                info!(file = %meta.filename, entries = doc.entries.len(), "parsed lookback");
                if corpus.lookback.replace(doc).is_some() {
                    warn!(file = %meta.filename, "more than one lookback document, keeping the last");
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(corpus)
}

fn build(settings: &Settings) -> Result<()> {
    let owners = settings.owner_directory()?;
    let mut corpus = load_corpus(settings, &owners)?;
    if corpus.rankings.is_empty() && corpus.lookback.is_none() {
        println!("No documents found in {}.", settings.input_dir.display());
        return Ok(());
    }

    season::sort_chronologically(&mut corpus.rankings);
    season::apply_movement(&mut corpus.rankings);
    for doc in &mut corpus.rankings {
        parser::group::mark_grouped_teams(&mut doc.teams);
    }
    let stats = season::owner_stats(&corpus.rankings);

    let writer = site::SiteWriter::create(&settings.output_dir)?;
    let weeks = corpus
        .rankings
        .iter()
        .map(|doc| writer.write_week(doc))
        .collect::<Result<Vec<_>>>()?;
    writer.write_index(&weeks)?;
    writer.write_owners(&stats)?;
    if let Some(lookback) = &corpus.lookback {
        writer.write_lookback(lookback)?;
    }

    println!("Weeks processed: {}", weeks.len());
    println!("Unique owners:   {}", stats.len());
    if let Some(lookback) = &corpus.lookback {
        println!("Lookback:        {} entries", lookback.entries.len());
    }
    println!("Data written to: {}", writer.dir().display());

    let off = site::check_team_counts(&weeks, settings.expected_teams);
    if off > 0 {
        println!("{} week(s) without {} teams (see log)", off, settings.expected_teams);
    }
    Ok(())
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(input: &Path) -> Settings {
        Settings {
            input_dir: input.to_path_buf(),
            skip_files: vec!["Duplicate Week 12.txt".into()],
            ..Settings::default()
        }
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Sweeney", 10), "Sweeney");
        assert_eq!(truncate("Champagne Suitcase", 9), "Champagne...");
    }

    #[test]
    fn lists_txt_and_honors_skip_list() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["2025 Week 2.txt", "2025 Week 1.txt", "Duplicate Week 12.txt", "notes.md"] {
            std::fs::write(tmp.path().join(name), "").unwrap();
        }
        let paths = list_documents(&settings_for(tmp.path())).unwrap();
        let names: Vec<&str> = paths.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["2025 Week 1.txt", "2025 Week 2.txt"]);
    }

    #[test]
    fn build_writes_site_data() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let fixture = include_str!("../tests/fixtures/2025_week_9.txt");
        std::fs::write(input.path().join("Free Chee 2025 Week 9 Power Rankings.txt"), fixture).unwrap();
        std::fs::write(
            input.path().join("Free Chee 2025 Week 10 Power Rankings.txt"),
            "Week 10\n1. Work Ass- Sweeney\nStill good.",
        )
        .unwrap();
        std::fs::write(
            input.path().join("Free Chee First Term Lookback (2022-2025).txt"),
            "Lookback\n1. Sweeney- 0.9\nBest.",
        )
        .unwrap();

        let settings = Settings {
            output_dir: output.path().to_path_buf(),
            ..settings_for(input.path())
        };
        build(&settings).unwrap();

        let out = output.path();
        for file in ["2025-week-9.json", "2025-week-10.json", "rankings.json", "owners.json", "lookback.json"] {
            assert!(out.join(file).exists(), "missing {file}");
        }
        assert!(out.join("parsed/2025-week-10.json").exists());

        let index: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("rankings.json")).unwrap()).unwrap();
        let ids: Vec<&str> = index["weeks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["week_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["2025-week-9", "2025-week-10"]);
        assert_eq!(index["weeks"][0]["teams"][0]["movement"], serde_json::Value::Null);
        assert!(index["weeks"][1]["teams"][0]["movement"].is_number());
    }
}

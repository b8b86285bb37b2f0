use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use diversity_indicators::indicators::PartitionScope;
use diversity_indicators::reader::InputFormat;
use diversity_indicators::utils::logging::{create_spinner, finish_progress_bar};
use diversity_indicators::{
    DiversityIndicators, GroupKeys, Location, ReaderConfig, RunConfig, Table,
    load_parquet_dir_async, prepare_table, read_table,
};
use log::info;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

const USAGE: &str = "usage: diversity-indicators <table.csv | table.parquet | parquet-dir> [config.json]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let config = match args.next() {
        Some(path) => RunConfig::from_json_file(Path::new(&path))
            .with_context(|| format!("Failed to load run configuration {path}"))?,
        None => RunConfig::default(),
    };
    info!("{config}");

    let start = Instant::now();
    let table = load(&input, &config.reader).await?;
    let table =
        prepare_table(&table, &config.preparation).context("Failed to prepare input table")?;
    info!("Loaded {} rows in {:?}", table.num_rows(), start.elapsed());

    let threshold = config.indicators.diversity_threshold;
    let home_study_threshold = config.indicators.home_study_threshold;
    let engine = DiversityIndicators::with_config(table, config.indicators);

    let gender_by_city =
        engine.people_diversity(&GroupKeys::new(["city", "gender"])?, threshold)?;
    let gender_by_degree =
        engine.people_diversity(&GroupKeys::new(["degree_type", "gender"])?, threshold)?;
    let lieberson = engine
        .lieberson_format(&["gender", "race"], threshold, &PartitionScope::Countries)?
        .lieberson_indices()?;
    let simpson =
        engine.simpson_index_skipping_sparse("race", threshold, &PartitionScope::Countries)?;
    let home_study = engine
        .reindexing(home_study_threshold, Location::Country, None)?
        .into_iter()
        .map(|ranked| {
            let ratio = engine.home_study(&ranked.value, home_study_threshold)?;
            Ok(serde_json::json!({ "country": ranked.value, "home_study": ratio }))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = serde_json::json!({
        "gender_by_city": gender_by_city,
        "gender_by_degree_type": gender_by_degree,
        "lieberson_by_country": lieberson,
        "simpson_race_by_country": simpson,
        "home_study_by_country": home_study,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Directories report per-file progress, single files get a spinner
async fn load(input: &Path, config: &ReaderConfig) -> anyhow::Result<Table> {
    let table = match InputFormat::detect(input)? {
        InputFormat::ParquetDirectory => load_parquet_dir_async(input, config).await,
        InputFormat::Csv | InputFormat::Parquet => {
            let spinner = create_spinner(&format!("Loading {}", input.display()));
            let table = read_table(input, config);
            finish_progress_bar(&spinner, None);
            table
        }
    };
    table.with_context(|| format!("Failed to load {}", input.display()))
}

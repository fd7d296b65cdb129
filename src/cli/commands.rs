use crate::cli::args::{Cli, Commands, PlotTarget};
use crate::error::{ProcessingError, Result};
use crate::models::{StationSeries, WideTable};
use crate::processors::{IntegrityChecker, Selection, SeriesBuilder};
use crate::readers::{
    read_html_file, HtmlTableReader, SnapshotFetcher, SnapshotParser, StoreReader,
};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ChartWriter, StoreWriter};
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?.with_store_path(cli.store);
    let builder = SeriesBuilder::with_reader(StoreReader::with_strict(cli.strict));

    match cli.command {
        Commands::Ingest {
            source_file,
            date,
            url,
            dry_run,
        } => {
            let settings = settings.with_source_url(url)?;
            ingest(&settings, source_file, date, dry_run, cli.quiet).await?;
        }

        Commands::Plot { target, output_dir } => {
            let settings = settings.with_output_dir(output_dir);
            plot(&settings, &builder, target)?;
        }

        Commands::Stations => {
            let (series, build_report) = builder.build(&settings.store_path)?;

            let checker = IntegrityChecker::new();
            let report = checker.check(&series);
            println!("{}", checker.generate_summary(&report, &build_report));
        }

        Commands::Show {
            station,
            json,
            limit,
        } => {
            let (series, _) = builder.build(&settings.store_path)?;
            let chosen = Selection::Station(station).resolve(&series)?;

            for name in chosen {
                if let Some(column) = series.column(&name) {
                    print_series(&column, json, limit)?;
                }
            }
        }
    }

    Ok(())
}

async fn ingest(
    settings: &Settings,
    source_file: Option<PathBuf>,
    date: Option<NaiveDate>,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let progress = ProgressReporter::new_spinner("Fetching snapshot...", quiet);

    let table = match load_table(settings, source_file.as_ref()).await {
        Ok(table) => table,
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    let parser = match date {
        Some(date) => SnapshotParser::new(date),
        None => SnapshotParser::for_today(),
    };
    progress.set_message("Parsing snapshot...");
    let snapshot = parser.parse(&table)?;

    if snapshot.observations.is_empty() {
        warn!("Snapshot for {} contains no readings", parser.date());
    }

    if dry_run {
        progress.finish_with_message("Dry run - store untouched");
        for obs in &snapshot.observations {
            println!(
                "{},{},{}",
                obs.timestamp.format("%Y-%m-%d %H:%M"),
                obs.station,
                obs.value.map(|v| v.to_string()).unwrap_or_default()
            );
        }
        println!(
            "{} rows from {} stations ({} empty cells)",
            snapshot.observations.len(),
            snapshot.aliases.len(),
            snapshot.dropped_cells
        );
        return Ok(());
    }

    progress.set_message("Appending to store...");
    let written = StoreWriter::new(&settings.store_path).merge(&snapshot.observations)?;
    progress.finish_with_message(&format!("Appended {} rows", written));

    println!(
        "Appended {} rows → {}",
        written,
        settings.store_path.display()
    );
    Ok(())
}

async fn load_table(settings: &Settings, source_file: Option<&PathBuf>) -> Result<WideTable> {
    match source_file {
        Some(path) => {
            info!("Reading snapshot from {}", path.display());
            let html = read_html_file(path)?;
            HtmlTableReader::new().read_str(&html)
        }
        None => SnapshotFetcher::from_settings(settings)?.fetch_table().await,
    }
}

fn plot(settings: &Settings, builder: &SeriesBuilder, target: PlotTarget) -> Result<()> {
    let (series, _) = builder.build(&settings.store_path)?;

    let selection = match (target.all, target.station) {
        (true, _) => Selection::All,
        (false, Some(station)) => Selection::Station(station),
        (false, None) => prompt_selection(series.stations())?,
    };
    let chosen = selection.resolve(&series)?;

    let writer = ChartWriter::new(&settings.output_dir);
    for station in chosen {
        let Some(column) = series.column(&station) else {
            continue;
        };
        if let Some(path) = writer.render(&column)? {
            println!("saved: {}", path.display());
        }
    }

    Ok(())
}

fn prompt_selection(stations: &[String]) -> Result<Selection> {
    println!("Available stations:");
    for station in stations {
        println!(" • {}", station);
    }

    print!("\nType station name (or 'all'): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        return Err(ProcessingError::Cancelled);
    }

    Selection::parse_choice(&answer).ok_or(ProcessingError::Cancelled)
}

fn print_series(column: &StationSeries, json: bool, limit: usize) -> Result<()> {
    let skip = if limit == 0 {
        0
    } else {
        column.points.len().saturating_sub(limit)
    };
    let points = &column.points[skip..];

    if json {
        let shown = StationSeries {
            station: column.station.clone(),
            points: points.to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("{}", column.station);
    for (timestamp, value) in points {
        match value {
            Some(v) => println!("  {}  {:>6.1}", timestamp.format("%Y-%m-%d %H:%M"), v),
            None => println!("  {}  {:>6}", timestamp.format("%Y-%m-%d %H:%M"), "-"),
        }
    }

    Ok(())
}

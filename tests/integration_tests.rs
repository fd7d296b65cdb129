use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sea_temps::models::Observation;
use sea_temps::processors::{Selection, SeriesBuilder};
use sea_temps::readers::{HtmlTableReader, SnapshotParser, StoreReader};
use sea_temps::utils::normalize_station;
use sea_temps::writers::{ChartWriter, StoreWriter};
use sea_temps::ProcessingError;
use tempfile::TempDir;

const SNAPSHOT_PAGE: &str = r##"
<html><head><meta charset="utf-8"></head><body>
<table>
  <tr><th>Postaja</th><th>7</th><th>14</th><th>21</th></tr>
  <tr><td><a href="#ana">Sv.&nbsp;Ana</a></td><td>18.2</td><td>19.0</td><td>-</td></tr>
  <tr><td>Mali Lošinj/Lussinpiccolo</td><td>20,1</td><td>kvar</td><td>20.4</td></tr>
  <tr><td>Split A</td><td>-</td><td>-</td><td>-</td></tr>
</table>
</body></html>"##;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[test]
fn test_ingest_then_build() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store_path = temp_dir.path().join("sea_temps.csv");

    let table = HtmlTableReader::new().read_str(SNAPSHOT_PAGE).unwrap();
    let snapshot = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .parse(&table)
        .unwrap();

    // "-" and "kvar" cells produce nothing
    assert_eq!(snapshot.observations.len(), 4);
    // Link markup and &nbsp; are gone from the recorded label
    assert!(snapshot
        .aliases
        .spellings("Sveti Ana")
        .is_some_and(|s| s.contains("Sv. Ana")));

    let written = StoreWriter::new(&store_path).merge(&snapshot.observations).unwrap();
    assert_eq!(written, 4);

    let (series, report) = SeriesBuilder::new().build(&store_path).unwrap();

    assert_eq!(
        series.stations(),
        &["Mali Losinj Lussinpiccolo".to_string(), "Sveti Ana".to_string()]
    );
    assert_eq!(series.timestamps(), &[at(1, 7), at(1, 14), at(1, 21)]);
    assert_eq!(series.value(at(1, 7), "Mali Losinj Lussinpiccolo"), Some(20.1));
    assert_eq!(series.value(at(1, 21), "Sveti Ana"), None);
    assert!(!series.contains(at(1, 21), "Sveti Ana"));
    assert_eq!(report.duplicates_resolved, 0);
}

#[test]
fn test_reingest_same_day_last_write_wins() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("sea_temps.csv");
    let writer = StoreWriter::new(&store_path);

    writer
        .merge(&[
            Observation::new(at(1, 14), "Sveti Ana".to_string(), Some(18.2)),
            Observation::new(at(1, 7), "Split".to_string(), Some(17.0)),
        ])
        .unwrap();
    let before = std::fs::read_to_string(&store_path).unwrap();

    writer
        .merge(&[Observation::new(at(1, 14), "sv. ana A".to_string(), Some(18.5))])
        .unwrap();
    let after = std::fs::read_to_string(&store_path).unwrap();

    // Append-only: earlier bytes untouched, conflicting row still stored
    assert!(after.starts_with(&before));
    assert_eq!(StoreReader::new().read(&store_path).unwrap().rows.len(), 3);

    let (series, report) = SeriesBuilder::new().build(&store_path).unwrap();
    assert_eq!(series.value(at(1, 14), "Sveti Ana"), Some(18.5));
    assert_eq!(report.duplicates_resolved, 1);
    assert_eq!(series.station_count(), 2);
}

#[test]
fn test_old_rows_renormalized_on_read() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("sea_temps.csv");

    // Rows as an older producer wrote them
    std::fs::write(
        &store_path,
        "datetime,station,temp\n\
         2024-05-01 07:00:00,SvetiAna,17.9\n\
         2024-05-01 07:00:00,Mali Lošinj-Lussinpiccolo,20.0\n\
         2024-05-01 14:00:00,Sv. Ana,18.2\n",
    )
    .unwrap();

    let (series, _) = SeriesBuilder::new().build(&store_path).unwrap();

    assert!(series.has_station("Sveti Ana"));
    assert!(series.has_station("Mali Losinj-Lussinpiccolo"));
    assert!(series.stations().iter().all(|s| s.is_ascii()));
}

#[test]
fn test_missing_store_is_hard_failure() {
    let temp_dir = TempDir::new().unwrap();
    let result = SeriesBuilder::new().build(&temp_dir.path().join("sea_temps.csv"));

    assert!(matches!(result, Err(ProcessingError::StoreNotFound { .. })));
}

#[test]
fn test_select_and_render() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("sea_temps.csv");

    StoreWriter::new(&store_path)
        .merge(&[
            Observation::new(at(1, 7), "Dubrovnik".to_string(), Some(19.0)),
            Observation::new(at(1, 14), "Dubrovnik".to_string(), Some(19.6)),
            Observation::new(at(1, 14), "Sveti Ana".to_string(), Some(18.5)),
        ])
        .unwrap();
    let (series, _) = SeriesBuilder::new().build(&store_path).unwrap();

    let unknown = Selection::Station("Pula".to_string()).resolve(&series);
    match unknown {
        Err(ProcessingError::StationNotFound { available, .. }) => {
            assert_eq!(available, vec!["Dubrovnik".to_string(), "Sveti Ana".to_string()]);
        }
        other => panic!("expected StationNotFound, got {:?}", other),
    }

    let chosen = Selection::parse_choice("dubrovnik")
        .unwrap()
        .resolve(&series)
        .unwrap();
    assert_eq!(chosen, vec!["Dubrovnik".to_string()]);

    let charts_dir = temp_dir.path().join("charts");
    let writer = ChartWriter::new(&charts_dir);
    let path = writer
        .render(&series.column("Dubrovnik").unwrap())
        .unwrap()
        .unwrap();

    assert!(path.exists());
    assert_eq!(path.file_name().unwrap(), "dubrovnik_timeseries.svg");
}

#[test]
fn test_normalizer_properties() {
    let labels = [
        "Sv. Ana",
        "sv.ana",
        "Sv.  Ana A",
        "Mali Lošinj/Lussinpiccolo",
        "Đurđevac A ",
        "  ",
        "Sv\u{2024}Nikola",
    ];

    for label in labels {
        let once = normalize_station(label);
        assert!(once.is_ascii());
        assert_eq!(normalize_station(&once), once);
    }

    assert_eq!(normalize_station("Sv. Ana"), normalize_station("sv.ana"));
    assert_eq!(normalize_station("Sv. Ana"), normalize_station("Sv.  Ana A"));
}

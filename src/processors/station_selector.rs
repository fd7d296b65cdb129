use crate::error::{ProcessingError, Result};
use crate::models::WideTimeSeries;
use crate::utils::normalize_station;

/// Which stations to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    /// A raw name as typed by the user
    Station(String),
}

impl Selection {
    /// Interpret a prompt answer: "all" in any case, otherwise a station name.
    /// Blank input selects nothing.
    pub fn parse_choice(input: &str) -> Option<Self> {
        let choice = input.trim();
        if choice.is_empty() {
            None
        } else if choice.eq_ignore_ascii_case("all") {
            Some(Selection::All)
        } else {
            Some(Selection::Station(choice.to_string()))
        }
    }

    /// Canonical identifiers to render. An unknown station is an error that
    /// lists every identifier the series has.
    pub fn resolve(&self, series: &WideTimeSeries) -> Result<Vec<String>> {
        match self {
            Selection::All => Ok(series.stations().to_vec()),
            Selection::Station(raw) => {
                let station = normalize_station(raw);
                if series.has_station(&station) {
                    Ok(vec![station])
                } else {
                    Err(ProcessingError::StationNotFound {
                        requested: raw.clone(),
                        available: series.stations().to_vec(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use chrono::NaiveDate;

    fn series() -> WideTimeSeries {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        WideTimeSeries::pivot(&[
            Observation::new(ts, "Dubrovnik".to_string(), Some(19.0)),
            Observation::new(ts, "Sveti Ana".to_string(), Some(18.5)),
        ])
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(Selection::parse_choice(" ALL "), Some(Selection::All));
        assert_eq!(
            Selection::parse_choice("sv. ana"),
            Some(Selection::Station("sv. ana".to_string()))
        );
        assert_eq!(Selection::parse_choice("  "), None);
    }

    #[test]
    fn test_resolve_normalizes_name() -> Result<()> {
        let chosen = Selection::Station("sv. ana A".to_string()).resolve(&series())?;
        assert_eq!(chosen, vec!["Sveti Ana".to_string()]);

        let all = Selection::All.resolve(&series())?;
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[test]
    fn test_unknown_station_lists_available() {
        let err = Selection::Station("Pula".to_string())
            .resolve(&series())
            .unwrap_err();

        match err {
            ProcessingError::StationNotFound { requested, available } => {
                assert_eq!(requested, "Pula");
                assert_eq!(available, vec!["Dubrovnik".to_string(), "Sveti Ana".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}

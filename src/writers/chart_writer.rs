use crate::error::{ProcessingError, Result};
use crate::models::StationSeries;
use crate::utils::chart_filename;
use crate::utils::constants::{CHART_HEIGHT, CHART_WIDTH};
use chrono::{Duration, NaiveDateTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Renders one station's series to an SVG line chart.
pub struct ChartWriter {
    output_dir: PathBuf,
}

impl ChartWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the chart and return its path, or `None` when the station has
    /// no values to draw.
    pub fn render(&self, series: &StationSeries) -> Result<Option<PathBuf>> {
        let Some((first, last)) = series.time_range() else {
            warn!("No readings for {}, skipping chart", series.station);
            return Ok(None);
        };
        let (Some(min), Some(max)) = (series.min(), series.max()) else {
            return Ok(None);
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let path = chart_filename(&self.output_dir, &series.station);

        // A single instant or a flat line still needs a non-empty range
        let (start, end) = if first == last {
            (first - Duration::hours(1), last + Duration::hours(1))
        } else {
            (first, last)
        };
        let padding = if (max - min).abs() > 1e-6 {
            (max - min) * 0.1
        } else {
            1.0
        };

        self.draw(&path, series, start..end, (min - padding)..(max + padding))?;

        info!("Saved chart {}", path.display());
        Ok(Some(path))
    }

    fn draw(
        &self,
        path: &Path,
        series: &StationSeries,
        x_range: std::ops::Range<NaiveDateTime>,
        y_range: std::ops::Range<f64>,
    ) -> Result<()> {
        let root = SVGBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Sea-water temperature - {}", series.station),
                ("sans-serif", 28),
            )
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(56)
            .build_cartesian_2d(RangedDateTime::from(x_range), y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Date & time")
            .y_desc("°C")
            .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%Y-%m-%d %Hh").to_string())
            .light_line_style(BLACK.mix(0.15))
            .draw()
            .map_err(render_error)?;

        // Gaps stay gaps: one line per run of present values
        for segment in series.segments() {
            chart
                .draw_series(LineSeries::new(segment, &BLUE))
                .map_err(render_error)?;
        }
        chart
            .draw_series(
                series
                    .present()
                    .map(|(ts, value)| Circle::new((ts, value), 3, BLUE.filled())),
            )
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> ProcessingError {
    ProcessingError::Render(e.to_string())
}

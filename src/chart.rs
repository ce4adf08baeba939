//! SVG chart rendering for a served rate series.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use tracing::debug;

use crate::providers::nbp::REFERENCE_CURRENCY;
use crate::rate_source::RateObservation;

const AXES_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const GRID_COLOR: RGBColor = RGBColor(0xe7, 0xf6, 0xf8);
const BG_COLOR: RGBColor = RGBColor(0xfc, 0xfc, 0xfc);

/// Renders a dated line chart of `observations` to `path`. Expects the rows
/// sorted ascending by date, as the store serves them.
pub fn render_chart(
    observations: &[RateObservation],
    currency: &str,
    path: &Path,
) -> Result<()> {
    if observations.is_empty() {
        bail!("nothing to plot: no observations for {currency}");
    }

    let first = observations[0].date;
    let last = observations[observations.len() - 1].date;
    // A single observation still needs a non-degenerate axis.
    let (x0, x1) = if first == last {
        (first - Duration::days(1), last + Duration::days(1))
    } else {
        (first, last)
    };

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for obs in observations {
        lo = lo.min(obs.rate);
        hi = hi.max(obs.rate);
    }
    let pad = ((hi - lo) * 0.05).max(hi * 0.005);

    let root = SVGBackend::new(path, (960, 540)).into_drawing_area();
    root.fill(&BG_COLOR)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{currency}/{REFERENCE_CURRENCY} Exchange Rates"),
            ("sans-serif", 24).into_font().color(&AXES_COLOR),
        )
        .margin(16)
        .x_label_area_size(56)
        .y_label_area_size(64)
        .build_cartesian_2d(x0..x1, (lo - pad)..(hi + pad))?;

    chart
        .configure_mesh()
        .light_line_style(GRID_COLOR)
        .bold_line_style(GRID_COLOR)
        .axis_style(AXES_COLOR)
        .label_style(("sans-serif", 14).into_font().color(&AXES_COLOR))
        .y_desc("Exchange rate")
        .x_labels(8)
        .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m-%d").to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(
        observations.iter().map(|obs| (obs.date, obs.rate)),
        AXES_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        observations
            .iter()
            .map(|obs| Circle::new((obs.date, obs.rate), 3, AXES_COLOR.filled())),
    )?;

    root.present()
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    debug!(path = %path.display(), points = observations.len(), "chart rendered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates;
    use tempfile::tempdir;

    fn obs(date_text: &str, rate: f64) -> RateObservation {
        RateObservation {
            date: dates::parse_date(date_text).unwrap(),
            currency: "USD".to_string(),
            rate,
        }
    }

    #[test]
    fn renders_an_svg_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usd.svg");
        let rows = vec![
            obs("2021-01-04", 3.70),
            obs("2021-01-05", 3.71),
            obs("2021-01-06", 3.68),
        ];

        render_chart(&rows, "USD", &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("USD/PLN"));
    }

    #[test]
    fn single_observation_still_renders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("single.svg");

        render_chart(&[obs("2021-01-04", 3.70)], "USD", &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_series_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        assert!(render_chart(&[], "USD", &path).is_err());
    }
}

pub mod chart;
pub mod config;
pub mod dates;
pub mod error;
pub mod log;
pub mod providers;
pub mod rate_source;
pub mod rates;
pub mod store;
pub mod ui;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use comfy_table::Cell;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::dates::{Clock, SystemClock};
use crate::error::RatesError;
use crate::providers::nbp::{NbpClient, REFERENCE_CURRENCY};
use crate::rate_source::{RateObservation, RateSource};
use crate::rates::RateService;
use crate::store::{DiskRateStore, RateStore};

pub enum AppCommand {
    Currencies,
    Rates {
        currency: String,
        from: Option<String>,
        to: Option<String>,
    },
    Chart {
        currency: String,
        from: Option<String>,
        to: Option<String>,
        output: Option<PathBuf>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Exchange rate viewer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let client = NbpClient::new(config.nbp_base_url(), config.request_timeout());
    let data_path = config.default_data_path()?;
    let store = DiskRateStore::open(&data_path.join("cache"))?;
    let service = RateService::new(store, client);

    match command {
        AppCommand::Currencies => list_currencies(&service).await,
        AppCommand::Rates { currency, from, to } => {
            let request = RateRequest::resolve(
                &currency,
                from.as_deref(),
                to.as_deref(),
                &config,
                &SystemClock,
            )?;
            let rows = fetch_with_spinner(&service, &request).await?;
            print_rates_table(&request, &rows);
            Ok(())
        }
        AppCommand::Chart {
            currency,
            from,
            to,
            output,
        } => {
            let request = RateRequest::resolve(
                &currency,
                from.as_deref(),
                to.as_deref(),
                &config,
                &SystemClock,
            )?;
            let rows = fetch_with_spinner(&service, &request).await?;
            if rows.is_empty() {
                println!(
                    "{}",
                    ui::style_text("No data found for the requested range.", ui::StyleType::Subtle)
                );
                return Ok(());
            }
            let path = output
                .or_else(|| config.chart_path.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| {
                    PathBuf::from(format!("{}-rates.svg", request.currency.to_lowercase()))
                });
            chart::render_chart(&rows, &request.currency, &path)?;
            println!("Chart written to {}", path.display());
            Ok(())
        }
    }
}

/// A validated request: normalized code plus a bounded date range.
struct RateRequest {
    currency: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl RateRequest {
    /// Parses and validates the raw command-line input. The end date
    /// defaults to yesterday (the upstream publishes no rate for today until
    /// the afternoon), the start date to 30 days earlier.
    fn resolve(
        currency: &str,
        from: Option<&str>,
        to: Option<&str>,
        config: &AppConfig,
        clock: &dyn Clock,
    ) -> Result<Self, RatesError> {
        let end = match to {
            Some(text) => dates::parse_date(text)?,
            None => clock.yesterday(),
        };
        let start = match from {
            Some(text) => dates::parse_date(text)?,
            None => end - Duration::days(30),
        };
        dates::validate_range(start, end, config.max_range_days)?;
        Ok(Self {
            currency: currency.to_uppercase(),
            start,
            end,
        })
    }
}

async fn fetch_rates<S: RateStore, R: RateSource>(
    service: &RateService<S, R>,
    request: &RateRequest,
) -> Result<Vec<RateObservation>> {
    // Soft validation against the live listing; the engine itself trusts
    // its currency argument.
    let available = service.available_currencies().await?;
    if !available.iter().any(|code| code == &request.currency) {
        anyhow::bail!(
            "currency '{}' is not reported by the exchange rate service",
            request.currency
        );
    }
    Ok(service
        .get_rates(&request.currency, request.start, request.end)
        .await?)
}

async fn fetch_with_spinner<S: RateStore, R: RateSource>(
    service: &RateService<S, R>,
    request: &RateRequest,
) -> Result<Vec<RateObservation>> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let result = fetch_rates(service, request).await;
    spinner.finish_and_clear();
    result
}

async fn list_currencies<S: RateStore, R: RateSource>(
    service: &RateService<S, R>,
) -> Result<()> {
    let spinner = ui::new_spinner("Fetching available currencies...");
    let result = service.available_currencies().await;
    spinner.finish_and_clear();
    let codes = result?;

    println!(
        "{}",
        ui::style_text(
            &format!("{} currencies quoted against {REFERENCE_CURRENCY}", codes.len()),
            ui::StyleType::Title
        )
    );
    println!("{}", codes.join(", "));
    Ok(())
}

fn print_rates_table(request: &RateRequest, rows: &[RateObservation]) {
    if rows.is_empty() {
        println!(
            "{}",
            ui::style_text("No data found for the requested range.", ui::StyleType::Subtle)
        );
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("1 {} in {REFERENCE_CURRENCY}", request.currency)),
    ]);
    for obs in rows {
        table.add_row(vec![
            Cell::new(dates::format_date(obs.date)),
            ui::rate_cell(obs.rate),
        ]);
    }

    println!(
        "{}",
        ui::style_text(
            &format!(
                "{}/{REFERENCE_CURRENCY} exchange rates, {} to {}",
                request.currency,
                dates::format_date(request.start),
                dates::format_date(request.end)
            ),
            ui::StyleType::Title
        )
    );
    println!("{table}");

    let min = rows.iter().map(|o| o.rate).fold(f64::INFINITY, f64::min);
    let max = rows.iter().map(|o| o.rate).fold(f64::NEG_INFINITY, f64::max);
    let mean = rows.iter().map(|o| o.rate).sum::<f64>() / rows.len() as f64;
    println!(
        "{}",
        ui::style_text(
            &format!("min {min:.4}   max {max:.4}   mean {mean:.4}"),
            ui::StyleType::Subtle
        )
    );
}

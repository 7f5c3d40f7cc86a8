use crate::error::AnalysisError;
use crate::query::aggregation::{percentages, CountryBreakdown};
use crate::query::{rank_all_nonzero, top_n, Aggregator, Dimension, Scores, Slice};
use crate::report::config::{year_label, AnalysisConfig, ALL_LABEL};
use crate::report::tables::{
    Artifact, FrequencyRow, MetricsRow, Rows, SummaryRow, Table, ValueRow,
};

use rust_decimal::Decimal;
use std::fmt::Display;
use std::path::Path;
use tokio::sync::mpsc;

const ROUTES_OPTION: u8 = 1;
const TRANSPORT_OPTION: u8 = 2;
const COUNTRIES_OPTION: u8 = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cells: usize,
    pub failed_cells: usize,
    pub artifacts: usize,
}

/// Frequency and value of every candidate in one slice, with percentages.
struct SliceMetrics {
    frequency: Scores<u64>,
    value: Scores<Decimal>,
    frequency_pct: Scores<Decimal>,
    value_pct: Scores<Decimal>,
}

impl SliceMetrics {
    fn rows(&self) -> Vec<MetricsRow> {
        self.frequency
            .iter()
            .zip(&self.value)
            .zip(self.frequency_pct.iter().zip(&self.value_pct))
            .map(|(((key, frequency), (_, value)), ((_, frequency_pct), (_, value_pct)))| {
                MetricsRow {
                    key: key.clone(),
                    frequency: *frequency,
                    frequency_pct: *frequency_pct,
                    total_value: *value,
                    total_value_pct: *value_pct,
                }
            })
            .collect()
    }

    /// The `n` most frequent candidates. Ranking carries each key's own
    /// percentage, so rendered keys never need to be unique.
    fn top_frequency(&self, n: usize) -> Vec<FrequencyRow> {
        let entries: Vec<_> = self
            .frequency
            .iter()
            .zip(&self.frequency_pct)
            .map(|((key, frequency), (_, pct))| ((key, *pct), *frequency))
            .collect();
        top_n(&entries, n)
            .into_iter()
            .map(|((key, frequency_pct), frequency)| FrequencyRow {
                key: key.clone(),
                frequency,
                frequency_pct,
            })
            .collect()
    }

    /// The `n` most valuable candidates.
    fn top_value(&self, n: usize) -> Vec<ValueRow> {
        let entries: Vec<_> = self
            .value
            .iter()
            .zip(&self.value_pct)
            .map(|((key, value), (_, pct))| ((key, *pct), *value))
            .collect();
        top_n(&entries, n)
            .into_iter()
            .map(|((key, total_value_pct), total_value)| ValueRow {
                key: key.clone(),
                total_value,
                total_value_pct,
            })
            .collect()
    }
}

/// Runs the three analysis options over the configured direction x year
/// matrix and hands every table to the artifact channel.
pub struct Driver<'a> {
    aggregator: Aggregator<'a>,
    config: &'a AnalysisConfig,
    sender: mpsc::Sender<Artifact>,
    summary: RunSummary,
}

impl<'a> Driver<'a> {
    pub fn new(
        aggregator: Aggregator<'a>,
        config: &'a AnalysisConfig,
        sender: mpsc::Sender<Artifact>,
    ) -> Self {
        Self {
            aggregator,
            config,
            sender,
            summary: RunSummary::default(),
        }
    }

    /// Run every option. Consumes the driver so the channel closes when done.
    pub async fn run(mut self) -> Result<RunSummary, AnalysisError> {
        self.run_routes().await?;
        self.run_transport_modes().await?;
        self.run_countries().await?;
        Ok(self.summary)
    }

    /// Option 1: most frequent and most valuable routes.
    pub async fn run_routes(&mut self) -> Result<(), AnalysisError> {
        let config = self.config;
        for direction in &config.directions {
            let direction = direction.as_deref();
            let candidates: Vec<Dimension> = self
                .aggregator
                .routes(direction)
                .into_iter()
                .map(Dimension::Route)
                .collect();
            log::info!(
                "Option 1 - {}: {} routes",
                direction.unwrap_or(ALL_LABEL),
                candidates.len()
            );

            let mut summary_rows = Vec::new();
            for &year in &config.years {
                let slice = Slice::new(direction, year);
                let Some(metrics) = self.cell(&slice, |agg| slice_metrics(agg, &candidates, &slice))
                else {
                    continue;
                };

                let dir = config.slice_dir(ROUTES_OPTION, direction, year);
                let top_frequency_rows = metrics.top_frequency(config.top_n);
                let top_value_rows = metrics.top_value(config.top_n);
                log_ranking(
                    &format!("Option 1 - {slice}: most used routes"),
                    top_frequency_rows.iter().map(|r| (&r.key, r.frequency)),
                );
                log_ranking(
                    &format!("Option 1 - {slice}: most valuable routes"),
                    top_value_rows.iter().map(|r| (&r.key, r.total_value)),
                );

                summary_rows.push(SummaryRow {
                    year: year_label(year),
                    frequency_pct: top_frequency_rows.iter().map(|r| r.frequency_pct).sum(),
                    total_value_pct: top_value_rows.iter().map(|r| r.total_value_pct).sum(),
                });

                let n = config.top_n;
                self.emit(&dir, "results.csv", "route", Rows::Metrics(metrics.rows()))
                    .await?;
                self.emit(
                    &dir,
                    &format!("top{n}_frequency.csv"),
                    "route",
                    Rows::Frequency(top_frequency_rows),
                )
                .await?;
                self.emit(
                    &dir,
                    &format!("top{n}_value.csv"),
                    "route",
                    Rows::Value(top_value_rows),
                )
                .await?;
            }

            let dir = config.option_dir(ROUTES_OPTION, direction);
            self.emit(&dir, "summary.csv", "year", Rows::Summary(summary_rows))
                .await?;
        }
        Ok(())
    }

    /// Option 2: usage and value per transport mode.
    pub async fn run_transport_modes(&mut self) -> Result<(), AnalysisError> {
        let config = self.config;
        let candidates: Vec<Dimension> = self
            .aggregator
            .transport_modes()
            .into_iter()
            .map(Dimension::TransportMode)
            .collect();

        for direction in &config.directions {
            let direction = direction.as_deref();
            for &year in &config.years {
                let slice = Slice::new(direction, year);
                let Some(metrics) = self.cell(&slice, |agg| slice_metrics(agg, &candidates, &slice))
                else {
                    continue;
                };

                log_ranking(
                    &format!("Option 2 - {slice}: transport modes by use"),
                    rank_all_nonzero(&metrics.frequency),
                );
                log_ranking(
                    &format!("Option 2 - {slice}: transport modes by value"),
                    rank_all_nonzero(&metrics.value),
                );

                let dir = config.slice_dir(TRANSPORT_OPTION, direction, year);
                self.emit(
                    &dir,
                    "results.csv",
                    "transport_mode",
                    Rows::Metrics(metrics.rows()),
                )
                .await?;
            }
        }
        Ok(())
    }

    /// Option 3: value per country, imports by destination and exports by origin.
    pub async fn run_countries(&mut self) -> Result<(), AnalysisError> {
        let config = self.config;
        for &year in &config.years {
            let slice = Slice::new(None, year);
            let Some(breakdown) = self.cell(&slice, |agg| {
                agg.country_breakdown(&config.import_direction, &config.export_direction, year)
            }) else {
                continue;
            };

            let CountryBreakdown {
                imports,
                exports,
                total,
                import_total,
                export_total,
            } = breakdown;
            let grand_total = import_total + export_total;

            let tables = [
                (Some(config.import_direction.as_str()), imports, import_total),
                (Some(config.export_direction.as_str()), exports, export_total),
                (None, total, grand_total),
            ];
            for (direction, values, direction_total) in tables {
                let ranked = rank_all_nonzero(&values);
                log_ranking(
                    &format!(
                        "Option 3 - {} year={}: countries by value",
                        direction.unwrap_or(ALL_LABEL),
                        year_label(year)
                    ),
                    ranked.iter().map(|(key, value)| (key, value)),
                );
                let rows = country_rows(&ranked, direction_total);
                let dir = config.slice_dir(COUNTRIES_OPTION, direction, year);
                self.emit(&dir, "results.csv", "country", Rows::Value(rows))
                    .await?;
            }
        }
        Ok(())
    }

    /// Compute one matrix cell. Errors are logged and the cell is skipped.
    fn cell<T>(
        &mut self,
        slice: &Slice,
        compute: impl FnOnce(&Aggregator<'a>) -> Result<T, AnalysisError>,
    ) -> Option<T> {
        self.summary.cells += 1;
        match compute(&self.aggregator) {
            Ok(value) => Some(value),
            Err(e) => {
                self.summary.failed_cells += 1;
                log::error!("Skipping {slice}: {e}");
                None
            }
        }
    }

    async fn emit(
        &mut self,
        dir: &Path,
        file_name: &str,
        key_column: &'static str,
        rows: Rows,
    ) -> Result<(), AnalysisError> {
        let artifact = Artifact {
            path: dir.join(file_name),
            table: Table { key_column, rows },
        };
        self.sender
            .send(artifact)
            .await
            .map_err(|_| AnalysisError::WriterClosed)?;
        self.summary.artifacts += 1;
        Ok(())
    }
}

fn slice_metrics(
    aggregator: &Aggregator<'_>,
    candidates: &[Dimension],
    slice: &Slice,
) -> Result<SliceMetrics, AnalysisError> {
    aggregator.check_slice(slice)?;
    let total_count = Decimal::from(aggregator.total_count(slice));
    let total_value = aggregator.total_value(slice);

    let frequency = aggregator.frequencies(candidates, slice)?;
    let value = aggregator.value_sums(candidates, slice)?;
    let frequency_pct = percentages(&frequency, total_count);
    let value_pct = percentages(&value, total_value);

    Ok(SliceMetrics {
        frequency,
        value,
        frequency_pct,
        value_pct,
    })
}

fn country_rows(ranked: &[(String, Decimal)], total: Decimal) -> Vec<ValueRow> {
    percentages(ranked, total)
        .into_iter()
        .zip(ranked)
        .map(|((key, total_value_pct), (_, total_value))| ValueRow {
            key,
            total_value: *total_value,
            total_value_pct,
        })
        .collect()
}

fn log_ranking<K: Display, V: Display>(title: &str, ranked: impl IntoIterator<Item = (K, V)>) {
    log::info!("{title}:");
    for (i, (key, value)) in ranked.into_iter().enumerate() {
        log::info!("{}.- {key}: {value}", i + 1);
    }
}

//! Chart generation from reconciled series.
//!
//! The reconciler's output is turned into [`ChartData`], a flat list of named
//! series over one shared timeline, which any [`SeriesRenderer`] can draw.
//!
//! This module provides:
//! - `html`: self-contained HTML page around a plotters SVG line chart
//! - `json`: JSON export of the reconciled series

pub mod html;
pub mod json;

use serde::Serialize;

use crate::error::AnalyzerError;
use crate::meminfo::kb_to_mib;
use crate::series::ReconciledSeries;

pub use html::{HtmlRenderer, DEFAULT_OUTPUT_FILE};
pub use json::export_json;

/// Draws a chart into a document.
pub trait SeriesRenderer {
    fn render(&self, chart: &ChartData) -> Result<String, AnalyzerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    Process,
    System,
}

/// One line of the chart; values are MiB, `None` is a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub kind: SeriesKind,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    /// Uptime seconds of each snapshot.
    pub x_seconds: Vec<u64>,
    /// `H:MM:SS` label for each entry of `x_seconds`.
    pub x_labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty() || self.x_seconds.is_empty()
    }

    /// Largest value over every series, if any value is present.
    pub fn max_value(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .copied()
            .reduce(f64::max)
    }
}

/// Series selection for a chart.
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    pub title: String,
    pub include_names: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
    /// Keep only the N processes with the highest peak PSS.
    pub top_n: Option<usize>,
    pub system_series: bool,
}

/// Substring filter on series names; exclusion wins over inclusion.
pub fn should_include_series(
    name: &str,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> bool {
    if let Some(ex) = exclude {
        if ex.iter().any(|s| name.contains(s.as_str())) {
            return false;
        }
    }
    if let Some(inc) = include {
        if !inc.is_empty() {
            return inc.iter().any(|s| name.contains(s.as_str()));
        }
    }
    true
}

/// Flattens reconciled series into chart lines.
///
/// Process lines keep first-seen order after filtering; `top_n` only decides
/// which of them survive.
pub fn build_chart(series: &ReconciledSeries, opts: &ChartOptions) -> ChartData {
    let mut selected: Vec<(usize, u64)> = series
        .per_process
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            should_include_series(
                &s.name,
                opts.include_names.as_deref(),
                opts.exclude_names.as_deref(),
            )
        })
        .map(|(idx, s)| (idx, s.peak_kb()))
        .collect();

    if let Some(n) = opts.top_n {
        // stable sort: equal peaks keep first-seen order
        selected.sort_by(|a, b| b.1.cmp(&a.1));
        selected.truncate(n);
        selected.sort_by_key(|(idx, _)| *idx);
    }

    let mut lines: Vec<ChartSeries> = selected
        .into_iter()
        .map(|(idx, _)| {
            let s = &series.per_process[idx];
            ChartSeries {
                name: s.name.clone(),
                kind: SeriesKind::Process,
                values: s.pss_kb.iter().map(|&kb| Some(kb_to_mib(kb))).collect(),
            }
        })
        .collect();

    if opts.system_series && !series.is_empty() {
        let system = [
            ("Free RAM (MiB)", &series.system.free_ram_mib),
            ("Used RAM (MiB)", &series.system.used_ram_mib),
            ("Foreground (MiB)", &series.system.foreground_mib),
        ];
        for (name, values) in system {
            // a system line that is absent everywhere carries no information
            if values.iter().any(Option::is_some) {
                lines.push(ChartSeries {
                    name: name.to_string(),
                    kind: SeriesKind::System,
                    values: values.clone(),
                });
            }
        }
    }

    ChartData {
        title: opts.title.clone(),
        x_seconds: series.timeline.clone(),
        x_labels: series.timeline_labels(),
        series: lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{DuplicatePolicy, ProcessSeries, SystemSeries};

    fn sample() -> ReconciledSeries {
        ReconciledSeries {
            timeline: vec![60, 120],
            per_process: vec![
                ProcessSeries {
                    name: "system".into(),
                    pss_kb: vec![2048, 4096],
                },
                ProcessSeries {
                    name: "com.example.app".into(),
                    pss_kb: vec![1024, 0],
                },
                ProcessSeries {
                    name: "com.example.app:remote".into(),
                    pss_kb: vec![0, 8192],
                },
            ],
            system: SystemSeries {
                free_ram_mib: vec![Some(100.0), None],
                used_ram_mib: vec![None, None],
                foreground_mib: vec![Some(1.0), Some(2.0)],
            },
            duplicate_policy: DuplicatePolicy::First,
        }
    }

    fn names(chart: &ChartData) -> Vec<&str> {
        chart.series.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_should_include_series() {
        let inc = vec!["example".to_string()];
        let ex = vec!["remote".to_string()];
        assert!(should_include_series("anything", None, None));
        assert!(should_include_series("com.example.app", Some(&inc), Some(&ex)));
        assert!(!should_include_series("com.example.app:remote", Some(&inc), Some(&ex)));
        assert!(!should_include_series("system", Some(&inc), None));
    }

    #[test]
    fn test_build_chart_all_series() {
        let opts = ChartOptions {
            system_series: true,
            ..ChartOptions::default()
        };
        let chart = build_chart(&sample(), &opts);
        assert_eq!(
            names(&chart),
            vec![
                "system",
                "com.example.app",
                "com.example.app:remote",
                "Free RAM (MiB)",
                "Foreground (MiB)"
            ]
        );
        assert_eq!(chart.x_labels, vec!["0:01:00", "0:02:00"]);
        assert_eq!(chart.series[0].values, vec![Some(2.0), Some(4.0)]);
        assert_eq!(chart.series[3].values, vec![Some(100.0), None]);
        assert_eq!(chart.max_value(), Some(100.0));
    }

    #[test]
    fn test_build_chart_top_n_keeps_first_seen_order() {
        let opts = ChartOptions {
            top_n: Some(2),
            ..ChartOptions::default()
        };
        let chart = build_chart(&sample(), &opts);
        assert_eq!(names(&chart), vec!["system", "com.example.app:remote"]);
    }

    #[test]
    fn test_build_chart_empty_series() {
        let opts = ChartOptions {
            system_series: true,
            ..ChartOptions::default()
        };
        let chart = build_chart(&ReconciledSeries::default(), &opts);
        assert!(chart.is_empty());
        assert_eq!(chart.max_value(), None);
    }
}

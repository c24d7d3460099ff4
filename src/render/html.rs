//! Self-contained HTML report around a plotters line chart.
//!
//! The chart is drawn with the plotters SVG backend into strings and inlined in
//! the page. The axes go in a base layer and every series gets its own layer on
//! top, so the legend can hide a series by hiding its layer. Styles and the
//! legend-toggle script are inline too; the file needs no external assets.

use chrono::Local;
use plotters::prelude::*;

use crate::error::AnalyzerError;
use crate::render::{ChartData, SeriesKind, SeriesRenderer};
use crate::series::format_hms;

/// Default report file name.
pub const DEFAULT_OUTPUT_FILE: &str = "dmanalyzer.html";

const FOOTER_TEXT: &str = "Generated by dmanalyzer from Android dumpsys meminfo snapshots";

/// Line colors, cycled per series.
const PALETTE: [RGBColor; 12] = [
    RGBColor(0x00, 0x7b, 0xff),
    RGBColor(0xdc, 0x35, 0x45),
    RGBColor(0x28, 0xa7, 0x45),
    RGBColor(0xfd, 0x7e, 0x14),
    RGBColor(0x6f, 0x42, 0xc1),
    RGBColor(0x20, 0xc9, 0x97),
    RGBColor(0xe8, 0x3e, 0x8c),
    RGBColor(0x17, 0xa2, 0xb8),
    RGBColor(0x6c, 0x75, 0x7d),
    RGBColor(0xff, 0xc1, 0x07),
    RGBColor(0x34, 0x3a, 0x40),
    RGBColor(0x8d, 0x6e, 0x63),
];

// Plot size in pixels.
const WIDTH: u32 = 1100;
const HEIGHT: u32 = 520;
const MAX_X_LABELS: usize = 10;

/// Renders [`ChartData`] as an HTML document.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    /// Omit the generation timestamp; keeps output byte-stable for tests.
    pub omit_timestamp: bool,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeriesRenderer for HtmlRenderer {
    fn render(&self, chart: &ChartData) -> Result<String, AnalyzerError> {
        let title = if chart.title.is_empty() {
            "Memory usage over time"
        } else {
            chart.title.as_str()
        };

        let mut html = html_header(title);
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));

        if chart.is_empty() {
            html.push_str(
                r#"<div class="info-box">No series to chart. Either no usable snapshots were found or every series was filtered out.</div>
"#,
            );
        } else {
            html.push_str(&format!(
                r#"<div class="metric"><span class="metric-label">Snapshots:</span> <span class="metric-value">{}</span></div>
<div class="metric"><span class="metric-label">Series:</span> <span class="metric-value">{}</span></div>
<div class="metric"><span class="metric-label">Span:</span> <span class="metric-value">{} to {}</span></div>
"#,
                chart.x_seconds.len(),
                chart.series.len(),
                escape_html(chart.x_labels.first().map(String::as_str).unwrap_or("")),
                escape_html(chart.x_labels.last().map(String::as_str).unwrap_or("")),
            ));
            html.push_str(&render_plot(chart)?);
            html.push_str(&render_legend(chart));
            html.push_str(LEGEND_SCRIPT);
        }

        html.push_str(&html_footer(self.omit_timestamp));
        Ok(html)
    }
}

/// Escapes text for element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

fn css_color(c: &RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2)
}

fn render_error(e: impl std::fmt::Display) -> AnalyzerError {
    AnalyzerError::Render(e.to_string())
}

/// Splits a series at its gaps into runs of present points.
fn segments(x_seconds: &[u64], values: &[Option<f64>]) -> Vec<Vec<(u64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (&secs, value) in x_seconds.iter().zip(values) {
        match value {
            Some(v) => current.push((secs, *v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Axis ranges shared by every layer so the layers line up.
#[derive(Debug, Clone, Copy)]
struct PlotRange {
    x_min: u64,
    x_max: u64,
    y_max: f64,
}

impl PlotRange {
    fn new(chart: &ChartData) -> Self {
        let x_min = chart.x_seconds.iter().copied().min().unwrap_or(0);
        let x_max = chart.x_seconds.iter().copied().max().unwrap_or(0);
        // a single snapshot still needs a non-empty x range
        let (x_min, x_max) = if x_min == x_max {
            (x_min.saturating_sub(1), x_max + 1)
        } else {
            (x_min, x_max)
        };
        Self {
            x_min,
            x_max,
            y_max: chart.max_value().unwrap_or(0.0).max(1.0) * 1.05,
        }
    }
}

/// Draws one SVG layer: the axes when `series` is `None`, else that series.
fn draw_layer(
    chart: &ChartData,
    range: PlotRange,
    series: Option<usize>,
) -> Result<String, AnalyzerError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        if series.is_none() {
            root.fill(&WHITE).map_err(render_error)?;
        }

        let mut plot = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(range.x_min..range.x_max, 0f64..range.y_max)
            .map_err(render_error)?;

        match series {
            None => plot
                .configure_mesh()
                .x_labels(MAX_X_LABELS)
                .y_labels(6)
                .x_label_formatter(&|secs: &u64| format_hms(*secs))
                .y_label_formatter(&|mib: &f64| format!("{:.0}", mib))
                .x_desc("uptime (h:mm:ss)")
                .y_desc("MiB")
                .draw()
                .map_err(render_error)?,
            Some(idx) => {
                let line = &chart.series[idx];
                let width = match line.kind {
                    SeriesKind::Process => 2,
                    SeriesKind::System => 3,
                };
                for run in segments(&chart.x_seconds, &line.values) {
                    plot.draw_series(
                        LineSeries::new(run, color(idx).stroke_width(width)).point_size(2),
                    )
                    .map_err(render_error)?;
                }
            }
        }

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

/// Base layer plus one layer per series, stacked in one positioned box.
fn render_plot(chart: &ChartData) -> Result<String, AnalyzerError> {
    let range = PlotRange::new(chart);
    let mut html = format!(
        r#"<div class="plot-scroll">
<div class="plot" style="width: {WIDTH}px; height: {HEIGHT}px">
<div class="layer">{}</div>
"#,
        draw_layer(chart, range, None)?
    );
    for idx in 0..chart.series.len() {
        html.push_str(&format!(
            r#"<div class="layer" id="series-{idx}">{}</div>
"#,
            draw_layer(chart, range, Some(idx))?
        ));
    }
    html.push_str("</div>\n</div>\n");
    Ok(html)
}

fn render_legend(chart: &ChartData) -> String {
    let mut legend = String::from(
        r#"<h2>Series</h2>
<p><button type="button" onclick="setAllSeries(true)">Show all</button> <button type="button" onclick="setAllSeries(false)">Hide all</button></p>
<ul class="legend">
"#,
    );
    for (idx, series) in chart.series.iter().enumerate() {
        legend.push_str(&format!(
            r#"  <li><label><input type="checkbox" checked data-series="{idx}" onchange="toggleSeries(this)"> <span class="swatch" style="background: {}"></span>{}</label></li>
"#,
            css_color(&color(idx)),
            escape_html(&series.name)
        ));
    }
    legend.push_str("</ul>\n");
    legend
}

const LEGEND_SCRIPT: &str = r#"<script>
function toggleSeries(box) {
  var g = document.getElementById('series-' + box.dataset.series);
  if (g) { g.style.display = box.checked ? '' : 'none'; }
}
function setAllSeries(visible) {
  document.querySelectorAll('input[data-series]').forEach(function (box) {
    box.checked = visible;
    toggleSeries(box);
  });
}
</script>
"#;

/// Generate HTML header with title and inline styles.
fn html_header(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - dmanalyzer</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }}
        .container {{ max-width: 1400px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        h1 {{ color: #333; border-bottom: 3px solid #007bff; padding-bottom: 10px; }}
        h2 {{ color: #555; margin-top: 30px; }}
        .metric {{ display: inline-block; margin: 10px 20px 10px 0; padding: 10px 15px; background: #e9ecef; border-radius: 4px; }}
        .metric-label {{ font-weight: 600; color: #555; }}
        .metric-value {{ font-size: 1.2em; color: #007bff; }}
        .info-box {{ background: #d1ecf1; border: 1px solid #bee5eb; border-radius: 4px; padding: 15px; margin: 20px 0; }}
        .plot-scroll {{ overflow-x: auto; margin: 20px 0; }}
        .plot {{ position: relative; }}
        .plot .layer {{ position: absolute; left: 0; top: 0; pointer-events: none; }}
        .legend {{ list-style: none; padding: 0; columns: 3; }}
        .legend li {{ margin: 4px 0; font-family: 'Courier New', monospace; font-size: 0.9em; }}
        .swatch {{ display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 2px; vertical-align: middle; }}
        button {{ background: #007bff; color: white; border: none; border-radius: 4px; padding: 6px 12px; cursor: pointer; }}
        button:hover {{ background: #0056b3; }}
        .footer {{ margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; font-size: 0.9em; }}
    </style>
</head>
<body>
<div class="container">
"#,
        title = escape_html(title)
    )
}

/// Generate HTML footer.
fn html_footer(omit_timestamp: bool) -> String {
    let generated = if omit_timestamp {
        String::new()
    } else {
        format!(" at {}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    };
    format!(
        r#"<div class="footer">
    <p>{FOOTER_TEXT}{generated}</p>
</div>
</div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ChartSeries;

    fn chart() -> ChartData {
        ChartData {
            title: "Device <A>".into(),
            x_seconds: vec![0, 60, 120],
            x_labels: vec!["0:00:00".into(), "0:01:00".into(), "0:02:00".into()],
            series: vec![
                ChartSeries {
                    name: "com.example.app".into(),
                    kind: SeriesKind::Process,
                    values: vec![Some(1.0), Some(2.0), Some(3.0)],
                },
                ChartSeries {
                    name: "Free RAM (MiB)".into(),
                    kind: SeriesKind::System,
                    values: vec![Some(10.0), None, Some(12.0)],
                },
            ],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(&color(0)), "#007bff");
        assert_eq!(css_color(&color(PALETTE.len())), "#007bff");
    }

    #[test]
    fn test_segments_split_at_gaps() {
        let x = [0, 60, 120, 180, 240];
        let values = [Some(1.0), None, Some(3.0), Some(4.0), None];
        assert_eq!(
            segments(&x, &values),
            vec![vec![(0, 1.0)], vec![(120, 3.0), (180, 4.0)]]
        );
        assert!(segments(&x, &[None, None, None, None, None]).is_empty());
    }

    #[test]
    fn test_plot_range_widens_single_snapshot() {
        let mut data = chart();
        data.x_seconds = vec![60];
        let range = PlotRange::new(&data);
        assert!(range.x_min < range.x_max);
        assert!(range.y_max > 12.0);
    }

    #[test]
    fn test_render_contains_every_series() {
        let html = HtmlRenderer { omit_timestamp: true }.render(&chart()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Device &lt;A&gt; - dmanalyzer</title>"));
        // axes plus one layer per series
        assert_eq!(html.matches("<svg").count(), 3);
        assert!(html.contains(r#"id="series-0""#));
        assert!(html.contains(r#"id="series-1""#));
        assert!(html.contains(r#"data-series="1""#));
        assert!(html.contains("Free RAM (MiB)"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_render_empty_chart() {
        let html = HtmlRenderer { omit_timestamp: true }
            .render(&ChartData::default())
            .unwrap();
        assert!(html.contains("No series to chart"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_empty_message_does_not_blame_snapshots() {
        // snapshots exist but every series was filtered out
        let data = ChartData {
            title: "t".into(),
            x_seconds: vec![60],
            x_labels: vec!["0:01:00".into()],
            series: Vec::new(),
        };
        let html = HtmlRenderer { omit_timestamp: true }.render(&data).unwrap();
        assert!(html.contains("every series was filtered out"));
    }
}

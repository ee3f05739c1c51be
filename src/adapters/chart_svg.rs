//! Inline SVG line charts for the dashboard.
//!
//! Three charts are drawn from one `PriceAnalysis`:
//! - moving averages: close, short SMA and long SMA
//! - RSI on a fixed 0..100 axis with overbought/oversold lines at 70 and 30
//! - stop-loss: close and the trailing-minimum stop
//!
//! Undefined points (`None` or NaN) break the line rather than drop to zero.

use crate::domain::dashboard::PriceAnalysis;
use crate::domain::indicator::IndicatorSeries;
use std::fmt::Write;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 260.0;
const PAD_LEFT: f64 = 56.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 28.0;
const PAD_BOTTOM: f64 = 32.0;

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    MovingAverages,
    Rsi,
    StopLoss,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::MovingAverages, ChartKind::Rsi, ChartKind::StopLoss];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sma" | "moving-averages" => Some(ChartKind::MovingAverages),
            "rsi" => Some(ChartKind::Rsi),
            "stop-loss" | "stoploss" => Some(ChartKind::StopLoss),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::MovingAverages => "sma",
            ChartKind::Rsi => "rsi",
            ChartKind::StopLoss => "stop-loss",
        }
    }

    pub fn title(self, ticker: &str) -> String {
        match self {
            ChartKind::MovingAverages => format!("{ticker} Stock Price with Moving Averages"),
            ChartKind::Rsi => format!("{ticker} Relative Strength Index (RSI)"),
            ChartKind::StopLoss => format!("{ticker} Stop-Loss Levels"),
        }
    }
}

struct LineSeries {
    label: String,
    color: &'static str,
    values: Vec<Option<f64>>,
}

struct RefLine {
    value: f64,
    color: &'static str,
}

fn series_for(kind: ChartKind, indicators: &IndicatorSeries) -> (Vec<LineSeries>, Vec<RefLine>) {
    let cfg = indicators.config;
    let close = || LineSeries {
        label: "Close".to_string(),
        color: "#1f77b4",
        values: indicators.closes(),
    };

    match kind {
        ChartKind::MovingAverages => (
            vec![
                close(),
                LineSeries {
                    label: format!("{}-Day SMA", cfg.short_window),
                    color: "#ff7f0e",
                    values: indicators.column(cfg.short_sma()),
                },
                LineSeries {
                    label: format!("{}-Day SMA", cfg.long_window),
                    color: "#2ca02c",
                    values: indicators.column(cfg.long_sma()),
                },
            ],
            Vec::new(),
        ),
        ChartKind::Rsi => (
            vec![LineSeries {
                label: "RSI".to_string(),
                color: "#9467bd",
                values: indicators.column(cfg.rsi()),
            }],
            vec![
                RefLine {
                    value: RSI_OVERBOUGHT,
                    color: "#d62728",
                },
                RefLine {
                    value: RSI_OVERSOLD,
                    color: "#2ca02c",
                },
            ],
        ),
        ChartKind::StopLoss => (
            vec![
                close(),
                LineSeries {
                    label: "Stop-Loss".to_string(),
                    color: "#d62728",
                    values: indicators.column(cfg.stop_loss()),
                },
            ],
            Vec::new(),
        ),
    }
}

fn finite(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|v| v.filter(|x| x.is_finite()))
}

fn y_range(kind: ChartKind, series: &[LineSeries]) -> Option<(f64, f64)> {
    if kind == ChartKind::Rsi {
        return Some((0.0, 100.0));
    }
    let (min, max) = series
        .iter()
        .flat_map(|s| finite(&s.values))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 1.0, max + 1.0))
    }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Path data with a fresh `M` after every gap.
fn path_data(values: &[Option<f64>], x: impl Fn(usize) -> f64, y: impl Fn(f64) -> f64) -> String {
    let mut d = String::new();
    let mut pen_down = false;
    for (i, v) in values.iter().enumerate() {
        match v.filter(|v| v.is_finite()) {
            Some(v) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                let _ = write!(d, "{}{:.1},{:.1} ", cmd, x(i), y(v));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    d.trim_end().to_string()
}

pub fn render_chart(kind: ChartKind, ticker: &str, indicators: &IndicatorSeries) -> String {
    let (series, refs) = series_for(kind, indicators);
    let plot_w = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_h = HEIGHT - PAD_TOP - PAD_BOTTOM;
    let title = escape_xml(&kind.title(ticker));

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart chart-{}" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" role="img" aria-label="{title}">"#,
        kind.slug()
    );
    let _ = write!(
        svg,
        r#"<text x="{PAD_LEFT}" y="18" font-size="14" font-family="sans-serif">{title}</text>"#
    );

    let Some((lo, hi)) = y_range(kind, &series) else {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12" font-family="sans-serif">No data available.</text></svg>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0
        );
        return svg;
    };

    let n = indicators.len();
    let step = if n > 1 { plot_w / (n - 1) as f64 } else { 0.0 };
    let x = |i: usize| PAD_LEFT + i as f64 * step;
    let y = |v: f64| PAD_TOP + plot_h - (v - lo) / (hi - lo) * plot_h;

    // axes
    let _ = write!(
        svg,
        r##"<g stroke="#888" stroke-width="1"><line x1="{PAD_LEFT}" y1="{PAD_TOP}" x2="{PAD_LEFT}" y2="{:.1}"/><line x1="{PAD_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}"/></g>"##,
        PAD_TOP + plot_h,
        PAD_TOP + plot_h,
        PAD_LEFT + plot_w,
        PAD_TOP + plot_h
    );
    for v in [lo, hi] {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10" font-family="sans-serif">{:.2}</text>"#,
            PAD_LEFT - 4.0,
            y(v) + 3.0,
            v
        );
    }
    if let (Some(first), Some(last)) = (indicators.rows.first(), indicators.last()) {
        let _ = write!(
            svg,
            r#"<text x="{PAD_LEFT}" y="{:.1}" font-size="10" font-family="sans-serif">{}</text><text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10" font-family="sans-serif">{}</text>"#,
            HEIGHT - 10.0,
            first.date,
            PAD_LEFT + plot_w,
            HEIGHT - 10.0,
            last.date
        );
    }

    for r in &refs {
        let _ = write!(
            svg,
            r#"<line class="ref" x1="{PAD_LEFT}" y1="{0:.1}" x2="{1:.1}" y2="{0:.1}" stroke="{2}" stroke-dasharray="4 3"/>"#,
            y(r.value),
            PAD_LEFT + plot_w,
            r.color
        );
    }

    for s in &series {
        let d = path_data(&s.values, x, y);
        if d.is_empty() {
            continue;
        }
        let _ = write!(
            svg,
            r#"<path fill="none" stroke="{}" stroke-width="1.5" d="{d}"><title>{}</title></path>"#,
            s.color,
            escape_xml(&s.label)
        );
    }

    // legend
    for (i, s) in series.iter().enumerate() {
        let lx = WIDTH - PAD_RIGHT - 130.0;
        let ly = PAD_TOP + 4.0 + i as f64 * 14.0;
        let _ = write!(
            svg,
            r#"<rect x="{lx}" y="{ly}" width="10" height="3" fill="{}"/><text x="{}" y="{}" font-size="10" font-family="sans-serif">{}</text>"#,
            s.color,
            lx + 14.0,
            ly + 4.0,
            escape_xml(&s.label)
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Every chart for an analysis, in display order.
pub fn render_all(analysis: &PriceAnalysis) -> Vec<(ChartKind, String)> {
    ChartKind::ALL
        .into_iter()
        .map(|kind| (kind, render_chart(kind, analysis.series.ticker(), &analysis.indicators)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorConfig;
    use crate::domain::indicator_helpers::compute_indicators;
    use crate::domain::price::{PricePoint, PriceSeries};
    use chrono::NaiveDate;

    fn indicators(closes: &[f64]) -> IndicatorSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
            .collect();
        let config = IndicatorConfig {
            short_window: 2,
            long_window: 3,
            rsi_window: 2,
            stop_loss_window: 2,
        };
        compute_indicators(&PriceSeries::new("ACME", points), &config)
    }

    #[test]
    fn path_breaks_on_gaps() {
        let values = [Some(1.0), None, Some(2.0), Some(f64::NAN), Some(3.0), Some(4.0)];
        let d = path_data(&values, |i| i as f64, |v| v);
        assert_eq!(d, "M0.0,1.0 M2.0,2.0 M4.0,3.0 L5.0,4.0");
    }

    #[test]
    fn moving_average_chart_has_three_series() {
        let svg = render_chart(ChartKind::MovingAverages, "ACME", &indicators(&[1.0, 2.0, 3.0, 4.0]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("2-Day SMA"));
        assert!(svg.contains("3-Day SMA"));
        assert!(svg.contains("ACME Stock Price with Moving Averages"));
    }

    #[test]
    fn rsi_chart_has_reference_lines() {
        let svg = render_chart(ChartKind::Rsi, "ACME", &indicators(&[1.0, 2.0, 1.5, 3.0, 2.5]));
        assert_eq!(svg.matches(r#"class="ref""#).count(), 2);
        // 0..100 axis labels regardless of data
        assert!(svg.contains(">0.00<"));
        assert!(svg.contains(">100.00<"));
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let svg = render_chart(ChartKind::StopLoss, "ACME", &indicators(&[]));
        assert!(svg.contains("No data available."));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn title_is_escaped() {
        let svg = render_chart(ChartKind::StopLoss, "A&B", &indicators(&[1.0, 2.0]));
        assert!(svg.contains("A&amp;B Stop-Loss Levels"));
        assert!(!svg.contains("A&B"));
    }

    #[test]
    fn kind_slugs_round_trip() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::parse(kind.slug()), Some(kind));
        }
        assert_eq!(ChartKind::parse("macd"), None);
    }
}

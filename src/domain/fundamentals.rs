//! Company fundamentals in a fixed display order.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    CompanyName,
    Sector,
    Industry,
    Country,
    Revenue,
    GrossProfit,
    Ebitda,
    NetIncome,
    TrailingPe,
    ForwardPe,
    PriceToSales,
}

impl Metric {
    /// Display order for the fundamentals table.
    pub const ALL: [Metric; 11] = [
        Metric::CompanyName,
        Metric::Sector,
        Metric::Industry,
        Metric::Country,
        Metric::Revenue,
        Metric::GrossProfit,
        Metric::Ebitda,
        Metric::NetIncome,
        Metric::TrailingPe,
        Metric::ForwardPe,
        Metric::PriceToSales,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::CompanyName => "Company Name",
            Metric::Sector => "Sector",
            Metric::Industry => "Industry",
            Metric::Country => "Country",
            Metric::Revenue => "Revenue (TTM)",
            Metric::GrossProfit => "Gross Profit (TTM)",
            Metric::Ebitda => "EBITDA",
            Metric::NetIncome => "Net Income (TTM)",
            Metric::TrailingPe => "P/E Ratio (TTM)",
            Metric::ForwardPe => "Forward P/E Ratio",
            Metric::PriceToSales => "Price-to-Sales Ratio",
        }
    }

    /// Field name used by the market-data provider.
    pub fn field(self) -> &'static str {
        match self {
            Metric::CompanyName => "longName",
            Metric::Sector => "sector",
            Metric::Industry => "industry",
            Metric::Country => "country",
            Metric::Revenue => "totalRevenue",
            Metric::GrossProfit => "grossProfits",
            Metric::Ebitda => "ebitda",
            Metric::NetIncome => "netIncomeToCommon",
            Metric::TrailingPe => "trailingPE",
            Metric::ForwardPe => "forwardPE",
            Metric::PriceToSales => "priceToSalesTrailing12Months",
        }
    }

    /// Accepts either the display label or the provider field name.
    pub fn parse(name: &str) -> Option<Metric> {
        let name = name.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(name) || m.field().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Text(String),
    Number(f64),
}

impl MetricValue {
    /// Numbers when the text parses as one, text otherwise.
    pub fn parse(raw: &str) -> Option<MetricValue> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<f64>() {
            Ok(n) => MetricValue::Number(n),
            Err(_) => MetricValue::Text(raw.to_string()),
        })
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            MetricValue::Number(n) => write!(f, "{:.2}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fundamentals {
    ticker: String,
    values: Vec<(Metric, Option<MetricValue>)>,
}

impl Fundamentals {
    /// Every metric is present in the result; those missing from `values`
    /// are recorded as `None`.
    pub fn new(ticker: impl Into<String>, mut values: HashMap<Metric, MetricValue>) -> Self {
        let values = Metric::ALL
            .into_iter()
            .map(|m| (m, values.remove(&m)))
            .collect();
        Self {
            ticker: ticker.into(),
            values,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn get(&self, metric: Metric) -> Option<&MetricValue> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .and_then(|(_, v)| v.as_ref())
    }

    /// `(label, value)` rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, Option<&MetricValue>)> + '_ {
        self.values.iter().map(|(m, v)| (m.label(), v.as_ref()))
    }
}

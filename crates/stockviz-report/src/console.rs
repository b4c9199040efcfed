//! Console legend and table dump.

use rust_decimal::Decimal;
use std::io::{self, Write};
use stockviz_core::types::{EnrichedSeries, SeriesOrigin};

use crate::csv_file::{tidy, COLUMNS};

/// Meaning of each column, English with the Japanese label.
pub const LEGEND: [(&str, &str); 9] = [
    ("Date", "Trading date (日付)"),
    ("Open", "Opening price (始値)"),
    ("High", "High price (高値)"),
    ("Low", "Low price (安値)"),
    ("Close", "Closing price (終値)"),
    ("Volume", "Traded shares (出来高・株数)"),
    ("Return", "Daily change vs previous close, % (日次変化率・前日比％)"),
    ("MA5", "5-day moving average (5日移動平均)"),
    ("MA25", "25-day moving average (25日移動平均)"),
];

/// Printed in place of a missing value.
const MISSING: &str = "NaN";

/// Generate the column legend block.
pub fn legend() -> String {
    let mut s = String::new();

    s.push_str("=== Columns / 各列の意味 ===\n");
    let width = LEGEND.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, meaning) in LEGEND {
        s.push_str(&format!("{:<width$}: {}\n", name, meaning, width = width));
    }

    s
}

fn price(value: Option<Decimal>) -> String {
    value
        .map(|v| tidy(v).to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn stat(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| MISSING.to_string())
}

/// Generate the full table, one line per bar with a leading row index.
pub fn table(series: &EnrichedSeries) -> String {
    let mut s = String::new();

    let origin = match series.origin {
        SeriesOrigin::Live => String::new(),
        other => format!(" [{}]", other),
    };
    s.push_str(&format!("=== {} price data{} ===\n", series.symbol, origin));

    let rows: Vec<[String; 10]> = series
        .iter()
        .enumerate()
        .map(|(i, row)| {
            [
                i.to_string(),
                row.bar.date.to_string(),
                price(row.bar.open),
                price(row.bar.high),
                price(row.bar.low),
                price(row.bar.close),
                row.bar
                    .volume
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| MISSING.to_string()),
                stat(row.return_pct),
                stat(row.ma5),
                stat(row.ma25),
            ]
        })
        .collect();

    let mut header: [String; 10] = Default::default();
    for (slot, name) in header.iter_mut().skip(1).zip(COLUMNS) {
        *slot = name.to_string();
    }

    let mut widths = [0usize; 10];
    for line in std::iter::once(&header).chain(rows.iter()) {
        for (w, cell) in widths.iter_mut().zip(line.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    for line in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
            .collect();
        s.push_str(cells.join("  ").trim_end());
        s.push('\n');
    }

    s.push_str(&format!("\n[{} rows x {} columns]\n", series.len(), COLUMNS.len()));

    s
}

/// Print the legend and the table.
pub fn print_report<W: Write>(out: &mut W, series: &EnrichedSeries) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", legend())?;
    writeln!(out)?;
    write!(out, "{}", table(series))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use stockviz_core::types::{EnrichedBar, PriceBar, PriceSeries};

    fn series() -> EnrichedSeries {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut row = EnrichedBar::from_bar(PriceBar::new(
            day,
            dec!(3500),
            dec!(3560),
            dec!(3480),
            dec!(3540.5),
            1_234_500,
        ));
        row.ma5 = Some(dec!(3512.3));
        EnrichedSeries {
            symbol: "7203.T".to_string(),
            currency: Some("JPY".to_string()),
            origin: SeriesOrigin::Live,
            bars: vec![row],
        }
    }

    #[test]
    fn test_legend_lists_every_column() {
        let text = legend();
        for column in COLUMNS {
            assert!(text.contains(&format!("{:<6}: ", column)), "{}", column);
        }
        assert!(text.contains("終値"));
    }

    #[test]
    fn test_table_layout() {
        let text = table(&series());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=== 7203.T price data ===");
        assert!(lines[1].trim_start().starts_with("Date"));
        assert!(lines[1].ends_with("MA25"));
        assert!(lines[2].starts_with('0'));
        assert!(lines[2].contains("2024-05-01"));
        assert!(lines[2].contains("3540.5"));
        assert!(lines[2].contains("3512.30"));
        assert!(lines[2].ends_with("NaN"));
        assert!(text.contains("[1 rows x 9 columns]"));
    }

    #[test]
    fn test_table_marks_placeholder() {
        let placeholder = PriceSeries::placeholder("7203.T", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 2);
        let enriched = EnrichedSeries {
            symbol: placeholder.symbol.clone(),
            currency: None,
            origin: placeholder.origin,
            bars: placeholder.bars.into_iter().map(EnrichedBar::from_bar).collect(),
        };

        let text = table(&enriched);
        assert!(text.starts_with("=== 7203.T price data [placeholder] ==="));
        assert_eq!(text.matches("NaN").count(), 2 * 8);
    }

    #[test]
    fn test_print_report() {
        let mut out = Vec::new();
        print_report(&mut out, &series()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.find("=== Columns").unwrap() < text.find("=== 7203.T").unwrap());
    }
}

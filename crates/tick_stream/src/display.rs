//! Trend derivation and tabular tick rendering.
//!
//! Each processed tick is rendered as one grid-framed table with a header
//! row, mirroring the operator-facing output of the upstream system. The
//! trend marker compares the tick against the symbol's *pre-update* last
//! price; the caller snapshots that value before folding the tick into the
//! aggregator.

use chrono::{DateTime, Utc};
use tick_core::record::TickRecord;

const HEADERS: [&str; 6] = ["Time", "Symbol", "Price", "Trend", "Volume", "Partition:Offset"];

/// Price movement relative to the previous observation for the same symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Price rose
    Up,
    /// Price fell
    Down,
    /// Price unchanged
    Flat,
    /// First observed tick for the symbol
    New,
}

impl Trend {
    /// Derive the marker from the pre-update last price.
    pub fn from_prior(price: f64, prior_last_price: Option<f64>) -> Self {
        match prior_last_price {
            None => Trend::New,
            Some(prior) if price > prior => Trend::Up,
            Some(prior) if price < prior => Trend::Down,
            Some(_) => Trend::Flat,
        }
    }

    /// Display marker.
    pub fn marker(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
            Trend::New => "•",
        }
    }
}

/// One renderable tick row.
#[derive(Debug, Clone)]
pub struct TickRow {
    cells: [String; 6],
}

impl TickRow {
    /// Build a row from a validated record and its transport metadata.
    pub fn new(
        record: &TickRecord,
        trend: Trend,
        broker_timestamp_ms: Option<i64>,
        locator: String,
    ) -> Self {
        Self {
            cells: [
                format_time(broker_timestamp_ms),
                record.symbol.clone(),
                format!("${:.2}", record.price),
                trend.marker().to_string(),
                format_thousands(record.volume),
                locator,
            ],
        }
    }

    /// Render as a grid table with a header.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = HEADERS
            .iter()
            .zip(&self.cells)
            .map(|(h, c)| h.chars().count().max(c.chars().count()))
            .collect();

        let border = {
            let mut line = String::from("+");
            for w in &widths {
                line.push_str(&"-".repeat(w + 2));
                line.push('+');
            }
            line
        };

        let render_cells = |cells: &[&str]| {
            let mut line = String::from("|");
            for (cell, w) in cells.iter().zip(&widths) {
                let pad = w - cell.chars().count();
                line.push(' ');
                line.push_str(cell);
                line.push_str(&" ".repeat(pad + 1));
                line.push('|');
            }
            line
        };

        let header_cells: Vec<&str> = HEADERS.to_vec();
        let row_cells: Vec<&str> = self.cells.iter().map(String::as_str).collect();

        format!(
            "{border}\n{}\n{border}\n{}\n{border}",
            render_cells(&header_cells),
            render_cells(&row_cells),
        )
    }
}

/// Broker timestamp (epoch millis) as `HH:MM:SS.mmm`, `N/A` when absent.
fn format_time(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Integer with thousands separators, `1234567` → `1,234,567`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_up_down_flat() {
        assert_eq!(Trend::from_prior(101.0, Some(100.0)), Trend::Up);
        assert_eq!(Trend::from_prior(99.0, Some(100.0)), Trend::Down);
        assert_eq!(Trend::from_prior(100.0, Some(100.0)), Trend::Flat);
    }

    #[test]
    fn test_trend_first_tick_is_new_regardless_of_value() {
        assert_eq!(Trend::from_prior(0.01, None), Trend::New);
        assert_eq!(Trend::from_prior(9_999.0, None), Trend::New);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_time() {
        // 2024-01-15T09:30:00.250Z
        let ms = 1_705_311_000_250i64;
        assert_eq!(format_time(Some(ms)), "09:30:00.250");
        assert_eq!(format_time(None), "N/A");
    }

    #[test]
    fn test_row_renders_all_fields() {
        let record = TickRecord::new("AAPL", 150.25, 1_500);
        let row = TickRow::new(&record, Trend::Up, Some(1_705_311_000_250), "P1:O42".to_string());
        let rendered = row.render();

        for fragment in ["AAPL", "$150.25", "↑", "1,500", "P1:O42", "09:30:00.250"] {
            assert!(rendered.contains(fragment), "missing '{fragment}' in:\n{rendered}");
        }
        // Grid frame: border above header, between header and row, below row.
        assert_eq!(rendered.lines().filter(|l| l.starts_with('+')).count(), 3);
    }
}

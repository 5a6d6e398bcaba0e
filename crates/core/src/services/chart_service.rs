use crate::models::price::{HistoricalPoint, HistoricalSeries, RawPricePoint};
use crate::services::format::{day_of, format_day_label, round_price};

/// Turns raw backend samples into chart-ready series.
///
/// The core computes the numbers and labels; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Convert one raw `[timestamp_millis, price]` sample.
    ///
    /// Returns `None` for samples that cannot be charted: a timestamp
    /// outside chrono's range or a non-finite price.
    pub fn to_point(&self, raw: &RawPricePoint) -> Option<HistoricalPoint> {
        let price = raw.price();
        if !price.is_finite() {
            return None;
        }
        let date = day_of(raw.timestamp_millis())?;
        Some(HistoricalPoint {
            date,
            label: format_day_label(date),
            price: round_price(price),
        })
    }

    /// Convert a whole series, keeping the backend's order and dropping
    /// unchartable samples.
    pub fn build_series(&self, raw: &[RawPricePoint]) -> HistoricalSeries {
        raw.iter().filter_map(|p| self.to_point(p)).collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};

use super::asset::AssetId;
use super::price::HistoricalSeries;
use super::state::RefreshState;

/// Semantic color of a percent-change cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    Negative,
}

/// A formatted 24h change, e.g. `↑2.50%` with positive tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentChange {
    pub arrow: char,
    pub tone: Tone,
    pub text: String,
}

/// Display-ready cells for one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub name: String,
    /// Uppercased ticker.
    pub symbol: String,
    pub image: String,
    pub price: String,
    /// `None` when upstream had no 24h change figure.
    pub change: Option<PercentChange>,
    pub market_cap: String,
    pub ath: String,
}

/// Row slot for one tracked asset. Absent data is a loading
/// placeholder, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowView {
    Loading { id: AssetId },
    Ready { id: AssetId, row: PriceRow },
}

impl RowView {
    pub fn id(&self) -> &AssetId {
        match self {
            RowView::Loading { id } | RowView::Ready { id, .. } => id,
        }
    }
}

/// Chart slot for one tracked asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartView {
    Loading { id: AssetId },
    Ready { id: AssetId, series: HistoricalSeries },
}

impl ChartView {
    pub fn id(&self) -> &AssetId {
        match self {
            ChartView::Loading { id } | ChartView::Ready { id, .. } => id,
        }
    }
}

/// The price table area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableBody {
    /// First refresh has not finished yet.
    Loading,
    /// An error replaces the whole table.
    Error(String),
    Rows(Vec<RowView>),
}

/// The chart area. Same precedence as the table: error replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartBody {
    Error(String),
    Charts(Vec<ChartView>),
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Tracked ids in display order (the chip list).
    pub tracked: Vec<AssetId>,
    /// Whether chips should offer a remove button.
    pub can_remove: bool,
    pub prices: RefreshState,
    pub history: RefreshState,
    pub table: TableBody,
    pub charts: ChartBody,
}

use crate::models::price::PriceSnapshot;
use crate::models::state::{DashboardState, RefreshKind};
use crate::models::view::{ChartBody, ChartView, DashboardView, PriceRow, RowView, TableBody};
use crate::services::format::{format_optional_usd, format_percent_change, format_usd};

/// Derives the render-ready view from dashboard state. Pure: reads the
/// state, never changes it.
///
/// Precedence for each body: error message, then initial loading (table
/// only), then one slot per tracked asset in tracked order. A slot whose
/// data has not arrived yet is a loading placeholder.
pub struct ViewService;

impl ViewService {
    pub fn new() -> Self {
        Self
    }

    pub fn project(&self, state: &DashboardState) -> DashboardView {
        DashboardView {
            tracked: state.tracked().as_slice().to_vec(),
            can_remove: state.tracked().can_remove(),
            prices: state.refresh_state(RefreshKind::Prices),
            history: state.refresh_state(RefreshKind::History),
            table: self.project_table(state),
            charts: self.project_charts(state),
        }
    }

    pub fn project_table(&self, state: &DashboardState) -> TableBody {
        if let Some(message) = state.error() {
            return TableBody::Error(message.to_string());
        }
        if state.is_initial_load() {
            return TableBody::Loading;
        }
        let rows = state
            .tracked()
            .iter()
            .map(|id| match state.snapshot(id) {
                Some(snapshot) => RowView::Ready {
                    id: id.clone(),
                    row: self.project_row(snapshot),
                },
                None => RowView::Loading { id: id.clone() },
            })
            .collect();
        TableBody::Rows(rows)
    }

    pub fn project_charts(&self, state: &DashboardState) -> ChartBody {
        if let Some(message) = state.error() {
            return ChartBody::Error(message.to_string());
        }
        let charts = state
            .tracked()
            .iter()
            .map(|id| match state.series(id) {
                Some(series) => ChartView::Ready {
                    id: id.clone(),
                    series: series.clone(),
                },
                None => ChartView::Loading { id: id.clone() },
            })
            .collect();
        ChartBody::Charts(charts)
    }

    pub fn project_row(&self, snapshot: &PriceSnapshot) -> PriceRow {
        PriceRow {
            name: snapshot.name.clone(),
            symbol: snapshot.symbol.to_uppercase(),
            image: snapshot.image.clone(),
            price: format_usd(snapshot.current_price),
            change: snapshot.price_change_percentage_24h.map(format_percent_change),
            market_cap: format_optional_usd(snapshot.market_cap),
            ath: format_optional_usd(snapshot.ath),
        }
    }
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}

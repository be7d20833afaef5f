use crate::domain::portfolio::{Portfolio, Position, Trade};
use crate::domain::recommendation::{PriorityTier, Recommendation, TradeAction};
use crate::render::{escape, format_inr, format_number, format_signed_inr, Accent};
use chrono::{DateTime, NaiveDateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

pub const NO_RECOMMENDATIONS_HTML: &str = r#"<div class="col-12 text-center text-muted">
    <p>No active recommendations at the moment</p>
</div>"#;
const NO_POSITIONS_HTML: &str = r#"<p class="text-muted text-center">No active positions</p>"#;
const NO_TRADES_HTML: &str = r#"<p class="text-muted text-center">No recent trades</p>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPanel {
    pub recommendations: Vec<RecommendationCard>,
    pub positions: String,
    pub trades: String,
    pub portfolio: String,
}

impl DashboardPanel {
    pub fn recommendations_html(&self) -> String {
        if self.recommendations.is_empty() {
            return NO_RECOMMENDATIONS_HTML.to_string();
        }
        self.recommendations
            .iter()
            .map(|card| card.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCard {
    pub recommendation_id: String,
    pub priority: PriorityTier,
    pub accent: Accent,
    pub html: String,
    pub action: CardAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    ConfirmTrade { recommendation_id: String },
}

pub fn action_accent(action: TradeAction) -> Accent {
    match action {
        TradeAction::Buy => Accent::Success,
        TradeAction::Sell => Accent::Danger,
    }
}

pub fn render_dashboard(
    recommendations: &[Recommendation],
    positions: &[Position],
    trades: &[Trade],
    portfolio: &Portfolio,
) -> DashboardPanel {
    DashboardPanel {
        recommendations: recommendations.iter().map(create_recommendation_card).collect(),
        positions: render_positions(positions),
        trades: render_trades(trades),
        portfolio: render_portfolio(portfolio),
    }
}

pub fn create_recommendation_card(rec: &Recommendation) -> RecommendationCard {
    let priority = rec.priority_tier();
    let accent = action_accent(rec.action);

    let reasons: String = rec
        .reasons
        .iter()
        .map(|reason| format!("<li>{}</li>", escape(reason)))
        .collect();

    let mut levels = String::new();
    if let Some(stop_loss) = rec.stop_loss() {
        levels.push_str(&level_row("Stop Loss", stop_loss));
    }
    if let Some(target) = rec.target() {
        levels.push_str(&level_row("Target", target));
    }

    let html = format!(
        r#"<div class="col-md-6">
    <div class="card recommendation-card priority-{priority} h-100">
        <div class="card-header d-flex justify-content-between align-items-center">
            <h6 class="mb-0">{symbol}</h6>
            <span class="badge bg-{accent}">{action}</span>
        </div>
        <div class="card-body">
            <div class="mb-2">
                <small class="text-muted">Reasons:</small>
                <ul class="mb-0 small">{reasons}</ul>
            </div>
            <div class="mb-2">
                <small class="text-muted">Quantity:</small>
                <span class="ms-1">{quantity}</span>
            </div>{levels}
        </div>
        <div class="card-footer">
            <button type="submit" class="btn btn-sm btn-{accent} w-100" data-recommendation-id="{id}">
                Execute {action}
            </button>
        </div>
    </div>
</div>"#,
        priority = priority.as_str(),
        symbol = escape(&rec.symbol),
        accent = accent.as_str(),
        action = rec.action,
        quantity = rec.quantity,
        id = escape(&rec.id),
    );

    RecommendationCard {
        recommendation_id: rec.id.clone(),
        priority,
        accent,
        html,
        action: CardAction::ConfirmTrade {
            recommendation_id: rec.id.clone(),
        },
    }
}

fn level_row(label: &str, value: f64) -> String {
    format!(
        r#"
            <div class="mb-2">
                <small class="text-muted">{label}:</small>
                <span class="ms-1">{}</span>
            </div>"#,
        format_inr(value)
    )
}

pub fn render_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return NO_POSITIONS_HTML.to_string();
    }

    positions
        .iter()
        .map(|position| {
            let pnl_class = if position.pnl >= 0.0 {
                "text-success"
            } else {
                "text-danger"
            };
            format!(
                r#"<div class="position-item border-bottom py-2">
    <div class="d-flex justify-content-between align-items-center">
        <div>
            <h6 class="mb-0">{symbol}</h6>
            <small class="text-muted">Qty: {quantity}</small>
        </div>
        <div class="text-end">
            <div class="fw-bold {pnl_class}">{pnl}</div>
            <small class="text-muted">Avg: {average}</small>
        </div>
    </div>
</div>"#,
                symbol = escape(&position.symbol),
                quantity = format_number(position.quantity),
                pnl = format_signed_inr(position.pnl),
                average = format_inr(position.average_price),
            )
        })
        .collect()
}

pub fn render_trades(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return NO_TRADES_HTML.to_string();
    }

    trades
        .iter()
        .map(|trade| {
            format!(
                r#"<div class="trade-item border-bottom py-2">
    <div class="d-flex justify-content-between align-items-center">
        <div>
            <h6 class="mb-0">{symbol}</h6>
            <small class="text-muted">{when}</small>
        </div>
        <span class="badge bg-{accent}">{action}</span>
    </div>
</div>"#,
                symbol = escape(&trade.symbol),
                when = escape(&format_timestamp(&trade.timestamp)),
                accent = action_accent(trade.action).as_str(),
                action = trade.action,
            )
        })
        .collect()
}

pub fn render_portfolio(portfolio: &Portfolio) -> String {
    format!("Portfolio: {}", format_inr(portfolio.value))
}

pub fn render_trade_summary(rec: &Recommendation) -> String {
    let mut levels = String::new();
    if let Some(stop_loss) = rec.stop_loss() {
        levels.push_str(&format!(
            "\n        <li><strong>Stop Loss:</strong> {}</li>",
            format_inr(stop_loss)
        ));
    }
    if let Some(target) = rec.target() {
        levels.push_str(&format!(
            "\n        <li><strong>Target:</strong> {}</li>",
            format_inr(target)
        ));
    }

    format!(
        r#"<div class="mb-3">
    <h6>Trade Details:</h6>
    <ul class="list-unstyled">
        <li><strong>Symbol:</strong> {symbol}</li>
        <li><strong>Action:</strong> {action}</li>
        <li><strong>Quantity:</strong> {quantity}</li>
        <li><strong>Type:</strong> Market Order</li>{levels}
    </ul>
</div>
<div class="alert alert-warning">
    Please confirm that you want to execute this trade. This action cannot be undone.
</div>"#,
        symbol = escape(&rec.symbol),
        action = rec.action,
        quantity = rec.quantity,
    )
}

/// Epoch milliseconds, RFC 3339, or a naive ISO timestamp; anything else is shown as received.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(ts) = DateTime::<Utc>::from_timestamp_millis(millis) {
            return ts.format(TIMESTAMP_FORMAT).to_string();
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(TIMESTAMP_FORMAT).to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, pattern) {
            return ts.format(TIMESTAMP_FORMAT).to_string();
        }
    }

    raw.to_string()
}

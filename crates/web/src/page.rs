use smart_trader_core::render::escape;
use smart_trader_core::view::{NotificationLevel, PageBuffer};

const STYLES: &str = r#"
    body { padding: 1.5rem; }
    .priority-high { border-left: 4px solid #dc3545; }
    .priority-medium { border-left: 4px solid #ffc107; }
    .priority-low { border-left: 4px solid #6c757d; }
    .modal-backdrop-static { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.5); }
    .modal-static { display: block; }
"#;

const CHART_INIT: &str = r#"
        <script>
            (function () {
                const canvas = document.getElementById("priceChart");
                const config = document.getElementById("priceChartConfig");
                if (canvas && config && window.Chart) {
                    new Chart(canvas, JSON.parse(config.textContent));
                }
            })();
        </script>"#;

// Ids go into URL paths as a single segment.
fn path_segment(id: &str) -> String {
    escape(&urlencoding::encode(id))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <style>{STYLES}</style>
</head>
<body>
    <nav class="mb-4">
        <a href="/analyzer" class="me-3">Analyzer</a>
        <a href="/dashboard">Recommendations</a>
    </nav>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

pub fn index() -> String {
    layout(
        "Smart Trader",
        r#"<div class="container">
        <h1>Smart Trader</h1>
        <p>Analyze a single stock or review the live recommendations dashboard.</p>
    </div>"#,
    )
}

pub fn analyzer(page: &PageBuffer, symbol: Option<&str>) -> String {
    let alerts: String = page
        .take_alerts()
        .iter()
        .map(|alert| format!(r#"<div class="alert alert-info">{}</div>"#, escape(alert)))
        .collect();
    let state = page.snapshot();

    let mut body = format!(
        r#"<div class="container">
    <h1>Stock Analyzer</h1>
    {alerts}
    <form method="get" action="/analyzer/analyze" class="d-flex mb-4">
        <input id="stockSymbol" name="symbol" class="form-control me-2" placeholder="Stock symbol" value="{symbol}">
        <button type="submit" class="btn btn-primary">Analyze</button>
    </form>"#,
        symbol = escape(symbol.unwrap_or_default()),
    );

    if let Some(panel) = &state.analysis {
        body.push_str(&format!(
            r#"
    <div id="analysisResults">
        <h2 id="stockName">{name}</h2>
        <p class="fs-4" id="currentPrice">{price}</p>"#,
            name = escape(&panel.name),
            price = escape(&panel.current_price),
        ));

        // Only the live chart instance is drawn.
        if let Some((id, spec)) = state.charts.last() {
            let config = spec.to_config().to_string().replace("</", r"<\/");
            body.push_str(&format!(
                r#"
        <canvas id="priceChart" data-chart-id="{id}"></canvas>
        <script type="application/json" id="priceChartConfig">{config}</script>"#
            ));
            body.push_str(CHART_INIT);
        }

        for (id, title, html) in [
            ("technical", "Technical Analysis", &panel.technical),
            ("fundamental", "Fundamental Analysis", &panel.fundamental),
            ("sentiment", "Sentiment Analysis", &panel.sentiment),
        ] {
            if let Some(html) = html {
                body.push_str(&format!(
                    r#"
        <section class="mt-4"><h3>{title}</h3><div id="{id}">{html}</div></section>"#
                ));
            }
        }

        if let Some(signal) = &panel.signal {
            body.push_str(&format!(
                r#"
        <form method="post" action="/analyzer/trade" id="recommendation" class="mt-4">
            <label class="form-label" for="quantity">Quantity</label>
            <input id="quantity" name="quantity" type="number" min="1" step="1" value="1" class="form-control mb-3">
            {}
        </form>"#,
                signal.html
            ));
        }

        body.push_str("\n    </div>");
    }

    body.push_str("\n</div>");
    layout("Stock Analyzer", &body)
}

pub fn dashboard(page: &PageBuffer) -> String {
    let notifications: String = page
        .take_notifications()
        .iter()
        .map(|n| {
            let class = match n.level {
                NotificationLevel::Success => "success",
                NotificationLevel::Error => "danger",
            };
            format!(
                r#"<div class="alert alert-{class}">{}</div>"#,
                escape(&n.message)
            )
        })
        .collect();
    let state = page.snapshot();

    let disabled = if state.refresh_enabled { "" } else { " disabled" };
    let mut body = format!(
        r#"<div class="container">
    <div class="d-flex justify-content-between align-items-center mb-3">
        <h1>Recommendations</h1>
        <div>
            <span id="portfolio-value" class="me-3 fw-bold">{portfolio}</span>
            <form method="post" action="/dashboard/refresh" class="d-inline">
                <button id="refresh-btn" type="submit" class="btn btn-outline-primary"{disabled}>Refresh</button>
            </form>
        </div>
    </div>
    {notifications}"#,
        portfolio = state
            .dashboard
            .as_ref()
            .map(|d| escape(&d.portfolio))
            .unwrap_or_default(),
    );

    match &state.dashboard {
        Some(panel) => {
            let cards: String = if panel.recommendations.is_empty() {
                panel.recommendations_html()
            } else {
                panel
                    .recommendations
                    .iter()
                    .map(|card| {
                        format!(
                            r#"<form method="get" action="/dashboard/confirm/{}" style="display: contents">{}</form>"#,
                            path_segment(&card.recommendation_id),
                            card.html
                        )
                    })
                    .collect()
            };
            body.push_str(&format!(
                r#"
    <div class="row">
        <div class="col-lg-8">
            <div id="recommendations-container" class="row">{cards}</div>
        </div>
        <div class="col-lg-4">
            <h4>Open Positions</h4>
            <div id="positions-container">{positions}</div>
            <h4 class="mt-4">Recent Trades</h4>
            <div id="trades-container">{trades}</div>
        </div>
    </div>"#,
                positions = panel.positions,
                trades = panel.trades,
            ));
        }
        None => body.push_str(r#"<p class="text-muted">Loading...</p>"#),
    }

    if let Some(dialog) = &state.confirmation {
        body.push_str(&format!(
            r#"
    <div class="modal-backdrop-static"></div>
    <div class="modal modal-static" id="tradeModal" tabindex="-1">
        <div class="modal-dialog">
            <div class="modal-content">
                <div class="modal-header"><h5 class="modal-title">Confirm Trade</h5></div>
                <div class="modal-body">{html}</div>
                <div class="modal-footer">
                    <form method="post" action="/dashboard/dismiss">
                        <button type="submit" class="btn btn-secondary">Cancel</button>
                    </form>
                    <form method="post" action="/dashboard/confirm/{id}/execute">
                        <button id="confirm-trade-btn" type="submit" class="btn btn-primary">Confirm</button>
                    </form>
                </div>
            </div>
        </div>
    </div>"#,
            html = dialog.html,
            id = path_segment(&dialog.recommendation_id),
        ));
    }

    body.push_str("\n</div>");
    layout("Recommendations", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_trader_core::render::analysis::AnalysisPanel;
    use smart_trader_core::render::chart::ChartSpec;
    use smart_trader_core::render::dashboard::DashboardPanel;
    use smart_trader_core::view::{
        AnalyzerView, ChartSurface, ConfirmationDialog, DashboardView, Notification,
    };

    #[test]
    fn analyzer_page_drains_alerts() {
        let page = PageBuffer::new();
        page.alert("Please enter a stock symbol");

        let html = analyzer(&page, None);
        assert!(html.contains("Please enter a stock symbol"));
        assert!(!analyzer(&page, None).contains("Please enter a stock symbol"));
    }

    #[test]
    fn analyzer_page_draws_price_chart() {
        let page = PageBuffer::new();
        let chart = ChartSpec {
            title: "Price History".to_string(),
            series_label: "Price".to_string(),
            labels: vec!["2024-01-01".to_string()],
            values: vec![3500.0],
            color: "rgb(75, 192, 192)".to_string(),
        };
        page.create(&chart);
        page.show_analysis(AnalysisPanel {
            name: "Tata Consultancy".to_string(),
            current_price: "₹3500.00".to_string(),
            chart,
            technical: None,
            fundamental: None,
            sentiment: None,
            signal: None,
        });

        let html = analyzer(&page, Some("TCS"));
        assert!(html.contains("chart.umd.min.js"));
        assert!(html.contains(r#"id="priceChartConfig""#));
        assert!(html.contains("new Chart(canvas, JSON.parse(config.textContent))"));
    }

    #[test]
    fn recommendation_ids_are_encoded_as_one_path_segment() {
        let page = PageBuffer::new();
        page.open_confirmation(ConfirmationDialog {
            recommendation_id: "a/b?c#d".to_string(),
            html: String::new(),
        });

        let html = dashboard(&page);
        assert!(html.contains(r#"action="/dashboard/confirm/a%2Fb%3Fc%23d/execute""#));
    }

    #[test]
    fn dashboard_page_wires_confirmation_forms() {
        let page = PageBuffer::new();
        page.render_dashboard(DashboardPanel {
            recommendations: Vec::new(),
            positions: "<p>positions</p>".to_string(),
            trades: "<p>trades</p>".to_string(),
            portfolio: "Portfolio: ₹10.00".to_string(),
        });
        page.open_confirmation(ConfirmationDialog {
            recommendation_id: "r-1".to_string(),
            html: "<p>summary</p>".to_string(),
        });
        page.notify(Notification::success("Trade executed successfully!"));
        page.set_refresh_enabled(false);

        let html = dashboard(&page);
        assert!(html.contains("No active recommendations at the moment"));
        assert!(html.contains("Portfolio: ₹10.00"));
        assert!(html.contains(r#"action="/dashboard/confirm/r-1/execute""#));
        assert!(html.contains("alert-success"));
        assert!(html.contains(r#"class="btn btn-outline-primary" disabled"#));
    }
}

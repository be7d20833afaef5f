use crate::domain::analysis::{AnalysisResult, SentimentAnalysis, Signal, SignalKind, TechnicalAnalysis};
use crate::domain::recommendation::TradeAction;
use crate::domain::MetricList;
use crate::render::chart::ChartSpec;
use crate::render::{escape, format_inr, format_number, Accent};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPanel {
    pub name: String,
    pub current_price: String,
    pub chart: ChartSpec,
    pub technical: Option<String>,
    pub fundamental: Option<String>,
    pub sentiment: Option<String>,
    pub signal: Option<SignalPanel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalPanel {
    pub kind: SignalKind,
    pub accent: Accent,
    pub html: String,
}

pub fn render_analysis(result: &AnalysisResult) -> AnalysisPanel {
    AnalysisPanel {
        name: result.name.clone(),
        current_price: format_inr(result.current_price),
        chart: ChartSpec::price_history(&result.price_history),
        technical: result.technical.as_ref().map(render_technical),
        fundamental: result.fundamental.as_ref().map(render_fundamental),
        sentiment: result.sentiment.as_ref().map(render_sentiment),
        signal: result.recommendation.as_ref().map(render_signal),
    }
}

fn metric_cards(metrics: &MetricList) -> String {
    let mut html = String::from(r#"<div class="row">"#);
    for (label, value) in metrics.iter() {
        html.push_str(&format!(
            r#"
    <div class="col-md-4 mb-3">
        <div class="card">
            <div class="card-body">
                <h5 class="card-title">{}</h5>
                <p class="card-text">{}</p>
            </div>
        </div>
    </div>"#,
            escape(label),
            escape(value)
        ));
    }
    html.push_str("\n</div>");
    html
}

pub fn render_technical(technical: &TechnicalAnalysis) -> String {
    let mut html = metric_cards(&technical.indicators);

    if !technical.patterns.is_empty() {
        html.push_str("\n<h4 class=\"mt-4\">Patterns Detected</h4>\n<ul class=\"patterns\">");
        for pattern in &technical.patterns {
            html.push_str(&format!("<li>{}</li>", escape(pattern)));
        }
        html.push_str("</ul>");
    }

    html
}

pub fn render_fundamental(metrics: &MetricList) -> String {
    metric_cards(metrics)
}

pub fn render_sentiment(sentiment: &SentimentAnalysis) -> String {
    let news: String = sentiment
        .news
        .iter()
        .map(|item| {
            format!(
                "<li>{} - {}</li>",
                escape(&item.title),
                escape(&item.sentiment)
            )
        })
        .collect();

    format!(
        r#"<div class="row">
    <div class="col-md-6">
        <h4>Market Sentiment</h4>
        <p>Overall: {}</p>
        <p>Confidence: {}%</p>
    </div>
    <div class="col-md-6">
        <h4>Recent News</h4>
        <ul>{}</ul>
    </div>
</div>"#,
        escape(&sentiment.market_sentiment),
        format_number(sentiment.confidence),
        news
    )
}

pub fn render_signal(signal: &Signal) -> SignalPanel {
    let kind = signal.kind();
    let accent = match kind {
        SignalKind::Buy => Accent::Success,
        SignalKind::Sell => Accent::Danger,
        SignalKind::Neutral => Accent::Warning,
    };

    let html = format!(
        r#"<div class="card">
    <div class="card-body">
        <h4 class="card-title">Trading Recommendation</h4>
        <p class="card-text">Signal: <span class="text-{accent} fw-bold">{signal}</span></p>
        <p class="card-text">Confidence: {confidence}%</p>
        <p class="card-text">Reason: {reason}</p>
        <div class="mt-3">
            <button type="submit" class="btn btn-success me-2" name="action" value="{buy}">Buy</button>
            <button type="submit" class="btn btn-danger" name="action" value="{sell}">Sell</button>
        </div>
    </div>
</div>"#,
        accent = accent.as_str(),
        signal = escape(&signal.signal),
        confidence = format_number(signal.confidence),
        reason = escape(&signal.reason),
        buy = TradeAction::Buy,
        sell = TradeAction::Sell,
    );

    SignalPanel {
        kind,
        accent,
        html,
    }
}

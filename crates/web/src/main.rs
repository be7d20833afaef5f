use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use smart_trader_core::analyzer::AnalyzerController;
use smart_trader_core::client::HttpTradingApi;
use smart_trader_core::dashboard::DashboardController;
use smart_trader_core::domain::recommendation::TradeAction;
use smart_trader_core::error::{BusinessError, UserInputError};
use smart_trader_core::view::PageBuffer;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod page;

type Analyzer = AnalyzerController<HttpTradingApi, Arc<PageBuffer>, Arc<PageBuffer>>;
type Dashboard = DashboardController<HttpTradingApi, Arc<PageBuffer>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = smart_trader_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let api = HttpTradingApi::from_settings(&settings)?;
    let state = AppState::new(api);

    let auto_refresh = state
        .dashboard
        .start_auto_refresh(settings.refresh_interval)?;

    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, "web shell listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    auto_refresh.cancel();
    Ok(())
}

#[derive(Clone)]
struct AppState {
    analyzer: Arc<tokio::sync::Mutex<Analyzer>>,
    analyzer_page: Arc<PageBuffer>,
    // Copied out of the analyzer so page reads never wait on a request in flight.
    analyzed_symbol: Arc<Mutex<Option<String>>>,
    dashboard: Arc<Dashboard>,
    dashboard_page: Arc<PageBuffer>,
}

impl AppState {
    // One controller and one page per view; the views share nothing.
    fn new(api: HttpTradingApi) -> Self {
        let analyzer_page = Arc::new(PageBuffer::new());
        let dashboard_page = Arc::new(PageBuffer::new());
        Self {
            analyzer: Arc::new(tokio::sync::Mutex::new(AnalyzerController::new(
                api.clone(),
                analyzer_page.clone(),
                analyzer_page.clone(),
            ))),
            analyzer_page,
            analyzed_symbol: Arc::new(Mutex::new(None)),
            dashboard: Arc::new(DashboardController::new(api, dashboard_page.clone())),
            dashboard_page,
        }
    }

    fn analyzed_symbol(&self) -> Option<String> {
        self.analyzed_symbol
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_analyzed_symbol(&self, symbol: Option<String>) {
        *self
            .analyzed_symbol
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = symbol;
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(index))
        .route("/analyzer", get(show_analyzer))
        .route("/analyzer/analyze", get(analyze))
        .route("/analyzer/trade", post(submit_trade))
        .route("/dashboard", get(show_dashboard))
        .route("/dashboard/refresh", post(refresh))
        .route("/dashboard/confirm/:id", get(confirm_trade))
        .route("/dashboard/confirm/:id/execute", post(execute_trade))
        .route("/dashboard/dismiss", post(dismiss_confirmation))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    Html(page::index())
}

async fn show_analyzer(State(state): State<AppState>) -> Html<String> {
    let symbol = state.analyzed_symbol();
    Html(page::analyzer(&state.analyzer_page, symbol.as_deref()))
}

#[derive(Debug, Deserialize)]
struct AnalyzeQuery {
    #[serde(default)]
    symbol: String,
}

async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> Html<String> {
    let mut analyzer = state.analyzer.lock().await;
    if let Err(err) = analyzer.analyze(&query.symbol).await {
        report(&err);
    }
    let analyzed = analyzer.analyzed_symbol().map(str::to_string);
    drop(analyzer);
    state.set_analyzed_symbol(analyzed.clone());

    let symbol = analyzed.unwrap_or(query.symbol);
    Html(page::analyzer(&state.analyzer_page, Some(&symbol)))
}

#[derive(Debug, Deserialize)]
struct TradeForm {
    action: String,
    #[serde(default)]
    quantity: String,
}

async fn submit_trade(
    State(state): State<AppState>,
    Form(form): Form<TradeForm>,
) -> Result<Redirect, StatusCode> {
    let action = form
        .action
        .parse::<TradeAction>()
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let analyzer = state.analyzer.lock().await;
    if let Err(err) = analyzer.submit_trade(action, &form.quantity).await {
        report(&err);
    }

    Ok(Redirect::to("/analyzer"))
}

async fn show_dashboard(State(state): State<AppState>) -> Html<String> {
    Html(page::dashboard(&state.dashboard_page))
}

async fn refresh(State(state): State<AppState>) -> Redirect {
    if let Err(err) = state.dashboard.refresh().await {
        report(&err);
    }
    Redirect::to("/dashboard")
}

async fn confirm_trade(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    state.dashboard.confirm_trade(&id);
    Redirect::to("/dashboard")
}

async fn execute_trade(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    match state.dashboard.execute_trade(&id).await {
        Ok(outcome) => tracing::info!(recommendation_id = %id, ?outcome, "execute request handled"),
        Err(err) => report(&err),
    }
    Redirect::to("/dashboard")
}

async fn dismiss_confirmation(State(state): State<AppState>) -> Redirect {
    state.dashboard.dismiss_confirmation();
    Redirect::to("/dashboard")
}

fn report(err: &anyhow::Error) {
    if err.downcast_ref::<UserInputError>().is_some() {
        tracing::debug!(error = %err, "request rejected before dispatch");
    } else if err.downcast_ref::<BusinessError>().is_some() {
        tracing::info!(error = %err, "backend refused request");
    } else {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %format!("{err:#}"), "request failed");
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &smart_trader_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::Json;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn app_with_backend(backend: Router) -> (Router, AppState) {
        let base_url = spawn_backend(backend).await;
        let api = HttpTradingApi::new(reqwest::Client::new(), &base_url).unwrap();
        let state = AppState::new(api);
        (router(state.clone()), state)
    }

    fn dashboard_backend() -> Router {
        Router::new()
            .route(
                "/api/recommendations",
                get(|| async {
                    Json(json!([{
                        "id": "r/1",
                        "symbol": "INFY",
                        "action": "BUY",
                        "reasons": ["Breakout"],
                        "quantity": 3,
                        "priority": 4,
                    }]))
                }),
            )
            .route("/api/positions", get(|| async { Json(json!([])) }))
            .route("/api/recent-trades", get(|| async { Json(json!([])) }))
            .route("/api/portfolio", get(|| async { Json(json!({"value": 5000})) }))
            .route(
                "/api/execute-trade",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["recommendation_id"], "r/1");
                    Json(json!({"status": "success"}))
                }),
            )
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, String, String) {
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn confirm_then_execute_redirects_back_to_dashboard() {
        let (app, _state) = app_with_backend(dashboard_backend()).await;

        let (status, location, _) = send(&app, "POST", "/dashboard/refresh").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/dashboard");

        let (_, _, html) = send(&app, "GET", "/dashboard").await;
        assert!(html.contains(r#"action="/dashboard/confirm/r%2F1""#));

        let (status, location, _) = send(&app, "GET", "/dashboard/confirm/r%2F1").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/dashboard");
        let (_, _, html) = send(&app, "GET", "/dashboard").await;
        assert!(html.contains(r#"action="/dashboard/confirm/r%2F1/execute""#));

        let (status, location, _) = send(&app, "POST", "/dashboard/confirm/r%2F1/execute").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/dashboard");

        let (_, _, html) = send(&app, "GET", "/dashboard").await;
        assert!(html.contains("Trade executed successfully!"));
        assert!(!html.contains(r#"id="tradeModal""#));
    }

    #[tokio::test]
    async fn analyzer_page_is_served_while_analysis_is_in_flight() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let backend = Router::new().route(
            "/api/analyze/:symbol",
            get({
                let gate = gate.clone();
                move || {
                    let gate = gate.clone();
                    async move {
                        gate.notified().await;
                        Json(json!({
                            "name": "Infosys",
                            "current_price": 1500,
                            "price_history": {"dates": ["2024-01-01"], "prices": [1500]},
                        }))
                    }
                }
            }),
        );
        let (app, state) = app_with_backend(backend).await;

        let analyze = tokio::spawn({
            let app = app.clone();
            async move { send(&app, "GET", "/analyzer/analyze?symbol=INFY").await }
        });
        while state.analyzer.try_lock().is_ok() {
            tokio::task::yield_now().await;
        }

        let page = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            send(&app, "GET", "/analyzer"),
        )
        .await
        .expect("analyzer page blocked behind analysis");
        assert_eq!(page.0, StatusCode::OK);

        gate.notify_one();
        let (status, _, html) = analyze.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Infosys"));
        assert_eq!(state.analyzed_symbol().as_deref(), Some("INFY"));
    }

    #[tokio::test]
    async fn unknown_trade_action_is_bad_request() {
        let (app, _state) = app_with_backend(Router::new()).await;

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyzer/trade")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("action=HOLD&quantity=1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

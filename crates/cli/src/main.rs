use anyhow::Context;
use clap::{Parser, Subcommand};
use smart_trader_core::analyzer::AnalyzerController;
use smart_trader_core::client::HttpTradingApi;
use smart_trader_core::dashboard::{DashboardController, ExecuteOutcome};
use smart_trader_core::domain::recommendation::TradeAction;
use smart_trader_core::error::{BusinessError, UserInputError};
use smart_trader_core::view::{NotificationLevel, PageBuffer};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod text;

#[derive(Debug, Parser)]
#[command(name = "smart_trader")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a stock and print the results panel.
    Analyze { symbol: String },

    /// Analyze a stock, then place a market order for it.
    Trade {
        symbol: String,
        #[arg(long)]
        action: TradeAction,
        #[arg(long, default_value = "1")]
        quantity: String,
    },

    /// Print recommendations, positions, recent trades and portfolio value.
    Dashboard,

    /// Execute a recommendation after showing its trade summary.
    Execute {
        recommendation_id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = smart_trader_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let api = HttpTradingApi::from_settings(&settings)?;

    let res = match args.command {
        Command::Analyze { symbol } => analyze(api, &symbol).await,
        Command::Trade {
            symbol,
            action,
            quantity,
        } => trade(api, &symbol, action, &quantity).await,
        Command::Dashboard => dashboard(api).await,
        Command::Execute {
            recommendation_id,
            yes,
        } => execute(api, &recommendation_id, yes).await,
    };

    if let Err(err) = &res {
        let expected = err.downcast_ref::<UserInputError>().is_some()
            || err.downcast_ref::<BusinessError>().is_some();
        if !expected {
            sentry_anyhow::capture_anyhow(err);
        }
    }
    res
}

async fn analyze(api: HttpTradingApi, symbol: &str) -> anyhow::Result<()> {
    let page = Arc::new(PageBuffer::new());
    let mut analyzer = AnalyzerController::new(api, page.clone(), page.clone());

    let res = analyzer.analyze(symbol).await;
    print_analysis(&page);
    res
}

async fn trade(
    api: HttpTradingApi,
    symbol: &str,
    action: TradeAction,
    quantity: &str,
) -> anyhow::Result<()> {
    let page = Arc::new(PageBuffer::new());
    let mut analyzer = AnalyzerController::new(api, page.clone(), page.clone());

    if let Err(err) = analyzer.analyze(symbol).await {
        print_analysis(&page);
        return Err(err);
    }
    let res = analyzer.submit_trade(action, quantity).await;
    print_analysis(&page);
    res
}

async fn dashboard(api: HttpTradingApi) -> anyhow::Result<()> {
    let page = Arc::new(PageBuffer::new());
    let controller = DashboardController::new(api, page.clone());

    let res = controller.refresh().await.map(|_| ());
    print_dashboard(&page);
    res
}

async fn execute(api: HttpTradingApi, recommendation_id: &str, yes: bool) -> anyhow::Result<()> {
    let page = Arc::new(PageBuffer::new());
    let controller = DashboardController::new(api, page.clone());

    if let Err(err) = controller.refresh().await {
        print_notifications(&page);
        return Err(err);
    }

    anyhow::ensure!(
        controller.confirm_trade(recommendation_id),
        "no active recommendation with id {recommendation_id}"
    );

    if let Some(dialog) = page.snapshot().confirmation {
        println!("{}", text::plain(&dialog.html));
    }

    if !yes && !prompt_yes("Execute this trade?")? {
        controller.dismiss_confirmation();
        println!("Cancelled.");
        return Ok(());
    }

    let res = controller.execute_trade(recommendation_id).await;
    print_notifications(&page);
    match res? {
        ExecuteOutcome::Executed => {
            print_dashboard(&page);
            Ok(())
        }
        outcome => anyhow::bail!("trade was not executed: {outcome:?}"),
    }
}

fn print_analysis(page: &PageBuffer) {
    for alert in page.take_alerts() {
        println!("{alert}");
    }

    let Some(panel) = page.snapshot().analysis else {
        return;
    };

    println!("{} {}", panel.name, panel.current_price);
    if let (Some(first), Some(last)) = (panel.chart.labels.first(), panel.chart.labels.last()) {
        println!("{}: {} points, {first} to {last}", panel.chart.title, panel.chart.values.len());
    }
    for (title, section) in [
        ("Technical Analysis", &panel.technical),
        ("Fundamental Analysis", &panel.fundamental),
        ("Sentiment Analysis", &panel.sentiment),
    ] {
        if let Some(html) = section {
            println!("\n== {title} ==\n{}", text::plain(html));
        }
    }
    if let Some(signal) = &panel.signal {
        println!("\n== Recommendation ==\n{}", text::plain(&signal.html));
    }
}

fn print_dashboard(page: &PageBuffer) {
    print_notifications(page);

    let Some(panel) = page.snapshot().dashboard else {
        return;
    };

    println!("{}", panel.portfolio);
    println!("\n== Recommendations ==");
    if panel.recommendations.is_empty() {
        println!("{}", text::plain(&panel.recommendations_html()));
    }
    for card in &panel.recommendations {
        println!(
            "[{}] {}\n",
            card.recommendation_id,
            text::plain(&card.html).replace('\n', " | ")
        );
    }
    println!("\n== Open Positions ==\n{}", text::plain(&panel.positions));
    println!("\n== Recent Trades ==\n{}", text::plain(&panel.trades));
}

fn print_notifications(page: &PageBuffer) {
    for n in page.take_notifications() {
        match n.level {
            NotificationLevel::Success => println!("{}", n.message),
            NotificationLevel::Error => eprintln!("{}", n.message),
        }
    }
}

fn prompt_yes(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush().context("flush stdout failed")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("read confirmation failed")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
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

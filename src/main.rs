use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devcard::aggregator::StatsAggregator;
use devcard::config::Config;
use devcard::render::{self, svg::Theme};
use devcard::server::{self, AppState};
use devcard::views::ViewCounter;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "devcard", version, about = "Developer stats cards from GitHub activity")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "DEVCARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the cards over HTTP
    Serve {
        /// Address to bind, overrides `listen` from the config
        #[arg(long)]
        listen: Option<String>,
    },
    /// Fetch once and write every markup variant to disk
    Render {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Screenshot a running card page to PNG
    #[cfg(feature = "browser")]
    Screenshot {
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
        #[arg(long, default_value = "github-stats.png")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    devcard::logging::init(&config.logging);

    match cli.command {
        Command::Serve { listen } => serve(config, listen).await,
        Command::Render { out_dir } => render_files(&config, &out_dir).await,
        #[cfg(feature = "browser")]
        Command::Screenshot { url, out } => screenshot(&config, url, out).await,
    }
}

async fn serve(config: Config, listen: Option<String>) -> Result<()> {
    let addr = listen.unwrap_or_else(|| config.listen.clone());
    let image = render::image_renderer(&config.image)?;
    let state = Arc::new(AppState {
        username: config.username.clone(),
        aggregator: StatsAggregator::new(&config)?,
        image,
        views: ViewCounter::new(),
    });

    tracing::info!(
        username = %state.username,
        image_backend = state.image.name(),
        "View counter starts at 0 and is not persisted"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")?;
    Ok(())
}

async fn render_files(config: &Config, out_dir: &std::path::Path) -> Result<()> {
    let aggregator = StatsAggregator::new(config)?;
    let outcome = aggregator.fetch(&config.username).await;
    if let Some(reason) = outcome.reason() {
        tracing::warn!(reason, "Stats are degraded");
    }
    let stats = outcome.into_record();

    fs::create_dir_all(out_dir)?;
    let files = [
        ("dark_mode.svg", render::svg::render(&stats, Theme::Dark)),
        ("light_mode.svg", render::svg::render(&stats, Theme::Light)),
        ("stats-card.svg", render::layout::stats_card(&stats).to_svg()),
        ("stats.html", render::html::render_page(&stats)),
    ];
    for (name, contents) in files {
        let path = out_dir.join(name);
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("Generated dark_mode.svg, light_mode.svg, stats-card.svg and stats.html in {}", out_dir.display());
    Ok(())
}

#[cfg(feature = "browser")]
async fn screenshot(config: &Config, url: String, out: PathBuf) -> Result<()> {
    use devcard::render::browser::BrowserCapture;

    // Standalone captures get more patience than request-time ones.
    let mut image = config.image.clone();
    image.navigate_timeout_secs = 30;
    image.selector_timeout_secs = 10;
    image.settle_millis = 2000;

    let capture = BrowserCapture::new(image);
    let png = tokio::task::spawn_blocking(move || capture.capture_url(&url)).await??;
    fs::write(&out, png).with_context(|| format!("Failed to write {}", out.display()))?;

    println!("Screenshot saved to {}", out.display());
    Ok(())
}

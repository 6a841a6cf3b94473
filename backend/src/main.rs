use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_appender::non_blocking::WorkerGuard;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use request_locale::config::LoggingConfig;
use request_locale::services::TemplateDirRenderer;
use request_locale::{Config, LocalizationPlugin, build_router};

#[derive(Parser, Debug)]
#[command(name = "request-locale", version, about = "Locale-aware HTTP service")]
struct Args {
    /// Path to config.toml (defaults to conf/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override server.host
    #[arg(long)]
    host: Option<String>,

    /// Override server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // The configured subscriber needs the config, so loading logs to the console
    let mut config = load_config(startup_subscriber(), args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _log_guard = init_logging(&config.logging)?;

    tracing::info!("Starting request-locale v{}", env!("CARGO_PKG_VERSION"));

    let renderer = Arc::new(TemplateDirRenderer::new(&config.views.directory));
    let plugin = LocalizationPlugin::new(&config.i18n, renderer)?;

    let app = build_router(plugin).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Console-only subscriber used until the configured one is installed
fn startup_subscriber() -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LoggingConfig::default().level));
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

fn load_config<S>(subscriber: S, path: Option<&str>) -> anyhow::Result<Config>
where
    S: Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::with_default(subscriber, || Config::load(path))
}

/// Console logging plus an optional daily-rolling log file
fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    let Some(file) = &config.file else {
        registry.init();
        return Ok(None);
    };

    let path = Path::new(file);
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name().unwrap_or("request-locale.log".as_ref());

    let appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry.with(fmt::layer().with_writer(writer).with_ansi(false)).init();

    Ok(Some(guard))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

pub mod api;
pub mod cli;
pub mod clients;
pub mod collection;
pub mod config;
pub mod crypto;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::commands::{
    IngestArgs, cmd_delete_workflow, cmd_ingest, cmd_init, cmd_list_workflows, cmd_register,
    cmd_set_key, cmd_toggle_favorite,
};
use cli::{Cli, Commands};
use collection::{ClientSettings, WorkflowFilter};
pub use config::Config;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    init_tracing(&config)?;

    let settings_path = cli.settings.unwrap_or_else(ClientSettings::default_path);
    let settings = ClientSettings::load_from_path(&settings_path)?;

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve => run_server(config, prometheus_handle).await,
        Commands::Init => cmd_init(),
        Commands::Register { username, password } => {
            cmd_register(&config, &username, password).await
        }
        Commands::SetKey {
            provider,
            key,
            user,
        } => cmd_set_key(&config, &user, provider.into(), &key).await,
        Commands::Ingest {
            file,
            user,
            provider,
            language,
            model,
        } => {
            let args = IngestArgs {
                file: &file,
                username: &user,
                provider: provider.map(Into::into),
                language: language.as_deref(),
                model,
            };
            cmd_ingest(&config, &settings, args).await
        }
        Commands::List {
            user,
            search,
            tag,
            sort,
            favorites,
        } => {
            let criteria = WorkflowFilter {
                folder_tag: tag,
                search,
                favorites_only: favorites,
                favorites: Vec::new(),
            };
            cmd_list_workflows(&config, &settings, &user, criteria, sort.into()).await
        }
        Commands::Favorite { id } => cmd_toggle_favorite(&settings_path, id),
        Commands::Delete { id, user } => {
            cmd_delete_workflow(&config, &settings_path, &user, id).await
        }
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "flowhub")?
            .extra_field("env", "production")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("flowhub v{} starting...", env!("CARGO_PKG_VERSION"));

    if !config.server.enabled {
        anyhow::bail!("server.enabled is false in config.toml");
    }

    let port = config.server.port;
    let shared = Arc::new(SharedState::new(config).await?);
    let api_state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(api_state).await;

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

// src/main.rs

use portfolio_config::{
    cli::{Cli, Commands},
    config::ConfigValidator,
    server, setup_configuration, show, validate_document, AppError, ConfigStore,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = ?e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!(signal = "Ctrl+C", "Received signal. Initiating graceful shutdown...") },
        () = terminate => { info!(signal = "Terminate", "Received signal. Initiating graceful shutdown...") },
    }
}

fn init_tracing(json_logs: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse_args();
    init_tracing(cli.json_logs);

    let mut config = setup_configuration(cli.config)?;

    match cli.command {
        Commands::Show { section, url } => {
            if let Some(url) = url {
                config.source.base_url = url;
                ConfigValidator::validate(&config)?;
            }
            let store = ConfigStore::from_source(&config.source)?;
            let value = show(&store, section).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Validate { file } => {
            let counts = validate_document(&file)?;
            println!("{} is a valid portfolio config", file.display());
            for (section, count) in counts {
                println!("  {section:<15} {count}");
            }
        }
        Commands::Serve { document, port } => {
            if let Some(document) = document {
                config.server.document_path = document.display().to_string();
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            ConfigValidator::validate(&config)?;
            server::run_server(&config.server, shutdown_signal()).await?;
        }
    }

    Ok(())
}

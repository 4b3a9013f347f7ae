//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_estimate, output_quote};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::{info, warn};
use washquote_app::{Config, EstimateService};
use washquote_server::{build_router, AppState};
use washquote_types::{
    Error, EstimateRequest, ImagePayload, OutputFormat, Result, ServiceType, DEFAULT_MEDIA_TYPE,
};

pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            cmd_serve(&config).await
        }

        Commands::Estimate { images, service } => {
            cmd_estimate(&config, images, &service, output_format).await
        }

        Commands::Quote {
            area,
            complexity,
            service,
        } => cmd_quote(&config, area, complexity, &service, output_format),

        Commands::Config => {
            println!("{}", config);
            Ok(())
        }
    }
}

async fn cmd_serve(config: &Config) -> Result<()> {
    let service = EstimateService::from_config(config)?;
    if !service.has_backend() {
        warn!("OPENAI_API_KEY is not set; estimate requests will fail until it is configured");
    }

    let router = build_router(AppState::new(service), config.max_upload_bytes);
    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(
        address = %listener.local_addr()?,
        model = %config.model,
        "washquote listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn cmd_estimate(
    config: &Config,
    paths: Vec<PathBuf>,
    service: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let service_type = ServiceType::parse(service);
    let estimator = EstimateService::from_config(config)?;

    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        if !path.is_file() {
            return Err(Error::Validation(format!(
                "Image not found: {}",
                path.display()
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        images.push(ImagePayload::new(bytes, Some(media_type_for(path).to_string())));
    }

    let response = estimator
        .estimate(EstimateRequest::new(service_type, images))
        .await?;
    output_estimate(output_format, &response)
}

fn cmd_quote(
    config: &Config,
    area: f64,
    complexity: f64,
    service: &str,
    output_format: OutputFormat,
) -> Result<()> {
    if !area.is_finite() || !complexity.is_finite() {
        return Err(Error::Validation(
            "Area and complexity must be finite numbers".to_string(),
        ));
    }

    let service_type = ServiceType::parse(service);
    let estimator = EstimateService::from_config(config)?;
    let quote = estimator.quote(&service_type, area, complexity);

    output_quote(
        output_format,
        &service_type,
        area.max(0.0),
        washquote_domain::clamp_complexity(complexity),
        &quote,
    )
}

/// Media type from the file extension, JPEG when unrecognized
fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => DEFAULT_MEDIA_TYPE,
    }
}

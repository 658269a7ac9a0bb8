// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{process, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use auditlogs::config::{is_valid_log_level, EnvFile, DEFAULT_LOG_LEVEL};
use auditlogs::{s3::S3Store, Config, Harvester, RenderClient};

/// Filter directives for `log_level`. Unknown levels fall back to the default
/// so startup errors are still printed.
fn filter_directives(log_level: &str) -> String {
    let level = if is_valid_log_level(log_level) {
        log_level
    } else {
        DEFAULT_LOG_LEVEL
    };
    format!("h2=off,hyper=off,rustls=off,{level}")
}

#[tokio::main]
pub async fn main() {
    let env_file = Config::load_env_file();
    let config = Config::from_env();

    let log_level = config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str());
    let env_filter = EnvFilter::try_new(filter_directives(log_level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(DEFAULT_LOG_LEVEL)));

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    debug!("Logging subsystem enabled");
    match env_file {
        EnvFile::Loaded(path) => debug!("Loaded environment from {}", path.display()),
        EnvFile::NotLoaded(e) => debug!("No .env file loaded: {e}"),
        EnvFile::Skipped => debug!("LOCAL=false, not loading .env"),
    }

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Error loading config: {e}");
            process::exit(1);
        }
    };
    debug!("Loaded config: {config:?}");

    let source = match RenderClient::new(&config.render_api_base_url, &config.render_api_key) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Error creating Render API client: {e}");
            process::exit(1);
        }
    };
    let store = Arc::new(S3Store::from_config(&config.s3).await);

    let harvester = Harvester::new(source, store.clone(), store, config.max_concurrency);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, cancelling in-flight harvests");
                shutdown.cancel();
            }
            Err(e) => error!("Unable to listen for shutdown signal: {e}"),
        }
    });

    let targets = config.targets();
    info!("Harvesting audit logs for {} identities", targets.len());

    let reports = harvester.run(targets, &cancel).await;
    let failed = reports.iter().filter(|report| report.result.is_err()).count();
    if failed > 0 {
        warn!("{failed} of {} identities failed", reports.len());
    }

    info!("Audit log harvest finished");
}

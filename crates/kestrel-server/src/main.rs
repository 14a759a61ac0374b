// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Kestrel error catcher server binary.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kestrel_server::{config, create_router, AppState};
use kestrel_server_catcher::{
	DispatchOrchestrator, EventComposer, HttpArtifactFetcher, LogNotifier, MemoryEventStore,
	MemoryProjectStore, SourceResolver,
};

/// Kestrel server - error report ingestion and enrichment.
#[derive(Parser, Debug)]
#[command(name = "kestrel-server", about = "Kestrel error catcher server", version)]
struct Args {
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("kestrel-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let config = config::ServerConfig::load_from_env()?;

	let projects = match &config.projects_file {
		Some(path) => config::load_projects(path)?,
		None => Vec::new(),
	};
	if projects.is_empty() {
		tracing::warn!("no projects configured; every report will be rejected");
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		projects = projects.len(),
		fetch_timeout_secs = config.fetch.timeout_secs,
		"starting kestrel-server"
	);

	let fetcher = Arc::new(HttpArtifactFetcher::new(Duration::from_secs(
		config.fetch.timeout_secs,
	)));
	let resolver = Arc::new(SourceResolver::new(fetcher));
	let dispatcher = Arc::new(DispatchOrchestrator::new(
		Arc::new(MemoryProjectStore::new(projects)),
		Arc::new(MemoryEventStore::new()),
		Arc::new(LogNotifier),
		EventComposer::new(resolver),
	));

	let app = create_router(AppState::new(dispatcher))
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("received shutdown signal");
		}
	}

	tracing::info!("server shutdown complete");
	Ok(())
}

// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use agentmesh_core::{Engine, EngineConfig};
use agentmesh_mcp::{build_mcp_registry, serve_stdio, DEFAULT_TOOL_NAMES};
use agentmesh_store::RedisBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = agentmesh_config::load()?;
    init_logging(&config, cli.verbose);

    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Completions { shell } => {
                cli::print_completions(*shell);
                return Ok(());
            }
            Commands::ShowConfig => {
                print_config(&config);
                return Ok(());
            }
            Commands::ListTools => {
                for name in DEFAULT_TOOL_NAMES {
                    println!("{name}");
                }
                return Ok(());
            }
            Commands::Serve { tools } => {
                return run_server(config, tools).await;
            }
        }
    }

    run_server(config, &cli.tools).await
}

async fn run_server(config: agentmesh_config::Config, tools: &str) -> anyhow::Result<()> {
    tracing::info!(redis_url = %config.redis_url, "connecting to store");
    let store = RedisBackend::connect(&config.redis_url).await?;

    let engine = Arc::new(Engine::new(
        Arc::new(store),
        EngineConfig {
            heartbeat_ttl_secs: config.heartbeat_timeout_secs,
            lock_ttl_secs: config.lock_ttl_secs,
            completion_dir: config.completion_dir.clone(),
            ..EngineConfig::default()
        },
    ));

    let registry = Arc::new(build_mcp_registry(engine.clone(), Some(tools)));

    let reaper_engine = engine.clone();
    let reaper = tokio::spawn(async move {
        reaper_engine
            .run_reaper(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await;
    });

    tracing::info!("serving MCP tool surface on stdio");
    let result = serve_stdio(registry).await;

    reaper.abort();
    result
}

fn print_config(config: &agentmesh_config::Config) {
    println!("redis_url = {}", config.redis_url);
    println!("heartbeat_timeout_secs = {}", config.heartbeat_timeout_secs);
    println!("lock_ttl_secs = {}", config.lock_ttl_secs);
    println!("completion_dir = {}", config.completion_dir.display());
    println!("log_filter = {}", config.log_filter);
}

fn init_logging(config: &agentmesh_config::Config, verbosity: u8) {
    // stdio carries the MCP protocol, so all logging must go to stderr —
    // writing to stdout would corrupt the JSON-RPC stream.
    let level = match verbosity {
        0 => config.log_filter.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

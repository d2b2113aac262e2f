use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings_from, normalize_base_url, DEFAULT_CONFIG_PATH},
    HttpResourceClient, Session,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::{RecvError, TryRecvError},
};
use tracing_subscriber::EnvFilter;

mod commands;
mod dispatch;
mod render;

use dispatch::Outcome;

#[derive(Parser, Debug)]
#[command(about = "Browse users, their posts and post comments")]
struct Args {
    /// Overrides the configured API base url.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

async fn redraw(session: &Session) {
    println!("{}", render::render(&session.snapshot().await));
}

/// Redraws after every burst of session events.
fn spawn_renderer(session: Arc<Session>) {
    let mut events = session.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    while let Ok(_) | Err(TryRecvError::Lagged(_)) = events.try_recv() {}
                    redraw(&session).await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings_from(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    if let Some(url) = args.api_url {
        settings.api_base_url = normalize_base_url(&url)?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(api_base_url = %settings.api_base_url, "starting posts browser");

    let client = HttpResourceClient::from_settings(&settings)?;
    let session = Session::new(Arc::new(client));
    spawn_renderer(Arc::clone(&session));

    {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.load_users().await });
    }

    println!("{}", commands::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let cmd = match commands::parse(&line) {
            Ok(cmd) => cmd,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match dispatch::dispatch(&session, cmd).await {
            Outcome::Continue => {}
            Outcome::Notice(text) => println!("{text}"),
            Outcome::Redraw => redraw(&session).await,
            Outcome::Quit => break,
        }
    }
    Ok(())
}

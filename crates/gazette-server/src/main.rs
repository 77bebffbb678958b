//! # gazette-server
//!
//! HTTP server for the Gazette blogging platform.
//!
//! This binary provides:
//! - The **page routes**: post index, group pages, profiles, single posts
//!   and the aggregated follow feed
//! - **Write routes** for publishing, editing, deleting, commenting,
//!   following and unfollowing
//! - A **background notifier** that mails an author's followers when a
//!   post is published, off the request path
//! - A thin **session shim** adapting the external identity provider,
//!   including logout-time tracking

mod api;
mod auth;
mod config;
mod error;

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gazette_domain::logout::LogoutTracker;
use gazette_domain::mailer::TracingMailer;
use gazette_domain::{NotificationDispatcher, PostCreated};
use gazette_store::Database;

use crate::api::AppState;
use crate::auth::Sessions;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gazette_server=debug")),
        )
        .init();

    info!("Starting Gazette server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------
    let db = match &config.db_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    let db = Arc::new(Mutex::new(db));

    let sessions = Sessions::new();
    let logout_tracker = LogoutTracker::new(config.logout_clock_offset_hours);
    let dispatcher = NotificationDispatcher::new(
        Arc::new(TracingMailer),
        config.mail_from.clone(),
    );

    // -----------------------------------------------------------------------
    // 4. Spawn the background notifier
    // -----------------------------------------------------------------------
    // Post-creation events arrive on this channel; delivery failures are
    // retried once inside the dispatcher and logged here, never bubbled
    // back into the request that created the post.
    let (events, mut event_rx) = mpsc::channel::<PostCreated>(256);

    let notifier_db = db.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let result = match notifier_db.lock() {
                Ok(db) => dispatcher.dispatch(&db, event),
                Err(_) => {
                    tracing::error!("database lock poisoned, notifier stopping");
                    return;
                }
            };
            if let Err(e) = result {
                tracing::error!(
                    error = %e,
                    post = %event.post_id,
                    "notification delivery failed"
                );
            }
        }
    });

    let http_addr = config.http_addr;
    let app_state = AppState {
        db,
        sessions,
        config: Arc::new(config),
        logout_tracker,
        events,
    };

    // -----------------------------------------------------------------------
    // 5. Run the HTTP server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

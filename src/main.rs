// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::{DashboardService, Installation};
use crate::infrastructure::config::load_installations_config;
use crate::infrastructure::ha_repository::HomeAssistantRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, health_check, list_dashboards, list_installations,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_installations_config()?;

    // Wire one repository per installation (infrastructure layer)
    let mut installations = Vec::with_capacity(config.installations.len());
    for install in &config.installations {
        let repository = Arc::new(HomeAssistantRepository::new(
            &install.url,
            install.access_token(),
        )?);
        installations.push((
            install.id.clone(),
            Installation {
                entities: install.entities.clone(),
                repository,
            },
        ));
    }

    // Create service (application layer)
    let dashboard_service = DashboardService::new(installations);

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/installations", get(list_installations))
        .route("/dashboards", get(list_dashboards))
        .route("/dashboards/:id", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    println!("Starting energy-recap service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

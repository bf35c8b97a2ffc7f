mod command;
mod config;
mod db;
mod errors;
mod metrics;
mod model;
mod mqtt;
mod rest;
mod validate;

use axum::{routing::get, Router};
use config::Config;
use mqtt::MqttPublisher;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting gesture bridge");
    info!("MQTT broker: {}:{}", config.mqtt_broker, config.mqtt_port);
    info!("MQTT topic: {}", config.mqtt_topic);
    info!("HTTP server: {}", config.http_addr);
    info!("Database: {}", config.database_url);

    if let Err(e) = metrics::init_metrics() {
        warn!("Failed to register metrics: {}", e);
    }

    let pool = match db::make_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Invalid database URL {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };

    // Serve even if the schema step fails; storage errors are reported per request.
    if let Err(e) = db::migrate(&pool).await {
        error!("Failed to initialize database schema: {}", e);
    }

    let client_id = format!("bridge-{}", uuid::Uuid::new_v4());
    let (publisher, eventloop) = MqttPublisher::new(
        &config.mqtt_broker,
        config.mqtt_port,
        client_id,
        config.mqtt_keep_alive,
    );
    let mqtt_handle = tokio::spawn(mqtt::run_event_loop(
        eventloop,
        config.mqtt_broker.clone(),
        config.mqtt_port,
    ));

    // Build HTTP app with REST API and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(pool, Arc::new(publisher), &config.mqtt_topic));

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = mqtt_handle => {
            error!("MQTT task terminated");
        }
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

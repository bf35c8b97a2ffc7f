mod command;
mod telemetry;

use clap::Parser;
use command::DeviceCommand;
use rand::Rng;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use telemetry::SensorSample;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Stands in for the embedded device: obeys commands from MQTT and pushes
/// telemetry to the bridge over HTTP.
#[derive(Debug, Parser)]
#[command(name = "simulator", version)]
struct Args {
    #[arg(long, env = "MQTT_BROKER", default_value = "broker.hivemq.com")]
    broker: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    port: u16,

    #[arg(long, env = "MQTT_TOPIC", default_value = "esp32/commands")]
    topic: String,

    /// Base URL of the bridge HTTP API
    #[arg(long, env = "BRIDGE_URL", default_value = "http://localhost:5000")]
    bridge_url: String,

    /// Milliseconds between telemetry posts
    #[arg(long, env = "TELEMETRY_INTERVAL_MS", default_value_t = 2000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting device simulator");
    info!(
        "Broker: {}:{}, topic: {}, bridge: {}, interval: {}ms",
        args.broker, args.port, args.topic, args.bridge_url, args.interval_ms
    );

    let client_id = format!("sim-{}", rand::thread_rng().gen::<u32>());
    let mut mqtt_options = MqttOptions::new(&client_id, &args.broker, args.port);
    mqtt_options.set_keep_alive(Duration::from_secs(60));
    mqtt_options.set_clean_session(true);

    let (client, eventloop) = AsyncClient::new(mqtt_options, 10);
    let command_handle = tokio::spawn(run_command_loop(client, eventloop, args.topic.clone()));

    let telemetry_url = format!("{}/api/sensor-data", args.bridge_url.trim_end_matches('/'));
    let telemetry_handle = tokio::spawn(run_telemetry_loop(
        telemetry_url,
        Duration::from_millis(args.interval_ms),
    ));

    tokio::select! {
        _ = command_handle => {
            error!("Command loop terminated");
        }
        _ = telemetry_handle => {
            error!("Telemetry loop terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }
}

async fn run_command_loop(client: AsyncClient, mut eventloop: EventLoop, topic: String) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                // Subscriptions do not survive a clean-session reconnect.
                info!("Connected to broker, subscribing to {}", topic);
                if let Err(e) = client.subscribe(&topic, QoS::AtMostOnce).await {
                    error!("Failed to subscribe to {}: {}", topic, e);
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let raw = String::from_utf8_lossy(&publish.payload);
                apply(DeviceCommand::parse(&raw));
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT eventloop error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

fn apply(command: DeviceCommand) {
    match command {
        DeviceCommand::Led { target, rgb: Some((r, g, b)) } => {
            info!("LED {} on, color ({}, {}, {})", target, r, g, b)
        }
        DeviceCommand::Led { target, rgb: None } => info!("LED {} off", target),
        DeviceCommand::Servo { joint, position } => info!("Servo {} -> {}°", joint, position),
        DeviceCommand::Buzzer { pattern } => info!("Buzzer beep ({})", pattern),
        DeviceCommand::Unknown(raw) => warn!("Ignoring unknown command: {}", raw),
    }
}

async fn run_telemetry_loop(url: String, every: Duration) {
    let http = reqwest::Client::new();
    let mut ticker = tokio::time::interval(every);
    let mut sent = 0u64;

    loop {
        ticker.tick().await;

        let sample = SensorSample::random(&mut rand::thread_rng());
        match http.post(&url).json(&sample).send().await {
            Ok(response) if response.status().is_success() => {
                sent += 1;
                debug!("Posted {:?}", sample);
                if sent % 50 == 0 {
                    info!("Posted {} telemetry samples", sent);
                }
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("Bridge rejected telemetry ({}): {}", status, body);
            }
            Err(e) => {
                warn!("Failed to post telemetry: {}", e);
            }
        }
    }
}

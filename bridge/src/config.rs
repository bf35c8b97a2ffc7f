use std::env;
use std::time::Duration;

pub const DEFAULT_MQTT_BROKER: &str = "broker.hivemq.com";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_MQTT_TOPIC: &str = "esp32/commands";
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 60;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:telemetria.db";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mqtt_broker: String,
    pub mqtt_port: u16,
    pub mqtt_topic: String,
    pub mqtt_keep_alive: Duration,
    pub database_url: String,
    pub http_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mqtt_port: u16 = lookup("MQTT_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MQTT_PORT);
        let keep_alive_secs: u64 = lookup("MQTT_KEEP_ALIVE_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_KEEP_ALIVE_SECS);

        Self {
            mqtt_broker: lookup("MQTT_BROKER").unwrap_or_else(|| DEFAULT_MQTT_BROKER.to_string()),
            mqtt_port,
            mqtt_topic: lookup("MQTT_TOPIC").unwrap_or_else(|| DEFAULT_MQTT_TOPIC.to_string()),
            mqtt_keep_alive: Duration::from_secs(keep_alive_secs),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            http_addr: lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
        }
    }
}

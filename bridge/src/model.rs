use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "sucesso";
pub const STATUS_ERROR: &str = "erro";

/// UI gesture posted by the frontend
#[derive(Debug, Clone, Deserialize)]
pub struct GestureEvent {
    #[serde(rename = "type")]
    pub kind: Option<GestureValue>,
    pub value: Option<GestureValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GestureValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Telemetry pushed by the device. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorPayload {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub light: Option<f64>,
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Light,
    Angle,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperatura",
            SensorKind::Humidity => "umidade",
            SensorKind::Light => "luminosidade",
            SensorKind::Angle => "angulo",
        }
    }
}

/// A reading that has been validated but not yet stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub sensor: SensorKind,
    pub value: f64,
}

/// Stored sensor reading
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SensorReading {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub sensor_type: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct CommandAck {
    pub status: &'static str,
    pub comando_enviado: String,
}

impl CommandAck {
    pub fn new(command: String) -> Self {
        Self {
            status: STATUS_OK,
            comando_enviado: command,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TelemetryAck {
    pub status: &'static str,
    pub dados_recebidos: serde_json::Value,
}

impl TelemetryAck {
    pub fn new(received: serde_json::Value) -> Self {
        Self {
            status: STATUS_OK,
            dados_recebidos: received,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub mensagem: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            mensagem: message.into(),
        }
    }
}

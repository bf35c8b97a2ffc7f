use crate::errors::{Error, Result};
use crate::model::{NewReading, SensorKind, SensorPayload};

pub const NO_SENSOR_FIELD: &str = "JSON inválido. Nenhum dado de sensor reconhecido (esperado 'temp', 'humidity', 'light' ou 'angle')";

/// Parses a telemetry body into its typed payload.
pub fn sensor_payload(body: &serde_json::Value) -> Result<SensorPayload> {
    if !body.is_object() {
        return Err(Error::Validation(
            "JSON inválido: esperado um objeto".to_string(),
        ));
    }

    Ok(serde_json::from_value(body.clone())?)
}

/// Expands a payload into one reading per present field.
///
/// Values are stored as supplied; no range checks are applied.
pub fn readings(payload: &SensorPayload) -> Result<Vec<NewReading>> {
    let fields = [
        (SensorKind::Temperature, payload.temp),
        (SensorKind::Humidity, payload.humidity),
        (SensorKind::Light, payload.light),
        (SensorKind::Angle, payload.angle),
    ];

    let readings: Vec<NewReading> = fields
        .into_iter()
        .filter_map(|(sensor, value)| value.map(|value| NewReading { sensor, value }))
        .collect();

    if readings.is_empty() {
        return Err(Error::Validation(NO_SENSOR_FIELD.to_string()));
    }

    Ok(readings)
}

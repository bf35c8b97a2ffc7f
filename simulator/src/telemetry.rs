use rand::Rng;
use serde::Serialize;

/// Telemetry body in the shape the bridge accepts. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorSample {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl SensorSample {
    /// Random sample with at least one field present.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut sample = Self {
            temp: rng.gen_bool(0.8).then(|| round1(rng.gen_range(18.0..32.0))),
            humidity: rng.gen_bool(0.8).then(|| round1(rng.gen_range(30.0..80.0))),
            light: rng.gen_bool(0.6).then(|| rng.gen_range(0..1024) as f64),
            angle: rng.gen_bool(0.5).then(|| round1(rng.gen_range(-25.0..25.0))),
        };

        if sample.is_empty() {
            sample.temp = Some(round1(rng.gen_range(18.0..32.0)));
        }
        sample
    }

    pub fn is_empty(&self) -> bool {
        self.temp.is_none() && self.humidity.is_none() && self.light.is_none() && self.angle.is_none()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

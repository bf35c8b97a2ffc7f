//! Translation of frontend gestures into device command strings.

use crate::model::{GestureEvent, GestureValue};

const TILT_MIN: f64 = -20.0;
const TILT_MAX: f64 = 20.0;
const SERVO_RANGE: f64 = 180.0;

/// A gesture the device knows how to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    MouthOpen,
    MouthClosed,
    Tilt(f64),
    Blink,
    HandOk,
    HandFist,
    HandOpen,
}

impl Gesture {
    /// Matching on `kind` and textual values is case-sensitive.
    pub fn parse(kind: &str, value: &GestureValue) -> Option<Self> {
        match (kind, value) {
            ("MOUTH", GestureValue::Text(v)) if v == "OPEN" => Some(Gesture::MouthOpen),
            ("MOUTH", GestureValue::Text(v)) if v == "CLOSED" => Some(Gesture::MouthClosed),
            ("TILT", GestureValue::Number(angle)) => Some(Gesture::Tilt(*angle)),
            ("EYE", GestureValue::Text(v)) if v == "BLINK" => Some(Gesture::Blink),
            ("HAND", GestureValue::Text(v)) if v == "OK" => Some(Gesture::HandOk),
            ("HAND", GestureValue::Text(v)) if v == "FIST" => Some(Gesture::HandFist),
            ("HAND", GestureValue::Text(v)) if v == "OPEN" => Some(Gesture::HandOpen),
            _ => None,
        }
    }

    pub fn command(&self) -> String {
        match self {
            Gesture::MouthOpen => "LED:BOCA:ON:255,120,0".to_string(),
            Gesture::MouthClosed => "LED:BOCA:OFF".to_string(),
            Gesture::Tilt(angle) => format!("SERVO:NECK:{}", map_angle(*angle)),
            Gesture::Blink => "BUZZER:BEEP:SHORT".to_string(),
            Gesture::HandOk => "LED:EYES:ON:0,255,0".to_string(),
            Gesture::HandFist => "LED:EYES:ON:255,0,0".to_string(),
            Gesture::HandOpen => "LED:EYES:OFF".to_string(),
        }
    }
}

/// Returns the device command for a gesture, or `None` when the pair is unmapped.
pub fn map_gesture(kind: &str, value: &GestureValue) -> Option<String> {
    Gesture::parse(kind, value).map(|gesture| gesture.command())
}

pub fn map_event(event: &GestureEvent) -> Option<String> {
    match (&event.kind, &event.value) {
        (Some(GestureValue::Text(kind)), Some(value)) => map_gesture(kind, value),
        _ => None,
    }
}

/// Maps a head tilt in [-20, 20] degrees onto the servo's [0, 180] range.
///
/// Inputs outside the tilt range are clamped first; the scaled value is
/// truncated toward zero.
pub fn map_angle(angle: f64) -> i64 {
    let clamped = angle.clamp(TILT_MIN, TILT_MAX);
    ((clamped - TILT_MIN) * (SERVO_RANGE / (TILT_MAX - TILT_MIN))) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> GestureValue {
        GestureValue::Text(v.to_string())
    }

    #[test]
    fn test_mapping_table() {
        let cases = [
            ("MOUTH", text("OPEN"), "LED:BOCA:ON:255,120,0"),
            ("MOUTH", text("CLOSED"), "LED:BOCA:OFF"),
            ("TILT", GestureValue::Number(0.0), "SERVO:NECK:90"),
            ("EYE", text("BLINK"), "BUZZER:BEEP:SHORT"),
            ("HAND", text("OK"), "LED:EYES:ON:0,255,0"),
            ("HAND", text("FIST"), "LED:EYES:ON:255,0,0"),
            ("HAND", text("OPEN"), "LED:EYES:OFF"),
        ];

        for (kind, value, expected) in cases {
            assert_eq!(map_gesture(kind, &value).as_deref(), Some(expected), "{kind} {value:?}");
        }
    }

    #[test]
    fn test_unmapped_pairs() {
        assert_eq!(map_gesture("MOUTH", &text("open")), None);
        assert_eq!(map_gesture("mouth", &text("OPEN")), None);
        assert_eq!(map_gesture("EYE", &text("WINK")), None);
        assert_eq!(map_gesture("HAND", &text("PEACE")), None);
        assert_eq!(map_gesture("HAND", &GestureValue::Number(1.0)), None);
        assert_eq!(map_gesture("TILT", &text("15")), None);
        assert_eq!(map_gesture("TILT", &GestureValue::Other(serde_json::Value::Null)), None);
        assert_eq!(map_gesture("NOSE", &text("OPEN")), None);
    }

    #[test]
    fn test_map_angle_clamps() {
        assert_eq!(map_angle(-20.0), 0);
        assert_eq!(map_angle(-90.0), 0);
        assert_eq!(map_angle(20.0), 180);
        assert_eq!(map_angle(40.0), 180);
        assert_eq!(map_angle(0.0), 90);
    }

    #[test]
    fn test_map_angle_truncates() {
        // (10.3 + 20) * 4.5 = 136.35
        assert_eq!(map_angle(10.3), 136);
        // (-19.9 + 20) * 4.5 = 0.45
        assert_eq!(map_angle(-19.9), 0);
        assert_eq!(map_angle(1.0), 94);
    }

    #[test]
    fn test_map_event_requires_both_fields() {
        let event = GestureEvent {
            kind: Some(GestureValue::Text("EYE".to_string())),
            value: None,
        };
        assert_eq!(map_event(&event), None);

        let event = GestureEvent {
            kind: Some(GestureValue::Text("TILT".to_string())),
            value: Some(GestureValue::Number(40.0)),
        };
        assert_eq!(map_event(&event).as_deref(), Some("SERVO:NECK:180"));
    }

    #[test]
    fn test_map_event_non_text_kind() {
        let event = GestureEvent {
            kind: Some(GestureValue::Number(5.0)),
            value: Some(text("OPEN")),
        };
        assert_eq!(map_event(&event), None);
    }
}

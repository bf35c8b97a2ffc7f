/// Command received from the bridge over MQTT.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Led {
        target: String,
        rgb: Option<(u8, u8, u8)>,
    },
    Servo {
        joint: String,
        position: u8,
    },
    Buzzer {
        pattern: String,
    },
    Unknown(String),
}

impl DeviceCommand {
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = raw.trim().split(':').collect();

        match parts.as_slice() {
            ["LED", target, "OFF"] => DeviceCommand::Led {
                target: target.to_string(),
                rgb: None,
            },
            ["LED", target, "ON", color] => match parse_rgb(color) {
                Some(rgb) => DeviceCommand::Led {
                    target: target.to_string(),
                    rgb: Some(rgb),
                },
                None => DeviceCommand::Unknown(raw.to_string()),
            },
            ["SERVO", joint, position] => match position.parse::<u8>() {
                Ok(position) if position <= 180 => DeviceCommand::Servo {
                    joint: joint.to_string(),
                    position,
                },
                _ => DeviceCommand::Unknown(raw.to_string()),
            },
            ["BUZZER", "BEEP", pattern] => DeviceCommand::Buzzer {
                pattern: pattern.to_string(),
            },
            _ => DeviceCommand::Unknown(raw.to_string()),
        }
    }
}

fn parse_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let channels: Vec<u8> = color
        .split(',')
        .map(|c| c.trim().parse().ok())
        .collect::<Option<_>>()?;

    match channels.as_slice() {
        [r, g, b] => Some((*r, *g, *b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(
            DeviceCommand::parse("LED:BOCA:ON:255,120,0"),
            DeviceCommand::Led {
                target: "BOCA".to_string(),
                rgb: Some((255, 120, 0)),
            }
        );
        assert_eq!(
            DeviceCommand::parse("LED:EYES:OFF"),
            DeviceCommand::Led {
                target: "EYES".to_string(),
                rgb: None,
            }
        );
        assert_eq!(
            DeviceCommand::parse("SERVO:NECK:90"),
            DeviceCommand::Servo {
                joint: "NECK".to_string(),
                position: 90,
            }
        );
        assert_eq!(
            DeviceCommand::parse("BUZZER:BEEP:SHORT"),
            DeviceCommand::Buzzer {
                pattern: "SHORT".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(DeviceCommand::parse("SERVO:NECK:270"), DeviceCommand::Unknown(_)));
        assert!(matches!(DeviceCommand::parse("LED:EYES:ON:300,0,0"), DeviceCommand::Unknown(_)));
        assert!(matches!(DeviceCommand::parse("LED:EYES:ON:1,2"), DeviceCommand::Unknown(_)));
        assert!(matches!(DeviceCommand::parse("hello"), DeviceCommand::Unknown(_)));
    }
}

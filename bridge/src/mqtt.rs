use crate::errors::{Error, Result};
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use tracing::{debug, error, info};

const REQUEST_CAPACITY: usize = 64;

/// Sink for device commands. Implementations must be safe to call from
/// concurrent request handlers without external locking.
pub trait CommandPublisher: Send + Sync {
    /// Hands `message` off for delivery on `topic` without waiting for the broker.
    fn publish(&self, topic: &str, message: &str) -> Result<()>;
}

/// Publish-only MQTT client. Cloning shares the same connection.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Builds the client and its event loop. Nothing touches the network until
    /// the event loop is polled, so this cannot fail.
    pub fn new(broker: &str, port: u16, client_id: String, keep_alive: Duration) -> (Self, EventLoop) {
        let mut mqtt_options = MqttOptions::new(client_id, broker, port);
        mqtt_options.set_keep_alive(keep_alive);
        mqtt_options.set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);
        (Self { client }, eventloop)
    }
}

impl CommandPublisher for MqttPublisher {
    fn publish(&self, topic: &str, message: &str) -> Result<()> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, message.as_bytes().to_vec())
            .map_err(Error::Mqtt)
    }
}

/// Drives the connection for the lifetime of the process. rumqttc reconnects
/// on the next poll after an error, so failures are only logged.
pub async fn run_event_loop(mut eventloop: EventLoop, broker: String, port: u16) {
    info!("Connecting to MQTT broker at {}:{}", broker, port);

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    info!("Connected to MQTT broker at {}:{}", broker, port);
                } else {
                    error!("MQTT broker refused connection: {:?}", ack.code);
                }
            }
            Ok(Event::Outgoing(outgoing)) => {
                debug!("MQTT outgoing: {:?}", outgoing);
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every publish call instead of sending it.
    #[derive(Default)]
    pub struct RecordingPublisher {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingPublisher {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl CommandPublisher for RecordingPublisher {
        fn publish(&self, topic: &str, message: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((topic.to_string(), message.to_string()));
            if self.fail {
                return Err(Error::Mqtt(rumqttc::ClientError::TryRequest(
                    rumqttc::Request::Disconnect(rumqttc::Disconnect),
                )));
            }
            Ok(())
        }
    }

    #[test]
    fn test_publish_queues_without_broker() {
        let (publisher, _eventloop) = MqttPublisher::new(
            "localhost",
            1883,
            "test-bridge".to_string(),
            Duration::from_secs(60),
        );

        assert!(publisher.publish("esp32/commands", "LED:BOCA:OFF").is_ok());
    }

    #[test]
    fn test_publish_fails_when_queue_full() {
        let (publisher, _eventloop) = MqttPublisher::new(
            "localhost",
            1883,
            "test-bridge".to_string(),
            Duration::from_secs(60),
        );

        let results: Vec<bool> = (0..REQUEST_CAPACITY + 1)
            .map(|_| publisher.publish("esp32/commands", "BUZZER:BEEP:SHORT").is_ok())
            .collect();

        assert!(results[..REQUEST_CAPACITY].iter().all(|ok| *ok));
        assert!(!results[REQUEST_CAPACITY]);
    }

    #[test]
    fn test_recording_publisher() {
        let publisher = RecordingPublisher::failing();
        assert!(publisher.publish("t", "m").is_err());
        assert_eq!(publisher.sent(), vec![("t".to_string(), "m".to_string())]);
    }
}

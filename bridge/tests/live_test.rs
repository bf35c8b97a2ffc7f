//! Live checks against a running bridge. Start it with `cargo run --bin bridge`
//! and run `cargo test -- --ignored`. `BRIDGE_URL` overrides the address.

use rand::Rng;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

fn bridge_url() -> String {
    std::env::var("BRIDGE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

#[tokio::test]
#[ignore]
async fn test_telemetry_round_trip() {
    let client = reqwest::Client::new();
    let url = format!("{}/api/sensor-data", bridge_url());
    let marker = 1_000_000.0 + rand::thread_rng().gen_range(0..100_000) as f64;

    let start = Instant::now();
    for i in 0..25 {
        let response = client
            .post(&url)
            .json(&json!({"light": marker + i as f64}))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
    println!("Posted 25 readings in {:.2}s", start.elapsed().as_secs_f64());

    let readings: Vec<Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(readings.len(), 20);

    let values: Vec<f64> = readings
        .iter()
        .map(|r| r["value"].as_f64().unwrap())
        .collect();
    let expected: Vec<f64> = (5..25).rev().map(|i| marker + i as f64).collect();
    assert_eq!(values, expected);
    assert!(readings.iter().all(|r| r["sensor_type"] == "luminosidade"));
}

#[tokio::test]
#[ignore]
async fn test_rejects_empty_telemetry() {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/sensor-data", bridge_url()))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "erro");
}

#[tokio::test]
#[ignore]
async fn test_command_burst() {
    let client = reqwest::Client::new();
    let url = format!("{}/api/send-command", bridge_url());
    let gestures = [
        json!({"type": "MOUTH", "value": "OPEN"}),
        json!({"type": "MOUTH", "value": "CLOSED"}),
        json!({"type": "TILT", "value": -7.5}),
        json!({"type": "EYE", "value": "BLINK"}),
        json!({"type": "HAND", "value": "OK"}),
    ];

    let start = Instant::now();
    for gesture in gestures.iter().cycle().take(100) {
        let response = client.post(&url).json(gesture).send().await.unwrap();
        assert!(response.status().is_success());
    }
    let elapsed = start.elapsed();
    println!("Sent 100 commands in {:.2}s", elapsed.as_secs_f64());

    // Publishing never waits on the broker, so a burst stays fast even when it is unreachable.
    assert!(elapsed < Duration::from_secs(10));
}

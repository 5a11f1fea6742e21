//! Receive monitor: tune to a frequency and print the event stream.
//!
//! Demonstrates initialization, the firmware handshake, tuning, and
//! consuming the audio/diagnostic event stream. Useful as a smoke test
//! of a connected radio and as a starting point for audio playback.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p kv4p --example rx_monitor -- /dev/ttyUSB0
//! ```

use std::time::Duration;

use kv4p::{Kv4pBuilder, RadioEvent, RadioMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    println!("Connecting to kv4p HT on {port}...");

    let radio = Kv4pBuilder::new().serial_port(&port).build().await?;
    let mut events = radio.subscribe();

    radio.initialize().await?;
    println!("Waiting for firmware handshake...");

    // The radio enters RX on its own once a compatible version report
    // arrives; give it a few seconds.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while radio.mode() == RadioMode::Startup {
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("no firmware handshake within 5 seconds");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    radio.tune_to_frequency("146.520", "146.520", 0, 2).await?;
    println!("Tuned to 146.520 MHz simplex. Monitoring for 60 seconds...\n");

    let end = tokio::time::Instant::now() + Duration::from_secs(60);
    let mut audio_bytes: u64 = 0;

    loop {
        let remaining = end.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }

        match tokio::time::timeout(remaining, events.recv()).await {
            Ok(Ok(RadioEvent::AudioData(chunk))) => {
                audio_bytes += chunk.len() as u64;
            }
            Ok(Ok(RadioEvent::ModeChanged { mode })) => {
                println!("mode -> {mode}");
            }
            Ok(Ok(RadioEvent::Error { kind, message })) => {
                println!("error ({kind:?}): {message}");
            }
            Ok(Ok(RadioEvent::RawData(_))) => {}
            Ok(Err(tokio::sync::broadcast::error::RecvError::Lagged(n))) => {
                println!("(missed {n} events due to lag)");
            }
            Ok(Err(tokio::sync::broadcast::error::RecvError::Closed)) => break,
            Err(_) => break,
        }
    }

    println!("\nReceived {audio_bytes} bytes of audio.");
    radio.close().await?;
    Ok(())
}

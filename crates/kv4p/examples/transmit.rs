//! Key the transmitter for a short test transmission.
//!
//! Demonstrates the PTT cycle: tune, key down, wait, key up. The radio
//! discards inbound bytes while transmitting and resumes audio dispatch
//! when PTT is released.
//!
//! Only transmit on frequencies your license permits.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p kv4p --example transmit -- /dev/ttyUSB0 146.520 [tone-index]
//! ```

use std::time::Duration;

use kv4p::{ctcss_tone_label, FilterConfig, Kv4pBuilder, RadioMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let port = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let freq = args.next().unwrap_or_else(|| "146.520".to_string());
    let tone: u8 = args.next().and_then(|t| t.parse().ok()).unwrap_or(0);

    println!(
        "TX test on {freq} MHz, tone {}",
        ctcss_tone_label(tone).unwrap_or_else(|| "None".to_string())
    );

    let radio = Kv4pBuilder::new().serial_port(&port).build().await?;

    radio.initialize().await?;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while radio.mode() == RadioMode::Startup {
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("no firmware handshake within 5 seconds");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    radio.tune_to_frequency(&freq, &freq, tone, 2).await?;
    radio.set_filters(FilterConfig {
        emphasis: true,
        high_pass: true,
        low_pass: true,
    })
    .await?;

    println!("Keying transmitter on {freq} MHz for 2 seconds...");
    radio.start_tx_mode().await?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    radio.end_tx_mode().await?;
    println!("Done, back in {} mode.", radio.mode());

    radio.close().await?;
    Ok(())
}

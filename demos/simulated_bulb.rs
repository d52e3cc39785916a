// SPDX-License-Identifier: MPL-2.0

//! Demo: drive a simulated color bulb the way a host platform would.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example simulated_bulb
//! ```
//!
//! Device faults are logged at error level because the configuration sets
//! `logErrors`.

use std::time::Duration;

use tuyalight_lib::client::SimulatedDevice;
use tuyalight_lib::{BulbConfig, Characteristic, LightBulb};

const CONFIG: &str = r#"{
    "devId": "bf0123456789abcd",
    "type": "dimmable tunable color",
    "name": "Living Room",
    "logErrors": true,
    "manufacturer": "Acme",
    "model": "RGBCW A19"
}"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = BulbConfig::from_json(CONFIG)?;
    let device = SimulatedDevice::new(&config.dev_id)
        .with_write_interval(Duration::from_millis(150))
        .with_property(1, false)
        .with_property(2, "white")
        .with_property(3, 25);
    device.ignore_writes_while_off(true);

    let bulb = LightBulb::new(&device, &config)?;
    let info = bulb.accessory_info();
    println!(
        "{} ({} {}, serial {})",
        bulb.name(),
        info.manufacturer,
        info.model,
        info.serial_number
    );
    println!("Characteristics: {:?}", bulb.characteristics());
    println!("Debounce window: {:?}", bulb.debounce_window());

    println!("\nSwitching on in color mode...");
    bulb.set_color_on(true).await?;
    println!("State: {:?}", bulb.state().await?);

    println!("\nDragging the hue slider...");
    let (a, b, c) = tokio::join!(bulb.set_hue(90), bulb.set_hue(180), bulb.set_hue(270));
    println!("Results: {a:?} {b:?} {c:?}");
    println!("Color writes: {:?}", device.writes_to(5));
    println!("Hue now: {}", bulb.get_hue().await?);

    println!("\nDimming while off...");
    bulb.set_power(false).await?;
    bulb.set_brightness(80).await?;
    println!("Brightness property: {:?}", device.property(3));

    println!("\nColor read failing...");
    device.fail_reads(5, true);
    println!("Value: {:?}", bulb.read(Characteristic::Brightness).await?);

    println!("\nWrite journal:");
    for write in device.writes() {
        println!("  dps {} <- {}", write.index, write.value);
    }

    Ok(())
}

//! Live power monitoring example against a simulated trainer
//!
//! Run with: cargo run --example power_monitor

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use cycling_power_ble::{
    Address, AddressKind, ClientConfig, EventSink, PowerMeterClient, RadioTransport, Result,
    TransportEvent, ZoneTable, CCCD_UUID, CYCLING_POWER_MEASUREMENT_UUID,
    CYCLING_POWER_SERVICE_UUID,
};

const TRAINER_NAME: &str = "KICKR CORE 5D21";
const TRAINER_ADDR: Address = Address([0xC4, 0x01, 0x22, 0x33, 0x44, 0x55]);
const CONN_HANDLE: u16 = 64;
const VALUE_HANDLE: u16 = 11;
const CCCD_HANDLE: u16 = 12;

/// A scripted trainer that advertises, connects, and streams a wavy power
/// curve once subscribed.
#[derive(Default)]
struct SimulatedTrainer {
    sink: Arc<RwLock<Option<EventSink>>>,
}

impl SimulatedTrainer {
    fn emit(&self, event: TransportEvent) {
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    fn start_pedaling(&self) {
        let sink = self.sink.clone();
        tokio::spawn(async move {
            let mut tick = 0u32;
            loop {
                tokio::time::sleep(Duration::from_millis(500)).await;
                let phase = f64::from(tick) / 20.0;
                let watts = (180.0 + 130.0 * phase.sin()) as i16;
                let mut data = vec![0x00, 0x00];
                data.extend_from_slice(&watts.to_le_bytes());
                let sink = sink.read().clone();
                if let Some(sink) = sink {
                    sink(TransportEvent::Notification {
                        connection_handle: CONN_HANDLE,
                        value_handle: VALUE_HANDLE,
                        data,
                    });
                }
                tick += 1;
            }
        });
    }
}

#[async_trait]
impl RadioTransport for SimulatedTrainer {
    fn set_event_sink(&self, sink: EventSink) {
        *self.sink.write() = Some(sink);
    }

    async fn scan(&self, _: Duration, _: Duration, _: Duration) -> Result<()> {
        let mut adv = vec![(TRAINER_NAME.len() + 1) as u8, 0x09];
        adv.extend_from_slice(TRAINER_NAME.as_bytes());
        self.emit(TransportEvent::ScanResult {
            address_kind: AddressKind::Random,
            address: TRAINER_ADDR,
            adv_data: adv,
        });
        Ok(())
    }

    async fn stop_scan(&self) -> Result<()> {
        Ok(())
    }

    async fn connect(&self, address_kind: AddressKind, address: Address) -> Result<()> {
        self.emit(TransportEvent::Connected {
            connection_handle: CONN_HANDLE,
            address_kind,
            address,
        });
        Ok(())
    }

    async fn discover_services(&self, connection_handle: u16) -> Result<()> {
        self.emit(TransportEvent::ServiceResult {
            connection_handle,
            start_handle: 9,
            end_handle: 16,
            uuid: CYCLING_POWER_SERVICE_UUID,
        });
        Ok(())
    }

    async fn discover_characteristics(
        &self,
        connection_handle: u16,
        _start_handle: u16,
        _end_handle: u16,
    ) -> Result<()> {
        self.emit(TransportEvent::CharacteristicResult {
            connection_handle,
            declaration_handle: VALUE_HANDLE - 1,
            value_handle: VALUE_HANDLE,
            uuid: CYCLING_POWER_MEASUREMENT_UUID,
        });
        Ok(())
    }

    async fn discover_descriptors(
        &self,
        connection_handle: u16,
        _start_handle: u16,
        _end_handle: u16,
    ) -> Result<()> {
        self.emit(TransportEvent::DescriptorResult {
            connection_handle,
            handle: CCCD_HANDLE,
            uuid: CCCD_UUID,
        });
        Ok(())
    }

    async fn write_attribute(
        &self,
        _connection_handle: u16,
        _handle: u16,
        _value: &[u8],
        _with_response: bool,
    ) -> Result<()> {
        self.start_pedaling();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (minimal)
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Power Monitor");
    println!("=============\n");

    let transport = Arc::new(SimulatedTrainer::default());
    let client = PowerMeterClient::new(transport, ClientConfig::default());

    let zones = ZoneTable::with_ftp(250);
    client.set_power_callback(move |watts| {
        let color = zones.color_for_power(watts);
        println!(
            "{:>4} W  zone color #{:02X}{:02X}{:02X}",
            watts, color.r, color.g, color.b
        );
    });

    // Retry until the trainer is found
    while client.scan_and_connect(TRAINER_NAME).await.is_err() {
        println!("Not found. Retrying in 5 seconds...");
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    println!("Connected! Press Ctrl+C to exit.\n");

    // Watch the connection and reconnect if it drops
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nExiting...");
                break;
            }
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                if !client.is_connected() {
                    println!("Connection lost. Reconnecting...");
                    let _ = client.scan_and_connect(TRAINER_NAME).await;
                }
            }
        }
    }

    Ok(())
}

//! BLE peripheral: one service, one write + notify characteristic.
//!
//! The radio runs in its own task. It talks to the control loop only through
//! [`LinkChannels`]: link events flow in through a channel, while outbound
//! frames, echoes, and advertising requests flow out through signals.

use core::future::Future;

use defmt::{error, info, warn};
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use glove_core::{LinkEvent, OutputError, TelemetryFrame, TelemetryLink};
use glove_proto::gatt::{
    MAX_PREFERRED_INTERVAL, MAX_WRITE_LEN, MIN_PREFERRED_INTERVAL, SERVICE_UUID16,
};
use glove_proto::{DEVICE_NAME, FRAME_LEN};
use heapless::Vec;
use trouble_host::prelude::*;

/// Max number of connections.
pub const CONNECTIONS_MAX: usize = 1;

/// Max number of L2CAP channels.
pub const L2CAP_CHANNELS_MAX: usize = 2; // Signal + att

/// Pending link events before the radio task waits for the control loop.
pub const EVENT_QUEUE: usize = 4;

/// Static random address of the glove.
const ADDRESS: [u8; 6] = [0x47, 0x4c, 0x4f, 0x56, 0x45, 0xc0];

/// Delay before retrying a failed advertising attempt.
const ADVERTISE_RETRY_MS: u64 = 1000;

/// Characteristic value: a telemetry frame or the last echoed write.
pub type DataValue = Vec<u8, MAX_WRITE_LEN>;

/// Glove GATT service.
#[gatt_service(uuid = "180d")]
pub struct GloveService {
    /// Notify: 22-byte telemetry frame. Write: text for the display.
    #[characteristic(uuid = "2a37", write, notify)]
    pub data: DataValue,
}

/// GATT server with the glove service.
#[gatt_server]
pub struct GloveServer {
    pub glove: GloveService,
}

/// Queues shared between the radio task and the control loop.
pub struct LinkChannels {
    /// Radio task -> control loop.
    pub events: Channel<CriticalSectionRawMutex, LinkEvent, EVENT_QUEUE>,
    /// Latest frame to notify. Unsent frames are overwritten.
    pub frames: Signal<CriticalSectionRawMutex, [u8; FRAME_LEN]>,
    /// Bytes to store as the characteristic value.
    pub echo: Signal<CriticalSectionRawMutex, DataValue>,
    /// Request to (re)start advertising.
    pub advertise: Signal<CriticalSectionRawMutex, ()>,
}

impl LinkChannels {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            frames: Signal::new(),
            echo: Signal::new(),
            advertise: Signal::new(),
        }
    }
}

impl Default for LinkChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Control-loop side of the link.
pub struct BleLink {
    channels: &'static LinkChannels,
}

impl BleLink {
    pub fn new(channels: &'static LinkChannels) -> Self {
        Self { channels }
    }
}

impl TelemetryLink for BleLink {
    fn start_advertising(&mut self) -> impl Future<Output = Result<(), OutputError>> {
        self.channels.advertise.signal(());
        core::future::ready(Ok(()))
    }

    fn notify(&mut self, frame: &TelemetryFrame) -> impl Future<Output = Result<(), OutputError>> {
        // Overwrites any frame the radio has not picked up yet.
        self.channels.frames.signal(frame.to_bytes());
        core::future::ready(Ok(()))
    }

    fn echo(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), OutputError>> {
        let result = match Vec::from_slice(bytes) {
            Ok(value) => {
                info!("Echoed back to app: {=[u8]:a}", bytes);
                self.channels.echo.signal(value);
                Ok(())
            }
            Err(()) => Err(OutputError::Io),
        };
        core::future::ready(result)
    }
}

/// Run the BLE host until the controller fails.
///
/// Advertising starts only when the control loop asks for it, and each
/// connection ends with a `Disconnected` event before the next request is
/// honoured.
pub async fn run<C: Controller>(controller: C, channels: &'static LinkChannels) {
    let address = Address::random(ADDRESS);
    info!("BLE address {:?}", address);

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();
    let stack = trouble_host::new(controller, &mut resources).set_random_address(address);
    let Host {
        mut peripheral,
        runner,
        ..
    } = stack.build();

    let server = match GloveServer::new_with_config(GapConfig::Peripheral(PeripheralConfig {
        name: DEVICE_NAME,
        appearance: &appearance::sensor::GENERIC_SENSOR,
    })) {
        Ok(server) => server,
        Err(e) => {
            error!("GATT server setup failed: {:?}", e);
            return;
        }
    };

    let _ = join(host_task(runner), async {
        loop {
            channels.advertise.wait().await;
            match advertise(&mut peripheral, &server).await {
                Ok(conn) => {
                    info!("Connected to central device");
                    channels.frames.reset();
                    channels.events.send(LinkEvent::Connected).await;
                    select(
                        gatt_events(&server, &conn, channels),
                        outbound(&server, &conn, channels),
                    )
                    .await;
                    info!("Disconnected from central device");
                    channels.events.send(LinkEvent::Disconnected).await;
                }
                Err(e) => {
                    warn!("advertising failed: {:?}", e);
                    Timer::after_millis(ADVERTISE_RETRY_MS).await;
                    channels.advertise.signal(());
                }
            }
        }
    })
    .await;
}

/// Background task that drives the host stack.
async fn host_task<C: Controller, P: PacketPool>(mut runner: Runner<'_, C, P>) {
    loop {
        if let Err(e) = runner.run().await {
            error!("BLE host error: {:?}", e);
        }
    }
}

/// Advertise as connectable and wait for a central.
async fn advertise<'values, 'server, C: Controller>(
    peripheral: &mut Peripheral<'values, C, DefaultPacketPool>,
    server: &'server GloveServer<'values>,
) -> Result<GattConnection<'values, 'server, DefaultPacketPool>, BleHostError<C::Error>> {
    let mut interval = [0u8; 4];
    interval[..2].copy_from_slice(&MIN_PREFERRED_INTERVAL.to_le_bytes());
    interval[2..].copy_from_slice(&MAX_PREFERRED_INTERVAL.to_le_bytes());

    let mut adv_data = [0; 31];
    let adv_len = AdStructure::encode_slice(
        &[
            AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
            AdStructure::ServiceUuids16(&[SERVICE_UUID16.to_le_bytes()]),
            // Peripheral preferred connection interval range
            AdStructure::Unknown {
                ty: 0x12,
                data: &interval,
            },
        ],
        &mut adv_data[..],
    )?;

    let mut scan_data = [0; 31];
    let scan_len = AdStructure::encode_slice(
        &[AdStructure::CompleteLocalName(DEVICE_NAME.as_bytes())],
        &mut scan_data[..],
    )?;

    let advertiser = peripheral
        .advertise(
            &Default::default(),
            Advertisement::ConnectableScannableUndirected {
                adv_data: &adv_data[..adv_len],
                scan_data: &scan_data[..scan_len],
            },
        )
        .await?;
    info!("Bluetooth device active, waiting for connections...");
    let conn = advertiser.accept().await?.with_attribute_server(server)?;
    Ok(conn)
}

/// Forward writes to the control loop until the central disconnects.
async fn gatt_events<P: PacketPool>(
    server: &GloveServer<'_>,
    conn: &GattConnection<'_, '_, P>,
    channels: &LinkChannels,
) {
    let data = server.glove.data;
    let reason = loop {
        match conn.next().await {
            GattConnectionEvent::Disconnected { reason } => break reason,
            GattConnectionEvent::Gatt { event } => {
                if let GattEvent::Write(write) = &event {
                    if write.handle() == data.handle {
                        info!("Received from app: {=[u8]:a}", write.data());
                        channels.events.send(LinkEvent::written(write.data())).await;
                    }
                }
                match event.accept() {
                    Ok(reply) => reply.send().await,
                    Err(e) => warn!("[gatt] error sending response: {:?}", e),
                }
            }
            _ => {}
        }
    };
    info!("[gatt] disconnected: {:?}", reason);
}

/// Push frames and echoes from the control loop to the characteristic.
async fn outbound<P: PacketPool>(
    server: &GloveServer<'_>,
    conn: &GattConnection<'_, '_, P>,
    channels: &LinkChannels,
) {
    let data = server.glove.data;
    loop {
        match select(channels.frames.wait(), channels.echo.wait()).await {
            Either::First(frame) => {
                let value: DataValue = Vec::from_slice(&frame).unwrap_or_default();
                if let Err(e) = data.notify(conn, &value).await {
                    // Retried with the next frame
                    warn!("notify failed: {:?}", e);
                }
            }
            Either::Second(bytes) => {
                if let Err(e) = server.set(&data, &bytes) {
                    warn!("echo failed: {:?}", e);
                }
            }
        }
    }
}

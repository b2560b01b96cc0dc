#![no_std]
#![no_main]

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::ble::controller::BleConnector;
use interpreter_glove::{
    ble, BleLink, FlexAdc, FrameDisplay, GloveApp, LinkChannels, Mpu6050, CONFIG, FRAME_BYTES,
    HEIGHT, VARIANT, WIDTH,
};
use lcd_async::interface::SpiInterface;
use lcd_async::models::ST7789;
use lcd_async::options::{ColorInversion, Orientation, Rotation};
use lcd_async::Builder;
use static_cell::StaticCell;
use trouble_host::prelude::ExternalController;
use {esp_backtrace as _, esp_println as _};

esp_bootloader_esp_idf::esp_app_desc!();

/// Loop period while no link event is pending.
const TICK_MS: u64 = 10;

/// ST7789 panel in portrait, before rotation.
const PANEL_WIDTH: u16 = 135;
const PANEL_HEIGHT: u16 = 240;
/// Visible window inside the controller's 240x320 RAM.
const PANEL_OFFSET: (u16, u16) = (52, 40);

const DISPLAY_SPI_MHZ: u32 = 40;
const IMU_I2C_KHZ: u32 = 400;

/// HCI command slots for the radio controller.
const HCI_SLOTS: usize = 20;

/// Queues between the radio task and the control loop.
static LINK: LinkChannels = LinkChannels::new();

static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static FRAME_BUFFER: StaticCell<[u8; FRAME_BYTES]> = StaticCell::new();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    info!("Interpreter glove starting ({})", VARIANT);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // esp-radio requires an allocator.
    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // --- Display Setup ---
    let _backlight = Output::new(peripherals.GPIO4, Level::High, OutputConfig::default());
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(DISPLAY_SPI_MHZ))
            .with_mode(Mode::_0),
    )
    .expect("spi init")
    .with_sck(peripherals.GPIO18)
    .with_mosi(peripherals.GPIO19)
    .into_async();
    let cs = Output::new(peripherals.GPIO5, Level::High, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO16, Level::High, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO23, Level::High, OutputConfig::default());
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).expect("spi device");
    let interface = SpiInterface::new(spi_device, dc);

    let mut lcd = Builder::new(ST7789, interface)
        .display_size(PANEL_WIDTH, PANEL_HEIGHT)
        .display_offset(PANEL_OFFSET.0, PANEL_OFFSET.1)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut Delay)
        .await
        .expect("display init");

    let frame = FRAME_BUFFER.init([0; FRAME_BYTES]);
    let screen = FrameDisplay::new(frame);

    // --- IMU Setup ---
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(IMU_I2C_KHZ)),
    )
    .expect("i2c init")
    // IMU_SDA_GPIO / IMU_SCL_GPIO
    .with_sda(peripherals.GPIO21)
    .with_scl(peripherals.GPIO22)
    .into_async();
    let imu = Mpu6050::new(i2c, Delay);

    // --- Flex Sensors and Button ---
    // FLEX_GPIOS, in order
    let flex = FlexAdc::new(
        peripherals.ADC1,
        peripherals.ADC2,
        peripherals.GPIO36,
        peripherals.GPIO39,
        peripherals.GPIO32,
        peripherals.GPIO33,
        peripherals.GPIO26,
    );
    // BUTTON_GPIO is input-only with an external pull-up.
    let button = Input::new(
        peripherals.GPIO35,
        InputConfig::default().with_pull(Pull::None),
    );

    // --- BLE Setup ---
    let radio = RADIO.init(esp_radio::init().expect("radio init"));
    let connector =
        BleConnector::new(radio, peripherals.BT, Default::default()).expect("ble connector");
    let controller: ExternalController<_, HCI_SLOTS> = ExternalController::new(connector);
    spawner.spawn(ble_task(controller, &LINK).unwrap());

    // --- Control Loop ---
    let mut app = GloveApp::new(CONFIG, flex, imu, screen, BleLink::new(&LINK));
    if let Err(e) = app.boot(now_ms()).await {
        error!("boot: {}", e);
    }

    loop {
        match select(LINK.events.receive(), Timer::after_millis(TICK_MS)).await {
            Either::First(event) => {
                if let Err(e) = app.handle_event(event).await {
                    warn!("link event: {}", e);
                }
            }
            Either::Second(()) => match app.poll(now_ms(), button.is_low()).await {
                Ok(Some(frame)) => info!("{}", frame.diagnostic_line().as_str()),
                Ok(None) => {}
                Err(e) => warn!("poll: {}", e),
            },
        }

        if app.display_mut().take_dirty() {
            let bytes = app.display().bytes();
            if let Err(e) = lcd
                .show_raw_data(0, 0, WIDTH as u16, HEIGHT as u16, bytes)
                .await
            {
                warn!("display push failed: {:?}", defmt::Debug2Format(&e));
            }
        }
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// BLE task - runs the host stack and the GATT server.
#[embassy_executor::task]
async fn ble_task(
    controller: ExternalController<BleConnector<'static>, HCI_SLOTS>,
    channels: &'static LinkChannels,
) {
    ble::run(controller, channels).await;
}

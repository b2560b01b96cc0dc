//! MPU6050 6-axis IMU (accelerometer + gyroscope) driver.
//!
//! Configured for ±8 g, ±500 °/s and a 21 Hz low-pass filter. Readings are
//! returned in m/s² and rad/s.

use core::future::Future;

use defmt::info;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use glove_core::{ImuSample, ImuSource, InputError};

/// Default I²C address (AD0 low).
pub const MPU6050_ADDR: u8 = 0x68;

// Registers
const REG_SMPLRT_DIV: u8 = 0x19;
const REG_CONFIG: u8 = 0x1A;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_SIGNAL_PATH_RESET: u8 = 0x68;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

const WHO_AM_I_EXPECTED: u8 = 0x68;

const PWR_RESET: u8 = 0x80;
/// Clock from the X gyro PLL.
const PWR_CLOCK_PLL_X: u8 = 0x01;
/// DLPF_CFG = 4: 21 Hz accel / 20 Hz gyro bandwidth.
const CONFIG_DLPF_21HZ: u8 = 0x04;
/// FS_SEL = 1: ±500 °/s.
const GYRO_RANGE_500DPS: u8 = 0x08;
/// AFS_SEL = 2: ±8 g.
const ACCEL_RANGE_8G: u8 = 0x10;

const RESET_SETTLE_MS: u32 = 100;

/// LSB per g at ±8 g.
const ACCEL_LSB_PER_G: f32 = 4096.0;
/// LSB per °/s at ±500 °/s.
const GYRO_LSB_PER_DPS: f32 = 65.5;
const STANDARD_GRAVITY: f32 = 9.806_65;
const DEG_TO_RAD: f32 = 0.017_453_292;

/// MPU6050 on an async I²C bus.
pub struct Mpu6050<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Mpu6050<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: MPU6050_ADDR,
        }
    }

    async fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), InputError> {
        self.i2c
            .write(self.address, &[reg, val])
            .await
            .map_err(|_| InputError::Io)
    }

    async fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), InputError> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(|_| InputError::Io)
    }

    async fn probe(&mut self) -> Result<(), InputError> {
        let mut who = [0u8; 1];
        self.read_regs(REG_WHO_AM_I, &mut who)
            .await
            .map_err(|_| InputError::NotFound)?;
        if who[0] != WHO_AM_I_EXPECTED {
            info!(
                "MPU6050: unexpected WHO_AM_I={=u8:#x} (expected {=u8:#x})",
                who[0], WHO_AM_I_EXPECTED
            );
            return Err(InputError::NotFound);
        }

        self.write_reg(REG_PWR_MGMT_1, PWR_RESET).await?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;
        self.write_reg(REG_SIGNAL_PATH_RESET, 0x07).await?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;

        self.write_reg(REG_SMPLRT_DIV, 0x00).await?;
        self.write_reg(REG_CONFIG, CONFIG_DLPF_21HZ).await?;
        self.write_reg(REG_GYRO_CONFIG, GYRO_RANGE_500DPS).await?;
        self.write_reg(REG_ACCEL_CONFIG, ACCEL_RANGE_8G).await?;
        self.write_reg(REG_PWR_MGMT_1, PWR_CLOCK_PLL_X).await?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;

        info!("MPU6050: initialized (±8g, ±500dps, 21Hz)");
        Ok(())
    }

    /// Read accelerometer and gyroscope in one burst.
    async fn sample(&mut self) -> Result<ImuSample, InputError> {
        // accel (6) + temp (2) + gyro (6), big-endian, starting at 0x3B
        let mut buf = [0u8; 14];
        self.read_regs(REG_ACCEL_XOUT_H, &mut buf).await?;
        Ok(convert(&buf))
    }
}

fn raw_to_i16(high: u8, low: u8) -> i16 {
    i16::from_be_bytes([high, low])
}

/// Convert a 14-byte burst to physical units.
fn convert(buf: &[u8; 14]) -> ImuSample {
    let axis = |i: usize| f32::from(raw_to_i16(buf[i], buf[i + 1]));
    let accel = |i: usize| axis(i) / ACCEL_LSB_PER_G * STANDARD_GRAVITY;
    let gyro = |i: usize| axis(i) / GYRO_LSB_PER_DPS * DEG_TO_RAD;
    ImuSample {
        accel: [accel(0), accel(2), accel(4)],
        gyro: [gyro(8), gyro(10), gyro(12)],
    }
}

impl<I2C: I2c, D: DelayNs> ImuSource for Mpu6050<I2C, D> {
    fn init(&mut self) -> impl Future<Output = Result<(), InputError>> {
        self.probe()
    }

    fn read(&mut self) -> impl Future<Output = Result<ImuSample, InputError>> {
        self.sample()
    }
}

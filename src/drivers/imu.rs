// EpiWatch — MPU6050 IMU Driver
//
// Register-level driver over the I2C bus.  The sensor is the only device on
// the bus and only the scheduler thread touches it, so the driver owns the
// bus outright.

use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::events::Sample;
use crate::scheduler::SampleSource;

// MPU6050 register addresses
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_CONFIG: u8 = 0x1A;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 14-byte sensor burst
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050<'d> {
    i2c: I2cDriver<'d>,
}

impl<'d> Mpu6050<'d> {
    pub fn new(i2c: I2cDriver<'d>) -> Self {
        Self { i2c }
    }

    /// Read WHO_AM_I; `Ok(false)` if a different device answered.
    pub fn is_connected(&mut self) -> anyhow::Result<bool> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS)?;
        Ok(buf[0] == WHO_AM_I_EXPECTED)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> anyhow::Result<()> {
        self.i2c
            .write(I2C_ADDR_MPU6050, &[reg, value], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}

impl SampleSource for Mpu6050<'_> {
    /// Probe the chip, wake it and configure accel (±8 g), gyro (±500 °/s),
    /// DLPF 21 Hz.
    fn init(&mut self) -> anyhow::Result<()> {
        if !self.is_connected()? {
            anyhow::bail!("unexpected WHO_AM_I at 0x{:02X}", I2C_ADDR_MPU6050);
        }

        // Wake up (clear SLEEP bit)
        self.write_reg(REG_PWR_MGMT_1, 0x00)?;

        // DLPF bandwidth 21 Hz
        self.write_reg(REG_CONFIG, 0x04)?;

        // Gyroscope: ±500 °/s
        self.write_reg(REG_GYRO_CONFIG, 0x08)?;

        // Accelerometer: ±8 g
        self.write_reg(REG_ACCEL_CONFIG, 0x10)?;

        log::info!("MPU6050 initialised (±8g, ±500°/s, DLPF 21Hz)");
        Ok(())
    }

    /// Burst-read all 6 axes and convert to m/s² and rad/s.
    fn read(&mut self) -> anyhow::Result<Sample> {
        let mut raw = [0u8; 14];
        self.i2c.write_read(
            I2C_ADDR_MPU6050,
            &[REG_ACCEL_XOUT_H],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        let axis = |i: usize| i16::from_be_bytes([raw[i], raw[i + 1]]) as f32;
        let accel = |i: usize| axis(i) / ACCEL_SCALE_8G * STANDARD_GRAVITY;
        let gyro = |i: usize| (axis(i) / GYRO_SCALE_500).to_radians();

        Ok(Sample {
            ax: accel(0),
            ay: accel(2),
            az: accel(4),
            // raw[6..8] = temperature — skipped
            gx: gyro(8),
            gy: gyro(10),
            gz: gyro(12),
        })
    }
}

// EpiWatch — Firmware Entry Point
//
// Boot sequence:
//   1. Drive the LED and buzzer LOW.
//   2. Bring up the MPU6050; if it is missing, halt in an idle loop forever.
//   3. Print the banner.
//   4. Run the sampling scheduler until power-off.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::gpio::OutputPin;
    use esp_idf_hal::gpio::PinDriver;
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use epiwatch::config::*;
    use epiwatch::drivers::alert::AlertPins;
    use epiwatch::drivers::imu::Mpu6050;
    use epiwatch::{scheduler, AlertStateMachine, EdgeImpulse, MonotonicClock, Scheduler};

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // Alert lines first, so they are LOW even if the sensor is missing.
    let led = PinDriver::output(peripherals.pins.gpio2.downgrade_output())?; // PIN_ALERT_LED
    let buzzer = PinDriver::output(peripherals.pins.gpio23.downgrade_output())?; // PIN_BUZZER
    let alert = AlertStateMachine::new(AlertPins::new(led, buzzer));

    // ---- I2C bus + IMU ----------------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21, // PIN_I2C_SDA
        peripherals.pins.gpio22, // PIN_I2C_SCL
        &i2c_config,
    )?;
    log::info!(
        "Alert on GPIO{} (LED) + GPIO{} (buzzer); MPU6050 on SDA GPIO{} / SCL GPIO{}",
        PIN_ALERT_LED,
        PIN_BUZZER,
        PIN_I2C_SDA,
        PIN_I2C_SCL
    );
    let imu = scheduler::bring_up(Mpu6050::new(i2c));

    scheduler::log_banner();
    log::info!("READY: System initialized in continuous inference mode");

    Scheduler::new(imu, EdgeImpulse::new(), alert, MonotonicClock::new()).run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "epiwatch is ESP-IDF firmware; build it with `cargo build --target xtensa-esp32-espidf`. \
         Host builds only exercise the library tests."
    );
}

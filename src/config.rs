// EpiWatch — Hardware & System Configuration
// Target: ESP32 DevKit (Xtensa), MPU6050 on the default I2C pins.

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_ALERT_LED: i32 = 2;  // On-board LED — visual alert
pub const PIN_BUZZER: i32 = 23;    // Active buzzer — audible alert
pub const PIN_I2C_SDA: i32 = 21;   // I2C data line
pub const PIN_I2C_SCL: i32 = 22;   // I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_INTERVAL_MS: u32 = 23; // ~43 Hz
pub const IDLE_DELAY_MS: u64 = 1;       // Pause between scheduler polls
pub const HALT_POLL_MS: u64 = 10;       // Sleep step of the fatal halt loop

// ---------------------------------------------------------------------------
// AI / Edge Impulse Model
// ---------------------------------------------------------------------------
pub const MODEL_PROJECT_NAME: &str = "epiwatch";
pub const AXES_PER_SAMPLE: usize = 6;    // accX, accY, accZ, gyrX, gyrY, gyrZ
pub const RAW_SAMPLE_COUNT: usize = 100; // ~2.3-second window @ 43 Hz
pub const FRAME_SIZE: usize = RAW_SAMPLE_COUNT * AXES_PER_SAMPLE; // 600
pub const MAX_LABELS: usize = 16;      // Upper bound on model labels read back over FFI
pub const SEIZURE_LABEL: &str = "seizure";
pub const DEBUG_NN: bool = false;

// ---------------------------------------------------------------------------
// Alerting
// ---------------------------------------------------------------------------
pub const CONFIDENCE_HISTORY_LEN: usize = 5;
pub const SEIZURE_THRESHOLD: f32 = 0.7;

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_8G: f32 = 4096.0;  // LSB/g  at ±8 g
pub const GYRO_SCALE_500: f32 = 65.5;    // LSB/°/s at ±500 °/s
pub const STANDARD_GRAVITY: f32 = 9.80665; // m/s² per g — model is trained on m/s²

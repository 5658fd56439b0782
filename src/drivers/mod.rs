pub mod alert;
pub mod imu;

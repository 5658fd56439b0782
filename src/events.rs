// EpiWatch — Data Types

// ---------------------------------------------------------------------------
// Sensor Data (6-axis IMU reading)
// ---------------------------------------------------------------------------

/// One instantaneous reading: acceleration in m/s², angular rate in rad/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
}

impl Sample {
    pub fn new(accel: [f32; 3], gyro: [f32; 3]) -> Self {
        Self {
            ax: accel[0],
            ay: accel[1],
            az: accel[2],
            gx: gyro[0],
            gy: gyro[1],
            gz: gyro[2],
        }
    }

    /// Values in the order the model expects them.
    pub fn to_array(&self) -> [f32; 6] {
        [self.ax, self.ay, self.az, self.gx, self.gy, self.gz]
    }
}

// ---------------------------------------------------------------------------
// Alert State
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Idle,
    Alert,
}

impl AlertState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Alert)
    }
}

/// Edge produced by the alert state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// IDLE → ALERT
    Raised,
    /// ALERT → IDLE
    Cleared,
}

impl AlertTransition {
    /// State entered by this transition.
    pub fn target(&self) -> AlertState {
        match self {
            Self::Raised => AlertState::Alert,
            Self::Cleared => AlertState::Idle,
        }
    }
}

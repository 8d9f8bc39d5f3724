use crate::Header;
use serde::{Deserialize, Serialize};

/// Lander-level fault codes carried by [`SystemFaults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum SystemFaultCode {
    None = 0,
    SystemError = 1,
    ArmGoalError = 2,
    ArmExecutionError = 4,
    TaskGoalError = 8,
    CamGoalError = 16,
    CamExecutionError = 32,
    PtGoalError = 64,
    PtExecutionError = 128,
    LanderExecutionError = 256,
    PowerSystemFault = 512,
}

/// Arm-specific fault codes carried by [`ArmFaults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ArmFaultCode {
    None = 0,
    Hardware = 1,
    TrajectoryGeneration = 2,
    Collision = 3,
    EStop = 4,
    PositionLimit = 5,
    TorqueLimit = 6,
    VelocityLimit = 7,
    NoForceData = 8,
}

impl SystemFaultCode {
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl ArmFaultCode {
    pub fn value(self) -> i32 {
        self as i32
    }
}

/// System fault indicator published on every telemetry update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemFaults {
    pub header: Header,
    pub value: i32,
}

/// Arm fault indicator published on every telemetry update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmFaults {
    pub header: Header,
    pub value: i32,
}

impl SystemFaults {
    pub fn new(header: Header, code: SystemFaultCode) -> Self {
        Self {
            header,
            value: code.value(),
        }
    }
}

impl ArmFaults {
    pub fn new(header: Header, code: ArmFaultCode) -> Self {
        Self {
            header,
            value: code.value(),
        }
    }
}

/// Single synthesized power subsystem reading (percent or degrees C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerFaultValue {
    pub data: f64,
}

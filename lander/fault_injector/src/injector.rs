//! Fault relay between the simulated joint state stream and the rest of the
//! lander dataflow.

use eyre::Result;
use fault_sim_lib::{
    ArmFaultCode, ArmFaults, FaultInjectorConfig, FaultRandom, FaultsConfig, Header,
    JointIndexTable, JointStateMessage, PowerFaultValue, SystemFaultCode, SystemFaults,
    JOINT_FAULT_TABLE,
};
use serde::Serialize;
use tracing::{debug, info, warn};

pub const OUTPUT_JOINT_STATES: &str = "joint_states";
pub const OUTPUT_SYSTEM_FAULTS: &str = "system_faults_status";
pub const OUTPUT_ARM_FAULTS: &str = "arm_faults_status";
pub const OUTPUT_STATE_OF_CHARGE: &str = "power_fault_state_of_charge";
pub const OUTPUT_TEMP_INCREASE: &str = "power_fault_temp_increase";

/// One message the node has to publish.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    StateOfCharge(PowerFaultValue),
    TemperatureIncrease(PowerFaultValue),
    JointStates(JointStateMessage),
    SystemFaults(SystemFaults),
    ArmFaults(ArmFaults),
}

impl RelayMessage {
    pub fn output_id(&self) -> &'static str {
        match self {
            RelayMessage::StateOfCharge(_) => OUTPUT_STATE_OF_CHARGE,
            RelayMessage::TemperatureIncrease(_) => OUTPUT_TEMP_INCREASE,
            RelayMessage::JointStates(_) => OUTPUT_JOINT_STATES,
            RelayMessage::SystemFaults(_) => OUTPUT_SYSTEM_FAULTS,
            RelayMessage::ArmFaults(_) => OUTPUT_ARM_FAULTS,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
            Ok(serde_json::to_vec(value)?)
        }

        match self {
            RelayMessage::StateOfCharge(value) | RelayMessage::TemperatureIncrease(value) => {
                encode(value)
            }
            RelayMessage::JointStates(msg) => encode(msg),
            RelayMessage::SystemFaults(msg) => encode(msg),
            RelayMessage::ArmFaults(msg) => encode(msg),
        }
    }
}

/// Everything produced by one telemetry update.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayOutput {
    /// Power fault readings, in the order their flags were evaluated
    pub power: Vec<RelayMessage>,
    pub joint_states: JointStateMessage,
    pub system_faults: SystemFaults,
    pub arm_faults: ArmFaults,
}

impl RelayOutput {
    /// Messages in publish order: power readings first, then joint states,
    /// system faults and arm faults.
    pub fn into_messages(self) -> Vec<RelayMessage> {
        let mut messages = self.power;
        messages.push(RelayMessage::JointStates(self.joint_states));
        messages.push(RelayMessage::SystemFaults(self.system_faults));
        messages.push(RelayMessage::ArmFaults(self.arm_faults));
        messages
    }

    pub fn state_of_charge(&self) -> Vec<f64> {
        self.power
            .iter()
            .filter_map(|m| match m {
                RelayMessage::StateOfCharge(v) => Some(v.data),
                _ => None,
            })
            .collect()
    }

    pub fn temperature_increase(&self) -> Option<f64> {
        self.power.iter().find_map(|m| match m {
            RelayMessage::TemperatureIncrease(v) => Some(v.data),
            _ => None,
        })
    }
}

/// Injects sensor and power faults into the joint state stream.
pub struct FaultInjector<R: FaultRandom> {
    config: FaultInjectorConfig,
    faults: FaultsConfig,
    joint_indices: JointIndexTable,
    thermal_overload: Option<f64>,
    random: R,
}

impl<R: FaultRandom> FaultInjector<R> {
    pub fn new(config: FaultInjectorConfig, random: R) -> Self {
        Self {
            faults: config.initial_faults,
            config,
            joint_indices: JointIndexTable::new(),
            thermal_overload: None,
            random,
        }
    }

    pub fn faults(&self) -> &FaultsConfig {
        &self.faults
    }

    pub fn thermal_overload(&self) -> Option<f64> {
        self.thermal_overload
    }

    /// Replace the stored fault flags with a new operator snapshot.
    pub fn handle_configuration_update(&mut self, faults: FaultsConfig) {
        if faults != self.faults {
            info!("Fault configuration updated: {:?}", faults.active_faults());
        }
        self.faults = faults;
    }

    /// Apply the current fault flags to one joint state message.
    ///
    /// Fails only when the message arrays are inconsistent, in which case
    /// nothing is mutated and the update should be dropped.
    pub fn handle_telemetry_update(&mut self, msg: &JointStateMessage) -> Result<RelayOutput> {
        msg.validate()?;

        if !self.joint_indices.is_built() {
            let missing = self.joint_indices.build_from(msg);
            for joint in missing {
                warn!(
                    "Joint {} not found in joint states, its faults will never fire",
                    joint.telemetry_name()
                );
            }
        }

        let faults = self.faults;
        let mut output = msg.clone();
        let mut system_fault = SystemFaultCode::None;
        let mut arm_fault = ArmFaultCode::None;

        // Later joints overwrite the same two codes
        for entry in &JOINT_FAULT_TABLE {
            let Some(index) = self.joint_indices.index_of(entry.joint) else {
                continue;
            };

            let encoder = (entry.encoder_failure)(&faults) && zero_at(&mut output.position, index);
            let torque =
                (entry.torque_sensor_failure)(&faults) && zero_at(&mut output.effort, index);

            if encoder || torque {
                system_fault = SystemFaultCode::ArmExecutionError;
                if entry.is_arm_joint() {
                    arm_fault = ArmFaultCode::Hardware;
                }
            }
        }

        let power = self.power_faults(&faults);

        let header = Header::now(&self.config.frame_id);
        let output = RelayOutput {
            power,
            joint_states: output,
            system_faults: SystemFaults::new(header.clone(), system_fault),
            arm_faults: ArmFaults::new(header, arm_fault),
        };

        debug!(
            "Relayed {} joints (system fault {}, arm fault {}, {} power readings)",
            msg.len(),
            output.system_faults.value,
            output.arm_faults.value,
            output.power.len()
        );

        Ok(output)
    }

    fn power_faults(&mut self, faults: &FaultsConfig) -> Vec<RelayMessage> {
        let mut power = Vec::new();

        if faults.low_state_of_charge_power_failure {
            power.push(RelayMessage::StateOfCharge(PowerFaultValue {
                data: self.config.low_state_of_charge,
            }));
        }

        if faults.instantaneous_capacity_loss_power_failure {
            power.push(RelayMessage::StateOfCharge(PowerFaultValue {
                data: self.config.instantaneous_capacity_loss_state_of_charge,
            }));
        }

        if faults.thermal_power_failure {
            let temperature = match self.thermal_overload {
                Some(temperature) => temperature,
                None => {
                    let temperature = self
                        .random
                        .random_range(self.config.thermal_overload_range());
                    info!("Thermal overload episode started at {:.1} C", temperature);
                    self.thermal_overload = Some(temperature);
                    temperature
                }
            };
            power.push(RelayMessage::TemperatureIncrease(PowerFaultValue {
                data: temperature,
            }));
        } else {
            self.thermal_overload = None;
        }

        power
    }
}

fn zero_at(values: &mut [f64], index: usize) -> bool {
    match values.get_mut(index) {
        Some(value) => {
            *value = 0.0;
            true
        }
        None => false,
    }
}

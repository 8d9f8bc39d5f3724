use serde::{Deserialize, Serialize};

/// Snapshot of every fault injection switch.
///
/// Pushed by the operator as a whole record. Fields left out of the JSON
/// deserialize as `false`, so a partial record still replaces the previous
/// snapshot entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultsConfig {
    // Antenna
    pub ant_pan_encoder_failure: bool,
    pub ant_pan_torque_sensor_failure: bool,
    pub ant_tilt_encoder_failure: bool,
    pub ant_tilt_torque_sensor_failure: bool,

    // Arm
    pub shou_yaw_encoder_failure: bool,
    pub shou_yaw_torque_sensor_failure: bool,
    pub shou_pitch_encoder_failure: bool,
    pub shou_pitch_torque_sensor_failure: bool,
    pub prox_pitch_encoder_failure: bool,
    pub prox_pitch_torque_sensor_failure: bool,
    pub dist_pitch_encoder_failure: bool,
    pub dist_pitch_torque_sensor_failure: bool,
    pub hand_yaw_encoder_failure: bool,
    pub hand_yaw_torque_sensor_failure: bool,
    pub scoop_yaw_encoder_failure: bool,
    pub scoop_yaw_torque_sensor_failure: bool,

    // Power
    pub low_state_of_charge_power_failure: bool,
    pub instantaneous_capacity_loss_power_failure: bool,
    pub thermal_power_failure: bool,
}

impl FaultsConfig {
    /// Names of the flags currently set, in declaration order.
    pub fn active_faults(&self) -> Vec<&'static str> {
        self.flags()
            .into_iter()
            .filter_map(|(name, active)| active.then_some(name))
            .collect()
    }

    pub fn any_active(&self) -> bool {
        self.flags().iter().any(|(_, active)| *active)
    }

    fn flags(&self) -> [(&'static str, bool); 19] {
        [
            ("ant_pan_encoder_failure", self.ant_pan_encoder_failure),
            ("ant_pan_torque_sensor_failure", self.ant_pan_torque_sensor_failure),
            ("ant_tilt_encoder_failure", self.ant_tilt_encoder_failure),
            ("ant_tilt_torque_sensor_failure", self.ant_tilt_torque_sensor_failure),
            ("shou_yaw_encoder_failure", self.shou_yaw_encoder_failure),
            ("shou_yaw_torque_sensor_failure", self.shou_yaw_torque_sensor_failure),
            ("shou_pitch_encoder_failure", self.shou_pitch_encoder_failure),
            ("shou_pitch_torque_sensor_failure", self.shou_pitch_torque_sensor_failure),
            ("prox_pitch_encoder_failure", self.prox_pitch_encoder_failure),
            ("prox_pitch_torque_sensor_failure", self.prox_pitch_torque_sensor_failure),
            ("dist_pitch_encoder_failure", self.dist_pitch_encoder_failure),
            ("dist_pitch_torque_sensor_failure", self.dist_pitch_torque_sensor_failure),
            ("hand_yaw_encoder_failure", self.hand_yaw_encoder_failure),
            ("hand_yaw_torque_sensor_failure", self.hand_yaw_torque_sensor_failure),
            ("scoop_yaw_encoder_failure", self.scoop_yaw_encoder_failure),
            ("scoop_yaw_torque_sensor_failure", self.scoop_yaw_torque_sensor_failure),
            ("low_state_of_charge_power_failure", self.low_state_of_charge_power_failure),
            (
                "instantaneous_capacity_loss_power_failure",
                self.instantaneous_capacity_loss_power_failure,
            ),
            ("thermal_power_failure", self.thermal_power_failure),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_active_faults() {
        let faults = FaultsConfig::default();
        assert!(!faults.any_active());
        assert!(faults.active_faults().is_empty());
    }

    #[test]
    fn test_partial_json_defaults_missing_flags_to_false() {
        let json = r#"{"shou_yaw_encoder_failure": true, "thermal_power_failure": true}"#;
        let faults: FaultsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            faults.active_faults(),
            vec!["shou_yaw_encoder_failure", "thermal_power_failure"]
        );
    }
}

//! Logical lander joints and their mapping onto joint state telemetry.

use crate::{FaultsConfig, JointStateMessage};

/// Joints the fault injector knows how to break, in fault evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    AntPan,
    AntTilt,
    ShouYaw,
    ShouPitch,
    ProxPitch,
    DistPitch,
    HandYaw,
    ScoopYaw,
}

impl Joint {
    pub const COUNT: usize = 8;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::AntPan,
        Joint::AntTilt,
        Joint::ShouYaw,
        Joint::ShouPitch,
        Joint::ProxPitch,
        Joint::DistPitch,
        Joint::HandYaw,
        Joint::ScoopYaw,
    ];

    /// Name used for this joint in joint state telemetry.
    pub fn telemetry_name(self) -> &'static str {
        match self {
            Joint::AntPan => "j_ant_pan",
            Joint::AntTilt => "j_ant_tilt",
            Joint::ShouYaw => "j_shou_yaw",
            Joint::ShouPitch => "j_shou_pitch",
            Joint::ProxPitch => "j_prox_pitch",
            Joint::DistPitch => "j_dist_pitch",
            Joint::HandYaw => "j_hand_yaw",
            Joint::ScoopYaw => "j_scoop_yaw",
        }
    }

    /// Everything except the antenna pan/tilt unit belongs to the arm.
    pub fn is_arm_joint(self) -> bool {
        !matches!(self, Joint::AntPan | Joint::AntTilt)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Reads one flag out of a [`FaultsConfig`].
pub type FlagSelector = fn(&FaultsConfig) -> bool;

/// Sensor failure switches for one joint.
#[derive(Debug, Clone, Copy)]
pub struct JointFaultEntry {
    pub joint: Joint,
    pub encoder_failure: FlagSelector,
    pub torque_sensor_failure: FlagSelector,
}

impl JointFaultEntry {
    pub fn is_arm_joint(&self) -> bool {
        self.joint.is_arm_joint()
    }
}

/// Sensor failure flags per joint, iterated in [`Joint::ALL`] order.
pub const JOINT_FAULT_TABLE: [JointFaultEntry; Joint::COUNT] = [
    JointFaultEntry {
        joint: Joint::AntPan,
        encoder_failure: |f| f.ant_pan_encoder_failure,
        torque_sensor_failure: |f| f.ant_pan_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::AntTilt,
        encoder_failure: |f| f.ant_tilt_encoder_failure,
        torque_sensor_failure: |f| f.ant_tilt_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::ShouYaw,
        encoder_failure: |f| f.shou_yaw_encoder_failure,
        torque_sensor_failure: |f| f.shou_yaw_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::ShouPitch,
        encoder_failure: |f| f.shou_pitch_encoder_failure,
        torque_sensor_failure: |f| f.shou_pitch_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::ProxPitch,
        encoder_failure: |f| f.prox_pitch_encoder_failure,
        torque_sensor_failure: |f| f.prox_pitch_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::DistPitch,
        encoder_failure: |f| f.dist_pitch_encoder_failure,
        torque_sensor_failure: |f| f.dist_pitch_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::HandYaw,
        encoder_failure: |f| f.hand_yaw_encoder_failure,
        torque_sensor_failure: |f| f.hand_yaw_torque_sensor_failure,
    },
    JointFaultEntry {
        joint: Joint::ScoopYaw,
        encoder_failure: |f| f.scoop_yaw_encoder_failure,
        torque_sensor_failure: |f| f.scoop_yaw_torque_sensor_failure,
    },
];

/// Offsets of the logical joints inside incoming telemetry arrays.
///
/// Built once from the first telemetry message and never rebuilt; the joint
/// list is assumed stable for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct JointIndexTable {
    indices: Option<[Option<usize>; Joint::COUNT]>,
}

impl JointIndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.indices.is_some()
    }

    /// Populate the table from `msg` if it is still empty.
    ///
    /// Returns the joints that could not be found, which is empty when the
    /// table was already built.
    pub fn build_from(&mut self, msg: &JointStateMessage) -> Vec<Joint> {
        if self.is_built() {
            return Vec::new();
        }

        let mut indices = [None; Joint::COUNT];
        for joint in Joint::ALL {
            indices[joint.slot()] = msg.position_of(joint.telemetry_name());
        }
        self.indices = Some(indices);

        Joint::ALL
            .into_iter()
            .filter(|joint| indices[joint.slot()].is_none())
            .collect()
    }

    /// Cached telemetry offset for `joint`, if it was present.
    pub fn index_of(&self, joint: Joint) -> Option<usize> {
        self.indices.and_then(|indices| indices[joint.slot()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_follows_joint_order() {
        for (entry, joint) in JOINT_FAULT_TABLE.iter().zip(Joint::ALL) {
            assert_eq!(entry.joint, joint);
        }
    }

    #[test]
    fn test_selectors_read_matching_flags() {
        let faults = FaultsConfig {
            hand_yaw_torque_sensor_failure: true,
            ..Default::default()
        };

        for entry in &JOINT_FAULT_TABLE {
            assert!(!(entry.encoder_failure)(&faults));
            assert_eq!(
                (entry.torque_sensor_failure)(&faults),
                entry.joint == Joint::HandYaw
            );
        }
    }

    #[test]
    fn test_antenna_joints_are_not_arm_joints() {
        let arm: Vec<Joint> = Joint::ALL.into_iter().filter(|j| j.is_arm_joint()).collect();
        assert_eq!(arm.len(), 6);
        assert!(!Joint::AntPan.is_arm_joint());
        assert!(!Joint::AntTilt.is_arm_joint());
    }

    #[test]
    fn test_build_maps_shuffled_names() {
        let msg = JointStateMessage::zeroed(&[
            "j_scoop_yaw",
            "j_ant_tilt",
            "j_hand_yaw",
            "j_shou_yaw",
            "j_ant_pan",
            "j_dist_pitch",
            "j_prox_pitch",
            "j_shou_pitch",
        ]);
        let mut table = JointIndexTable::new();
        let missing = table.build_from(&msg);

        assert!(missing.is_empty());
        assert_eq!(table.index_of(Joint::ScoopYaw), Some(0));
        assert_eq!(table.index_of(Joint::ShouYaw), Some(3));
        assert_eq!(table.index_of(Joint::ShouPitch), Some(7));
    }

    #[test]
    fn test_build_only_once() {
        let mut table = JointIndexTable::new();
        assert_eq!(table.index_of(Joint::AntPan), None);

        let missing = table.build_from(&JointStateMessage::zeroed(&["j_ant_pan"]));
        assert_eq!(missing.len(), Joint::COUNT - 1);
        assert!(table.is_built());

        // Later messages never refresh the cached offsets
        let missing = table.build_from(&JointStateMessage::zeroed(&["j_ant_tilt", "j_ant_pan"]));
        assert!(missing.is_empty());
        assert_eq!(table.index_of(Joint::AntPan), Some(0));
        assert_eq!(table.index_of(Joint::AntTilt), None);
    }
}

use eyre::Result;
use serde::{Deserialize, Serialize};

/// Stamp and reference frame attached to every published message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Milliseconds since Unix epoch
    pub stamp: i64,
    pub frame_id: String,
}

impl Header {
    /// Header stamped with the current wall-clock time.
    pub fn now(frame_id: &str) -> Self {
        Self {
            stamp: chrono::Utc::now().timestamp_millis(),
            frame_id: frame_id.to_string(),
        }
    }
}

/// Joint state telemetry as published by the lander simulation.
///
/// `name`, `position` and `effort` are parallel arrays. `velocity` is either
/// empty or parallel as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointStateMessage {
    #[serde(default)]
    pub header: Header,
    pub name: Vec<String>,
    pub position: Vec<f64>,
    #[serde(default)]
    pub velocity: Vec<f64>,
    pub effort: Vec<f64>,
}

impl JointStateMessage {
    /// Message with the given joint names and every value at zero.
    pub fn zeroed(names: &[&str]) -> Self {
        let dof = names.len();
        Self {
            header: Header::default(),
            name: names.iter().map(|n| n.to_string()).collect(),
            position: vec![0.0; dof],
            velocity: vec![0.0; dof],
            effort: vec![0.0; dof],
        }
    }

    pub fn len(&self) -> usize {
        self.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Offset of `joint_name` in the name list, first match wins.
    pub fn position_of(&self, joint_name: &str) -> Option<usize> {
        self.name.iter().position(|n| n == joint_name)
    }

    /// Check that the per-joint arrays line up with the name list.
    pub fn validate(&self) -> Result<()> {
        let dof = self.name.len();

        if self.position.len() != dof {
            return Err(eyre::eyre!(
                "Position count ({}) doesn't match joint name count ({})",
                self.position.len(),
                dof
            ));
        }

        if self.effort.len() != dof {
            return Err(eyre::eyre!(
                "Effort count ({}) doesn't match joint name count ({})",
                self.effort.len(),
                dof
            ));
        }

        if !self.velocity.is_empty() && self.velocity.len() != dof {
            return Err(eyre::eyre!(
                "Velocity count ({}) doesn't match joint name count ({})",
                self.velocity.len(),
                dof
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_parallel_arrays() {
        let msg = JointStateMessage::zeroed(&["j_ant_pan", "j_ant_tilt"]);
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_missing_velocity() {
        let mut msg = JointStateMessage::zeroed(&["j_ant_pan", "j_ant_tilt"]);
        msg.velocity.clear();
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut msg = JointStateMessage::zeroed(&["j_ant_pan", "j_ant_tilt"]);
        msg.position.pop();
        assert!(msg.validate().is_err());

        let mut msg = JointStateMessage::zeroed(&["j_ant_pan", "j_ant_tilt"]);
        msg.effort.push(1.0);
        assert!(msg.validate().is_err());

        let mut msg = JointStateMessage::zeroed(&["j_ant_pan", "j_ant_tilt"]);
        msg.velocity.pop();
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_position_of_first_match_wins() {
        let msg = JointStateMessage::zeroed(&["a", "b", "a"]);
        assert_eq!(msg.position_of("a"), Some(0));
        assert_eq!(msg.position_of("b"), Some(1));
        assert_eq!(msg.position_of("c"), None);
    }

    #[test]
    fn test_deserialize_without_header_or_velocity() {
        let json = r#"{"name":["j_shou_yaw"],"position":[0.4],"effort":[1.5]}"#;
        let msg: JointStateMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.header, Header::default());
        assert!(msg.velocity.is_empty());
        assert!(msg.validate().is_ok());
    }
}

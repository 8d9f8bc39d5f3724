pub mod config;
pub mod fault_status;
pub mod faults_config;
pub mod joint_state;
pub mod joints;

pub use config::*;
pub use fault_status::*;
pub use faults_config::*;
pub use joint_state::*;
pub use joints::*;

pub mod random;
pub mod tracing;

pub use self::random::*;
pub use self::tracing::*;

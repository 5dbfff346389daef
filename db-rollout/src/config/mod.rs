mod types;

pub use types::RolloutConfig;

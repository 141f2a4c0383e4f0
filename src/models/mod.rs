pub mod commodity;
pub mod monitor_state;

// Re-exports for convenience
pub use commodity::*;
pub use monitor_state::*;

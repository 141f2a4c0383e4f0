pub mod alert;
pub mod state_store;

pub use alert::{AlertContext, AlertDecision, Evaluation, evaluate};
pub use state_store::{JsonStateStore, StateStore};

pub mod config;
pub mod error;
pub mod kernel;
pub mod outputs;
pub mod services;

// Re-export specific items for convenient access
pub use config::SimConfig;
pub use kernel::engine::Engine;
pub use kernel::phase::Phase;
pub use kernel::reactor::{Reactor, SimulatorHandle};
pub use kernel::scenario::{CallRequest, Scenario};
pub use services::decision::types::CallResponse;

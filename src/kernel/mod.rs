pub mod cancel;
pub mod engine;
pub mod event;
pub mod phase;
pub mod reactor;
pub mod scenario;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod time;
pub mod view;

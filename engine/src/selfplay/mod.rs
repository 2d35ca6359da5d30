
pub mod arbiter;
pub mod buffer;
pub mod config;
pub mod coordinator;
pub mod example;
pub mod exploration;
pub mod orchestrator;
pub mod symmetry;

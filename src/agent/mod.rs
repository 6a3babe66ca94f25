//! Analysis agents.
//!
//! This module provides the agent capability traits, the local heuristic
//! specialists, the Ollama-backed specialist and the registry that wires
//! them to dimensions.

pub mod heuristic;
pub mod ollama;
pub mod registry;
pub mod traits;

pub use registry::AgentRegistry;

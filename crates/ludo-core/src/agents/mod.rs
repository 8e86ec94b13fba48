//! Agents - expert catalog, panel selection and prompt rendering
//!
//! # Module Structure
//!
//! - `registry`: `AgentId`, `AgentProfile` and the fixed `AgentRegistry`
//! - `selector`: `RoutingTable` data and the `AgentSelector`
//! - `prompt`: `PromptBuilder` and the context renderer

mod prompt;
mod registry;
mod selector;

pub use prompt::{render_context, PromptBuilder};
pub use registry::{AgentCard, AgentId, AgentProfile, AgentRegistry, PromptTemplate};
pub use selector::{AgentSelector, RoutingTable};

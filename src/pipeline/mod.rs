//! The seven-step content pipeline.
//!
//! - [`step`] - the ordered steps and their kinds
//! - [`context`] - the channel, platforms and action picked on steps 1-3
//! - [`graph`] - which assets are derived from which
//! - [`invalidation`] - clearing derived assets on regeneration
//! - [`controller`] - the state machine tying it all together

pub mod context;
pub mod controller;
pub mod graph;
pub mod invalidation;
pub mod step;

pub use context::Selection;
pub use controller::{
    Advance, Completion, Confirmation, Finalized, GenerationTicket, PipelineController,
    RegeneratePlan, StepState,
};
pub use graph::{DependencyGraph, DependencyGraphBuilder, STEP_DEPENDENCIES};
pub use invalidation::InvalidationManager;
pub use step::{PipelineStep, StepKind};

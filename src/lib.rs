//! Stagecraft - Staged content generation with versioned assets.
//!
//! Stagecraft walks a session through a fixed seven-step pipeline: three
//! selections (channel, platforms, action), three generated assets that
//! build on one another, and a review step that packages and exports the
//! result. Every asset keeps its full version history, and regenerating an
//! upstream asset clears whatever was derived from it.
//!
//! # Modules
//!
//! - [`assets`] - Versioned asset storage
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`diff`] - Line-level text diffing
//! - [`error`] - Error types and result aliases
//! - [`export`] - Content packages and their text formats
//! - [`gateway`] - Content generators (offline mock and HTTP)
//! - [`library`] - Storage for finished packages
//! - [`pipeline`] - Steps, dependency graph, and the session controller
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use stagecraft::gateway::MockGateway;
//! use stagecraft::pipeline::{PipelineController, PipelineStep};
//!
//! let gateway = MockGateway::new();
//! let mut session = PipelineController::new();
//! session.select_channel("social").unwrap();
//! session.advance(&gateway).unwrap();
//! session.set_platforms(["twitter"]).unwrap();
//! session.advance(&gateway).unwrap();
//! session.select_action("announce").unwrap();
//!
//! // Entering the first asset step generates it.
//! let advance = session.advance(&gateway).unwrap();
//! assert_eq!(advance.step, PipelineStep::Generate);
//! assert!(session.store().has_content(PipelineStep::Generate));
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod export;
pub mod gateway;
pub mod library;
pub mod pipeline;
pub mod ui;

pub use error::{Result, StagecraftError};

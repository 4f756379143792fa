//! # aipm core
//!
//! The requirement pipeline: a five-step progression that turns a free-text
//! product idea into a clarifying questionnaire, a structured requirement
//! document, and a set of AI-coding prompts.
//!
//! Each generation stage makes one attempt against the remote service and
//! falls back to a deterministic local generator on any transport or
//! validation failure, so the pipeline always completes.

pub mod config;
pub mod fallback;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod stage;

pub use config::AipmConfig;
pub use model::{
    AnalysisResult, AnswerSet, AnswerValue, CodePromptSet, DocumentKind, Provenance, Requirement,
    RequirementDocument, StageOutcome,
};
pub use pipeline::{PipelineError, PipelineState, PipelineStep, StepArtifact};
pub use stage::{AnalysisStage, DocumentStage, PromptStage};

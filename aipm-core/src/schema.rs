//! Validation of remote stage replies.
//!
//! Each stage expects the completion text to be a JSON object matching its
//! result schema. Parsing is a total function over the closed set of stage
//! shapes: it either yields the stage result (with documented defaults
//! filled in for absent optional fields) or a [`ValidationError`] that the
//! stage controller turns into a fallback run. No other field is altered.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    AnalysisResult, CodePromptSection, CodePromptSet, DocumentMetadata, DocumentSection, Question,
    RequirementDocument,
};

/// Why a remote reply was rejected
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The completion text is not parseable JSON, or does not match the
    /// stage's result shape.
    #[error("Response is not valid stage JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Well-formed reply with a zero-length document. An empty document
    /// carries no information for the user, so the document stage treats
    /// it like a parse failure.
    #[error("Response contained an empty document")]
    EmptyDocument,
}

/// Default analysis summary when the reply omits one
pub const DEFAULT_ANALYSIS_SUMMARY: &str = "基于您的需求，我已生成了相关问题";

/// Default confidence when the reply omits one
pub const DEFAULT_CONFIDENCE: f32 = 0.8;

/// Default tech stack when the reply omits one
pub const DEFAULT_TECH_STACK: [&str; 2] = ["React", "TypeScript"];

/// Default time estimate when the reply omits one
pub const DEFAULT_ESTIMATED_TIME: &str = "2-4周";

#[derive(Deserialize)]
struct AnalysisWire {
    #[serde(default)]
    questions: Option<Vec<Question>>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Deserialize)]
struct DocumentWire {
    #[serde(default)]
    document: Option<Vec<DocumentSection>>,
    #[serde(default)]
    metadata: Option<DocumentMetadata>,
}

#[derive(Deserialize)]
struct CodePromptWire {
    #[serde(default)]
    prompts: Option<Vec<CodePromptSection>>,
    #[serde(rename = "techStack", default)]
    tech_stack: Option<Vec<String>>,
    #[serde(rename = "estimatedTime", default)]
    estimated_time: Option<String>,
}

/// Parse a remote reply into an analysis result.
///
/// An empty `questions` array is accepted as valid: the generation simply
/// yielded nothing.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, ValidationError> {
    let wire: AnalysisWire = serde_json::from_str(raw)?;

    Ok(AnalysisResult {
        questions: wire.questions.unwrap_or_default(),
        analysis: wire
            .analysis
            .unwrap_or_else(|| DEFAULT_ANALYSIS_SUMMARY.to_string()),
        confidence: wire.confidence.unwrap_or(DEFAULT_CONFIDENCE),
    })
}

/// Parse a remote reply into a requirement document.
///
/// Unlike the other stages, a well-formed reply with an empty `document`
/// array is rejected with [`ValidationError::EmptyDocument`].
pub fn parse_document(raw: &str) -> Result<RequirementDocument, ValidationError> {
    let wire: DocumentWire = serde_json::from_str(raw)?;

    let document = wire.document.unwrap_or_default();
    if document.is_empty() {
        return Err(ValidationError::EmptyDocument);
    }

    Ok(RequirementDocument {
        document,
        metadata: wire.metadata.unwrap_or_else(|| DocumentMetadata {
            generated_at: Utc::now(),
            version: "1.0".to_string(),
            word_count: 0,
        }),
    })
}

/// Parse a remote reply into a code-prompt set.
///
/// An empty `prompts` array is accepted as valid.
pub fn parse_code_prompts(raw: &str) -> Result<CodePromptSet, ValidationError> {
    let wire: CodePromptWire = serde_json::from_str(raw)?;

    Ok(CodePromptSet {
        prompts: wire.prompts.unwrap_or_default(),
        tech_stack: wire
            .tech_stack
            .unwrap_or_else(|| DEFAULT_TECH_STACK.iter().map(|s| s.to_string()).collect()),
        estimated_time: wire
            .estimated_time
            .unwrap_or_else(|| DEFAULT_ESTIMATED_TIME.to_string()),
    })
}

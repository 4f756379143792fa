//! Domain data model for the requirement pipeline.
//!
//! Wire-facing structs use the field names of the remote stage schemas
//! (`generatedAt`, `techStack`, tagged `type` fields) so a well-formed
//! remote reply deserializes verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to an uploaded file. Only the metadata is used, as a prompting
/// hint; the content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Media type (e.g., "image/png")
    pub media_type: String,
}

/// The user's free-text product idea, immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    text: String,
    files: Vec<FileRef>,
}

impl Requirement {
    /// Create a requirement from free text
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            files: Vec::new(),
        }
    }

    /// Attach uploaded-file references
    pub fn with_files(mut self, files: Vec<FileRef>) -> Self {
        self.files = files;
        self
    }

    /// The requirement text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// References to uploaded files
    pub fn files(&self) -> &[FileRef] {
        &self.files
    }
}

/// Kind of question and expected answer shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Single choice from the options list
    Single,
    /// Multiple choices from the options list
    Multiple,
    /// Free-text answer
    Text,
}

impl QuestionKind {
    /// Whether this kind requires an options list
    pub fn needs_options(self) -> bool {
        matches!(self, QuestionKind::Single | QuestionKind::Multiple)
    }
}

/// A clarifying question produced by the analysis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within a question set
    pub id: String,
    /// Kind of answer expected
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Category label shown alongside the question
    pub category: String,
    /// The question text
    pub question: String,
    /// Additional description or help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered options for choice kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Whether an answer is required
    pub required: bool,
}

/// Answer to a single question; the shape depends on the question kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Answer to a single-choice or free-text question
    Text(String),
    /// Ordered selection for a multi-choice question
    Choices(Vec<String>),
}

/// Mapping from question id to answer, built by the presentation layer and
/// consumed as a single opaque input by the document stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer
    pub fn insert<S: Into<String>>(&mut self, question_id: S, answer: AnswerValue) {
        self.answers.insert(question_id.into(), answer);
    }

    /// Raw answer for a question, if any
    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    /// Text answer for a question, if present and textual
    pub fn text(&self, question_id: &str) -> Option<&str> {
        match self.answers.get(question_id) {
            Some(AnswerValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Choice list for a question, if present and multi-valued
    pub fn choices(&self, question_id: &str) -> Option<&[String]> {
        match self.answers.get(question_id) {
            Some(AnswerValue::Choices(choices)) => Some(choices.as_slice()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }
}

/// Result of the requirement-analysis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ordered clarifying questions
    pub questions: Vec<Question>,
    /// Analysis summary shown to the user
    pub analysis: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl AnalysisResult {
    /// Validate the question set: non-empty ids and texts, no duplicate
    /// ids, options present for choice kinds.
    pub fn validate(&self) -> Result<(), String> {
        let mut question_ids = std::collections::HashSet::new();
        for (index, question) in self.questions.iter().enumerate() {
            if question.id.is_empty() {
                return Err(format!("Question at index {} has empty ID", index));
            }

            if question.question.is_empty() {
                return Err(format!(
                    "Question '{}' at index {} has empty text",
                    question.id, index
                ));
            }

            if !question_ids.insert(question.id.clone()) {
                return Err(format!("Duplicate question ID: {}", question.id));
            }

            if question.kind.needs_options()
                && question.options.as_ref().map_or(true, |o| o.is_empty())
            {
                return Err(format!(
                    "Question '{}' of kind {:?} requires at least one option",
                    question.id, question.kind
                ));
            }
        }

        Ok(())
    }
}

/// Kind of requirement document to generate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Market requirement document
    #[default]
    #[serde(rename = "MRD")]
    Mrd,
    /// Product requirement document
    #[serde(rename = "PRD")]
    Prd,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Mrd => write!(f, "MRD"),
            DocumentKind::Prd => write!(f, "PRD"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MRD" => Ok(DocumentKind::Mrd),
            "PRD" => Ok(DocumentKind::Prd),
            other => Err(format!("Unknown document kind: {other} (expected MRD or PRD)")),
        }
    }
}

/// One section of the requirement document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Stable section id (e.g., "overview")
    pub id: String,
    /// Section heading
    pub title: String,
    /// Markdown body
    pub content: String,
    /// Whether the presentation layer lets the user edit this section
    #[serde(default = "default_editable")]
    pub editable: bool,
}

fn default_editable() -> bool {
    true
}

/// Metadata attached to a generated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Generation timestamp
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    /// Document format version
    pub version: String,
    /// Approximate content length
    #[serde(rename = "wordCount")]
    pub word_count: u32,
}

/// Result of the document-generation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementDocument {
    /// Ordered document sections
    pub document: Vec<DocumentSection>,
    /// Generation metadata
    pub metadata: DocumentMetadata,
}

impl RequirementDocument {
    /// Look up a section by id
    pub fn section(&self, id: &str) -> Option<&DocumentSection> {
        self.document.iter().find(|section| section.id == id)
    }
}

/// Kind of code-generation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    System,
    Functional,
    Technical,
    Structure,
}

/// One code-generation prompt section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePromptSection {
    /// Stable prompt id (e.g., "system_prompt")
    pub id: String,
    /// Prompt heading
    pub title: String,
    /// Prompt body
    pub content: String,
    /// Prompt kind
    #[serde(rename = "type")]
    pub kind: PromptKind,
}

/// Result of the code-prompt stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePromptSet {
    /// Ordered prompt sections
    pub prompts: Vec<CodePromptSection>,
    /// Detected technology stack
    #[serde(rename = "techStack")]
    pub tech_stack: Vec<String>,
    /// Estimated implementation time
    #[serde(rename = "estimatedTime")]
    pub estimated_time: String,
}

impl CodePromptSet {
    /// All prompt sections joined into one markdown string, the shape the
    /// presentation layer copies and downloads.
    pub fn combined(&self) -> String {
        self.prompts
            .iter()
            .map(|prompt| format!("## {}\n\n{}", prompt.title, prompt.content))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

/// Whether a stage artifact came from the remote service or the local
/// fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Remote,
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Remote => write!(f, "remote"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

/// A completed stage's artifact plus its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome<T> {
    /// The normalized stage result
    pub artifact: T,
    /// Where the artifact came from
    pub provenance: Provenance,
}

impl<T> StageOutcome<T> {
    pub fn remote(artifact: T) -> Self {
        Self {
            artifact,
            provenance: Provenance::Remote,
        }
    }

    pub fn fallback(artifact: T) -> Self {
        Self {
            artifact,
            provenance: Provenance::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

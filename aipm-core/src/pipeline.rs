//! Pipeline sequencing.
//!
//! The pipeline is a strict five-step progression; each step's artifact is
//! stored before the pipeline moves on, and a reset invalidates any result
//! still in flight by bumping the generation counter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    AnalysisResult, AnswerSet, CodePromptSet, Requirement, RequirementDocument, StageOutcome,
};

/// A step in the pipeline, in progression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Requirement intake
    Requirement,
    /// Questionnaire generation and answering
    Questionnaire,
    /// Requirement-document generation
    Document,
    /// Code-prompt generation
    CodePrompts,
    /// Terminal demo step; no artifact is produced here
    Demo,
}

impl PipelineStep {
    /// One-based step number shown to the user
    pub fn number(self) -> u8 {
        match self {
            PipelineStep::Requirement => 1,
            PipelineStep::Questionnaire => 2,
            PipelineStep::Document => 3,
            PipelineStep::CodePrompts => 4,
            PipelineStep::Demo => 5,
        }
    }

    /// The following step, if any
    pub fn next(self) -> Option<PipelineStep> {
        match self {
            PipelineStep::Requirement => Some(PipelineStep::Questionnaire),
            PipelineStep::Questionnaire => Some(PipelineStep::Document),
            PipelineStep::Document => Some(PipelineStep::CodePrompts),
            PipelineStep::CodePrompts => Some(PipelineStep::Demo),
            PipelineStep::Demo => None,
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStep::Requirement => "requirement",
            PipelineStep::Questionnaire => "questionnaire",
            PipelineStep::Document => "document",
            PipelineStep::CodePrompts => "code_prompts",
            PipelineStep::Demo => "demo",
        };
        write!(f, "{name}")
    }
}

/// The artifact a completed step hands to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum StepArtifact {
    /// The submitted requirement
    Requirement(Requirement),
    /// The analysis outcome plus the user's answers
    Questionnaire {
        analysis: StageOutcome<AnalysisResult>,
        answers: AnswerSet,
    },
    /// The generated requirement document
    Document(StageOutcome<RequirementDocument>),
    /// The generated code prompts
    CodePrompts(StageOutcome<CodePromptSet>),
}

impl StepArtifact {
    /// The step this artifact completes
    pub fn step(&self) -> PipelineStep {
        match self {
            StepArtifact::Requirement(_) => PipelineStep::Requirement,
            StepArtifact::Questionnaire { .. } => PipelineStep::Questionnaire,
            StepArtifact::Document(_) => PipelineStep::Document,
            StepArtifact::CodePrompts(_) => PipelineStep::CodePrompts,
        }
    }
}

/// Why the pipeline refused an artifact
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    /// The artifact completes a step other than the current one. The state
    /// is left untouched.
    #[error("Pipeline is at step {current}, cannot accept an artifact for step {submitted}")]
    OutOfOrder {
        current: PipelineStep,
        submitted: PipelineStep,
    },

    /// The artifact was produced before a reset and is discarded
    #[error("Stale artifact from generation {submitted}, pipeline is at generation {current}")]
    Stale { current: u64, submitted: u64 },
}

/// Pipeline progression state and the artifacts accumulated so far
#[derive(Debug)]
pub struct PipelineState {
    current: Option<PipelineStep>,
    generation: u64,
    requirement: Option<Requirement>,
    questionnaire: Option<(StageOutcome<AnalysisResult>, AnswerSet)>,
    document: Option<StageOutcome<RequirementDocument>>,
    code_prompts: Option<StageOutcome<CodePromptSet>>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            current: Some(PipelineStep::Requirement),
            generation: 0,
            requirement: None,
            questionnaire: None,
            document: None,
            code_prompts: None,
        }
    }

    /// The step awaiting completion; `None` once the pipeline reaches the
    /// terminal demo step.
    pub fn current_step(&self) -> Option<PipelineStep> {
        self.current.filter(|step| *step != PipelineStep::Demo)
    }

    /// Whether the pipeline has reached the terminal step
    pub fn is_complete(&self) -> bool {
        self.current == Some(PipelineStep::Demo)
    }

    /// Current generation, bumped on every reset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accept an artifact for the current step and advance.
    ///
    /// A mismatched artifact leaves the state untouched.
    pub fn advance(&mut self, artifact: StepArtifact) -> Result<PipelineStep, PipelineError> {
        let current = self.current.unwrap_or(PipelineStep::Demo);
        let submitted = artifact.step();
        if submitted != current {
            return Err(PipelineError::OutOfOrder { current, submitted });
        }

        match artifact {
            StepArtifact::Requirement(requirement) => self.requirement = Some(requirement),
            StepArtifact::Questionnaire { analysis, answers } => {
                self.questionnaire = Some((analysis, answers))
            }
            StepArtifact::Document(document) => self.document = Some(document),
            StepArtifact::CodePrompts(prompts) => self.code_prompts = Some(prompts),
        }

        // Every accepting step has a successor
        let next = current.next().unwrap_or(PipelineStep::Demo);
        self.current = Some(next);
        Ok(next)
    }

    /// [`advance`](Self::advance), but reject results started before the
    /// last reset.
    pub fn advance_from(
        &mut self,
        generation: u64,
        artifact: StepArtifact,
    ) -> Result<PipelineStep, PipelineError> {
        if generation != self.generation {
            return Err(PipelineError::Stale {
                current: self.generation,
                submitted: generation,
            });
        }
        self.advance(artifact)
    }

    /// Discard all artifacts and return to the first step. In-flight stage
    /// results from before the reset become stale.
    pub fn reset(&mut self) {
        self.current = Some(PipelineStep::Requirement);
        self.generation += 1;
        self.requirement = None;
        self.questionnaire = None;
        self.document = None;
        self.code_prompts = None;
    }

    pub fn requirement(&self) -> Option<&Requirement> {
        self.requirement.as_ref()
    }

    pub fn analysis(&self) -> Option<&StageOutcome<AnalysisResult>> {
        self.questionnaire.as_ref().map(|(analysis, _)| analysis)
    }

    pub fn answers(&self) -> Option<&AnswerSet> {
        self.questionnaire.as_ref().map(|(_, answers)| answers)
    }

    pub fn document(&self) -> Option<&StageOutcome<RequirementDocument>> {
        self.document.as_ref()
    }

    pub fn code_prompts(&self) -> Option<&StageOutcome<CodePromptSet>> {
        self.code_prompts.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;
    use crate::model::{DocumentMetadata, StageOutcome};
    use chrono::Utc;

    fn requirement() -> Requirement {
        Requirement::new("我想做个浏览器插件")
    }

    fn questionnaire_artifact() -> StepArtifact {
        StepArtifact::Questionnaire {
            analysis: StageOutcome::fallback(fallback::analysis::analyze(&requirement())),
            answers: AnswerSet::new(),
        }
    }

    fn document_artifact() -> StepArtifact {
        let sections = fallback::document::sections(&requirement(), &AnswerSet::new());
        StepArtifact::Document(StageOutcome::fallback(RequirementDocument {
            metadata: DocumentMetadata {
                generated_at: Utc::now(),
                version: "1.0".to_string(),
                word_count: fallback::document::word_count(&sections),
            },
            document: sections,
        }))
    }

    fn prompts_artifact(document: &RequirementDocument) -> StepArtifact {
        StepArtifact::CodePrompts(StageOutcome::fallback(fallback::prompts::generate(document)))
    }

    #[test]
    fn happy_path_advances_through_all_steps() {
        let mut state = PipelineState::new();
        assert_eq!(state.current_step(), Some(PipelineStep::Requirement));

        state
            .advance(StepArtifact::Requirement(requirement()))
            .unwrap();
        assert_eq!(state.current_step(), Some(PipelineStep::Questionnaire));

        state.advance(questionnaire_artifact()).unwrap();
        assert_eq!(state.current_step(), Some(PipelineStep::Document));

        state.advance(document_artifact()).unwrap();
        assert_eq!(state.current_step(), Some(PipelineStep::CodePrompts));

        let document = state.document().unwrap().artifact.clone();
        state.advance(prompts_artifact(&document)).unwrap();

        assert!(state.is_complete());
        assert_eq!(state.current_step(), None);
        assert!(state.requirement().is_some());
        assert!(state.analysis().is_some());
        assert!(state.code_prompts().is_some());
    }

    #[test]
    fn out_of_order_artifact_is_rejected_without_mutation() {
        let mut state = PipelineState::new();

        let err = state.advance(questionnaire_artifact()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::OutOfOrder {
                current: PipelineStep::Requirement,
                submitted: PipelineStep::Questionnaire,
            }
        );
        assert_eq!(state.current_step(), Some(PipelineStep::Requirement));
        assert!(state.analysis().is_none());
    }

    #[test]
    fn completed_pipeline_rejects_further_artifacts() {
        let mut state = PipelineState::new();
        state
            .advance(StepArtifact::Requirement(requirement()))
            .unwrap();
        state.advance(questionnaire_artifact()).unwrap();
        state.advance(document_artifact()).unwrap();
        let document = state.document().unwrap().artifact.clone();
        state.advance(prompts_artifact(&document)).unwrap();

        let err = state
            .advance(StepArtifact::Requirement(requirement()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrder { .. }));
    }

    #[test]
    fn reset_clears_artifacts_and_bumps_generation() {
        let mut state = PipelineState::new();
        state
            .advance(StepArtifact::Requirement(requirement()))
            .unwrap();
        state.advance(questionnaire_artifact()).unwrap();

        state.reset();

        assert_eq!(state.generation(), 1);
        assert_eq!(state.current_step(), Some(PipelineStep::Requirement));
        assert!(state.requirement().is_none());
        assert!(state.analysis().is_none());
    }

    #[test]
    fn stale_results_after_reset_are_rejected() {
        let mut state = PipelineState::new();
        let generation = state.generation();
        state
            .advance_from(generation, StepArtifact::Requirement(requirement()))
            .unwrap();

        // A questionnaire result is in flight when the user starts over.
        state.reset();

        let err = state
            .advance_from(generation, questionnaire_artifact())
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Stale {
                current: 1,
                submitted: 0,
            }
        );
        assert!(state.analysis().is_none());

        state
            .advance_from(state.generation(), StepArtifact::Requirement(requirement()))
            .unwrap();
    }

    #[test]
    fn step_numbers_are_one_based_and_ordered() {
        assert_eq!(PipelineStep::Requirement.number(), 1);
        assert_eq!(PipelineStep::Demo.number(), 5);
        assert_eq!(PipelineStep::CodePrompts.next(), Some(PipelineStep::Demo));
        assert_eq!(PipelineStep::Demo.next(), None);
    }
}

//! Document-generation stage.

use std::sync::Arc;

use aipm_llm_sdk::{CompletionRequest, LlmClient};
use chrono::Utc;

use crate::fallback;
use crate::model::{
    AnswerSet, DocumentKind, DocumentMetadata, Requirement, RequirementDocument, StageOutcome,
};
use crate::schema;

/// Generates the requirement document from the original requirement and the
/// questionnaire answers.
pub struct DocumentStage {
    client: Arc<dyn LlmClient>,
}

impl DocumentStage {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Run the stage: one remote attempt, then the local generator.
    ///
    /// A well-formed remote reply with an empty document is treated like a
    /// validation failure; the other stages accept empty artifacts.
    pub async fn run(
        &self,
        requirement: &Requirement,
        answers: &AnswerSet,
        kind: DocumentKind,
    ) -> anyhow::Result<StageOutcome<RequirementDocument>> {
        let request = CompletionRequest::new(build_prompt(requirement, answers, kind)?)
            .with_system(system_prompt(kind));

        match self.client.complete(request).await {
            Ok(reply) => match schema::parse_document(&reply) {
                Ok(document) => Ok(StageOutcome::remote(document)),
                Err(error) => {
                    tracing::warn!(
                        stage = "document",
                        error = %error,
                        "Remote reply failed validation, using local generator"
                    );
                    Ok(StageOutcome::fallback(local_document(requirement, answers)))
                }
            },
            Err(error) => {
                tracing::warn!(
                    stage = "document",
                    error = %error,
                    "Remote call failed, using local generator"
                );
                Ok(StageOutcome::fallback(local_document(requirement, answers)))
            }
        }
    }
}

fn local_document(requirement: &Requirement, answers: &AnswerSet) -> RequirementDocument {
    let sections = fallback::document::sections(requirement, answers);
    let word_count = fallback::document::word_count(&sections);
    RequirementDocument {
        document: sections,
        metadata: DocumentMetadata {
            generated_at: Utc::now(),
            version: "1.0".to_string(),
            word_count,
        },
    }
}

fn system_prompt(kind: DocumentKind) -> String {
    format!(
        "你是一位专业的产品经理，擅长编写规范的产品需求文档。请根据用户提供的信息生成结构化的{kind}文档。\n\n\
         请以JSON格式返回，包含document数组和metadata对象。document数组中每个元素包含id、title、content字段。"
    )
}

fn build_prompt(
    requirement: &Requirement,
    answers: &AnswerSet,
    kind: DocumentKind,
) -> anyhow::Result<String> {
    let answers_json = serde_json::to_string_pretty(answers)?;

    Ok(format!(
        "请基于以下信息生成一份专业的{kind}文档：\n\n\
         原始需求：\n{requirement}\n\n\
         问答结果：\n{answers_json}\n\n\
         请生成包含以下章节的文档：\n\
         1. 产品概述\n\
         2. 用户场景分析\n\
         3. 功能需求\n\
         4. 性能需求\n\
         5. 实施计划\n\n\
         要求：\n\
         - 内容详实、逻辑清晰\n\
         - 符合{kind}文档规范\n\
         - 适合技术团队参考实现\n\n\
         请严格按照以下JSON格式返回：\n\
         {{\n\
           \"document\": [\n\
             {{\n\
               \"id\": \"overview\",\n\
               \"title\": \"1. 产品概述\",\n\
               \"content\": \"详细内容...\"\n\
             }}\n\
           ],\n\
           \"metadata\": {{\n\
             \"generatedAt\": \"{now}\",\n\
             \"version\": \"1.0\",\n\
             \"wordCount\": 1200\n\
           }}\n\
         }}",
        requirement = requirement.text(),
        now = Utc::now().to_rfc3339(),
    ))
}

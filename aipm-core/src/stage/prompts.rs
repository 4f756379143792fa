//! Code-prompt generation stage.

use std::sync::Arc;

use aipm_llm_sdk::{CompletionRequest, LlmClient};

use crate::fallback;
use crate::model::{CodePromptSet, RequirementDocument, StageOutcome};
use crate::schema;

const SYSTEM_PROMPT: &str = "你是一位资深的全栈开发工程师和AI编程专家，擅长为AI编程工具（如Cursor）生成高质量的提示词。\n\n请以JSON格式返回，包含prompts数组、techStack数组和estimatedTime字符串。prompts数组中每个元素包含id、title、content、type字段。";

/// Generates AI-coding prompts from the requirement document
pub struct PromptStage {
    client: Arc<dyn LlmClient>,
}

impl PromptStage {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Run the stage: one remote attempt, then the local generator
    pub async fn run(
        &self,
        document: &RequirementDocument,
    ) -> anyhow::Result<StageOutcome<CodePromptSet>> {
        let request =
            CompletionRequest::new(build_prompt(document)?).with_system(SYSTEM_PROMPT);

        match self.client.complete(request).await {
            Ok(reply) => match schema::parse_code_prompts(&reply) {
                Ok(prompts) => Ok(StageOutcome::remote(prompts)),
                Err(error) => {
                    tracing::warn!(
                        stage = "prompts",
                        error = %error,
                        "Remote reply failed validation, using local generator"
                    );
                    Ok(StageOutcome::fallback(fallback::prompts::generate(
                        document,
                    )))
                }
            },
            Err(error) => {
                tracing::warn!(
                    stage = "prompts",
                    error = %error,
                    "Remote call failed, using local generator"
                );
                Ok(StageOutcome::fallback(fallback::prompts::generate(
                    document,
                )))
            }
        }
    }
}

fn build_prompt(document: &RequirementDocument) -> anyhow::Result<String> {
    let document_json = serde_json::to_string_pretty(document)?;

    Ok(format!(
        "请基于以下产品需求文档，生成高质量的AI Coding提示词，专门适配Cursor等AI编程工具：\n\n\
         需求文档：\n{document_json}\n\n\
         请生成以下类型的提示词：\n\
         1. 系统提示词 - 设定AI编程助手的角色和能力\n\
         2. 项目概述提示词 - 描述项目目标和要求\n\
         3. 功能实现提示词 - 具体功能的实现指导\n\
         4. 技术实现提示词 - 技术架构和最佳实践\n\
         5. 项目结构提示词 - 文件结构和组织方式\n\n\
         要求：\n\
         - 提示词要详细、专业，能指导AI生成高质量代码\n\
         - 包含具体的技术要求和最佳实践\n\
         - 适用于Cursor等AI编程工具\n\
         - 能够生成可立即运行的代码\n\n\
         请严格按照以下JSON格式返回：\n\
         {{\n\
           \"prompts\": [\n\
             {{\n\
               \"id\": \"system_prompt\",\n\
               \"title\": \"系统提示词\",\n\
               \"content\": \"详细的提示词内容...\",\n\
               \"type\": \"system\"\n\
             }}\n\
           ],\n\
           \"techStack\": [\"React\", \"TypeScript\", \"Tailwind CSS\"],\n\
           \"estimatedTime\": \"2-4周\"\n\
         }}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::document as fallback_document;
    use crate::model::{AnswerSet, DocumentMetadata, Provenance, Requirement};
    use chrono::Utc;

    use crate::stage::mock::MockLlmClient;

    fn document_for(text: &str) -> RequirementDocument {
        let sections = fallback_document::sections(&Requirement::new(text), &AnswerSet::new());
        RequirementDocument {
            metadata: DocumentMetadata {
                generated_at: Utc::now(),
                version: "1.0".to_string(),
                word_count: fallback_document::word_count(&sections),
            },
            document: sections,
        }
    }

    #[tokio::test]
    async fn valid_remote_prompts_are_used_verbatim() {
        let reply = r#"{
            "prompts": [
                {"id": "system_prompt", "title": "系统提示词", "content": "远端提示词", "type": "system"}
            ],
            "techStack": ["Rust"],
            "estimatedTime": "1周内"
        }"#;
        let client = Arc::new(MockLlmClient::replying(reply));
        let stage = PromptStage::new(client);

        let outcome = stage.run(&document_for("一个记账工具")).await.unwrap();

        assert_eq!(outcome.provenance, Provenance::Remote);
        assert_eq!(outcome.artifact.tech_stack, vec!["Rust"]);
        assert_eq!(outcome.artifact.estimated_time, "1周内");
    }

    #[tokio::test]
    async fn transport_failure_falls_back_to_generated_prompts() {
        let client = Arc::new(MockLlmClient::failing());
        let stage = PromptStage::new(client);

        let outcome = stage
            .run(&document_for("我想做个浏览器插件"))
            .await
            .unwrap();

        assert!(outcome.is_fallback());
        assert_eq!(outcome.artifact.prompts.len(), 5);
        assert!(outcome
            .artifact
            .tech_stack
            .iter()
            .any(|t| t == "Web Extension API"));
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let client = Arc::new(MockLlmClient::replying("not json at all"));
        let stage = PromptStage::new(client);

        let outcome = stage.run(&document_for("一个记账工具")).await.unwrap();

        assert!(outcome.is_fallback());
        assert_eq!(outcome.artifact.prompts.len(), 5);
    }

    #[tokio::test]
    async fn prompt_embeds_the_document_json() {
        let reply = r#"{"prompts": []}"#;
        let client = Arc::new(MockLlmClient::replying(reply));
        let stage = PromptStage::new(client.clone());

        stage.run(&document_for("一个记账工具")).await.unwrap();

        let request = client.last_request().unwrap();
        assert!(request.prompt.contains("\"overview\""));
        assert!(request.prompt.contains("一个记账工具"));
        assert!(request.system.as_deref().unwrap().contains("Cursor"));
    }
}

//! Requirement-analysis stage.

use std::sync::Arc;

use aipm_llm_sdk::{CompletionRequest, LlmClient};

use crate::fallback;
use crate::model::{AnalysisResult, Requirement, StageOutcome};
use crate::schema;

const SYSTEM_PROMPT: &str = "你是一位资深的产品经理，擅长需求分析和产品设计。你的任务是分析用户需求并生成针对性的问题来完善需求细节。\n\n请以JSON格式返回结果，包含questions数组和analysis字符串。每个问题应该包含id、type、category、question、options(如适用)、required字段。";

/// Analyzes a requirement into a clarifying question set
pub struct AnalysisStage {
    client: Arc<dyn LlmClient>,
}

impl AnalysisStage {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Run the stage: one remote attempt, then the local generator
    pub async fn run(
        &self,
        requirement: &Requirement,
    ) -> anyhow::Result<StageOutcome<AnalysisResult>> {
        let request =
            CompletionRequest::new(build_prompt(requirement)).with_system(SYSTEM_PROMPT);

        match self.client.complete(request).await {
            Ok(reply) => match schema::parse_analysis(&reply) {
                Ok(result) => Ok(StageOutcome::remote(result)),
                Err(error) => {
                    tracing::warn!(
                        stage = "analysis",
                        error = %error,
                        "Remote reply failed validation, using local generator"
                    );
                    Ok(StageOutcome::fallback(fallback::analysis::analyze(
                        requirement,
                    )))
                }
            },
            Err(error) => {
                tracing::warn!(
                    stage = "analysis",
                    error = %error,
                    "Remote call failed, using local generator"
                );
                Ok(StageOutcome::fallback(fallback::analysis::analyze(
                    requirement,
                )))
            }
        }
    }
}

fn build_prompt(requirement: &Requirement) -> String {
    let file_hint = if requirement.files().is_empty() {
        String::new()
    } else {
        format!(
            "用户还上传了{}个相关文件，这些可能包含产品截图、需求文档等补充信息。\n\n",
            requirement.files().len()
        )
    };

    format!(
        "请分析以下用户需求，并生成5-8个关键问题来完善需求细节：\n\n\
         用户需求：\n{requirement}\n\n\
         {file_hint}\
         请基于以下维度生成问题：\n\
         1. 目标用户和使用场景\n\
         2. 核心功能和优先级\n\
         3. 技术实现方式\n\
         4. 性能和体验要求\n\
         5. 项目周期和资源\n\n\
         每个问题都应该：\n\
         - 针对性强，能帮助澄清关键信息\n\
         - 提供选择项（如适用）\n\
         - 标明是否为必答题\n\n\
         请严格按照以下JSON格式返回：\n\
         {{\n\
           \"questions\": [\n\
             {{\n\
               \"id\": \"question_1\",\n\
               \"type\": \"single|multiple|text\",\n\
               \"category\": \"分类名称\",\n\
               \"question\": \"问题内容\",\n\
               \"options\": [\"选项1\", \"选项2\"],\n\
               \"required\": true\n\
             }}\n\
           ],\n\
           \"analysis\": \"需求分析总结\",\n\
           \"confidence\": 0.8\n\
         }}",
        requirement = requirement.text(),
    )
}

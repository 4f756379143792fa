//! Local document generator.
//!
//! Emits exactly five fixed sections, filling placeholders from the answer
//! set when present. Section generation is pure; the caller stamps the
//! document metadata.

use crate::model::{AnswerSet, DocumentSection, Requirement};

fn section(id: &str, title: &str, content: String) -> DocumentSection {
    DocumentSection {
        id: id.to_string(),
        title: title.to_string(),
        content,
        editable: true,
    }
}

fn extract_product_name(text: &str) -> &'static str {
    if text.contains("插件") {
        "浏览器插件工具"
    } else if text.contains("平台") {
        "数据分析平台"
    } else if text.contains("系统") {
        "管理系统"
    } else {
        "智能工具产品"
    }
}

fn functional_modules(text: &str, answers: &AnswerSet) -> String {
    let mut features: Vec<String> = Vec::new();

    if text.contains("插件") {
        features.push("- 浏览器插件核心功能".to_string());
        features.push("- 数据获取和处理".to_string());
        features.push("- 用户界面展示".to_string());
        if let Some(data_source) = answers.text("data_source") {
            features.push(format!("- 数据来源：{}", data_source));
        }
    } else if text.contains("优化") {
        features.push("- 性能优化模块".to_string());
        features.push("- 用户体验改进".to_string());
        features.push("- 系统稳定性提升".to_string());
    } else {
        features.push("- 核心业务功能".to_string());
        features.push("- 用户管理模块".to_string());
        features.push("- 数据处理模块".to_string());
    }

    features.join("\n")
}

fn priority_list(answers: &AnswerSet) -> String {
    match answers.text("priority_features") {
        Some(features) => features
            .split([',', '，', '\n'])
            .map(str::trim)
            .filter(|feature| !feature.is_empty())
            .enumerate()
            .map(|(index, feature)| format!("{}. {}", index + 1, feature))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "1. 核心功能实现\n2. 用户界面优化\n3. 性能提升".to_string(),
    }
}

fn technical_specs(answers: &AnswerSet) -> String {
    let mut specs: Vec<String> = Vec::new();

    if let Some(browsers) = answers.choices("browser_support") {
        specs.push(format!("浏览器支持：{}", browsers.join("、")));
    }
    if let Some(data_source) = answers.text("data_source") {
        specs.push(format!("数据来源：{}", data_source));
    }
    specs.push("前端技术：HTML5/CSS3/JavaScript".to_string());
    specs.push("后端技术：Node.js/Python（可选）".to_string());

    specs
        .iter()
        .map(|spec| format!("- {}", spec))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pain_points(answers: &AnswerSet) -> String {
    match answers.choices("current_pain_points") {
        Some(points) => points
            .iter()
            .map(|point| format!("- {}", point))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "- 当前解决方案效率低下\n- 操作流程复杂\n- 缺乏有效工具支持".to_string(),
    }
}

/// Generate the five document sections from local heuristics
pub fn sections(requirement: &Requirement, answers: &AnswerSet) -> Vec<DocumentSection> {
    let text = requirement.text();

    let target_users = answers
        .choices("target_users")
        .map(|users| users.join("、"))
        .unwrap_or_else(|| "待确定".to_string());

    let enterprise_scale = answers
        .choices("target_users")
        .map(|users| users.iter().any(|user| user == "企业用户"))
        .unwrap_or(false);

    let compatibility = answers
        .choices("browser_support")
        .map(|browsers| format!("支持浏览器：{}", browsers.join("、")))
        .unwrap_or_else(|| "支持主流浏览器和操作系统".to_string());

    vec![
        section(
            "overview",
            "1. 产品概述",
            format!(
                "### 产品名称\n{}\n\n### 核心功能\n{}\n\n### 目标用户\n{}\n\n### 核心价值\n{}",
                extract_product_name(text),
                text,
                target_users,
                answers
                    .text("core_value")
                    .unwrap_or("提升用户效率，解决特定场景下的痛点问题"),
            ),
        ),
        section(
            "user_scenarios",
            "2. 用户场景分析",
            format!(
                "### 使用频率\n{}\n\n### 主要使用场景\n- 场景一：用户需要快速获取相关信息时\n- 场景二：处理重复性工作任务时\n- 场景三：提升工作效率的日常操作中\n\n### 用户痛点\n{}",
                answers.text("usage_frequency").unwrap_or("待确定"),
                pain_points(answers),
            ),
        ),
        section(
            "functional_requirements",
            "3. 功能需求",
            format!(
                "### 核心功能模块\n{}\n\n### 优先级排序\n{}\n\n### 技术规格要求\n{}",
                functional_modules(text, answers),
                priority_list(answers),
                technical_specs(answers),
            ),
        ),
        section(
            "performance_requirements",
            "4. 性能需求",
            format!(
                "### 响应时间要求\n{}\n\n### 并发处理能力\n- 支持同时在线用户数：{}\n- 数据处理能力：满足日常业务需求\n\n### 兼容性要求\n{}",
                answers
                    .text("performance_target")
                    .unwrap_or("页面加载时间 < 3秒，操作响应时间 < 1秒"),
                if enterprise_scale { "1000+" } else { "100+" },
                compatibility,
            ),
        ),
        section(
            "implementation_plan",
            "5. 实施计划",
            format!(
                "### 开发周期\n{}\n\n### 里程碑规划\n- 第1周：需求分析和技术方案设计\n- 第2周：核心功能开发\n- 第3周：测试和优化\n- 第4周：部署上线\n\n### 风险评估\n- 技术风险：中等（可控）\n- 时间风险：低\n- 资源风险：低\n\n### 成功标准\n- 核心功能完整实现\n- 用户体验良好\n- 性能指标达标",
                answers.text("budget_timeline").unwrap_or("2-4周"),
            ),
        ),
    ]
}

/// Approximate content length over all sections, used for the metadata's
/// word count.
pub fn word_count(sections: &[DocumentSection]) -> u32 {
    sections
        .iter()
        .map(|section| section.content.chars().count() as u32)
        .sum()
}

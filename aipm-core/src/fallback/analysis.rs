//! Local requirement-analysis generator.
//!
//! Produces the clarifying question set from keyword heuristics: a base set,
//! extra questions for every matching category, and a fixed closing pair.

use crate::fallback::{matched_categories, primary_category, RequirementCategory};
use crate::model::{AnalysisResult, Question, QuestionKind, Requirement};

const FALLBACK_CONFIDENCE: f32 = 0.85;

fn choice_question(
    id: &str,
    kind: QuestionKind,
    category: &str,
    question: &str,
    options: &[&str],
) -> Question {
    Question {
        id: id.to_string(),
        kind,
        category: category.to_string(),
        question: question.to_string(),
        description: None,
        options: Some(options.iter().map(|s| s.to_string()).collect()),
        required: true,
    }
}

fn text_question(id: &str, category: &str, question: &str) -> Question {
    Question {
        id: id.to_string(),
        kind: QuestionKind::Text,
        category: category.to_string(),
        question: question.to_string(),
        description: None,
        options: None,
        required: true,
    }
}

fn with_description(mut question: Question, description: &str) -> Question {
    question.description = Some(description.to_string());
    question
}

fn base_questions() -> Vec<Question> {
    vec![
        with_description(
            choice_question(
                "target_users",
                QuestionKind::Multiple,
                "用户定位",
                "主要目标用户是谁？",
                &[
                    "公司内部员工",
                    "个人用户",
                    "小团队",
                    "企业用户",
                    "开发者",
                    "普通消费者",
                ],
            ),
            "选择所有适用的用户群体",
        ),
        choice_question(
            "usage_frequency",
            QuestionKind::Single,
            "使用场景",
            "预期使用频率？",
            &["每天多次", "每天一次", "每周几次", "偶尔使用"],
        ),
        with_description(
            text_question("core_value", "核心价值", "这个功能/产品最核心的价值是什么？"),
            "用一句话概括用户从中获得的最大收益",
        ),
    ]
}

fn extension_questions() -> Vec<Question> {
    vec![
        choice_question(
            "browser_support",
            QuestionKind::Multiple,
            "技术规格",
            "需要支持哪些浏览器？",
            &["Chrome", "Firefox", "Safari", "Edge"],
        ),
        choice_question(
            "data_source",
            QuestionKind::Single,
            "数据来源",
            "数据从哪里获取？",
            &["爬取网站数据", "调用第三方API", "用户手动输入", "本地数据库"],
        ),
    ]
}

fn optimization_questions() -> Vec<Question> {
    vec![
        choice_question(
            "current_pain_points",
            QuestionKind::Multiple,
            "问题分析",
            "当前主要痛点有哪些？",
            &["响应速度慢", "操作复杂", "功能不完整", "界面不友好", "稳定性差"],
        ),
        with_description(
            text_question("performance_target", "性能目标", "期望的性能改进目标是什么？"),
            "例如：响应时间从5秒降低到1秒",
        ),
    ]
}

fn new_product_questions() -> Vec<Question> {
    vec![
        text_question(
            "similar_products",
            "竞品分析",
            "有哪些类似的产品？它们的不足之处是什么？",
        ),
        text_question(
            "unique_features",
            "差异化",
            "您的产品相比现有方案有什么独特之处？",
        ),
    ]
}

fn closing_questions() -> Vec<Question> {
    vec![
        choice_question(
            "budget_timeline",
            QuestionKind::Single,
            "项目规划",
            "期望的开发周期？",
            &["1周内", "2-4周", "1-2个月", "3个月以上"],
        ),
        with_description(
            text_question(
                "priority_features",
                "优先级",
                "如果只能实现3个最重要的功能，会是哪些？",
            ),
            "按重要性排序",
        ),
    ]
}

/// Generate the analysis result for a requirement from local heuristics
pub fn analyze(requirement: &Requirement) -> AnalysisResult {
    let text = requirement.text();

    let mut questions = base_questions();
    for category in matched_categories(text) {
        match category {
            RequirementCategory::BrowserExtension => questions.extend(extension_questions()),
            RequirementCategory::Optimization => questions.extend(optimization_questions()),
            RequirementCategory::NewProduct => questions.extend(new_product_questions()),
            RequirementCategory::Generic => {}
        }
    }
    questions.extend(closing_questions());

    AnalysisResult {
        questions,
        analysis: format!(
            "基于您的需求，我识别出这是一个{}项目",
            primary_category(text).label()
        ),
        confidence: FALLBACK_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_ids(result: &AnalysisResult) -> Vec<&str> {
        result.questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn browser_extension_requirement_gets_browser_support_question() {
        let requirement = Requirement::new("我想做个浏览器插件查看价格走势");
        let result = analyze(&requirement);

        let browser_support = result
            .questions
            .iter()
            .find(|q| q.id == "browser_support")
            .expect("browser_support question must be present");
        assert_eq!(browser_support.kind, QuestionKind::Multiple);
        assert_eq!(
            browser_support.options.as_deref(),
            Some(
                &[
                    "Chrome".to_string(),
                    "Firefox".to_string(),
                    "Safari".to_string(),
                    "Edge".to_string()
                ][..]
            )
        );
        assert!(result.analysis.contains("浏览器插件"));
    }

    #[test]
    fn optimization_requirement_gets_pain_points_question() {
        let requirement = Requirement::new("我们的平台查询很慢，希望优化");
        let result = analyze(&requirement);

        let pain_points = result
            .questions
            .iter()
            .find(|q| q.id == "current_pain_points")
            .expect("current_pain_points question must be present");
        assert_eq!(pain_points.kind, QuestionKind::Multiple);
        assert!(result.analysis.contains("功能优化"));
    }

    #[test]
    fn generic_requirement_gets_base_and_closing_questions_only() {
        let requirement = Requirement::new("一个简单的记账工具");
        let result = analyze(&requirement);

        assert_eq!(
            question_ids(&result),
            vec![
                "target_users",
                "usage_frequency",
                "core_value",
                "budget_timeline",
                "priority_features",
            ]
        );
    }

    #[test]
    fn multiple_matching_categories_union_their_questions() {
        let requirement = Requirement::new("开发一个浏览器插件，优化购物体验");
        let result = analyze(&requirement);

        let ids = question_ids(&result);
        assert!(ids.contains(&"browser_support"));
        assert!(ids.contains(&"current_pain_points"));
        assert!(ids.contains(&"similar_products"));
        // Label still picks the first matching category only
        assert!(result.analysis.contains("浏览器插件"));
    }

    #[test]
    fn question_set_is_well_formed() {
        let requirement = Requirement::new("开发一个浏览器插件，优化购物体验");
        let result = analyze(&requirement);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn generation_is_deterministic() {
        let requirement = Requirement::new("我想做个浏览器插件查看价格走势");
        assert_eq!(analyze(&requirement), analyze(&requirement));
    }
}

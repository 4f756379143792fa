//! Deterministic local generators.
//!
//! Each stage controller falls back to one of these pure functions when the
//! remote service is unavailable or returns malformed output. They work by
//! substring matching on the requirement text (and, for the later stages,
//! on prior-stage artifacts), so identical input always produces identical
//! output.

pub mod analysis;
pub mod document;
pub mod prompts;

/// Requirement category derived from keyword matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementCategory {
    BrowserExtension,
    Optimization,
    NewProduct,
    Generic,
}

impl RequirementCategory {
    /// Human-readable project label used in the analysis summary. The
    /// generic case renders the same as new-product.
    pub fn label(self) -> &'static str {
        match self {
            RequirementCategory::BrowserExtension => "浏览器插件",
            RequirementCategory::Optimization => "功能优化",
            RequirementCategory::NewProduct | RequirementCategory::Generic => "新产品开发",
        }
    }
}

const EXTENSION_KEYWORDS: [&str; 2] = ["插件", "浏览器"];
const OPTIMIZATION_KEYWORDS: [&str; 2] = ["优化", "改进"];
const NEW_PRODUCT_KEYWORDS: [&str; 2] = ["开发", "新"];

pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// All categories whose keywords match, in fixed order. Matching is not
/// mutually exclusive: a requirement mentioning both a plugin and an
/// optimization gets both categories' extra questions.
pub fn matched_categories(text: &str) -> Vec<RequirementCategory> {
    let mut categories = Vec::new();
    if contains_any(text, &EXTENSION_KEYWORDS) {
        categories.push(RequirementCategory::BrowserExtension);
    }
    if contains_any(text, &OPTIMIZATION_KEYWORDS) {
        categories.push(RequirementCategory::Optimization);
    }
    if contains_any(text, &NEW_PRODUCT_KEYWORDS) {
        categories.push(RequirementCategory::NewProduct);
    }
    categories
}

/// The first matching category, used for the descriptive label only
pub fn primary_category(text: &str) -> RequirementCategory {
    matched_categories(text)
        .first()
        .copied()
        .unwrap_or(RequirementCategory::Generic)
}

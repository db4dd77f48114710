//! Static bilingual keyword table and the substring classifier.
//!
//! Matching is unanchored and untokenized: a keyword inside a longer word
//! still counts ("unhappy" matches `happy`). Table order is the tie-break.

use super::Category;

/// Category → lowercase trigger substrings, in priority order.
///
/// Every category except `Normal` appears exactly once with a non-empty list.
pub const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Todo,
        &["待办", "要去", "完成", "任务", "买", "todo", "buy", "task", "complete", "need to"],
    ),
    (
        Category::Dream,
        &["梦想", "以后", "想成为", "愿景", "期待", "dream", "future", "wish", "vision", "expect"],
    ),
    (
        Category::Beautiful,
        &["美好", "开心", "快乐", "阳光", "享受", "beautiful", "happy", "joy", "sunshine", "enjoy"],
    ),
    (
        Category::Reflection,
        &["反思", "错误", "教训", "改进", "后悔", "reflect", "mistake", "lesson", "improve", "regret"],
    ),
    (
        Category::Gratitude,
        &["感恩", "感谢", "幸好", "谢谢", "grateful", "thanks", "thank", "blessed"],
    ),
];

/// Deterministic offline classifier over [`KEYWORD_TABLE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Return the first category (in table order) with a keyword contained in
    /// `text`, ignoring case. Falls through to [`Category::Normal`].
    pub fn classify(&self, text: &str) -> Category {
        let normalized = text.to_lowercase();
        KEYWORD_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Normal)
    }
}

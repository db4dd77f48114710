//! Instruction prompts for the external classifier, in English and Chinese.

/// Which instruction set to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptLanguage {
    English,
    Chinese,
}

/// Selection rule from `classifier.prompt_language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPolicy {
    /// Chinese when the entry contains a CJK ideograph, English otherwise.
    Auto,
    Fixed(PromptLanguage),
}

impl std::str::FromStr for PromptPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "en" | "english" => Ok(Self::Fixed(PromptLanguage::English)),
            "zh" | "chinese" => Ok(Self::Fixed(PromptLanguage::Chinese)),
            other => Err(format!("unknown prompt language: {other}")),
        }
    }
}

impl PromptPolicy {
    pub fn language_for(&self, text: &str) -> PromptLanguage {
        match self {
            Self::Fixed(lang) => *lang,
            Self::Auto if text.chars().any(is_cjk_ideograph) => PromptLanguage::Chinese,
            Self::Auto => PromptLanguage::English,
        }
    }
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}

const SYSTEM_EN: &str = "You are a professional diary categorization assistant. \
Please categorize the user's diary entry into one of the following categories:

Category descriptions:
- TODO: Tasks, to-dos, things to complete
- DREAM: Dreams, future visions, wishes, expectations
- BEAUTIFUL: Beautiful moments, happy times, joyful experiences
- REFLECTION: Reflection on mistakes, lessons learned, self-improvement
- GRATITUDE: Gratitude, thanks, things to be thankful for
- NORMAL: Daily records and anything that doesn't fit into the above categories

Please return ONLY the category name (in uppercase). For example: TODO, DREAM, BEAUTIFUL, REFLECTION, GRATITUDE, or NORMAL.";

const SYSTEM_ZH: &str = "你是一个专业的日记分类助手。请把用户的日记归入以下类别之一：

类别说明：
- TODO：任务、待办事项、需要完成的事情
- DREAM：梦想、未来愿景、愿望、期待
- BEAUTIFUL：美好的瞬间、开心快乐的时刻
- REFLECTION：对错误的反思、教训、自我改进
- GRATITUDE：感恩、感谢
- NORMAL：日常记录，以及不属于以上类别的内容

只返回类别名称（大写英文），例如：TODO、DREAM、BEAUTIFUL、REFLECTION、GRATITUDE 或 NORMAL。";

/// The system instruction for `language`.
pub fn system_prompt(language: PromptLanguage) -> &'static str {
    match language {
        PromptLanguage::English => SYSTEM_EN,
        PromptLanguage::Chinese => SYSTEM_ZH,
    }
}

/// The user message wrapping the (already trimmed) entry text.
pub fn user_message(language: PromptLanguage, entry: &str) -> String {
    match language {
        PromptLanguage::English => {
            format!("Please categorize the following diary entry:\n\n{entry}")
        }
        PromptLanguage::Chinese => format!("请对以下日记进行分类：\n\n{entry}"),
    }
}

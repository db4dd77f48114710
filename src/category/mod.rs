//! Entry categories and the offline keyword classifier.
//!
//! [`Category`] is the closed six-value taxonomy every diary entry is sorted
//! into. [`keywords`] holds the static bilingual keyword table and the
//! substring matcher used whenever the external classifier is unavailable.

pub mod keywords;

use serde::{Deserialize, Serialize};

/// The six diary categories. `Normal` is the catch-all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Tasks, to-dos, things to complete.
    Todo,
    /// Dreams, future visions, wishes, expectations.
    Dream,
    /// Beautiful, happy, joyful moments.
    Beautiful,
    /// Reflection on mistakes, lessons, self-improvement.
    Reflection,
    /// Gratitude, thanks.
    Gratitude,
    /// Anything not fitting the above.
    #[default]
    Normal,
}

impl Category {
    /// Every category, in keyword-table order followed by `Normal`.
    pub const ALL: [Category; 6] = [
        Self::Todo,
        Self::Dream,
        Self::Beautiful,
        Self::Reflection,
        Self::Gratitude,
        Self::Normal,
    ];

    /// Wire and SQL representation (the uppercase literal).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Dream => "DREAM",
            Self::Beautiful => "BEAUTIFUL",
            Self::Reflection => "REFLECTION",
            Self::Gratitude => "GRATITUDE",
            Self::Normal => "NORMAL",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: only the six exact uppercase literals are accepted.
impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(Self::Todo),
            "DREAM" => Ok(Self::Dream),
            "BEAUTIFUL" => Ok(Self::Beautiful),
            "REFLECTION" => Ok(Self::Reflection),
            "GRATITUDE" => Ok(Self::Gratitude),
            "NORMAL" => Ok(Self::Normal),
            _ => Err(format!("unknown category: {s}")),
        }
    }
}

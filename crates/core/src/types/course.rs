//! Course classification enums.
//!
//! Values mirror the choices the course API uses, so they can be read from
//! query strings and API payloads with the same spelling.

use serde::{Deserialize, Serialize};

/// Course category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseCategory {
    Technical,
    SoftSkills,
    Management,
    Compliance,
    Onboarding,
    Professional,
}

impl CourseCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Technical,
        Self::SoftSkills,
        Self::Management,
        Self::Compliance,
        Self::Onboarding,
        Self::Professional,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::SoftSkills => "Soft Skills",
            Self::Management => "Management",
            Self::Compliance => "Compliance",
            Self::Onboarding => "Onboarding",
            Self::Professional => "Professional Development",
        }
    }

    /// Wire code (e.g. `SOFT_SKILLS`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Technical => "TECHNICAL",
            Self::SoftSkills => "SOFT_SKILLS",
            Self::Management => "MANAGEMENT",
            Self::Compliance => "COMPLIANCE",
            Self::Onboarding => "ONBOARDING",
            Self::Professional => "PROFESSIONAL",
        }
    }

    /// Look up a category by wire code, case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

/// How a course is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    SelfPaced,
    InstructorLed,
    Blended,
    LiveOnline,
    Workshop,
}

impl DeliveryMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SelfPaced => "Self-paced",
            Self::InstructorLed => "Instructor-led",
            Self::Blended => "Blended",
            Self::LiveOnline => "Live Online",
            Self::Workshop => "Workshop",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes_round_trip() {
        for category in CourseCategory::ALL {
            assert_eq!(CourseCategory::from_code(category.code()), Some(category));
        }
    }

    #[test]
    fn test_category_from_code_is_case_insensitive() {
        assert_eq!(
            CourseCategory::from_code(" soft_skills "),
            Some(CourseCategory::SoftSkills)
        );
        assert_eq!(CourseCategory::from_code("cooking"), None);
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        let json = serde_json::to_string(&CourseCategory::SoftSkills).unwrap();
        assert_eq!(json, "\"SOFT_SKILLS\"");
        let level: DifficultyLevel = serde_json::from_str("\"EXPERT\"").unwrap();
        assert_eq!(level, DifficultyLevel::Expert);
    }
}

//! Course catalog and marketing content.
//!
//! The catalog is held in memory for the lifetime of the process. Marketing
//! blocks (hero stats, topic cards, why-us cards) are static.

use std::sync::Arc;

use tms_core::{CourseCategory, CourseId, DeliveryMethod, DifficultyLevel, Price};

/// Image used by courses without artwork of their own.
pub const DEFAULT_COURSE_IMAGE: &str = "https://images.unsplash.com/photo-1660616246653-e2c57d1077b9?q=80&w=800&auto=format&fit=crop";

/// Number of courses shown in the "Popular Courses" section.
pub const POPULAR_COURSE_COUNT: usize = 4;

// =============================================================================
// Marketing Content
// =============================================================================

/// A browsable topic shown on the catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub name: &'static str,
    pub icon: &'static str,
}

impl Topic {
    /// Catalog URL searching for this topic.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("/courses?q={}", urlencoding::encode(self.name))
    }
}

/// A headline figure in the hero section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

/// A card in the "why us" section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const TOPICS: [Topic; 13] = [
    Topic { name: "Business", icon: "💼" },
    Topic { name: "Design", icon: "🎨" },
    Topic { name: "Development", icon: "💻" },
    Topic { name: "Finance", icon: "💰" },
    Topic { name: "Health", icon: "🏥" },
    Topic { name: "IT", icon: "💻" },
    Topic { name: "Lifestyle", icon: "💼" },
    Topic { name: "Marketing", icon: "📈" },
    Topic { name: "Music", icon: "🎵" },
    Topic { name: "Photography", icon: "📷" },
    Topic { name: "Productivity", icon: "💻" },
    Topic { name: "Science", icon: "🔬" },
    Topic { name: "Sports", icon: "🏈" },
];

pub const HERO_STATS: [Stat; 3] = [
    Stat { label: "Ongoing students", value: "100k +" },
    Stat { label: "Ongoing courses", value: "100k +" },
    Stat { label: "Successful stories", value: "1k +" },
];

pub const WHY_US: [Feature; 4] = [
    Feature {
        title: "Best courses",
        description: "Courses picked for your learning needs, from first steps to expert level.",
    },
    Feature {
        title: "Expert instructors",
        description: "Our instructors have years of experience in their field and in teaching.",
    },
    Feature {
        title: "Learn your way",
        description: "Self-paced, instructor-led, blended and live online delivery.",
    },
    Feature {
        title: "Always supported",
        description: "24/7 learner support whenever you get stuck.",
    },
];

// =============================================================================
// Courses
// =============================================================================

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub category: CourseCategory,
    pub level: DifficultyLevel,
    pub delivery: DeliveryMethod,
    pub duration: String,
    pub price: Price,
    pub image_url: String,
    pub summary: String,
}

impl Course {
    /// Price as shown on course cards: "Free" for zero.
    #[must_use]
    pub fn price_label(&self) -> String {
        if self.price.is_free() {
            "Free".to_string()
        } else {
            self.price.to_string()
        }
    }

    /// Detail page URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/courses/{}", self.id)
    }
}

/// Catalog filters from the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseQuery {
    /// Free text matched against title, summary and category.
    pub text: Option<String>,
    /// Restrict to one category.
    pub category: Option<CourseCategory>,
}

impl CourseQuery {
    fn matches(&self, course: &Course) -> bool {
        if self.category.is_some_and(|category| category != course.category) {
            return false;
        }

        let Some(needle) = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
        else {
            return true;
        };

        [
            course.title.as_str(),
            course.summary.as_str(),
            course.category.label(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// In-memory course catalog.
///
/// Cheaply cloneable; clones share the course list.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Arc<Vec<Course>>,
}

impl Catalog {
    /// Build a catalog from a list of courses.
    #[must_use]
    pub fn from_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: Arc::new(courses),
        }
    }

    /// All courses, in display order.
    #[must_use]
    pub fn all(&self) -> &[Course] {
        &self.courses
    }

    /// The first few courses, for the home page.
    #[must_use]
    pub fn popular(&self) -> &[Course] {
        let end = self.courses.len().min(POPULAR_COURSE_COUNT);
        self.courses.get(..end).unwrap_or_default()
    }

    /// Look up a course by ID.
    #[must_use]
    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    /// Courses matching `query`, in display order.
    #[must_use]
    pub fn search(&self, query: &CourseQuery) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|course| query.matches(course))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_courses(builtin_courses())
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: u32,
    title: &str,
    category: CourseCategory,
    level: DifficultyLevel,
    delivery: DeliveryMethod,
    duration: &str,
    price: i64,
    summary: &str,
) -> Course {
    Course {
        id: CourseId::new(id),
        title: title.to_string(),
        category,
        level,
        delivery,
        duration: duration.to_string(),
        price: Price::usd(price),
        image_url: DEFAULT_COURSE_IMAGE.to_string(),
        summary: summary.to_string(),
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_courses() -> Vec<Course> {
    use CourseCategory::{Compliance, Management, Onboarding, Professional, SoftSkills, Technical};
    use DeliveryMethod::{Blended, InstructorLed, LiveOnline, SelfPaced, Workshop};
    use DifficultyLevel::{Advanced, Beginner, Expert, Intermediate};

    vec![
        course(
            1,
            "Python for Everyone",
            Technical,
            Beginner,
            SelfPaced,
            "2 hrs 30 mins",
            100,
            "Write your first programs: variables, loops, functions and files.",
        ),
        course(
            2,
            "Data Analysis with Python",
            Technical,
            Intermediate,
            Blended,
            "6 weeks",
            200,
            "Clean, explore and chart real data sets with pandas.",
        ),
        course(
            3,
            "Leading High-Performing Teams",
            Management,
            Advanced,
            InstructorLed,
            "3 days",
            300,
            "Set direction, delegate well and run effective one-to-ones.",
        ),
        course(
            4,
            "Workplace Communication",
            SoftSkills,
            Beginner,
            LiveOnline,
            "4 sessions",
            400,
            "Give clear updates, run better meetings and handle difficult conversations.",
        ),
        course(
            5,
            "Data Protection Essentials",
            Compliance,
            Beginner,
            SelfPaced,
            "1 hr 15 mins",
            0,
            "What personal data is, how to handle it and what to do after a breach.",
        ),
        course(
            6,
            "New Starter Orientation",
            Onboarding,
            Beginner,
            SelfPaced,
            "45 mins",
            0,
            "Tools, policies and people you need in your first week.",
        ),
        course(
            7,
            "Project Management Professional Prep",
            Professional,
            Expert,
            Workshop,
            "5 days",
            850,
            "Intensive preparation for the PMP certification exam.",
        ),
        course(
            8,
            "Cloud Infrastructure Fundamentals",
            Technical,
            Intermediate,
            InstructorLed,
            "2 weeks",
            450,
            "Networks, compute and storage in the cloud, with hands-on labs.",
        ),
    ]
}

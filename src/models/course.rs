//! Static course catalog.

use serde::{Deserialize, Serialize};

/// A course offered on the site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
}

impl Course {
    fn new(id: i64, title: &str, description: &str, icon: &str, features: [&str; 5]) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Read-only catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The courses currently advertised on the site.
    pub fn builtin() -> Self {
        Self::new(vec![
            Course::new(
                1,
                "JavaScript Development",
                "Master modern JavaScript from basics to advanced concepts like ES6+, async/await, and frameworks.",
                "💻",
                [
                    "ES6+ Syntax",
                    "DOM Manipulation",
                    "Async Programming",
                    "Modern Frameworks",
                    "Real-world Projects",
                ],
            ),
            Course::new(
                2,
                "Android App Development",
                "Build native Android applications using Kotlin and the latest Android development tools.",
                "📱",
                [
                    "Kotlin Programming",
                    "UI/UX Design",
                    "API Integration",
                    "Database Management",
                    "App Publishing",
                ],
            ),
            Course::new(
                3,
                "MERN Stack Development",
                "Become a full-stack developer with MongoDB, Express, React, and Node.js.",
                "🌐",
                [
                    "MongoDB",
                    "Express.js",
                    "React.js",
                    "Node.js",
                    "Full-stack Projects",
                ],
            ),
            Course::new(
                4,
                "Software Testing",
                "Learn comprehensive testing methodologies including manual and automated testing.",
                "🧪",
                [
                    "Manual Testing",
                    "Automated Testing",
                    "Test Planning",
                    "Bug Tracking",
                    "Performance Testing",
                ],
            ),
            Course::new(
                5,
                "Graphic Designing",
                "Master graphic design principles and tools to create stunning visual content.",
                "🎨",
                [
                    "Adobe Photoshop",
                    "Illustrator",
                    "UI/UX Design",
                    "Typography",
                    "Brand Identity",
                ],
            ),
            Course::new(
                6,
                "AI-Powered Development",
                "Learn to leverage AI tools to enhance your coding and development workflow.",
                "🤖",
                [
                    "AI Coding Assistants",
                    "Prompt Engineering",
                    "AI Integration",
                    "Automated Testing",
                    "Smart Development",
                ],
            ),
        ])
    }

    pub fn all(&self) -> &[Course] {
        &self.courses
    }

    /// Look a course up by the raw path segment; non-numeric ids never match.
    pub fn find(&self, raw_id: &str) -> Option<&Course> {
        let id: i64 = raw_id.trim().parse().ok()?;
        self.courses.iter().find(|course| course.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = CourseCatalog::builtin();
        assert_eq!(catalog.all().len(), 6);
        assert!(catalog.all().iter().all(|c| c.features.len() == 5));
        assert_eq!(catalog.find("3").unwrap().title, "MERN Stack Development");
    }

    #[test]
    fn test_find_unknown_or_malformed_id() {
        let catalog = CourseCatalog::builtin();
        assert!(catalog.find("0").is_none());
        assert!(catalog.find("42").is_none());
        assert!(catalog.find("abc").is_none());
        assert!(catalog.find("").is_none());
    }
}

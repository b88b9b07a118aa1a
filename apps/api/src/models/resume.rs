use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub graduation_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
    pub date: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

/// A candidate's resume document.
///
/// The store persists it as an opaque JSON blob; only the validator reads
/// individual fields. Every field defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certificates: Vec<Certificate>,
    pub skill_groups: Vec<SkillGroup>,
    pub languages: Vec<Language>,
    pub achievements: Vec<Achievement>,
}

impl ResumeData {
    /// Flattens the fields the keyword scorer looks at into one text blob:
    /// summary, then title and description of each experience, then each skill.
    /// Every field is followed by a single space.
    pub fn scoring_text(&self) -> String {
        let mut text = String::new();
        text.push_str(self.summary.as_deref().unwrap_or_default());
        text.push(' ');
        for exp in &self.experience {
            text.push_str(&exp.title);
            text.push(' ');
            text.push_str(exp.description.as_deref().unwrap_or_default());
            text.push(' ');
        }
        for skill in &self.skills {
            text.push_str(skill);
            text.push(' ');
        }
        text
    }
}

//! The resume form data edited in the main editor, autosaved as `resume-draft`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sections::registry::FieldDefinition;
use crate::sections::validation::{validate_field, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDraft {
    pub title: String,
    pub personal: PersonalInfo,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectItem>,
}

impl Default for ResumeDraft {
    fn default() -> Self {
        Self {
            title: "Untitled Resume".to_string(),
            personal: PersonalInfo::default(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
        }
    }
}

static PERSONAL_FIELDS: [FieldDefinition; 7] = [
    FieldDefinition::text("full_name", "Full Name").required().max(100),
    FieldDefinition::email("email", "Email").required(),
    FieldDefinition::text("phone", "Phone").max(30),
    FieldDefinition::text("location", "Location").max(100),
    FieldDefinition::url("website", "Website"),
    FieldDefinition::url("linkedin", "LinkedIn"),
    FieldDefinition::multiline("summary", "Professional Summary").max(1000),
];

impl PersonalInfo {
    fn value(&self, key: &str) -> &str {
        match key {
            "full_name" => &self.full_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "location" => &self.location,
            "website" => &self.website,
            "linkedin" => &self.linkedin,
            "summary" => &self.summary,
            _ => "",
        }
    }
}

impl ResumeDraft {
    /// Validates the personal-info block. Keys are `personal-<field>`.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for def in &PERSONAL_FIELDS {
            if let Some(message) = validate_field(def, self.personal.value(def.key)) {
                errors.insert(format!("personal-{}", def.key), message);
            }
        }
        errors
    }
}

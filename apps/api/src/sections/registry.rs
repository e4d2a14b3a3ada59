//! Field Template Registry — static catalog of what each section type contains.
//!
//! Read-only and shared by the section store (default entries), the validation
//! engine (field rules) and the export path (labels and field order).
//! `SectionType::template` is an exhaustive match, so adding a section type
//! without a template does not compile.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::sections::models::SectionType;

/// Input widget / value shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Multiline,
    Date,
    Email,
    Url,
    Select,
}

/// Field-specific rule, evaluated after the generic ones.
pub type CustomValidator = fn(&str) -> Option<String>;

#[derive(Clone, Copy, Serialize)]
pub struct FieldDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub options: &'static [&'static str],
    pub default_value: &'static str,
    pub placeholder: &'static str,
    #[serde(skip)]
    pub validator: Option<CustomValidator>,
}

impl std::fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("max_length", &self.max_length)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl FieldDefinition {
    pub(crate) const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            required: false,
            max_length: None,
            options: &[],
            default_value: "",
            placeholder: "",
            validator: None,
        }
    }

    pub(crate) const fn multiline(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Multiline,
            ..Self::text(key, label)
        }
    }

    pub(crate) const fn url(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Url,
            max_length: Some(200),
            placeholder: "https://",
            ..Self::text(key, label)
        }
    }

    pub(crate) const fn email(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Email,
            max_length: Some(100),
            placeholder: "name@example.com",
            ..Self::text(key, label)
        }
    }

    const fn start_date(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Date,
            placeholder: "YYYY-MM",
            validator: Some(validate_month),
            ..Self::text(key, label)
        }
    }

    const fn end_date(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Date,
            placeholder: "YYYY-MM or Present",
            validator: Some(validate_month_or_present),
            ..Self::text(key, label)
        }
    }

    const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default_value: &'static str,
    ) -> Self {
        Self {
            kind: FieldKind::Select,
            options,
            default_value,
            ..Self::text(key, label)
        }
    }

    pub(crate) const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub(crate) const fn max(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }
}

/// The schema of one section type: display name plus ordered field list.
#[derive(Debug, Serialize)]
pub struct FieldTemplate {
    pub id: SectionType,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldDefinition],
}

impl FieldTemplate {
    pub fn field(&self, key: &str) -> Option<&'static FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Values a freshly added entry starts with.
    pub fn default_entry(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.key.to_string(), f.default_value.to_string()))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Custom validators
// ────────────────────────────────────────────────────────────────────────────

fn validate_month(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        Ok(_) => None,
        Err(_) => Some("Use the YYYY-MM format".to_string()),
    }
}

fn validate_month_or_present(value: &str) -> Option<String> {
    if value.trim().eq_ignore_ascii_case("present") {
        return None;
    }
    validate_month(value).map(|_| "Use the YYYY-MM format or 'Present'".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

const SKILL_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced", "Expert"];
const LANGUAGE_LEVELS: &[&str] = &["Native", "Fluent", "Professional", "Intermediate", "Basic"];

static WORK_EXPERIENCE: FieldTemplate = FieldTemplate {
    id: SectionType::WorkExperience,
    name: "Work Experience",
    description: "Jobs, internships and freelance work",
    fields: &[
        FieldDefinition::text("company", "Company").required().max(100),
        FieldDefinition::text("position", "Position").required().max(100),
        FieldDefinition::text("location", "Location").max(100),
        FieldDefinition::start_date("start_date", "Start Date").required(),
        FieldDefinition::end_date("end_date", "End Date"),
        FieldDefinition::multiline("description", "Description").max(2000),
    ],
};

static EDUCATION: FieldTemplate = FieldTemplate {
    id: SectionType::Education,
    name: "Education",
    description: "Degrees, diplomas and courses",
    fields: &[
        FieldDefinition::text("institution", "Institution").required().max(100),
        FieldDefinition::text("degree", "Degree").required().max(100),
        FieldDefinition::text("field_of_study", "Field of Study").max(100),
        FieldDefinition::start_date("start_date", "Start Date"),
        FieldDefinition::end_date("end_date", "End Date"),
        FieldDefinition::text("gpa", "GPA").max(10),
        FieldDefinition::multiline("description", "Description").max(1000),
    ],
};

static SKILLS: FieldTemplate = FieldTemplate {
    id: SectionType::Skills,
    name: "Skills",
    description: "Grouped technical and soft skills",
    fields: &[
        FieldDefinition::text("category", "Category").required().max(60),
        FieldDefinition::multiline("skills", "Skills").required().max(500),
        FieldDefinition::select("level", "Level", SKILL_LEVELS, "Intermediate"),
    ],
};

static PROJECTS: FieldTemplate = FieldTemplate {
    id: SectionType::Projects,
    name: "Projects",
    description: "Personal, academic or open-source projects",
    fields: &[
        FieldDefinition::text("name", "Project Name").required().max(100),
        FieldDefinition::text("role", "Role").max(100),
        FieldDefinition::url("url", "Project URL"),
        FieldDefinition::start_date("start_date", "Start Date"),
        FieldDefinition::end_date("end_date", "End Date"),
        FieldDefinition::text("technologies", "Technologies").max(200),
        FieldDefinition::multiline("description", "Description").max(1500),
    ],
};

static CERTIFICATIONS: FieldTemplate = FieldTemplate {
    id: SectionType::Certifications,
    name: "Certifications",
    description: "Professional certifications and licenses",
    fields: &[
        FieldDefinition::text("name", "Certification Name").required().max(120),
        FieldDefinition::text("issuer", "Issuing Organization").required().max(100),
        FieldDefinition::start_date("issue_date", "Issue Date"),
        FieldDefinition::end_date("expiry_date", "Expiry Date"),
        FieldDefinition::text("credential_id", "Credential ID").max(100),
        FieldDefinition::url("credential_url", "Credential URL"),
    ],
};

static LANGUAGES: FieldTemplate = FieldTemplate {
    id: SectionType::Languages,
    name: "Languages",
    description: "Spoken languages and proficiency",
    fields: &[
        FieldDefinition::text("language", "Language").required().max(50),
        FieldDefinition::select("proficiency", "Proficiency", LANGUAGE_LEVELS, "Professional")
            .required(),
    ],
};

static VOLUNTEER: FieldTemplate = FieldTemplate {
    id: SectionType::Volunteer,
    name: "Volunteer Experience",
    description: "Community and non-profit work",
    fields: &[
        FieldDefinition::text("organization", "Organization").required().max(100),
        FieldDefinition::text("role", "Role").required().max(100),
        FieldDefinition::text("location", "Location").max(100),
        FieldDefinition::start_date("start_date", "Start Date"),
        FieldDefinition::end_date("end_date", "End Date"),
        FieldDefinition::multiline("description", "Description").max(1000),
    ],
};

static CUSTOM: FieldTemplate = FieldTemplate {
    id: SectionType::Custom,
    name: "Custom Section",
    description: "Anything else: awards, publications, interests",
    fields: &[
        FieldDefinition::text("title", "Title").required().max(100),
        FieldDefinition::text("subtitle", "Subtitle").max(100),
        FieldDefinition::end_date("date", "Date"),
        FieldDefinition::url("url", "Link"),
        FieldDefinition::multiline("description", "Description").max(2000),
    ],
};

impl SectionType {
    pub fn template(&self) -> &'static FieldTemplate {
        match self {
            SectionType::WorkExperience => &WORK_EXPERIENCE,
            SectionType::Education => &EDUCATION,
            SectionType::Skills => &SKILLS,
            SectionType::Projects => &PROJECTS,
            SectionType::Certifications => &CERTIFICATIONS,
            SectionType::Languages => &LANGUAGES,
            SectionType::Volunteer => &VOLUNTEER,
            SectionType::Custom => &CUSTOM,
        }
    }
}

/// String-keyed lookup. Unknown ids return `None`; there is no fallback template.
pub fn get_template(type_id: &str) -> Option<&'static FieldTemplate> {
    type_id.parse::<SectionType>().ok().map(|t| t.template())
}

/// Every template, in `SectionType::ALL` order.
pub fn catalog() -> Vec<&'static FieldTemplate> {
    SectionType::ALL.iter().map(|t| t.template()).collect()
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The fixed set of section kinds a resume can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    WorkExperience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Volunteer,
    Custom,
}

impl SectionType {
    pub const ALL: [SectionType; 8] = [
        SectionType::WorkExperience,
        SectionType::Education,
        SectionType::Skills,
        SectionType::Projects,
        SectionType::Certifications,
        SectionType::Languages,
        SectionType::Volunteer,
        SectionType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::WorkExperience => "work-experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Projects => "projects",
            SectionType::Certifications => "certifications",
            SectionType::Languages => "languages",
            SectionType::Volunteer => "volunteer",
            SectionType::Custom => "custom",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section type '{0}'")]
pub struct UnknownSectionType(pub String);

impl FromStr for SectionType {
    type Err = UnknownSectionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownSectionType(s.to_string()))
    }
}

/// One item inside a section (a job, a degree, a language...).
///
/// Field values are keyed by the field definitions of the section's template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            values,
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }
}

/// A named, orderable, show/hide-able group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub order: u32,
    pub visible: bool,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn entry(&self, entry_id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub(crate) fn entry_mut(&mut self, entry_id: Uuid) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == entry_id)
    }
}

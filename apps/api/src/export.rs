//! The fully resolved pair handed to renderers and PDF export.
//!
//! Renderers never see hidden sections, unordered sections, or raw field keys:
//! everything here is already filtered, sorted and labelled.

use serde::Serialize;
use uuid::Uuid;

use crate::customization::settings::{CustomizationSettings, SectionDescriptor};
use crate::customization::TemplateKind;
use crate::editor::draft::ResumeDraft;
use crate::editor::session::EditorSession;
use crate::sections::{Section, SectionStore, SectionType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSection {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub entries: Vec<Vec<ExportField>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSnapshot {
    pub template: TemplateKind,
    pub data: ResumeDraft,
    pub settings: CustomizationSettings,
    /// Visible built-in sections, in display order.
    pub builtin_sections: Vec<SectionDescriptor>,
    /// Visible dynamic sections, in display order.
    pub sections: Vec<ExportSection>,
}

impl ExportSnapshot {
    pub fn resolve(
        draft: &ResumeDraft,
        settings: &CustomizationSettings,
        sections: &SectionStore,
    ) -> Self {
        Self {
            template: settings.layout.template,
            data: draft.clone(),
            settings: settings.clone(),
            builtin_sections: settings
                .ordered_sections()
                .into_iter()
                .filter(|d| d.visible)
                .cloned()
                .collect(),
            sections: sections
                .ordered()
                .into_iter()
                .filter(|s| s.visible)
                .map(export_section)
                .collect(),
        }
    }
}

impl EditorSession {
    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot::resolve(self.draft(), self.settings(), self.sections())
    }
}

/// Fields come out in template order with their labels; blank values are
/// dropped.
fn export_section(section: &Section) -> ExportSection {
    let template = section.section_type.template();
    let entries = section
        .entries
        .iter()
        .map(|entry| {
            template
                .fields
                .iter()
                .filter_map(|def| {
                    let value = entry.value(def.key).trim();
                    (!value.is_empty()).then(|| ExportField {
                        key: def.key,
                        label: def.label,
                        value: value.to_string(),
                    })
                })
                .collect()
        })
        .collect();

    ExportSection {
        id: section.id,
        section_type: section.section_type,
        title: section.title.clone(),
        entries,
    }
}

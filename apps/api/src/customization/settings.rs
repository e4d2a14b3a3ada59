//! Customization Settings Aggregate — font, colors, built-in section list and
//! layout composed into the one value that is persisted, versioned in history
//! and handed to renderers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sections::models::SectionType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub heading: f32,
    pub subheading: f32,
    pub body: f32,
    pub small: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            heading: 24.0,
            subheading: 18.0,
            body: 14.0,
            small: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    pub family: String,
    pub sizes: FontSizes,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            sizes: FontSizes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            secondary: "#64748b".to_string(),
            accent: "#0ea5e9".to_string(),
            text: "#1e293b".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

/// Lightweight projection of a built-in section: what to show and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub order: u32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Modern,
    Classic,
    Minimal,
    Creative,
    Professional,
    Executive,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Modern,
        TemplateKind::Classic,
        TemplateKind::Minimal,
        TemplateKind::Creative,
        TemplateKind::Professional,
        TemplateKind::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Modern => "modern",
            TemplateKind::Classic => "classic",
            TemplateKind::Minimal => "minimal",
            TemplateKind::Creative => "creative",
            TemplateKind::Professional => "professional",
            TemplateKind::Executive => "executive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    Compact,
    Normal,
    Relaxed,
}

/// Column count, `1` or `2` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Columns {
    One,
    Two,
}

impl TryFrom<u8> for Columns {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Columns::One),
            2 => Ok(Columns::Two),
            other => Err(format!("columns must be 1 or 2, got {other}")),
        }
    }
}

impl From<Columns> for u8 {
    fn from(value: Columns) -> Self {
        match value {
            Columns::One => 1,
            Columns::Two => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub template: TemplateKind,
    pub spacing: Spacing,
    pub columns: Columns,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            template: TemplateKind::Modern,
            spacing: Spacing::Normal,
            columns: Columns::One,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationSettings {
    pub font: FontSettings,
    pub colors: ColorPalette,
    pub sections: Vec<SectionDescriptor>,
    pub layout: LayoutSettings,
}

/// The built-in skeleton every fresh resume starts with.
const DEFAULT_SECTIONS: [SectionType; 5] = [
    SectionType::WorkExperience,
    SectionType::Education,
    SectionType::Skills,
    SectionType::Projects,
    SectionType::Certifications,
];

impl Default for CustomizationSettings {
    fn default() -> Self {
        let mut settings = Self {
            font: FontSettings::default(),
            colors: ColorPalette::default(),
            sections: Vec::new(),
            layout: LayoutSettings::default(),
        };
        for section_type in DEFAULT_SECTIONS {
            settings.add_section(section_type);
        }
        settings
    }
}

/// Partial update. Each present field replaces the whole sub-object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub font: Option<FontSettings>,
    pub colors: Option<ColorPalette>,
    pub sections: Option<Vec<SectionDescriptor>>,
    pub layout: Option<LayoutSettings>,
}

impl CustomizationSettings {
    /// Shallow-merges `patch` into a new value; `self` is left untouched.
    pub fn apply(&self, patch: SettingsPatch) -> CustomizationSettings {
        CustomizationSettings {
            font: patch.font.unwrap_or_else(|| self.font.clone()),
            colors: patch.colors.unwrap_or_else(|| self.colors.clone()),
            sections: patch.sections.unwrap_or_else(|| self.sections.clone()),
            layout: patch.layout.unwrap_or_else(|| self.layout.clone()),
        }
    }

    /// Appends a descriptor for `section_type` at `order = len + 1`.
    pub fn add_section(&mut self, section_type: SectionType) -> Uuid {
        let descriptor = SectionDescriptor {
            id: Uuid::new_v4(),
            section_type,
            title: section_type.template().name.to_string(),
            order: self.sections.len() as u32 + 1,
            visible: true,
        };
        let id = descriptor.id;
        self.sections.push(descriptor);
        id
    }

    /// Fresh defaults that reuse this value's descriptor ids wherever the
    /// section type at the same position matches, so resetting an untouched
    /// skeleton yields an identical value.
    pub fn defaults_keeping_ids(&self) -> CustomizationSettings {
        let mut defaults = CustomizationSettings::default();
        for (fresh, current) in defaults.sections.iter_mut().zip(&self.sections) {
            if fresh.section_type == current.section_type {
                fresh.id = current.id;
            }
        }
        defaults
    }

    /// Descriptors sorted by `order`; gaps are allowed and ties keep their
    /// stored order.
    pub fn ordered_sections(&self) -> Vec<&SectionDescriptor> {
        let mut sorted: Vec<&SectionDescriptor> = self.sections.iter().collect();
        sorted.sort_by_key(|s| s.order);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = CustomizationSettings::default();
        assert_eq!(s.font.family, "Inter");
        assert_eq!(s.sections.len(), 5);
        assert_eq!(s.layout.template, TemplateKind::Modern);
        assert_eq!(s.layout.spacing, Spacing::Normal);
        assert_eq!(s.layout.columns, Columns::One);
        let orders: Vec<_> = s.sections.iter().map(|d| d.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_add_section_to_default_skeleton() {
        let mut s = CustomizationSettings::default();
        s.add_section(SectionType::Skills);
        let added = s.sections.last().unwrap();
        assert_eq!(s.sections.len(), 6);
        assert_eq!(added.order, 6);
        assert!(added.visible);
        assert_eq!(added.title, "Skills");
    }

    #[test]
    fn test_apply_is_shallow_and_non_mutating() {
        let base = CustomizationSettings::default();
        let colors = ColorPalette {
            primary: "#000000".to_string(),
            ..ColorPalette::default()
        };
        let next = base.apply(SettingsPatch {
            colors: Some(colors.clone()),
            ..SettingsPatch::default()
        });
        assert_eq!(next.colors, colors);
        assert_eq!(next.font, base.font);
        assert_eq!(next.sections, base.sections);
        assert_ne!(base.colors, colors);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let base = CustomizationSettings::default();
        assert_eq!(base.apply(SettingsPatch::default()), base);
    }

    #[test]
    fn test_defaults_keeping_ids() {
        let base = CustomizationSettings::default();
        assert_eq!(base.defaults_keeping_ids(), base);

        let mut edited = base.clone();
        edited.sections.swap(0, 1);
        edited.font.family = "Georgia".to_string();
        let reset = edited.defaults_keeping_ids();
        assert_eq!(reset.font.family, "Inter");
        assert_eq!(reset.sections[2].id, base.sections[2].id);
        assert_ne!(reset.sections[0].id, base.sections[0].id);
        assert_eq!(reset.sections[0].section_type, SectionType::WorkExperience);
    }

    #[test]
    fn test_ordered_sections_stable_with_gaps_and_ties() {
        let mut s = CustomizationSettings::default();
        s.sections[0].order = 10;
        s.sections[1].order = 3;
        s.sections[2].order = 3;
        let order: Vec<_> = s.ordered_sections().iter().map(|d| d.section_type).collect();
        assert_eq!(
            order,
            vec![
                SectionType::Education,
                SectionType::Skills,
                SectionType::Projects,
                SectionType::Certifications,
                SectionType::WorkExperience,
            ]
        );
    }

    #[test]
    fn test_columns_wire_format() {
        let layout = LayoutSettings {
            columns: Columns::Two,
            ..LayoutSettings::default()
        };
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["columns"], 2);
        assert!(serde_json::from_str::<Columns>("3").is_err());
    }

    #[test]
    fn test_round_trip_all_layouts_and_empty_sections() {
        for template in TemplateKind::ALL {
            for spacing in [Spacing::Compact, Spacing::Normal, Spacing::Relaxed] {
                for columns in [Columns::One, Columns::Two] {
                    let settings = CustomizationSettings {
                        sections: vec![],
                        layout: LayoutSettings {
                            template,
                            spacing,
                            columns,
                        },
                        ..CustomizationSettings::default()
                    };
                    let json = serde_json::to_string(&settings).unwrap();
                    let back: CustomizationSettings = serde_json::from_str(&json).unwrap();
                    assert_eq!(back, settings);
                }
            }
        }
    }
}

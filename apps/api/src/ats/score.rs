//! Cosmetic ATS score: a deterministic estimate of how complete and scannable
//! a resume looks. It does not predict anything a real ATS does.

use serde::Serialize;

use crate::ats::impact::{bullets, check_bullet, ImpactGap};
use crate::export::ExportSnapshot;
use crate::sections::SectionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionHealth {
    pub section: SectionType,
    pub score: f64,
    pub entry_count: usize,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    /// 0–100.
    pub score: u8,
    pub contact_score: f64,
    pub section_score: f64,
    pub impact_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<SectionType>,
    pub impact_gaps: Vec<ImpactGap>,
    pub recommendations: Vec<String>,
}

const SECTION_WEIGHTS: &[(SectionType, f64)] = &[
    (SectionType::WorkExperience, 0.40),
    (SectionType::Education, 0.20),
    (SectionType::Skills, 0.20),
    (SectionType::Projects, 0.10),
    (SectionType::Certifications, 0.05),
    (SectionType::Languages, 0.05),
];

const CONTACT_WEIGHT: f64 = 0.3;
const SECTION_WEIGHT: f64 = 0.4;
const IMPACT_WEIGHT: f64 = 0.3;

/// Entries a section needs before it counts as strong.
const STRONG_ENTRY_COUNT: usize = 2;

pub fn compute_ats_report(snapshot: &ExportSnapshot) -> AtsReport {
    let mut recommendations: Vec<String> = Vec::new();

    let contact_score = contact_score(snapshot);
    if contact_score < 1.0 {
        recommendations
            .push("Complete your contact details: name, email, phone, location and a link".into());
    }

    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut weighted = 0.0;
    for &(section_type, weight) in SECTION_WEIGHTS {
        let entry_count = entry_count(snapshot, section_type);
        let score = (entry_count as f64 / STRONG_ENTRY_COUNT as f64).min(1.0);
        let status = match entry_count {
            0 => SectionStatus::Missing,
            n if n >= STRONG_ENTRY_COUNT => SectionStatus::Strong,
            _ if weight >= 0.2 => SectionStatus::Weak,
            _ => SectionStatus::Moderate,
        };
        if status == SectionStatus::Missing {
            missing_sections.push(section_type);
            recommendations.push(format!(
                "Add a {} section",
                section_type.template().name
            ));
        }
        weighted += score * weight;
        sections.push(SectionHealth {
            section: section_type,
            score,
            entry_count,
            status,
        });
    }
    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let section_score = (weighted / total_weight).clamp(0.0, 1.0);

    let all_bullets = experience_bullets(snapshot);
    let impact_gaps: Vec<ImpactGap> = all_bullets.iter().filter_map(|b| check_bullet(b)).collect();
    let impact_score = if all_bullets.is_empty() {
        0.0
    } else {
        1.0 - impact_gaps.len() as f64 / all_bullets.len() as f64
    };
    if !impact_gaps.is_empty() {
        recommendations.push(format!(
            "{} bullet(s) lack a measurable result",
            impact_gaps.len()
        ));
    }

    let overall = contact_score * CONTACT_WEIGHT
        + section_score * SECTION_WEIGHT
        + impact_score * IMPACT_WEIGHT;

    AtsReport {
        score: (overall * 100.0).round().clamp(0.0, 100.0) as u8,
        contact_score,
        section_score,
        impact_score,
        sections,
        missing_sections,
        impact_gaps,
        recommendations,
    }
}

fn contact_score(snapshot: &ExportSnapshot) -> f64 {
    let p = &snapshot.data.personal;
    let link = if p.linkedin.trim().is_empty() {
        &p.website
    } else {
        &p.linkedin
    };
    let fields = [&p.full_name, &p.email, &p.phone, &p.location, link];
    let filled = fields.iter().filter(|f| !f.trim().is_empty()).count();
    filled as f64 / fields.len() as f64
}

/// Entries from the draft plus visible dynamic sections of the same type.
fn entry_count(snapshot: &ExportSnapshot, section_type: SectionType) -> usize {
    let draft = &snapshot.data;
    let from_draft = match section_type {
        SectionType::WorkExperience => draft.experience.len(),
        SectionType::Education => draft.education.len(),
        SectionType::Skills => draft.skills.len().min(1),
        SectionType::Projects => draft.projects.len(),
        _ => 0,
    };
    let from_sections: usize = snapshot
        .sections
        .iter()
        .filter(|s| s.section_type == section_type)
        .map(|s| s.entries.len())
        .sum();
    from_draft + from_sections
}

fn experience_bullets(snapshot: &ExportSnapshot) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in &snapshot.data.experience {
        out.extend(item.highlights.iter().map(|h| h.trim().to_string()).filter(|h| !h.is_empty()));
        out.extend(bullets(&item.description).map(str::to_string));
    }
    for section in snapshot
        .sections
        .iter()
        .filter(|s| s.section_type == SectionType::WorkExperience)
    {
        for entry in &section.entries {
            for field in entry.iter().filter(|f| f.key == "description") {
                out.extend(bullets(&field.value).map(str::to_string));
            }
        }
    }
    out
}

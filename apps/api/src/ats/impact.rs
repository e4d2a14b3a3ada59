use serde::Serialize;

/// Why a bullet failed the quantification check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactGap {
    pub bullet: String,
    pub reason: String,
    pub suggestion: String,
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "responsible for",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "many",
    "numerous",
    "various",
    "several",
];

/// A bullet counts as quantified when it carries a digit, a percent sign or a
/// currency symbol.
pub fn is_quantified(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '%' | '$' | '€' | '£'))
}

/// Checks one bullet. `None` means it passes.
pub fn check_bullet(text: &str) -> Option<ImpactGap> {
    if is_quantified(text) {
        return None;
    }
    let lower = text.to_lowercase();

    if let Some(verb) = VAGUE_VERBS.iter().find(|v| lower.contains(*v)) {
        return Some(ImpactGap {
            bullet: text.to_string(),
            reason: format!("Vague verb '{verb}' without a measurable result"),
            suggestion: format!("Say by how much: '{verb} X by 30%' or 'saving 4 hours a week'"),
        });
    }

    if let Some(word) = VAGUE_SCALE_WORDS.iter().find(|w| lower.contains(*w)) {
        return Some(ImpactGap {
            bullet: text.to_string(),
            reason: format!("Scale word '{word}' without a number"),
            suggestion: format!("Replace '{word}' with a figure such as '5x' or '40%'"),
        });
    }

    Some(ImpactGap {
        bullet: text.to_string(),
        reason: "No quantified outcome".to_string(),
        suggestion: "Add a number, percentage, amount or time saved".to_string(),
    })
}

/// Splits free text into bullets: one per non-blank line, list markers
/// stripped.
pub fn bullets(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
}

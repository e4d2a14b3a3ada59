// Visual and structural configuration of a resume plus the generic bounded
// undo/redo stack every editor store records into.

pub mod history;
pub mod settings;

pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use settings::{CustomizationSettings, SettingsPatch, TemplateKind};

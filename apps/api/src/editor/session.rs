//! One owner's editing session.
//!
//! Composes three independent stores, each with its own history stack and its
//! own storage key: customization settings, dynamic sections, and the resume
//! draft. Undoing a font change never touches sections and vice versa.
//! The "currently editing" pointer lives here and is never persisted.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::customization::{CustomizationSettings, SettingsPatch};
use crate::editor::draft::ResumeDraft;
use crate::editor::tracked::{HistoryState, Tracked};
use crate::persistence::{load_or_default, Autosaver, KeyValueStore, SaveStatus, StorageKey};
use crate::sections::{validate_entry, SectionStore, SectionType, ValidationErrors};

/// The entry whose edit form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditingEntry {
    pub section_id: Uuid,
    pub entry_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSaveStatus {
    pub customization: SaveStatus,
    pub sections: SaveStatus,
    pub draft: SaveStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionHistory {
    pub customization: HistoryState,
    pub sections: HistoryState,
    pub draft: HistoryState,
}

pub struct EditorSession {
    owner: Uuid,
    customization: Tracked<CustomizationSettings>,
    sections: Tracked<SectionStore>,
    draft: Tracked<ResumeDraft>,
    editing: Option<EditingEntry>,
    closed: bool,
}

impl EditorSession {
    /// Restores all three stores from `store` (defaults on missing or corrupt
    /// state) and starts their autosave workers.
    pub async fn open(owner: Uuid, store: Arc<dyn KeyValueStore>, config: &EditorConfig) -> Self {
        let customization = Self::tracked(
            owner,
            &store,
            StorageKey::Customization,
            config.customization_debounce,
            config.history_limit,
        )
        .await;
        let sections = Self::tracked(
            owner,
            &store,
            StorageKey::DynamicSections,
            config.sections_debounce,
            config.history_limit,
        )
        .await;
        let draft = Self::tracked(
            owner,
            &store,
            StorageKey::Draft,
            config.draft_debounce,
            config.history_limit,
        )
        .await;

        info!("Opened editor session for {owner}");
        Self {
            owner,
            customization,
            sections,
            draft,
            editing: None,
            closed: false,
        }
    }

    async fn tracked<T>(
        owner: Uuid,
        store: &Arc<dyn KeyValueStore>,
        key: StorageKey,
        window: std::time::Duration,
        history_limit: usize,
    ) -> Tracked<T>
    where
        T: Clone + PartialEq + Serialize + serde::de::DeserializeOwned + Default + Send + 'static,
    {
        let scoped = key.scoped(owner);
        let initial: T = load_or_default(store.as_ref(), &scoped).await;
        let autosave = Autosaver::spawn(Arc::clone(store), scoped, window);
        Tracked::new(initial, history_limit).with_autosave(autosave)
    }

    /// A session with no persistence, starting from defaults.
    pub fn detached(owner: Uuid, config: &EditorConfig) -> Self {
        Self {
            owner,
            customization: Tracked::new(CustomizationSettings::default(), config.history_limit),
            sections: Tracked::new(SectionStore::default(), config.history_limit),
            draft: Tracked::new(ResumeDraft::default(), config.history_limit),
            editing: None,
            closed: false,
        }
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn settings(&self) -> &CustomizationSettings {
        self.customization.current()
    }

    pub fn sections(&self) -> &SectionStore {
        self.sections.current()
    }

    pub fn draft(&self) -> &ResumeDraft {
        self.draft.current()
    }

    pub fn editing(&self) -> Option<EditingEntry> {
        self.editing
    }

    pub fn save_status(&self) -> SessionSaveStatus {
        SessionSaveStatus {
            customization: self.customization.save_status(),
            sections: self.sections.save_status(),
            draft: self.draft.save_status(),
        }
    }

    pub fn history(&self) -> SessionHistory {
        SessionHistory {
            customization: self.customization.history_state(),
            sections: self.sections.history_state(),
            draft: self.draft.history_state(),
        }
    }

    // ── customization ──────────────────────────────────────────────────────

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.customization.update(|settings| *settings = settings.apply(patch));
    }

    /// Adds a built-in section descriptor to the settings skeleton.
    pub fn add_builtin_section(&mut self, section_type: SectionType) -> Uuid {
        self.customization
            .update(|settings| settings.add_section(section_type))
    }

    /// Restores default settings and clears every dynamic section. Both
    /// changes are recorded, so each can be undone in its own history.
    pub fn reset_to_defaults(&mut self) {
        let defaults = self.settings().defaults_keeping_ids();
        self.customization.replace(defaults);
        self.sections.update(SectionStore::clear);
        self.editing = None;
        info!("Reset customization for {}", self.owner);
    }

    pub fn undo_settings(&mut self) -> bool {
        self.customization.undo()
    }

    pub fn redo_settings(&mut self) -> bool {
        self.customization.redo()
    }

    // ── dynamic sections ───────────────────────────────────────────────────

    pub fn add_section(&mut self, template_id: &str, custom_title: Option<&str>) -> Option<Uuid> {
        let id = self
            .sections
            .update(|store| store.add_section(template_id, custom_title));
        if id.is_none() {
            debug!("Ignoring add_section for unknown template '{template_id}'");
        }
        id
    }

    pub fn delete_section(&mut self, section_id: Uuid) {
        self.sections.update(|store| store.delete_section(section_id));
        self.drop_stale_editing();
    }

    pub fn toggle_section_visibility(&mut self, section_id: Uuid) {
        self.sections
            .update(|store| store.toggle_section_visibility(section_id));
    }

    pub fn update_section_title(&mut self, section_id: Uuid, title: &str) {
        self.sections
            .update(|store| store.update_section_title(section_id, title));
    }

    pub fn reorder_sections(&mut self, ordered_ids: &[Uuid]) {
        self.sections
            .update(|store| store.reorder_sections(ordered_ids));
    }

    /// Adds an entry with template defaults and opens it for editing.
    pub fn add_entry(&mut self, section_id: Uuid) -> Option<Uuid> {
        let entry_id = self.sections.update(|store| store.add_entry(section_id))?;
        self.editing = Some(EditingEntry {
            section_id,
            entry_id,
        });
        Some(entry_id)
    }

    pub fn update_entry(&mut self, section_id: Uuid, entry_id: Uuid, field_key: &str, value: &str) {
        self.sections
            .update(|store| store.update_entry(section_id, entry_id, field_key, value));
    }

    pub fn delete_entry(&mut self, section_id: Uuid, entry_id: Uuid) {
        self.sections
            .update(|store| store.delete_entry(section_id, entry_id));
        self.drop_stale_editing();
    }

    pub fn duplicate_entry(&mut self, section_id: Uuid, entry_id: Uuid) -> Option<Uuid> {
        self.sections
            .update(|store| store.duplicate_entry(section_id, entry_id))
    }

    /// Opens an existing entry for editing. Returns `false` if it does not exist.
    pub fn start_editing(&mut self, section_id: Uuid, entry_id: Uuid) -> bool {
        let exists = self
            .sections()
            .section(section_id)
            .and_then(|s| s.entry(entry_id))
            .is_some();
        if exists {
            self.editing = Some(EditingEntry {
                section_id,
                entry_id,
            });
        }
        exists
    }

    /// Validates an entry. On success the edit form closes; on failure it
    /// stays open and the keyed messages are returned. A missing entry has
    /// nothing to validate and counts as saved.
    pub fn save_entry(&mut self, section_id: Uuid, entry_id: Uuid) -> Result<(), ValidationErrors> {
        let errors = match self.sections().section(section_id) {
            Some(section) => match section.entry(entry_id) {
                Some(entry) => validate_entry(section, entry),
                None => ValidationErrors::default(),
            },
            None => ValidationErrors::default(),
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        if self.editing
            == Some(EditingEntry {
                section_id,
                entry_id,
            })
        {
            self.editing = None;
        }
        Ok(())
    }

    pub fn undo_sections(&mut self) -> bool {
        let changed = self.sections.undo();
        self.drop_stale_editing();
        changed
    }

    pub fn redo_sections(&mut self) -> bool {
        let changed = self.sections.redo();
        self.drop_stale_editing();
        changed
    }

    fn drop_stale_editing(&mut self) {
        if let Some(editing) = self.editing {
            let still_there = self
                .sections()
                .section(editing.section_id)
                .and_then(|s| s.entry(editing.entry_id))
                .is_some();
            if !still_there {
                self.editing = None;
            }
        }
    }

    // ── draft ──────────────────────────────────────────────────────────────

    pub fn replace_draft(&mut self, draft: ResumeDraft) -> bool {
        self.draft.replace(draft)
    }

    pub fn undo_draft(&mut self) -> bool {
        self.draft.undo()
    }

    pub fn redo_draft(&mut self) -> bool {
        self.draft.redo()
    }

    // ── teardown ───────────────────────────────────────────────────────────

    /// Writes every pending autosave now.
    pub async fn flush(&self) {
        self.customization.flush().await;
        self.sections.flush().await;
        self.draft.flush().await;
    }

    /// Flush-saves pending changes and stops the autosave workers. A closed
    /// session never writes to the store again.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.customization.close().await;
        self.sections.close().await;
        self.draft.close().await;
        self.closed = true;
        info!("Closed editor session for {}", self.owner);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

//! Section/Entry Store — CRUD over dynamic sections and their entries.
//!
//! Pure and synchronous. Operations that reference a missing section or entry
//! are no-ops: ids only ever come from current state, so a stale id is not
//! worth an error path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sections::models::{Entry, Section};
use crate::sections::registry::get_template;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionStore {
    sections: Vec<Section>,
}

impl SectionStore {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, section_id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    fn section_mut(&mut self, section_id: Uuid) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    /// Sections sorted by `order`; ties keep their stored order.
    pub fn ordered(&self) -> Vec<&Section> {
        let mut sorted: Vec<&Section> = self.sections.iter().collect();
        sorted.sort_by_key(|s| s.order);
        sorted
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Appends a section built from the template `template_id`.
    /// Returns `None` (and changes nothing) when the template is unknown.
    pub fn add_section(&mut self, template_id: &str, custom_title: Option<&str>) -> Option<Uuid> {
        let template = get_template(template_id)?;
        let title = custom_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(template.name);

        let section = Section {
            id: Uuid::new_v4(),
            section_type: template.id,
            title: title.to_string(),
            order: self.sections.len() as u32 + 1,
            visible: true,
            entries: Vec::new(),
        };
        let id = section.id;
        self.sections.push(section);
        Some(id)
    }

    pub fn delete_section(&mut self, section_id: Uuid) {
        self.sections.retain(|s| s.id != section_id);
    }

    pub fn toggle_section_visibility(&mut self, section_id: Uuid) {
        if let Some(section) = self.section_mut(section_id) {
            section.visible = !section.visible;
        }
    }

    pub fn update_section_title(&mut self, section_id: Uuid, title: &str) {
        if let Some(section) = self.section_mut(section_id) {
            section.title = title.to_string();
        }
    }

    /// Rearranges sections to follow `ordered_ids` and renumbers every
    /// section as `index + 1`. Sections not listed keep their relative order
    /// after the listed ones; unknown ids are ignored.
    pub fn reorder_sections(&mut self, ordered_ids: &[Uuid]) {
        let mut remaining = std::mem::take(&mut self.sections);
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in ordered_ids {
            if let Some(pos) = remaining.iter().position(|s| s.id == *id) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.append(&mut remaining);

        for (index, section) in reordered.iter_mut().enumerate() {
            section.order = index as u32 + 1;
        }
        self.sections = reordered;
    }

    /// Appends an entry holding the template defaults and returns its id.
    pub fn add_entry(&mut self, section_id: Uuid) -> Option<Uuid> {
        let section = self.section_mut(section_id)?;
        let entry = Entry::new(section.section_type.template().default_entry());
        let id = entry.id;
        section.entries.push(entry);
        Some(id)
    }

    /// Overwrites one field. No validation happens here.
    pub fn update_entry(&mut self, section_id: Uuid, entry_id: Uuid, field_key: &str, value: &str) {
        if let Some(entry) = self
            .section_mut(section_id)
            .and_then(|s| s.entry_mut(entry_id))
        {
            entry.values.insert(field_key.to_string(), value.to_string());
        }
    }

    pub fn delete_entry(&mut self, section_id: Uuid, entry_id: Uuid) {
        if let Some(section) = self.section_mut(section_id) {
            section.entries.retain(|e| e.id != entry_id);
        }
    }

    /// Clones an entry under a fresh id, placed right after the source.
    pub fn duplicate_entry(&mut self, section_id: Uuid, entry_id: Uuid) -> Option<Uuid> {
        let section = self.section_mut(section_id)?;
        let pos = section.entries.iter().position(|e| e.id == entry_id)?;
        let copy = Entry::new(section.entries[pos].values.clone());
        let id = copy.id;
        section.entries.insert(pos + 1, copy);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_section(template_id: &str) -> (SectionStore, Uuid) {
        let mut store = SectionStore::default();
        let id = store.add_section(template_id, None).unwrap();
        (store, id)
    }

    #[test]
    fn test_add_section_defaults() {
        let (store, id) = store_with_section("skills");
        let section = store.section(id).unwrap();
        assert_eq!(section.title, "Skills");
        assert_eq!(section.order, 1);
        assert!(section.visible);
        assert!(section.entries.is_empty());
    }

    #[test]
    fn test_add_section_order_is_count_plus_one() {
        let mut store = SectionStore::default();
        store.add_section("education", None);
        store.add_section("projects", None);
        let id = store.add_section("custom", Some("Awards")).unwrap();
        let section = store.section(id).unwrap();
        assert_eq!(section.order, 3);
        assert_eq!(section.title, "Awards");
    }

    #[test]
    fn test_add_section_blank_custom_title_uses_template_name() {
        let mut store = SectionStore::default();
        let id = store.add_section("volunteer", Some("  ")).unwrap();
        assert_eq!(store.section(id).unwrap().title, "Volunteer Experience");
    }

    #[test]
    fn test_add_section_unknown_template_is_noop() {
        let mut store = SectionStore::default();
        assert!(store.add_section("professional-classic", None).is_none());
        assert!(store.sections().is_empty());
    }

    #[test]
    fn test_delete_missing_section_is_noop() {
        let (mut store, _) = store_with_section("skills");
        let before = store.clone();
        store.delete_section(Uuid::new_v4());
        assert_eq!(store, before);
    }

    #[test]
    fn test_toggle_visibility_and_title() {
        let (mut store, id) = store_with_section("languages");
        store.toggle_section_visibility(id);
        store.update_section_title(id, "Spoken Languages");
        let section = store.section(id).unwrap();
        assert!(!section.visible);
        assert_eq!(section.title, "Spoken Languages");
        store.toggle_section_visibility(id);
        assert!(store.section(id).unwrap().visible);
    }

    #[test]
    fn test_reorder_reassigns_contiguous_order() {
        let mut store = SectionStore::default();
        let a = store.add_section("education", None).unwrap();
        let b = store.add_section("projects", None).unwrap();
        let c = store.add_section("skills", None).unwrap();

        store.reorder_sections(&[c, a, b]);
        let ids: Vec<_> = store.sections().iter().map(|s| (s.id, s.order)).collect();
        assert_eq!(ids, vec![(c, 1), (a, 2), (b, 3)]);
    }

    #[test]
    fn test_reorder_partial_list_keeps_rest() {
        let mut store = SectionStore::default();
        let a = store.add_section("education", None).unwrap();
        let b = store.add_section("projects", None).unwrap();
        let c = store.add_section("skills", None).unwrap();

        store.reorder_sections(&[b, Uuid::new_v4()]);
        let ids: Vec<_> = store.sections().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![b, a, c]);
        assert_eq!(store.sections()[2].order, 3);
    }

    #[test]
    fn test_add_entry_uses_template_defaults() {
        let (mut store, sid) = store_with_section("languages");
        let eid = store.add_entry(sid).unwrap();
        let entry = store.section(sid).unwrap().entry(eid).unwrap();
        assert_eq!(entry.value("proficiency"), "Professional");
        assert_eq!(entry.value("language"), "");
    }

    #[test]
    fn test_add_entry_missing_section() {
        let mut store = SectionStore::default();
        assert!(store.add_entry(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_entry_overwrites_single_field() {
        let (mut store, sid) = store_with_section("work-experience");
        let eid = store.add_entry(sid).unwrap();
        store.update_entry(sid, eid, "company", "Acme");
        let entry = store.section(sid).unwrap().entry(eid).unwrap();
        assert_eq!(entry.value("company"), "Acme");
        assert_eq!(entry.value("position"), "");
    }

    #[test]
    fn test_delete_entry() {
        let (mut store, sid) = store_with_section("education");
        let e1 = store.add_entry(sid).unwrap();
        let e2 = store.add_entry(sid).unwrap();
        store.delete_entry(sid, e1);
        let section = store.section(sid).unwrap();
        assert_eq!(section.entries.len(), 1);
        assert_eq!(section.entries[0].id, e2);
    }

    #[test]
    fn test_duplicate_entry_is_isolated() {
        let (mut store, sid) = store_with_section("work-experience");
        let src = store.add_entry(sid).unwrap();
        store.update_entry(sid, src, "company", "Acme");
        let dup = store.duplicate_entry(sid, src).unwrap();
        assert_ne!(src, dup);

        {
            let section = store.section(sid).unwrap();
            assert_eq!(section.entries[1].id, dup);
            assert_eq!(section.entry(src).unwrap().values, section.entry(dup).unwrap().values);
        }

        store.update_entry(sid, dup, "company", "Globex");
        store.update_entry(sid, src, "position", "Engineer");
        let section = store.section(sid).unwrap();
        assert_eq!(section.entry(src).unwrap().value("company"), "Acme");
        assert_eq!(section.entry(dup).unwrap().value("company"), "Globex");
        assert_eq!(section.entry(dup).unwrap().value("position"), "");
    }

    #[test]
    fn test_ordered_is_stable_on_ties() {
        let mut store = SectionStore::default();
        let a = store.add_section("education", None).unwrap();
        let b = store.add_section("projects", None).unwrap();
        // Force a tie and a gap.
        store.sections[0].order = 5;
        store.sections[1].order = 5;
        let c = store.add_section("skills", None).unwrap();
        let ids: Vec<_> = store.ordered().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c, a, b]);
    }
}

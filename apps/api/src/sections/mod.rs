// Dynamic resume sections: typed field catalog, entry CRUD, field validation.
// Everything here is pure and synchronous; persistence and history live in
// the editor session that owns a `SectionStore`.

pub mod models;
pub mod registry;
pub mod store;
pub mod validation;

pub use models::{Section, SectionType};
pub use store::SectionStore;
pub use validation::{validate_entry, ValidationErrors};

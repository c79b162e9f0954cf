//! Campaign definitions: the static, read-only adventure graph

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load, load_directory, parse_str, DocumentFormat, LoadError};
pub use model::{Campaign, CampaignMeta, Chapter, Choice, Encounter, EncounterVariant};
pub use validation::validate;

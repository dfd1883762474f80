//! Harvest core: graph store, extraction profiles and identifier rules.
//!
//! Nothing in this crate performs IO. The engine crate feeds parsed triples
//! into a [`Graph`] and drives the [`ExtractionPipeline`] over it.
mod extract;
mod graph;
mod identifier;
mod profile;
mod record;
pub mod vocab;

pub use extract::{dataset_refs, extract, ExtractionPipeline};
pub use graph::{Graph, Literal, Node, Triple};
pub use identifier::{
    munge_title_to_name, resolve_guid, NameRegistry, NAME_MAX_LENGTH, NAME_MIN_LENGTH,
    NAME_TRUNCATE_LENGTH,
};
pub use profile::{
    Contact, DcatApProfile, MolgenisCollectionProfile, Profile, ProfileError, ProfileReader,
    Publisher, Spatial,
};
pub use record::{dict_value, Record};

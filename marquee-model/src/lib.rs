//! Shared data model for the Marquee recent-content pipeline.
//!
//! Everything here is plain data plus pure computation: catalog records as
//! the listing service hands them over, resolved metadata, the merged
//! user-facing entries, and the ranked snapshot assembly. Nothing in this
//! crate performs I/O.

pub mod entry;
pub mod kind;
pub mod snapshot;

pub use entry::{CatalogEntry, Fingerprint, MetadataResult, RecentEntry};
pub use kind::{ContentKind, ParseKindError};
pub use snapshot::ResultSnapshot;

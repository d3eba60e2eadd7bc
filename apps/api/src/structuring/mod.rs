//! Raw CV text → `StructuredCv`.

pub mod classifier;
pub mod patterns;
pub mod personal;
pub mod section;
pub mod segmenter;
pub mod structurer;

pub use structurer::{generate_ats_friendly_cv, structure_cv, AtsFriendlyCv, StructureError};

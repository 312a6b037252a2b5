//! Stem separation and drum splitting
//!
//! Separation runs an external Demucs process; the drum stem is then split
//! into kick and hats locally.

pub mod drums;
pub mod separator;

pub use drums::{split_drum_stem, split_drums, DrumSplit};
pub use separator::{stem_path, DemucsSeparator};

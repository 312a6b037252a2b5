//! Audio analysis modules
//!
//! Traits in `traits` are the seams between the pipeline and its backends;
//! the other modules hold the DSP analyzers and the concrete backends.

pub mod cues;
pub mod key;
pub mod metadata;
pub mod midi;
pub mod stems;
pub mod structure;
pub mod tempo;
pub mod timbre;
pub mod traits;
pub mod waveform;

pub use traits::{MetadataLookup, MidiTranscriber, StemSeparator, TempoKey, TempoKeyEstimator};

pub use metadata::{MusicBrainzResolver, OfflineLookup};
pub use midi::BasicPitchTranscriber;
pub use stems::DemucsSeparator;
pub use tempo::OnsetTempoEstimator;

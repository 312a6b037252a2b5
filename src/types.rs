//! Core data types for mixprep
//!
//! These types represent the domain model and flow through the pipeline.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// =============================================================================
// Musical primitives
// =============================================================================

/// The 12 pitch classes in Western music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C#/Db
    D,
    Ds, // D#/Eb
    E,
    F,
    Fs, // F#/Gb
    G,
    Gs, // G#/Ab
    A,
    As, // A#/Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chroma order (C first)
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Convert from numeric index (0 = C, 1 = C#, ..., 11 = B)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Standard sharp-based notation (e.g., "C", "F#")
    pub fn to_standard_notation(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }
}

/// Major or Minor scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

// =============================================================================
// Audio buffer
// =============================================================================

/// Decoded mono samples ready for analysis
///
/// Immutable once loaded. Sub-slices are independent copies.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Mono samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Owned copy of the first `seconds` of audio
    pub fn head(&self, seconds: f64) -> AudioBuffer {
        let n = ((seconds.max(0.0) * self.sample_rate as f64) as usize).min(self.len());
        AudioBuffer::new(self.samples[..n].to_vec(), self.sample_rate)
    }

    /// Owned copy of the last `seconds` of audio
    pub fn tail(&self, seconds: f64) -> AudioBuffer {
        let n = ((seconds.max(0.0) * self.sample_rate as f64) as usize).min(self.len());
        AudioBuffer::new(self.samples[self.len() - n..].to_vec(), self.sample_rate)
    }
}

// =============================================================================
// Stems
// =============================================================================

/// Separation models accepted by the external separator
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum SeparationModel {
    /// Four stems: vocals, drums, bass, other
    #[serde(rename = "htdemucs")]
    #[value(name = "htdemucs")]
    HtDemucs,
    /// Six stems: adds piano and guitar
    #[default]
    #[serde(rename = "htdemucs_6s")]
    #[value(name = "htdemucs_6s")]
    HtDemucs6s,
    /// Fine-tuned four stem model
    #[serde(rename = "htdemucs_ft")]
    #[value(name = "htdemucs_ft")]
    HtDemucsFt,
}

impl SeparationModel {
    /// Names accepted on the command line
    pub const NAMES: [&'static str; 3] = ["htdemucs", "htdemucs_6s", "htdemucs_ft"];

    pub fn as_str(self) -> &'static str {
        match self {
            SeparationModel::HtDemucs => "htdemucs",
            SeparationModel::HtDemucs6s => "htdemucs_6s",
            SeparationModel::HtDemucsFt => "htdemucs_ft",
        }
    }
}

impl fmt::Display for SeparationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeparationModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "htdemucs" => Ok(SeparationModel::HtDemucs),
            "htdemucs_6s" => Ok(SeparationModel::HtDemucs6s),
            "htdemucs_ft" => Ok(SeparationModel::HtDemucsFt),
            other => Err(format!(
                "unsupported separation model '{}' (expected one of: {})",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Named stem tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemName {
    Vocals,
    Drums,
    Bass,
    Other,
    Piano,
    Guitar,
    Kick,
    Hats,
}

impl StemName {
    /// Stems the external separator may produce (not every model makes all six)
    pub const SEPARATED: [StemName; 6] = [
        StemName::Vocals,
        StemName::Drums,
        StemName::Bass,
        StemName::Other,
        StemName::Piano,
        StemName::Guitar,
    ];

    /// Stems handed to the MIDI transcriber, in transcription order
    pub const MELODIC: [StemName; 3] = [StemName::Piano, StemName::Guitar, StemName::Bass];

    /// Stems that get a waveform, in display order
    pub const DISPLAYED: [StemName; 7] = [
        StemName::Vocals,
        StemName::Bass,
        StemName::Kick,
        StemName::Hats,
        StemName::Piano,
        StemName::Guitar,
        StemName::Other,
    ];

    /// Name used in file names (`<base>_<name>.wav`)
    pub fn as_str(self) -> &'static str {
        match self {
            StemName::Vocals => "vocals",
            StemName::Drums => "drums",
            StemName::Bass => "bass",
            StemName::Other => "other",
            StemName::Piano => "piano",
            StemName::Guitar => "guitar",
            StemName::Kick => "kick",
            StemName::Hats => "hats",
        }
    }

    /// Key used by the front end for waveform and file maps
    pub fn display_key(self) -> &'static str {
        match self {
            StemName::Vocals => "vocal",
            StemName::Hats => "hihats",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for StemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stem name to isolated audio file
///
/// A missing key is a valid state; the pipeline works around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemSet {
    paths: BTreeMap<StemName, PathBuf>,
}

impl StemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stem: StemName, path: PathBuf) {
        self.paths.insert(stem, path);
    }

    pub fn get(&self, stem: StemName) -> Option<&Path> {
        self.paths.get(&stem).map(PathBuf::as_path)
    }

    pub fn contains(&self, stem: StemName) -> bool {
        self.paths.contains_key(&stem)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StemName, &Path)> {
        self.paths.iter().map(|(k, v)| (*k, v.as_path()))
    }

    /// Basename of a stem file, or an empty string when the stem is absent
    pub fn file_name(&self, stem: StemName) -> String {
        self.get(stem).map(file_name_of).unwrap_or_default()
    }
}

/// Basename of a path as an owned string
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// =============================================================================
// Analysis results
// =============================================================================

/// Coarse rhythmic/melodic balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Texture {
    Rhythmic,
    Melodic,
    Balanced,
}

/// Coarse spectral brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Deep,
    Warm,
    Crisp,
    Bright,
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Texture and color descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timbre {
    pub texture: Texture,
    pub color: Color,
}

impl Default for Timbre {
    fn default() -> Self {
        Self {
            texture: Texture::Balanced,
            color: Color::Warm,
        }
    }
}

/// Display value for an undetected mix point
pub const UNDETECTED_TIME: &str = "00:00";

/// Structural mix points, formatted mm:ss
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixPoints {
    pub intro_end: String,
    pub outro_start: String,
    pub drop: Option<String>,
}

impl Default for MixPoints {
    fn default() -> Self {
        Self {
            intro_end: UNDETECTED_TIME.to_string(),
            outro_start: UNDETECTED_TIME.to_string(),
            drop: None,
        }
    }
}

/// Point or range extent of a cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CueSpan {
    Point,
    Range {
        #[serde(rename = "endTime")]
        end_time: f64,
        duration: f64,
    },
}

/// One structural or vocal landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub id: String,
    pub label: String,
    /// Display timestamp (mm:ss)
    pub time: String,
    #[serde(rename = "startTime")]
    pub start_time: f64,
    #[serde(flatten)]
    pub span: CueSpan,
    pub color: String,
}

impl Cue {
    pub fn is_range(&self) -> bool {
        matches!(self.span, CueSpan::Range { .. })
    }
}

/// Artist/title lookup result plus the uploaded file name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl TrackMeta {
    /// True when the lookup produced nothing
    pub fn is_empty(&self) -> bool {
        self.artist.is_none()
            && self.title.is_none()
            && self.year.is_none()
            && self.release_id.is_none()
            && self.cover_art_url.is_none()
    }
}

/// Stem file basenames, empty string when a stem is absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemFiles {
    pub main: String,
    pub vocal: String,
    pub bass: String,
    pub kick: String,
    pub hihats: String,
    pub piano: String,
    pub guitar: String,
    pub other: String,
}

impl StemFiles {
    pub fn from_stems(main: &Path, stems: &StemSet) -> Self {
        Self {
            main: file_name_of(main),
            vocal: stems.file_name(StemName::Vocals),
            bass: stems.file_name(StemName::Bass),
            kick: stems.file_name(StemName::Kick),
            hihats: stems.file_name(StemName::Hats),
            piano: stems.file_name(StemName::Piano),
            guitar: stems.file_name(StemName::Guitar),
            other: stems.file_name(StemName::Other),
        }
    }
}

/// String-keyed map that keeps insertion order on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((k, v)) = access.next_entry::<String, V>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Terminal artifact of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub bpm: i64,
    /// Camelot notation
    pub key: String,
    pub texture: Texture,
    pub color: Color,
    pub loudness: f64,
    pub mix_points: MixPoints,
    pub waveform: Vec<f32>,
    /// Per-stem waveforms keyed by display name
    pub stems: OrderedMap<Vec<f32>>,
    pub stem_files: StemFiles,
    /// Melodic stem display name to MIDI file basename
    pub midi_files: OrderedMap<String>,
    pub cues: Vec<Cue>,
    pub meta: TrackMeta,
    pub genre: String,
}

// =============================================================================
// Supported formats
// =============================================================================

/// Audio formats accepted as pipeline input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    Aiff,
    Ogg,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "aiff" | "aif" => Some(AudioFormat::Aiff),
            "ogg" => Some(AudioFormat::Ogg),
            _ => None,
        }
    }

    /// Check if a path has a supported extension
    pub fn is_supported_path(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .is_some()
    }
}

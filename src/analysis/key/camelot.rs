//! Camelot Wheel notation mapping
//!
//! The Camelot Wheel is a visual representation of musical keys that
//! makes harmonic mixing intuitive for DJs.
//!
//! - Numbers 1-12 represent positions on the wheel
//! - 'A' suffix = minor key, 'B' suffix = major key
//! - Adjacent numbers are harmonically compatible (perfect fifth)
//! - Same number, different letter = relative major/minor

use crate::types::{Mode, PitchClass};

/// Key name (root, plus `m` for minor) to Camelot code
///
/// Sharp spellings cover every key; a few flat spellings are accepted too.
const CAMELOT_TABLE: &[(&str, &str)] = &[
    // Major keys (B)
    ("C", "8B"),
    ("G", "9B"),
    ("D", "10B"),
    ("A", "11B"),
    ("E", "12B"),
    ("B", "1B"),
    ("F#", "2B"),
    ("Gb", "2B"),
    ("C#", "3B"),
    ("Db", "3B"),
    ("G#", "4B"),
    ("Ab", "4B"),
    ("D#", "5B"),
    ("Eb", "5B"),
    ("A#", "6B"),
    ("Bb", "6B"),
    ("F", "7B"),
    // Minor keys (A)
    ("Am", "8A"),
    ("Em", "9A"),
    ("Bm", "10A"),
    ("F#m", "11A"),
    ("C#m", "12A"),
    ("G#m", "1A"),
    ("D#m", "2A"),
    ("Ebm", "2A"),
    ("A#m", "3A"),
    ("Bbm", "3A"),
    ("Fm", "4A"),
    ("Cm", "5A"),
    ("Gm", "6A"),
    ("Dm", "7A"),
];

/// Camelot code for a root name and mode
///
/// Roots missing from the table come back literally (`"root"` or `"rootm"`).
pub fn camelot_for(root: &str, mode: Mode) -> String {
    let name = match mode {
        Mode::Major => root.to_string(),
        Mode::Minor => format!("{}m", root),
    };
    CAMELOT_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or(name)
}

/// Camelot code for a detected pitch class
pub fn to_camelot(pitch: PitchClass, mode: Mode) -> String {
    camelot_for(pitch.to_standard_notation(), mode)
}

/// True for `1A`..`12A` and `1B`..`12B`
pub fn is_camelot_code(code: &str) -> bool {
    let Some(letter) = code.chars().last() else {
        return false;
    };
    if letter != 'A' && letter != 'B' {
        return false;
    }
    matches!(code[..code.len() - 1].parse::<u8>(), Ok(1..=12))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelot_mapping_covers_all_keys() {
        let mut codes = std::collections::HashSet::new();

        for pitch in PitchClass::ALL {
            for mode in [Mode::Major, Mode::Minor] {
                let code = to_camelot(pitch, mode);
                assert!(is_camelot_code(&code), "Unmapped {:?} {:?}: {}", pitch, mode, code);
                assert!(codes.insert(code.clone()), "Duplicate code: {}", code);
            }
        }

        assert_eq!(codes.len(), 24);
    }

    #[test]
    fn test_camelot_examples() {
        assert_eq!(to_camelot(PitchClass::A, Mode::Minor), "8A");
        assert_eq!(to_camelot(PitchClass::C, Mode::Major), "8B");
        assert_eq!(to_camelot(PitchClass::Cs, Mode::Minor), "12A");
    }

    #[test]
    fn test_flat_aliases() {
        assert_eq!(camelot_for("Db", Mode::Major), "3B");
        assert_eq!(camelot_for("Bb", Mode::Minor), "3A");
        assert_eq!(camelot_for("Eb", Mode::Minor), "2A");
    }

    #[test]
    fn test_unmapped_root_falls_back_to_name() {
        assert_eq!(camelot_for("Cb", Mode::Major), "Cb");
        assert_eq!(camelot_for("Db", Mode::Minor), "Dbm");
    }

    #[test]
    fn test_is_camelot_code() {
        assert!(is_camelot_code("1A"));
        assert!(is_camelot_code("12B"));
        assert!(!is_camelot_code("13A"));
        assert!(!is_camelot_code("0B"));
        assert!(!is_camelot_code("C#m"));
        assert!(!is_camelot_code(""));
    }
}

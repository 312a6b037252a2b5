//! Integration tests for the mixprep pipeline
//!
//! These tests drive full analysis runs over synthesized WAV files, with fake
//! backends at the trait seams and shell scripts standing in for the external
//! separator and transcriber.

use mixprep::analysis::{
    MetadataLookup, MidiTranscriber, MusicBrainzResolver, OfflineLookup, OnsetTempoEstimator,
    StemSeparator, TempoKeyEstimator,
};
use mixprep::config::{MetadataConfig, Settings};
use mixprep::error::{MixprepError, Result};
use mixprep::pipeline::{Pipeline, PipelineEvent};
use mixprep::types::{AnalysisResult, SeparationModel, StemName, StemSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SR: u32 = 22050;

// =============================================================================
// Fixtures
// =============================================================================

fn write_samples(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV file");
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// Mono sine wave at 50% amplitude
fn generate_sine_wav(path: &Path, frequency_hz: f32, duration_secs: f32, sample_rate: u32) {
    use std::f32::consts::PI;
    let n = (duration_secs * sample_rate as f32) as usize;
    let samples: Vec<f32> = (0..n)
        .map(|i| (2.0 * PI * frequency_hz * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    write_samples(path, &samples, sample_rate);
}

/// Decaying 5 ms clicks on every beat
fn generate_click_track(path: &Path, bpm: f32, duration_secs: f32, sample_rate: u32) {
    let n = (duration_secs * sample_rate as f32) as usize;
    let samples_per_beat = (60.0 / bpm * sample_rate as f32) as usize;
    let impulse_samples = (0.005 * sample_rate as f32) as usize;

    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let position_in_beat = i % samples_per_beat;
            if position_in_beat < impulse_samples {
                0.8 * (-5.0 * position_in_beat as f32 / impulse_samples as f32).exp()
            } else {
                0.0
            }
        })
        .collect();
    write_samples(path, &samples, sample_rate);
}

fn generate_silence(path: &Path, duration_secs: f32, sample_rate: u32) {
    write_samples(path, &vec![0.0; (duration_secs * sample_rate as f32) as usize], sample_rate);
}

/// Settings for tests: no progress bar, no network
fn create_test_settings(input: &Path) -> Settings {
    Settings {
        input: input.to_path_buf(),
        metadata: MetadataConfig {
            enabled: false,
            ..MetadataConfig::default()
        },
        render_threads: 2,
        show_progress: false,
        ..Settings::default()
    }
}

// =============================================================================
// Fake backends
// =============================================================================

/// Writes a tone per requested stem, like a separator would
struct FakeSeparator {
    stems: Vec<StemName>,
    failure: Option<String>,
    corrupt: Vec<StemName>,
    calls: Arc<AtomicUsize>,
}

impl FakeSeparator {
    fn with_stems(stems: &[StemName]) -> Self {
        Self {
            stems: stems.to_vec(),
            failure: None,
            corrupt: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl StemSeparator for FakeSeparator {
    fn separate(&self, input: &Path, _model: SeparationModel, output_dir: &Path) -> Result<StemSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            return Err(MixprepError::separation(reason.clone()));
        }

        let base = input.file_stem().unwrap().to_string_lossy().into_owned();
        let mut set = StemSet::new();
        for (i, &stem) in self.stems.iter().enumerate() {
            let path = output_dir.join(format!("{}_{}.wav", base, stem.as_str()));
            if self.corrupt.contains(&stem) {
                std::fs::write(&path, b"definitely not audio").unwrap();
            } else {
                generate_sine_wav(&path, 110.0 * (i + 1) as f32, 4.0, SR);
            }
            set.insert(stem, path);
        }
        Ok(set)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Writes an empty MIDI file and records the order of calls
#[derive(Default)]
struct FakeTranscriber {
    seen: Arc<Mutex<Vec<String>>>,
}

impl MidiTranscriber for FakeTranscriber {
    fn transcribe(&self, stem: &Path, output_dir: &Path) -> Result<Option<PathBuf>> {
        let base = stem.file_stem().unwrap().to_string_lossy().into_owned();
        self.seen.lock().unwrap().push(base.clone());
        let midi = output_dir.join(format!("{}_basic_pitch.mid", base));
        std::fs::write(&midi, b"MThd").unwrap();
        Ok(Some(midi))
    }

    fn name(&self) -> &'static str {
        "fake-midi"
    }
}

fn test_pipeline(input: &Path, separator: FakeSeparator, transcriber: FakeTranscriber) -> Pipeline {
    Pipeline::with_backends(
        create_test_settings(input),
        Box::new(OnsetTempoEstimator::new()),
        Box::new(separator),
        Box::new(OfflineLookup),
        Box::new(transcriber),
    )
}

fn progress_messages(events: &[PipelineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress { message, .. } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

fn expect_complete(events: &[PipelineEvent]) -> &AnalysisResult {
    match events.last() {
        Some(PipelineEvent::Complete { data }) => data,
        other => panic!("expected completion as last event, got {:?}", other),
    }
}

fn assert_stream_shape(events: &[PipelineEvent]) {
    let terminal = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal, 1, "exactly one terminal event");
    assert!(events.last().unwrap().is_terminal(), "terminal event must be last");

    let percents: Vec<u8> = events.iter().filter_map(PipelineEvent::percent).collect();
    assert!(
        percents.windows(2).all(|w| w[0] <= w[1]),
        "progress must not go backwards: {:?}",
        percents
    );
}

// =============================================================================
// Orchestrator
// =============================================================================

#[test]
fn test_full_run_with_six_stems() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 220.0, 6.0, SR);

    let transcriber = FakeTranscriber::default();
    let seen = transcriber.seen.clone();
    let pipeline = test_pipeline(&input, FakeSeparator::with_stems(&StemName::SEPARATED), transcriber);

    let events: Vec<_> = pipeline.run().collect();
    assert_stream_shape(&events);

    let messages = progress_messages(&events);
    assert_eq!(messages[3], "Separating (htdemucs_6s)...");
    assert_eq!(
        &messages[messages.len() - 3..],
        &[
            "Transcribing MIDI: PIANO...",
            "Transcribing MIDI: GUITAR...",
            "Transcribing MIDI: BASS...",
        ]
    );
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["track_piano", "track_guitar", "track_bass"]
    );

    let result = expect_complete(&events);
    assert_eq!(
        result.stems.keys().collect::<Vec<_>>(),
        vec!["vocal", "bass", "kick", "hihats", "piano", "guitar", "other"]
    );
    assert!(result.stems.iter().all(|(_, w)| w.len() == 150));
    assert_eq!(result.stem_files.kick, "track_kick.wav");
    assert_eq!(result.stem_files.hihats, "track_hats.wav");
    assert_eq!(result.stem_files.vocal, "track_vocals.wav");
    assert!(dir.path().join("track_kick.wav").exists());
    assert!(dir.path().join("track_hats.wav").exists());

    assert_eq!(result.midi_files.keys().collect::<Vec<_>>(), vec!["piano", "guitar", "bass"]);
    assert_eq!(
        result.midi_files.get("piano").map(String::as_str),
        Some("track_piano_basic_pitch.mid")
    );
    assert_eq!(result.meta.filename.as_deref(), Some("track.wav"));
}

#[test]
fn test_separation_failure_ends_with_single_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 220.0, 3.0, SR);

    let mut separator = FakeSeparator::with_stems(&StemName::SEPARATED);
    separator.failure = Some("Demucs failed with exit code 1".to_string());
    let pipeline = test_pipeline(&input, separator, FakeTranscriber::default());

    let events: Vec<_> = pipeline.run().collect();
    assert_stream_shape(&events);

    let errors: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Error { message } => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("failed"));
    assert!(errors[0].starts_with("Stem separation failed: "));
    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Complete { .. })));
    assert_eq!(progress_messages(&events).last().unwrap(), "Separating (htdemucs_6s)...");
}

#[test]
fn test_drum_split_failure_degrades() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 220.0, 4.0, SR);

    let mut separator = FakeSeparator::with_stems(&[StemName::Vocals, StemName::Drums, StemName::Bass]);
    separator.corrupt = vec![StemName::Drums];
    let pipeline = test_pipeline(&input, separator, FakeTranscriber::default());

    let events: Vec<_> = pipeline.run().collect();
    let result = expect_complete(&events);
    assert_eq!(result.stem_files.kick, "");
    assert_eq!(result.stem_files.hihats, "");
    assert!(!result.stems.contains_key("kick"));
    assert!(!result.stems.contains_key("hihats"));
    assert!(result.stems.contains_key("vocal"));
}

#[test]
fn test_unreadable_vocal_stem_degrades() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 220.0, 4.0, SR);

    let mut separator = FakeSeparator::with_stems(&[StemName::Vocals, StemName::Drums, StemName::Bass]);
    separator.corrupt = vec![StemName::Vocals];
    let pipeline = test_pipeline(&input, separator, FakeTranscriber::default());

    let events: Vec<_> = pipeline.run().collect();
    assert_stream_shape(&events);
    assert!(matches!(events.last(), Some(PipelineEvent::Complete { .. })));

    let result = expect_complete(&events);
    let vocal = result.stems.get("vocal").expect("vocal waveform present");
    assert_eq!(vocal.len(), 150);
    assert!(vocal.iter().all(|&v| v == 0.0));

    let bass = result.stems.get("bass").expect("bass waveform present");
    let peak = bass.iter().cloned().fold(0.0f32, f32::max);
    assert!((peak - 1.0).abs() < 1e-6, "bass peak {}", peak);

    assert!(result.cues.is_empty(), "{:?}", result.cues);
    assert_eq!(result.stem_files.vocal, "track_vocals.wav");
}

#[test]
fn test_four_stem_model_has_no_piano_entries() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 220.0, 4.0, SR);

    let separator = FakeSeparator::with_stems(&[
        StemName::Vocals,
        StemName::Drums,
        StemName::Bass,
        StemName::Other,
    ]);
    let pipeline = test_pipeline(&input, separator, FakeTranscriber::default());

    let events: Vec<_> = pipeline.analyze(&input, SeparationModel::HtDemucs).collect();
    let messages = progress_messages(&events);
    assert!(messages.contains(&"Separating (htdemucs)...".to_string()));
    assert!(!messages.iter().any(|m| m.contains("PIANO") || m.contains("GUITAR")));
    assert!(messages.contains(&"Transcribing MIDI: BASS...".to_string()));

    let result = expect_complete(&events);
    assert!(!result.stems.contains_key("piano"));
    assert!(!result.stems.contains_key("guitar"));
    assert_eq!(result.stem_files.piano, "");
    assert_eq!(result.midi_files.keys().collect::<Vec<_>>(), vec!["bass"]);
}

#[test]
fn test_silent_input_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("silence.wav");
    generate_silence(&input, 5.0, SR);

    let pipeline = test_pipeline(&input, FakeSeparator::with_stems(&[]), FakeTranscriber::default());
    let events: Vec<_> = pipeline.run().collect();
    assert_stream_shape(&events);

    let result = expect_complete(&events);
    assert!(result.waveform.iter().all(|&v| v == 0.0));
    assert_eq!(result.waveform.len(), 150);
    assert_eq!(result.key, "12A");
    assert_eq!(result.bpm, 0);
    assert_eq!(result.genre, "Balanced Warm");
    assert_eq!(result.mix_points.intro_end, "00:00");
    assert!(result.mix_points.drop.is_none());
}

#[test]
fn test_undecodable_input_fails_at_load() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.mp3");
    std::fs::write(&input, b"this is not an mp3").unwrap();

    let separator = FakeSeparator::with_stems(&StemName::SEPARATED);
    let calls = separator.calls.clone();
    let pipeline = test_pipeline(&input, separator, FakeTranscriber::default());

    let events: Vec<_> = pipeline.run().collect();
    assert_eq!(events.len(), 2);
    match &events[1] {
        PipelineEvent::Error { message } => assert!(message.starts_with("Audio load failed: ")),
        other => panic!("expected error, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_abandoned_run_does_no_further_work() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 220.0, 3.0, SR);

    let separator = FakeSeparator::with_stems(&StemName::SEPARATED);
    let calls = separator.calls.clone();
    let pipeline = test_pipeline(&input, separator, FakeTranscriber::default());

    let first: Vec<_> = pipeline.run().take(3).collect();
    assert_eq!(first.last(), Some(&PipelineEvent::progress("Fetching metadata...", 20)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("track_vocals.wav").exists());
}

#[test]
fn test_events_serialize_as_ndjson() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("track.wav");
    generate_sine_wav(&input, 330.0, 3.0, SR);

    let pipeline = test_pipeline(&input, FakeSeparator::with_stems(&[StemName::Vocals]), FakeTranscriber::default());
    let stream: String = pipeline.run().map(|e| e.to_ndjson().unwrap()).collect();

    let lines: Vec<&str> = stream.lines().collect();
    assert!(lines.len() >= 8);
    for line in &lines {
        let json: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(json["type"].is_string());
    }

    let last: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
    assert_eq!(last["type"], "complete");
    let data = &last["data"];
    for key in ["bpm", "key", "texture", "color", "loudness", "mix_points", "waveform", "stems",
        "stem_files", "midi_files", "cues", "meta", "genre"]
    {
        assert!(data.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(data["loudness"], -14.0);
    assert_eq!(data["meta"], serde_json::json!({ "filename": "track.wav" }));
}

// =============================================================================
// Tempo
// =============================================================================

#[test]
fn test_bpm_detection_120_click_track() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("click_120bpm.wav");
    generate_click_track(&path, 120.0, 20.0, 44100);

    let buffer = mixprep::audio::decode(&path, Some(180.0)).unwrap();
    assert_eq!(buffer.sample_rate, SR);
    let estimate = OnsetTempoEstimator::new().estimate(&buffer).unwrap();
    assert!(
        (estimate.bpm - 120.0).abs() <= 3.0,
        "120 BPM click track: detected {} BPM",
        estimate.bpm
    );
}

#[test]
fn test_analysis_window_caps_loaded_audio() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("long.wav");
    generate_sine_wav(&path, 440.0, 8.0, SR);

    let clip = mixprep::audio::decode(&path, Some(5.0)).unwrap();
    let full = mixprep::audio::decode(&path, None).unwrap();
    assert!((clip.duration - 5.0).abs() < 0.05);
    assert!((full.duration - 8.0).abs() < 0.05);
}

// =============================================================================
// Metadata service
// =============================================================================

mod http {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve one canned response; the request line is sent back on the channel
    pub fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/ws/2/recording", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            let _ = tx.send(request_line);
        });

        (url, rx)
    }
}

fn resolver_for(url: String) -> MusicBrainzResolver {
    MusicBrainzResolver::new(MetadataConfig {
        endpoint: url,
        ..MetadataConfig::default()
    })
    .unwrap()
}

#[test]
fn test_metadata_server_error_yields_empty_record() {
    let (url, _rx) = http::serve_once("500 Internal Server Error", "{}");
    let meta = resolver_for(url).resolve("Artist - Song.mp3");
    assert!(meta.is_empty());
    assert!(meta.filename.is_none());
}

#[test]
fn test_metadata_success() {
    let body = r#"{"recordings":[{"title":"Song","date":"1999-03-01",
        "artist-credit":[{"artist":{"name":"Artist"}}],"releases":[{"id":"rel-1"}]}]}"#;
    let (url, rx) = http::serve_once("200 OK", body);

    let meta = resolver_for(url).resolve("Artist_-_Song (Official Video).mp3");
    assert_eq!(meta.artist.as_deref(), Some("Artist"));
    assert_eq!(meta.title.as_deref(), Some("Song"));
    assert_eq!(meta.year.as_deref(), Some("1999"));
    assert_eq!(meta.release_id.as_deref(), Some("rel-1"));
    assert_eq!(
        meta.cover_art_url.as_deref(),
        Some("http://coverartarchive.org/release/rel-1/front")
    );

    let request_line = rx.recv().unwrap();
    assert!(request_line.starts_with("GET /ws/2/recording?"));
    assert!(request_line.contains("fmt=json"));
    assert!(request_line.contains("limit=1"));
    assert!(request_line.contains("query=Artist"));
}

#[test]
fn test_metadata_server_error_leaves_only_filename_in_result() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Artist - Song.wav");
    generate_sine_wav(&input, 220.0, 3.0, SR);

    let (url, _rx) = http::serve_once("500 Internal Server Error", "{}");
    let pipeline = Pipeline::with_backends(
        create_test_settings(&input),
        Box::new(OnsetTempoEstimator::new()),
        Box::new(FakeSeparator::with_stems(&[])),
        Box::new(resolver_for(url)),
        Box::new(FakeTranscriber::default()),
    );

    let events: Vec<_> = pipeline.run().collect();
    let result = expect_complete(&events);
    assert_eq!(
        serde_json::to_value(&result.meta).unwrap(),
        serde_json::json!({ "filename": "Artist - Song.wav" })
    );
}

// =============================================================================
// External processes (unix shell stand-ins)
// =============================================================================

#[cfg(unix)]
mod external {
    use super::*;
    use mixprep::analysis::{BasicPitchTranscriber, DemucsSeparator};
    use mixprep::config::{DevicePreference, SeparatorSettings, TranscriberSettings};
    use std::time::Duration;

    /// Mimics `demucs.separate -n M -o OUT --device D INPUT` for four stems
    const FAKE_DEMUCS: &str = r#"
model="$2"; out="$4"; input="$7"
name=$(basename "$input"); name="${name%.*}"
mkdir -p "$out/$model/$name"
for s in vocals drums bass other; do cp "$input" "$out/$model/$name/$s.wav"; done
"#;

    /// Mimics `basic-pitch OUT_DIR INPUT`
    const FAKE_BASIC_PITCH: &str = r#"
b=$(basename "$2"); b="${b%.*}"
printf 'MThd' > "$1/${b}_basic_pitch.mid"
"#;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into(), "fake".into()]
    }

    fn separator(script: &str, timeout: Duration) -> DemucsSeparator {
        DemucsSeparator::new(SeparatorSettings {
            command: sh(script),
            timeout,
            device: DevicePreference::Cpu,
        })
    }

    #[test]
    fn test_demucs_script_stems_are_copied() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("track.wav");
        generate_sine_wav(&input, 220.0, 1.0, SR);

        let stems = separator(FAKE_DEMUCS, Duration::from_secs(30))
            .separate(&input, SeparationModel::HtDemucs, dir.path())
            .unwrap();

        assert_eq!(stems.len(), 4);
        assert!(!stems.contains(StemName::Piano));
        for stem in ["vocals", "drums", "bass", "other"] {
            assert!(dir.path().join(format!("track_{}.wav", stem)).exists());
        }

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".mixprep-separate-"))
            .collect();
        assert!(leftovers.is_empty(), "scratch directory must be removed");
    }

    #[test]
    fn test_demucs_nonzero_exit_is_separation_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("track.wav");
        generate_sine_wav(&input, 220.0, 1.0, SR);

        let err = separator("exit 2", Duration::from_secs(30))
            .separate(&input, SeparationModel::HtDemucs6s, dir.path())
            .unwrap_err();
        assert!(matches!(err, MixprepError::SeparationError { .. }));
        assert!(err.to_string().contains("exit code 2"));
    }

    #[test]
    fn test_demucs_timeout_is_distinguishable() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("track.wav");
        generate_sine_wav(&input, 220.0, 1.0, SR);

        let err = separator("sleep 10", Duration::from_millis(300))
            .separate(&input, SeparationModel::HtDemucs6s, dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_basic_pitch_script_output_is_found() {
        let dir = TempDir::new().unwrap();
        let stem = dir.path().join("track_piano.wav");
        generate_sine_wav(&stem, 262.0, 1.0, SR);

        let transcriber = BasicPitchTranscriber::new(TranscriberSettings {
            command: sh(FAKE_BASIC_PITCH),
            timeout: Duration::from_secs(30),
            enabled: true,
        });
        let midi = transcriber.transcribe(&stem, dir.path()).unwrap();
        assert_eq!(midi, Some(dir.path().join("track_piano_basic_pitch.mid")));
    }
}

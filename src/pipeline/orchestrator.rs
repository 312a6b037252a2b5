//! Pipeline orchestration
//!
//! `Pipeline::analyze` returns a lazy `Analysis` iterator. Each call to
//! `next` either announces the upcoming stage with a progress event or runs
//! that stage; a fatal failure yields one error event and ends the sequence.
//! Dropping the iterator mid-run drops all per-run state, including any
//! separation scratch directory.

use crate::analysis::metadata::{MusicBrainzResolver, OfflineLookup};
use crate::analysis::stems::{split_drum_stem, DemucsSeparator};
use crate::analysis::{
    cues, structure, timbre, waveform, BasicPitchTranscriber, MetadataLookup, MidiTranscriber,
    OnsetTempoEstimator, StemSeparator, TempoKey, TempoKeyEstimator,
};
use crate::audio::decode;
use crate::config::Settings;
use crate::dsp::hpss::harmonic;
use crate::error::{MixprepError, Result};
use crate::pipeline::events::PipelineEvent;
use crate::types::{
    file_name_of, AnalysisResult, AudioBuffer, Cue, MixPoints, OrderedMap, SeparationModel,
    StemFiles, StemName, StemSet, Timbre, TrackMeta,
};
use rayon::prelude::*;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Reference loudness carried in every result (LUFS)
pub const REFERENCE_LOUDNESS: f64 = -14.0;

/// Analysis stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    TempoKey,
    Metadata,
    Separating,
    DrumSplit,
    Waveforms,
    FinalAnalysis,
    Cues,
    Transcribing,
    Done,
    Failed,
}

/// Analysis pipeline with its backends
pub struct Pipeline {
    settings: Settings,
    estimator: Box<dyn TempoKeyEstimator>,
    separator: Box<dyn StemSeparator>,
    metadata: Box<dyn MetadataLookup>,
    transcriber: Box<dyn MidiTranscriber>,
}

impl Pipeline {
    /// Build a pipeline with the default backends for `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        let metadata: Box<dyn MetadataLookup> = if settings.metadata.enabled {
            Box::new(MusicBrainzResolver::new(settings.metadata.clone())?)
        } else {
            Box::new(OfflineLookup)
        };

        Ok(Self {
            estimator: Box::new(OnsetTempoEstimator::new()),
            separator: Box::new(DemucsSeparator::new(settings.separation.clone())),
            transcriber: Box::new(BasicPitchTranscriber::new(settings.transcription.clone())),
            metadata,
            settings,
        })
    }

    /// Build a pipeline around caller-supplied backends
    pub fn with_backends(
        settings: Settings,
        estimator: Box<dyn TempoKeyEstimator>,
        separator: Box<dyn StemSeparator>,
        metadata: Box<dyn MetadataLookup>,
        transcriber: Box<dyn MidiTranscriber>,
    ) -> Self {
        Self {
            settings,
            estimator,
            separator,
            metadata,
            transcriber,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Analyze the configured input with the configured model
    pub fn run(&self) -> Analysis<'_> {
        self.analyze(&self.settings.input, self.settings.model)
    }

    /// Start analyzing `path`; nothing runs until the iterator is polled
    pub fn analyze(&self, path: &Path, model: SeparationModel) -> Analysis<'_> {
        info!(
            "Starting analysis for {} with model {} (estimator {}, separator {}, metadata {}, transcriber {})",
            path.display(),
            model,
            self.estimator.name(),
            self.separator.name(),
            self.metadata.name(),
            self.transcriber.name()
        );
        Analysis {
            pipeline: self,
            stage: Stage::Loading,
            announced: false,
            run: RunState::new(path, model),
        }
    }
}

/// Per-run data, filled in stage by stage
struct RunState {
    path: PathBuf,
    model: SeparationModel,
    output_dir: PathBuf,
    base_name: String,
    filename: String,
    started: Instant,

    clip: Option<AudioBuffer>,
    tempo_key: Option<TempoKey>,
    meta: TrackMeta,
    stems: StemSet,
    full: Option<AudioBuffer>,
    waveform: Vec<f32>,
    stem_waveforms: OrderedMap<Vec<f32>>,
    timbre: Timbre,
    drop: Option<f64>,
    mix_points: MixPoints,
    cues: Vec<Cue>,
    midi_queue: VecDeque<StemName>,
    midi_current: Option<StemName>,
    midi_files: OrderedMap<String>,
}

impl RunState {
    fn new(path: &Path, model: SeparationModel) -> Self {
        let output_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            model,
            output_dir,
            base_name,
            filename: file_name_of(path),
            started: Instant::now(),
            clip: None,
            tempo_key: None,
            meta: TrackMeta::default(),
            stems: StemSet::new(),
            full: None,
            waveform: Vec::new(),
            stem_waveforms: OrderedMap::new(),
            timbre: Timbre::default(),
            drop: None,
            mix_points: MixPoints::default(),
            cues: Vec::new(),
            midi_queue: VecDeque::new(),
            midi_current: None,
            midi_files: OrderedMap::new(),
        }
    }
}

/// Lazy, single-pass event sequence of one analysis run
pub struct Analysis<'a> {
    pipeline: &'a Pipeline,
    stage: Stage,
    announced: bool,
    run: RunState,
}

impl Analysis<'_> {
    /// Stage that the next call to `next` announces or runs
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Progress event introducing the current stage, if it has one
    fn announcement(&mut self) -> Option<PipelineEvent> {
        let event = match self.stage {
            Stage::Loading => PipelineEvent::progress("Loading audio file...", 5),
            Stage::TempoKey => PipelineEvent::progress("Detecting BPM & Key...", 10),
            Stage::Metadata => PipelineEvent::progress("Fetching metadata...", 20),
            Stage::Separating => {
                PipelineEvent::progress(format!("Separating ({})...", self.run.model), 30)
            }
            Stage::DrumSplit => PipelineEvent::progress("Splitting Drums (Kick/Hats)...", 70),
            Stage::Waveforms => PipelineEvent::progress("Generating Waveforms...", 80),
            Stage::FinalAnalysis => PipelineEvent::progress("Final Analysis...", 90),
            Stage::Transcribing => {
                let stem = self.next_melodic_stem()?;
                self.run.midi_current = Some(stem);
                PipelineEvent::progress(
                    format!("Transcribing MIDI: {}...", stem.as_str().to_uppercase()),
                    90,
                )
            }
            Stage::Cues | Stage::Done | Stage::Failed => return None,
        };
        Some(event)
    }

    /// Run the current stage, moving to the next one
    ///
    /// Returns the terminal event when the run completes; `Err` carries the
    /// message of a fatal failure.
    fn step(&mut self) -> std::result::Result<Option<PipelineEvent>, String> {
        let stage_started = Instant::now();
        let (next, event) = match self.stage {
            Stage::Loading => {
                self.load()?;
                (Stage::TempoKey, None)
            }
            Stage::TempoKey => {
                self.detect_tempo_key()?;
                (Stage::Metadata, None)
            }
            Stage::Metadata => {
                self.fetch_metadata();
                (Stage::Separating, None)
            }
            Stage::Separating => {
                self.separate()?;
                (Stage::DrumSplit, None)
            }
            Stage::DrumSplit => {
                self.split_drums();
                (Stage::Waveforms, None)
            }
            Stage::Waveforms => {
                self.render_waveforms()?;
                (Stage::FinalAnalysis, None)
            }
            Stage::FinalAnalysis => {
                self.final_analysis()?;
                (Stage::Cues, None)
            }
            Stage::Cues => {
                self.detect_cues();
                self.queue_transcriptions();
                (Stage::Transcribing, None)
            }
            Stage::Transcribing => match self.run.midi_current.take() {
                Some(stem) => {
                    self.transcribe(stem);
                    (Stage::Transcribing, None)
                }
                None => (Stage::Done, Some(self.complete())),
            },
            Stage::Done | Stage::Failed => (self.stage, None),
        };

        debug!(
            "Stage {:?} finished in {:.2}s",
            self.stage,
            stage_started.elapsed().as_secs_f64()
        );
        self.stage = next;
        Ok(event)
    }

    fn load(&mut self) -> std::result::Result<(), String> {
        let window = self.pipeline.settings.analysis_window.as_secs_f64();
        let clip = decode(&self.run.path, Some(window)).map_err(|e| fatal("Audio load failed", &e))?;
        info!(
            "Loaded {:.1}s of audio at {} Hz",
            clip.duration, clip.sample_rate
        );
        self.run.clip = Some(clip);
        Ok(())
    }

    fn detect_tempo_key(&mut self) -> std::result::Result<(), String> {
        let clip = self.clip()?;
        let tempo_key = self
            .pipeline
            .estimator
            .estimate(clip)
            .map_err(|e| fatal("BPM/Key detection failed", &e))?;
        info!("BPM {:.1}, key {}", tempo_key.bpm, tempo_key.key);
        self.run.tempo_key = Some(tempo_key);
        Ok(())
    }

    fn fetch_metadata(&mut self) {
        let mut meta = self.pipeline.metadata.resolve(&self.run.filename);
        meta.filename = Some(self.run.filename.clone());
        self.run.meta = meta;
    }

    fn separate(&mut self) -> std::result::Result<(), String> {
        let stems = self
            .pipeline
            .separator
            .separate(&self.run.path, self.run.model, &self.run.output_dir)
            .map_err(|e| fatal("Stem separation failed", &e))?;
        info!("Separation produced {} stems", stems.len());
        self.run.stems = stems;
        Ok(())
    }

    fn split_drums(&mut self) {
        let Some(drums) = self.run.stems.get(StemName::Drums) else {
            debug!("No drum stem, skipping kick/hats split");
            return;
        };
        match split_drum_stem(drums, &self.run.output_dir, &self.run.base_name) {
            Ok((kick, hats)) => {
                self.run.stems.insert(StemName::Kick, kick);
                self.run.stems.insert(StemName::Hats, hats);
            }
            Err(e) => warn!("Drum splitting failed for {}: {}", drums.display(), e),
        }
    }

    fn render_waveforms(&mut self) -> std::result::Result<(), String> {
        let points = self.pipeline.settings.waveform_points;
        let full = decode(&self.run.path, None).map_err(|e| fatal("Waveform generation failed", &e))?;
        self.run.waveform = waveform::render(&full.samples, points);
        self.run.full = Some(full);

        let jobs: Vec<(StemName, PathBuf)> = StemName::DISPLAYED
            .iter()
            .filter_map(|&stem| self.run.stems.get(stem).map(|p| (stem, p.to_path_buf())))
            .collect();
        let render = |(stem, path): &(StemName, PathBuf)| (*stem, render_stem(*stem, path, points));

        let threads = self.pipeline.settings.render_threads;
        let rendered: Vec<(StemName, Vec<f32>)> =
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| jobs.par_iter().map(render).collect()),
                Err(e) => {
                    warn!("Could not build a {}-thread render pool ({}), rendering serially", threads, e);
                    jobs.iter().map(render).collect()
                }
            };

        self.run.stem_waveforms = rendered
            .into_iter()
            .map(|(stem, wave)| (stem.display_key(), wave))
            .collect();
        Ok(())
    }

    fn final_analysis(&mut self) -> std::result::Result<(), String> {
        let clip = self.clip()?;
        let timbre = timbre::classify(clip);
        let drop = structure::detect_drop(clip);

        let full = self
            .run
            .full
            .as_ref()
            .ok_or_else(|| "Analysis failed: full-track audio unavailable".to_string())?;
        let mut mix_points =
            structure::find_mix_points(full).map_err(|e| fatal("Analysis failed", &e))?;
        mix_points.drop = drop.map(structure::format_time);

        info!(
            "Timbre {} {}, intro end {}, outro start {}, drop {:?}",
            timbre.texture, timbre.color, mix_points.intro_end, mix_points.outro_start, mix_points.drop
        );
        self.run.timbre = timbre;
        self.run.drop = drop;
        self.run.mix_points = mix_points;
        Ok(())
    }

    fn detect_cues(&mut self) {
        let proxy = match (self.run.stems.get(StemName::Vocals), self.run.full.as_ref()) {
            (Some(vocals), _) => match decode(vocals, None) {
                Ok(buffer) => buffer,
                Err(e) => {
                    warn!("Cue detection failed, vocal stem unreadable: {}", e);
                    return;
                }
            },
            (None, Some(full)) => {
                debug!("No vocal stem, using the harmonic part of the mix for cues");
                AudioBuffer::new(harmonic(&full.samples, full.sample_rate), full.sample_rate)
            }
            (None, None) => return,
        };
        self.run.cues = cues::detect_cues(&proxy, &self.run.mix_points, self.run.drop);
        debug!("Detected {} cues", self.run.cues.len());
    }

    fn queue_transcriptions(&mut self) {
        self.run.midi_queue = StemName::MELODIC
            .iter()
            .copied()
            .filter(|&stem| self.run.stems.contains(stem))
            .collect();
    }

    /// Next queued melodic stem whose file still exists
    fn next_melodic_stem(&mut self) -> Option<StemName> {
        while let Some(stem) = self.run.midi_queue.pop_front() {
            match self.run.stems.get(stem) {
                Some(path) if path.exists() => return Some(stem),
                _ => debug!("Stem {} file missing, not transcribing", stem),
            }
        }
        None
    }

    fn transcribe(&mut self, stem: StemName) {
        let Some(path) = self.run.stems.get(stem) else {
            return;
        };
        match self.pipeline.transcriber.transcribe(path, &self.run.output_dir) {
            Ok(Some(midi)) => {
                self.run.midi_files.insert(stem.display_key(), file_name_of(&midi));
            }
            Ok(None) => debug!("No MIDI produced for {}", stem),
            Err(e) => warn!("MIDI transcription failed for {}: {}", path.display(), e),
        }
    }

    fn complete(&mut self) -> PipelineEvent {
        let run = &mut self.run;
        let tempo_key = run.tempo_key.take().unwrap_or(TempoKey {
            bpm: 0.0,
            key: crate::analysis::key::FALLBACK_KEY.to_string(),
        });
        let timbre = run.timbre;

        let result = AnalysisResult {
            bpm: tempo_key.bpm.round() as i64,
            key: tempo_key.key,
            texture: timbre.texture,
            color: timbre.color,
            loudness: REFERENCE_LOUDNESS,
            mix_points: std::mem::take(&mut run.mix_points),
            waveform: std::mem::take(&mut run.waveform),
            stems: std::mem::take(&mut run.stem_waveforms),
            stem_files: StemFiles::from_stems(&run.path, &run.stems),
            midi_files: std::mem::take(&mut run.midi_files),
            cues: std::mem::take(&mut run.cues),
            meta: std::mem::take(&mut run.meta),
            genre: format!("{} {}", timbre.texture, timbre.color),
        };

        info!(
            "Analysis of {} complete in {:.1}s",
            run.filename,
            run.started.elapsed().as_secs_f64()
        );
        PipelineEvent::complete(result)
    }

    fn clip(&self) -> std::result::Result<&AudioBuffer, String> {
        self.run
            .clip
            .as_ref()
            .ok_or_else(|| "Audio load failed: no audio loaded".to_string())
    }
}

impl Iterator for Analysis<'_> {
    type Item = PipelineEvent;

    fn next(&mut self) -> Option<PipelineEvent> {
        loop {
            if matches!(self.stage, Stage::Done | Stage::Failed) {
                return None;
            }

            if !self.announced {
                self.announced = true;
                if let Some(event) = self.announcement() {
                    return Some(event);
                }
            }
            self.announced = false;

            match self.step() {
                Ok(Some(event)) => return Some(event),
                Ok(None) => continue,
                Err(message) => {
                    error!("{} ({})", message, self.run.path.display());
                    self.stage = Stage::Failed;
                    return Some(PipelineEvent::error(message));
                }
            }
        }
    }
}

impl FusedIterator for Analysis<'_> {}

/// Decode and render one stem, flat on failure
fn render_stem(stem: StemName, path: &Path, points: usize) -> Vec<f32> {
    match decode(path, None) {
        Ok(buffer) => waveform::render(&buffer.samples, points),
        Err(e) => {
            let err = MixprepError::RenderError {
                stem: stem.to_string(),
                reason: e.detail(),
            };
            warn!("{}", err);
            waveform::silent(points)
        }
    }
}

/// Error event text for a fatal stage failure
fn fatal(prefix: &str, err: &MixprepError) -> String {
    format!("{}: {}", prefix, err.detail())
}

//! Demucs stem separation via an external process
//!
//! The separator writes `<output_root>/<model>/<track>/<stem>.wav`. Every
//! recognized stem is copied next to the source as `<base>_<stem>.wav`, then
//! the scratch tree is removed.

use crate::analysis::traits::StemSeparator;
use crate::config::{DevicePreference, SeparatorSettings};
use crate::error::{MixprepError, Result};
use crate::process::run_with_timeout;
use crate::types::{SeparationModel, StemName, StemSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Separator backed by the `demucs.separate` command line
#[derive(Debug, Clone)]
pub struct DemucsSeparator {
    settings: SeparatorSettings,
}

impl DemucsSeparator {
    pub fn new(settings: SeparatorSettings) -> Self {
        Self { settings }
    }

    /// Device argument for this run
    fn device(&self) -> &'static str {
        match self.settings.device {
            DevicePreference::Cpu => "cpu",
            DevicePreference::Cuda => "cuda",
            DevicePreference::Auto => {
                if cuda_visible() {
                    "cuda"
                } else {
                    "cpu"
                }
            }
        }
    }
}

impl Default for DemucsSeparator {
    fn default() -> Self {
        Self::new(SeparatorSettings::default())
    }
}

impl StemSeparator for DemucsSeparator {
    fn separate(&self, input: &Path, model: SeparationModel, output_dir: &Path) -> Result<StemSet> {
        let track_name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| MixprepError::separation(format!("no file name in {}", input.display())))?;

        // Removed on drop, including when the caller abandons the run
        let scratch = tempfile::Builder::new()
            .prefix(".mixprep-separate-")
            .tempdir_in(output_dir)
            .map_err(|e| MixprepError::output_error(output_dir, e))?;
        let output_root = scratch.path().join("separated");

        let device = self.device();
        info!(
            "Separating {} with {} on {} (timeout {}s)",
            input.display(),
            model,
            device,
            self.settings.timeout.as_secs()
        );

        let args: Vec<OsString> = vec![
            "-n".into(),
            model.as_str().into(),
            "-o".into(),
            output_root.clone().into_os_string(),
            "--device".into(),
            device.into(),
            input.as_os_str().to_owned(),
        ];

        run_with_timeout(&self.settings.command, &args, self.settings.timeout)
            .map_err(|e| MixprepError::separation(e.to_string()))?;

        let track_dir = output_root.join(model.as_str()).join(&track_name);
        let stems = collect_stems(&track_dir, output_dir, &track_name)?;

        if let Err(e) = std::fs::remove_dir_all(&track_dir) {
            debug!("Could not remove {}: {}", track_dir.display(), e);
        }

        info!("Separated {} stems", stems.len());
        Ok(stems)
    }

    fn name(&self) -> &'static str {
        "demucs"
    }
}

/// Copy each recognized stem out of the separator's track directory
fn collect_stems(track_dir: &Path, output_dir: &Path, base_name: &str) -> Result<StemSet> {
    let mut stems = StemSet::new();

    for stem in StemName::SEPARATED {
        let src = track_dir.join(format!("{}.wav", stem.as_str()));
        if !src.exists() {
            warn!("Separator output missing stem '{}'", stem);
            continue;
        }
        let dst = stem_path(output_dir, base_name, stem);
        std::fs::copy(&src, &dst).map_err(|e| MixprepError::output_error(&dst, e))?;
        debug!("Stem {} -> {}", stem, dst.display());
        stems.insert(stem, dst);
    }

    Ok(stems)
}

/// `<dir>/<base>_<stem>.wav`
pub fn stem_path(dir: &Path, base_name: &str, stem: StemName) -> PathBuf {
    dir.join(format!("{}_{}.wav", base_name, stem.as_str()))
}

/// An NVIDIA device node or a non-empty `CUDA_VISIBLE_DEVICES` other than "-1"
fn cuda_visible() -> bool {
    if Path::new("/dev/nvidia0").exists() {
        return true;
    }
    match std::env::var("CUDA_VISIBLE_DEVICES") {
        Ok(value) => {
            let value = value.trim();
            !value.is_empty() && value != "-1"
        }
        Err(_) => false,
    }
}

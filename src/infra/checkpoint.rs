// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores a trained DAN so it can be reused without
// retraining.
//
// File layout under the save directory:
//   run_config.json        ← the full experiment configuration
//   model_config.json      ← DanConfig (architecture)
//   vocab.json             ← word indexer matching embedding rows
//   model_epoch_N.mpk.gz   ← weights after epoch N
//   latest_epoch.json      ← number of the newest epoch saved
//   metrics.csv            ← written by MetricsLogger
//
// Weights go through Burn's named MessagePack + gzip recorder
// at full precision, so a reloaded model predicts exactly what
// the trained one did. Loading fails if the architecture in
// model_config.json does not match the record.

use anyhow::{anyhow, bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::experiment_use_case::ExperimentConfig;
use crate::domain::indexer::Indexer;
use crate::ml::{
    classifier::NeuralSentimentClassifier,
    model::{DanConfig, DanModel},
};

type WeightsRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing checkpoint directory for reading. Never creates it.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            bail!("Checkpoint dir '{}' does not exist", dir.display());
        }
        Ok(Self { dir })
    }

    /// Save everything needed to rebuild the model before weights exist.
    pub fn save_setup(
        &self,
        run:       &ExperimentConfig,
        model_cfg: &DanConfig,
        indexer:   &Indexer,
    ) -> Result<()> {
        write_json(&self.dir.join("run_config.json"), run)?;
        write_json(&self.dir.join("vocab.json"), indexer)?;

        let model_path = self.dir.join("model_config.json");
        model_cfg
            .save(&model_path)
            .with_context(|| format!("Cannot write '{}'", model_path.display()))?;

        tracing::debug!("Saved run setup to '{}'", self.dir.display());
        Ok(())
    }

    pub fn load_run_config(&self) -> Result<ExperimentConfig> {
        read_json(&self.dir.join("run_config.json"))
    }

    /// Save model weights for a given epoch and move the latest pointer.
    pub fn save_model<B: Backend>(&self, model: &DanModel<B>, epoch: usize) -> Result<()> {
        // recorder adds the extension
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        WeightsRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        write_json(&self.dir.join("latest_epoch.json"), &epoch)?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Rebuild the classifier from the latest saved epoch.
    pub fn load_classifier<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<NeuralSentimentClassifier<B>> {
        let model_path = self.dir.join("model_config.json");
        let model_cfg  = DanConfig::load(&model_path)
            .map_err(|e| anyhow!("Cannot load '{}': {e}", model_path.display()))?;
        let indexer: Indexer = read_json(&self.dir.join("vocab.json"))?;
        if indexer.is_empty() {
            bail!("Saved vocabulary in '{}' is empty", self.dir.display());
        }

        let epoch: usize = read_json(&self.dir.join("latest_epoch.json"))
            .context("No saved epoch found. Has training run with --save_dir?")?;
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);
        let record = WeightsRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        let model = model_cfg.init::<B>(device).load_record(record);
        Ok(NeuralSentimentClassifier::new(model, Arc::new(indexer), device.clone()))
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Malformed JSON in '{}'", path.display()))
}

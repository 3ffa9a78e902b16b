// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Hand-written train + dev loop over Burn's DataLoader and Adam.
//
//   - Training runs on Autodiff<backend> for gradients
//   - model.valid() gives the same model on the inner backend,
//     with dropout disabled, for dev evaluation
//   - The DataLoader reshuffles the training set every epoch
//     from the configured seed
//
// Reference: Iyyer et al. (2015) Deep Unordered Composition
//            Rivals Syntactic Methods for Text Classification

use anyhow::{bail, Result};
use std::sync::Arc;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::evaluate::evaluate;
use crate::application::experiment_use_case::{BackendKind, ExperimentConfig};
use crate::data::{
    batcher::SentimentBatcher,
    dataset::SentimentDataset,
    embeddings::WordEmbeddings,
};
use crate::domain::{example::SentimentExample, traits::SentimentClassifier};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::classifier::NeuralSentimentClassifier;

type NdArrayTrainBackend = Autodiff<NdArray>;
type WgpuTrainBackend    = Autodiff<Wgpu>;

/// Train a DAN on the backend named in `cfg`.
pub fn run_training(
    cfg:        &ExperimentConfig,
    train_exs:  &[SentimentExample],
    dev_exs:    &[SentimentExample],
    embeddings: &WordEmbeddings,
) -> Result<Box<dyn SentimentClassifier>> {
    match cfg.backend {
        BackendKind::NdArray => {
            let device = NdArrayDevice::default();
            tracing::info!("Using NdArray device: {:?}", device);
            let clf = train_deep_averaging_network::<NdArrayTrainBackend>(
                cfg, train_exs, dev_exs, embeddings, &device,
            )?;
            Ok(Box::new(clf))
        }
        BackendKind::Wgpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            let clf = train_deep_averaging_network::<WgpuTrainBackend>(
                cfg, train_exs, dev_exs, embeddings, &device,
            )?;
            Ok(Box::new(clf))
        }
    }
}

/// Rebuild a DAN saved under `dir` by an earlier `--save_dir` run,
/// on the backend named in `cfg`.
pub fn load_trained(cfg: &ExperimentConfig, dir: &str) -> Result<Box<dyn SentimentClassifier>> {
    let ckpt  = CheckpointManager::open(dir)?;
    let saved = ckpt.load_run_config()?;
    tracing::info!(
        "Loading DAN from '{}' (trained {} epochs, lr={}, hidden={})",
        dir, saved.num_epochs, saved.lr, saved.hidden_size
    );

    match cfg.backend {
        BackendKind::NdArray => {
            let clf = ckpt.load_classifier::<NdArray>(&NdArrayDevice::default())?;
            Ok(Box::new(clf))
        }
        BackendKind::Wgpu => {
            let clf = ckpt.load_classifier::<Wgpu>(&WgpuDevice::default())?;
            Ok(Box::new(clf))
        }
    }
}

pub fn train_deep_averaging_network<B: AutodiffBackend>(
    cfg:        &ExperimentConfig,
    train_exs:  &[SentimentExample],
    dev_exs:    &[SentimentExample],
    embeddings: &WordEmbeddings,
    device:     &B::Device,
) -> Result<NeuralSentimentClassifier<B::InnerBackend>> {
    if train_exs.is_empty() {
        bail!("Cannot train on an empty training set");
    }
    cfg.validate()?;
    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = cfg.dan_config(embeddings.vocab_len(), embeddings.dim())?;
    let mut model = model_cfg.init_with_embeddings::<B>(
        embeddings.weights(),
        cfg.freeze_embeddings,
        device,
    );
    let indexer = Arc::new(embeddings.indexer().clone());
    tracing::info!(
        "DAN ready: vocab={}, dim={}, hidden={}, pooling={:?}, activation={:?}",
        model_cfg.vocab_size,
        model_cfg.embedding_dim,
        model_cfg.hidden_size,
        model_cfg.pooling,
        model_cfg.activation,
    );

    // ── Optional checkpointing ────────────────────────────────────────────────
    let persistence = match &cfg.save_dir {
        Some(dir) => {
            let ckpt = CheckpointManager::new(dir)?;
            ckpt.save_setup(cfg, &model_cfg, &indexer)?;
            let logger = MetricsLogger::new(dir)?;
            tracing::info!("Logging epoch metrics to '{}'", logger.csv_path().display());
            Some((ckpt, logger))
        }
        None => None,
    };

    let mut optim = AdamConfig::new().init();

    // ── Training data loader ──────────────────────────────────────────────────
    let train_dataset = SentimentDataset::from_examples(train_exs, embeddings);
    tracing::info!(
        "{:.1}% of training tokens have no embedding",
        train_dataset.unk_rate() * 100.0
    );
    let train_loader = DataLoaderBuilder::new(SentimentBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut best_dev_accuracy = f64::NEG_INFINITY;

    for epoch in 1..=cfg.num_epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.tokens, batch.mask, batch.labels);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }
        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };

        // ── Dev evaluation (inner backend, no dropout) ────────────────────────
        let snapshot = NeuralSentimentClassifier::new(model.valid(), indexer.clone(), device.clone());
        let dev      = evaluate(&snapshot, dev_exs)?;
        let metrics  = EpochMetrics::new(epoch, train_loss, &dev);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | dev_acc={:.2}% | dev_f1={:.4}",
            epoch, cfg.num_epochs, train_loss, dev.accuracy * 100.0, dev.f1,
        );
        if metrics.is_improvement(best_dev_accuracy) {
            best_dev_accuracy = metrics.dev_accuracy;
            tracing::debug!("New best dev accuracy {:.4} at epoch {}", best_dev_accuracy, epoch);
        }

        if let Some((ckpt, logger)) = &persistence {
            logger.log(&metrics)?;
            ckpt.save_model(&model, epoch)?;
        }
    }

    tracing::info!("Training complete!");
    Ok(NeuralSentimentClassifier::new(model.valid(), indexer, device.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::embeddings::parse_word_embeddings;

    fn ex(words: &str, label: usize) -> SentimentExample {
        SentimentExample::new(words.split(' ').map(String::from).collect(), label)
    }

    fn toy_data() -> (Vec<SentimentExample>, WordEmbeddings) {
        let emb = parse_word_embeddings(
            "great 1.0 0.2\nfun 0.9 -0.1\nawful -1.0 0.1\nboring -0.8 -0.3\nthe 0.0 0.5\nplot 0.1 0.4\n",
        )
        .unwrap();
        let exs = vec![
            ex("great fun", 1),
            ex("the plot is great", 1),
            ex("fun", 1),
            ex("awful boring", 0),
            ex("the plot is awful", 0),
            ex("boring", 0),
        ];
        (exs, emb)
    }

    #[test]
    fn test_learns_separable_toy_data() {
        let (exs, emb) = toy_data();
        let cfg = ExperimentConfig {
            lr:          0.05,
            num_epochs:  40,
            hidden_size: 8,
            batch_size:  2,
            func:        Some("tanh".into()),
            ..Default::default()
        };

        let clf = train_deep_averaging_network::<NdArrayTrainBackend>(
            &cfg, &exs, &exs, &emb, &NdArrayDevice::default(),
        )
        .unwrap();

        let e = evaluate(&clf, &exs).unwrap();
        assert_eq!(e.accuracy, 1.0);
    }

    #[test]
    fn test_empty_training_set_is_an_error() {
        let (exs, emb) = toy_data();
        let result = train_deep_averaging_network::<NdArrayTrainBackend>(
            &ExperimentConfig::default(), &[], &exs, &emb, &NdArrayDevice::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_dir_leaves_filesystem_alone() {
        let dir     = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo_dir");

        let result = load_trained(&ExperimentConfig::default(), &missing.to_string_lossy());
        assert!(result.is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_save_dir_gets_checkpoint_and_metrics() {
        let (exs, emb) = toy_data();
        let dir = tempfile::tempdir().unwrap();
        let cfg = ExperimentConfig {
            num_epochs:        2,
            hidden_size:       4,
            freeze_embeddings: true,
            save_dir:          Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };

        let trained = train_deep_averaging_network::<NdArrayTrainBackend>(
            &cfg, &exs, &exs, &emb, &NdArrayDevice::default(),
        )
        .unwrap();

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let restored = load_trained(&cfg, &dir.path().to_string_lossy()).unwrap();
        assert_eq!(restored.predict_all(&exs), trained.predict_all(&exs));
    }
}

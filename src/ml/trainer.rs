// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam,
// followed by one pass over the held-out test set.
//
// Backend split:
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on MyInnerBackend (Wgpu)
//   - Validation and test batches use MyInnerBackend, so no
//     autodiff graph is built and dropout is disabled
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::{StoryBatch, StoryBatcher}, dataset::QaDataset};
use crate::infra::{checkpoint::CheckpointManager, metrics::{EpochMetrics, MetricsLogger}};
use crate::ml::model::{count_correct, RnnQaConfig, RnnQaModel};

pub type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
pub type MyInnerBackend = burn::backend::Wgpu;

/// Loss and accuracy over one pass of a data split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss:     f64,
    pub accuracy: f64,
    pub samples:  usize,
}

/// Datasets for one run
pub struct Splits {
    pub train: QaDataset,
    pub val:   QaDataset,
    pub test:  QaDataset,
}

/// Train on `splits.train`, validate every epoch, then evaluate on
/// `splits.test`. Returns the trained model (inner backend) and the
/// test evaluation.
pub fn run_training(
    cfg:          &TrainConfig,
    model_cfg:    &RnnQaConfig,
    splits:       Splits,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
) -> Result<(RnnQaModel<MyInnerBackend>, Evaluation)> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    let mut model: RnnQaModel<MyBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: embed={} story_hidden={} query_hidden={} classes={}",
        model_cfg.embed_size, model_cfg.story_hidden, model_cfg.query_hidden, model_cfg.num_classes
    );

    let mut optim = AdamConfig::new().init();

    tracing::info!(
        "Samples: {} train, {} validation, {} test",
        splits.train.sample_count(), splits.val.sample_count(), splits.test.sample_count()
    );

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::<MyBackend, _, _>::new(StoryBatcher::new())
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .set_device(device.clone())
        .build(splits.train);

    let has_val    = !splits.val.is_empty();
    let val_loader = DataLoaderBuilder::<MyInnerBackend, _, _>::new(StoryBatcher::new())
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .set_device(device.clone())
        .build(splits.val);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut best_val_loss = f64::INFINITY;

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            seen += batch.stories.dims()[0];
            let (loss, logits) = model.forward_loss(batch.stories, batch.queries, batch.answers.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;
            correct  += count_correct(logits, batch.answers);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc  = if seen > 0 { correct as f64 / seen as f64 } else { 0.0 };

        let val = if has_val {
            evaluate(&model.valid(), val_loader.iter())
        } else {
            Evaluation { loss: f64::NAN, accuracy: 0.0, samples: 0 }
        };

        println!(
            "Epoch {:>3}/{} | loss={:.4} | acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, train_loss, train_acc * 100.0, val.loss, val.accuracy * 100.0,
        );

        let row = EpochMetrics::new(epoch, train_loss, train_acc, val.loss, val.accuracy);
        if row.is_improvement(best_val_loss) {
            best_val_loss = row.val_loss;
            tracing::info!("Best validation loss so far at epoch {}: {:.4}", epoch, best_val_loss);
        }
        metrics.log(&row)?;
        ckpt_manager.save_model(&model, epoch)?;
        tracing::debug!("Checkpoint saved for epoch {}", epoch);
    }

    // ── Test evaluation ───────────────────────────────────────────────────────
    let model_valid = model.valid();
    let test_loader = DataLoaderBuilder::<MyInnerBackend, _, _>::new(StoryBatcher::new())
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .set_device(device)
        .build(splits.test);
    let test = evaluate(&model_valid, test_loader.iter());

    tracing::info!("Training complete!");
    Ok((model_valid, test))
}

/// Mean loss and accuracy of `model` over every batch.
pub fn evaluate<B: Backend>(
    model:   &RnnQaModel<B>,
    batches: impl Iterator<Item = StoryBatch<B>>,
) -> Evaluation {
    let mut loss_sum = 0.0f64;
    let mut count    = 0usize;
    let mut correct  = 0usize;
    let mut samples  = 0usize;

    for batch in batches {
        let n = batch.stories.dims()[0];
        let (loss, logits) = model.forward_loss(batch.stories, batch.queries, batch.answers.clone());

        // Weight by batch size so a short last batch doesn't skew the mean
        loss_sum += loss.into_scalar().elem::<f64>() * n as f64;
        correct  += count_correct(logits, batch.answers);
        samples  += n;
        count    += 1;
    }

    if count == 0 || samples == 0 {
        return Evaluation { loss: f64::NAN, accuracy: 0.0, samples: 0 };
    }

    Evaluation {
        loss:     loss_sum / samples as f64,
        accuracy: correct as f64 / samples as f64,
        samples,
    }
}

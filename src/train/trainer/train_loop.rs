//! The epoch/step fit loop

use std::time::Instant;

use crate::error::{Error, Result};
use crate::model::Model;
use crate::optim::Optimizer;
use crate::train::callback::{CallbackAction, CallbackContext, CallbackManager};
use crate::train::{history, Batch, History, TrainConfig};

/// Steps per epoch for a source holding `samples` samples.
///
/// Floor of samples / batch size; a source smaller than one full batch
/// still gets its batches stepped through.
fn steps_for(samples: usize, batch_size: usize, num_batches: usize) -> usize {
    let steps = samples / batch_size;
    if steps == 0 {
        num_batches
    } else {
        steps.min(num_batches)
    }
}

/// Fit `model` for the configured epochs, validating each epoch.
///
/// `first_epoch` is the already-collected first pass over the training
/// source (the dispatcher drew it for its emptiness check); later epochs
/// re-invoke `train_fn`.
pub(crate) fn fit<BT, IT>(
    model: &mut dyn Model,
    optimizer: &mut dyn Optimizer,
    callbacks: &mut CallbackManager,
    config: &TrainConfig,
    first_epoch: Vec<Batch>,
    train_fn: &BT,
    val_batches: &[Batch],
) -> Result<History>
where
    BT: Fn() -> IT,
    IT: IntoIterator<Item = Batch>,
{
    let train_samples: usize = first_epoch.iter().map(Batch::size).sum();
    let steps_per_epoch = steps_for(train_samples, config.batch_size, first_epoch.len());
    let val_samples: usize = val_batches.iter().map(Batch::size).sum();
    let val_steps = steps_for(val_samples, config.batch_size, val_batches.len());

    let start = Instant::now();
    let mut history = History::new();
    let mut best_loss: Option<f32> = None;
    let mut global_step = 0usize;
    let mut first_epoch = Some(first_epoch);

    let build_ctx = |epoch: usize,
                     step: usize,
                     global_step: usize,
                     loss: f32,
                     lr: f32,
                     best_loss: Option<f32>,
                     val_loss: Option<f32>,
                     elapsed_secs: f64| CallbackContext {
        epoch,
        max_epochs: config.epochs,
        step,
        steps_per_epoch,
        global_step,
        loss,
        lr,
        best_loss,
        val_loss,
        elapsed_secs,
    };

    let ctx = build_ctx(0, 0, 0, 0.0, optimizer.lr(), None, None, 0.0);
    if callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
        return Ok(history);
    }

    let mut last_loss = 0.0;
    'training: for epoch in 0..config.epochs {
        let ctx = build_ctx(
            epoch,
            0,
            global_step,
            last_loss,
            optimizer.lr(),
            best_loss,
            None,
            start.elapsed().as_secs_f64(),
        );
        if callbacks.on_epoch_begin(&ctx) == CallbackAction::Stop {
            break;
        }
        if let Some(lr) = callbacks.epoch_lr(epoch) {
            optimizer.set_lr(lr);
        }

        let batches = first_epoch
            .take()
            .unwrap_or_else(|| train_fn().into_iter().collect());

        let mut total_loss = 0.0;
        let mut total_acc = 0.0;
        let mut num_batches = 0usize;
        for (step, batch) in batches.into_iter().take(steps_per_epoch).enumerate() {
            let ctx = build_ctx(
                epoch,
                step,
                global_step,
                last_loss,
                optimizer.lr(),
                best_loss,
                None,
                start.elapsed().as_secs_f64(),
            );
            if let Some(lr) = callbacks.batch_lr(&ctx) {
                optimizer.set_lr(lr);
            }

            let (metrics, grads) = model.backward(&batch)?;
            if !metrics.loss.is_finite() {
                return Err(Error::Training(format!(
                    "non-finite loss at epoch {epoch} step {step}"
                )));
            }
            {
                let mut params = model.params_mut();
                optimizer.step(&mut params, &grads);
            }

            total_loss += metrics.loss;
            total_acc += metrics.accuracy;
            num_batches += 1;
            global_step += 1;
            last_loss = metrics.loss;

            let ctx = build_ctx(
                epoch,
                step,
                global_step,
                metrics.loss,
                optimizer.lr(),
                best_loss,
                None,
                start.elapsed().as_secs_f64(),
            );
            if callbacks.on_step_end(&ctx) == CallbackAction::Stop {
                break 'training;
            }
        }

        let train_loss = total_loss / num_batches.max(1) as f32;
        let train_acc = total_acc / num_batches.max(1) as f32;

        let mut val_loss = 0.0;
        let mut val_acc = 0.0;
        for batch in val_batches.iter().take(val_steps) {
            let metrics = model.evaluate(batch)?;
            val_loss += metrics.loss;
            val_acc += metrics.accuracy;
        }
        val_loss /= val_steps.max(1) as f32;
        val_acc /= val_steps.max(1) as f32;

        if best_loss.map_or(true, |best| train_loss < best) {
            best_loss = Some(train_loss);
        }

        history.record(history::LOSS, train_loss);
        history.record(history::ACCURACY, train_acc);
        history.record(history::VAL_LOSS, val_loss);
        history.record(history::VAL_ACCURACY, val_acc);
        history.record(history::LEARNING_RATE, optimizer.lr());

        let ctx = build_ctx(
            epoch,
            steps_per_epoch,
            global_step,
            train_loss,
            optimizer.lr(),
            best_loss,
            Some(val_loss),
            start.elapsed().as_secs_f64(),
        );
        last_loss = train_loss;
        if callbacks.on_epoch_end(&ctx) == CallbackAction::Stop {
            break;
        }
    }

    let ctx = build_ctx(
        config.epochs,
        0,
        global_step,
        last_loss,
        optimizer.lr(),
        best_loss,
        None,
        start.elapsed().as_secs_f64(),
    );
    callbacks.on_train_end(&ctx);

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearSoftmaxBuilder, ModelBuilder};
    use crate::optim::Sgd;
    use crate::train::callback::TrainerCallback;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array2};

    fn batches() -> Vec<Batch> {
        vec![Batch::new(
            Array2::from_shape_vec((4, 2), vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]).unwrap(),
            Array1::from_vec(vec![0, 0, 1, 1]),
        )]
    }

    fn config() -> TrainConfig {
        TrainConfig::new()
            .with_input_shape(1, 2, 1)
            .with_batch_size(4)
            .with_epochs(3)
            .with_learning_rate(0.1)
    }

    #[test]
    fn test_fit_records_one_entry_per_epoch_per_series() {
        let config = config();
        let mut model = LinearSoftmaxBuilder.build(2, 2).unwrap();
        let mut optimizer = Sgd::new(0.1, 0.9, 0.0);
        let mut callbacks = CallbackManager::new();

        let history = fit(
            model.as_mut(),
            &mut optimizer,
            &mut callbacks,
            &config,
            batches(),
            &batches,
            &batches(),
        )
        .unwrap();

        assert_eq!(history.epochs(), 3);
        for name in [
            history::LOSS,
            history::ACCURACY,
            history::VAL_LOSS,
            history::VAL_ACCURACY,
            history::LEARNING_RATE,
        ] {
            assert_eq!(history.get(name).unwrap().len(), 3, "series {name}");
        }
    }

    #[test]
    fn test_fit_applies_epoch_schedule_rates() {
        use crate::schedule::{resolve, ScheduleKind};
        use crate::train::callback::EpochScheduleCallback;

        let config = config().with_epochs(4);
        let mut model = LinearSoftmaxBuilder.build(2, 2).unwrap();
        let mut optimizer = Sgd::new(0.1, 0.9, 0.0);
        let mut callbacks = CallbackManager::new();
        // 20 "epochs" so the step interval is 4 and a drop lands inside the run
        let (spec, _) = resolve(ScheduleKind::Step, 20, 0.1);
        callbacks.add(EpochScheduleCallback::new(spec.unwrap()));

        let history = fit(
            model.as_mut(),
            &mut optimizer,
            &mut callbacks,
            &config,
            batches(),
            &batches,
            &batches(),
        )
        .unwrap();

        let rates = history.get(history::LEARNING_RATE).unwrap();
        assert_abs_diff_eq!(rates[0], 0.1, epsilon = 1e-7);
        assert_abs_diff_eq!(rates[3], 0.1, epsilon = 1e-7);
    }

    #[test]
    fn test_fit_stops_on_callback() {
        struct StopAfterFirstEpoch;
        impl TrainerCallback for StopAfterFirstEpoch {
            fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
                CallbackAction::Stop
            }
            fn name(&self) -> &'static str {
                "StopAfterFirstEpoch"
            }
        }

        let config = config().with_epochs(10);
        let mut model = LinearSoftmaxBuilder.build(2, 2).unwrap();
        let mut optimizer = Sgd::new(0.1, 0.9, 0.0);
        let mut callbacks = CallbackManager::new();
        callbacks.add(StopAfterFirstEpoch);

        let history = fit(
            model.as_mut(),
            &mut optimizer,
            &mut callbacks,
            &config,
            batches(),
            &batches,
            &batches(),
        )
        .unwrap();

        assert_eq!(history.epochs(), 1);
    }

    #[test]
    fn test_steps_for_floor_division() {
        assert_eq!(steps_for(100, 32, 4), 3);
        assert_eq!(steps_for(128, 32, 4), 4);
        // fewer samples than one batch still trains on what there is
        assert_eq!(steps_for(3, 32, 1), 1);
    }
}

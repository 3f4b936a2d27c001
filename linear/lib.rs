/*!
This crate implements the logistic regression model used for spam classification: a [`BinaryClassifier`](struct.BinaryClassifier.html) trained with minibatch gradient descent on the log loss, with optional early stopping on a held out fraction of the training data.
*/

use ndarray::prelude::*;
use num_traits::ToPrimitive;

mod binary_classifier;

pub use self::binary_classifier::BinaryClassifier;

use sift_util::progress_counter::ProgressCounter;

/// These are the options passed to [`BinaryClassifier::train`](struct.BinaryClassifier.html#method.train).
#[derive(Debug)]
pub struct TrainOptions {
	/// If this is `Some`, early stopping is enabled.
	pub early_stopping_options: Option<EarlyStoppingOptions>,
	/// This is the L2 regularization value to use when updating the model parameters.
	pub l2_regularization: f32,
	/// This is the learning rate to use when updating the model parameters.
	pub learning_rate: f32,
	/// This is the maximum number of epochs to train.
	pub max_epochs: usize,
	/// This is the number of examples to use for each batch of training.
	pub n_examples_per_batch: usize,
}

impl Default for TrainOptions {
	fn default() -> TrainOptions {
		TrainOptions {
			early_stopping_options: Some(EarlyStoppingOptions {
				early_stopping_fraction: 0.1,
				n_epochs_without_improvement_to_stop: 3,
				min_decrease_in_loss_for_significant_change: 1e-3,
			}),
			l2_regularization: 0.0,
			learning_rate: 0.1,
			max_epochs: 100,
			n_examples_per_batch: 128,
		}
	}
}

/// The parameters in this struct control how to determine whether training should stop early after each epoch.
#[derive(Debug)]
pub struct EarlyStoppingOptions {
	/// This is the fraction of the dataset that is set aside to compute the early stopping metric.
	pub early_stopping_fraction: f32,
	/// If this many epochs pass by without a significant improvement in the early stopping metric over the previous epoch, training will be stopped early.
	pub n_epochs_without_improvement_to_stop: usize,
	/// This is the minimum decrease in the early stopping metric for an epoch to be considered a significant improvement over the previous epoch.
	pub min_decrease_in_loss_for_significant_change: f32,
}

/// This is the training progress, which tracks the current epoch.
#[derive(Debug)]
pub struct TrainProgress(pub ProgressCounter);

/// This function splits the `features` and `labels` into training and early stopping datasets, where the early stopping dataset will have `features.nrows() * early_stopping_fraction` examples.
fn train_early_stopping_split<'features, 'labels>(
	features: ArrayView2<'features, f32>,
	labels: ArrayView1<'labels, usize>,
	early_stopping_fraction: f32,
) -> (
	ArrayView2<'features, f32>,
	ArrayView1<'labels, usize>,
	ArrayView2<'features, f32>,
	ArrayView1<'labels, usize>,
) {
	let split_index = ((1.0 - early_stopping_fraction) * features.nrows().to_f32().unwrap())
		.to_usize()
		.unwrap();
	let (features_train, features_early_stopping) = features.split_at(Axis(0), split_index);
	let (labels_train, labels_early_stopping) = labels.split_at(Axis(0), split_index);
	(
		features_train,
		labels_train,
		features_early_stopping,
		labels_early_stopping,
	)
}

/**
The `EarlyStoppingMonitor` tracks the value of the early stopping metric for each epoch, and `update()` returns true when enough epochs have passed without a significant improvement.
*/
struct EarlyStoppingMonitor {
	threshold: f32,
	epochs: usize,
	n_epochs_without_observed_improvement: usize,
	previous_epoch_metric_value: Option<f32>,
}

impl EarlyStoppingMonitor {
	pub fn new(threshold: f32, epochs: usize) -> EarlyStoppingMonitor {
		EarlyStoppingMonitor {
			threshold,
			epochs,
			n_epochs_without_observed_improvement: 0,
			previous_epoch_metric_value: None,
		}
	}

	/// Update with the next epoch's early stopping metric value. Returns true if training should stop.
	pub fn update(&mut self, early_stopping_metric_value: f32) -> bool {
		let result = if let Some(previous_epoch_metric_value) = self.previous_epoch_metric_value {
			if early_stopping_metric_value > previous_epoch_metric_value
				|| f32::abs(early_stopping_metric_value - previous_epoch_metric_value)
					< self.threshold
			{
				self.n_epochs_without_observed_improvement += 1;
				self.n_epochs_without_observed_improvement >= self.epochs
			} else {
				self.n_epochs_without_observed_improvement = 0;
				false
			}
		} else {
			false
		};
		self.previous_epoch_metric_value = Some(early_stopping_metric_value);
		result
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_early_stopping_monitor_stops_on_a_plateau() {
		let mut monitor = EarlyStoppingMonitor::new(1e-3, 2);
		assert!(!monitor.update(0.7));
		assert!(!monitor.update(0.5));
		assert!(!monitor.update(0.5));
		assert!(monitor.update(0.5));
	}

	#[test]
	fn test_early_stopping_monitor_resets_on_improvement() {
		let mut monitor = EarlyStoppingMonitor::new(1e-3, 2);
		assert!(!monitor.update(0.7));
		assert!(!monitor.update(0.7));
		assert!(!monitor.update(0.5));
		assert!(!monitor.update(0.5));
		assert!(monitor.update(0.5));
	}
}

use super::{train_early_stopping_split, EarlyStoppingMonitor, TrainOptions, TrainProgress};
use itertools::izip;
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use sift_metrics::{BinaryCrossEntropy, BinaryCrossEntropyInput, StreamingMetric};
use sift_util::progress_counter::ProgressCounter;

/**
A `BinaryClassifier` is a logistic regression model. The labels are `0` for the negative class and `1` for the positive class, and `predict` writes the probability of each class for each example.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryClassifier {
	pub weights: Array1<f32>,
	pub bias: f32,
}

impl BinaryClassifier {
	pub fn train(
		features: ArrayView2<f32>,
		labels: ArrayView1<usize>,
		options: &TrainOptions,
		update_progress: &mut dyn FnMut(TrainProgress),
	) -> BinaryClassifier {
		let n_features = features.ncols();
		let (features_train, labels_train, features_early_stopping, labels_early_stopping) =
			match &options.early_stopping_options {
				Some(early_stopping_options) => {
					let (features_train, labels_train, features_early_stopping, labels_early_stopping) =
						train_early_stopping_split(
							features,
							labels,
							early_stopping_options.early_stopping_fraction,
						);
					(
						features_train,
						labels_train,
						Some(features_early_stopping),
						Some(labels_early_stopping),
					)
				}
				None => (features, labels, None, None),
			};
		let mut model = BinaryClassifier {
			weights: Array1::<f32>::zeros(n_features),
			bias: 0.0,
		};
		let mut early_stopping_monitor =
			options
				.early_stopping_options
				.as_ref()
				.map(|early_stopping_options| {
					EarlyStoppingMonitor::new(
						early_stopping_options.min_decrease_in_loss_for_significant_change,
						early_stopping_options.n_epochs_without_improvement_to_stop,
					)
				});
		let progress_counter = ProgressCounter::new(options.max_epochs.to_u64().unwrap());
		update_progress(TrainProgress(progress_counter.clone()));
		for _ in 0..options.max_epochs {
			progress_counter.inc(1);
			for (features, labels) in izip!(
				features_train.axis_chunks_iter(Axis(0), options.n_examples_per_batch),
				labels_train.axis_chunks_iter(Axis(0), options.n_examples_per_batch),
			) {
				model.train_batch(features, labels, options);
			}
			if let Some(early_stopping_monitor) = early_stopping_monitor.as_mut() {
				let early_stopping_metric_value = model.compute_early_stopping_metric_value(
					features_early_stopping.unwrap(),
					labels_early_stopping.unwrap(),
					options,
				);
				let should_stop = early_stopping_monitor.update(early_stopping_metric_value);
				if should_stop {
					break;
				}
			}
		}
		model
	}

	fn train_batch(
		&mut self,
		features: ArrayView2<f32>,
		labels: ArrayView1<usize>,
		options: &TrainOptions,
	) {
		let learning_rate = options.learning_rate;
		let logits = features.dot(&self.weights) + self.bias;
		let mut predictions = logits.mapv_into(|logit| 1.0 / ((-logit).exp() + 1.0));
		izip!(predictions.view_mut(), labels).for_each(|(prediction, label)| {
			*prediction -= label.to_f32().unwrap();
		});
		let py = predictions.insert_axis(Axis(1));
		let mut weight_gradients = (&features * &py).mean_axis(Axis(0)).unwrap();
		if options.l2_regularization > 0.0 {
			izip!(weight_gradients.view_mut(), self.weights.view()).for_each(
				|(weight_gradient, weight)| {
					*weight_gradient += options.l2_regularization * weight;
				},
			);
		}
		let bias_gradient = py.mean_axis(Axis(0)).unwrap()[0];
		izip!(self.weights.view_mut(), weight_gradients.view()).for_each(
			|(weight, weight_gradient)| {
				*weight += -learning_rate * weight_gradient;
			},
		);
		self.bias += -learning_rate * bias_gradient;
	}

	fn compute_early_stopping_metric_value(
		&self,
		features: ArrayView2<f32>,
		labels: ArrayView1<usize>,
		options: &TrainOptions,
	) -> f32 {
		let mut metric = BinaryCrossEntropy::new();
		let mut probabilities = Array2::<f32>::zeros((options.n_examples_per_batch, 2));
		for (features, labels) in izip!(
			features.axis_chunks_iter(Axis(0), options.n_examples_per_batch),
			labels.axis_chunks_iter(Axis(0), options.n_examples_per_batch),
		) {
			let mut batch_probabilities = probabilities.slice_mut(s![0..features.nrows(), ..]);
			self.predict(features, batch_probabilities.view_mut());
			for (probability, label) in izip!(batch_probabilities.column(1).iter(), labels.iter()) {
				metric.update(BinaryCrossEntropyInput {
					probability: *probability,
					label: *label,
				});
			}
		}
		metric.finalize().unwrap_or(std::f32::INFINITY)
	}

	/// Write the predicted probability of each class for each example into `probabilities`, whose shape must be `(n_examples, 2)`. Column `1` is the positive class.
	pub fn predict(&self, features: ArrayView2<f32>, mut probabilities: ArrayViewMut2<f32>) {
		let mut probabilities_pos = probabilities.column_mut(1);
		probabilities_pos.fill(self.bias);
		ndarray::linalg::general_mat_vec_mul(
			1.0,
			&features,
			&self.weights,
			1.0,
			&mut probabilities_pos,
		);
		let (mut probabilities_neg, mut probabilities_pos) = probabilities.split_at(Axis(1), 1);
		for probability_pos in probabilities_pos.iter_mut() {
			*probability_pos = 1.0 / ((-*probability_pos).exp() + 1.0);
		}
		for (probability_neg, probability_pos) in
			izip!(probabilities_neg.view_mut(), probabilities_pos.view())
		{
			*probability_neg = 1.0 - *probability_pos;
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_train_separable() {
		// Two features, each perfectly predictive of one class.
		let mut features = Array2::<f32>::zeros((32, 2));
		let mut labels = Array1::<usize>::zeros(32);
		for i in 0..32 {
			if i % 2 == 0 {
				features[[i, 0]] = 1.0;
				labels[i] = 1;
			} else {
				features[[i, 1]] = 1.0;
			}
		}
		let options = TrainOptions {
			early_stopping_options: None,
			..Default::default()
		};
		let model = BinaryClassifier::train(
			features.view(),
			labels.view(),
			&options,
			&mut |_| {},
		);
		let mut probabilities = Array2::<f32>::zeros((32, 2));
		model.predict(features.view(), probabilities.view_mut());
		for i in 0..32 {
			let probability_pos = probabilities[[i, 1]];
			let probability_neg = probabilities[[i, 0]];
			assert!((probability_pos + probability_neg - 1.0).abs() < 1e-6);
			if labels[i] == 1 {
				assert!(probability_pos > 0.5);
			} else {
				assert!(probability_pos < 0.5);
			}
		}
	}

	#[test]
	fn test_predict_probabilities_are_valid() {
		let model = BinaryClassifier {
			weights: Array1::from(vec![1.0, -2.0]),
			bias: 0.5,
		};
		let features = Array2::from_shape_vec((2, 2), vec![1.0, 0.0, 0.0, 1.0]).unwrap();
		let mut probabilities = Array2::<f32>::zeros((2, 2));
		model.predict(features.view(), probabilities.view_mut());
		for probability in probabilities.iter() {
			assert!(*probability >= 0.0 && *probability <= 1.0);
		}
	}
}

use super::{TrainOptions, TrainProgress};
use itertools::izip;
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use sift_util::progress_counter::ProgressCounter;

/**
A `MultinomialNaiveBayes` model. Training counts the feature mass observed in each class and turns the counts into smoothed log probabilities. Prediction computes the joint log likelihood of each class for each example and normalizes with log-sum-exp, so the output probabilities of each example sum to one.

The feature values do not need to be integer counts. TF-IDF values work the same way, which is how the classifier is used here.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct MultinomialNaiveBayes {
	/// The log prior probability of each class, computed from the class frequencies in training.
	pub log_priors: Array1<f32>,
	/// The smoothed log probability of each feature conditioned on each class, with shape `(n_classes, n_features)`.
	pub feature_log_probs: Array2<f32>,
}

impl MultinomialNaiveBayes {
	pub fn train(
		features: ArrayView2<f32>,
		labels: ArrayView1<usize>,
		n_classes: usize,
		options: &TrainOptions,
		update_progress: &mut dyn FnMut(TrainProgress),
	) -> MultinomialNaiveBayes {
		let n_examples = features.nrows();
		let n_features = features.ncols();
		let progress_counter = ProgressCounter::new(n_examples.to_u64().unwrap());
		update_progress(TrainProgress(progress_counter.clone()));
		// Count the examples and the feature mass observed in each class.
		let mut class_counts = Array1::<f64>::zeros(n_classes);
		let mut feature_counts = Array2::<f64>::zeros((n_classes, n_features));
		for (features_row, label) in izip!(features.axis_iter(Axis(0)), labels.iter()) {
			class_counts[*label] += 1.0;
			let mut class_feature_counts = feature_counts.row_mut(*label);
			izip!(class_feature_counts.view_mut(), features_row).for_each(|(count, feature)| {
				*count += feature.to_f64().unwrap();
			});
			progress_counter.inc(1);
		}
		// Turn the counts into log probabilities, applying additive smoothing to the feature counts.
		let alpha = options.alpha.to_f64().unwrap();
		let n_examples = n_examples.to_f64().unwrap();
		let log_priors = class_counts.mapv(|count| (count / n_examples).ln().to_f32().unwrap());
		let mut feature_log_probs = Array2::<f32>::zeros((n_classes, n_features));
		for (class_feature_counts, mut class_feature_log_probs) in izip!(
			feature_counts.axis_iter(Axis(0)),
			feature_log_probs.axis_iter_mut(Axis(0)),
		) {
			let total = class_feature_counts.sum() + alpha * n_features.to_f64().unwrap();
			izip!(class_feature_log_probs.view_mut(), class_feature_counts).for_each(
				|(log_prob, count)| {
					*log_prob = ((count + alpha) / total).ln().to_f32().unwrap();
				},
			);
		}
		MultinomialNaiveBayes {
			log_priors,
			feature_log_probs,
		}
	}

	/// Write the predicted probability of each class for each example into `probabilities`, whose shape must be `(n_examples, n_classes)`.
	pub fn predict(&self, features: ArrayView2<f32>, mut probabilities: ArrayViewMut2<f32>) {
		let joint_log_likelihoods = features.dot(&self.feature_log_probs.t());
		for (probabilities_row, joint_log_likelihoods_row) in izip!(
			probabilities.axis_iter_mut(Axis(0)),
			joint_log_likelihoods.axis_iter(Axis(0)),
		) {
			let mut scores = joint_log_likelihoods_row.to_owned() + &self.log_priors;
			let max = scores
				.iter()
				.fold(std::f32::NEG_INFINITY, |max, score| max.max(*score));
			scores.mapv_inplace(|score| (score - max).exp());
			let sum = scores.sum();
			izip!(probabilities_row, scores.view()).for_each(|(probability, score)| {
				*probability = score / sum;
			});
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_train_and_predict() {
		// One feature per class, two examples, alpha = 1. With feature counts [2, 0] for class 0 the smoothed probabilities are [3/4, 1/4], so an example with only the first feature should get probability 0.75 for class 0.
		let features = Array2::from_shape_vec((2, 2), vec![2.0, 0.0, 0.0, 2.0]).unwrap();
		let labels = Array1::from(vec![0, 1]);
		let model = MultinomialNaiveBayes::train(
			features.view(),
			labels.view(),
			2,
			&TrainOptions::default(),
			&mut |_| {},
		);
		let test_features = Array2::from_shape_vec((1, 2), vec![1.0, 0.0]).unwrap();
		let mut probabilities = Array2::<f32>::zeros((1, 2));
		model.predict(test_features.view(), probabilities.view_mut());
		assert!((probabilities[[0, 0]] - 0.75).abs() < 1e-5);
		assert!((probabilities[[0, 0]] + probabilities[[0, 1]] - 1.0).abs() < 1e-6);
	}

	#[test]
	fn test_predict_with_unseen_features() {
		// An example with no feature mass at all falls back to the class priors.
		let features = Array2::from_shape_vec((4, 2), vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0])
			.unwrap();
		let labels = Array1::from(vec![0, 0, 0, 1]);
		let model = MultinomialNaiveBayes::train(
			features.view(),
			labels.view(),
			2,
			&TrainOptions::default(),
			&mut |_| {},
		);
		let test_features = Array2::<f32>::zeros((1, 2));
		let mut probabilities = Array2::<f32>::zeros((1, 2));
		model.predict(test_features.view(), probabilities.view_mut());
		assert!((probabilities[[0, 0]] - 0.75).abs() < 1e-5);
		assert!((probabilities[[0, 1]] - 0.25).abs() < 1e-5);
	}
}

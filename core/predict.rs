use crate::{dataset, model::Model};
use itertools::izip;
use ndarray::prelude::*;

/// The classification of one message by both models. Ephemeral, never persisted.
#[derive(Clone, Debug)]
pub struct Prediction {
	pub message: String,
	pub naive_bayes: ModelPrediction,
	pub logistic_regression: ModelPrediction,
}

/// One model's classification of one message.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelPrediction {
	/// The predicted class name, `"Spam"` or `"Not Spam"`.
	pub label: String,
	/// The probability of the predicted class, in `[0, 1]`.
	pub confidence: f32,
}

/**
Classify a batch of messages with a trained [`Model`](../model/struct.Model.html). Messages are transformed with the feature group that was fitted during training, never refitted. Each message is classified independently and the output order matches the input order.
*/
pub fn predict(model: &Model, messages: &[String]) -> Vec<Prediction> {
	let n_examples = messages.len();
	let n_features = model.feature_group.n_features();
	let mut features = Array2::<f32>::zeros((n_examples, n_features));
	model
		.feature_group
		.compute_array_f32(features.view_mut(), messages, &|| {});
	let mut naive_bayes_probabilities = Array2::<f32>::zeros((n_examples, 2));
	model
		.naive_bayes
		.predict(features.view(), naive_bayes_probabilities.view_mut());
	let mut logistic_regression_probabilities = Array2::<f32>::zeros((n_examples, 2));
	model.logistic_regression.predict(
		features.view(),
		logistic_regression_probabilities.view_mut(),
	);
	izip!(
		messages.iter(),
		naive_bayes_probabilities.axis_iter(Axis(0)),
		logistic_regression_probabilities.axis_iter(Axis(0)),
	)
	.map(
		|(message, naive_bayes_probabilities, logistic_regression_probabilities)| Prediction {
			message: message.clone(),
			naive_bayes: model_prediction(model, naive_bayes_probabilities),
			logistic_regression: model_prediction(model, logistic_regression_probabilities),
		},
	)
	.collect()
}

fn model_prediction(model: &Model, probabilities: ArrayView1<f32>) -> ModelPrediction {
	let label_index = if probabilities[dataset::SPAM_INDEX] >= probabilities[dataset::NOT_SPAM_INDEX]
	{
		dataset::SPAM_INDEX
	} else {
		dataset::NOT_SPAM_INDEX
	};
	ModelPrediction {
		label: model.classes[label_index].clone(),
		confidence: probabilities[label_index],
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::model::DatasetStats;
	use sift_bayes::MultinomialNaiveBayes;
	use sift_features::{BagOfWordsFeatureGroup, FitBagOfWordsFeatureGroupSettings};
	use sift_linear::BinaryClassifier;
	use sift_metrics::BinaryClassificationMetricsOutput;

	/// Build a small model by hand: the token "cash" predicts spam and the token "lunch" predicts ham.
	fn fixture_model() -> Model {
		let messages = vec!["cash".to_owned(), "lunch".to_owned()];
		let feature_group =
			BagOfWordsFeatureGroup::fit(&messages, FitBagOfWordsFeatureGroupSettings::default());
		let n_features = feature_group.n_features();
		assert_eq!(n_features, 2);
		let cash_index = feature_group.tokens_map["cash"];
		let mut features = Array2::<f32>::zeros((2, n_features));
		feature_group.compute_array_f32(features.view_mut(), &messages, &|| {});
		let labels = Array1::from(vec![
			crate::dataset::SPAM_INDEX,
			crate::dataset::NOT_SPAM_INDEX,
		]);
		let naive_bayes = MultinomialNaiveBayes::train(
			features.view(),
			labels.view(),
			2,
			&sift_bayes::TrainOptions::default(),
			&mut |_| {},
		);
		let mut weights = Array1::<f32>::zeros(n_features);
		weights[cash_index] = 4.0;
		weights[1 - cash_index] = -4.0;
		let logistic_regression = BinaryClassifier { weights, bias: 0.0 };
		let metrics = BinaryClassificationMetricsOutput {
			threshold: 0.5,
			true_positives: 1,
			false_positives: 0,
			true_negatives: 1,
			false_negatives: 0,
			accuracy: 1.0,
			precision: 1.0,
			recall: 1.0,
			f1_score: 1.0,
		};
		Model {
			classes: crate::dataset::class_names(),
			feature_group,
			naive_bayes,
			logistic_regression,
			naive_bayes_accuracy: 1.0,
			logistic_regression_accuracy: 1.0,
			naive_bayes_metrics: metrics.clone(),
			logistic_regression_metrics: metrics,
			stats: DatasetStats {
				n_examples: 2,
				n_spam: 1,
				n_ham: 1,
				n_train: 2,
				n_test: 0,
			},
		}
	}

	#[test]
	fn test_predict_labels_and_confidences() {
		let model = fixture_model();
		let messages = vec!["cash cash cash".to_owned(), "lunch plans".to_owned()];
		let predictions = predict(&model, &messages);
		assert_eq!(predictions.len(), 2);
		for prediction in predictions.iter() {
			for model_prediction in
				&[&prediction.naive_bayes, &prediction.logistic_regression]
			{
				assert!(
					model_prediction.label == "Spam" || model_prediction.label == "Not Spam"
				);
				assert!(
					model_prediction.confidence >= 0.0 && model_prediction.confidence <= 1.0
				);
			}
		}
		assert_eq!(predictions[0].naive_bayes.label, "Spam");
		assert_eq!(predictions[0].logistic_regression.label, "Spam");
		assert_eq!(predictions[1].naive_bayes.label, "Not Spam");
		assert_eq!(predictions[1].logistic_regression.label, "Not Spam");
	}

	#[test]
	fn test_batch_predict_matches_single_predict() {
		let model = fixture_model();
		let messages = vec!["free cash".to_owned(), "see you at lunch".to_owned()];
		let batch = predict(&model, &messages);
		for (message, batch_prediction) in izip!(messages.iter(), batch.iter()) {
			let single = predict(&model, std::slice::from_ref(message));
			assert_eq!(batch_prediction.message, single[0].message);
			assert_eq!(batch_prediction.naive_bayes, single[0].naive_bayes);
			assert_eq!(
				batch_prediction.logistic_regression,
				single[0].logistic_regression
			);
		}
	}

	#[test]
	fn test_predict_unknown_tokens_falls_back_to_priors() {
		let model = fixture_model();
		let messages = vec!["xyzzy".to_owned()];
		let predictions = predict(&model, &messages);
		let prediction = &predictions[0];
		// With no known tokens both classes are equally likely under naive Bayes, and the tie goes to spam.
		assert!((prediction.naive_bayes.confidence - 0.5).abs() < 1e-5);
		assert_eq!(prediction.naive_bayes.label, "Spam");
	}
}

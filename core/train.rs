use crate::{
	config::{self, Config},
	dataset::{self, Dataset},
	model::{DatasetStats, Model},
	progress::{ModelKind, ModelTrainProgress, Progress},
};
use anyhow::{bail, Context, Result};
use itertools::izip;
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use sift_features::{BagOfWordsFeatureGroup, FitBagOfWordsFeatureGroupSettings};
use sift_metrics::{self as metrics, StreamingMetric};
use sift_util::progress_counter::ProgressCounter;
use std::path::Path;

/// The seed used to shuffle the dataset when the config does not specify one, so repeated runs produce the same split.
const DEFAULT_SHUFFLE_SEED: u64 = 42;

/**
Train both spam models on the dataset at `dataset_path` and evaluate them on a held out test split. Re-running replaces any previously fitted state, since the returned [`Model`](../model/struct.Model.html) is a fresh value each time. Dataset loading failures are returned as errors before any fitting happens, so a failed run never produces a partially fitted model.
*/
pub fn train(
	dataset_path: &Path,
	config_path: Option<&Path>,
	update_progress: &mut dyn FnMut(Progress),
) -> Result<Model> {
	// Load the config from the config file, if provided.
	let config = load_config(config_path)?;

	// Load the dataset.
	update_progress(Progress::Loading);
	let mut dataset = dataset::load_dataset(dataset_path)?;
	let n_examples = dataset.len();
	let n_spam = dataset.n_spam();
	let n_ham = dataset.n_ham();

	// Shuffle the dataset, unless the config disables it.
	shuffle(&mut dataset, &config);

	// Split the dataset into train and test.
	let test_fraction = config.test_fraction.unwrap_or(0.2);
	if test_fraction <= 0.0 || test_fraction >= 1.0 {
		bail!("test_fraction must be between 0 and 1");
	}
	let n_train = ((1.0 - test_fraction) * n_examples.to_f32().unwrap())
		.to_usize()
		.unwrap();
	let n_test = n_examples - n_train;
	if n_train == 0 || n_test == 0 {
		bail!("the dataset has too few examples to split into train and test");
	}
	let (messages_train, messages_test) = dataset.messages.split_at(n_train);
	let (labels_train, labels_test) = dataset.labels.split_at(n_train);

	// Fit the feature group on the training split only, then compute features for both splits.
	let feature_group_settings = match config.max_tokens {
		Some(max_tokens) => FitBagOfWordsFeatureGroupSettings { max_tokens },
		None => FitBagOfWordsFeatureGroupSettings::default(),
	};
	let feature_group = BagOfWordsFeatureGroup::fit(messages_train, feature_group_settings);
	let n_features = feature_group.n_features();
	if n_features == 0 {
		bail!("the dataset produced an empty vocabulary");
	}
	let progress_counter = ProgressCounter::new(n_examples.to_u64().unwrap());
	update_progress(Progress::ComputingFeatures(progress_counter.clone()));
	let mut features_train = Array2::<f32>::zeros((n_train, n_features));
	feature_group.compute_array_f32(features_train.view_mut(), messages_train, &|| {
		progress_counter.inc(1)
	});
	let mut features_test = Array2::<f32>::zeros((n_test, n_features));
	feature_group.compute_array_f32(features_test.view_mut(), messages_test, &|| {
		progress_counter.inc(1)
	});
	let labels_train = Array1::from(labels_train.to_vec());
	let labels_test = Array1::from(labels_test.to_vec());

	// Train and test the naive Bayes model.
	let naive_bayes_options = naive_bayes_train_options(&config);
	let naive_bayes = sift_bayes::MultinomialNaiveBayes::train(
		features_train.view(),
		labels_train.view(),
		dataset::class_names().len(),
		&naive_bayes_options,
		&mut |progress| {
			update_progress(Progress::Training(ModelTrainProgress::NaiveBayes(progress)))
		},
	);
	let (naive_bayes_accuracy, naive_bayes_metrics) = test_model(
		features_test.view(),
		labels_test.view(),
		|features, probabilities| naive_bayes.predict(features, probabilities),
		ModelKind::NaiveBayes,
		update_progress,
	);

	// Train and test the logistic regression model.
	let logistic_regression_options = logistic_regression_train_options(&config);
	let logistic_regression = sift_linear::BinaryClassifier::train(
		features_train.view(),
		labels_train.view(),
		&logistic_regression_options,
		&mut |progress| {
			update_progress(Progress::Training(ModelTrainProgress::LogisticRegression(
				progress,
			)))
		},
	);
	let (logistic_regression_accuracy, logistic_regression_metrics) = test_model(
		features_test.view(),
		labels_test.view(),
		|features, probabilities| logistic_regression.predict(features, probabilities),
		ModelKind::LogisticRegression,
		update_progress,
	);

	Ok(Model {
		classes: dataset::class_names(),
		feature_group,
		naive_bayes,
		logistic_regression,
		naive_bayes_accuracy,
		naive_bayes_metrics,
		logistic_regression_accuracy,
		logistic_regression_metrics,
		stats: DatasetStats {
			n_examples,
			n_spam,
			n_ham,
			n_train,
			n_test,
		},
	})
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
	match config_path {
		Some(config_path) => {
			let config = std::fs::read_to_string(config_path)
				.with_context(|| format!("failed to read the config at {}", config_path.display()))?;
			let config = serde_yaml::from_str(&config).with_context(|| {
				format!("failed to parse the config at {}", config_path.display())
			})?;
			Ok(config)
		}
		None => Ok(Config::default()),
	}
}

fn shuffle(dataset: &mut Dataset, config: &Config) {
	let seed = match &config.shuffle {
		Some(config::Shuffle::Enabled(false)) => return,
		Some(config::Shuffle::Enabled(true)) | None => DEFAULT_SHUFFLE_SEED,
		Some(config::Shuffle::Options { seed }) => *seed,
	};
	let mut rng = Xoshiro256Plus::seed_from_u64(seed);
	let mut indices: Vec<usize> = (0..dataset.len()).collect();
	indices.shuffle(&mut rng);
	dataset.labels = indices.iter().map(|index| dataset.labels[*index]).collect();
	dataset.messages = indices
		.iter()
		.map(|index| dataset.messages[*index].clone())
		.collect();
}

fn naive_bayes_train_options(config: &Config) -> sift_bayes::TrainOptions {
	let mut options = sift_bayes::TrainOptions::default();
	if let Some(naive_bayes) = &config.naive_bayes {
		if let Some(alpha) = naive_bayes.alpha {
			options.alpha = alpha;
		}
	}
	options
}

fn logistic_regression_train_options(config: &Config) -> sift_linear::TrainOptions {
	let mut options = sift_linear::TrainOptions::default();
	if let Some(logistic_regression) = &config.logistic_regression {
		if let Some(l2_regularization) = logistic_regression.l2_regularization {
			options.l2_regularization = l2_regularization;
		}
		if let Some(learning_rate) = logistic_regression.learning_rate {
			options.learning_rate = learning_rate;
		}
		if let Some(max_epochs) = logistic_regression.max_epochs {
			options.max_epochs = max_epochs;
		}
		if let Some(n_examples_per_batch) = logistic_regression.n_examples_per_batch {
			options.n_examples_per_batch = n_examples_per_batch;
		}
		if let Some(early_stopping) = &logistic_regression.early_stopping {
			options.early_stopping_options = Some(sift_linear::EarlyStoppingOptions {
				early_stopping_fraction: early_stopping.early_stopping_fraction,
				n_epochs_without_improvement_to_stop: early_stopping
					.n_epochs_without_improvement_to_stop,
				min_decrease_in_loss_for_significant_change: early_stopping
					.min_decrease_in_loss_for_significant_change,
			});
		}
	}
	options
}

/// Compute test metrics for one model by predicting the test split in batches.
fn test_model(
	features: ArrayView2<f32>,
	labels: ArrayView1<usize>,
	predict: impl Fn(ArrayView2<f32>, ArrayViewMut2<f32>),
	model_kind: ModelKind,
	update_progress: &mut dyn FnMut(Progress),
) -> (f32, metrics::BinaryClassificationMetricsOutput) {
	let progress_counter = ProgressCounter::new(features.nrows().to_u64().unwrap());
	update_progress(Progress::Testing(model_kind, progress_counter.clone()));
	let n_examples_per_batch = 256;
	let mut accuracy = metrics::Accuracy::new();
	let mut classification_metrics = metrics::BinaryClassificationMetrics::new(0.5);
	let mut probabilities = Array2::<f32>::zeros((n_examples_per_batch, 2));
	for (features, labels) in izip!(
		features.axis_chunks_iter(Axis(0), n_examples_per_batch),
		labels.axis_chunks_iter(Axis(0), n_examples_per_batch),
	) {
		let mut batch_probabilities = probabilities.slice_mut(s![0..features.nrows(), ..]);
		predict(features, batch_probabilities.view_mut());
		for (probability, label) in izip!(batch_probabilities.column(1).iter(), labels.iter()) {
			let predicted = if *probability >= 0.5 {
				dataset::SPAM_INDEX
			} else {
				dataset::NOT_SPAM_INDEX
			};
			accuracy.update((predicted, *label));
			classification_metrics.update(metrics::BinaryClassificationMetricsInput {
				probability: *probability,
				label: *label,
			});
		}
		progress_counter.inc(features.nrows().to_u64().unwrap());
	}
	(
		accuracy.finalize().unwrap(),
		classification_metrics.finalize(),
	)
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Write;

	pub fn write_fixture_dataset() -> tempfile::NamedTempFile {
		let spam_messages = &[
			"WIN FREE CASH NOW claim your prize",
			"free cash prize winner call now",
			"urgent claim your free prize today",
			"you have won free cash text win",
		];
		let ham_messages = &[
			"see you at lunch",
			"are we still on for dinner tonight",
			"running late be there soon",
			"thanks for the ride home yesterday",
		];
		let mut file = tempfile::NamedTempFile::new().unwrap();
		for index in 0..5 {
			for spam_message in spam_messages.iter() {
				writeln!(file, "spam\t{} {}", spam_message, index).unwrap();
			}
			for ham_message in ham_messages.iter() {
				writeln!(file, "ham\t{} {}", ham_message, index).unwrap();
			}
		}
		file.flush().unwrap();
		file
	}

	#[test]
	fn test_train_on_fixture_dataset() {
		let file = write_fixture_dataset();
		let mut steps = Vec::new();
		let model = train(file.path(), None, &mut |progress| {
			steps.push(progress.to_string())
		})
		.unwrap();
		// Both models should easily beat a coin flip on this corpus.
		assert!(model.naive_bayes_accuracy > 0.5);
		assert!(model.logistic_regression_accuracy > 0.5);
		assert_eq!(model.stats.n_examples, 40);
		assert_eq!(model.stats.n_train + model.stats.n_test, 40);
		assert_eq!(model.stats.n_spam, 20);
		assert_eq!(model.stats.n_ham, 20);
		assert_eq!(model.classes, vec!["Not Spam", "Spam"]);
		// Every phase of training should have been reported.
		assert!(steps.contains(&"loading the dataset".to_owned()));
		assert!(steps.contains(&"computing features".to_owned()));
		assert!(steps.contains(&"training the naive bayes model".to_owned()));
		assert!(steps.contains(&"testing the naive bayes model".to_owned()));
		assert!(steps.contains(&"training the logistic regression model".to_owned()));
		assert!(steps.contains(&"testing the logistic regression model".to_owned()));
	}

	#[test]
	fn test_train_is_deterministic() {
		let file = write_fixture_dataset();
		let model_a = train(file.path(), None, &mut |_| {}).unwrap();
		let model_b = train(file.path(), None, &mut |_| {}).unwrap();
		assert_eq!(model_a.naive_bayes, model_b.naive_bayes);
		assert_eq!(model_a.naive_bayes_accuracy, model_b.naive_bayes_accuracy);
	}

	#[test]
	fn test_train_missing_dataset() {
		let result = train(
			Path::new("/nonexistent/SMSSpamCollection"),
			None,
			&mut |_| {},
		);
		assert!(result.is_err());
	}
}

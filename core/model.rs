use sift_bayes::MultinomialNaiveBayes;
use sift_features::BagOfWordsFeatureGroup;
use sift_linear::BinaryClassifier;
use sift_metrics::BinaryClassificationMetricsOutput;

/**
A fitted `Model`: the feature group and both classifiers, along with the metrics each classifier achieved on the held out test split. A `Model` is immutable once training produces it, so it can be shared freely across request handling threads.
*/
#[derive(Debug)]
pub struct Model {
	/// The class names, indexed by label.
	pub classes: Vec<String>,
	/// The fitted bag of words feature group. Predictions must use this and never refit it.
	pub feature_group: BagOfWordsFeatureGroup,
	pub naive_bayes: MultinomialNaiveBayes,
	pub logistic_regression: BinaryClassifier,
	/// The accuracy of each model on the held out test split.
	pub naive_bayes_accuracy: f32,
	pub logistic_regression_accuracy: f32,
	/// The confusion matrix metrics of each model on the held out test split.
	pub naive_bayes_metrics: BinaryClassificationMetricsOutput,
	pub logistic_regression_metrics: BinaryClassificationMetricsOutput,
	pub stats: DatasetStats,
}

/// Basic counts describing the dataset a model was trained on, used for reporting.
#[derive(Clone, Debug)]
pub struct DatasetStats {
	pub n_examples: usize,
	pub n_spam: usize,
	pub n_ham: usize,
	pub n_train: usize,
	pub n_test: usize,
}

/*!
This module defines the `Config` struct, which is used to configure training with [`train`](../train/fn.train.html). Every field is optional, so a config file only needs to name the settings it wants to override.
*/

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
	/// This is the fraction of the dataset to hold out for computing test metrics. The default is 0.2.
	pub test_fraction: Option<f32>,
	/// This controls whether and how the dataset is shuffled before splitting.
	pub shuffle: Option<Shuffle>,
	/// This is the maximum vocabulary size for the bag of words features. The default is 3000.
	pub max_tokens: Option<usize>,
	/// These are the options for the naive Bayes model.
	pub naive_bayes: Option<NaiveBayesConfig>,
	/// These are the options for the logistic regression model.
	pub logistic_regression: Option<LogisticRegressionConfig>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum Shuffle {
	Enabled(bool),
	Options { seed: u64 },
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct NaiveBayesConfig {
	pub alpha: Option<f32>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct LogisticRegressionConfig {
	pub l2_regularization: Option<f32>,
	pub learning_rate: Option<f32>,
	pub max_epochs: Option<usize>,
	pub n_examples_per_batch: Option<usize>,
	pub early_stopping: Option<EarlyStoppingConfig>,
}

#[derive(Debug, serde::Deserialize)]
pub struct EarlyStoppingConfig {
	pub early_stopping_fraction: f32,
	pub n_epochs_without_improvement_to_stop: usize,
	pub min_decrease_in_loss_for_significant_change: f32,
}

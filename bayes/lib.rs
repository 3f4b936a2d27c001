/*!
This crate implements the multinomial naive Bayes model used for spam classification. Naive Bayes works well for text because the bag of words features are high dimensional and the conditional independence assumption is cheap to fit and evaluate. [Learn more](https://en.wikipedia.org/wiki/Naive_Bayes_classifier#Multinomial_naive_Bayes).
*/

mod multinomial;

pub use self::multinomial::MultinomialNaiveBayes;

use sift_util::progress_counter::ProgressCounter;

/// These are the options passed to [`MultinomialNaiveBayes::train`](struct.MultinomialNaiveBayes.html#method.train).
#[derive(Debug)]
pub struct TrainOptions {
	/// This is the additive smoothing value applied to the per class feature counts, which keeps tokens that never occur in a class from producing a zero probability.
	pub alpha: f32,
}

impl Default for TrainOptions {
	fn default() -> TrainOptions {
		TrainOptions { alpha: 1.0 }
	}
}

/// This is the training progress, which tracks how many examples have been counted.
#[derive(Debug)]
pub struct TrainProgress(pub ProgressCounter);

use fnv::{FnvBuildHasher, FnvHashMap, FnvHashSet};
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use std::borrow::Cow;
use std::collections::{BinaryHeap, HashMap};
use sift_util::{alphanumeric_tokenizer::AlphanumericTokenizer, text};

/**
A `BagOfWordsFeatureGroup` creates features for message text using the [Bag of Words](https://en.wikipedia.org/wiki/Bag-of-words_model) method.

During training, all the messages are tokenized and an [IDF](https://en.wikipedia.org/wiki/Tf%E2%80%93idf) value is computed for each of the most frequent tokens, up to `max_tokens`. One feature is created per token. For each message, the feature for a token is the number of occurrences of the token in the message multiplied by the token's IDF, and the feature values for the message are L2 normalized.

Stop words and tokens that are entirely digits are not tokens, which mirrors the text cleanup applied to messages before vectorization.
*/
#[derive(Debug)]
pub struct BagOfWordsFeatureGroup {
	/// These are the tokens that were selected during training, in descending frequency order.
	pub tokens: Vec<BagOfWordsTokenEntry>,
	/// This maps each token to its feature index.
	pub tokens_map: HashMap<String, usize, FnvBuildHasher>,
}

#[derive(Debug)]
pub struct BagOfWordsTokenEntry {
	pub token: String,
	pub idf: f32,
}

pub struct FitBagOfWordsFeatureGroupSettings {
	/// This is the maximum size of the vocabulary.
	pub max_tokens: usize,
}

impl Default for FitBagOfWordsFeatureGroupSettings {
	fn default() -> FitBagOfWordsFeatureGroupSettings {
		FitBagOfWordsFeatureGroupSettings { max_tokens: 3000 }
	}
}

/// Produce the tokens for a message: lowercased alphanumeric runs, excluding stop words and runs that are entirely digits.
fn tokens(value: &str) -> impl Iterator<Item = Cow<'_, str>> {
	AlphanumericTokenizer::new(value)
		.filter(|token| !text::is_stop_word(token))
		.filter(|token| !token.chars().all(char::is_numeric))
}

impl BagOfWordsFeatureGroup {
	pub fn fit(
		values: &[String],
		settings: FitBagOfWordsFeatureGroupSettings,
	) -> BagOfWordsFeatureGroup {
		#[derive(Clone, Debug, Eq)]
		struct TokenEntry(String, usize);
		impl std::cmp::Ord for TokenEntry {
			fn cmp(&self, other: &Self) -> std::cmp::Ordering {
				self.1.cmp(&other.1)
			}
		}
		impl std::cmp::PartialOrd for TokenEntry {
			fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
				self.1.partial_cmp(&other.1)
			}
		}
		impl std::cmp::PartialEq for TokenEntry {
			fn eq(&self, other: &Self) -> bool {
				self.1.eq(&other.1)
			}
		}
		// Collect occurrence and document frequency statistics for every token.
		let mut token_occurrence_histogram = FnvHashMap::default();
		let mut token_example_histogram = FnvHashMap::default();
		for value in values.iter() {
			let mut token_set = FnvHashSet::default();
			for token in tokens(value) {
				let token = token.into_owned();
				token_set.insert(token.clone());
				*token_occurrence_histogram.entry(token).or_insert(0usize) += 1;
			}
			for token in token_set.into_iter() {
				*token_example_histogram.entry(token).or_insert(0usize) += 1;
			}
		}
		// Keep the `max_tokens` most frequent tokens and compute a smoothed IDF for each.
		let mut top_tokens = BinaryHeap::new();
		for (token, count) in token_occurrence_histogram.iter() {
			top_tokens.push(TokenEntry(token.clone(), *count));
		}
		let n_examples = values.len();
		let tokens = (0..settings.max_tokens)
			.filter_map(|_| top_tokens.pop())
			.map(|TokenEntry(token, _)| {
				let examples_count = token_example_histogram[&token];
				let idf = ((1.0 + n_examples.to_f32().unwrap())
					/ (1.0 + examples_count.to_f32().unwrap()))
				.ln() + 1.0;
				BagOfWordsTokenEntry { token, idf }
			})
			.collect::<Vec<_>>();
		let tokens_map = tokens
			.iter()
			.enumerate()
			.map(|(i, entry)| (entry.token.clone(), i))
			.collect();
		BagOfWordsFeatureGroup { tokens, tokens_map }
	}

	/// The number of features this feature group produces, which is the vocabulary size.
	pub fn n_features(&self) -> usize {
		self.tokens.len()
	}

	/// Write the feature values for each of `values` into the corresponding row of `features`.
	pub fn compute_array_f32(
		&self,
		mut features: ArrayViewMut2<f32>,
		values: &[String],
		progress: &impl Fn(),
	) {
		features.fill(0.0);
		for (example_index, value) in values.iter().enumerate() {
			for token in tokens(value) {
				if let Some(token_index) = self.tokens_map.get(token.as_ref()) {
					let entry = &self.tokens[*token_index];
					*features.get_mut([example_index, *token_index]).unwrap() += entry.idf;
				}
			}
			// L2 normalize the feature values for this example.
			let norm = features
				.row(example_index)
				.iter()
				.map(|value| value * value)
				.sum::<f32>()
				.sqrt();
			if norm > 0.0 {
				for feature in features.row_mut(example_index).iter_mut() {
					*feature /= norm;
				}
			}
			progress();
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn messages(values: &[&str]) -> Vec<String> {
		values.iter().map(|value| value.to_string()).collect()
	}

	#[test]
	fn test_fit_excludes_stop_words_and_digits() {
		let values = messages(&[
			"win a free prize 500",
			"free prize inside",
			"are you free for lunch",
		]);
		let feature_group =
			BagOfWordsFeatureGroup::fit(&values, FitBagOfWordsFeatureGroupSettings::default());
		let tokens: Vec<&str> = feature_group
			.tokens
			.iter()
			.map(|entry| entry.token.as_str())
			.collect();
		assert!(tokens.contains(&"free"));
		assert!(tokens.contains(&"prize"));
		assert!(!tokens.contains(&"a"));
		assert!(!tokens.contains(&"are"));
		assert!(!tokens.contains(&"you"));
		assert!(!tokens.contains(&"500"));
	}

	#[test]
	fn test_fit_caps_the_vocabulary() {
		let values = messages(&["free free free cash cash prize"]);
		let feature_group = BagOfWordsFeatureGroup::fit(
			&values,
			FitBagOfWordsFeatureGroupSettings { max_tokens: 2 },
		);
		let tokens: Vec<&str> = feature_group
			.tokens
			.iter()
			.map(|entry| entry.token.as_str())
			.collect();
		assert_eq!(feature_group.n_features(), 2);
		assert!(tokens.contains(&"free"));
		assert!(tokens.contains(&"cash"));
	}

	#[test]
	fn test_compute_array_f32() {
		let values = messages(&["free cash now", "see you at lunch"]);
		let feature_group =
			BagOfWordsFeatureGroup::fit(&values, FitBagOfWordsFeatureGroupSettings::default());
		let n_features = feature_group.n_features();
		let mut features = Array2::<f32>::zeros((3, n_features));
		let test_values = messages(&["free cash", "xyzzy", "lunch"]);
		feature_group.compute_array_f32(features.view_mut(), &test_values, &|| {});
		// Rows with known tokens are L2 normalized, rows without any are zero.
		let norm = |row: usize| {
			features
				.row(row)
				.iter()
				.map(|value| value * value)
				.sum::<f32>()
				.sqrt()
		};
		assert!((norm(0) - 1.0).abs() < 1e-6);
		assert_eq!(norm(1), 0.0);
		assert!((norm(2) - 1.0).abs() < 1e-6);
	}
}

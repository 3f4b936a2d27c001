use super::StreamingMetric;
use num_traits::ToPrimitive;

/**
`BinaryClassificationMetrics` computes the confusion matrix for a binary classifier at a fixed classification threshold, and derives accuracy, precision, recall, and F1 from it.
*/
pub struct BinaryClassificationMetrics {
	threshold: f32,
	true_positives: u64,
	false_positives: u64,
	true_negatives: u64,
	false_negatives: u64,
}

/// The input to [`BinaryClassificationMetrics`](struct.BinaryClassificationMetrics.html): the predicted probability of the positive class and the label, `0` for the negative class and `1` for the positive class.
pub struct BinaryClassificationMetricsInput {
	pub probability: f32,
	pub label: usize,
}

/// The output of [`BinaryClassificationMetrics`](struct.BinaryClassificationMetrics.html).
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryClassificationMetricsOutput {
	pub threshold: f32,
	pub true_positives: u64,
	pub false_positives: u64,
	pub true_negatives: u64,
	pub false_negatives: u64,
	/// The fraction of examples that were classified correctly.
	pub accuracy: f32,
	/// The fraction of examples predicted positive that were actually positive.
	pub precision: f32,
	/// The fraction of actually positive examples that were predicted positive.
	pub recall: f32,
	/// The harmonic mean of precision and recall.
	pub f1_score: f32,
}

impl BinaryClassificationMetrics {
	pub fn new(threshold: f32) -> BinaryClassificationMetrics {
		BinaryClassificationMetrics {
			threshold,
			true_positives: 0,
			false_positives: 0,
			true_negatives: 0,
			false_negatives: 0,
		}
	}
}

impl StreamingMetric<'_> for BinaryClassificationMetrics {
	type Input = BinaryClassificationMetricsInput;
	type Output = BinaryClassificationMetricsOutput;

	fn update(&mut self, value: BinaryClassificationMetricsInput) {
		let predicted = value.probability >= self.threshold;
		let actual = value.label == 1;
		match (predicted, actual) {
			(true, true) => self.true_positives += 1,
			(true, false) => self.false_positives += 1,
			(false, false) => self.true_negatives += 1,
			(false, true) => self.false_negatives += 1,
		}
	}

	fn merge(&mut self, other: Self) {
		self.true_positives += other.true_positives;
		self.false_positives += other.false_positives;
		self.true_negatives += other.true_negatives;
		self.false_negatives += other.false_negatives;
	}

	fn finalize(self) -> BinaryClassificationMetricsOutput {
		let n_examples = self.true_positives
			+ self.false_positives
			+ self.true_negatives
			+ self.false_negatives;
		let n_correct = self.true_positives + self.true_negatives;
		let accuracy = n_correct.to_f32().unwrap() / n_examples.to_f32().unwrap();
		let precision = self.true_positives.to_f32().unwrap()
			/ (self.true_positives + self.false_positives).to_f32().unwrap();
		let recall = self.true_positives.to_f32().unwrap()
			/ (self.true_positives + self.false_negatives).to_f32().unwrap();
		let f1_score = 2.0 * (precision * recall) / (precision + recall);
		BinaryClassificationMetricsOutput {
			threshold: self.threshold,
			true_positives: self.true_positives,
			false_positives: self.false_positives,
			true_negatives: self.true_negatives,
			false_negatives: self.false_negatives,
			accuracy,
			precision,
			recall,
			f1_score,
		}
	}
}

#[test]
fn test_binary_classification_metrics() {
	let mut metrics = BinaryClassificationMetrics::new(0.5);
	let examples = &[
		(0.9, 1),
		(0.8, 1),
		(0.7, 1),
		(0.6, 0),
		(0.4, 1),
		(0.3, 0),
		(0.2, 0),
		(0.1, 0),
	];
	for (probability, label) in examples.iter() {
		metrics.update(BinaryClassificationMetricsInput {
			probability: *probability,
			label: *label,
		});
	}
	insta::assert_debug_snapshot!(metrics.finalize(), @r###"
 BinaryClassificationMetricsOutput {
     threshold: 0.5,
     true_positives: 3,
     false_positives: 1,
     true_negatives: 3,
     false_negatives: 1,
     accuracy: 0.75,
     precision: 0.75,
     recall: 0.75,
     f1_score: 0.75,
 }
 "###);
}

use anyhow::{bail, Context, Result};
use std::path::Path;

/// The name of the negative class, used for messages labeled `ham`.
pub const NOT_SPAM: &str = "Not Spam";
/// The name of the positive class, used for messages labeled `spam`.
pub const SPAM: &str = "Spam";

/// The index of the negative class in the label encoding.
pub const NOT_SPAM_INDEX: usize = 0;
/// The index of the positive class in the label encoding.
pub const SPAM_INDEX: usize = 1;

/// The class names in label encoding order.
pub fn class_names() -> Vec<String> {
	vec![NOT_SPAM.to_owned(), SPAM.to_owned()]
}

/**
A loaded SMS spam dataset: one label and one message per example. Labels are encoded as `0` for ham and `1` for spam.
*/
#[derive(Debug)]
pub struct Dataset {
	pub labels: Vec<usize>,
	pub messages: Vec<String>,
}

impl Dataset {
	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	/// The number of examples labeled spam.
	pub fn n_spam(&self) -> usize {
		self.labels.iter().filter(|label| **label == SPAM_INDEX).count()
	}

	/// The number of examples labeled ham.
	pub fn n_ham(&self) -> usize {
		self.len() - self.n_spam()
	}
}

/**
Load an SMS spam dataset in the SMS Spam Collection format: one example per line, the label `ham` or `spam`, a tab, then the message text. There is no header row. Tabs inside the message text are preserved.
*/
pub fn load_dataset(path: &Path) -> Result<Dataset> {
	let mut reader = csv::ReaderBuilder::new()
		.delimiter(b'\t')
		.has_headers(false)
		.flexible(true)
		.quoting(false)
		.from_path(path)
		.with_context(|| format!("failed to read the dataset at {}", path.display()))?;
	let mut labels = Vec::new();
	let mut messages = Vec::new();
	for (record_index, record) in reader.records().enumerate() {
		let record = record
			.with_context(|| format!("failed to read the dataset at {}", path.display()))?;
		let mut fields = record.iter();
		let label = match fields.next() {
			Some("ham") => NOT_SPAM_INDEX,
			Some("spam") => SPAM_INDEX,
			Some(label) => bail!(
				"invalid label \"{}\" on line {} of {}",
				label,
				record_index + 1,
				path.display()
			),
			None => continue,
		};
		let message = fields.collect::<Vec<&str>>().join("\t");
		labels.push(label);
		messages.push(message);
	}
	if labels.is_empty() {
		bail!("the dataset at {} is empty", path.display());
	}
	Ok(Dataset { labels, messages })
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_load_dataset() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "ham\tsee you at lunch").unwrap();
		writeln!(file, "spam\tWIN FREE CASH NOW").unwrap();
		writeln!(file, "ham\ta message with\ta tab in it").unwrap();
		let dataset = load_dataset(file.path()).unwrap();
		assert_eq!(dataset.len(), 3);
		assert_eq!(dataset.labels, vec![0, 1, 0]);
		assert_eq!(dataset.messages[1], "WIN FREE CASH NOW");
		assert_eq!(dataset.messages[2], "a message with\ta tab in it");
		assert_eq!(dataset.n_spam(), 1);
		assert_eq!(dataset.n_ham(), 2);
	}

	#[test]
	fn test_load_dataset_missing_file() {
		let result = load_dataset(Path::new("/nonexistent/SMSSpamCollection"));
		assert!(result.is_err());
	}

	#[test]
	fn test_load_dataset_invalid_label() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "maybe\tnot sure about this one").unwrap();
		let result = load_dataset(file.path());
		assert!(result.is_err());
	}
}

use crate::Error;
use sift_core::{
	model::Model,
	progress::{ModelKind, ModelTrainProgress, Progress},
};
use sift_util::progress_counter::ProgressCounter;
use std::{
	path::PathBuf,
	sync::{Arc, Mutex},
};

/**
The training status record the API reports. It is created at process start, mutated only through the [`Trainer`](struct.Trainer.html) while a run is in flight, and reset by the reset endpoint.
*/
#[derive(Clone, Debug, serde::Serialize)]
pub struct TrainingStatus {
	pub is_training: bool,
	pub is_trained: bool,
	/// Training progress as a percentage, 0 to 100.
	pub progress: u8,
	pub current_step: String,
	pub metrics: Option<TrainedMetrics>,
	pub logs: Vec<String>,
	pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct TrainedMetrics {
	pub naive_bayes_accuracy: f32,
	pub logistic_regression_accuracy: f32,
}

impl TrainingStatus {
	fn new() -> TrainingStatus {
		TrainingStatus {
			is_training: false,
			is_trained: false,
			progress: 0,
			current_step: String::new(),
			metrics: None,
			logs: Vec::new(),
			error: None,
		}
	}
}

/**
The `Trainer` is the sole owner of the mutable training state. Request handlers read and mutate the state only through its methods, and the start of a run is a check and set under one lock acquisition, so two near simultaneous train requests cannot both start a run.

Training itself runs on a dedicated background thread, since it is CPU bound batch work that must not block the request handling runtime. A successful run replaces the fitted model wholesale. A failed run records its error in the status and leaves the previously fitted model, if any, intact.
*/
pub struct Trainer {
	dataset_path: PathBuf,
	config_path: Option<PathBuf>,
	state: Mutex<TrainerState>,
}

struct TrainerState {
	status: TrainingStatus,
	model: Option<Arc<Model>>,
	phase: Option<Phase>,
	handle: Option<std::thread::JoinHandle<()>>,
}

/// The progress window for the phase of training currently running. The counter is shared with the training thread, so a live percentage can be computed on every status read rather than only when the training thread reports a new phase.
struct Phase {
	base: u8,
	span: u8,
	counter: Option<ProgressCounter>,
}

impl Phase {
	fn new(progress: &Progress) -> Phase {
		match progress {
			Progress::Loading => Phase {
				base: 0,
				span: 10,
				counter: None,
			},
			Progress::ComputingFeatures(counter) => Phase {
				base: 10,
				span: 30,
				counter: Some(counter.clone()),
			},
			Progress::Training(ModelTrainProgress::NaiveBayes(progress)) => Phase {
				base: 40,
				span: 10,
				counter: Some(progress.0.clone()),
			},
			Progress::Testing(ModelKind::NaiveBayes, counter) => Phase {
				base: 50,
				span: 10,
				counter: Some(counter.clone()),
			},
			Progress::Training(ModelTrainProgress::LogisticRegression(progress)) => Phase {
				base: 60,
				span: 25,
				counter: Some(progress.0.clone()),
			},
			Progress::Testing(ModelKind::LogisticRegression, counter) => Phase {
				base: 85,
				span: 15,
				counter: Some(counter.clone()),
			},
		}
	}

	fn percent(&self) -> u8 {
		match &self.counter {
			Some(counter) => self.base + (self.span as f32 * counter.fraction()) as u8,
			None => self.base,
		}
	}
}

impl Trainer {
	pub fn new(dataset_path: PathBuf, config_path: Option<PathBuf>) -> Trainer {
		Trainer {
			dataset_path,
			config_path,
			state: Mutex::new(TrainerState {
				status: TrainingStatus::new(),
				model: None,
				phase: None,
				handle: None,
			}),
		}
	}

	/// A snapshot of the training status, with the progress percentage computed from the running phase's counter.
	pub fn status(&self) -> TrainingStatus {
		let state = self.state.lock().unwrap();
		let mut status = state.status.clone();
		if let Some(phase) = &state.phase {
			status.progress = phase.percent();
		}
		status
	}

	/// The fitted model, if a training run has succeeded since the last reset. The model is shared as an `Arc` so predictions run outside the lock and never block each other.
	pub fn model(&self) -> Option<Arc<Model>> {
		self.state.lock().unwrap().model.clone()
	}

	/// Start training on a background thread. Returns whether this run replaces an existing trained model.
	pub fn start(self: Arc<Trainer>) -> Result<bool, Error> {
		if !self.dataset_path.exists() {
			return Err(Error::BadRequest(format!(
				"no dataset found at {}",
				self.dataset_path.display()
			)));
		}
		let mut state = self.state.lock().unwrap();
		if state.status.is_training {
			return Err(Error::Conflict("training is already in progress".to_owned()));
		}
		let retraining = state.status.is_trained;
		state.status.is_training = true;
		state.status.progress = 0;
		state.status.current_step = "starting training".to_owned();
		state.status.logs = vec!["starting training".to_owned()];
		state.status.error = None;
		state.phase = None;
		let trainer = self.clone();
		state.handle = Some(std::thread::spawn(move || trainer.run()));
		Ok(retraining)
	}

	fn run(&self) {
		let result = sift_core::train(
			&self.dataset_path,
			self.config_path.as_deref(),
			&mut |progress| self.update_progress(progress),
		);
		let mut state = self.state.lock().unwrap();
		match result {
			Ok(model) => {
				state.status.metrics = Some(TrainedMetrics {
					naive_bayes_accuracy: model.naive_bayes_accuracy,
					logistic_regression_accuracy: model.logistic_regression_accuracy,
				});
				for line in summary(&model) {
					state.status.logs.push(line);
				}
				state.status.is_trained = true;
				state.status.progress = 100;
				state.status.current_step = "training completed".to_owned();
				state.model = Some(Arc::new(model));
			}
			Err(error) => {
				// Keep any previously fitted model. A failed run reports its error and leaves the prior state intact.
				let error = format!("{:#}", error);
				state.status.logs.push(format!("error: {}", error));
				state.status.current_step = format!("error: {}", error);
				state.status.error = Some(error);
			}
		}
		state.phase = None;
		state.status.is_training = false;
	}

	fn update_progress(&self, progress: Progress) {
		let step = progress.to_string();
		let phase = Phase::new(&progress);
		let mut state = self.state.lock().unwrap();
		state.status.progress = phase.percent();
		if state.status.current_step != step {
			state.status.current_step = step.clone();
			state.status.logs.push(step);
		}
		state.phase = Some(phase);
	}

	/// Clear the training status and discard the fitted model.
	pub fn reset(&self) -> Result<(), Error> {
		let mut state = self.state.lock().unwrap();
		if state.status.is_training {
			return Err(Error::Conflict(
				"cannot reset while training is in progress".to_owned(),
			));
		}
		state.status = TrainingStatus::new();
		state.model = None;
		state.phase = None;
		Ok(())
	}

	#[cfg(test)]
	fn join(&self) {
		let handle = self.state.lock().unwrap().handle.take();
		if let Some(handle) = handle {
			handle.join().unwrap();
		}
	}
}

/// The log lines recorded after a successful run, mirroring what the one shot cli training prints.
fn summary(model: &Model) -> Vec<String> {
	let stats = &model.stats;
	vec![
		format!(
			"loaded {} examples ({} spam, {} ham)",
			stats.n_examples, stats.n_spam, stats.n_ham
		),
		format!(
			"split into {} train and {} test examples",
			stats.n_train, stats.n_test
		),
		format!("vocabulary size: {}", model.feature_group.n_features()),
		format!("naive bayes accuracy: {:.4}", model.naive_bayes_accuracy),
		format!(
			"naive bayes precision: {:.4}",
			model.naive_bayes_metrics.precision
		),
		format!("naive bayes recall: {:.4}", model.naive_bayes_metrics.recall),
		format!(
			"logistic regression accuracy: {:.4}",
			model.logistic_regression_accuracy
		),
		format!(
			"logistic regression precision: {:.4}",
			model.logistic_regression_metrics.precision
		),
		format!(
			"logistic regression recall: {:.4}",
			model.logistic_regression_metrics.recall
		),
	]
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Write;

	fn write_fixture_dataset(path: &std::path::Path) {
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
		let mut file = std::fs::File::create(path).unwrap();
		for index in 0..5 {
			for spam_message in spam_messages.iter() {
				writeln!(file, "spam\t{} {}", spam_message, index).unwrap();
			}
			for ham_message in ham_messages.iter() {
				writeln!(file, "ham\t{} {}", ham_message, index).unwrap();
			}
		}
	}

	#[test]
	fn test_start_rejects_missing_dataset() {
		let trainer = Arc::new(Trainer::new(
			PathBuf::from("/nonexistent/SMSSpamCollection"),
			None,
		));
		match trainer.clone().start() {
			Err(Error::BadRequest(_)) => {}
			_ => panic!("expected a bad request error"),
		}
		assert!(!trainer.status().is_training);
	}

	#[test]
	fn test_start_rejects_concurrent_training() {
		let directory = tempfile::tempdir().unwrap();
		let dataset_path = directory.path().join("SMSSpamCollection");
		write_fixture_dataset(&dataset_path);
		let trainer = Arc::new(Trainer::new(dataset_path, None));
		// Simulate a run in flight, then check that a second start is rejected and leaves the state alone.
		trainer.state.lock().unwrap().status.is_training = true;
		match trainer.clone().start() {
			Err(Error::Conflict(_)) => {}
			_ => panic!("expected a conflict error"),
		}
		assert!(trainer.status().is_training);
		trainer.state.lock().unwrap().status.is_training = false;
	}

	#[test]
	fn test_train_predict_reset_cycle() {
		let directory = tempfile::tempdir().unwrap();
		let dataset_path = directory.path().join("SMSSpamCollection");
		write_fixture_dataset(&dataset_path);
		let trainer = Arc::new(Trainer::new(dataset_path, None));
		// Before training there is no model to predict with.
		assert!(trainer.model().is_none());
		// Train and wait for the background thread.
		let retraining = trainer.clone().start().unwrap();
		assert!(!retraining);
		trainer.join();
		let status = trainer.status();
		assert!(!status.is_training);
		assert!(status.is_trained);
		assert_eq!(status.progress, 100);
		assert!(status.error.is_none());
		assert!(!status.logs.is_empty());
		let metrics = status.metrics.unwrap();
		assert!(metrics.naive_bayes_accuracy > 0.5);
		assert!(metrics.logistic_regression_accuracy > 0.5);
		// A clearly spammy message classifies as spam with confidence above a coin flip.
		let model = trainer.model().unwrap();
		let predictions = sift_core::predict(&model, &["WIN FREE CASH NOW".to_owned()]);
		assert_eq!(predictions[0].naive_bayes.label, "Spam");
		assert!(predictions[0].naive_bayes.confidence > 0.5);
		// A second run is a retrain and replaces the fitted state.
		let retraining = trainer.clone().start().unwrap();
		assert!(retraining);
		trainer.join();
		assert!(trainer.status().is_trained);
		// Reset discards the model and clears the status.
		trainer.reset().unwrap();
		assert!(trainer.model().is_none());
		let status = trainer.status();
		assert!(!status.is_trained);
		assert!(status.metrics.is_none());
		assert!(status.logs.is_empty());
		assert_eq!(status.progress, 0);
	}

	#[test]
	fn test_failed_training_keeps_previous_model() {
		let directory = tempfile::tempdir().unwrap();
		let dataset_path = directory.path().join("SMSSpamCollection");
		write_fixture_dataset(&dataset_path);
		let trainer = Arc::new(Trainer::new(dataset_path.clone(), None));
		trainer.clone().start().unwrap();
		trainer.join();
		assert!(trainer.status().is_trained);
		// Corrupt the dataset, then retrain. The run fails, the error is recorded, and the previous model survives.
		std::fs::write(&dataset_path, "maybe\tnot a valid label\n").unwrap();
		trainer.clone().start().unwrap();
		trainer.join();
		let status = trainer.status();
		assert!(!status.is_training);
		assert!(status.error.is_some());
		assert!(status.is_trained);
		assert!(status.metrics.is_some());
		assert!(trainer.model().is_some());
	}
}

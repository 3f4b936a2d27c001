use sift_util::progress_counter::ProgressCounter;

/// The phases of training, reported through the `update_progress` callback passed to [`train`](../train/fn.train.html). The counters are shared with the training thread, so holding on to a clone of one allows progress to be polled while the phase is still running.
#[derive(Debug)]
pub enum Progress {
	Loading,
	ComputingFeatures(ProgressCounter),
	Training(ModelTrainProgress),
	Testing(ModelKind, ProgressCounter),
}

#[derive(Debug)]
pub enum ModelTrainProgress {
	NaiveBayes(sift_bayes::TrainProgress),
	LogisticRegression(sift_linear::TrainProgress),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModelKind {
	NaiveBayes,
	LogisticRegression,
}

impl std::fmt::Display for ModelKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ModelKind::NaiveBayes => write!(f, "naive bayes"),
			ModelKind::LogisticRegression => write!(f, "logistic regression"),
		}
	}
}

impl Progress {
	pub fn model_kind(&self) -> Option<ModelKind> {
		match self {
			Progress::Loading | Progress::ComputingFeatures(_) => None,
			Progress::Training(ModelTrainProgress::NaiveBayes(_)) => Some(ModelKind::NaiveBayes),
			Progress::Training(ModelTrainProgress::LogisticRegression(_)) => {
				Some(ModelKind::LogisticRegression)
			}
			Progress::Testing(model_kind, _) => Some(*model_kind),
		}
	}
}

impl std::fmt::Display for Progress {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Progress::Loading => write!(f, "loading the dataset"),
			Progress::ComputingFeatures(_) => write!(f, "computing features"),
			Progress::Training(_) => {
				write!(f, "training the {} model", self.model_kind().unwrap())
			}
			Progress::Testing(model_kind, _) => write!(f, "testing the {} model", model_kind),
		}
	}
}

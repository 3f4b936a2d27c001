use crate::{json_response, Context, Error};
use anyhow::Result;
use hyper::{Body, Request, Response};
use sift_core::predict::Prediction;

#[derive(serde::Deserialize)]
struct PredictRequest {
	message: String,
}

#[derive(serde::Serialize)]
pub struct PredictResponse {
	pub message: String,
	pub naive_bayes_result: String,
	pub naive_bayes_confidence: f32,
	pub logistic_regression_result: String,
	pub logistic_regression_confidence: f32,
}

impl From<Prediction> for PredictResponse {
	fn from(prediction: Prediction) -> PredictResponse {
		PredictResponse {
			message: prediction.message,
			naive_bayes_result: prediction.naive_bayes.label,
			naive_bayes_confidence: prediction.naive_bayes.confidence,
			logistic_regression_result: prediction.logistic_regression.label,
			logistic_regression_confidence: prediction.logistic_regression.confidence,
		}
	}
}

pub async fn post(context: &Context, mut request: Request<Body>) -> Result<Response<Body>> {
	let model = context.trainer.model().ok_or_else(|| {
		Error::BadRequest("the model is not trained yet, train it first".to_owned())
	})?;
	let data = hyper::body::to_bytes(request.body_mut())
		.await
		.map_err(|_| Error::BadRequest("failed to read the request body".to_owned()))?;
	let request: PredictRequest = serde_json::from_slice(&data)
		.map_err(|_| Error::BadRequest("invalid request body".to_owned()))?;
	if request.message.trim().is_empty() {
		return Err(Error::BadRequest("no message provided".to_owned()).into());
	}
	let predictions = sift_core::predict(&model, std::slice::from_ref(&request.message));
	let response: PredictResponse = predictions.into_iter().next().unwrap().into();
	json_response(&response)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::trainer::Trainer;
	use std::{path::PathBuf, sync::Arc};

	fn test_context() -> Context {
		let trainer = Arc::new(Trainer::new(
			PathBuf::from("/nonexistent/SMSSpamCollection"),
			None,
		));
		Context { trainer }
	}

	#[tokio::test]
	async fn test_predict_rejects_untrained() {
		let context = test_context();
		let request = Request::builder()
			.method("POST")
			.uri("/api/predict")
			.body(Body::from(r#"{"message":"WIN FREE CASH NOW"}"#))
			.unwrap();
		let error = post(&context, request).await.err().unwrap();
		match error.downcast_ref::<Error>() {
			Some(Error::BadRequest(_)) => {}
			_ => panic!("expected a bad request error"),
		}
	}
}

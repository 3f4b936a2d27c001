use super::predict::PredictResponse;
use crate::{json_response, Context, Error};
use anyhow::Result;
use hyper::{Body, Request, Response};

#[derive(serde::Deserialize)]
struct BatchPredictRequest {
	messages: Vec<String>,
}

#[derive(serde::Serialize)]
struct BatchPredictResponse {
	results: Vec<PredictResponse>,
}

pub async fn post(context: &Context, mut request: Request<Body>) -> Result<Response<Body>> {
	let model = context.trainer.model().ok_or_else(|| {
		Error::BadRequest("the model is not trained yet, train it first".to_owned())
	})?;
	let data = hyper::body::to_bytes(request.body_mut())
		.await
		.map_err(|_| Error::BadRequest("failed to read the request body".to_owned()))?;
	let request: BatchPredictRequest = serde_json::from_slice(&data)
		.map_err(|_| Error::BadRequest("invalid request body".to_owned()))?;
	if request.messages.is_empty() {
		return Err(Error::BadRequest("no messages provided".to_owned()).into());
	}
	// Each message is classified independently and the results come back in input order.
	let results = sift_core::predict(&model, &request.messages)
		.into_iter()
		.map(Into::into)
		.collect();
	json_response(&BatchPredictResponse { results })
}

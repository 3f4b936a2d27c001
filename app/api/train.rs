use crate::{json_response, Context};
use anyhow::Result;
use hyper::{Body, Request, Response};

#[derive(serde::Serialize)]
struct TrainResponse {
	message: &'static str,
}

pub async fn post(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let retraining = context.trainer.clone().start()?;
	let message = if retraining {
		"retraining started"
	} else {
		"training started"
	};
	json_response(&TrainResponse { message })
}

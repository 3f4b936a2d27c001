use crate::{json_response, Context};
use anyhow::Result;
use hyper::{Body, Request, Response};

#[derive(serde::Serialize)]
struct ResetResponse {
	message: &'static str,
}

pub async fn post(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	context.trainer.reset()?;
	json_response(&ResetResponse {
		message: "reset successful",
	})
}

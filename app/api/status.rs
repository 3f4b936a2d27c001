use crate::{json_response, Context};
use anyhow::Result;
use hyper::{Body, Request, Response};

pub async fn get(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	json_response(&context.trainer.status())
}

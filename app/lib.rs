/*!
This crate is the HTTP front door for the spam classifier. It holds one [`Trainer`](trainer/struct.Trainer.html) and exposes a small JSON API: start a training run, poll its status, classify one or many messages, and reset. Each endpoint validates the request shape, delegates to the trainer or to [`sift_core::predict`](../sift_core/predict/fn.predict.html), and serializes the result.
*/

use crate::trainer::Trainer;
use anyhow::Result;
use hyper::{header, Body, Method, Request, Response, StatusCode};
use std::{path::PathBuf, sync::Arc};

mod api;
pub mod trainer;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("{0}")]
	BadRequest(String),
	#[error("{0}")]
	Conflict(String),
	#[error("not found")]
	NotFound,
}

pub struct Options {
	pub config: Option<PathBuf>,
	pub dataset: PathBuf,
	pub host: std::net::IpAddr,
	pub port: u16,
}

pub struct Context {
	pub trainer: Arc<Trainer>,
}

async fn handle(context: Arc<Context>, request: Request<Body>) -> Response<Body> {
	let method = request.method().clone();
	let uri = request.uri().clone();
	let path = uri.path();
	let path_components: Vec<_> = path.split('/').skip(1).collect();
	let result = match (&method, path_components.as_slice()) {
		(&Method::POST, &["api", "train"]) => self::api::train::post(&context, request).await,
		(&Method::GET, &["api", "status"]) => self::api::status::get(&context, request).await,
		(&Method::POST, &["api", "predict"]) => self::api::predict::post(&context, request).await,
		(&Method::POST, &["api", "batch-predict"]) => {
			self::api::batch_predict::post(&context, request).await
		}
		(&Method::POST, &["api", "reset"]) => self::api::reset::post(&context, request).await,
		(&Method::GET, &["health"]) => self::api::health::get(&context, request).await,
		_ => Err(Error::NotFound.into()),
	};
	let response = match result {
		Ok(response) => response,
		Err(error) => match error.downcast_ref::<Error>() {
			Some(Error::BadRequest(message)) => error_response(StatusCode::BAD_REQUEST, message),
			Some(Error::Conflict(message)) => error_response(StatusCode::CONFLICT, message),
			Some(Error::NotFound) => error_response(StatusCode::NOT_FOUND, "not found"),
			None => {
				eprintln!("{}", error);
				error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
			}
		},
	};
	eprintln!("{} {} {}", method, path, response.status());
	response
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
	let body = serde_json::to_vec(&serde_json::json!({ "error": message })).unwrap();
	Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))
		.unwrap()
}

fn json_response<T>(value: &T) -> Result<Response<Body>>
where
	T: serde::Serialize,
{
	let body = serde_json::to_vec(value)?;
	let response = Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))?;
	Ok(response)
}

pub fn run(options: Options) -> Result<()> {
	tokio::runtime::Builder::new()
		.threaded_scheduler()
		.enable_all()
		.build()
		.unwrap()
		.block_on(run_impl(options))
}

async fn run_impl(options: Options) -> Result<()> {
	let trainer = Arc::new(Trainer::new(options.dataset.clone(), options.config.clone()));
	let context = Context { trainer };
	sift_util::serve::serve(options.host, options.port, context, handle).await?;
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	fn test_context() -> Arc<Context> {
		let trainer = Arc::new(Trainer::new(
			PathBuf::from("/nonexistent/SMSSpamCollection"),
			None,
		));
		Arc::new(Context { trainer })
	}

	#[tokio::test]
	async fn test_handle_unknown_route() {
		let request = Request::builder()
			.method("GET")
			.uri("/nope")
			.body(Body::empty())
			.unwrap();
		let response = handle(test_context(), request).await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_handle_status() {
		let request = Request::builder()
			.method("GET")
			.uri("/api/status")
			.body(Body::empty())
			.unwrap();
		let response = handle(test_context(), request).await;
		assert_eq!(response.status(), StatusCode::OK);
		let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
		let status: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
		assert_eq!(status["is_training"], false);
		assert_eq!(status["is_trained"], false);
		assert_eq!(status["progress"], 0);
	}

	#[tokio::test]
	async fn test_handle_train_with_missing_dataset() {
		let request = Request::builder()
			.method("POST")
			.uri("/api/train")
			.body(Body::empty())
			.unwrap();
		let response = handle(test_context(), request).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_handle_health() {
		let request = Request::builder()
			.method("GET")
			.uri("/health")
			.body(Body::empty())
			.unwrap();
		let response = handle(test_context(), request).await;
		assert_eq!(response.status(), StatusCode::OK);
	}
}

/*!
This crate trains the spam models and makes predictions with them. [`train`](train/fn.train.html) loads the SMS dataset, computes bag of words features, fits a naive Bayes and a logistic regression model, and evaluates both on a held out test split. [`predict`](predict/fn.predict.html) classifies a batch of messages with a trained [`Model`](model/struct.Model.html).
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod config;
pub mod dataset;
pub mod model;
pub mod predict;
pub mod progress;
pub mod train;

pub use self::{predict::predict, train::train};

//! This module contains the main entrypoint to the sift cli.

use anyhow::Result;
use clap::Clap;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Clap)]
#[clap(
	about = "Train and serve the sift spam classifier.",
	setting = clap::AppSettings::DisableHelpSubcommand,
)]
enum Options {
	#[clap(name = "train")]
	Train(Box<TrainOptions>),
	#[clap(name = "app")]
	App(Box<AppOptions>),
}

#[derive(Clap, Debug)]
#[clap(about = "train the spam models once and print their metrics")]
struct TrainOptions {
	#[clap(
		short,
		long,
		about = "the path to the SMS spam dataset",
		default_value = "SMSSpamCollection"
	)]
	file: PathBuf,
	#[clap(short, long, about = "the path to a training config file")]
	config: Option<PathBuf>,
	#[clap(long = "no-progress", about = "disable the progress log", parse(from_flag = std::ops::Not::not))]
	progress: bool,
}

#[derive(Clap)]
#[clap(about = "run the classification web app")]
struct AppOptions {
	#[clap(
		short,
		long,
		about = "the path to the SMS spam dataset",
		default_value = "SMSSpamCollection"
	)]
	file: PathBuf,
	#[clap(short, long, about = "the path to a training config file")]
	config: Option<PathBuf>,
	#[clap(long, default_value = "0.0.0.0")]
	host: std::net::IpAddr,
	#[clap(long, env = "PORT", default_value = "8080")]
	port: u16,
}

fn main() {
	let options = Options::parse();
	let result = match options {
		Options::Train(options) => cli_train(*options),
		Options::App(options) => cli_app(*options),
	};
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn cli_train(options: TrainOptions) -> Result<()> {
	let mut last_step = String::new();
	let model = sift_core::train(&options.file, options.config.as_deref(), &mut |progress| {
		if options.progress {
			let step = progress.to_string();
			if step != last_step {
				eprintln!("{}", step);
				last_step = step;
			}
		}
	})?;
	let stats = &model.stats;
	println!("{}", "dataset".bold());
	println!(
		"examples: {} ({} spam, {} ham)",
		stats.n_examples, stats.n_spam, stats.n_ham
	);
	println!("train/test split: {}/{}", stats.n_train, stats.n_test);
	println!("vocabulary size: {}", model.feature_group.n_features());
	let models = &[
		(
			"naive bayes",
			model.naive_bayes_accuracy,
			&model.naive_bayes_metrics,
		),
		(
			"logistic regression",
			model.logistic_regression_accuracy,
			&model.logistic_regression_metrics,
		),
	];
	for (name, accuracy, metrics) in models.iter() {
		println!("{}", name.bold());
		println!("accuracy: {:.4}", accuracy);
		println!("precision: {:.4}", metrics.precision);
		println!("recall: {:.4}", metrics.recall);
		println!("f1 score: {:.4}", metrics.f1_score);
	}
	Ok(())
}

fn cli_app(options: AppOptions) -> Result<()> {
	sift_app::run(sift_app::Options {
		config: options.config,
		dataset: options.file,
		host: options.host,
		port: options.port,
	})
}

use clap::Parser;
use std::env;
use std::io;
use std::path::PathBuf;

mod helpers;
mod templates;
mod openaiapi;
mod docgen;


use docgen::DocRequestor;
use openaiapi::{HttpChatClient, SamplingOptions};
use templates::TemplateSet;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Parser)]
struct Cli {
	/// Source files to document; with none given, paths are read from stdin
	/// one per line until a blank line
	paths: Vec<PathBuf>,
	#[clap(long, default_value = "gpt-3.5-turbo")]
	model: String,
	/// the source extension accepted for processing
	#[clap(long, default_value = "py")]
	extension: String,
	/// JSON object file whose keys override the built-in templates
	#[clap(long)]
	templates: Option<PathBuf>,
	#[clap(long, default_value_t = 2048)]
	max_tokens: u32,
	#[clap(long, default_value_t = 1.0)]
	temperature: f64,
	#[clap(long, default_value_t = 1.0)]
	top_p: f64,
	#[clap(long, default_value_t = 0.0)]
	frequency_penalty: f64,
	#[clap(long, default_value_t = 0.0)]
	presence_penalty: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Cli::parse();

	// Missing credential is fatal before any file is touched.
	let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
		Box::<dyn std::error::Error>::from("Please set the OPENAI_API_KEY environment variable")
	})?;
	let api_base = env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

	let mut template_set = TemplateSet::default();
	if let Some(overrides) = args.templates.as_ref() {
		template_set = template_set.with_overrides_from_file(overrides)?;
	}

	let supplied = if args.paths.is_empty() {
		println!("Enter the paths of .{} files to document (one per line)", &args.extension);
		println!("Press Enter twice to start processing");
		let stdin = io::stdin();
		helpers::read_lines_until_blank(stdin.lock())?
			.into_iter()
			.map(PathBuf::from)
			.collect()
	} else {
		args.paths
	};

	let (files_to_process, skipped) = docgen::collect_valid_paths(supplied, &args.extension);
	for err in &skipped {
		eprintln!("Warning: {}. Skipping...", err);
	}

	if files_to_process.is_empty() {
		println!("No valid files to process.");
		return Ok(());
	}

	let sampling = SamplingOptions {
		max_tokens: args.max_tokens,
		temperature: args.temperature,
		top_p: args.top_p,
		frequency_penalty: args.frequency_penalty,
		presence_penalty: args.presence_penalty,
	};
	let client = HttpChatClient::new(&api_base, &api_key)?;
	let requestor = DocRequestor::new(client, template_set, &args.model, sampling);

	// Strictly sequential: each file runs to completion before the next.
	for path in &files_to_process {
		println!();
		println!("Processing {}...", path.display());
		match requestor.generate_documentation(path).await {
			Ok(out_path) => println!("Documentation generated successfully: {}", out_path.display()),
			Err(err) => println!("Error generating documentation: {}", err),
		}
	}
	Ok(())
}

#![allow(dead_code)]

use clap::Parser;
use std::fs;
use std::path::PathBuf;

mod helpers;
mod templates;

use templates::TemplateSet;

/// Print the prompt that docgen would send for a file, without any network
/// call. Useful for checking template overrides.
#[derive(Parser)]
struct Cli {
	path: PathBuf,
	/// JSON object file whose keys override the built-in templates
	#[clap(long)]
	templates: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Cli::parse();

	let mut template_set = TemplateSet::default();
	if let Some(overrides) = args.templates.as_ref() {
		template_set = template_set.with_overrides_from_file(overrides)?;
	}

	let code = fs::read_to_string(&args.path)?;
	let prompt = template_set.render_prompt(&code)?;
	println!("-- system --");
	println!("{}", template_set.system_message());
	println!("-- prompt --");
	println!("{}", prompt);
	Ok(())
}

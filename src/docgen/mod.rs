use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::helpers;
use crate::openaiapi::{ApiError, Chat, ChatBackend, SamplingOptions};
use crate::templates::{TemplateError, TemplateSet};

pub const DOC_EXTENSION: &str = "md";

/// One variant per failure class so callers and tests can branch without
/// string matching. `Display` gives the line the CLI prints.
#[derive(Debug, Error)]
pub enum DocError {
	#[error("{0}")]
	Validation(String),
	#[error("template error: {0}")]
	Template(#[from] TemplateError),
	#[error("api call failed: {0}")]
	Api(#[from] ApiError),
	#[error("io error: {0}")]
	Io(#[from] io::Error),
}

/// Reject paths the run should skip: wrong extension or nothing on disk.
pub fn validate_source_path(path: &Path, extension: &str) -> Result<(), DocError> {
	if !helpers::has_specific_extension(path, extension) {
		return Err(DocError::Validation(format!(
			"{} is not a .{} file", path.display(), extension)));
	}
	if !path.exists() {
		return Err(DocError::Validation(format!(
			"{} does not exist", path.display())));
	}
	Ok(())
}

/// Split the supplied paths into the ones to process and the skip reasons,
/// preserving order. Runs before any backend is touched.
pub fn collect_valid_paths(paths: Vec<PathBuf>, extension: &str) -> (Vec<PathBuf>, Vec<DocError>) {
	let mut valid = Vec::new();
	let mut skipped = Vec::new();
	for path in paths {
		match validate_source_path(&path, extension) {
			Ok(()) => valid.push(path),
			Err(err) => skipped.push(err),
		}
	}
	(valid, skipped)
}

/// Derived output location: same directory, same stem, doc extension.
pub fn output_path(source: &Path) -> PathBuf {
	source.with_extension(DOC_EXTENSION)
}

/// Builds one prompt per source file, makes one completion call and writes
/// the result next to the source. Stateless per call beyond the configured
/// templates, model and sampling parameters.
pub struct DocRequestor<B: ChatBackend> {
	backend: B,
	templates: TemplateSet,
	model: String,
	sampling: SamplingOptions,
}

impl<B: ChatBackend> DocRequestor<B> {
	pub fn new(backend: B, templates: TemplateSet, model: &str, sampling: SamplingOptions) -> Self {
		DocRequestor {
			backend,
			templates,
			model: model.to_string(),
			sampling,
		}
	}

	/// Read the source file, call the backend once and write the returned
	/// text to `<stem>.md`, truncating any previous file there. No retries,
	/// no rollback; any failure maps to one `DocError` variant and the
	/// caller moves on to the next file.
	pub async fn generate_documentation(&self, path: &Path) -> Result<PathBuf, DocError> {
		let code = fs::read_to_string(path)?;
		let prompt = self.templates.render_prompt(&code)?;
		let chat = Chat::new(&self.model, self.templates.system_message(), &prompt, &self.sampling);
		let documentation = self.backend.complete(&chat).await?;
		let rendered = self.templates.render_output(&documentation)?;
		let out_path = output_path(path);
		fs::write(&out_path, rendered)?;
		Ok(out_path)
	}
}

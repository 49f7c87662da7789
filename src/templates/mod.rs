use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::helpers::{self, TemplateProcessor};

pub const KEY_SYSTEM: &str = "system";
pub const KEY_PROMPT: &str = "prompt";
pub const KEY_OUTPUT: &str = "output";

const DEFAULT_SYSTEM: &str = "You are a technical documentation expert.";

const DEFAULT_PROMPT: &str = "Please provide detailed documentation for the following source code.
Include:
- Overview of the code
- Function descriptions
- Parameters and return values
- Usage examples

Code:
{% code %}
";

// The default output skeleton is the bare tag, so by default the response
// text is written to disk verbatim.
const DEFAULT_OUTPUT: &str = "{% documentation %}";

#[derive(Debug, Error)]
pub enum TemplateError {
	#[error("template '{template}' has no '{{% {placeholder} %}}' placeholder")]
	MissingPlaceholder {
		template: &'static str,
		placeholder: &'static str,
	},
	#[error("cannot read template overrides: {0}")]
	Load(#[from] helpers::HelperError),
}

/// The named template fragments used to assemble a prompt and the output
/// document. Immutable once built; `with_overrides` derives a new set
/// instead of mutating in place. No validation happens at merge time, a
/// placeholder lost in an override only surfaces when rendering.
#[derive(Debug, Clone)]
pub struct TemplateSet {
	entries: HashMap<String, String>,
}

impl Default for TemplateSet {
	fn default() -> Self {
		let mut entries = HashMap::new();
		entries.insert(KEY_SYSTEM.to_string(), DEFAULT_SYSTEM.to_string());
		entries.insert(KEY_PROMPT.to_string(), DEFAULT_PROMPT.to_string());
		entries.insert(KEY_OUTPUT.to_string(), DEFAULT_OUTPUT.to_string());
		TemplateSet { entries }
	}
}

impl TemplateSet {
	/// Derive a new set with the supplied keys merged over the current ones.
	pub fn with_overrides(&self, overrides: HashMap<String, String>) -> Self {
		let mut entries = self.entries.clone();
		entries.extend(overrides);
		TemplateSet { entries }
	}

	/// Derive a new set from a JSON object file of key -> template string.
	pub fn with_overrides_from_file(&self, path: impl AsRef<Path>) -> Result<Self, TemplateError> {
		let overrides: HashMap<String, String> = helpers::read_from_json(path)?;
		Ok(self.with_overrides(overrides))
	}

	fn fragment(&self, key: &str) -> &str {
		self.entries.get(key).map(String::as_str).unwrap_or("")
	}

	pub fn system_message(&self) -> &str {
		self.fragment(KEY_SYSTEM)
	}

	/// Substitute the source text into the prompt skeleton.
	pub fn render_prompt(&self, code: &str) -> Result<String, TemplateError> {
		let skeleton = self.fragment(KEY_PROMPT);
		if !helpers::template_has_tag(skeleton, "code") {
			return Err(TemplateError::MissingPlaceholder {
				template: KEY_PROMPT,
				placeholder: "code",
			});
		}
		let mut processor = TemplateProcessor::new();
		processor.add_replacement("code".to_string(), code.to_string());
		Ok(processor.process_template(skeleton))
	}

	/// Substitute the model's text into the output skeleton.
	pub fn render_output(&self, documentation: &str) -> Result<String, TemplateError> {
		let skeleton = self.fragment(KEY_OUTPUT);
		if !helpers::template_has_tag(skeleton, "documentation") {
			return Err(TemplateError::MissingPlaceholder {
				template: KEY_OUTPUT,
				placeholder: "documentation",
			});
		}
		let mut processor = TemplateProcessor::new();
		processor.add_replacement("documentation".to_string(), documentation.to_string());
		Ok(processor.process_template(skeleton))
	}
}

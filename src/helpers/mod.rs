use std::fs::File;
use std::io::{self, BufRead, Read};
use std::path::Path;
use std::collections::HashMap;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelperError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
	#[error("Serde error: {0}")]
	Serde(#[from] serde_json::Error),
}

pub fn has_specific_extension<P: AsRef<Path>>(path: P, ext: &str) -> bool {
	match path.as_ref().extension() {
		Some(os_str) => os_str == ext,
		None => false,
	}
}

pub fn read_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T, HelperError> {
	let mut file = File::open(file_path.as_ref())?;
	let mut content = String::new();
	file.read_to_string(&mut content)?;
	let parsed_json: T = serde_json::from_str(&content)?;
	Ok(parsed_json)
}

/// Collect newline separated entries from a reader until a blank line or EOF.
/// Entries are trimmed of surrounding whitespace.
pub fn read_lines_until_blank<R: BufRead>(reader: R) -> Result<Vec<String>, HelperError> {
	let mut entries = Vec::new();
	for line in reader.lines() {
		let line = line?;
		let trimmed = line.trim();
		if trimmed.is_empty() {
			break;
		}
		entries.push(trimmed.to_string());
	}
	Ok(entries)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
	Normal,
	PossibleOpen,
	InKey,
	PossibleClose,
}

pub struct TemplateProcessor {
	replacements: HashMap<String, String>,
}

impl TemplateProcessor {
	pub fn new() -> Self {
		Self {
			replacements: HashMap::new(),
		}
	}

	pub fn add_replacement(&mut self, key: String, value: String) {
		self.replacements.insert(key, value);
	}

	pub fn process_template(&self, template: &str) -> String {
		let mut output = String::new();
		let mut state = State::Normal;
		let mut current_key = String::new();

		for ch in template.chars() {
			match state {
				State::Normal => {
					if ch == '{' {
						state = State::PossibleOpen;
					} else {
						output.push(ch);
					}
				}
				State::PossibleOpen => {
					if ch == '%' {
						state = State::InKey;
						current_key.clear();
					} else {
						output.push('{');
						output.push(ch);
						state = State::Normal;
					}
				}
				State::InKey => {
					if ch == '%' {
						state = State::PossibleClose;
					} else {
						current_key.push(ch);
					}
				}
				State::PossibleClose => {
					if ch == '}' {
						// Found complete tag: {% key %}
						let key = current_key.trim();
						if let Some(replacement) = self.replacements.get(key) {
							output.push_str(replacement);
						} else {
							// Key not found, output original tag
							output.push_str("{%");
							output.push_str(key);
							output.push_str("%}");
						}
						state = State::Normal;
					} else {
						// Not a closing brace, so the '%' was part of the key
						current_key.push('%');
						current_key.push(ch);
						state = State::InKey;
					}
				}
			}
		}

		match state {
			State::PossibleOpen => {
				output.push('{');
			}
			State::InKey => {
				output.push_str("{%");
				output.push_str(&current_key);
			}
			State::PossibleClose => {
				output.push_str("{%");
				output.push_str(&current_key);
				output.push('%');
			}
			State::Normal => {}
		}

		output
	}
}

/// Whether the template contains a `{% key %}` tag for the given key.
pub fn template_has_tag(template: &str, key: &str) -> bool {
	let mut rest = template;
	while let Some(open) = rest.find("{%") {
		rest = &rest[open + 2..];
		if let Some(close) = rest.find("%}") {
			if rest[..close].trim() == key {
				return true;
			}
			rest = &rest[close + 2..];
		} else {
			break;
		}
	}
	false
}

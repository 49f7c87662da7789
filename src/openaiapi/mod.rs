use serde_derive::{Deserialize, Serialize};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("invalid endpoint url: {0}")]
	Url(#[from] url::ParseError),
	#[error("http error: {0}")]
	Http(#[from] reqwest::Error),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("api returned status {status}: {body}")]
	Status { status: u16, body: String },
	#[error("malformed api response: {0}")]
	MalformedResponse(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
	pub role: String,
	pub content: Option<String>,
}

impl Message {
	pub fn normal(role: &str, content: &str) -> Self {
		Message { role: role.to_string(), content: Some(content.to_string()) }
	}
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy)]
pub struct SamplingOptions {
	pub max_tokens: u32,
	pub temperature: f64,
	pub top_p: f64,
	pub frequency_penalty: f64,
	pub presence_penalty: f64,
}

impl Default for SamplingOptions {
	fn default() -> Self {
		SamplingOptions {
			max_tokens: 2048,
			temperature: 1.0,
			top_p: 1.0,
			frequency_penalty: 0.0,
			presence_penalty: 0.0,
		}
	}
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub struct Chat {
	pub model: String,
	pub messages: Vec<Message>,
	max_tokens: u32,
	temperature: f64,
	frequency_penalty: f64,
	presence_penalty: f64,
	top_p: f64,
	stop: Option<Vec<String>>,
}

impl Chat {
	pub fn new(model: &str, system: &str, prompt: &str, sampling: &SamplingOptions) -> Self {
		Chat {
			model: model.to_string(),
			messages: vec![
				Message::normal("system", system),
				Message::normal("user", prompt),
			],
			max_tokens: sampling.max_tokens,
			temperature: sampling.temperature,
			frequency_penalty: sampling.frequency_penalty,
			presence_penalty: sampling.presence_penalty,
			top_p: sampling.top_p,
			stop: None,
		}
	}
}

/// Extract the first choice's message text from a chat completion body.
/// A present-but-null content deserializes to the empty string.
pub fn parse_content(body: &str) -> Result<String, ApiError> {
	let mut json: serde_json::Value = serde_json::from_str(body)?;
	let message = json
		.get_mut("choices").ok_or(ApiError::MalformedResponse("no choices in the return object"))?
		.get_mut(0).ok_or(ApiError::MalformedResponse("no element 0 in the choices object"))?
		.get_mut("message").ok_or(ApiError::MalformedResponse("no message in the choices element 0"))?
		.take();
	let message: Message = serde_json::from_value(message)?;
	Ok(message.content.unwrap_or_default())
}

/// The single suspension point of the whole program. Implemented over HTTP
/// for real runs and substituted with a stub in tests.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
	async fn complete(&self, chat: &Chat) -> Result<String, ApiError>;
}

pub struct HttpChatClient {
	post_url: Url,
	api_key: String,
	client: reqwest::Client,
}

impl HttpChatClient {
	pub fn new(api_base: &str, api_key: &str) -> Result<Self, ApiError> {
		let post_url = Url::parse(&format!("{}/chat/completions", api_base.trim_end_matches('/')))?;
		Ok(HttpChatClient {
			post_url,
			api_key: api_key.to_string(),
			client: reqwest::Client::new(),
		})
	}
}

impl ChatBackend for HttpChatClient {
	async fn complete(&self, chat: &Chat) -> Result<String, ApiError> {
		let serialised = serde_json::to_string(chat)?;
		let resp = self.client
			.post(self.post_url.clone())
			.bearer_auth(&self.api_key)
			.header(CONTENT_TYPE, "application/json")
			.body(serialised)
			.send()
			.await?;
		let status = resp.status();
		let body = resp.text().await?;
		if !status.is_success() {
			return Err(ApiError::Status { status: status.as_u16(), body });
		}
		parse_content(&body)
	}
}

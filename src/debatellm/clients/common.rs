use crate::client_wrapper::{Message, Role, TokenUsage};
use lazy_static::lazy_static;
use openai_rust::chat;
use openai_rust2 as openai_rust;
use std::error::Error;
use std::time::Duration;
use tokio::sync::Mutex;

lazy_static! {
    /// Process-wide HTTP client so every provider reuses pooled keep-alive connections.
    static ref SHARED_HTTP_CLIENT: reqwest::Client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_else(|err| {
            log::error!(
                "debatellm::clients::common: falling back to a default HTTP client: {}",
                err
            );
            reqwest::Client::new()
        });
}

/// Returns the shared pooled HTTP client.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &SHARED_HTTP_CLIENT
}

/// Convert our messages into the wire format expected by openai_rust.
pub fn to_chat_messages(messages: &[Message]) -> Vec<chat::Message> {
    let mut formatted = Vec::with_capacity(messages.len());
    for msg in messages {
        formatted.push(chat::Message {
            role: match msg.role {
                Role::System => "system".to_owned(),
                Role::User => "user".to_owned(),
                Role::Assistant => "assistant".to_owned(),
            },
            content: msg.content.to_string(),
        });
    }
    formatted
}

/// Send a chat request, record its usage, and return the assistant’s content.
pub async fn send_and_track(
    api: &openai_rust::Client,
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    temperature: Option<f32>,
    url_path: Option<String>,
    usage_slot: &Mutex<Option<TokenUsage>>,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut chat_arguments = chat::ChatArguments::new(model, formatted_msgs);
    chat_arguments.temperature = temperature;

    match api.create_chat(chat_arguments, url_path).await {
        Ok(response) => {
            let usage = TokenUsage {
                input_tokens: response.usage.prompt_tokens as usize,
                output_tokens: response.usage.completion_tokens as usize,
                total_tokens: response.usage.total_tokens as usize,
            };

            // Store it for get_last_usage()
            *usage_slot.lock().await = Some(usage);

            match response.choices.first() {
                Some(choice) => Ok(choice.message.content.clone()),
                None => Err("Chat completion returned no choices".into()),
            }
        }
        Err(err) => {
            log::error!(
                "debatellm::clients::common::send_and_track(...): API Error: {}",
                err
            );
            Err(format!("Chat completion request failed: {}", err).into())
        }
    }
}

//! A terminal chat assistant backed by an OpenAI-compatible model.

#[macro_use]
extern crate tracing;

mod markdown;
mod terminal;

use std::env;
use std::process::ExitCode;

use chat_assistant::SessionBuilder;
use chat_assistant::core::assistant::DEFAULT_MODEL;
use chat_assistant::tools::KnowledgeBase;
use chat_assistant_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use owo_colors::OwoColorize;

use terminal::TerminalInterface;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return ExitCode::FAILURE;
    };
    let mut config_builder = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    let model =
        env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());

    let knowledge_base = match env::var_os("CHAT_ASSISTANT_KNOWLEDGE_BASE") {
        Some(path) => match KnowledgeBase::load(&path) {
            Ok(knowledge_base) => knowledge_base,
            Err(err) => {
                eprintln!(
                    "failed to load knowledge base {}: {err}",
                    path.to_string_lossy()
                );
                return ExitCode::FAILURE;
            }
        },
        None => KnowledgeBase::new(),
    };

    let config = config_builder.build();
    debug!("using {config:?} with model `{model}`");
    let model_provider = OpenAIProvider::new(config);

    let session = SessionBuilder::with_model_provider(model_provider)
        .with_model(model)
        .with_developer_prompt(include_str!("./developer_prompt.md").trim())
        .with_knowledge_base(knowledge_base)
        .build();

    let mut interface = TerminalInterface::new();
    match session.run(&mut interface).await {
        Ok(conversation) => {
            info!("chat finished with {} items", conversation.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("chat failed: {err:?}");
            eprintln!("{} {err}", "error:".bright_red().bold());
            ExitCode::FAILURE
        }
    }
}

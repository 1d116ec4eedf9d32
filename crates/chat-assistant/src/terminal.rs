use std::io::Write as _;
use std::time::Duration;

use chat_assistant::core::ChatInterface;
use chat_assistant_model::{OutputEntry, OutputKind};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, BufReader, Stdin};

const BAR_CHAR: &str = "▎";

/// Chat front end on stdin and stdout.
pub struct TerminalInterface {
    stdin: BufReader<Stdin>,
    progress_style: ProgressStyle,
    progress_bar: Option<ProgressBar>,
}

impl TerminalInterface {
    pub fn new() -> Self {
        let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        Self {
            stdin: BufReader::new(io::stdin()),
            progress_style,
            progress_bar: None,
        }
    }
}

impl ChatInterface for TerminalInterface {
    async fn read_input(&mut self) -> Option<String> {
        print!("{} ", "User:".bright_green().bold());
        std::io::stdout().flush().ok();

        let mut line = String::new();
        match self.stdin.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(err) => {
                error!("error reading input: {err}");
                None
            }
        }
    }

    fn render_message(&mut self, markdown: &str) {
        println!("{}🤖 {}", BAR_CHAR.bright_cyan(), "Assistant:".bold());
        for line in crate::markdown::render(markdown) {
            println!("{}{line}", BAR_CHAR.bright_cyan());
        }
        println!();
    }

    fn render_tool_call(
        &mut self,
        entry: &OutputEntry,
        tool_name: &str,
        arguments_preview: &str,
        output: &str,
    ) {
        let bar = BAR_CHAR.bright_yellow();
        let call_id = match &entry.kind {
            OutputKind::FunctionCall(call) => call.call_id.as_str(),
            _ => entry.opaque.id(),
        };
        println!(
            "{bar}🔧 {}({arguments_preview}) {}",
            tool_name.bright_white().bold(),
            call_id.dimmed()
        );
        if let Some(raw) = entry.opaque.to_raw::<Value>() {
            println!("{bar}{} {}", "call:".dimmed(), raw.dimmed());
        }
        println!("{bar}{} {}", "output:".dimmed(), output.dimmed());
        println!();
    }

    fn notify(&mut self, text: &str) {
        println!("{}", text.bright_yellow());
    }

    fn model_request_started(&mut self) {
        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(self.progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));
        self.progress_bar = Some(progress_bar);
    }

    fn model_request_finished(&mut self) {
        // Finish the progress bar before printing anything else.
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

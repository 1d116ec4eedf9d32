use std::mem;

use owo_colors::{OwoColorize, Style};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

const QUOTE_PREFIX: &str = "│ ";
const CODE_INDENT: &str = "  ";

/// Renders markdown into styled lines for the terminal.
///
/// Blocks are separated by an empty line. Raw HTML is dropped.
pub fn render(markdown: &str) -> Vec<String> {
    let mut renderer = Renderer::default();
    for event in Parser::new(markdown) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<String>,
    line: String,
    heading: bool,
    strong: usize,
    emphasis: usize,
    code_block: bool,
    quote_depth: usize,
    // One counter per open list, `None` for bullet lists.
    lists: Vec<Option<u64>>,
    links: Vec<String>,
}

impl Renderer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.code_block => {
                for line in text.lines() {
                    self.begin_line();
                    self.line.push_str(CODE_INDENT);
                    self.push_styled(line, Style::new().bright_yellow());
                    self.flush_line();
                }
            }
            Event::Text(text) => {
                let style = self.text_style();
                self.push_styled(&text, style);
            }
            Event::Code(code) => {
                self.push_styled(&code, Style::new().bright_yellow())
            }
            Event::SoftBreak => self.line.push(' '),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push("─".repeat(40).dimmed().to_string());
                self.blank_line();
            }
            Event::TaskListMarker(done) => {
                self.line.push_str(if done { "[x] " } else { "[ ] " })
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.flush_line();
                self.heading = true;
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.code_block = true;
            }
            Tag::BlockQuote(..) => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                self.begin_line();
                let depth = self.lists.len().saturating_sub(1);
                let indent = CODE_INDENT.repeat(depth);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_owned(),
                };
                self.line.push_str(&indent);
                self.line.push_str(&marker.bright_cyan().to_string());
            }
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.into_string())
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.heading = false;
                self.flush_line();
                self.blank_line();
            }
            TagEnd::Paragraph => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::CodeBlock => {
                self.code_block = false;
                self.blank_line();
            }
            TagEnd::BlockQuote(..) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Link => {
                if let Some(dest_url) = self.links.pop() {
                    let dest_url = format!(" ({dest_url})");
                    self.push_styled(&dest_url, Style::new().dimmed());
                }
            }
            _ => {}
        }
    }

    fn text_style(&self) -> Style {
        let mut style = if self.heading {
            Style::new().bright_cyan().bold()
        } else {
            Style::new().bright_white()
        };
        if self.strong > 0 {
            style = style.bold();
        }
        if self.emphasis > 0 {
            style = style.italic();
        }
        if !self.links.is_empty() {
            style = style.underline();
        }
        style
    }

    fn begin_line(&mut self) {
        if self.line.is_empty() && self.quote_depth > 0 {
            let prefix = QUOTE_PREFIX.repeat(self.quote_depth);
            self.line.push_str(&prefix.dimmed().to_string());
        }
    }

    fn push_styled(&mut self, text: &str, style: Style) {
        self.begin_line();
        self.line.push_str(&text.style(style).to_string());
    }

    fn flush_line(&mut self) {
        if !self.line.is_empty() {
            self.lines.push(mem::take(&mut self.line));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush_line();
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines
    }
}

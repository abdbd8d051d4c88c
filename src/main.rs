// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use vera_config::Config;
use vera_render::tree::{Block, Inline};
use vera_render::{
    parse_json_literal, render, Document, PipelineConfig, SegmentKind,
};
use vera_tui::{App, AppOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Completions need no config.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let mut config = vera_config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.base_url {
        config.backend.base_url = url.clone();
    }

    init_logging(cli.verbose, &config)?;

    match cli.command {
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::ShowConfig) => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Commands::Ask { query, reasoning, raw }) => {
            ask_cmd(&config, &query, reasoning, raw).await
        }
        Some(Commands::Render { file }) => {
            let text = if file.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("reading stdin")?;
                buf
            } else {
                std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?
            };
            print!("{}", render_plain(&text, &config, true));
            Ok(())
        }
        None => run_tui(cli.question, config).await,
    }
}

/// One-shot headless query: send, render, print.
async fn ask_cmd(config: &Config, query: &str, reasoning: bool, raw: bool) -> anyhow::Result<()> {
    let backend = vera_model::from_config(&config.backend)?;
    let response = backend
        .ask(query)
        .await
        .with_context(|| format!("asking {}", config.backend.base_url))?;
    if raw {
        println!("{response}");
    } else {
        print!("{}", render_plain(&response, config, reasoning));
    }
    Ok(())
}

async fn run_tui(question: Option<String>, config: Config) -> anyhow::Result<()> {
    use ratatui::crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
    };

    let terminal = ratatui::init();
    let _ = execute!(std::io::stderr(), EnableMouseCapture);

    let opts = AppOptions { initial_prompt: question };
    let app = App::new(Arc::new(config), opts);
    let result = app.run(terminal).await;

    let _ = execute!(std::io::stderr(), DisableMouseCapture);
    ratatui::restore();

    result
}

// ── Plain-text rendering (ask / render subcommands) ───────────────────────────

/// Run the full pipeline on a response and flatten the result to plain text.
fn render_plain(text: &str, config: &Config, reasoning: bool) -> String {
    let pipeline = PipelineConfig { allow_unsafe_html: config.render.allow_unsafe_html };
    let mut out = String::new();
    for segment in vera_render::split_reasoning(text) {
        match segment.kind {
            SegmentKind::Reasoning => {
                if reasoning {
                    out.push_str("── 思考过程 ──\n");
                    out.push_str(segment.text.trim());
                    out.push_str("\n──\n\n");
                }
            }
            SegmentKind::Answer => {
                if segment.text.trim().is_empty() {
                    continue;
                }
                if let Some(value) = parse_json_literal(&segment.text) {
                    let pretty = serde_json::to_string_pretty(&value)
                        .unwrap_or_else(|_| value.to_string());
                    out.push_str(&pretty);
                    out.push('\n');
                } else {
                    let doc = render(&segment.text, &pipeline);
                    out.push_str(&document_plain(&doc));
                }
            }
        }
    }
    out
}

fn document_plain(doc: &Document) -> String {
    let mut out = String::new();
    blocks_plain(&doc.blocks, "", &mut out);
    out
}

fn blocks_plain(blocks: &[Block], indent: &str, out: &mut String) {
    for block in blocks {
        match block {
            Block::Paragraph(inlines) => {
                out.push_str(indent);
                out.push_str(&inlines_plain(inlines));
                out.push_str("\n\n");
            }
            Block::Heading(h) => {
                out.push_str(indent);
                out.push_str(&"#".repeat(h.level as usize));
                out.push(' ');
                out.push_str(&inlines_plain(&h.content));
                out.push_str("\n\n");
            }
            Block::CodeBlock(code) => {
                let lang = code.lang.as_deref().unwrap_or("");
                out.push_str(&format!("{indent}```{lang}\n"));
                for line in code.source.lines() {
                    out.push_str(&format!("{indent}{line}\n"));
                }
                out.push_str(&format!("{indent}```\n\n"));
            }
            Block::BlockQuote(children) => {
                let deeper = format!("{indent}> ");
                blocks_plain(children, &deeper, out);
            }
            Block::List(list) => {
                for (i, item) in list.items.iter().enumerate() {
                    let marker = match list.start {
                        Some(start) => format!("{}. ", start + i as u64),
                        None => "- ".to_string(),
                    };
                    let mut body = String::new();
                    blocks_plain(item, "", &mut body);
                    out.push_str(indent);
                    out.push_str(&marker);
                    out.push_str(body.trim_end());
                    out.push('\n');
                }
                out.push('\n');
            }
            Block::Table(table) => {
                let row_plain = |row: &[Vec<Inline>]| {
                    row.iter()
                        .map(|cell| inlines_plain(cell))
                        .collect::<Vec<_>>()
                        .join(" | ")
                };
                out.push_str(&format!("{indent}{}\n", row_plain(&table.header)));
                for row in &table.rows {
                    out.push_str(&format!("{indent}{}\n", row_plain(row)));
                }
                out.push('\n');
            }
            Block::MathBlock(span) => {
                let text = span
                    .typeset
                    .clone()
                    .unwrap_or_else(|| span.source.trim().to_string());
                out.push_str(&format!("{indent}{text}\n\n"));
            }
            Block::Markup(frag) => {
                out.push_str(&format!("{indent}{}\n\n", frag.raw.trim()));
            }
            Block::Admonition(adm) => {
                out.push_str(&format!("{indent}[{}]\n", adm.kind.label().to_uppercase()));
                blocks_plain(&adm.blocks, indent, out);
            }
            Block::FrontMatter(meta) => {
                out.push_str(&format!("{indent}{}\n\n", meta.trim()));
            }
            Block::Diagram(diagram) => {
                for edge in &diagram.edges {
                    match &edge.label {
                        Some(l) => out.push_str(&format!(
                            "{indent}{} --{l}--> {}\n",
                            edge.from, edge.to
                        )),
                        None => out.push_str(&format!("{indent}{} --> {}\n", edge.from, edge.to)),
                    }
                }
                out.push('\n');
            }
            Block::Rule => {
                out.push_str(&format!("{indent}---\n\n"));
            }
        }
    }
}

fn inlines_plain(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(t),
            Inline::Code(t) => out.push_str(&format!("`{t}`")),
            Inline::Emph(c) | Inline::Strong(c) | Inline::Strike(c) => {
                out.push_str(&inlines_plain(c))
            }
            Inline::Link { url, content } => {
                let text = inlines_plain(content);
                if text == *url {
                    out.push_str(url);
                } else {
                    out.push_str(&format!("{text} ({url})"));
                }
            }
            Inline::Image { url, alt } => out.push_str(&format!("[{alt}] ({url})")),
            Inline::Math(span) => match &span.typeset {
                Some(t) => out.push_str(t),
                None => out.push_str(&format!("${}$", span.source)),
            },
            Inline::Markup(frag) => {
                for token in &frag.tokens {
                    if let vera_render::tree::MarkupToken::Text(t) = token {
                        out.push_str(t);
                    }
                }
            }
            Inline::TaskMarker(done) => out.push_str(if *done { "[x] " } else { "[ ] " }),
            Inline::HardBreak => out.push('\n'),
        }
    }
    out
}

fn init_logging(verbosity: u8, config: &Config) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => config.log.filter.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("VERA_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    // The TUI owns the terminal, so logs go to a file when one is configured
    // and to stderr otherwise.
    match &config.log.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {path}"))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_ansi(false).with_writer(file))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }
    Ok(())
}

// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vera",
    about = "A terminal chat client for Physics-LLM",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional initial question, submitted as soon as the TUI opens
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. "http://localhost:8080" (overrides config)
    #[arg(long, short = 'u', env = "VERA_BASE_URL")]
    pub base_url: Option<String>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Send one question to the backend and print the rendered answer.
    ///
    /// The answer goes through the same segmentation and render pipeline as
    /// the TUI; reasoning regions are skipped unless --reasoning is given.
    Ask {
        /// The question to send
        query: String,
        /// Also print reasoning (<think>) regions
        #[arg(long)]
        reasoning: bool,
        /// Print the raw backend response without rendering
        #[arg(long)]
        raw: bool,
    },
    /// Render a markdown file (or stdin with "-") through the pipeline and
    /// print the result as plain text.  Useful for checking how a response
    /// would display.
    Render {
        /// Path to the file, or "-" for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "vera", &mut std::io::stdout());
}

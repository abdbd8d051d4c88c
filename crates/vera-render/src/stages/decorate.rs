// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Stage 5: decoration.  Adds the presentation extras to an already-correct
//! tree: syntax colouring for fenced code, stable heading slugs, flattened
//! math, flowchart extraction, and the copy indices on code blocks.
//!
//! Every decoration is optional by construction — a failure leaves the
//! undecorated node in place and the view falls back to the literal source.

use std::collections::HashMap;
use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use tracing::debug;

use crate::decorator;
use crate::pipeline::{PipelineConfig, Stage};
use crate::stages::tex;
use crate::tree::{self, Block, CodeLine, CodeSpan, Diagram, DiagramEdge, Document, Inline};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

pub struct DecorateStage;

impl Stage for DecorateStage {
    fn name(&self) -> &'static str {
        "decorate"
    }

    fn apply(&self, mut doc: Document, _cfg: &PipelineConfig) -> Document {
        tree::for_each_block_mut(&mut doc, &mut |block| {
            if let Block::CodeBlock(code) = block {
                if code.lang.as_deref() == Some("mermaid") {
                    match parse_flowchart(&code.source) {
                        Some(edges) => {
                            *block = Block::Diagram(Diagram {
                                source: code.source.clone(),
                                edges,
                            });
                            return;
                        }
                        None => debug!("diagram source not a flowchart, keeping code block"),
                    }
                }
                code.highlighted = highlight(code.lang.as_deref(), &code.source);
            }
        });

        assign_heading_slugs(&mut doc);
        typeset_math(&mut doc);
        decorator::decorate(&mut doc);
        doc
    }
}

// ── Syntax colouring ──────────────────────────────────────────────────────────

fn highlight(lang: Option<&str>, source: &str) -> Option<Vec<CodeLine>> {
    let syntax = lang
        .and_then(|l| SYNTAX_SET.find_syntax_by_token(l))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let theme = THEME_SET.themes.get(THEME)?;
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut lines = Vec::new();
    for line in source.lines() {
        let ranges = highlighter.highlight_line(line, &SYNTAX_SET).ok()?;
        lines.push(
            ranges
                .into_iter()
                .map(|(style, text)| CodeSpan {
                    text: text.to_string(),
                    color: Some((
                        style.foreground.r,
                        style.foreground.g,
                        style.foreground.b,
                    )),
                })
                .collect(),
        );
    }
    Some(lines)
}

// ── Heading slugs ─────────────────────────────────────────────────────────────

fn slugify(text: &str) -> String {
    let mut out = String::new();
    for c in text.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if matches!(c, ' ' | '-' | '_') {
            out.push('-');
        }
    }
    out
}

/// Assign GitHub-style slugs in document order; repeats get a `-n` suffix.
fn assign_heading_slugs(doc: &mut Document) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    tree::for_each_block_mut(doc, &mut |block| {
        if let Block::Heading(heading) = block {
            let base = slugify(&tree::inline_text(&heading.content));
            let count = seen.entry(base.clone()).or_insert(0);
            heading.id = Some(if *count == 0 {
                base.clone()
            } else {
                format!("{base}-{count}")
            });
            *count += 1;
        }
    });
}

// ── Math flattening ───────────────────────────────────────────────────────────

fn typeset_math(doc: &mut Document) {
    tree::for_each_block_mut(doc, &mut |block| {
        if let Block::MathBlock(span) = block {
            span.typeset = tex::typeset(span.source.trim(), span.display);
        }
    });
    tree::for_each_inline_run_mut(doc, &mut |run| {
        for inline in run {
            if let Inline::Math(span) = inline {
                span.typeset = tex::typeset(span.source.trim(), span.display);
            }
        }
    });
}

// ── Flowchart extraction ──────────────────────────────────────────────────────

/// Parse a mermaid-style flowchart edge list.  Only `graph`/`flowchart`
/// headers with plain `A --> B` chains (optional `|label|` and `[text]`
/// node labels) are recognized; anything richer stays a code block.
fn parse_flowchart(source: &str) -> Option<Vec<DiagramEdge>> {
    let mut lines = source.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next()?;
    if !matches!(
        header.split_whitespace().next()?,
        "graph" | "flowchart"
    ) {
        return None;
    }

    let mut labels: HashMap<String, String> = HashMap::new();
    let mut edges: Vec<(String, String, Option<String>)> = Vec::new();

    for line in lines {
        let parts: Vec<&str> = line.split("-->").collect();
        if parts.len() == 1 {
            // Bare node declaration.
            parse_node(line, &mut labels)?;
            continue;
        }
        let mut prev = parse_node(parts[0].trim(), &mut labels)?;
        for part in &parts[1..] {
            let mut part = part.trim();
            let mut label = None;
            if let Some(rest) = part.strip_prefix('|') {
                let (lab, tail) = rest.split_once('|')?;
                label = Some(lab.trim().to_string());
                part = tail.trim();
            }
            let node = parse_node(part, &mut labels)?;
            edges.push((prev, node.clone(), label));
            prev = node;
        }
    }

    if edges.is_empty() {
        return None;
    }
    let display = |id: &String| labels.get(id).unwrap_or(id).clone();
    Some(
        edges
            .iter()
            .map(|(from, to, label)| DiagramEdge {
                from: display(from),
                to: display(to),
                label: label.clone(),
            })
            .collect(),
    )
}

/// `A`, `A[Some label]` or `A(Some label)`; registers the label and returns
/// the node id.
fn parse_node(token: &str, labels: &mut HashMap<String, String>) -> Option<String> {
    let id: String = token
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if id.is_empty() {
        return None;
    }
    let rest = &token[id.len()..];
    if rest.is_empty() {
        return Some(id);
    }
    let label = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .or_else(|| rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')))?;
    labels.insert(id.clone(), label.trim_matches('"').trim().to_string());
    Some(id)
}

// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The presentation tree: block and inline nodes produced by the render
//! pipeline and consumed by the terminal view.
//!
//! A fresh tree is produced per render call and never persisted.  Stages
//! transform the tree in place via the [`for_each_block_mut`] /
//! [`for_each_inline_run_mut`] walkers at the bottom of this module.

/// Root of a rendered segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading(Heading),
    CodeBlock(CodeBlock),
    BlockQuote(Vec<Block>),
    List(List),
    Table(Table),
    /// Display math (`$$…$$` standing alone).
    MathBlock(MathSpan),
    /// A raw markup fragment spliced into the tree (block position).
    Markup(MarkupFragment),
    /// Colon-fenced admonition (`:::note … :::`).
    Admonition(Admonition),
    /// Leading YAML front matter, carried verbatim.
    FrontMatter(String),
    /// A fenced diagram that parsed as a flowchart edge list.
    Diagram(Diagram),
    Rule,
}

/// Inline node inside a paragraph, heading, table cell, etc.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emph(Vec<Inline>),
    Strong(Vec<Inline>),
    Strike(Vec<Inline>),
    Link { url: String, content: Vec<Inline> },
    Image { url: String, alt: String },
    Math(MathSpan),
    /// A raw markup fragment spliced into the tree (inline position).
    Markup(MarkupFragment),
    /// GFM task-list checkbox.
    TaskMarker(bool),
    HardBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    /// Stable slug assigned by the decoration stage; doubles as the
    /// self-link target.
    pub id: Option<String>,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub lang: Option<String>,
    /// The literal fence contents.  Never touched by decoration — this is
    /// what the copy affordance hands to the clipboard.
    pub source: String,
    /// Syntax-coloured lines added by the decoration stage.
    pub highlighted: Option<Vec<CodeLine>>,
    /// 1-based copy-affordance index assigned by the code-block decorator.
    pub copy_index: Option<usize>,
}

/// One syntax-coloured source line.
pub type CodeLine = Vec<CodeSpan>;

#[derive(Debug, Clone, PartialEq)]
pub struct CodeSpan {
    pub text: String,
    /// Foreground colour as RGB; `None` renders in the default style.
    pub color: Option<(u8, u8, u8)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// `Some(n)` for an ordered list starting at `n`.
    pub start: Option<u64>,
    pub items: Vec<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

/// A math span carrying its raw TeX source.  `typeset` is filled by the
/// decoration stage; `None` means the view shows the source literally.
#[derive(Debug, Clone, PartialEq)]
pub struct MathSpan {
    pub source: String,
    pub display: bool,
    pub typeset: Option<String>,
}

impl MathSpan {
    pub fn new(source: impl Into<String>, display: bool) -> Self {
        Self { source: source.into(), display, typeset: None }
    }
}

/// Raw markup as found in the source plus the token stream produced by the
/// raw-markup splice stage (and filtered by the safety stage).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupFragment {
    pub raw: String,
    pub tokens: Vec<MarkupToken>,
}

impl MarkupFragment {
    pub fn raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into(), tokens: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupToken {
    Tag(MarkupTag),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupTag {
    /// Lowercased element name.
    pub name: String,
    /// Lowercased attribute names with optional values.
    pub attrs: Vec<(String, Option<String>)>,
    pub closing: bool,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Admonition {
    pub kind: AdmonitionKind,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdmonitionKind {
    Note,
    Tip,
    Warning,
    Caution,
    Important,
    /// Unknown kinds keep their literal label.
    Other(String),
}

impl AdmonitionKind {
    pub fn parse(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "note" => Self::Note,
            "tip" => Self::Tip,
            "warning" => Self::Warning,
            "caution" => Self::Caution,
            "important" => Self::Important,
            _ => Self::Other(kind.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Caution => "caution",
            Self::Important => "important",
            Self::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub source: String,
    pub edges: Vec<DiagramEdge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

// ── Walkers ───────────────────────────────────────────────────────────────────

/// Visit every block in the document, pre-order, recursing into quotes,
/// list items and admonitions.
pub fn for_each_block_mut(doc: &mut Document, f: &mut impl FnMut(&mut Block)) {
    for block in &mut doc.blocks {
        walk_block(block, f);
    }
}

fn walk_block(block: &mut Block, f: &mut impl FnMut(&mut Block)) {
    f(block);
    match block {
        Block::BlockQuote(children) => {
            for b in children {
                walk_block(b, f);
            }
        }
        Block::List(list) => {
            for item in &mut list.items {
                for b in item {
                    walk_block(b, f);
                }
            }
        }
        Block::Admonition(adm) => {
            for b in &mut adm.blocks {
                walk_block(b, f);
            }
        }
        _ => {}
    }
}

/// Visit every inline run (paragraph content, heading content, table cells)
/// anywhere in the document.
pub fn for_each_inline_run_mut(doc: &mut Document, f: &mut impl FnMut(&mut Vec<Inline>)) {
    for_each_block_mut(doc, &mut |block| match block {
        Block::Paragraph(inlines) => f(inlines),
        Block::Heading(h) => f(&mut h.content),
        Block::Table(t) => {
            for cell in &mut t.header {
                f(cell);
            }
            for row in &mut t.rows {
                for cell in row {
                    f(cell);
                }
            }
        }
        _ => {}
    });
}

/// Concatenate the plain text of an inline run (used for heading slugs and
/// image alt text).
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(inlines, &mut out);
    out
}

fn collect_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Code(t) => out.push_str(t),
            Inline::Emph(c) | Inline::Strong(c) | Inline::Strike(c)
            | Inline::Link { content: c, .. } => collect_text(c, out),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::Math(m) => out.push_str(&m.source),
            Inline::Markup(_) | Inline::TaskMarker(_) => {}
            Inline::HardBreak => out.push(' '),
        }
    }
}

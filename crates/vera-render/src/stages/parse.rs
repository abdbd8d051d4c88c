// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Stage 1: structural parse.  Markdown text in, presentation tree out.
//!
//! The markdown dialect is GFM-flavoured: tables, strikethrough, task lists
//! and leading YAML front matter, plus three conveniences the later stages
//! rely on: colon-fenced admonitions (`:::note … :::`), `:emoji:` shorthand
//! expansion, and bare-URL autolinking.  Soft line breaks are promoted to
//! hard breaks so single newlines survive into the rendered output.
//!
//! Raw HTML is never interpreted here — block and inline HTML are carried
//! verbatim as [`MarkupFragment`]s for the splice and safety stages.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::tree::{
    Admonition, AdmonitionKind, Block, CodeBlock, Document, Heading, Inline, List,
    MarkupFragment, Table,
};

/// Parse one segment of markdown into a presentation tree.
pub fn parse_document(text: &str) -> Document {
    let mut blocks = Vec::new();
    for chunk in split_directives(text) {
        match chunk {
            Chunk::Plain(s) => blocks.extend(parse_markdown(&s)),
            Chunk::Directive { kind, body } => blocks.push(Block::Admonition(Admonition {
                kind: AdmonitionKind::parse(&kind),
                blocks: parse_markdown(&body),
            })),
        }
    }
    Document { blocks }
}

// ── Directive pre-split ───────────────────────────────────────────────────────

enum Chunk {
    Plain(String),
    Directive { kind: String, body: String },
}

fn is_code_fence(trimmed: &str) -> bool {
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Split the text around complete `:::kind … :::` fences, leaving everything
/// else (including an unclosed opener) to the markdown parser verbatim.
/// Fence tracking keeps `:::` lines inside code blocks literal.
fn split_directives(text: &str) -> Vec<Chunk> {
    let lines: Vec<&str> = text.lines().collect();
    let mut chunks = Vec::new();
    let mut plain: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();
        if is_code_fence(trimmed) {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some(kind) = directive_kind(trimmed) {
                if let Some(close) = find_directive_close(&lines, i + 1) {
                    if !plain.is_empty() {
                        chunks.push(Chunk::Plain(plain.join("\n")));
                        plain.clear();
                    }
                    chunks.push(Chunk::Directive {
                        kind,
                        body: lines[i + 1..close].join("\n"),
                    });
                    i = close + 1;
                    continue;
                }
            }
        }
        plain.push(line);
        i += 1;
    }

    if !plain.is_empty() {
        chunks.push(Chunk::Plain(plain.join("\n")));
    }
    chunks
}

fn directive_kind(trimmed: &str) -> Option<String> {
    let rest = trimmed.strip_prefix(":::")?;
    let kind: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if kind.is_empty() {
        return None;
    }
    Some(kind)
}

fn find_directive_close(lines: &[&str], from: usize) -> Option<usize> {
    let mut in_fence = false;
    for (j, line) in lines.iter().enumerate().skip(from) {
        let trimmed = line.trim();
        if is_code_fence(trimmed) {
            in_fence = !in_fence;
        } else if !in_fence && trimmed == ":::" {
            return Some(j);
        }
    }
    None
}

// ── Markdown event loop ───────────────────────────────────────────────────────

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

fn parse_markdown(text: &str) -> Vec<Block> {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(text, parser_options()) {
        builder.event(event);
    }
    builder.finish()
}

/// One open inline construct.  The bottom frame is always a `Run`; `implicit`
/// runs are opened for loose inlines in tight list items and flushed as
/// paragraphs when the enclosing container closes.
enum Frame {
    Run { implicit: bool, inlines: Vec<Inline> },
    Emph(Vec<Inline>),
    Strong(Vec<Inline>),
    Strike(Vec<Inline>),
    Link { url: String, content: Vec<Inline> },
    Image { url: String, content: Vec<Inline> },
}

struct ListBuilder {
    start: Option<u64>,
    items: Vec<Vec<Block>>,
}

#[derive(Default)]
struct TableBuilder {
    header: Vec<Vec<Inline>>,
    rows: Vec<Vec<Vec<Inline>>>,
    current: Vec<Vec<Inline>>,
}

struct CodeBuilder {
    lang: Option<String>,
    source: String,
}

struct TreeBuilder {
    /// Block sinks; one per open container, the bottom is the document.
    sinks: Vec<Vec<Block>>,
    lists: Vec<ListBuilder>,
    frames: Vec<Frame>,
    table: Option<TableBuilder>,
    code: Option<CodeBuilder>,
    html: Option<String>,
    meta: Option<String>,
    heading_levels: Vec<u8>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            sinks: vec![Vec::new()],
            lists: Vec::new(),
            frames: Vec::new(),
            table: None,
            code: None,
            html: None,
            meta: None,
            heading_levels: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_implicit_run();
        // Containers left open by truncated input collapse outward.
        while self.sinks.len() > 1 {
            let children = self.pop_sink();
            self.push_block(Block::BlockQuote(children));
        }
        self.sinks.pop().unwrap_or_default()
    }

    fn push_block(&mut self, block: Block) {
        if let Some(sink) = self.sinks.last_mut() {
            sink.push(block);
        }
    }

    fn pop_sink(&mut self) -> Vec<Block> {
        self.sinks.pop().unwrap_or_default()
    }

    fn push_inline(&mut self, inline: Inline) {
        if self.frames.is_empty() {
            self.frames.push(Frame::Run { implicit: true, inlines: Vec::new() });
        }
        let inlines = match self.frames.last_mut() {
            Some(
                Frame::Run { inlines, .. }
                | Frame::Emph(inlines)
                | Frame::Strong(inlines)
                | Frame::Strike(inlines)
                | Frame::Link { content: inlines, .. }
                | Frame::Image { content: inlines, .. },
            ) => inlines,
            None => return,
        };
        inlines.push(inline);
    }

    /// Close the current run and hand its inlines back.
    fn pop_run(&mut self) -> Vec<Inline> {
        match self.frames.pop() {
            Some(Frame::Run { inlines, .. }) => inlines,
            // Unbalanced formatting frame; keep the content, drop the style.
            Some(
                Frame::Emph(inlines)
                | Frame::Strong(inlines)
                | Frame::Strike(inlines)
                | Frame::Link { content: inlines, .. }
                | Frame::Image { content: inlines, .. },
            ) => inlines,
            None => Vec::new(),
        }
    }

    fn pop_styled(&mut self, wrap: fn(Vec<Inline>) -> Inline) {
        let inline = wrap(self.pop_run());
        self.push_inline(inline);
    }

    /// Flush a pending implicit run as a paragraph (tight list items carry
    /// their text without paragraph events).
    fn flush_implicit_run(&mut self) {
        if matches!(self.frames.last(), Some(Frame::Run { implicit: true, .. })) {
            let inlines = self.pop_run();
            if !inlines.is_empty() {
                self.push_block(Block::Paragraph(inlines));
            }
        }
    }

    fn in_link_context(&self) -> bool {
        self.frames
            .iter()
            .any(|f| matches!(f, Frame::Link { .. } | Frame::Image { .. }))
    }

    fn push_text(&mut self, text: &str) {
        let expanded = expand_emoji(text);
        if self.in_link_context() {
            self.push_inline(Inline::Text(expanded));
            return;
        }
        for piece in autolink_split(&expanded) {
            match piece {
                Piece::Text(t) => self.push_inline(Inline::Text(t)),
                Piece::Url(url) => self.push_inline(Inline::Link {
                    content: vec![Inline::Text(url.clone())],
                    url,
                }),
            }
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(end) => self.end(end),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.source.push_str(&text);
                } else if let Some(meta) = self.meta.as_mut() {
                    meta.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => self.push_inline(Inline::Code(code.to_string())),
            Event::Html(html) => match self.html.as_mut() {
                Some(buf) => buf.push_str(&html),
                None => self.push_block(Block::Markup(MarkupFragment::raw(html.to_string()))),
            },
            Event::InlineHtml(html) => {
                self.push_inline(Inline::Markup(MarkupFragment::raw(html.to_string())))
            }
            // Single newlines are rendered as line breaks.
            Event::SoftBreak | Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => self.push_block(Block::Rule),
            Event::TaskListMarker(checked) => self.push_inline(Inline::TaskMarker(checked)),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::TableCell => {
                self.frames.push(Frame::Run { implicit: false, inlines: Vec::new() })
            }
            Tag::Heading { level, .. } => {
                self.heading_levels.push(heading_level(level));
                self.frames.push(Frame::Run { implicit: false, inlines: Vec::new() });
            }
            Tag::BlockQuote(_) => {
                self.flush_implicit_run();
                self.sinks.push(Vec::new());
            }
            Tag::List(start) => {
                self.flush_implicit_run();
                self.lists.push(ListBuilder { start, items: Vec::new() });
            }
            Tag::Item => self.sinks.push(Vec::new()),
            Tag::CodeBlock(kind) => {
                self.flush_implicit_run();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBuilder { lang, source: String::new() });
            }
            Tag::Table(_) => {
                self.flush_implicit_run();
                self.table = Some(TableBuilder::default());
            }
            Tag::TableHead | Tag::TableRow => {}
            Tag::Emphasis => self.frames.push(Frame::Emph(Vec::new())),
            Tag::Strong => self.frames.push(Frame::Strong(Vec::new())),
            Tag::Strikethrough => self.frames.push(Frame::Strike(Vec::new())),
            Tag::Link { dest_url, .. } => self.frames.push(Frame::Link {
                url: dest_url.to_string(),
                content: Vec::new(),
            }),
            Tag::Image { dest_url, .. } => self.frames.push(Frame::Image {
                url: dest_url.to_string(),
                content: Vec::new(),
            }),
            Tag::HtmlBlock => {
                self.flush_implicit_run();
                self.html = Some(String::new());
            }
            Tag::MetadataBlock(_) => self.meta = Some(String::new()),
            _ => {}
        }
    }

    fn end(&mut self, end: TagEnd) {
        match end {
            TagEnd::Paragraph => {
                let inlines = self.pop_run();
                self.push_block(Block::Paragraph(inlines));
            }
            TagEnd::Heading(_) => {
                let content = self.pop_run();
                let level = self.heading_levels.pop().unwrap_or(1);
                self.push_block(Block::Heading(Heading { level, id: None, content }));
            }
            TagEnd::BlockQuote(_) => {
                self.flush_implicit_run();
                let children = self.pop_sink();
                self.push_block(Block::BlockQuote(children));
            }
            TagEnd::List(_) => {
                if let Some(list) = self.lists.pop() {
                    self.push_block(Block::List(List { start: list.start, items: list.items }));
                }
            }
            TagEnd::Item => {
                self.flush_implicit_run();
                let item = self.pop_sink();
                if let Some(list) = self.lists.last_mut() {
                    list.items.push(item);
                }
            }
            TagEnd::CodeBlock => {
                if let Some(mut code) = self.code.take() {
                    if code.source.ends_with('\n') {
                        code.source.pop();
                    }
                    self.push_block(Block::CodeBlock(CodeBlock {
                        lang: code.lang,
                        source: code.source,
                        highlighted: None,
                        copy_index: None,
                    }));
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.push_block(Block::Table(Table {
                        header: table.header,
                        rows: table.rows,
                    }));
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.current);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current);
                    table.rows.push(row);
                }
            }
            TagEnd::TableCell => {
                let cell = self.pop_run();
                if let Some(table) = self.table.as_mut() {
                    table.current.push(cell);
                }
            }
            TagEnd::Emphasis => self.pop_styled(Inline::Emph),
            TagEnd::Strong => self.pop_styled(Inline::Strong),
            TagEnd::Strikethrough => self.pop_styled(Inline::Strike),
            TagEnd::Link => {
                if let Some(Frame::Link { url, content }) = self.frames.pop() {
                    self.push_inline(Inline::Link { url, content });
                }
            }
            TagEnd::Image => {
                if let Some(Frame::Image { url, content }) = self.frames.pop() {
                    let alt = crate::tree::inline_text(&content);
                    self.push_inline(Inline::Image { url, alt });
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(raw) = self.html.take() {
                    self.push_block(Block::Markup(MarkupFragment::raw(raw)));
                }
            }
            TagEnd::MetadataBlock(_) => {
                if let Some(meta) = self.meta.take() {
                    self.push_block(Block::FrontMatter(meta));
                }
            }
            _ => {}
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// ── Emoji shorthand ───────────────────────────────────────────────────────────

/// The shorthands models actually emit; unknown names stay literal.
const EMOJI: &[(&str, &str)] = &[
    ("+1", "👍"),
    ("-1", "👎"),
    ("bug", "🐛"),
    ("bulb", "💡"),
    ("check", "✔️"),
    ("eyes", "👀"),
    ("fire", "🔥"),
    ("heart", "❤️"),
    ("memo", "📝"),
    ("question", "❓"),
    ("rocket", "🚀"),
    ("smile", "😄"),
    ("sparkles", "✨"),
    ("star", "⭐"),
    ("tada", "🎉"),
    ("thinking", "🤔"),
    ("thumbsup", "👍"),
    ("thumbsdown", "👎"),
    ("warning", "⚠️"),
    ("white_check_mark", "✅"),
    ("x", "❌"),
    ("zap", "⚡"),
];

fn emoji(name: &str) -> Option<&'static str> {
    EMOJI.iter().find(|(n, _)| *n == name).map(|(_, g)| *g)
}

fn is_emoji_name_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'+' | b'-')
}

fn expand_emoji(text: &str) -> String {
    if !text.contains(':') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let name_end = after.find(':');
        match name_end {
            Some(end) if end > 0 && after.as_bytes()[..end].iter().all(|b| is_emoji_name_byte(*b)) => {
                if let Some(glyph) = emoji(&after[..end]) {
                    out.push_str(glyph);
                    rest = &after[end + 1..];
                } else {
                    out.push(':');
                    rest = after;
                }
            }
            _ => {
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ── Bare-URL autolink ─────────────────────────────────────────────────────────

enum Piece {
    Text(String),
    Url(String),
}

/// Trailing punctuation that should stay outside the link.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    while let Some(last) = url.chars().last() {
        if matches!(last, '.' | ',' | ';' | ':' | '!' | '?' | ')') {
            url = &url[..url.len() - last.len_utf8()];
        } else {
            break;
        }
    }
    url
}

fn autolink_split(text: &str) -> Vec<Piece> {
    let mut out = Vec::new();
    let bytes = text.as_bytes();
    let mut rest = 0usize;
    let mut i = 0usize;
    while i < text.len() {
        let at_scheme =
            text[i..].starts_with("http://") || text[i..].starts_with("https://");
        let boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        if at_scheme && boundary {
            let end = text[i..]
                .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"'))
                .map(|rel| i + rel)
                .unwrap_or(text.len());
            let url = trim_url(&text[i..end]);
            if url.len() > "https://".len() {
                if i > rest {
                    out.push(Piece::Text(text[rest..i].to_string()));
                }
                out.push(Piece::Url(url.to_string()));
                rest = i + url.len();
                i = rest;
                continue;
            }
        }
        i += text[i..].chars().next().map(char::len_utf8).unwrap_or(1);
    }
    if rest < text.len() {
        out.push(Piece::Text(text[rest..].to_string()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::inline_text;

    fn parse(text: &str) -> Vec<Block> {
        parse_document(text).blocks
    }

    #[test]
    fn heading_and_paragraph() {
        let blocks = parse("# Title\n\nbody text");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            Block::Heading(h) => {
                assert_eq!(h.level, 1);
                assert_eq!(inline_text(&h.content), "Title");
                assert!(h.id.is_none(), "slugs are assigned by decoration, not parse");
            }
            other => panic!("expected heading, got {other:?}"),
        }
        assert!(matches!(&blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn soft_breaks_become_hard_breaks() {
        let blocks = parse("line one\nline two");
        let Block::Paragraph(inlines) = &blocks[0] else { panic!("expected paragraph") };
        assert!(
            inlines.iter().any(|i| matches!(i, Inline::HardBreak)),
            "single newline must render as a line break"
        );
    }

    #[test]
    fn fenced_code_block_keeps_lang_and_source() {
        let blocks = parse("```rust\nlet x = 1;\n```");
        let Block::CodeBlock(code) = &blocks[0] else { panic!("expected code block") };
        assert_eq!(code.lang.as_deref(), Some("rust"));
        assert_eq!(code.source, "let x = 1;");
        assert!(code.highlighted.is_none());
        assert!(code.copy_index.is_none());
    }

    #[test]
    fn bare_fence_has_no_lang() {
        let blocks = parse("```\nplain\n```");
        let Block::CodeBlock(code) = &blocks[0] else { panic!("expected code block") };
        assert!(code.lang.is_none());
    }

    #[test]
    fn tight_list_items_are_wrapped_in_paragraphs() {
        let blocks = parse("- one\n- two");
        let Block::List(list) = &blocks[0] else { panic!("expected list") };
        assert_eq!(list.items.len(), 2);
        assert!(list.start.is_none());
        let Block::Paragraph(inlines) = &list.items[0][0] else {
            panic!("tight item text must be flushed as a paragraph")
        };
        assert_eq!(inline_text(inlines), "one");
    }

    #[test]
    fn ordered_list_keeps_its_start() {
        let blocks = parse("3. three\n4. four");
        let Block::List(list) = &blocks[0] else { panic!("expected list") };
        assert_eq!(list.start, Some(3));
    }

    #[test]
    fn table_splits_header_and_rows() {
        let blocks = parse("| a | b |\n|---|---|\n| 1 | 2 |");
        let Block::Table(table) = &blocks[0] else { panic!("expected table") };
        assert_eq!(table.header.len(), 2);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(inline_text(&table.rows[0][1]), "2");
    }

    #[test]
    fn task_list_markers_survive() {
        let blocks = parse("- [x] done\n- [ ] open");
        let Block::List(list) = &blocks[0] else { panic!("expected list") };
        let Block::Paragraph(first) = &list.items[0][0] else { panic!("expected paragraph") };
        assert!(matches!(first[0], Inline::TaskMarker(true)));
    }

    #[test]
    fn block_html_is_carried_as_raw_markup() {
        let blocks = parse("<div class=\"x\">\nhello\n</div>");
        let Block::Markup(frag) = &blocks[0] else { panic!("expected markup block") };
        assert!(frag.raw.contains("<div class=\"x\">"));
        assert!(frag.tokens.is_empty(), "tokenizing happens in the splice stage");
    }

    #[test]
    fn inline_html_is_carried_as_raw_markup() {
        let blocks = parse("a <b>bold</b> word");
        let Block::Paragraph(inlines) = &blocks[0] else { panic!("expected paragraph") };
        assert!(inlines
            .iter()
            .any(|i| matches!(i, Inline::Markup(f) if f.raw == "<b>")));
    }

    #[test]
    fn emoji_shorthand_expands() {
        let blocks = parse("ship it :rocket:");
        let Block::Paragraph(inlines) = &blocks[0] else { panic!("expected paragraph") };
        assert_eq!(inline_text(inlines), "ship it 🚀");
    }

    #[test]
    fn unknown_emoji_stays_literal() {
        assert_eq!(expand_emoji("a :notaknownname: b"), "a :notaknownname: b");
        assert_eq!(expand_emoji("ratio 1:2: ok"), "ratio 1:2: ok");
    }

    #[test]
    fn bare_url_is_autolinked() {
        let blocks = parse("see https://example.com/docs, then report back");
        let Block::Paragraph(inlines) = &blocks[0] else { panic!("expected paragraph") };
        let link = inlines
            .iter()
            .find_map(|i| match i {
                Inline::Link { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .expect("bare URL must become a link");
        assert_eq!(link, "https://example.com/docs", "trailing comma stays outside");
    }

    #[test]
    fn explicit_link_is_not_relinked() {
        let blocks = parse("[docs](https://example.com)");
        let Block::Paragraph(inlines) = &blocks[0] else { panic!("expected paragraph") };
        assert_eq!(inlines.len(), 1);
        let Inline::Link { url, content } = &inlines[0] else { panic!("expected link") };
        assert_eq!(url, "https://example.com");
        assert_eq!(inline_text(content), "docs");
    }

    #[test]
    fn front_matter_is_carried_verbatim() {
        let blocks = parse("---\ntitle: notes\n---\n\nbody");
        let Block::FrontMatter(meta) = &blocks[0] else { panic!("expected front matter") };
        assert!(meta.contains("title: notes"));
        assert!(matches!(&blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn admonition_fence_parses_its_body() {
        let blocks = parse(":::warning\ndo **not** do this\n:::\nafter");
        let Block::Admonition(adm) = &blocks[0] else { panic!("expected admonition") };
        assert_eq!(adm.kind, AdmonitionKind::Warning);
        assert!(matches!(&adm.blocks[0], Block::Paragraph(_)));
        assert!(matches!(&blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn unclosed_directive_stays_literal_text() {
        let blocks = parse(":::note\nnever closed");
        assert!(
            !blocks.iter().any(|b| matches!(b, Block::Admonition(_))),
            "unclosed fence must degrade to literal text"
        );
    }

    #[test]
    fn directive_fence_inside_code_block_is_literal() {
        let blocks = parse("```\n:::note\n:::\n```");
        let Block::CodeBlock(code) = &blocks[0] else { panic!("expected code block") };
        assert_eq!(code.source, ":::note\n:::");
    }

    #[test]
    fn strikethrough_nests_inlines() {
        let blocks = parse("~~gone~~");
        let Block::Paragraph(inlines) = &blocks[0] else { panic!("expected paragraph") };
        assert!(matches!(&inlines[0], Inline::Strike(_)));
    }
}

// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Transcript rendering: raw messages in, styled Ratatui lines out.
//!
//! Assistant messages are segmented on the reasoning sentinels; answer
//! segments run the full render pipeline, reasoning segments the reduced one
//! and are shown collapsed behind a "思考过程" header until toggled.  Answers
//! that are JSON literals are pretty-printed instead of going through the
//! markdown pipeline.  Code-block copy payloads are collected transcript-wide
//! in display order, so the label `[复制 n]` always matches payload `n`.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use vera_model::{Message, Role};
use vera_render::tree::{
    AdmonitionKind, Block, CodeBlock, Diagram, Inline, MarkupToken, Table,
};
use vera_render::{
    parse_json_literal, render, render_reduced, split_reasoning, Document, PipelineConfig,
    SegmentKind,
};

/// A styled line ready for Ratatui rendering.
pub type StyledLines = Vec<Line<'static>>;

pub const REASONING_LABEL: &str = "思考过程";
pub const COPY_LABEL: &str = "复制";

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    /// Expand the reasoning regions instead of showing the collapsed header.
    pub show_reasoning: bool,
    /// Plain ASCII indicators instead of Unicode box-drawing.
    pub ascii: bool,
    pub allow_unsafe_html: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { show_reasoning: false, ascii: false, allow_unsafe_html: false }
    }
}

/// A rendered transcript plus the clipboard payloads its copy labels refer to.
pub struct Transcript {
    pub lines: StyledLines,
    pub copy_payloads: Vec<String>,
}

pub fn render_transcript(messages: &[Message], opts: &ViewOptions) -> Transcript {
    let mut lines: StyledLines = Vec::new();
    let mut payloads: Vec<String> = Vec::new();
    let cfg = PipelineConfig { allow_unsafe_html: opts.allow_unsafe_html };

    for message in messages {
        match message.role {
            Role::User => render_user(&message.content, opts, &mut lines),
            // The system welcome renders exactly like an answer.
            Role::Assistant | Role::System => {
                render_assistant(&message.content, opts, &cfg, &mut lines, &mut payloads)
            }
        }
        lines.push(Line::default());
    }

    Transcript { lines, copy_payloads: payloads }
}

fn render_user(content: &str, opts: &ViewOptions, lines: &mut StyledLines) {
    let prompt = if opts.ascii { "> " } else { "❯ " };
    let style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    for (i, text) in content.lines().enumerate() {
        let prefix = if i == 0 { prompt } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(prefix.to_string(), style),
            Span::styled(text.to_string(), style),
        ]));
    }
}

fn render_assistant(
    content: &str,
    opts: &ViewOptions,
    cfg: &PipelineConfig,
    lines: &mut StyledLines,
    payloads: &mut Vec<String>,
) {
    for segment in split_reasoning(content) {
        match segment.kind {
            SegmentKind::Reasoning => render_reasoning(&segment.text, opts, lines),
            SegmentKind::Answer => {
                if segment.text.trim().is_empty() {
                    continue;
                }
                if let Some(value) = parse_json_literal(&segment.text) {
                    render_json(&value, lines);
                } else {
                    let doc = render(&segment.text, cfg);
                    let doc_lines = document_lines(&doc, opts, payloads, true);
                    lines.extend(doc_lines);
                }
            }
        }
    }
}

fn render_reasoning(text: &str, opts: &ViewOptions, lines: &mut StyledLines) {
    let dim = Style::default().fg(Color::DarkGray);
    let marker = match (opts.show_reasoning, opts.ascii) {
        (false, false) => "▸",
        (false, true) => ">",
        (true, false) => "▾",
        (true, true) => "v",
    };
    lines.push(Line::from(Span::styled(
        format!("{marker} {REASONING_LABEL}"),
        dim.add_modifier(Modifier::ITALIC),
    )));
    if !opts.show_reasoning {
        return;
    }

    // Reasoning fences are not copyable: the Ctrl+y chord only numbers
    // answer blocks, so no label is shown and no payload is registered.
    let doc = render_reduced(text);
    let mut unused = Vec::new();
    let inner = document_lines(&doc, opts, &mut unused, false);
    let bar = if opts.ascii { "| " } else { "│ " };
    for line in inner {
        lines.push(prefix_line(line, Span::styled(bar.to_string(), dim)).style(dim));
    }
}

fn render_json(value: &serde_json::Value, lines: &mut StyledLines) {
    let style = Style::default().fg(Color::Cyan);
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    for line in pretty.lines() {
        lines.push(Line::from(Span::styled(line.to_string(), style)));
    }
}

// ── Block rendering ───────────────────────────────────────────────────────────

fn document_lines(
    doc: &Document,
    opts: &ViewOptions,
    payloads: &mut Vec<String>,
    copyable: bool,
) -> StyledLines {
    let mut lines = Vec::new();
    blocks_to_lines(&doc.blocks, opts, payloads, copyable, &mut lines);
    // Trim the trailing blank that block spacing leaves behind.
    while matches!(lines.last(), Some(line) if line.spans.is_empty()) {
        lines.pop();
    }
    lines
}

fn blocks_to_lines(
    blocks: &[Block],
    opts: &ViewOptions,
    payloads: &mut Vec<String>,
    copyable: bool,
    lines: &mut StyledLines,
) {
    for block in blocks {
        match block {
            Block::Paragraph(inlines) => {
                inline_lines(inlines, Style::default(), opts, lines);
                lines.push(Line::default());
            }
            Block::Heading(h) => {
                let style = heading_style(h.level);
                let mut spans = vec![Span::styled(
                    format!("{} ", "#".repeat(h.level as usize)),
                    style,
                )];
                collect_spans(&h.content, style, opts, &mut spans, lines);
                lines.push(Line::from(spans));
                lines.push(Line::default());
            }
            Block::CodeBlock(code) => {
                code_lines(code, opts, payloads, copyable, lines);
                lines.push(Line::default());
            }
            Block::BlockQuote(children) => {
                let dim = Style::default().fg(Color::DarkGray);
                let bar = if opts.ascii { "> " } else { "▌ " };
                let mut inner = Vec::new();
                blocks_to_lines(children, opts, payloads, copyable, &mut inner);
                while matches!(inner.last(), Some(l) if l.spans.is_empty()) {
                    inner.pop();
                }
                for line in inner {
                    lines.push(prefix_line(line, Span::styled(bar.to_string(), dim)));
                }
                lines.push(Line::default());
            }
            Block::List(list) => {
                for (i, item) in list.items.iter().enumerate() {
                    let marker = match list.start {
                        Some(start) => format!("{}. ", start + i as u64),
                        None => {
                            if opts.ascii { "- ".to_string() } else { "• ".to_string() }
                        }
                    };
                    let indent = " ".repeat(marker.width());
                    let mut inner = Vec::new();
                    blocks_to_lines(item, opts, payloads, copyable, &mut inner);
                    while matches!(inner.last(), Some(l) if l.spans.is_empty()) {
                        inner.pop();
                    }
                    for (j, line) in inner.into_iter().enumerate() {
                        let prefix = if j == 0 { marker.clone() } else { indent.clone() };
                        lines.push(prefix_line(line, Span::raw(prefix)));
                    }
                }
                lines.push(Line::default());
            }
            Block::Table(table) => {
                table_lines(table, opts, lines);
                lines.push(Line::default());
            }
            Block::MathBlock(span) => {
                let style = Style::default().fg(Color::LightMagenta);
                let text = span
                    .typeset
                    .clone()
                    .unwrap_or_else(|| span.source.trim().to_string());
                for part in text.lines() {
                    lines.push(Line::from(Span::styled(format!("  {part}"), style)));
                }
                lines.push(Line::default());
            }
            Block::Markup(frag) => {
                markup_block_lines(&frag.tokens, &frag.raw, opts, lines);
                lines.push(Line::default());
            }
            Block::Admonition(adm) => {
                let style = admonition_style(&adm.kind);
                let bar = if opts.ascii { "! " } else { "▌ " };
                lines.push(Line::from(Span::styled(
                    format!("{bar}{}", adm.kind.label().to_uppercase()),
                    style.add_modifier(Modifier::BOLD),
                )));
                let mut inner = Vec::new();
                blocks_to_lines(&adm.blocks, opts, payloads, copyable, &mut inner);
                while matches!(inner.last(), Some(l) if l.spans.is_empty()) {
                    inner.pop();
                }
                for line in inner {
                    lines.push(prefix_line(line, Span::styled(bar.to_string(), style)));
                }
                lines.push(Line::default());
            }
            Block::FrontMatter(meta) => {
                let dim = Style::default().fg(Color::DarkGray);
                for line in meta.lines() {
                    lines.push(Line::from(Span::styled(format!("─ {line}"), dim)));
                }
                lines.push(Line::default());
            }
            Block::Diagram(diagram) => {
                diagram_lines(diagram, opts, lines);
                lines.push(Line::default());
            }
            Block::Rule => {
                let rule = if opts.ascii { "-" } else { "─" };
                lines.push(Line::from(Span::styled(
                    rule.repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
                lines.push(Line::default());
            }
        }
    }
}

fn heading_style(level: u8) -> Style {
    match level {
        1 => Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        2 => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        3 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    }
}

fn admonition_style(kind: &AdmonitionKind) -> Style {
    let color = match kind {
        AdmonitionKind::Note => Color::Blue,
        AdmonitionKind::Tip => Color::Green,
        AdmonitionKind::Warning | AdmonitionKind::Caution => Color::Yellow,
        AdmonitionKind::Important => Color::Red,
        AdmonitionKind::Other(_) => Color::Magenta,
    };
    Style::default().fg(color)
}

fn code_lines(
    code: &CodeBlock,
    opts: &ViewOptions,
    payloads: &mut Vec<String>,
    copyable: bool,
    lines: &mut StyledLines,
) {
    let frame = Style::default().fg(Color::DarkGray);
    let lang = code.lang.as_deref().unwrap_or("");
    let (tl, bar, bl, dash) = if opts.ascii {
        ("+", "| ", "+", "-")
    } else {
        ("┌", "│ ", "└", "─")
    };
    let mut header = vec![
        Span::styled(format!("{tl}{dash} "), frame),
        Span::styled(lang.to_string(), Style::default().fg(Color::Cyan)),
    ];
    if copyable {
        payloads.push(code.source.clone());
        let number = payloads.len();
        header.push(Span::styled(
            format!(" [{COPY_LABEL} {number}]"),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::from(header));

    match &code.highlighted {
        Some(highlighted) => {
            for row in highlighted {
                let mut spans = vec![Span::styled(bar.to_string(), frame)];
                for piece in row {
                    let style = match piece.color {
                        Some((r, g, b)) => Style::default().fg(Color::Rgb(r, g, b)),
                        None => Style::default(),
                    };
                    spans.push(Span::styled(piece.text.clone(), style));
                }
                lines.push(Line::from(spans));
            }
        }
        None => {
            for row in code.source.lines() {
                lines.push(Line::from(vec![
                    Span::styled(bar.to_string(), frame),
                    Span::raw(row.to_string()),
                ]));
            }
        }
    }
    lines.push(Line::from(Span::styled(format!("{bl}{}", dash.repeat(3)), frame)));
}

fn table_lines(table: &Table, opts: &ViewOptions, lines: &mut StyledLines) {
    let cell_text =
        |cell: &[Inline]| -> String { vera_render::tree::inline_text(cell).trim().to_string() };

    let columns = table.header.len().max(
        table.rows.iter().map(|r| r.len()).max().unwrap_or(0),
    );
    let mut widths = vec![0usize; columns];
    let measure = |row: &[Vec<Inline>], widths: &mut Vec<usize>| {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell_text(cell).width());
        }
    };
    measure(&table.header, &mut widths);
    for row in &table.rows {
        measure(row, &mut widths);
    }

    let sep = if opts.ascii { " | " } else { " │ " };
    let format_row = |row: &[Vec<Inline>], style: Style| -> Line<'static> {
        let mut spans = Vec::new();
        for i in 0..columns {
            let text = row.get(i).map(|c| cell_text(c)).unwrap_or_default();
            let pad = widths[i].saturating_sub(text.width());
            spans.push(Span::styled(format!("{text}{}", " ".repeat(pad)), style));
            if i + 1 < columns {
                spans.push(Span::styled(sep.to_string(), Style::default().fg(Color::DarkGray)));
            }
        }
        Line::from(spans)
    };

    lines.push(format_row(&table.header, Style::default().add_modifier(Modifier::BOLD)));
    let dash = if opts.ascii { "-" } else { "─" };
    let total: usize = widths.iter().sum::<usize>() + sep.width() * columns.saturating_sub(1);
    lines.push(Line::from(Span::styled(
        dash.repeat(total),
        Style::default().fg(Color::DarkGray),
    )));
    for row in &table.rows {
        lines.push(format_row(row, Style::default()));
    }
}

fn diagram_lines(diagram: &Diagram, opts: &ViewOptions, lines: &mut StyledLines) {
    let style = Style::default().fg(Color::Magenta);
    for edge in &diagram.edges {
        let arrow = match (&edge.label, opts.ascii) {
            (Some(label), false) => format!("{} ──{label}──▶ {}", edge.from, edge.to),
            (Some(label), true) => format!("{} --{label}--> {}", edge.from, edge.to),
            (None, false) => format!("{} ──▶ {}", edge.from, edge.to),
            (None, true) => format!("{} --> {}", edge.from, edge.to),
        };
        lines.push(Line::from(Span::styled(format!("  {arrow}"), style)));
    }
}

fn markup_block_lines(tokens: &[MarkupToken], raw: &str, opts: &ViewOptions, lines: &mut StyledLines) {
    if tokens.is_empty() {
        // Unsafe mode, or nothing survived tokenizing: show the raw text.
        let dim = Style::default().fg(Color::DarkGray);
        for line in raw.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), dim)));
        }
        return;
    }
    let mut spans: Vec<Span<'static>> = Vec::new();
    for token in tokens {
        match token {
            MarkupToken::Text(text) => {
                for (i, part) in text.split('\n').enumerate() {
                    if i > 0 {
                        flush(&mut spans, lines);
                    }
                    if !part.is_empty() {
                        spans.push(Span::raw(part.to_string()));
                    }
                }
            }
            MarkupToken::Tag(tag) => match tag.name.as_str() {
                "br" => flush(&mut spans, lines),
                "p" | "div" | "li" | "tr" if tag.closing => flush(&mut spans, lines),
                "hr" => {
                    flush(&mut spans, lines);
                    let rule = if opts.ascii { "-" } else { "─" };
                    lines.push(Line::from(Span::styled(
                        rule.repeat(40),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                _ => {}
            },
        }
    }
    flush(&mut spans, lines);
}

fn flush(spans: &mut Vec<Span<'static>>, lines: &mut StyledLines) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}

// ── Inline rendering ──────────────────────────────────────────────────────────

fn inline_lines(inlines: &[Inline], base: Style, opts: &ViewOptions, lines: &mut StyledLines) {
    let mut spans = Vec::new();
    collect_spans(inlines, base, opts, &mut spans, lines);
    flush(&mut spans, lines);
}

fn collect_spans(
    inlines: &[Inline],
    style: Style,
    opts: &ViewOptions,
    spans: &mut Vec<Span<'static>>,
    lines: &mut StyledLines,
) {
    for inline in inlines {
        match inline {
            Inline::Text(t) => spans.push(Span::styled(t.clone(), style)),
            Inline::Code(t) => spans.push(Span::styled(
                format!("`{t}`"),
                Style::default().fg(Color::Yellow).bg(Color::DarkGray),
            )),
            Inline::Emph(c) => {
                collect_spans(c, style.add_modifier(Modifier::ITALIC), opts, spans, lines)
            }
            Inline::Strong(c) => {
                collect_spans(c, style.add_modifier(Modifier::BOLD), opts, spans, lines)
            }
            Inline::Strike(c) => {
                collect_spans(c, style.add_modifier(Modifier::CROSSED_OUT), opts, spans, lines)
            }
            Inline::Link { url, content } => {
                let link_style = style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
                collect_spans(content, link_style, opts, spans, lines);
                let text = vera_render::tree::inline_text(content);
                if text != *url {
                    spans.push(Span::styled(
                        format!(" ({url})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            Inline::Image { url, alt } => {
                let label = if alt.is_empty() { "图片" } else { alt.as_str() };
                spans.push(Span::styled(
                    format!("[{label}]"),
                    style.fg(Color::Magenta),
                ));
                spans.push(Span::styled(
                    format!(" ({url})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Inline::Math(span) => {
                let text = span
                    .typeset
                    .clone()
                    .unwrap_or_else(|| format!("${}$", span.source));
                spans.push(Span::styled(text, style.fg(Color::LightMagenta)));
            }
            Inline::Markup(frag) => {
                for token in &frag.tokens {
                    match token {
                        MarkupToken::Text(t) => spans.push(Span::styled(t.clone(), style)),
                        MarkupToken::Tag(tag) if tag.name == "br" => flush(spans, lines),
                        MarkupToken::Tag(_) => {}
                    }
                }
                if frag.tokens.is_empty() && opts.allow_unsafe_html {
                    spans.push(Span::styled(
                        frag.raw.clone(),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            Inline::TaskMarker(done) => {
                let mark = if *done { "[x] " } else { "[ ] " };
                spans.push(Span::styled(
                    mark.to_string(),
                    Style::default().fg(Color::Green),
                ));
            }
            Inline::HardBreak => flush(spans, lines),
        }
    }
}

fn prefix_line(line: Line<'static>, prefix: Span<'static>) -> Line<'static> {
    let mut spans = vec![prefix];
    spans.extend(line.spans);
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn all_text(lines: &StyledLines) -> String {
        lines.iter().map(|l| line_text(l)).collect::<Vec<_>>().join("\n")
    }

    fn messages(assistant: &str) -> Vec<Message> {
        vec![Message::user("question"), Message::assistant(assistant)]
    }

    #[test]
    fn user_messages_get_the_prompt_prefix() {
        let t = render_transcript(&messages("answer"), &ViewOptions::default());
        assert!(all_text(&t.lines).contains("❯ question"));
    }

    #[test]
    fn reasoning_is_collapsed_by_default() {
        let t = render_transcript(
            &messages("<think>secret plan</think>visible answer"),
            &ViewOptions::default(),
        );
        let text = all_text(&t.lines);
        assert!(text.contains(REASONING_LABEL));
        assert!(!text.contains("secret plan"), "collapsed region hides its body");
        assert!(text.contains("visible answer"));
    }

    #[test]
    fn reasoning_expands_on_toggle() {
        let opts = ViewOptions { show_reasoning: true, ..Default::default() };
        let t = render_transcript(&messages("<think>secret plan</think>done"), &opts);
        assert!(all_text(&t.lines).contains("secret plan"));
    }

    #[test]
    fn json_answers_are_pretty_printed() {
        let t = render_transcript(&messages(r#"{"force": 9.8}"#), &ViewOptions::default());
        let text = all_text(&t.lines);
        assert!(text.contains("\"force\": 9.8"));
    }

    #[test]
    fn copy_labels_match_payload_order_across_messages() {
        let msgs = vec![
            Message::assistant("```\nalpha\n```".to_string()),
            Message::assistant("```\nbeta\n```".to_string()),
        ];
        let t = render_transcript(&msgs, &ViewOptions::default());
        assert_eq!(t.copy_payloads, vec!["alpha".to_string(), "beta".to_string()]);
        let text = all_text(&t.lines);
        assert!(text.contains(&format!("[{COPY_LABEL} 1]")));
        assert!(text.contains(&format!("[{COPY_LABEL} 2]")));
    }

    #[test]
    fn reasoning_code_blocks_carry_no_copy_label() {
        let opts = ViewOptions { show_reasoning: true, ..Default::default() };
        let t = render_transcript(
            &messages("<think>```\nhidden\n```</think>```\nshown\n```"),
            &opts,
        );
        assert_eq!(
            t.copy_payloads,
            vec!["shown".to_string()],
            "only the answer block is registered"
        );
        let text = all_text(&t.lines);
        assert_eq!(
            text.matches(COPY_LABEL).count(),
            1,
            "the reasoning fence must not duplicate an answer label"
        );
        assert!(text.contains("hidden"), "the expanded fence body still shows");
    }

    #[test]
    fn ascii_mode_avoids_box_drawing() {
        let opts = ViewOptions { ascii: true, ..Default::default() };
        let t = render_transcript(&messages("```\nx\n```\n\n> quote"), &opts);
        let text = all_text(&t.lines);
        assert!(!text.contains('│'));
        assert!(!text.contains('▌'));
    }

    #[test]
    fn tables_are_padded_by_display_width() {
        let t = render_transcript(
            &messages("| 名称 | v |\n|---|---|\n| a | 长 |"),
            &ViewOptions::default(),
        );
        let text = all_text(&t.lines);
        // CJK header is 4 columns wide; the body cell "a" must be padded to match.
        assert!(text.contains("名称"));
        assert!(text.contains("a   "));
    }

    #[test]
    fn math_falls_back_to_source_when_untypeset() {
        let t = render_transcript(
            &messages(r"see $\begin{matrix}x\end{matrix}$ here"),
            &ViewOptions::default(),
        );
        assert!(all_text(&t.lines).contains(r"$\begin{matrix}x\end{matrix}$"));
    }
}

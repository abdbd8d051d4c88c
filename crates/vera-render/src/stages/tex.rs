// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Plain-text TeX approximation for the terminal: Greek letters and common
//! operators become their Unicode glyphs, super- and subscripts use the
//! dedicated codepoints where they exist, fractions flatten to `a/b`.
//!
//! [`typeset`] returns `None` for anything it cannot faithfully flatten
//! (unknown macros, unbalanced groups); the caller then shows the raw TeX
//! source instead.  Returning a wrong rendition would be worse than
//! returning none.

/// Macro-to-glyph table.  Sorted by name.
const SYMBOLS: &[(&str, &str)] = &[
    ("Delta", "Δ"),
    ("Gamma", "Γ"),
    ("Lambda", "Λ"),
    ("Omega", "Ω"),
    ("Phi", "Φ"),
    ("Pi", "Π"),
    ("Psi", "Ψ"),
    ("Sigma", "Σ"),
    ("Theta", "Θ"),
    ("alpha", "α"),
    ("angle", "∠"),
    ("approx", "≈"),
    ("beta", "β"),
    ("cap", "∩"),
    ("cdot", "·"),
    ("cdots", "⋯"),
    ("chi", "χ"),
    ("circ", "∘"),
    ("cup", "∪"),
    ("delta", "δ"),
    ("div", "÷"),
    ("emptyset", "∅"),
    ("epsilon", "ϵ"),
    ("equiv", "≡"),
    ("eta", "η"),
    ("exists", "∃"),
    ("forall", "∀"),
    ("gamma", "γ"),
    ("ge", "≥"),
    ("geq", "≥"),
    ("gg", "≫"),
    ("hbar", "ℏ"),
    ("in", "∈"),
    ("infty", "∞"),
    ("int", "∫"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("ldots", "…"),
    ("le", "≤"),
    ("leftarrow", "←"),
    ("leq", "≤"),
    ("ll", "≪"),
    ("mp", "∓"),
    ("mu", "μ"),
    ("nabla", "∇"),
    ("ne", "≠"),
    ("neq", "≠"),
    ("notin", "∉"),
    ("nu", "ν"),
    ("omega", "ω"),
    ("partial", "∂"),
    ("phi", "φ"),
    ("pi", "π"),
    ("pm", "±"),
    ("prime", "′"),
    ("prod", "∏"),
    ("propto", "∝"),
    ("psi", "ψ"),
    ("rho", "ρ"),
    ("rightarrow", "→"),
    ("sigma", "σ"),
    ("sim", "∼"),
    ("subset", "⊂"),
    ("sum", "∑"),
    ("supset", "⊃"),
    ("tau", "τ"),
    ("theta", "θ"),
    ("times", "×"),
    ("to", "→"),
    ("varepsilon", "ε"),
    ("varphi", "φ"),
    ("xi", "ξ"),
    ("zeta", "ζ"),
];

/// Macros that only wrap their argument or adjust spacing.
const TRANSPARENT: &[&str] = &[
    "mathbf", "mathit", "mathrm", "mathtt", "operatorname", "text", "textbf", "textit",
];

const SUPERSCRIPT: &[(char, char)] = &[
    ('0', '⁰'),
    ('1', '¹'),
    ('2', '²'),
    ('3', '³'),
    ('4', '⁴'),
    ('5', '⁵'),
    ('6', '⁶'),
    ('7', '⁷'),
    ('8', '⁸'),
    ('9', '⁹'),
    ('+', '⁺'),
    ('-', '⁻'),
    ('=', '⁼'),
    ('(', '⁽'),
    (')', '⁾'),
    ('i', 'ⁱ'),
    ('n', 'ⁿ'),
];

const SUBSCRIPT: &[(char, char)] = &[
    ('0', '₀'),
    ('1', '₁'),
    ('2', '₂'),
    ('3', '₃'),
    ('4', '₄'),
    ('5', '₅'),
    ('6', '₆'),
    ('7', '₇'),
    ('8', '₈'),
    ('9', '₉'),
    ('+', '₊'),
    ('-', '₋'),
    ('=', '₌'),
    ('(', '₍'),
    (')', '₎'),
];

fn symbol(name: &str) -> Option<&'static str> {
    SYMBOLS
        .binary_search_by_key(&name, |(n, _)| n)
        .ok()
        .map(|idx| SYMBOLS[idx].1)
}

fn map_script(text: &str, table: &[(char, char)]) -> Option<String> {
    text.chars()
        .map(|c| table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to))
        .collect()
}

/// Flatten a TeX source string to plain Unicode, or `None` when the source
/// uses constructs without a faithful flat form.
pub fn typeset(source: &str, _display: bool) -> Option<String> {
    let mut out = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                let rest = &source[idx + 1..];
                let name: String = rest.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
                if name.is_empty() {
                    // Single-character escape: `\{`, `\$`, `\\`, ...
                    match chars.next() {
                        Some((_, '\\')) => out.push('\n'),
                        // Spacing escapes collapse to a single space.
                        Some((_, ',' | ';' | '!' | ' ')) => out.push(' '),
                        Some((_, escaped)) => out.push(escaped),
                        None => return None,
                    }
                    continue;
                }
                for _ in 0..name.len() {
                    chars.next();
                }
                if let Some(glyph) = symbol(&name) {
                    out.push_str(glyph);
                } else {
                    match name.as_str() {
                        "frac" => {
                            let num = typeset(&take_group(source, &mut chars)?, false)?;
                            let den = typeset(&take_group(source, &mut chars)?, false)?;
                            out.push_str(&parenthesize(&num));
                            out.push('/');
                            out.push_str(&parenthesize(&den));
                        }
                        "sqrt" => {
                            let arg = typeset(&take_group(source, &mut chars)?, false)?;
                            out.push('√');
                            out.push_str(&parenthesize(&arg));
                        }
                        name if TRANSPARENT.contains(&name) => {
                            let arg = typeset(&take_group(source, &mut chars)?, false)?;
                            out.push_str(&arg);
                        }
                        "left" | "right" => {
                            // The delimiter itself follows; keep it literal.
                        }
                        "quad" | "qquad" => out.push_str("  "),
                        _ => return None,
                    }
                }
            }
            '^' => {
                let arg = typeset(&take_group(source, &mut chars)?, false)?;
                match map_script(&arg, SUPERSCRIPT) {
                    Some(mapped) => out.push_str(&mapped),
                    None => {
                        out.push('^');
                        out.push_str(&parenthesize(&arg));
                    }
                }
            }
            '_' => {
                let arg = typeset(&take_group(source, &mut chars)?, false)?;
                match map_script(&arg, SUBSCRIPT) {
                    Some(mapped) => out.push_str(&mapped),
                    None => {
                        out.push('_');
                        out.push_str(&parenthesize(&arg));
                    }
                }
            }
            // Grouping braces vanish; stray closers mean unbalanced input.
            '{' => {
                let inner = take_braced(source, idx, &mut chars)?;
                out.push_str(&typeset(&inner, false)?);
            }
            '}' => return None,
            '~' | '&' => out.push(' '),
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }

    Some(out)
}

fn parenthesize(s: &str) -> String {
    if s.chars().count() <= 1 {
        s.to_string()
    } else {
        format!("({s})")
    }
}

/// Take the next argument: a braced group, a macro, or a single character.
fn take_group(
    source: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Option<String> {
    match chars.next() {
        Some((idx, '{')) => take_braced(source, idx, chars),
        Some((idx, '\\')) => {
            let name: String = source[idx + 1..]
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect();
            if name.is_empty() {
                return None;
            }
            for _ in 0..name.len() {
                chars.next();
            }
            Some(format!("\\{name}"))
        }
        Some((_, c)) => Some(c.to_string()),
        None => None,
    }
}

/// Consume a `{…}` group whose opening brace was just read at `open`.
fn take_braced(
    source: &str,
    open: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Option<String> {
    let mut depth = 1usize;
    for (idx, c) in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(source[open + 1..idx].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_symbols_and_superscripts() {
        assert_eq!(typeset("E=mc^2", false).as_deref(), Some("E=mc²"));
        assert_eq!(typeset(r"x^{10}", false).as_deref(), Some("x¹⁰"));
    }

    #[test]
    fn greek_and_operators() {
        assert_eq!(
            typeset(r"\alpha + \beta \to \infty", false).as_deref(),
            Some("α + β → ∞")
        );
        assert_eq!(typeset(r"a \times b \leq c", false).as_deref(), Some("a × b ≤ c"));
    }

    #[test]
    fn fractions_flatten() {
        assert_eq!(typeset(r"\frac{1}{2}", false).as_deref(), Some("1/2"));
        assert_eq!(typeset(r"\frac{a+b}{c}", false).as_deref(), Some("(a+b)/c"));
    }

    #[test]
    fn sqrt_and_subscripts() {
        assert_eq!(typeset(r"\sqrt{2}", false).as_deref(), Some("√2"));
        assert_eq!(typeset("x_0 + x_{12}", false).as_deref(), Some("x₀ + x₁₂"));
    }

    #[test]
    fn text_wrapper_is_transparent() {
        assert_eq!(
            typeset(r"\text{speed} = v", false).as_deref(),
            Some("speed = v")
        );
    }

    #[test]
    fn unmappable_script_falls_back_to_caret() {
        assert_eq!(typeset("e^{x+y}", false).as_deref(), Some("e^(x+y)"));
    }

    #[test]
    fn unknown_macro_yields_none() {
        assert_eq!(typeset(r"\undefinedmacro{x}", false), None);
        assert_eq!(typeset(r"\begin{matrix}a\end{matrix}", false), None);
    }

    #[test]
    fn unbalanced_groups_yield_none() {
        assert_eq!(typeset("{a+b", false), None);
        assert_eq!(typeset("a}b", false), None);
    }

    #[test]
    fn nested_macro_as_script_argument() {
        assert_eq!(typeset(r"x^\alpha", false).as_deref(), Some("x^α"));
    }
}

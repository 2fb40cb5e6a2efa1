//! Free text → canonical numeric-expression string.
//!
//! [`normalize`] applies an ordered list of rewrites. Each stage assumes the
//! previous ones already ran:
//!
//! 1. symbols (`×`, `÷`, `**`, `x` between digits)
//! 2. operator words in English and Spanish ("times", "menos", ...)
//! 3. filler words ("what is", "calcula", "=", ...)
//! 4. semantic rewrites (roots, percentages, scientific notation, powers,
//!    named constants)
//!
//! No validation happens here. Input the arithmetic engine cannot handle is
//! left for it to reject.

use std::f64::consts::{E, PI};
use std::sync::OnceLock;

use regex::Regex;

/// One rewrite: every match of `pattern` becomes `replacement`.
struct Rewrite {
    pattern: Regex,
    replacement: String,
    /// Re-run until nothing changes, for rules whose matches can overlap
    /// (`2x3x4`).
    repeat: bool,
}

impl Rewrite {
    fn new(pattern: &str, replacement: impl Into<String>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("normalizer pattern must compile"),
            replacement: replacement.into(),
            repeat: false,
        }
    }

    fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    fn apply(&self, input: String) -> String {
        let mut current = input;
        loop {
            let next = self
                .pattern
                .replace_all(&current, self.replacement.as_str())
                .into_owned();
            if !self.repeat || next == current {
                return next;
            }
            current = next;
        }
    }
}

/// The rewrite table, compiled once.
fn rewrites() -> &'static [Rewrite] {
    static REWRITES: OnceLock<Vec<Rewrite>> = OnceLock::new();
    REWRITES.get_or_init(build_rewrites)
}

fn build_rewrites() -> Vec<Rewrite> {
    const NUM: &str = r"(\d+(?:\.\d+)?)";

    vec![
        // ── 1. symbols ──
        Rewrite::new("×", "*"),
        Rewrite::new("÷", "/"),
        Rewrite::new(r"\*\*", "^"),
        Rewrite::new(r"(\d)\s*x\s*(\d)", "${1}*${2}").repeating(),
        // ── 2. operator words (division first: "dividido por" ≠ "por") ──
        Rewrite::new(
            r"\b(?:divided by|over|dividido entre|dividido por|dividido|entre)\b",
            " / ",
        ),
        Rewrite::new(r"\b(?:multiplied by|multiplicado por|times|por)\b", " * "),
        Rewrite::new(r"\b(?:plus|más|mas)\b", " + "),
        Rewrite::new(r"\b(?:minus|menos)\b", " - "),
        // ── 3. filler ──
        Rewrite::new(
            concat!(
                r"\b(?:what is|what's|how much is|calculate|equals",
                r"|cuánto es|cuanto es|calcular|calcula|igual a|es)\b",
            ),
            "",
        ),
        Rewrite::new(r"[=?¿!¡]", ""),
        // ── 4. semantic ──
        Rewrite::new(r"\b(?:el doble de|doble de|double of|twice)\s*", "2 * "),
        Rewrite::new(r"\b(?:la mitad de|mitad de|half of)\s*", "0.5 * "),
        Rewrite::new(
            r"\b(?:la )?(?:square root of|raíz cuadrada de|raiz cuadrada de)\s*",
            "sqrt ",
        ),
        Rewrite::new(
            r"\b(?:la )?(?:cube root of|cubic root of|raíz cúbica de|raiz cubica de)\s*",
            "cbrt ",
        ),
        Rewrite::new(
            &format!(r"{NUM}\s*%\s*(?:of|de)\s*{NUM}"),
            "(${1}/100)*${2}",
        ),
        Rewrite::new(
            &format!(r"{NUM}\s*\*\s*10\s*\^\s*([+-]?\d+)"),
            "(${1} * pow(10,${2}))",
        ),
        Rewrite::new(&format!(r"{NUM}\s?e([+-]?\d+)\b"), "(${1} * pow(10,${2}))"),
        Rewrite::new(
            &format!(r"{NUM}\s*\^\s*(-?\d+(?:\.\d+)?)"),
            "pow(${1},${2})",
        ),
        Rewrite::new(r"(\d)\s*(π|pi\b)", "${1} * ${2}"),
        Rewrite::new(r"π|\bpi\b", PI.to_string()),
        Rewrite::new(r"\be\b", E.to_string()),
    ]
}

/// Rewrite free text into a canonical numeric-expression string.
///
/// Always succeeds. The result is lower-cased, trimmed and has single
/// spaces; when no rule applies that is all that changes.
///
/// # Examples
///
/// ```
/// use calc_engine::normalize::normalize;
///
/// assert_eq!(normalize("what is 3 times 4"), "3 * 4");
/// assert_eq!(normalize("20% of 50"), "(20/100)*50");
/// assert_eq!(normalize("2^10"), "pow(2,10)");
/// ```
pub fn normalize(raw: &str) -> String {
    let lowered = collapse_whitespace(&raw.to_lowercase());
    let rewritten = rewrites()
        .iter()
        .fold(lowered, |text, rewrite| rewrite.apply(text));
    collapse_whitespace(&rewritten)
}

/// Trim and collapse runs of whitespace to a single space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ───────────────────────────────────────────────────────────────────

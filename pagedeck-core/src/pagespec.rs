//! Parsing of textual page specifications.
//!
//! A specification is a comma-separated list of 1-based tokens: a single
//! page ("3"), an inclusive range ("5-7", order of the endpoints is
//! irrelevant) or the literal "all". Parsing is deliberately lenient:
//! malformed tokens are dropped instead of raised, so a bad specification
//! degrades to a smaller (possibly empty) selection. Operations decide what
//! an empty selection means; the parser never fails.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Single 1-based page number.
    Page(u32),
    /// Inclusive 1-based range, endpoints as written (may be reversed).
    Span(u32, u32),
    /// Every page of the document.
    All,
}

/// A parsed page specification.
///
/// Examples:
/// - `"1,3,5-7"` -> pages 1, 3, 5, 6 and 7
/// - `"5-3"` -> pages 3, 4 and 5 (reversed ranges expand low to high)
/// - `"all"` -> every page
/// - `"1,abc,3"` -> pages 1 and 3 (the bad token is skipped)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSpec {
    tokens: Vec<Token>,
}

impl PageSpec {
    /// Parse a specification string. Never fails; unparseable tokens are
    /// silently skipped.
    pub fn parse(input: &str) -> Self {
        let mut tokens = Vec::new();

        for raw in input.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            if raw.eq_ignore_ascii_case("all") {
                tokens.push(Token::All);
                continue;
            }

            if let Some((a, b)) = raw.split_once('-') {
                if let (Ok(from), Ok(to)) = (a.trim().parse::<u32>(), b.trim().parse::<u32>()) {
                    tokens.push(Token::Span(from, to));
                }
                continue;
            }

            if let Ok(page) = raw.parse::<u32>() {
                tokens.push(Token::Page(page));
            }
        }

        Self { tokens }
    }

    /// True when nothing usable was parsed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when the specification contains the literal "all".
    pub fn mentions_all(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, Token::All))
    }

    /// Deduplicated, ascending 0-based indices within `[0, total_pages)`.
    ///
    /// Out-of-bounds references are filtered out here rather than raised;
    /// a specification that resolves to nothing yields an empty vector and
    /// it is the operation's job to reject that.
    pub fn indices(&self, total_pages: usize) -> Vec<usize> {
        let mut set = BTreeSet::new();

        for token in &self.tokens {
            match *token {
                Token::Page(p) => {
                    set.extend(to_index(p, total_pages));
                }
                Token::Span(a, b) => {
                    let (lo, hi) = (a.min(b), a.max(b));
                    let hi = hi.min(total_pages as u32);
                    set.extend((lo..=hi).filter_map(|p| to_index(p, total_pages)));
                }
                Token::All => {
                    set.extend(0..total_pages);
                }
            }
        }

        set.into_iter().collect()
    }

    /// 0-based indices in declared order, duplicates preserved.
    ///
    /// Used for reorder, where the specification is a permutation-like
    /// sequence rather than a set: a repeated page duplicates it in the
    /// output and an omitted page drops it.
    pub fn sequence(&self, total_pages: usize) -> Vec<usize> {
        let mut out = Vec::new();

        for token in &self.tokens {
            match *token {
                Token::Page(p) => {
                    out.extend(to_index(p, total_pages));
                }
                Token::Span(a, b) => {
                    let (lo, hi) = (a.min(b), a.max(b));
                    let hi = hi.min(total_pages as u32);
                    out.extend((lo..=hi).filter_map(|p| to_index(p, total_pages)));
                }
                Token::All => {
                    out.extend(0..total_pages);
                }
            }
        }

        out
    }
}

/// 1-based page number to 0-based index, bounds-checked. Page 0 can never
/// be in bounds and is filtered like any other out-of-range reference.
fn to_index(page: u32, total_pages: usize) -> Option<usize> {
    if page == 0 {
        return None;
    }
    let index = page as usize - 1;
    (index < total_pages).then_some(index)
}

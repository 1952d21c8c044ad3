//! Greedy word wrap over mixed-face text.
//!
//! A paragraph arrives as runs of `(text, face)`. Runs are split on whitespace
//! into [`Word`]s; a word may span faces (`**Spark**,` is a bold fragment
//! followed by a regular comma). Widths are in em units so the caller scales
//! them by the paragraph's font size.

use crate::layout::font_metrics::{get_metrics, FontFace};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// A run of characters drawn in one face.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub face: FontFace,
}

/// An unbreakable unit. Words are separated by one space when laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub fragments: Vec<Fragment>,
    pub width_em: f32,
}

/// One wrapped output line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
    /// Natural width: word widths plus single inter-word spaces.
    pub width_em: f32,
}

impl Line {
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.fragments.iter().map(|f| f.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenizing
// ────────────────────────────────────────────────────────────────────────────

/// Splits face-tagged runs into words, measuring each.
pub fn split_words<'a>(runs: impl IntoIterator<Item = (&'a str, FontFace)>) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();

    for (text, face) in runs {
        for c in text.chars() {
            if c.is_whitespace() {
                flush_word(&mut current, &mut words);
                continue;
            }
            match current.last_mut() {
                Some(fragment) if fragment.face == face => fragment.text.push(c),
                _ => current.push(Fragment {
                    text: c.to_string(),
                    face,
                }),
            }
        }
    }
    flush_word(&mut current, &mut words);

    words
}

fn flush_word(current: &mut Vec<Fragment>, words: &mut Vec<Word>) {
    if current.is_empty() {
        return;
    }
    let fragments = std::mem::take(current);
    let width_em = fragments
        .iter()
        .map(|f| get_metrics(f.face).measure_str(&f.text))
        .sum();
    words.push(Word {
        fragments,
        width_em,
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Line breaking
// ────────────────────────────────────────────────────────────────────────────

/// Greedy line breaking.
///
/// A word that is wider than `max_width_em` on its own still gets a line to
/// itself and overflows; words are never hyphenated. Empty input yields no
/// lines.
pub fn break_lines(words: Vec<Word>, max_width_em: f32, space_em: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current = Line {
        words: Vec::new(),
        width_em: 0.0,
    };

    for word in words {
        let space_w = if current.words.is_empty() {
            0.0
        } else {
            space_em
        };

        if !current.words.is_empty() && current.width_em + space_w + word.width_em > max_width_em
        {
            // Current line is full, start a new one with this word.
            let width_em = word.width_em;
            lines.push(std::mem::replace(
                &mut current,
                Line {
                    words: vec![word],
                    width_em,
                },
            ));
        } else {
            current.width_em += space_w + word.width_em;
            current.words.push(word);
        }
    }

    if !current.words.is_empty() {
        lines.push(current);
    }

    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

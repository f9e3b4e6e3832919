//! Splitting of long string literals into `TO_CLOB` concatenation chains.
//!
//! Oracle rejects character literals longer than 4000 bytes. A long literal is
//! emitted as a quoted first chunk followed by `|| TO_CLOB('<chunk>')` for
//! every later chunk.

use core::num::NonZeroUsize;

/// Default maximum number of characters in a single string literal.
pub const DEFAULT_CLOB_LIMIT: NonZeroUsize = match NonZeroUsize::new(4000) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Append `source` to `out`, splitting it into a `TO_CLOB` chain when it has
/// more than `limit` characters once single quotes are doubled.
///
/// When `inside_string` is set the caller has already opened a quoted literal
/// around `source`, so a chain closes that literal with `' || ` first and
/// reopens it with ` || '` at the end. A doubled quote is never split across
/// chunks, and every chunk holds at least one character.
pub fn split_into_clobs(source: &str, inside_string: bool, limit: NonZeroUsize, out: &mut String) {
    let limit = limit.get();
    let mut chunks = chunks(source, limit);
    let Some(first) = chunks.next().filter(|first| first.len() < source.len()) else {
        push_escaped(source, out);
        return;
    };

    if inside_string {
        out.push_str("' || ");
    }
    out.push('\'');
    push_escaped(first, out);
    out.push('\'');
    for chunk in chunks {
        out.push_str(" || TO_CLOB('");
        push_escaped(chunk, out);
        out.push_str("')");
    }
    if inside_string {
        out.push_str(" || '");
    }
}

/// Convenience wrapper returning a new string.
#[must_use]
pub fn split_into_clobs_string(source: &str, inside_string: bool, limit: NonZeroUsize) -> String {
    let mut out = String::with_capacity(source.len() + 32);
    split_into_clobs(source, inside_string, limit, &mut out);
    out
}

/// Consecutive slices of at most `limit` characters after escaping.
fn chunks(source: &str, limit: usize) -> impl Iterator<Item = &str> {
    let mut rest = source;
    core::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut width = 0;
        let mut end = rest.len();
        for (index, c) in rest.char_indices() {
            width += escaped_width(c);
            if width > limit && index > 0 {
                end = index;
                break;
            }
        }
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

const fn escaped_width(c: char) -> usize {
    if c == '\'' { 2 } else { 1 }
}

fn push_escaped(text: &str, out: &mut String) {
    for c in text.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
}

//! Terminal-safe rendering of catalog text.
//!
//! Titles and overviews come from a third-party API and are drawn straight
//! into the terminal. Escape sequences there could move the cursor, rewrite
//! the screen, or set the clipboard (OSC 52), so they are stripped before
//! display. Every card renders on one line, so line breaks fold to spaces.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Strip escape sequences and control characters from remote text.
///
/// `\n`, `\r`, and `\t` become single spaces. Returns `Cow::Borrowed` when the
/// input is already clean.
///
/// ```
/// use reel_types::sanitize_display_text;
///
/// assert_eq!(sanitize_display_text("Parasite"), "Parasite");
/// assert_eq!(sanitize_display_text("Para\x1b[2Jsite"), "Parasite");
/// assert_eq!(sanitize_display_text("two\nlines"), "two lines");
/// ```
#[must_use]
pub fn sanitize_display_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            '\n' | '\r' | '\t' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            '\u{009b}' => skip_csi(&mut chars),
            c if is_control(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_unsafe(c: char) -> bool {
    is_control(c) || c == ESC
}

fn is_control(c: char) -> bool {
    c <= '\x1f' || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c)
}

fn skip_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    match chars.peek() {
        Some('[') => {
            chars.next();
            skip_csi(chars);
        }
        Some(']') => {
            chars.next();
            // OSC runs until BEL or ST (ESC \).
            while let Some(c) = chars.next() {
                if c == BEL {
                    return;
                }
                if c == ESC && chars.peek() == Some(&'\\') {
                    chars.next();
                    return;
                }
            }
        }
        Some('P' | '^' | '_') => {
            chars.next();
            while let Some(c) = chars.next() {
                if c == ESC && chars.peek() == Some(&'\\') {
                    chars.next();
                    return;
                }
            }
        }
        Some('(' | ')' | '*' | '+' | '#' | ' ') => {
            chars.next();
            chars.next();
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

/// Parameter and intermediate bytes, then one final byte.
fn skip_csi<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        } else if ('\x20'..='\x3f').contains(&c) {
            chars.next();
        } else {
            return;
        }
    }
}

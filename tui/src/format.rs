use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use reel_engine::{Movie, TextField};
use reel_types::sanitize_display_text;

use crate::theme::Glyphs;

/// Cut `text` to at most `max` display columns, ending in `…` when cut.
pub(crate) fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if width + w + 1 > max {
            break;
        }
        out.push_str(grapheme);
        width += w;
    }
    out.push('…');
    out
}

/// Display-safe title.
pub(crate) fn title(movie: &Movie) -> String {
    let title = sanitize_display_text(&movie.title);
    if title.trim().is_empty() {
        "Untitled".to_string()
    } else {
        title.into_owned()
    }
}

/// "☆ 7.5  2023", leaving out what TMDB did not send.
pub(crate) fn rating_and_year(movie: &Movie, glyphs: &Glyphs) -> String {
    let mut out = format!("{} {:.1}", glyphs.rating, movie.vote_average);
    if let Some(year) = movie.release_year() {
        out.push_str(&format!("  {year}"));
    }
    out
}

pub(crate) fn overview(movie: &Movie) -> String {
    movie
        .overview
        .as_deref()
        .map(|text| sanitize_display_text(text).into_owned())
        .unwrap_or_else(|| "No overview available.".to_string())
}

/// Masked password: one glyph per grapheme.
pub(crate) fn mask(text: &str, glyph: &str) -> String {
    glyph.repeat(text.graphemes(true).count())
}

/// Display columns between the start of `field` and its cursor.
pub(crate) fn cursor_column(field: &TextField) -> usize {
    field
        .text()
        .graphemes(true)
        .take(field.cursor())
        .map(UnicodeWidthStr::width)
        .sum()
}

//! Card grid shared by the popular table, the feeds, search, and the wishlist.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use reel_engine::{App, FeedView, Movie, Pager};

use crate::format::{rating_and_year, title, truncate_to_width};
use crate::theme::{Glyphs, Palette, spinner_frame, styles};

pub(crate) const CARD_WIDTH: u16 = 24;
pub(crate) const CARD_HEIGHT: u16 = 4;

/// How many cards fit in `area`, as (columns, rows).
pub(crate) fn capacity(area: Rect) -> (usize, usize) {
    let columns = (area.width / CARD_WIDTH).max(1);
    let rows = (area.height / CARD_HEIGHT).max(1);
    (usize::from(columns), usize::from(rows))
}

pub(crate) fn draw_card(
    frame: &mut Frame,
    area: Rect,
    movie: &Movie,
    selected: bool,
    wishlisted: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (style, border) = if selected {
        (styles::card_selected(palette), palette.accent)
    } else {
        (styles::card(palette), palette.bg_border)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(style);
    let inner_width = usize::from(area.width.saturating_sub(2));

    let mut title_spans = Vec::new();
    let mut budget = inner_width;
    if wishlisted {
        title_spans.push(Span::styled(
            format!("{} ", glyphs.wishlisted),
            Style::default().fg(palette.rating),
        ));
        budget = budget.saturating_sub(2);
    }
    title_spans.push(Span::raw(truncate_to_width(&title(movie), budget)));

    let meta = Span::styled(
        truncate_to_width(&rating_and_year(movie, glyphs), inner_width),
        Style::default().fg(palette.text_muted),
    );
    let card = Paragraph::new(vec![Line::from(title_spans), Line::from(meta)]).block(block);
    frame.render_widget(card, area);
}

/// Lay out grid rows of cards from the top-left of `area`.
#[allow(clippy::too_many_arguments)]
fn draw_rows(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    rows: &[&[Movie]],
    first_index: usize,
    selected: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let columns = rows.first().map_or(1, |row| row.len().max(1));
    for (r, row) in rows.iter().enumerate() {
        let y = area.y + (r as u16) * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        for (c, movie) in row.iter().enumerate() {
            let x = area.x + (c as u16) * CARD_WIDTH;
            if x + CARD_WIDTH > area.x + area.width + 1 {
                break;
            }
            let rect = Rect {
                x,
                y,
                width: CARD_WIDTH - 1,
                height: CARD_HEIGHT,
            };
            let index = first_index + r * columns + c;
            draw_card(
                frame,
                rect,
                movie,
                index == selected,
                app.is_wishlisted(movie.id),
                palette,
                glyphs,
            );
        }
    }
}

/// Current pager page plus an "n / total" line under it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_paged(
    frame: &mut Frame,
    grid: Rect,
    status: Rect,
    app: &App,
    movies: &[Movie],
    pager: &Pager,
    selected: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let rows = pager.visible_rows(movies);
    let first = pager.page_range(movies.len()).start;
    draw_rows(frame, grid, app, &rows, first, selected, palette, glyphs);

    let indicator = format!(
        "{} {} / {} {}",
        glyphs.arrow_left,
        pager.page(),
        pager.page_count(movies.len()),
        glyphs.arrow_right
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            indicator,
            Style::default().fg(palette.text_secondary),
        )))
        .centered(),
        status,
    );
}

/// Window of an infinite feed that keeps the selection on screen.
pub(crate) fn draw_feed(
    frame: &mut Frame,
    grid: Rect,
    status: Rect,
    app: &App,
    view: &FeedView,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (_, visible_rows) = capacity(grid);
    let columns = view.columns();
    let movies = view.feed().movies();
    let selected_row = view.selected() / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);
    let start = (first_row * columns).min(movies.len());
    let end = ((first_row + visible_rows) * columns).min(movies.len());
    let rows: Vec<&[Movie]> = movies[start..end].chunks(columns).collect();
    draw_rows(frame, grid, app, &rows, start, view.selected(), palette, glyphs);

    let feed = view.feed();
    let text = if feed.is_loading() {
        format!("{} Loading…", spinner_frame(app.tick_count(), app.ui()))
    } else if feed.is_empty() && !feed.has_more() {
        "No movies found.".to_string()
    } else if !feed.has_more() {
        format!("{} movies {} end of results", feed.len(), glyphs.separator)
    } else {
        format!("{} movies", feed.len())
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(palette.text_secondary),
        )))
        .centered(),
        status,
    );
}

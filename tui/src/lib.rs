//! TUI rendering for Reel using ratatui.

mod format;
mod grid;
mod home;
mod input;
mod sign_in;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use reel_engine::{App, NoticeLevel, PopularView, Route};
use reel_tmdb::{ImageSize, image_url};

use self::format::{cursor_column, rating_and_year, title, truncate_to_width};
use self::grid::{capacity, draw_feed, draw_paged};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Screen
            Constraint::Length(1), // Selected movie
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let (sub, grid_area, grid_status) = split_body(chunks[1]);
    // The engine sizes its pages from the last frame's grid.
    match app.route() {
        Route::SignIn => {}
        Route::Home => app.set_home_layout(home::cards_per_row(chunks[1].width)),
        _ => {
            let (columns, rows) = capacity(grid_area);
            app.set_grid_layout(columns, rows);
        }
    }
    let app: &App = app;

    draw_header(frame, app, chunks[0], &palette);
    match app.route() {
        Route::SignIn => sign_in::draw(frame, app, chunks[1], &palette, &glyphs),
        Route::Home => home::draw(frame, app, chunks[1], &palette, &glyphs),
        Route::Popular => {
            draw_popular(frame, app, sub, grid_area, grid_status, &palette, &glyphs);
        }
        Route::Wishlist => {
            draw_wishlist(frame, app, sub, grid_area, grid_status, &palette, &glyphs);
        }
        Route::Search => {
            draw_search(frame, app, sub, grid_area, grid_status, &palette, &glyphs);
        }
    }
    draw_selection(frame, app, chunks[2], &palette, &glyphs);
    draw_status_bar(frame, app, chunks[3], &palette, &glyphs);
}

/// Subheading, card grid, and the line under the grid.
fn split_body(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mut spans = vec![Span::styled(" REEL ", styles::brand(palette)), Span::raw(" ")];
    if app.route() != Route::SignIn {
        for (index, route) in Route::TABS.iter().enumerate() {
            let style = if *route == app.route() {
                styles::tab_active(palette)
            } else {
                styles::tab_inactive(palette)
            };
            spans.push(Span::styled(
                format!(" {} {} ", index + 1, route.title()),
                style,
            ));
            spans.push(Span::raw(" "));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if let Some(user) = app.current_user() {
        let user = Paragraph::new(Line::from(Span::styled(
            format!("{user} "),
            Style::default().fg(palette.text_secondary),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(user, area);
    }
}

fn subheading(frame: &mut Frame, area: Rect, text: String, palette: &Palette) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default()
                .fg(palette.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))),
        area,
    );
}

fn placeholder(frame: &mut Frame, area: Rect, text: String, palette: &Palette) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(palette.text_muted),
        )))
        .centered(),
        Rect {
            y: area.y + area.height / 2,
            height: 1.min(area.height),
            ..area
        },
    );
}

fn draw_popular(
    frame: &mut Frame,
    app: &App,
    sub: Rect,
    grid_area: Rect,
    grid_status: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let popular = app.popular();
    let view = match popular.view() {
        PopularView::Table => "Table view",
        PopularView::Infinite => "Infinite scroll",
    };
    subheading(frame, sub, format!(" Popular {} {view}", glyphs.separator), palette);

    match popular.view() {
        PopularView::Table => {
            let table = popular.table();
            if table.movies().is_empty() {
                let text = if table.is_loading() {
                    format!("{} Loading…", spinner_frame(app.tick_count(), app.ui()))
                } else {
                    "No movies found.".to_string()
                };
                placeholder(frame, grid_area, text, palette);
                return;
            }
            draw_paged(
                frame,
                grid_area,
                grid_status,
                app,
                table.movies(),
                table.pager(),
                table.selected(),
                palette,
                glyphs,
            );
        }
        PopularView::Infinite => {
            draw_feed(frame, grid_area, grid_status, app, popular.feed(), palette, glyphs);
        }
    }
}

fn draw_wishlist(
    frame: &mut Frame,
    app: &App,
    sub: Rect,
    grid_area: Rect,
    grid_status: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let movies = app.wishlist().movies();
    subheading(frame, sub, format!(" My List {} {} saved", glyphs.separator, movies.len()), palette);
    if movies.is_empty() {
        placeholder(frame, grid_area, "Your wishlist is empty.".to_string(), palette);
        return;
    }
    let view = app.wishlist_view();
    draw_paged(
        frame,
        grid_area,
        grid_status,
        app,
        movies,
        view.pager(),
        view.selected(),
        palette,
        glyphs,
    );
}

fn draw_search(
    frame: &mut Frame,
    app: &App,
    sub: Rect,
    grid_area: Rect,
    grid_status: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let search = app.search();
    let filter = search.filter();
    let label = Style::default().fg(palette.text_muted);
    let value = Style::default().fg(palette.accent);
    let mut spans = vec![
        Span::styled(" Genre ", label),
        Span::styled(filter.genre.label(), value),
        Span::styled(format!(" {} Rating ", glyphs.separator), label),
        Span::styled(filter.rating.label(), value),
        Span::styled(format!(" {} Language ", glyphs.separator), label),
        Span::styled(filter.language.label(), value),
        Span::styled(format!(" {} Search ", glyphs.separator), label),
    ];
    let query_x = sub.x + Line::from(spans.clone()).width() as u16;
    if search.is_editing_query() {
        spans.push(Span::styled(
            search.query().text().to_string(),
            Style::default()
                .fg(palette.text_primary)
                .bg(palette.bg_highlight),
        ));
        let cursor = query_x + cursor_column(search.query()) as u16;
        if cursor < sub.x + sub.width {
            frame.set_cursor_position((cursor, sub.y));
        }
    } else if search.applied_query().is_empty() {
        spans.push(Span::styled("press / to type", styles::key_hint(palette)));
    } else {
        spans.push(Span::styled(format!("\"{}\"", search.applied_query()), value));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), sub);

    draw_feed(frame, grid_area, grid_status, app, search.feed(), palette, glyphs);
}

/// One-line details of the movie under the cursor.
fn draw_selection(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let Some(movie) = app.selected_movie() else {
        return;
    };
    let separator = Span::styled(format!(" {} ", glyphs.separator), styles::key_hint(palette));
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            title(movie),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        separator.clone(),
        Span::styled(rating_and_year(movie, glyphs), Style::default().fg(palette.rating)),
    ];
    if !movie.original_language.is_empty() {
        spans.push(separator.clone());
        spans.push(Span::styled(
            movie.original_language.clone(),
            Style::default().fg(palette.text_secondary),
        ));
    }
    if app.is_wishlisted(movie.id) {
        spans.push(separator.clone());
        spans.push(Span::styled(
            format!("{} in your list", glyphs.wishlisted),
            Style::default().fg(palette.rating),
        ));
    }
    spans.push(separator);
    let used = Line::from(spans.clone()).width();
    let poster = image_url(
        &app.settings().image_base_url,
        ImageSize::W300,
        movie.poster_path.as_deref(),
    );
    spans.push(Span::styled(
        truncate_to_width(&poster, usize::from(area.width).saturating_sub(used)),
        styles::key_hint(palette),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_hints(route: Route) -> &'static [(&'static str, &'static str)] {
    match route {
        Route::SignIn => &[],
        Route::Home => &[
            ("up/down", "row"),
            ("left/right", "movie"),
            ("n/p", "slide"),
            ("Enter", "wishlist"),
            ("1-4", "tabs"),
            ("L", "logout"),
            ("q", "quit"),
        ],
        Route::Popular => &[
            ("arrows", "move"),
            ("n/p", "page"),
            ("v", "view"),
            ("t", "top"),
            ("Enter", "wishlist"),
            ("q", "quit"),
        ],
        Route::Wishlist => &[
            ("arrows", "move"),
            ("n/p", "page"),
            ("Enter", "remove"),
            ("q", "quit"),
        ],
        Route::Search => &[
            ("/", "search"),
            ("g", "genre"),
            ("r", "rating"),
            ("l", "language"),
            ("c", "clear"),
            ("t", "top"),
            ("Enter", "wishlist"),
        ],
    }
}

pub(crate) fn draw_status_bar(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let line = if let Some(notice) = app.current_notice() {
        let prefix = match notice.level {
            NoticeLevel::Error => "Error: ",
            NoticeLevel::Warning => "Warning: ",
            NoticeLevel::Success => "Success: ",
            NoticeLevel::Info => "",
        };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{prefix}{}", notice.text),
                Style::default().fg(palette.notice(notice.level)),
            ),
        ])
    } else if app.search().is_editing_query() && app.route() == Route::Search {
        Line::from(vec![
            Span::raw(" "),
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" apply  ", styles::key_hint(palette)),
            Span::styled("Esc", styles::key_highlight(palette)),
            Span::styled(" cancel", styles::key_hint(palette)),
        ])
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (index, (key, action)) in key_hints(app.route()).iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled(format!(" {} ", glyphs.bullet), styles::key_hint(palette)));
            }
            spans.push(Span::styled(*key, styles::key_highlight(palette)));
            spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), area);
}

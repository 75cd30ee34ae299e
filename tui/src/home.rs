//! Home screen: featured banner over three sliding rows.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use reel_engine::{App, HomeRow};

use crate::format::{overview, rating_and_year, title};
use crate::grid::{CARD_HEIGHT, CARD_WIDTH, draw_card};
use crate::theme::{Glyphs, Palette, spinner_frame, styles};

const BANNER_HEIGHT: u16 = 6;
const ROW_HEIGHT: u16 = CARD_HEIGHT + 1;

/// Cards that fit across one row.
pub(crate) fn cards_per_row(width: u16) -> usize {
    usize::from((width / CARD_WIDTH).max(1))
}

pub(crate) fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let home = app.home();
    let mut constraints = vec![Constraint::Length(BANNER_HEIGHT)];
    constraints.extend(home.rows().iter().map(|_| Constraint::Length(ROW_HEIGHT)));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_banner(frame, app, chunks[0], palette, glyphs);
    for (index, row) in home.rows().iter().enumerate() {
        let focused = index == home.focused_row();
        draw_row(frame, app, row, focused, chunks[index + 1], palette, glyphs);
    }
}

fn draw_banner(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .title(Span::styled(" Featured ", styles::brand(palette)));

    let lines = if let Some(movie) = app.home().featured() {
        vec![
            Line::from(Span::styled(
                title(movie),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                rating_and_year(movie, glyphs),
                Style::default().fg(palette.rating),
            )),
            Line::from(Span::styled(
                overview(movie),
                Style::default().fg(palette.text_secondary),
            )),
        ]
    } else if app.home().is_featured_loading() {
        vec![Line::from(Span::styled(
            format!("{} Loading…", spinner_frame(app.tick_count(), app.ui())),
            Style::default().fg(palette.text_muted),
        ))]
    } else {
        vec![Line::from(Span::styled(
            "Nothing featured right now.",
            Style::default().fg(palette.text_muted),
        ))]
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_row(
    frame: &mut Frame,
    app: &App,
    row: &HomeRow,
    focused: bool,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    if area.height == 0 {
        return;
    }
    let heading_style = if focused {
        styles::focused_label(palette)
    } else {
        Style::default().fg(palette.text_secondary)
    };
    let marker = if focused { glyphs.selected } else { " " };
    let mut heading = vec![Span::styled(format!("{marker} {}", row.title()), heading_style)];
    if row.offset() > 0 {
        heading.push(Span::styled(
            format!("  {}", glyphs.arrow_left),
            styles::key_hint(palette),
        ));
    }
    if row.offset() + row.visible_movies().len() < row.movies().len() {
        heading.push(Span::styled(
            format!("  {}", glyphs.arrow_right),
            styles::key_hint(palette),
        ));
    }
    if row.is_loading() {
        heading.push(Span::styled(
            format!("  {}", spinner_frame(app.tick_count(), app.ui())),
            styles::key_hint(palette),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(heading)),
        Rect { height: 1, ..area },
    );

    let cards_y = area.y + 1;
    if area.height < ROW_HEIGHT {
        return;
    }
    for (slot, movie) in row.visible_movies().iter().enumerate() {
        let x = area.x + (slot as u16) * CARD_WIDTH;
        if x + CARD_WIDTH > area.x + area.width + 1 {
            break;
        }
        let rect = Rect {
            x,
            y: cards_y,
            width: CARD_WIDTH - 1,
            height: CARD_HEIGHT,
        };
        let selected = focused && row.offset() + slot == row.selected();
        draw_card(
            frame,
            rect,
            movie,
            selected,
            app.is_wishlisted(movie.id),
            palette,
            glyphs,
        );
    }
}

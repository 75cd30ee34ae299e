//! Login and registration cards.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};

use reel_engine::{App, AuthCard, AuthField, AuthForm, TextField};

use crate::format::{cursor_column, mask, truncate_to_width};
use crate::theme::{Glyphs, Palette, styles};

const CARD_WIDTH: u16 = 54;
const LABEL_WIDTH: usize = 18;
/// Marker column plus the label column.
const VALUE_OFFSET: u16 = 2 + LABEL_WIDTH as u16;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn label(field: AuthField, card: AuthCard) -> &'static str {
    match (field, card) {
        (AuthField::Email, _) => "Email",
        (AuthField::Password, _) => "Password (API key)",
        (AuthField::ConfirmPassword, _) => "Confirm password",
        (AuthField::RememberMe, _) => "Remember me",
        (AuthField::AcceptTerms, _) => "I accept the terms and conditions",
        (AuthField::Submit, AuthCard::Login) => "[ Sign in ]",
        (AuthField::Submit, AuthCard::Register) => "[ Create account ]",
        (AuthField::SwitchCard, AuthCard::Login) => "Create an account",
        (AuthField::SwitchCard, AuthCard::Register) => "Back to sign in",
    }
}

fn text_of(form: &AuthForm, field: AuthField) -> Option<&TextField> {
    match (form.card(), field) {
        (AuthCard::Login, AuthField::Email) => Some(&form.email),
        (AuthCard::Login, AuthField::Password) => Some(&form.password),
        (AuthCard::Register, AuthField::Email) => Some(&form.register_email),
        (AuthCard::Register, AuthField::Password) => Some(&form.register_password),
        (AuthCard::Register, AuthField::ConfirmPassword) => Some(&form.confirm_password),
        _ => None,
    }
}

pub(crate) fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let form = app.auth_form();
    let fields = form.fields();
    // Title, spacer, fields, spacer, hint, borders and padding.
    let height = fields.len() as u16 + 8;
    let card_area = centered(area, CARD_WIDTH, height);
    frame.render_widget(Clear, card_area);

    let heading = match form.card() {
        AuthCard::Login => " Sign in to Reel ",
        AuthCard::Register => " Create your account ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .title(Span::styled(heading, styles::brand(palette)))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_panel));
    let inner = block.inner(card_area);
    let value_width = usize::from(inner.width.saturating_sub(VALUE_OFFSET));

    let mut lines = vec![
        Line::from(Span::styled(
            "Your TMDB API key doubles as your password.",
            Style::default().fg(palette.text_muted),
        )),
        Line::raw(""),
    ];
    let mut cursor = None;

    for &field in fields {
        let focused = form.focused() == field;
        let marker = if focused { glyphs.selected } else { " " };
        let label_style = if focused {
            styles::focused_label(palette)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        let mut spans = vec![Span::styled(format!("{marker} "), label_style)];

        match field {
            AuthField::Email | AuthField::Password | AuthField::ConfirmPassword => {
                let Some(text) = text_of(form, field) else {
                    continue;
                };
                let shown = if field == AuthField::Email {
                    text.text().to_string()
                } else {
                    mask(text.text(), glyphs.mask)
                };
                spans.push(Span::styled(
                    format!("{:<LABEL_WIDTH$}", label(field, form.card())),
                    label_style,
                ));
                spans.push(Span::styled(
                    truncate_to_width(&shown, value_width),
                    Style::default()
                        .fg(palette.text_primary)
                        .bg(palette.bg_highlight),
                ));
                if focused {
                    let column = if field == AuthField::Email {
                        cursor_column(text)
                    } else {
                        text.cursor()
                    };
                    let column = column.min(value_width) as u16;
                    cursor = Some((
                        inner.x + VALUE_OFFSET + column,
                        inner.y + lines.len() as u16,
                    ));
                }
            }
            AuthField::RememberMe | AuthField::AcceptTerms => {
                let checked = match field {
                    AuthField::RememberMe => form.remember_me,
                    _ => form.accept_terms,
                };
                let mark = if checked {
                    glyphs.checkbox_on
                } else {
                    glyphs.checkbox_off
                };
                spans.push(Span::styled(format!("{mark} "), label_style));
                spans.push(Span::styled(label(field, form.card()), label_style));
            }
            AuthField::Submit => {
                let style = if focused {
                    styles::tab_active(palette)
                } else {
                    styles::brand(palette)
                };
                spans.push(Span::styled(label(field, form.card()), style));
            }
            AuthField::SwitchCard => {
                spans.push(Span::styled(
                    label(field, form.card()),
                    label_style.add_modifier(Modifier::UNDERLINED),
                ));
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Tab", styles::key_highlight(palette)),
        Span::styled(" next  ", styles::key_hint(palette)),
        Span::styled("Enter", styles::key_highlight(palette)),
        Span::styled(" select  ", styles::key_hint(palette)),
        Span::styled("Ctrl-N", styles::key_highlight(palette)),
        Span::styled(" switch  ", styles::key_hint(palette)),
        Span::styled("Ctrl-C", styles::key_highlight(palette)),
        Span::styled(" quit", styles::key_hint(palette)),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), card_area);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::centered_rect;

use crate::action::Action;
use crate::present;
use crate::state::{AppState, CardSlot, CatalogEntry, DetailRecord};

const BG_BASE: Color = Color::Rgb(17, 17, 17);
const BG_PANEL: Color = Color::Rgb(26, 26, 26);
const BG_CARD: Color = Color::Rgb(42, 42, 42);
const BG_SKELETON: Color = Color::Rgb(51, 51, 51);
const DEX_RED: Color = Color::Rgb(230, 0, 18);
const TEXT_MAIN: Color = Color::Rgb(245, 245, 245);
const TEXT_DIM: Color = Color::Rgb(160, 160, 160);
const ACCENT_GOLD: Color = Color::Rgb(250, 204, 21);

pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 5;
const OVERLAY_WIDTH: u16 = 56;
const OVERLAY_HEIGHT: u16 = 24;
const STAT_BAR_WIDTH: u16 = 24;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Screen regions produced by a render pass, used for event routing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppAreas {
    pub grid: Rect,
    pub search: Rect,
    pub overlay: Option<Rect>,
    pub columns: usize,
}

pub fn grid_columns(width: u16) -> usize {
    (width.saturating_sub(2) / CARD_WIDTH).max(1) as usize
}

pub fn render_app(frame: &mut Frame, area: Rect, state: &AppState) -> AppAreas {
    frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT + 2),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, layout[0], state);
    let columns = render_grid(frame, layout[1], state);
    render_search(frame, layout[2], state);

    let overlay = state.selection.entry().map(|entry| {
        let modal = overlay_area(area);
        render_overlay(frame, modal, state, entry);
        modal
    });

    AppAreas {
        grid: layout[1],
        search: layout[2],
        overlay,
        columns,
    }
}

pub fn handle_grid_event(event: &EventKind, state: &AppState, columns: usize) -> Vec<Action> {
    let EventKind::Key(key) = event else {
        return Vec::new();
    };
    let row = columns.min(i16::MAX as usize) as i16;
    match key.code {
        KeyCode::Left => vec![Action::CursorMove(-1)],
        KeyCode::Right => vec![Action::CursorMove(1)],
        KeyCode::Up => vec![Action::CursorMove(-row)],
        KeyCode::Down => vec![Action::CursorMove(row)],
        KeyCode::Home => vec![Action::CursorMove(i16::MIN)],
        KeyCode::End => vec![Action::CursorMove(i16::MAX)],
        KeyCode::Enter => state
            .cursor_entry()
            .map(|entry| vec![Action::CardActivate(entry.name)])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// The overlay stays navigable: moving and activating another card replaces
/// the selection in place.
pub fn handle_overlay_event(event: &EventKind, state: &AppState, columns: usize) -> Vec<Action> {
    match event {
        EventKind::Key(key) if matches!(key.code, KeyCode::Esc | KeyCode::Backspace) => {
            vec![Action::OverlayClose]
        }
        _ => handle_grid_event(event, state, columns),
    }
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> Vec<Action> {
    match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default()
        .fg(TEXT_MAIN)
        .add_modifier(Modifier::BOLD);
    let visible = state.visible_entries().len();
    let status = if state.catalog_loading {
        Span::styled(
            format!("{} loading catalog", spinner(state.tick)),
            Style::default().fg(ACCENT_GOLD),
        )
    } else if state.catalog.is_empty() {
        Span::styled("catalog unavailable", Style::default().fg(TEXT_DIM))
    } else {
        Span::styled(
            format!("{visible}/{} shown", state.catalog.len()),
            Style::default().fg(ACCENT_GOLD),
        )
    };
    let line = Line::from(vec![
        Span::styled("POKEDEX", title_style),
        Span::raw("  |  "),
        status,
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(DEX_RED).fg(TEXT_MAIN));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState) -> usize {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = grid_columns(area.width);
    if state.catalog_loading {
        let text = Paragraph::new(format!("{} fetching catalog", spinner(state.tick)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(text, inner);
        return columns;
    }

    let entries = state.visible_entries();
    if entries.is_empty() {
        let message = if state.catalog.is_empty() {
            "No Pokemon loaded."
        } else {
            "No Pokemon match your search."
        };
        let text = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(text, inner);
        return columns;
    }

    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let cursor_row = state.cursor / columns;
    let first_row = (cursor_row + 1).saturating_sub(visible_rows);

    for (index, entry) in entries.iter().enumerate().skip(first_row * columns) {
        let row = index / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let column = index % columns;
        let x = inner.x + column as u16 * CARD_WIDTH;
        let y = inner.y + row as u16 * CARD_HEIGHT;
        let width = CARD_WIDTH.min(inner.right().saturating_sub(x));
        let height = CARD_HEIGHT.min(inner.bottom().saturating_sub(y));
        if width == 0 || height == 0 {
            continue;
        }
        let card_area = Rect::new(x, y, width, height);
        render_card(
            frame,
            card_area,
            state.card(&entry.name),
            index == state.cursor,
            state.tick,
        );
    }
    columns
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    slot: Option<&CardSlot>,
    highlighted: bool,
    tick: u64,
) {
    let border = if highlighted {
        Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(BG_CARD).fg(TEXT_MAIN));

    let text = match slot {
        Some(CardSlot {
            detail: Some(detail),
            ..
        }) => card_text(detail),
        Some(CardSlot { loading: true, .. }) | None => skeleton_text(tick, 3),
        Some(_) => Text::default(),
    };

    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn card_text(detail: &DetailRecord) -> Text<'static> {
    Text::from(vec![
        Line::from(Span::styled(
            present::title_case(&detail.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(type_badges(&detail.types)),
        Line::from(Span::styled(
            present::dex_number(detail.id),
            Style::default().fg(TEXT_DIM),
        )),
    ])
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let content = if state.search.active {
        Line::from(vec![
            Span::raw("/ "),
            Span::styled(
                format!("{}_", state.search.query),
                Style::default().fg(TEXT_MAIN),
            ),
        ])
    } else if state.search.query.is_empty() {
        Line::from(Span::styled(
            "/ Search Pokemon...",
            Style::default().fg(TEXT_DIM),
        ))
    } else {
        Line::from(vec![
            Span::raw("/ "),
            Span::styled(state.search.query.clone(), Style::default().fg(ACCENT_GOLD)),
        ])
    };
    let hints = if state.search.active {
        " enter: apply  esc: clear "
    } else {
        " arrows: move  enter: open  esc: close  q: quit "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(hints)
        .title_alignment(Alignment::Right)
        .style(Style::default().bg(BG_CARD).fg(TEXT_DIM));
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_overlay(frame: &mut Frame, area: Rect, state: &AppState, entry: &CatalogEntry) {
    frame.render_widget(Clear, area);
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", present::title_case(&entry.name)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(" [esc] close ").right_aligned())
        .border_style(Style::default().fg(DEX_RED))
        .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN));

    let body = match (&state.overlay.detail, state.overlay.loading) {
        (Some(detail), _) => overlay_text(detail),
        (None, true) => skeleton_text(state.tick, 6),
        (None, false) => Text::default(),
    };

    frame.render_widget(
        Paragraph::new(body)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn overlay_text(detail: &DetailRecord) -> Text<'static> {
    let bar_color = present::type_color(detail.primary_type().unwrap_or_default());
    let label = Style::default().fg(TEXT_DIM);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(present::dex_number(detail.id), label),
            Span::raw("  "),
            Span::raw(detail.sprite.clone().unwrap_or_else(|| "no sprite".to_string())),
        ]),
        Line::from(type_badges(&detail.types)),
        Line::default(),
        Line::from(vec![
            Span::styled("Height ", label),
            Span::raw(format!("{}m", present::height_meters(detail.height))),
            Span::raw("    "),
            Span::styled("Weight ", label),
            Span::raw(format!("{}kg", present::weight_kilograms(detail.weight))),
        ]),
        Line::default(),
        Line::from(Span::styled("Abilities", label)),
        Line::from(
            detail
                .abilities
                .iter()
                .map(|ability| format!(" {} ", present::title_case(ability)))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Line::default(),
        Line::from(Span::styled("Stats", label)),
    ];
    lines.extend(
        detail
            .stats
            .iter()
            .map(|stat| stat_line(&stat.name, stat.base, bar_color)),
    );
    Text::from(lines)
}

fn stat_line(name: &str, base: u16, color: Color) -> Line<'static> {
    let filled = present::stat_bar_cells(base, STAT_BAR_WIDTH);
    let empty = STAT_BAR_WIDTH - filled;
    Line::from(vec![
        Span::styled(
            format!("{:<7}", present::stat_label(name)),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled("█".repeat(filled as usize), Style::default().fg(color)),
        Span::styled("░".repeat(empty as usize), Style::default().fg(BG_SKELETON)),
        Span::raw(format!(" {base:>3}")),
    ])
}

fn type_badges(types: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(types.len() * 2);
    for (index, type_name) in types.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {type_name} "),
            Style::default()
                .bg(present::type_color(type_name))
                .fg(present::type_text_color(type_name)),
        ));
    }
    spans
}

fn skeleton_text(tick: u64, rows: usize) -> Text<'static> {
    let shade = if tick % 2 == 0 { BG_SKELETON } else { BG_CARD };
    let mut lines = vec![Line::from(spinner(tick))];
    lines.extend((1..rows).map(|_| {
        Line::from(Span::styled("          ", Style::default().bg(shade)))
    }));
    Text::from(lines)
}

fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

fn overlay_area(area: Rect) -> Rect {
    centered_rect(
        OVERLAY_WIDTH.min(area.width),
        OVERLAY_HEIGHT.min(area.height),
        area,
    )
}

// ui.rs - Draws the board, hotkey list and debug panel with ratatui

use conway::{Boundary, Grid};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph};

use crate::app::{App, HOTKEYS};

const SIDEBAR_WIDTH: u16 = 29;

pub fn draw(frame: &mut Frame, app: &App) {
    let [header, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)])
        .areas(frame.area());
    let [board, sidebar] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)]).areas(body);
    let [keys, debug] = Layout::vertical([
        Constraint::Length(HOTKEYS.len() as u16 + 2),
        Constraint::Min(4),
    ])
    .areas(sidebar);

    let runner = app.runner();
    let cursor = app.edit_mode.then_some(app.cursor);
    let (title, lines) = runner.read(|grid| (status_line(grid, app), board_lines(grid, cursor)));

    frame.render_widget(
        Paragraph::new(title).block(Block::bordered().title(" Game of Life ")),
        header,
    );
    frame.render_widget(Paragraph::new(lines), centered(board, app));
    frame.render_widget(hotkeys(), keys);
    frame.render_widget(debug_panel(app), debug);
}

fn status_line(grid: &Grid, app: &App) -> Line<'static> {
    let mode = if app.runner().is_running() {
        "running"
    } else if app.edit_mode {
        "edit"
    } else {
        "paused"
    };
    Line::from(format!(
        "step {}  alive {}  interval {} ms  {}  {}  [{}]",
        grid.steps(),
        grid.alive(),
        app.runner().interval().as_millis(),
        grid.rules(),
        grid.boundary(),
        mode,
    ))
}

/// Centers the board area, which is two columns per cell plus the ring.
fn centered(area: Rect, app: &App) -> Rect {
    let (rows, cols) = app.runner().read(|g| g.dimensions());
    let width = ((cols + 2) * 2) as u16;
    let height = (rows + 2) as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

pub fn boundary_glyph(boundary: Boundary) -> &'static str {
    match boundary {
        Boundary::Periodic => "#",
        Boundary::Empty    => ".",
        Boundary::Full     => "x",
    }
}

/// One line per row, framed by a ring of boundary glyphs.
pub fn board_lines(grid: &Grid, cursor: Option<(usize, usize)>) -> Vec<Line<'static>> {
    let ring = Style::new().fg(Color::Black).bg(Color::White);
    let glyph = boundary_glyph(grid.boundary());
    let edge = || Span::styled(glyph, ring);

    let ring_line = || {
        let mut spans = Vec::with_capacity(grid.cols() * 2 + 4);
        for _ in 0..grid.cols() + 2 {
            spans.push(edge());
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };

    let mut lines = Vec::with_capacity(grid.rows() + 2);
    lines.push(ring_line());
    for (r, row) in grid.iter_rows().enumerate() {
        let mut spans = Vec::with_capacity(row.len() * 2 + 3);
        spans.push(edge());
        spans.push(Span::raw(" "));
        for (c, &alive) in row.iter().enumerate() {
            let text = if alive { "x" } else { "." };
            let style = if cursor == Some((r, c)) {
                Style::new().add_modifier(Modifier::REVERSED)
            } else if alive {
                Style::new().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::new().fg(Color::DarkGray)
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }
        spans.push(edge());
        lines.push(Line::from(spans));
    }
    lines.push(ring_line());
    lines
}

fn hotkeys() -> List<'static> {
    let items = HOTKEYS.iter().map(|&entry| {
        if entry.contains(" - ") {
            ListItem::new(entry)
        } else {
            ListItem::new(Span::styled(entry, Style::new().add_modifier(Modifier::BOLD)))
        }
    });
    List::new(items).block(Block::bordered().title(" Hotkeys "))
}

fn debug_panel(app: &App) -> Paragraph<'_> {
    let mut lines = vec![Line::from(app.status.as_str())];
    if let Some(g) = app.last {
        lines.push(Line::from(format!("gen {}: +{} -{}", g.step, g.births, g.deaths)));
    }
    if app.edit_mode {
        lines.push(Line::from(format!("pattern: {}", app.pattern_name())));
    }
    Paragraph::new(lines)
}

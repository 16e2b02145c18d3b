//! Rendering. A pure projection of `App` state through the derived-state
//! helpers; the only write-back is recording the drawn viewport height so
//! the scroll keys know their step.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use skycast_core::{HeadlineView, forecast_window};

use crate::app::App;

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    app.viewport_height = chunks[0].height;

    render_today(f, app, chunks[0]);
    render_forecast(f, app, chunks[1]);
    render_help(f, chunks[2]);

    if app.show_input {
        render_input(f, app);
    }
}

fn render_today(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.location.is_empty() {
        "today".to_string()
    } else {
        format!("today · {}", app.location)
    };

    let lines = match app.current.as_ref() {
        Some(current) => today_lines(&HeadlineView::from_conditions(current)),
        None => vec![
            Line::from(""),
            Line::from("No weather data yet."),
            Line::from("Press m to enter a location."),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Center)
        .scroll((app.scroll, 0));
    f.render_widget(paragraph, area);
}

fn today_lines(view: &HeadlineView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            view.weekday.unwrap_or(""),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  {}", view.icon.glyph(), view.category),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!("{} 📍", view.place_name)),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}°C", view.temperature_c),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "wind {} m/s {}",
            view.wind_speed,
            arrow_glyph(view.wind_rotation_deg)
        )),
    ];

    if let (Some(sunrise), Some(sunset)) = (view.sunrise.as_deref(), view.sunset.as_deref()) {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("sunrise : {sunrise}")));
        lines.push(Line::from(format!("sunset : {sunset}")));
    }

    lines
}

fn render_forecast(f: &mut Frame, app: &App, area: Rect) {
    let cells = forecast_window(&app.forecast);
    if cells.is_empty() {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cells.len() as u32); cells.len()])
        .split(area);

    for (cell, column) in cells.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                cell.weekday,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{}  {}°C", cell.icon.glyph(), cell.temperature_c)),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, *column);
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Line::from(Span::styled(
        " m location · PageUp/PageDown scroll · q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(help), area);
}

fn render_input(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 3, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Enter your location"),
    );
    f.render_widget(paragraph, area);
}

/// Pick the arrow pointing along a rotation in degrees, where 0 is up and
/// the angle grows clockwise. The headline rotation is 180° + wind
/// direction, so calm air (direction 0) renders ↓.
pub fn arrow_glyph(rotation_deg: f64) -> &'static str {
    const ARROWS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];
    let normalized = rotation_deg.rem_euclid(360.0);
    ARROWS[((normalized + 22.5) / 45.0) as usize % 8]
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

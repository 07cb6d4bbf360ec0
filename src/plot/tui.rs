//! Terminal chart for the plotter.
//!
//! Alternate screen, redraws on a fixed cadence, `q` or `Esc` quits.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use super::Plotter;
use crate::error::RenderError;

/// Leaves raw mode and the alternate screen however `run` exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

pub fn run(snapshot: &Path, refresh: Duration) -> Result<(), RenderError> {
    let mut plotter = Plotter::new(snapshot, &Local::now());

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    event_loop(&mut terminal, &mut plotter, refresh)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    plotter: &mut Plotter,
    refresh: Duration,
) -> Result<(), RenderError> {
    let mut last_tick = Instant::now();
    let mut stale = false;

    loop {
        terminal.draw(|f| draw(f, plotter, stale))?;

        let timeout = refresh.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= refresh {
            // keep the old picture until the next reload works
            stale = plotter.tick(&Local::now()).is_err();
            last_tick = Instant::now();
        }
    }
}

fn draw(f: &mut Frame, plotter: &Plotter, stale: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let series = plotter.series();
    let origin = series.xs.first().copied();
    let points: Vec<(f64, f64)> = match origin {
        Some(origin) => series
            .xs
            .iter()
            .zip(&series.ys)
            .map(|(x, y)| ((*x - origin).num_seconds() as f64 / 3600.0, *y as f64))
            .collect(),
        None => Vec::new(),
    };

    let (x_labels, x_max, y_max) = match series.bounds() {
        Some(((x_min, x_max), (_, y_max))) => (
            vec![
                x_min.format("%m-%d %H:%M").to_string(),
                x_max.format("%m-%d %H:%M").to_string(),
            ],
            ((x_max - x_min).num_seconds() as f64 / 3600.0).max(1.0),
            (y_max as f64).max(1.0),
        ),
        None => (vec![String::new(), String::new()], 1.0, 1.0),
    };

    let dataset = Dataset::default()
        .name("posts this hour")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::White))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" posts per hour ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("time")
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("posts")
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{y_max:.0}")]),
        );

    f.render_widget(chart, chunks[0]);

    let totals = plotter.totals();
    let notice = if stale { "  could not update" } else { "" };
    let footer = Paragraph::new(Line::from(format!(
        " {} total posts, {} posts collected today, {} this hour   (q to quit){notice}",
        totals.total, totals.today, totals.this_hour
    )));
    f.render_widget(footer, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::terminal::is_raw_mode_enabled;

    fn setup_then_fail() -> io::Result<()> {
        let _guard = TerminalGuard::enter()?;
        Err(io::Error::other("backend unavailable"))
    }

    #[test]
    fn failed_setup_leaves_raw_mode_off() {
        // without a tty `enter` itself fails; with one the guard unwinds it
        assert!(setup_then_fail().is_err());
        assert!(!is_raw_mode_enabled().unwrap_or(false));
    }
}

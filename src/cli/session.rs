//! Interactive stopwatch session. This is the terminal stand-in for the
//! original single-window surface: a status line redrawn on a 200 ms tick,
//! driven by single-key commands in raw mode.

use std::{
    io::{stdout, Write},
    path::Path,
    time::Duration,
};

use ansi_term::Colour;
use anyhow::{anyhow, Result};
use chrono::Local;
use crossterm::{
    cursor::MoveToColumn,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    terminal::{self, Clear, ClearType},
};
use futures::StreamExt;
use tracing::{info, warn};

use crate::{
    timer::{Phase, StopOutcome, Timer},
    utils::{clock::DefaultClock, time::format_hms},
    workbook::{reference::load_reference, timesheet::append_time_entry, TIMESHEET_SHEET},
};

use super::configured_workbook;

const RENDER_INTERVAL: Duration = Duration::from_millis(200);
const KEY_HINTS: &str = "space start/pause, s stop+save, p/w switch, q quit";

/// One of the two dropdown stand-ins: a list plus the active index.
struct Selection {
    items: Vec<String>,
    index: usize,
}

impl Selection {
    /// `preferred` must name an existing item; `None` picks the first one.
    fn new(items: Vec<String>, preferred: Option<String>) -> Result<Self> {
        let index = match preferred {
            Some(name) => items
                .iter()
                .position(|v| *v == name)
                .ok_or_else(|| anyhow!("'{name}' is not present in the reference sheet"))?,
            None => 0,
        };
        Ok(Self { items, index })
    }

    fn current(&self) -> &str {
        &self.items[self.index]
    }

    fn cycle(&mut self) {
        self.index = (self.index + 1) % self.items.len();
    }
}

pub async fn run_track(
    app_dir: &Path,
    project: Option<String>,
    work_type: Option<String>,
) -> Result<()> {
    let path = configured_workbook(app_dir)?;

    // Guard before anything can start: the reference lists must be usable.
    let reference = load_reference(&path)?;
    reference.ensure_usable()?;

    let mut projects = Selection::new(reference.projects, project)?;
    let mut work_types = Selection::new(reference.work_types, work_type)?;
    let mut timer = Timer::new(DefaultClock);

    terminal::enable_raw_mode()?;
    let result = track_loop(&path, &mut projects, &mut work_types, &mut timer).await;
    terminal::disable_raw_mode()?;
    println!();

    if !timer.elapsed().is_zero() {
        eprintln!(
            "Discarded {} of unsaved time",
            format_hms(timer.elapsed().as_secs())
        );
    }
    result
}

async fn track_loop(
    path: &Path,
    projects: &mut Selection,
    work_types: &mut Selection,
    timer: &mut Timer,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(RENDER_INTERVAL);
    let mut notice = KEY_HINTS.to_string();

    loop {
        render(timer, projects, work_types, &notice)?;

        tokio::select! {
            _ = tick.tick() => {}
            event = events.next() => {
                let Some(event) = event else { break };
                let Event::Key(key) = event? else { continue };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(&key, path, projects, work_types, timer, &mut notice) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Returns true when the session should end.
fn handle_key(
    key: &KeyEvent,
    path: &Path,
    projects: &mut Selection,
    work_types: &mut Selection,
    timer: &mut Timer,
    notice: &mut String,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') => {
            if timer.is_running() {
                timer.pause();
                *notice = "paused".to_string();
            } else {
                timer.start();
                *notice = format!("tracking '{}'", projects.current());
            }
        }
        KeyCode::Char('s') | KeyCode::Enter => {
            stop_and_save(path, projects, work_types, timer, notice);
        }
        KeyCode::Char('p') => {
            if timer.is_running() {
                *notice = "pause before switching the project".to_string();
            } else {
                projects.cycle();
                *notice = KEY_HINTS.to_string();
            }
        }
        KeyCode::Char('w') => {
            if timer.is_running() {
                *notice = "pause before switching the work type".to_string();
            } else {
                work_types.cycle();
                *notice = KEY_HINTS.to_string();
            }
        }
        _ => {}
    }
    false
}

fn stop_and_save(
    path: &Path,
    projects: &Selection,
    work_types: &Selection,
    timer: &mut Timer,
    notice: &mut String,
) {
    let elapsed = match timer.stop() {
        StopOutcome::Discarded => {
            *notice = "nothing to save".to_string();
            return;
        }
        StopOutcome::Finished(elapsed) => elapsed,
    };

    match append_time_entry(
        path,
        projects.current(),
        work_types.current(),
        elapsed,
        Local::now(),
    ) {
        Ok(()) => {
            timer.reset();
            *notice = format!(
                "saved {} to '{TIMESHEET_SHEET}'",
                format_hms(elapsed.as_secs())
            );
            info!("Saved {elapsed:?} on '{}'", projects.current());
        }
        Err(e) => {
            // Elapsed stays frozen in the timer, `s` retries the write.
            warn!("Write-out failed, elapsed kept for retry: {e}");
            *notice = format!("save failed, elapsed kept: {e}");
        }
    }
}

fn render(
    timer: &Timer,
    projects: &Selection,
    work_types: &Selection,
    notice: &str,
) -> Result<()> {
    let tag = match timer.phase() {
        Phase::Idle => Colour::White.dimmed().paint("idle    "),
        Phase::Running => Colour::Green.bold().paint("tracking"),
        Phase::Paused => Colour::Yellow.bold().paint("paused  "),
    };
    let clock = ansi_term::Style::new()
        .bold()
        .paint(format_hms(timer.elapsed().as_secs()));

    let mut out = stdout();
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(
        out,
        "{tag} {clock}  {} / {}  | {notice}",
        projects.current(),
        work_types.current()
    )?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Selection;

    fn items() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn defaults_to_the_first_item() {
        let selection = Selection::new(items(), None).unwrap();
        assert_eq!(selection.current(), "A");
    }

    #[test]
    fn preferred_item_is_honored() {
        let selection = Selection::new(items(), Some("B".to_string())).unwrap();
        assert_eq!(selection.current(), "B");
    }

    #[test]
    fn unknown_preferred_item_is_rejected() {
        assert!(Selection::new(items(), Some("D".to_string())).is_err());
    }

    #[test]
    fn cycling_wraps_around() {
        let mut selection = Selection::new(items(), Some("C".to_string())).unwrap();
        selection.cycle();
        assert_eq!(selection.current(), "A");
    }
}

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Local};
use grabber_core::{update, AppState, Msg, Notice};
use grabber_logging::{grab_debug, grab_info, grab_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{self, Command};
use super::ui;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Line(String),
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    if !grabber_logging::initialize(&config.log) {
        eprintln!("Logging could not be initialised; continuing without it.");
    }
    grab_info!(
        "Starting with api_base={} ws_url={}",
        config.engine.api.base_url,
        config.engine.ws_url
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.engine.clone(), event_tx.clone())
        .context("failed to start engine")?;

    let stdout = io::stdout();
    let clear = stdout.is_terminal();
    let mut app = App::new(runner, stdout, clear);

    spawn_stdin_reader(event_tx.clone());
    // Background tick to coalesce renders.
    thread::spawn(move || {
        let interval = Duration::from_millis(100);
        while event_tx.send(AppEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });

    app.dispatch(Msg::Mounted)?;
    if let Some(url) = config.initial_url {
        app.dispatch(Msg::UrlInputChanged(url))?;
        app.dispatch(Msg::FetchClicked)?;
    }
    app.render()?;

    while let Ok(event) = event_rx.recv() {
        if app.handle_event(event)? == Flow::Quit {
            break;
        }
    }

    app.shutdown()?;
    grab_info!("Shut down cleanly");
    Ok(())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if event_tx.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    grab_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    clear: bool,
    notice: Option<(Notice, DateTime<Local>)>,
}

impl<W: Write> App<W> {
    fn new(runner: EffectRunner, out: W, clear: bool) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
            clear,
            notice: None,
        }
    }

    fn handle_event(&mut self, event: AppEvent) -> anyhow::Result<Flow> {
        match event {
            AppEvent::Msg(Msg::Tick) => {
                self.dispatch(Msg::Tick)?;
                if self.state.consume_dirty() {
                    self.render()?;
                }
            }
            AppEvent::Msg(msg) => self.dispatch(msg)?,
            AppEvent::Line(line) => return self.handle_line(&line),
            AppEvent::InputClosed => {
                grab_debug!("stdin closed");
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let command = match input::parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "? {err}")?;
                return Ok(Flow::Continue);
            }
        };
        // A new command acknowledges the banner.
        self.notice = None;

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                for line in ui::render::help_lines() {
                    writeln!(self.out, "{line}")?;
                }
                self.out.flush()?;
            }
            Command::Show => self.render()?,
            command => match input::to_msgs(command, &self.state.view()) {
                Ok(msgs) => {
                    for msg in msgs {
                        self.dispatch(msg)?;
                    }
                }
                Err(err) => writeln!(self.out, "? {err}")?,
            },
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for notice in self.runner.run(effects) {
            self.show_notice(notice)?;
        }
        Ok(())
    }

    fn show_notice(&mut self, notice: Notice) -> io::Result<()> {
        let at = Local::now();
        for line in ui::render::render_notice(&notice, at) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.notice = Some((notice, at));
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        if self.clear {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        for line in ui::render::render(&self.state.view()) {
            writeln!(self.out, "{line}")?;
        }
        if let Some((notice, at)) = &self.notice {
            for line in ui::render::render_notice(notice, *at) {
                writeln!(self.out, "{line}")?;
            }
        }
        write!(self.out, "> ")?;
        self.out.flush()
    }

    fn shutdown(mut self) -> io::Result<()> {
        self.dispatch(Msg::Unmounted)?;
        self.runner.shutdown();
        writeln!(self.out)?;
        self.out.flush()
    }
}

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use finder_core::{update, AppState, Msg};
use finder_logging::{finder_debug, finder_info};

use super::effects::EffectRunner;
use super::ui::commands::{self, Action};
use super::ui::render;
use super::{logging, stores};

/// Everything the main loop reacts to, in arrival order.
enum AppEvent {
    Core(Msg),
    Line(String),
    InputClosed,
}

impl From<Msg> for AppEvent {
    fn from(msg: Msg) -> Self {
        AppEvent::Core(msg)
    }
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize_from_env();
    finder_info!("offer_finder starting");

    let engine = stores::start_engine()?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(engine, event_tx.clone());
    spawn_input_reader(event_tx);

    let stdout = io::stdout();
    let mut app = App {
        state: AppState::new(),
        runner,
        out: stdout.lock(),
    };
    writeln!(app.out, "{}", commands::HELP)?;
    app.dispatch_all(vec![Msg::AppStarted])?;

    while let Ok(event) = event_rx.recv() {
        let keep_running = match event {
            AppEvent::Core(msg) => {
                app.dispatch_all(vec![msg])?;
                true
            }
            AppEvent::Line(line) => app.handle_line(&line)?,
            AppEvent::InputClosed => false,
        };
        if !keep_running {
            break;
        }
    }

    finder_info!("offer_finder exiting");
    Ok(())
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> App<W> {
    /// Returns `false` once the user asked to quit.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let command = match commands::parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(true);
            }
        };
        finder_debug!("Command {:?}", command);

        match commands::plan(command, &self.state.view()) {
            Action::Dispatch(msgs) => self.dispatch_all(msgs)?,
            Action::Print(text) => writeln!(self.out, "{text}")?,
            Action::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Applies messages in order and renders once if anything changed.
    fn dispatch_all(&mut self, msgs: Vec<Msg>) -> io::Result<()> {
        for msg in msgs {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            self.runner.enqueue(effects);
        }

        if self.state.consume_dirty() {
            write!(self.out, "\n{}", render::render(&self.state.view()))?;
            self.out.flush()?;
        }
        Ok(())
    }
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if event_tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

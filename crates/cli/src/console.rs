use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use opencode_uninstaller_core::{Prompter, Reporter};

/// Input seen by the console prompter, from stdin or the Ctrl-C handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Line(String),
    Closed,
    Interrupted,
}

/// Reads answers from stdin. Closed input and Ctrl-C both yield `None`, which the
/// uninstaller treats as "no".
pub struct ConsolePrompter {
    events: Receiver<ConsoleEvent>,
    closed: bool,
}

impl ConsolePrompter {
    /// Installs the Ctrl-C handler and starts the stdin reader. Stdin is read on its own
    /// thread because a blocked `read_line` is not woken by the handler.
    pub fn install() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let interrupts = tx.clone();
        ctrlc::set_handler(move || {
            let _ = interrupts.send(ConsoleEvent::Interrupted);
        })
        .context("failed to install Ctrl-C handler")?;
        thread::spawn(move || read_lines(io::stdin().lock(), tx));
        Ok(Self::from_events(rx))
    }

    pub fn from_events(events: Receiver<ConsoleEvent>) -> Self {
        Self {
            events,
            closed: false,
        }
    }
}

impl Prompter for ConsolePrompter {
    fn ask(&mut self, question: &str) -> Option<String> {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{question}");
        let _ = stdout.flush();
        drop(stdout);

        if self.closed {
            println!();
            return None;
        }
        match self.events.recv() {
            Ok(ConsoleEvent::Line(line)) => Some(line),
            Ok(ConsoleEvent::Interrupted) => {
                println!("^C");
                None
            }
            Ok(ConsoleEvent::Closed) | Err(_) => {
                self.closed = true;
                println!();
                None
            }
        }
    }
}

fn read_lines<R: BufRead>(mut input: R, events: Sender<ConsoleEvent>) {
    loop {
        let mut line = String::new();
        let event = match input.read_line(&mut line) {
            Ok(0) => ConsoleEvent::Closed,
            Ok(_) => ConsoleEvent::Line(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => ConsoleEvent::Closed,
        };
        let done = event == ConsoleEvent::Closed;
        if events.send(event).is_err() || done {
            return;
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn emit(&mut self, line: &str) {
        println!("{line}");
    }
}

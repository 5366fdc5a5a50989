//! Terminal progress indicator.
//!
//! A background task draws `...Building |` and cycles the spinner while a
//! pass runs. It is driven by [`ProgressCommand`]s over a channel and never
//! reports errors back: a failed draw is simply skipped.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crossterm::{cursor, queue, style, terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const TICK: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressCommand {
    Start,
    Stop,
}

/// Handle to the indicator task. Dropping every handle ends the task.
#[derive(Debug)]
pub struct Progress {
    sender: Option<mpsc::UnboundedSender<ProgressCommand>>,
    task: Option<JoinHandle<()>>,
}

impl Progress {
    /// Draws on stderr when it is a terminal, otherwise does nothing.
    pub fn stderr() -> Self {
        if io::stderr().is_terminal() {
            Self::spawn(io::stderr(), TICK)
        } else {
            Self::disabled()
        }
    }

    /// An indicator that ignores every command.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            task: None,
        }
    }

    /// Spawns the indicator task on the current runtime.
    pub fn spawn<W>(out: W, tick: Duration) -> Self
    where
        W: Write + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(out, receiver, tick));
        Self {
            sender: Some(sender),
            task: Some(task),
        }
    }

    pub fn start(&self) {
        self.send(ProgressCommand::Start);
    }

    pub fn stop(&self) {
        self.send(ProgressCommand::Stop);
    }

    fn send(&self, command: ProgressCommand) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(command);
        }
    }

    /// Stops the indicator and waits for the task to clear its line.
    pub async fn shutdown(mut self) {
        self.sender.take();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

async fn run<W: Write>(
    mut out: W,
    mut commands: mpsc::UnboundedReceiver<ProgressCommand>,
    tick: Duration,
) {
    let mut ticker = tokio::time::interval(tick);
    let mut frame = 0usize;
    let mut active = false;

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(ProgressCommand::Start) => {
                    active = true;
                    frame = 0;
                    ticker.reset_immediately();
                }
                Some(ProgressCommand::Stop) => {
                    if active {
                        let _ = clear(&mut out);
                    }
                    active = false;
                }
                None => {
                    if active {
                        let _ = clear(&mut out);
                    }
                    break;
                }
            },
            _ = ticker.tick(), if active => {
                let _ = draw(&mut out, FRAMES[frame % FRAMES.len()]);
                frame += 1;
            }
        }
    }
}

fn draw<W: Write>(out: &mut W, spinner: char) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(format!("...Building {spinner}"))
    )?;
    out.flush()
}

fn clear<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine)
    )?;
    out.flush()
}

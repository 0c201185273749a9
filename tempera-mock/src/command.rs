use std::collections::VecDeque;
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use tempera_embedded::input::ModeButton;

use crate::error::MockError;
use crate::settings::ScriptedPress;
use crate::simulate::ButtonPanel;

/// Operator commands, one per line on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Press and hold a button until released
    Press(ModeButton),
    Release(ModeButton),
    /// Short press, released after `hold_ms`
    Tap(ModeButton),
    Connect,
    Disconnect,
    Status,
    Quit,
}

fn parse_button(name: &str) -> Result<ModeButton, MockError> {
    match name {
        "in_office" | "available" => Ok(ModeButton::InOffice),
        "deep_work" => Ok(ModeButton::DeepWork),
        "meeting" => Ok(ModeButton::Meeting),
        "out_of_office" => Ok(ModeButton::OutOfOffice),
        other => Err(MockError::UnknownCommand(format!("unknown button '{other}'"))),
    }
}

impl FromStr for Command {
    type Err = MockError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();

        let command = match (words.next(), words.next()) {
            (Some("press"), Some(button)) => Command::Press(parse_button(button)?),
            (Some("release"), Some(button)) => Command::Release(parse_button(button)?),
            (Some("tap"), Some(button)) => Command::Tap(parse_button(button)?),
            (Some("connect"), None) => Command::Connect,
            (Some("disconnect"), None) => Command::Disconnect,
            (Some("status"), None) => Command::Status,
            (Some("quit" | "exit"), None) => Command::Quit,
            _ => return Err(MockError::UnknownCommand(line.clone())),
        };

        match words.next() {
            Some(_) => Err(MockError::UnknownCommand(line.clone())),
            None => Ok(command),
        }
    }
}

pub struct CommandHandler {
    pub cmd_tx: mpsc::Sender<Command>,
    pub cmd_rx: mpsc::Receiver<Command>,
}

impl CommandHandler {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        CommandHandler { cmd_tx, cmd_rx }
    }

    /// Forward parsed stdin lines until stdin closes or a quit is read.
    pub fn start_stdin_processor(&self) {
        tokio::spawn({
            let cmd_tx = self.cmd_tx.clone();
            async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();

                loop {
                    let line = match lines.next_line().await {
                        Ok(Some(line)) if line.trim().is_empty() => continue,
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(e) => {
                            tracing::error!("Failed to read stdin: {}", e);
                            break;
                        }
                    };

                    match line.parse::<Command>() {
                        Ok(command) => {
                            tracing::debug!("Receive: {:?}", command);
                            if cmd_tx.send(command).await.is_err() || command == Command::Quit {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!("{}", e),
                    }
                }
            }
        });
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Button presses scheduled on simulation time.
#[derive(Debug, Default)]
pub struct PressSchedule {
    pending: VecDeque<ScriptedPress>,
    held: Vec<(u64, ModeButton)>,
}

impl PressSchedule {
    pub fn new(mut presses: Vec<ScriptedPress>) -> Self {
        presses.sort_by_key(|press| press.at_ms);

        Self {
            pending: presses.into(),
            held: Vec::new(),
        }
    }

    /// Hold `button` from `now_ms` for `hold_ms`.
    pub fn tap(&mut self, button: ModeButton, now_ms: u64, hold_ms: u64, panel: &ButtonPanel) {
        panel.press(button);
        self.held.push((now_ms + hold_ms, button));
    }

    /// Press and release buttons that are due at `now_ms`.
    pub fn apply(&mut self, now_ms: u64, panel: &ButtonPanel) {
        while let Some(press) = self.pending.front().copied() {
            if press.at_ms > now_ms {
                break;
            }
            self.pending.pop_front();
            self.tap(press.button, now_ms, press.hold_ms, panel);
        }

        self.held.retain(|(release_at, button)| {
            if *release_at <= now_ms {
                panel.release(*button);
                false
            } else {
                true
            }
        });
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.held.is_empty()
    }
}

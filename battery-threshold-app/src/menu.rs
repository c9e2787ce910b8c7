//! Interactive status indicator: the label plus the four fixed menu items.

use crate::runtime::AppController;
use battery_threshold_core::{Preset, WriteOutcome};
use battery_threshold_interfaces::TerminalInterface;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Set(Preset),
    Current,
    Help,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        match input.as_str() {
            "1" => Some(MenuChoice::Set(Preset::Sixty)),
            "2" => Some(MenuChoice::Set(Preset::Eighty)),
            "3" => Some(MenuChoice::Set(Preset::Hundred)),
            "4" | "c" | "current" => Some(MenuChoice::Current),
            "h" | "help" | "?" => Some(MenuChoice::Help),
            "q" | "quit" | "exit" => Some(MenuChoice::Quit),
            other => other.parse::<Preset>().ok().map(MenuChoice::Set),
        }
    }
}

pub fn menu_lines() -> Vec<String> {
    let mut lines: Vec<String> = Preset::ALL
        .iter()
        .enumerate()
        .map(|(i, preset)| format!("  {}. {}", i + 1, preset.menu_label()))
        .collect();
    lines.push(format!("  {}. Current threshold", Preset::ALL.len() + 1));
    lines.push("  q. Quit".to_string());
    lines
}

pub struct IndicatorMenu {
    controller: Arc<AppController>,
    terminal: Arc<TerminalInterface>,
    pending: Vec<JoinHandle<WriteOutcome>>,
}

impl IndicatorMenu {
    pub fn new(controller: Arc<AppController>, terminal: Arc<TerminalInterface>) -> Self {
        Self {
            controller,
            terminal,
            pending: Vec::new(),
        }
    }

    /// The label itself is already on screen from the indicator.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.show_menu().await;

        loop {
            self.pending.retain(|handle| !handle.is_finished());

            let Some(input) = self.terminal.receive_input().await else {
                break;
            };
            if input.is_empty() {
                continue;
            }

            match MenuChoice::parse(&input) {
                Some(MenuChoice::Set(preset)) => {
                    // Returns immediately; the label updates when the write verifies.
                    let handle = self.controller.request_write(preset.into());
                    self.pending.push(handle);
                }
                Some(MenuChoice::Current) => {
                    let _ = self.controller.show_current().await;
                }
                Some(MenuChoice::Help) => self.show_menu().await,
                Some(MenuChoice::Quit) => break,
                None => {
                    self.terminal
                        .send_output(&format!("Unknown choice: {}", input))
                        .await;
                }
            }
        }

        self.drain().await;
        Ok(())
    }

    async fn show_menu(&self) {
        for line in self.intro_lines() {
            self.terminal.send_output(&line).await;
        }
    }

    pub fn intro_lines(&self) -> Vec<String> {
        menu_lines()
    }

    // Writes cannot be cancelled, so wait for outstanding helpers before exit.
    async fn drain(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.terminal
            .send_output(&format!(
                "Waiting for {} pending write(s)...",
                self.pending.len()
            ))
            .await;
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!("Write task panicked: {}", e);
            }
        }
    }
}

use crate::traits::{Indicator, InterfaceError, Notifier};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};

/// Indicator and notifier that render to the controlling terminal.
pub struct TerminalInterface {
    label: Mutex<String>,
    input: tokio::sync::Mutex<BufReader<Stdin>>,
}

impl TerminalInterface {
    pub fn new() -> Self {
        Self {
            label: Mutex::new(String::new()),
            input: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    pub async fn receive_input(&self) -> Option<String> {
        let mut reader = self.input.lock().await;
        let mut line = String::new();

        match reader.read_line(&mut line).await {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }

    pub async fn send_output(&self, message: &str) {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(message.as_bytes()).await;
        let _ = stdout.write_all(b"\n").await;
        let _ = stdout.flush().await;
    }
}

impl Default for TerminalInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for TerminalInterface {
    fn set_label(&self, text: &str) {
        let mut label = self.label.lock();
        if *label != text {
            *label = text.to_string();
            println!("🔋 {}", text);
        }
    }

    fn label(&self) -> String {
        self.label.lock().clone()
    }
}

#[async_trait]
impl Notifier for TerminalInterface {
    async fn notify(&self, message: &str) -> Result<(), InterfaceError> {
        self.send_output(&format!("ℹ️  {}", message)).await;
        Ok(())
    }
}

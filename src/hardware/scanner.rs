// Barcode input read from stdin

use async_trait::async_trait;
use std::io::{BufRead, BufReader};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::hardware::traits::Scanner;
use crate::hardware::types::HardwareError;

/// Reads one scan per line. The scanner is wired as a USB keyboard.
///
/// Lines are read on a plain thread and handed over through a channel: a
/// blocking read cannot be cancelled, and the process must be able to exit
/// while the station sits at a prompt.
pub struct StdinScanner {
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    echo_prompt: bool,
}

impl StdinScanner {
    pub fn new(echo_prompt: bool) -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()), echo_prompt)
    }

    /// Scan lines from any reader; the reading thread ends at EOF or error
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R, echo_prompt: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let spawned = std::thread::Builder::new()
            .name("scanner-input".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.send(line).is_err() || failed {
                        break;
                    }
                }
                debug!("Scanner input closed");
            });
        // Without the thread the channel is closed and the first scan ends the run
        if let Err(e) = spawned {
            warn!("Could not start scanner input thread: {}", e);
        }
        Self {
            lines: rx,
            echo_prompt,
        }
    }
}

#[async_trait]
impl Scanner for StdinScanner {
    async fn scan(&mut self, prompt: &str) -> Result<Option<String>, HardwareError> {
        if self.echo_prompt {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(prompt.as_bytes())
                .await
                .map_err(scanner_error)?;
            stdout.flush().await.map_err(scanner_error)?;
        }
        match self.lines.recv().await {
            Some(line) => Ok(Some(strip_terminator(&line.map_err(scanner_error)?).to_string())),
            None => Ok(None),
        }
    }
}

fn scanner_error(e: std::io::Error) -> HardwareError {
    HardwareError::Scanner {
        message: e.to_string(),
    }
}

/// Scanners may send CRLF; the payload itself is kept verbatim
pub fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

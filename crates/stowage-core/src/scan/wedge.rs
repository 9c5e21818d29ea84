// Line-mode wedge backend.
//
// Most USB/serial scanners in "keyboard wedge" or serial mode emit the
// decoded text followed by a newline. Reading the device node line by
// line covers both without any vendor SDK.

use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::warn;

use super::{ScanBackend, ScanError, ScanSession};

pub struct LineWedge {
    device: PathBuf,
}

impl LineWedge {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl ScanBackend for LineWedge {
    type Session = WedgeSession;

    async fn open(&self) -> Result<WedgeSession, ScanError> {
        let file = File::open(&self.device)
            .await
            .map_err(|e| ScanError::Unavailable {
                message: format!("{}: {e}", self.device.display()),
            })?;
        Ok(WedgeSession {
            lines: BufReader::new(file).lines(),
        })
    }
}

pub struct WedgeSession {
    lines: Lines<BufReader<File>>,
}

impl ScanSession for WedgeSession {
    async fn next_decode(&mut self) -> Option<String> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    // Blank lines are trigger noise, not decodes.
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_owned());
                    }
                }
                Ok(None) => return None,
                Err(err) => {
                    warn!("scanner read failed: {err}");
                    return None;
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), ScanError> {
        // Dropping the reader closes the file descriptor.
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn reads_trimmed_lines_and_skips_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PKG-0001\r").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  PKG-0002  ").unwrap();
        file.flush().unwrap();

        let backend = LineWedge::new(file.path());
        let mut session = backend.open().await.unwrap();

        assert_eq!(session.next_decode().await.as_deref(), Some("PKG-0001"));
        assert_eq!(session.next_decode().await.as_deref(), Some("PKG-0002"));
        assert_eq!(session.next_decode().await, None);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_device_is_unavailable() {
        let backend = LineWedge::new("/nonexistent/scanner0");
        let err = backend.open().await.err().unwrap();
        assert!(matches!(err, ScanError::Unavailable { .. }));
    }
}

//! Shared helpers for `rebake` tests: tracing setup, timeouts, captured
//! output, config and graph builders, and a fake build tool.

pub mod builders;
pub mod fake_tool;

use std::future::Future;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use rebake::logging::LOG_ENV;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output into the test harness's captured output.
///
/// Reads the same `REBAKE_LOG` directives as the binary, defaulting to
/// `info`. Captured logs show up only for failing tests unless the run
/// uses `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Fail the test if `fut` takes longer than five seconds.
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(Duration::from_secs(5), fut).await {
        Ok(out) => out,
        Err(_) => panic!("test timed out after 5s"),
    }
}

/// In-memory writer for capturing `StatusReporter` output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

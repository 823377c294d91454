pub mod db;
pub mod factory;
pub mod test_runner;

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `tracing` output recorded by [`capture_tracing`].
#[derive(Clone, Debug, Default)]
pub struct CapturedTracing(Arc<Mutex<Vec<u8>>>);

impl CapturedTracing {
    pub fn contains(&self, message: &str) -> bool {
        String::from_utf8_lossy(&self.0.lock().unwrap()).contains(message)
    }
}

impl io::Write for CapturedTracing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records `tracing` output on the current thread until the guard is dropped.
pub fn capture_tracing() -> (CapturedTracing, DefaultGuard) {
    let captured = CapturedTracing::default();
    let writer = captured.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (captured, tracing::subscriber::set_default(subscriber))
}

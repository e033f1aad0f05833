use std::sync::Once;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness writer.
///
/// Honors `RUST_LOG`; defaults to `resume_ats=debug`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("resume_ats=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Scenario banner with timing, for long integration scenarios.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
}

impl TestLogger {
    pub fn new(test_name: &str) -> Self {
        init_test_tracing();
        println!("\n[TEST START] {test_name}");
        Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn step(&self, description: &str) {
        println!("[STEP] {description}");
    }

    pub fn log_actual<T: std::fmt::Debug>(&self, name: &str, value: &T) {
        println!("[ACTUAL] {name}: {value:?}");
    }

    pub fn pass(&self) {
        println!(
            "[RESULT] {} PASSED in {:?}",
            self.test_name,
            self.start_time.elapsed()
        );
    }
}

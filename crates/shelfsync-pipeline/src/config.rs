use shelfsync_core::{AppConfig, MAX_WRITE_BATCH_SIZE};

/// Tuning for one [`crate::UpsertPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Items requested per scan page.
    pub scan_page_size: usize,
    /// Items per write call, at most [`MAX_WRITE_BATCH_SIZE`].
    pub write_batch_size: usize,
    /// Additional write attempts for unprocessed items.
    pub write_max_retries: u32,
    pub write_backoff_base_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scan_page_size: 100,
            write_batch_size: MAX_WRITE_BATCH_SIZE,
            write_max_retries: 3,
            write_backoff_base_ms: 200,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            scan_page_size: config.scan_page_size,
            write_batch_size: config.write_batch_size,
            write_max_retries: config.write_max_retries,
            write_backoff_base_ms: config.write_backoff_base_ms,
        }
        .clamped()
    }

    /// Forces sizes into their valid ranges.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            scan_page_size: self.scan_page_size.max(1),
            write_batch_size: self.write_batch_size.clamp(1, MAX_WRITE_BATCH_SIZE),
            ..self
        }
    }
}

// JSONL log of model exchanges, one line per request/response pair
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use super::types::{LLMRequest, LLMResponse};

#[derive(Serialize)]
struct ExchangeEntry<'a> {
    phase: &'a str,
    request: &'a LLMRequest,
    response: &'a LLMResponse,
    latency_ms: u64,
    timestamp: String,
}

pub struct ExchangeLogger {
    writer: Option<Mutex<BufWriter<File>>>,
}

impl ExchangeLogger {
    /// Opens (appending) `log_file`; a file that cannot be opened disables logging
    pub fn new(log_file: Option<&Path>) -> Self {
        let writer = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Some(Mutex::new(BufWriter::new(file))),
                Err(e) => {
                    warn!("Failed to open exchange log file {:?}: {}", path, e);
                    None
                }
            }
        });

        Self { writer }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn log_exchange(
        &self,
        phase: &str,
        request: &LLMRequest,
        response: &LLMResponse,
        latency_ms: u64,
    ) {
        let Some(writer) = &self.writer else {
            return;
        };

        let entry = ExchangeEntry {
            phase,
            request,
            response,
            latency_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize exchange for phase {}: {}", phase, e);
                return;
            }
        };

        if let Ok(mut writer) = writer.lock() {
            if let Err(e) = writeln!(writer, "{}", json).and_then(|_| writer.flush()) {
                warn!("Failed to write exchange log entry: {}", e);
            }
        }

        debug!(phase, latency_ms, "Exchange logged");
    }
}

impl Default for ExchangeLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

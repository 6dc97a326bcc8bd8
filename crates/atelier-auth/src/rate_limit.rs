//! Fixed-window rate limiting
//!
//! An injected, explicitly-owned counter keyed by client address,
//! replacing the module-level mutable map this subsystem grew out of.
//! The window is fixed rather than sliding: one counter per key,
//! reset when its window elapses. `sweep` drops stale windows so the
//! map does not grow with every address ever seen.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::error::{AuthError, AuthResult};

/// Fixed-window rate limiter
#[derive(Clone)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Count a request against `key` (normally the client address).
    /// Past the limit the caller gets the seconds until the window
    /// resets.
    pub async fn check(&self, key: &str) -> AuthResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.config.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.config.max_requests {
            let elapsed = now.duration_since(window.started_at);
            let retry_after = self.config.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(AuthError::RateLimitExceeded { retry_after });
        }

        window.count += 1;
        Ok(())
    }

    /// Drop windows that have fully elapsed. Meant to be called
    /// periodically by the owner; never runs implicitly.
    pub async fn sweep(&self) {
        let now = Instant::now();
        let window = self.config.window;
        let mut windows = self.windows.write().await;
        windows.retain(|_, w| now.duration_since(w.started_at) < window);
    }

    /// Number of tracked keys (for the sweep scheduler's telemetry)
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }
}

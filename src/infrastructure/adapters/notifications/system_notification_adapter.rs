/*
System Toast Adapter

This adapter implements the Toast port for in-app use. A toast is written to the log as a
structured event and kept in a short in-memory history, which the CLI and tests read back.

Features:
- Structured logging of every toast
- Bounded in-memory history
- Simple delivery statistics
*/

use crate::application::ports::output::toast_port::{Toast, ToastPort};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::RwLock;
use tracing::info;

/// System toast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAdapterConfig {
    /// Maximum number of toasts kept in the history
    pub max_stored_toasts: usize,
    /// Emit each toast as a log event
    pub log_toasts: bool,
}

impl Default for SystemAdapterConfig {
    fn default() -> Self {
        Self {
            max_stored_toasts: 20,
            log_toasts: true,
        }
    }
}

#[derive(Debug, Default)]
struct SystemDeliveryStats {
    total_shown: u64,
    last_shown: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct SystemToastAdapter {
    config: SystemAdapterConfig,
    history: RwLock<VecDeque<Toast>>,
    stats: RwLock<SystemDeliveryStats>,
}

impl SystemToastAdapter {
    pub fn new(config: SystemAdapterConfig) -> Self {
        Self {
            config,
            history: RwLock::new(VecDeque::new()),
            stats: RwLock::new(SystemDeliveryStats::default()),
        }
    }

    /// Most recent toasts, oldest first
    pub fn recent(&self) -> Vec<Toast> {
        self.history
            .read()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn shown_count(&self) -> u64 {
        self.stats.read().map(|s| s.total_shown).unwrap_or(0)
    }

    pub fn last_shown(&self) -> Option<DateTime<Utc>> {
        self.stats.read().ok().and_then(|s| s.last_shown)
    }
}

impl ToastPort for SystemToastAdapter {
    fn show(&self, toast: Toast) {
        if self.config.log_toasts {
            info!(
                target: "clearpass::toast",
                title = %toast.title,
                action = ?toast.action.as_ref().map(|a| a.url.as_str()),
                "{}",
                toast.description
            );
        }

        if let Ok(mut history) = self.history.write() {
            history.push_back(toast);
            while history.len() > self.config.max_stored_toasts {
                history.pop_front();
            }
        }

        if let Ok(mut stats) = self.stats.write() {
            stats.total_shown += 1;
            stats.last_shown = Some(Utc::now());
        }
    }
}

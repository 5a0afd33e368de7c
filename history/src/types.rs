use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One identified exchange: what the user said and what the assistant
/// replied. Msgpack field tags stay short to keep records compact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "user")]
    pub user_id: String,

    #[serde(rename = "heard")]
    pub heard: String,

    #[serde(rename = "reply")]
    pub reply: String,

    /// Nanoseconds since the unix epoch.
    #[serde(rename = "ts")]
    pub ts: i64,
}

static LAST_NANO: AtomicI64 = AtomicI64::new(0);

/// Current unix time in nanoseconds, strictly increasing across calls so
/// turn keys never collide within a process.
pub fn now_nano() -> i64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos() as i64;
    loop {
        let old = LAST_NANO.load(Ordering::Relaxed);
        let next = if now > old { now } else { old + 1 };
        if LAST_NANO
            .compare_exchange_weak(old, next, Ordering::Release, Ordering::Relaxed)
            .is_ok()
        {
            return next;
        }
    }
}

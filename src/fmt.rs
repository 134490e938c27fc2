//! Shared formatting utilities for size display and console output

use console::Emoji;
use std::sync::atomic::{AtomicBool, Ordering};

/// Package emoji for measurement steps
pub const PACKAGE: Emoji = Emoji("📦", ">");

/// Inbox emoji for downloading reference data
pub const INBOX: Emoji = Emoji("📥", ">");

/// Outbox emoji for uploading snapshots
pub const OUTBOX: Emoji = Emoji("📤", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Warning emoji for skipped categories
pub const SKIPPED: Emoji = Emoji("⚠️ ", "[SKIP]");

/// Chart emoji for size tables
pub const CHART: Emoji = Emoji("📊", "~");

/// Speech balloon emoji for publishing
pub const SPEECH: Emoji = Emoji("💬", ">");

static EMOJI_ENABLED: AtomicBool = AtomicBool::new(true);

/// Switch progress output between emoji and their plain fallbacks
pub fn set_emoji(enabled: bool) {
    EMOJI_ENABLED.store(enabled, Ordering::Relaxed);
}

/// The emoji, or its fallback when emoji are disabled or unsupported
pub fn icon(emoji: Emoji<'_, '_>) -> String {
    if EMOJI_ENABLED.load(Ordering::Relaxed) {
        emoji.to_string()
    } else {
        emoji.1.to_string()
    }
}

const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count with a binary-scaled unit and up to two decimals.
///
/// Trailing zeros are dropped, zero renders as `no change`, and with `signed`
/// set positive values get a leading `+`. Negative values always keep their
/// `-`, signed or not.
///
/// # Examples
///
/// ```
/// use next_bundle_report::fmt::format_bytes;
///
/// assert_eq!(format_bytes(500, false), "500 B");
/// assert_eq!(format_bytes(1536, false), "1.5 KB");
/// assert_eq!(format_bytes(1500, true), "+1.46 KB");
/// assert_eq!(format_bytes(-2048, true), "-2 KB");
/// assert_eq!(format_bytes(0, true), "no change");
/// ```
pub fn format_bytes(bytes: i64, signed: bool) -> String {
    if bytes == 0 {
        return "no change".to_string();
    }

    let sign = if bytes < 0 {
        "-"
    } else if signed {
        "+"
    } else {
        ""
    };

    let magnitude = bytes.unsigned_abs();
    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < UNITS.len() && magnitude / divisor >= 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let scaled = magnitude as f64 / divisor as f64;
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{}{} {}", sign, rounded, UNITS[unit])
}

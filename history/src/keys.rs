//! Key layout for the history table.
//!
//! ```text
//! {user_id}:{ts_ns_20d}  → msgpack Turn
//! ```
//!
//! Timestamps are zero-padded to 20 decimal digits so lexicographic key
//! order matches chronological order within one user's prefix. User ids
//! never contain ':' (the profile store enforces that), so one user's
//! prefix cannot capture another's keys.

/// Key for one turn. Format: `{user_id}:{ts_ns_20d}`
pub fn turn_key(user_id: &str, ts: i64) -> String {
    if ts >= 0 {
        format!("{user_id}:{ts:020}")
    } else {
        // Negative timestamps are not expected in normal usage, but keep
        // the encoding parseable.
        format!("{user_id}:{ts}")
    }
}

/// Prefix for scanning one user's turns. Format: `{user_id}:`
pub fn user_prefix(user_id: &str) -> String {
    format!("{user_id}:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_key_orders_lexicographically() {
        let early = turn_key("alice", 999);
        let late = turn_key("alice", 1_000_000_000_000);
        assert!(early < late);
        assert!(early.starts_with(&user_prefix("alice")));
    }

    #[test]
    fn test_prefixes_do_not_collide() {
        assert!(!turn_key("alice", 1).starts_with(&user_prefix("ali")));
        assert!(!turn_key("ali", 1).starts_with(&user_prefix("alice")));
    }
}

/// DJB2 hash producing a deterministic 64-bit value for any byte slice.
pub fn djb2_hash64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &b in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(b as u64);
    }
    hash
}

/// Lock id serializing writers to one partition.
///
/// PostgreSQL advisory locks take a signed 64-bit key, so the hash is
/// reinterpreted bit-for-bit.
pub fn partition_lock_key(scores_key: &str) -> i64 {
    djb2_hash64(scores_key.as_bytes()) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(djb2_hash64(b"hello"), djb2_hash64(b"hello"));
        assert_eq!(djb2_hash64(b""), 5381);
    }

    #[test]
    fn partitions_get_distinct_lock_keys() {
        let today = partition_lock_key("monkeytypes:dailyleaderboard:scores:english:time:60:1710028800000");
        let tomorrow = partition_lock_key("monkeytypes:dailyleaderboard:scores:english:time:60:1710115200000");
        let other = partition_lock_key("monkeytypes:dailyleaderboard:scores:english:time:15:1710028800000");
        assert_ne!(today, tomorrow);
        assert_ne!(today, other);
        assert_eq!(
            today,
            partition_lock_key("monkeytypes:dailyleaderboard:scores:english:time:60:1710028800000")
        );
    }
}

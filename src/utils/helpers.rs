//! Small pure helpers shared across services

/// Pick the element of `pool` responsible for the `index`-th slot using
/// round-robin distribution.
///
/// With `f` pool members and `r` slots each member ends up with either
/// `r / f` or `r / f + 1` slots. Returns `None` for an empty pool.
pub fn round_robin<T>(pool: &[T], index: usize) -> Option<&T> {
    if pool.is_empty() {
        return None;
    }
    pool.get(index % pool.len())
}

/// Number of rooms needed to seat `total` students at `per_room` each.
pub fn room_count(total: usize, per_room: usize) -> usize {
    if per_room == 0 {
        return 0;
    }
    total.div_ceil(per_room)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_wraps() {
        let pool = vec!["f1", "f2"];
        assert_eq!(round_robin(&pool, 0), Some(&"f1"));
        assert_eq!(round_robin(&pool, 1), Some(&"f2"));
        assert_eq!(round_robin(&pool, 2), Some(&"f1"));
        assert_eq!(round_robin(&pool, 5), Some(&"f2"));
    }

    #[test]
    fn test_round_robin_empty_pool() {
        let pool: Vec<i32> = vec![];
        assert_eq!(round_robin(&pool, 0), None);
    }

    #[test]
    fn test_round_robin_fairness() {
        let pool = vec!["f1", "f2", "f3"];
        let rooms = 8;
        let mut counts = std::collections::HashMap::new();
        for i in 0..rooms {
            *counts.entry(*round_robin(&pool, i).unwrap()).or_insert(0usize) += 1;
        }
        for (_, count) in counts {
            assert!(count == rooms / pool.len() || count == rooms / pool.len() + 1);
        }
    }

    #[test]
    fn test_room_count() {
        assert_eq!(room_count(45, 20), 3);
        assert_eq!(room_count(40, 20), 2);
        assert_eq!(room_count(1, 20), 1);
        assert_eq!(room_count(0, 20), 0);
        assert_eq!(room_count(10, 0), 0);
    }
}

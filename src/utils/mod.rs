//! Project-specific utilities live here.

/// Slice out the 1-indexed `page` of `items`, `per_page` at a time.
///
/// Pages below 1 and pages past the end yield an empty vector.
pub fn paginate<T: Clone>(items: &[T], page: i64, per_page: usize) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let Ok(index) = usize::try_from(page - 1) else {
        return Vec::new();
    };
    let start = index.saturating_mul(per_page);
    items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect()
}

/// Number of pages needed for `total` items; 0 when there are none.
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_items_make_three_pages() {
        let items: Vec<u32> = (1..=12).collect();
        assert_eq!(paginate(&items, 1, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(&items, 3, 5), vec![11, 12]);
        assert!(paginate(&items, 4, 5).is_empty());
        assert_eq!(page_count(items.len(), 5), 3);
    }

    #[test]
    fn page_zero_and_empty_input() {
        let items = vec!['a', 'b'];
        assert!(paginate(&items, 0, 5).is_empty());
        assert!(paginate::<char>(&[], 1, 5).is_empty());
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, i64::MAX, usize::MAX).is_empty());
        assert!(paginate(&items, i64::MAX, 5).is_empty());
    }

    #[test]
    fn negative_pages_are_empty() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, -1, 5).is_empty());
        assert!(paginate(&items, i64::MIN, 5).is_empty());
    }
}

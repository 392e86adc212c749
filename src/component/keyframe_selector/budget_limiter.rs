/// 將有序清單均勻抽樣到 `max_frames` 張
///
/// 數量未超過上限時原樣回傳；否則取位置
/// `floor(i * (n - 1) / max(max_frames - 1, 1))`，
/// `max_frames >= 2` 時必定包含頭尾。
#[must_use]
pub fn limit_to_budget<T>(items: Vec<T>, max_frames: usize) -> Vec<T> {
    let n = items.len();
    if n <= max_frames {
        return items;
    }

    let divisor = max_frames.saturating_sub(1).max(1);
    let mut picks = (0..max_frames).map(|index| index * (n - 1) / divisor).peekable();

    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| {
            // n > max_frames 時各位置嚴格遞增，不會重複
            if picks.peek() == Some(&position) {
                picks.next();
                Some(item)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_budget_is_unchanged() {
        let items = vec![1, 2, 3];
        assert_eq!(limit_to_budget(items.clone(), 3), items);
        assert_eq!(limit_to_budget(items.clone(), 10), items);
    }

    #[test]
    fn test_ten_to_three() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(limit_to_budget(items, 3), vec![0, 4, 9]);
    }

    #[test]
    fn test_includes_first_and_last() {
        let items: Vec<usize> = (0..101).collect();
        let picked = limit_to_budget(items, 7);
        assert_eq!(picked.len(), 7);
        assert_eq!(picked[0], 0);
        assert_eq!(picked[6], 100);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_frame_budget() {
        let items: Vec<usize> = (0..5).collect();
        assert_eq!(limit_to_budget(items, 1), vec![0]);
    }

    #[test]
    fn test_zero_budget() {
        let items: Vec<usize> = (0..5).collect();
        assert!(limit_to_budget(items, 0).is_empty());
    }

    #[test]
    fn test_exact_count_for_many_sizes() {
        for n in 2..60usize {
            for max in 1..n {
                let picked = limit_to_budget((0..n).collect::<Vec<_>>(), max);
                assert_eq!(picked.len(), max, "n={n} max={max}");
            }
        }
    }
}

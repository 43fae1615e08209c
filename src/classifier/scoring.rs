//! Shared keyword-counting primitives.

/// Title counted twice, then the body; lowercased for matching.
pub fn weighted_text(title: &str, content: &str) -> String {
    format!("{title} {title} {content}").to_lowercase()
}

/// Non-overlapping occurrences of `keyword` in already-lowercased `text`.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return 0;
    }
    text.matches(keyword.as_str()).count()
}

/// Divides every score by the maximum so the best one becomes exactly 1.0.
/// All-zero input is returned unchanged.
pub fn normalize(scores: &mut [(String, f64)]) {
    let max = scores.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);
    if max > 0.0 {
        for (_, score) in scores.iter_mut() {
            *score /= max;
        }
    }
}

/// Index of the highest score; the earliest entry wins ties. `None` when
/// nothing scored above zero.
pub fn argmax(scores: &[(String, f64)]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, (_, score)) in scores.iter().enumerate() {
        if *score > 0.0 && best.map_or(true, |(_, top)| *score > top) {
            best = Some((idx, *score));
        }
    }
    best.map(|(idx, _)| idx)
}

pub fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[f64]) -> Vec<(String, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("c{i}"), *v))
            .collect()
    }

    #[test]
    fn counts_case_insensitively_without_overlap() {
        let text = weighted_text("SWOT", "swot分析 aaaa");
        assert_eq!(count_occurrences(&text, "Swot"), 3);
        assert_eq!(count_occurrences(&text, "aa"), 2);
        assert_eq!(count_occurrences(&text, ""), 0);
    }

    #[test]
    fn normalization_pins_the_best_score_to_one() {
        let mut scores = table(&[2.0, 4.0, 1.0]);
        normalize(&mut scores);
        assert_eq!(scores[1].1, 1.0);
        assert_eq!(scores[0].1, 0.5);

        let mut zeros = table(&[0.0, 0.0]);
        normalize(&mut zeros);
        assert!(zeros.iter().all(|(_, s)| *s == 0.0));
    }

    #[test]
    fn argmax_prefers_earliest_on_ties_and_ignores_zero() {
        assert_eq!(argmax(&table(&[1.0, 3.0, 3.0])), Some(1));
        assert_eq!(argmax(&table(&[0.0, 0.0])), None);
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn rounds_to_three_places() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.6666), 0.667);
    }
}

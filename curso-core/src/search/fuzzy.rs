//! Bounded edit distance for fuzzy term expansion.

/// Levenshtein distance between `a` and `b` if it is at most `max`.
///
/// The length difference is a lower bound on the distance, so far-apart
/// lengths return `None` before any allocation; rows whose minimum already
/// exceeds `max` stop the DP early.
pub fn bounded_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let a_len = a.chars().count();
    let b: Vec<char> = b.chars().collect();

    if a_len.abs_diff(b.len()) > max {
        return None;
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, bc) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ac != *bc);
            row[j + 1] = (above + 1).min(row[j] + 1).min(prev + cost);
            prev = above;
            row_min = row_min.min(row[j + 1]);
        }

        if row_min > max {
            return None;
        }
    }

    let distance = row[b.len()];
    (distance <= max).then_some(distance)
}

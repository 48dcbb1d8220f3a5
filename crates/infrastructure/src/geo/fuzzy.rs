/// Largest normalized edit distance still accepted as a fuzzy match.
pub const MAX_FUZZY_DISTANCE: f64 = 0.25;

/// Levenshtein distance over `char`s.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit distance divided by the longer length, in `[0, 1]`.
pub fn normalized_distance(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

/// Lengths that can possibly land within `MAX_FUZZY_DISTANCE` of `len`.
///
/// The distance is at least the length difference, so anything outside
/// this window is rejected without running the DP.
pub fn candidate_lengths(len: usize) -> std::ops::RangeInclusive<usize> {
    let min = (len as f64 * (1.0 - MAX_FUZZY_DISTANCE)).ceil() as usize;
    let max = (len as f64 / (1.0 - MAX_FUZZY_DISTANCE)).floor() as usize;
    min.max(1)..=max
}

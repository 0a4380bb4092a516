// Sequence Similarity
// Longest-matching-blocks ratio over arbitrary element slices, plus a
// best-close-match lookup used by the sentence aligner.

use std::collections::HashMap;

/// Longest contiguous match between `a[alo..ahi]` and `b[blo..bhi]`.
/// Returns (start in a, start in b, length).
fn longest_match<T: PartialEq>(
    a: &[T],
    b: &[T],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    // j2len[j] = length of the longest match ending at a[i-1], b[j-1]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}

/// Total length of all matching blocks, found by recursively splitting
/// around the longest match in each region.
fn total_matched<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut matched = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        queue.push((alo, i, blo, j));
        queue.push((i + size, ahi, j + size, bhi));
    }

    matched
}

/// Similarity ratio in [0,1]: 2M / (len(a) + len(b)) where M is the total
/// matched-block length. Two empty sequences compare as identical.
pub fn sequence_ratio<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    2.0 * total_matched(a, b) as f64 / (a.len() + b.len()) as f64
}

/// Character-level ratio over two strings.
pub fn char_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    sequence_ratio(&a, &b)
}

/// Best candidate whose character ratio against `target` meets `cutoff`.
pub fn best_close_match<'a>(
    target: &str,
    candidates: &'a [String],
    cutoff: f64,
) -> Option<(&'a str, f64)> {
    let mut best: Option<(&'a str, f64)> = None;
    for cand in candidates {
        let r = char_ratio(target, cand);
        if r >= cutoff && best.map_or(true, |(_, br)| r > br) {
            best = Some((cand.as_str(), r));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sequences_are_1() {
        assert_eq!(char_ratio("hello world", "hello world"), 1.0);
        let v = vec!["a".to_string(), "b".to_string()];
        assert_eq!(sequence_ratio(&v, &v), 1.0);
    }

    #[test]
    fn test_disjoint_sequences_are_0() {
        assert_eq!(char_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_empty_edge_cases() {
        assert_eq!(char_ratio("", ""), 1.0);
        assert_eq!(char_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // "abcd" vs "bcde": longest block "bcd" (3), ratio = 2*3/8.
        assert!((char_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_best_close_match_respects_cutoff() {
        let cands = vec!["the cat sat on the mat".to_string(), "completely different".to_string()];
        let m = best_close_match("the cat sat on a mat", &cands, 0.6);
        assert_eq!(m.unwrap().0, "the cat sat on the mat");
        assert!(best_close_match("zzzz", &cands, 0.6).is_none());
    }
}

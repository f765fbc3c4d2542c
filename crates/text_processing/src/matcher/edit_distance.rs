//! Token similarity
//!
//! Damerau-Levenshtein (optimal string alignment) distance with an edit
//! budget that grows with the query token's length, plus a containment
//! shortcut for partial words such as `claim` / `claims`.

/// Shortest side of a containment match
const MIN_PARTIAL_LEN: usize = 3;

/// Edits tolerated for a query token of `len` characters
pub fn edit_budget(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=6 => 1,
        7..=10 => 2,
        _ => 3,
    }
}

/// Optimal string alignment distance; an adjacent transposition is one edit
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a.len(), b.len());

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    // Three rows: i-2, i-1 and i
    let mut prev_prev: Vec<usize> = vec![0; len_b + 1];
    let mut prev: Vec<usize> = (0..=len_b).collect();
    let mut curr: Vec<usize> = vec![0; len_b + 1];

    for i in 1..=len_a {
        curr[0] = i;
        for j in 1..=len_b {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(prev_prev[j - 2] + 1);
            }
            curr[j] = best;
        }
        std::mem::swap(&mut prev_prev, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[len_b]
}

/// Similarity in [0, 1] between a query token and a candidate token
pub fn token_similarity(query: &str, candidate: &str) -> f32 {
    if query == candidate {
        return 1.0;
    }

    let query_len = query.chars().count();
    let candidate_len = candidate.chars().count();
    let (shorter, longer) = if query_len <= candidate_len {
        (query_len, candidate_len)
    } else {
        (candidate_len, query_len)
    };

    if longer == 0 {
        return 0.0;
    }

    if shorter >= MIN_PARTIAL_LEN && (candidate.contains(query) || query.contains(candidate)) {
        return 0.5 + 0.5 * shorter as f32 / longer as f32;
    }

    let budget = edit_budget(query_len);
    if budget == 0 || longer - shorter > budget {
        return 0.0;
    }

    let edits = damerau_levenshtein(query, candidate);
    if edits <= budget {
        1.0 - edits as f32 / longer as f32
    } else {
        0.0
    }
}

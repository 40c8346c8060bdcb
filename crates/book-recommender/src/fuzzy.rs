/// Title validation for external lookups.
///
/// The Books API always answers with its best guess, which is frequently an unrelated
/// volume. A result is accepted only when its title is close to what the user asked for,
/// measured with the Ratcliff/Obershelp "gestalt" ratio used by Python's `difflib`:
/// `2 * M / T`, where `M` counts characters in the matching blocks found by repeatedly
/// taking the longest common block and recursing on both sides, and `T` is the combined
/// length of the two strings.
use std::collections::HashMap;

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Strings at least this long have their over-represented characters ignored when
/// seeding matches, mirroring difflib's auto-junk heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// True when `candidate` is close enough to `search` to trust its metadata: either the
/// case-insensitive ratio reaches `threshold`, or `search` appears inside `candidate`.
pub fn is_valid_match(search: &str, candidate: &str, threshold: f64) -> bool {
    let search = search.to_lowercase();
    let candidate = candidate.to_lowercase();
    sequence_ratio(&search, &candidate) >= threshold || candidate.contains(&search)
}

/// Similarity in `[0, 1]`; 1.0 for two empty strings. Not symmetric in general.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(&a, &b).matched_chars();
    2.0 * matched as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let popular = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= popular);
        }
        Self { a, b, b2j }
    }

    /// Total length of all matching blocks.
    fn matched_chars(&self) -> usize {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows. Among equally
    /// long blocks the one starting earliest in `a`, then in `b`, wins.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

        // run length of the match ending at b[j], for the previous row of `a`
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next;
        }

        // Auto-junked characters never seed a block but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }
}

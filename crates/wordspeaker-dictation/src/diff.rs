//! Character alignment.
//!
//! Longest-common-subsequence over case-folded characters. Ties during
//! traceback are broken by a rule that depends only on the two sequences,
//! not on which one is "old", so `align(a, b)` and `align(b, a)` produce
//! mirror-image operations.

use similar::DiffOp;

/// Fold a character for comparison. Characters whose lowercase form is more
/// than one character compare as themselves.
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Align `old` against `new` and return the opcodes, indexed by character.
pub fn align(old: &[char], new: &[char]) -> Vec<DiffOp> {
    let a: Vec<char> = old.iter().copied().map(fold).collect();
    let b: Vec<char> = new.iter().copied().map(fold).collect();
    let matches = matching_pairs(&a, &b);
    ops_from_matches(&matches, a.len(), b.len())
}

/// Pairs `(i, j)` with `a[i] == b[j]` on one longest common subsequence,
/// in increasing order.
fn matching_pairs(a: &[char], b: &[char]) -> Vec<(usize, usize)> {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if a[i - 1] == b[j - 1] {
                table[(i - 1) * width + j - 1] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + j - 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(n.min(m));
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
            continue;
        }
        let up = table[(i - 1) * width + j];
        let left = table[i * width + j - 1];
        let consume_old = match up.cmp(&left) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            // Tie: drop from the longer remaining prefix, then by character.
            std::cmp::Ordering::Equal => match i.cmp(&j) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => a[i - 1] > b[j - 1],
            },
        };
        if consume_old {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    pairs.reverse();
    pairs
}

fn ops_from_matches(matches: &[(usize, usize)], n: usize, m: usize) -> Vec<DiffOp> {
    let mut ops = Vec::new();
    let (mut oi, mut ni) = (0, 0);
    let mut k = 0;

    while k < matches.len() {
        let (mi, mj) = matches[k];
        push_gap(&mut ops, oi, mi, ni, mj);

        let mut len = 1;
        while k + len < matches.len() && matches[k + len] == (mi + len, mj + len) {
            len += 1;
        }
        ops.push(DiffOp::Equal {
            old_index: mi,
            new_index: mj,
            len,
        });
        oi = mi + len;
        ni = mj + len;
        k += len;
    }
    push_gap(&mut ops, oi, n, ni, m);
    ops
}

fn push_gap(ops: &mut Vec<DiffOp>, old_start: usize, old_end: usize, new_start: usize, new_end: usize) {
    let old_len = old_end - old_start;
    let new_len = new_end - new_start;
    match (old_len, new_len) {
        (0, 0) => {}
        (_, 0) => ops.push(DiffOp::Delete {
            old_index: old_start,
            old_len,
            new_index: new_start,
        }),
        (0, _) => ops.push(DiffOp::Insert {
            old_index: old_start,
            new_index: new_start,
            new_len,
        }),
        _ => ops.push(DiffOp::Replace {
            old_index: old_start,
            old_len,
            new_index: new_start,
            new_len,
        }),
    }
}

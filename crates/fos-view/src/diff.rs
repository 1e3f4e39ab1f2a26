//! Child list diff
//!
//! Longest-common-subsequence alignment of two sequences with a caller
//! supplied equality predicate. Moves are expressed as a delete plus an
//! insert.

/// One edit script entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAction {
    /// Take the next item of `new`
    Insert,
    /// Drop the next item of `old`
    Delete,
    /// Keep the next item of `old`, it matches the next item of `new`
    Equal,
}

/// Edit script turning `old` into `new`.
///
/// Within each run of changes between two `Equal` entries, all deletes come
/// before all inserts.
pub fn diff<A, B>(old: &[A], new: &[B], mut eq: impl FnMut(&A, &B) -> bool) -> Vec<DiffAction> {
    let prefix = old
        .iter()
        .zip(new)
        .take_while(|&(a, b)| eq(a, b))
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|&(a, b)| eq(a, b))
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut script = Vec::with_capacity(old.len() + new.len() - prefix - suffix);
    script.extend(std::iter::repeat_n(DiffAction::Equal, prefix));
    align(old_mid, new_mid, &mut eq, &mut script);
    script.extend(std::iter::repeat_n(DiffAction::Equal, suffix));
    script
}

fn align<A, B>(
    old: &[A],
    new: &[B],
    eq: &mut impl FnMut(&A, &B) -> bool,
    script: &mut Vec<DiffAction>,
) {
    let (rows, cols) = (old.len(), new.len());
    if rows == 0 || cols == 0 {
        script.extend(std::iter::repeat_n(DiffAction::Delete, rows));
        script.extend(std::iter::repeat_n(DiffAction::Insert, cols));
        return;
    }

    // lcs[i * (cols + 1) + j]: LCS length of old[i..] and new[j..]
    let width = cols + 1;
    let mut lcs = vec![0usize; (rows + 1) * width];
    let mut matches = vec![false; rows * cols];
    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            let cell = i * width + j;
            lcs[cell] = if eq(&old[i], &new[j]) {
                matches[i * cols + j] = true;
                lcs[cell + width + 1] + 1
            } else {
                lcs[cell + width].max(lcs[cell + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    let (mut deletes, mut inserts) = (0, 0);

    while i < rows && j < cols {
        let cell = i * width + j;
        if matches[i * cols + j] && lcs[cell] == lcs[cell + width + 1] + 1 {
            flush(script, &mut deletes, &mut inserts);
            script.push(DiffAction::Equal);
            i += 1;
            j += 1;
        } else if lcs[cell + width] >= lcs[cell + 1] {
            deletes += 1;
            i += 1;
        } else {
            inserts += 1;
            j += 1;
        }
    }
    deletes += rows - i;
    inserts += cols - j;
    flush(script, &mut deletes, &mut inserts);
}

fn flush(script: &mut Vec<DiffAction>, deletes: &mut usize, inserts: &mut usize) {
    script.extend(std::iter::repeat_n(DiffAction::Delete, *deletes));
    script.extend(std::iter::repeat_n(DiffAction::Insert, *inserts));
    *deletes = 0;
    *inserts = 0;
}

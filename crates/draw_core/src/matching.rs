//! Exact perfect matching by backtracking
//!
//! Pairs up every item so that each pair satisfies a compatibility predicate.
//! The search fixes the first unmatched item, tries each later compatible
//! partner, recurses and backtracks on dead ends. It is exponential in the
//! worst case and meant for the small pools a bracket round produces.

/// Find any perfect matching of `items` under `compatible`
///
/// Returns index pairs `(i, j)` with `i < j`, in the order they were fixed.
/// `None` when the count is odd or no complete pairing exists.
pub fn find_perfect_matching<T, F>(items: &[T], compatible: F) -> Option<Vec<(usize, usize)>>
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() % 2 != 0 {
        return None;
    }

    let mut used = vec![false; items.len()];
    let mut pairs = Vec::with_capacity(items.len() / 2);
    if search(items, &compatible, &mut used, &mut pairs) {
        Some(pairs)
    } else {
        None
    }
}

fn search<T, F>(
    items: &[T],
    compatible: &F,
    used: &mut [bool],
    pairs: &mut Vec<(usize, usize)>,
) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    let Some(i) = used.iter().position(|u| !u) else {
        return true;
    };
    used[i] = true;

    for j in (i + 1)..items.len() {
        if used[j] || !compatible(&items[i], &items[j]) {
            continue;
        }
        used[j] = true;
        pairs.push((i, j));
        if search(items, compatible, used, pairs) {
            return true;
        }
        pairs.pop();
        used[j] = false;
    }

    used[i] = false;
    false
}

//! Capped simple-cycle enumeration (SPEC_FULL.md §4.3, §9 design note).
//!
//! Simple-cycle enumeration is exponential in the worst case, so this
//! caps cycle length and total result count and reports truncation
//! explicitly rather than silently dropping cycles.

pub const DEFAULT_MAX_CYCLE_LENGTH: usize = 8;
pub const DEFAULT_MAX_RESULTS: usize = 1000;

pub struct CycleSearchResult {
    pub cycles: Vec<Vec<usize>>,
    pub truncated: bool,
}

/// Finds every simple cycle (each reported exactly once, anchored at
/// its lowest-index node to avoid rotational duplicates).
pub fn find_simple_cycles(
    adjacency: &[Vec<usize>],
    max_length: usize,
    max_results: usize,
) -> CycleSearchResult {
    let n = adjacency.len();
    let mut cycles = Vec::new();
    let mut truncated = false;

    'outer: for start in 0..n {
        let mut path = vec![start];
        let mut on_path = vec![false; n];
        on_path[start] = true;
        if dfs(
            adjacency,
            start,
            start,
            &mut path,
            &mut on_path,
            max_length,
            max_results,
            &mut cycles,
        ) {
            truncated = true;
            break 'outer;
        }
    }

    CycleSearchResult { cycles, truncated }
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    adjacency: &[Vec<usize>],
    start: usize,
    current: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    max_length: usize,
    max_results: usize,
    cycles: &mut Vec<Vec<usize>>,
) -> bool {
    for &next in &adjacency[current] {
        if next == start {
            if path.len() >= 3 {
                if cycles.len() >= max_results {
                    return true;
                }
                cycles.push(path.clone());
                if cycles.len() >= max_results {
                    return true;
                }
            }
            continue;
        }
        if next < start || on_path[next] || path.len() >= max_length {
            continue;
        }
        path.push(next);
        on_path[next] = true;
        let hit_cap = dfs(
            adjacency, start, next, path, on_path, max_length, max_results, cycles,
        );
        path.pop();
        on_path[next] = false;
        if hit_cap {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_three_node_cycle() {
        // 0 -> 1 -> 2 -> 0
        let adjacency = vec![vec![1], vec![2], vec![0]];
        let result = find_simple_cycles(&adjacency, DEFAULT_MAX_CYCLE_LENGTH, DEFAULT_MAX_RESULTS);
        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0], vec![0, 1, 2]);
        assert!(!result.truncated);
    }

    #[test]
    fn ignores_two_node_cycles() {
        // 0 -> 1 -> 0
        let adjacency = vec![vec![1], vec![0]];
        let result = find_simple_cycles(&adjacency, DEFAULT_MAX_CYCLE_LENGTH, DEFAULT_MAX_RESULTS);
        assert!(result.cycles.is_empty());
    }

    #[test]
    fn caps_result_count_and_reports_truncation() {
        // a dense graph where many 3-cycles exist
        let n = 6;
        let mut adjacency = vec![Vec::new(); n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    adjacency[i].push(j);
                }
            }
        }
        let result = find_simple_cycles(&adjacency, DEFAULT_MAX_CYCLE_LENGTH, 3);
        assert_eq!(result.cycles.len(), 3);
        assert!(result.truncated);
    }
}

//! Parameter grid utilities: validation and segment lookup.

use traj_core::{Result, TrajError};

/// Check that all grid values are finite and strictly ascending.
///
/// `what` names the sequence in error messages (e.g. "grid", "time").
pub fn check_grid(what: &'static str, grid: &[f64]) -> Result<()> {
    if let Some(index) = grid.iter().position(|t| !t.is_finite()) {
        return Err(TrajError::NonFinite { what, index });
    }
    if let Some(index) = grid.windows(2).position(|w| w[0] >= w[1]) {
        return Err(TrajError::NotAscending {
            what,
            index: index + 1,
        });
    }
    Ok(())
}

/// Find the segment index for parameter `t` in the grid.
///
/// Returns the last index `i` such that `grid[i] <= t`, limited to the
/// range of valid segment indices `0..grid.len() - 1`.
/// Parameters below the grid map to the first segment, parameters above
/// it to the last one. The grid must have at least two entries and must
/// not be decreasing (repeated values are allowed).
pub fn find_segment(grid: &[f64], t: f64) -> usize {
    debug_assert!(grid.len() >= 2, "a grid needs at least two values");
    let last = grid.len() - 1;

    if t >= grid[last] {
        return last - 1;
    }
    if t < grid[0] {
        return 0;
    }

    // Binary search, grid[low] <= t < grid[high]
    let mut low = 0;
    let mut high = last;
    while high - low > 1 {
        let mid = (low + high) / 2;
        if grid[mid] <= t {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// Clamp `t` to the grid's range and find its segment.
///
/// NaN is mapped to the first grid value.
pub fn clamp_and_find_segment(grid: &[f64], t: f64) -> (f64, usize) {
    let first = grid[0];
    let last = grid[grid.len() - 1];
    let t = t.max(first).min(last);
    (t, find_segment(grid, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_grid() {
        assert!(check_grid("grid", &[0.0, 1.0, 2.5]).is_ok());
        assert_eq!(
            check_grid("grid", &[0.0, 1.0, 1.0]),
            Err(TrajError::NotAscending {
                what: "grid",
                index: 2
            })
        );
        assert_eq!(
            check_grid("time", &[0.0, f64::NAN]),
            Err(TrajError::NonFinite {
                what: "time",
                index: 1
            })
        );
        assert!(check_grid("grid", &[0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_find_segment() {
        let grid = [0.0, 1.0, 2.0, 3.0];

        assert_eq!(find_segment(&grid, -1.0), 0);
        assert_eq!(find_segment(&grid, 0.0), 0);
        assert_eq!(find_segment(&grid, 0.5), 0);
        assert_eq!(find_segment(&grid, 1.0), 1);
        assert_eq!(find_segment(&grid, 1.5), 1);
        assert_eq!(find_segment(&grid, 2.5), 2);
        assert_eq!(find_segment(&grid, 3.0), 2);
        assert_eq!(find_segment(&grid, 7.0), 2);
    }

    #[test]
    fn test_find_segment_repeated_values() {
        // Zero-length segment in the middle
        let grid = [0.0, 1.0, 1.0, 2.0];
        assert_eq!(find_segment(&grid, 0.5), 0);
        assert_eq!(find_segment(&grid, 1.0), 2);
        assert_eq!(find_segment(&grid, 1.5), 2);
    }

    #[test]
    fn test_clamp_and_find_segment() {
        let grid = [5.0, 6.0];
        assert_eq!(clamp_and_find_segment(&grid, 4.0), (5.0, 0));
        assert_eq!(clamp_and_find_segment(&grid, 5.5), (5.5, 0));
        assert_eq!(clamp_and_find_segment(&grid, 9.0), (6.0, 0));
        assert_eq!(clamp_and_find_segment(&grid, f64::NAN), (5.0, 0));
    }
}

//! Star-range partitioning
//!
//! The search API caps how many results a single query can page through, so
//! the full star-count domain is split into bounded windows and each window is
//! queried separately. Windows are half-open ranges `[min, max)` that tile
//! `[lower, upper)` exactly: each window's `max` is the next window's `min`.
//!
//! Window width is a tuning parameter; it must be chosen small enough that no
//! window's result count exceeds what the API will page through. That is not
//! verified dynamically here.

use std::fmt;

/// A half-open star-count range `[min, max)` bounding one query's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarWindow {
    /// Inclusive lower bound
    pub min: u64,
    /// Exclusive upper bound
    pub max: u64,
}

impl StarWindow {
    /// Renders the GitHub search qualifier for this window
    ///
    /// GitHub's `stars:A..B` qualifier is inclusive on both ends, so the
    /// half-open `[min, max)` becomes `stars:min..max-1`.
    pub fn search_qualifier(&self) -> String {
        format!("stars:{}..{}", self.min, self.max - 1)
    }

    /// Returns true if the given star count falls inside this window
    pub fn contains(&self, stars: u64) -> bool {
        stars >= self.min && stars < self.max
    }
}

impl fmt::Display for StarWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}

/// Lazy, finite iterator of star windows covering `[lower, upper)`
///
/// Pure function of `(lower, upper, width)`; restartable by constructing a
/// new iterator with the same bounds. The final window is clamped to `upper`
/// when the width does not divide the range evenly.
#[derive(Debug, Clone)]
pub struct StarWindows {
    next_min: u64,
    upper: u64,
    width: u64,
}

impl StarWindows {
    /// Creates a window sequence over `[lower, upper)` with the given width
    ///
    /// An empty range (`lower >= upper`) yields no windows. Width must be
    /// non-zero; configuration validation enforces this before a crawl starts.
    pub fn new(lower: u64, upper: u64, width: u64) -> Self {
        debug_assert!(width > 0, "window width must be non-zero");
        Self {
            next_min: lower,
            upper,
            width,
        }
    }
}

impl Iterator for StarWindows {
    type Item = StarWindow;

    fn next(&mut self) -> Option<StarWindow> {
        if self.next_min >= self.upper {
            return None;
        }

        let min = self.next_min;
        let max = self.upper.min(min.saturating_add(self.width));
        self.next_min = max;

        Some(StarWindow { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_partition() {
        let windows: Vec<_> = StarWindows::new(100, 700, 200).collect();
        assert_eq!(
            windows,
            vec![
                StarWindow { min: 100, max: 300 },
                StarWindow { min: 300, max: 500 },
                StarWindow { min: 500, max: 700 },
            ]
        );
    }

    #[test]
    fn test_ragged_final_window_is_clamped() {
        let windows: Vec<_> = StarWindows::new(0, 250, 100).collect();
        assert_eq!(windows.last().unwrap().max, 250);
        assert_eq!(windows.len(), 3);
    }

    #[test]
    fn test_empty_range_yields_no_windows() {
        assert_eq!(StarWindows::new(500, 500, 100).count(), 0);
        assert_eq!(StarWindows::new(600, 500, 100).count(), 0);
    }

    #[test]
    fn test_coverage_no_gaps_no_overlaps() {
        // Exact cover of [lower, upper): consecutive windows share a boundary
        // and the ends line up, for assorted triples including non-divisible
        // widths.
        for &(lower, upper, width) in &[
            (0u64, 1000u64, 1u64),
            (0, 1000, 7),
            (100, 200000, 200),
            (3, 10, 3),
            (0, 1, 100),
        ] {
            let windows: Vec<_> = StarWindows::new(lower, upper, width).collect();
            assert_eq!(windows.first().unwrap().min, lower);
            assert_eq!(windows.last().unwrap().max, upper);
            for pair in windows.windows(2) {
                assert_eq!(pair[0].max, pair[1].min);
            }
            for w in &windows {
                assert!(w.min < w.max);
            }
        }
    }

    #[test]
    fn test_restartable() {
        let first: Vec<_> = StarWindows::new(100, 500, 100).collect();
        let second: Vec<_> = StarWindows::new(100, 500, 100).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_qualifier_is_inclusive() {
        let window = StarWindow { min: 100, max: 300 };
        assert_eq!(window.search_qualifier(), "stars:100..299");
    }

    #[test]
    fn test_contains() {
        let window = StarWindow { min: 100, max: 200 };
        assert!(window.contains(100));
        assert!(window.contains(199));
        assert!(!window.contains(200));
        assert!(!window.contains(99));
    }
}

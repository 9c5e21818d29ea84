// ── Read-side helpers ──
//
// Filtering and aggregation over package snapshots. Pure functions so
// both the admin and user screens share one implementation.

use std::sync::Arc;

use crate::model::Package;

/// Which packages a screen should show.
///
/// The admin dashboard uses `PackageFilter::default()` (everything);
/// the user dashboard restricts to in-storage packages addressed to
/// one surname.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    /// When set, only in-storage packages whose surname matches
    /// (ASCII case-insensitive) are included.
    pub surname: Option<String>,
}

impl PackageFilter {
    pub fn for_surname(surname: impl Into<String>) -> Self {
        Self {
            surname: Some(surname.into()),
        }
    }

    pub fn matches(&self, package: &Package) -> bool {
        match &self.surname {
            Some(surname) => {
                package.status.is_in_storage()
                    && package.surname.eq_ignore_ascii_case(surname)
            }
            None => true,
        }
    }

    /// Apply the filter to a snapshot, preserving snapshot order.
    pub fn apply(&self, snapshot: &[Arc<Package>]) -> Vec<Arc<Package>> {
        snapshot
            .iter()
            .filter(|p| self.matches(p))
            .map(Arc::clone)
            .collect()
    }
}

/// Aggregate figures shown above the package table. Always recomputed
/// from the filtered set, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub package_count: usize,
    pub total_weight_kg: f64,
}

impl Summary {
    pub fn of(packages: &[Arc<Package>]) -> Self {
        Self {
            package_count: packages.len(),
            total_weight_kg: packages.iter().map(|p| p.weight_kg).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::PackageStatus;

    fn package(id: &str, surname: &str, weight: f64, status: PackageStatus) -> Arc<Package> {
        Arc::new(Package {
            id: id.into(),
            surname: surname.into(),
            weight_kg: weight,
            arrival: Utc::now(),
            status,
        })
    }

    fn sample() -> Vec<Arc<Package>> {
        vec![
            package("PKG-1", "Rossi", 2.5, PackageStatus::InStorage),
            package("PKG-2", "Rossi", 1.0, PackageStatus::Delivered),
            package("PKG-3", "Bianchi", 0.5, PackageStatus::InStorage),
        ]
    }

    #[test]
    fn default_filter_keeps_everything() {
        let all = PackageFilter::default().apply(&sample());
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn surname_filter_keeps_only_in_storage_matches() {
        let mine = PackageFilter::for_surname("rossi").apply(&sample());
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "PKG-1");
    }

    #[test]
    fn summary_counts_and_sums_weight() {
        let summary = Summary::of(&sample());
        assert_eq!(summary.package_count, 3);
        assert!((summary.total_weight_kg - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_empty_set_is_zero() {
        let summary = Summary::of(&[]);
        assert_eq!(summary.package_count, 0);
        assert!(summary.total_weight_kg.abs() < f64::EPSILON);
    }
}

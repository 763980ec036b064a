//! Upgrade path computation
//!
//! A plan is an ordered chain of hops routed through every LTS line
//! between the endpoints. LTS lines are the only supported waypoints:
//! the community ships migration wizards against them, so skipping one
//! trades a supported path for an untested jump.

use brokkr_core::types::Hop;
use brokkr_core::{Error, PlatformVersion, Result};
use brokkr_catalog::ReleaseCatalog;
use tracing::debug;

/// Computes upgrade (and, when allowed, downgrade) paths over a catalog
pub struct Planner<'a> {
    catalog: &'a ReleaseCatalog,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a ReleaseCatalog) -> Self {
        Self { catalog }
    }

    /// Plan the hop chain from `from` to `to`
    ///
    /// Hops are contiguous: each hop's `to` is the next hop's `from`.
    /// Intermediate waypoints are always LTS lines. Downgrades are
    /// refused unless `allow_downgrade` is set, in which case the plan
    /// is a single direct hop flagged as such.
    pub fn plan(
        &self,
        from: &PlatformVersion,
        to: &PlatformVersion,
        allow_downgrade: bool,
    ) -> Result<Vec<Hop>> {
        if from.same_minor_line(to) {
            return Err(Error::same_version(from.minor_line()));
        }

        // Both endpoints must be known lines before any routing
        let from_known = self.catalog.get(from).is_some();
        let to_known = self.catalog.get(to).is_some();
        match (from_known, to_known) {
            (false, false) => {
                return Err(Error::unknown_version(
                    format!("{from} and {to}"),
                    "source and target",
                ))
            }
            (false, true) => return Err(Error::unknown_version(from.to_string(), "source")),
            (true, false) => return Err(Error::unknown_version(to.to_string(), "target")),
            (true, true) => {}
        }

        // Covers cross-major downgrades and same-major minor downgrades
        if to < from {
            if !allow_downgrade {
                return Err(Error::downgrade_not_allowed(
                    from.to_string(),
                    to.to_string(),
                ));
            }
            debug!("Planning explicit downgrade {from} -> {to}");
            return Ok(vec![Hop::downgrade(from.clone(), to.clone())]);
        }

        Ok(self.route_upgrade(from, to))
    }

    /// Route an upgrade through every intermediate LTS line
    fn route_upgrade(&self, from: &PlatformVersion, to: &PlatformVersion) -> Vec<Hop> {
        let milestones: Vec<PlatformVersion> = self
            .catalog
            .lts_releases()
            .iter()
            .map(|r| PlatformVersion::new(r.version.major, r.version.minor))
            .filter(|v| v.major > from.major && v.minor_key() <= to.minor_key())
            .collect();

        let mut hops = Vec::with_capacity(milestones.len() + 1);
        let mut current = from.clone();
        for milestone in milestones {
            hops.push(Hop::new(current, milestone.clone()));
            current = milestone;
        }
        if !current.same_minor_line(to) {
            hops.push(Hop::new(current, to.clone()));
        }

        debug!("Planned {} hop(s) from {from} to {to}", hops.len());
        hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokkr_core::types::{Complexity, Release, ReleaseType};

    fn release(version: &str, release_type: ReleaseType) -> Release {
        Release {
            version: version.parse().unwrap(),
            release_type,
            release_date: None,
            active_support_until: None,
            security_support_until: None,
            php_range: None,
            database_requirement: None,
            composer_min_version: None,
            needs_schema_change: true,
            needs_upgrade_wizard: true,
        }
    }

    fn catalog() -> ReleaseCatalog {
        ReleaseCatalog::new(vec![
            release("9.5.31", ReleaseType::Lts),
            release("10.4.37", ReleaseType::Lts),
            release("11.5.41", ReleaseType::Lts),
            release("12.4.31", ReleaseType::Lts),
            release("13.0.4", ReleaseType::Sts),
            release("13.4.12", ReleaseType::Lts),
        ])
    }

    fn plan(from: &str, to: &str, allow_downgrade: bool) -> Result<Vec<Hop>> {
        let catalog = catalog();
        Planner::new(&catalog).plan(
            &from.parse().unwrap(),
            &to.parse().unwrap(),
            allow_downgrade,
        )
    }

    #[test]
    fn test_multi_major_routes_through_lts_lines() {
        let hops = plan("10.4", "13.4", false).unwrap();

        let legs: Vec<(String, String)> = hops
            .iter()
            .map(|h| (h.from.to_string(), h.to.to_string()))
            .collect();
        assert_eq!(
            legs,
            vec![
                ("10.4".into(), "11.5".into()),
                ("11.5".into(), "12.4".into()),
                ("12.4".into(), "13.4".into()),
            ]
        );
        assert!(hops.iter().all(|h| h.complexity == Complexity::Medium));
        assert!(hops.iter().all(|h| h.breaking));
    }

    #[test]
    fn test_hops_are_contiguous() {
        let hops = plan("9.5", "13.4", false).unwrap();
        for pair in hops.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
        assert_eq!(hops[0].from.to_string(), "9.5");
        assert_eq!(hops.last().unwrap().to.to_string(), "13.4");
    }

    #[test]
    fn test_sts_target_gets_trailing_hop() {
        // 13.0 is not LTS, so the chain ends with an extra 12.4 -> 13.0 leg
        let hops = plan("11.5", "13.0", false).unwrap();
        let last = hops.last().unwrap();
        assert_eq!(last.from.to_string(), "12.4");
        assert_eq!(last.to.to_string(), "13.0");
        // The 13.4 LTS line is beyond the target and must not appear
        assert!(hops.iter().all(|h| h.to.to_string() != "13.4"));
    }

    #[test]
    fn test_single_major_is_one_hop() {
        let hops = plan("12.4", "13.4", false).unwrap();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].complexity, Complexity::Medium);
    }

    #[test]
    fn test_same_version_refused() {
        let err = plan("12.4", "12.4", false).unwrap_err();
        assert!(matches!(err, Error::SameVersion { .. }));
    }

    #[test]
    fn test_downgrade_refused_by_default() {
        let err = plan("12.4", "11.5", false).unwrap_err();
        assert!(matches!(err, Error::DowngradeNotAllowed { .. }));
    }

    #[test]
    fn test_same_major_minor_downgrade_refused() {
        let err = plan("13.4", "13.0", false).unwrap_err();
        assert!(matches!(err, Error::DowngradeNotAllowed { .. }));
    }

    #[test]
    fn test_allowed_downgrade_is_one_direct_hop() {
        let hops = plan("12.4", "10.4", true).unwrap();
        assert_eq!(hops.len(), 1);
        assert!(hops[0].is_downgrade);
        assert!(hops[0].breaking);
        assert_eq!(hops[0].complexity, Complexity::VeryHigh);
    }

    #[test]
    fn test_unknown_source_named() {
        let err = plan("10.3", "13.4", false).unwrap_err();
        match err {
            Error::UnknownVersion { version, side } => {
                assert_eq!(version, "10.3");
                assert_eq!(side, "source");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_target_named() {
        let err = plan("10.4", "13.3", false).unwrap_err();
        match err {
            Error::UnknownVersion { side, .. } => assert_eq!(side, "target"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_both_endpoints_unknown() {
        let err = plan("10.3", "13.3", false).unwrap_err();
        match err {
            Error::UnknownVersion { side, .. } => assert_eq!(side, "source and target"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

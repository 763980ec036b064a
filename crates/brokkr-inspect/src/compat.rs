//! Extension compatibility probing
//!
//! Probing is a collaborator separate from extraction: the extractor
//! records the constraint it saw and leaves `compatible` unknown; a
//! probe may flip it later once an upgrade target is known. The
//! default probe evaluates the recorded constraint deterministically
//! and reports unknown when there is nothing to evaluate.

use brokkr_core::types::{ExtensionFact, SystemFacts};
use brokkr_core::PlatformVersion;
use semver::{Version, VersionReq};

/// Decides whether an extension works on a target platform version
pub trait CompatibilityProbe: Send + Sync {
    /// `Some(verdict)` when the probe can decide, `None` otherwise
    fn probe(&self, fact: &ExtensionFact, target: &PlatformVersion) -> Option<bool>;
}

/// Probe that never decides; every extension stays unknown
#[derive(Debug, Default)]
pub struct UnknownCompatibility;

impl CompatibilityProbe for UnknownCompatibility {
    fn probe(&self, _fact: &ExtensionFact, _target: &PlatformVersion) -> Option<bool> {
        None
    }
}

/// Probe that evaluates the constraint recorded during extraction
///
/// Bundled extensions are always compatible (they ship with the
/// target); third-party extensions are judged by their emconf range or
/// composer constraint when one was recorded.
#[derive(Debug, Default)]
pub struct ConstraintProbe;

impl CompatibilityProbe for ConstraintProbe {
    fn probe(&self, fact: &ExtensionFact, target: &PlatformVersion) -> Option<bool> {
        if fact.bundled {
            return Some(true);
        }
        let constraint = fact.typo3_constraint.as_deref()?;
        constraint_allows(constraint, target)
    }
}

/// Evaluate an emconf dash range (`11.5.0-12.4.99`) or a composer
/// constraint (`^12.4`) against a platform version. Unrecognized
/// formats yield `None`, never a guess.
pub fn constraint_allows(constraint: &str, version: &PlatformVersion) -> Option<bool> {
    let trimmed = constraint.trim();

    if let Some((low, high)) = trimmed.split_once('-') {
        let low: PlatformVersion = low.trim().parse().ok()?;
        let high: PlatformVersion = high.trim().parse().ok()?;
        // Compare on minor lines so "12.4" satisfies an upper bound of 12.4.99
        return Some(version.minor_key() >= low.minor_key() && version.minor_key() <= high.minor_key());
    }

    let req = VersionReq::parse(trimmed).ok()?;
    let full = Version::new(
        version.major as u64,
        version.minor as u64,
        version.patch.unwrap_or(0) as u64,
    );
    Some(req.matches(&full))
}

/// Run a probe over every extension in the facts, in place
pub fn apply_probe(facts: &mut SystemFacts, probe: &dyn CompatibilityProbe, target: &PlatformVersion) {
    for fact in &mut facts.extensions {
        fact.compatible = probe.probe(fact, target);
    }
}

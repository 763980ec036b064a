//! Extension key to Composer package resolution
//!
//! Resolution order: direct mapping table, then a remote lookup when
//! one is configured, then the vendor recorded on the extension fact,
//! then the generic `typo3-ter/` community namespace. Results are
//! memoized per extension key for the session; lookup failures degrade
//! to the heuristics and never block the caller.

use std::collections::HashMap;

use brokkr_core::types::ExtensionFact;
use parking_lot::Mutex;
use tracing::debug;

/// Known extension keys and their fully-qualified Composer packages
const PACKAGE_MAP: &[(&str, &str)] = &[
    ("news", "georgringer/news"),
    ("powermail", "in2code/powermail"),
    ("femanager", "in2code/femanager"),
    ("lux", "in2code/lux"),
    ("mask", "mask/mask"),
    ("container", "b13/container"),
    ("solr", "apache-solr-for-typo3/solr"),
    ("ke_search", "tpwd/ke_search"),
    ("gridelements", "gridelementsteam/gridelements"),
    ("tt_address", "friendsoftypo3/tt-address"),
    ("static_info_tables", "sjbr/static-info-tables"),
    ("bootstrap_package", "bk2k/bootstrap-package"),
    ("vhs", "fluidtypo3/vhs"),
    ("flux", "fluidtypo3/flux"),
    ("realurl", "dmitryd/typo3-realurl"),
    ("sourceopt", "fsg/sourceopt"),
    ("min", "lochmueller/min"),
    ("autoloader", "lochmueller/autoloader"),
    ("yoast_seo", "yoast-seo-for-typo3/yoast_seo"),
    ("typoscript_rendering", "helhum/typoscript-rendering"),
];

/// Remote package lookup collaborator (e.g. a Packagist search client).
/// The default resolver runs without one; lookups are best-effort.
pub trait PackageLookup: Send + Sync {
    /// Resolve an extension key to a fully-qualified package identifier
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Memoizing resolver from extension facts to Composer package identifiers
pub struct PackageResolver {
    lookup: Option<Box<dyn PackageLookup>>,
    cache: Mutex<HashMap<String, Option<String>>>,
}

impl PackageResolver {
    /// Create a resolver using only the mapping table and heuristics
    pub fn new() -> Self {
        Self {
            lookup: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create a resolver backed by a remote lookup collaborator
    pub fn with_lookup(lookup: Box<dyn PackageLookup>) -> Self {
        Self {
            lookup: Some(lookup),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve an extension to its Composer package identifier
    ///
    /// Bundled extensions resolve to `None`: they ship with the core
    /// package and must not appear in the composed command.
    pub fn resolve(&self, fact: &ExtensionFact) -> Option<String> {
        if fact.bundled || fact.key.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.lock().get(&fact.key) {
            return cached.clone();
        }

        let resolved = self.resolve_uncached(fact);
        self.cache
            .lock()
            .insert(fact.key.clone(), resolved.clone());
        resolved
    }

    fn resolve_uncached(&self, fact: &ExtensionFact) -> Option<String> {
        if let Some((_, package)) = PACKAGE_MAP.iter().find(|(key, _)| *key == fact.key) {
            return Some((*package).to_string());
        }

        if let Some(lookup) = &self.lookup {
            if let Some(package) = lookup.lookup(&fact.key) {
                debug!("Resolved '{}' via remote lookup: {}", fact.key, package);
                return Some(package);
            }
            debug!("Remote lookup missed '{}'; using heuristics", fact.key);
        }

        let dashed = fact.key.replace('_', "-");
        if let Some(vendor) = fact.vendor.as_deref().filter(|v| !v.is_empty()) {
            return Some(format!("{vendor}/{dashed}"));
        }

        Some(format!("typo3-ter/{dashed}"))
    }
}

impl Default for PackageResolver {
    fn default() -> Self {
        Self::new()
    }
}

//! Composer command composition
//!
//! Builds the literal `composer require` invocation for a hop: the
//! core package pinned to the target minor line, followed by every
//! resolvable third-party extension. Commands are cached per target so
//! repeated step generation over the same plan does no re-resolution.

use std::collections::{HashMap, HashSet};

use brokkr_catalog::PackageResolver;
use brokkr_core::types::ExtensionFact;
use brokkr_core::PlatformVersion;
use parking_lot::Mutex;

/// Composes `composer require` commands for upgrade hops
pub struct CommandComposer {
    resolver: PackageResolver,
    cache: Mutex<HashMap<String, String>>,
}

impl CommandComposer {
    pub fn new(resolver: PackageResolver) -> Self {
        Self {
            resolver,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The composed command for a target version and extension inventory
    ///
    /// Bundled and unresolvable extensions are skipped; duplicates
    /// (two keys resolving to the same package) collapse to one
    /// requirement. Output is order-stable: extensions appear in
    /// inventory order, so composing twice yields identical text.
    pub fn compose(&self, target: &PlatformVersion, extensions: &[ExtensionFact]) -> String {
        let key = cache_key(target, extensions);
        if let Some(cached) = self.cache.lock().get(&key) {
            return cached.clone();
        }

        let command = self.compose_uncached(target, extensions);
        self.cache.lock().insert(key, command.clone());
        command
    }

    fn compose_uncached(&self, target: &PlatformVersion, extensions: &[ExtensionFact]) -> String {
        let mut parts = vec![
            "composer".to_string(),
            "require".to_string(),
            format!("\"typo3/cms-core:^{}\"", target.minor_line()),
        ];

        let mut seen: HashSet<String> = HashSet::new();
        for fact in extensions {
            let Some(package) = self.resolver.resolve(fact) else {
                continue;
            };
            if seen.insert(package.clone()) {
                parts.push(package);
            }
        }

        parts.push("--with-all-dependencies".to_string());
        parts.join(" ")
    }
}

impl Default for CommandComposer {
    fn default() -> Self {
        Self::new(PackageResolver::new())
    }
}

fn cache_key(target: &PlatformVersion, extensions: &[ExtensionFact]) -> String {
    let mut key = target.minor_line();
    for fact in extensions {
        key.push('|');
        key.push_str(&fact.key);
    }
    key
}

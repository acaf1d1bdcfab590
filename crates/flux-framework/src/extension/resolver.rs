//! Module resolution and the module cache.
//!
//! [`ModuleResolver`] is the loader's window onto the host's module
//! mechanism: name resolution, spec lookup, module execution, and the
//! process-wide module cache. The cache is owned by the resolver *instance*
//! rather than being ambient global state, so independent loaders (and
//! tests) never interfere with each other.
//!
//! Module names are dot-separated paths (`admin.tools.backup`). A name
//! starting with dots is relative and is expanded against a package context
//! by [`resolve_relative`]: one leading dot anchors at the package itself,
//! each further dot climbs one level.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use flux_core::{BoxError, ExtensionError, ExtensionResult};

use super::module::{BoxedLifecycle, ModuleHandle};

// ============================================================================
// Relative name resolution
// ============================================================================

/// Expands a possibly-relative module name against a package context.
///
/// Absolute names pass through unchanged. Relative names require a package;
/// `.x` under package `a.b` resolves to `a.b.x`, `..x` to `a.x`, and so on.
///
/// # Errors
///
/// [`ExtensionError::NotFound`] when the name is relative and no package is
/// given, or when it climbs above the package root.
pub fn resolve_relative(name: &str, package: Option<&str>) -> ExtensionResult<String> {
    if !name.starts_with('.') {
        return Ok(name.to_string());
    }

    let not_found = || ExtensionError::NotFound {
        name: name.to_string(),
    };

    let package = match package {
        Some(p) if !p.is_empty() => p,
        _ => return Err(not_found()),
    };

    let level = name.chars().take_while(|&c| c == '.').count();
    let rest = &name[level..];

    let parts: Vec<&str> = package.split('.').collect();
    if parts.len() < level {
        // Too many leading dots for this package depth.
        return Err(not_found());
    }

    let base = parts[..parts.len() - (level - 1)].join(".");
    if rest.is_empty() {
        Ok(base)
    } else {
        Ok(format!("{base}.{rest}"))
    }
}

// ============================================================================
// ModuleSpec
// ============================================================================

/// Factory that executes a module body.
///
/// Returns the module's lifecycle hooks, `Ok(None)` for a module without a
/// `setup` entry point, or `Err` when the body itself raises.
pub type ModuleFactory = Arc<dyn Fn() -> Result<Option<BoxedLifecycle>, BoxError> + Send + Sync>;

/// A loadable specification for a named module.
#[derive(Clone)]
pub struct ModuleSpec {
    /// Canonical module name.
    pub name: String,
    factory: ModuleFactory,
}

impl ModuleSpec {
    /// Creates a spec from a canonical name and its body factory.
    pub fn new(name: impl Into<String>, factory: ModuleFactory) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }
}

impl std::fmt::Debug for ModuleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSpec").field("name", &self.name).finish()
    }
}

// ============================================================================
// ModuleResolver trait
// ============================================================================

/// The host's module resolution mechanism, as seen by the loader.
///
/// # Cache contract
///
/// [`execute`](Self::execute) inserts the executed module into the cache
/// before returning it (mirroring hosts where executing a module registers
/// it by name); a failed execution leaves nothing behind. The loader is
/// responsible for purging the cache on its own failure paths via
/// [`cache_remove_tree`](Self::cache_remove_tree).
pub trait ModuleResolver: Send + Sync {
    /// Expands `name` against `package` into a canonical name.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::NotFound`] on malformed relative names.
    fn resolve_name(&self, name: &str, package: Option<&str>) -> ExtensionResult<String> {
        resolve_relative(name, package)
    }

    /// Looks up a loadable spec for a canonical name.
    fn find_spec(&self, name: &str) -> Option<ModuleSpec>;

    /// Executes the module body, caching the resulting handle.
    ///
    /// # Errors
    ///
    /// The module body's own error, unwrapped; the cache is not touched on
    /// failure.
    fn execute(&self, spec: &ModuleSpec) -> Result<ModuleHandle, BoxError>;

    /// Inserts a handle into the module cache under its canonical name.
    fn cache_insert(&self, handle: ModuleHandle);

    /// Looks up a cached handle.
    fn cache_get(&self, name: &str) -> Option<ModuleHandle>;

    /// Snapshots `name` and every cached sub-path (`name.*`) without
    /// removing anything. Used to capture rollback state before a reload.
    fn cache_tree(&self, name: &str) -> Vec<ModuleHandle>;

    /// Removes `name` and every sub-path (`name.*`) from the cache.
    ///
    /// The removed entries are returned so a subsequent `load` re-executes
    /// fresh code rather than reusing cached state.
    fn cache_remove_tree(&self, name: &str) -> Vec<ModuleHandle>;

    /// Re-inserts previously removed cache entries.
    fn cache_restore(&self, entries: Vec<ModuleHandle>);
}

/// A shared resolver handle.
pub type BoxedResolver = Arc<dyn ModuleResolver>;

// ============================================================================
// MemoryResolver
// ============================================================================

/// In-memory [`ModuleResolver`].
///
/// Module bodies are registered as factories keyed by canonical name; the
/// module cache is a plain map behind a lock. This is both the test resolver
/// and the natural production implementation for hosts whose extensions are
/// compiled in and switched at runtime.
#[derive(Default)]
pub struct MemoryResolver {
    modules: RwLock<HashMap<String, ModuleFactory>>,
    cache: RwLock<HashMap<String, ModuleHandle>>,
}

impl MemoryResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module body under a canonical name.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Option<BoxedLifecycle>, BoxError> + Send + Sync + 'static,
    {
        self.modules.write().insert(name.into(), Arc::new(factory));
    }

    /// Registers a module whose body always yields the given lifecycle.
    pub fn register_lifecycle(&self, name: impl Into<String>, lifecycle: BoxedLifecycle) {
        self.register(name, move || Ok(Some(Arc::clone(&lifecycle))));
    }

    /// Removes a registered module body, e.g. to simulate a module vanishing
    /// between unload and re-load.
    pub fn unregister(&self, name: &str) {
        self.modules.write().remove(name);
    }

    /// Names currently present in the module cache, sorted.
    pub fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cache.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl ModuleResolver for MemoryResolver {
    fn find_spec(&self, name: &str) -> Option<ModuleSpec> {
        self.modules
            .read()
            .get(name)
            .map(|factory| ModuleSpec::new(name, Arc::clone(factory)))
    }

    fn execute(&self, spec: &ModuleSpec) -> Result<ModuleHandle, BoxError> {
        let lifecycle = (spec.factory)()?;
        let handle = match lifecycle {
            Some(lifecycle) => ModuleHandle::new(&spec.name, lifecycle),
            None => ModuleHandle::without_entry_point(&spec.name),
        };
        self.cache_insert(handle.clone());
        Ok(handle)
    }

    fn cache_insert(&self, handle: ModuleHandle) {
        self.cache.write().insert(handle.name.clone(), handle);
    }

    fn cache_get(&self, name: &str) -> Option<ModuleHandle> {
        self.cache.read().get(name).cloned()
    }

    fn cache_tree(&self, name: &str) -> Vec<ModuleHandle> {
        let prefix = format!("{name}.");
        self.cache
            .read()
            .iter()
            .filter(|(k, _)| k.as_str() == name || k.starts_with(&prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn cache_remove_tree(&self, name: &str) -> Vec<ModuleHandle> {
        let prefix = format!("{name}.");
        let mut cache = self.cache.write();
        let keys: Vec<String> = cache
            .keys()
            .filter(|k| k.as_str() == name || k.starts_with(&prefix))
            .cloned()
            .collect();
        keys.into_iter().filter_map(|k| cache.remove(&k)).collect()
    }

    fn cache_restore(&self, entries: Vec<ModuleHandle>) {
        let mut cache = self.cache.write();
        for handle in entries {
            cache.insert(handle.name.clone(), handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_names_pass_through() {
        assert_eq!(resolve_relative("a.b.c", None).unwrap(), "a.b.c");
        assert_eq!(resolve_relative("a", Some("pkg")).unwrap(), "a");
    }

    #[test]
    fn relative_names_expand_against_package() {
        assert_eq!(resolve_relative(".x", Some("a.b")).unwrap(), "a.b.x");
        assert_eq!(resolve_relative("..x", Some("a.b")).unwrap(), "a.x");
        assert_eq!(resolve_relative("..", Some("a.b")).unwrap(), "a");
    }

    #[test]
    fn relative_name_without_package_fails() {
        assert!(matches!(
            resolve_relative(".x", None),
            Err(ExtensionError::NotFound { .. })
        ));
    }

    #[test]
    fn too_many_dots_fail() {
        assert!(matches!(
            resolve_relative("...x", Some("a.b")),
            Err(ExtensionError::NotFound { .. })
        ));
    }

    #[test]
    fn cache_remove_tree_takes_sub_paths_only() {
        let resolver = MemoryResolver::new();
        resolver.cache_insert(ModuleHandle::without_entry_point("ext.a"));
        resolver.cache_insert(ModuleHandle::without_entry_point("ext.a.sub"));
        resolver.cache_insert(ModuleHandle::without_entry_point("ext.a.sub.deep"));
        resolver.cache_insert(ModuleHandle::without_entry_point("ext.ab"));

        let removed = resolver.cache_remove_tree("ext.a");
        assert_eq!(removed.len(), 3);
        // "ext.ab" shares a textual prefix but is not a sub-path.
        assert_eq!(resolver.cached_names(), vec!["ext.ab".to_string()]);

        resolver.cache_restore(removed);
        assert_eq!(resolver.cached_names().len(), 4);
    }

    #[test]
    fn execute_caches_on_success_only() {
        let resolver = MemoryResolver::new();
        resolver.register("ok", || Ok(None));
        resolver.register("boom", || Err("module body raised".into()));

        let spec = resolver.find_spec("ok").unwrap();
        resolver.execute(&spec).unwrap();
        assert!(resolver.cache_get("ok").is_some());

        let spec = resolver.find_spec("boom").unwrap();
        assert!(resolver.execute(&spec).is_err());
        assert!(resolver.cache_get("boom").is_none());
    }
}

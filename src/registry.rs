//! Component registry: discovery and on-demand loading of renderable units.
//!
//! The registry consumes a build-time manifest - a flat list of candidate
//! module paths with deferred loaders - and indexes it by folder and by
//! logical name. Discovery is metadata-only and never invokes a loader;
//! loading happens per name, on demand, first match in sorted folder order.
//!
//! Two content roots are recognized:
//!
//! - `components/<folder>/<Name>` - core units shipped with the engine host
//! - `user/components/<folder>/<Name>` - user-extensible units
//!
//! Folder names from both roots share one namespace; sorted folder order is
//! the authoritative tie-break when the same logical name appears in more
//! than one folder.

use crate::error::{ErrorKind, StructuredError};
use crate::render::Renderable;
use crate::{log, warn};
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Deferred, re-callable load operation for one renderable unit.
pub type ComponentLoader =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<Arc<dyn Renderable>>> + Send + Sync>;

const CORE_ROOT: &str = "components/";
const USER_ROOT: &str = "user/components/";

/// One line of the build-time manifest.
#[derive(Clone)]
pub struct ManifestEntry {
    /// Candidate module path, e.g. `user/components/layout/Hero`.
    pub module_path: String,
    pub loader: ComponentLoader,
}

impl ManifestEntry {
    pub fn new(module_path: impl Into<String>, loader: ComponentLoader) -> Self {
        Self {
            module_path: module_path.into(),
            loader,
        }
    }

    /// Manifest line for an already-constructed unit. The loader just
    /// hands out clones; useful for hosts that link units statically.
    pub fn unit(module_path: impl Into<String>, unit: Arc<dyn Renderable>) -> Self {
        Self::new(module_path, Arc::new(move || {
            let unit = unit.clone();
            Box::pin(async move { Ok(unit) }) as BoxFuture<'static, _>
        }))
    }
}

/// Discovery-time metadata for one unit.
#[derive(Clone)]
pub struct RegistryEntry {
    pub folder: String,
    pub name: String,
    pub loader: ComponentLoader,
}

/// Registry stats for the debug surface. No loading involved.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub total_folders: usize,
    pub total_components: usize,
    pub folders: Vec<String>,
}

/// Process-wide component index. Read-only after construction; the memo
/// cache of loaded units is the only mutable state.
pub struct ComponentRegistry {
    /// folder -> name -> entry. BTreeMap keeps folder iteration sorted,
    /// which is the collision tie-break order.
    folders: BTreeMap<String, BTreeMap<String, RegistryEntry>>,
    /// Units that have loaded successfully, keyed by name. Purely a
    /// performance memo; a duplicate concurrent load is benign.
    loaded: RwLock<HashMap<String, Arc<dyn Renderable>>>,
}

impl ComponentRegistry {
    /// Index a manifest. Paths outside the recognized content roots are
    /// skipped with a warning.
    pub fn from_manifest(manifest: Vec<ManifestEntry>) -> Self {
        let mut folders: BTreeMap<String, BTreeMap<String, RegistryEntry>> = BTreeMap::new();

        for entry in manifest {
            let Some((folder, name)) = parse_module_path(&entry.module_path) else {
                warn!("registry"; "ignoring manifest path outside content roots: {}", entry.module_path);
                continue;
            };
            folders.entry(folder.clone()).or_default().insert(
                name.clone(),
                RegistryEntry {
                    folder,
                    name,
                    loader: entry.loader,
                },
            );
        }

        Self {
            folders,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// All folders, deduplicated and sorted lexicographically.
    pub fn available_folders(&self) -> Vec<String> {
        self.folders.keys().cloned().collect()
    }

    /// Entries of one folder, keyed by logical name. Unknown folders
    /// answer an empty map, not a failure.
    pub fn components_by_folder(&self, folder: &str) -> BTreeMap<String, RegistryEntry> {
        match self.folders.get(folder) {
            Some(entries) => entries.clone(),
            None => {
                warn!(
                    "registry";
                    "folder '{folder}' not found. Available folders: {}",
                    self.available_folders().join(", ")
                );
                BTreeMap::new()
            }
        }
    }

    /// Flat sorted list of every known logical name.
    pub fn all_component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .folders
            .values()
            .flat_map(|entries| entries.keys().cloned())
            .collect();
        names.sort();
        names
    }

    /// Membership test, no loading.
    pub fn is_available(&self, name: &str) -> bool {
        self.folders.values().any(|entries| entries.contains_key(name))
    }

    /// Folder/component counts for the debug surface.
    pub fn stats(&self) -> RegistryStats {
        let folders = self.available_folders();
        RegistryStats {
            total_folders: folders.len(),
            total_components: self
                .folders
                .values()
                .map(|entries| entries.len())
                .sum(),
            folders,
        }
    }

    /// Load a unit by logical name.
    ///
    /// Folders are searched in sorted order and the first match wins. A
    /// loader failure propagates unmodified; an unknown name fails with a
    /// structured error listing every known name. Successful loads are
    /// memoized; repeated calls hand out the cached unit.
    pub async fn load_component(&self, name: &str) -> anyhow::Result<Arc<dyn Renderable>> {
        if let Some(unit) = self.loaded.read().get(name) {
            return Ok(unit.clone());
        }

        for (folder, entries) in &self.folders {
            if let Some(entry) = entries.get(name) {
                log!("registry"; "loading component: {name} from {folder}");
                let unit = (entry.loader)().await?;
                // A concurrent load of the same name may have won the race;
                // both units are equivalent, keep whichever landed first.
                self.loaded
                    .write()
                    .entry(name.to_string())
                    .or_insert_with(|| unit.clone());
                return Ok(unit);
            }
        }

        Err(StructuredError::new(
            ErrorKind::ComponentError,
            500,
            format!(
                "Component '{name}' not found in any folder. Available components: {}",
                self.all_component_names().join(", ")
            ),
        )
        .into())
    }
}

/// Split a candidate module path into (folder, logical name).
///
/// The logical name is the file's base name with any extension stripped.
fn parse_module_path(path: &str) -> Option<(String, String)> {
    let relative = path
        .strip_prefix(USER_ROOT)
        .or_else(|| path.strip_prefix(CORE_ROOT))?;

    let (folder, rest) = relative.split_once('/')?;
    let base = rest.rsplit('/').next()?;
    let name = base.split_once('.').map_or(base, |(stem, _)| stem);
    if folder.is_empty() || name.is_empty() {
        return None;
    }
    Some((folder.to_string(), name.to_string()))
}

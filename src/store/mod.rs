//! Release State Store — an on-disk, atomically updated catalogue of every
//! release attempt, its phase outcomes, and the current release per
//! environment (spec.md §4.A).
//!
//! Durability protocol: every write serialises the whole store in canonical
//! form, writes it to a sibling temp file, `fsync`s it, atomically renames
//! it over the destination, then `fsync`s the containing directory. A
//! reader either sees the prior consistent snapshot or the new one, never a
//! torn file.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{format_release_id, Phase, PhaseStatus, Release, PHASE_ORDER};
use crate::error::StagecraftError;

/// Schema version written by this build. Readers reject any other value
/// with `InvalidFormat` — there is no migration path yet because there is
/// only one version.
const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Environment variable re-read on every `ReleaseStore::open` call (never
/// cached) so tests can isolate the store path per-invocation.
pub const STORE_PATH_ENV: &str = "STAGECRAFT_STORE_PATH";

/// On-disk representation of the store. Field order matches the
/// declaration order below, and `BTreeMap` keys sort lexicographically, so
/// two serialisations of the same state are byte-identical (spec.md §6.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    schema_version: u32,
    releases: BTreeMap<String, Release>,
    /// Extension over spec.md's literal wire format: the current-release
    /// pointer per environment, maintained transactionally by
    /// `update_phase` rather than re-derived by scanning on every read.
    /// See SPEC_FULL.md §3 for the rationale.
    #[serde(default)]
    current_releases: BTreeMap<String, String>,
}

impl StoreFile {
    fn empty() -> Self {
        StoreFile {
            schema_version: CURRENT_SCHEMA_VERSION,
            releases: BTreeMap::new(),
            current_releases: BTreeMap::new(),
        }
    }
}

pub struct ReleaseStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl ReleaseStore {
    /// Resolve the store path per spec.md §4.A precedence: explicit
    /// constructor argument > environment variable override > default
    /// relative path `.stagecraft/releases.json` under `workspace`.
    pub fn open(explicit: Option<PathBuf>, workspace: &Path) -> Self {
        let path = explicit
            .or_else(|| {
                std::env::var(STORE_PATH_ENV)
                    .ok()
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| {
                workspace
                    .join(crate::config::ProjectConfig::workspace_dir_name())
                    .join("releases.json")
            });
        ReleaseStore {
            path,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile, StagecraftError> {
        if !self.path.exists() {
            return Ok(StoreFile::empty());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| StagecraftError::store_error(format!("failed to read store: {e}")))?;
        let file: StoreFile = serde_json::from_str(&content)
            .map_err(|e| StagecraftError::invalid_format(format!("failed to parse store: {e}")))?;
        if file.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(StagecraftError::invalid_format(format!(
                "unsupported store schema version {} (expected {})",
                file.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(file)
    }

    fn save(&self, file: &StoreFile) -> Result<(), StagecraftError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StagecraftError::store_error(format!("failed to create store directory: {e}"))
            })?;
        }
        let data = serde_json::to_vec_pretty(file)
            .map_err(|e| StagecraftError::store_error(format!("failed to serialize store: {e}")))?;

        let parent = self
            .path
            .parent()
            .ok_or_else(|| StagecraftError::store_error("store path has no parent directory"))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| StagecraftError::store_error(format!("failed to create tmp file: {e}")))?;
        tmp.write_all(&data)
            .map_err(|e| StagecraftError::store_error(format!("failed to write tmp file: {e}")))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StagecraftError::store_error(format!("failed to fsync tmp file: {e}")))?;
        tmp.persist(&self.path)
            .map_err(|e| StagecraftError::store_error(format!("failed to rename tmp file: {e}")))?;
        fsync_parent_dir(&self.path);
        Ok(())
    }

    /// `CreateRelease(env, version, commitSHA) → Release`.
    pub fn create_release(
        &self,
        env: &str,
        version: &str,
        commit_sha: &str,
    ) -> Result<Release, StagecraftError> {
        if env.is_empty() {
            return Err(StagecraftError::invalid_argument("environment is required"));
        }
        if version.is_empty() {
            return Err(StagecraftError::invalid_argument("version is required"));
        }

        let _lock = self.guard.lock().expect("store mutex poisoned");
        let mut file = self.load()?;

        let previous_id = file.current_releases.get(env).cloned().unwrap_or_default();
        let id = unique_release_id(&file.releases);
        let release = Release {
            id: id.clone(),
            environment: env.to_string(),
            version: version.to_string(),
            commit_sha: commit_sha.to_string(),
            timestamp: Utc::now(),
            previous_id,
            phases: crate::domain::Phases::all_pending(),
        };

        file.releases.insert(id.clone(), release.clone());
        self.save(&file)?;
        info!(release_id = %id, environment = env, version, "release created");
        Ok(release)
    }

    /// `GetRelease(id) → Release`.
    pub fn get_release(&self, id: &str) -> Result<Release, StagecraftError> {
        let _lock = self.guard.lock().expect("store mutex poisoned");
        let file = self.load()?;
        file.releases
            .get(id)
            .cloned()
            .ok_or_else(|| StagecraftError::not_found(format!("release '{id}' not found")))
    }

    /// `GetCurrentRelease(env) → Release`.
    pub fn get_current_release(&self, env: &str) -> Result<Release, StagecraftError> {
        let _lock = self.guard.lock().expect("store mutex poisoned");
        let file = self.load()?;
        let id = file.current_releases.get(env).ok_or_else(|| {
            StagecraftError::not_found(format!("no current release for environment '{env}'"))
        })?;
        file.releases.get(id).cloned().ok_or_else(|| {
            StagecraftError::not_found(format!(
                "current release pointer for '{env}' points at missing release '{id}'"
            ))
        })
    }

    /// `ListReleases(env) → []Release`, newest first.
    pub fn list_releases(&self, env: &str) -> Result<Vec<Release>, StagecraftError> {
        let _lock = self.guard.lock().expect("store mutex poisoned");
        let file = self.load()?;
        let mut releases: Vec<Release> = file
            .releases
            .values()
            .filter(|r| r.environment == env)
            .cloned()
            .collect();
        releases.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(releases)
    }

    /// `ListAllReleases() → []Release`, grouped by environment ascending,
    /// then by ID descending within each group.
    pub fn list_all_releases(&self) -> Result<Vec<Release>, StagecraftError> {
        let _lock = self.guard.lock().expect("store mutex poisoned");
        let file = self.load()?;
        let mut by_env: BTreeMap<String, Vec<Release>> = BTreeMap::new();
        for release in file.releases.values() {
            by_env
                .entry(release.environment.clone())
                .or_default()
                .push(release.clone());
        }
        let mut out = Vec::new();
        for (_env, mut releases) in by_env {
            releases.sort_by(|a, b| b.id.cmp(&a.id));
            out.extend(releases);
        }
        Ok(out)
    }

    /// `UpdatePhase(id, phase, status) → ()`.
    ///
    /// Atomically re-reads, validates the transition, mutates the one
    /// phase, and — when this write transitions `finalize` to `completed`
    /// — updates the environment's current-release pointer in the same
    /// write.
    pub fn update_phase(
        &self,
        id: &str,
        phase: Phase,
        status: PhaseStatus,
    ) -> Result<(), StagecraftError> {
        let _lock = self.guard.lock().expect("store mutex poisoned");
        let mut file = self.load()?;

        let release = file
            .releases
            .get_mut(id)
            .ok_or_else(|| StagecraftError::not_found(format!("release '{id}' not found")))?;

        let current = release.phases.get(phase);
        if !current.can_transition_to(status) {
            return Err(StagecraftError::invalid_argument(format!(
                "release '{id}' phase '{phase}' cannot transition from '{current}' to '{status}'"
            )));
        }
        release.phases.set(phase, status);
        let env = release.environment.clone();

        if phase == Phase::Finalize && status == PhaseStatus::Completed {
            file.current_releases.insert(env.clone(), id.to_string());
            debug!(release_id = id, environment = %env, "current release pointer updated");
        }

        self.save(&file)
    }

    /// Helper invoked when planning fails before the executor is ever
    /// entered: sets every phase of the release to `failed` in a single
    /// write, bypassing the normal per-phase transition rules (this is the
    /// one sanctioned direct jump from `pending` to `failed`).
    pub fn mark_all_failed(&self, id: &str) -> Result<(), StagecraftError> {
        let _lock = self.guard.lock().expect("store mutex poisoned");
        let mut file = self.load()?;
        let release = file
            .releases
            .get_mut(id)
            .ok_or_else(|| StagecraftError::not_found(format!("release '{id}' not found")))?;
        for phase in PHASE_ORDER {
            release.phases.set(phase, PhaseStatus::Failed);
        }
        warn!(release_id = id, "all phases marked failed (planner failure)");
        self.save(&file)
    }
}

fn unique_release_id(existing: &BTreeMap<String, Release>) -> String {
    let mut id = format_release_id(Utc::now());
    // Millisecond collisions are possible only in pathological test loops;
    // nudge forward deterministically rather than reaching for a random ID.
    while existing.contains_key(&id) {
        id.push('x');
    }
    id
}

fn fsync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

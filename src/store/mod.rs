// src/store/mod.rs
//
// In-memory entity snapshots. Each entity kind lives in its own cell and is
// replaced wholesale; commits to different kinds are independent of each other.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::{ActivityLogEntry, Dock, Kpis, Recommendation, Scenario, SiteId, Truck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Trucks,
    Docks,
    Recommendations,
    Kpis,
    ActivityLog,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Trucks => "trucks",
            EntityKind::Docks => "docks",
            EntityKind::Recommendations => "recommendations",
            EntityKind::Kpis => "kpis",
            EntityKind::ActivityLog => "activity_log",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The context a snapshot was produced for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Global,
    Site(SiteId),
    SiteSimulation(SiteId, Option<Scenario>),
}

impl QueryKey {
    pub fn site_id(&self) -> Option<&str> {
        match self {
            QueryKey::Global => None,
            QueryKey::Site(site) | QueryKey::SiteSimulation(site, _) => Some(site),
        }
    }
}

struct Slot<T> {
    key: QueryKey,
    value: Arc<T>,
}

pub struct Snapshot<T> {
    kind: EntityKind,
    cell: RwLock<Option<Slot<T>>>,
}

impl<T> Snapshot<T> {
    pub fn new(kind: EntityKind) -> Self {
        Snapshot { kind, cell: RwLock::new(None) }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Current value regardless of the key it belongs to.
    pub async fn get(&self) -> Option<Arc<T>> {
        self.cell.read().await.as_ref().map(|slot| Arc::clone(&slot.value))
    }

    pub async fn get_for(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.cell
            .read()
            .await
            .as_ref()
            .filter(|slot| &slot.key == key)
            .map(|slot| Arc::clone(&slot.value))
    }

    pub async fn key(&self) -> Option<QueryKey> {
        self.cell.read().await.as_ref().map(|slot| slot.key.clone())
    }

    pub async fn commit(&self, key: QueryKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let mut cell = self.cell.write().await;
        tracing::debug!(kind = %self.kind, ?key, "snapshot committed");
        *cell = Some(Slot { key, value: Arc::clone(&value) });
        value
    }

    /// Commits unless a snapshot for the same key is already there, in which
    /// case that one wins and is returned. `still_current` is checked under
    /// the write lock; when it fails nothing is touched and the value is
    /// handed back.
    pub async fn commit_if_absent<F>(&self, key: QueryKey, value: T, still_current: F) -> Result<Arc<T>, T>
    where
        F: FnOnce(&QueryKey) -> bool,
    {
        let mut cell = self.cell.write().await;
        if let Some(slot) = cell.as_ref().filter(|slot| slot.key == key) {
            tracing::debug!(kind = %self.kind, ?key, "snapshot already loaded, keeping it");
            return Ok(Arc::clone(&slot.value));
        }
        if !still_current(&key) {
            return Err(value);
        }
        let value = Arc::new(value);
        tracing::debug!(kind = %self.kind, ?key, "snapshot committed");
        *cell = Some(Slot { key, value: Arc::clone(&value) });
        Ok(value)
    }

    /// Replaces the snapshot with `f(current)` if the cell holds `key`.
    /// Returns the new value, or `None` when there was nothing to patch.
    pub async fn update_for<F>(&self, key: &QueryKey, f: F) -> Option<Arc<T>>
    where
        F: FnOnce(&T) -> T,
    {
        let mut cell = self.cell.write().await;
        let Some(slot) = cell.as_mut().filter(|slot| &slot.key == key) else {
            tracing::debug!(kind = %self.kind, ?key, "no snapshot loaded for key, patch skipped");
            return None;
        };
        slot.value = Arc::new(f(slot.value.as_ref()));
        tracing::debug!(kind = %self.kind, ?key, "snapshot patched");
        Some(Arc::clone(&slot.value))
    }
}

pub struct EntityStore {
    pub trucks: Snapshot<Vec<Truck>>,
    pub docks: Snapshot<Vec<Dock>>,
    pub recommendations: Snapshot<Vec<Recommendation>>,
    pub kpis: Snapshot<Kpis>,
    pub activity_log: Snapshot<Vec<ActivityLogEntry>>,
}

impl EntityStore {
    pub fn new() -> Self {
        EntityStore {
            trucks: Snapshot::new(EntityKind::Trucks),
            docks: Snapshot::new(EntityKind::Docks),
            recommendations: Snapshot::new(EntityKind::Recommendations),
            kpis: Snapshot::new(EntityKind::Kpis),
            activity_log: Snapshot::new(EntityKind::ActivityLog),
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        EntityStore::new()
    }
}

// Chart registry - single owner of every live chart instance
use crate::application::render_target::{ChartInstance, ChartSurface};
use crate::domain::chart::{ChartError, ChartId, ChartKind, ChartOptions, ChartSeries};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything needed to construct one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub series: ChartSeries,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    /// An existing instance was destroyed before the new one was built.
    Replaced,
    /// The page has no anchor for this chart.
    Skipped,
}

/// Owned handle; dropping it destroys the instance.
struct ChartHandle {
    instance: Box<dyn ChartInstance>,
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.instance.destroy();
    }
}

pub struct ChartRegistry {
    surface: Arc<dyn ChartSurface>,
    handles: Mutex<HashMap<ChartId, ChartHandle>>,
}

impl ChartRegistry {
    pub fn new(surface: Arc<dyn ChartSurface>) -> Self {
        Self {
            surface,
            handles: Mutex::new(HashMap::new()),
        }
    }

    fn handles(&self) -> MutexGuard<'_, HashMap<ChartId, ChartHandle>> {
        // A panic inside a chart callback must not wedge the registry.
        self.handles.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the chart at `id` with a new instance built from `series`.
    ///
    /// Any previous instance is destroyed before the new one is constructed,
    /// under the same lock, so no caller can observe two live instances.
    pub fn upsert(
        &self,
        id: ChartId,
        kind: ChartKind,
        series: ChartSeries,
        options: ChartOptions,
    ) -> Result<UpsertOutcome, ChartError> {
        series.validate()?;

        if !self.surface.has_anchor(id) {
            tracing::debug!(chart = %id, "No anchor for chart, skipping");
            return Ok(UpsertOutcome::Skipped);
        }

        let spec = ChartSpec {
            id,
            kind,
            series,
            options,
        };

        let mut handles = self.handles();
        let replaced = match handles.remove(&id) {
            Some(previous) => {
                drop(previous);
                true
            }
            None => false,
        };

        let instance = self.surface.create(&spec);
        handles.insert(id, ChartHandle { instance });

        tracing::debug!(chart = %id, replaced, points = spec.series.values.len(), "Chart rendered");
        Ok(if replaced {
            UpsertOutcome::Replaced
        } else {
            UpsertOutcome::Created
        })
    }

    /// Destroy the instance at `id`, if any.
    pub fn remove(&self, id: ChartId) -> bool {
        let removed = self.handles().remove(&id).is_some();
        if removed {
            tracing::debug!(chart = %id, "Chart removed");
        }
        removed
    }

    /// Destroy every owned instance.
    pub fn destroy_all(&self) -> usize {
        let mut handles = self.handles();
        let count = handles.len();
        handles.clear();
        if count > 0 {
            tracing::debug!(count, "Destroyed all charts");
        }
        count
    }

    pub fn is_live(&self, id: ChartId) -> bool {
        self.handles().contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.handles().len()
    }
}

impl Drop for ChartRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

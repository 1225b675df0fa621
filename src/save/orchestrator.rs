//! Capture and restore passes
//!
//! The orchestrator walks a list of live entities at a save point and asks
//! the registered serializer for each one to encode it. On load it walks the
//! saved items and asks each item's serializer to decode it.
//!
//! Capture is all-or-nothing: an entity kind with no serializer is a setup
//! bug, and a save missing that kind would be silently wrong. Restore is
//! best-effort: every item is attempted, failures are collected, and nothing
//! already applied is rolled back.

use std::cell::Cell;
use std::rc::Rc;

use super::error::{ItemError, SaveError};
use super::registry::SerializerRegistry;
use super::types::{SaveData, StringPair};
use crate::scene::{EntityRef, Scene};

/// Shared cancellation flag for a single-threaded save/load pass
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Outcome of one poll of a [`SettleWait`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    Pending,
    Settled,
    TimedOut,
    Cancelled,
}

/// Waits, frame by frame, for visual transitions to finish before a capture
///
/// Poll once per host update with the frame's delta time. Capture only after
/// `Settled`; on `TimedOut` or `Cancelled` the host decides whether to save.
#[derive(Debug, Clone)]
pub struct SettleWait {
    timeout: f32,
    elapsed: f32,
    cancel: CancelToken,
}

impl SettleWait {
    pub fn new(timeout_secs: f32, cancel: CancelToken) -> Self {
        SettleWait {
            timeout: timeout_secs.max(0.0),
            elapsed: 0.0,
            cancel,
        }
    }

    pub fn poll(&mut self, scene: &Scene, dt: f32) -> WaitStatus {
        if self.cancel.is_cancelled() {
            return WaitStatus::Cancelled;
        }
        if scene.is_settled() {
            return WaitStatus::Settled;
        }

        self.elapsed += dt;
        if self.elapsed >= self.timeout {
            WaitStatus::TimedOut
        } else {
            WaitStatus::Pending
        }
    }
}

/// Result of a cancellable restore
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Items applied successfully
    pub restored: usize,
    pub errors: Vec<ItemError>,
    /// True when the pass stopped early; items before the stop stay applied
    pub cancelled: bool,
}

pub struct SaveOrchestrator<'r> {
    registry: &'r SerializerRegistry,
}

impl<'r> SaveOrchestrator<'r> {
    pub fn new(registry: &'r SerializerRegistry) -> Self {
        SaveOrchestrator { registry }
    }

    /// Encodes each entity, in the order given, into a new save
    pub fn capture_all<I>(
        &self,
        save_name: &str,
        scene: &Scene,
        entities: I,
        pairs: Vec<StringPair>,
    ) -> Result<SaveData, SaveError>
    where
        I: IntoIterator<Item = EntityRef>,
    {
        let mut save_data = SaveData::with_pairs(save_name, pairs);

        for entity in entities {
            let serializer = self.registry.resolve(&entity.kind_id)?;
            let item = serializer.encode(scene, &entity.name)?;
            save_data.push_item(item);
        }

        log::info!(
            "Captured '{}' ({} items)",
            save_data.save_name(),
            save_data.items().len()
        );
        Ok(save_data)
    }

    /// Captures every entity the scene enumerates
    pub fn capture_scene(&self, save_name: &str, scene: &Scene) -> Result<SaveData, SaveError> {
        self.capture_all(save_name, scene, scene.entities(), Vec::new())
    }

    /// Applies every item; returns the ones that failed
    pub fn restore_all(&self, save_data: &SaveData, scene: &mut Scene) -> Vec<ItemError> {
        self.restore_cancellable(save_data, scene, &CancelToken::new()).errors
    }

    /// Applies items until done or until `cancel` is set
    pub fn restore_cancellable(
        &self,
        save_data: &SaveData,
        scene: &mut Scene,
        cancel: &CancelToken,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();

        for (index, item) in save_data.items().iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!(
                    "Restore of '{}' cancelled after {} items",
                    save_data.save_name(),
                    index
                );
                report.cancelled = true;
                break;
            }

            let outcome = self
                .registry
                .resolve(&item.kind_id)
                .and_then(|serializer| serializer.decode(item, scene));

            match outcome {
                Ok(()) => report.restored += 1,
                Err(source) => {
                    log::warn!("Skipping item {} ({}): {}", index, item.kind_id, source);
                    report.errors.push(ItemError {
                        index,
                        kind_id: item.kind_id.clone(),
                        source,
                    });
                }
            }
        }

        report
    }

    /// Parses a persisted record and restores it
    ///
    /// A record that cannot be parsed is the only fatal outcome.
    pub fn restore_from_json(&self, json: &str, scene: &mut Scene) -> Result<Vec<ItemError>, SaveError> {
        let save_data = SaveData::from_json(json)?;
        Ok(self.restore_all(&save_data, scene))
    }
}

//! # Scene Workbench
//!
//! Filter, sort, and batch-edit core for scene-tree editor tooling: project
//! a host scene graph into an ordered working list, select entities inside
//! it, mutate the whole selection as atomic batches, and keep a textual
//! undo/redo ledger of what happened.
//!
//! ## Core Types
//!
//! - [`SceneProvider`] / [`SceneWorld`] — host scene-graph seam and the
//!   in-memory reference implementation
//! - [`EntityFilter`] / [`SortKey`] / [`collect`] — the browse pipeline
//!   producing the working list
//! - [`EditSession`] — per-operator selection, criteria, and deferred
//!   undo/redo dispatch
//! - [`EditController`] — batch mutations grouped one-undo-step-per-batch
//! - [`ChangeHistory`] — descriptive undo/redo ledger
//! - [`UndoEngine`] / [`SnapshotUndoEngine`] — physical undo seam
//! - [`CapabilityRegistry`] — startup-resolved capability kinds
//!
//! The ledger and the host undo engine are two cooperating state machines
//! joined only by ordering discipline: the session pops the ledger, then
//! asks the host for one physical step. The ledger never stores field
//! values; see `DESIGN.md` for the reasoning and the known divergence mode.

pub mod browse;
pub mod capability;
pub mod edit;
mod entity;
pub mod scene;

pub use browse::{collect, sort_entities, EntityFilter, PresenceFilter, SortKey};
pub use capability::{CapabilityInfo, CapabilityKind, CapabilityRegistry};
pub use edit::{
    load_config, load_or_default, ActiveTogglePolicy, ChangeHistory, DisplayState, EditController,
    EditSession, SessionConfig, SnapshotUndoEngine, UndoEngine, UndoGroupId,
};
pub use entity::Entity;
pub use scene::{NodeState, SceneProvider, SceneWorld, Transform};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

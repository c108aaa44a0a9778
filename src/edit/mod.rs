//! Batch editing: the change ledger, the host undo seam, the mutation
//! controller, and per-session state.
//!
//! - [`ChangeHistory`] — descriptive undo/redo ledger with an append-only log
//! - [`UndoEngine`] / [`SnapshotUndoEngine`] — physical undo seam and the
//!   reference engine for [`SceneWorld`](crate::SceneWorld)
//! - [`EditController`] — batch mutations, one undo group and one ledger
//!   entry per batch
//! - [`EditSession`] — selection, criteria, pending undo/redo step, and
//!   display cache for one operator session
//! - [`SessionConfig`] / [`ActiveTogglePolicy`] — TOML-loaded session policy

mod config;
mod controller;
mod history;
mod session;
mod undo;

pub use config::{load_config, load_or_default, ActiveTogglePolicy, SessionConfig};
pub use controller::EditController;
pub use history::ChangeHistory;
pub use session::{DisplayState, EditSession};
pub use undo::{SnapshotUndoEngine, UndoEngine, UndoGroupId};

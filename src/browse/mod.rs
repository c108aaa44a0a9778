//! Projecting the scene tree into an ordered working list.
//!
//! The browse pipeline is what the operator looks at: the full entity tree
//! filtered down by [`EntityFilter`] and ordered by [`SortKey`], produced
//! in one pass by [`collect`].
//!
//! - [`EntityFilter`] / [`PresenceFilter`] — match criteria for one entity
//! - [`SortKey`] / [`sort_entities`] — stable orderings over a collected list
//! - [`collect`] — depth-first projection of the whole tree

mod collect;
mod filter;
mod sort;

pub use collect::collect;
pub use filter::{EntityFilter, PresenceFilter};
pub use sort::{sort_entities, SortKey};

//! Aggregation queries over the canonical table.
//!
//! Every function here is a pure read of a [`CanonicalTable`](crate::table::CanonicalTable)
//! and returns plain serializable results for the dashboard: borough cards and
//! charts, the per-school enrollment trend, the school details page and the
//! cascading sidebar filter.

pub mod borough;
pub mod filter;
pub mod school;
pub mod trend;
pub mod types;
pub mod utility;

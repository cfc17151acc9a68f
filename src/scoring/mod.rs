//! Comfort scoring and spatial aggregation.
//!
//! This module turns monthly climatology into a scored "atmospheric
//! signature" for a point, samples coordinates inside a polygon, and
//! combines per-sample results into a regional verdict.

pub mod aggregate;
pub mod evaluate;
pub mod region;
pub mod sample;
pub mod utility;

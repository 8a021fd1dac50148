//! # seqstore
//!
//! Backing storage for the memocache engines.
//!
//! ## Contents
//! - **Sequence**: mutable integer sequence, O(1) read/write
//! - **Workload scripts**: `range L R` / `update I V` operations, parsed with nom
//! - **Errors**: bounds and interval precondition failures

#![warn(missing_docs)]

mod error;
mod sequence;
mod workload;

pub use error::{Error, Result};
pub use sequence::Sequence;
pub use workload::{parse_op, parse_script, render_script, Op};

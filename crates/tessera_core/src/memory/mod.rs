//! # Memory Management
//!
//! Slot storage behind every context.
//!
//! ## Components
//!
//! - [`EntityPool`]: Arena of entity slots with a lowest-first free list and
//!   explicit per-slot reference counts

mod pool;

pub(crate) use pool::EntityPool;

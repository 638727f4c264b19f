//! The arena/allocator subsystem (spec component C1): virtual-memory-backed
//! arenas with scoped markers, plus a family of region allocators with
//! differing reclamation policies, all grounded on the teacher's
//! `src/alloc/mod.rs` and `src/memory/linear_pool.rs` device-memory
//! suballocators, generalized to host memory.

pub mod arena;
pub mod debug_tracker;
pub mod freelist;
pub mod linear;
pub mod pow_freelist;
pub mod stack;
pub mod virtual_memory;

pub use arena::{ArenaScope, MemoryArena};
pub use debug_tracker::SENTINEL;
pub use freelist::{AllocHeader, FreelistAllocator};
pub use linear::{FixedLinearAllocator, LinearAllocator};
pub use pow_freelist::PowFreelistAllocator;
pub use stack::{StackAllocator, StackMarker};

//! Bump-allocating arena over demand-committed virtual memory, with nested
//! scoping and (debug-only) leak/corruption tracking.
//!
//! Grounded on the teacher's `src/alloc/mod.rs` `LinearMemoryPool` (append-
//! only bump pointer, grow-on-exhaustion) generalized from device memory to
//! host virtual memory per spec section 4.1, and on
//! `original_source/.../Allocators.cpp` for the commit-growth and scope
//! semantics.

use crate::error::{EngineError, Result};
use crate::memory::debug_tracker::AllocationLog;
use crate::memory::virtual_memory::{self, VirtualReservation, PAGE_SIZE};

pub struct MemoryArena {
    name: &'static str,
    reservation: VirtualReservation,
    commit: usize,
    used: usize,
    #[cfg(debug_assertions)]
    log: AllocationLog,
}

impl MemoryArena {
    /// Reserves `reserve` bytes of address space (rounded up to a page) and
    /// commits the first page.
    pub fn create(name: &'static str, reserve: usize) -> Result<MemoryArena> {
        let reservation = virtual_memory::reserve(reserve)?;
        virtual_memory::commit(&reservation, 0, PAGE_SIZE)?;
        Ok(MemoryArena {
            name,
            reservation,
            commit: PAGE_SIZE,
            used: 0,
            #[cfg(debug_assertions)]
            log: AllocationLog::new(),
        })
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn reserved(&self) -> usize {
        self.reservation.size()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> *mut u8 {
        self.reservation.as_ptr()
    }

    /// Aligns `used` forward, growing the commit in doubling page-sized
    /// chunks if the new watermark would exceed it, and failing fatally if
    /// it would exceed the reservation.
    fn bump(&mut self, size: usize, align: usize) -> Result<usize> {
        debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
        let aligned = (self.used + (align - 1)) & !(align - 1);
        let new_used = aligned + size;

        if new_used > self.reservation.size() {
            return Err(EngineError::OutOfMemory {
                arena: self.name,
                reserved: self.reservation.size(),
            });
        }

        if new_used > self.commit {
            let required = virtual_memory::round_up_to_page(new_used);
            let grown = virtual_memory::round_up_to_page((self.commit * 2).max(required));
            let grown = grown.min(self.reservation.size());
            virtual_memory::commit(&self.reservation, self.commit, grown - self.commit)?;
            self.commit = grown;
        }

        self.used = new_used;
        Ok(aligned)
    }

    /// Bump-allocates `size` bytes aligned to `align`, returning a raw
    /// pointer. Zero-size allocations still return a uniquely aligned,
    /// non-null pointer.
    pub fn alloc_raw(&mut self, size: usize, align: usize, file: &'static str, line: u32) -> Result<*mut u8> {
        let offset = self.bump(size.max(1), align)?;
        #[cfg(debug_assertions)]
        self.log.push(file, line, size, offset);
        Ok(unsafe { self.base().add(offset) })
    }

    /// Saves the current `used` watermark; restoring it (via the returned
    /// `ArenaScope`'s `Drop`) logically frees everything allocated inside.
    /// Values placed in the scope must have no non-trivial `Drop`.
    pub fn scope(&mut self) -> ArenaScope<'_> {
        let marker = self.used;
        ArenaScope { arena: self, marker }
    }

    fn restore(&mut self, marker: usize) {
        self.used = marker;
        #[cfg(debug_assertions)]
        self.log.trim_to(marker);
    }

    #[cfg(debug_assertions)]
    pub fn outstanding_allocations(&self) -> usize {
        self.log.len()
    }
}

impl Drop for MemoryArena {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            if !self.log.is_empty() {
                for r in self.log.records() {
                    log::error!(
                        "leak in arena '{}': {} bytes from {}:{}",
                        self.name,
                        r.size,
                        r.file,
                        r.line
                    );
                }
                panic!(
                    "arena '{}' torn down with {} outstanding allocation(s)",
                    self.name,
                    self.log.len()
                );
            }
        }
    }
}

/// RAII scope marker. On drop, restores the arena's `used` pointer to the
/// value captured when the scope was opened.
pub struct ArenaScope<'a> {
    arena: &'a mut MemoryArena,
    marker: usize,
}

impl<'a> ArenaScope<'a> {
    pub fn alloc_raw(&mut self, size: usize, align: usize, file: &'static str, line: u32) -> Result<*mut u8> {
        self.arena.alloc_raw(size, align, file, line)
    }

    pub fn used(&self) -> usize {
        self.arena.used()
    }
}

impl<'a> Drop for ArenaScope<'a> {
    fn drop(&mut self) {
        self.arena.restore(self.marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_advances_used_and_respects_alignment() {
        let mut arena = MemoryArena::create("test", 1 << 20).unwrap();
        let p1 = arena.alloc_raw(3, 1, file!(), line!()).unwrap();
        let p2 = arena.alloc_raw(8, 8, file!(), line!()).unwrap();
        assert!((p2 as usize) % 8 == 0);
        assert!((p2 as usize) > (p1 as usize));
    }

    #[test]
    fn scope_restores_used_on_drop() {
        let mut arena = MemoryArena::create("test", 1 << 20).unwrap();
        arena.alloc_raw(64, 8, file!(), line!()).unwrap();
        let used_before = arena.used();
        {
            let mut scope = arena.scope();
            scope.alloc_raw(1024, 8, file!(), line!()).unwrap();
            assert!(scope.used() > used_before);
        }
        assert_eq!(arena.used(), used_before);
    }

    #[test]
    fn zero_size_allocation_is_non_null_and_unique() {
        let mut arena = MemoryArena::create("test", 1 << 20).unwrap();
        let p1 = arena.alloc_raw(0, 1, file!(), line!()).unwrap();
        let p2 = arena.alloc_raw(0, 1, file!(), line!()).unwrap();
        assert!(!p1.is_null());
        assert_ne!(p1, p2);
    }

    #[test]
    fn out_of_memory_when_exceeding_reservation() {
        let mut arena = MemoryArena::create("test", PAGE_SIZE).unwrap();
        let err = arena.alloc_raw(PAGE_SIZE * 10, 8, file!(), line!());
        assert!(err.is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outstanding allocation")]
    fn teardown_with_outstanding_allocation_panics() {
        let mut arena = MemoryArena::create("leaky", 1 << 20).unwrap();
        arena.alloc_raw(16, 8, file!(), line!()).unwrap();
        drop(arena);
    }
}

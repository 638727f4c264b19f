//! Linear (bump, no per-allocation free) allocators.
//!
//! `LinearAllocator` grows by appending new blocks once the current one is
//! exhausted, mirroring the teacher's `LinearMemoryPool::allocate` (new block
//! on overflow, front pointer reset to zero in the new block).
//! `FixedLinearAllocator` is the non-growing variant: a single fixed-size
//! backing buffer that fails once exhausted, used where a subsystem wants a
//! hard capacity rather than amortized growth (e.g. per-frame scratch).

use crate::error::{EngineError, Result};

fn align_offset(size: usize, align: usize, start: usize, end: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    let aligned = (start + (align - 1)) & !(align - 1);
    if aligned + size > end {
        None
    } else {
        Some(aligned)
    }
}

struct Block {
    data: Box<[u8]>,
    front: usize,
}

/// Appends to the end of the current block; allocates a new block of
/// `block_size` bytes when the current one can't satisfy a request. `free`
/// is a no-op by design — everything is reclaimed by `reset`.
pub struct LinearAllocator {
    block_size: usize,
    blocks: Vec<Block>,
}

impl LinearAllocator {
    pub fn new(block_size: usize) -> LinearAllocator {
        LinearAllocator {
            block_size,
            blocks: Vec::new(),
        }
    }

    fn new_block(&mut self, min_size: usize) {
        let size = self.block_size.max(min_size);
        self.blocks.push(Block {
            data: vec![0u8; size].into_boxed_slice(),
            front: 0,
        });
    }

    pub fn alloc_raw(&mut self, size: usize, align: usize) -> Result<*mut u8> {
        if self.blocks.is_empty() {
            self.new_block(size);
        }

        let last = self.blocks.len() - 1;
        let block_len = self.blocks[last].data.len();
        if align_offset(size, align, self.blocks[last].front, block_len).is_none() {
            self.new_block(size.max(align));
        }

        let block = self.blocks.last_mut().unwrap();
        let offset = align_offset(size, align, block.front, block.data.len()).ok_or(
            EngineError::CapacityExceeded {
                what: "linear allocator block",
                capacity: block.data.len(),
            },
        )?;
        block.front = offset + size;
        Ok(unsafe { block.data.as_mut_ptr().add(offset) })
    }

    /// Drops every block, reclaiming all memory at once.
    pub fn reset(&mut self) {
        self.blocks.clear();
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// A single fixed-capacity bump region. Exhaustion is a hard failure rather
/// than triggering growth.
pub struct FixedLinearAllocator {
    data: Box<[u8]>,
    front: usize,
}

impl FixedLinearAllocator {
    pub fn new(capacity: usize) -> FixedLinearAllocator {
        FixedLinearAllocator {
            data: vec![0u8; capacity].into_boxed_slice(),
            front: 0,
        }
    }

    pub fn alloc_raw(&mut self, size: usize, align: usize) -> Result<*mut u8> {
        let offset = align_offset(size, align, self.front, self.data.len()).ok_or(
            EngineError::CapacityExceeded {
                what: "fixed-linear allocator",
                capacity: self.data.len(),
            },
        )?;
        self.front = offset + size;
        Ok(unsafe { self.data.as_mut_ptr().add(offset) })
    }

    pub fn used(&self) -> usize {
        self.front
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn reset(&mut self) {
        self.front = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_allocator_grows_new_block_on_overflow() {
        let mut a = LinearAllocator::new(64);
        a.alloc_raw(48, 8).unwrap();
        assert_eq!(a.block_count(), 1);
        a.alloc_raw(48, 8).unwrap();
        assert_eq!(a.block_count(), 2);
    }

    #[test]
    fn fixed_linear_fails_past_capacity() {
        let mut a = FixedLinearAllocator::new(64);
        assert!(a.alloc_raw(32, 8).is_ok());
        assert!(a.alloc_raw(64, 8).is_err());
    }

    #[test]
    fn reset_reclaims_capacity() {
        let mut a = FixedLinearAllocator::new(64);
        a.alloc_raw(64, 1).unwrap();
        assert!(a.alloc_raw(1, 1).is_err());
        a.reset();
        assert!(a.alloc_raw(1, 1).is_ok());
    }
}

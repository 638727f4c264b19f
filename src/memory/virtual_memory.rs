//! Raw reserve/commit/release over OS virtual memory.
//!
//! Grounded on `original_source/.../Allocators.cpp` and `BackingAllocator.cpp`:
//! arenas reserve a large span of address space up front with no backing
//! pages, then commit pages on demand as `used` grows. Unix goes through
//! `libc::mmap`/`mprotect`/`munmap`; Windows goes through `VirtualAlloc`.

use crate::error::{EngineError, Result};

pub const PAGE_SIZE: usize = 4096;

pub fn round_up_to_page(size: usize) -> usize {
    (size + PAGE_SIZE - 1) & !(PAGE_SIZE - 1)
}

/// A single reservation of address space. `commit`/`decommit` operate on
/// pages within `[0, size)`; the reservation itself is released on drop.
pub struct VirtualReservation {
    base: *mut u8,
    size: usize,
}

unsafe impl Send for VirtualReservation {}
unsafe impl Sync for VirtualReservation {}

impl VirtualReservation {
    pub fn as_ptr(&self) -> *mut u8 {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(unix)]
mod imp {
    use super::*;
    use std::ptr;

    pub fn reserve(size: usize) -> Result<VirtualReservation> {
        let size = round_up_to_page(size);
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_NONE,
                libc::MAP_PRIVATE | libc::MAP_ANON,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(EngineError::OutOfMemory {
                arena: "virtual_memory::reserve",
                reserved: size,
            });
        }
        Ok(VirtualReservation {
            base: addr as *mut u8,
            size,
        })
    }

    pub fn commit(reservation: &VirtualReservation, offset: usize, len: usize) -> Result<()> {
        let ptr = unsafe { reservation.base.add(offset) };
        let rc = unsafe {
            libc::mprotect(
                ptr as *mut libc::c_void,
                len,
                libc::PROT_READ | libc::PROT_WRITE,
            )
        };
        if rc != 0 {
            return Err(EngineError::OutOfMemory {
                arena: "virtual_memory::commit",
                reserved: len,
            });
        }
        Ok(())
    }

    pub fn release(reservation: &mut VirtualReservation) {
        if !reservation.base.is_null() {
            unsafe {
                libc::munmap(reservation.base as *mut libc::c_void, reservation.size);
            }
            reservation.base = ptr::null_mut();
        }
    }
}

#[cfg(windows)]
mod imp {
    use super::*;
    use winapi::um::memoryapi::{VirtualAlloc, VirtualFree};
    use winapi::um::winnt::{MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_NOACCESS, PAGE_READWRITE};

    pub fn reserve(size: usize) -> Result<VirtualReservation> {
        let size = round_up_to_page(size);
        let addr = unsafe {
            VirtualAlloc(
                std::ptr::null_mut(),
                size,
                MEM_RESERVE,
                PAGE_NOACCESS,
            )
        };
        if addr.is_null() {
            return Err(EngineError::OutOfMemory {
                arena: "virtual_memory::reserve",
                reserved: size,
            });
        }
        Ok(VirtualReservation {
            base: addr as *mut u8,
            size,
        })
    }

    pub fn commit(reservation: &VirtualReservation, offset: usize, len: usize) -> Result<()> {
        let ptr = unsafe { reservation.base.add(offset) } as *mut winapi::ctypes::c_void;
        let addr = unsafe { VirtualAlloc(ptr, len, MEM_COMMIT, PAGE_READWRITE) };
        if addr.is_null() {
            return Err(EngineError::OutOfMemory {
                arena: "virtual_memory::commit",
                reserved: len,
            });
        }
        Ok(())
    }

    pub fn release(reservation: &mut VirtualReservation) {
        if !reservation.base.is_null() {
            unsafe {
                VirtualFree(reservation.base as *mut _, 0, MEM_RELEASE);
            }
            reservation.base = std::ptr::null_mut();
        }
    }
}

pub use imp::{commit, release, reserve};

impl Drop for VirtualReservation {
    fn drop(&mut self) {
        release(self);
    }
}

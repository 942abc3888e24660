//! Marshaling between host-owned linear memory and boundary-owned buffers.
//!
//! Inbound arguments are copied out of host memory before any computation.
//! Outbound results are packed, leaked as a `Box<[u8]>`, and handed to the
//! host, which must return each pointer exactly once through
//! `ridge_free`. The allocation size is recovered from the packed length
//! prefix, so the host only ever passes the pointer back.

use std::alloc::{self, Layout};
use std::ptr;

use ridge_core::wire::{self, RESULT_HEADER_LEN};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use crate::dispatch::Op;

/// Boundary-owned copy of one argument. Wiped when dropped.
pub type Arg = Zeroizing<Vec<u8>>;

// ── Inbound ──────────────────────────────────────────────────────────────────

/// Copy `len` bytes starting at `ptr` into boundary-owned storage.
///
/// A null pointer is accepted only for a zero-length argument.
///
/// # Safety
/// When `len > 0` and `ptr` is non-null, `ptr` must be valid for reads of
/// `len` bytes for the duration of the call.
pub unsafe fn import(ptr: *const u8, len: usize) -> Result<Arg, BridgeError> {
    if len == 0 {
        return Ok(Zeroizing::new(Vec::new()));
    }
    if ptr.is_null() {
        return Err(BridgeError::NullArgument(len));
    }
    let src = std::slice::from_raw_parts(ptr, len);
    Ok(Zeroizing::new(src.to_vec()))
}

// ── Outbound ─────────────────────────────────────────────────────────────────

/// Hand a packed result to the host. Writes the total length (`4 + L`)
/// through `out_len` unless it is null.
///
/// # Safety
/// `out_len` must be null or valid for a `usize` write.
pub unsafe fn export(packed: Vec<u8>, out_len: *mut usize) -> *mut u8 {
    let boxed = packed.into_boxed_slice();
    if !out_len.is_null() {
        out_len.write(boxed.len());
    }
    Box::into_raw(boxed) as *mut u8
}

/// Release a result previously returned by [`export`]. The buffer is wiped
/// before it goes back to the allocator.
///
/// # Safety
/// `ptr` must be null or a pointer returned by [`export`] that has not been
/// released yet, and its length prefix must not have been modified.
pub unsafe fn release(ptr: *mut u8) {
    if ptr.is_null() {
        tracing::warn!("free called with a null pointer");
        return;
    }
    let mut prefix = [0u8; RESULT_HEADER_LEN];
    ptr::copy_nonoverlapping(ptr, prefix.as_mut_ptr(), RESULT_HEADER_LEN);
    let total = wire::packed_len(&prefix);

    let mut boxed = Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, total));
    boxed.zeroize();
}

// ── Call path ────────────────────────────────────────────────────────────────

/// Import every argument, run `op`, and export the packed result.
///
/// # Safety
/// Each `(ptr, len)` pair must satisfy [`import`]; `out_len` must satisfy
/// [`export`].
pub unsafe fn invoke(op: Op, args: &[(*const u8, usize)], out_len: *mut usize) -> *mut u8 {
    let mut owned = Vec::with_capacity(args.len());
    let mut contract_ok = true;
    for (position, &(ptr, len)) in args.iter().enumerate() {
        match import(ptr, len) {
            Ok(arg) => owned.push(arg),
            Err(e) => {
                tracing::warn!(op = op.name(), arg = position, error = %e, "argument rejected");
                contract_ok = false;
                break;
            }
        }
    }

    let result = if contract_ok {
        let views: Vec<&[u8]> = owned.iter().map(|a| a.as_slice()).collect();
        op.run(&views).map(Zeroizing::new)
    } else {
        None
    };

    let packed = match wire::pack(result.as_ref().map(|r| r.as_slice())) {
        Ok(packed) => packed,
        Err(e) => {
            tracing::error!(op = op.name(), error = %e, "result cannot be packed");
            std::process::abort();
        }
    };
    export(packed, out_len)
}

// ── Linear memory ────────────────────────────────────────────────────────────

/// Allocate `size` bytes for the host to write arguments into.
/// Returns null for `size == 0`; allocator failure aborts.
pub fn alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return ptr::null_mut();
    }
    let Ok(layout) = Layout::array::<u8>(size) else {
        tracing::warn!(size, "allocation size out of range");
        return ptr::null_mut();
    };
    // SAFETY: layout has non-zero size.
    let p = unsafe { alloc::alloc(layout) };
    if p.is_null() {
        alloc::handle_alloc_error(layout);
    }
    p
}

/// Release memory obtained from [`alloc`].
///
/// # Safety
/// `ptr` must come from [`alloc`] called with the same `size`, and must not
/// have been released already.
pub unsafe fn dealloc(ptr: *mut u8, size: usize) {
    if ptr.is_null() || size == 0 {
        return;
    }
    let Ok(layout) = Layout::array::<u8>(size) else {
        return;
    };
    alloc::dealloc(ptr, layout);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("null pointer passed with length {0}")]
    NullArgument(usize),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

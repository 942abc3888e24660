//! Raw ABI behaviour: packing, null pointers, out-lengths, freeing.

use std::ptr;

use libridge::exports::*;
use libridge::host::unpack;

use crate::*;

// ── Packed results ────────────────────────────────────────────────────────────

#[test]
fn test_result_is_prefixed_with_le_length() {
    let data = b"abc";
    let mut total = 0usize;
    let packed = unsafe {
        let p = ridge_sha256(data.as_ptr(), data.len(), &mut total);
        take_result(p, total)
    };
    assert_eq!(total, 4 + 32);
    assert_eq!(packed.len(), total);
    assert_eq!(&packed[..4], &[32, 0, 0, 0]);
    assert_eq!(
        hex::encode(&packed[4..]),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_failure_is_a_bare_zero_prefix() {
    // Odd-length hex never decodes.
    let text = b"abc";
    let mut total = 0usize;
    let packed = unsafe {
        let p = ridge_hex_decode(text.as_ptr(), text.len(), &mut total);
        take_result(p, total)
    };
    assert_eq!(total, 4);
    assert_eq!(packed, [0, 0, 0, 0]);
}

// ── Null pointers ─────────────────────────────────────────────────────────────

#[test]
fn test_null_pointer_with_length_is_absent() {
    let mut total = 0usize;
    let packed = unsafe {
        let p = ridge_sha256(ptr::null(), 16, &mut total);
        take_result(p, total)
    };
    assert_eq!(declared_len(&packed), 0);
}

#[test]
fn test_null_pointer_with_zero_length_is_empty_input() {
    let mut total = 0usize;
    let packed = unsafe {
        let p = ridge_sha256(ptr::null(), 0, &mut total);
        take_result(p, total)
    };
    assert_eq!(
        hex::encode(unpack(&packed).unwrap()),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_null_second_argument_is_absent() {
    let key = b"key";
    let mut total = 0usize;
    let packed = unsafe {
        let p = ridge_hmac_sha256(key.as_ptr(), key.len(), ptr::null(), 3, &mut total);
        take_result(p, total)
    };
    assert_eq!(declared_len(&packed), 0);
}

#[test]
fn test_null_out_len_is_skipped() {
    let data = b"abc";
    unsafe {
        let p = ridge_sha256(data.as_ptr(), data.len(), ptr::null_mut());
        assert!(!p.is_null());
        // The prefix alone is enough to read the result back.
        let prefix: [u8; 4] = std::slice::from_raw_parts(p, 4).try_into().unwrap();
        assert_eq!(u32::from_le_bytes(prefix), 32);
        ridge_free(p);
    }
}

#[test]
fn test_free_null_is_a_no_op() {
    unsafe { ridge_free(ptr::null_mut()) };
}

// ── Linear memory ─────────────────────────────────────────────────────────────

#[test]
fn test_alloc_zero_is_null() {
    assert!(ridge_alloc(0).is_null());
}

#[test]
fn test_alloc_write_call_dealloc() {
    let input = b"hello";
    let region = ridge_alloc(input.len());
    assert!(!region.is_null());
    let mut total = 0usize;
    let packed = unsafe {
        ptr::copy_nonoverlapping(input.as_ptr(), region, input.len());
        let p = ridge_hex_encode(region, input.len(), &mut total);
        let packed = take_result(p, total);
        ridge_dealloc(region, input.len());
        packed
    };
    assert_eq!(unpack(&packed).unwrap(), b"68656c6c6f");
}

// ── Host-side unpacking ───────────────────────────────────────────────────────

#[test]
fn test_unpack_rejects_short_buffers() {
    assert_eq!(unpack(&[]), None);
    assert_eq!(unpack(&[1, 0, 0]), None);
    assert_eq!(unpack(&[5, 0, 0, 0, 1, 2]), None);
}

#[test]
fn test_unpack_ignores_trailing_bytes() {
    assert_eq!(unpack(&[2, 0, 0, 0, 9, 8, 7]), Some(&[9u8, 8][..]));
    assert_eq!(unpack(&[0, 0, 0, 0]), Some(&[0u8; 0][..]));
}

#[test]
fn test_results_are_independent() {
    let a = b"first";
    let b = b"second";
    let (mut la, mut lb) = (0usize, 0usize);
    unsafe {
        let pa = ridge_sha256(a.as_ptr(), a.len(), &mut la);
        let pb = ridge_sha256(b.as_ptr(), b.len(), &mut lb);
        assert_ne!(pa, pb);
        let packed_b = take_result(pb, lb);
        let packed_a = take_result(pa, la);
        assert_ne!(packed_a, packed_b);
    }
}

//! C ABI surface. Every export takes its byte arguments as `(ptr, len)`
//! pairs in table order, then an out-parameter receiving the total packed
//! length, and returns the packed result. Results go back through
//! [`ridge_free`].

use crate::bridge;
use crate::dispatch::Op;

// ── Memory ───────────────────────────────────────────────────────────────────

/// Allocate `size` bytes of linear memory for arguments. Null for zero.
#[no_mangle]
pub extern "C" fn ridge_alloc(size: usize) -> *mut u8 {
    bridge::alloc(size)
}

/// # Safety
/// `ptr` must come from [`ridge_alloc`] with the same `size`.
#[no_mangle]
pub unsafe extern "C" fn ridge_dealloc(ptr: *mut u8, size: usize) {
    bridge::dealloc(ptr, size)
}

/// Release a packed result.
///
/// # Safety
/// `ptr` must be null or a result pointer from this library not yet freed.
#[no_mangle]
pub unsafe extern "C" fn ridge_free(ptr: *mut u8) {
    bridge::release(ptr)
}

// ── Crypto ───────────────────────────────────────────────────────────────────

/// # Safety
/// Every `(ptr, len)` pair must describe readable memory (or `len == 0`);
/// `out_len` must be null or writable. The same holds for every export below.
#[no_mangle]
pub unsafe extern "C" fn ridge_sha256(
    data: *const u8,
    data_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::Sha256, &[(data, data_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_hmac_sha256(
    key: *const u8,
    key_len: usize,
    msg: *const u8,
    msg_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HmacSha256, &[(key, key_len), (msg, msg_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_hkdf_extract(
    salt: *const u8,
    salt_len: usize,
    ikm: *const u8,
    ikm_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HkdfExtract, &[(salt, salt_len), (ikm, ikm_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ridge_aes128_gcm_encrypt(
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
    aad: *const u8,
    aad_len: usize,
    plaintext: *const u8,
    plaintext_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(
        Op::AeadEncrypt,
        &[
            (key, key_len),
            (iv, iv_len),
            (aad, aad_len),
            (plaintext, plaintext_len),
        ],
        out_len,
    )
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ridge_aes128_gcm_decrypt(
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
    aad: *const u8,
    aad_len: usize,
    ciphertext: *const u8,
    ciphertext_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(
        Op::AeadDecrypt,
        &[
            (key, key_len),
            (iv, iv_len),
            (aad, aad_len),
            (ciphertext, ciphertext_len),
        ],
        out_len,
    )
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_x25519_base(
    scalar: *const u8,
    scalar_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::DhBase, &[(scalar, scalar_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_x25519_agree(
    scalar: *const u8,
    scalar_len: usize,
    point: *const u8,
    point_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(
        Op::DhAgree,
        &[(scalar, scalar_len), (point, point_len)],
        out_len,
    )
}

// ── Codecs ───────────────────────────────────────────────────────────────────

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_hex_encode(
    data: *const u8,
    data_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HexEncode, &[(data, data_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_hex_decode(
    text: *const u8,
    text_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HexDecode, &[(text, text_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_hpack_decode(
    block: *const u8,
    block_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HeaderDecompress, &[(block, block_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_hpack_encode(
    headers: *const u8,
    headers_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HeaderCompress, &[(headers, headers_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_huffman_encode(
    data: *const u8,
    data_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HuffmanEncode, &[(data, data_len)], out_len)
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_huffman_decode(
    data: *const u8,
    data_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::HuffmanDecode, &[(data, data_len)], out_len)
}

// ── TLS / HTTP/2 ─────────────────────────────────────────────────────────────

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_tls_handshake_keys(
    shared_secret: *const u8,
    shared_secret_len: usize,
    hello_hash: *const u8,
    hello_hash_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(
        Op::TlsHandshakeKeys,
        &[
            (shared_secret, shared_secret_len),
            (hello_hash, hello_hash_len),
        ],
        out_len,
    )
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_tls_application_keys(
    handshake_secret: *const u8,
    handshake_secret_len: usize,
    transcript_hash: *const u8,
    transcript_hash_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(
        Op::TlsApplicationKeys,
        &[
            (handshake_secret, handshake_secret_len),
            (transcript_hash, transcript_hash_len),
        ],
        out_len,
    )
}

/// # Safety
/// See [`ridge_sha256`].
#[no_mangle]
pub unsafe extern "C" fn ridge_h2_frame_parse(
    frame: *const u8,
    frame_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    bridge::invoke(Op::FrameParse, &[(frame, frame_len)], out_len)
}

//! In-process host adapter.
//!
//! Drives the exported C ABI exactly as an embedding runtime would:
//! allocate argument regions, copy in, call the export, copy the packed
//! result out, free it, and release the argument regions. Typed methods sit
//! on top and turn the empty-result convention back into `Option`.
//!
//! Empty results are ambiguous at the wire level. [`Host::call`] resolves
//! them with what it knows about each operation:
//!
//! | operation | empty result means |
//! |---|---|
//! | hex / huffman codecs | success iff the input was empty |
//! | header-decompress / header-compress | success iff the input is well formed |
//! | aead-decrypt of a bare 16-byte tag | success iff the tag verifies |
//! | everything else | failure |

use std::ptr;

use rand::rngs::OsRng;
use rand::RngCore;
use ridge_core::crypto::{self, AES_KEY_LEN, DIGEST_LEN, GCM_IV_LEN, GCM_TAG_LEN, X25519_LEN};
use ridge_core::header::{self, Header};
use ridge_core::hpack;
use ridge_core::tls::KeyBundle;
use ridge_core::wire;
use ridge_core::Frame;
use zeroize::Zeroizing;

use crate::bridge;
use crate::dispatch::Op;
use crate::exports;

/// Payload of a packed result, or `None` when the buffer is shorter than
/// its prefix or the prefix claims more bytes than follow.
pub fn unpack(buf: &[u8]) -> Option<&[u8]> {
    wire::unpack(buf).ok()
}

// ── Argument regions ─────────────────────────────────────────────────────────

/// One argument copied into boundary-allocated memory. Wiped and released
/// on drop.
struct Placed {
    ptr: *mut u8,
    len: usize,
}

impl Placed {
    fn new(bytes: &[u8]) -> Self {
        let ptr = exports::ridge_alloc(bytes.len());
        if !ptr.is_null() {
            // SAFETY: ridge_alloc returned a fresh region of bytes.len() bytes.
            unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len()) };
        }
        Self {
            ptr,
            len: bytes.len(),
        }
    }

    fn raw(&self) -> (*const u8, usize) {
        (self.ptr as *const u8, self.len)
    }
}

impl Drop for Placed {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        // SAFETY: ptr/len came from ridge_alloc and are released once.
        unsafe {
            self.ptr.write_bytes(0, self.len);
            exports::ridge_dealloc(self.ptr, self.len);
        }
    }
}

/// Route to the export for `op`. An argument count that matches no
/// signature goes through the bridge directly and comes back absent.
unsafe fn call_export(op: Op, args: &[(*const u8, usize)], out: *mut usize) -> *mut u8 {
    use exports::*;

    match (op, args) {
        (Op::Sha256, &[(d, dl)]) => ridge_sha256(d, dl, out),
        (Op::HmacSha256, &[(k, kl), (m, ml)]) => ridge_hmac_sha256(k, kl, m, ml, out),
        (Op::HkdfExtract, &[(s, sl), (i, il)]) => ridge_hkdf_extract(s, sl, i, il, out),
        (Op::AeadEncrypt, &[(k, kl), (n, nl), (a, al), (p, pl)]) => {
            ridge_aes128_gcm_encrypt(k, kl, n, nl, a, al, p, pl, out)
        }
        (Op::AeadDecrypt, &[(k, kl), (n, nl), (a, al), (c, cl)]) => {
            ridge_aes128_gcm_decrypt(k, kl, n, nl, a, al, c, cl, out)
        }
        (Op::DhBase, &[(s, sl)]) => ridge_x25519_base(s, sl, out),
        (Op::DhAgree, &[(s, sl), (p, pl)]) => ridge_x25519_agree(s, sl, p, pl, out),
        (Op::HexEncode, &[(d, dl)]) => ridge_hex_encode(d, dl, out),
        (Op::HexDecode, &[(d, dl)]) => ridge_hex_decode(d, dl, out),
        (Op::HeaderDecompress, &[(d, dl)]) => ridge_hpack_decode(d, dl, out),
        (Op::HeaderCompress, &[(d, dl)]) => ridge_hpack_encode(d, dl, out),
        (Op::HuffmanEncode, &[(d, dl)]) => ridge_huffman_encode(d, dl, out),
        (Op::HuffmanDecode, &[(d, dl)]) => ridge_huffman_decode(d, dl, out),
        (Op::TlsHandshakeKeys, &[(s, sl), (h, hl)]) => ridge_tls_handshake_keys(s, sl, h, hl, out),
        (Op::TlsApplicationKeys, &[(s, sl), (h, hl)]) => {
            ridge_tls_application_keys(s, sl, h, hl, out)
        }
        (Op::FrameParse, &[(d, dl)]) => ridge_h2_frame_parse(d, dl, out),
        _ => bridge::invoke(op, args, out),
    }
}

// ── Host ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct Host;

impl Host {
    pub fn new() -> Self {
        Self
    }

    /// One full round trip through the exports. Returns the payload as-is;
    /// empty covers both failure and empty success.
    pub fn call_raw(&self, op: Op, args: &[&[u8]]) -> Zeroizing<Vec<u8>> {
        let placed: Vec<Placed> = args.iter().map(|a| Placed::new(a)).collect();
        let raw: Vec<(*const u8, usize)> = placed.iter().map(Placed::raw).collect();

        let mut total = 0usize;
        // SAFETY: every region in `raw` is live until `placed` drops.
        let result = unsafe { call_export(op, &raw, &mut total) };
        // SAFETY: the export wrote the result's full length into `total`.
        let packed = Zeroizing::new(unsafe { std::slice::from_raw_parts(result, total) }.to_vec());
        // SAFETY: `result` came from an export and is freed exactly once.
        unsafe { exports::ridge_free(result) };

        Zeroizing::new(unpack(&packed).map(<[u8]>::to_vec).unwrap_or_default())
    }

    /// Like [`Host::call_raw`], with empty results resolved per operation.
    pub fn call(&self, op: Op, args: &[&[u8]]) -> Option<Vec<u8>> {
        let payload = self.call_raw(op, args);
        if !payload.is_empty() || self.empty_is_success(op, args) {
            Some(payload.to_vec())
        } else {
            None
        }
    }

    fn empty_is_success(&self, op: Op, args: &[&[u8]]) -> bool {
        match (op, args) {
            (
                Op::HexEncode
                | Op::HexDecode
                | Op::HuffmanEncode
                | Op::HuffmanDecode,
                [input],
            ) => input.is_empty(),
            // A block of nothing but table size updates decodes to no fields.
            (Op::HeaderDecompress, [block]) => hpack::decompress(block).is_ok(),
            // Blank lines parse to an empty list, which encodes to no bytes.
            (Op::HeaderCompress, [text]) => header::parse_list(text).is_ok(),
            (Op::AeadDecrypt, [key, iv, aad, sealed]) if sealed.len() == GCM_TAG_LEN => {
                let tag = self.call_raw(Op::AeadEncrypt, &[*key, *iv, *aad, &[]]);
                tag.as_slice() == *sealed
            }
            _ => false,
        }
    }

    fn call_fixed<const N: usize>(&self, op: Op, args: &[&[u8]]) -> Option<[u8; N]> {
        let out = self.call(op, args)?;
        (out.len() == N).then(|| crypto::fit(&out))
    }

    // ── Typed calls ──────────────────────────────────────────────────────────

    pub fn sha256(&self, data: &[u8]) -> Option<[u8; DIGEST_LEN]> {
        self.call_fixed(Op::Sha256, &[data])
    }

    pub fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> Option<[u8; DIGEST_LEN]> {
        self.call_fixed(Op::HmacSha256, &[key, msg])
    }

    pub fn hkdf_extract(&self, salt: &[u8], ikm: &[u8]) -> Option<[u8; DIGEST_LEN]> {
        self.call_fixed(Op::HkdfExtract, &[salt, ikm])
    }

    pub fn aead_encrypt(
        &self,
        key: &[u8; AES_KEY_LEN],
        iv: &[u8; GCM_IV_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Option<Vec<u8>> {
        self.call(Op::AeadEncrypt, &[key, iv, aad, plaintext])
    }

    pub fn aead_decrypt(
        &self,
        key: &[u8; AES_KEY_LEN],
        iv: &[u8; GCM_IV_LEN],
        aad: &[u8],
        sealed: &[u8],
    ) -> Option<Vec<u8>> {
        self.call(Op::AeadDecrypt, &[key, iv, aad, sealed])
    }

    pub fn dh_base(&self, scalar: &[u8; X25519_LEN]) -> Option<[u8; X25519_LEN]> {
        self.call_fixed(Op::DhBase, &[scalar])
    }

    pub fn dh_agree(
        &self,
        scalar: &[u8; X25519_LEN],
        point: &[u8; X25519_LEN],
    ) -> Option<[u8; X25519_LEN]> {
        self.call_fixed(Op::DhAgree, &[scalar, point])
    }

    pub fn hex_encode(&self, data: &[u8]) -> Option<String> {
        let text = self.call(Op::HexEncode, &[data])?;
        String::from_utf8(text).ok()
    }

    pub fn hex_decode(&self, text: &str) -> Option<Vec<u8>> {
        self.call(Op::HexDecode, &[text.as_bytes()])
    }

    pub fn hpack_decode(&self, block: &[u8]) -> Option<Vec<Header>> {
        let text = self.call(Op::HeaderDecompress, &[block])?;
        header::parse_list(&text).ok()
    }

    /// Fields that cannot be written as header text are rejected here,
    /// before anything crosses the boundary.
    pub fn hpack_encode(&self, headers: &[Header]) -> Option<Vec<u8>> {
        let text = header::serialize_list(headers).ok()?;
        self.call(Op::HeaderCompress, &[&text])
    }

    pub fn huffman_encode(&self, data: &[u8]) -> Option<Vec<u8>> {
        self.call(Op::HuffmanEncode, &[data])
    }

    pub fn huffman_decode(&self, data: &[u8]) -> Option<Vec<u8>> {
        self.call(Op::HuffmanDecode, &[data])
    }

    pub fn tls_handshake_keys(
        &self,
        shared_secret: &[u8; DIGEST_LEN],
        hello_hash: &[u8; DIGEST_LEN],
    ) -> Option<KeyBundle> {
        let wire = self.call(Op::TlsHandshakeKeys, &[shared_secret, hello_hash])?;
        KeyBundle::from_wire(&wire)
    }

    pub fn tls_application_keys(
        &self,
        handshake_secret: &[u8; DIGEST_LEN],
        transcript_hash: &[u8; DIGEST_LEN],
    ) -> Option<KeyBundle> {
        let wire = self.call(Op::TlsApplicationKeys, &[handshake_secret, transcript_hash])?;
        KeyBundle::from_wire(&wire)
    }

    /// Canonical bytes of a single frame.
    pub fn frame_canonical(&self, bytes: &[u8]) -> Option<Vec<u8>> {
        self.call(Op::FrameParse, &[bytes])
    }

    pub fn frame_parse(&self, bytes: &[u8]) -> Option<Frame> {
        let canonical = self.frame_canonical(bytes)?;
        Frame::parse(&canonical).ok()
    }

    // ── Randomness ───────────────────────────────────────────────────────────

    pub fn random_key(&self) -> Zeroizing<[u8; AES_KEY_LEN]> {
        random_bytes()
    }

    pub fn random_iv(&self) -> [u8; GCM_IV_LEN] {
        *random_bytes::<GCM_IV_LEN>()
    }

    pub fn random_scalar(&self) -> Zeroizing<[u8; X25519_LEN]> {
        random_bytes()
    }
}

fn random_bytes<const N: usize>() -> Zeroizing<[u8; N]> {
    let mut out = Zeroizing::new([0u8; N]);
    OsRng.fill_bytes(out.as_mut_slice());
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

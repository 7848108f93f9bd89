//! Salsa20/8 block transform and the scrypt block mix.
//!
//! The transform diffuses a single 64-byte block; the block mix chains it
//! across `2r` blocks with an XOR accumulator and un-shuffles the outputs
//! so even-indexed results land in the first half and odd-indexed results
//! in the second. Both are pure functions with no secret-dependent
//! branching or indexing.

use super::BLOCK_LEN;

const ROUNDS: usize = 8;

#[inline(always)]
fn quarter_round(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

/// Applies the Salsa20/8 core to one 64-byte block in place.
///
/// The block is read as sixteen little-endian 32-bit words, mixed for
/// eight rounds, and the result is added word-wise to the input.
pub fn salsa20_8(block: &mut [u8; BLOCK_LEN]) {
    let mut w = [0u32; 16];
    for (w, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    let mut x = w;
    for _ in 0..ROUNDS / 2 {
        // column round
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);
        // row round
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }

    for (x, w) in x.iter_mut().zip(w.iter()) {
        *x = x.wrapping_add(*w);
    }
    for (chunk, x) in block.chunks_exact_mut(4).zip(x.iter()) {
        chunk.copy_from_slice(&x.to_le_bytes());
    }
}

/// Mixes an array of `2r` 64-byte blocks.
///
/// A running accumulator starts as the last input block; each input block
/// is XORed in, passed through [`salsa20_8`], and emitted. Outputs are
/// interleaved: block `2i` goes to slot `i`, block `2i+1` to slot `r+i`,
/// so the following mix stage operates on contiguous halves.
pub fn block_mix(input: &[u8], output: &mut [u8], r: usize) {
    debug_assert_eq!(input.len(), 2 * r * BLOCK_LEN);
    debug_assert_eq!(output.len(), input.len());

    let mut acc = [0u8; BLOCK_LEN];
    acc.copy_from_slice(&input[(2 * r - 1) * BLOCK_LEN..]);

    for (i, block) in input.chunks_exact(BLOCK_LEN).enumerate() {
        for (a, b) in acc.iter_mut().zip(block) {
            *a ^= b;
        }
        salsa20_8(&mut acc);

        let slot = if i % 2 == 0 { i / 2 } else { r + i / 2 };
        output[slot * BLOCK_LEN..(slot + 1) * BLOCK_LEN].copy_from_slice(&acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Salsa20/8 core vector from RFC 7914 section 8.
    #[test]
    fn salsa_core_vector() {
        let input = hex::decode(
            "7e879a214f3ec9867ca940e641718f26baee555b8c61c1b50df846116dcd3b1d\
             ee24f319df9b3d8514121e4b5ac5aa3276021d2909c74829edebc68db8b8c25e",
        )
        .unwrap();
        let expected = hex::decode(
            "a41f859c6608cc993b81cacb020cef05044b2181a2fd337dfd7b1c6396682f29\
             b4393168e3c9e6bcfe6bc5b7a06d96bae424cc102c91745c24ad673dc7618f81",
        )
        .unwrap();

        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(&input);
        salsa20_8(&mut block);
        assert_eq!(&block[..], &expected[..]);
    }

    // BlockMix vector from RFC 7914 section 9 (r = 1).
    #[test]
    fn block_mix_vector() {
        let input = hex::decode(
            "f7ce0b653d2d72a4108cf5abe912ffdd777616dbbb27a70e8204f3ae2d0f6fad\
             89f68f4811d1e87bcc3bd7400a9ffd29094f0184639574f39ae5a1315217bcd7\
             894991447213bb226c25b54da86370fbcd984380374666bb8ffcb5bf40c254b0\
             67d27c51ce4ad5fed829c90b505a571b7f4d1cad6a523cda770e67bceaaf7e89",
        )
        .unwrap();
        let expected = hex::decode(
            "a41f859c6608cc993b81cacb020cef05044b2181a2fd337dfd7b1c6396682f29\
             b4393168e3c9e6bcfe6bc5b7a06d96bae424cc102c91745c24ad673dc7618f81\
             20edc975323881a80540f64c162dcd3c21077cfe5f8d5fe2b1a4168f953678b7\
             7d3b3d803b60e4ab920996e59b4d53b65d2a225877d5edf5842cb9f14eefe425",
        )
        .unwrap();

        let mut output = vec![0u8; input.len()];
        block_mix(&input, &mut output, 1);
        assert_eq!(output, expected);
    }

    #[test]
    fn block_mix_is_pure() {
        let input: Vec<u8> = (0u8..=255).collect();
        let mut out1 = vec![0u8; 256];
        let mut out2 = vec![0u8; 256];
        block_mix(&input, &mut out1, 2);
        block_mix(&input, &mut out2, 2);
        assert_eq!(out1, out2);
    }
}

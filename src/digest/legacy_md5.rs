//! MD5 as computed by the historical note database builds.
//!
//! Those builds used the RSA reference MD5 with its `UINT4` typedef resolving
//! to a 64-bit `unsigned long`. Nothing truncates to 32 bits between steps, so
//! carries and the complemented high bits leak back into the low word through
//! the rotations. The result is a stable, but non-standard, 16-byte value.
//! Stored fingerprints depend on it bit-for-bit: keep this separate from the
//! standard MD5 and never "fix" it.

const INIT_STATE: [u64; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

const SINES: [u64; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Streaming legacy MD5 context.
#[derive(Clone)]
pub struct LegacyMd5 {
    state: [u64; 4],
    /// Bit count, low and high word, as the reference keeps it.
    count: [u64; 2],
    buffer: [u8; 64],
}

impl LegacyMd5 {
    pub fn new() -> Self {
        LegacyMd5 {
            state: INIT_STATE,
            count: [0, 0],
            buffer: [0u8; 64],
        }
    }

    pub fn update(&mut self, input: &[u8]) {
        let mut index = ((self.count[0] >> 3) & 0x3f) as usize;
        let len = input.len() as u64;

        let bits = len << 3;
        self.count[0] = self.count[0].wrapping_add(bits);
        if self.count[0] < bits {
            self.count[1] = self.count[1].wrapping_add(1);
        }
        self.count[1] = self.count[1].wrapping_add(len >> 29);

        let part_len = 64 - index;
        let mut consumed = 0;
        if input.len() >= part_len {
            self.buffer[index..].copy_from_slice(&input[..part_len]);
            let block = self.buffer;
            transform(&mut self.state, &block);
            consumed = part_len;

            while consumed + 64 <= input.len() {
                transform(&mut self.state, &input[consumed..consumed + 64]);
                consumed += 64;
            }
            index = 0;
        }

        let rest = &input[consumed..];
        self.buffer[index..index + rest.len()].copy_from_slice(rest);
    }

    pub fn finalize(mut self) -> [u8; 16] {
        let mut bits = [0u8; 8];
        bits[..4].copy_from_slice(&(self.count[0] as u32).to_le_bytes());
        bits[4..].copy_from_slice(&(self.count[1] as u32).to_le_bytes());

        let index = ((self.count[0] >> 3) & 0x3f) as usize;
        let pad_len = if index < 56 { 56 - index } else { 120 - index };
        let mut padding = [0u8; 64];
        padding[0] = 0x80;
        self.update(&padding[..pad_len]);
        self.update(&bits);

        let mut digest = [0u8; 16];
        for (chunk, word) in digest.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&(word as u32).to_le_bytes());
        }
        digest
    }
}

impl Default for LegacyMd5 {
    fn default() -> Self {
        Self::new()
    }
}

/// 64-bit `(x << n) | (x >> (32 - n))`; bits above 31 are not discarded.
#[inline]
fn rotate_left(x: u64, n: u32) -> u64 {
    (x << n) | (x >> (32 - n))
}

fn transform(state: &mut [u64; 4], block: &[u8]) {
    let mut x = [0u64; 16];
    for (word, bytes) in x.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64;
    }

    let [mut a, mut b, mut c, mut d] = *state;
    for i in 0..64 {
        let (f, g) = match i / 16 {
            0 => ((b & c) | (!b & d), i),
            1 => ((b & d) | (c & !d), (5 * i + 1) % 16),
            2 => (b ^ c ^ d, (3 * i + 5) % 16),
            _ => (c ^ (b | !d), (7 * i) % 16),
        };
        let t = a
            .wrapping_add(f)
            .wrapping_add(x[g])
            .wrapping_add(SINES[i]);
        let rotated = b.wrapping_add(rotate_left(t, SHIFTS[i]));
        a = d;
        d = c;
        c = b;
        b = rotated;
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}


/// Table driven, MSB first CRC of up to 32 bits.
#[derive(Debug, Clone)]
pub struct CrcCalculator {
    table: [u32; 256],
    bits: u32,
    final_result_mask: u32,
}

/// Width of both block hash CRCs.
pub const CRC_BITS: u32 = 24;
pub const CRC24_POLY_1: u32 = 0x5D_6DCB;
pub const CRC24_POLY_2: u32 = 0x86_4CFB;

impl CrcCalculator {
    #[must_use]
    pub fn new(bits: u32, trunc_poly: u32) -> Self {
        debug_assert!((8..=32).contains(&bits));
        let high_bit = 1u32 << (bits - 1);
        let mut table = [0u32; 256];
        for (value, entry) in table.iter_mut().enumerate() {
            let mut remainder = 0u32;
            let mut mask = 0x80;
            while mask != 0 {
                if value & mask != 0 {
                    remainder ^= high_bit;
                }
                if remainder & high_bit != 0 {
                    remainder = (remainder << 1) ^ trunc_poly;
                } else {
                    remainder <<= 1;
                }
                mask >>= 1;
            }
            *entry = remainder;
        }

        Self {
            table,
            bits,
            final_result_mask: u32::MAX >> (32 - bits),
        }
    }

    #[must_use]
    pub fn get_crc(&self, data: &[u8]) -> u32 {
        let mut remainder = 0u32;
        for &byte in data {
            let index = ((remainder >> (self.bits - 8)) as u8) ^ byte;
            remainder = (remainder << 8) ^ self.table[usize::from(index)];
        }
        remainder & self.final_result_mask
    }
}

/// The two CRCs a block hash is built from.
#[derive(Debug, Clone)]
pub struct BlockHasher {
    pub crc1: CrcCalculator,
    pub crc2: CrcCalculator,
}

impl BlockHasher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            crc1: CrcCalculator::new(CRC_BITS, CRC24_POLY_1),
            crc2: CrcCalculator::new(CRC_BITS, CRC24_POLY_2),
        }
    }

    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> (u32, u32) {
        (self.crc1.get_crc(data), self.crc2.get_crc(data))
    }

    /// Combines the four child hashes of each CRC into the parent's hashes.
    #[must_use]
    pub fn combine(&self, first: [u32; 4], second: [u32; 4]) -> (u32, u32) {
        (
            self.crc1.get_crc(&words_to_bytes(first)),
            self.crc2.get_crc(&words_to_bytes(second)),
        )
    }
}

fn words_to_bytes(words: [u32; 4]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    bytes
}

impl Default for BlockHasher {
    fn default() -> Self {
        Self::new()
    }
}

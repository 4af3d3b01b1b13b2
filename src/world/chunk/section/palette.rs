//! # Palette Data Module
//!
//! Bit-packed index arrays as they arrive off the wire. A paletted section
//! stores, per slot, a small integer index into a palette-entry table; the
//! indices are packed `element_bits` at a time into big-endian 64-bit words.
//!
//! Two incompatible packing conventions exist and both must be supported,
//! because old and new wire formats are bit-incompatible:
//!
//! * [`PackingFormat::Straddling`] (pre-1.16): indices are packed back to
//!   back, so one index may straddle a word boundary and has to be assembled
//!   from two words
//! * [`PackingFormat::Aligned`] (1.16+): an index never crosses a word
//!   boundary; the remainder of each word is padding
//!
//! The two layouts are deliberately kept as separate code paths, selected by
//! a format flag threaded from the protocol decoder.

/// The protocol version that switched wire packing from straddling to
/// word-aligned (release 1.16).
pub const ALIGNED_PACKING_PROTOCOL: u32 = 735;

/// Which bit-packing convention a buffer uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PackingFormat {
    /// Indices may straddle a word boundary (pre-1.16).
    Straddling,

    /// Indices never cross words; words carry trailing padding (1.16+).
    Aligned,
}

impl PackingFormat {
    /// Selects the convention for a protocol version.
    pub fn from_protocol(version: u32) -> Self {
        if version < ALIGNED_PACKING_PROTOCOL {
            PackingFormat::Straddling
        } else {
            PackingFormat::Aligned
        }
    }
}

/// A decoded bit-packed index array with O(1) random access.
pub struct PaletteData {
    element_bits: u32,
    size: usize,
    words: Vec<u64>,
    format: PackingFormat,
}

impl PaletteData {
    /// Decodes `size` indices of `element_bits` bits each from a big-endian
    /// word buffer.
    ///
    /// `element_bits == 0` is the single-value case: every element is index
    /// 0 and no words are consumed.
    ///
    /// # Panics
    /// Panics if `element_bits` exceeds 32 or the buffer is shorter than the
    /// packed data requires.
    pub fn read(buffer: &[u8], element_bits: u32, size: usize, format: PackingFormat) -> Self {
        assert!(element_bits <= 32, "element_bits {element_bits} out of range");

        let word_count = Self::word_count(element_bits, size, format);
        assert!(
            buffer.len() >= word_count * 8,
            "palette buffer truncated: {} bytes, {} words required",
            buffer.len(),
            word_count
        );

        let words = buffer[..word_count * 8]
            .chunks_exact(8)
            .map(|bytes| u64::from_be_bytes(bytes.try_into().unwrap()))
            .collect();

        Self {
            element_bits,
            size,
            words,
            format,
        }
    }

    /// The number of 64-bit words `size` indices occupy under `format`.
    pub fn word_count(element_bits: u32, size: usize, format: PackingFormat) -> usize {
        if element_bits == 0 {
            return 0;
        }
        match format {
            PackingFormat::Straddling => {
                let bits = size * element_bits as usize;
                bits.div_ceil(64)
            }
            PackingFormat::Aligned => {
                let elements_per_word = 64 / element_bits as usize;
                size.div_ceil(elements_per_word)
            }
        }
    }

    /// The logical number of indices.
    pub fn len(&self) -> usize {
        self.size
    }

    /// True if the array holds no indices.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The width of one index in bits.
    pub fn element_bits(&self) -> u32 {
        self.element_bits
    }

    /// Decodes the index at `index`. O(1), no side effects.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> u32 {
        assert!(index < self.size, "palette index {index} out of bounds");
        if self.element_bits == 0 {
            return 0;
        }

        let bits = self.element_bits as usize;
        let mask = (1u64 << bits) - 1;

        let value = match self.format {
            PackingFormat::Straddling => {
                let start_word = index * bits / 64;
                let start_offset = index * bits % 64;
                let end_word = ((index + 1) * bits - 1) / 64;

                if start_word == end_word {
                    self.words[start_word] >> start_offset
                } else {
                    // The index straddles a word boundary: low bits from the
                    // current word, high bits from the next.
                    (self.words[start_word] >> start_offset)
                        | (self.words[end_word] << (64 - start_offset))
                }
            }
            PackingFormat::Aligned => {
                let elements_per_word = 64 / bits;
                let word = index / elements_per_word;
                let offset = (index % elements_per_word) * bits;
                self.words[word] >> offset
            }
        };

        (value & mask) as u32
    }
}

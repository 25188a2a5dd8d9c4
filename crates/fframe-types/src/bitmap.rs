//! Validity bitmap for columns.
//!
//! Bit `i` (LSB-first within each byte) is set when row `i` holds a value and
//! cleared when the row is NA.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullBitmap {
    bytes: Vec<u8>,
    len: usize,
}

impl NullBitmap {
    /// Bitmap of `len` rows, all valid.
    #[must_use]
    pub fn all_valid(len: usize) -> Self {
        let mut bytes = vec![0xFF_u8; len.div_ceil(8)];
        let rem = len % 8;
        if rem > 0 {
            if let Some(last) = bytes.last_mut() {
                *last = (1_u8 << rem) - 1;
            }
        }
        Self { bytes, len }
    }

    /// Bitmap of `len` rows, all NA.
    #[must_use]
    pub fn all_null(len: usize) -> Self {
        Self {
            bytes: vec![0_u8; len.div_ceil(8)],
            len,
        }
    }

    /// Build from per-row validity flags.
    #[must_use]
    pub fn from_bools(valid: &[bool]) -> Self {
        let mut bitmap = Self::all_null(valid.len());
        for (row, &is_valid) in valid.iter().enumerate() {
            if is_valid {
                bitmap.bytes[row / 8] |= 1_u8 << (row % 8);
            }
        }
        bitmap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `row` holds a value. Rows past the end are reported as NA.
    #[must_use]
    pub fn is_valid(&self, row: usize) -> bool {
        row < self.len && self.bytes[row / 8] & (1_u8 << (row % 8)) != 0
    }

    /// Mark `row` valid or NA. Rows past the end are ignored.
    pub fn set_valid(&mut self, row: usize, valid: bool) {
        if row >= self.len {
            return;
        }
        let mask = 1_u8 << (row % 8);
        if valid {
            self.bytes[row / 8] |= mask;
        } else {
            self.bytes[row / 8] &= !mask;
        }
    }

    /// Number of NA rows.
    #[must_use]
    pub fn null_count(&self) -> usize {
        let set: usize = self.bytes.iter().map(|b| b.count_ones() as usize).sum();
        self.len - set
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::NullBitmap;

    #[test]
    fn all_valid_masks_trailing_bits() {
        let bitmap = NullBitmap::all_valid(11);
        assert_eq!(bitmap.null_count(), 0);
        assert!(bitmap.is_valid(10));
        assert!(!bitmap.is_valid(11));
    }

    #[test]
    fn set_and_clear() {
        let mut bitmap = NullBitmap::all_null(9);
        assert_eq!(bitmap.null_count(), 9);
        bitmap.set_valid(8, true);
        bitmap.set_valid(0, true);
        bitmap.set_valid(0, false);
        bitmap.set_valid(42, true);
        assert!(bitmap.is_valid(8));
        assert!(!bitmap.is_valid(0));
        assert_eq!(bitmap.null_count(), 8);
    }

    #[test]
    fn from_bools_matches_flags() {
        let flags = [true, false, true, true, false];
        let bitmap = NullBitmap::from_bools(&flags);
        for (row, &flag) in flags.iter().enumerate() {
            assert_eq!(bitmap.is_valid(row), flag, "case=from_bools row={row}");
        }
        assert_eq!(bitmap.null_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_null_count_matches_flags(flags in proptest::collection::vec(any::<bool>(), 0..200)) {
            let bitmap = NullBitmap::from_bools(&flags);
            prop_assert_eq!(bitmap.len(), flags.len());
            prop_assert_eq!(bitmap.null_count(), flags.iter().filter(|f| !**f).count());
        }
    }
}

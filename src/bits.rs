// Axel '0vercl0k' Souchet - October 19 2026
//! Helpers to carve C bit-fields out of the integers that store them.
use std::ops::RangeInclusive;

/// Bit manipulation on the integer that stores a group of C bit-fields.
///
/// Single-bit flags are better served by the `bitflags` types next to each
/// block; this is for the multi-bit members (`ExecuteOptions`, the
/// `RTL_BALANCED_NODE` balance, `GDI_TEB_BATCH.Offset`, ...).
pub trait Bits: Sized + Copy {
    /// Extract the bits in `r`, shifted down to bit 0.
    fn bits(&self, r: RangeInclusive<usize>) -> Self;

    /// Extract a single bit.
    fn bit(&self, n: usize) -> Self {
        self.bits(n..=n)
    }

    /// Return a copy of `self` with the bits in `r` replaced by `value`.
    /// Bits of `value` that don't fit in the range are dropped.
    fn with_bits(&self, r: RangeInclusive<usize>, value: Self) -> Self;
}

macro_rules! impl_bits {
    ($($ty:ty),+) => {
        $(
            impl Bits for $ty {
                fn bits(&self, r: RangeInclusive<usize>) -> Self {
                    let (start, end) = (*r.start(), *r.end());
                    assert!(start <= end, "range is reversed");
                    assert!(end < <$ty>::BITS as usize, "range is out of bounds");
                    let width = end - start + 1;
                    let mask = <$ty>::MAX >> (<$ty>::BITS as usize - width);

                    (*self >> start) & mask
                }

                fn with_bits(&self, r: RangeInclusive<usize>, value: Self) -> Self {
                    let (start, end) = (*r.start(), *r.end());
                    assert!(start <= end, "range is reversed");
                    assert!(end < <$ty>::BITS as usize, "range is out of bounds");
                    let width = end - start + 1;
                    let mask = (<$ty>::MAX >> (<$ty>::BITS as usize - width)) << start;

                    (*self & !mask) | ((value << start) & mask)
                }
            }
        )+
    };
}

impl_bits!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::Bits;

    #[test]
    fn extract() {
        let v = 0b1101_0110u8;
        assert_eq!(v.bit(0), 0);
        assert_eq!(v.bit(1), 1);
        assert_eq!(v.bits(4..=7), 0b1101);
        assert_eq!(v.bits(0..=7), v);
        assert_eq!(0x8000_0001u32.bit(31), 1);
        assert_eq!(0x8000_0001u32.bits(0..=30), 1);
        assert_eq!(u64::MAX.bits(0..=63), u64::MAX);
    }

    #[test]
    fn insert() {
        assert_eq!(0u32.with_bits(0..=1, 3), 3);
        assert_eq!(0xffff_ffffu32.with_bits(0..=1, 0), 0xffff_fffc);
        assert_eq!(0u16.with_bits(8..=11, 0xff), 0x0f00);
        assert_eq!(0x80u8.with_bits(0..=0, 1), 0x81);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds() {
        let _ = 0u8.bits(4..=8);
    }
}

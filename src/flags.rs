// Axel '0vercl0k' Souchet - October 19 2026
//! Per-release catalogs of the bit-fields packed in the blocks.
//!
//! The `bitflags` types next to each block know every name a bit ever had,
//! which means a lot of them alias (`IsLegacyProcess` in 6.2 is
//! `IsImageDynamicallyRelocated` in 6.3). A [`BitGroup`] adds the missing
//! piece: when a given name owns a given bit.
use log::debug;

use crate::error::{LayoutError, Result};
use crate::version::{VersionRange, WinVersion};

/// A named bit (or group of bits) and the releases where the name owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBit {
    pub name: &'static str,
    pub mask: u64,
    pub versions: VersionRange,
}

impl FlagBit {
    pub const fn new(name: &'static str, mask: u64, versions: VersionRange) -> Self {
        Self {
            name,
            mask,
            versions,
        }
    }
}

/// An integer member decomposed into named bits.
#[derive(Debug, Clone, Copy)]
pub struct BitGroup {
    /// Name of the member storing the bits, e.g. `PEB.BitField`.
    pub name: &'static str,
    /// Width in bytes of the storage integer.
    pub width: usize,
    pub bits: &'static [FlagBit],
}

impl BitGroup {
    /// The flags defined in `version`.
    pub fn flags_in(&self, version: WinVersion) -> impl Iterator<Item = &'static FlagBit> {
        self.bits.iter().filter(move |f| f.versions.contains(version))
    }

    /// Who owns the bits in `mask` in `version`?
    pub fn owner(&self, mask: u64, version: WinVersion) -> Option<&'static FlagBit> {
        self.flags_in(version).find(|f| f.mask & mask != 0)
    }

    /// Name the bits set in `value` as they were called in `version`. Bits
    /// nobody owns in that release are returned as the second element.
    pub fn decode(&self, value: u64, version: WinVersion) -> (Vec<&'static str>, u64) {
        let mut names = Vec::new();
        let mut unknown = value;
        for flag in self.flags_in(version) {
            if value & flag.mask != 0 {
                names.push(flag.name);
                unknown &= !flag.mask;
            }
        }

        (names, unknown)
    }

    /// Make sure that no two names share a bit in the same release, and that
    /// every mask fits in the storage integer.
    pub fn check_disjoint(&self) -> Result<()> {
        let storage = if self.width >= 8 {
            u64::MAX
        } else {
            (1u64 << (self.width * 8)) - 1
        };

        for version in WinVersion::ALL {
            let mut seen: Vec<&FlagBit> = Vec::new();
            for flag in self.flags_in(version) {
                if flag.mask & !storage != 0 || flag.mask == 0 {
                    return Err(LayoutError::FlagCollision {
                        group: self.name,
                        first: flag.name,
                        second: "<storage>",
                        mask: flag.mask,
                        version,
                    });
                }

                if let Some(other) = seen.iter().find(|o| o.mask & flag.mask != 0) {
                    return Err(LayoutError::FlagCollision {
                        group: self.name,
                        first: other.name,
                        second: flag.name,
                        mask: other.mask & flag.mask,
                        version,
                    });
                }

                seen.push(flag);
            }
        }

        debug!("{}: {} names, no collision", self.name, self.bits.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::WinVersion::*;

    const BITS: &[FlagBit] = &[
        FlagBit::new("A", 0x1, VersionRange::since(Nt60)),
        FlagBit::new("B", 0x2, VersionRange::between(Nt60, Nt62)),
        FlagBit::new("C", 0x2, VersionRange::since(Nt63)),
    ];

    const GROUP: BitGroup = BitGroup {
        name: "Test",
        width: 1,
        bits: BITS,
    };

    #[test]
    fn disjoint() {
        GROUP.check_disjoint().unwrap();
        assert_eq!(GROUP.flags_in(Nt52).count(), 0);
        assert_eq!(GROUP.owner(0x2, Nt61).map(|f| f.name), Some("B"));
        assert_eq!(GROUP.owner(0x2, Nt63).map(|f| f.name), Some("C"));
    }

    #[test]
    fn collision() {
        const CLASH: &[FlagBit] = &[
            FlagBit::new("A", 0x1, VersionRange::since(Nt60)),
            FlagBit::new("B", 0x1, VersionRange::only(Nt62)),
        ];
        let group = BitGroup {
            name: "Clash",
            width: 1,
            bits: CLASH,
        };
        match group.check_disjoint() {
            Err(LayoutError::FlagCollision {
                first,
                second,
                version,
                ..
            }) => {
                assert_eq!((first, second, version), ("A", "B", Nt62));
            }
            r => panic!("unexpected {r:?}"),
        }
    }

    #[test]
    fn too_wide() {
        const WIDE: &[FlagBit] = &[FlagBit::new("A", 0x100, VersionRange::since(Nt60))];
        let group = BitGroup {
            name: "Wide",
            width: 1,
            bits: WIDE,
        };
        assert!(group.check_disjoint().is_err());
    }

    #[test]
    fn decode() {
        let (names, unknown) = GROUP.decode(0x83, Nt63);
        assert_eq!(names, ["A", "C"]);
        assert_eq!(unknown, 0x80);
    }
}

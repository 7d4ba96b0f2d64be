// Axel '0vercl0k' Souchet - October 19 2026
//! What every environment block has in common, and how to get one out of
//! raw bytes.
use std::fmt::{self, Display};
use std::io::{self, Read, Seek};
use std::str::FromStr;
use std::{mem, ptr, slice};

use log::debug;

use crate::arch::{Arch, ArchKind, X64, X86};
use crate::error::{LayoutError, Result};
use crate::ldr::{LdrDataTableEntry, PebLdrData};
use crate::params::RtlUserProcessParameters;
use crate::peb::Peb;
use crate::teb::Teb;

pub trait Reader: Read + Seek {}

impl<T> Reader for T where T: Read + Seek {}

/// The blocks this crate describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Peb,
    PebLdrData,
    LdrDataTableEntry,
    RtlUserProcessParameters,
    Teb,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        Self::Peb,
        Self::PebLdrData,
        Self::LdrDataTableEntry,
        Self::RtlUserProcessParameters,
        Self::Teb,
    ];

    /// The name Microsoft gives the structure.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Peb => "PEB",
            Self::PebLdrData => "PEB_LDR_DATA",
            Self::LdrDataTableEntry => "LDR_DATA_TABLE_ENTRY",
            Self::RtlUserProcessParameters => "RTL_USER_PROCESS_PARAMETERS",
            Self::Teb => "TEB",
        }
    }

    /// Size and alignment of the most recent layout for `arch`.
    pub fn shape(self, arch: ArchKind) -> BlockShape {
        match arch {
            ArchKind::X86 => self.shape_for::<X86>(),
            ArchKind::X64 => self.shape_for::<X64>(),
        }
    }

    fn shape_for<A: Arch>(self) -> BlockShape {
        match self {
            Self::Peb => BlockShape::of::<Peb<A>>(),
            Self::PebLdrData => BlockShape::of::<PebLdrData<A>>(),
            Self::LdrDataTableEntry => BlockShape::of::<LdrDataTableEntry<A>>(),
            Self::RtlUserProcessParameters => BlockShape::of::<RtlUserProcessParameters<A>>(),
            Self::Teb => BlockShape::of::<Teb<A>>(),
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "peb" => Ok(Self::Peb),
            "teb" => Ok(Self::Teb),
            "ldr_data" | "peb_ldr_data" => Ok(Self::PebLdrData),
            "ldr" | "ldr_data_table_entry" => Ok(Self::LdrDataTableEntry),
            "params" | "rtl_user_process_parameters" => Ok(Self::RtlUserProcessParameters),
            _ => Err(LayoutError::UnknownBlock(s.to_string())),
        }
    }
}

/// Size and alignment of a block, as laid out by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockShape {
    pub kind: BlockKind,
    pub arch: ArchKind,
    pub size: usize,
    pub align: usize,
}

impl BlockShape {
    pub fn of<T: Block>() -> Self {
        Self {
            kind: T::KIND,
            arch: <T::Arch as Arch>::KIND,
            size: mem::size_of::<T>(),
            align: mem::align_of::<T>(),
        }
    }
}

impl Display for BlockShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): size {:#x}, align {}",
            self.kind, self.arch, self.size, self.align
        )
    }
}

/// An environment block.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` plain old data: every bit pattern
/// (all zeroes included) must be a valid value, and every byte must belong
/// to a member (no implicit padding).
pub unsafe trait Block: Copy + 'static {
    const NAME: &'static str;
    const KIND: BlockKind;
    type Arch: Arch;

    /// A block with every member set to zero.
    fn zeroed() -> Self {
        // SAFETY: all zeroes is a valid value per the trait's contract.
        unsafe { mem::zeroed() }
    }

    /// The raw bytes of the block.
    fn as_bytes(&self) -> &[u8] {
        // SAFETY: no implicit padding so every byte is initialized.
        unsafe { slice::from_raw_parts((self as *const Self).cast::<u8>(), mem::size_of::<Self>()) }
    }

    /// Build a block from the first `size_of::<Self>()` bytes of `bytes`.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let expected = mem::size_of::<Self>();
        if bytes.len() < expected {
            return Err(LayoutError::TooSmall {
                block: Self::NAME,
                expected,
                actual: bytes.len(),
            });
        }

        // SAFETY: the slice is big enough and every bit pattern is valid.
        Ok(unsafe { ptr::read_unaligned(bytes.as_ptr().cast::<Self>()) })
    }
}

/// Peek for a block at the current position of the reader; the position is
/// restored afterwards.
pub fn peek_block<T: Block>(reader: &mut impl Reader) -> Result<T> {
    let mut block = T::zeroed();
    let size_of_block = mem::size_of::<T>();
    // SAFETY: `block` is valid for `size_of_block` bytes, and any byte pattern
    // written in it is a valid `T`.
    let slice_over_block =
        unsafe { slice::from_raw_parts_mut((&mut block as *mut T).cast::<u8>(), size_of_block) };

    let pos = reader.stream_position()?;
    read_all(reader, slice_over_block).map_err(|e| match e {
        LayoutError::TooSmall { actual, .. } => LayoutError::TooSmall {
            block: T::NAME,
            expected: size_of_block,
            actual,
        },
        e => e,
    })?;
    reader.seek(io::SeekFrom::Start(pos))?;
    debug!("peeked a {} ({}) at {pos:#x}", T::NAME, <T::Arch as Arch>::KIND);

    Ok(block)
}

/// Read a block from the reader and move past it.
pub fn read_block<T: Block>(reader: &mut impl Reader) -> Result<T> {
    let block = peek_block::<T>(reader)?;
    let size_of_block = i64::try_from(mem::size_of::<T>())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "block too large"))?;
    reader.seek(io::SeekFrom::Current(size_of_block))?;

    Ok(block)
}

/// Like `read_exact` but reports how much could be read when it runs out.
fn read_all(reader: &mut impl Reader, buf: &mut [u8]) -> Result<()> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => {
                return Err(LayoutError::TooSmall {
                    block: "",
                    expected: buf.len(),
                    actual: read,
                })
            }
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn kinds() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.name().parse::<BlockKind>().unwrap(), kind);
        }
        assert_eq!("ldr-data".parse::<BlockKind>().unwrap(), BlockKind::PebLdrData);
        assert!("eprocess".parse::<BlockKind>().is_err());
    }

    #[test]
    fn shapes() {
        let shape = BlockKind::Teb.shape(ArchKind::X64);
        assert_eq!(shape.size, 0x1878);
        assert_eq!(shape.align, 8);
        assert_eq!(BlockShape::of::<PebLdrData<X86>>().size, 0x30);
    }

    #[test]
    fn peek_and_read() {
        let mut bytes = vec![0u8; 0x58 * 2];
        bytes[0] = 0x58;
        bytes[0x58] = 0x1;
        let mut cursor = Cursor::new(bytes);
        let first = peek_block::<PebLdrData<X64>>(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 0);
        assert_eq!(first.length, 0x58);
        let first = read_block::<PebLdrData<X64>>(&mut cursor).unwrap();
        assert_eq!(first.length, 0x58);
        assert_eq!(cursor.position(), 0x58);
        let second = read_block::<PebLdrData<X64>>(&mut cursor).unwrap();
        assert_eq!(second.length, 0x1);
        match read_block::<PebLdrData<X64>>(&mut cursor) {
            Err(LayoutError::TooSmall {
                block,
                expected,
                actual,
            }) => assert_eq!((block, expected, actual), ("PEB_LDR_DATA", 0x58, 0)),
            r => panic!("unexpected {r:?}"),
        }
    }
}

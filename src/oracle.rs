// Axel '0vercl0k' Souchet - October 19 2026
//! The ground truth every block is held to.
//!
//! Each block has a table listing, for a bunch of its members, the offset the
//! member has on x86 and on x64 (`NA` when the member doesn't exist on that
//! model), the masks of its bit-fields and the size the block had in a few
//! releases. The tables are declared with `layout_table!` which also
//! generates the code checking them against the structures of this crate.
//!
//! ```
//! use pebteb_layout::{oracle, ArchKind, BlockKind, LayoutTarget, WinVersion};
//!
//! oracle::verify_all().unwrap();
//! let target = LayoutTarget::new(ArchKind::X86, WinVersion::Nt61);
//! assert_eq!(oracle::expected_size(BlockKind::Teb, target), Some(0xfe4));
//! ```
use std::mem;

use log::debug;

use crate::arch::{Arch, ArchKind};
use crate::block::{Block, BlockKind};
use crate::error::{LayoutError, Result};
use crate::flags::BitGroup;
use crate::version::{LayoutTarget, WinVersion};

/// Offset of a (possibly nested) member in a block, in bytes.
///
/// ```
/// use pebteb_layout::{field_offset, Peb, X64, X86};
///
/// assert_eq!(field_offset!(Peb<X86>, ldr), 0x0c);
/// assert_eq!(field_offset!(Peb<X64>, unicode_case_table.nt_3_50.nt_global_flag), 0xbc);
/// ```
#[macro_export]
macro_rules! field_offset {
    ($ty:ty, $head:ident $(. $rest:ident)*) => {{
        let block = <$ty as $crate::Block>::zeroed();
        let base = ::std::ptr::addr_of!(block) as usize;
        // SAFETY: only an address is computed, nothing is read.
        #[allow(unused_unsafe)]
        let field = unsafe { ::std::ptr::addr_of!(block.$head $(.$rest)*) } as usize;

        field - base
    }};
}

/// Offset of the first byte past a member.
#[macro_export]
macro_rules! field_end {
    ($ty:ty, $head:ident $(. $rest:ident)*) => {{
        let block = <$ty as $crate::Block>::zeroed();
        // SAFETY: blocks are plain data, any alternative can be read.
        #[allow(unused_unsafe)]
        let size = ::std::mem::size_of_val(unsafe { &block.$head $(.$rest)* });

        $crate::field_offset!($ty, $head $(.$rest)*) + size
    }};
}

/// Declare the ground truth of a block and generate its checks.
///
/// ```text
/// layout_table! {
///     block: Peb;
///     offsets {
///         ldr => 0x0c, 0x18;
///         padding0 => NA, 0x04;
///     }
///     masks {
///         Flag: setter(args) => u8 [0x03, 0x03] == 0x01;
///     }
///     sizes {
///         Nt40 => gdi_handle_buffer + 4, 0x150, NA;
///         Nt61 => ..., 0xfe4, 0x1818, align ptr;
///     }
///     total Win11_23H2 => 0x488, 0x7d0;
/// }
/// ```
///
/// Size rows measure the end of their tail member (plus the optional extra
/// bytes), rounded up to the alignment of the block unless `align` says
/// otherwise. `NA` sides aren't expanded at all, which is what allows paths
/// through members that only exist on the other model.
macro_rules! layout_table {
    (@opt NA) => {
        None
    };
    (@opt $value:literal) => {
        Some($value)
    };
    (@align_kind) => {
        $crate::oracle::SizeAlign::Block
    };
    (@align_kind ptr) => {
        $crate::oracle::SizeAlign::Pointer
    };
    (@align_kind $align:literal) => {
        $crate::oracle::SizeAlign::Bytes($align)
    };
    (@align $block:ident, $arch:ident,) => {
        ::std::mem::align_of::<$block<$crate::$arch>>()
    };
    (@align $block:ident, $arch:ident, ptr) => {
        <$crate::$arch as $crate::Arch>::KIND.pointer_size()
    };
    (@align $block:ident, $arch:ident, $align:literal) => {
        $align
    };
    (@offset $block:ident, $arch:ident, NA, $($path:tt)*) => {};
    (@offset $block:ident, $arch:ident, $expected:literal, $head:ident $(. $rest:ident)*) => {
        $crate::oracle::check_offset(
            <$block<$crate::$arch> as $crate::Block>::NAME,
            concat!(stringify!($head) $(, ".", stringify!($rest))*),
            <$crate::$arch as $crate::Arch>::KIND,
            $crate::field_offset!($block<$crate::$arch>, $head $(.$rest)*),
            $expected,
        )?;
    };
    (@mask $block:ident, $arch:ident, NA, $($rest:tt)*) => {};
    (
        @mask $block:ident, $arch:ident, $offset:literal, $flag:ident,
        $setter:ident($($arg:expr),*), $width:ty, $mask:literal
    ) => {{
        let mut block = <$block<$crate::$arch> as $crate::Block>::zeroed();
        block.$setter($($arg),*);
        $crate::oracle::check_mask(
            &block,
            stringify!($flag),
            $offset,
            ::std::mem::size_of::<$width>(),
            $mask,
        )?;
    }};
    (@size $block:ident, $arch:ident, $version:ident, NA, $($rest:tt)*) => {};
    (
        @size $block:ident, $arch:ident, $version:ident, $expected:literal,
        [$($align:tt)?], [$($extra:literal)?], $head:ident $(. $rest:ident)*
    ) => {
        $crate::oracle::check_size(
            <$block<$crate::$arch> as $crate::Block>::NAME,
            $crate::WinVersion::$version,
            <$crate::$arch as $crate::Arch>::KIND,
            $crate::field_end!($block<$crate::$arch>, $head $(.$rest)*) $(+ $extra)?,
            layout_table!(@align $block, $arch, $($align)?),
            $expected,
        )?;
    };
    (@total $block:ident, $arch:ident, $version:ident, $expected:literal) => {
        $crate::oracle::check_size(
            <$block<$crate::$arch> as $crate::Block>::NAME,
            $crate::WinVersion::$version,
            <$crate::$arch as $crate::Arch>::KIND,
            ::std::mem::size_of::<$block<$crate::$arch>>(),
            ::std::mem::align_of::<$block<$crate::$arch>>(),
            $expected,
        )?;
    };
    (
        block: $block:ident;
        offsets {
            $($ohead:ident $(. $orest:ident)* => $ox86:tt, $ox64:tt;)*
        }
        masks {
            $(
                $flag:ident: $setter:ident($($arg:expr),*)
                    => $width:ty [$mx86:tt, $mx64:tt] == $mask:literal;
            )*
        }
        sizes {
            $(
                $version:ident => $shead:ident $(. $srest:ident)* $(+ $extra:literal)?,
                    $sx86:tt, $sx64:tt $(, align $align:tt)?;
            )*
        }
        total $tversion:ident => $tx86:literal, $tx64:literal;
    ) => {
        pub const BLOCK: $crate::BlockKind = <$block<$crate::X86> as $crate::Block>::KIND;

        pub const OFFSETS: &[$crate::oracle::ExpectedOffset] = &[
            $($crate::oracle::ExpectedOffset {
                field: concat!(stringify!($ohead) $(, ".", stringify!($orest))*),
                x86: layout_table!(@opt $ox86),
                x64: layout_table!(@opt $ox64),
            },)*
        ];

        pub const MASKS: &[$crate::oracle::ExpectedMask] = &[
            $($crate::oracle::ExpectedMask {
                flag: stringify!($flag),
                width: ::std::mem::size_of::<$width>(),
                x86: layout_table!(@opt $mx86),
                x64: layout_table!(@opt $mx64),
                mask: $mask,
            },)*
        ];

        pub const SIZES: &[$crate::oracle::ExpectedSize] = &[
            $($crate::oracle::ExpectedSize {
                version: $crate::WinVersion::$version,
                tail: Some(concat!(
                    stringify!($shead) $(, ".", stringify!($srest))* $(, " + ", stringify!($extra))?
                )),
                x86: layout_table!(@opt $sx86),
                x64: layout_table!(@opt $sx64),
                align: layout_table!(@align_kind $($align)?),
            },)*
            $crate::oracle::ExpectedSize {
                version: $crate::WinVersion::$tversion,
                tail: None,
                x86: Some($tx86),
                x64: Some($tx64),
                align: $crate::oracle::SizeAlign::Block,
            },
        ];

        fn verify_x86() -> $crate::Result<()> {
            $(layout_table!(@offset $block, X86, $ox86, $ohead $(.$orest)*);)*
            $(layout_table!(@mask $block, X86, $mx86, $flag, $setter($($arg),*), $width, $mask);)*
            $(layout_table!(
                @size $block, X86, $version, $sx86, [$($align)?], [$($extra)?], $shead $(.$srest)*
            );)*
            layout_table!(@total $block, X86, $tversion, $tx86);

            Ok(())
        }

        fn verify_x64() -> $crate::Result<()> {
            $(layout_table!(@offset $block, X64, $ox64, $ohead $(.$orest)*);)*
            $(layout_table!(@mask $block, X64, $mx64, $flag, $setter($($arg),*), $width, $mask);)*
            $(layout_table!(
                @size $block, X64, $version, $sx64, [$($align)?], [$($extra)?], $shead $(.$srest)*
            );)*
            layout_table!(@total $block, X64, $tversion, $tx64);

            Ok(())
        }

        /// Check every row of the table for `arch`. The first disagreement is
        /// returned.
        pub fn verify(arch: $crate::ArchKind) -> $crate::Result<()> {
            match arch {
                $crate::ArchKind::X86 => verify_x86()?,
                $crate::ArchKind::X64 => verify_x64()?,
            }

            ::log::info!(
                "{} ({arch}): {} offsets, {} masks and {} sizes check out",
                BLOCK,
                OFFSETS.len(),
                MASKS.len(),
                SIZES.len()
            );

            Ok(())
        }
    };
}

mod ldr;
mod params;
mod peb;
mod teb;

/// The documented offset of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedOffset {
    /// Path of the member, e.g. `kernel_callbacks.nt_3_50.cross_process`.
    pub field: &'static str,
    pub x86: Option<usize>,
    pub x64: Option<usize>,
}

impl ExpectedOffset {
    pub fn expected(&self, arch: ArchKind) -> Option<usize> {
        match arch {
            ArchKind::X86 => self.x86,
            ArchKind::X64 => self.x64,
        }
    }
}

/// The documented storage and mask of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedMask {
    pub flag: &'static str,
    /// Width in bytes of the integer storing the flag.
    pub width: usize,
    /// Offset of that integer.
    pub x86: Option<usize>,
    pub x64: Option<usize>,
    pub mask: u64,
}

impl ExpectedMask {
    pub fn offset(&self, arch: ArchKind) -> Option<usize> {
        match arch {
            ArchKind::X86 => self.x86,
            ArchKind::X64 => self.x64,
        }
    }
}

/// What a raw size gets rounded up to before being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeAlign {
    /// The alignment of the block.
    Block,
    /// The width of a pointer.
    Pointer,
    Bytes(usize),
}

impl SizeAlign {
    pub fn resolve(self, arch: ArchKind, block_align: usize) -> usize {
        match self {
            Self::Block => block_align,
            Self::Pointer => arch.pointer_size(),
            Self::Bytes(n) => n,
        }
    }
}

/// The documented size of a block as of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedSize {
    pub version: WinVersion,
    /// The last member the block had in that release; `None` for the block
    /// as a whole.
    pub tail: Option<&'static str>,
    pub x86: Option<usize>,
    pub x64: Option<usize>,
    pub align: SizeAlign,
}

impl ExpectedSize {
    pub fn expected(&self, arch: ArchKind) -> Option<usize> {
        match arch {
            ArchKind::X86 => self.x86,
            ArchKind::X64 => self.x64,
        }
    }
}

fn round_up(value: usize, align: usize) -> usize {
    if align <= 1 {
        return value;
    }

    (value + align - 1) / align * align
}

/// Compare the offset of a member with the documented one.
pub fn check_offset(
    block: &'static str,
    field: &'static str,
    arch: ArchKind,
    actual: usize,
    expected: usize,
) -> Result<()> {
    if actual != expected {
        return Err(LayoutError::OffsetMismatch {
            block,
            field,
            arch,
            expected,
            actual,
        });
    }

    debug!("{block}.{field} ({arch}) is at {actual:#x}");
    Ok(())
}

/// Round `raw` up to `align` and compare it with the documented size.
pub fn check_size(
    block: &'static str,
    version: WinVersion,
    arch: ArchKind,
    raw: usize,
    align: usize,
    expected: usize,
) -> Result<()> {
    let actual = round_up(raw, align);
    if actual != expected {
        return Err(LayoutError::SizeMismatch {
            block,
            version,
            arch,
            expected,
            actual,
        });
    }

    debug!("{block} as of {version} ({arch}) is {actual:#x} bytes");
    Ok(())
}

/// Read an integer of `bytes.len()` bytes.
fn read_storage(bytes: &[u8]) -> Option<u64> {
    let value: u64 = match bytes.len() {
        1 => bytes[0].into(),
        2 => u16::from_ne_bytes(bytes.try_into().ok()?).into(),
        4 => u32::from_ne_bytes(bytes.try_into().ok()?).into(),
        8 => u64::from_ne_bytes(bytes.try_into().ok()?),
        _ => return None,
    };

    Some(value)
}

/// Make sure a block with a single flag set has exactly `mask` in the
/// `width`-byte integer at `offset`, and nothing anywhere else.
pub fn check_mask<T: Block>(
    block: &T,
    flag: &'static str,
    offset: usize,
    width: usize,
    mask: u64,
) -> Result<()> {
    let bytes = block.as_bytes();
    let mismatch = |offset, actual| LayoutError::MaskMismatch {
        block: T::NAME,
        flag,
        arch: <T::Arch as Arch>::KIND,
        offset,
        mask,
        actual,
    };

    let storage = offset..offset + width;
    let actual = bytes
        .get(storage.clone())
        .and_then(read_storage)
        .ok_or_else(|| mismatch(offset, 0))?;

    if actual != mask {
        return Err(mismatch(offset, actual));
    }

    let stray = bytes
        .iter()
        .enumerate()
        .find(|&(idx, &b)| b != 0 && !storage.contains(&idx));

    if let Some((idx, &b)) = stray {
        return Err(mismatch(idx, b.into()));
    }

    debug!(
        "{}.{flag} ({}) is {mask:#x} at {offset:#x}",
        T::NAME,
        <T::Arch as Arch>::KIND
    );

    Ok(())
}

/// Check the table of one block for one address model.
pub fn verify_block(kind: BlockKind, arch: ArchKind) -> Result<()> {
    match kind {
        BlockKind::Peb => peb::verify(arch),
        BlockKind::PebLdrData => ldr::data::verify(arch),
        BlockKind::LdrDataTableEntry => ldr::entry::verify(arch),
        BlockKind::RtlUserProcessParameters => params::verify(arch),
        BlockKind::Teb => teb::verify(arch),
    }
}

/// Check every table for both address models, then the bit-field catalogs.
pub fn verify_all() -> Result<()> {
    for kind in BlockKind::ALL {
        for arch in ArchKind::ALL {
            debug!("{}", kind.shape(arch));
            verify_block(kind, arch)?;
        }
    }

    check_catalogs()
}

pub fn offsets(kind: BlockKind) -> &'static [ExpectedOffset] {
    match kind {
        BlockKind::Peb => peb::OFFSETS,
        BlockKind::PebLdrData => ldr::data::OFFSETS,
        BlockKind::LdrDataTableEntry => ldr::entry::OFFSETS,
        BlockKind::RtlUserProcessParameters => params::OFFSETS,
        BlockKind::Teb => teb::OFFSETS,
    }
}

pub fn masks(kind: BlockKind) -> &'static [ExpectedMask] {
    match kind {
        BlockKind::Peb => peb::MASKS,
        BlockKind::PebLdrData => ldr::data::MASKS,
        BlockKind::LdrDataTableEntry => ldr::entry::MASKS,
        BlockKind::RtlUserProcessParameters => params::MASKS,
        BlockKind::Teb => teb::MASKS,
    }
}

/// The size rows of a block, oldest first; the last one is the whole block.
pub fn sizes(kind: BlockKind) -> &'static [ExpectedSize] {
    match kind {
        BlockKind::Peb => peb::SIZES,
        BlockKind::PebLdrData => ldr::data::SIZES,
        BlockKind::LdrDataTableEntry => ldr::entry::SIZES,
        BlockKind::RtlUserProcessParameters => params::SIZES,
        BlockKind::Teb => teb::SIZES,
    }
}

/// The documented offset of `field` (a path like `ldr` or
/// `kernel_callbacks.nt_3_50.cross_process`), if the table has one.
pub fn expected_offset(kind: BlockKind, field: &str, arch: ArchKind) -> Option<usize> {
    offsets(kind)
        .iter()
        .find(|row| row.field == field)
        .and_then(|row| row.expected(arch))
}

/// The documented size of a block for a release: the most recent size row
/// that isn't newer than the release. `None` when the release doesn't exist
/// on that model or when nothing is documented for it.
pub fn expected_size(kind: BlockKind, target: LayoutTarget) -> Option<usize> {
    if !target.version.exists_for(target.arch) {
        return None;
    }

    sizes(kind)
        .iter()
        .rev()
        .find(|row| row.version <= target.version)
        .and_then(|row| row.expected(target.arch))
}

/// Every bit-field catalog of the crate.
pub fn catalogs() -> [BitGroup; 8] {
    [
        crate::peb::PEB_BIT_FIELD,
        crate::peb::CROSS_PROCESS_FLAGS,
        crate::peb::EXECUTE_OPTIONS,
        crate::peb::TRACING_FLAGS,
        crate::peb::LEAP_SECOND_FLAGS,
        crate::ldr::LDR_FLAGS,
        crate::teb::SAME_TEB_FLAGS,
        crate::teb::CROSS_TEB_FLAGS,
    ]
}

/// No two names may own the same bit in the same release.
pub fn check_catalogs() -> Result<()> {
    for group in catalogs() {
        group.check_disjoint()?;
    }

    Ok(())
}

/// Size of `T` rounded up to its alignment.
pub fn rounded_size<T: Block>() -> usize {
    round_up(mem::size_of::<T>(), mem::align_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{X64, X86};
    use crate::peb::Peb;

    #[test]
    fn rounding() {
        assert_eq!(round_up(0xfe4, 8), 0xfe8);
        assert_eq!(round_up(0xfe4, 4), 0xfe4);
        assert_eq!(round_up(0x17d4, 8), 0x17d8);
        assert_eq!(round_up(3, 1), 3);
        assert_eq!(round_up(0, 8), 0);
    }

    #[test]
    fn offset_macros() {
        assert_eq!(field_offset!(Peb<X86>, being_debugged), 2);
        assert_eq!(field_offset!(Peb<X64>, process_heap), 0x30);
        assert_eq!(field_end!(Peb<X64>, process_heap), 0x38);
        assert_eq!(field_offset!(Peb<X86>, fast_peb_lock.nt_3_10), 0x1c);
    }

    #[test]
    fn mismatches() {
        match check_offset("PEB", "ldr", ArchKind::X86, 0x10, 0x0c) {
            Err(LayoutError::OffsetMismatch {
                expected, actual, ..
            }) => assert_eq!((expected, actual), (0x0c, 0x10)),
            r => panic!("unexpected {r:?}"),
        }

        assert!(check_size("TEB", WinVersion::Nt61, ArchKind::X86, 0xfe4, 4, 0xfe4).is_ok());
        assert!(check_size("TEB", WinVersion::Nt61, ArchKind::X86, 0xfe4, 8, 0xfe4).is_err());
    }

    #[test]
    fn stray_bits() {
        let mut peb = Peb::<X64>::zeroed();
        peb.being_debugged = 1;
        peb.bit_field.set(0x01);
        match check_mask(&peb, "ImageUsedLargePages", 3, 1, 0x01) {
            Err(LayoutError::MaskMismatch { offset, actual, .. }) => {
                assert_eq!((offset, actual), (2, 1))
            }
            r => panic!("unexpected {r:?}"),
        }

        peb.being_debugged = 0;
        check_mask(&peb, "ImageUsedLargePages", 3, 1, 0x01).unwrap();
        assert!(check_mask(&peb, "ImageUsedLargePages", 3, 1, 0x02).is_err());
        assert!(check_mask(&peb, "ImageUsedLargePages", 3, 3, 0x01).is_err());
    }

    #[test]
    fn lookups() {
        assert_eq!(
            expected_offset(BlockKind::LdrDataTableEntry, "tls_index", ArchKind::X64),
            Some(0x6e)
        );
        assert_eq!(
            expected_offset(BlockKind::Peb, "padding0", ArchKind::X86),
            None
        );
        assert_eq!(expected_offset(BlockKind::Peb, "nope", ArchKind::X86), None);
        assert_eq!(sizes(BlockKind::Teb).last().and_then(|s| s.x64), Some(0x1878));
    }
}

// Axel '0vercl0k' Souchet - October 19 2026
//! The two address models every environment block is described for.
//!
//! Instead of relying on whatever `_WIN64` happens to be for the current
//! build, every block is generic over an [`Arch`]: `Peb<X86>` is the 32-bit
//! PEB and `Peb<X64>` the 64-bit one, both materialised in the same build.
//! Pointer-sized members are stored as target-width integers ([`Ptr32`] /
//! [`Ptr64`]) because the blocks we describe usually live in an address
//! space that isn't ours.
use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::{LayoutError, Result};
use crate::teb::{
    InstrumentationTail32, InstrumentationTail64, SystemReserved1X64, SystemReserved1X86,
};

/// Runtime tag for an address model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchKind {
    /// 32-bit Windows (and WOW64 processes), pointers are 4 bytes.
    X86,
    /// 64-bit Windows, pointers are 8 bytes.
    X64,
}

impl ArchKind {
    pub const ALL: [ArchKind; 2] = [ArchKind::X86, ArchKind::X64];

    /// The address model of the machine running this code.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::X64
        } else {
            Self::X86
        }
    }

    /// Size in bytes of a pointer.
    #[must_use]
    pub const fn pointer_size(self) -> usize {
        match self {
            Self::X86 => 4,
            Self::X64 => 8,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}

impl Display for ArchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" | "win32" | "32" => Ok(Self::X86),
            "x64" | "amd64" | "x86_64" | "win64" | "64" => Ok(Self::X64),
            _ => Err(LayoutError::UnknownArch(s.to_string())),
        }
    }
}

/// A pointer in a 32-bit address space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Ptr32(pub u32);

/// A pointer in a 64-bit address space.
///
/// The explicit alignment keeps the 64-bit layouts correct even when this
/// crate is compiled for a 32-bit host (where `u64` may only be 4-byte
/// aligned).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(C, align(8))]
pub struct Ptr64(pub u64);

/// What the blocks need from a pointer-sized member.
pub trait Pointer: Copy + Debug + Eq + 'static {
    /// Build a pointer from an address, truncating to the pointer width.
    fn from_addr(addr: u64) -> Self;

    /// The address as a `u64`.
    fn addr(self) -> u64;

    fn is_null(self) -> bool {
        self.addr() == 0
    }
}

impl Pointer for Ptr32 {
    fn from_addr(addr: u64) -> Self {
        Self(addr as u32)
    }

    fn addr(self) -> u64 {
        self.0.into()
    }
}

impl Pointer for Ptr64 {
    fn from_addr(addr: u64) -> Self {
        Self(addr)
    }

    fn addr(self) -> u64 {
        self.0
    }
}

impl Debug for Ptr32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl Debug for Ptr64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// An address model.
///
/// Beyond the pointer type, the associated types capture every place where
/// the 32-bit and 64-bit layouts differ by more than the pointer width:
/// padding that only one model has, arrays whose length depends on the
/// model, and members that only exist on one side.
pub trait Arch: Copy + Debug + Eq + Default + 'static {
    const KIND: ArchKind;

    /// Pointer-sized members (`PVOID`, `HANDLE`, `ULONG_PTR`, ...).
    type Ptr: Pointer;

    /// Four bytes of alignment padding that only the 64-bit layouts have.
    type Pad4On64: Copy + Debug + Eq;

    /// Four bytes of alignment padding that only the 32-bit layouts have.
    type Pad4On32: Copy + Debug + Eq;

    /// A member that only exists in the 32-bit layouts; zero-sized otherwise.
    type Win32Only<T: Copy>: Copy;

    /// A member that only exists in the 64-bit layouts; zero-sized otherwise.
    type Win64Only<T: Copy>: Copy;

    /// `PEB.GdiHandleBuffer` is 0x22 dwords on x86 and 0x3c on x64.
    type GdiHandleBuffer: Copy + Debug;

    /// Padding between `TEB.StaticUnicodeBuffer` and `TEB.DeallocationStack`.
    type StaticUnicodeBufferPad: Copy + Debug;

    /// The part of `TEB.SystemReserved1` reshaped by 1709.
    type TebSystemReserved1: Copy + Debug;

    /// `TEB.Instrumentation` in 6.0 and higher (9 pointers on x86, 11 on x64).
    type TebInstrumentation: Copy + Debug;

    /// The tail of the instrumentation callback members, ordered differently
    /// on each model.
    type TebInstrumentationTail: Copy + Debug;
}

/// The 32-bit address model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct X86;

/// The 64-bit address model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct X64;

impl Arch for X86 {
    const KIND: ArchKind = ArchKind::X86;
    type Ptr = Ptr32;
    type Pad4On64 = [u8; 0];
    type Pad4On32 = [u8; 4];
    type Win32Only<T: Copy> = T;
    type Win64Only<T: Copy> = PhantomData<T>;
    type GdiHandleBuffer = [u32; 0x22];
    type StaticUnicodeBufferPad = [u8; 2];
    type TebSystemReserved1 = SystemReserved1X86;
    type TebInstrumentation = [Ptr32; 0x09];
    type TebInstrumentationTail = InstrumentationTail32;
}

impl Arch for X64 {
    const KIND: ArchKind = ArchKind::X64;
    type Ptr = Ptr64;
    type Pad4On64 = [u8; 4];
    type Pad4On32 = [u8; 0];
    type Win32Only<T: Copy> = PhantomData<T>;
    type Win64Only<T: Copy> = T;
    type GdiHandleBuffer = [u32; 0x3c];
    type StaticUnicodeBufferPad = [u8; 6];
    type TebSystemReserved1 = SystemReserved1X64;
    type TebInstrumentation = [Ptr64; 0x0b];
    type TebInstrumentationTail = InstrumentationTail64;
}

/// The address model of the machine running this code.
#[cfg(target_pointer_width = "64")]
pub type Native = X64;

/// The address model of the machine running this code.
#[cfg(target_pointer_width = "32")]
pub type Native = X86;

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn pointers() {
        assert_eq!(mem::size_of::<Ptr32>(), 4);
        assert_eq!(mem::align_of::<Ptr32>(), 4);
        assert_eq!(mem::size_of::<Ptr64>(), 8);
        assert_eq!(mem::align_of::<Ptr64>(), 8);
        assert_eq!(Ptr32::from_addr(0x1_0000_1337).addr(), 0x1337);
        assert!(Ptr64::from_addr(0).is_null());
    }

    #[test]
    fn kinds() {
        assert_eq!(X86::KIND.pointer_size(), mem::size_of::<<X86 as Arch>::Ptr>());
        assert_eq!(X64::KIND.pointer_size(), mem::size_of::<<X64 as Arch>::Ptr>());
        assert_eq!(Native::KIND, ArchKind::native());
        assert_eq!("amd64".parse::<ArchKind>().unwrap(), ArchKind::X64);
        assert_eq!("X86".parse::<ArchKind>().unwrap(), ArchKind::X86);
        assert!("arm64".parse::<ArchKind>().is_err());
    }

    #[test]
    fn padding() {
        assert_eq!(mem::size_of::<<X86 as Arch>::Pad4On64>(), 0);
        assert_eq!(mem::size_of::<<X64 as Arch>::Pad4On64>(), 4);
        assert_eq!(mem::size_of::<<X86 as Arch>::Pad4On32>(), 4);
        assert_eq!(mem::size_of::<<X64 as Arch>::Pad4On32>(), 0);
        assert_eq!(mem::size_of::<<X64 as Arch>::Win32Only<u32>>(), 0);
        assert_eq!(mem::size_of::<<X86 as Arch>::Win64Only<Ptr32>>(), 0);
    }
}

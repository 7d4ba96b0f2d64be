// Axel '0vercl0k' Souchet - October 19 2026
//! The small structures the environment blocks are built out of.
use std::fmt::{self, Debug, Display};
use std::mem;

use static_assertions::const_assert_eq;

use crate::arch::{Arch, Pointer, X64, X86};
use crate::bits::Bits;

/// `WIN32_CLIENT_INFO_LENGTH`, in pointers.
pub const WIN32_CLIENT_INFO_LENGTH: usize = 62;

/// `STATIC_UNICODE_BUFFER_LENGTH`, in UTF-16 code units.
pub const STATIC_UNICODE_BUFFER_LENGTH: usize = 261;

/// `TLS_MINIMUM_AVAILABLE`.
pub const TLS_MINIMUM_AVAILABLE: usize = 64;

/// `RTL_MAX_DRIVE_LETTERS`.
pub const RTL_MAX_DRIVE_LETTERS: usize = 32;

/// `GDI_BATCH_BUFFER_SIZE`, in dwords.
pub const GDI_BATCH_BUFFER_SIZE: usize = 310;

/// A `LARGE_INTEGER`. It is 8-byte aligned in both address models.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C, align(8))]
pub struct LargeInteger(pub i64);

impl LargeInteger {
    pub fn low_part(&self) -> u32 {
        self.0 as u32
    }

    pub fn high_part(&self) -> i32 {
        (self.0 >> 32) as i32
    }
}

impl Debug for LargeInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A `ULARGE_INTEGER`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C, align(8))]
pub struct ULargeInteger(pub u64);

impl ULargeInteger {
    pub fn low_part(&self) -> u32 {
        self.0 as u32
    }

    pub fn high_part(&self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl Debug for ULargeInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A `ULONGLONG` member; 8-byte aligned even for 32-bit layouts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C, align(8))]
pub struct Ulonglong(pub u64);

impl Debug for Ulonglong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// `LIST_ENTRY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ListEntry<A: Arch> {
    pub flink: A::Ptr,
    pub blink: A::Ptr,
}

impl<A: Arch> ListEntry<A> {
    /// A list is empty when its head points to itself.
    pub fn is_empty_at(&self, head_address: u64) -> bool {
        self.flink.addr() == head_address && self.blink.addr() == head_address
    }
}

/// `STRING` / `UNICODE_STRING`: a counted string living in the target's
/// address space. Lengths are in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct CountedString<A: Arch> {
    pub length: u16,
    pub maximum_length: u16,
    pub padding: A::Pad4On64,
    pub buffer: A::Ptr,
}

pub type UnicodeString<A> = CountedString<A>;
pub type AnsiString<A> = CountedString<A>;

impl<A: Arch> CountedString<A> {
    pub fn is_empty(&self) -> bool {
        self.length == 0 || self.buffer.is_null()
    }

    /// Number of UTF-16 code units, assuming this is a `UNICODE_STRING`.
    pub fn len_wide(&self) -> usize {
        usize::from(self.length / 2)
    }

    /// Is the length consistent with the capacity?
    pub fn is_well_formed(&self) -> bool {
        self.length <= self.maximum_length
    }
}

/// `CLIENT_ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ClientId<A: Arch> {
    pub unique_process: A::Ptr,
    pub unique_thread: A::Ptr,
}

impl<A: Arch> ClientId<A> {
    pub fn pid(&self) -> u64 {
        self.unique_process.addr()
    }

    pub fn tid(&self) -> u64 {
        self.unique_thread.addr()
    }
}

/// `NT_TIB.FiberData` and `NT_TIB.Version` share their storage.
#[derive(Clone, Copy)]
#[repr(C)]
pub union FiberDataSlot<A: Arch> {
    pub fiber_data: A::Ptr,
    pub version: u32,
}

/// `NT_TIB`, the first member of every TEB.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct NtTib<A: Arch> {
    pub exception_list: A::Ptr,
    pub stack_base: A::Ptr,
    pub stack_limit: A::Ptr,
    pub sub_system_tib: A::Ptr,
    pub fiber: FiberDataSlot<A>,
    pub arbitrary_user_pointer: A::Ptr,
    pub self_ptr: A::Ptr,
}

impl<A: Arch> NtTib<A> {
    pub fn fiber_data(&self) -> A::Ptr {
        // SAFETY: both alternatives are plain integers.
        unsafe { self.fiber.fiber_data }
    }

    pub fn stack_size(&self) -> u64 {
        self.stack_base.addr().saturating_sub(self.stack_limit.addr())
    }
}

impl<A: Arch> Debug for NtTib<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NtTib")
            .field("exception_list", &self.exception_list)
            .field("stack_base", &self.stack_base)
            .field("stack_limit", &self.stack_limit)
            .field("sub_system_tib", &self.sub_system_tib)
            .field("fiber_data", &self.fiber_data())
            .field("arbitrary_user_pointer", &self.arbitrary_user_pointer)
            .field("self_ptr", &self.self_ptr)
            .finish()
    }
}

/// `GUID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

/// `PROCESSOR_NUMBER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct ProcessorNumber {
    pub group: u16,
    pub number: u8,
    pub reserved: u8,
}

/// `GROUP_AFFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GroupAffinity<A: Arch> {
    pub mask: A::Ptr,
    pub group: u16,
    pub reserved: [u16; 3],
}

/// `RTL_BALANCED_NODE`: a red-black / AVL tree node. The low two bits of
/// `parent_value` hold the color (or the balance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RtlBalancedNode<A: Arch> {
    pub children: [A::Ptr; 2],
    pub parent_value: A::Ptr,
}

impl<A: Arch> RtlBalancedNode<A> {
    pub fn left(&self) -> A::Ptr {
        self.children[0]
    }

    pub fn right(&self) -> A::Ptr {
        self.children[1]
    }

    pub fn red(&self) -> bool {
        self.parent_value.addr().bit(0) == 1
    }

    pub fn balance(&self) -> u8 {
        self.parent_value.addr().bits(0..=1) as u8
    }

    pub fn parent(&self) -> A::Ptr {
        A::Ptr::from_addr(self.parent_value.addr().with_bits(0..=1, 0))
    }
}

/// `GDI_TEB_BATCH`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct GdiTebBatch<A: Arch> {
    pub offset: u32,
    pub padding: A::Pad4On64,
    pub hdc: A::Ptr,
    pub buffer: [u32; GDI_BATCH_BUFFER_SIZE],
}

impl<A: Arch> GdiTebBatch<A> {
    /// Bits 0 to 30 of `Offset`.
    pub fn batch_offset(&self) -> u32 {
        self.offset.bits(0..=30)
    }

    /// Bit 31 of `Offset`, since 10.0.
    pub fn has_rendering_command(&self) -> bool {
        self.offset.bit(31) == 1
    }
}

/// `ACTIVATION_CONTEXT_STACK`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ActivationContextStack<A: Arch> {
    pub active_frame: A::Ptr,
    pub frame_list_cache: ListEntry<A>,
    pub flags: u32,
    pub next_cookie_sequence_number: u32,
    pub stack_id: u32,
    pub padding: A::Pad4On64,
}

/// `CURDIR`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Curdir<A: Arch> {
    pub dos_path: UnicodeString<A>,
    pub handle: A::Ptr,
}

/// `RTL_DRIVE_LETTER_CURDIR`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct RtlDriveLetterCurdir<A: Arch> {
    pub flags: u16,
    pub length: u16,
    pub time_stamp: u32,
    pub dos_path: AnsiString<A>,
}

const_assert_eq!(mem::size_of::<ListEntry<X86>>(), 0x08);
const_assert_eq!(mem::size_of::<ListEntry<X64>>(), 0x10);
const_assert_eq!(mem::size_of::<UnicodeString<X86>>(), 0x08);
const_assert_eq!(mem::size_of::<UnicodeString<X64>>(), 0x10);
const_assert_eq!(mem::size_of::<ClientId<X86>>(), 0x08);
const_assert_eq!(mem::size_of::<ClientId<X64>>(), 0x10);
const_assert_eq!(mem::size_of::<NtTib<X86>>(), 0x1c);
const_assert_eq!(mem::size_of::<NtTib<X64>>(), 0x38);
const_assert_eq!(mem::size_of::<Guid>(), 0x10);
const_assert_eq!(mem::size_of::<ProcessorNumber>(), 0x04);
const_assert_eq!(mem::size_of::<GroupAffinity<X86>>(), 0x0c);
const_assert_eq!(mem::size_of::<GroupAffinity<X64>>(), 0x10);
const_assert_eq!(mem::size_of::<RtlBalancedNode<X86>>(), 0x0c);
const_assert_eq!(mem::size_of::<RtlBalancedNode<X64>>(), 0x18);
const_assert_eq!(mem::size_of::<GdiTebBatch<X86>>(), 0x4e0);
const_assert_eq!(mem::size_of::<GdiTebBatch<X64>>(), 0x4e8);
const_assert_eq!(mem::size_of::<ActivationContextStack<X86>>(), 0x18);
const_assert_eq!(mem::size_of::<ActivationContextStack<X64>>(), 0x28);
const_assert_eq!(mem::size_of::<Curdir<X86>>(), 0x0c);
const_assert_eq!(mem::size_of::<Curdir<X64>>(), 0x18);
const_assert_eq!(mem::size_of::<RtlDriveLetterCurdir<X86>>(), 0x10);
const_assert_eq!(mem::size_of::<RtlDriveLetterCurdir<X64>>(), 0x18);
const_assert_eq!(mem::size_of::<LargeInteger>(), 8);
const_assert_eq!(mem::align_of::<LargeInteger>(), 8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Ptr64, X64};

    #[test]
    fn large_integers() {
        let l = LargeInteger(-0x1_0000_0002);
        assert_eq!(l.low_part(), 0xffff_fffe);
        assert_eq!(l.high_part(), -2);
        let u = ULargeInteger(0x1337_0000_dead);
        assert_eq!(u.low_part(), 0xdead);
        assert_eq!(u.high_part(), 0x1337);
    }

    #[test]
    fn balanced_node() {
        let node = RtlBalancedNode::<X64> {
            children: [Ptr64(0x1000), Ptr64(0x2000)],
            parent_value: Ptr64(0x3001),
        };
        assert!(node.red());
        assert_eq!(node.balance(), 1);
        assert_eq!(node.parent(), Ptr64(0x3000));
        assert_eq!(node.left(), Ptr64(0x1000));
        assert_eq!(node.right(), Ptr64(0x2000));
    }

    #[test]
    fn guid() {
        let g = Guid {
            data1: 0x6b29fc40,
            data2: 0xca47,
            data3: 0x1067,
            data4: [0xb3, 0x1d, 0x00, 0xdd, 0x01, 0x06, 0x62, 0xda],
        };
        assert_eq!(g.to_string(), "6b29fc40-ca47-1067-b31d-00dd010662da");
    }

    #[test]
    fn strings() {
        let s = UnicodeString::<X86> {
            length: 8,
            maximum_length: 10,
            padding: [],
            buffer: crate::arch::Ptr32(0x1000),
        };
        assert_eq!(s.len_wide(), 4);
        assert!(s.is_well_formed());
        assert!(!s.is_empty());
    }
}

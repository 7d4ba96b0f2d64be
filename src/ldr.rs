// Axel '0vercl0k' Souchet - October 19 2026
//! The loader's view of a process: `PEB_LDR_DATA` and the module list
//! entries hanging off it.
use std::fmt::{self, Debug};
use std::mem;

use bitflags::bitflags;
use static_assertions::const_assert_eq;

use crate::arch::{Arch, Pointer, X64, X86};
use crate::block::{Block, BlockKind};
use crate::flags::{BitGroup, FlagBit};
use crate::ntdef::{LargeInteger, ListEntry, RtlBalancedNode, Ulonglong, UnicodeString};
use crate::version::{VersionRange, WinVersion};
use WinVersion::*;

/// `PEB_LDR_DATA`, pointed to by `PEB.Ldr`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct PebLdrData<A: Arch> {
    pub length: u32,
    pub initialized: u8,
    pub padding0: [u8; 3],
    pub ss_handle: A::Ptr,
    pub in_load_order_module_list: ListEntry<A>,
    pub in_memory_order_module_list: ListEntry<A>,
    pub in_initialization_order_module_list: ListEntry<A>,
    // 5.1
    pub entry_in_progress: A::Ptr,
    // 6.0
    pub shutdown_in_progress: u8,
    pub padding1: [u8; 3],
    pub padding2: A::Pad4On64,
    pub shutdown_thread_id: A::Ptr,
}

// SAFETY: plain integers, explicit padding, all zeroes is valid.
unsafe impl<A: Arch> Block for PebLdrData<A> {
    const NAME: &'static str = "PEB_LDR_DATA";
    const KIND: BlockKind = BlockKind::PebLdrData;
    type Arch = A;
}

impl<A: Arch> PebLdrData<A> {
    pub fn is_initialized(&self) -> bool {
        self.initialized != 0
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_in_progress != 0
    }
}

bitflags! {
    /// `LDR_DATA_TABLE_ENTRY.Flags`. The `LDRP_*` names used until 6.1 are
    /// kept next to the bit-field names 6.2 introduced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LdrFlags: u32 {
        const PACKAGED_BINARY = 1 << 0;
        const STATIC_LINK = 1 << 1;
        const MARKED_FOR_REMOVAL = 1 << 1;
        const IMAGE_DLL = 1 << 2;
        const LOAD_NOTIFICATIONS_SENT = 1 << 3;
        const TELEMETRY_ENTRY_PROCESSED = 1 << 4;
        const PROCESS_STATIC_IMPORT = 1 << 5;
        const IN_LEGACY_LISTS = 1 << 6;
        const IN_INDEXES = 1 << 7;
        const SHIM_DLL = 1 << 8;
        const IN_EXCEPTION_TABLE = 1 << 9;
        const LOAD_IN_PROGRESS = 1 << 12;
        const UNLOAD_IN_PROGRESS = 1 << 13;
        const LOAD_CONFIG_PROCESSED = 1 << 13;
        const ENTRY_PROCESSED = 1 << 14;
        const PROTECT_DELAY_LOAD = 1 << 15;
        const DONT_CALL_FOR_THREADS = 1 << 18;
        const PROCESS_ATTACH_CALLED = 1 << 19;
        const PROCESS_ATTACH_FAILED = 1 << 20;
        const IMAGE_NOT_AT_BASE = 1 << 21;
        const COR_DEFERRED_VALIDATE = 1 << 21;
        const COR_IMAGE = 1 << 22;
        const DONT_RELOCATE = 1 << 23;
        const COR_IL_ONLY = 1 << 24;
        const CHPE_IMAGE = 1 << 25;
        const CHPE_EMULATOR_IMAGE = 1 << 26;
        const REDIRECTED = 1 << 28;
        const COMPAT_DATABASE_PROCESSED = 1 << 31;
    }
}

pub const LDR_FLAGS: BitGroup = BitGroup {
    name: "LDR_DATA_TABLE_ENTRY.Flags",
    width: 4,
    bits: &[
        FlagBit::new("LDRP_STATIC_LINK", 0x0000_0002, VersionRange::between(Nt351, Nt61)),
        FlagBit::new("LDRP_IMAGE_DLL", 0x0000_0004, VersionRange::between(Nt351, Nt61)),
        FlagBit::new(
            "LDRP_UNLOAD_IN_PROGRESS",
            0x0000_2000,
            VersionRange::between(Nt351, Nt61),
        ),
        FlagBit::new(
            "LDRP_ENTRY_PROCESSED",
            0x0000_4000,
            VersionRange::between(Nt351, Nt61),
        ),
        FlagBit::new(
            "LDRP_PROCESS_ATTACH_CALLED",
            0x0008_0000,
            VersionRange::between(Nt351, Nt61),
        ),
        FlagBit::new(
            "LDRP_IMAGE_NOT_AT_BASE",
            0x0020_0000,
            VersionRange::between(Nt51, Nt61),
        ),
        FlagBit::new("LDRP_REDIRECTED", 0x1000_0000, VersionRange::between(Nt51, Nt61)),
        FlagBit::new("PackagedBinary", 0x0000_0001, VersionRange::since(Nt62)),
        FlagBit::new("MarkedForRemoval", 0x0000_0002, VersionRange::since(Nt62)),
        FlagBit::new("ImageDll", 0x0000_0004, VersionRange::since(Nt62)),
        FlagBit::new("LoadNotificationsSent", 0x0000_0008, VersionRange::since(Nt62)),
        FlagBit::new("TelemetryEntryProcessed", 0x0000_0010, VersionRange::since(Nt62)),
        FlagBit::new("ProcessStaticImport", 0x0000_0020, VersionRange::since(Nt62)),
        FlagBit::new("InLegacyLists", 0x0000_0040, VersionRange::since(Nt62)),
        FlagBit::new("InIndexes", 0x0000_0080, VersionRange::since(Nt62)),
        FlagBit::new("ShimDll", 0x0000_0100, VersionRange::since(Nt62)),
        FlagBit::new("InExceptionTable", 0x0000_0200, VersionRange::since(Nt62)),
        FlagBit::new("LoadInProgress", 0x0000_1000, VersionRange::since(Nt62)),
        FlagBit::new("LoadConfigProcessed", 0x0000_2000, VersionRange::since(Win10_1507)),
        FlagBit::new("EntryProcessed", 0x0000_4000, VersionRange::since(Nt62)),
        FlagBit::new("ProtectDelayLoad", 0x0000_8000, VersionRange::since(Nt62)),
        FlagBit::new("DontCallForThreads", 0x0004_0000, VersionRange::since(Nt62)),
        FlagBit::new("ProcessAttachCalled", 0x0008_0000, VersionRange::since(Nt62)),
        FlagBit::new("ProcessAttachFailed", 0x0010_0000, VersionRange::since(Nt62)),
        FlagBit::new("CorDeferredValidate", 0x0020_0000, VersionRange::since(Nt62)),
        FlagBit::new("CorImage", 0x0040_0000, VersionRange::since(Nt62)),
        FlagBit::new("DontRelocate", 0x0080_0000, VersionRange::since(Nt62)),
        FlagBit::new("CorILOnly", 0x0100_0000, VersionRange::since(Nt62)),
        FlagBit::new("ChpeImage", 0x0200_0000, VersionRange::since(Win10_1709)),
        FlagBit::new("ChpeEmulatorImage", 0x0400_0000, VersionRange::since(Win11_21H2)),
        FlagBit::new("Redirected", 0x1000_0000, VersionRange::since(Nt62)),
        FlagBit::new(
            "CompatDatabaseProcessed",
            0x8000_0000,
            VersionRange::since(Nt62),
        ),
    ],
};

/// `LDR_DLL_LOAD_REASON`, 6.2 and higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadReason {
    StaticDependency,
    StaticForwarderDependency,
    DynamicForwarderDependency,
    DelayloadDependency,
    DynamicLoad,
    AsImageLoad,
    AsDataLoad,
    EnclavePrimary,
    EnclaveDependency,
    PatchImage,
    Unknown,
}

impl TryFrom<u32> for LoadReason {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::StaticDependency,
            1 => Self::StaticForwarderDependency,
            2 => Self::DynamicForwarderDependency,
            3 => Self::DelayloadDependency,
            4 => Self::DynamicLoad,
            5 => Self::AsImageLoad,
            6 => Self::AsDataLoad,
            7 => Self::EnclavePrimary,
            8 => Self::EnclaveDependency,
            9 => Self::PatchImage,
            u32::MAX => Self::Unknown,
            _ => return Err(value),
        })
    }
}

/// `LDR_HOT_PATCH_STATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotPatchState {
    BaseImage,
    NotApplied,
    AppliedReverse,
    AppliedForward,
    FailedToPatch,
}

impl TryFrom<u32> for HotPatchState {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::BaseImage,
            1 => Self::NotApplied,
            2 => Self::AppliedReverse,
            3 => Self::AppliedForward,
            4 => Self::FailedToPatch,
            _ => return Err(value),
        })
    }
}

/// 0x10 0x20: `InProgressLinks` is the 6.2 name.
#[derive(Clone, Copy)]
#[repr(C)]
pub union InitializationOrderSlot<A: Arch> {
    pub in_initialization_order_links: ListEntry<A>,
    pub in_progress_links: ListEntry<A>,
}

/// 0x34 0x68
#[derive(Clone, Copy)]
#[repr(C)]
pub union LdrFlagsSlot {
    pub flags: u32,
    /// 6.2 and higher.
    pub flag_group: [u8; 4],
}

scalar_union! {
    /// 0x38 0x6C: renamed `ObsoleteLoadCount` in 6.2.
    LoadCountSlot: u16 { load_count, obsolete_load_count }
}

pointer_union! {
    /// 0x4C 0x90
    LockSlot { patch_information, spare, lock }
}

/// What 6.0 and 6.1 keep at 0x50.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct LinksNt60<A: Arch> {
    pub forwarder_links: ListEntry<A>,
    pub service_tag_links: ListEntry<A>,
    pub static_links: ListEntry<A>,
    pub context_information: A::Ptr,
    pub original_base: A::Ptr,
    pub load_time: LargeInteger,
}

/// The dependency graph bookkeeping 6.2 introduced.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct DdagArea<A: Arch> {
    pub ddag_node: A::Ptr,
    pub node_module_link: ListEntry<A>,
    pub load_context: A::Ptr,
    pub parent_dll_base: A::Ptr,
    pub switch_back_context: A::Ptr,
    pub base_address_index_node: RtlBalancedNode<A>,
    pub mapping_info_index_node: RtlBalancedNode<A>,
    pub original_base: Ulonglong,
    pub load_time: LargeInteger,
}

/// 0x50 0x98
#[derive(Clone, Copy)]
#[repr(C)]
pub union ModuleLinksSlot<A: Arch> {
    pub nt_6_0: LinksNt60<A>,
    pub nt_6_2: DdagArea<A>,
}

/// `LDR_DATA_TABLE_ENTRY`.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LdrDataTableEntry<A: Arch> {
    pub in_load_order_links: ListEntry<A>,
    pub in_memory_order_links: ListEntry<A>,
    pub in_initialization_order_links: InitializationOrderSlot<A>,
    pub dll_base: A::Ptr,
    pub entry_point: A::Ptr,
    pub size_of_image: u32,
    pub padding0: A::Pad4On64,
    pub full_dll_name: UnicodeString<A>,
    pub base_dll_name: UnicodeString<A>,
    pub flags: LdrFlagsSlot,
    pub load_count: LoadCountSlot,
    pub tls_index: u16,
    pub hash_links: ListEntry<A>,
    pub time_date_stamp: u32,
    pub padding1: A::Pad4On64,
    pub entry_point_activation_context: A::Ptr,
    pub lock: LockSlot<A>,
    pub links: ModuleLinksSlot<A>,
    // 6.2
    pub base_name_hash_value: u32,
    pub load_reason: u32,
    // 6.3
    pub implicit_path_options: u32,
    // 10.0
    pub reference_count: u32,
    pub dependent_load_flags: u32,
    pub signing_level: u8,
    pub padding2: [u8; 3],
    pub check_sum: u32,
    pub padding3: A::Pad4On64,
    pub active_patch_image_base: A::Ptr,
    pub hot_patch_state: u32,
    pub padding4: [u8; 4],
}

// SAFETY: plain integers, explicit padding, all zeroes is valid.
unsafe impl<A: Arch> Block for LdrDataTableEntry<A> {
    const NAME: &'static str = "LDR_DATA_TABLE_ENTRY";
    const KIND: BlockKind = BlockKind::LdrDataTableEntry;
    type Arch = A;
}

impl<A: Arch> LdrDataTableEntry<A> {
    pub fn dll_base(&self) -> u64 {
        self.dll_base.addr()
    }

    pub fn flags(&self) -> LdrFlags {
        // SAFETY: both alternatives are plain data.
        LdrFlags::from_bits_retain(unsafe { self.flags.flags })
    }

    pub fn set_flags(&mut self, flags: LdrFlags, value: bool) {
        let mut current = self.flags();
        current.set(flags, value);
        self.flags.flags = current.bits();
    }

    pub fn load_count(&self) -> u16 {
        self.load_count.get()
    }

    pub fn in_initialization_order_links(&self) -> ListEntry<A> {
        // SAFETY: both alternatives have the same type.
        unsafe { self.in_initialization_order_links.in_initialization_order_links }
    }

    /// The dependency graph node, 6.2 and higher.
    pub fn ddag_node(&self) -> A::Ptr {
        // SAFETY: every alternative of the slot is plain data.
        unsafe { self.links.nt_6_2.ddag_node }
    }

    /// `OriginalBase`, which widened to a `ULONGLONG` in 6.2.
    pub fn original_base(&self, version: WinVersion) -> u64 {
        // SAFETY: every alternative of the slot is plain data.
        unsafe {
            if version < Nt62 {
                self.links.nt_6_0.original_base.addr()
            } else {
                self.links.nt_6_2.original_base.0
            }
        }
    }

    pub fn load_reason(&self) -> Option<LoadReason> {
        LoadReason::try_from(self.load_reason).ok()
    }

    pub fn hot_patch_state(&self) -> Option<HotPatchState> {
        HotPatchState::try_from(self.hot_patch_state).ok()
    }
}

impl<A: Arch> Debug for LdrDataTableEntry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdrDataTableEntry")
            .field("in_load_order_links", &self.in_load_order_links)
            .field("in_memory_order_links", &self.in_memory_order_links)
            .field(
                "in_initialization_order_links",
                &self.in_initialization_order_links(),
            )
            .field("dll_base", &self.dll_base)
            .field("entry_point", &self.entry_point)
            .field("size_of_image", &self.size_of_image)
            .field("full_dll_name", &self.full_dll_name)
            .field("base_dll_name", &self.base_dll_name)
            .field("flags", &self.flags())
            .field("load_count", &self.load_count)
            .field("tls_index", &self.tls_index)
            .field("time_date_stamp", &self.time_date_stamp)
            .field("lock", &self.lock)
            .field("base_name_hash_value", &self.base_name_hash_value)
            .field("load_reason", &self.load_reason())
            .field("reference_count", &self.reference_count)
            .field("signing_level", &self.signing_level)
            .field("check_sum", &self.check_sum)
            .field("hot_patch_state", &self.hot_patch_state())
            .finish_non_exhaustive()
    }
}

const_assert_eq!(mem::size_of::<PebLdrData<X86>>(), 0x30);
const_assert_eq!(mem::size_of::<PebLdrData<X64>>(), 0x58);
const_assert_eq!(mem::size_of::<LinksNt60<X86>>(), 0x28);
const_assert_eq!(mem::size_of::<LinksNt60<X64>>(), 0x48);
const_assert_eq!(mem::size_of::<DdagArea<X86>>(), 0x40);
const_assert_eq!(mem::size_of::<DdagArea<X64>>(), 0x70);
const_assert_eq!(mem::size_of::<LdrDataTableEntry<X86>>(), 0xb8);
const_assert_eq!(mem::size_of::<LdrDataTableEntry<X64>>(), 0x138);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog() {
        LDR_FLAGS.check_disjoint().unwrap();
        let owner = |mask: LdrFlags, v| LDR_FLAGS.owner(mask.bits().into(), v).map(|f| f.name);
        assert_eq!(owner(LdrFlags::STATIC_LINK, Nt61), Some("LDRP_STATIC_LINK"));
        assert_eq!(owner(LdrFlags::MARKED_FOR_REMOVAL, Nt62), Some("MarkedForRemoval"));
        assert_eq!(owner(LdrFlags::LOAD_CONFIG_PROCESSED, Nt63), None);
        assert_eq!(owner(LdrFlags::IMAGE_NOT_AT_BASE, Nt50), None);
        assert_eq!(LDR_FLAGS.flags_in(Nt310).count(), 0);
    }

    #[test]
    fn flags() {
        let mut entry = LdrDataTableEntry::<X86>::zeroed();
        entry.set_flags(LdrFlags::IMAGE_DLL | LdrFlags::ENTRY_PROCESSED, true);
        // SAFETY: plain data.
        let group = unsafe { entry.flags.flag_group };
        assert_eq!(group, [0x04, 0x40, 0x00, 0x00]);
        entry.set_flags(LdrFlags::IMAGE_DLL, false);
        assert_eq!(entry.flags(), LdrFlags::ENTRY_PROCESSED);
    }

    #[test]
    fn original_base() {
        let mut entry = LdrDataTableEntry::<X86>::zeroed();
        // SAFETY: plain data.
        let ddag = unsafe { &mut entry.links.nt_6_2 };
        ddag.original_base = Ulonglong(0x1_4000_0000);
        assert_eq!(entry.original_base(Nt63), 0x1_4000_0000);
        // The 6.0 `OriginalBase` sits 0x1C bytes in, over the balanced node.
        assert_eq!(entry.original_base(Nt60), 0);
    }

    #[test]
    fn enums() {
        let mut entry = LdrDataTableEntry::<X64>::zeroed();
        assert_eq!(entry.load_reason(), Some(LoadReason::StaticDependency));
        entry.load_reason = u32::MAX;
        assert_eq!(entry.load_reason(), Some(LoadReason::Unknown));
        entry.load_reason = 42;
        assert_eq!(entry.load_reason(), None);
        entry.hot_patch_state = 3;
        assert_eq!(entry.hot_patch_state(), Some(HotPatchState::AppliedForward));
    }
}

// Axel '0vercl0k' Souchet - October 19 2026
//! The Process Environment Block.
//!
//! `Peb<A>` reproduces every historical member of the PEB at the offset it
//! had, from 3.10 to Windows 11. Slots that changed meaning over time are
//! unions whose alternatives are named after the first release using them;
//! the alternatives that only ever existed on 32-bit Windows are zero-sized
//! in `Peb<X64>`. Comments give the x86 and x64 offsets.
use std::fmt::{self, Debug};
use std::mem;

use bitflags::bitflags;
use static_assertions::const_assert_eq;

use crate::arch::{Arch, Pointer, Ptr32, X64, X86};
use crate::bits::Bits;
use crate::block::{Block, BlockKind};
use crate::flags::{BitGroup, FlagBit};
use crate::ntdef::{LargeInteger, ListEntry, ULargeInteger, Ulonglong, UnicodeString};
use crate::version::{VersionRange, WinVersion};
use WinVersion::*;

bitflags! {
    /// `PEB.BitField`. Several bits were renamed when 6.3 shifted most of
    /// them down by one; the older names are kept with a version suffix.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PebBitField: u8 {
        const IMAGE_USED_LARGE_PAGES = 1 << 0;
        const IS_PROTECTED_PROCESS = 1 << 1;
        const IS_LEGACY_PROCESS = 1 << 2;
        const IS_IMAGE_DYNAMICALLY_RELOCATED = 1 << 2;
        const IS_IMAGE_DYNAMICALLY_RELOCATED_6_0 = 1 << 3;
        const SKIP_PATCHING_USER32_FORWARDERS = 1 << 3;
        const SKIP_PATCHING_USER32_FORWARDERS_6_0 = 1 << 4;
        const IS_PACKAGED_PROCESS = 1 << 4;
        const IS_PACKAGED_PROCESS_6_2 = 1 << 5;
        const IS_APP_CONTAINER = 1 << 5;
        const IS_APP_CONTAINER_6_2 = 1 << 6;
        const IS_PROTECTED_PROCESS_LIGHT = 1 << 6;
        const IS_LONG_PATH_AWARE_PROCESS = 1 << 7;
    }
}

bitflags! {
    /// `PEB.CrossProcessFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CrossProcessFlags: u32 {
        const PROCESS_IN_JOB = 1 << 0;
        const PROCESS_INITIALIZING = 1 << 1;
        const PROCESS_USING_VEH = 1 << 2;
        const PROCESS_USING_VCH = 1 << 3;
        const PROCESS_USING_FTH = 1 << 4;
        const PROCESS_PREVIOUSLY_THROTTLED = 1 << 5;
        const PROCESS_CURRENTLY_THROTTLED = 1 << 6;
        const PROCESS_IMAGES_HOT_PATCHED = 1 << 7;
    }
}

bitflags! {
    /// `PEB.TracingFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TracingFlags: u32 {
        const HEAP_TRACING_ENABLED = 1 << 0;
        const CRIT_SEC_TRACING_ENABLED = 1 << 1;
        const LIB_LOADER_TRACING_ENABLED = 1 << 2;
    }
}

bitflags! {
    /// `PEB.LeapSecondFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LeapSecondFlags: u32 {
        const SIXTY_SECOND_ENABLED = 1 << 0;
    }
}

pub const PEB_BIT_FIELD: BitGroup = BitGroup {
    name: "PEB.BitField",
    width: 1,
    bits: &[
        FlagBit::new("ImageUsedLargePages", 0x01, VersionRange::since(Nt52Sp1)),
        FlagBit::new("IsProtectedProcess", 0x02, VersionRange::since(Nt60)),
        FlagBit::new("IsLegacyProcess", 0x04, VersionRange::between(Nt60, Nt62)),
        FlagBit::new("IsImageDynamicallyRelocated", 0x04, VersionRange::since(Nt63)),
        FlagBit::new(
            "IsImageDynamicallyRelocated",
            0x08,
            VersionRange::between(Nt60, Nt62),
        ),
        FlagBit::new("SkipPatchingUser32Forwarders", 0x08, VersionRange::since(Nt63)),
        FlagBit::new(
            "SkipPatchingUser32Forwarders",
            0x10,
            VersionRange::between(Nt60Sp1, Nt62),
        ),
        FlagBit::new("IsPackagedProcess", 0x10, VersionRange::since(Nt63)),
        FlagBit::new("IsPackagedProcess", 0x20, VersionRange::only(Nt62)),
        FlagBit::new("IsAppContainer", 0x20, VersionRange::since(Nt63)),
        FlagBit::new("IsAppContainer", 0x40, VersionRange::only(Nt62)),
        FlagBit::new("IsProtectedProcessLight", 0x40, VersionRange::since(Nt63)),
        FlagBit::new("IsLongPathAwareProcess", 0x80, VersionRange::since(Win10_1607)),
    ],
};

pub const CROSS_PROCESS_FLAGS: BitGroup = BitGroup {
    name: "PEB.CrossProcessFlags",
    width: 4,
    bits: &[
        FlagBit::new("ProcessInJob", 0x01, VersionRange::since(Nt60)),
        FlagBit::new("ProcessInitializing", 0x02, VersionRange::since(Nt60)),
        FlagBit::new("ProcessUsingVEH", 0x04, VersionRange::since(Nt61)),
        FlagBit::new("ProcessUsingVCH", 0x08, VersionRange::since(Nt61)),
        FlagBit::new("ProcessUsingFTH", 0x10, VersionRange::since(Nt61)),
        FlagBit::new("ProcessPreviouslyThrottled", 0x20, VersionRange::since(Win10_1703)),
        FlagBit::new("ProcessCurrentlyThrottled", 0x40, VersionRange::since(Win10_1703)),
        FlagBit::new("ProcessImagesHotPatched", 0x80, VersionRange::since(Win10_1809)),
    ],
};

/// The 32-bit only `ExecuteOptions`, a two-bit field sharing its dword with
/// `AtlThunkSListPtr32`.
pub const EXECUTE_OPTIONS: BitGroup = BitGroup {
    name: "PEB.ExecuteOptions",
    width: 4,
    bits: &[
        FlagBit::new("ExecuteOptions", 0x03, VersionRange::only(Nt51)),
        FlagBit::new("ExecuteOptions", 0x03, VersionRange::only(Nt52)),
    ],
};

pub const TRACING_FLAGS: BitGroup = BitGroup {
    name: "PEB.TracingFlags",
    width: 4,
    bits: &[
        FlagBit::new("HeapTracingEnabled", 0x01, VersionRange::since(Nt61)),
        FlagBit::new("CritSecTracingEnabled", 0x02, VersionRange::since(Nt61)),
        FlagBit::new("LibLoaderTracingEnabled", 0x04, VersionRange::since(Nt62)),
    ],
};

pub const LEAP_SECOND_FLAGS: BitGroup = BitGroup {
    name: "PEB.LeapSecondFlags",
    width: 4,
    bits: &[FlagBit::new(
        "SixtySecondEnabled",
        0x01,
        VersionRange::since(Win10_1809),
    )],
};

scalar_union! {
    /// 0x03 0x03: `SpareBool` until early 5.2, `BitField` afterwards.
    BitFieldSlot: u8 { bit_field, spare_bool }
}

/// 0x1C 0x38
#[derive(Clone, Copy)]
#[repr(C)]
pub union FastPebLockSlot<A: Arch> {
    /// 3.10 to 5.0.
    pub nt_3_10: A::Win32Only<Ptr32>,
    pub fast_peb_lock: A::Ptr,
}

/// 0x20 0x40
#[derive(Clone, Copy)]
#[repr(C)]
pub union AtlThunkSlot<A: Arch> {
    /// 3.10 to 5.1.
    pub fast_peb_lock_routine: A::Win32Only<Ptr32>,
    /// Early 5.2.
    pub spare_ptr1: A::Win32Only<Ptr32>,
    /// Late 5.2 and higher.
    pub atl_thunk_slist_ptr: A::Ptr,
}

/// 0x24 0x48
#[derive(Clone, Copy)]
#[repr(C)]
pub union IfeoKeySlot<A: Arch> {
    /// 3.10 to 5.1.
    pub fast_peb_unlock_routine: A::Win32Only<Ptr32>,
    /// 5.2.
    pub spare_ptr2: A::Ptr,
    /// 6.0 and higher.
    pub ifeo_key: A::Ptr,
}

scalar_union! {
    /// 0x28 0x50: `EnvironmentUpdateCount` until 5.2, then `CrossProcessFlags`.
    CrossProcessSlot: u32 { cross_process_flags, environment_update_count }
}

/// 0x2C 0x58
#[derive(Clone, Copy)]
#[repr(C)]
pub union KernelCallbackTableSlot<A: Arch> {
    /// 3.50 had four bytes nobody accounts for.
    pub nt_3_50: A::Win32Only<[u8; 4]>,
    pub kernel_callback_table: A::Ptr,
    /// 6.0 and higher.
    pub user_shared_info_ptr: A::Ptr,
}

/// 0x30 0x60
#[derive(Clone, Copy)]
#[repr(C)]
pub union SystemReserved0Slot<A: Arch> {
    /// 3.50 to 4.0.
    pub event_log_section: A::Win32Only<Ptr32>,
    pub system_reserved0: u32,
}

/// 0x34 0x64
#[derive(Clone, Copy)]
#[repr(C)]
pub union AtlThunkSListPtr32Slot<A: Arch> {
    /// 3.50 to 4.0.
    pub event_log: A::Win32Only<Ptr32>,
    /// 5.0.
    pub system_reserved1: A::Win32Only<u32>,
    /// Early 5.1 and early 5.2, bits 0 and 1.
    pub execute_options: A::Win32Only<u32>,
    /// Late 5.2 to 6.0.
    pub spare_ulong: u32,
    /// Late 5.1, 6.1 and higher.
    pub atl_thunk_slist_ptr32: u32,
}

/// What 3.50 did with the 0x10 bytes at 0x28.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct KernelCallbackArea<A: Arch> {
    pub cross_process: CrossProcessSlot,
    pub padding1: A::Pad4On64,
    pub kernel_callback_table: KernelCallbackTableSlot<A>,
    pub system_reserved0: SystemReserved0Slot<A>,
    pub atl_thunk_slist_ptr32: AtlThunkSListPtr32Slot<A>,
}

/// 0x28 0x50
#[derive(Clone, Copy)]
#[repr(C)]
pub union KernelCallbackSlot<A: Arch> {
    /// 3.10 only, 0x10 bytes unaccounted for.
    pub nt_3_10: A::Win32Only<[u8; 0x10]>,
    pub nt_3_50: KernelCallbackArea<A>,
}

/// 0x38 0x68
#[derive(Clone, Copy)]
#[repr(C)]
pub union ApiSetMapSlot<A: Arch> {
    /// 3.10 to early 6.0. Declared in the symbol files, never seen in use.
    pub free_list: A::Ptr,
    /// Late 6.0.
    pub spare_peb_ptr0: u32,
    /// 6.1 and higher.
    pub api_set_map: A::Ptr,
}

pointer_union! {
    /// 0x50 0x90
    SharedDataSlot {
        shared_data,
        read_only_shared_memory_heap,
        hotpatch_information,
        spare_pvoid0,
    }
}

/// How 3.10 laid out the case table pointer and the critical section
/// timeout.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct CaseTableNt310 {
    pub unicode_case_table_data: Ptr32,
    pub padding: [u8; 4],
    pub critical_section_timeout: LargeInteger,
}

/// 3.50 and higher.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct CaseTableArea<A: Arch> {
    pub unicode_case_table_data: A::Ptr,
    pub number_of_processors: u32,
    pub nt_global_flag: u32,
    pub padding: A::Pad4On32,
    pub critical_section_timeout: LargeInteger,
}

/// 0x60 0xB0
#[derive(Clone, Copy)]
#[repr(C)]
pub union UnicodeCaseTableSlot<A: Arch> {
    pub nt_3_10: A::Win32Only<CaseTableNt310>,
    pub nt_3_50: CaseTableArea<A>,
}

/// 0xA0 0x110
#[derive(Clone, Copy)]
#[repr(C)]
pub union LoaderLockSlot<A: Arch> {
    /// 3.10 to 4.0.
    pub nt_4_0: A::Win32Only<Ptr32>,
    pub loader_lock: A::Ptr,
}

pointer_union! {
    /// 0xC0 0x138
    AffinitySlot {
        active_process_affinity_mask,
        image_process_affinity_mask,
    }
}

/// What Windows 2000 had at 0x1D8.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct AppCompatNt50 {
    pub app_compat_info: Ptr32,
    pub csd_version: UnicodeString<X86>,
}

/// 5.1 and higher.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct AppCompatArea<A: Arch> {
    pub app_compat_flags: ULargeInteger,
    pub app_compat_flags_user: ULargeInteger,
    pub p_shim_data: A::Ptr,
    pub app_compat_info: A::Ptr,
    pub csd_version: UnicodeString<A>,
}

/// 0x1D8 0x2C8
#[derive(Clone, Copy)]
#[repr(C)]
pub union AppCompatSlot<A: Arch> {
    pub nt_5_0: A::Win32Only<AppCompatNt50>,
    pub nt_5_1: AppCompatArea<A>,
}

/// Fiber local storage bookkeeping, 5.2 to 1809.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct FlsArea<A: Arch> {
    pub fls_callback: A::Ptr,
    pub fls_list_head: ListEntry<A>,
    pub fls_bitmap: A::Ptr,
    pub fls_bitmap_bits: [u32; 4],
    pub fls_high_index: u32,
    pub padding: A::Pad4On64,
}

/// What remains of [`FlsArea`] once 1903 moved it out of the PEB.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SpareFlsArea<A: Arch> {
    pub spare_pointers: [A::Ptr; 4],
    pub spare_ulongs: [u32; 5],
    pub padding: A::Pad4On64,
}

/// 0x20C 0x320
#[derive(Clone, Copy)]
#[repr(C)]
pub union FlsSlot<A: Arch> {
    pub nt_5_2: FlsArea<A>,
    pub spare: SpareFlsArea<A>,
}

pointer_union! {
    /// 0x238 0x368: `pContextData` in 6.1, `pUnused` afterwards.
    ContextDataSlot { p_unused, p_context_data }
}

/// `PEB`.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Peb<A: Arch> {
    pub inherited_address_space: u8,
    pub read_image_file_exec_options: u8,
    pub being_debugged: u8,
    pub bit_field: BitFieldSlot,
    pub padding0: A::Pad4On64,
    pub mutant: A::Ptr,
    pub image_base_address: A::Ptr,
    pub ldr: A::Ptr,
    pub process_parameters: A::Ptr,
    pub sub_system_data: A::Ptr,
    pub process_heap: A::Ptr,
    pub fast_peb_lock: FastPebLockSlot<A>,
    pub atl_thunk_slist_ptr: AtlThunkSlot<A>,
    pub ifeo_key: IfeoKeySlot<A>,
    pub kernel_callbacks: KernelCallbackSlot<A>,
    pub api_set_map: ApiSetMapSlot<A>,
    pub tls_expansion_counter: u32,
    pub padding2: A::Pad4On64,
    pub tls_bitmap: A::Ptr,
    pub tls_bitmap_bits: [u32; 2],
    pub read_only_shared_memory_base: A::Ptr,
    pub shared_data: SharedDataSlot<A>,
    pub read_only_static_server_data: A::Ptr,
    pub ansi_code_page_data: A::Ptr,
    pub oem_code_page_data: A::Ptr,
    pub unicode_case_table: UnicodeCaseTableSlot<A>,
    pub heap_segment_reserve: A::Ptr,
    pub heap_segment_commit: A::Ptr,
    pub heap_de_commit_total_free_threshold: A::Ptr,
    pub heap_de_commit_free_block_threshold: A::Ptr,
    pub number_of_heaps: u32,
    pub maximum_number_of_heaps: u32,
    pub process_heaps: A::Ptr,
    // 4.0
    pub gdi_shared_handle_table: A::Ptr,
    pub process_starter_helper: A::Ptr,
    pub gdi_dc_attribute_list: u32,
    pub padding3: A::Pad4On64,
    pub loader_lock: LoaderLockSlot<A>,
    pub os_major_version: u32,
    pub os_minor_version: u32,
    pub os_build_number: u16,
    pub os_csd_version: u16,
    pub os_platform_id: u32,
    pub image_subsystem: u32,
    pub image_subsystem_major_version: u32,
    pub image_subsystem_minor_version: u32,
    pub padding4: A::Pad4On64,
    pub affinity: AffinitySlot<A>,
    pub gdi_handle_buffer: A::GdiHandleBuffer,
    // 5.0
    pub post_process_init_routine: A::Ptr,
    pub tls_expansion_bitmap: A::Ptr,
    pub tls_expansion_bitmap_bits: [u32; 0x20],
    pub session_id: u32,
    pub padding5: A::Pad4On64,
    pub app_compat: AppCompatSlot<A>,
    // 5.1
    pub activation_context_data: A::Ptr,
    pub process_assembly_storage_map: A::Ptr,
    pub system_default_activation_context_data: A::Ptr,
    pub system_assembly_storage_map: A::Ptr,
    pub minimum_stack_commit: A::Ptr,
    // 5.2
    pub fls: FlsSlot<A>,
    // 6.0
    pub wer_registration_data: A::Ptr,
    pub wer_ship_assert_ptr: A::Ptr,
    // 6.1
    pub context_data: ContextDataSlot<A>,
    pub p_image_header_hash: A::Ptr,
    pub tracing_flags: u32,
    pub padding6: [u8; 4],
    // 6.2
    pub csr_server_read_only_shared_memory_base: Ulonglong,
    // 1511
    pub tpp_workerp_list_lock: u32,
    pub padding7: A::Pad4On64,
    pub tpp_workerp_list: ListEntry<A>,
    pub wait_on_address_hash_table: [A::Ptr; 0x80],
    // 1709
    pub telemetry_coverage_header: A::Ptr,
    pub cloud_file_flags: u32,
    // 1803
    pub cloud_file_diag_flags: u32,
    pub placeholder_compatibility_mode: i8,
    pub placeholder_compatibility_mode_reserved: [i8; 7],
    // 1809
    pub leap_second_data: A::Ptr,
    pub leap_second_flags: u32,
    pub nt_global_flag2: u32,
    pub padding8: A::Pad4On32,
    // 23H2
    pub extended_feature_disable_mask: Ulonglong,
}

// SAFETY: plain integers, explicit padding, all zeroes is valid.
unsafe impl<A: Arch> Block for Peb<A> {
    const NAME: &'static str = "PEB";
    const KIND: BlockKind = BlockKind::Peb;
    type Arch = A;
}

impl<A: Arch> Peb<A> {
    pub fn being_debugged(&self) -> bool {
        self.being_debugged != 0
    }

    pub fn image_base(&self) -> u64 {
        self.image_base_address.addr()
    }

    pub fn bit_field(&self) -> PebBitField {
        PebBitField::from_bits_retain(self.bit_field.get())
    }

    pub fn set_bit_field(&mut self, flags: PebBitField, value: bool) {
        let mut bit_field = self.bit_field();
        bit_field.set(flags, value);
        self.bit_field.set(bit_field.bits());
    }

    pub fn cross_process_flags(&self) -> CrossProcessFlags {
        // SAFETY: every alternative of the 0x28 slot is plain data.
        let area = unsafe { &self.kernel_callbacks.nt_3_50 };
        CrossProcessFlags::from_bits_retain(area.cross_process.get())
    }

    pub fn set_cross_process_flags(&mut self, flags: CrossProcessFlags, value: bool) {
        let mut cross_process_flags = self.cross_process_flags();
        cross_process_flags.set(flags, value);
        // SAFETY: every alternative of the 0x28 slot is plain data.
        let area = unsafe { &mut self.kernel_callbacks.nt_3_50 };
        area.cross_process.set(cross_process_flags.bits());
    }

    pub fn tracing_flags(&self) -> TracingFlags {
        TracingFlags::from_bits_retain(self.tracing_flags)
    }

    pub fn set_tracing_flags(&mut self, flags: TracingFlags, value: bool) {
        let mut tracing_flags = self.tracing_flags();
        tracing_flags.set(flags, value);
        self.tracing_flags = tracing_flags.bits();
    }

    pub fn leap_second_flags(&self) -> LeapSecondFlags {
        LeapSecondFlags::from_bits_retain(self.leap_second_flags)
    }

    pub fn set_leap_second_flags(&mut self, flags: LeapSecondFlags, value: bool) {
        let mut leap_second_flags = self.leap_second_flags();
        leap_second_flags.set(flags, value);
        self.leap_second_flags = leap_second_flags.bits();
    }

    pub fn nt_global_flag(&self) -> u32 {
        // SAFETY: every alternative of the case table slot is plain data.
        unsafe { self.unicode_case_table.nt_3_50.nt_global_flag }
    }

    pub fn number_of_processors(&self) -> u32 {
        // SAFETY: every alternative of the case table slot is plain data.
        unsafe { self.unicode_case_table.nt_3_50.number_of_processors }
    }

    pub fn api_set_map(&self) -> A::Ptr {
        // SAFETY: every alternative of the slot is plain data.
        unsafe { self.api_set_map.api_set_map }
    }

    pub fn csd_version(&self) -> UnicodeString<A> {
        // SAFETY: every alternative of the slot is plain data.
        unsafe { self.app_compat.nt_5_1.csd_version }
    }

    /// The release described by the `OS*Version` members, if it's one we
    /// know about.
    pub fn os_version(&self) -> Option<WinVersion> {
        WinVersion::from_os_version(
            self.os_major_version,
            self.os_minor_version,
            self.os_build_number,
            self.os_csd_version,
        )
    }
}

impl Peb<X86> {
    /// The two-bit `ExecuteOptions` of early 5.1 and early 5.2.
    pub fn execute_options(&self) -> u32 {
        // SAFETY: every alternative of the 0x28 slot is plain data.
        let execute_options = unsafe { self.kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.execute_options };
        execute_options.bits(0..=1)
    }

    pub fn set_execute_options(&mut self, value: u32) {
        // SAFETY: every alternative of the 0x28 slot is plain data.
        let slot = unsafe { &mut self.kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32 };
        // SAFETY: same.
        let current = unsafe { slot.execute_options };
        slot.execute_options = current.with_bits(0..=1, value);
    }
}

impl<A: Arch> Debug for Peb<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peb")
            .field("inherited_address_space", &self.inherited_address_space)
            .field("read_image_file_exec_options", &self.read_image_file_exec_options)
            .field("being_debugged", &self.being_debugged)
            .field("bit_field", &self.bit_field())
            .field("mutant", &self.mutant)
            .field("image_base_address", &self.image_base_address)
            .field("ldr", &self.ldr)
            .field("process_parameters", &self.process_parameters)
            .field("sub_system_data", &self.sub_system_data)
            .field("process_heap", &self.process_heap)
            .field("cross_process_flags", &self.cross_process_flags())
            .field("api_set_map", &self.api_set_map())
            .field("tls_expansion_counter", &self.tls_expansion_counter)
            .field("tls_bitmap", &self.tls_bitmap)
            .field("shared_data", &self.shared_data)
            .field("number_of_processors", &self.number_of_processors())
            .field("nt_global_flag", &self.nt_global_flag())
            .field("number_of_heaps", &self.number_of_heaps)
            .field("process_heaps", &self.process_heaps)
            .field("os_major_version", &self.os_major_version)
            .field("os_minor_version", &self.os_minor_version)
            .field("os_build_number", &self.os_build_number)
            .field("os_csd_version", &self.os_csd_version)
            .field("os_platform_id", &self.os_platform_id)
            .field("image_subsystem", &self.image_subsystem)
            .field("affinity", &self.affinity)
            .field("session_id", &self.session_id)
            .field("csd_version", &self.csd_version())
            .field("tracing_flags", &self.tracing_flags())
            .field("leap_second_flags", &self.leap_second_flags())
            .field("nt_global_flag2", &self.nt_global_flag2)
            .field(
                "extended_feature_disable_mask",
                &self.extended_feature_disable_mask,
            )
            .finish_non_exhaustive()
    }
}

const_assert_eq!(mem::size_of::<KernelCallbackArea<X86>>(), 0x10);
const_assert_eq!(mem::size_of::<KernelCallbackArea<X64>>(), 0x18);
const_assert_eq!(mem::size_of::<CaseTableNt310>(), 0x10);
const_assert_eq!(mem::size_of::<CaseTableArea<X86>>(), 0x18);
const_assert_eq!(mem::size_of::<CaseTableArea<X64>>(), 0x18);
const_assert_eq!(mem::size_of::<AppCompatNt50>(), 0x0c);
const_assert_eq!(mem::size_of::<AppCompatArea<X86>>(), 0x20);
const_assert_eq!(mem::size_of::<AppCompatArea<X64>>(), 0x30);
const_assert_eq!(mem::size_of::<FlsArea<X86>>(), 0x24);
const_assert_eq!(mem::size_of::<FlsArea<X64>>(), 0x38);
const_assert_eq!(mem::size_of::<SpareFlsArea<X86>>(), 0x24);
const_assert_eq!(mem::size_of::<SpareFlsArea<X64>>(), 0x38);
const_assert_eq!(mem::size_of::<Peb<X86>>(), 0x488);
const_assert_eq!(mem::size_of::<Peb<X64>>(), 0x7d0);
const_assert_eq!(mem::align_of::<Peb<X86>>(), 8);
const_assert_eq!(mem::align_of::<Peb<X64>>(), 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs() {
        for group in [
            PEB_BIT_FIELD,
            CROSS_PROCESS_FLAGS,
            EXECUTE_OPTIONS,
            TRACING_FLAGS,
            LEAP_SECOND_FLAGS,
        ] {
            group.check_disjoint().unwrap();
        }

        let names = |v| {
            PEB_BIT_FIELD
                .flags_in(v)
                .map(|f| f.name)
                .collect::<Vec<_>>()
        };
        assert!(names(Nt52).is_empty());
        assert_eq!(names(Nt52Sp1), ["ImageUsedLargePages"]);
        assert!(names(Nt62).contains(&"IsLegacyProcess"));
        assert!(!names(Nt63).contains(&"IsLegacyProcess"));
        assert_eq!(names(WinVersion::LATEST).len(), 8);
    }

    #[test]
    fn catalog_matches_bitflags() {
        let owner = |mask: u8, v| PEB_BIT_FIELD.owner(mask.into(), v).map(|f| f.name);
        assert_eq!(
            owner(PebBitField::IS_LEGACY_PROCESS.bits(), Nt60),
            Some("IsLegacyProcess")
        );
        assert_eq!(
            owner(PebBitField::IS_IMAGE_DYNAMICALLY_RELOCATED.bits(), Nt63),
            Some("IsImageDynamicallyRelocated")
        );
        assert_eq!(
            owner(PebBitField::IS_APP_CONTAINER_6_2.bits(), Nt62),
            Some("IsAppContainer")
        );
        assert_eq!(
            owner(PebBitField::IS_PROTECTED_PROCESS_LIGHT.bits(), Nt63),
            Some("IsProtectedProcessLight")
        );
    }

    #[test]
    fn flags() {
        let mut peb = Peb::<X64>::zeroed();
        peb.set_bit_field(PebBitField::IS_PROTECTED_PROCESS, true);
        peb.set_cross_process_flags(CrossProcessFlags::PROCESS_USING_VEH, true);
        peb.set_tracing_flags(TracingFlags::LIB_LOADER_TRACING_ENABLED, true);
        assert_eq!(peb.bit_field(), PebBitField::IS_PROTECTED_PROCESS);
        assert_eq!(
            peb.cross_process_flags(),
            CrossProcessFlags::PROCESS_USING_VEH
        );
        assert_eq!(peb.tracing_flags().bits(), 4);
        peb.set_bit_field(PebBitField::IS_PROTECTED_PROCESS, false);
        assert!(peb.bit_field().is_empty());
    }

    #[test]
    fn execute_options() {
        let mut peb = Peb::<X86>::zeroed();
        peb.set_execute_options(2);
        assert_eq!(peb.execute_options(), 2);
        peb.set_execute_options(7);
        assert_eq!(peb.execute_options(), 3);
        // SAFETY: plain data.
        let spare = unsafe { peb.kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.spare_ulong };
        assert_eq!(spare, 3);
    }

    #[test]
    fn os_version() {
        let mut peb = Peb::<X86>::zeroed();
        peb.os_major_version = 6;
        peb.os_minor_version = 1;
        peb.os_build_number = 7601;
        peb.os_csd_version = 0x100;
        assert_eq!(peb.os_version(), Some(Nt61));
        peb.os_major_version = 2;
        assert_eq!(peb.os_version(), None);
    }
}

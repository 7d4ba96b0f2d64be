// Axel '0vercl0k' Souchet - October 19 2026
//! The Thread Environment Block.
//!
//! Like [`Peb`](crate::peb::Peb), `Teb<A>` keeps every member the block ever
//! had. The first 0x1000 bytes or so were reshuffled a lot before 5.0 (GDI
//! and OpenGL state mostly), which is why the middle of the block is a stack
//! of unions. Comments give the x86 and x64 offsets.
use std::fmt::{self, Debug};
use std::mem;

use bitflags::bitflags;
use static_assertions::const_assert_eq;

use crate::arch::{Arch, Pointer, Ptr32, Ptr64, X64, X86};
use crate::block::{Block, BlockKind};
use crate::flags::{BitGroup, FlagBit};
use crate::ntdef::{
    ActivationContextStack, ClientId, GdiTebBatch, GroupAffinity, Guid, LargeInteger, ListEntry,
    NtTib, ProcessorNumber, Ulonglong, UnicodeString, STATIC_UNICODE_BUFFER_LENGTH,
    TLS_MINIMUM_AVAILABLE, WIN32_CLIENT_INFO_LENGTH,
};
use crate::version::{VersionRange, WinVersion};
use WinVersion::*;

bitflags! {
    /// `TEB.SameTebFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SameTebFlags: u16 {
        const SAFE_THUNK_CALL = 1 << 0;
        const IN_DEBUG_PRINT = 1 << 1;
        const HAS_FIBER_DATA = 1 << 2;
        const SKIP_THREAD_ATTACH = 1 << 3;
        const WER_IN_SHIP_ASSERT_CODE = 1 << 4;
        const RAN_PROCESS_INIT = 1 << 5;
        const CLONED_THREAD = 1 << 6;
        const SUPPRESS_DEBUG_MSG = 1 << 7;
        const DISABLE_USER_STACK_WALK = 1 << 8;
        const RTL_EXCEPTION_ATTACHED = 1 << 9;
        const INITIAL_THREAD = 1 << 10;
        const SESSION_AWARE = 1 << 11;
        const LOAD_OWNER = 1 << 12;
        const LOADER_WORKER = 1 << 13;
        const SKIP_LOADER_INIT = 1 << 14;
        const SKIP_FILE_API_BROKERING = 1 << 15;
    }
}

bitflags! {
    /// `TEB.CrossTebFlags`. Nothing but spare bits so far.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CrossTebFlags: u16 {
        const SPARE_CROSS_TEB_BITS = 0xffff;
    }
}

pub const SAME_TEB_FLAGS: BitGroup = BitGroup {
    name: "TEB.SameTebFlags",
    width: 2,
    bits: &[
        FlagBit::new("SafeThunkCall", 0x0001, VersionRange::since(Nt60)),
        FlagBit::new("InDebugPrint", 0x0002, VersionRange::since(Nt60)),
        FlagBit::new("HasFiberData", 0x0004, VersionRange::since(Nt60)),
        FlagBit::new("SkipThreadAttach", 0x0008, VersionRange::since(Nt60)),
        FlagBit::new("WerInShipAssertCode", 0x0010, VersionRange::since(Nt60)),
        FlagBit::new("RanProcessInit", 0x0020, VersionRange::since(Nt60)),
        FlagBit::new("ClonedThread", 0x0040, VersionRange::since(Nt60)),
        FlagBit::new("SuppressDebugMsg", 0x0080, VersionRange::since(Nt60)),
        FlagBit::new("DisableUserStackWalk", 0x0100, VersionRange::since(Nt61)),
        FlagBit::new("RtlExceptionAttached", 0x0200, VersionRange::since(Nt61)),
        FlagBit::new("InitialThread", 0x0400, VersionRange::since(Nt61)),
        FlagBit::new("SessionAware", 0x0800, VersionRange::since(Nt62)),
        FlagBit::new("LoadOwner", 0x1000, VersionRange::since(Win10_1507)),
        FlagBit::new("LoaderWorker", 0x2000, VersionRange::since(Win10_1507)),
        FlagBit::new("SkipLoaderInit", 0x4000, VersionRange::since(Win10_1703)),
        FlagBit::new("SkipFileAPIBrokering", 0x8000, VersionRange::since(Win10_2004)),
    ],
};

pub const CROSS_TEB_FLAGS: BitGroup = BitGroup {
    name: "TEB.CrossTebFlags",
    width: 2,
    bits: &[FlagBit::new(
        "SpareCrossTebBits",
        0xffff,
        VersionRange::since(Nt60),
    )],
};

/// 0x28 0x50
#[derive(Clone, Copy)]
#[repr(C)]
pub union ActiveRpcHandleSlot<A: Arch> {
    /// 3.10 only.
    pub csr_qlpc_teb: A::Win32Only<Ptr32>,
    pub active_rpc_handle: A::Ptr,
}

/// 0x38 0x6C
#[derive(Clone, Copy)]
#[repr(C)]
pub union OwnedCriticalSectionsSlot<A: Arch> {
    /// 3.10 had a lone byte there.
    pub unknown_byte: A::Win32Only<u8>,
    pub count_of_owned_critical_sections: u32,
}

/// The Win32 client members of 3.50.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct TebNt350Win32Info {
    pub win32_process_info: Ptr32,
    pub win32_thread_info: Ptr32,
    pub csr_qlpc_stack: Ptr32,
    pub spare_bytes: [u8; 0x7c],
}

/// `User32Reserved` and `UserReserved`, split in 5.0.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct User32Reserved {
    pub user32_reserved: [u32; 26],
    pub user_reserved: [u32; 5],
}

/// 0x44 0x80
#[derive(Clone, Copy)]
#[repr(C)]
pub union User32Slot<A: Arch> {
    /// 4.0 had a single `User32Reserved[0x1F]` array.
    pub nt_4_0: A::Win32Only<[u32; 0x1f]>,
    pub nt_5_0: User32Reserved,
}

/// 4.0 and higher.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct CsrClientArea<A: Arch> {
    pub csr_client_thread: A::Ptr,
    pub win32_thread_info: A::Ptr,
    pub user32: User32Slot<A>,
    pub padding: A::Pad4On64,
    pub wow32_reserved: A::Ptr,
}

/// 0x3C 0x70
#[derive(Clone, Copy)]
#[repr(C)]
pub union CsrClientSlot<A: Arch> {
    /// 3.10, nothing known.
    pub nt_3_10: A::Win32Only<[u8; 0x88]>,
    pub nt_3_50: A::Win32Only<TebNt350Win32Info>,
    pub nt_4_0: CsrClientArea<A>,
}

/// `TEB.SystemReserved1` on x86.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SystemReserved1X86 {
    pub system_reserved1: [Ptr32; 26],
}

/// `TEB.SystemReserved1` on x64; 1709 carved the heap FLS data and the RNG
/// state out of it.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SystemReserved1X64 {
    pub system_reserved1: [Ptr64; 25],
    pub heap_fls_data: Ptr64,
    pub rng_state: [u64; 4],
}

/// 1709 and higher.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct DebuggerInstrumentationArea<A: Arch> {
    pub reserved_for_debugger_instrumentation: [A::Ptr; 0x10],
    pub system_reserved1: A::TebSystemReserved1,
    pub placeholder_compatibility_mode: i8,
    pub placeholder_hydration_always_explicit: u8,
    pub placeholder_reserved: [i8; 10],
    pub proxied_process_id: u32,
    pub activation_stack: ActivationContextStack<A>,
    pub working_on_behalf_of_ticket: [u8; 8],
}

/// 0xCC 0x110
#[derive(Clone, Copy)]
#[repr(C)]
pub union SystemReservedSlot<A: Arch> {
    /// `SystemReserved1[0x36]`, 3.10 to 1703.
    pub nt_3_10: [A::Ptr; 0x36],
    pub nt_10_0: DebuggerInstrumentationArea<A>,
}

/// 0x1A4 0x2C0
#[derive(Clone, Copy)]
#[repr(C)]
pub union ExceptionCodeSlot<A: Arch> {
    /// 3.10 to 4.0.
    pub spare1: A::Win32Only<Ptr32>,
    pub exception_code: i32,
}

/// The GDI state of 3.10, which ran all the way to `LastStatusValue`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct TebNt310Gdi {
    pub spare2: Ptr32,
    pub win32_thread_info: Ptr32,
    pub win32_process_info: Ptr32,
    pub unaccounted: [u8; 0x28],
    pub dbg_ss_reserved: [Ptr32; 2],
    pub system_reserved2: [Ptr32; 0x143],
    pub csr_qlpc_stack: Ptr32,
    pub gdi_client_pid: u32,
    pub gdi_client_tid: u32,
    pub gdi_thread_local_info: Ptr32,
    pub user32_reserved0: Ptr32,
    pub user32_reserved1: Ptr32,
    pub user_reserved: [Ptr32; 0x13b],
}

/// 3.50.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct TebNt350Gdi {
    pub spare2: Ptr32,
    pub csr_qlpc_teb: [Ptr32; 5],
    pub win32_client_info: [Ptr32; 5],
    pub system_reserved2: [Ptr32; 0x142],
    pub gdi_rgn: u32,
    pub gdi_pen: u32,
    pub gdi_brush: u32,
    pub real_client_id: ClientId<X86>,
    pub gdi_cached_process_handle: Ptr32,
    pub gdi_client_pid: u32,
    pub gdi_client_tid: u32,
    pub gdi_thread_local_info: Ptr32,
    pub user32_reserved0: Ptr32,
    pub user32_reserved1: Ptr32,
    pub user_reserved: [Ptr32; 3],
    pub gl_dispatch_table: [Ptr32; 0x133],
}

/// 4.0, the first with a `GDI_TEB_BATCH`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct TebNt40Gdi {
    pub exception_code: i32,
    pub spare_bytes1: [u8; 0x28],
    pub system_reserved2: [Ptr32; 0xa],
    pub gdi_teb_batch: GdiTebBatch<X86>,
    pub gdi_rgn: u32,
    pub gdi_pen: u32,
    pub gdi_brush: u32,
    pub real_client_id: ClientId<X86>,
    pub gdi_cached_process_handle: Ptr32,
    pub gdi_client_pid: u32,
    pub gdi_client_tid: u32,
    pub gdi_thread_local_info: Ptr32,
    pub user_reserved: [Ptr32; 5],
    pub gl_dispatch_table: [Ptr32; 0x118],
    pub gl_reserved1: [u32; 0x1a],
    pub gl_reserved2: Ptr32,
}

/// The end of the instrumentation callback members on x86.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct InstrumentationTail32 {
    pub instrumentation_callback_disabled: u8,
    pub spare_bytes: [u8; 0x17],
    pub tx_fs_context: u32,
}

/// The end of the instrumentation callback members on x64.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct InstrumentationTail64 {
    pub tx_fs_context: u32,
    pub instrumentation_callback_disabled: u8,
    pub unaligned_load_store_exceptions: u8,
    pub padding1: [u8; 2],
}

/// Late 5.2 and higher.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct InstrumentationCallbackArea<A: Arch> {
    pub activation_context_stack_pointer: A::Ptr,
    pub instrumentation_callback_sp: A::Ptr,
    pub instrumentation_callback_previous_pc: A::Ptr,
    pub instrumentation_callback_previous_sp: A::Ptr,
    pub tail: A::TebInstrumentationTail,
}

/// 0x1A8 0x2C8
#[derive(Clone, Copy)]
#[repr(C)]
pub union ActivationSlot<A: Arch> {
    /// `SpareBytes1[0x2C]`, 5.0 to early 5.2.
    pub nt_5_0: A::Win32Only<[u8; 44]>,
    pub nt_5_2_sp1: InstrumentationCallbackArea<A>,
}

/// The GDI and OpenGL members of 5.0 and higher.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct GdiBatchArea<A: Arch> {
    pub activation: ActivationSlot<A>,
    pub gdi_teb_batch: GdiTebBatch<A>,
    pub real_client_id: ClientId<A>,
    pub gdi_cached_process_handle: A::Ptr,
    pub gdi_client_pid: u32,
    pub gdi_client_tid: u32,
    pub gdi_thread_local_info: A::Ptr,
    pub win32_client_info: [A::Ptr; WIN32_CLIENT_INFO_LENGTH],
    pub gl_dispatch_table: [A::Ptr; 0xe9],
    pub gl_reserved1: [A::Ptr; 0x1d],
    pub gl_reserved2: A::Ptr,
}

/// 0x1A8 0x2C8 (3.50 and higher)
#[derive(Clone, Copy)]
#[repr(C)]
pub union GdiHistorySlot<A: Arch> {
    pub nt_3_50: A::Win32Only<TebNt350Gdi>,
    pub nt_4_0: A::Win32Only<TebNt40Gdi>,
    pub nt_5_0: GdiBatchArea<A>,
}

/// 3.50 and higher: the GDI members followed by the OpenGL ones.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct GdiArea<A: Arch> {
    pub gdi: GdiHistorySlot<A>,
    pub gl_section_info: A::Ptr,
    pub gl_section: A::Ptr,
    pub gl_table: A::Ptr,
    pub gl_current_rc: A::Ptr,
    pub gl_context: A::Ptr,
}

/// 0x1A8 0x2C8
#[derive(Clone, Copy)]
#[repr(C)]
pub union GdiSlot<A: Arch> {
    pub nt_3_10: A::Win32Only<TebNt310Gdi>,
    pub nt_3_50: GdiArea<A>,
}

scalar_union! {
    /// 0xF28 0x16B0
    HardErrorModeSlot: u32 { hard_error_mode, hard_errors_are_disabled }
}

/// Late 5.2.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Instrumentation52<A: Arch> {
    pub instrumentation: [A::Ptr; 0xe],
    pub sub_process_tag: A::Ptr,
    pub etw_trace_data: A::Ptr,
}

pointer_union! {
    /// 0xF64 0x1728
    PerflibSlot { perflib_data, etw_local_data }
}

/// 6.0 and higher.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Instrumentation60<A: Arch> {
    pub instrumentation: A::TebInstrumentation,
    pub activity_id: Guid,
    pub sub_process_tag: A::Ptr,
    pub perflib: PerflibSlot<A>,
    pub etw_trace_data: A::Ptr,
}

/// 0xF2C 0x16B8
#[derive(Clone, Copy)]
#[repr(C)]
pub union InstrumentationSlot<A: Arch> {
    /// `Instrumentation[0x10]`, 4.0 to early 5.2.
    pub nt_4_0: A::Win32Only<[Ptr32; 0x10]>,
    pub nt_5_2_sp1: Instrumentation52<A>,
    pub nt_6_0: Instrumentation60<A>,
}

/// The single bytes 5.0 to 5.2 kept at 0xF74.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct IdealProcessorBytes {
    pub in_dbg_print: u8,
    pub free_stack_on_termination: u8,
    pub has_fiber_data: u8,
    pub ideal_processor: u8,
}

/// 0xF74 0x1744
#[derive(Clone, Copy)]
#[repr(C)]
pub union IdealProcessorSlot {
    /// 3.10 to 4.0.
    pub spare2: u32,
    pub nt_5_0: IdealProcessorBytes,
    /// 6.1 and higher.
    pub current_ideal_processor: ProcessorNumber,
    pub ideal_processor_value: u32,
}

scalar_union! {
    /// 0xF78 0x1748: `Spare3` until late 5.2.
    GuaranteedStackBytesSlot: u32 { guaranteed_stack_bytes, spare3 }
}

/// 0xF7C 0x1750
#[derive(Clone, Copy)]
#[repr(C)]
pub union ReservedForPerfSlot<A: Arch> {
    /// 3.10 to 5.1.
    pub spare4: u32,
    pub reserved_for_perf: A::Ptr,
}

/// The x86 emulation members of 3.51 to 5.1.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Wx86Thread {
    pub call_bx86_eip: Ptr32,
    pub deallocation_cpu: Ptr32,
    pub use_known_wx86_dll: u8,
    pub ole_stub_invoked: i8,
    pub padding: [u8; 2],
}

pointer_union! {
    /// 0xF88 0x1768: `SparePointer1` until 5.2.
    SavedPriorityStateSlot { saved_priority_state, spare_pointer1 }
}

pointer_union! {
    /// 0xF8C 0x1770: `SoftPatchPtr1` until 6.0.
    CodeCoverageSlot { reserved_for_code_coverage, soft_patch_ptr1 }
}

pointer_union! {
    /// 0xF90 0x1778: `SoftPatchPtr2` in 5.2.
    ThreadPoolDataSlot { thread_pool_data, soft_patch_ptr2 }
}

/// Late 5.2 and higher.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ThreadPoolArea<A: Arch> {
    pub saved_priority_state: SavedPriorityStateSlot<A>,
    pub reserved_for_code_coverage: CodeCoverageSlot<A>,
    pub thread_pool_data: ThreadPoolDataSlot<A>,
}

/// 0xF88 0x1768
#[derive(Clone, Copy)]
#[repr(C)]
pub union ThreadPoolSlot<A: Arch> {
    pub wx86_thread: A::Win32Only<Wx86Thread>,
    pub nt_5_2_sp1: ThreadPoolArea<A>,
}

pointer_union! {
    /// 0x1788: `ChpeV2CpuAreaInfo` since 24H2.
    DeallocationBStoreSlot { deallocation_b_store, chpe_v2_cpu_area_info }
}

pointer_union! {
    /// 0x1790
    BStoreLimitSlot { b_store_limit, unused }
}

/// The IA-64 register backing store members, reused on x64.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct BackingStore<A: Arch> {
    pub deallocation_b_store: DeallocationBStoreSlot<A>,
    pub b_store_limit: BStoreLimitSlot<A>,
}

scalar_union! {
    /// 0xF98 0x1798: `ImpersonationLocale` until 5.2.
    MuiGenerationSlot: u32 { mui_generation, impersonation_locale }
}

/// The two halves of `HeapData` in 6.2 to 1803.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct HeapAffinity {
    pub heap_virtual_affinity: u16,
    pub low_frag_heap_data_slot: u16,
}

/// 0xFA8 0x17B0
#[derive(Clone, Copy)]
#[repr(C)]
pub union HeapDataSlot {
    /// 5.1 to 6.1.
    pub heap_virtual_affinity_5_1: u32,
    pub nt_6_2: HeapAffinity,
    /// 1809 and higher.
    pub heap_data: u32,
}

/// `SafeThunkCall` and its spare bytes.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SafeThunk {
    pub safe_thunk_call: u8,
    pub boolean_spare: [u8; 3],
}

/// 0xFB8 0x17D0
#[derive(Clone, Copy)]
#[repr(C)]
pub union PreferredLanguagesSlot<A: Arch> {
    /// Late 5.2.
    pub nt_5_2_sp1: SafeThunk,
    /// 6.0 and higher.
    pub preferred_languages: A::Ptr,
}

/// 5.2 and higher.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct FlsDataArea<A: Arch> {
    pub fls_data: A::Ptr,
    pub preferred: PreferredLanguagesSlot<A>,
}

/// 0xFB4 0x17C8
#[derive(Clone, Copy)]
#[repr(C)]
pub union FlsDataSlot<A: Arch> {
    /// Late 5.1.
    pub nt_5_1_sp2: A::Win32Only<SafeThunk>,
    pub nt_5_2: FlsDataArea<A>,
}

/// 0xFDC 0x180C
#[derive(Clone, Copy)]
#[repr(C)]
pub union WowTebOffsetSlot {
    /// 6.0.
    pub process_rundown: u32,
    /// 6.1 to 6.3.
    pub spare_ulong0: u32,
    /// 10.0 and higher.
    pub wow_teb_offset: i32,
}

/// What 6.0 had at the end of the block, dropped right after.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct VistaSwitchTimes<A: Arch> {
    pub last_switch_time: Ulonglong,
    pub total_switch_out_time: Ulonglong,
    pub wait_reason_bit_map: LargeInteger,
    pub padding_vista: A::Ptr,
    pub padding: A::Pad4On32,
}

/// 6.1 and higher.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ResourceTail<A: Arch> {
    pub resource_ret_value: A::Ptr,
    // 6.2
    pub reserved_for_wdf: A::Ptr,
    // 10.0
    pub reserved_for_crt: Ulonglong,
    pub effective_container_id: Guid,
}

/// 0xFE0 0x1810
#[derive(Clone, Copy)]
#[repr(C)]
pub union SwitchTimeSlot<A: Arch> {
    pub nt_6_0: VistaSwitchTimes<A>,
    pub nt_6_1: ResourceTail<A>,
}

/// `TEB`.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Teb<A: Arch> {
    pub nt_tib: NtTib<A>,
    pub environment_pointer: A::Ptr,
    pub client_id: ClientId<A>,
    pub active_rpc_handle: ActiveRpcHandleSlot<A>,
    pub thread_local_storage_pointer: A::Ptr,
    pub process_environment_block: A::Ptr,
    pub last_error_value: u32,
    pub count_of_owned_critical_sections: OwnedCriticalSectionsSlot<A>,
    pub csr_client: CsrClientSlot<A>,
    pub current_locale: u32,
    pub fp_software_status_register: u32,
    pub reserved: SystemReservedSlot<A>,
    pub exception_code: ExceptionCodeSlot<A>,
    pub padding0: A::Pad4On64,
    pub gdi: GdiSlot<A>,
    pub last_status_value: u32,
    pub padding2: A::Pad4On64,
    pub static_unicode_string: UnicodeString<A>,
    pub static_unicode_buffer: [u16; STATIC_UNICODE_BUFFER_LENGTH],
    pub padding3: A::StaticUnicodeBufferPad,
    pub deallocation_stack: A::Ptr,
    pub tls_slots: [A::Ptr; TLS_MINIMUM_AVAILABLE],
    pub tls_links: ListEntry<A>,
    pub vdm: A::Ptr,
    // Last member in 3.10.
    pub reserved_for_nt_rpc: A::Ptr,
    // Last member in 3.50.
    pub dbg_ss_reserved: [A::Ptr; 2],
    // 3.51
    pub hard_error_mode: HardErrorModeSlot,
    pub padding4: A::Pad4On64,
    pub instrumentation: InstrumentationSlot<A>,
    pub win_sock_data: A::Ptr,
    pub gdi_batch_count: u32,
    pub ideal_processor: IdealProcessorSlot,
    pub guaranteed_stack_bytes: GuaranteedStackBytesSlot,
    pub padding5: A::Pad4On64,
    pub reserved_for_perf: ReservedForPerfSlot<A>,
    pub reserved_for_ole: A::Ptr,
    // Last member in 4.0.
    pub waiting_on_loader_lock: u32,
    pub padding6: A::Pad4On64,
    pub thread_pool: ThreadPoolSlot<A>,
    // 5.0
    pub tls_expansion_slots: A::Ptr,
    pub backing_store: A::Win64Only<BackingStore<A>>,
    pub mui_generation: MuiGenerationSlot,
    pub is_impersonating: u32,
    // Last member in 5.0.
    pub nls_cache: A::Ptr,
    // 5.1
    pub p_shim_data: A::Ptr,
    pub heap_data: HeapDataSlot,
    pub padding7: A::Pad4On64,
    pub current_transaction_handle: A::Ptr,
    pub active_frame: A::Ptr,
    pub fls: FlsDataSlot<A>,
    // 6.0
    pub user_pref_languages: A::Ptr,
    pub merged_pref_languages: A::Ptr,
    pub mui_impersonation: u32,
    pub cross_teb_flags: u16,
    pub same_teb_flags: u16,
    pub txn_scope_enter_callback: A::Ptr,
    pub txn_scope_exit_callback: A::Ptr,
    pub txn_scope_context: A::Ptr,
    pub lock_count: u32,
    pub wow_teb_offset: WowTebOffsetSlot,
    pub switch_time: SwitchTimeSlot<A>,
    // Windows 11
    pub last_sleep_counter: Ulonglong,
    pub spin_call_count: u32,
    // Aligns ExtendedFeatureDisableMask (Windows 11).
    pub padding8: [u8; 4],
    pub extended_feature_disable_mask: Ulonglong,
    // 24H2
    pub scheduler_shared_data_slot: A::Ptr,
    pub heap_walk_context: A::Ptr,
    pub primary_group_affinity: GroupAffinity<A>,
    pub rcu: [u32; 2],
    pub padding9: A::Pad4On32,
}

// SAFETY: plain integers, explicit padding, all zeroes is valid.
unsafe impl<A: Arch> Block for Teb<A> {
    const NAME: &'static str = "TEB";
    const KIND: BlockKind = BlockKind::Teb;
    type Arch = A;
}

impl<A: Arch> Teb<A> {
    pub fn client_id(&self) -> ClientId<A> {
        self.client_id
    }

    /// Address of the owning process' PEB.
    pub fn peb(&self) -> u64 {
        self.process_environment_block.addr()
    }

    pub fn last_error(&self) -> u32 {
        self.last_error_value
    }

    pub fn exception_code(&self) -> i32 {
        // SAFETY: both alternatives are plain integers.
        unsafe { self.exception_code.exception_code }
    }

    pub fn same_teb_flags(&self) -> SameTebFlags {
        SameTebFlags::from_bits_retain(self.same_teb_flags)
    }

    pub fn set_same_teb_flags(&mut self, flags: SameTebFlags, value: bool) {
        let mut same_teb_flags = self.same_teb_flags();
        same_teb_flags.set(flags, value);
        self.same_teb_flags = same_teb_flags.bits();
    }

    pub fn cross_teb_flags(&self) -> CrossTebFlags {
        CrossTebFlags::from_bits_retain(self.cross_teb_flags)
    }

    pub fn set_cross_teb_flags(&mut self, flags: CrossTebFlags, value: bool) {
        let mut cross_teb_flags = self.cross_teb_flags();
        cross_teb_flags.set(flags, value);
        self.cross_teb_flags = cross_teb_flags.bits();
    }

    pub fn tls_slot(&self, index: usize) -> Option<A::Ptr> {
        self.tls_slots.get(index).copied()
    }

    pub fn gdi_teb_batch(&self) -> &GdiTebBatch<A> {
        // SAFETY: every alternative of the GDI slots is plain data.
        unsafe { &self.gdi.nt_3_50.gdi.nt_5_0.gdi_teb_batch }
    }

    pub fn activity_id(&self) -> Guid {
        // SAFETY: every alternative of the instrumentation slot is plain data.
        unsafe { self.instrumentation.nt_6_0.activity_id }
    }

    /// Offset from this TEB to the 32-bit TEB of a WOW64 thread.
    pub fn wow_teb_offset(&self) -> i32 {
        // SAFETY: every alternative is a plain integer.
        unsafe { self.wow_teb_offset.wow_teb_offset }
    }

    pub fn reserved_for_perf(&self) -> A::Ptr {
        // SAFETY: both alternatives are plain integers.
        unsafe { self.reserved_for_perf.reserved_for_perf }
    }

    pub fn current_ideal_processor(&self) -> ProcessorNumber {
        // SAFETY: every alternative is plain data.
        unsafe { self.ideal_processor.current_ideal_processor }
    }

    pub fn effective_container_id(&self) -> Guid {
        // SAFETY: every alternative of the slot is plain data.
        unsafe { self.switch_time.nt_6_1.effective_container_id }
    }
}

impl<A: Arch> Debug for Teb<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teb")
            .field("nt_tib", &self.nt_tib)
            .field("environment_pointer", &self.environment_pointer)
            .field("client_id", &self.client_id)
            .field(
                "thread_local_storage_pointer",
                &self.thread_local_storage_pointer,
            )
            .field("process_environment_block", &self.process_environment_block)
            .field("last_error_value", &self.last_error_value)
            .field("current_locale", &self.current_locale)
            .field("exception_code", &self.exception_code())
            .field("last_status_value", &self.last_status_value)
            .field("static_unicode_string", &self.static_unicode_string)
            .field("deallocation_stack", &self.deallocation_stack)
            .field("tls_links", &self.tls_links)
            .field("hard_error_mode", &self.hard_error_mode)
            .field("activity_id", &self.activity_id())
            .field("gdi_batch_count", &self.gdi_batch_count)
            .field("current_ideal_processor", &self.current_ideal_processor())
            .field("guaranteed_stack_bytes", &self.guaranteed_stack_bytes)
            .field("reserved_for_perf", &self.reserved_for_perf())
            .field("tls_expansion_slots", &self.tls_expansion_slots)
            .field("is_impersonating", &self.is_impersonating)
            .field("active_frame", &self.active_frame)
            .field("cross_teb_flags", &self.cross_teb_flags())
            .field("same_teb_flags", &self.same_teb_flags())
            .field("lock_count", &self.lock_count)
            .field("wow_teb_offset", &self.wow_teb_offset())
            .field("effective_container_id", &self.effective_container_id())
            .field("primary_group_affinity", &self.primary_group_affinity)
            .finish_non_exhaustive()
    }
}

const_assert_eq!(mem::size_of::<CsrClientArea<X86>>(), 0x88);
const_assert_eq!(mem::size_of::<CsrClientArea<X64>>(), 0x98);
const_assert_eq!(mem::size_of::<TebNt350Win32Info>(), 0x88);
const_assert_eq!(mem::size_of::<DebuggerInstrumentationArea<X86>>(), 0xd8);
const_assert_eq!(mem::size_of::<DebuggerInstrumentationArea<X64>>(), 0x1b0);
const_assert_eq!(mem::size_of::<SystemReserved1X86>(), 0x68);
const_assert_eq!(mem::size_of::<SystemReserved1X64>(), 0xf0);
const_assert_eq!(mem::size_of::<TebNt310Gdi>(), 0xa4c);
const_assert_eq!(mem::size_of::<TebNt350Gdi>(), 0xa38);
const_assert_eq!(mem::size_of::<TebNt40Gdi>(), 0xa38);
const_assert_eq!(mem::size_of::<InstrumentationTail32>(), 0x1c);
const_assert_eq!(mem::size_of::<InstrumentationTail64>(), 0x08);
const_assert_eq!(mem::size_of::<InstrumentationCallbackArea<X86>>(), 0x2c);
const_assert_eq!(mem::size_of::<InstrumentationCallbackArea<X64>>(), 0x28);
const_assert_eq!(mem::size_of::<GdiBatchArea<X86>>(), 0xa38);
const_assert_eq!(mem::size_of::<GdiBatchArea<X64>>(), 0xf60);
const_assert_eq!(mem::size_of::<GdiArea<X86>>(), 0xa4c);
const_assert_eq!(mem::size_of::<GdiArea<X64>>(), 0xf88);
const_assert_eq!(mem::size_of::<InstrumentationSlot<X86>>(), 0x40);
const_assert_eq!(mem::size_of::<InstrumentationSlot<X64>>(), 0x80);
const_assert_eq!(mem::size_of::<Wx86Thread>(), 0x0c);
const_assert_eq!(mem::size_of::<BackingStore<X64>>(), 0x10);
const_assert_eq!(mem::size_of::<VistaSwitchTimes<X86>>(), 0x20);
const_assert_eq!(mem::size_of::<VistaSwitchTimes<X64>>(), 0x20);
const_assert_eq!(mem::size_of::<ResourceTail<X86>>(), 0x20);
const_assert_eq!(mem::size_of::<ResourceTail<X64>>(), 0x28);
const_assert_eq!(mem::size_of::<Teb<X86>>(), 0x1038);
const_assert_eq!(mem::size_of::<Teb<X64>>(), 0x1878);
const_assert_eq!(mem::align_of::<Teb<X86>>(), 8);
const_assert_eq!(mem::align_of::<Teb<X64>>(), 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs() {
        SAME_TEB_FLAGS.check_disjoint().unwrap();
        CROSS_TEB_FLAGS.check_disjoint().unwrap();
        assert_eq!(SAME_TEB_FLAGS.flags_in(Nt52Sp1).count(), 0);
        assert_eq!(SAME_TEB_FLAGS.flags_in(Nt60).count(), 8);
        assert_eq!(SAME_TEB_FLAGS.flags_in(WinVersion::LATEST).count(), 16);
        assert_eq!(
            SAME_TEB_FLAGS
                .owner(SameTebFlags::LOADER_WORKER.bits().into(), Win10_1607)
                .map(|f| f.name),
            Some("LoaderWorker")
        );
    }

    #[test]
    fn flags() {
        let mut teb = Teb::<X64>::zeroed();
        teb.set_same_teb_flags(SameTebFlags::HAS_FIBER_DATA, true);
        teb.set_same_teb_flags(SameTebFlags::INITIAL_THREAD, true);
        assert_eq!(teb.same_teb_flags.to_le_bytes(), [0x04, 0x04]);
        assert_eq!(&teb.as_bytes()[0x17ee..0x17f0], &[0x04, 0x04]);
        teb.set_same_teb_flags(SameTebFlags::HAS_FIBER_DATA, false);
        assert_eq!(teb.same_teb_flags(), SameTebFlags::INITIAL_THREAD);
        teb.set_cross_teb_flags(CrossTebFlags::SPARE_CROSS_TEB_BITS, true);
        assert_eq!(teb.cross_teb_flags, 0xffff);
    }

    #[test]
    fn accessors() {
        let mut teb = Teb::<X86>::zeroed();
        teb.client_id.unique_process = Ptr32(0x1337);
        teb.client_id.unique_thread = Ptr32(0x42);
        teb.process_environment_block = Ptr32(0x7ffd_f000);
        teb.tls_slots[3] = Ptr32(0xdead);
        teb.wow_teb_offset.wow_teb_offset = -0x2000;
        assert_eq!(teb.client_id().pid(), 0x1337);
        assert_eq!(teb.client_id().tid(), 0x42);
        assert_eq!(teb.peb(), 0x7ffd_f000);
        assert_eq!(teb.tls_slot(3), Some(Ptr32(0xdead)));
        assert_eq!(teb.tls_slot(TLS_MINIMUM_AVAILABLE), None);
        assert_eq!(teb.wow_teb_offset(), -0x2000);
        assert_eq!(&teb.as_bytes()[0xfdc..0xfe0], &(-0x2000i32).to_le_bytes());
    }

    #[test]
    fn gdi_history() {
        let mut teb = Teb::<X86>::zeroed();
        // SAFETY: plain data.
        let nt_4_0 = unsafe { &mut teb.gdi.nt_3_50.gdi.nt_4_0 };
        nt_4_0.gdi_teb_batch.hdc = Ptr32(0x1234);
        nt_4_0.gdi_client_pid = 4;
        // 5.0 moved the batch up by 0x28 bytes.
        assert_eq!(teb.gdi_teb_batch().hdc, Ptr32(0));
        // SAFETY: plain data.
        let nt_3_10 = unsafe { teb.gdi.nt_3_10 };
        assert_eq!(nt_3_10.gdi_client_pid, 4);
    }

    #[test]
    fn ideal_processor() {
        let mut teb = Teb::<X64>::zeroed();
        teb.ideal_processor.current_ideal_processor = ProcessorNumber {
            group: 1,
            number: 3,
            reserved: 0,
        };
        // SAFETY: plain data.
        let legacy = unsafe { teb.ideal_processor.nt_5_0 };
        assert_eq!(legacy.has_fiber_data, 3);
        assert_eq!(teb.current_ideal_processor().group, 1);
    }
}

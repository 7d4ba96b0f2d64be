// Axel '0vercl0k' Souchet - October 19 2026
//! `RTL_USER_PROCESS_PARAMETERS`, pointed to by `PEB.ProcessParameters`.
use std::mem;

use bitflags::bitflags;
use static_assertions::const_assert_eq;

use crate::arch::{Arch, X64, X86};
use crate::block::{Block, BlockKind};
use crate::ntdef::{Curdir, RtlDriveLetterCurdir, UnicodeString, RTL_MAX_DRIVE_LETTERS};

/// `CURDIR.Handle` is closed when the parameters are destroyed.
pub const RTL_USER_PROC_CURDIR_CLOSE: u32 = 0x0000_0002;

/// `CURDIR.Handle` is inherited by the child.
pub const RTL_USER_PROC_CURDIR_INHERIT: u32 = 0x0000_0003;

/// `RTL_DRIVE_LETTER_CURDIR.Flags` for an entry in use.
pub const RTL_DRIVE_LETTER_VALID: u16 = 0x0001;

bitflags! {
    /// `RTL_USER_PROCESS_PARAMETERS.Flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProcessParametersFlags: u32 {
        /// The string buffers are pointers, not offsets from the block.
        const NORMALIZED = 0x0000_0001;
        const PROFILE_USER = 0x0000_0002;
        const PROFILE_KERNEL = 0x0000_0004;
        const PROFILE_SERVER = 0x0000_0008;
        const RESERVE_1MB = 0x0000_0020;
        const RESERVE_16MB = 0x0000_0040;
        const CASE_SENSITIVE = 0x0000_0080;
        const DISABLE_HEAP_DECOMMIT = 0x0000_0100;
        const DLL_REDIRECTION_LOCAL = 0x0000_1000;
        const APP_MANIFEST_PRESENT = 0x0000_2000;
        const IMAGE_KEY_MISSING = 0x0000_4000;
        const OPTIN_PROCESS = 0x0002_0000;
    }
}

/// `RTL_USER_PROCESS_PARAMETERS`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct RtlUserProcessParameters<A: Arch> {
    pub maximum_length: u32,
    pub length: u32,
    pub flags: u32,
    pub debug_flags: u32,
    pub console_handle: A::Ptr,
    pub console_flags: u32,
    pub padding0: A::Pad4On64,
    pub standard_input: A::Ptr,
    pub standard_output: A::Ptr,
    pub standard_error: A::Ptr,
    pub current_directory: Curdir<A>,
    pub dll_path: UnicodeString<A>,
    pub image_path_name: UnicodeString<A>,
    pub command_line: UnicodeString<A>,
    pub environment: A::Ptr,
    pub starting_x: u32,
    pub starting_y: u32,
    pub count_x: u32,
    pub count_y: u32,
    pub count_chars_x: u32,
    pub count_chars_y: u32,
    pub fill_attribute: u32,
    pub window_flags: u32,
    pub show_window_flags: u32,
    pub padding1: A::Pad4On64,
    pub window_title: UnicodeString<A>,
    pub desktop_info: UnicodeString<A>,
    pub shell_info: UnicodeString<A>,
    pub runtime_data: UnicodeString<A>,
    /// Declared since 3.10, never seen filled in.
    pub current_directores: [RtlDriveLetterCurdir<A>; RTL_MAX_DRIVE_LETTERS],
    // 6.0
    pub environment_size: A::Ptr,
    // 6.1
    pub environment_version: A::Ptr,
    // 6.2
    pub package_dependency_data: A::Ptr,
    pub process_group_id: u32,
    // 10.0
    pub loader_threads: u32,
    // 1809
    pub redirection_dll_name: UnicodeString<A>,
    pub heap_partition_name: UnicodeString<A>,
    // 1903
    pub default_threadpool_cpu_set_masks: A::Ptr,
    pub default_threadpool_cpu_set_mask_count: u32,
    // 2004
    pub default_threadpool_thread_maximum: u32,
    // Windows 11
    pub heap_memory_type_mask: u32,
    pub padding2: A::Pad4On64,
}

// SAFETY: plain integers, explicit padding, all zeroes is valid.
unsafe impl<A: Arch> Block for RtlUserProcessParameters<A> {
    const NAME: &'static str = "RTL_USER_PROCESS_PARAMETERS";
    const KIND: BlockKind = BlockKind::RtlUserProcessParameters;
    type Arch = A;
}

impl<A: Arch> RtlUserProcessParameters<A> {
    pub fn flags(&self) -> ProcessParametersFlags {
        ProcessParametersFlags::from_bits_retain(self.flags)
    }

    pub fn set_flags(&mut self, flags: ProcessParametersFlags, value: bool) {
        let mut current = self.flags();
        current.set(flags, value);
        self.flags = current.bits();
    }

    /// Are the `UNICODE_STRING` buffers absolute addresses? If not, they are
    /// offsets from the start of the block.
    pub fn is_normalized(&self) -> bool {
        self.flags().contains(ProcessParametersFlags::NORMALIZED)
    }

    /// The current directory entry of drive `letter` (`'A'` to `'Z'` and a
    /// few spares), if it's marked valid.
    pub fn drive_letter(&self, letter: char) -> Option<&RtlDriveLetterCurdir<A>> {
        let index = u32::from(letter.to_ascii_uppercase()).checked_sub(u32::from('A'))?;
        let entry = self.current_directores.get(usize::try_from(index).ok()?)?;

        (entry.flags & RTL_DRIVE_LETTER_VALID != 0).then_some(entry)
    }
}

const_assert_eq!(mem::size_of::<RtlUserProcessParameters<X86>>(), 0x2c4);
const_assert_eq!(mem::size_of::<RtlUserProcessParameters<X64>>(), 0x448);
const_assert_eq!(mem::align_of::<RtlUserProcessParameters<X86>>(), 4);
const_assert_eq!(mem::align_of::<RtlUserProcessParameters<X64>>(), 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let mut params = RtlUserProcessParameters::<X64>::zeroed();
        assert!(!params.is_normalized());
        params.set_flags(ProcessParametersFlags::NORMALIZED, true);
        params.set_flags(ProcessParametersFlags::PROFILE_USER, true);
        assert!(params.is_normalized());
        assert_eq!(params.flags, 0x3);
        assert_eq!(&params.as_bytes()[8..12], &[3, 0, 0, 0]);
    }

    #[test]
    fn drive_letters() {
        let mut params = RtlUserProcessParameters::<X86>::zeroed();
        params.current_directores[2].flags = RTL_DRIVE_LETTER_VALID;
        params.current_directores[2].length = 3;
        assert_eq!(params.drive_letter('c').map(|e| e.length), Some(3));
        assert!(params.drive_letter('D').is_none());
        assert!(params.drive_letter('!').is_none());
        assert!(params.drive_letter('~').is_none());
    }
}

// Axel '0vercl0k' Souchet - October 19 2026
#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]
#[macro_use]
mod slot;

mod arch;
mod bits;
mod block;
mod error;
mod flags;
pub mod ldr;
pub mod ntdef;
pub mod oracle;
pub mod params;
pub mod peb;
pub mod teb;
mod version;

pub use arch::{Arch, ArchKind, Native, Pointer, Ptr32, Ptr64, X64, X86};
pub use bits::Bits;
pub use block::{peek_block, read_block, Block, BlockKind, BlockShape, Reader};
pub use error::{LayoutError, Result};
pub use flags::{BitGroup, FlagBit};
pub use ldr::{LdrDataTableEntry, LdrFlags, PebLdrData};
pub use params::{ProcessParametersFlags, RtlUserProcessParameters};
pub use peb::{CrossProcessFlags, LeapSecondFlags, Peb, PebBitField, TracingFlags};
pub use teb::{CrossTebFlags, SameTebFlags, Teb};
pub use version::{LayoutTarget, VersionRange, WinVersion};

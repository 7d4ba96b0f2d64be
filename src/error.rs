// Axel '0vercl0k' Souchet - October 19 2026
//! This is the error type used across the codebase.
use std::io;

use thiserror::Error;

use crate::arch::ArchKind;
use crate::version::WinVersion;

pub type Result<R> = std::result::Result<R, LayoutError>;

/// Everything that can go wrong while checking or decoding a block.
///
/// The first four variants are layout disagreements found by the
/// [`oracle`](crate::oracle). They are meant to be read by a human, so they
/// carry enough context to find the offending member without a debugger.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{block}.{field} is at {actual:#x} on {arch} but should be at {expected:#x}")]
    OffsetMismatch {
        block: &'static str,
        field: &'static str,
        arch: ArchKind,
        expected: usize,
        actual: usize,
    },
    #[error("{block} as of {version} is {actual:#x} bytes on {arch} but should be {expected:#x}")]
    SizeMismatch {
        block: &'static str,
        version: WinVersion,
        arch: ArchKind,
        expected: usize,
        actual: usize,
    },
    #[error(
        "{block}.{flag} on {arch}: setting it yields {actual:#x} at {offset:#x} instead of {mask:#x}"
    )]
    MaskMismatch {
        block: &'static str,
        flag: &'static str,
        arch: ArchKind,
        offset: usize,
        mask: u64,
        actual: u64,
    },
    #[error("{group}: {first} and {second} both claim {mask:#x} in {version}")]
    FlagCollision {
        group: &'static str,
        first: &'static str,
        second: &'static str,
        mask: u64,
        version: WinVersion,
    },
    #[error("{block} needs {expected:#x} bytes but only {actual:#x} are available")]
    TooSmall {
        block: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unknown architecture {0:?}")]
    UnknownArch(String),
    #[error("unknown Windows version {0:?}")]
    UnknownVersion(String),
    #[error("unknown block {0:?}")]
    UnknownBlock(String),
    #[error("io")]
    Io(#[from] io::Error),
}

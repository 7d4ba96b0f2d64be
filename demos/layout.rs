// Axel '0vercl0k' Souchet - October 19 2026
use std::cmp::min;
use std::fmt::Debug;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use pebteb_layout::{
    oracle, read_block, ArchKind, Block, BlockKind, LayoutTarget, LdrDataTableEntry, Peb,
    PebLdrData, RtlUserProcessParameters, Teb, WinVersion, X64, X86,
};
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ArchArg {
    X86,
    X64,
    #[default]
    /// Both address models.
    All,
}

impl ArchArg {
    fn arches(self) -> Vec<ArchKind> {
        match self {
            Self::X86 => vec![ArchKind::X86],
            Self::X64 => vec![ArchKind::X64],
            Self::All => ArchKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BlockArg {
    Peb,
    Teb,
    /// `LDR_DATA_TABLE_ENTRY`.
    Ldr,
    /// `PEB_LDR_DATA`.
    LdrData,
    /// `RTL_USER_PROCESS_PARAMETERS`.
    Params,
    #[default]
    All,
}

impl BlockArg {
    fn kinds(self) -> Vec<BlockKind> {
        match self {
            Self::Peb => vec![BlockKind::Peb],
            Self::Teb => vec![BlockKind::Teb],
            Self::Ldr => vec![BlockKind::LdrDataTableEntry],
            Self::LdrData => vec![BlockKind::PebLdrData],
            Self::Params => vec![BlockKind::RtlUserProcessParameters],
            Self::All => BlockKind::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// The address model(s) to look at.
    #[arg(short, long, value_enum, default_value_t = ArchArg::All)]
    arch: ArchArg,
    /// The block(s) to look at.
    #[arg(short, long, value_enum, default_value_t = BlockArg::All)]
    block: BlockArg,
    /// Report the documented size of the block(s) as of this release (`6.1`,
    /// `5.2sp1`, `1809`, `24h2`...).
    #[arg(short, long)]
    version: Option<WinVersion>,
    /// Look up the documented offset of a member, e.g.
    /// `kernel_callbacks.nt_3_50.cross_process`.
    #[arg(short, long)]
    field: Option<String>,
    /// Emit the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Decode a block out of this file instead of reporting on the layouts.
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Where the block starts in the file (hexadecimal).
    #[arg(long, default_value = "0")]
    offset: String,
    /// Also hexdump the raw bytes of the decoded block.
    #[arg(long, default_value_t = false)]
    hexdump: bool,
}

#[derive(Debug, Serialize)]
struct BlockReport {
    block: &'static str,
    arch: &'static str,
    size: usize,
    align: usize,
    version: Option<String>,
    expected_size: Option<usize>,
    field: Option<String>,
    field_offset: Option<usize>,
    offsets: usize,
    masks: usize,
    sizes: usize,
    verified: bool,
    error: Option<String>,
}

/// Print a hexdump of `data`, laid out at `address`.
fn hexdump(address: u64, data: &[u8]) {
    for (idx, row) in data.chunks(16).enumerate() {
        print!("{:016x}: ", address + (idx as u64 * 16));
        for i in 0..16 {
            match row.get(i) {
                Some(c) => print!("{c:02x}"),
                None => print!("  "),
            }

            if i == 7 && row.len() >= 9 {
                print!("-");
            } else if i != 15 {
                print!(" ");
            }
        }

        print!("  ");
        for c in &row[..min(row.len(), 16)] {
            let c = char::from(*c);
            print!("{}", if c.is_ascii_graphic() { c } else { '.' });
        }
        println!()
    }
}

/// Convert an hexadecimal string to a `u64`.
fn to_hex(s: &str) -> Result<u64> {
    let s = s.replace('`', "");

    u64::from_str_radix(s.trim_start_matches("0x"), 16).context("failed to convert string to u64")
}

fn report(kind: BlockKind, arch: ArchKind, args: &Args) -> BlockReport {
    let shape = kind.shape(arch);
    let verdict = oracle::verify_block(kind, arch);
    let expected_size = args
        .version
        .and_then(|version| oracle::expected_size(kind, LayoutTarget::new(arch, version)));
    let field_offset = args
        .field
        .as_deref()
        .and_then(|field| oracle::expected_offset(kind, field, arch));

    BlockReport {
        block: kind.name(),
        arch: arch.name(),
        size: shape.size,
        align: shape.align,
        version: args.version.map(|v| v.to_string()),
        expected_size,
        field: args.field.clone(),
        field_offset,
        offsets: oracle::offsets(kind).len(),
        masks: oracle::masks(kind).len(),
        sizes: oracle::sizes(kind).len(),
        verified: verdict.is_ok(),
        error: verdict.err().map(|e| e.to_string()),
    }
}

fn print_report(report: &BlockReport) {
    print!(
        "{} ({}): size {:#x}, align {}",
        report.block, report.arch, report.size, report.align
    );
    if let Some(version) = &report.version {
        match report.expected_size {
            Some(size) => print!(", {size:#x} bytes as of {version}"),
            None => print!(", nothing documented as of {version}"),
        }
    }
    println!();

    if let Some(field) = &report.field {
        match report.field_offset {
            Some(offset) => println!("  {field} is at {offset:#x}"),
            None => println!("  {field} isn't in the table"),
        }
    }

    match &report.error {
        None => println!(
            "  {} offsets, {} masks and {} sizes check out",
            report.offsets, report.masks, report.sizes
        ),
        Some(error) => println!("  MISMATCH: {error}"),
    }
}

fn decode<T: Block + Debug>(file: &mut File, hexdump_it: bool, offset: u64) -> Result<()> {
    let block = read_block::<T>(file).with_context(|| format!("failed to read a {}", T::NAME))?;
    println!("{block:#x?}");
    if hexdump_it {
        hexdump(offset, block.as_bytes());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.dump {
        let (kinds, arches) = (args.block.kinds(), args.arch.arches());
        let ([kind], [arch]) = (kinds.as_slice(), arches.as_slice()) else {
            bail!("--dump needs a single --block and a single --arch");
        };

        let offset = to_hex(&args.offset)?;
        let mut file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        file.seek(SeekFrom::Start(offset))?;
        info!("decoding a {kind} ({arch}) at {offset:#x}");

        return match (kind, arch) {
            (BlockKind::Peb, ArchKind::X86) => decode::<Peb<X86>>(&mut file, args.hexdump, offset),
            (BlockKind::Peb, ArchKind::X64) => decode::<Peb<X64>>(&mut file, args.hexdump, offset),
            (BlockKind::Teb, ArchKind::X86) => decode::<Teb<X86>>(&mut file, args.hexdump, offset),
            (BlockKind::Teb, ArchKind::X64) => decode::<Teb<X64>>(&mut file, args.hexdump, offset),
            (BlockKind::PebLdrData, ArchKind::X86) => {
                decode::<PebLdrData<X86>>(&mut file, args.hexdump, offset)
            }
            (BlockKind::PebLdrData, ArchKind::X64) => {
                decode::<PebLdrData<X64>>(&mut file, args.hexdump, offset)
            }
            (BlockKind::LdrDataTableEntry, ArchKind::X86) => {
                decode::<LdrDataTableEntry<X86>>(&mut file, args.hexdump, offset)
            }
            (BlockKind::LdrDataTableEntry, ArchKind::X64) => {
                decode::<LdrDataTableEntry<X64>>(&mut file, args.hexdump, offset)
            }
            (BlockKind::RtlUserProcessParameters, ArchKind::X86) => {
                decode::<RtlUserProcessParameters<X86>>(&mut file, args.hexdump, offset)
            }
            (BlockKind::RtlUserProcessParameters, ArchKind::X64) => {
                decode::<RtlUserProcessParameters<X64>>(&mut file, args.hexdump, offset)
            }
        };
    }

    let reports = args
        .block
        .kinds()
        .into_iter()
        .flat_map(|kind| args.arch.arches().into_iter().map(move |arch| (kind, arch)))
        .map(|(kind, arch)| report(kind, arch, &args))
        .collect::<Vec<_>>();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        reports.iter().for_each(print_report);
    }

    if reports.iter().any(|r| !r.verified) {
        bail!("some layouts don't match their table");
    }

    Ok(())
}

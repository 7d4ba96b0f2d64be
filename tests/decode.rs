// Axel '0vercl0k' Souchet - October 19 2026
use std::io::{Cursor, Seek, SeekFrom};

use pebteb_layout::ldr::LoadReason;
use pebteb_layout::ntdef::UnicodeString;
use pebteb_layout::{
    field_offset, peek_block, read_block, Block, LayoutError, LdrDataTableEntry, LdrFlags,
    Native, Peb, PebLdrData, Pointer, ProcessParametersFlags, Ptr32, Ptr64,
    RtlUserProcessParameters, Teb, WinVersion, X64, X86,
};

/// Lay `value` at `offset` in `image`, little endian.
fn poke(image: &mut [u8], offset: usize, value: &[u8]) {
    image[offset..offset + value.len()].copy_from_slice(value);
}

#[test]
fn peb_from_raw_bytes() -> anyhow::Result<()> {
    // What a 64-bit Windows 10 22H2 PEB starts with.
    let mut image = vec![0u8; 0x7d0];
    poke(&mut image, 0x02, &[1]);
    poke(&mut image, 0x10, &0x7ff6_1234_0000u64.to_le_bytes());
    poke(&mut image, 0x18, &0x7ffc_aaaa_53c0u64.to_le_bytes());
    poke(&mut image, 0xbc, &0x70u32.to_le_bytes());
    poke(&mut image, 0x118, &10u32.to_le_bytes());
    poke(&mut image, 0x11c, &0u32.to_le_bytes());
    poke(&mut image, 0x120, &19045u16.to_le_bytes());

    let peb = read_block::<Peb<X64>>(&mut Cursor::new(image))?;
    assert!(peb.being_debugged());
    assert_eq!(peb.image_base(), 0x7ff6_1234_0000);
    assert_eq!(peb.ldr, Ptr64(0x7ffc_aaaa_53c0));
    assert_eq!(peb.nt_global_flag(), 0x70);
    assert_eq!(peb.os_version(), Some(WinVersion::Win10_2004));

    Ok(())
}

#[test]
fn teb_from_raw_bytes() -> anyhow::Result<()> {
    let mut image = vec![0u8; 0x1038];
    poke(&mut image, 0x18, &0x7ffd_e000u32.to_le_bytes());
    poke(&mut image, 0x20, &0x1234u32.to_le_bytes());
    poke(&mut image, 0x24, &0x5678u32.to_le_bytes());
    poke(&mut image, 0x30, &0x7ffd_f000u32.to_le_bytes());
    poke(&mut image, 0x34, &5u32.to_le_bytes());
    poke(&mut image, 0xfca, &0x0400u16.to_le_bytes());

    let teb = Teb::<X86>::from_bytes(&image)?;
    assert_eq!(teb.nt_tib.self_ptr, Ptr32(0x7ffd_e000));
    assert_eq!(teb.client_id().pid(), 0x1234);
    assert_eq!(teb.client_id().tid(), 0x5678);
    assert_eq!(teb.peb(), 0x7ffd_f000);
    assert_eq!(teb.last_error(), 5);
    assert_eq!(
        teb.same_teb_flags(),
        pebteb_layout::SameTebFlags::INITIAL_THREAD
    );

    Ok(())
}

#[test]
fn module_list_entry() -> anyhow::Result<()> {
    let mut entry = LdrDataTableEntry::<X64>::zeroed();
    entry.dll_base = Ptr64::from_addr(0x7ffc_aa00_0000);
    entry.size_of_image = 0x1f_8000;
    entry.base_dll_name = UnicodeString::<X64> {
        length: 0x12,
        maximum_length: 0x14,
        padding: Default::default(),
        buffer: Ptr64(0x7ffc_aaaa_1000),
    };
    entry.set_flags(LdrFlags::IMAGE_DLL | LdrFlags::ENTRY_PROCESSED, true);
    entry.tls_index = 0xffff;
    entry.load_reason = 4;

    // Two entries back to back, the second one is read after the first.
    let mut image = entry.as_bytes().to_vec();
    image.extend_from_slice(LdrDataTableEntry::<X64>::zeroed().as_bytes());
    let mut cursor = Cursor::new(image);

    let first = peek_block::<LdrDataTableEntry<X64>>(&mut cursor)?;
    assert_eq!(cursor.position(), 0);
    assert_eq!(first.dll_base(), 0x7ffc_aa00_0000);
    assert_eq!(first.base_dll_name.len_wide(), 9);
    assert!(first.base_dll_name.is_well_formed());
    assert!(first.flags().contains(LdrFlags::ENTRY_PROCESSED));
    assert_eq!(first.load_reason(), Some(LoadReason::DynamicLoad));

    read_block::<LdrDataTableEntry<X64>>(&mut cursor)?;
    let second = read_block::<LdrDataTableEntry<X64>>(&mut cursor)?;
    assert!(second.base_dll_name.is_empty());
    assert_eq!(cursor.position(), 0x138 * 2);

    Ok(())
}

#[test]
fn process_parameters_at_an_offset() -> anyhow::Result<()> {
    let mut params = RtlUserProcessParameters::<X86>::zeroed();
    params.maximum_length = 0x2c4;
    params.length = 0x2c4;
    params.set_flags(ProcessParametersFlags::NORMALIZED, true);
    params.command_line.length = 0x20;
    params.command_line.maximum_length = 0x22;

    let mut image = vec![0xccu8; 0x100];
    image.extend_from_slice(params.as_bytes());
    let mut cursor = Cursor::new(image);
    cursor.seek(SeekFrom::Start(0x100))?;

    let params = read_block::<RtlUserProcessParameters<X86>>(&mut cursor)?;
    assert!(params.is_normalized());
    assert_eq!(params.length, 0x2c4);
    assert_eq!(params.command_line.len_wide(), 0x10);

    Ok(())
}

#[test]
fn short_images() {
    let image = vec![0u8; 0x20];
    match PebLdrData::<X86>::from_bytes(&image) {
        Err(LayoutError::TooSmall {
            block,
            expected,
            actual,
        }) => assert_eq!((block, expected, actual), ("PEB_LDR_DATA", 0x30, 0x20)),
        r => panic!("unexpected {r:?}"),
    }

    let mut cursor = Cursor::new(vec![0u8; 0x1000]);
    match read_block::<Teb<X64>>(&mut cursor) {
        Err(LayoutError::TooSmall {
            block,
            expected,
            actual,
        }) => assert_eq!((block, expected, actual), ("TEB", 0x1878, 0x1000)),
        r => panic!("unexpected {r:?}"),
    }
}

#[test]
fn native_layout() {
    // The live layout is the one matching the pointer width of the host.
    let peb = Peb::<Native>::zeroed();
    assert!(!peb.being_debugged());
    assert_eq!(
        field_offset!(Peb<Native>, ldr),
        3 * std::mem::size_of::<usize>()
    );
}

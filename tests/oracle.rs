// Axel '0vercl0k' Souchet - October 19 2026
use pebteb_layout::oracle::{self, SizeAlign};
use pebteb_layout::params::RtlUserProcessParameters;
use pebteb_layout::{
    field_end, field_offset, ArchKind, Block, BlockKind, LayoutError, LayoutTarget,
    LdrDataTableEntry, Peb, PebBitField, PebLdrData, SameTebFlags, Teb, WinVersion, X64, X86,
};

#[test]
fn every_table_checks_out() -> anyhow::Result<()> {
    for kind in BlockKind::ALL {
        for arch in ArchKind::ALL {
            oracle::verify_block(kind, arch)?;
        }
    }

    oracle::verify_all()?;
    Ok(())
}

#[test]
fn tables_are_well_formed() {
    for kind in BlockKind::ALL {
        let offsets = oracle::offsets(kind);
        assert!(!offsets.is_empty(), "{kind} has no offsets");
        for row in offsets {
            assert!(
                row.x86.is_some() || row.x64.is_some(),
                "{kind}.{} exists nowhere",
                row.field
            );
        }

        let sizes = oracle::sizes(kind);
        let total = sizes.last().expect("the total is always there");
        assert!(total.tail.is_none());
        assert_eq!(total.align, SizeAlign::Block);
        // A release can have several tails, they have to agree.
        for w in sizes.windows(2) {
            assert!(w[0].version <= w[1].version, "{kind} sizes are out of order");
            if w[0].version == w[1].version {
                assert_eq!((w[0].x86, w[0].x64), (w[1].x86, w[1].x64));
            }
        }
        assert_eq!(total.x86, Some(kind.shape(ArchKind::X86).size));
        assert_eq!(total.x64, Some(kind.shape(ArchKind::X64).size));

        for mask in oracle::masks(kind) {
            assert!(mask.mask != 0);
            assert!(mask.width <= 8);
            assert!(mask.x86.is_some() || mask.x64.is_some());
        }
    }
}

#[test]
fn image_used_large_pages() {
    for arch in ArchKind::ALL {
        let bytes = match arch {
            ArchKind::X86 => {
                let mut peb = Peb::<X86>::zeroed();
                peb.set_bit_field(PebBitField::IMAGE_USED_LARGE_PAGES, true);
                peb.as_bytes().to_vec()
            }
            ArchKind::X64 => {
                let mut peb = Peb::<X64>::zeroed();
                peb.set_bit_field(PebBitField::IMAGE_USED_LARGE_PAGES, true);
                peb.as_bytes().to_vec()
            }
        };

        assert_eq!(bytes[0x03] & 0x03, 0x01);
        assert_eq!(bytes.iter().filter(|&&b| b != 0).count(), 1);
    }
}

#[test]
fn tls_index_ignores_the_union_alternative() {
    assert_eq!(field_offset!(LdrDataTableEntry<X86>, tls_index), 0x3a);
    assert_eq!(field_offset!(LdrDataTableEntry<X64>, tls_index), 0x6e);

    // Both alternatives of the surrounding slots sit at the same place.
    assert_eq!(
        field_offset!(LdrDataTableEntry<X86>, load_count.load_count),
        field_offset!(LdrDataTableEntry<X86>, load_count.obsolete_load_count)
    );
    assert_eq!(
        field_offset!(LdrDataTableEntry<X64>, links.nt_6_0.forwarder_links),
        field_offset!(LdrDataTableEntry<X64>, links.nt_6_2.ddag_node)
    );
    for arch in ArchKind::ALL {
        assert_eq!(
            oracle::expected_offset(BlockKind::LdrDataTableEntry, "tls_index", arch),
            Some(match arch {
                ArchKind::X86 => 0x3a,
                ArchKind::X64 => 0x6e,
            })
        );
    }
}

#[test]
fn teb_total_size() {
    assert_eq!(oracle::rounded_size::<Teb<X86>>(), 0x1038);
    assert_eq!(oracle::rounded_size::<Teb<X64>>(), 0x1878);
    let latest = |arch| LayoutTarget::new(arch, WinVersion::LATEST);
    assert_eq!(
        oracle::expected_size(BlockKind::Teb, latest(ArchKind::X86)),
        Some(0x1038)
    );
    assert_eq!(
        oracle::expected_size(BlockKind::Teb, latest(ArchKind::X64)),
        Some(0x1878)
    );
}

#[test]
fn process_parameters_tail() {
    type P32 = RtlUserProcessParameters<X86>;
    type P64 = RtlUserProcessParameters<X64>;

    // Last member plus its size, rounded to the alignment, is the size.
    let round = |value: usize, align: usize| (value + align - 1) / align * align;
    assert_eq!(
        round(field_end!(P32, heap_memory_type_mask), std::mem::align_of::<P32>()),
        0x2c4
    );
    assert_eq!(
        round(field_end!(P64, heap_memory_type_mask), std::mem::align_of::<P64>()),
        0x448
    );

    let rows = oracle::sizes(BlockKind::RtlUserProcessParameters);
    assert_eq!(rows.len(), 9);
    for row in rows {
        for arch in ArchKind::ALL {
            let target = LayoutTarget::new(arch, row.version);
            if !row.version.exists_for(arch) {
                continue;
            }

            if let Some(expected) = row.expected(arch) {
                assert_eq!(
                    oracle::expected_size(BlockKind::RtlUserProcessParameters, target),
                    Some(expected)
                );
            }
        }
    }
}

#[test]
fn zeroed_blocks_read_as_zero() {
    fn check<T: Block>() {
        let block = T::zeroed();
        assert!(block.as_bytes().iter().all(|&b| b == 0), "{}", T::NAME);
        let again = T::from_bytes(block.as_bytes()).unwrap();
        assert_eq!(again.as_bytes(), block.as_bytes());
    }

    check::<Peb<X86>>();
    check::<Peb<X64>>();
    check::<Teb<X86>>();
    check::<Teb<X64>>();
    check::<PebLdrData<X86>>();
    check::<PebLdrData<X64>>();
    check::<LdrDataTableEntry<X86>>();
    check::<LdrDataTableEntry<X64>>();
    check::<RtlUserProcessParameters<X86>>();
    check::<RtlUserProcessParameters<X64>>();

    let mut teb = Teb::<X64>::zeroed();
    teb.set_same_teb_flags(SameTebFlags::LOADER_WORKER, true);
    teb.last_error_value = 5;
    assert_eq!(teb.exception_code(), 0);
    assert_eq!(teb.wow_teb_offset(), 0);
    teb.set_same_teb_flags(SameTebFlags::LOADER_WORKER, false);
    teb.last_error_value = 0;
    assert!(teb.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn flags_are_isolated() {
    oracle::check_catalogs().unwrap();
    for group in oracle::catalogs() {
        for version in WinVersion::ALL {
            let flags = group.flags_in(version).collect::<Vec<_>>();
            for (idx, flag) in flags.iter().enumerate() {
                for other in &flags[idx + 1..] {
                    assert_eq!(
                        flag.mask & other.mask,
                        0,
                        "{}: {} and {} in {version}",
                        group.name,
                        flag.name,
                        other.name
                    );
                }
            }
        }
    }

    // The same bit has a different name depending on the release.
    let mut peb = Peb::<X64>::zeroed();
    peb.set_bit_field(PebBitField::IS_LEGACY_PROCESS, true);
    let bits = u64::from(peb.bit_field().bits());
    assert_eq!(
        pebteb_layout::peb::PEB_BIT_FIELD.decode(bits, WinVersion::Nt61),
        (vec!["IsLegacyProcess"], 0)
    );
    assert_eq!(
        pebteb_layout::peb::PEB_BIT_FIELD.decode(bits, WinVersion::Nt63),
        (vec!["IsImageDynamicallyRelocated"], 0)
    );
    assert_eq!(
        pebteb_layout::peb::PEB_BIT_FIELD.decode(bits, WinVersion::Nt52),
        (vec![], 0x04)
    );
}

#[test]
fn sizes_per_release() {
    let size = |kind, arch, version| oracle::expected_size(kind, LayoutTarget::new(arch, version));

    assert_eq!(size(BlockKind::Teb, ArchKind::X86, WinVersion::Nt61), Some(0xfe4));
    assert_eq!(size(BlockKind::Teb, ArchKind::X64, WinVersion::Nt61), Some(0x1818));
    assert_eq!(size(BlockKind::Teb, ArchKind::X64, WinVersion::Nt60Sp1), Some(0x1828));
    assert_eq!(size(BlockKind::Teb, ArchKind::X86, WinVersion::Nt351), Some(0xf28));
    // No x64 before late 5.2.
    assert_eq!(size(BlockKind::Teb, ArchKind::X64, WinVersion::Nt51), None);
    assert_eq!(size(BlockKind::Peb, ArchKind::X64, WinVersion::Nt52), None);
    assert_eq!(size(BlockKind::Peb, ArchKind::X64, WinVersion::Nt52Sp1), Some(0x358));
    assert_eq!(size(BlockKind::Peb, ArchKind::X86, WinVersion::Nt310), Some(0x70));
    assert_eq!(size(BlockKind::Peb, ArchKind::X86, WinVersion::Nt350), Some(0x70));
    assert_eq!(size(BlockKind::Peb, ArchKind::X86, WinVersion::Win10_1903), Some(0x480));
    assert_eq!(size(BlockKind::PebLdrData, ArchKind::X86, WinVersion::Nt50), Some(0x24));
    assert_eq!(size(BlockKind::PebLdrData, ArchKind::X64, WinVersion::Nt63), Some(0x58));
    assert_eq!(
        size(BlockKind::RtlUserProcessParameters, ArchKind::X64, WinVersion::Win10_1607),
        Some(0x410)
    );
    assert_eq!(size(BlockKind::LdrDataTableEntry, ArchKind::X86, WinVersion::Nt61), None);
    assert_eq!(
        size(BlockKind::LdrDataTableEntry, ArchKind::X64, WinVersion::Win11_24H2),
        Some(0x138)
    );
}

#[test]
fn windows_11_tails() {
    let target = |arch, build| {
        let version = WinVersion::from_os_version(10, 0, build, 0).unwrap();
        LayoutTarget::new(arch, version)
    };

    // ExtendedFeatureDisableMask showed up in the PEB with 23H2.
    assert_eq!(target(ArchKind::X64, 22631).version, WinVersion::Win11_23H2);
    assert_eq!(
        oracle::expected_size(BlockKind::Peb, target(ArchKind::X64, 22631)),
        Some(0x7d0)
    );
    assert_eq!(
        oracle::expected_size(BlockKind::Peb, target(ArchKind::X86, 22631)),
        Some(0x488)
    );
    assert_eq!(
        oracle::expected_size(BlockKind::Peb, target(ArchKind::X64, 22621)),
        Some(0x7c8)
    );
    assert_eq!(
        oracle::expected_size(BlockKind::Peb, target(ArchKind::X64, 22000)),
        Some(0x7c8)
    );

    // The TEB grew its tail in two steps: 21H2 then 24H2.
    assert_eq!(
        oracle::expected_size(BlockKind::Teb, target(ArchKind::X64, 22631)),
        Some(0x1850)
    );
    assert_eq!(
        oracle::expected_size(BlockKind::Teb, target(ArchKind::X64, 26100)),
        Some(0x1878)
    );
}

#[test]
fn fls_leftovers() {
    // 1903 moved the FLS bookkeeping out of the PEB but kept its bytes.
    assert_eq!(field_offset!(Peb<X86>, fls.spare.spare_ulongs), 0x21c);
    assert_eq!(field_offset!(Peb<X64>, fls.spare.spare_ulongs), 0x340);
    assert_eq!(field_end!(Peb<X86>, fls.spare), field_end!(Peb<X86>, fls.nt_5_2));
    assert_eq!(field_end!(Peb<X64>, fls.spare), 0x358);
    assert_eq!(field_offset!(Peb<X64>, wer_registration_data), 0x358);
    assert_eq!(
        oracle::expected_offset(BlockKind::Peb, "fls.spare.spare_ulongs", ArchKind::X86),
        Some(0x21c)
    );

    // Same story in the TEB: the 6.0 rundown counter became a spare.
    assert_eq!(field_offset!(Teb<X86>, wow_teb_offset.spare_ulong0), 0xfdc);
    assert_eq!(field_offset!(Teb<X64>, wow_teb_offset.spare_ulong0), 0x180c);
    assert_eq!(
        oracle::expected_offset(BlockKind::Teb, "wow_teb_offset.spare_ulong0", ArchKind::X64),
        Some(0x180c)
    );
}

#[test]
fn mismatches_name_the_culprit() {
    let err = oracle::check_offset("TEB", "tls_slots", ArchKind::X64, 0x1488, 0x1480)
        .unwrap_err();
    assert!(matches!(err, LayoutError::OffsetMismatch { .. }));
    let message = err.to_string();
    assert!(message.contains("TEB.tls_slots"));
    assert!(message.contains("0x1488"));

    let err = oracle::check_size("PEB", WinVersion::Nt61, ArchKind::X86, 0x244, 8, 0x250)
        .unwrap_err();
    assert!(err.to_string().contains("6.1"));

    let mut teb = Teb::<X86>::zeroed();
    teb.set_same_teb_flags(SameTebFlags::SESSION_AWARE, true);
    assert!(oracle::check_mask(&teb, "SessionAware", 0xfca, 2, 0x0800).is_ok());
    assert!(matches!(
        oracle::check_mask(&teb, "SessionAware", 0xfca, 2, 0x0400),
        Err(LayoutError::MaskMismatch { actual: 0x0800, .. })
    ));
}

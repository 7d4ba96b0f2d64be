// Axel '0vercl0k' Souchet - October 19 2026
use crate::peb::{CrossProcessFlags, LeapSecondFlags, Peb, PebBitField, TracingFlags};

layout_table! {
    block: Peb;
    offsets {
        inherited_address_space => 0x00, 0x00;
        read_image_file_exec_options => 0x01, 0x01;
        being_debugged => 0x02, 0x02;
        bit_field.spare_bool => 0x03, 0x03;
        bit_field.bit_field => 0x03, 0x03;
        padding0 => NA, 0x04;
        mutant => 0x04, 0x08;
        image_base_address => 0x08, 0x10;
        ldr => 0x0C, 0x18;
        process_parameters => 0x10, 0x20;
        sub_system_data => 0x14, 0x28;
        process_heap => 0x18, 0x30;
        fast_peb_lock.nt_3_10 => 0x1C, NA;
        fast_peb_lock.fast_peb_lock => 0x1C, 0x38;
        atl_thunk_slist_ptr.fast_peb_lock_routine => 0x20, NA;
        atl_thunk_slist_ptr.spare_ptr1 => 0x20, NA;
        atl_thunk_slist_ptr.atl_thunk_slist_ptr => 0x20, 0x40;
        ifeo_key.fast_peb_unlock_routine => 0x24, NA;
        ifeo_key.spare_ptr2 => 0x24, 0x48;
        ifeo_key.ifeo_key => 0x24, 0x48;
        kernel_callbacks.nt_3_10 => 0x28, NA;
        kernel_callbacks.nt_3_50.cross_process.environment_update_count => 0x28, 0x50;
        kernel_callbacks.nt_3_50.cross_process.cross_process_flags => 0x28, 0x50;
        kernel_callbacks.nt_3_50.padding1 => NA, 0x54;
        kernel_callbacks.nt_3_50.kernel_callback_table.nt_3_50 => 0x2C, NA;
        kernel_callbacks.nt_3_50.kernel_callback_table.kernel_callback_table => 0x2C, 0x58;
        kernel_callbacks.nt_3_50.kernel_callback_table.user_shared_info_ptr => 0x2C, 0x58;
        kernel_callbacks.nt_3_50.system_reserved0.event_log_section => 0x30, NA;
        kernel_callbacks.nt_3_50.system_reserved0.system_reserved0 => 0x30, 0x60;
        kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.event_log => 0x34, NA;
        kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.system_reserved1 => 0x34, NA;
        kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.execute_options => 0x34, NA;
        kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.spare_ulong => 0x34, 0x64;
        kernel_callbacks.nt_3_50.atl_thunk_slist_ptr32.atl_thunk_slist_ptr32 => 0x34, 0x64;
        api_set_map.free_list => 0x38, 0x68;
        api_set_map.spare_peb_ptr0 => 0x38, 0x68;
        api_set_map.api_set_map => 0x38, 0x68;
        tls_expansion_counter => 0x3C, 0x70;
        padding2 => NA, 0x74;
        tls_bitmap => 0x40, 0x78;
        tls_bitmap_bits => 0x44, 0x80;
        read_only_shared_memory_base => 0x4C, 0x88;
        shared_data.shared_data => 0x50, 0x90;
        shared_data.read_only_shared_memory_heap => 0x50, 0x90;
        shared_data.hotpatch_information => 0x50, 0x90;
        shared_data.spare_pvoid0 => 0x50, 0x90;
        read_only_static_server_data => 0x54, 0x98;
        ansi_code_page_data => 0x58, 0xA0;
        oem_code_page_data => 0x5C, 0xA8;
        unicode_case_table.nt_3_10.unicode_case_table_data => 0x60, NA;
        unicode_case_table.nt_3_10.critical_section_timeout => 0x68, NA;
        unicode_case_table.nt_3_50.unicode_case_table_data => 0x60, 0xB0;
        unicode_case_table.nt_3_50.number_of_processors => 0x64, 0xB8;
        unicode_case_table.nt_3_50.nt_global_flag => 0x68, 0xBC;
        unicode_case_table.nt_3_50.critical_section_timeout => 0x70, 0xC0;
        heap_segment_reserve => 0x78, 0xC8;
        heap_segment_commit => 0x7C, 0xD0;
        heap_de_commit_total_free_threshold => 0x80, 0xD8;
        heap_de_commit_free_block_threshold => 0x84, 0xE0;
        number_of_heaps => 0x88, 0xE8;
        maximum_number_of_heaps => 0x8C, 0xEC;
        process_heaps => 0x90, 0xF0;
        gdi_shared_handle_table => 0x94, 0xF8;
        process_starter_helper => 0x98, 0x100;
        gdi_dc_attribute_list => 0x9C, 0x108;
        padding3 => NA, 0x10C;
        loader_lock.nt_4_0 => 0xA0, NA;
        loader_lock.loader_lock => 0xA0, 0x110;
        os_major_version => 0xA4, 0x118;
        os_minor_version => 0xA8, 0x11C;
        os_build_number => 0xAC, 0x120;
        os_csd_version => 0xAE, 0x122;
        os_platform_id => 0xB0, 0x124;
        image_subsystem => 0xB4, 0x128;
        image_subsystem_major_version => 0xB8, 0x12C;
        image_subsystem_minor_version => 0xBC, 0x130;
        padding4 => NA, 0x134;
        affinity.active_process_affinity_mask => 0xC0, 0x138;
        affinity.image_process_affinity_mask => 0xC0, 0x138;
        gdi_handle_buffer => 0xC4, 0x140;
        post_process_init_routine => 0x14C, 0x230;
        tls_expansion_bitmap => 0x150, 0x238;
        tls_expansion_bitmap_bits => 0x154, 0x240;
        session_id => 0x1D4, 0x2C0;
        padding5 => NA, 0x2C4;
        app_compat.nt_5_0.app_compat_info => 0x1D8, NA;
        app_compat.nt_5_0.csd_version => 0x1DC, NA;
        app_compat.nt_5_1.app_compat_flags => 0x1D8, 0x2C8;
        app_compat.nt_5_1.app_compat_flags_user => 0x1E0, 0x2D0;
        app_compat.nt_5_1.p_shim_data => 0x1E8, 0x2D8;
        app_compat.nt_5_1.app_compat_info => 0x1EC, 0x2E0;
        app_compat.nt_5_1.csd_version => 0x1F0, 0x2E8;
        activation_context_data => 0x1F8, 0x2F8;
        process_assembly_storage_map => 0x1FC, 0x300;
        system_default_activation_context_data => 0x200, 0x308;
        system_assembly_storage_map => 0x204, 0x310;
        minimum_stack_commit => 0x208, 0x318;
        fls.nt_5_2.fls_callback => 0x20C, 0x320;
        fls.nt_5_2.fls_list_head => 0x210, 0x328;
        fls.nt_5_2.fls_bitmap => 0x218, 0x338;
        fls.nt_5_2.fls_bitmap_bits => 0x21C, 0x340;
        fls.nt_5_2.fls_high_index => 0x22C, 0x350;
        fls.spare.spare_pointers => 0x20C, 0x320;
        fls.spare.spare_ulongs => 0x21C, 0x340;
        wer_registration_data => 0x230, 0x358;
        wer_ship_assert_ptr => 0x234, 0x360;
        context_data.p_unused => 0x238, 0x368;
        context_data.p_context_data => 0x238, 0x368;
        p_image_header_hash => 0x23C, 0x370;
        tracing_flags => 0x240, 0x378;
        csr_server_read_only_shared_memory_base => 0x248, 0x380;
        tpp_workerp_list_lock => 0x250, 0x388;
        tpp_workerp_list => 0x254, 0x390;
        wait_on_address_hash_table => 0x25C, 0x3A0;
        telemetry_coverage_header => 0x45C, 0x7A0;
        cloud_file_flags => 0x460, 0x7A8;
        cloud_file_diag_flags => 0x464, 0x7AC;
        placeholder_compatibility_mode => 0x468, 0x7B0;
        placeholder_compatibility_mode_reserved => 0x469, 0x7B1;
        leap_second_data => 0x470, 0x7B8;
        leap_second_flags => 0x474, 0x7C0;
        nt_global_flag2 => 0x478, 0x7C4;
        padding8 => 0x47C, NA;
        extended_feature_disable_mask => 0x480, 0x7C8;
    }
    masks {
        ImageUsedLargePages: set_bit_field(PebBitField::IMAGE_USED_LARGE_PAGES, true)
            => u8 [0x03, 0x03] == 0x01;
        IsProtectedProcess: set_bit_field(PebBitField::IS_PROTECTED_PROCESS, true)
            => u8 [0x03, 0x03] == 0x02;
        IsLegacyProcess: set_bit_field(PebBitField::IS_LEGACY_PROCESS, true)
            => u8 [0x03, 0x03] == 0x04;
        IsImageDynamicallyRelocated: set_bit_field(PebBitField::IS_IMAGE_DYNAMICALLY_RELOCATED, true)
            => u8 [0x03, 0x03] == 0x04;
        IsImageDynamicallyRelocated60: set_bit_field(PebBitField::IS_IMAGE_DYNAMICALLY_RELOCATED_6_0, true)
            => u8 [0x03, 0x03] == 0x08;
        SkipPatchingUser32Forwarders: set_bit_field(PebBitField::SKIP_PATCHING_USER32_FORWARDERS, true)
            => u8 [0x03, 0x03] == 0x08;
        SkipPatchingUser32Forwarders60: set_bit_field(PebBitField::SKIP_PATCHING_USER32_FORWARDERS_6_0, true)
            => u8 [0x03, 0x03] == 0x10;
        IsPackagedProcess: set_bit_field(PebBitField::IS_PACKAGED_PROCESS, true)
            => u8 [0x03, 0x03] == 0x10;
        IsPackagedProcess62: set_bit_field(PebBitField::IS_PACKAGED_PROCESS_6_2, true)
            => u8 [0x03, 0x03] == 0x20;
        IsAppContainer: set_bit_field(PebBitField::IS_APP_CONTAINER, true)
            => u8 [0x03, 0x03] == 0x20;
        IsAppContainer62: set_bit_field(PebBitField::IS_APP_CONTAINER_6_2, true)
            => u8 [0x03, 0x03] == 0x40;
        IsProtectedProcessLight: set_bit_field(PebBitField::IS_PROTECTED_PROCESS_LIGHT, true)
            => u8 [0x03, 0x03] == 0x40;
        IsLongPathAwareProcess: set_bit_field(PebBitField::IS_LONG_PATH_AWARE_PROCESS, true)
            => u8 [0x03, 0x03] == 0x80;
        ProcessInJob: set_cross_process_flags(CrossProcessFlags::PROCESS_IN_JOB, true)
            => u32 [0x28, 0x50] == 0x01;
        ProcessInitializing: set_cross_process_flags(CrossProcessFlags::PROCESS_INITIALIZING, true)
            => u32 [0x28, 0x50] == 0x02;
        ProcessUsingVEH: set_cross_process_flags(CrossProcessFlags::PROCESS_USING_VEH, true)
            => u32 [0x28, 0x50] == 0x04;
        ProcessUsingVCH: set_cross_process_flags(CrossProcessFlags::PROCESS_USING_VCH, true)
            => u32 [0x28, 0x50] == 0x08;
        ProcessUsingFTH: set_cross_process_flags(CrossProcessFlags::PROCESS_USING_FTH, true)
            => u32 [0x28, 0x50] == 0x10;
        ProcessPreviouslyThrottled: set_cross_process_flags(CrossProcessFlags::PROCESS_PREVIOUSLY_THROTTLED, true)
            => u32 [0x28, 0x50] == 0x20;
        ProcessCurrentlyThrottled: set_cross_process_flags(CrossProcessFlags::PROCESS_CURRENTLY_THROTTLED, true)
            => u32 [0x28, 0x50] == 0x40;
        ProcessImagesHotPatched: set_cross_process_flags(CrossProcessFlags::PROCESS_IMAGES_HOT_PATCHED, true)
            => u32 [0x28, 0x50] == 0x80;
        ExecuteOptions: set_execute_options(3) => u32 [0x34, NA] == 0x03;
        HeapTracingEnabled: set_tracing_flags(TracingFlags::HEAP_TRACING_ENABLED, true)
            => u32 [0x240, 0x378] == 0x01;
        CritSecTracingEnabled: set_tracing_flags(TracingFlags::CRIT_SEC_TRACING_ENABLED, true)
            => u32 [0x240, 0x378] == 0x02;
        LibLoaderTracingEnabled: set_tracing_flags(TracingFlags::LIB_LOADER_TRACING_ENABLED, true)
            => u32 [0x240, 0x378] == 0x04;
        SixtySecondEnabled: set_leap_second_flags(LeapSecondFlags::SIXTY_SECOND_ENABLED, true)
            => u32 [0x474, 0x7C0] == 0x01;
    }
    sizes {
        Nt310 => unicode_case_table.nt_3_10.critical_section_timeout, 0x70, NA;
        Nt351 => process_heaps, 0x98, NA;
        Nt40 => gdi_handle_buffer + 4, 0x150, NA;
        Nt50 => app_compat.nt_5_0.csd_version + 4, 0x1E8, NA;
        Nt51 => minimum_stack_commit + 4, 0x210, NA;
        Nt52 => fls.nt_5_2.fls_high_index, 0x230, 0x358;
        // 1903 emptied the FLS area but kept its bytes.
        Nt52 => fls.spare.spare_ulongs, 0x230, 0x358;
        Nt60 => wer_ship_assert_ptr, 0x238, 0x368;
        Nt61 => tracing_flags + 4, 0x248, 0x380;
        Nt62 => csr_server_read_only_shared_memory_base, 0x250, 0x388;
        Win10_1511 => wait_on_address_hash_table, 0x460, 0x7A0;
        Win10_1709 => cloud_file_flags, 0x468, 0x7B0;
        Win10_1803 => placeholder_compatibility_mode_reserved, 0x470, 0x7B8;
        Win10_1809 => nt_global_flag2, 0x480, 0x7C8;
    }
    total Win11_23H2 => 0x488, 0x7D0;
}

// Axel '0vercl0k' Souchet - October 19 2026
use crate::teb::{CrossTebFlags, SameTebFlags, Teb};

layout_table! {
    block: Teb;
    offsets {
        nt_tib => 0x000, 0x000;
        environment_pointer => 0x01C, 0x038;
        client_id => 0x020, 0x040;
        active_rpc_handle.csr_qlpc_teb => 0x028, NA;
        active_rpc_handle.active_rpc_handle => 0x028, 0x050;
        thread_local_storage_pointer => 0x02C, 0x058;
        process_environment_block => 0x030, 0x060;
        last_error_value => 0x034, 0x068;
        count_of_owned_critical_sections.count_of_owned_critical_sections => 0x038, 0x06C;
        csr_client.nt_3_50.win32_process_info => 0x03C, NA;
        csr_client.nt_3_50.csr_qlpc_stack => 0x044, NA;
        csr_client.nt_4_0.csr_client_thread => 0x03C, 0x070;
        csr_client.nt_4_0.win32_thread_info => 0x040, 0x078;
        csr_client.nt_4_0.user32.nt_5_0.user32_reserved => 0x044, 0x080;
        csr_client.nt_4_0.user32.nt_5_0.user_reserved => 0x0AC, 0x0E8;
        csr_client.nt_4_0.wow32_reserved => 0x0C0, 0x100;
        current_locale => 0x0C4, 0x108;
        fp_software_status_register => 0x0C8, 0x10C;
        reserved.nt_3_10 => 0x0CC, 0x110;
        reserved.nt_10_0.reserved_for_debugger_instrumentation => 0x0CC, 0x110;
        reserved.nt_10_0.system_reserved1 => 0x10C, 0x190;
        reserved.nt_10_0.placeholder_compatibility_mode => 0x174, 0x280;
        reserved.nt_10_0.placeholder_hydration_always_explicit => 0x175, 0x281;
        reserved.nt_10_0.placeholder_reserved => 0x176, 0x282;
        reserved.nt_10_0.proxied_process_id => 0x180, 0x28C;
        reserved.nt_10_0.activation_stack => 0x184, 0x290;
        reserved.nt_10_0.working_on_behalf_of_ticket => 0x19C, 0x2B8;
        exception_code.spare1 => 0x1A4, NA;
        exception_code.exception_code => 0x1A4, 0x2C0;
        padding0 => NA, 0x2C4;
        gdi.nt_3_10.spare2 => 0x1A8, NA;
        gdi.nt_3_10.win32_thread_info => 0x1AC, NA;
        gdi.nt_3_10.gdi_client_pid => 0x6F4, NA;
        gdi.nt_3_10.user32_reserved0 => 0x700, NA;
        gdi.nt_3_10.user32_reserved1 => 0x704, NA;
        gdi.nt_3_10.user_reserved => 0x708, NA;
        gdi.nt_3_50.gdi.nt_3_50.spare2 => 0x1A8, NA;
        gdi.nt_3_50.gdi.nt_3_50.csr_qlpc_teb => 0x1AC, NA;
        gdi.nt_3_50.gdi.nt_3_50.win32_client_info => 0x1C0, NA;
        gdi.nt_3_50.gdi.nt_3_50.system_reserved2 => 0x1D4, NA;
        gdi.nt_3_50.gdi.nt_3_50.gdi_rgn => 0x6DC, NA;
        gdi.nt_3_50.gdi.nt_3_50.user32_reserved0 => 0x700, NA;
        gdi.nt_3_50.gdi.nt_3_50.user_reserved => 0x708, NA;
        gdi.nt_3_50.gdi.nt_3_50.gl_dispatch_table => 0x714, NA;
        gdi.nt_3_50.gdi.nt_4_0.exception_code => 0x1A8, NA;
        gdi.nt_3_50.gdi.nt_4_0.spare_bytes1 => 0x1AC, NA;
        gdi.nt_3_50.gdi.nt_4_0.gdi_teb_batch => 0x1FC, NA;
        gdi.nt_3_50.gdi.nt_4_0.gl_reserved2 => 0xBDC, NA;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_0 => 0x1A8, NA;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.activation_context_stack_pointer => 0x1A8, 0x2C8;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.instrumentation_callback_sp => 0x1AC, 0x2D0;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.instrumentation_callback_previous_pc => 0x1B0, 0x2D8;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.instrumentation_callback_previous_sp => 0x1B4, 0x2E0;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.tail.tx_fs_context => 0x1D0, 0x2E8;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.tail.instrumentation_callback_disabled => 0x1B8, 0x2EC;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.tail.unaligned_load_store_exceptions => NA, 0x2ED;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.tail.padding1 => NA, 0x2EE;
        gdi.nt_3_50.gdi.nt_5_0.activation.nt_5_2_sp1.tail.spare_bytes => 0x1B9, NA;
        gdi.nt_3_50.gdi.nt_5_0.gdi_teb_batch => 0x1D4, 0x2F0;
        gdi.nt_3_50.gdi.nt_5_0.real_client_id => 0x6B4, 0x7D8;
        gdi.nt_3_50.gdi.nt_5_0.gdi_cached_process_handle => 0x6BC, 0x7E8;
        gdi.nt_3_50.gdi.nt_5_0.gdi_client_pid => 0x6C0, 0x7F0;
        gdi.nt_3_50.gdi.nt_5_0.gdi_client_tid => 0x6C4, 0x7F4;
        gdi.nt_3_50.gdi.nt_5_0.gdi_thread_local_info => 0x6C8, 0x7F8;
        gdi.nt_3_50.gdi.nt_5_0.win32_client_info => 0x6CC, 0x800;
        gdi.nt_3_50.gdi.nt_5_0.gl_dispatch_table => 0x7C4, 0x9F0;
        gdi.nt_3_50.gdi.nt_5_0.gl_reserved1 => 0xB68, 0x1138;
        gdi.nt_3_50.gdi.nt_5_0.gl_reserved2 => 0xBDC, 0x1220;
        gdi.nt_3_50.gl_section_info => 0xBE0, 0x1228;
        gdi.nt_3_50.gl_section => 0xBE4, 0x1230;
        gdi.nt_3_50.gl_table => 0xBE8, 0x1238;
        gdi.nt_3_50.gl_current_rc => 0xBEC, 0x1240;
        gdi.nt_3_50.gl_context => 0xBF0, 0x1248;
        last_status_value => 0xBF4, 0x1250;
        padding2 => NA, 0x1254;
        static_unicode_string => 0xBF8, 0x1258;
        static_unicode_buffer => 0xC00, 0x1268;
        deallocation_stack => 0xE0C, 0x1478;
        tls_slots => 0xE10, 0x1480;
        tls_links => 0xF10, 0x1680;
        vdm => 0xF18, 0x1690;
        reserved_for_nt_rpc => 0xF1C, 0x1698;
        dbg_ss_reserved => 0xF20, 0x16A0;
        hard_error_mode.hard_error_mode => 0xF28, 0x16B0;
        hard_error_mode.hard_errors_are_disabled => 0xF28, 0x16B0;
        instrumentation.nt_4_0 => 0xF2C, NA;
        instrumentation.nt_6_0.instrumentation => 0xF2C, 0x16B8;
        instrumentation.nt_6_0.activity_id => 0xF50, 0x1710;
        instrumentation.nt_6_0.sub_process_tag => 0xF60, 0x1720;
        instrumentation.nt_5_2_sp1.sub_process_tag => 0xF64, 0x1728;
        instrumentation.nt_6_0.perflib => 0xF64, 0x1728;
        instrumentation.nt_6_0.etw_trace_data => 0xF68, 0x1730;
        win_sock_data => 0xF6C, 0x1738;
        gdi_batch_count => 0xF70, 0x1740;
        ideal_processor.spare2 => 0xF74, 0x1744;
        ideal_processor.nt_5_0.ideal_processor => 0xF77, 0x1747;
        ideal_processor.current_ideal_processor => 0xF74, 0x1744;
        guaranteed_stack_bytes.guaranteed_stack_bytes => 0xF78, 0x1748;
        reserved_for_perf.reserved_for_perf => 0xF7C, 0x1750;
        reserved_for_ole => 0xF80, 0x1758;
        waiting_on_loader_lock => 0xF84, 0x1760;
        thread_pool.wx86_thread => 0xF88, NA;
        thread_pool.nt_5_2_sp1.saved_priority_state => 0xF88, 0x1768;
        thread_pool.nt_5_2_sp1.reserved_for_code_coverage => 0xF8C, 0x1770;
        thread_pool.nt_5_2_sp1.thread_pool_data => 0xF90, 0x1778;
        tls_expansion_slots => 0xF94, 0x1780;
        backing_store => NA, 0x1788;
        mui_generation.mui_generation => 0xF98, 0x1798;
        is_impersonating => 0xF9C, 0x179C;
        nls_cache => 0xFA0, 0x17A0;
        p_shim_data => 0xFA4, 0x17A8;
        heap_data.heap_data => 0xFA8, 0x17B0;
        padding7 => NA, 0x17B4;
        current_transaction_handle => 0xFAC, 0x17B8;
        active_frame => 0xFB0, 0x17C0;
        fls.nt_5_1_sp2 => 0xFB4, NA;
        fls.nt_5_2.fls_data => 0xFB4, 0x17C8;
        fls.nt_5_2.preferred.nt_5_2_sp1 => 0xFB8, 0x17D0;
        fls.nt_5_2.preferred.preferred_languages => 0xFB8, 0x17D0;
        user_pref_languages => 0xFBC, 0x17D8;
        merged_pref_languages => 0xFC0, 0x17E0;
        mui_impersonation => 0xFC4, 0x17E8;
        cross_teb_flags => 0xFC8, 0x17EC;
        same_teb_flags => 0xFCA, 0x17EE;
        txn_scope_enter_callback => 0xFCC, 0x17F0;
        txn_scope_exit_callback => 0xFD0, 0x17F8;
        txn_scope_context => 0xFD4, 0x1800;
        lock_count => 0xFD8, 0x1808;
        wow_teb_offset.process_rundown => 0xFDC, 0x180C;
        wow_teb_offset.spare_ulong0 => 0xFDC, 0x180C;
        wow_teb_offset.wow_teb_offset => 0xFDC, 0x180C;
        switch_time.nt_6_0.last_switch_time => 0xFE0, 0x1810;
        switch_time.nt_6_0.total_switch_out_time => 0xFE8, 0x1818;
        switch_time.nt_6_0.wait_reason_bit_map => 0xFF0, 0x1820;
        switch_time.nt_6_0.padding_vista => 0xFF8, 0x1828;
        switch_time.nt_6_1.resource_ret_value => 0xFE0, 0x1810;
        switch_time.nt_6_1.reserved_for_wdf => 0xFE4, 0x1818;
        switch_time.nt_6_1.reserved_for_crt => 0xFE8, 0x1820;
        switch_time.nt_6_1.effective_container_id => 0xFF0, 0x1828;
        last_sleep_counter => 0x1000, 0x1838;
        spin_call_count => 0x1008, 0x1840;
        extended_feature_disable_mask => 0x1010, 0x1848;
        scheduler_shared_data_slot => 0x1018, 0x1850;
        heap_walk_context => 0x101C, 0x1858;
        primary_group_affinity => 0x1020, 0x1860;
        rcu => 0x102C, 0x1870;
    }
    masks {
        SafeThunkCall: set_same_teb_flags(SameTebFlags::SAFE_THUNK_CALL, true)
            => u16 [0xFCA, 0x17EE] == 0x0001;
        InDebugPrint: set_same_teb_flags(SameTebFlags::IN_DEBUG_PRINT, true)
            => u16 [0xFCA, 0x17EE] == 0x0002;
        HasFiberData: set_same_teb_flags(SameTebFlags::HAS_FIBER_DATA, true)
            => u16 [0xFCA, 0x17EE] == 0x0004;
        SkipThreadAttach: set_same_teb_flags(SameTebFlags::SKIP_THREAD_ATTACH, true)
            => u16 [0xFCA, 0x17EE] == 0x0008;
        WerInShipAssertCode: set_same_teb_flags(SameTebFlags::WER_IN_SHIP_ASSERT_CODE, true)
            => u16 [0xFCA, 0x17EE] == 0x0010;
        RanProcessInit: set_same_teb_flags(SameTebFlags::RAN_PROCESS_INIT, true)
            => u16 [0xFCA, 0x17EE] == 0x0020;
        ClonedThread: set_same_teb_flags(SameTebFlags::CLONED_THREAD, true)
            => u16 [0xFCA, 0x17EE] == 0x0040;
        SuppressDebugMsg: set_same_teb_flags(SameTebFlags::SUPPRESS_DEBUG_MSG, true)
            => u16 [0xFCA, 0x17EE] == 0x0080;
        DisableUserStackWalk: set_same_teb_flags(SameTebFlags::DISABLE_USER_STACK_WALK, true)
            => u16 [0xFCA, 0x17EE] == 0x0100;
        RtlExceptionAttached: set_same_teb_flags(SameTebFlags::RTL_EXCEPTION_ATTACHED, true)
            => u16 [0xFCA, 0x17EE] == 0x0200;
        InitialThread: set_same_teb_flags(SameTebFlags::INITIAL_THREAD, true)
            => u16 [0xFCA, 0x17EE] == 0x0400;
        SessionAware: set_same_teb_flags(SameTebFlags::SESSION_AWARE, true)
            => u16 [0xFCA, 0x17EE] == 0x0800;
        LoadOwner: set_same_teb_flags(SameTebFlags::LOAD_OWNER, true)
            => u16 [0xFCA, 0x17EE] == 0x1000;
        LoaderWorker: set_same_teb_flags(SameTebFlags::LOADER_WORKER, true)
            => u16 [0xFCA, 0x17EE] == 0x2000;
        SkipLoaderInit: set_same_teb_flags(SameTebFlags::SKIP_LOADER_INIT, true)
            => u16 [0xFCA, 0x17EE] == 0x4000;
        SkipFileAPIBrokering: set_same_teb_flags(SameTebFlags::SKIP_FILE_API_BROKERING, true)
            => u16 [0xFCA, 0x17EE] == 0x8000;
        SpareCrossTebBits: set_cross_teb_flags(CrossTebFlags::SPARE_CROSS_TEB_BITS, true)
            => u16 [0xFC8, 0x17EC] == 0xFFFF;
    }
    sizes {
        Nt310 => reserved_for_nt_rpc, 0xF20, NA;
        Nt350 => dbg_ss_reserved, 0xF28, NA;
        Nt40 => waiting_on_loader_lock, 0xF88, NA;
        Nt50 => nls_cache, 0xFA4, NA, align ptr;
        Nt51 => active_frame, 0xFB4, NA, align ptr;
        Nt51Sp2 => fls.nt_5_1_sp2, 0xFB8, NA;
        Nt52 => fls.nt_5_2.fls_data, 0xFB8, NA;
        Nt52Sp1 => fls.nt_5_2.preferred.nt_5_2_sp1, 0xFBC, 0x17D8, align ptr;
        Nt60 => switch_time.nt_6_0.wait_reason_bit_map, 0xFF8, 0x1828;
        Nt61 => switch_time.nt_6_1.resource_ret_value, 0xFE4, 0x1818, align ptr;
        Nt62 => switch_time.nt_6_1.reserved_for_wdf, 0xFE8, 0x1820;
        Win10_1507 => switch_time.nt_6_1.effective_container_id, 0x1000, 0x1838;
        Win11_21H2 => extended_feature_disable_mask, 0x1018, 0x1850;
    }
    total Win11_24H2 => 0x1038, 0x1878;
}

// Axel '0vercl0k' Souchet - October 19 2026

pub mod data {
    use crate::ldr::PebLdrData;

    layout_table! {
        block: PebLdrData;
        offsets {
            length => 0x00, 0x00;
            initialized => 0x04, 0x04;
            ss_handle => 0x08, 0x08;
            in_load_order_module_list => 0x0C, 0x10;
            in_memory_order_module_list => 0x14, 0x20;
            in_initialization_order_module_list => 0x1C, 0x30;
            entry_in_progress => 0x24, 0x40;
            shutdown_in_progress => 0x28, 0x48;
            padding2 => NA, 0x4C;
            shutdown_thread_id => 0x2C, 0x50;
        }
        masks {}
        sizes {
            Nt310 => in_initialization_order_module_list, 0x24, NA;
            Nt51 => entry_in_progress, 0x28, 0x48;
        }
        total Nt60 => 0x30, 0x58;
    }
}

pub mod entry {
    use crate::ldr::{LdrDataTableEntry, LdrFlags};

    layout_table! {
        block: LdrDataTableEntry;
        offsets {
            in_load_order_links => 0x00, 0x00;
            in_memory_order_links => 0x08, 0x10;
            in_initialization_order_links.in_initialization_order_links => 0x10, 0x20;
            in_initialization_order_links.in_progress_links => 0x10, 0x20;
            dll_base => 0x18, 0x30;
            entry_point => 0x1C, 0x38;
            size_of_image => 0x20, 0x40;
            padding0 => NA, 0x44;
            full_dll_name => 0x24, 0x48;
            base_dll_name => 0x2C, 0x58;
            flags.flags => 0x34, 0x68;
            flags.flag_group => 0x34, 0x68;
            load_count.load_count => 0x38, 0x6C;
            load_count.obsolete_load_count => 0x38, 0x6C;
            tls_index => 0x3A, 0x6E;
            hash_links => 0x3C, 0x70;
            time_date_stamp => 0x44, 0x80;
            padding1 => NA, 0x84;
            entry_point_activation_context => 0x48, 0x88;
            lock.patch_information => 0x4C, 0x90;
            lock.spare => 0x4C, 0x90;
            lock.lock => 0x4C, 0x90;
            links.nt_6_0.forwarder_links => 0x50, 0x98;
            links.nt_6_0.service_tag_links => 0x58, 0xA8;
            links.nt_6_0.static_links => 0x60, 0xB8;
            links.nt_6_0.context_information => 0x68, 0xC8;
            links.nt_6_0.original_base => 0x6C, 0xD0;
            links.nt_6_0.load_time => 0x70, 0xD8;
            links.nt_6_2.ddag_node => 0x50, 0x98;
            links.nt_6_2.node_module_link => 0x54, 0xA0;
            links.nt_6_2.load_context => 0x5C, 0xB0;
            links.nt_6_2.parent_dll_base => 0x60, 0xB8;
            links.nt_6_2.switch_back_context => 0x64, 0xC0;
            links.nt_6_2.base_address_index_node => 0x68, 0xC8;
            links.nt_6_2.mapping_info_index_node => 0x74, 0xE0;
            links.nt_6_2.original_base => 0x80, 0xF8;
            links.nt_6_2.load_time => 0x88, 0x100;
            base_name_hash_value => 0x90, 0x108;
            load_reason => 0x94, 0x10C;
            implicit_path_options => 0x98, 0x110;
            reference_count => 0x9C, 0x114;
            dependent_load_flags => 0xA0, 0x118;
            signing_level => 0xA4, 0x11C;
            padding2 => 0xA5, 0x11D;
            check_sum => 0xA8, 0x120;
            padding3 => NA, 0x124;
            active_patch_image_base => 0xAC, 0x128;
            hot_patch_state => 0xB0, 0x130;
            padding4 => 0xB4, 0x134;
        }
        masks {
            PackagedBinary: set_flags(LdrFlags::PACKAGED_BINARY, true)
                => u32 [0x34, 0x68] == 0x0000_0001;
            StaticLink: set_flags(LdrFlags::STATIC_LINK, true)
                => u32 [0x34, 0x68] == 0x0000_0002;
            MarkedForRemoval: set_flags(LdrFlags::MARKED_FOR_REMOVAL, true)
                => u32 [0x34, 0x68] == 0x0000_0002;
            ImageDll: set_flags(LdrFlags::IMAGE_DLL, true)
                => u32 [0x34, 0x68] == 0x0000_0004;
            LoadNotificationsSent: set_flags(LdrFlags::LOAD_NOTIFICATIONS_SENT, true)
                => u32 [0x34, 0x68] == 0x0000_0008;
            TelemetryEntryProcessed: set_flags(LdrFlags::TELEMETRY_ENTRY_PROCESSED, true)
                => u32 [0x34, 0x68] == 0x0000_0010;
            ProcessStaticImport: set_flags(LdrFlags::PROCESS_STATIC_IMPORT, true)
                => u32 [0x34, 0x68] == 0x0000_0020;
            InLegacyLists: set_flags(LdrFlags::IN_LEGACY_LISTS, true)
                => u32 [0x34, 0x68] == 0x0000_0040;
            InIndexes: set_flags(LdrFlags::IN_INDEXES, true)
                => u32 [0x34, 0x68] == 0x0000_0080;
            ShimDll: set_flags(LdrFlags::SHIM_DLL, true)
                => u32 [0x34, 0x68] == 0x0000_0100;
            InExceptionTable: set_flags(LdrFlags::IN_EXCEPTION_TABLE, true)
                => u32 [0x34, 0x68] == 0x0000_0200;
            LoadInProgress: set_flags(LdrFlags::LOAD_IN_PROGRESS, true)
                => u32 [0x34, 0x68] == 0x0000_1000;
            UnloadInProgress: set_flags(LdrFlags::UNLOAD_IN_PROGRESS, true)
                => u32 [0x34, 0x68] == 0x0000_2000;
            LoadConfigProcessed: set_flags(LdrFlags::LOAD_CONFIG_PROCESSED, true)
                => u32 [0x34, 0x68] == 0x0000_2000;
            EntryProcessed: set_flags(LdrFlags::ENTRY_PROCESSED, true)
                => u32 [0x34, 0x68] == 0x0000_4000;
            ProtectDelayLoad: set_flags(LdrFlags::PROTECT_DELAY_LOAD, true)
                => u32 [0x34, 0x68] == 0x0000_8000;
            DontCallForThreads: set_flags(LdrFlags::DONT_CALL_FOR_THREADS, true)
                => u32 [0x34, 0x68] == 0x0004_0000;
            ProcessAttachCalled: set_flags(LdrFlags::PROCESS_ATTACH_CALLED, true)
                => u32 [0x34, 0x68] == 0x0008_0000;
            ProcessAttachFailed: set_flags(LdrFlags::PROCESS_ATTACH_FAILED, true)
                => u32 [0x34, 0x68] == 0x0010_0000;
            ImageNotAtBase: set_flags(LdrFlags::IMAGE_NOT_AT_BASE, true)
                => u32 [0x34, 0x68] == 0x0020_0000;
            CorDeferredValidate: set_flags(LdrFlags::COR_DEFERRED_VALIDATE, true)
                => u32 [0x34, 0x68] == 0x0020_0000;
            CorImage: set_flags(LdrFlags::COR_IMAGE, true)
                => u32 [0x34, 0x68] == 0x0040_0000;
            DontRelocate: set_flags(LdrFlags::DONT_RELOCATE, true)
                => u32 [0x34, 0x68] == 0x0080_0000;
            CorILOnly: set_flags(LdrFlags::COR_IL_ONLY, true)
                => u32 [0x34, 0x68] == 0x0100_0000;
            ChpeImage: set_flags(LdrFlags::CHPE_IMAGE, true)
                => u32 [0x34, 0x68] == 0x0200_0000;
            ChpeEmulatorImage: set_flags(LdrFlags::CHPE_EMULATOR_IMAGE, true)
                => u32 [0x34, 0x68] == 0x0400_0000;
            Redirected: set_flags(LdrFlags::REDIRECTED, true)
                => u32 [0x34, 0x68] == 0x1000_0000;
            CompatDatabaseProcessed: set_flags(LdrFlags::COMPAT_DATABASE_PROCESSED, true)
                => u32 [0x34, 0x68] == 0x8000_0000;
        }
        sizes {}
        total Win11_24H2 => 0xB8, 0x138;
    }
}

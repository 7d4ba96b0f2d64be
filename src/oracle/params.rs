// Axel '0vercl0k' Souchet - October 19 2026
use crate::params::{ProcessParametersFlags, RtlUserProcessParameters};

layout_table! {
    block: RtlUserProcessParameters;
    offsets {
        maximum_length => 0x00, 0x00;
        length => 0x04, 0x04;
        flags => 0x08, 0x08;
        debug_flags => 0x0C, 0x0C;
        console_handle => 0x10, 0x10;
        console_flags => 0x14, 0x18;
        padding0 => NA, 0x1C;
        standard_input => 0x18, 0x20;
        standard_output => 0x1C, 0x28;
        standard_error => 0x20, 0x30;
        current_directory => 0x24, 0x38;
        dll_path => 0x30, 0x50;
        image_path_name => 0x38, 0x60;
        command_line => 0x40, 0x70;
        environment => 0x48, 0x80;
        starting_x => 0x4C, 0x88;
        starting_y => 0x50, 0x8C;
        count_x => 0x54, 0x90;
        count_y => 0x58, 0x94;
        count_chars_x => 0x5C, 0x98;
        count_chars_y => 0x60, 0x9C;
        fill_attribute => 0x64, 0xA0;
        window_flags => 0x68, 0xA4;
        show_window_flags => 0x6C, 0xA8;
        padding1 => NA, 0xAC;
        window_title => 0x70, 0xB0;
        desktop_info => 0x78, 0xC0;
        shell_info => 0x80, 0xD0;
        runtime_data => 0x88, 0xE0;
        current_directores => 0x90, 0xF0;
        environment_size => 0x290, 0x3F0;
        environment_version => 0x294, 0x3F8;
        package_dependency_data => 0x298, 0x400;
        process_group_id => 0x29C, 0x408;
        loader_threads => 0x2A0, 0x40C;
        redirection_dll_name => 0x2A4, 0x410;
        heap_partition_name => 0x2AC, 0x420;
        default_threadpool_cpu_set_masks => 0x2B4, 0x430;
        default_threadpool_cpu_set_mask_count => 0x2B8, 0x438;
        default_threadpool_thread_maximum => 0x2BC, 0x43C;
        heap_memory_type_mask => 0x2C0, 0x440;
        padding2 => NA, 0x444;
    }
    masks {
        Normalized: set_flags(ProcessParametersFlags::NORMALIZED, true)
            => u32 [0x08, 0x08] == 0x0000_0001;
        ProfileUser: set_flags(ProcessParametersFlags::PROFILE_USER, true)
            => u32 [0x08, 0x08] == 0x0000_0002;
        Reserve1Mb: set_flags(ProcessParametersFlags::RESERVE_1MB, true)
            => u32 [0x08, 0x08] == 0x0000_0020;
        CaseSensitive: set_flags(ProcessParametersFlags::CASE_SENSITIVE, true)
            => u32 [0x08, 0x08] == 0x0000_0080;
        OptinProcess: set_flags(ProcessParametersFlags::OPTIN_PROCESS, true)
            => u32 [0x08, 0x08] == 0x0002_0000;
    }
    sizes {
        Nt310 => current_directores, 0x290, 0x3F0;
        Nt60 => environment_size, 0x294, 0x3F8;
        Nt61 => environment_version, 0x298, 0x400;
        Nt62 => process_group_id, 0x2A0, 0x410;
        Win10_1507 => loader_threads, 0x2A4, 0x410;
        Win10_1809 => redirection_dll_name, 0x2AC, 0x420;
        Win10_1903 => default_threadpool_cpu_set_mask_count, 0x2BC, 0x440;
        Win10_2004 => default_threadpool_thread_maximum, 0x2C0, 0x440;
    }
    total Win11_21H2 => 0x2C4, 0x448;
}

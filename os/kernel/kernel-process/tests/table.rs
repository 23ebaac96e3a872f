use kernel_info::boot::{AreaDescription, KernelDescription, ModuleDescription};
use kernel_info::limits::{AREAS_LENGTH_MAX, CMDLINE_SLEN_MAX, PROCESS_LIST_LENGTH};
use kernel_info::memory::AddressWidth;
use kernel_process::{
    MemoryArea, ProcessError, ProcessOrigin, ProcessTable, ProcessTableBuilder,
};

const MAX32: u64 = 0xFFFF_FFFF;

fn area(base: u64, size: u64, limit: u64) -> MemoryArea {
    MemoryArea::validate(base, size, limit, MAX32).unwrap()
}

/// `count` well-formed modules, each one page long.
fn modules(count: usize) -> Vec<ModuleDescription<'static>> {
    (0..count as u64)
        .map(|i| {
            let base = 0x10_0000 + i * 0x1000;
            ModuleDescription::new(base, 0x1000, base + 0xFFF, "mod")
        })
        .collect()
}

/// A table that was successfully populated, to prove failures wipe it.
fn populated_table() -> ProcessTable {
    let mods = modules(3);
    let kinfo = KernelDescription::new("old", &[], &mods);
    let mut table = ProcessTable::new();
    table.init(&kinfo).unwrap();
    assert_eq!(table.len(), 4);
    table
}

#[test]
fn scenario_kernel_and_one_module() {
    let areas = [AreaDescription::new(0, 0x1000, 0xFFF)];
    let mods = [ModuleDescription::new(0x2000, 0x100, 0x20FF, "init")];
    let kinfo = KernelDescription::new("boot=disk", &areas, &mods);

    let mut table = ProcessTable::new();
    assert_eq!(table.init(&kinfo), Ok(()));

    let kernel = table.get(0).unwrap();
    assert_eq!(kernel.created_from(), ProcessOrigin::Kernel);
    assert_eq!(kernel.cmdline(), "boot=disk");
    assert_eq!(kernel.areas(), &[area(0, 0x1000, 0xFFF)]);

    let init = table.get(1).unwrap();
    assert_eq!(init.created_from(), ProcessOrigin::Module);
    assert_eq!(init.cmdline(), "init");
    assert_eq!(init.areas(), &[area(0x2000, 0x100, 0x20FF)]);

    for slot in &table.slots()[2..] {
        assert!(!slot.is_present());
    }
}

#[test]
fn scenario_inconsistent_module_area() {
    let mods = [ModuleDescription::new(0x10, 0x10, 0x20, "bad")];
    let kinfo = KernelDescription::new("", &[], &mods);

    let mut table = populated_table();
    assert_eq!(table.init(&kinfo), Err(ProcessError::InvalidArea));
    assert_eq!(table, ProcessTable::new());
}

#[test]
fn cmdline_length_bound() {
    let max = "a".repeat(CMDLINE_SLEN_MAX);
    let over = "a".repeat(CMDLINE_SLEN_MAX + 1);

    let mut table = ProcessTable::new();
    assert_eq!(table.init(&KernelDescription::new(&max, &[], &[])), Ok(()));
    assert_eq!(table.kernel().unwrap().cmdline(), max);

    assert_eq!(
        table.init(&KernelDescription::new(&over, &[], &[])),
        Err(ProcessError::CmdlineTooLong)
    );
    assert!(table.is_empty());
}

#[test]
fn module_cmdline_length_bound() {
    let over = "m".repeat(CMDLINE_SLEN_MAX + 1);
    let mods = [ModuleDescription::new(0x2000, 0x100, 0x20FF, &over)];

    let mut table = populated_table();
    assert_eq!(
        table.init(&KernelDescription::new("", &[], &mods)),
        Err(ProcessError::CmdlineTooLong)
    );
    assert_eq!(table, ProcessTable::new());
}

#[test]
fn kernel_area_count_bound() {
    let areas: Vec<_> = (0..=AREAS_LENGTH_MAX as u64)
        .map(|i| AreaDescription::new(i * 0x1000, 0x1000, i * 0x1000 + 0xFFF))
        .collect();

    let mut table = ProcessTable::new();
    let at_max = KernelDescription::new("", &areas[..AREAS_LENGTH_MAX], &[]);
    assert_eq!(table.init(&at_max), Ok(()));
    assert_eq!(table.kernel().unwrap().areas().len(), AREAS_LENGTH_MAX);

    let over = KernelDescription::new("", &areas, &[]);
    assert_eq!(
        table.init(&over),
        Err(ProcessError::KernelAreasLengthTooLong)
    );
    assert!(table.is_empty());
}

#[test]
fn module_count_bound() {
    let mods = modules(PROCESS_LIST_LENGTH);

    let mut table = ProcessTable::new();
    let at_max = KernelDescription::new("", &[], &mods[..PROCESS_LIST_LENGTH - 1]);
    assert_eq!(table.init(&at_max), Ok(()));
    assert_eq!(table.len(), PROCESS_LIST_LENGTH);
    assert_eq!(table.modules().count(), PROCESS_LIST_LENGTH - 1);

    let over = KernelDescription::new("", &[], &mods);
    assert_eq!(table.init(&over), Err(ProcessError::ModulesTooMany));
    assert!(table.is_empty());
}

#[test]
fn failing_module_wipes_earlier_slots() {
    let mut mods = modules(5);
    mods[3].area.limit += 1;
    let areas = [AreaDescription::new(0, 0x1000, 0xFFF)];
    let kinfo = KernelDescription::new("kernel", &areas, &mods);

    let mut table = populated_table();
    assert_eq!(table.init(&kinfo), Err(ProcessError::InvalidArea));
    assert_eq!(table, ProcessTable::new());
    assert!(table.slots().iter().all(|p| !p.is_present()));
}

#[test]
fn failing_kernel_area_wipes_table() {
    let areas = [
        AreaDescription::new(0, 0x1000, 0xFFF),
        AreaDescription::new(0x1000, 0, 0xFFF),
    ];
    let mut table = populated_table();
    assert_eq!(
        table.init(&KernelDescription::new("", &areas, &[])),
        Err(ProcessError::InvalidArea)
    );
    assert_eq!(table, ProcessTable::new());
}

#[test]
fn modules_keep_source_order() {
    let mods = [
        ModuleDescription::new(0x3000, 0x1000, 0x3FFF, "second-in-memory"),
        ModuleDescription::new(0x1000, 0x1000, 0x1FFF, "first-in-memory"),
    ];
    let mut table = ProcessTable::new();
    table.init(&KernelDescription::new("", &[], &mods)).unwrap();

    let names: Vec<_> = table.modules().map(|p| p.cmdline()).collect();
    assert_eq!(names, ["second-in-memory", "first-in-memory"]);
}

#[test]
fn address_width_is_configurable() {
    let mods = [ModuleDescription::new(
        0x1_0000_0000,
        0x1000,
        0x1_0000_0FFF,
        "high",
    )];
    let kinfo = KernelDescription::new("", &[], &mods);

    let mut table = ProcessTable::new();
    assert_eq!(table.init(&kinfo), Err(ProcessError::AddrTooBig));
    assert!(table.is_empty());

    let wide = ProcessTableBuilder::new(AddressWidth::Bits64);
    assert_eq!(wide.build(&mut table, &kinfo), Ok(()));
    assert_eq!(table.get(1).unwrap().areas()[0].base(), 0x1_0000_0000);
}

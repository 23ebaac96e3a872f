use kernel_bootinfo::{BootInfoCollector, FmtSink, TagWriter, parse};
use kernel_info::boot::AreaDescription;
use kernel_process::{ProcessOrigin, ProcessTable};
use std::io::{Error, ErrorKind};
use std::{env, fs};

/// Large enough for a command line, a few hundred modules and a memory map.
const MAX_IMAGE_SIZE: usize = 64 * 1024;

/// Pretend load address used for the alignment check of a dumped image.
const DUMP_BASE_ADDRESS: u64 = 0x1_0000;

const USAGE: &str = "usage:
  bootinfo pack <out> <kernel-cmdline> [<start>:<end>:<cmdline>]...
  bootinfo dump <file> [<kernel-base>:<kernel-size>]";

fn main() -> std::io::Result<()> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("pack") => pack(args),
        Some("dump") => dump(args),
        _ => Err(invalid(USAGE)),
    }
}

fn pack(mut args: impl Iterator<Item = String>) -> std::io::Result<()> {
    // args: <out> <kernel-cmdline> [modules...]
    let out = args.next().ok_or_else(|| invalid(USAGE))?;
    let cmdline = args.next().ok_or_else(|| invalid(USAGE))?;

    let mut buf = vec![0u8; MAX_IMAGE_SIZE];
    let mut w = TagWriter::new(&mut buf).map_err(invalid)?;
    w.command_line(&cmdline).map_err(invalid)?;

    for arg in args {
        let mut parts = arg.splitn(3, ':');
        let (Some(start), Some(end), Some(module_cmdline)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid(format!("module must be <start>:<end>:<cmdline>, got {arg}")));
        };
        w.module(parse_u32(start)?, parse_u32(end)?, module_cmdline)
            .map_err(invalid)?;
    }

    let len = w.finish().map_err(invalid)?;
    buf.truncate(len);
    fs::write(&out, &buf)?;
    println!("Wrote {len} bytes of boot information to {out}");
    Ok(())
}

fn dump(mut args: impl Iterator<Item = String>) -> std::io::Result<()> {
    // args: <file> [kernel area]
    let path = args.next().ok_or_else(|| invalid(USAGE))?;
    let kernel_areas = match args.next() {
        Some(area) => {
            let (base, size) = area
                .split_once(':')
                .ok_or_else(|| invalid(format!("kernel area must be <base>:<size>, got {area}")))?;
            let base = parse_u64(base)?;
            let size = parse_u64(size)?;
            vec![AreaDescription::new(base, size, base.wrapping_add(size).wrapping_sub(1))]
        }
        None => Vec::new(),
    };

    let image = fs::read(&path)?;
    let mut collector = BootInfoCollector::new();
    let mut sink = (FmtSink::new(String::new()), &mut collector);
    let parsed = parse(&image, DUMP_BASE_ADDRESS, &mut sink);
    let (console, _) = sink;
    print!("{}", console.into_inner());
    parsed.map_err(invalid)?;

    let mut table = ProcessTable::new();
    table
        .init(&collector.description(&kernel_areas))
        .map_err(invalid)?;

    println!("Process table:");
    for (slot, process) in table.slots().iter().enumerate() {
        if !process.is_present() {
            continue;
        }
        let origin = match process.created_from() {
            ProcessOrigin::Kernel => "kernel",
            ProcessOrigin::Module => "module",
        };
        print!(" [{slot}] {origin} \"{}\"", process.cmdline());
        for area in process.areas() {
            print!(" {area}");
        }
        println!();
    }
    Ok(())
}

fn parse_u64(s: &str) -> std::io::Result<u64> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| invalid(format!("invalid number {s}: {e}")))
}

fn parse_u32(s: &str) -> std::io::Result<u32> {
    let value = parse_u64(s)?;
    u32::try_from(value).map_err(|_| invalid(format!("{s} does not fit 32 bits")))
}

fn invalid<E: Into<Box<dyn std::error::Error + Send + Sync>>>(e: E) -> Error {
    Error::new(ErrorKind::InvalidInput, e)
}

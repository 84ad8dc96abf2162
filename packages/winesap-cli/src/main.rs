//! Thin command-line harness around the winesap core: load a ROM and
//! optionally a disk, run for a while, dump what the machine sees.

use std::fs;
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use winesap_core::devices::apple2::Apple2;
use winesap_core::Backend;

#[derive(Debug, StructOpt)]
#[structopt(name = "winesap", about = "Cycle-accurate Apple II runner")]
struct Opt {
    /// 12k system ROM image mapped at $D000; omit with --demo
    #[structopt(parse(from_os_str), required_unless = "demo")]
    rom: Option<PathBuf>,

    /// Boot the built-in demonstration ROM instead of a file
    #[structopt(long)]
    demo: bool,

    /// 143,360-byte .dsk image for drive 1
    #[structopt(long, parse(from_os_str))]
    disk: Option<PathBuf>,

    /// Execution backend: interpret, jit or compile
    #[structopt(long, default_value = "interpret")]
    backend: Backend,

    /// How many frames to run before dumping
    #[structopt(long, default_value = "60")]
    frames: u64,

    /// Type these characters into the keyboard latch before running
    #[structopt(long)]
    keys: Option<String>,

    /// Print the text screen when done
    #[structopt(long)]
    screen: bool,

    /// Print the hi-res page as ASCII art when done
    #[structopt(long)]
    hires_dump: bool,

    /// Print a trace of the first N instructions
    #[structopt(long, default_value = "0")]
    trace: u64,
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let rom = match (&opt.rom, opt.demo) {
        (Some(path), _) => fs::read(path)?,
        (None, _) => winesap_core::demo::demo_rom(),
    };
    let mut machine = Apple2::with_backend(opt.backend)?;
    machine.load_rom(&rom)?;

    if let Some(path) = &opt.disk {
        let image = fs::read(path)?;
        machine.load_disk(&image, 0)?;
    }

    machine.reset();
    log::info!(
        "reset complete, PC=${:04X}, running {} frames",
        machine.regs().pc,
        opt.frames
    );

    for _ in 0..opt.trace {
        println!("{}", machine.dbg_step_cpu());
    }

    let mut pending_keys: Vec<u8> = opt
        .keys
        .as_deref()
        .unwrap_or("")
        .bytes()
        .rev()
        .collect();

    for _ in 0..opt.frames {
        // feed one key per frame so programs polling $C000 keep up
        if let Some(key) = pending_keys.pop() {
            machine.inject_key(key);
        }
        machine.run_frame();
    }

    log::info!(
        "done: {} cycles, {} illegal opcodes, {} disk resyncs",
        machine.total_cycles(),
        machine.illegal_opcode_count(),
        machine.disk_resync_count()
    );

    if opt.screen {
        for line in machine.read_text_screen() {
            println!("{}", line);
        }
    }
    if opt.hires_dump {
        for row in machine.read_hires_bitmap() {
            let line: String = row
                .iter()
                .map(|&px| if px != 0 { '#' } else { '.' })
                .collect();
            println!("{}", line);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    if let Err(err) = run(opt) {
        eprintln!("winesap: {}", err);
        process::exit(1);
    }
}

mod audio;
mod debugger;

use std::thread;
use std::time::Duration;

use clap::Parser;
use log::info;

use spcwave_core::{
    SAMPLE_RATE,
    apu::{Apu, Step},
    disasm,
    snapshot::Snapshot,
};

/// Queue depth between the emulator and the audio callback (~250 ms).
const SINK_CAPACITY_FRAMES: usize = SAMPLE_RATE as usize / 4;
/// How long to idle when the sink reports backpressure.
const BACKPRESSURE_NAP: Duration = Duration::from_millis(2);

#[derive(Parser)]
#[command(name = "spcwave", about = "SPC snapshot player")]
struct Args {
    /// Path to the .spc snapshot
    snapshot: std::path::PathBuf,

    /// Stop after this many seconds (plays until interrupted by default)
    #[arg(long)]
    seconds: Option<f64>,

    /// Print each executed instruction
    #[arg(long)]
    trace: bool,

    /// Breakpoint addresses (hex, e.g. --break 0812)
    #[arg(long = "break", value_parser = parse_hex_addr)]
    breakpoints: Vec<u16>,

    /// Drop into the debugger before executing anything
    #[arg(long)]
    debug: bool,
}

fn parse_hex_addr(s: &str) -> Result<u16, String> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let snapshot = match Snapshot::from_file(&args.snapshot) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to load {}: {e}", args.snapshot.display());
            std::process::exit(1);
        }
    };

    if let Some(tag) = &snapshot.tag {
        println!("{} - {}", tag.game_title, tag.song_title);
        if !tag.comments.is_empty() {
            println!("{}", tag.comments);
        }
    }

    let mut apu = Apu::from_snapshot(&snapshot);
    for &addr in &args.breakpoints {
        apu.add_breakpoint(addr);
    }

    let consumer = apu.attach_sink(SINK_CAPACITY_FRAMES);
    let stream = audio::start_stream(consumer);
    if stream.is_none() {
        eprintln!("no audio output device; running silent");
    }

    info!("starting playback of {}", args.snapshot.display());

    if args.debug {
        let pc = apu.cpu.pc;
        if debugger::enter(&mut apu, pc) == debugger::DebugAction::Quit {
            return;
        }
    }

    let frame_limit = args
        .seconds
        .map(|s| (s * SAMPLE_RATE as f64).ceil() as u64);

    loop {
        if let Some(limit) = frame_limit
            && apu.sample_counter() >= limit
        {
            break;
        }

        if args.trace {
            trace_instruction(&apu);
        }

        match apu.step() {
            Ok(Step::Executed { .. }) => {}
            Ok(Step::SinkFull) => thread::sleep(BACKPRESSURE_NAP),
            Ok(Step::Breakpoint { pc }) => {
                if debugger::enter(&mut apu, pc) == debugger::DebugAction::Quit {
                    break;
                }
            }
            Err(e) => {
                eprintln!("emulation aborted: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn trace_instruction(apu: &Apu) {
    let pc = apu.cpu.pc;
    let bytes = [
        apu.mmu.peek_byte(pc),
        apu.mmu.peek_byte(pc.wrapping_add(1)),
        apu.mmu.peek_byte(pc.wrapping_add(2)),
    ];
    let (text, _) = disasm::disassemble(&bytes, pc);
    println!("{:04X}  {text:<20} {}", pc, apu.cpu.flags_str());
}

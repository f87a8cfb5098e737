//! Line-oriented debugger driven through the scheduler's step API.

use std::io::{self, BufRead, Write};

use spcwave_core::{
    apu::{Apu, Step},
    disasm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    /// Resume normal playback.
    Resume,
    /// Tear the player down.
    Quit,
}

/// Take over the console until the user resumes or quits.
pub fn enter(apu: &mut Apu, pc: u16) -> DebugAction {
    println!("stopped at {pc:04X}");
    print_current(apu);

    let stdin = io::stdin();
    loop {
        print!("spc> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            return DebugAction::Quit;
        }
        let mut words = line.split_whitespace();
        let cmd = words.next().unwrap_or("");
        let arg = words.next();

        match cmd {
            "" => {}
            "s" | "step" => {
                match apu.step_instruction() {
                    Ok(_) => print_current(apu),
                    Err(e) => {
                        eprintln!("{e}");
                        return DebugAction::Quit;
                    }
                }
            }
            "c" | "continue" => {
                // Step off the breakpoint first so it does not retrigger.
                match apu.step_instruction() {
                    Ok(Step::Executed { .. } | Step::SinkFull | Step::Breakpoint { .. }) => {
                        return DebugAction::Resume;
                    }
                    Err(e) => {
                        eprintln!("{e}");
                        return DebugAction::Quit;
                    }
                }
            }
            "r" | "regs" => println!("{}", apu.cpu.debug_state()),
            "b" | "break" => match parse_addr(arg) {
                Some(addr) => apu.add_breakpoint(addr),
                None => println!("usage: b <hex addr>"),
            },
            "del" => match parse_addr(arg) {
                Some(addr) => apu.remove_breakpoint(addr),
                None => println!("usage: del <hex addr>"),
            },
            "m" | "mem" => match parse_addr(arg) {
                Some(addr) => dump_memory(apu, addr),
                None => println!("usage: m <hex addr>"),
            },
            "d" | "dis" => {
                let start = parse_addr(arg).unwrap_or(apu.cpu.pc);
                dump_disassembly(apu, start, 10);
            }
            "q" | "quit" => return DebugAction::Quit,
            "h" | "help" => {
                println!("s(tep)  c(ontinue)  r(egs)  b <addr>  del <addr>");
                println!("m <addr>  d [addr]  q(uit)");
            }
            other => println!("unknown command: {other} (try 'help')"),
        }
    }
}

fn parse_addr(arg: Option<&str>) -> Option<u16> {
    let s = arg?.trim_start_matches("0x");
    u16::from_str_radix(s, 16).ok()
}

fn print_current(apu: &Apu) {
    let pc = apu.cpu.pc;
    let bytes = peek3(apu, pc);
    let (text, _) = disasm::disassemble(&bytes, pc);
    println!("{pc:04X}  {text:<20} {}", apu.cpu.debug_state());
}

fn peek3(apu: &Apu, addr: u16) -> [u8; 3] {
    [
        apu.mmu.peek_byte(addr),
        apu.mmu.peek_byte(addr.wrapping_add(1)),
        apu.mmu.peek_byte(addr.wrapping_add(2)),
    ]
}

fn dump_memory(apu: &Apu, start: u16) {
    for row in 0..4u16 {
        let base = start.wrapping_add(row * 16);
        print!("{base:04X} ");
        for i in 0..16u16 {
            print!(" {:02X}", apu.mmu.peek_byte(base.wrapping_add(i)));
        }
        println!();
    }
}

fn dump_disassembly(apu: &Apu, start: u16, count: usize) {
    let mut addr = start;
    for _ in 0..count {
        let bytes = peek3(apu, addr);
        let (text, len) = disasm::disassemble(&bytes, addr);
        print!("{addr:04X}  ");
        for (i, byte) in bytes.iter().enumerate() {
            if i < len as usize {
                print!("{byte:02X} ");
            } else {
                print!("   ");
            }
        }
        println!(" {text}");
        addr = addr.wrapping_add(len as u16);
    }
}

#![allow(dead_code)]

use spcwave_core::mmu::RAM_SIZE;
use spcwave_core::snapshot::SpcRegisters;

const MAGIC: &[u8] = b"SNES-SPC700 Sound File Data v0.30";

/// Assemble a minimal in-memory SPC file image.
pub fn build_spc(regs: SpcRegisters, ram: &[u8; RAM_SIZE], dsp: &[u8; 128]) -> Vec<u8> {
    let mut data = vec![0u8; 0x10180];
    data[..MAGIC.len()].copy_from_slice(MAGIC);
    data[0x21] = 0x1A;
    data[0x22] = 0x1A;
    data[0x23] = 0x1B; // no ID666 tag
    data[0x24] = 30;

    data[0x25..0x27].copy_from_slice(&regs.pc.to_le_bytes());
    data[0x27] = regs.a;
    data[0x28] = regs.x;
    data[0x29] = regs.y;
    data[0x2A] = regs.psw;
    data[0x2B] = regs.sp;

    data[0x0100..0x10100].copy_from_slice(ram);
    data[0x10100..0x10180].copy_from_slice(dsp);
    data
}

/// Same, with an ID666 text tag filled in.
pub fn build_spc_with_tag(
    regs: SpcRegisters,
    ram: &[u8; RAM_SIZE],
    dsp: &[u8; 128],
    song: &str,
    game: &str,
) -> Vec<u8> {
    let mut data = build_spc(regs, ram, dsp);
    data[0x23] = 0x1A;
    data[0x2E..0x2E + song.len()].copy_from_slice(song.as_bytes());
    data[0x4E..0x4E + game.len()].copy_from_slice(game.as_bytes());
    data
}

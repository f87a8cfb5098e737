//! SNES audio subsystem (SPC700 + DSP) emulation core.
//!
//! This crate contains the platform-agnostic emulator logic: the 64 KiB
//! memory fabric with its memory-mapped IO window, the three hardware
//! timers, the SPC700 CPU interpreter, the eight-voice DSP, and the
//! scheduler that paces them against a shared cycle counter. Frontends
//! (the command-line player, offline WAV rendering) live elsewhere and
//! drive the core via the [`apu`] facade.

/// Scheduler facade wiring the CPU, memory fabric and DSP into a machine.
pub mod apu;

/// Lock-free stereo sample ring between the scheduler and the audio sink.
pub mod audio_queue;

/// SPC700 CPU core.
pub mod cpu;

/// Debug-only instruction formatter.
pub mod disasm;

/// Eight-voice BRR/ADSR DSP emulation.
pub mod dsp;

/// Interpolation and envelope rate constants used by the DSP.
pub mod dsp_tables;

/// Memory map and hardware register plumbing.
pub mod mmu;

/// Instruction lengths and cycle costs, indexed by opcode byte.
pub mod opcodes;

/// SPC snapshot file parsing.
pub mod snapshot;

/// Divider/counter timer units.
pub mod timer;

/// CPU core clock in Hz.
pub const CPU_CLOCK_HZ: u32 = 2_048_000;

/// DSP output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 32_000;

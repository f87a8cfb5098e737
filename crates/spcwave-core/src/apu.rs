use crate::{
    CPU_CLOCK_HZ, SAMPLE_RATE,
    audio_queue::{SampleConsumer, SampleProducer, sample_queue},
    cpu::{Cpu, CpuError},
    mmu::Mmu,
    snapshot::Snapshot,
};

/// CPU cycles per 32 kHz output sample.
pub const CYCLES_PER_SAMPLE: u64 = (CPU_CLOCK_HZ / SAMPLE_RATE) as u64;

/// What a scheduler iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One instruction ran and consumed this many cycles.
    Executed { cycles: u8 },
    /// PC sits on a breakpoint; nothing was executed. Resume with
    /// [`Apu::step_instruction`].
    Breakpoint { pc: u16 },
    /// The sample sink is full; nothing was executed. Idle and retry.
    SinkFull,
}

/// The whole machine: CPU, memory fabric (with timers and DSP), and the
/// scheduler state pacing one stereo frame out per 64 CPU cycles.
pub struct Apu {
    pub cpu: Cpu,
    pub mmu: Mmu,
    next_sample_cycle: u64,
    sample_counter: u64,
    sink: Option<SampleProducer>,
    breakpoints: Vec<u16>,
}

impl Apu {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            mmu: Mmu::new(),
            next_sample_cycle: CYCLES_PER_SAMPLE,
            sample_counter: 0,
            sink: None,
            breakpoints: Vec::new(),
        }
    }

    /// Build a machine resuming from a parsed snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut apu = Self::new();
        apu.load_snapshot(snapshot);
        apu
    }

    pub fn load_snapshot(&mut self, snapshot: &Snapshot) {
        self.mmu.load_snapshot(snapshot);
        let r = &snapshot.registers;
        self.cpu.pc = r.pc;
        self.cpu.a = r.a;
        self.cpu.x = r.x;
        self.cpu.y = r.y;
        self.cpu.psw = r.psw;
        self.cpu.sp = r.sp;
        self.cpu.stopped = false;
    }

    /// Create the sample queue feeding an external audio sink. Frames
    /// produced while no sink is attached are dropped.
    pub fn attach_sink(&mut self, capacity_frames: usize) -> SampleConsumer {
        let (producer, consumer) = sample_queue(capacity_frames);
        self.sink = Some(producer);
        consumer
    }

    pub fn add_breakpoint(&mut self, addr: u16) {
        if !self.breakpoints.contains(&addr) {
            self.breakpoints.push(addr);
        }
    }

    pub fn remove_breakpoint(&mut self, addr: u16) {
        self.breakpoints.retain(|&a| a != addr);
    }

    pub fn breakpoints(&self) -> &[u16] {
        &self.breakpoints
    }

    /// Global cycle counter.
    pub fn cycles(&self) -> u64 {
        self.mmu.cycle
    }

    /// Stereo frames produced so far.
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }

    /// One scheduler iteration: surrender to the debugger on a breakpoint,
    /// otherwise run one instruction.
    pub fn step(&mut self) -> Result<Step, CpuError> {
        if self.breakpoints.contains(&self.cpu.pc) {
            return Ok(Step::Breakpoint { pc: self.cpu.pc });
        }
        self.step_instruction()
    }

    /// Run one instruction regardless of breakpoints, then catch the
    /// timers up and emit any due sample frames.
    ///
    /// An instruction spans at most a fraction of one sample period, so a
    /// single free slot in the sink is enough headroom; with none we report
    /// backpressure instead of executing.
    pub fn step_instruction(&mut self) -> Result<Step, CpuError> {
        if let Some(sink) = &self.sink
            && sink.is_full()
        {
            return Ok(Step::SinkFull);
        }

        let cycles = self.cpu.step(&mut self.mmu)?;
        self.mmu.cycle += cycles as u64;
        self.mmu.tick_timers();

        while self.mmu.cycle >= self.next_sample_cycle {
            let (left, right) = self.mmu.dsp_sample();
            if let Some(sink) = &self.sink {
                sink.push_frame(left, right);
            }
            self.sample_counter += 1;
            self.next_sample_cycle += CYCLES_PER_SAMPLE;
        }

        Ok(Step::Executed { cycles })
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

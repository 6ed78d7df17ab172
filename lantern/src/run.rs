use tracing::debug;
use tracing::info;
use wisp::Gameboy;
use wisp::cpu::CpuState;
use wisp::error::UnimplementedOpcode;

/// When to stop stepping the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub frames: u64,
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StopReason {
    #[display("rendered {_0} frame(s)")]
    Frames(u64),
    #[display("the CPU halted")]
    Halted,
    #[display("the CPU stopped")]
    Stopped,
    #[display("ran out of steps")]
    StepBudget,
    #[display("{_0}")]
    Fault(UnimplementedOpcode),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display(
    "Stopped after {steps} steps and {cycles} clock cycles: {stop}\nFrames: {frames}, skipped op codes: {faults}\n{cpu}"
)]
pub struct Summary {
    pub steps: u64,
    pub cycles: u64,
    pub frames: u64,
    pub faults: u64,
    pub stop: StopReason,
    pub cpu: String,
}

/// Steps the core until one of the limits is reached or the CPU is no longer running. A fault
/// that the core's policy returns (rather than skips) also ends the run.
pub fn run(gb: &mut Gameboy, limits: Limits) -> Summary {
    let mut steps = 0;
    let mut frames = 0;
    let stop = loop {
        if frames >= limits.frames {
            break StopReason::Frames(frames);
        }
        if limits.max_steps.is_some_and(|max| steps >= max) {
            break StopReason::StepBudget;
        }
        match gb.cpu().state {
            CpuState::Running => {}
            CpuState::Halted => break StopReason::Halted,
            CpuState::Stopped => break StopReason::Stopped,
        }
        steps += 1;
        match gb.step() {
            Ok(outcome) if outcome.frame_completed => {
                frames += 1;
                debug!("Frame {frames} done after {steps} steps");
            }
            Ok(_) => {}
            Err(err) => break StopReason::Fault(err),
        }
    };
    info!("Run ended: {stop}");
    Summary {
        steps,
        cycles: gb.cpu().clock.t,
        frames,
        faults: gb.faults(),
        stop,
        cpu: gb.cpu().to_string(),
    }
}

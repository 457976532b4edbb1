/// Next-address prediction for A32 instructions.
///
/// The entry point is [`next_address`]: given a read-only snapshot of the CPU
/// and the instruction word at its PC, it computes where execution resumes
/// after single-stepping that one instruction.

mod table;
mod mux;
mod alu;
mod branch;
mod coproc;
mod mul;
mod media;
mod ldst;
mod status;
mod vfp;

#[cfg(test)]
mod decode_test;

use crate::core::{CPSR, StepSource};
use crate::memory::Mem32;

pub use table::{Entry, Handler, DECODE_TABLE};

/// Where execution lands after stepping an instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddrState {
    Arm,
    Thumb,
    /// The instruction takes the undefined-instruction trap.
    Undefined,
}

/// Sentinel address meaning "resume at the next sequential instruction".
pub const LINEAR: u32 = 0xFFFF_FFFF;

/// The prediction result: an address, the instruction-set state it is
/// executed in, and whether the architecture calls the step UNPREDICTABLE.
///
/// The UNPREDICTABLE flag is an overlay: setting it never changes the
/// address or state, it just warns the agent that the prediction is
/// best-effort.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NextAddr {
    pub address: u32,
    pub state: AddrState,
    pub unpredictable: bool,
}

impl NextAddr {
    /// Linear fall-through: the sentinel address in ARM state.
    pub fn linear() -> Self {
        Self { address: LINEAR, state: AddrState::Arm, unpredictable: false }
    }

    pub fn arm(address: u32) -> Self {
        Self { address, state: AddrState::Arm, unpredictable: false }
    }

    pub fn thumb(address: u32) -> Self {
        Self { address, state: AddrState::Thumb, unpredictable: false }
    }

    pub fn undefined() -> Self {
        Self { address: 0, state: AddrState::Undefined, unpredictable: false }
    }

    /// Interworking target selection on a computed PC value:
    /// bit 0 set means Thumb (with the bit cleared), a word-aligned value
    /// means ARM, and a halfword-aligned value without bit 0 is a Thumb
    /// target the architecture calls UNPREDICTABLE.
    pub fn from_target(address: u32) -> Self {
        if address & 1 != 0 {
            Self::thumb(address & !1)
        } else if address & 3 == 0 {
            Self::arm(address)
        } else {
            Self::thumb(address).unpredictable()
        }
    }

    /// Apply the UNPREDICTABLE overlay.
    pub fn unpredictable(self) -> Self {
        Self { unpredictable: true, ..self }
    }

    /// Apply the UNPREDICTABLE overlay when `cond` holds.
    pub fn unpredictable_if(self, cond: bool) -> Self {
        if cond { self.unpredictable() } else { self }
    }

    pub fn is_linear(&self) -> bool {
        self.state == AddrState::Arm && self.address == LINEAR
    }
}

/// Condition codes from bits 31-28 of the instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ARMCondition {
    EQ, NE, CS, CC, MI, PL, VS, VC,
    HI, LS, GE, LT, GT, LE, AL,
    /// 0b1111: not a condition; the encoding space executes unconditionally.
    NV,
}

impl ARMCondition {
    pub fn decode(i: u32) -> Self {
        use ARMCondition::*;
        match i >> 28 {
            0x0 => EQ,
            0x1 => NE,
            0x2 => CS,
            0x3 => CC,
            0x4 => MI,
            0x5 => PL,
            0x6 => VS,
            0x7 => VC,
            0x8 => HI,
            0x9 => LS,
            0xA => GE,
            0xB => LT,
            0xC => GT,
            0xD => LE,
            0xE => AL,
            _ => NV,
        }
    }

    pub fn passed(self, cpsr: CPSR) -> bool {
        use ARMCondition::*;
        match self {
            EQ => cpsr.contains(CPSR::Z),
            NE => !cpsr.contains(CPSR::Z),
            CS => cpsr.contains(CPSR::C),
            CC => !cpsr.contains(CPSR::C),
            MI => cpsr.contains(CPSR::N),
            PL => !cpsr.contains(CPSR::N),
            VS => cpsr.contains(CPSR::V),
            VC => !cpsr.contains(CPSR::V),
            HI => cpsr.contains(CPSR::C) && !cpsr.contains(CPSR::Z),
            LS => !cpsr.contains(CPSR::C) || cpsr.contains(CPSR::Z),
            GE => cpsr.contains(CPSR::N) == cpsr.contains(CPSR::V),
            LT => cpsr.contains(CPSR::N) != cpsr.contains(CPSR::V),
            GT => !cpsr.contains(CPSR::Z) && (cpsr.contains(CPSR::N) == cpsr.contains(CPSR::V)),
            LE => cpsr.contains(CPSR::Z) || (cpsr.contains(CPSR::N) != cpsr.contains(CPSR::V)),
            AL | NV => true,
        }
    }
}

/// True when the condition field of `instr` holds in `cpsr`.
pub(crate) fn condition_passed(cpsr: CPSR, instr: u32) -> bool {
    ARMCondition::decode(instr).passed(cpsr)
}

/// Predict the address, state and predictability of the instruction after
/// `instr`, stepped from the state in `core`. `core.reg(15)` must be the
/// address `instr` was fetched from.
///
/// Scans the decode table in order and runs the first matching handler.
/// A word matching no entry takes the undefined-instruction trap. Entries in
/// the conditional encoding space return the linear sentinel without running
/// their handler when the condition fails.
pub fn next_address<C: StepSource, M: Mem32>(core: &C, mem: &M, instr: u32) -> NextAddr {
    for entry in DECODE_TABLE {
        if instr & entry.mask == entry.data {
            log::trace!("{:08X} => {:?}", instr, entry.handler);
            // Entries that fix the condition field to 0b1111 are the
            // unconditional space; everything else gates on the condition.
            if entry.mask >> 28 == 0 && !condition_passed(core.cpsr(), instr) {
                return NextAddr::linear();
            }
            return entry.handler.run(core, mem, instr);
        }
    }
    log::trace!("{:08X} matched no entry", instr);
    NextAddr::undefined()
}

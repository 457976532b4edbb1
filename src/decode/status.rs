/// Status register access: MRS/MSR in both the application and banked
/// encodings, the MSR immediate form, and CPS.
///
/// None of these write the PC directly, so almost everything here is linear;
/// what matters is classifying the UNPREDICTABLE and UNDEFINED corners. The
/// one exception is the banked MRS with Rd=15, which deposits the banked
/// value in the PC.

use crate::common::*;
use crate::core::{Mode, SecState, StepSource, SP_REG, LR_REG, PC_REG};
use super::NextAddr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusOp {
    Cps,
    MrsBanked,
    MsrBanked,
}

pub(super) fn run<C: StepSource>(core: &C, i: u32, op: StatusOp) -> NextAddr {
    match op {
        StatusOp::Cps => cps(i),
        StatusOp::MrsBanked => mrs_banked(core, i),
        StatusOp::MsrBanked => msr_banked(core, i),
    }
}

/// The banked-register encodings name their target with SYSm, rebuilt here
/// from the R bit's neighbour (bit 8 of the instruction carries SYSm[4]) and
/// the m field.
fn sysm(i: u32) -> u32 {
    let hi = if test_bit(i, 8) { 0x10 } else { 0 };
    hi | field(i, 16, 19)
}

/// Resolves a SYSm value to the banked register it names, as seen from
/// `mode`. Returns the register's current value, or None when the encoding
/// is not accessible (which the callers treat as UNPREDICTABLE).
fn banked_reg_value<C: StepSource>(core: &C, m: u32) -> Option<u32> {
    let mode = core.cpsr().mode()?;
    match field(m, 3, 4) {
        0 => {
            // 0b0_0nnn: Usr r8-r14.
            let n = (m & 7) as usize + 8;
            if n > 14 || !mode.is_exception_mode() {
                return None;
            }
            Some(core.banked_reg(Mode::Usr, n))
        }
        1 => {
            // 0b0_1nnn: Fiq r8-r14.
            let n = (m & 7) as usize + 8;
            if n > 14 || mode == Mode::Fiq || !mode.is_exception_mode() {
                return None;
            }
            if !fiq_regs_accessible(core) {
                return None;
            }
            Some(core.banked_reg(Mode::Fiq, n))
        }
        2 => {
            // 0b1_0mm r: LR/SP for Irq, Svc, Abt, Und.
            let target = [Mode::Irq, Mode::Svc, Mode::Abt, Mode::Und][field(m, 1, 2) as usize];
            if mode == target {
                return None;
            }
            let n = if test_bit(m, 0) { SP_REG } else { LR_REG };
            Some(core.banked_reg(target, n))
        }
        _ => match m & 7 {
            // 0b1_1100/0b1_1101: Mon LR/SP, Secure only.
            4 | 5 => {
                if core.sec_state() != SecState::Secure || mode == Mode::Mon {
                    return None;
                }
                let n = if test_bit(m, 0) { SP_REG } else { LR_REG };
                Some(core.banked_reg(Mode::Mon, n))
            }
            // 0b1_1110/0b1_1111: ELR_hyp and SP_hyp, Mon or Hyp only.
            6 | 7 => {
                if mode != Mode::Mon && mode != Mode::Hyp {
                    return None;
                }
                if test_bit(m, 0) {
                    Some(core.banked_reg(Mode::Hyp, SP_REG))
                } else {
                    Some(core.elr_hyp())
                }
            }
            _ => None,
        },
    }
}

fn mrs_banked<C: StepSource>(core: &C, i: u32) -> NextAddr {
    let rd = field(i, 12, 15) as usize;
    let value = if test_bit(i, 22) {
        banked_spsr_value(core, sysm(i))
    } else {
        banked_reg_value(core, sysm(i))
    };
    match value {
        Some(v) if rd == PC_REG => NextAddr::arm(v).unpredictable(),
        Some(_) => NextAddr::linear(),
        None => NextAddr::linear().unpredictable(),
    }
}

fn msr_banked<C: StepSource>(core: &C, i: u32) -> NextAddr {
    let rn = field(i, 0, 3) as usize;
    let accessible = if test_bit(i, 22) {
        banked_spsr_value(core, sysm(i)).is_some()
    } else {
        banked_reg_value(core, sysm(i)).is_some()
    };
    NextAddr::linear().unpredictable_if(rn == PC_REG || !accessible)
}

/// SPSR access through the banked encodings: SYSm names the owning mode.
fn banked_spsr_value<C: StepSource>(core: &C, m: u32) -> Option<u32> {
    let mode = core.cpsr().mode()?;
    let target = match m {
        0b0_1110 => Mode::Fiq,
        0b1_0000 => Mode::Irq,
        0b1_0010 => Mode::Svc,
        0b1_0100 => Mode::Abt,
        0b1_0110 => Mode::Und,
        0b1_1100 => Mode::Mon,
        0b1_1110 => Mode::Hyp,
        _ => return None,
    };
    if mode == target || !mode.is_exception_mode() {
        return None;
    }
    if target == Mode::Mon && core.sec_state() != SecState::Secure {
        return None;
    }
    if target == Mode::Hyp && mode != Mode::Mon {
        return None;
    }
    if target == Mode::Fiq && !fiq_regs_accessible(core) {
        return None;
    }
    Some(core.banked_spsr(target).bits())
}

/// NSACR.RFR reserves the FIQ bank for secure state.
fn fiq_regs_accessible<C: StepSource>(core: &C) -> bool {
    core.sec_state() == SecState::Secure || !test_bit(core.nsacr(), 19)
}

/// MRS into a general register (application and privileged forms).
pub(super) fn mrs_reg<C: StepSource>(core: &C, i: u32) -> NextAddr {
    let rd = field(i, 12, 15) as usize;
    if test_bit(i, 22) {
        // SPSR read: UNPREDICTABLE where no SPSR exists.
        let no_spsr = matches!(
            core.cpsr().mode(),
            None | Some(Mode::Usr) | Some(Mode::Sys)
        );
        if rd == PC_REG {
            NextAddr::arm(core.spsr().bits()).unpredictable()
        } else {
            NextAddr::linear().unpredictable_if(no_spsr)
        }
    } else if rd == PC_REG {
        NextAddr::arm(core.cpsr().bits()).unpredictable()
    } else {
        NextAddr::linear()
    }
}

/// MSR from a general register. CPSR writes never branch; only the
/// UNPREDICTABLE corners need classifying.
pub(super) fn msr_reg<C: StepSource>(core: &C, i: u32) -> NextAddr {
    let rn = field(i, 0, 3) as usize;
    let mask = field(i, 16, 19);
    let spsr = test_bit(i, 22);
    let no_spsr = matches!(
        core.cpsr().mode(),
        None | Some(Mode::Usr) | Some(Mode::Sys)
    );
    NextAddr::linear().unpredictable_if(rn == PC_REG || mask == 0 || (spsr && no_spsr))
}

/// MSR with a rotated immediate.
pub(super) fn msr_imm<C: StepSource>(core: &C, i: u32) -> NextAddr {
    let mask = field(i, 16, 19);
    let spsr = test_bit(i, 22);
    let no_spsr = matches!(
        core.cpsr().mode(),
        None | Some(Mode::Usr) | Some(Mode::Sys)
    );
    NextAddr::linear().unpredictable_if(mask == 0 || (spsr && no_spsr))
}

/// CPS changes interrupt masks and optionally the mode. It never branches,
/// and executes as a NOP from user mode; the malformed combinations are
/// UNPREDICTABLE.
fn cps(i: u32) -> NextAddr {
    let imod = field(i, 18, 19);
    let m = test_bit(i, 17);
    let mode_field = field(i, 0, 4);
    let unpred = (imod == 0 && !m)
        || (imod == 1)
        || (!m && mode_field != 0)
        || (m && Mode::from_bits(mode_field).is_none());
    NextAddr::linear().unpredictable_if(unpred)
}

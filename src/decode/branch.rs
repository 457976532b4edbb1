/// Branch and exception-generator handlers.

use crate::common::*;
use crate::core::{Mode, SecState, StepSource, LR_REG, PC_REG};
use crate::memory::Mem32;
use super::{condition_passed, NextAddr};
use super::alu::read_reg;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BranchOp {
    B,
    Bl,
    BlxImm,
    BxReg,
    BlxReg,
    BxjReg,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExcOp {
    Eret,
    Bkpt,
    Hvc,
    Smc,
    Svc,
    Udf,
    Rfe,
    Srs,
}

pub(super) fn branch<C: StepSource>(core: &C, i: u32, op: BranchOp) -> NextAddr {
    if !condition_passed(core.cpsr(), i) {
        return NextAddr::linear();
    }
    let pc = core.reg(PC_REG);
    let offset = (sign_extend(field(i, 0, 23), 24) << 2) as u32;
    match op {
        BranchOp::B | BranchOp::Bl => {
            NextAddr::arm(pc.wrapping_add(8).wrapping_add(offset))
        }
        BranchOp::BlxImm => {
            // The H bit gives the extra halfword of the Thumb target.
            let h = field(i, 24, 24) << 1;
            NextAddr::thumb(pc.wrapping_add(8).wrapping_add(offset).wrapping_add(h))
        }
        BranchOp::BxReg | BranchOp::BlxReg | BranchOp::BxjReg => {
            let rm = field(i, 0, 3) as usize;
            let target = read_reg(core, rm);
            // A target with bit 1 set and bit 0 clear cannot interwork;
            // the step stays linear with the overlay.
            if target & 3 == 2 {
                NextAddr::linear().unpredictable()
            } else {
                NextAddr::from_target(target).unpredictable_if(rm == PC_REG)
            }
        }
    }
}

pub(super) fn exception<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, op: ExcOp) -> NextAddr {
    match op {
        ExcOp::Eret => eret(core),
        ExcOp::Bkpt => NextAddr::linear(),
        ExcOp::Hvc => hvc(core),
        ExcOp::Smc => smc(core),
        // The step lands inside the exception handler's world; from the
        // stepped program's point of view it resumes linearly.
        ExcOp::Svc => NextAddr::linear(),
        ExcOp::Udf => NextAddr::undefined(),
        ExcOp::Rfe => rfe(core, mem, i),
        ExcOp::Srs => srs(core, i),
    }
}

fn eret<C: StepSource>(core: &C) -> NextAddr {
    match core.cpsr().mode() {
        Some(Mode::Hyp) => NextAddr::arm(core.elr_hyp()).unpredictable(),
        Some(Mode::Usr) | Some(Mode::Sys) | None => NextAddr::undefined(),
        _ => NextAddr::arm(core.reg(LR_REG)),
    }
}

fn hvc<C: StepSource>(core: &C) -> NextAddr {
    if core.sec_state() == SecState::Secure || core.cpsr().mode() == Some(Mode::Usr) {
        return NextAddr::undefined();
    }
    // SCR.HCE gates the hypervisor call.
    if !test_bit(core.scr(), 8) {
        NextAddr::undefined()
    } else {
        NextAddr::linear()
    }
}

fn smc<C: StepSource>(core: &C) -> NextAddr {
    if core.cpsr().mode() == Some(Mode::Usr) {
        return NextAddr::undefined();
    }
    let non_secure = core.sec_state() == SecState::NonSecure;
    if non_secure && test_bit(core.hcr(), 19) {
        // HCR.TSC traps the call to Hyp; still a step off this instruction.
        NextAddr::linear()
    } else if non_secure && test_bit(core.scr(), 7) {
        // SCR.SCD disables SMC outside secure state.
        NextAddr::undefined()
    } else {
        NextAddr::linear()
    }
}

fn rfe<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32) -> NextAddr {
    if core.cpsr().mode() == Some(Mode::Hyp) {
        return NextAddr::undefined();
    }
    let base = core.reg(field(i, 16, 19) as usize);
    // The PC slot per addressing sub-mode; the saved CPSR is the word above.
    let addr = match (test_bit(i, 24), test_bit(i, 23)) {
        (false, false) => base.wrapping_sub(4), // DA
        (false, true) => base,                  // IA
        (true, false) => base.wrapping_sub(8),  // DB
        (true, true) => base.wrapping_add(4),   // IB
    };
    let target = mem.load_word(addr);
    let saved_cpsr = mem.load_word(addr.wrapping_add(4));
    let out = if test_bit(saved_cpsr, 5) {
        NextAddr::thumb(target & !1)
    } else {
        NextAddr::arm(target & !3)
    };
    out.unpredictable_if(core.cpsr().mode() == Some(Mode::Usr))
}

fn srs<C: StepSource>(core: &C, i: u32) -> NextAddr {
    let mode = core.cpsr().mode();
    if mode == Some(Mode::Hyp) {
        return NextAddr::undefined();
    }
    let non_secure = core.sec_state() == SecState::NonSecure;
    let target_mode = Mode::from_bits(field(i, 0, 4));
    let unpred = matches!(mode, Some(Mode::Usr) | Some(Mode::Sys))
        || target_mode == Some(Mode::Hyp)
        || target_mode.is_none()
        || (target_mode == Some(Mode::Mon) && non_secure)
        || (target_mode == Some(Mode::Fiq) && non_secure && test_bit(core.nsacr(), 19));
    NextAddr::linear().unpredictable_if(unpred)
}

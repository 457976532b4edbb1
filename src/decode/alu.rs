/// Data-processing handlers.
///
/// Only a PC destination can redirect execution, so every handler here
/// declines with the linear sentinel first and evaluates the operation over
/// the snapshot only when Rd is the PC.

use crate::common::*;
use crate::core::{CPSR, Mode, StepSource, PC_REG};
use super::NextAddr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AluOp {
    And, Eor, Sub, Rsb, Add, Adc, Sbc, Rsc, Orr, Bic, Mov, Mvn,
    Tst, Teq, Cmp, Cmn,
    /// ADR, the ADD and SUB encodings with Rn = PC and S clear.
    AdrAdd, AdrSub,
}

/// The MOV/shift opcode's concrete forms. The multiplexer resolves the
/// ambiguous LSL#0 (MOV) and ROR#0 (RRX) encodings before we get here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShiftOp {
    MovReg,
    LslImm, LsrImm, AsrImm, RorImm, Rrx,
    LslReg, LsrReg, AsrReg, RorReg,
}

impl ShiftOp {
    fn shifts_by_register(self) -> bool {
        matches!(self, ShiftOp::LslReg | ShiftOp::LsrReg | ShiftOp::AsrReg | ShiftOp::RorReg)
    }
}

/// Register read with the pipeline offset: the PC reads as the address of
/// the current instruction plus 8.
pub(super) fn read_reg<C: StepSource>(core: &C, n: usize) -> u32 {
    if n == PC_REG {
        core.reg(PC_REG).wrapping_add(8)
    } else {
        core.reg(n)
    }
}

/// Shift-by-immediate operand, with the zero-amount special encodings:
/// LSR #0 means LSR #32, ASR #0 means ASR #32, ROR #0 means RRX.
pub(super) fn shift_imm_operand<C: StepSource>(core: &C, i: u32) -> u32 {
    let rm = read_reg(core, field(i, 0, 3) as usize);
    let amount = field(i, 7, 11);
    match field(i, 5, 6) {
        0b00 => rm << amount,
        0b01 => if amount == 0 { 0 } else { rm >> amount },
        0b10 => {
            let by = if amount == 0 { 31 } else { amount };
            ((rm as i32) >> by) as u32
        }
        _ => {
            if amount == 0 {
                (core.cpsr().carry() << 31) | (rm >> 1)
            } else {
                rm.rotate_right(amount)
            }
        }
    }
}

/// Register-shifted-register operand: the amount is the low byte of Rs,
/// shifts of 32 or more saturate per shift kind.
pub(super) fn shift_reg_operand<C: StepSource>(core: &C, i: u32) -> u32 {
    let rm = read_reg(core, field(i, 0, 3) as usize);
    let amount = core.reg(field(i, 8, 11) as usize) & 0xFF;
    match field(i, 5, 6) {
        0b00 => if amount >= 32 { 0 } else { rm << amount },
        0b01 => if amount >= 32 { 0 } else { rm >> amount },
        0b10 => ((rm as i32) >> std::cmp::min(amount, 31)) as u32,
        _ => rm.rotate_right(amount & 0x1F),
    }
}

/// Rotated-immediate operand.
fn imm_operand(i: u32) -> u32 {
    field(i, 0, 7).rotate_right(field(i, 8, 11) * 2)
}

/// Exception return: an S-bit data op (or LDM with restore) writing the PC.
/// User and System have no SPSR, so the step traps to the SVC vector; Hyp
/// must use ERET instead.
pub(super) fn exception_return<C: StepSource>(core: &C, result: u32) -> NextAddr {
    match core.cpsr().mode() {
        Some(Mode::Usr) | Some(Mode::Sys) => NextAddr::arm(0x8).unpredictable(),
        Some(Mode::Hyp) => NextAddr::undefined(),
        _ => {
            if core.spsr().contains(CPSR::T) {
                NextAddr::thumb(result & !1)
            } else {
                NextAddr::arm(result & !3)
            }
        }
    }
}

/// Classify a value computed into the PC: the S bit selects the
/// exception-return path, otherwise the target's low bits pick the state.
fn pc_result<C: StepSource>(core: &C, i: u32, result: u32, unpred: bool) -> NextAddr {
    let out = if test_bit(i, 20) {
        exception_return(core, result)
    } else {
        NextAddr::from_target(result)
    };
    out.unpredictable_if(unpred)
}

fn eval(op: AluOp, a: u32, b: u32, cpsr: CPSR) -> Option<u32> {
    use AluOp::*;
    let borrow = 1 - cpsr.carry();
    Some(match op {
        And => a & b,
        Eor => a ^ b,
        Sub => a.wrapping_sub(b),
        Rsb => b.wrapping_sub(a),
        Add => a.wrapping_add(b),
        Adc => a.wrapping_add(b).wrapping_add(cpsr.carry()),
        Sbc => a.wrapping_sub(b).wrapping_sub(borrow),
        Rsc => b.wrapping_sub(a).wrapping_sub(borrow),
        Orr => a | b,
        Bic => a & !b,
        Mov | AdrAdd => b,
        Mvn => !b,
        AdrSub => b,
        Tst | Teq | Cmp | Cmn => return None,
    })
}

fn data_common<C: StepSource>(core: &C, i: u32, op: AluOp, op2: u32, unpred: bool) -> NextAddr {
    if field(i, 12, 15) as usize != PC_REG {
        return NextAddr::linear();
    }
    let a = match op {
        // ADR reads the PC aligned down to a word boundary.
        AluOp::AdrAdd | AluOp::AdrSub => read_reg(core, PC_REG) & !3,
        _ => read_reg(core, field(i, 16, 19) as usize),
    };
    let b = match op {
        AluOp::AdrAdd => a.wrapping_add(op2),
        AluOp::AdrSub => a.wrapping_sub(op2),
        _ => op2,
    };
    match eval(op, a, b, core.cpsr()) {
        Some(result) => pc_result(core, i, result, unpred),
        // Compares have no destination.
        None => NextAddr::linear(),
    }
}

pub(super) fn data_imm<C: StepSource>(core: &C, i: u32, op: AluOp) -> NextAddr {
    data_common(core, i, op, imm_operand(i), false)
}

pub(super) fn data_reg<C: StepSource>(core: &C, i: u32, op: AluOp) -> NextAddr {
    data_common(core, i, op, shift_imm_operand(core, i), false)
}

/// Register-shifted-register forms: a PC destination is architecturally
/// UNPREDICTABLE on top of whatever the computed target says.
pub(super) fn data_rsr<C: StepSource>(core: &C, i: u32, op: AluOp) -> NextAddr {
    data_common(core, i, op, shift_reg_operand(core, i), true)
}

/// The MOV/shift forms (MOV, LSL, LSR, ASR, ROR, RRX).
pub(super) fn shift_move<C: StepSource>(core: &C, i: u32, op: ShiftOp) -> NextAddr {
    if field(i, 12, 15) as usize != PC_REG {
        return NextAddr::linear();
    }
    let by_reg = op.shifts_by_register();
    let result = if by_reg {
        shift_reg_operand(core, i)
    } else {
        shift_imm_operand(core, i)
    };
    pc_result(core, i, result, by_reg)
}

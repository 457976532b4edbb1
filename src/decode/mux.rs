/// Secondary decode for encodings the table cannot split by mask alone:
/// a field inside the instruction picks which form it really is, so a rule
/// here inspects that field and hands off to the concrete handler.

use crate::common::*;
use crate::core::StepSource;
use super::NextAddr;
use super::alu::{self, ShiftOp};
use super::status;
use super::vfp::{self, VElemOp};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MuxRule {
    /// WFE/WFI, split on bit 0.
    WfeWfi,
    /// Shift-by-immediate with type 00: amount 0 is MOV (register).
    LslIMov,
    /// The same encoding with Rd = PC.
    LslIMovPc,
    /// Shift-by-immediate with type 11: amount 0 is RRX.
    RorIRrx,
    /// MSR (register) in the privileged space.
    MsrRPr,
    /// MRS in the privileged space.
    MrsRPr,
    /// MSR (immediate), or the hint space when the mask field is zero.
    MsrIPrHints,
    /// One-register modified immediate, op 0: VORR or VMOV by cmode.
    VorrIVmovI,
    /// One-register modified immediate, op 1: VBIC or VMVN by cmode.
    VbicVmvn,
    /// Shift-right narrow against the Q register forms.
    VshrnQImm,
    VrshrnQImm,
    /// VSHLL by immediate, or VMOVL when the shift is the full width.
    VshllIVmovl,
    /// VMOVN against VQMOVN/VQMOVUN.
    VmovnQ,
    /// VORR (register), which is VMOV when Vn = Vm.
    VorrVmovNm,
    /// VST1-4 multiple structures, split on the type field.
    VstType,
    /// VLD1-4 multiple structures.
    VldType,
}

pub(super) fn run<C: StepSource>(core: &C, i: u32, rule: MuxRule) -> NextAddr {
    use MuxRule::*;
    match rule {
        WfeWfi => NextAddr::linear(),
        LslIMov | LslIMovPc => {
            let op = if field(i, 7, 11) == 0 { ShiftOp::MovReg } else { ShiftOp::LslImm };
            alu::shift_move(core, i, op)
        }
        RorIRrx => {
            let op = if field(i, 7, 11) == 0 { ShiftOp::Rrx } else { ShiftOp::RorImm };
            alu::shift_move(core, i, op)
        }
        MsrRPr => status::msr_reg(core, i),
        MrsRPr => status::mrs_reg(core, i),
        MsrIPrHints => {
            if field(i, 16, 19) != 0 {
                return status::msr_imm(core, i);
            }
            // Mask field zero: the hint space.
            match field(i, 0, 7) {
                // NOP, YIELD, WFE, WFI, SEV.
                0x00..=0x04 => NextAddr::linear(),
                // DBG.
                0xF0..=0xFF => NextAddr::linear(),
                _ => NextAddr::undefined(),
            }
        }
        VorrIVmovI => NextAddr::linear(),
        VbicVmvn => {
            // op 1 with cmode 1111 has no encoding.
            if field(i, 8, 11) == 0b1111 {
                NextAddr::undefined()
            } else {
                NextAddr::linear()
            }
        }
        VshrnQImm | VrshrnQImm | VshllIVmovl | VmovnQ | VorrVmovNm => NextAddr::linear(),
        VstType | VldType => {
            let regs = match vfp::structure_regs(field(i, 8, 11)) {
                Some(n) => n,
                None => return NextAddr::undefined(),
            };
            let op = if rule == VstType {
                VElemOp::VstMult(regs)
            } else {
                VElemOp::VldMult(regs)
            };
            vfp::elem_ldst(core, i, op)
        }
    }
}

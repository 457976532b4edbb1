/// Floating-point and Advanced SIMD handlers.
///
/// The extension register file never feeds the PC directly, so most of this
/// family only produces a jump through two doors: a core-register transfer
/// whose destination is the PC, or an addressing writeback on a PC base.

use crate::common::*;
use crate::core::{FpSysReg, StepSource, SP_REG, PC_REG};
use super::NextAddr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VfpLdstOp {
    Vldr, Vstr, Vpush, Vpop, Vldm, Vstm,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VElemOp {
    /// VST1/2/3/4 multiple structures; payload is the register count.
    VstMult(u32),
    /// VLD1/2/3/4 multiple structures.
    VldMult(u32),
    VstOne,
    VldOne,
    VldAll,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VXferOp {
    VmovS, VmovSs, VmovD, VmovDx, VmovDtDx, Vdup,
    VmrsFpscr, VmrsR, VmsrFpscr, VmsrR,
}

pub(super) fn ext_ldst<C: StepSource>(core: &C, i: u32, op: VfpLdstOp) -> NextAddr {
    let rn = field(i, 16, 19) as usize;
    match op {
        VfpLdstOp::Vldr | VfpLdstOp::Vstr => NextAddr::linear(),
        VfpLdstOp::Vpush | VfpLdstOp::Vpop => {
            NextAddr::linear().unpredictable_if(bad_reg_range(i))
        }
        VfpLdstOp::Vldm | VfpLdstOp::Vstm => {
            let puw = (field(i, 23, 24) << 1) | bit_u32(i, 21);
            // P=0,U=0,W=1 and P=1,U=1,W=1 have no VLDM/VSTM meaning.
            if puw == 0b001 || puw == 0b111 {
                return NextAddr::undefined();
            }
            if !test_bit(i, 21) || rn != PC_REG {
                return NextAddr::linear().unpredictable_if(bad_reg_range(i));
            }
            // Writeback on a PC base: the step lands on the updated base.
            let delta = 4 * field(i, 0, 7);
            let base = core.reg(rn);
            let target = if test_bit(i, 23) {
                base.wrapping_add(delta)
            } else {
                base.wrapping_sub(delta)
            };
            NextAddr::from_target(target).unpredictable()
        }
    }
}

fn bit_u32(i: u32, n: usize) -> u32 {
    if test_bit(i, n) { 1 } else { 0 }
}

/// Register-list checks shared by the multi-register forms: an empty list,
/// or a doubleword list running past D31.
fn bad_reg_range(i: u32) -> bool {
    let imm8 = field(i, 0, 7);
    if imm8 == 0 {
        return true;
    }
    if test_bit(i, 8) {
        // Doubleword list: imm8 is twice the register count.
        let d = (bit_u32(i, 22) << 4) | field(i, 12, 15);
        imm8 % 2 != 0 || d + imm8 / 2 > 32
    } else {
        let d = (field(i, 12, 15) << 1) | bit_u32(i, 22);
        d + imm8 > 32
    }
}

pub(super) fn elem_ldst<C: StepSource>(core: &C, i: u32, op: VElemOp) -> NextAddr {
    // Transfer length in bytes, and the per-form size checks.
    let length = match op {
        VElemOp::VstMult(regs) | VElemOp::VldMult(regs) => {
            if field(i, 6, 7) == 0b11 && field(i, 4, 5) != 0 {
                // Reserved alignment with 64-bit elements.
                return NextAddr::undefined();
            }
            8 * regs
        }
        VElemOp::VstOne | VElemOp::VldOne => {
            let size = field(i, 10, 11);
            if size == 0b11 {
                return NextAddr::undefined();
            }
            (field(i, 8, 9) + 1) << size
        }
        VElemOp::VldAll => {
            let size = field(i, 6, 7);
            if size == 0b11 {
                return NextAddr::undefined();
            }
            (field(i, 8, 9) + 1) << size
        }
    };
    let rn = field(i, 16, 19) as usize;
    let rm = field(i, 0, 3) as usize;
    if rm == PC_REG {
        // No-writeback form: the base never updates.
        return NextAddr::linear().unpredictable_if(rn == PC_REG);
    }
    if rn != PC_REG {
        return NextAddr::linear();
    }
    // Writeback on a PC base. Rm=R13 advances by the transfer length, any
    // other Rm by that register's value.
    let advance = if rm == SP_REG { length } else { core.reg(rm) };
    NextAddr::from_target(core.reg(rn).wrapping_add(advance)).unpredictable()
}

/// How many consecutive structure registers a multiple-structures `type`
/// field transfers per element.
pub(super) fn structure_regs(itype: u32) -> Option<u32> {
    match itype {
        0b0010 | 0b0110 | 0b0111 | 0b1010 => Some(1),
        0b0011 | 0b1000 | 0b1001 => Some(2),
        0b0100 | 0b0101 => Some(3),
        0b0000 | 0b0001 => Some(4),
        _ => None,
    }
}

pub(super) fn xfer<C: StepSource>(core: &C, i: u32, op: VXferOp) -> NextAddr {
    let to_core = test_bit(i, 20);
    match op {
        VXferOp::VmovS => {
            let rt = field(i, 12, 15) as usize;
            if rt != PC_REG {
                return NextAddr::linear();
            }
            if !to_core {
                return NextAddr::linear().unpredictable();
            }
            let sn = ((field(i, 16, 19) << 1) | bit_u32(i, 7)) as usize;
            NextAddr::arm(core.vreg(sn)).unpredictable()
        }
        VXferOp::VmovSs | VXferOp::VmovD => two_reg_xfer(core, i, op),
        VXferOp::VmovDx => {
            // Core to scalar; the core register is a source, never written.
            let rt = field(i, 12, 15) as usize;
            NextAddr::linear().unpredictable_if(rt == PC_REG)
        }
        VXferOp::VmovDtDx => {
            let rt = field(i, 12, 15) as usize;
            if rt != PC_REG {
                return NextAddr::linear();
            }
            NextAddr::arm(scalar_value(core, i)).unpredictable()
        }
        VXferOp::Vdup => {
            let rt = field(i, 12, 15) as usize;
            NextAddr::linear().unpredictable_if(rt == PC_REG)
        }
        VXferOp::VmrsFpscr => {
            // VMRS APSR_nzcv, FPSCR: Rt=15 writes the flags, not the PC.
            NextAddr::linear()
        }
        VXferOp::VmrsR => {
            let reg = match field(i, 16, 19) {
                0b0000 => FpSysReg::Fpsid,
                0b0001 => FpSysReg::Fpscr,
                0b0110 => FpSysReg::Mvfr1,
                0b0111 => FpSysReg::Mvfr0,
                0b1000 => FpSysReg::Fpexc,
                _ => return NextAddr::undefined(),
            };
            let rt = field(i, 12, 15) as usize;
            if rt == PC_REG {
                NextAddr::arm(core.read_fpsys(reg)).unpredictable()
            } else {
                NextAddr::linear()
            }
        }
        VXferOp::VmsrFpscr | VXferOp::VmsrR => {
            if op == VXferOp::VmsrR
                && !matches!(field(i, 16, 19), 0b0000 | 0b0001 | 0b1000)
            {
                return NextAddr::undefined();
            }
            let rt = field(i, 12, 15) as usize;
            NextAddr::linear().unpredictable_if(rt == PC_REG)
        }
    }
}

/// VMOV between two core registers and two S registers or one D register.
fn two_reg_xfer<C: StepSource>(core: &C, i: u32, op: VXferOp) -> NextAddr {
    let to_core = test_bit(i, 20);
    let rt = field(i, 12, 15) as usize;
    let rt2 = field(i, 16, 19) as usize;
    if rt != PC_REG && rt2 != PC_REG {
        return NextAddr::linear();
    }
    if !to_core {
        return NextAddr::linear().unpredictable();
    }
    let (lo, hi) = match op {
        VXferOp::VmovSs => {
            let sm = ((field(i, 0, 3) << 1) | bit_u32(i, 5)) as usize;
            if sm + 1 > 31 {
                return NextAddr::linear().unpredictable();
            }
            (core.vreg(sm), core.vreg(sm + 1))
        }
        _ => {
            let dm = ((bit_u32(i, 5) << 4) | field(i, 0, 3)) as usize;
            (core.vreg(2 * dm), core.vreg(2 * dm + 1))
        }
    };
    // Rt takes the low word, Rt2 the high word; Rt2=PC wins the tie.
    let value = if rt2 == PC_REG { hi } else { lo };
    NextAddr::arm(value).unpredictable()
}

/// VMOV core <- Dd[x]: extract the scalar named by the opc1/opc2 size
/// encoding, sign or zero extended by the U bit.
fn scalar_value<C: StepSource>(core: &C, i: u32) -> u32 {
    let u = test_bit(i, 23);
    let opc1 = field(i, 21, 22);
    let opc2 = field(i, 5, 6);
    let dn = ((bit_u32(i, 7) << 4) | field(i, 16, 19)) as usize;
    let dword = make_64(core.vreg(2 * dn + 1), core.vreg(2 * dn));
    if test_bit(opc1, 1) {
        // Byte lane: opc1[0]:opc2 picks one of eight.
        let lane = (((opc1 & 1) << 2) | opc2) as u64;
        let byte = ((dword >> (8 * lane)) & 0xFF) as u32;
        if u { byte } else { byte as u8 as i8 as i32 as u32 }
    } else if test_bit(opc2, 0) {
        // Halfword lane: opc1[0]:opc2[1] picks one of four.
        let lane = (((opc1 & 1) << 1) | (opc2 >> 1)) as u64;
        let half = ((dword >> (16 * lane)) & 0xFFFF) as u32;
        if u { half } else { half as u16 as i16 as i32 as u32 }
    } else {
        // Word lane: opc1[0] picks one of two. U must be 0 here; the
        // table only routes the valid encodings this far.
        (dword >> (32 * (opc1 & 1) as u64)) as u32
    }
}

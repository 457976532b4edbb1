/// Media handlers: saturating arithmetic, parallel add/subtract, pack and
/// extend, bitfields and the misc group.
///
/// All of these share the multiply-family gate: only a PC destination moves
/// the step, and doing so is UNPREDICTABLE.

use crate::common::*;
use crate::core::{StepSource, PC_REG};
use super::NextAddr;
use super::alu::read_reg;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SatOp {
    Qadd, Qsub, Qdadd, Qdsub,
    Ssat, Usat, Ssat16, Usat16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParPrefix {
    S, Q, Sh, U, Uq, Uh,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParKind {
    Add16, Asx, Sax, Sub16, Add8, Sub8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PackOp {
    Pkh,
    Sxtb16, Sxtb, Sxth,
    Uxtb16, Uxtb, Uxth,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MiscOp {
    Movw, Movt, Clz,
    Bfc, Bfi, Rbit, Rev, Rev16, Revsh,
    Sbfx, Ubfx, Sel,
    Usad8, Usada8,
}

fn pc_dest(result: u32) -> NextAddr {
    NextAddr::arm(result).unpredictable()
}

pub(super) fn saturating<C: StepSource>(core: &C, i: u32, op: SatOp) -> NextAddr {
    if field(i, 12, 15) as usize != PC_REG {
        return NextAddr::linear();
    }
    let result = match op {
        SatOp::Qadd | SatOp::Qsub | SatOp::Qdadd | SatOp::Qdsub => {
            let m = read_reg(core, field(i, 0, 3) as usize) as i32 as i64;
            let n = read_reg(core, field(i, 16, 19) as usize) as i32 as i64;
            match op {
                SatOp::Qadd => ssat_64(m + n) as u32,
                SatOp::Qsub => ssat_64(m - n) as u32,
                // The doubling saturates before the add/subtract.
                SatOp::Qdadd => ssat_64(m + ssat_64(2 * n) as i64) as u32,
                _ => ssat_64(m - ssat_64(2 * n) as i64) as u32,
            }
        }
        SatOp::Ssat | SatOp::Usat => {
            let rm = read_reg(core, field(i, 0, 3) as usize);
            let amount = field(i, 7, 11);
            let operand = if test_bit(i, 6) {
                // ASR; amount 0 encodes ASR #32, a full sign fill.
                let by = if amount == 0 { 31 } else { amount };
                (rm as i32) >> by
            } else {
                (rm << amount) as i32
            };
            if op == SatOp::Ssat {
                ssat(operand, field(i, 16, 20) as usize + 1) as u32
            } else {
                usat(operand, field(i, 16, 20) as usize)
            }
        }
        SatOp::Ssat16 => {
            let rm = read_reg(core, field(i, 0, 3) as usize);
            let width = field(i, 16, 19) as usize + 1;
            pack_16(
                ssat(hi_signed_16(rm), width) as u32,
                ssat(lo_signed_16(rm), width) as u32,
            )
        }
        SatOp::Usat16 => {
            let rm = read_reg(core, field(i, 0, 3) as usize);
            let width = field(i, 16, 19) as usize;
            pack_16(usat(hi_signed_16(rm), width), usat(lo_signed_16(rm), width))
        }
    };
    pc_dest(result)
}

/// One parallel lane: width-bit result of `v` per the variant.
fn par_lane(prefix: ParPrefix, v: i32, width: usize) -> u32 {
    let mask = if width == 16 { 0xFFFF } else { 0xFF };
    match prefix {
        ParPrefix::S | ParPrefix::U => (v as u32) & mask,
        ParPrefix::Q => (ssat(v, width) as u32) & mask,
        ParPrefix::Uq => usat(v, width),
        ParPrefix::Sh | ParPrefix::Uh => ((v >> 1) as u32) & mask,
    }
}

pub(super) fn parallel<C: StepSource>(
    core: &C,
    i: u32,
    prefix: ParPrefix,
    kind: ParKind,
) -> NextAddr {
    if field(i, 12, 15) as usize != PC_REG {
        return NextAddr::linear();
    }
    let n = read_reg(core, field(i, 16, 19) as usize);
    let m = read_reg(core, field(i, 0, 3) as usize);
    let signed = matches!(prefix, ParPrefix::S | ParPrefix::Q | ParPrefix::Sh);
    let h = |v: u32, top: bool| -> i32 {
        match (signed, top) {
            (true, false) => lo_signed_16(v),
            (true, true) => hi_signed_16(v),
            (false, false) => (v & 0xFFFF) as i32,
            (false, true) => (v >> 16) as i32,
        }
    };
    let b = |v: u32, k: usize| -> i32 {
        if signed { signed_byte(v, k) } else { byte_of(v, k) as i32 }
    };
    let result = match kind {
        ParKind::Add16 => pack_16(
            par_lane(prefix, h(n, true) + h(m, true), 16),
            par_lane(prefix, h(n, false) + h(m, false), 16),
        ),
        ParKind::Sub16 => pack_16(
            par_lane(prefix, h(n, true) - h(m, true), 16),
            par_lane(prefix, h(n, false) - h(m, false), 16),
        ),
        // Exchange forms cross the operand halfwords.
        ParKind::Asx => pack_16(
            par_lane(prefix, h(n, true) + h(m, false), 16),
            par_lane(prefix, h(n, false) - h(m, true), 16),
        ),
        ParKind::Sax => pack_16(
            par_lane(prefix, h(n, true) - h(m, false), 16),
            par_lane(prefix, h(n, false) + h(m, true), 16),
        ),
        ParKind::Add8 => pack_8(
            par_lane(prefix, b(n, 3) + b(m, 3), 8),
            par_lane(prefix, b(n, 2) + b(m, 2), 8),
            par_lane(prefix, b(n, 1) + b(m, 1), 8),
            par_lane(prefix, b(n, 0) + b(m, 0), 8),
        ),
        ParKind::Sub8 => pack_8(
            par_lane(prefix, b(n, 3) - b(m, 3), 8),
            par_lane(prefix, b(n, 2) - b(m, 2), 8),
            par_lane(prefix, b(n, 1) - b(m, 1), 8),
            par_lane(prefix, b(n, 0) - b(m, 0), 8),
        ),
    };
    pc_dest(result)
}

pub(super) fn pack_extend<C: StepSource>(core: &C, i: u32, op: PackOp) -> NextAddr {
    if field(i, 12, 15) as usize != PC_REG {
        return NextAddr::linear();
    }
    let rn = field(i, 16, 19) as usize;
    let n = read_reg(core, rn);
    let m = read_reg(core, field(i, 0, 3) as usize);
    // The extend forms rotate by a whole number of bytes first; their
    // accumulate variants kick in when Rn names a register.
    let rotated = m.rotate_right(field(i, 10, 11) * 8);
    let accumulate = rn != PC_REG;
    let result = match op {
        PackOp::Pkh => {
            let amount = field(i, 7, 11);
            if test_bit(i, 6) {
                // PKHTB; amount 0 encodes ASR #32.
                let by = if amount == 0 { 31 } else { amount };
                pack_16(n >> 16, (((m as i32) >> by) as u32) & 0xFFFF)
            } else {
                pack_16((m << amount) >> 16, n & 0xFFFF)
            }
        }
        PackOp::Sxtb => {
            let v = signed_byte(rotated, 0) as u32;
            if accumulate { n.wrapping_add(v) } else { v }
        }
        PackOp::Sxth => {
            let v = sign_extend(rotated & 0xFFFF, 16) as u32;
            if accumulate { n.wrapping_add(v) } else { v }
        }
        PackOp::Uxtb => {
            let v = rotated & 0xFF;
            if accumulate { n.wrapping_add(v) } else { v }
        }
        PackOp::Uxth => {
            let v = rotated & 0xFFFF;
            if accumulate { n.wrapping_add(v) } else { v }
        }
        PackOp::Sxtb16 => {
            let lo = signed_byte(rotated, 0) as u32;
            let hi = signed_byte(rotated, 2) as u32;
            if accumulate {
                pack_16((n >> 16).wrapping_add(hi), (n & 0xFFFF).wrapping_add(lo))
            } else {
                pack_16(hi, lo)
            }
        }
        PackOp::Uxtb16 => {
            let lo = byte_of(rotated, 0);
            let hi = byte_of(rotated, 2);
            if accumulate {
                pack_16((n >> 16).wrapping_add(hi), (n & 0xFFFF).wrapping_add(lo))
            } else {
                pack_16(hi, lo)
            }
        }
    };
    pc_dest(result)
}

pub(super) fn misc<C: StepSource>(core: &C, i: u32, op: MiscOp) -> NextAddr {
    // USAD places its destination in the multiply position.
    let rd = match op {
        MiscOp::Usad8 | MiscOp::Usada8 => field(i, 16, 19) as usize,
        _ => field(i, 12, 15) as usize,
    };
    if rd != PC_REG {
        return NextAddr::linear();
    }
    let m = read_reg(core, field(i, 0, 3) as usize);
    let result = match op {
        MiscOp::Movw => (field(i, 16, 19) << 12) | field(i, 0, 11),
        MiscOp::Movt => {
            let imm = (field(i, 16, 19) << 12) | field(i, 0, 11);
            (read_reg(core, rd) & 0xFFFF) | (imm << 16)
        }
        MiscOp::Clz => m.leading_zeros(),
        MiscOp::Bfc | MiscOp::Bfi => {
            let lsb = field(i, 7, 11) as usize;
            let msb = field(i, 16, 20) as usize;
            if msb < lsb {
                return NextAddr::linear().unpredictable();
            }
            let mask = bits(lsb, msb);
            let kept = read_reg(core, rd) & !mask;
            if op == MiscOp::Bfc {
                kept
            } else {
                kept | ((m << lsb) & mask)
            }
        }
        MiscOp::Rbit => m.reverse_bits(),
        MiscOp::Rev => m.swap_bytes(),
        MiscOp::Rev16 => ((m & 0xFF00_FF00) >> 8) | ((m & 0x00FF_00FF) << 8),
        MiscOp::Revsh => sign_extend(((m & 0xFF) << 8) | ((m >> 8) & 0xFF), 16) as u32,
        MiscOp::Sbfx | MiscOp::Ubfx => {
            let lsb = field(i, 7, 11) as usize;
            let width = field(i, 16, 20) as usize + 1;
            if lsb + width > 32 {
                return NextAddr::linear().unpredictable();
            }
            let v = (m >> lsb) & (bits(0, width - 1));
            if op == MiscOp::Sbfx { sign_extend(v, width) as u32 } else { v }
        }
        MiscOp::Sel => {
            let n = read_reg(core, field(i, 16, 19) as usize);
            let cpsr = core.cpsr();
            let mut out = 0;
            for k in 0..4 {
                let src = if cpsr.ge(k) { n } else { m };
                out |= (byte_of(src, k)) << (k * 8);
            }
            out
        }
        MiscOp::Usad8 | MiscOp::Usada8 => {
            let n = read_reg(core, field(i, 0, 3) as usize);
            let m2 = read_reg(core, field(i, 8, 11) as usize);
            let sum: u32 = (0..4)
                .map(|k| (byte_of(n, k) as i32 - byte_of(m2, k) as i32).unsigned_abs())
                .sum();
            if op == MiscOp::Usada8 {
                sum.wrapping_add(read_reg(core, field(i, 12, 15) as usize))
            } else {
                sum
            }
        }
    };
    pc_dest(result)
}

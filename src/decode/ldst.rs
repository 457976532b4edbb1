/// Load/store handlers.
///
/// Two things can move the step here: a load whose transfer register is the
/// PC (the loaded value becomes the target) and an addressing writeback
/// whose base register is the PC (the updated base becomes the target).
/// Writeback is modeled as happening after the load, so when both apply the
/// writeback value wins. Non-linear results go through interworking target
/// selection.

use crate::common::*;
use crate::core::{Mode, StepSource, SP_REG, PC_REG};
use crate::memory::Mem32;
use super::NextAddr;
use super::alu::{exception_return, read_reg, shift_imm_operand};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LdstOp {
    Str, Ldr, Strb, Ldrb,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LdstHOp {
    Strh, Ldrh, Ldrsb, Ldrsh,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LdstDOp {
    Strd, Ldrd,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LdstxOp {
    Ldrex, Ldrexd, Ldrexb, Ldrexh,
    Strex, Strexd, Strexb, Strexh,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LdstmOp {
    Stm, Ldm,
    /// The single-register PUSH/POP encodings.
    PushR, PopR,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HintOp {
    PldImm, PldReg, PliImm, PliReg,
    Setend, Clrex, Dmb, Dsb, Isb,
}

/// Addressing decomposition shared by the word/byte and halfword families:
/// (access address, writeback value if any).
fn address_and_writeback(i: u32, base: u32, offset: u32) -> (u32, Option<u32>) {
    let applied = if test_bit(i, 23) {
        base.wrapping_add(offset)
    } else {
        base.wrapping_sub(offset)
    };
    let pre = test_bit(i, 24);
    let wback = !pre || test_bit(i, 21);
    match (pre, wback) {
        // Post-indexed (and the T forms): access at the base, then update.
        (false, _) => (base, Some(applied)),
        (true, false) => (applied, None),
        (true, true) => (applied, Some(applied)),
    }
}

pub(super) fn single<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, op: LdstOp) -> NextAddr {
    let rn = field(i, 16, 19) as usize;
    let rt = field(i, 12, 15) as usize;
    if rn != PC_REG && rt != PC_REG {
        return NextAddr::linear();
    }
    let reg_offset = test_bit(i, 25);
    let offset = if reg_offset {
        shift_imm_operand(core, i)
    } else {
        field(i, 0, 11)
    };
    let (addr, writeback) = address_and_writeback(i, read_reg(core, rn), offset);
    let load = matches!(op, LdstOp::Ldr | LdstOp::Ldrb);
    // Unprivileged (T) forms are the post-indexed encodings with W set.
    let translate = !test_bit(i, 24) && test_bit(i, 21);
    let unpred = (reg_offset && field(i, 0, 3) as usize == PC_REG)
        || (writeback.is_some() && (rn == rt || rn == PC_REG))
        || (translate && core.cpsr().mode() == Some(Mode::Hyp));
    let target = if rn == PC_REG && writeback.is_some() {
        writeback
    } else if load && rt == PC_REG {
        Some(match op {
            LdstOp::Ldrb => mem.load_byte(addr) as u32,
            _ => mem.load_word(addr),
        })
    } else {
        None
    };
    match target {
        Some(t) => NextAddr::from_target(t).unpredictable_if(unpred),
        None => NextAddr::linear().unpredictable_if(unpred),
    }
}

pub(super) fn half_signed<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, op: LdstHOp) -> NextAddr {
    let rn = field(i, 16, 19) as usize;
    let rt = field(i, 12, 15) as usize;
    if rn != PC_REG && rt != PC_REG {
        return NextAddr::linear();
    }
    let imm_offset = test_bit(i, 22);
    let offset = if imm_offset {
        (field(i, 8, 11) << 4) | field(i, 0, 3)
    } else {
        read_reg(core, field(i, 0, 3) as usize)
    };
    let (addr, writeback) = address_and_writeback(i, read_reg(core, rn), offset);
    let load = op != LdstHOp::Strh;
    // Unprivileged (T) forms are the post-indexed encodings with W set.
    let translate = !test_bit(i, 24) && test_bit(i, 21);
    let unpred = rt == PC_REG
        || (!imm_offset && field(i, 0, 3) as usize == PC_REG)
        || (writeback.is_some() && (rn == rt || rn == PC_REG))
        || (translate && core.cpsr().mode() == Some(Mode::Hyp));
    let target = if rn == PC_REG && writeback.is_some() {
        writeback
    } else if load && rt == PC_REG {
        Some(match op {
            LdstHOp::Ldrh => mem.load_halfword(addr) as u32,
            LdstHOp::Ldrsb => mem.load_byte(addr) as i8 as i32 as u32,
            _ => mem.load_halfword(addr) as i16 as i32 as u32,
        })
    } else {
        None
    };
    match target {
        Some(t) => NextAddr::from_target(t).unpredictable_if(unpred),
        None => NextAddr::linear().unpredictable_if(unpred),
    }
}

pub(super) fn dual<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, op: LdstDOp) -> NextAddr {
    let rt = field(i, 12, 15) as usize;
    if rt % 2 != 0 {
        return NextAddr::undefined();
    }
    // The unprivileged-form encoding has no doubleword variant.
    if !test_bit(i, 24) && test_bit(i, 21) {
        return NextAddr::undefined();
    }
    let rt2 = rt + 1;
    let rn = field(i, 16, 19) as usize;
    if rn != PC_REG && rt2 != PC_REG {
        return NextAddr::linear();
    }
    let imm_offset = test_bit(i, 22);
    let offset = if imm_offset {
        (field(i, 8, 11) << 4) | field(i, 0, 3)
    } else {
        read_reg(core, field(i, 0, 3) as usize)
    };
    // A PC base reads the pipelined value aligned down to a word boundary.
    let base = read_reg(core, rn) & if rn == PC_REG { !3 } else { !0 };
    let (addr, writeback) = address_and_writeback(i, base, offset);
    let unpred = rt2 == PC_REG
        || (!imm_offset && field(i, 0, 3) as usize == PC_REG)
        || (writeback.is_some() && (rn == rt || rn == rt2 || rn == PC_REG));
    let target = if rn == PC_REG && writeback.is_some() {
        writeback
    } else if op == LdstDOp::Ldrd && rt2 == PC_REG {
        Some(mem.load_word(addr.wrapping_add(4)))
    } else {
        None
    };
    match target {
        Some(t) => NextAddr::from_target(t).unpredictable_if(unpred),
        None => NextAddr::linear().unpredictable_if(unpred),
    }
}

pub(super) fn exclusive<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, op: LdstxOp) -> NextAddr {
    let rn = field(i, 16, 19) as usize;
    let base = core.reg(rn);
    use LdstxOp::*;
    match op {
        Ldrex | Ldrexb | Ldrexh => {
            let rt = field(i, 12, 15) as usize;
            if rt != PC_REG {
                return NextAddr::linear().unpredictable_if(rn == PC_REG);
            }
            let value = match op {
                Ldrex => mem.load_word(base),
                Ldrexb => mem.load_byte(base) as u32,
                _ => mem.load_halfword(base) as u32,
            };
            NextAddr::arm(value).unpredictable()
        }
        Ldrexd => {
            let rt = field(i, 12, 15) as usize;
            if rt + 1 != PC_REG {
                return NextAddr::linear().unpredictable_if(rt % 2 != 0 || rn == PC_REG);
            }
            NextAddr::arm(mem.load_word(base.wrapping_add(4))).unpredictable()
        }
        Strex | Strexd | Strexb | Strexh => {
            let rd = field(i, 12, 15) as usize;
            let rt = field(i, 0, 3) as usize;
            if rd == PC_REG {
                // The status register lands in the PC; assume the store
                // succeeds, so the status value written is 0.
                return NextAddr::arm(0).unpredictable();
            }
            NextAddr::linear().unpredictable_if(rd == rn || rd == rt || rn == PC_REG)
        }
    }
}

pub(super) fn multiple<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, op: LdstmOp) -> NextAddr {
    match op {
        LdstmOp::PopR => {
            let rt = field(i, 12, 15) as usize;
            if rt == PC_REG {
                NextAddr::from_target(mem.load_word(core.reg(SP_REG)))
            } else {
                NextAddr::linear().unpredictable_if(rt == SP_REG)
            }
        }
        LdstmOp::PushR => {
            let rt = field(i, 12, 15) as usize;
            NextAddr::linear().unpredictable_if(rt == SP_REG)
        }
        LdstmOp::Stm | LdstmOp::Ldm => block_transfer(core, mem, i, op == LdstmOp::Ldm),
    }
}

fn block_transfer<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32, load: bool) -> NextAddr {
    let rn = field(i, 16, 19) as usize;
    let list = i & 0xFFFF;
    let count = list.count_ones();
    let user_form = test_bit(i, 22);
    let wback = test_bit(i, 21);
    let mode = core.cpsr().mode();
    // The user-register and exception-return forms are Hyp-undefined.
    if user_form && mode == Some(Mode::Hyp) {
        return NextAddr::undefined();
    }
    let unpred = count == 0
        || (user_form && matches!(mode, Some(Mode::Usr) | Some(Mode::Sys)))
        || (user_form && wback && !(load && test_bit(i, 15)))
        || (wback && load && test_bit(list, rn));
    // Block transfers read a PC base without the pipeline offset; the
    // access is UNPREDICTABLE to begin with.
    let base = core.reg(rn);
    let delta = 4 * count;
    if rn == PC_REG && wback {
        let target = if test_bit(i, 23) {
            base.wrapping_add(delta)
        } else {
            base.wrapping_sub(delta)
        };
        return NextAddr::from_target(target).unpredictable();
    }
    if load && test_bit(i, 15) {
        // The slot the PC loads from, per addressing sub-mode; the PC is
        // always the highest register in the list.
        let addr = match (test_bit(i, 24), test_bit(i, 23)) {
            (false, false) => base,                              // DA
            (false, true) => base.wrapping_add(delta - 4),       // IA
            (true, false) => base.wrapping_sub(4),               // DB
            (true, true) => base.wrapping_add(delta),            // IB
        };
        let value = mem.load_word(addr);
        let out = if user_form {
            // LDM with PC in list and the M bit restores the SPSR.
            exception_return(core, value)
        } else {
            NextAddr::from_target(value)
        };
        return out.unpredictable_if(unpred);
    }
    NextAddr::linear().unpredictable_if(unpred || rn == PC_REG)
}

pub(super) fn swap<C: StepSource, M: Mem32>(core: &C, mem: &M, i: u32) -> NextAddr {
    let rn = field(i, 16, 19) as usize;
    let rt = field(i, 12, 15) as usize;
    let rt2 = field(i, 0, 3) as usize;
    let unpred = rn == PC_REG || rn == rt || rn == rt2 || rt2 == PC_REG;
    if rt == PC_REG {
        let value = if test_bit(i, 22) {
            mem.load_byte(core.reg(rn)) as u32
        } else {
            mem.load_word(core.reg(rn))
        };
        NextAddr::arm(value).unpredictable()
    } else {
        NextAddr::linear().unpredictable_if(unpred)
    }
}

pub(super) fn hint(i: u32, op: HintOp) -> NextAddr {
    let unpred = match op {
        HintOp::PldReg | HintOp::PliReg => field(i, 0, 3) as usize == PC_REG,
        _ => false,
    };
    NextAddr::linear().unpredictable_if(unpred)
}

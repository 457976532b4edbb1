/// Multiply, multiply-long and divide handlers.
///
/// A PC destination is architecturally UNPREDICTABLE for all of these, so
/// every non-linear result carries the overlay; the address is the value the
/// multiply would have produced.

use crate::common::*;
use crate::core::{StepSource, PC_REG};
use super::NextAddr;
use super::alu::read_reg;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MulOp {
    Mul, Mla, Mls,
    Smla, Smlaw, Smulw, Smul,
    Smmul, Smmla, Smmls,
    Smuad, Smusd, Smlad, Smlsd,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MulLongOp {
    Umull, Umlal, Umaal,
    Smull, Smlal, Smlal16,
    Smlald, Smlsld,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DivOp {
    Sdiv,
    Udiv,
}

/// Halfword operand select: the top half when the selector bit is set.
fn half(v: u32, top: bool) -> i64 {
    if top { hi_signed_16(v) as i64 } else { lo_signed_16(v) as i64 }
}

/// Dual 16x16 products, as (low-pair, high-pair). Bit 5 swaps the Rm
/// halfwords first.
fn dual_products(i: u32, n: u32, m: u32) -> (i64, i64) {
    let m = if test_bit(i, 5) { m.rotate_right(16) } else { m };
    let lo = lo_signed_16(n) as i64 * lo_signed_16(m) as i64;
    let hi = hi_signed_16(n) as i64 * hi_signed_16(m) as i64;
    (lo, hi)
}

pub(super) fn multiply<C: StepSource>(core: &C, i: u32, op: MulOp) -> NextAddr {
    if field(i, 16, 19) as usize != PC_REG {
        return NextAddr::linear();
    }
    let n = read_reg(core, field(i, 0, 3) as usize);
    let m = read_reg(core, field(i, 8, 11) as usize);
    let acc = read_reg(core, field(i, 12, 15) as usize);
    let round = if test_bit(i, 5) { 0x8000_0000_i64 } else { 0 };
    let result = match op {
        MulOp::Mul => n.wrapping_mul(m),
        MulOp::Mla => n.wrapping_mul(m).wrapping_add(acc),
        MulOp::Mls => acc.wrapping_sub(n.wrapping_mul(m)),
        MulOp::Smla => {
            let p = half(n, test_bit(i, 5)) * half(m, test_bit(i, 6));
            (p as u32).wrapping_add(acc)
        }
        MulOp::Smul => {
            (half(n, test_bit(i, 5)) * half(m, test_bit(i, 6))) as u32
        }
        MulOp::Smlaw => {
            let p = (n as i32 as i64 * half(m, test_bit(i, 6))) >> 16;
            (p as u32).wrapping_add(acc)
        }
        MulOp::Smulw => {
            ((n as i32 as i64 * half(m, test_bit(i, 6))) >> 16) as u32
        }
        MulOp::Smmul => {
            let p = n as i32 as i64 * m as i32 as i64;
            (p.wrapping_add(round) >> 32) as u32
        }
        MulOp::Smmla => {
            let p = ((acc as i64) << 32).wrapping_add(n as i32 as i64 * m as i32 as i64);
            (p.wrapping_add(round) >> 32) as u32
        }
        MulOp::Smmls => {
            let p = ((acc as i64) << 32).wrapping_sub(n as i32 as i64 * m as i32 as i64);
            (p.wrapping_add(round) >> 32) as u32
        }
        MulOp::Smuad | MulOp::Smusd => {
            let (lo, hi) = dual_products(i, n, m);
            let sum = if op == MulOp::Smuad { lo + hi } else { lo - hi };
            sum as u32
        }
        MulOp::Smlad | MulOp::Smlsd => {
            let (lo, hi) = dual_products(i, n, m);
            let sum = if op == MulOp::Smlad { lo + hi } else { lo - hi };
            (sum as u32).wrapping_add(acc)
        }
    };
    NextAddr::arm(result).unpredictable()
}

pub(super) fn multiply_long<C: StepSource>(core: &C, i: u32, op: MulLongOp) -> NextAddr {
    let rd_hi = field(i, 16, 19) as usize;
    let rd_lo = field(i, 12, 15) as usize;
    if rd_hi != PC_REG && rd_lo != PC_REG {
        return NextAddr::linear();
    }
    let n = read_reg(core, field(i, 0, 3) as usize);
    let m = read_reg(core, field(i, 8, 11) as usize);
    let acc = make_64(read_reg(core, rd_hi), read_reg(core, rd_lo));
    let result = match op {
        MulLongOp::Umull => n as u64 * m as u64,
        MulLongOp::Umlal => (n as u64 * m as u64).wrapping_add(acc),
        MulLongOp::Umaal => {
            (n as u64 * m as u64)
                .wrapping_add(read_reg(core, rd_hi) as u64)
                .wrapping_add(read_reg(core, rd_lo) as u64)
        }
        MulLongOp::Smull => (n as i32 as i64 * m as i32 as i64) as u64,
        MulLongOp::Smlal => {
            (n as i32 as i64 * m as i32 as i64).wrapping_add(acc as i64) as u64
        }
        MulLongOp::Smlal16 => {
            (half_product(i, n, m)).wrapping_add(acc as i64) as u64
        }
        MulLongOp::Smlald | MulLongOp::Smlsld => {
            let (lo, hi) = dual_products(i, n, m);
            let sum = if op == MulLongOp::Smlald { lo + hi } else { lo - hi };
            sum.wrapping_add(acc as i64) as u64
        }
    };
    // Whichever half lands in the PC is the target, high half first.
    let target = if rd_hi == PC_REG { hi_64(result) } else { lo_64(result) };
    NextAddr::arm(target).unpredictable()
}

fn half_product(i: u32, n: u32, m: u32) -> i64 {
    half(n, test_bit(i, 5)) * half(m, test_bit(i, 6))
}

pub(super) fn divide<C: StepSource>(core: &C, i: u32, op: DivOp) -> NextAddr {
    let num_reg = field(i, 0, 3) as usize;
    let den_reg = field(i, 8, 11) as usize;
    if field(i, 16, 19) as usize != PC_REG {
        return NextAddr::linear().unpredictable_if(num_reg == PC_REG || den_reg == PC_REG);
    }
    let num = read_reg(core, num_reg);
    let den = read_reg(core, den_reg);
    let result = match op {
        // Division by zero yields 0; otherwise round toward zero.
        DivOp::Sdiv => {
            if den == 0 { 0 } else { (num as i32).wrapping_div(den as i32) as u32 }
        }
        DivOp::Udiv => {
            if den == 0 { 0 } else { num / den }
        }
    };
    NextAddr::arm(result).unpredictable()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dual_products_swap() {
        // 0x0001_0002 x 0x0003_0004: plain pairs (2*4, 1*3), swapped (2*3, 1*4).
        let (lo, hi) = dual_products(0, 0x0001_0002, 0x0003_0004);
        assert_eq!((lo, hi), (8, 3));
        let (lo, hi) = dual_products(1 << 5, 0x0001_0002, 0x0003_0004);
        assert_eq!((lo, hi), (6, 4));
    }
}

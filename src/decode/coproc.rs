/// Generic coprocessor handlers.
///
/// Nothing here redirects execution: coprocessor transfers either trap as
/// undefined or fall through, at worst with the UNPREDICTABLE overlay when
/// the PC is named as a transfer register.

use crate::common::field;
use crate::core::PC_REG;
use super::NextAddr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoprocOp {
    Mcr,
    Mrc,
    Mcrr,
    Mrrc,
    Cdp,
    Ldc,
    Stc,
}

/// Coprocessor numbers with no architected encodings.
fn undefined_coproc(i: u32) -> bool {
    matches!(field(i, 8, 11), 8 | 9 | 12 | 13)
}

pub(super) fn run(i: u32, op: CoprocOp) -> NextAddr {
    if undefined_coproc(i) {
        return NextAddr::undefined();
    }
    let rt = field(i, 12, 15) as usize;
    let rt2 = field(i, 16, 19) as usize;
    match op {
        CoprocOp::Mcr | CoprocOp::Mrc => {
            NextAddr::linear().unpredictable_if(rt == PC_REG)
        }
        CoprocOp::Mcrr | CoprocOp::Mrrc => {
            NextAddr::linear().unpredictable_if(rt == PC_REG || rt2 == PC_REG)
        }
        CoprocOp::Cdp => NextAddr::linear(),
        CoprocOp::Ldc | CoprocOp::Stc => {
            // P, U, D and W all clear is an unallocated encoding.
            if field(i, 21, 24) == 0 {
                NextAddr::undefined()
            } else {
                NextAddr::linear().unpredictable_if(rt2 == PC_REG)
            }
        }
    }
}

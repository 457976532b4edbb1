/// Core traits and types for observing ARM processor state (read-only).

#[cfg(test)]
pub mod test_utils;

use bitflags::bitflags;
use crate::common::{bit, bits};

bitflags! {
    #[derive(Default)]
    pub struct CPSR: u32 {
        const N = bit(31);
        const Z = bit(30);
        const C = bit(29);
        const V = bit(28);
        const Q = bit(27);
        const J = bit(24);
        const GE = bits(16, 19);
        const E = bit(9);
        const A = bit(8);
        const I = bit(7);
        const F = bit(6);
        const T = bit(5);
        const MODE = bits(0, 4);
    }
}

impl CPSR {
    pub fn carry(self) -> u32 {
        if self.contains(CPSR::C) {
            1
        } else {
            0
        }
    }

    /// Current processor mode, if the mode field holds a defined encoding.
    pub fn mode(self) -> Option<Mode> {
        Mode::from_bits((self & CPSR::MODE).bits())
    }

    /// GE flag for SIMD lane n (0-3).
    pub fn ge(self, n: usize) -> bool {
        crate::common::test_bit(self.bits(), 16 + n)
    }
}

pub type SPSR = CPSR;

/// Processor modes, with their CPSR mode-field encodings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Usr,
    Fiq,
    Irq,
    Svc,
    Mon,
    Abt,
    Hyp,
    Und,
    Sys,
}

impl Mode {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits & 0x1F {
            0x10 => Some(Mode::Usr),
            0x11 => Some(Mode::Fiq),
            0x12 => Some(Mode::Irq),
            0x13 => Some(Mode::Svc),
            0x16 => Some(Mode::Mon),
            0x17 => Some(Mode::Abt),
            0x1A => Some(Mode::Hyp),
            0x1B => Some(Mode::Und),
            0x1F => Some(Mode::Sys),
            _ => None,
        }
    }

    /// True for the modes entered by taking an exception
    /// (the ones with an SPSR of their own).
    pub fn is_exception_mode(self) -> bool {
        !matches!(self, Mode::Usr | Mode::Sys)
    }
}

/// Security state of the processor (TrustZone).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SecState {
    Secure,
    NonSecure,
}

/// Floating-point system registers whose value a VMRS can land in the PC.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FpSysReg {
    Fpsid,
    Fpscr,
    Mvfr1,
    Mvfr0,
    Fpexc,
}

/// Provider of floating-point system register values.
///
/// VMRS with Rt=PC puts a hardware status word in the program counter; the
/// predictor reads it through this interface rather than touching hardware,
/// so the host agent decides how those values are sourced.
pub trait FpSysRegs {
    fn read_fpsys(&self, reg: FpSysReg) -> u32;
}

/// Read-only snapshot of the CPU state an instruction is stepped from.
///
/// `reg(15)` is the address of the instruction being stepped; handlers add
/// the 8-byte pipeline offset themselves when an operand reads the PC.
pub trait StepSource: FpSysRegs {
    fn reg(&self, n: usize) -> u32;

    fn cpsr(&self) -> CPSR;

    /// SPSR of the current mode. Only meaningful in exception modes.
    fn spsr(&self) -> SPSR;

    /// A banked general register of another mode.
    fn banked_reg(&self, mode: Mode, n: usize) -> u32;

    /// A banked SPSR of another mode.
    fn banked_spsr(&self, mode: Mode) -> SPSR;

    fn elr_hyp(&self) -> u32;

    /// The extension register file viewed as 32-bit words:
    /// word n is Sn, and Dn occupies words 2n (low) and 2n+1 (high).
    fn vreg(&self, n: usize) -> u32;

    fn sec_state(&self) -> SecState;

    fn scr(&self) -> u32;

    fn hcr(&self) -> u32;

    fn nsacr(&self) -> u32;
}

pub const SP_REG: usize = 13;
pub const LR_REG: usize = 14;
pub const PC_REG: usize = 15;

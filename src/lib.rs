mod core;
mod common;
mod memory;
mod decode;

pub use crate::core::{
    CPSR, SPSR, Mode, SecState, FpSysReg, FpSysRegs, StepSource,
    SP_REG, LR_REG, PC_REG,
};

pub use crate::memory::Mem32;

pub use crate::decode::{
    next_address, NextAddr, AddrState, ARMCondition, LINEAR,
};

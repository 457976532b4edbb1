/// The A32 decode table.
///
/// Each entry carries a bit pattern (`data`), the significant bits (`mask`)
/// and a typed handler ID. A word decodes to the first entry whose masked
/// bits equal the pattern, so specific entries must precede the general ones
/// that shadow them. Entries whose mask fixes the condition field to 0b1111
/// belong to the unconditional space; everything else is condition-gated by
/// the dispatcher.

use crate::core::StepSource;
use crate::memory::Mem32;
use super::NextAddr;

use super::mux::{self, MuxRule};
use super::alu::{self, AluOp, ShiftOp};
use super::branch::{self, BranchOp, ExcOp};
use super::coproc::{self, CoprocOp};
use super::mul::{self, MulOp, MulLongOp, DivOp};
use super::media::{self, SatOp, ParPrefix, ParKind, PackOp, MiscOp};
use super::ldst::{self, LdstOp, LdstHOp, LdstDOp, LdstxOp, LdstmOp, HintOp};
use super::status::{self, StatusOp};
use super::vfp::{self, VfpLdstOp, VElemOp, VXferOp};

/// Typed handler ID: the family, carrying its concrete sub-operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Handler {
    Mux(MuxRule),
    Branch(BranchOp),
    Exc(ExcOp),
    Coproc(CoprocOp),
    AluImm(AluOp),
    AluReg(AluOp),
    AluRsr(AluOp),
    Shift(ShiftOp),
    Mul(MulOp),
    MulLong(MulLongOp),
    Div(DivOp),
    Sat(SatOp),
    Par(ParPrefix, ParKind),
    Pack(PackOp),
    Misc(MiscOp),
    Ldst(LdstOp),
    LdstH(LdstHOp),
    LdstD(LdstDOp),
    Ldstx(LdstxOp),
    Ldstm(LdstmOp),
    Swp,
    Hint(HintOp),
    Status(StatusOp),
    VfpLdst(VfpLdstOp),
    VElem(VElemOp),
    VXfer(VXferOp),
    /// Advanced SIMD data processing: never affects control flow.
    VSimd,
    /// VFP data processing: never affects control flow.
    VfpData,
}

impl Handler {
    pub(super) fn run<C: StepSource, M: Mem32>(&self, core: &C, mem: &M, i: u32) -> NextAddr {
        use Handler::*;
        match *self {
            Mux(rule) => mux::run(core, i, rule),
            Branch(op) => branch::branch(core, i, op),
            Exc(op) => branch::exception(core, mem, i, op),
            Coproc(op) => coproc::run(i, op),
            AluImm(op) => alu::data_imm(core, i, op),
            AluReg(op) => alu::data_reg(core, i, op),
            AluRsr(op) => alu::data_rsr(core, i, op),
            Shift(op) => alu::shift_move(core, i, op),
            Mul(op) => mul::multiply(core, i, op),
            MulLong(op) => mul::multiply_long(core, i, op),
            Div(op) => mul::divide(core, i, op),
            Sat(op) => media::saturating(core, i, op),
            Par(prefix, kind) => media::parallel(core, i, prefix, kind),
            Pack(op) => media::pack_extend(core, i, op),
            Misc(op) => media::misc(core, i, op),
            Ldst(op) => ldst::single(core, mem, i, op),
            LdstH(op) => ldst::half_signed(core, mem, i, op),
            LdstD(op) => ldst::dual(core, mem, i, op),
            Ldstx(op) => ldst::exclusive(core, mem, i, op),
            Ldstm(op) => ldst::multiple(core, mem, i, op),
            Swp => ldst::swap(core, mem, i),
            Hint(op) => ldst::hint(i, op),
            Status(op) => status::run(core, i, op),
            VfpLdst(op) => vfp::ext_ldst(core, i, op),
            VElem(op) => vfp::elem_ldst(core, i, op),
            VXfer(op) => vfp::xfer(core, i, op),
            VSimd | VfpData => NextAddr::linear(),
        }
    }
}

/// One decode-table row.
pub struct Entry {
    pub data: u32,
    pub mask: u32,
    pub handler: Handler,
}

const fn e(data: u32, mask: u32, handler: Handler) -> Entry {
    Entry { data, mask, handler }
}

use Handler::*;

/// Ordered, first-match-wins.
pub static DECODE_TABLE: &[Entry] = &[
    // === Unconditional space (condition field 0b1111) ===

    // Barriers and CLREX.
    e(0xF57F_F01F, 0xFFFF_FFFF, Hint(HintOp::Clrex)),
    e(0xF57F_F040, 0xFFFF_FFF0, Hint(HintOp::Dsb)),
    e(0xF57F_F050, 0xFFFF_FFF0, Hint(HintOp::Dmb)),
    e(0xF57F_F060, 0xFFFF_FFF0, Hint(HintOp::Isb)),
    // SETEND and CPS.
    e(0xF101_0000, 0xFFFF_FDFF, Hint(HintOp::Setend)),
    e(0xF100_0000, 0xFFF1_FE20, Status(StatusOp::Cps)),
    // Preload hints.
    e(0xF450_F000, 0xFF70_F000, Hint(HintOp::PliImm)),
    e(0xF650_F000, 0xFF70_F010, Hint(HintOp::PliReg)),
    e(0xF510_F000, 0xFF30_F000, Hint(HintOp::PldImm)),
    e(0xF710_F000, 0xFF30_F010, Hint(HintOp::PldReg)),
    // SRS / RFE / BLX (immediate).
    e(0xF84D_0500, 0xFE5F_FFE0, Exc(ExcOp::Srs)),
    e(0xF810_0A00, 0xFE50_FFFF, Exc(ExcOp::Rfe)),
    e(0xFA00_0000, 0xFE00_0000, Branch(BranchOp::BlxImm)),
    // Coprocessor *2 forms.
    e(0xFC40_0000, 0xFFF0_0000, Coproc(CoprocOp::Mcrr)),
    e(0xFC50_0000, 0xFFF0_0000, Coproc(CoprocOp::Mrrc)),
    e(0xFC00_0000, 0xFE10_0000, Coproc(CoprocOp::Stc)),
    e(0xFC10_0000, 0xFE10_0000, Coproc(CoprocOp::Ldc)),
    e(0xFE00_0000, 0xFF00_0010, Coproc(CoprocOp::Cdp)),
    e(0xFE00_0010, 0xFF10_0010, Coproc(CoprocOp::Mcr)),
    e(0xFE10_0010, 0xFF10_0010, Coproc(CoprocOp::Mrc)),
    // Advanced SIMD element or structure loads/stores. The all-lanes form
    // must precede the one-lane forms (its size field reads 0b11 there).
    e(0xF4A0_0C00, 0xFFA0_0C00, VElem(VElemOp::VldAll)),
    e(0xF480_0000, 0xFFA0_0000, VElem(VElemOp::VstOne)),
    e(0xF4A0_0000, 0xFFA0_0000, VElem(VElemOp::VldOne)),
    e(0xF400_0000, 0xFFA0_0000, Mux(MuxRule::VstType)),
    e(0xF420_0000, 0xFFA0_0000, Mux(MuxRule::VldType)),
    // Advanced SIMD one-register-and-modified-immediate forms; these must
    // precede the shift-by-immediate multiplexes sharing their cmode bits.
    e(0xF280_0010, 0xFEB8_00B0, Mux(MuxRule::VorrIVmovI)),
    e(0xF280_0030, 0xFEB8_00B0, Mux(MuxRule::VbicVmvn)),
    e(0xF280_0810, 0xFE80_0FD0, Mux(MuxRule::VshrnQImm)),
    e(0xF280_0850, 0xFE80_0FD0, Mux(MuxRule::VrshrnQImm)),
    e(0xF280_0910, 0xFE80_0F90, Mux(MuxRule::VshrnQImm)),
    e(0xF280_0A10, 0xFE80_0FD0, Mux(MuxRule::VshllIVmovl)),
    e(0xF3B2_0200, 0xFFB3_0F10, Mux(MuxRule::VmovnQ)),
    e(0xF220_0110, 0xFFB0_0F10, Mux(MuxRule::VorrVmovNm)),
    // Everything else in the SIMD data-processing space is linear.
    e(0xF200_0000, 0xFE00_0000, VSimd),
    // Remaining 0b1111-condition encodings are unallocated; stop them here
    // so they cannot fall through into the conditional entries below.
    e(0xF000_0000, 0xF000_0000, Exc(ExcOp::Udf)),

    // === Conditional space: multiplies, misc and extra loads/stores ===

    // Banked and privileged status moves.
    e(0x0100_0200, 0x0FB0_0EFF, Status(StatusOp::MrsBanked)),
    e(0x0120_0200, 0x0FB0_0EF0, Status(StatusOp::MsrBanked)),
    e(0x010F_0000, 0x0FBF_0FFF, Mux(MuxRule::MrsRPr)),
    e(0x0120_F000, 0x0FB0_FFF0, Mux(MuxRule::MsrRPr)),
    // Branch-register and exception generators in the misc space.
    e(0x012F_FF10, 0x0FFF_FFF0, Branch(BranchOp::BxReg)),
    e(0x012F_FF20, 0x0FFF_FFF0, Branch(BranchOp::BxjReg)),
    e(0x012F_FF30, 0x0FFF_FFF0, Branch(BranchOp::BlxReg)),
    e(0x016F_0F10, 0x0FFF_0FF0, Misc(MiscOp::Clz)),
    e(0x0160_006E, 0x0FFF_FFFF, Exc(ExcOp::Eret)),
    e(0x0120_0070, 0x0FF0_00F0, Exc(ExcOp::Bkpt)),
    e(0x0140_0070, 0x0FF0_00F0, Exc(ExcOp::Hvc)),
    e(0x0160_0070, 0x0FF0_00F0, Exc(ExcOp::Smc)),
    // Saturating add/subtract.
    e(0x0100_0050, 0x0FF0_0FF0, Sat(SatOp::Qadd)),
    e(0x0120_0050, 0x0FF0_0FF0, Sat(SatOp::Qsub)),
    e(0x0140_0050, 0x0FF0_0FF0, Sat(SatOp::Qdadd)),
    e(0x0160_0050, 0x0FF0_0FF0, Sat(SatOp::Qdsub)),
    // Signed halfword multiplies.
    e(0x0100_0080, 0x0FF0_0090, Mul(MulOp::Smla)),
    e(0x0120_0080, 0x0FF0_00B0, Mul(MulOp::Smlaw)),
    e(0x0120_00A0, 0x0FF0_00B0, Mul(MulOp::Smulw)),
    e(0x0140_0080, 0x0FF0_0090, MulLong(MulLongOp::Smlal16)),
    e(0x0160_0080, 0x0FF0_0090, Mul(MulOp::Smul)),
    // Multiplies.
    e(0x0000_0090, 0x0FE0_F0F0, Mul(MulOp::Mul)),
    e(0x0020_0090, 0x0FE0_00F0, Mul(MulOp::Mla)),
    e(0x0040_0090, 0x0FF0_00F0, MulLong(MulLongOp::Umaal)),
    e(0x0060_0090, 0x0FF0_00F0, Mul(MulOp::Mls)),
    e(0x0080_0090, 0x0FE0_00F0, MulLong(MulLongOp::Umull)),
    e(0x00A0_0090, 0x0FE0_00F0, MulLong(MulLongOp::Umlal)),
    e(0x00C0_0090, 0x0FE0_00F0, MulLong(MulLongOp::Smull)),
    e(0x00E0_0090, 0x0FE0_00F0, MulLong(MulLongOp::Smlal)),
    // Swap and exclusives.
    e(0x0100_0090, 0x0FB0_0FF0, Swp),
    e(0x0190_0F9F, 0x0FF0_0FFF, Ldstx(LdstxOp::Ldrex)),
    e(0x01B0_0F9F, 0x0FF0_0FFF, Ldstx(LdstxOp::Ldrexd)),
    e(0x01D0_0F9F, 0x0FF0_0FFF, Ldstx(LdstxOp::Ldrexb)),
    e(0x01F0_0F9F, 0x0FF0_0FFF, Ldstx(LdstxOp::Ldrexh)),
    e(0x0180_0F90, 0x0FF0_0FF0, Ldstx(LdstxOp::Strex)),
    e(0x01A0_0F90, 0x0FF0_0FF0, Ldstx(LdstxOp::Strexd)),
    e(0x01C0_0F90, 0x0FF0_0FF0, Ldstx(LdstxOp::Strexb)),
    e(0x01E0_0F90, 0x0FF0_0FF0, Ldstx(LdstxOp::Strexh)),
    // Halfword, dual and signed loads/stores (register then immediate forms).
    e(0x0000_00B0, 0x0E50_0FF0, LdstH(LdstHOp::Strh)),
    e(0x0010_00B0, 0x0E50_0FF0, LdstH(LdstHOp::Ldrh)),
    e(0x0040_00B0, 0x0E50_00F0, LdstH(LdstHOp::Strh)),
    e(0x0050_00B0, 0x0E50_00F0, LdstH(LdstHOp::Ldrh)),
    e(0x0000_00D0, 0x0E50_0FF0, LdstD(LdstDOp::Ldrd)),
    e(0x0010_00D0, 0x0E50_0FF0, LdstH(LdstHOp::Ldrsb)),
    e(0x0040_00D0, 0x0E50_00F0, LdstD(LdstDOp::Ldrd)),
    e(0x0050_00D0, 0x0E50_00F0, LdstH(LdstHOp::Ldrsb)),
    e(0x0000_00F0, 0x0E50_0FF0, LdstD(LdstDOp::Strd)),
    e(0x0010_00F0, 0x0E50_0FF0, LdstH(LdstHOp::Ldrsh)),
    e(0x0040_00F0, 0x0E50_00F0, LdstD(LdstDOp::Strd)),
    e(0x0050_00F0, 0x0E50_00F0, LdstH(LdstHOp::Ldrsh)),

    // === Data processing, register forms ===

    // The MOV/shift opcode: LSL-by-zero is MOV, ROR-by-zero is RRX.
    e(0x01A0_F000, 0x0FEF_F070, Mux(MuxRule::LslIMovPc)),
    e(0x01A0_0000, 0x0FEF_0070, Mux(MuxRule::LslIMov)),
    e(0x01A0_0020, 0x0FEF_0070, Shift(ShiftOp::LsrImm)),
    e(0x01A0_0040, 0x0FEF_0070, Shift(ShiftOp::AsrImm)),
    e(0x01A0_0060, 0x0FEF_0070, Mux(MuxRule::RorIRrx)),
    e(0x01A0_0010, 0x0FEF_00F0, Shift(ShiftOp::LslReg)),
    e(0x01A0_0030, 0x0FEF_00F0, Shift(ShiftOp::LsrReg)),
    e(0x01A0_0050, 0x0FEF_00F0, Shift(ShiftOp::AsrReg)),
    e(0x01A0_0070, 0x0FEF_00F0, Shift(ShiftOp::RorReg)),
    // Compares (S is fixed; no destination register).
    e(0x0110_0000, 0x0FF0_0010, AluReg(AluOp::Tst)),
    e(0x0130_0000, 0x0FF0_0010, AluReg(AluOp::Teq)),
    e(0x0150_0000, 0x0FF0_0010, AluReg(AluOp::Cmp)),
    e(0x0170_0000, 0x0FF0_0010, AluReg(AluOp::Cmn)),
    e(0x0110_0010, 0x0FF0_0090, AluRsr(AluOp::Tst)),
    e(0x0130_0010, 0x0FF0_0090, AluRsr(AluOp::Teq)),
    e(0x0150_0010, 0x0FF0_0090, AluRsr(AluOp::Cmp)),
    e(0x0170_0010, 0x0FF0_0090, AluRsr(AluOp::Cmn)),
    // The rest of the ALU, shift-by-immediate then register-shifted forms.
    e(0x0000_0000, 0x0FE0_0010, AluReg(AluOp::And)),
    e(0x0020_0000, 0x0FE0_0010, AluReg(AluOp::Eor)),
    e(0x0040_0000, 0x0FE0_0010, AluReg(AluOp::Sub)),
    e(0x0060_0000, 0x0FE0_0010, AluReg(AluOp::Rsb)),
    e(0x0080_0000, 0x0FE0_0010, AluReg(AluOp::Add)),
    e(0x00A0_0000, 0x0FE0_0010, AluReg(AluOp::Adc)),
    e(0x00C0_0000, 0x0FE0_0010, AluReg(AluOp::Sbc)),
    e(0x00E0_0000, 0x0FE0_0010, AluReg(AluOp::Rsc)),
    e(0x0180_0000, 0x0FE0_0010, AluReg(AluOp::Orr)),
    e(0x01C0_0000, 0x0FE0_0010, AluReg(AluOp::Bic)),
    e(0x01E0_0000, 0x0FE0_0010, AluReg(AluOp::Mvn)),
    e(0x0000_0010, 0x0FE0_0090, AluRsr(AluOp::And)),
    e(0x0020_0010, 0x0FE0_0090, AluRsr(AluOp::Eor)),
    e(0x0040_0010, 0x0FE0_0090, AluRsr(AluOp::Sub)),
    e(0x0060_0010, 0x0FE0_0090, AluRsr(AluOp::Rsb)),
    e(0x0080_0010, 0x0FE0_0090, AluRsr(AluOp::Add)),
    e(0x00A0_0010, 0x0FE0_0090, AluRsr(AluOp::Adc)),
    e(0x00C0_0010, 0x0FE0_0090, AluRsr(AluOp::Sbc)),
    e(0x00E0_0010, 0x0FE0_0090, AluRsr(AluOp::Rsc)),
    e(0x0180_0010, 0x0FE0_0090, AluRsr(AluOp::Orr)),
    e(0x01C0_0010, 0x0FE0_0090, AluRsr(AluOp::Bic)),
    e(0x01E0_0010, 0x0FE0_0090, AluRsr(AluOp::Mvn)),

    // === Data processing, immediate forms ===

    e(0x0300_0000, 0x0FF0_0000, Misc(MiscOp::Movw)),
    e(0x0340_0000, 0x0FF0_0000, Misc(MiscOp::Movt)),
    e(0x0320_F002, 0x0FFF_FFFE, Mux(MuxRule::WfeWfi)),
    e(0x0320_F000, 0x0FB0_F000, Mux(MuxRule::MsrIPrHints)),
    e(0x028F_0000, 0x0FFF_0000, AluImm(AluOp::AdrAdd)),
    e(0x024F_0000, 0x0FFF_0000, AluImm(AluOp::AdrSub)),
    e(0x0310_0000, 0x0FF0_0000, AluImm(AluOp::Tst)),
    e(0x0330_0000, 0x0FF0_0000, AluImm(AluOp::Teq)),
    e(0x0350_0000, 0x0FF0_0000, AluImm(AluOp::Cmp)),
    e(0x0370_0000, 0x0FF0_0000, AluImm(AluOp::Cmn)),
    e(0x0200_0000, 0x0FE0_0000, AluImm(AluOp::And)),
    e(0x0220_0000, 0x0FE0_0000, AluImm(AluOp::Eor)),
    e(0x0240_0000, 0x0FE0_0000, AluImm(AluOp::Sub)),
    e(0x0260_0000, 0x0FE0_0000, AluImm(AluOp::Rsb)),
    e(0x0280_0000, 0x0FE0_0000, AluImm(AluOp::Add)),
    e(0x02A0_0000, 0x0FE0_0000, AluImm(AluOp::Adc)),
    e(0x02C0_0000, 0x0FE0_0000, AluImm(AluOp::Sbc)),
    e(0x02E0_0000, 0x0FE0_0000, AluImm(AluOp::Rsc)),
    e(0x0380_0000, 0x0FE0_0000, AluImm(AluOp::Orr)),
    e(0x03A0_0000, 0x0FE0_0000, AluImm(AluOp::Mov)),
    e(0x03C0_0000, 0x0FE0_0000, AluImm(AluOp::Bic)),
    e(0x03E0_0000, 0x0FE0_0000, AluImm(AluOp::Mvn)),

    // === Media ===

    // Parallel add/subtract.
    e(0x0610_0F10, 0x0FF0_0FF0, Par(ParPrefix::S, ParKind::Add16)),
    e(0x0610_0F30, 0x0FF0_0FF0, Par(ParPrefix::S, ParKind::Asx)),
    e(0x0610_0F50, 0x0FF0_0FF0, Par(ParPrefix::S, ParKind::Sax)),
    e(0x0610_0F70, 0x0FF0_0FF0, Par(ParPrefix::S, ParKind::Sub16)),
    e(0x0610_0F90, 0x0FF0_0FF0, Par(ParPrefix::S, ParKind::Add8)),
    e(0x0610_0FF0, 0x0FF0_0FF0, Par(ParPrefix::S, ParKind::Sub8)),
    e(0x0620_0F10, 0x0FF0_0FF0, Par(ParPrefix::Q, ParKind::Add16)),
    e(0x0620_0F30, 0x0FF0_0FF0, Par(ParPrefix::Q, ParKind::Asx)),
    e(0x0620_0F50, 0x0FF0_0FF0, Par(ParPrefix::Q, ParKind::Sax)),
    e(0x0620_0F70, 0x0FF0_0FF0, Par(ParPrefix::Q, ParKind::Sub16)),
    e(0x0620_0F90, 0x0FF0_0FF0, Par(ParPrefix::Q, ParKind::Add8)),
    e(0x0620_0FF0, 0x0FF0_0FF0, Par(ParPrefix::Q, ParKind::Sub8)),
    e(0x0630_0F10, 0x0FF0_0FF0, Par(ParPrefix::Sh, ParKind::Add16)),
    e(0x0630_0F30, 0x0FF0_0FF0, Par(ParPrefix::Sh, ParKind::Asx)),
    e(0x0630_0F50, 0x0FF0_0FF0, Par(ParPrefix::Sh, ParKind::Sax)),
    e(0x0630_0F70, 0x0FF0_0FF0, Par(ParPrefix::Sh, ParKind::Sub16)),
    e(0x0630_0F90, 0x0FF0_0FF0, Par(ParPrefix::Sh, ParKind::Add8)),
    e(0x0630_0FF0, 0x0FF0_0FF0, Par(ParPrefix::Sh, ParKind::Sub8)),
    e(0x0650_0F10, 0x0FF0_0FF0, Par(ParPrefix::U, ParKind::Add16)),
    e(0x0650_0F30, 0x0FF0_0FF0, Par(ParPrefix::U, ParKind::Asx)),
    e(0x0650_0F50, 0x0FF0_0FF0, Par(ParPrefix::U, ParKind::Sax)),
    e(0x0650_0F70, 0x0FF0_0FF0, Par(ParPrefix::U, ParKind::Sub16)),
    e(0x0650_0F90, 0x0FF0_0FF0, Par(ParPrefix::U, ParKind::Add8)),
    e(0x0650_0FF0, 0x0FF0_0FF0, Par(ParPrefix::U, ParKind::Sub8)),
    e(0x0660_0F10, 0x0FF0_0FF0, Par(ParPrefix::Uq, ParKind::Add16)),
    e(0x0660_0F30, 0x0FF0_0FF0, Par(ParPrefix::Uq, ParKind::Asx)),
    e(0x0660_0F50, 0x0FF0_0FF0, Par(ParPrefix::Uq, ParKind::Sax)),
    e(0x0660_0F70, 0x0FF0_0FF0, Par(ParPrefix::Uq, ParKind::Sub16)),
    e(0x0660_0F90, 0x0FF0_0FF0, Par(ParPrefix::Uq, ParKind::Add8)),
    e(0x0660_0FF0, 0x0FF0_0FF0, Par(ParPrefix::Uq, ParKind::Sub8)),
    e(0x0670_0F10, 0x0FF0_0FF0, Par(ParPrefix::Uh, ParKind::Add16)),
    e(0x0670_0F30, 0x0FF0_0FF0, Par(ParPrefix::Uh, ParKind::Asx)),
    e(0x0670_0F50, 0x0FF0_0FF0, Par(ParPrefix::Uh, ParKind::Sax)),
    e(0x0670_0F70, 0x0FF0_0FF0, Par(ParPrefix::Uh, ParKind::Sub16)),
    e(0x0670_0F90, 0x0FF0_0FF0, Par(ParPrefix::Uh, ParKind::Add8)),
    e(0x0670_0FF0, 0x0FF0_0FF0, Par(ParPrefix::Uh, ParKind::Sub8)),
    // Pack, select, extend.
    e(0x0680_0FB0, 0x0FF0_0FF0, Misc(MiscOp::Sel)),
    e(0x0680_0010, 0x0FF0_0030, Pack(PackOp::Pkh)),
    e(0x0680_0070, 0x0FF0_03F0, Pack(PackOp::Sxtb16)),
    e(0x06A0_0070, 0x0FF0_03F0, Pack(PackOp::Sxtb)),
    e(0x06B0_0070, 0x0FF0_03F0, Pack(PackOp::Sxth)),
    e(0x06C0_0070, 0x0FF0_03F0, Pack(PackOp::Uxtb16)),
    e(0x06E0_0070, 0x0FF0_03F0, Pack(PackOp::Uxtb)),
    e(0x06F0_0070, 0x0FF0_03F0, Pack(PackOp::Uxth)),
    // Saturate and reverse.
    e(0x06A0_0F30, 0x0FF0_0FF0, Sat(SatOp::Ssat16)),
    e(0x06BF_0F30, 0x0FFF_0FF0, Misc(MiscOp::Rev)),
    e(0x06BF_0FB0, 0x0FFF_0FF0, Misc(MiscOp::Rev16)),
    e(0x06A0_0010, 0x0FE0_0030, Sat(SatOp::Ssat)),
    e(0x06E0_0F30, 0x0FF0_0FF0, Sat(SatOp::Usat16)),
    e(0x06FF_0F30, 0x0FFF_0FF0, Misc(MiscOp::Rbit)),
    e(0x06FF_0FB0, 0x0FFF_0FF0, Misc(MiscOp::Revsh)),
    e(0x06E0_0010, 0x0FE0_0030, Sat(SatOp::Usat)),
    // Signed dual multiplies and divide.
    e(0x0700_F010, 0x0FF0_F0D0, Mul(MulOp::Smuad)),
    e(0x0700_0010, 0x0FF0_00D0, Mul(MulOp::Smlad)),
    e(0x0700_F050, 0x0FF0_F0D0, Mul(MulOp::Smusd)),
    e(0x0700_0050, 0x0FF0_00D0, Mul(MulOp::Smlsd)),
    e(0x0710_F010, 0x0FF0_F0F0, Div(DivOp::Sdiv)),
    e(0x0730_F010, 0x0FF0_F0F0, Div(DivOp::Udiv)),
    e(0x0740_0010, 0x0FF0_00D0, MulLong(MulLongOp::Smlald)),
    e(0x0740_0050, 0x0FF0_00D0, MulLong(MulLongOp::Smlsld)),
    e(0x0750_F010, 0x0FF0_F0D0, Mul(MulOp::Smmul)),
    e(0x0750_0010, 0x0FF0_00D0, Mul(MulOp::Smmla)),
    e(0x0750_00D0, 0x0FF0_00D0, Mul(MulOp::Smmls)),
    e(0x0780_F010, 0x0FF0_F0F0, Misc(MiscOp::Usad8)),
    e(0x0780_0010, 0x0FF0_00F0, Misc(MiscOp::Usada8)),
    // Bitfields and UDF.
    e(0x07A0_0050, 0x0FE0_0070, Misc(MiscOp::Sbfx)),
    e(0x07C0_001F, 0x0FE0_007F, Misc(MiscOp::Bfc)),
    e(0x07C0_0010, 0x0FE0_0070, Misc(MiscOp::Bfi)),
    e(0x07E0_0050, 0x0FE0_0070, Misc(MiscOp::Ubfx)),
    e(0x07F0_00F0, 0x0FF0_00F0, Exc(ExcOp::Udf)),

    // === Single loads/stores and block transfers ===

    // Single-register PUSH/POP encodings come before the general forms.
    e(0x049D_0004, 0x0FFF_0FFF, Ldstm(LdstmOp::PopR)),
    e(0x052D_0004, 0x0FFF_0FFF, Ldstm(LdstmOp::PushR)),
    e(0x0400_0000, 0x0E50_0000, Ldst(LdstOp::Str)),
    e(0x0410_0000, 0x0E50_0000, Ldst(LdstOp::Ldr)),
    e(0x0440_0000, 0x0E50_0000, Ldst(LdstOp::Strb)),
    e(0x0450_0000, 0x0E50_0000, Ldst(LdstOp::Ldrb)),
    e(0x0800_0000, 0x0E10_0000, Ldstm(LdstmOp::Stm)),
    e(0x0810_0000, 0x0E10_0000, Ldstm(LdstmOp::Ldm)),

    // === Branches ===

    e(0x0A00_0000, 0x0F00_0000, Branch(BranchOp::B)),
    e(0x0B00_0000, 0x0F00_0000, Branch(BranchOp::Bl)),

    // === Coprocessor and VFP space ===

    e(0x0C40_0A10, 0x0FE0_0FD0, VXfer(VXferOp::VmovSs)),
    e(0x0C40_0B10, 0x0FE0_0FD0, VXfer(VXferOp::VmovD)),
    e(0x0D2D_0A00, 0x0FBF_0E00, VfpLdst(VfpLdstOp::Vpush)),
    e(0x0CBD_0A00, 0x0FBF_0E00, VfpLdst(VfpLdstOp::Vpop)),
    e(0x0D00_0A00, 0x0F30_0E00, VfpLdst(VfpLdstOp::Vstr)),
    e(0x0D10_0A00, 0x0F30_0E00, VfpLdst(VfpLdstOp::Vldr)),
    e(0x0C00_0A00, 0x0E10_0E00, VfpLdst(VfpLdstOp::Vstm)),
    e(0x0C10_0A00, 0x0E10_0E00, VfpLdst(VfpLdstOp::Vldm)),
    e(0x0C40_0000, 0x0FF0_0000, Coproc(CoprocOp::Mcrr)),
    e(0x0C50_0000, 0x0FF0_0000, Coproc(CoprocOp::Mrrc)),
    e(0x0C00_0000, 0x0E10_0000, Coproc(CoprocOp::Stc)),
    e(0x0C10_0000, 0x0E10_0000, Coproc(CoprocOp::Ldc)),
    e(0x0EF1_0A10, 0x0FFF_0FFF, VXfer(VXferOp::VmrsFpscr)),
    e(0x0EF0_0A10, 0x0FF0_0FFF, VXfer(VXferOp::VmrsR)),
    e(0x0EE1_0A10, 0x0FFF_0FFF, VXfer(VXferOp::VmsrFpscr)),
    e(0x0EE0_0A10, 0x0FF0_0FFF, VXfer(VXferOp::VmsrR)),
    e(0x0E80_0B10, 0x0F90_0F5F, VXfer(VXferOp::Vdup)),
    e(0x0E00_0B10, 0x0F90_0F1F, VXfer(VXferOp::VmovDx)),
    e(0x0E10_0B10, 0x0F10_0F1F, VXfer(VXferOp::VmovDtDx)),
    e(0x0E00_0A10, 0x0FE0_0F7F, VXfer(VXferOp::VmovS)),
    e(0x0E00_0A00, 0x0F00_0E10, VfpData),
    e(0x0E00_0000, 0x0F00_0010, Coproc(CoprocOp::Cdp)),
    e(0x0E00_0010, 0x0F10_0010, Coproc(CoprocOp::Mcr)),
    e(0x0E10_0010, 0x0F10_0010, Coproc(CoprocOp::Mrc)),
    e(0x0F00_0000, 0x0F00_0000, Exc(ExcOp::Svc)),
];

#[cfg(test)]
mod test {
    use super::*;

    fn lookup(word: u32) -> Option<&'static Entry> {
        DECODE_TABLE.iter().find(|e| word & e.mask == e.data)
    }

    #[test]
    fn specific_entries_win() {
        // MUL R2, R0, R1 decodes as a multiply, not an AND with shift.
        assert_eq!(lookup(0xE002_0091).unwrap().handler, Handler::Mul(MulOp::Mul));
        // BX LR is not an MSR.
        assert_eq!(lookup(0xE12F_FF1E).unwrap().handler, Handler::Branch(BranchOp::BxReg));
        // POP {R0} single-register form beats LDR post-indexed.
        assert_eq!(lookup(0xE49D_0004).unwrap().handler, Handler::Ldstm(LdstmOp::PopR));
        // SSAT16 beats SSAT.
        assert_eq!(lookup(0xE6A3_2F35).unwrap().handler, Handler::Sat(SatOp::Ssat16));
        // BFC (Rm field all ones) beats BFI.
        assert_eq!(lookup(0xE7C5_201F).unwrap().handler, Handler::Misc(MiscOp::Bfc));
        assert_eq!(lookup(0xE7C5_2013).unwrap().handler, Handler::Misc(MiscOp::Bfi));
    }

    #[test]
    fn unallocated_words_fall_through() {
        // TST with S clear is the misc space; this word sits in a hole.
        assert!(lookup(0xE100_0060).is_none());
    }

    #[test]
    fn unconditional_space_is_marked_by_mask() {
        for entry in DECODE_TABLE {
            if entry.data >> 28 == 0xF {
                assert_eq!(entry.mask >> 28, 0xF, "entry {:08X}", entry.data);
            }
        }
    }

    #[test]
    fn data_is_subset_of_mask() {
        for entry in DECODE_TABLE {
            assert_eq!(entry.data & entry.mask, entry.data, "entry {:08X}", entry.data);
        }
    }
}

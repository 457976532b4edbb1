use super::*;
use crate::core::test_utils::{TestCore, TestMem};
use crate::core::{CPSR, FpSysReg, Mode};

// Use to set up the snapshot for a case.
#[derive(Default)]
struct TestIn {
    regs: Vec<u32>,
    cpsr: Option<u32>,
    spsr: Option<u32>,
    mem: Vec<(u32, u32)>,
    instr: u32,
}

impl TestIn {
    fn run_test(&self, expected: &NextAddr) {
        let mut core = TestCore::new();
        for (i, val) in self.regs.iter().enumerate() {
            core.regs[i] = *val;
        }
        if let Some(bits) = self.cpsr {
            core.cpsr = CPSR::from_bits_truncate(bits);
        }
        if let Some(bits) = self.spsr {
            core.spsr = CPSR::from_bits_truncate(bits);
        }
        let mut mem = TestMem::new(0, 0x2000);
        for (addr, word) in &self.mem {
            mem.set_word(*addr, *word);
        }

        let got = next_address(&core, &mem, self.instr);

        if got != *expected {
            println!("{:08X}: got {:?} expected {:?}", self.instr, got, expected);
            assert!(false);
        }
    }
}

fn run_all(data: &[(TestIn, NextAddr)]) {
    for (input, expected) in data {
        input.run_test(expected);
    }
}

#[test]
fn test_failed_condition_is_linear() {
    // Z is clear in the default Svc CPSR, so EQ fails; NE fails with Z set.
    let z_set = Some(0x4000_0013);
    let data = vec![
        // BEQ +0
        (TestIn { instr: 0x0A00_0000, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // MOVNE PC, LR
        (TestIn { instr: 0x11A0_F00E, cpsr: z_set, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // LDMEQ PC!, {R0-R2}
        (TestIn { instr: 0x08BF_0007, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // SDIVEQ PC, R1, R2
        (TestIn { instr: 0x071F_F211, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // SVCNE #0
        (TestIn { instr: 0x1F00_0000, cpsr: z_set, ..Default::default() }, NextAddr::linear()),
        // LDREQ PC, [R1]
        (TestIn { instr: 0x0591_F000, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
    ];
    run_all(&data);
}

#[test]
fn test_non_pc_destination_is_linear() {
    let mut regs = vec![0; 16];
    regs[1] = 0x1234_5678;
    regs[2] = 0x9ABC_DEF0;
    regs[3] = 0x0F0F_0F0F;
    regs[4] = 0xFFFF_FFFF;
    let data = vec![
        // ADD R0, R1, R2
        (TestIn { instr: 0xE081_0002, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
        // MUL R0, R1, R2
        (TestIn { instr: 0xE000_0291, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
        // SMULL R0, R1, R2, R3
        (TestIn { instr: 0xE0C1_0392, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
        // QADD R1, R2, R3
        (TestIn { instr: 0xE103_1052, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
        // UXTB R2, R3
        (TestIn { instr: 0xE6EF_2073, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
        // CLZ R3, R4
        (TestIn { instr: 0xE16F_3F14, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
        // REV R1, R2
        (TestIn { instr: 0xE6BF_1F32, regs: regs.clone(), ..Default::default() }, NextAddr::linear()),
    ];
    run_all(&data);
}

#[test]
fn test_overlay_preserves_address_and_state() {
    let mut regs = vec![0; 16];
    regs[1] = 0x2000;
    let data = vec![
        // MOV PC, R1, LSL R2: register-shifted into the PC.
        (
            TestIn { instr: 0xE1A0_F211, regs: regs.clone(), ..Default::default() },
            NextAddr::arm(0x2000).unpredictable(),
        ),
        // STREX PC, R2, [R3]: assumed-success status into the PC.
        (
            TestIn { instr: 0xE183_FF92, regs: vec![0; 16], ..Default::default() },
            NextAddr::arm(0).unpredictable(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_shift_zero_amount_encodings() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // MOV PC, R1, LSR #0 encodes LSR #32.
        (
            TestIn { instr: 0xE1A0_F021, regs: reg(1, 0xFFFF_FFFF), ..Default::default() },
            NextAddr::arm(0),
        ),
        // MOV PC, R1, ASR #0 encodes ASR #32: sign fill.
        (
            TestIn { instr: 0xE1A0_F041, regs: reg(1, 0x8000_0000), ..Default::default() },
            NextAddr::thumb(0xFFFF_FFFE),
        ),
        (
            TestIn { instr: 0xE1A0_F041, regs: reg(1, 0x7FFF_FFFF), ..Default::default() },
            NextAddr::arm(0),
        ),
        // MOV PC, R1, ROR #0 encodes RRX: carry lands in bit 31.
        (
            TestIn {
                instr: 0xE1A0_F061,
                regs: reg(1, 0x10),
                cpsr: Some(0x2000_0013),
                ..Default::default()
            },
            NextAddr::arm(0x8000_0008),
        ),
        (
            TestIn { instr: 0xE1A0_F061, regs: reg(1, 0x10), ..Default::default() },
            NextAddr::arm(0x8),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_branch_immediate() {
    let at = |pc: u32| {
        let mut regs = vec![0; 16];
        regs[15] = pc;
        regs
    };
    let data = vec![
        // B .+4 from 0x8000.
        (TestIn { instr: 0xEA00_0001, regs: at(0x8000), ..Default::default() }, NextAddr::arm(0x800C)),
        // B .-0 (branch to self + 8 - 8).
        (TestIn { instr: 0xEAFF_FFFE, regs: at(0x8000), ..Default::default() }, NextAddr::arm(0x8000)),
        // BL forward.
        (TestIn { instr: 0xEB00_0010, regs: at(0x100), ..Default::default() }, NextAddr::arm(0x148)),
        // BLX (immediate) switches to Thumb; H supplies the extra halfword.
        (TestIn { instr: 0xFA00_0002, regs: at(0), ..Default::default() }, NextAddr::thumb(0x10)),
        (TestIn { instr: 0xFB00_0002, regs: at(0), ..Default::default() }, NextAddr::thumb(0x12)),
        // BNE taken.
        (TestIn { instr: 0x1A00_0001, regs: at(0x400), ..Default::default() }, NextAddr::arm(0x40C)),
    ];
    run_all(&data);
}

#[test]
fn test_branch_register_interworking() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // BX R1: bit 0 selects Thumb.
        (TestIn { instr: 0xE12F_FF11, regs: reg(1, 0x2001), ..Default::default() }, NextAddr::thumb(0x2000)),
        (TestIn { instr: 0xE12F_FF11, regs: reg(1, 0x4000), ..Default::default() }, NextAddr::arm(0x4000)),
        // Bit 1 set without bit 0 cannot interwork: linear, flagged.
        (
            TestIn { instr: 0xE12F_FF11, regs: reg(1, 0x4002), ..Default::default() },
            NextAddr::linear().unpredictable(),
        ),
        // BLX R2.
        (TestIn { instr: 0xE12F_FF32, regs: reg(2, 0x3000), ..Default::default() }, NextAddr::arm(0x3000)),
        // BX PC reads the pipelined PC and is flagged.
        (
            TestIn { instr: 0xE12F_FF1F, regs: reg(15, 0x1000), ..Default::default() },
            NextAddr::arm(0x1008).unpredictable(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_mov_pc_lr() {
    let mut regs = vec![0; 16];
    regs[14] = 0x1001;
    TestIn { instr: 0xE1A0_F00E, regs, ..Default::default() }
        .run_test(&NextAddr::thumb(0x1000));
}

#[test]
fn test_exception_return_forms() {
    let lr = |v: u32| {
        let mut regs = vec![0; 16];
        regs[14] = v;
        regs
    };
    let data = vec![
        // SUBS PC, LR, #4 with SPSR.T set: Thumb at the halfword boundary.
        (
            TestIn { instr: 0xE25E_F004, regs: lr(0x3005), spsr: Some(0x30), ..Default::default() },
            NextAddr::thumb(0x3000),
        ),
        // MOVS PC, LR with SPSR.T clear: ARM, word aligned.
        (
            TestIn { instr: 0xE1B0_F00E, regs: lr(0x4003), spsr: Some(0x13), ..Default::default() },
            NextAddr::arm(0x4000),
        ),
        // From Usr there is no SPSR: the step traps to the SVC vector.
        (
            TestIn { instr: 0xE1B0_F00E, regs: lr(0x4000), cpsr: Some(0x10), ..Default::default() },
            NextAddr::arm(0x8).unpredictable(),
        ),
        // From Hyp the form is UNDEFINED; ERET is the only way back.
        (
            TestIn { instr: 0xE1B0_F00E, regs: lr(0x4000), cpsr: Some(0x1A), ..Default::default() },
            NextAddr::undefined(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_eret() {
    let mut core = TestCore::with_mode(0x1A);
    core.elr_hyp = 0x5000;
    let mem = TestMem::new(0, 0x100);
    assert_eq!(
        next_address(&core, &mem, 0xE160_006E),
        NextAddr::arm(0x5000).unpredictable()
    );

    let mut core = TestCore::new();
    core.regs[14] = 0x6000;
    assert_eq!(next_address(&core, &mem, 0xE160_006E), NextAddr::arm(0x6000));

    let core = TestCore::with_mode(0x10);
    assert_eq!(next_address(&core, &mem, 0xE160_006E), NextAddr::undefined());
}

#[test]
fn test_sdiv_into_pc() {
    let regs = |n: u32, d: u32| {
        let mut regs = vec![0; 16];
        regs[1] = n;
        regs[2] = d;
        regs
    };
    let data = vec![
        // SDIV PC, R1, R2 with a zero divisor yields 0.
        (
            TestIn { instr: 0xE71F_F211, regs: regs(100, 0), ..Default::default() },
            NextAddr::arm(0).unpredictable(),
        ),
        // Signed division truncates toward zero.
        (
            TestIn { instr: 0xE71F_F211, regs: regs(0xFFFF_FFF9, 2), ..Default::default() },
            NextAddr::arm(0xFFFF_FFFD).unpredictable(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_multiply_into_pc() {
    let smmla_regs = {
        let mut regs = vec![0; 16];
        regs[1] = 0x7FFF_FFFF;
        regs[2] = 0x7FFF_FFFF;
        regs[3] = 0x7FFF_FFFF;
        regs
    };
    let mul_regs = {
        let mut regs = vec![0; 16];
        regs[2] = 3;
        regs[15] = 0x1000;
        regs
    };
    let uxtb_regs = {
        let mut regs = vec![0; 16];
        regs[15] = 0x1134;
        regs
    };
    let data = vec![
        // SMMLA PC, R1, R2, R3 at the i64 boundary: the accumulate wraps.
        (
            TestIn { instr: 0xE75F_3211, regs: smmla_regs, ..Default::default() },
            NextAddr::arm(0xBFFF_FFFE).unpredictable(),
        ),
        // MUL PC, PC, R2: the PC operand reads as the pipelined PC.
        (
            TestIn { instr: 0xE00F_029F, regs: mul_regs, ..Default::default() },
            NextAddr::arm(0x3018).unpredictable(),
        ),
        // UXTB PC, PC likewise extends the pipelined PC's low byte.
        (
            TestIn { instr: 0xE6EF_F07F, regs: uxtb_regs, ..Default::default() },
            NextAddr::arm(0x3C).unpredictable(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_block_transfers() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // LDMIA PC!, {R0-R2}: writeback wins, base advances by 12.
        (
            TestIn { instr: 0xE8BF_0007, regs: reg(15, 0x4000), ..Default::default() },
            NextAddr::arm(0x400C).unpredictable(),
        ),
        // The PC is the highest register, so IA loads it from the last slot.
        (
            TestIn {
                instr: 0xE891_8001,
                regs: reg(1, 0x100),
                mem: vec![(0x104, 0x2001)],
                ..Default::default()
            },
            NextAddr::thumb(0x2000),
        ),
        // DB: one word below the base.
        (
            TestIn {
                instr: 0xE911_8001,
                regs: reg(1, 0x110),
                mem: vec![(0x10C, 0x3000)],
                ..Default::default()
            },
            NextAddr::arm(0x3000),
        ),
        // IB: 4 * count above the base.
        (
            TestIn {
                instr: 0xE991_8000,
                regs: reg(1, 0x100),
                mem: vec![(0x104, 0x4000)],
                ..Default::default()
            },
            NextAddr::arm(0x4000),
        ),
        // DA: the PC slot is the base itself.
        (
            TestIn {
                instr: 0xE811_8001,
                regs: reg(1, 0x108),
                mem: vec![(0x108, 0x4500)],
                ..Default::default()
            },
            NextAddr::arm(0x4500),
        ),
        // LDMIA R1, {R0, PC}^ restores the SPSR: its T bit decides.
        (
            TestIn {
                instr: 0xE8D1_8001,
                regs: reg(1, 0x100),
                spsr: Some(0x30),
                mem: vec![(0x104, 0x5005)],
                ..Default::default()
            },
            NextAddr::thumb(0x5004),
        ),
        // POP {PC}.
        (
            TestIn {
                instr: 0xE49D_F004,
                regs: reg(13, 0x200),
                mem: vec![(0x200, 0x6001)],
                ..Default::default()
            },
            NextAddr::thumb(0x6000),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_single_loads_and_stores() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // LDR PC, [R1].
        (
            TestIn {
                instr: 0xE591_F000,
                regs: reg(1, 0x180),
                mem: vec![(0x180, 0x7000)],
                ..Default::default()
            },
            NextAddr::arm(0x7000),
        ),
        // LDR R0, [PC, #8]: a PC base without writeback stays linear.
        (
            TestIn { instr: 0xE59F_0008, regs: reg(15, 0x1000), ..Default::default() },
            NextAddr::linear(),
        ),
        // STR R0, [PC], #4: post-index writeback moves the PC.
        (
            TestIn { instr: 0xE48F_0004, regs: reg(15, 0x1000), ..Default::default() },
            NextAddr::arm(0x100C).unpredictable(),
        ),
        // LDRB PC, [R1]: byte into the PC.
        (
            TestIn {
                instr: 0xE5D1_F000,
                regs: reg(1, 0x184),
                mem: vec![(0x184, 0x30)],
                ..Default::default()
            },
            NextAddr::arm(0x30),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_halfword_and_dual() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // LDRH PC, [R1] is always flagged.
        (
            TestIn {
                instr: 0xE1D1_F0B0,
                regs: reg(1, 0x190),
                mem: vec![(0x190, 0x2000)],
                ..Default::default()
            },
            NextAddr::arm(0x2000).unpredictable(),
        ),
        // LDRSB sign extends.
        (
            TestIn {
                instr: 0xE1D1_F0D0,
                regs: reg(1, 0x194),
                mem: vec![(0x194, 0x80)],
                ..Default::default()
            },
            NextAddr::arm(0xFFFF_FF80).unpredictable(),
        ),
        // LDRD R14, [R1]: the second word lands in the PC.
        (
            TestIn {
                instr: 0xE1C1_E0D0,
                regs: reg(1, 0x1A0),
                mem: vec![(0x1A4, 0x9000)],
                ..Default::default()
            },
            NextAddr::arm(0x9000).unpredictable(),
        ),
        // LDRD with an odd Rt has no encoding.
        (
            TestIn { instr: 0xE1C1_10D0, regs: reg(1, 0x1A0), ..Default::default() },
            NextAddr::undefined(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_exclusives_and_swap() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // LDREX PC, [R1].
        (
            TestIn {
                instr: 0xE191_FF9F,
                regs: reg(1, 0x1B0),
                mem: vec![(0x1B0, 0xA000)],
                ..Default::default()
            },
            NextAddr::arm(0xA000).unpredictable(),
        ),
        // LDREX R0, [R1].
        (
            TestIn { instr: 0xE191_0F9F, regs: reg(1, 0x1B0), ..Default::default() },
            NextAddr::linear(),
        ),
        // STREX R0, R2, [R3].
        (
            TestIn { instr: 0xE183_0F92, regs: reg(3, 0x1B0), ..Default::default() },
            NextAddr::linear(),
        ),
        // SWP PC, R2, [R3].
        (
            TestIn {
                instr: 0xE103_F092,
                regs: reg(3, 0x1C0),
                mem: vec![(0x1C0, 0xB000)],
                ..Default::default()
            },
            NextAddr::arm(0xB000).unpredictable(),
        ),
        (
            TestIn { instr: 0xE103_0092, regs: reg(3, 0x1C0), ..Default::default() },
            NextAddr::linear(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_status_moves() {
    let data = vec![
        // MRS R0, CPSR.
        (TestIn { instr: 0xE10F_0000, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // MRS PC, CPSR deposits the status word in the PC.
        (
            TestIn { instr: 0xE10F_F000, regs: vec![0; 16], ..Default::default() },
            NextAddr::arm(0x13).unpredictable(),
        ),
        // MSR CPSR_c, R0.
        (TestIn { instr: 0xE121_F000, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // MSR with an empty field mask.
        (
            TestIn { instr: 0xE120_F000, regs: vec![0; 16], ..Default::default() },
            NextAddr::linear().unpredictable(),
        ),
        // CPSID i.
        (TestIn { instr: 0xF10C_0080, ..Default::default() }, NextAddr::linear()),
        // CPS with imod = 0b01 is malformed.
        (
            TestIn { instr: 0xF104_0000, ..Default::default() },
            NextAddr::linear().unpredictable(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_banked_mrs() {
    let mem = TestMem::new(0, 0x100);

    // MRS R0, SP_svc from Mon.
    let mut core = TestCore::with_mode(0x16);
    core.banked.push((Mode::Svc, 13, 0xC0C0));
    assert_eq!(next_address(&core, &mem, 0xE103_0300), NextAddr::linear());

    // The same encoding with Rd = PC jumps to the banked value.
    assert_eq!(
        next_address(&core, &mem, 0xE103_F300),
        NextAddr::arm(0xC0C0).unpredictable()
    );

    // A mode cannot read its own banked copies.
    let core = TestCore::new();
    assert_eq!(
        next_address(&core, &mem, 0xE103_0300),
        NextAddr::linear().unpredictable()
    );
}

#[test]
fn test_rfe() {
    let reg = |n: usize, v: u32| {
        let mut regs = vec![0; 16];
        regs[n] = v;
        regs
    };
    let data = vec![
        // RFEIA R1: PC word at the base, CPSR above it; T set means Thumb.
        (
            TestIn {
                instr: 0xF8B1_0A00,
                regs: reg(1, 0x1D0),
                mem: vec![(0x1D0, 0x1234), (0x1D4, 0x20)],
                ..Default::default()
            },
            NextAddr::thumb(0x1234),
        ),
        // RFEDB R1: PC word two below the base.
        (
            TestIn {
                instr: 0xF911_0A00,
                regs: reg(1, 0x1E0),
                mem: vec![(0x1D8, 0x5678), (0x1DC, 0x0)],
                ..Default::default()
            },
            NextAddr::arm(0x5678),
        ),
        // RFE from Hyp.
        (
            TestIn { instr: 0xF8B1_0A00, regs: reg(1, 0x1D0), cpsr: Some(0x1A), ..Default::default() },
            NextAddr::undefined(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_srs() {
    let sp = {
        let mut regs = vec![0; 16];
        regs[13] = 0x1F0;
        regs
    };
    let data = vec![
        // SRSIA SP!, #svc.
        (TestIn { instr: 0xF8CD_0513, regs: sp.clone(), ..Default::default() }, NextAddr::linear()),
        // Hyp as the target mode is not allowed.
        (
            TestIn { instr: 0xF8CD_051A, regs: sp.clone(), ..Default::default() },
            NextAddr::linear().unpredictable(),
        ),
    ];
    run_all(&data);
}

#[test]
fn test_vfp() {
    let mem = TestMem::new(0, 0x100);

    // VLDMIA PC!, {S0-S3}: writeback on a PC base.
    let mut core = TestCore::new();
    core.regs[15] = 0x2000;
    assert_eq!(
        next_address(&core, &mem, 0xECBF_0A04),
        NextAddr::arm(0x2010).unpredictable()
    );

    // VLDR S0, [R1] never moves.
    let mut core = TestCore::new();
    core.regs[1] = 0x40;
    assert_eq!(next_address(&core, &mem, 0xED91_0A00), NextAddr::linear());

    // VMOV PC, S1.
    let mut core = TestCore::new();
    core.vregs[1] = 0xC000;
    assert_eq!(
        next_address(&core, &mem, 0xEE10_FA90),
        NextAddr::arm(0xC000).unpredictable()
    );

    // VMRS APSR_nzcv, FPSCR writes the flags, not the PC.
    let core = TestCore::new();
    assert_eq!(next_address(&core, &mem, 0xEEF1_FA10), NextAddr::linear());

    // VMRS PC, FPSID takes the provider's value.
    let mut core = TestCore::new();
    core.fpsys.push((FpSysReg::Fpsid, 0xD000));
    assert_eq!(
        next_address(&core, &mem, 0xEEF0_FA10),
        NextAddr::arm(0xD000).unpredictable()
    );

    // VMOV S0, R0.
    let core = TestCore::new();
    assert_eq!(next_address(&core, &mem, 0xEE00_0A10), NextAddr::linear());
}

#[test]
fn test_coprocessor_space() {
    let data = vec![
        // MRC p15, 0, PC, c0, c0, 0: flag-setting form, linear but flagged.
        (
            TestIn { instr: 0xEE10_FF10, regs: vec![0; 16], ..Default::default() },
            NextAddr::linear().unpredictable(),
        ),
        // MRC into a general register.
        (TestIn { instr: 0xEE10_1F10, regs: vec![0; 16], ..Default::default() }, NextAddr::linear()),
        // LDC with P, U, D and W all clear is unallocated.
        (TestIn { instr: 0xEC10_1100, regs: vec![0; 16], ..Default::default() }, NextAddr::undefined()),
    ];
    run_all(&data);
}

#[test]
fn test_unallocated_words_are_undefined() {
    let data = vec![
        // A hole in the misc space.
        (TestIn { instr: 0xE100_0010, ..Default::default() }, NextAddr::undefined()),
        // Unallocated 0b1111-condition encodings never reach the
        // conditional entries.
        (TestIn { instr: 0xFFFF_FFFF, ..Default::default() }, NextAddr::undefined()),
        // The permanently-undefined encoding.
        (TestIn { instr: 0xE7F0_00F0, ..Default::default() }, NextAddr::undefined()),
    ];
    run_all(&data);
}

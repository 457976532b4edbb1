/// Shared test doubles: a snapshot with settable state and a simple memory.

use crate::core::*;
use crate::memory::Mem32;

/// A snapshot double. Fields are public so tests can poke exactly the state
/// a case needs; everything defaults to zero / Svc mode / secure state.
pub struct TestCore {
    pub regs: [u32; 16],
    pub cpsr: CPSR,
    pub spsr: SPSR,
    pub banked: Vec<(Mode, usize, u32)>,
    pub banked_spsrs: Vec<(Mode, SPSR)>,
    pub elr_hyp: u32,
    pub vregs: [u32; 64],
    pub sec_state: SecState,
    pub scr: u32,
    pub hcr: u32,
    pub nsacr: u32,
    pub fpsys: Vec<(FpSysReg, u32)>,
}

impl TestCore {
    pub fn new() -> Self {
        Self {
            regs: [0; 16],
            cpsr: CPSR::from_bits_truncate(0x13),
            spsr: CPSR::default(),
            banked: Vec::new(),
            banked_spsrs: Vec::new(),
            elr_hyp: 0,
            vregs: [0; 64],
            sec_state: SecState::Secure,
            scr: 0,
            hcr: 0,
            nsacr: 0,
            fpsys: Vec::new(),
        }
    }

    pub fn with_mode(mode_bits: u32) -> Self {
        let mut core = Self::new();
        core.cpsr = CPSR::from_bits_truncate(mode_bits);
        core
    }
}

impl FpSysRegs for TestCore {
    fn read_fpsys(&self, reg: FpSysReg) -> u32 {
        self.fpsys.iter().find(|(r, _)| *r == reg).map(|(_, v)| *v).unwrap_or(0)
    }
}

impl StepSource for TestCore {
    fn reg(&self, n: usize) -> u32 {
        self.regs[n]
    }

    fn cpsr(&self) -> CPSR {
        self.cpsr
    }

    fn spsr(&self) -> SPSR {
        self.spsr
    }

    fn banked_reg(&self, mode: Mode, n: usize) -> u32 {
        self.banked.iter()
            .find(|(m, i, _)| *m == mode && *i == n)
            .map(|(_, _, v)| *v)
            .unwrap_or(0)
    }

    fn banked_spsr(&self, mode: Mode) -> SPSR {
        self.banked_spsrs.iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }

    fn elr_hyp(&self) -> u32 {
        self.elr_hyp
    }

    fn vreg(&self, n: usize) -> u32 {
        self.vregs[n]
    }

    fn sec_state(&self) -> SecState {
        self.sec_state
    }

    fn scr(&self) -> u32 {
        self.scr
    }

    fn hcr(&self) -> u32 {
        self.hcr
    }

    fn nsacr(&self) -> u32 {
        self.nsacr
    }
}

/// Word-addressed memory starting at a base address.
pub struct TestMem {
    base: u32,
    words: Vec<u32>,
}

impl TestMem {
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            words: vec![0; size / 4],
        }
    }

    pub fn set_word(&mut self, addr: u32, data: u32) {
        let idx = ((addr - self.base) >> 2) as usize;
        self.words[idx] = data;
    }
}

impl Mem32 for TestMem {
    fn load_byte(&self, addr: u32) -> u8 {
        let idx = ((addr - self.base) >> 2) as usize;
        let shift = (addr & 3) * 8;
        (self.words[idx] >> shift) as u8
    }

    fn load_halfword(&self, addr: u32) -> u16 {
        let idx = ((addr - self.base) >> 2) as usize;
        let shift = (addr & 2) * 8;
        (self.words[idx] >> shift) as u16
    }

    fn load_word(&self, addr: u32) -> u32 {
        let idx = ((addr - self.base) >> 2) as usize;
        self.words[idx]
    }
}

#![allow(dead_code)]

use m32x::bus::{Lanes, LaneRam, SystemBus};
use m32x::sched::{Scheduler, SyncState, Thread, ThreadId};
use m32x::shm::{ExecutionUnit, MemoryPak, Sh2Interface, Sh2Registers};

/// 68000 clock on an NTSC console.
pub const M68K_HZ: u64 = 7_670_454;

/// Shared-bus word the companion keeps incrementing.
pub const COMM_PORT: u32 = 0x20;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn boot_pak(pc: u32, sp: u32) -> MemoryPak {
    let mut bytes = pc.to_be_bytes().to_vec();
    bytes.extend_from_slice(&sp.to_be_bytes());
    MemoryPak::new().with("sh2.boot.mrom", bytes)
}

/// Interprets the handful of SH-2 data-move encodings the integration programs use.
#[derive(Debug, Default)]
pub struct MiniSh2 {
    pub registers: Sh2Registers,
    pub unknown: Vec<u16>,
}

impl ExecutionUnit for MiniSh2 {
    fn registers(&self) -> &Sh2Registers {
        &self.registers
    }

    fn registers_mut(&mut self) -> &mut Sh2Registers {
        &mut self.registers
    }

    fn power(&mut self) {
        self.registers = Sh2Registers::default();
    }

    fn instruction(&mut self, port: &mut dyn Sh2Interface) {
        let regs = &mut self.registers;
        let opcode = port.read_word(regs.pc);
        regs.pc = regs.pc.wrapping_add(2);

        let n = ((opcode >> 8) & 0xf) as usize;
        let m = ((opcode >> 4) & 0xf) as usize;
        let imm = opcode as u8 as i8 as i32 as u32;
        match (opcode >> 12, opcode & 0xf) {
            (0x0, _) if opcode == 0x0009 => {}
            // MOV.B Rm,@Rn
            (0x2, 0x0) => port.write_byte(regs.r[n], regs.r[m] as u8),
            // MOV.W Rm,@Rn
            (0x2, 0x1) => port.write_word(regs.r[n], regs.r[m] as u16),
            // MOV.L Rm,@Rn
            (0x2, 0x2) => port.write_long(regs.r[n], regs.r[m]),
            // MOV.W Rm,@-Rn
            (0x2, 0x5) => {
                regs.r[n] = regs.r[n].wrapping_sub(2);
                port.write_word(regs.r[n], regs.r[m] as u16);
            }
            // MOV.B @Rm,Rn
            (0x6, 0x0) => regs.r[n] = port.read_byte(regs.r[m]) as i8 as i32 as u32,
            // MOV.W @Rm,Rn
            (0x6, 0x1) => regs.r[n] = port.read_word(regs.r[m]) as i16 as i32 as u32,
            // MOV.L @Rm,Rn
            (0x6, 0x2) => regs.r[n] = port.read_long(regs.r[m]),
            // ADD #imm,Rn
            (0x7, _) => regs.r[n] = regs.r[n].wrapping_add(imm),
            // MOV #imm,Rn
            (0xe, _) => regs.r[n] = imm,
            _ => self.unknown.push(opcode),
        }
    }
}

/// Stand-in for the 68000: bumps the comm port once per cycle.
pub struct Companion {
    pub id: ThreadId,
    pub shm: Option<ThreadId>,
    pub counter: u16,
}

impl Thread<LaneRam> for Companion {
    fn thread(&self) -> Option<ThreadId> {
        Some(self.id)
    }

    fn enter(&mut self, scheduler: &mut Scheduler, bus: &mut LaneRam) {
        loop {
            self.counter = self.counter.wrapping_add(1);
            bus.write_internal(Lanes::all(), COMM_PORT, self.counter);
            scheduler.step(self.id, 1);

            let Some(shm) = self.shm else { return };
            if scheduler.synchronize(self.id, shm) == SyncState::Yield {
                return;
            }
        }
    }
}

/// Write `program` as consecutive big-endian words starting at `address`.
pub fn place(ram: &mut LaneRam, address: u32, program: &[u16]) {
    for (i, &word) in program.iter().enumerate() {
        ram.set_word(address + 2 * i as u32, word);
    }
}

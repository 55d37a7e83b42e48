#![allow(dead_code)]

use m32x_shm::{ExecutionUnit, MemoryPak, Sh2Interface, Sh2Registers};

/// Fetches the word at PC, logs it and moves on; stands in for a real SH-2 decoder.
#[derive(Debug, Default)]
pub struct FetchUnit {
    pub registers: Sh2Registers,
    pub fetched: Vec<(u32, u16)>,
    pub exceptions_seen: Vec<bool>,
    pub powered: u32,
}

impl ExecutionUnit for FetchUnit {
    fn registers(&self) -> &Sh2Registers {
        &self.registers
    }

    fn registers_mut(&mut self) -> &mut Sh2Registers {
        &mut self.registers
    }

    fn power(&mut self) {
        self.registers = Sh2Registers::default();
        self.powered += 1;
    }

    fn instruction(&mut self, port: &mut dyn Sh2Interface) {
        let pc = self.registers.pc;
        let opcode = port.read_word(pc);
        self.fetched.push((pc, opcode));
        self.exceptions_seen.push(port.exception());

        // Store the fetched opcode just below SP so runs leave a trace in memory.
        let sp = self.registers.sp().wrapping_sub(4);
        port.write_long(sp, (pc << 16) | opcode as u32);
        self.registers.set_sp(sp);
        self.registers.pc = pc.wrapping_add(2);
    }
}

/// Boot ROM bytes whose reset vector is `pc` and whose stack pointer is `sp`.
pub fn boot_rom(pc: u32, sp: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&pc.to_be_bytes());
    bytes.extend_from_slice(&sp.to_be_bytes());
    bytes
}

pub fn pak(pc: u32, sp: u32) -> MemoryPak {
    MemoryPak::new().with("sh2.boot.mrom", boot_rom(pc, sp))
}

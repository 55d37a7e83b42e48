use m32x_bus::CpuBus;

/// `R15` doubles as the stack pointer.
pub const STACK_POINTER: usize = 15;

/// SH-2 architectural registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sh2Registers {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub sr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
}

impl Sh2Registers {
    /// Interrupt mask bits I3..I0 in SR.
    pub const SR_IMASK: u32 = 0x0000_00f0;

    pub fn sp(&self) -> u32 {
        self.r[STACK_POINTER]
    }

    pub fn set_sp(&mut self, value: u32) {
        self.r[STACK_POINTER] = value;
    }
}

impl Default for Sh2Registers {
    /// Power-on state: everything cleared except the interrupt mask, which starts fully raised.
    fn default() -> Self {
        Self {
            r: [0; 16],
            pc: 0,
            pr: 0,
            sr: Self::SR_IMASK,
            gbr: 0,
            vbr: 0,
            mach: 0,
            macl: 0,
        }
    }
}

/// What an executing instruction can reach: memory through the bus adapter, and the pending
/// exception query.
pub trait Sh2Interface: CpuBus {
    /// Whether an interrupt or exception is waiting to be serviced.
    ///
    /// Must be a pure query; the core polls it between instructions.
    fn exception(&self) -> bool;
}

/// Instruction decoder/executor for the SH-2 instruction set.
pub trait ExecutionUnit {
    fn registers(&self) -> &Sh2Registers;
    fn registers_mut(&mut self) -> &mut Sh2Registers;

    /// Reset core state to its power-on values.
    fn power(&mut self);

    /// Decode and execute exactly one instruction.
    fn instruction(&mut self, port: &mut dyn Sh2Interface);
}

/// Per-instruction notification for debuggers. Must not alter emulated state.
pub trait InspectionHook {
    fn instruction(&mut self, registers: &Sh2Registers, cycle: u64);
}

impl<F: FnMut(&Sh2Registers, u64)> InspectionHook for F {
    fn instruction(&mut self, registers: &Sh2Registers, cycle: u64) {
        self(registers, cycle)
    }
}

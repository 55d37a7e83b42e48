use m32x_bus::{BusWidthAdapter, CpuBus, SystemBus};
use m32x_debug::{DebugTree, NodeId, NodeKind};
use m32x_sched::{Scheduler, SyncState, Thread, ThreadId};

use crate::debugger::BusTap;
use crate::{
    BootImage, BootImageError, Debugger, ExecutionUnit, FilePak, Sh2Interface, ShmConfig,
    ShmError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No execution context yet (never powered, or unloaded).
    Unstarted,
    Running,
    /// Powered off; `power` starts it again.
    Halted,
}

/// The secondary SH-2 of the 32X.
pub struct Shm<E> {
    config: ShmConfig,
    unit: E,
    boot_rom: Option<BootImage>,
    node: Option<NodeId>,
    debugger: Debugger,
    thread: Option<ThreadId>,
    companion: Option<ThreadId>,
    state: RunState,
}

impl<E: ExecutionUnit> Shm<E> {
    pub fn new(config: ShmConfig, unit: E) -> Result<Self, ShmError> {
        config.validate()?;
        let debugger = Debugger::new(config.trace_capacity);
        Ok(Self {
            config,
            unit,
            boot_rom: None,
            node: None,
            debugger,
            thread: None,
            companion: None,
            state: RunState::Unstarted,
        })
    }

    /// Allocate the boot ROM, fill it from `pak` and register the debug nodes.
    ///
    /// A missing pak or a pak without the boot ROM stream is not an error: the ROM stays
    /// zero-filled and the SHM boots to address 0. Calling `load` again replaces the previous
    /// ROM and debug registration; an attached hook and the tracer setup are kept.
    pub fn load(&mut self, pak: Option<&dyn FilePak>, tree: &mut DebugTree) -> Result<(), ShmError> {
        self.release(tree);

        let node = tree.append(None, "SHM", NodeKind::Object);
        self.node = Some(node);

        let name = &self.config.boot_rom_name;
        let mut image = BootImage::zeroed(self.config.boot_rom_cells);
        let filled = match pak.and_then(|pak| pak.read(name)) {
            Some(stream) => image.fill_from(stream),
            None => {
                tracing::info!(%name, "boot ROM not found; SHM boots from zero-filled memory");
                Ok(0)
            }
        };
        let size = image.size_bytes();
        self.boot_rom = Some(image);

        let filled = filled.map_err(|source| BootImageError::Io {
            name: name.clone(),
            source,
        })?;
        tracing::debug!(%name, cells = filled, "loaded SHM boot ROM");

        self.debugger.attach(tree, node, size);
        Ok(())
    }

    /// Tear down everything `load` and `power` set up, including the attached hook and tracer
    /// contents. Safe to call in any state, repeatedly.
    pub fn unload(&mut self, tree: &mut DebugTree, scheduler: &mut Scheduler) {
        self.release(tree);
        self.debugger.reset();
        let thread = self.thread.take();
        if let Some(id) = thread {
            scheduler.remove(id);
        }
        self.companion = None;
        self.state = RunState::Unstarted;
        tracing::debug!(?thread, "SHM unloaded");
    }

    /// Power on or reset the SHM.
    ///
    /// Every call re-creates the execution context: the previous one (if any) is removed and a
    /// fresh clock joins the scheduler alongside `companion`. The core is reset and PC/SP are
    /// loaded from the first two longs of the boot ROM.
    pub fn power(
        &mut self,
        reset: bool,
        scheduler: &mut Scheduler,
        companion: Option<ThreadId>,
    ) -> Result<(), ShmError> {
        if let Some(id) = self.thread.take() {
            scheduler.remove(id);
        }
        let id = scheduler.create(self.config.frequency_hz)?;
        self.thread = Some(id);
        self.companion = companion;

        self.unit.power();
        let pc = self.boot_long(0);
        let sp = self.boot_long(2);
        let registers = self.unit.registers_mut();
        registers.pc = pc;
        registers.set_sp(sp);

        self.state = RunState::Running;
        self.debugger.power(reset);
        tracing::debug!(reset, %id, pc, sp, "SHM powered");
        Ok(())
    }

    /// Stop the SHM and detach its execution context.
    pub fn power_off(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.thread.take() {
            scheduler.remove(id);
        }
        if self.state == RunState::Running {
            self.state = RunState::Halted;
        }
    }

    /// Run one instruction and advance by one cycle.
    pub fn main<B: SystemBus + ?Sized>(
        &mut self,
        scheduler: &mut Scheduler,
        bus: &mut B,
    ) -> SyncState {
        let Some(id) = self.thread.filter(|_| self.state == RunState::Running) else {
            return SyncState::Yield;
        };

        let cycle = scheduler.clock(id).map_or(0, |clock| clock.cycles());
        self.debugger.instruction(self.unit.registers(), cycle);

        let exception = self.exception();
        let mut tap = BusTap {
            bus,
            tracer: self.debugger.bus_tracer(),
            cycle,
        };
        let mut port = Port {
            adapter: BusWidthAdapter::new(&mut tap),
            exception,
        };
        self.unit.instruction(&mut port);

        self.step(scheduler, 1)
    }

    /// Advance the SHM clock and synchronize with the companion.
    pub fn step(&mut self, scheduler: &mut Scheduler, clocks: u64) -> SyncState {
        let Some(id) = self.thread else {
            return SyncState::Yield;
        };
        scheduler.step(id, clocks);
        match self.companion {
            Some(companion) => scheduler.synchronize(id, companion),
            None => SyncState::Yield,
        }
    }

    /// Pending interrupt/exception query; no sources are wired to the SHM yet.
    pub fn exception(&self) -> bool {
        false
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &ShmConfig {
        &self.config
    }

    pub fn unit(&self) -> &E {
        &self.unit
    }

    pub fn unit_mut(&mut self) -> &mut E {
        &mut self.unit
    }

    pub fn boot_rom(&self) -> Option<&BootImage> {
        self.boot_rom.as_ref()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn thread_id(&self) -> Option<ThreadId> {
        self.thread
    }

    pub fn companion(&self) -> Option<ThreadId> {
        self.companion
    }

    /// Read a byte of a memory registered under the `SHM` debug node.
    ///
    /// Returns `None` if `node` is not one of this SHM's memory nodes or `address` lies past its
    /// end. Never touches the shared bus.
    pub fn read_memory(&self, node: NodeId, address: u32) -> Option<u8> {
        if self.debugger.memory_node() != Some(node) {
            return None;
        }
        let rom = self.boot_rom.as_ref()?;
        (address < rom.size_bytes()).then(|| rom.read_byte(address))
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    fn release(&mut self, tree: &mut DebugTree) {
        self.debugger.detach(tree);
        self.boot_rom = None;
        if let Some(node) = self.node.take() {
            tree.remove(node);
        }
    }

    fn boot_long(&self, index: usize) -> u32 {
        self.boot_rom.as_ref().map_or(0, |rom| rom.long(index))
    }
}

impl<E: ExecutionUnit, B: SystemBus + ?Sized> Thread<B> for Shm<E> {
    fn thread(&self) -> Option<ThreadId> {
        self.thread
    }

    fn enter(&mut self, scheduler: &mut Scheduler, bus: &mut B) {
        while self.main(scheduler, bus) == SyncState::Continue {}
    }
}

/// The view of the system handed to the execution unit for one instruction.
struct Port<'a, B: SystemBus + ?Sized> {
    adapter: BusWidthAdapter<'a, B>,
    exception: bool,
}

impl<B: SystemBus + ?Sized> CpuBus for Port<'_, B> {
    fn read_byte(&mut self, address: u32) -> u8 {
        self.adapter.read_byte(address)
    }

    fn read_word(&mut self, address: u32) -> u16 {
        self.adapter.read_word(address)
    }

    fn read_long(&mut self, address: u32) -> u32 {
        self.adapter.read_long(address)
    }

    fn write_byte(&mut self, address: u32, data: u8) {
        self.adapter.write_byte(address, data)
    }

    fn write_word(&mut self, address: u32, data: u16) {
        self.adapter.write_word(address, data)
    }

    fn write_long(&mut self, address: u32, data: u32) {
        self.adapter.write_long(address, data)
    }
}

impl<B: SystemBus + ?Sized> Sh2Interface for Port<'_, B> {
    fn exception(&self) -> bool {
        self.exception
    }
}

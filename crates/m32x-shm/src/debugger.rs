use m32x_bus::{Lanes, SystemBus};
use m32x_debug::{DebugTree, NodeId, NodeKind, TraceEvent, TraceKinds, Tracer};

use crate::{InspectionHook, Sh2Registers};

/// Debug attachment of one SHM instance: tree nodes, instruction tracer and an optional hook.
///
/// The hook and the tracer setup belong to the tooling that installed them and survive `load`
/// and `power`; only `unload` drops them.
pub struct Debugger {
    memory: Option<NodeId>,
    tracer_node: Option<NodeId>,
    tracer: Tracer,
    hook: Option<Box<dyn InspectionHook>>,
}

impl Debugger {
    pub fn new(trace_capacity: usize) -> Self {
        Self {
            memory: None,
            tracer_node: None,
            tracer: Tracer::new(trace_capacity),
            hook: None,
        }
    }

    pub(crate) fn attach(&mut self, tree: &mut DebugTree, parent: NodeId, boot_rom_size: u32) {
        self.memory = Some(tree.append(
            Some(parent),
            "Boot ROM",
            NodeKind::Memory {
                size: boot_rom_size,
            },
        ));
        self.tracer_node = Some(tree.append(Some(parent), "Instruction", NodeKind::Tracer));
    }

    /// Remove the tree nodes, keeping hook and tracer.
    pub(crate) fn detach(&mut self, tree: &mut DebugTree) {
        for node in [self.memory.take(), self.tracer_node.take()].into_iter().flatten() {
            tree.remove(node);
        }
    }

    /// Forget everything tooling installed.
    pub(crate) fn reset(&mut self) {
        self.tracer.disable();
        self.tracer.clear();
        self.hook = None;
    }

    pub(crate) fn instruction(&mut self, registers: &Sh2Registers, cycle: u64) {
        if let Some(hook) = self.hook.as_mut() {
            hook.instruction(registers, cycle);
        }
        self.tracer.record(TraceEvent::Instruction {
            pc: registers.pc,
            cycle,
        });
    }

    pub(crate) fn power(&mut self, reset: bool) {
        self.tracer.record(TraceEvent::Power { reset });
    }

    /// The tracer, if it currently keeps bus transactions.
    pub(crate) fn bus_tracer(&mut self) -> Option<&mut Tracer> {
        if self.tracer.wants(TraceKinds::BUS) {
            Some(&mut self.tracer)
        } else {
            None
        }
    }

    pub fn memory_node(&self) -> Option<NodeId> {
        self.memory
    }

    pub fn tracer_node(&self) -> Option<NodeId> {
        self.tracer_node
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    pub fn attach_hook(&mut self, hook: impl InspectionHook + 'static) {
        self.hook = Some(Box::new(hook));
    }

    pub fn detach_hook(&mut self) -> Option<Box<dyn InspectionHook>> {
        self.hook.take()
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }
}

/// Passes word transactions through to the shared bus, logging them when bus tracing is on.
pub(crate) struct BusTap<'a, B: SystemBus + ?Sized> {
    pub(crate) bus: &'a mut B,
    pub(crate) tracer: Option<&'a mut Tracer>,
    pub(crate) cycle: u64,
}

impl<B: SystemBus + ?Sized> BusTap<'_, B> {
    fn log(&mut self, write: bool, lanes: Lanes, address: u32, data: u16) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.record(TraceEvent::Bus {
                cycle: self.cycle,
                write,
                upper: lanes.contains(Lanes::UPPER),
                lower: lanes.contains(Lanes::LOWER),
                address,
                data,
            });
        }
    }
}

impl<B: SystemBus + ?Sized> SystemBus for BusTap<'_, B> {
    fn read_internal(&mut self, lanes: Lanes, address: u32) -> u16 {
        let data = self.bus.read_internal(lanes, address);
        self.log(false, lanes, address, data);
        data
    }

    fn write_internal(&mut self, lanes: Lanes, address: u32, data: u16) {
        self.bus.write_internal(lanes, address, data);
        self.log(true, lanes, address, data);
    }
}

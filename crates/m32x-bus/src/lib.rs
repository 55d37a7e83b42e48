//! 8/16/32-bit access for a 32-bit processor sitting on a 16-bit shared bus.
//!
//! The shared bus only performs word transactions, each with two independently strobed byte
//! lanes. [`BusWidthAdapter`] turns byte/word/long accesses into one or two such transactions:
//! addresses are masked to the access width, longs are split big-endian, and byte writes drive
//! the value on both halves of the word the way physical byte strobes do.
//!
//! [`SystemBus`] is the consumed interface (implemented by whatever arbitrates the shared bus),
//! [`CpuBus`] is what instruction execution sees.

#![forbid(unsafe_code)]

mod adapter;
mod lanes;
mod ram;
mod request;

pub use adapter::BusWidthAdapter;
pub use lanes::Lanes;
pub use ram::LaneRam;
pub use request::{BusRequest, Direction, Width};

/// Word-wide shared bus with lane-selectable halves.
///
/// `address` is always word aligned when called by [`BusWidthAdapter`]. Only the lanes set in
/// `lanes` take part in the transaction; for reads the unselected half of the result is
/// unspecified.
pub trait SystemBus {
    fn read_internal(&mut self, lanes: Lanes, address: u32) -> u16;
    fn write_internal(&mut self, lanes: Lanes, address: u32, data: u16);
}

impl<B: SystemBus + ?Sized> SystemBus for &mut B {
    fn read_internal(&mut self, lanes: Lanes, address: u32) -> u16 {
        (**self).read_internal(lanes, address)
    }

    fn write_internal(&mut self, lanes: Lanes, address: u32, data: u16) {
        (**self).write_internal(lanes, address, data)
    }
}

/// Big-endian byte/word/long access as issued by instruction execution.
///
/// Addresses may be unaligned; implementations decide how to align them.
pub trait CpuBus {
    fn read_byte(&mut self, address: u32) -> u8;
    fn read_word(&mut self, address: u32) -> u16;
    fn read_long(&mut self, address: u32) -> u32;

    fn write_byte(&mut self, address: u32, data: u8);
    fn write_word(&mut self, address: u32, data: u16);
    fn write_long(&mut self, address: u32, data: u32);
}

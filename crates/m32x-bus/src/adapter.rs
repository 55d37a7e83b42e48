use crate::{BusRequest, CpuBus, Direction, Lanes, SystemBus, Width};

/// Translates byte/word/long accesses into lane-selected word transactions.
///
/// The adapter borrows the shared bus for the duration of one instruction; it keeps no state of
/// its own, so dropping it between instructions loses nothing.
pub struct BusWidthAdapter<'a, B: SystemBus + ?Sized> {
    bus: &'a mut B,
}

impl<'a, B: SystemBus + ?Sized> BusWidthAdapter<'a, B> {
    pub fn new(bus: &'a mut B) -> Self {
        Self { bus }
    }

    pub fn bus(&mut self) -> &mut B {
        self.bus
    }

    /// Carry out `request`, returning the data read (zero-extended) for reads.
    pub fn issue(&mut self, request: BusRequest) -> Option<u32> {
        let BusRequest {
            direction,
            width,
            address,
            data,
        } = request;
        match (direction, width) {
            (Direction::Read, Width::Byte) => Some(self.read_byte(address).into()),
            (Direction::Read, Width::Word) => Some(self.read_word(address).into()),
            (Direction::Read, Width::Long) => Some(self.read_long(address)),
            (Direction::Write, Width::Byte) => {
                self.write_byte(address, data as u8);
                None
            }
            (Direction::Write, Width::Word) => {
                self.write_word(address, data as u16);
                None
            }
            (Direction::Write, Width::Long) => {
                self.write_long(address, data);
                None
            }
        }
    }
}

impl<B: SystemBus + ?Sized> CpuBus for BusWidthAdapter<'_, B> {
    fn read_byte(&mut self, address: u32) -> u8 {
        let lanes = Lanes::for_byte(address);
        let word = self
            .bus
            .read_internal(lanes, address & Width::Word.align_mask());
        if lanes == Lanes::LOWER {
            word as u8
        } else {
            (word >> 8) as u8
        }
    }

    fn read_word(&mut self, address: u32) -> u16 {
        let word = address & Width::Word.align_mask();
        self.bus.read_internal(Lanes::all(), word)
    }

    fn read_long(&mut self, address: u32) -> u32 {
        let base = address & Width::Long.align_mask();
        let high = self.bus.read_internal(Lanes::all(), base) as u32;
        let low = self.bus.read_internal(Lanes::all(), base | 2) as u32;
        high << 16 | low
    }

    fn write_byte(&mut self, address: u32, data: u8) {
        // Byte strobes on a word-organized store see the byte on both halves of the data bus.
        let data = (data as u16) << 8 | data as u16;
        let word = address & Width::Word.align_mask();
        self.bus.write_internal(Lanes::for_byte(address), word, data);
    }

    fn write_word(&mut self, address: u32, data: u16) {
        let word = address & Width::Word.align_mask();
        self.bus.write_internal(Lanes::all(), word, data);
    }

    fn write_long(&mut self, address: u32, data: u32) {
        let base = address & Width::Long.align_mask();
        self.bus.write_internal(Lanes::all(), base, (data >> 16) as u16);
        self.bus.write_internal(Lanes::all(), base | 2, data as u16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Read(Lanes, u32),
        Write(Lanes, u32, u16),
    }

    /// Logs every transaction; reads return the address' low half so results are traceable.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl SystemBus for Recorder {
        fn read_internal(&mut self, lanes: Lanes, address: u32) -> u16 {
            self.ops.push(Op::Read(lanes, address));
            address as u16 ^ 0xa5c3
        }

        fn write_internal(&mut self, lanes: Lanes, address: u32, data: u16) {
            self.ops.push(Op::Write(lanes, address, data));
        }
    }

    #[test]
    fn byte_reads_select_lane_by_parity() {
        let mut bus = Recorder::default();
        let mut cpu = BusWidthAdapter::new(&mut bus);

        assert_eq!(cpu.read_byte(0x2000_0101), (0x0100u16 ^ 0xa5c3) as u8);
        assert_eq!(cpu.read_byte(0x2000_0100), ((0x0100u16 ^ 0xa5c3) >> 8) as u8);

        assert_eq!(
            bus.ops,
            vec![
                Op::Read(Lanes::LOWER, 0x2000_0100),
                Op::Read(Lanes::UPPER, 0x2000_0100),
            ]
        );
    }

    #[test]
    fn byte_writes_duplicate_value_on_both_halves() {
        let mut bus = Recorder::default();
        let mut cpu = BusWidthAdapter::new(&mut bus);

        cpu.write_byte(0x41, 0x7e);
        cpu.write_byte(0x40, 0x81);

        assert_eq!(
            bus.ops,
            vec![
                Op::Write(Lanes::LOWER, 0x40, 0x7e7e),
                Op::Write(Lanes::UPPER, 0x40, 0x8181),
            ]
        );
    }

    #[test]
    fn word_accesses_drop_bit_zero() {
        let mut bus = Recorder::default();
        let mut cpu = BusWidthAdapter::new(&mut bus);

        cpu.read_word(0x13);
        cpu.write_word(0x13, 0xbeef);

        assert_eq!(
            bus.ops,
            vec![
                Op::Read(Lanes::all(), 0x12),
                Op::Write(Lanes::all(), 0x12, 0xbeef),
            ]
        );
    }

    #[test]
    fn unaligned_long_is_forced_down_to_four_bytes() {
        let mut bus = Recorder::default();
        let mut cpu = BusWidthAdapter::new(&mut bus);

        let value = cpu.read_long(0x107);
        cpu.write_long(0x107, 0x1234_5678);

        let expected = ((0x104u32 as u16 ^ 0xa5c3) as u32) << 16 | (0x106u32 as u16 ^ 0xa5c3) as u32;
        assert_eq!(value, expected);
        assert_eq!(
            bus.ops,
            vec![
                Op::Read(Lanes::all(), 0x104),
                Op::Read(Lanes::all(), 0x106),
                Op::Write(Lanes::all(), 0x104, 0x1234),
                Op::Write(Lanes::all(), 0x106, 0x5678),
            ]
        );
    }

    #[test]
    fn issue_dispatches_requests() {
        let mut bus = Recorder::default();
        let mut cpu = BusWidthAdapter::new(&mut bus);

        assert_eq!(cpu.issue(BusRequest::write(Width::Byte, 0x3, 0xffff_ff11)), None);
        assert_eq!(
            cpu.issue(BusRequest::read(Width::Word, 0x8)),
            Some((0x8u16 ^ 0xa5c3) as u32)
        );

        assert_eq!(
            bus.ops,
            vec![
                Op::Write(Lanes::LOWER, 0x2, 0x1111),
                Op::Read(Lanes::all(), 0x8),
            ]
        );
    }
}

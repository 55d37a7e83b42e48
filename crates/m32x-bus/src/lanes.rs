use bitflags::bitflags;

bitflags! {
    /// Byte lanes taking part in a word transaction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Lanes: u8 {
        /// Bits 15..8, the even byte address.
        const UPPER = 0b10;
        /// Bits 7..0, the odd byte address.
        const LOWER = 0b01;
    }
}

impl Lanes {
    pub fn from_selects(upper: bool, lower: bool) -> Self {
        let mut lanes = Lanes::empty();
        lanes.set(Lanes::UPPER, upper);
        lanes.set(Lanes::LOWER, lower);
        lanes
    }

    /// Bits of a 16-bit word driven by these lanes.
    pub fn mask(self) -> u16 {
        let mut mask = 0;
        if self.contains(Lanes::UPPER) {
            mask |= 0xff00;
        }
        if self.contains(Lanes::LOWER) {
            mask |= 0x00ff;
        }
        mask
    }

    /// The lane carrying the byte at `address` on a big-endian bus.
    pub fn for_byte(address: u32) -> Self {
        if address & 1 != 0 {
            Lanes::LOWER
        } else {
            Lanes::UPPER
        }
    }
}

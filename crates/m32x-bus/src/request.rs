#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
    Long,
}

impl Width {
    pub fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::Long => 4,
        }
    }

    /// Address bits cleared before the access is decomposed.
    pub fn align_mask(self) -> u32 {
        !(self.bytes() - 1)
    }
}

/// A single processor-side access, consumed within one adapter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusRequest {
    pub direction: Direction,
    pub width: Width,
    pub address: u32,
    /// Write data; the low `width` bytes are used. Ignored for reads.
    pub data: u32,
}

impl BusRequest {
    pub fn read(width: Width, address: u32) -> Self {
        Self {
            direction: Direction::Read,
            width,
            address,
            data: 0,
        }
    }

    pub fn write(width: Width, address: u32, data: u32) -> Self {
        Self {
            direction: Direction::Write,
            width,
            address,
            data,
        }
    }
}

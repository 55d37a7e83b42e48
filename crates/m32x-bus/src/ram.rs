use crate::{Lanes, SystemBus};

/// Word-organized RAM that honours byte-lane strobes.
///
/// Addresses wrap modulo the RAM size, matching how a partially decoded memory mirrors across
/// its window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneRam {
    words: Vec<u16>,
}

impl LaneRam {
    /// Allocate `words` zeroed 16-bit cells (at least one).
    pub fn new(words: usize) -> Self {
        Self {
            words: vec![0; words.max(1)],
        }
    }

    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Direct word access for host-side inspection; bypasses lane strobes.
    pub fn word(&self, address: u32) -> u16 {
        self.words[self.index(address)]
    }

    pub fn set_word(&mut self, address: u32, data: u16) {
        let index = self.index(address);
        self.words[index] = data;
    }

    fn index(&self, address: u32) -> usize {
        (address as usize >> 1) % self.words.len()
    }
}

impl SystemBus for LaneRam {
    fn read_internal(&mut self, lanes: Lanes, address: u32) -> u16 {
        self.word(address) & lanes.mask()
    }

    fn write_internal(&mut self, lanes: Lanes, address: u32, data: u16) {
        let mask = lanes.mask();
        let index = self.index(address);
        let cell = &mut self.words[index];
        *cell = (*cell & !mask) | (data & mask);
    }
}

use crate::{CoreError, Result};

/// Memory addresses are signed so that a stack pointer decremented past zero
/// is reported as out of bounds instead of wrapping around.
pub type Address = i32;

/// Fixed-capacity byte store with bounds- and range-checked access.
///
/// Used for main memory and, with eight cells, for the register file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedMemory {
    cells: Vec<u8>,
}

impl GuardedMemory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub fn read(&self, address: Address) -> Result<u8> {
        let index = self.index(address)?;
        Ok(self.cells[index])
    }

    /// Store `value` at `address`.
    ///
    /// The value is taken wide so that results which do not fit in a byte are
    /// rejected with [`CoreError::InvalidByteValue`]. A failed write leaves
    /// memory unchanged.
    pub fn write(&mut self, address: Address, value: i64) -> Result<()> {
        let index = self.index(address)?;
        let byte = u8::try_from(value).map_err(|_| CoreError::InvalidByteValue(value))?;
        self.cells[index] = byte;
        Ok(())
    }

    /// Non-failing read used by diagnostics that peek past the end of memory.
    pub fn peek(&self, address: Address) -> Option<u8> {
        self.index(address).ok().map(|index| self.cells[index])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    fn index(&self, address: Address) -> Result<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&index| index < self.cells.len())
            .ok_or(CoreError::OutOfBounds {
                address,
                size: self.cells.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_memory_is_zeroed() {
        let mem = GuardedMemory::new(16);
        assert_eq!(mem.size(), 16);
        assert!(mem.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn write_then_read_returns_value() {
        let mut mem = GuardedMemory::new(256);
        mem.write(0x10, 0xAB).unwrap();
        mem.write(255, 0).unwrap();
        mem.write(0, 255).unwrap();
        assert_eq!(mem.read(0x10).unwrap(), 0xAB);
        assert_eq!(mem.read(255).unwrap(), 0);
        assert_eq!(mem.read(0).unwrap(), 255);
    }

    #[test]
    fn out_of_range_addresses_fail() {
        let mut mem = GuardedMemory::new(8);
        for address in [-1, 8, 9, i32::MAX, i32::MIN] {
            assert!(matches!(
                mem.read(address),
                Err(CoreError::OutOfBounds { size: 8, .. })
            ));
            assert!(matches!(
                mem.write(address, 1),
                Err(CoreError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn invalid_values_fail_and_leave_memory_unchanged() {
        let mut mem = GuardedMemory::new(4);
        mem.write(2, 7).unwrap();
        assert!(matches!(
            mem.write(2, 256),
            Err(CoreError::InvalidByteValue(256))
        ));
        assert!(matches!(
            mem.write(2, -1),
            Err(CoreError::InvalidByteValue(-1))
        ));
        assert_eq!(mem.read(2).unwrap(), 7);
    }

    #[test]
    fn bounds_are_checked_before_value() {
        let mut mem = GuardedMemory::new(4);
        assert!(matches!(
            mem.write(4, 300),
            Err(CoreError::OutOfBounds { address: 4, size: 4 })
        ));
    }

    #[test]
    fn clear_zeroes_every_cell() {
        let mut mem = GuardedMemory::new(8);
        for address in 0..8 {
            mem.write(address, 0x40 + address as i64).unwrap();
        }
        mem.clear();
        for address in 0..8 {
            assert_eq!(mem.read(address).unwrap(), 0);
        }
    }

    #[test]
    fn peek_past_end_is_none() {
        let mut mem = GuardedMemory::new(2);
        mem.write(1, 9).unwrap();
        assert_eq!(mem.peek(1), Some(9));
        assert_eq!(mem.peek(2), None);
        assert_eq!(mem.peek(-1), None);
    }
}

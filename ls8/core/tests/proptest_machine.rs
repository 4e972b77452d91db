use ls8_core::constants::{COMPARE_FLAGS, FLAG_EQUAL, FLAG_GREATER, FLAG_LESS, FLAG_RUNNING};
use ls8_core::opcodes::{CMP, HLT, LDI};
use ls8_core::{CoreError, Cpu, GuardedMemory, NullObserver};
use proptest::prelude::*;

proptest! {
    #[test]
    fn write_then_read_round_trips(address in 0i32..256, value in 0i64..=255) {
        let mut mem = GuardedMemory::new(256);
        mem.write(address, value).unwrap();
        prop_assert_eq!(i64::from(mem.read(address).unwrap()), value);
    }

    #[test]
    fn out_of_range_values_leave_memory_unchanged(
        address in 0i32..256,
        value in prop_oneof![i64::MIN..0i64, 256i64..i64::MAX],
    ) {
        let mut mem = GuardedMemory::new(256);
        mem.write(address, 0x5A).unwrap();
        let is_invalid = matches!(
            mem.write(address, value),
            Err(CoreError::InvalidByteValue(v)) if v == value
        );
        prop_assert!(is_invalid);
        prop_assert_eq!(mem.read(address).unwrap(), 0x5A);
    }

    #[test]
    fn out_of_range_addresses_fail(
        address in prop_oneof![i32::MIN..0i32, 8i32..i32::MAX],
        value in 0i64..=255,
    ) {
        let mut mem = GuardedMemory::new(8);
        let read_oob = matches!(mem.read(address), Err(CoreError::OutOfBounds { .. }));
        let write_oob = matches!(mem.write(address, value), Err(CoreError::OutOfBounds { .. }));
        prop_assert!(read_oob);
        prop_assert!(write_oob);
    }

    #[test]
    fn clear_zeroes_everything(writes in proptest::collection::vec((0i32..64, 0i64..=255), 0..64)) {
        let mut mem = GuardedMemory::new(64);
        for (address, value) in writes {
            mem.write(address, value).unwrap();
        }
        mem.clear();
        for address in 0..64 {
            prop_assert_eq!(mem.read(address).unwrap(), 0);
        }
    }

    #[test]
    fn cmp_sets_exactly_one_condition_flag(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = Cpu::new();
        cpu.load_bytes(&[LDI, 0, a, LDI, 1, b, CMP, 0, 1, HLT]).unwrap();
        cpu.run_with(&mut Vec::new(), &mut NullObserver).unwrap();

        let expected = if a == b {
            FLAG_EQUAL
        } else if a < b {
            FLAG_LESS
        } else {
            FLAG_GREATER
        };
        prop_assert_eq!(cpu.fl() & COMPARE_FLAGS, expected);
        prop_assert_eq!(cpu.fl() & FLAG_RUNNING, 0);
    }
}

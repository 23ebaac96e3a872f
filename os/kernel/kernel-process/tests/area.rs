use kernel_info::memory::AddressWidth;
use kernel_process::{MemoryArea, ProcessError};
use proptest::prelude::*;

/// Reference definition, evaluated without overflow.
fn expected(base: u64, size: u64, limit: u64, max: u64) -> Result<(), ProcessError> {
    if base > max || size > max || limit > max {
        return Err(ProcessError::AddrTooBig);
    }
    if size == 0 || u128::from(base) + u128::from(size) - 1 != u128::from(limit) {
        return Err(ProcessError::InvalidArea);
    }
    Ok(())
}

fn width() -> impl Strategy<Value = AddressWidth> {
    prop_oneof![Just(AddressWidth::Bits32), Just(AddressWidth::Bits64)]
}

proptest! {
    #[test]
    fn arbitrary_triples_match_definition(
        base in any::<u64>(),
        size in any::<u64>(),
        limit in any::<u64>(),
        width in width(),
    ) {
        let max = width.max_address();
        let got = MemoryArea::validate(base, size, limit, max).map(|_| ());
        prop_assert_eq!(got, expected(base, size, limit, max));
    }

    #[test]
    fn small_triples_match_definition(
        base in 0u64..0x100,
        size in 0u64..0x100,
        limit in 0u64..0x200,
    ) {
        let max = AddressWidth::Bits32.max_address();
        let got = MemoryArea::validate(base, size, limit, max).map(|_| ());
        prop_assert_eq!(got, expected(base, size, limit, max));
    }

    #[test]
    fn consistent_triples_are_returned_unchanged(
        base in 0u64..0x8000_0000,
        size in 1u64..0x8000_0000,
    ) {
        let limit = base + size - 1;
        let area = MemoryArea::validate(base, size, limit, 0xFFFF_FFFF).unwrap();
        prop_assert_eq!((area.base(), area.size(), area.limit()), (base, size, limit));
        prop_assert!(area.contains(base) && area.contains(limit));
    }

    #[test]
    fn values_above_32_bits_are_too_big(
        high in 0x1_0000_0000u64..,
        low in 0u64..0x1000,
        position in 0usize..3,
    ) {
        let mut triple = [low, low, low];
        triple[position] = high;
        prop_assert_eq!(
            MemoryArea::validate(triple[0], triple[1], triple[2], 0xFFFF_FFFF),
            Err(ProcessError::AddrTooBig)
        );
    }
}

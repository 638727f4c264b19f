//! Fixed-width component signature bitset.
//!
//! Grounded on `original_source/.../EntityComponentSystem.cpp`'s
//! `ECSSignatureIndex` constants (`POSITION_ECS_SIGNATURE`, etc.) ORed
//! together per entity; re-registration of an already-set bit is a no-op.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
    pub struct Signature: u32 {
        const NAME          = 1 << 0;
        const POSITION      = 1 << 1;
        const ROTATION      = 1 << 2;
        const SCALE         = 1 << 3;
        const LOCAL_MATRIX  = 1 << 4;
        const WORLD_MATRIX  = 1 << 5;
        const RENDER        = 1 << 6;
        const LIGHT         = 1 << 7;
    }
}

/// Index into a `Signature` bitset, one per component kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SignatureIndex(pub Signature);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reregistering_a_bit_is_a_no_op() {
        let mut sig = Signature::empty();
        sig |= Signature::POSITION;
        sig |= Signature::POSITION;
        assert_eq!(sig, Signature::POSITION);
    }

    #[test]
    fn contains_checks_individual_bits() {
        let sig = Signature::POSITION | Signature::RENDER;
        assert!(sig.contains(Signature::POSITION));
        assert!(!sig.contains(Signature::LIGHT));
    }
}

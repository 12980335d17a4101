//! Output-envelope abstraction (`SPEC_FULL.md` §4.9), grounded on
//! `original_source/src/linking/assembled-object.h`'s `AssembledObject` base
//! class. The source pairs `Serialize`/`Deserialize`; only `Serialize` has a
//! caller anywhere in this crate's scope (there is no "load an assembled
//! object back in" use case), so `Deserialize` is dropped rather than
//! stubbed.

pub trait AssembledObject {
    fn serialize(&self) -> Vec<u8>;
}

use std::fmt::Debug;

use crate::{Snapshot, SnapshotShape};

/// Turns one family's positional state into a structured record.
///
/// `decode` is total: absent or malformed input yields the default record,
/// and the same input always yields the same record.
pub trait SnapshotDecoder {
    type Decoded: Clone + Debug + Default + PartialEq;

    fn shape(&self) -> SnapshotShape;

    fn decode(&self, state: Option<&str>) -> Self::Decoded;

    fn decode_snapshot(&self, snapshot: Option<&Snapshot>) -> Self::Decoded {
        self.decode(snapshot.map(Snapshot::state))
    }
}

/// Writes a decoded record back into the compact encoding.
pub trait StateEncoder: SnapshotDecoder {
    fn encode(&self, decoded: &Self::Decoded) -> String;
}

//! Entity snapshot values and the serializers that persist them
//!
//! Each snapshot type is an immutable, comparable copy of one live entity's
//! state, with a `from_*` capture and an `apply` that writes it back.

pub mod flowchart;
pub mod portrait;
pub mod stage;

pub use flowchart::{FLOWCHART_SAVE_VERSION, FlowchartSaveState, FlowchartSerializer};
pub use portrait::{PORTRAIT_SAVE_VERSION, PortraitSaveState, PortraitSerializer, capture_portraits};
pub use stage::{STAGE_SAVE_VERSION, StageSaveState, StageSerializer};

/// True when both lists have the same length and are equal index by index
///
/// Order matters: the same snapshots in a different order do not match.
/// Sort or index by name first if that is what you need.
pub fn snapshot_lists_match<T: PartialEq>(first: &[T], second: &[T]) -> bool {
    if first.len() != second.len() {
        return false;
    }

    first.iter().zip(second).all(|(a, b)| a == b)
}

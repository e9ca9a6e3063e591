pub mod duration;
pub mod panel;
pub mod tiers;
pub mod weights;

pub use duration::{SlaDuration, format_duration};
pub use panel::WeightEditor;
pub use tiers::{Priority, SlaTiers};
pub use weights::{
    Allocation, AllocationRow, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT, WeightDistributor,
    WeightedStep,
};

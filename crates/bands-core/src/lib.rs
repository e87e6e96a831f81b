pub mod adapter;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hazard;
pub mod interval;
pub mod merge;
pub mod projection;
pub mod region;
pub mod units;

pub use engine::TripleBands;
pub use error::UsageError;
pub use geom::{LatLonAlt, Position, Vect3, Velocity};
pub use hazard::HazardProvider;
pub use interval::{Interval, IntervalSet};
pub use merge::{merge_bands, Band};
pub use projection::{great_circle_distance, EuclideanProjection};
pub use region::Region;

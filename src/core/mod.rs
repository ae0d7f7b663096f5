pub mod finder;
pub mod query;

pub use crate::domain::model::{
    Article, Coordinate, EncodedQuery, GeosearchRequestParams, PermissionStatus, RawResponse,
};
pub use crate::domain::ports::{GeosearchTransport, LocationGate};
pub use crate::utils::error::Result;

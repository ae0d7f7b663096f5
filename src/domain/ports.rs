use crate::domain::model::{Coordinate, EncodedQuery, PermissionStatus, RawResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Access to the device position, guarded by a location permission.
#[async_trait]
pub trait LocationGate: Send + Sync {
    fn has_location_permission(&self) -> bool;

    /// Resolves once with the user's answer. A dismissed prompt resolves to
    /// `Denied`.
    async fn request_location_permission(&self) -> PermissionStatus;

    /// Best-effort cached position; `None` when no fix has been obtained yet.
    async fn last_known_position(&self) -> Option<Coordinate>;
}

#[async_trait]
pub trait GeosearchTransport: Send + Sync {
    async fn send(&self, query: &EncodedQuery) -> Result<RawResponse>;
}

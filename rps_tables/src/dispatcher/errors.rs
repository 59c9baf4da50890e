//! Dispatcher error types.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors that end the dispatcher loop
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A reply could not be delivered under [`DeliveryPolicy::Abort`]
    ///
    /// [`DeliveryPolicy::Abort`]: super::DeliveryPolicy::Abort
    #[error("Reply delivery failed: {0}")]
    Delivery(#[from] TransportError),
}

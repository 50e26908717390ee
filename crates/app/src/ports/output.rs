//! Output channel port: addressed messages to the control surface.

use std::future::Future;

use slidelink_domain::command::Argument;
use slidelink_domain::error::RelayError;

/// Sends addressed messages to the control surface.
///
/// Delivery is best-effort: `Ok` means the message was handed to the
/// transport, not that it arrived.
pub trait OutputChannel {
    /// Send one message made of `address` followed by `arguments`.
    fn send(
        &self,
        address: &str,
        arguments: &[Argument],
    ) -> impl Future<Output = Result<(), RelayError>> + Send;
}

impl<T: OutputChannel + Send + Sync> OutputChannel for std::sync::Arc<T> {
    fn send(
        &self,
        address: &str,
        arguments: &[Argument],
    ) -> impl Future<Output = Result<(), RelayError>> + Send {
        (**self).send(address, arguments)
    }
}

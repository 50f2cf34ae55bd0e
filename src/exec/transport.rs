// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Debug;

use async_trait::async_trait;

use crate::command::Call;

/// Transport independent asynchronous capability to perform one
/// Modbus operation.
///
/// Calls are never issued concurrently. The executor awaits every call
/// before issuing the next one, because all calls of a batch share the
/// same underlying connection.
#[async_trait]
pub trait Transport: Send + 'static {
    /// The result of a successful call.
    type Response: Debug + Send + 'static;

    /// The result of a failed call.
    type Error: Debug + Send + 'static;

    /// Performs a single read or write operation.
    ///
    /// The outcome is forwarded to the event stream verbatim. A failed
    /// call never aborts the run.
    ///
    /// Forcing a run to stop drops the returned future, which might leave
    /// the underlying connection in an undefined state.
    async fn execute(&mut self, call: Call) -> Result<Self::Response, Self::Error>;
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    type Response = T::Response;
    type Error = T::Error;

    async fn execute(&mut self, call: Call) -> Result<Self::Response, Self::Error> {
        (**self).execute(call).await
    }
}

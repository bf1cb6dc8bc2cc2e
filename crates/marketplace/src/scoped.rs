use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopedRuntimeError {
    #[error("blocking entry point called from inside an async runtime")]
    NestedRuntime,
    #[error("could not start scoped runtime: {0}")]
    Build(String),
}

/// Drives `future` to completion on a dedicated current-thread runtime that
/// lives only for this call.
///
/// Must not be called from a thread that is already driving a tokio runtime;
/// that case is reported as [`ScopedRuntimeError::NestedRuntime`].
pub fn block_on<F>(future: F) -> Result<F::Output, ScopedRuntimeError>
where
    F: Future,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ScopedRuntimeError::NestedRuntime);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| ScopedRuntimeError::Build(error.to_string()))?;

    Ok(runtime.block_on(future))
}

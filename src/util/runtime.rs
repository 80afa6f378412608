//! Tokio runtime helper for the synchronous CLI entry point.

/// Run an async future to completion from synchronous code.
///
/// Handles two scenarios:
/// 1. If a Tokio runtime is already running, uses `block_in_place` to block on the future.
/// 2. If no runtime is available, creates a temporary multi-threaded one.
///
/// Fails only if a new runtime cannot be created.
///
/// # Example
/// ```ignore
/// use crate::util::run_async;
///
/// let report = run_async(engine.detect(&text))??;
/// ```
pub fn run_async<F, T>(future: F) -> std::io::Result<T>
where
    F: std::future::Future<Output = T>,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(tokio::task::block_in_place(|| handle.block_on(future))),
        Err(_) => {
            let rt = tokio::runtime::Runtime::new()?;
            Ok(rt.block_on(future))
        }
    }
}

#[cfg(test)]
#[path = "runtime_test.rs"]
mod tests;

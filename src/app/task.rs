// SPDX-License-Identifier: GPL-3.0-only

//! Single-shot continuations returned by message handlers
//!
//! A handler never blocks. Work that has to wait (the camera, a decode, a
//! save) is returned as a [`Task`] whose output is the next message.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;

/// Deferred computation producing one value
pub struct Task<T> {
    future: Option<BoxFuture<'static, T>>,
}

impl<T: Send + 'static> Task<T> {
    /// Nothing to do
    pub fn none() -> Self {
        Self { future: None }
    }

    /// Produce `value` immediately
    pub fn done(value: T) -> Self {
        Self {
            future: Some(futures::future::ready(value).boxed()),
        }
    }

    /// Run `future` and map its output
    pub fn perform<F, A>(future: F, map: impl FnOnce(A) -> T + Send + 'static) -> Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        Self {
            future: Some(future.map(map).boxed()),
        }
    }

    pub fn is_none(&self) -> bool {
        self.future.is_none()
    }

    /// Take the underlying future
    pub fn into_future(self) -> Option<BoxFuture<'static, T>> {
        self.future
    }
}

impl<T> std::fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.future {
            Some(_) => write!(f, "Task(pending)"),
            None => write!(f, "Task(none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_perform_maps_output() {
        let task = Task::perform(async { 20 }, |v: i32| v + 1);
        assert!(!task.is_none());
        assert_eq!(task.into_future().unwrap().await, 21);
    }

    #[test]
    fn test_none_has_no_future() {
        assert!(Task::<u8>::none().into_future().is_none());
    }

    #[tokio::test]
    async fn test_done_yields_value() {
        assert_eq!(Task::done("x").into_future().unwrap().await, "x");
    }
}

//! Subscriber callbacks

use crate::value::Value;
use std::rc::Rc;
use std::sync::Arc;

/// Handler error
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Unexpected arguments: {0}")]
    BadArguments(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// A subscriber.
///
/// Receives the event's attribute values in declaration order. Implement it on
/// a struct for stateful subscribers, or wrap a closure with [`handler_fn`]
/// (or [`Bus::on_fn`](crate::Bus::on_fn)).
///
/// Handlers run on the caller's thread inside `broadcast`; use `Cell` or
/// `RefCell` for state.
pub trait Handler {
    fn call(&self, args: &[Value]) -> HandlerResult;

    /// Name used in log lines.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call(&self, args: &[Value]) -> HandlerResult {
        (**self).call(args)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<H: Handler + ?Sized> Handler for Rc<H> {
    fn call(&self, args: &[Value]) -> HandlerResult {
        (**self).call(args)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, args: &[Value]) -> HandlerResult {
        (**self).call(args)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Closure adapter returned by [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&[Value]) -> HandlerResult,
{
    fn call(&self, args: &[Value]) -> HandlerResult {
        (self.f)(args)
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Turn a closure into a [`Handler`].
///
/// ```rust
/// use cuke_events::{handler_fn, Handler, Value};
///
/// let h = handler_fn(|args| {
///     assert_eq!(args[0], Value::from("x"));
///     Ok(())
/// });
/// h.call(&[Value::from("x")]).unwrap();
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&[Value]) -> HandlerResult,
{
    FnHandler { f }
}

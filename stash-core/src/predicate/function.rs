//! Closure adapters.
//!
//! Most ad-hoc cache decisions fit in a closure. [`from_fn`] lifts an
//! infallible `Fn(&S) -> bool`, [`try_from_fn`] a fallible
//! `Fn(&S) -> Result<bool, PredicateError>`.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::{Predicate, PredicateError};

/// Predicate backed by an infallible closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnPredicate<S, F> {
    f: F,
    _phantom: PhantomData<fn(&S)>,
}

impl<S, F> std::fmt::Debug for FnPredicate<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPredicate")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

/// Creates a predicate from an infallible closure.
pub fn from_fn<S, F>(f: F) -> FnPredicate<S, F>
where
    F: Fn(&S) -> bool,
{
    FnPredicate {
        f,
        _phantom: PhantomData,
    }
}

#[async_trait]
impl<S, F> Predicate for FnPredicate<S, F>
where
    S: Send + Sync,
    F: Fn(&S) -> bool + Send + Sync,
{
    type Subject = S;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        Ok((self.f)(subject))
    }
}

/// Predicate backed by a fallible closure. See [`try_from_fn`].
#[derive(Clone)]
pub struct TryFnPredicate<S, F> {
    f: F,
    _phantom: PhantomData<fn(&S)>,
}

impl<S, F> std::fmt::Debug for TryFnPredicate<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryFnPredicate")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

/// Creates a predicate from a fallible closure.
///
/// An `Err` returned by the closure is handed back to the interceptor as is.
pub fn try_from_fn<S, F>(f: F) -> TryFnPredicate<S, F>
where
    F: Fn(&S) -> Result<bool, PredicateError>,
{
    TryFnPredicate {
        f,
        _phantom: PhantomData,
    }
}

#[async_trait]
impl<S, F> Predicate for TryFnPredicate<S, F>
where
    S: Send + Sync,
    F: Fn(&S) -> Result<bool, PredicateError> + Send + Sync,
{
    type Subject = S;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        (self.f)(subject)
    }
}

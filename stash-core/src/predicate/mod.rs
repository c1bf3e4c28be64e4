//! Cache decision predicates.
//!
//! The interceptor asks two questions per request: "must this request bypass
//! the cache?" before sending, and "may this response be stored?" after the
//! response arrives. Both are answered by a [`Predicate`], a capability that
//! maps a subject to a boolean.
//!
//! ## Composability
//!
//! Predicates are designed to be composed using logical combinators:
//!
//! - [`Not`] - Inverts a predicate result
//! - [`And`] - Both predicates must hold
//! - [`Or`] - Either predicate is sufficient
//!
//! Constant predicates ([`Always`], [`Never`]) and closure adapters
//! ([`from_fn`], [`try_from_fn`]) cover the common cases without a new type.

pub mod combinators;
pub mod constant;
pub mod function;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use combinators::{And, Not, Or, PredicateExt};
pub use constant::{Always, Never};
pub use function::{FnPredicate, TryFnPredicate, from_fn, try_from_fn};

/// Error raised by a failing predicate.
///
/// The interceptor does not recover from predicate failures: the error aborts
/// the lifecycle of the request that triggered it and is returned to the
/// caller unchanged.
#[derive(Debug, Error)]
#[error("predicate failed: {0}")]
pub struct PredicateError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl PredicateError {
    /// Wraps any error (or message) as a predicate failure.
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

/// Trait for evaluating a yes/no cache decision about a subject.
///
/// Predicates are **protocol-agnostic** - the same trait works for HTTP
/// requests, HTTP responses or anything else the host hands over. The
/// subject is borrowed; predicates only observe it.
#[async_trait]
pub trait Predicate {
    /// The type being evaluated by this predicate.
    type Subject: Send + Sync;

    /// Evaluate the subject.
    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError>;
}

#[async_trait]
impl<T> Predicate for Box<T>
where
    T: Predicate + ?Sized + Send + Sync,
{
    type Subject = T::Subject;

    async fn check(&self, subject: &T::Subject) -> Result<bool, PredicateError> {
        self.as_ref().check(subject).await
    }
}

#[async_trait]
impl<T> Predicate for &T
where
    T: Predicate + ?Sized + Send + Sync,
{
    type Subject = T::Subject;

    async fn check(&self, subject: &T::Subject) -> Result<bool, PredicateError> {
        (**self).check(subject).await
    }
}

#[async_trait]
impl<T> Predicate for Arc<T>
where
    T: Predicate + Send + Sync + ?Sized,
{
    type Subject = T::Subject;

    async fn check(&self, subject: &T::Subject) -> Result<bool, PredicateError> {
        self.as_ref().check(subject).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_predicate_ext_with_box_dyn() {
        let p1: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Never::<i32>::new());
        let p2: Box<dyn Predicate<Subject = i32> + Send + Sync> = Box::new(Always::<i32>::new());

        let combined = p1.or(p2);

        assert!(combined.check(&42).await.unwrap());
    }

    #[tokio::test]
    async fn test_predicate_ext_chaining() {
        // Always AND Always = true, OR Never = true, NOT = false
        let combined = Always::<i32>::new()
            .and(Always::new())
            .or(Never::new())
            .not();

        assert!(!combined.check(&42).await.unwrap());
    }

    #[tokio::test]
    async fn test_boxed_predicates_in_vec() {
        let predicates: Vec<Box<dyn Predicate<Subject = i32> + Send + Sync>> = vec![
            Always::<i32>::new().boxed(),
            from_fn(|value: &i32| *value > 10).boxed(),
        ];

        assert!(predicates[0].check(&1).await.unwrap());
        assert!(!predicates[1].check(&1).await.unwrap());
        assert!(predicates[1].check(&11).await.unwrap());
    }

    #[tokio::test]
    async fn test_arc_and_reference_delegate() {
        let shared = Arc::new(from_fn(|value: &i32| *value % 2 == 0));
        assert!(shared.check(&4).await.unwrap());
        assert!(!(&shared).check(&5).await.unwrap());
    }

    #[test]
    fn test_error_message() {
        let error = PredicateError::new("config slot missing");
        assert_eq!(error.to_string(), "predicate failed: config slot missing");
    }
}

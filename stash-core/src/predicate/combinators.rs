//! Logical combinators for composing predicates.
//!
//! This module provides generic combinators that work with any [`Predicate`]
//! implementation, regardless of the protocol.
//!
//! ```
//! use stash_core::{Always, Never, Predicate, PredicateExt};
//!
//! # tokio_test_block(async {
//! let predicate = Always::<u16>::new().and(Never::new()).not();
//! assert!(predicate.check(&200).await.unwrap());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

use async_trait::async_trait;

use super::{Predicate, PredicateError};

/// Inverts a predicate result.
#[derive(Debug, Clone)]
pub struct Not<P> {
    predicate: P,
}

impl<P> Not<P> {
    /// Creates a new `Not` combinator wrapping the given predicate.
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

#[async_trait]
impl<P> Predicate for Not<P>
where
    P: Predicate + Send + Sync,
{
    type Subject = P::Subject;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        Ok(!self.predicate.check(subject).await?)
    }
}

/// Requires both predicates to hold.
///
/// Short-circuits: if the left predicate returns `false`,
/// the right predicate is not evaluated.
#[derive(Debug, Clone)]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<L, R> And<L, R> {
    /// Creates a new `And` combinator from two predicates.
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl<L, R> Predicate for And<L, R>
where
    L: Predicate + Send + Sync,
    R: Predicate<Subject = L::Subject> + Send + Sync,
{
    type Subject = L::Subject;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        if self.left.check(subject).await? {
            self.right.check(subject).await
        } else {
            Ok(false)
        }
    }
}

/// Requires either predicate to hold.
///
/// Short-circuits: if the left predicate returns `true`,
/// the right predicate is not evaluated.
#[derive(Debug, Clone)]
pub struct Or<L, R> {
    left: L,
    right: R,
}

impl<L, R> Or<L, R> {
    /// Creates a new `Or` combinator from two predicates.
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl<L, R> Predicate for Or<L, R>
where
    L: Predicate + Send + Sync,
    R: Predicate<Subject = L::Subject> + Send + Sync,
{
    type Subject = L::Subject;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        if self.left.check(subject).await? {
            Ok(true)
        } else {
            self.right.check(subject).await
        }
    }
}

/// Extension trait for fluent predicate composition.
pub trait PredicateExt: Predicate + Sized {
    /// Combines this predicate with another using AND logic.
    fn and<R>(self, right: R) -> And<Self, R>
    where
        R: Predicate<Subject = Self::Subject>,
    {
        And::new(self, right)
    }

    /// Combines this predicate with another using OR logic.
    fn or<R>(self, right: R) -> Or<Self, R>
    where
        R: Predicate<Subject = Self::Subject>,
    {
        Or::new(self, right)
    }

    /// Inverts this predicate's result.
    fn not(self) -> Not<Self> {
        Not::new(self)
    }

    /// Boxes this predicate into a trait object.
    ///
    /// Useful for type erasure when storing predicates in collections
    /// or returning them from functions.
    fn boxed(self) -> Box<dyn Predicate<Subject = Self::Subject> + Send + Sync>
    where
        Self: Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<T: Predicate + Sized> PredicateExt for T {}

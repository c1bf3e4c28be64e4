//! Constant predicates.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::{Predicate, PredicateError};

/// A predicate that always returns `true`.
#[derive(Clone, Copy)]
pub struct Always<S> {
    _phantom: PhantomData<fn(S) -> S>,
}

impl<S> std::fmt::Debug for Always<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Always").finish()
    }
}

impl<S> Default for Always<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Always<S> {
    /// Creates a new always-true predicate.
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<S> Predicate for Always<S>
where
    S: Send + Sync,
{
    type Subject = S;

    async fn check(&self, _subject: &Self::Subject) -> Result<bool, PredicateError> {
        Ok(true)
    }
}

/// A predicate that always returns `false`.
#[derive(Clone, Copy)]
pub struct Never<S> {
    _phantom: PhantomData<fn(S) -> S>,
}

impl<S> std::fmt::Debug for Never<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Never").finish()
    }
}

impl<S> Default for Never<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Never<S> {
    /// Creates a new always-false predicate.
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<S> Predicate for Never<S>
where
    S: Send + Sync,
{
    type Subject = S;

    async fn check(&self, _subject: &Self::Subject) -> Result<bool, PredicateError> {
        Ok(false)
    }
}

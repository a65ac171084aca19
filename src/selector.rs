//! Client-side selectors for narrowing entity lists.
//!
//! A [`Selector`] is a predicate over one entity. Selectors compose with
//! [`Selector::all`] (logical AND) and [`Selector::any`] (logical OR) into
//! a small tree that can be cloned and shared freely; evaluating it never
//! touches the entity beyond reading it.
//!
//! ```
//! use profitbricks::{filter, Selector};
//!
//! let even = Selector::new(|n: &i32| n % 2 == 0);
//! let big = Selector::new(|n: &i32| *n > 10);
//!
//! let items = [4, 11, 12, 7];
//! assert_eq!(filter(&items, &[even.clone(), big.clone()]), vec![&12]);
//! assert_eq!(filter(&items, &[Selector::any([even, big])]), vec![&4, &11, &12]);
//! ```

use std::fmt;
use std::sync::Arc;

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A composable predicate over entities of type `T`.
pub enum Selector<T> {
    /// A single predicate.
    Predicate(Predicate<T>),
    /// Matches when every child matches. Empty matches everything.
    All(Vec<Selector<T>>),
    /// Matches when at least one child matches. Empty matches nothing.
    Any(Vec<Selector<T>>),
}

impl<T> Selector<T> {
    /// Wrap a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Combine selectors with logical AND.
    pub fn all<I>(selectors: I) -> Self
    where
        I: IntoIterator<Item = Selector<T>>,
    {
        Self::All(selectors.into_iter().collect())
    }

    /// Combine selectors with logical OR.
    pub fn any<I>(selectors: I) -> Self
    where
        I: IntoIterator<Item = Selector<T>>,
    {
        Self::Any(selectors.into_iter().collect())
    }

    /// Shorthand for `Selector::all([self, other])`.
    #[must_use]
    pub fn and(self, other: Selector<T>) -> Self {
        Self::all([self, other])
    }

    /// Shorthand for `Selector::any([self, other])`.
    #[must_use]
    pub fn or(self, other: Selector<T>) -> Self {
        Self::any([self, other])
    }

    /// Evaluate the selector against one entity.
    ///
    /// Children are evaluated left to right and evaluation stops as soon
    /// as the result is known.
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Self::Predicate(predicate) => predicate(item),
            Self::All(children) => children.iter().all(|s| s.matches(item)),
            Self::Any(children) => children.iter().any(|s| s.matches(item)),
        }
    }
}

impl<T> Clone for Selector<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Predicate(predicate) => Self::Predicate(Arc::clone(predicate)),
            Self::All(children) => Self::All(children.clone()),
            Self::Any(children) => Self::Any(children.clone()),
        }
    }
}

impl<T> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::All(children) => f.debug_tuple("All").field(children).finish(),
            Self::Any(children) => f.debug_tuple("Any").field(children).finish(),
        }
    }
}

fn matches_all<T>(item: &T, selectors: &[Selector<T>]) -> bool {
    selectors.iter().all(|s| s.matches(item))
}

/// Borrow the items matching every selector, in their original order.
pub fn filter<'a, T>(items: &'a [T], selectors: &[Selector<T>]) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches_all(*item, selectors))
        .collect()
}

/// Keep the items matching every selector, in their original order.
pub fn filter_owned<T>(items: Vec<T>, selectors: &[Selector<T>]) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| matches_all(item, selectors))
        .collect()
}

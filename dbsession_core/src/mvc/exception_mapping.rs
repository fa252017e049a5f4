//! Error type → result name tables for action dispatch.
//!
//! Actions register their mappings at startup instead of carrying them as
//! metadata. A dispatcher that catches an error from an action method asks
//! [`ExceptionMappingTable::resolve`] which result to render.
//!
//! Lookup order for action `A`, method `m`:
//! 1. mappings registered for `(A, m)`;
//! 2. type-level mappings of the nearest type in `A`'s ancestry (`A` itself,
//!    then its parent, ...) that declares any. A subtype's own declaration
//!    replaces an inherited one rather than extending it.
//!
//! Within one list, the error itself is tried first, then each `source()` in
//! turn; for each, mappings are tried in declaration order.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use log::debug;

type Matcher = fn(&(dyn Error + 'static)) -> bool;

/// One error type → result name pair.
#[derive(Clone)]
pub struct ExceptionMapping {
    exception: &'static str,
    matches: Matcher,
    result: String,
}

impl ExceptionMapping {
    /// Maps errors whose concrete type is `E` to `result`.
    pub fn of<E: Error + 'static>(result: impl Into<String>) -> Self {
        Self {
            exception: type_name::<E>(),
            matches: |err| err.is::<E>(),
            result: result.into(),
        }
    }

    /// Maps every error to `result`.
    pub fn any(result: impl Into<String>) -> Self {
        Self {
            exception: "*",
            matches: |_| true,
            result: result.into(),
        }
    }

    pub fn exception(&self) -> &'static str {
        self.exception
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        (self.matches)(err)
    }
}

impl fmt::Debug for ExceptionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionMapping")
            .field("exception", &self.exception)
            .field("result", &self.result)
            .finish()
    }
}

/// An ordered list of [`ExceptionMapping`]s; empty by default.
#[derive(Debug, Clone, Default)]
pub struct ExceptionMappings(Vec<ExceptionMapping>);

impl ExceptionMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mapping for `E`.
    pub fn map<E: Error + 'static>(mut self, result: impl Into<String>) -> Self {
        self.0.push(ExceptionMapping::of::<E>(result));
        self
    }

    /// Appends a catch-all mapping.
    pub fn otherwise(mut self, result: impl Into<String>) -> Self {
        self.0.push(ExceptionMapping::any(result));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExceptionMapping> {
        self.0.iter()
    }

    /// First result matching `err` or, failing that, one of its sources.
    pub fn find(&self, err: &(dyn Error + 'static)) -> Option<&str> {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(mapping) = self.0.iter().find(|m| m.matches(e)) {
                return Some(mapping.result());
            }
            current = e.source();
        }
        None
    }
}

impl FromIterator<ExceptionMapping> for ExceptionMappings {
    fn from_iter<I: IntoIterator<Item = ExceptionMapping>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("'{child}' cannot inherit from '{parent}': that would create a cycle")]
    Cycle {
        child: &'static str,
        parent: &'static str,
    },
}

#[derive(Default)]
struct ActionEntry {
    name: &'static str,
    parent: Option<TypeId>,
    mappings: Option<ExceptionMappings>,
    methods: HashMap<String, ExceptionMappings>,
}

/// Per-action registration table, built once at startup and queried per request.
#[derive(Default)]
pub struct ExceptionMappingTable {
    actions: HashMap<TypeId, ActionEntry>,
}

impl ExceptionMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry<A: 'static>(&mut self) -> &mut ActionEntry {
        self.actions
            .entry(TypeId::of::<A>())
            .or_insert_with(|| ActionEntry {
                name: type_name::<A>(),
                ..ActionEntry::default()
            })
    }

    /// Declares type-level mappings for action `A`, replacing earlier ones.
    pub fn map_action<A: 'static>(&mut self, mappings: ExceptionMappings) -> &mut Self {
        self.entry::<A>().mappings = Some(mappings);
        self
    }

    /// Declares mappings for one method of action `A`. Method mappings are not inherited.
    pub fn map_method<A: 'static>(
        &mut self,
        method: &str,
        mappings: ExceptionMappings,
    ) -> &mut Self {
        self.entry::<A>().methods.insert(method.to_string(), mappings);
        self
    }

    /// Makes `Child` inherit type-level mappings from `Parent`.
    pub fn inherit<Child: 'static, Parent: 'static>(&mut self) -> Result<&mut Self, MappingError> {
        let child = TypeId::of::<Child>();
        let parent = TypeId::of::<Parent>();

        if self.ancestry(parent).any(|id| id == child) {
            return Err(MappingError::Cycle {
                child: type_name::<Child>(),
                parent: type_name::<Parent>(),
            });
        }

        self.entry::<Parent>();
        self.entry::<Child>().parent = Some(parent);
        Ok(self)
    }

    /// `start` and its ancestors, nearest first.
    fn ancestry(&self, start: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(Some(start), move |id| {
            self.actions.get(id).and_then(|entry| entry.parent)
        })
    }

    /// Type-level mappings in effect for `A`: its own, or the nearest inherited ones.
    pub fn action_mappings<A: 'static>(&self) -> Option<&ExceptionMappings> {
        self.ancestry(TypeId::of::<A>())
            .filter_map(|id| self.actions.get(&id))
            .find_map(|entry| entry.mappings.as_ref())
    }

    pub fn method_mappings<A: 'static>(&self, method: &str) -> Option<&ExceptionMappings> {
        self.actions
            .get(&TypeId::of::<A>())
            .and_then(|entry| entry.methods.get(method))
    }

    /// Result name for `err` raised by `method` of action `A`, if any mapping applies.
    pub fn resolve<A: 'static>(&self, method: &str, err: &(dyn Error + 'static)) -> Option<&str> {
        let from_method = self
            .method_mappings::<A>(method)
            .and_then(|mappings| mappings.find(err));
        if from_method.is_some() {
            return from_method;
        }

        let found = self
            .action_mappings::<A>()
            .and_then(|mappings| mappings.find(err));
        if let Some(result) = found {
            let action = self
                .actions
                .get(&TypeId::of::<A>())
                .map_or_else(type_name::<A>, |entry| entry.name);
            debug!("Mapped error from {}::{} to '{}'", action, method, result);
        }
        found
    }
}

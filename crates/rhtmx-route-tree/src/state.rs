// File: src/state.rs
// Purpose: Route-scoped state bindings (reducer state and typed scope state)

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Result, RouteError};
use crate::node::RouteId;
use crate::registry::Registry;

/// Reducer `(state, action) -> state` bound to a stateful route
#[derive(Clone)]
pub struct Reducer(Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>);

impl Reducer {
    pub fn new<F>(reducer: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(reducer))
    }

    pub fn apply(&self, state: &Value, action: &Value) -> Value {
        (self.0)(state, action)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer(..)")
    }
}

type Slots = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// State owned by a stateful route (or by the registry's fallback scope)
#[derive(Default)]
pub(crate) struct StateBinding {
    reducer: Option<Reducer>,
    current: RwLock<Option<Value>>,
    scope: RwLock<Slots>,
}

impl StateBinding {
    pub(crate) fn new(reducer: Option<Reducer>, initial_state: Option<Value>) -> Self {
        Self {
            reducer,
            current: RwLock::new(initial_state),
            scope: RwLock::new(HashMap::new()),
        }
    }

    fn current(&self) -> Option<Value> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn seed(&self, initial: Option<Value>) -> Value {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.is_none() {
            *current = initial;
        }
        current.clone().unwrap_or(Value::Null)
    }

    fn dispatch(&self, action: &Value) -> Option<Value> {
        let reducer = self.reducer.as_ref()?;
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = reducer.apply(current.as_ref().unwrap_or(&Value::Null), action);
        *current = Some(next.clone());
        Some(next)
    }

    fn scope_get<T: Any + Clone>(&self) -> Option<T> {
        self.scope
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .and_then(|stored| stored.downcast_ref::<T>())
            .cloned()
    }

    fn scope_set<T: Any + Send + Sync>(&self, value: T) {
        self.scope
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), Box::new(value));
    }
}

impl fmt::Debug for StateBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scoped = self.scope.read().map(|s| s.len()).unwrap_or_default();
        f.debug_struct("StateBinding")
            .field("reducer", &self.reducer.is_some())
            .field("current", &self.current())
            .field("scoped_values", &scoped)
            .finish()
    }
}

/// Typed state keyed by its Rust type on the nearest enclosing stateful route
pub struct ScopeState<'a, T> {
    binding: &'a StateBinding,
    value: T,
}

impl<'a, T: Any + Clone + Send + Sync> ScopeState<'a, T> {
    /// Value stored for `T`, or the initial value if nothing was stored yet
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value stored for `T`
    pub fn set(&mut self, value: T) {
        self.binding.scope_set(value.clone());
        self.value = value;
    }
}

impl<T: fmt::Debug> fmt::Debug for ScopeState<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeState").field("value", &self.value).finish()
    }
}

/// Reject primitive shapes: keying by type only makes sense for named types.
fn check_shape<T: Any>() -> Result<()> {
    let id = TypeId::of::<T>();
    let disallowed = [
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
        TypeId::of::<String>(),
        TypeId::of::<&'static str>(),
        TypeId::of::<Value>(),
        TypeId::of::<Map<String, Value>>(),
        TypeId::of::<HashMap<String, String>>(),
        TypeId::of::<HashMap<String, Value>>(),
        TypeId::of::<Regex>(),
        TypeId::of::<fn()>(),
    ];

    if disallowed.contains(&id) {
        return Err(RouteError::DisallowedState {
            type_name: type_name::<T>(),
        });
    }
    Ok(())
}

impl Registry {
    /// Binding of the nearest stateful route at or above `route`,
    /// falling back to the registry-wide initial scope.
    fn binding_for(&self, route: RouteId) -> Result<&StateBinding> {
        let found = self
            .ancestors_inclusive(route)?
            .find_map(|id| self.nodes[id.idx()].state());
        Ok(found.unwrap_or(&self.fallback))
    }

    /// Current reducer state of the enclosing stateful route.
    ///
    /// If that route has no state yet it is seeded with `initial`.
    pub fn reducer_state(&self, route: RouteId, initial: Option<Value>) -> Result<Value> {
        Ok(self.binding_for(route)?.seed(initial))
    }

    /// Run `action` through the enclosing route's reducer and store the result.
    ///
    /// Without a reducer the state is left untouched and a warning is logged.
    pub fn dispatch(&self, route: RouteId, action: Value) -> Result<Value> {
        let binding = self.binding_for(route)?;
        match binding.dispatch(&action) {
            Some(next) => Ok(next),
            None => {
                tracing::warn!(
                    route = %self.nodes[route.idx()].label(),
                    "This route context cannot find reducer."
                );
                Ok(binding.current().unwrap_or(Value::Null))
            }
        }
    }

    /// Typed state for view code rendered under `route`.
    ///
    /// The value is keyed by `T`, so `T` must be a named type: primitives,
    /// strings, plain maps, JSON values, regexes and function pointers fail
    /// with [`RouteError::DisallowedState`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_route_tree::{Registry, RouteSpec};
    /// use serde_json::json;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Filter { query: String }
    ///
    /// let mut registry = Registry::new();
    /// let users = registry
    ///     .create(RouteSpec::named("users", "Users").with_initial_state(json!({})))
    ///     .unwrap();
    ///
    /// let mut filter = registry.scope_state(users, Filter { query: String::new() }).unwrap();
    /// filter.set(Filter { query: "ann".into() });
    ///
    /// let again = registry.scope_state(users, Filter { query: String::new() }).unwrap();
    /// assert_eq!(again.get().query, "ann");
    /// assert!(registry.scope_state(users, 5_u32).is_err());
    /// ```
    pub fn scope_state<T>(&self, route: RouteId, initial: T) -> Result<ScopeState<'_, T>>
    where
        T: Any + Clone + Send + Sync,
    {
        check_shape::<T>()?;
        let binding = self.binding_for(route)?;
        let value = binding.scope_get::<T>().unwrap_or(initial);
        Ok(ScopeState { binding, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter(u32);

    #[test]
    fn test_check_shape_rejects_primitives() {
        assert!(check_shape::<u32>().is_err());
        assert!(check_shape::<f64>().is_err());
        assert!(check_shape::<String>().is_err());
        assert!(check_shape::<&'static str>().is_err());
        assert!(check_shape::<Value>().is_err());
        assert!(check_shape::<Regex>().is_err());
        assert!(check_shape::<fn()>().is_err());
    }

    #[test]
    fn test_check_shape_accepts_named_types() {
        assert!(check_shape::<Counter>().is_ok());
        assert!(check_shape::<Vec<Counter>>().is_ok());
    }

    #[test]
    fn test_binding_seed_keeps_first_value() {
        let binding = StateBinding::new(None, None);
        assert_eq!(binding.seed(Some(Value::from(1))), Value::from(1));
        assert_eq!(binding.seed(Some(Value::from(2))), Value::from(1));
    }

    #[test]
    fn test_binding_scope_is_keyed_by_type() {
        let binding = StateBinding::new(None, None);
        binding.scope_set(Counter(3));
        assert_eq!(binding.scope_get::<Counter>(), Some(Counter(3)));
        assert_eq!(binding.scope_get::<Vec<Counter>>(), None);
    }
}

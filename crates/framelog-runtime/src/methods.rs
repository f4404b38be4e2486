use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use framelog_types::{Field, TraceError, Value};

type MethodFn<T> = dyn Fn(&mut T, &[Value]) -> Value + Send + Sync;

/// A callable member of a target. Cloning shares the same underlying function.
pub struct Method<T>(Arc<MethodFn<T>>);

impl<T> Method<T> {
    pub fn new(f: impl Fn(&mut T, &[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn invoke(&self, target: &mut T, args: &[Value]) -> Value {
        (self.0)(target, args)
    }

    /// True when both handles point at the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({:p})", Arc::as_ptr(&self.0))
    }
}

/// Name-keyed callable members of a target, in insertion order.
pub struct MethodTable<T> {
    methods: HashMap<String, Method<T>>,
    order: Vec<String>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Adds or replaces a member. A replaced member keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, method: Method<T>) -> Option<Method<T>> {
        let name = name.into();
        let previous = self.methods.insert(name.clone(), method);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    pub fn remove(&mut self, name: &str) -> Option<Method<T>> {
        let removed = self.methods.remove(name)?;
        self.order.retain(|n| n != name);
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Method<T>> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MethodTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.order).finish()
    }
}

/// Capability a target needs to be profiled.
///
/// Callable members live in a [`MethodTable`] the interceptor can swap
/// entries in; properties are readable by name without side effects.
pub trait Instrumentable: Sized + 'static {
    fn methods(&self) -> &MethodTable<Self>;

    fn methods_mut(&mut self) -> &mut MethodTable<Self>;

    /// Every property currently visible on the target, own and inherited,
    /// in declaration order. Values need not be scalar.
    fn properties(&self) -> Vec<Field>;

    /// Reads one property. `None` if the target has no such property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Invokes a callable member through the method table.
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, TraceError> {
        let method = self
            .methods()
            .get(name)
            .cloned()
            .ok_or_else(|| TraceError::UnknownMember {
                name: name.to_owned(),
            })?;
        Ok(method.invoke(self, args))
    }
}

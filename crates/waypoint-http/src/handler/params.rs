//! Declared handler parameters and the arguments resolved for them

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use waypoint_core::ServiceId;

/// Factory captured when a parameter is declared constructible
pub type ConstructFn = dyn Fn() -> Box<dyn Any + Send> + Send + Sync;

/// What kind of value a parameter can receive besides a route value
#[derive(Clone)]
pub enum ParamKind {
    /// A plain value; only route values and defaults apply
    Text,
    /// A service built by the router's provider registry
    Service(ServiceId),
    /// A value built by a factory captured at declaration
    Construct {
        service: ServiceId,
        factory: Arc<ConstructFn>,
    },
}

impl std::fmt::Debug for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Text => f.write_str("Text"),
            ParamKind::Service(service) => f.debug_tuple("Service").field(&service.type_name).finish(),
            ParamKind::Construct { service, .. } => {
                f.debug_tuple("Construct").field(&service.type_name).finish()
            }
        }
    }
}

/// One declared handler parameter
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
}

impl ParamSpec {
    /// A parameter that receives a route value, its default, or nothing
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Text,
            default: None,
        }
    }

    /// A parameter built through the provider registered for `T`
    pub fn service<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Service(ServiceId::of::<T>()),
            default: None,
        }
    }

    /// A parameter built with `T::default()`
    pub fn construct<T>(name: impl Into<String>) -> Self
    where
        T: Default + Send + 'static,
    {
        Self::construct_with(name, T::default)
    }

    /// A parameter built with `factory`
    pub fn construct_with<T, F>(name: impl Into<String>, factory: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: ParamKind::Construct {
                service: ServiceId::of::<T>(),
                factory: Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>),
            },
            default: None,
        }
    }

    /// Declare a default used when nothing else applies
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A value resolved for one parameter
pub enum Argument {
    /// A route parameter value, uncoerced
    Text(String),
    /// A freshly constructed instance
    Instance(Box<dyn Any + Send>),
    /// The declared default
    Default(Value),
    /// Nothing applied
    Absent,
}

impl Argument {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Argument::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_default(&self) -> Option<&Value> {
        match self {
            Argument::Default(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow a constructed instance as `T`
    pub fn instance<T: 'static>(&self) -> Option<&T> {
        match self {
            Argument::Instance(instance) => instance.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Argument::Absent)
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Argument::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Argument::Instance(_) => f.write_str("Instance(..)"),
            Argument::Default(value) => f.debug_tuple("Default").field(value).finish(),
            Argument::Absent => f.write_str("Absent"),
        }
    }
}

/// Resolved arguments, in the handler's declaration order
#[derive(Debug, Default)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: &str, argument: Argument) {
        self.entries.push((name.to_string(), argument));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Argument at declaration position `index`
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.entries.get(index).map(|(_, argument)| argument)
    }

    /// Argument for the parameter declared as `name`
    pub fn by_name(&self, name: &str) -> Option<&Argument> {
        self.entries
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, argument)| argument)
    }

    /// Route value bound to `name`, if any
    pub fn text(&self, name: &str) -> Option<&str> {
        self.by_name(name).and_then(Argument::as_text)
    }

    /// Move the constructed instance for `name` out as `T`.
    ///
    /// Returns `None` and leaves the argument in place if it is not an
    /// instance of `T`.
    pub fn take<T: 'static>(&mut self, name: &str) -> Option<T> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(declared, _)| declared == name)
            .map(|(_, argument)| argument)?;

        match std::mem::replace(slot, Argument::Absent) {
            Argument::Instance(instance) => match instance.downcast::<T>() {
                Ok(value) => Some(*value),
                Err(instance) => {
                    *slot = Argument::Instance(instance);
                    None
                }
            },
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Declared parameter names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries
            .iter()
            .map(|(name, argument)| (name.as_str(), argument))
    }
}

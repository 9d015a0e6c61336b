//! Form construction options.

use std::sync::Arc;

use crate::error::FormResult;
use crate::validation::{FormErrors, ValidatorRegistry};
use crate::value::{Model, Value};

/// Called with the full value map whenever it changes.
pub type ChangeCallback = Arc<dyn Fn(&Model) + Send + Sync>;

/// Called after any mutation that affects displayed output.
pub type RenderCallback = Arc<dyn Fn() + Send + Sync>;

/// Called by `submit` when every field is valid.
pub type ValidSubmitCallback = Arc<dyn Fn(&Model) + Send + Sync>;

/// Called by `submit` when some field is not valid.
pub type InvalidSubmitCallback = Arc<dyn Fn(&FormErrors, &Model) + Send + Sync>;

/// Construction-time configuration of a [`Form`](super::Form).
///
/// Read once when the form is created.
///
/// # Example
///
/// ```
/// use formstate::FormOptions;
///
/// let options = FormOptions::new()
///     .default_value([("country", "NL")])
///     .on_valid_submit(|value| println!("submitted {:?}", value));
/// ```
#[derive(Clone, Default)]
pub struct FormOptions {
    /// Initial value map. Fields present here are validated as soon as they register.
    pub default_value: Model,

    /// Validator registry. `None` uses [`ValidatorRegistry::global`].
    pub registry: Option<ValidatorRegistry>,

    pub on_change: Option<ChangeCallback>,
    pub on_render: Option<RenderCallback>,
    pub on_valid_submit: Option<ValidSubmitCallback>,
    pub on_invalid_submit: Option<InvalidSubmitCallback>,
}

impl FormOptions {
    /// Create options with no defaults and no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the value map.
    pub fn default_value<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.default_value = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Seed the value map from a JSON object.
    pub fn default_value_json(mut self, json: &str) -> FormResult<Self> {
        self.default_value = serde_json::from_str::<Model>(json)?;
        Ok(self)
    }

    /// Use a form-scoped registry instead of the global one.
    pub fn registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&Model) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn on_render<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_render = Some(Arc::new(f));
        self
    }

    pub fn on_valid_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(&Model) + Send + Sync + 'static,
    {
        self.on_valid_submit = Some(Arc::new(f));
        self
    }

    pub fn on_invalid_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(&FormErrors, &Model) + Send + Sync + 'static,
    {
        self.on_invalid_submit = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormOptions")
            .field("default_value", &self.default_value)
            .field("registry", &self.registry)
            .field("on_change", &self.on_change.is_some())
            .field("on_render", &self.on_render.is_some())
            .field("on_valid_submit", &self.on_valid_submit.is_some())
            .field("on_invalid_submit", &self.on_invalid_submit.is_some())
            .finish()
    }
}

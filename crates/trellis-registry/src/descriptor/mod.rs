//! Callable descriptors: the registered, materialized metadata for one
//! callable.
//!
//! A [`CallableDescriptor`] is created once per unique identity, the first
//! time the identity is requested or during eager materialization, and cached
//! for the lifetime of the process. After the first configuration pass it is
//! only ever extended with newly discovered per-method options.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use trellis_config::{MethodOptions, Separator, merge_method_options};

use crate::error::RegistryError;

/// Public methods every callable inherits from the framework base.
///
/// These are lifecycle and factory helpers, never exposed to the client, so
/// they seed the protected set of every descriptor.
pub const BASE_METHODS: &[&str] = &["init", "invoke", "call", "paginate"];

/// Kind of invokable unit behind a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    /// A class with exposed methods.
    Class,
    /// A bare function.
    Function,
}

/// Load state of an include file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeState {
    /// The file has not been loaded yet.
    Unloaded,
    /// The file was loaded by a previous materialization.
    Loaded,
}

/// A source file loaded once before the first invocation of its callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeFile {
    path: PathBuf,
    state: IncludeState,
}

impl IncludeFile {
    /// Records an include file in the unloaded state.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: IncludeState::Unloaded,
        }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once the file has been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, IncludeState::Loaded)
    }

    /// Loads the file exactly once; later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IncludeMissing`] when the file does not
    /// exist. Fatal at startup, never a per-request condition.
    pub fn load(&mut self, identity: &str) -> Result<(), RegistryError> {
        if self.is_loaded() {
            return Ok(());
        }
        if !self.path.is_file() {
            return Err(RegistryError::include_missing(identity, self.path.clone()));
        }
        self.state = IncludeState::Loaded;
        Ok(())
    }
}

/// Registered, materialized metadata for one callable.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableDescriptor {
    identity: String,
    kind: CallableKind,
    separator: Separator,
    protected: BTreeSet<String>,
    methods: Vec<String>,
    options: BTreeMap<String, MethodOptions>,
    include: Option<IncludeFile>,
}

impl CallableDescriptor {
    /// Creates a descriptor for a class identity.
    ///
    /// The protected set is seeded with [`BASE_METHODS`] so the framework's
    /// own lifecycle surface can never leak to the client.
    #[must_use]
    pub fn new(identity: impl Into<String>, kind: CallableKind, separator: Separator) -> Self {
        Self {
            identity: identity.into(),
            kind,
            separator,
            protected: BASE_METHODS.iter().map(|name| (*name).to_owned()).collect(),
            methods: Vec::new(),
            options: BTreeMap::new(),
            include: None,
        }
    }

    /// Adds method names to the protected set.
    #[must_use]
    pub fn with_protected<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares the public methods, in declaration order.
    #[must_use]
    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    /// Records the per-method client option bags.
    #[must_use]
    pub fn with_options(mut self, options: BTreeMap<String, MethodOptions>) -> Self {
        self.options = options;
        self
    }

    /// Records the include file.
    #[must_use]
    pub fn with_include(mut self, include: IncludeFile) -> Self {
        self.include = Some(include);
        self
    }

    /// Returns the fully qualified dotted identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the kind of callable.
    #[must_use]
    pub const fn kind(&self) -> CallableKind {
        self.kind
    }

    /// Returns the configured client-side separator.
    #[must_use]
    pub const fn separator(&self) -> Separator {
        self.separator
    }

    /// Returns the include file, when one was recorded.
    #[must_use]
    pub const fn include(&self) -> Option<&IncludeFile> {
        self.include.as_ref()
    }

    /// Returns the client-side identifier.
    ///
    /// The canonical dotted identity with the configured separator
    /// substituted.
    #[must_use]
    pub fn js_name(&self) -> String {
        self.identity.replace('.', &self.separator.to_string())
    }

    /// Returns the methods eligible for client invocation.
    ///
    /// The declared public methods minus the protected set, declaration
    /// order preserved.
    #[must_use]
    pub fn exposed_methods(&self) -> Vec<&str> {
        self.methods
            .iter()
            .map(String::as_str)
            .filter(|name| !self.protected.contains(*name))
            .collect()
    }

    /// Returns `true` when the method is exposed to the client.
    #[must_use]
    pub fn is_exposed(&self, method: &str) -> bool {
        !self.protected.contains(method) && self.methods.iter().any(|name| name == method)
    }

    /// Returns the protected method names.
    #[must_use]
    pub const fn protected(&self) -> &BTreeSet<String> {
        &self.protected
    }

    /// Computes the effective client option bag for one method.
    ///
    /// The wildcard (`*`) bag merges under the method-specific bag; specific
    /// keys win on conflict.
    #[must_use]
    pub fn method_options(&self, method: &str) -> MethodOptions {
        let empty = MethodOptions::new();
        let wildcard = self
            .options
            .get(trellis_config::WILDCARD_METHOD)
            .unwrap_or(&empty);
        self.options
            .get(method)
            .map_or_else(|| wildcard.clone(), |bag| merge_method_options(wildcard, bag))
    }

    /// Adds newly discovered option keys for one method.
    ///
    /// Existing keys are kept; this is the only mutation allowed after the
    /// first configuration pass.
    pub fn add_method_options(&mut self, method: &str, bag: &MethodOptions) {
        let entry = self.options.entry(method.to_owned()).or_default();
        for (key, value) in bag {
            entry.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

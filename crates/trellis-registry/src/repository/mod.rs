//! The callable repository.
//!
//! The [`Repository`] maps registration inputs (explicit class names,
//! directory scans, namespaces, user functions) to materialized
//! [`CallableDescriptor`]s, computes the content hash over the registered
//! surface, and emits the aggregate client stub script.
//!
//! Materialization is idempotent: scanning a directory twice, or requesting
//! the same identity twice, yields the cached result and never re-scans the
//! filesystem. All mutating paths take `&mut self`, so the single-writer
//! rule is enforced by the borrow checker; a multi-threaded server must
//! either wrap the repository in one coarse lock or complete registration
//! during a single-threaded startup phase.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;

use trellis_call::{PaginatorFactory, RequestFactory};
use trellis_config::{ClassOptions, DirectoryOptions, FrameworkOptions, NamespaceOptions, Separator};

use crate::class::{CallableClass, CallableImpl};
use crate::descriptor::{CallableDescriptor, CallableKind, IncludeFile};
use crate::error::RegistryError;
use crate::function::UserFunction;
use crate::script::{OBJECT_TEMPLATE, TemplateRenderer};

/// Tracing target for repository operations.
pub(crate) const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::repository");

/// File extension recognised as a server-side source file during scans.
const SOURCE_EXTENSION: &str = "rs";

/// Normalises an identifier onto the canonical dotted form.
///
/// Both `.` and `_` separators (and the legacy `\` form) map onto `.`;
/// leading and trailing separators are stripped.
#[must_use]
pub fn normalize_identity(identifier: &str) -> String {
    identifier
        .chars()
        .map(|ch| if ch == '_' || ch == '\\' { '.' } else { ch })
        .collect::<String>()
        .trim_matches('.')
        .to_owned()
}

/// Registry of callable classes, namespaces and user functions.
pub struct Repository {
    options: FrameworkOptions,
    class_options: BTreeMap<String, ClassOptions>,
    namespace_options: BTreeMap<String, NamespaceOptions>,
    namespaces: BTreeMap<String, Separator>,
    scanned_directories: BTreeSet<PathBuf>,
    materialized_namespaces: BTreeSet<String>,
    implementations: BTreeMap<String, CallableImpl>,
    descriptors: BTreeMap<String, CallableDescriptor>,
    instances: BTreeMap<String, Box<dyn CallableClass>>,
    request_factories: BTreeMap<String, RequestFactory>,
    paginator_factories: BTreeMap<String, PaginatorFactory>,
    functions: BTreeMap<String, UserFunction>,
}

impl Repository {
    /// Creates an empty repository with the given framework options.
    #[must_use]
    pub fn new(options: FrameworkOptions) -> Self {
        Self {
            options,
            class_options: BTreeMap::new(),
            namespace_options: BTreeMap::new(),
            namespaces: BTreeMap::new(),
            scanned_directories: BTreeSet::new(),
            materialized_namespaces: BTreeSet::new(),
            implementations: BTreeMap::new(),
            descriptors: BTreeMap::new(),
            instances: BTreeMap::new(),
            request_factories: BTreeMap::new(),
            paginator_factories: BTreeMap::new(),
            functions: BTreeMap::new(),
        }
    }

    /// Returns the framework options.
    #[must_use]
    pub const fn options(&self) -> &FrameworkOptions {
        &self.options
    }

    /// Registers the implementation for a class identity.
    ///
    /// This is the explicit replacement for runtime class discovery: the
    /// declared public method list and instance factory are supplied at
    /// startup. Materialization later verifies an identity against this
    /// table and treats a missing entry as "no such callable".
    pub fn register_class_impl<F>(&mut self, name: &str, methods: Vec<String>, factory: F)
    where
        F: Fn() -> Box<dyn CallableClass> + 'static,
    {
        let identity = normalize_identity(name);
        self.implementations
            .insert(identity, CallableImpl::new(methods, factory));
    }

    /// Registers a class name directly with explicit options.
    ///
    /// Last write wins when the same name is registered twice.
    pub fn add_class(&mut self, name: &str, options: ClassOptions) {
        let identity = normalize_identity(name);
        self.class_options.insert(identity, options);
    }

    /// Scans a directory tree and registers every recognised source file.
    ///
    /// The class name derives from the file stem; effective options merge
    /// directory-wide defaults, wildcard options and class-specific options
    /// in increasing priority. With `autoload` set, the file path is
    /// recorded as a lazily loaded include. The scan runs once per
    /// directory per process.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DirectoryScan`] when the tree cannot be
    /// traversed; fatal at startup.
    pub fn add_directory(
        &mut self,
        directory: &Path,
        options: &DirectoryOptions,
    ) -> Result<(), RegistryError> {
        if !self.scanned_directories.insert(directory.to_path_buf()) {
            debug!(
                target: REGISTRY_TARGET,
                directory = %directory.display(),
                "directory already scanned"
            );
            return Ok(());
        }

        for entry_result in WalkDir::new(directory) {
            let file =
                entry_result.map_err(|source| RegistryError::directory_scan(directory, source))?;
            let Some(class_name) = source_file_stem(&file) else {
                continue;
            };
            let base = ClassOptions {
                include: options.autoload.then(|| file.path().to_path_buf()),
                ..ClassOptions::default()
            };
            let class_options = options.class_options(&class_name, base);
            self.add_class(&class_name, class_options);
        }
        Ok(())
    }

    /// Registers a namespace backed by a directory, deferring the scan.
    ///
    /// The separator defaults to `.`. Re-registration is a no-op once the
    /// namespace has been materialized.
    pub fn add_namespace(&mut self, namespace: &str, options: NamespaceOptions) {
        let identity = normalize_identity(namespace);
        if self.materialized_namespaces.contains(&identity) {
            debug!(
                target: REGISTRY_TARGET,
                namespace = identity,
                "namespace already materialized; registration ignored"
            );
            return;
        }
        self.namespace_options.insert(identity, options);
    }

    /// Registers a user function keyed by its client name.
    pub fn register_function(&mut self, function: UserFunction) {
        self.functions.insert(function.name().to_owned(), function);
    }

    /// Looks up a registered user function.
    #[must_use]
    pub fn user_function_mut(&mut self, name: &str) -> Option<&mut UserFunction> {
        self.functions.get_mut(name)
    }

    /// Resolves an identifier to its callable descriptor, materializing it
    /// on first use.
    ///
    /// Resolution tries the descriptor cache, then explicit class options,
    /// then the registered namespaces by longest matching prefix (a
    /// namespace `N` matches identity `I` iff `I` starts with `N` followed
    /// by the separator). An unregistered identifier is a legitimate
    /// "no such callable" state, returned as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IncludeMissing`] when the callable's include
    /// file does not exist.
    pub fn get_callable(
        &mut self,
        identifier: &str,
    ) -> Result<Option<&CallableDescriptor>, RegistryError> {
        let identity = normalize_identity(identifier);
        if identity.is_empty() {
            return Ok(None);
        }
        if !self.descriptors.contains_key(&identity) {
            let options = self
                .class_options
                .get(&identity)
                .cloned()
                .or_else(|| self.namespace_class_options(&identity));
            let Some(found) = options else {
                return Ok(None);
            };
            if !self.materialize(&identity, &found)? {
                return Ok(None);
            }
        }
        Ok(self.descriptors.get(&identity))
    }

    /// Returns the registered instance for an identifier, constructing it on
    /// first use (and auto-materializing the descriptor if necessary).
    ///
    /// # Errors
    ///
    /// Propagates materialization failures; see [`Repository::get_callable`].
    pub fn registered_instance(
        &mut self,
        identifier: &str,
    ) -> Result<Option<&mut (dyn CallableClass + 'static)>, RegistryError> {
        let identity = normalize_identity(identifier);
        if self.get_callable(&identity)?.is_none() {
            return Ok(None);
        }
        if !self.instances.contains_key(&identity) {
            let Some(implementation) = self.implementations.get(&identity) else {
                return Ok(None);
            };
            let instance = implementation.instantiate();
            self.instances.insert(identity.clone(), instance);
        }
        Ok(self.instances.get_mut(&identity).map(|boxed| &mut **boxed))
    }

    /// Returns the memoized request-builder factory for an identifier.
    ///
    /// # Errors
    ///
    /// Propagates materialization failures; see [`Repository::get_callable`].
    pub fn request_factory(
        &mut self,
        identifier: &str,
    ) -> Result<Option<&RequestFactory>, RegistryError> {
        let identity = normalize_identity(identifier);
        if self.get_callable(&identity)?.is_none() {
            return Ok(None);
        }
        Ok(self.request_factories.get(&identity))
    }

    /// Returns the memoized paginator-builder factory for an identifier.
    ///
    /// # Errors
    ///
    /// Propagates materialization failures; see [`Repository::get_callable`].
    pub fn paginator_factory(
        &mut self,
        identifier: &str,
    ) -> Result<Option<&PaginatorFactory>, RegistryError> {
        let identity = normalize_identity(identifier);
        if self.get_callable(&identity)?.is_none() {
            return Ok(None);
        }
        Ok(self.paginator_factories.get(&identity))
    }

    /// Computes the content hash over the registered surface.
    ///
    /// Forces full materialization first, then digests every known
    /// namespace identity with its separator followed by every materialized
    /// identity with its pipe-joined exposed-method list. The hash changes
    /// iff the registered surface changes; callers use it to version the
    /// generated stub script.
    ///
    /// # Errors
    ///
    /// Propagates materialization failures.
    pub fn generate_hash(&mut self) -> Result<String, RegistryError> {
        self.materialize_all()?;

        let mut hasher = Sha256::new();
        for (namespace, separator) in &self.namespaces {
            hasher.update(namespace.as_bytes());
            hasher.update(separator.to_string().as_bytes());
        }
        for (identity, descriptor) in &self.descriptors {
            hasher.update(identity.as_bytes());
            hasher.update(descriptor.exposed_methods().join("|").as_bytes());
        }

        let digest = hasher.finalize();
        let mut hash = String::with_capacity(64);
        for byte in digest {
            let _ = write!(hash, "{byte:02x}");
        }
        Ok(hash)
    }

    /// Emits the aggregate client stub script.
    ///
    /// Forces full materialization, then renders one namespace-object
    /// initialization statement per unique dotted prefix (parents before
    /// children, each exactly once) followed by one stub block per
    /// materialized descriptor and per user function.
    ///
    /// # Errors
    ///
    /// Propagates materialization failures.
    pub fn get_script(&mut self, renderer: &dyn TemplateRenderer) -> Result<String, RegistryError> {
        self.materialize_all()?;

        let mut script = String::new();
        self.render_namespace_declarations(&mut script);
        for descriptor in self.descriptors.values() {
            script.push_str(&renderer.render(OBJECT_TEMPLATE, &object_vars(
                &self.options.class_prefix,
                descriptor,
            )));
        }
        for function in self.functions.values() {
            script.push_str(&function.script(&self.options.function_prefix, renderer));
        }
        Ok(script)
    }

    fn render_namespace_declarations(&self, script: &mut String) {
        let prefix = &self.options.class_prefix;
        let mut declared: BTreeSet<String> = BTreeSet::new();
        for namespace in self.namespaces.keys() {
            let mut chain = String::new();
            for segment in namespace.split('.') {
                if !chain.is_empty() {
                    chain.push('.');
                }
                chain.push_str(segment);
                if declared.insert(chain.clone()) {
                    let _ = writeln!(script, "{prefix}{chain} = {{}};");
                }
            }
        }
    }

    /// Finds class options through the registered namespaces.
    ///
    /// The longest matching namespace prefix wins; overlap between
    /// registered namespaces therefore resolves deterministically instead of
    /// depending on registration order.
    fn namespace_class_options(&self, identity: &str) -> Option<ClassOptions> {
        let mut best: Option<(&String, &NamespaceOptions)> = None;
        for (namespace, options) in &self.namespace_options {
            let matched = identity
                .strip_prefix(namespace.as_str())
                .is_some_and(|rest| rest.starts_with('.'));
            if matched && best.is_none_or(|(current, _)| namespace.len() > current.len()) {
                best = Some((namespace, options));
            }
        }
        best.map(|(_, options)| options.class_options(identity))
    }

    /// Materializes one identity from its effective options.
    ///
    /// Loads the include file (once), verifies the identity against the
    /// implementation table, constructs and caches the descriptor, and
    /// registers the memoized request and paginator factories. Returns
    /// `false` when no implementation is registered for the identity.
    fn materialize(
        &mut self,
        identity: &str,
        options: &ClassOptions,
    ) -> Result<bool, RegistryError> {
        let mut include = options.include.as_ref().map(IncludeFile::new);
        if let Some(file) = include.as_mut() {
            file.load(identity)?;
        }

        let Some(implementation) = self.implementations.get(identity) else {
            debug!(
                target: REGISTRY_TARGET,
                identity,
                "no implementation registered; callable not found"
            );
            return Ok(false);
        };
        let methods = implementation.methods().to_vec();

        let separator = options.separator.unwrap_or_default();
        let mut descriptor = CallableDescriptor::new(identity, CallableKind::Class, separator)
            .with_methods(methods)
            .with_options(options.methods.clone());
        if let Some(protected) = &options.protected {
            descriptor = descriptor.with_protected(protected.iter().cloned());
        }
        if let Some(file) = include {
            descriptor = descriptor.with_include(file);
        }

        let client_name = format!("{}{}", self.options.class_prefix, descriptor.js_name());
        self.request_factories
            .insert(identity.to_owned(), RequestFactory::new(client_name.clone()));
        self.paginator_factories
            .insert(identity.to_owned(), PaginatorFactory::new(client_name));
        self.descriptors.insert(identity.to_owned(), descriptor);

        debug!(target: REGISTRY_TARGET, identity, "materialized callable");
        Ok(true)
    }

    /// Materializes every registered class and namespace.
    fn materialize_all(&mut self) -> Result<(), RegistryError> {
        let pending_classes: Vec<String> = self
            .class_options
            .keys()
            .filter(|identity| !self.descriptors.contains_key(*identity))
            .cloned()
            .collect();
        for identity in pending_classes {
            if let Some(options) = self.class_options.get(&identity).cloned() {
                self.materialize(&identity, &options)?;
            }
        }

        let pending_namespaces: Vec<(String, NamespaceOptions)> = self
            .namespace_options
            .iter()
            .filter(|(namespace, _)| !self.materialized_namespaces.contains(*namespace))
            .map(|(namespace, options)| (namespace.clone(), options.clone()))
            .collect();
        for (namespace, options) in pending_namespaces {
            self.materialize_namespace(&namespace, &options)?;
        }
        Ok(())
    }

    /// Scans one namespace directory and materializes its classes.
    fn materialize_namespace(
        &mut self,
        namespace: &str,
        options: &NamespaceOptions,
    ) -> Result<(), RegistryError> {
        self.materialized_namespaces.insert(namespace.to_owned());
        self.namespaces.insert(namespace.to_owned(), options.separator);

        let directory = options.directory.clone();
        for entry_result in WalkDir::new(&directory) {
            let file = entry_result
                .map_err(|source| RegistryError::directory_scan(directory.clone(), source))?;
            let Some(stem) = source_file_stem(&file) else {
                continue;
            };

            let class_path = namespace_class_path(namespace, &directory, file.path());
            self.namespaces.insert(class_path.clone(), options.separator);

            let identity = format!("{class_path}.{stem}");
            if !self.descriptors.contains_key(&identity) {
                let class_options = options.class_options(&identity);
                self.materialize(&identity, &class_options)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("classes", &self.class_options.len())
            .field("namespaces", &self.namespace_options.len())
            .field("descriptors", &self.descriptors.len())
            .field("functions", &self.functions.len())
            .finish_non_exhaustive()
    }
}

/// Returns the file stem of a recognised source file entry, or `None` for
/// directories and other file types.
fn source_file_stem(entry: &walkdir::DirEntry) -> Option<String> {
    if !entry.file_type().is_file() {
        return None;
    }
    let path = entry.path();
    if path.extension().and_then(OsStr::to_str) != Some(SOURCE_EXTENSION) {
        return None;
    }
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(ToOwned::to_owned)
}

/// Derives the dotted class path for a file discovered under a namespace:
/// the namespace plus the file's directory path relative to the scan root.
fn namespace_class_path(namespace: &str, directory: &Path, file: &Path) -> String {
    let mut class_path = namespace.to_owned();
    let relative = file
        .parent()
        .and_then(|parent| parent.strip_prefix(directory).ok());
    if let Some(rest) = relative {
        for component in rest.components() {
            if let Component::Normal(part) = component {
                if let Some(text) = part.to_str() {
                    class_path.push('.');
                    class_path.push_str(text);
                }
            }
        }
    }
    class_path
}

/// Builds the template variable bag for one class stub.
fn object_vars(prefix: &str, descriptor: &CallableDescriptor) -> Value {
    let methods: Vec<Value> = descriptor
        .exposed_methods()
        .iter()
        .map(|method| {
            json!({
                "name": method,
                "config": descriptor.method_options(method),
            })
        })
        .collect();
    json!({
        "prefix": prefix,
        "class": descriptor.js_name(),
        "identity": descriptor.identity(),
        "methods": methods,
    })
}

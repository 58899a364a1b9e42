//! Option bags passed when registering callables.
//!
//! Three layers of options exist, merged in increasing priority: defaults
//! attached to a whole directory or namespace, wildcard (`*`) entries, and
//! class-specific entries. Per-method option bags keep a separate wildcard
//! rule: the `*` bag merges under the method-specific bag, with the specific
//! bag winning on key conflicts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::separator::Separator;

/// Wildcard key selecting every method (or every class) of a registration.
pub const WILDCARD_METHOD: &str = "*";

/// Flat option bag attached to a single method (or to the `*` wildcard).
///
/// The keys are opaque to the server; they are forwarded to the client as
/// part of the generated stub configuration.
pub type MethodOptions = BTreeMap<String, serde_json::Value>;

/// Merges a wildcard bag under a method-specific bag.
///
/// Every wildcard key is present in the result; specific keys win on
/// conflict.
#[must_use]
pub fn merge_method_options(wildcard: &MethodOptions, specific: &MethodOptions) -> MethodOptions {
    let mut merged = wildcard.clone();
    for (key, value) in specific {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Options attached to one registered class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassOptions {
    /// Separator used in the client-side identifier.
    #[serde(default)]
    pub separator: Option<Separator>,
    /// Method names withheld from client exposure, in addition to the base
    /// lifecycle methods.
    #[serde(default)]
    pub protected: Option<Vec<String>>,
    /// Source file loaded once before the first invocation.
    #[serde(default)]
    pub include: Option<PathBuf>,
    /// Per-method option bags; the `*` key applies to every method.
    #[serde(default)]
    pub methods: BTreeMap<String, MethodOptions>,
}

impl ClassOptions {
    /// Overlays `other` on top of `self`.
    ///
    /// Fields set in `other` replace the corresponding fields of `self`;
    /// method bags replace wholesale per method name.
    pub fn overlay(&mut self, other: &Self) {
        if other.separator.is_some() {
            self.separator = other.separator;
        }
        if let Some(protected) = &other.protected {
            self.protected = Some(protected.clone());
        }
        if let Some(include) = &other.include {
            self.include = Some(include.clone());
        }
        for (method, bag) in &other.methods {
            self.methods.insert(method.clone(), bag.clone());
        }
    }

    /// Computes the effective option bag for one method.
    ///
    /// The wildcard bag merges under the method-specific bag; specific keys
    /// win on conflict.
    #[must_use]
    pub fn method_options(&self, method: &str) -> MethodOptions {
        let empty = MethodOptions::new();
        let wildcard = self.methods.get(WILDCARD_METHOD).unwrap_or(&empty);
        self.methods
            .get(method)
            .map_or_else(|| wildcard.clone(), |bag| merge_method_options(wildcard, bag))
    }
}

/// Options for a directory registration.
///
/// Every source file discovered under the directory registers one class; the
/// effective options for a class merge, in increasing priority, the
/// directory-wide defaults, the `*` entry of [`DirectoryOptions::classes`],
/// and the class-specific entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryOptions {
    /// Record each discovered file as a lazily loaded include.
    #[serde(default)]
    pub autoload: bool,
    /// Separator default applied to every discovered class.
    #[serde(default)]
    pub separator: Option<Separator>,
    /// Protected-method default applied to every discovered class.
    #[serde(default)]
    pub protected: Option<Vec<String>>,
    /// Per-class overrides; the `*` key applies to every class.
    #[serde(default)]
    pub classes: BTreeMap<String, ClassOptions>,
}

impl DirectoryOptions {
    /// Computes the effective options for a class discovered in this
    /// directory, starting from `base` (which carries the include path when
    /// autoloading).
    #[must_use]
    pub fn class_options(&self, class_name: &str, base: ClassOptions) -> ClassOptions {
        let mut options = base;
        if self.separator.is_some() {
            options.separator = self.separator;
        }
        if let Some(protected) = &self.protected {
            options.protected = Some(protected.clone());
        }
        if let Some(wildcard) = self.classes.get(WILDCARD_METHOD) {
            options.overlay(wildcard);
        }
        if let Some(specific) = self.classes.get(class_name) {
            options.overlay(specific);
        }
        options
    }
}

/// Options for a namespace registration.
///
/// A namespace defers its directory scan until the registry first needs the
/// full registered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceOptions {
    /// Filesystem root scanned for source files.
    pub directory: PathBuf,
    /// Separator used for every class under the namespace.
    #[serde(default)]
    pub separator: Separator,
    /// Protected-method default applied to every class under the namespace.
    #[serde(default)]
    pub protected: Option<Vec<String>>,
    /// Per-class overrides; the `*` key applies to every class.
    #[serde(default)]
    pub classes: BTreeMap<String, ClassOptions>,
}

impl NamespaceOptions {
    /// Creates namespace options for a directory with all defaults.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            separator: Separator::default(),
            protected: None,
            classes: BTreeMap::new(),
        }
    }

    /// Overrides the separator.
    #[must_use]
    pub const fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the protected-method default.
    #[must_use]
    pub fn with_protected(mut self, protected: Vec<String>) -> Self {
        self.protected = Some(protected);
        self
    }

    /// Computes the effective options for a class under this namespace.
    #[must_use]
    pub fn class_options(&self, class_name: &str) -> ClassOptions {
        let mut options = ClassOptions {
            separator: Some(self.separator),
            protected: self.protected.clone(),
            ..ClassOptions::default()
        };
        if let Some(wildcard) = self.classes.get(WILDCARD_METHOD) {
            options.overlay(wildcard);
        }
        if let Some(specific) = self.classes.get(class_name) {
            options.overlay(specific);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(entries: &[(&str, serde_json::Value)]) -> MethodOptions {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn wildcard_merges_under_specific_method_options() {
        let mut options = ClassOptions::default();
        options
            .methods
            .insert(WILDCARD_METHOD.to_owned(), bag(&[("a", json!(1)), ("b", json!(2))]));
        options
            .methods
            .insert("foo".to_owned(), bag(&[("b", json!(3))]));

        let effective = options.method_options("foo");
        assert_eq!(effective.get("a"), Some(&json!(1)));
        assert_eq!(effective.get("b"), Some(&json!(3)));
    }

    #[test]
    fn methods_without_specific_bag_get_the_wildcard_bag() {
        let mut options = ClassOptions::default();
        options
            .methods
            .insert(WILDCARD_METHOD.to_owned(), bag(&[("mode", json!("sync"))]));

        let effective = options.method_options("bar");
        assert_eq!(effective.get("mode"), Some(&json!("sync")));
    }

    #[test]
    fn directory_options_merge_in_increasing_priority() {
        let mut directory = DirectoryOptions {
            autoload: true,
            separator: Some(Separator::Underscore),
            protected: Some(vec!["secret".to_owned()]),
            ..DirectoryOptions::default()
        };
        directory.classes.insert(
            WILDCARD_METHOD.to_owned(),
            ClassOptions {
                protected: Some(vec!["hidden".to_owned()]),
                ..ClassOptions::default()
            },
        );
        directory.classes.insert(
            "Calc".to_owned(),
            ClassOptions {
                separator: Some(Separator::Dot),
                ..ClassOptions::default()
            },
        );

        let effective = directory.class_options("Calc", ClassOptions::default());
        // Class-specific separator wins over the directory default.
        assert_eq!(effective.separator, Some(Separator::Dot));
        // Wildcard protected list replaced the directory default.
        assert_eq!(effective.protected, Some(vec!["hidden".to_owned()]));
    }

    #[test]
    fn namespace_class_options_inherit_separator_and_protected() {
        let namespace = NamespaceOptions::new("/srv/app")
            .with_separator(Separator::Underscore)
            .with_protected(vec!["reset".to_owned()]);
        let effective = namespace.class_options("User");
        assert_eq!(effective.separator, Some(Separator::Underscore));
        assert_eq!(effective.protected, Some(vec!["reset".to_owned()]));
    }

    #[test]
    fn overlay_replaces_method_bags_wholesale() {
        let mut base = ClassOptions::default();
        base.methods
            .insert("foo".to_owned(), bag(&[("a", json!(1)), ("b", json!(2))]));

        let mut overlay = ClassOptions::default();
        overlay.methods.insert("foo".to_owned(), bag(&[("c", json!(3))]));

        base.overlay(&overlay);
        let foo = base.methods.get("foo").expect("foo bag");
        assert!(!foo.contains_key("a"));
        assert_eq!(foo.get("c"), Some(&json!(3)));
    }
}

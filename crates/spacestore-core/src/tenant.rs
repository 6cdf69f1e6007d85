//! API key to tenant directory resolution.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of a tenant's directory under the uploads root.
///
/// Always a single plain path component: no separators, no `.` or `..`,
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantRoot(String);

impl TenantRoot {
    /// Validates a tenant root name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTenantRoot` if the name is not a single
    /// normal path component.
    ///
    /// # Examples
    ///
    /// ```
    /// use spacestore_core::TenantRoot;
    ///
    /// assert!(TenantRoot::new("acme").is_ok());
    /// assert!(TenantRoot::new("../acme").is_err());
    /// ```
    pub fn new(root: impl Into<String>) -> Result<Self, ConfigError> {
        let root = root.into();

        let reason = if root.is_empty() {
            Some("empty")
        } else if root.contains('\0') {
            Some("contains a NUL byte")
        } else if root.contains(['/', '\\']) {
            Some("contains a path separator")
        } else if !matches!(
            Path::new(&root).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        ) {
            Some("not a plain directory name")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigError::InvalidTenantRoot { root, reason }),
            None => Ok(Self(root)),
        }
    }

    /// Returns the tenant root name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns this tenant's directory under `uploads_root`.
    #[must_use]
    pub fn dir_in(&self, uploads_root: &Path) -> PathBuf {
        uploads_root.join(&self.0)
    }
}

impl fmt::Display for TenantRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyFile {
    Wrapped { keys: HashMap<String, String> },
    Flat(HashMap<String, String>),
}

/// Immutable mapping from API key to tenant root.
///
/// Built once at startup and shared read-only. The `Debug` output reports
/// only the number of keys, never the keys themselves.
#[derive(Clone, Default)]
pub struct KeyMap {
    keys: HashMap<String, TenantRoot>,
}

impl KeyMap {
    /// Builds a key map from `(api key, tenant root)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyKey` for an empty key, or
    /// `ConfigError::InvalidTenantRoot` for an invalid root.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let keys = pairs
            .into_iter()
            .map(|(key, root)| {
                let key = key.into();
                if key.is_empty() {
                    return Err(ConfigError::EmptyKey);
                }
                Ok((key, TenantRoot::new(root)?))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self { keys })
    }

    /// Parses a key map from JSON.
    ///
    /// Accepts either a flat object (`{"key": "tenant"}`) or one wrapped
    /// under `keys` (`{"keys": {"key": "tenant"}}`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON, or a validation
    /// error as for [`KeyMap::from_pairs`].
    ///
    /// # Examples
    ///
    /// ```
    /// use spacestore_core::KeyMap;
    ///
    /// let keys = KeyMap::from_json(r#"{"keys": {"k1": "acme"}}"#).unwrap();
    /// assert_eq!(keys.resolve("k1").unwrap().as_str(), "acme");
    /// assert!(keys.resolve("unknown").is_none());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let pairs = match serde_json::from_str::<KeyFile>(json)? {
            KeyFile::Wrapped { keys } | KeyFile::Flat(keys) => keys,
        };
        Self::from_pairs(pairs)
    }

    /// Reads and parses a key file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, otherwise as
    /// for [`KeyMap::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Returns the tenant root for `api_key`, if the key is known.
    #[must_use]
    pub fn resolve(&self, api_key: &str) -> Option<&TenantRoot> {
        self.keys.get(api_key)
    }

    /// Returns the number of configured keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no keys are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for KeyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMap")
            .field("keys", &self.keys.len())
            .finish()
    }
}

impl FromStr for KeyMap {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flat_shape() {
        let keys = KeyMap::from_json(r#"{"k1": "acme", "k2": "globex"}"#).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.resolve("k2").unwrap().as_str(), "globex");
    }

    #[test]
    fn test_wrapped_shape() {
        let keys: KeyMap = r#"{"keys": {"k1": "acme"}}"#.parse().unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.resolve("k1").unwrap().to_string(), "acme");
    }

    #[test]
    fn test_flat_key_named_keys() {
        let keys = KeyMap::from_json(r#"{"keys": "acme"}"#).unwrap();
        assert_eq!(keys.resolve("keys").unwrap().as_str(), "acme");
    }

    #[test]
    fn test_lookup_is_exact() {
        let keys = KeyMap::from_pairs([("Secret", "acme")]).unwrap();
        assert!(keys.resolve("secret").is_none());
        assert!(keys.resolve("Secret ").is_none());
        assert!(keys.resolve("").is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            KeyMap::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            KeyMap::from_json(r#"{"k1": 42}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            KeyMap::from_json(r#"{"": "acme"}"#),
            Err(ConfigError::EmptyKey)
        ));
    }

    #[test]
    fn test_invalid_tenant_roots() {
        for root in ["", ".", "..", "a/b", "a\\b", "/abs", "nul\0"] {
            let result = TenantRoot::new(root);
            assert!(
                matches!(result, Err(ConfigError::InvalidTenantRoot { .. })),
                "accepted tenant root {root:?}"
            );
        }
    }

    #[test]
    fn test_valid_tenant_roots() {
        for root in ["acme", "tenant-01", "a.b", "..hidden"] {
            assert!(TenantRoot::new(root).is_ok(), "rejected {root:?}");
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_keys.json");
        fs::write(&path, r#"{"keys": {"k1": "acme"}}"#).unwrap();

        let keys = KeyMap::load(&path).unwrap();
        assert_eq!(
            keys.resolve("k1").unwrap().dir_in(Path::new("uploads")),
            PathBuf::from("uploads/acme")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = KeyMap::load(temp.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_debug_hides_keys() {
        let keys = KeyMap::from_pairs([("super-secret", "acme")]).unwrap();
        let debug = format!("{keys:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains('1'));
    }
}

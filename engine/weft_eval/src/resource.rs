//! Resource-loader boundary contract.
//!
//! Fetching imported/included template bytes or JSON over file/HTTP is an
//! external collaborator's job. The engine only resolves, loads and reacts:
//! every failure at an `import` / `include` / `loadJSON` / `loadText` call
//! site is caught, logged and degraded to an undefined value - it never
//! aborts the enclosing evaluation.

/// A loaded resource: raw bytes plus the base the loader resolved them
/// under (used as the active base URI while the resource executes).
#[derive(Clone, Debug)]
pub struct Resource {
    pub bytes: Vec<u8>,
    pub base_href: String,
}

/// Load failure from a [`ResourceLoader`].
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("cannot resolve {href:?} against base {base:?}")]
    Unresolvable { href: String, base: Option<String> },
    #[error("unsupported scheme for {href:?}")]
    UnsupportedScheme { href: String },
    #[error("resource {href:?} is missing or unreadable: {reason}")]
    Unreadable { href: String, reason: String },
}

/// Resolves and fetches template resources.
///
/// Implementations must be safe for concurrent use if compiled templates
/// are evaluated from multiple threads; the engine itself holds the loader
/// behind a shared reference and never mutates it.
pub trait ResourceLoader {
    /// Resolve `href` against an optional base to an absolute location.
    fn resolve_full_path(&self, href: &str, base: Option<&str>)
        -> Result<String, ResourceError>;

    /// Resolve and fetch a resource.
    fn load(&self, href: &str, base: Option<&str>) -> Result<Resource, ResourceError>;
}

/// Loader that refuses every request.
///
/// The default wiring and the optimizer's pre-evaluation sandbox use this:
/// a template that is provably safe never loads resources, and one that
/// tries anyway degrades to undefined output like any other load failure.
#[derive(Clone, Copy, Default, Debug)]
pub struct NullResourceLoader;

impl ResourceLoader for NullResourceLoader {
    fn resolve_full_path(
        &self,
        href: &str,
        base: Option<&str>,
    ) -> Result<String, ResourceError> {
        Err(ResourceError::Unresolvable {
            href: href.to_string(),
            base: base.map(str::to_string),
        })
    }

    fn load(&self, href: &str, _base: Option<&str>) -> Result<Resource, ResourceError> {
        Err(ResourceError::Unreadable {
            href: href.to_string(),
            reason: "resource loading is disabled".to_string(),
        })
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the immediate superclass of a bound class comes from.
///
/// Ownership of the backing handle, teardown and the super-chaining
/// initializer is decided only by this value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BaseKind {
    /// A native type not produced by this generator (e.g. `NSObject`).
    /// The class is the root of a generated hierarchy.
    #[default]
    Foreign,
    /// Another class produced by this generator, which already owns the
    /// backing handle and lifecycle methods.
    Generated,
}

/// Description of one managed class to bind (`*.class.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassDescriptor {
    /// Native class identifier
    pub name: String,

    /// Managed namespace (empty for the global namespace)
    #[serde(default)]
    pub namespace: String,

    /// Managed type name, without namespace
    #[serde(default)]
    pub managed_name: String,

    /// Assembly-qualified managed name, used in documentation only
    #[serde(default)]
    pub assembly_qualified_name: String,

    /// Assembly that must be loaded before the class can be resolved
    pub assembly_name: String,

    /// Native identifier of the immediate superclass
    pub base_type_name: String,

    /// Whether `base_type_name` is another generated class
    #[serde(default)]
    pub base_kind: BaseKind,

    /// Static classes carry no instance state and are never instantiated
    #[serde(default)]
    pub is_static: bool,

    /// Type-definition token of the class inside its assembly
    #[serde(default)]
    pub metadata_token: i64,

    /// Protocols the class conforms to, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    /// The class has no managed counterpart
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,

    /// Whether instances may be created with `-init`
    #[serde(default = "default_true")]
    pub has_default_constructor: bool,
}

fn default_true() -> bool {
    true
}

impl ClassDescriptor {
    /// Create a descriptor for a hierarchy root deriving from a foreign base.
    pub fn new(
        name: impl Into<String>,
        assembly_name: impl Into<String>,
        base_type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            managed_name: String::new(),
            assembly_qualified_name: String::new(),
            assembly_name: assembly_name.into(),
            base_type_name: base_type_name.into(),
            base_kind: BaseKind::Foreign,
            is_static: false,
            metadata_token: 0,
            protocols: Vec::new(),
            synthetic: false,
            has_default_constructor: true,
        }
    }

    /// Set the managed identity (namespace, type name, assembly-qualified name).
    pub fn with_managed(
        mut self,
        namespace: impl Into<String>,
        managed_name: impl Into<String>,
        assembly_qualified_name: impl Into<String>,
    ) -> Self {
        self.namespace = namespace.into();
        self.managed_name = managed_name.into();
        self.assembly_qualified_name = assembly_qualified_name.into();
        self
    }

    pub fn with_base_kind(mut self, base_kind: BaseKind) -> Self {
        self.base_kind = base_kind;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_token(mut self, token: i64) -> Self {
        self.metadata_token = token;
        self
    }

    pub fn with_protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols = protocols.into_iter().map(Into::into).collect();
        self
    }

    /// True when the immediate superclass is another generated class.
    pub fn base_is_generated(&self) -> bool {
        self.base_kind == BaseKind::Generated
    }

    /// True when this class declares the backing-handle field and releases it.
    ///
    /// Only non-static hierarchy roots own the handle; generated subclasses
    /// inherit it.
    pub fn owns_backing_handle(&self) -> bool {
        !self.is_static && !self.base_is_generated()
    }

    /// True when instance machinery (accessor, super-chaining initializer)
    /// is emitted at all.
    pub fn has_instances(&self) -> bool {
        !self.is_static
    }
}

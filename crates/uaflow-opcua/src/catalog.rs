// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! DataType catalog.
//!
//! Callers refer to DataTypes in several ways: by name (`"UInt32"`), by
//! numeric type id (`7`), by NodeId text (`"ns=0;i=7"`), or with an already
//! resolved [`OpcUaDataType`]. A [`DataTypeCatalog`] normalizes every form
//! to the closed enum once, so the codec and extractor only ever match on
//! `OpcUaDataType`.
//!
//! The catalog is injected as `Arc<dyn DataTypeCatalog>`; [`BuiltinCatalog`]
//! covers the OPC UA built-in types.
//!
//! # Examples
//!
//! ```
//! use uaflow_opcua::catalog::{BuiltinCatalog, DataTypeCatalog, DataTypeRef};
//! use uaflow_opcua::types::OpcUaDataType;
//!
//! let catalog = BuiltinCatalog;
//! assert_eq!(catalog.resolve(&"ns=0;i=7".into()), Some(OpcUaDataType::UInt32));
//! assert_eq!(catalog.resolve(&DataTypeRef::Id(1)), Some(OpcUaDataType::Boolean));
//! assert_eq!(catalog.resolve(&"Quantum".into()), None);
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::types::{NodeId, OpcUaDataType};

// =============================================================================
// DataTypeRef
// =============================================================================

/// A DataType reference in any accepted form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataTypeRef {
    /// A name or NodeId string.
    Name(String),
    /// A numeric type id.
    Id(u32),
    /// An already resolved DataType.
    Resolved(OpcUaDataType),
}

impl DataTypeRef {
    /// Reads a reference from a JSON value (string or non-negative integer).
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Name(s.clone())),
            Value::Number(n) => n.as_u64().and_then(|id| u32::try_from(id).ok()).map(Self::Id),
            _ => None,
        }
    }

    /// Returns `true` for references that can never resolve: empty names
    /// and the null type id `0`.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Name(s) => s.trim().is_empty(),
            Self::Id(id) => *id == 0,
            Self::Resolved(_) => false,
        }
    }
}

impl fmt::Display for DataTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(s) => write!(f, "{}", s),
            Self::Id(id) => write!(f, "ns=0;i={}", id),
            Self::Resolved(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<&str> for DataTypeRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for DataTypeRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<&String> for DataTypeRef {
    fn from(value: &String) -> Self {
        Self::Name(value.clone())
    }
}

impl From<u32> for DataTypeRef {
    fn from(value: u32) -> Self {
        Self::Id(value)
    }
}

impl From<OpcUaDataType> for DataTypeRef {
    fn from(value: OpcUaDataType) -> Self {
        Self::Resolved(value)
    }
}

// =============================================================================
// DataTypeCatalog
// =============================================================================

/// Lookup of DataTypes by name and by type id.
pub trait DataTypeCatalog: Send + Sync + fmt::Debug {
    /// Looks up a DataType by name.
    fn by_name(&self, name: &str) -> Option<OpcUaDataType>;

    /// Looks up a DataType by its namespace-0 type id.
    fn by_id(&self, id: u32) -> Option<OpcUaDataType>;

    /// Resolves any reference form to a DataType.
    ///
    /// Names that parse as a namespace-0 numeric NodeId (`ns=0;i=7`, `i=7`)
    /// and plain decimal strings are looked up by id.
    fn resolve(&self, reference: &DataTypeRef) -> Option<OpcUaDataType> {
        if reference.is_null() {
            return None;
        }
        match reference {
            DataTypeRef::Resolved(dt) => Some(*dt),
            DataTypeRef::Id(id) => self.by_id(*id),
            DataTypeRef::Name(name) => {
                let name = name.trim();
                if let Ok(id) = name.parse::<u32>() {
                    return self.by_id(id);
                }
                if let Ok(node_id) = name.parse::<NodeId>() {
                    return match (node_id.namespace_index, node_id.as_numeric()) {
                        (0, Some(id)) => self.by_id(id),
                        _ => None,
                    };
                }
                self.by_name(name)
            }
        }
    }
}

/// Catalog of the OPC UA built-in DataTypes.
///
/// Name lookup ignores ASCII case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    /// Returns the catalog as a shared trait object.
    pub fn shared() -> Arc<dyn DataTypeCatalog> {
        Arc::new(Self)
    }
}

impl DataTypeCatalog for BuiltinCatalog {
    fn by_name(&self, name: &str) -> Option<OpcUaDataType> {
        name.parse().ok()
    }

    fn by_id(&self, id: u32) -> Option<OpcUaDataType> {
        OpcUaDataType::from_type_id(id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_forms_resolve_identically() {
        let catalog = BuiltinCatalog;
        let forms: [DataTypeRef; 6] = [
            "UInt32".into(),
            "uint32".into(),
            "ns=0;i=7".into(),
            "i=7".into(),
            7u32.into(),
            OpcUaDataType::UInt32.into(),
        ];
        for form in &forms {
            assert_eq!(catalog.resolve(form), Some(OpcUaDataType::UInt32), "{form}");
        }
    }

    #[test]
    fn test_null_and_unknown_references() {
        let catalog = BuiltinCatalog;
        assert_eq!(catalog.resolve(&"".into()), None);
        assert_eq!(catalog.resolve(&0u32.into()), None);
        assert_eq!(catalog.resolve(&"ns=2;i=7".into()), None);
        assert_eq!(catalog.resolve(&"ns=0;s=UInt32".into()), None);
        assert_eq!(catalog.resolve(&"Quantum".into()), None);
    }

    #[test]
    fn test_node_id_type() {
        let catalog = BuiltinCatalog;
        assert_eq!(catalog.resolve(&"NodeIdType".into()), Some(OpcUaDataType::NodeIdType));
        assert_eq!(catalog.resolve(&256u32.into()), Some(OpcUaDataType::NodeIdType));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(DataTypeRef::from_json(&json!("Double")), Some("Double".into()));
        assert_eq!(DataTypeRef::from_json(&json!(11)), Some(DataTypeRef::Id(11)));
        assert_eq!(DataTypeRef::from_json(&json!(-1)), None);
        assert_eq!(DataTypeRef::from_json(&json!(null)), None);
    }

    #[test]
    fn test_shared_catalog_is_object_safe() {
        let catalog = BuiltinCatalog::shared();
        assert_eq!(catalog.by_id(11), Some(OpcUaDataType::Double));
    }
}

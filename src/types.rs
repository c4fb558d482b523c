//! Wire types shared by the client operations.
//!
//! The service speaks camelCase JSON and encodes enum-like fields as plain
//! strings; the types here carry the serde renames and the string-to-enum
//! validation so individual operations do not have to.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path portion of an identifier: the asset path within a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRef {
    pub path: String,
    pub site_name: String,
}

/// Addresses one remote asset by type and site-scoped path.
///
/// Identifiers returned by the service may also carry the server-assigned
/// `id`; identifiers built locally omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub path: PathRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Identifier {
    pub fn new(
        path: impl Into<String>,
        asset_type: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            asset_type: asset_type.into(),
            path: PathRef {
                path: path.into(),
                site_name: site_name.into(),
            },
            id: None,
        }
    }
}

/// Result of probing whether an asset exists.
///
/// `Undetermined` means the read failed for a reason other than the service
/// reporting "no such asset", so absence cannot be concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetExistence {
    Exists,
    Missing,
    Undetermined,
}

/// Parameters for copying an asset into a destination container.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// Path of the source asset.
    pub from_path: String,
    /// Type of the source asset. Also determines the destination container
    /// type via [`container_type`].
    pub source_type: String,
    /// Path of the destination container.
    pub to_container_path: String,
    /// Destination site. Defaults to the client's site when `None` or empty.
    pub to_site_name: Option<String>,
    /// Name for the copy. Defaults to the source asset's name when `None`
    /// or empty.
    pub new_name: Option<String>,
    /// Whether the copy should go through workflow.
    pub do_workflow: bool,
}

impl CopyRequest {
    pub fn new(
        from_path: impl Into<String>,
        source_type: impl Into<String>,
        to_container_path: impl Into<String>,
    ) -> Self {
        Self {
            from_path: from_path.into(),
            source_type: source_type.into(),
            to_container_path: to_container_path.into(),
            to_site_name: None,
            new_name: None,
            do_workflow: false,
        }
    }
}

/// One entry in a batch read: the path and type of an asset to fetch.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub path: String,
    pub asset_type: String,
}

impl ReadRequest {
    pub fn new(path: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            asset_type: asset_type.into(),
        }
    }
}

/// Overall access level applied to everyone (`allLevel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    None,
    Read,
    Write,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            other => Err(ClientError::InvalidRequest(format!(
                "allLevel value not supported. It must be one of 'none', 'read', or 'write'. {} is provided.",
                other
            ))),
        }
    }
}

/// Access level of a single ACL entry. Unlike [`AccessLevel`], `none` is not
/// a valid entry level; entries are removed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclEntryLevel {
    Read,
    Write,
}

impl FromStr for AclEntryLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            other => Err(ClientError::InvalidRequest(format!(
                "aclEntry level value not supported. It must be one of 'write', 'read'. {} is provided.",
                other
            ))),
        }
    }
}

/// Principal kind an ACL entry grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclEntryType {
    User,
    Group,
}

impl FromStr for AclEntryType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            other => Err(ClientError::InvalidRequest(format!(
                "aclEntry type value not supported. It must be one of 'user', 'group'. {} is provided.",
                other
            ))),
        }
    }
}

/// One access-control entry: a user or group and its level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AclEntryType,
    pub level: AclEntryLevel,
}

impl AclEntry {
    pub fn user(name: impl Into<String>, level: AclEntryLevel) -> Self {
        Self {
            name: name.into(),
            kind: AclEntryType::User,
            level,
        }
    }

    pub fn group(name: impl Into<String>, level: AclEntryLevel) -> Self {
        Self {
            name: name.into(),
            kind: AclEntryType::Group,
            level,
        }
    }
}

/// Asset types stored in plain folders.
const FOLDERED_TYPES: &[&str] = &[
    "page", "file", "folder", "format", "symlink", "template", "block",
];

/// Asset types stored in a dedicated `<type>container`.
const CONTAINERED_TYPES: &[&str] = &[
    "metadataset",
    "pageconfigurationset",
    "datadefinition",
    "sharedfield",
    "contenttype",
    "assetfactory",
];

/// Container types, which contain their own kind.
const CONTAINER_TYPES: &[&str] = &[
    "metadatasetcontainer",
    "pageconfigurationsetcontainer",
    "datadefinitioncontainer",
    "sharedfieldcontainer",
    "contenttypecontainer",
    "assetfactorycontainer",
];

/// Maps an asset type to the type of container that holds it.
pub fn container_type(asset_type: &str) -> ClientResult<String> {
    if FOLDERED_TYPES.contains(&asset_type) {
        Ok("folder".to_string())
    } else if CONTAINERED_TYPES.contains(&asset_type) {
        Ok(format!("{}container", asset_type))
    } else if CONTAINER_TYPES.contains(&asset_type) {
        Ok(asset_type.to_string())
    } else {
        Err(ClientError::UnsupportedContainerType(
            asset_type.to_string(),
        ))
    }
}

/// The service returns one-element collections as a bare object rather than
/// a one-element array. Normalizes both shapes into a `Vec`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_wire_shape() {
        let identifier = Identifier::new("about/index", "page", "my-site");
        let value = serde_json::to_value(&identifier).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "page",
                "path": {"path": "about/index", "siteName": "my-site"}
            })
        );
    }

    #[test]
    fn test_identifier_deserializes_server_id() {
        let identifier: Identifier = serde_json::from_value(json!({
            "type": "page",
            "path": {"path": "about/index", "siteName": "my-site"},
            "id": "a1b2c3"
        }))
        .unwrap();
        assert_eq!(identifier.id.as_deref(), Some("a1b2c3"));
    }

    #[test]
    fn test_foldered_types_map_to_folder() {
        for asset_type in ["page", "file", "folder", "format", "symlink", "template", "block"] {
            assert_eq!(container_type(asset_type).unwrap(), "folder");
        }
    }

    #[test]
    fn test_containered_types_get_container_suffix() {
        assert_eq!(
            container_type("metadataset").unwrap(),
            "metadatasetcontainer"
        );
        assert_eq!(
            container_type("datadefinition").unwrap(),
            "datadefinitioncontainer"
        );
    }

    #[test]
    fn test_container_types_map_to_themselves() {
        assert_eq!(
            container_type("contenttypecontainer").unwrap(),
            "contenttypecontainer"
        );
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let err = container_type("site").unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedContainerType(t) if t == "site"));
    }

    #[test]
    fn test_access_level_parse() {
        assert_eq!("none".parse::<AccessLevel>().unwrap(), AccessLevel::None);
        assert_eq!("read".parse::<AccessLevel>().unwrap(), AccessLevel::Read);
        assert_eq!("write".parse::<AccessLevel>().unwrap(), AccessLevel::Write);

        let err = "all".parse::<AccessLevel>().unwrap_err();
        assert!(err.to_string().contains("'none', 'read', or 'write'"));
        assert!(err.to_string().contains("all is provided"));
    }

    #[test]
    fn test_acl_entry_level_rejects_none() {
        assert!("none".parse::<AclEntryLevel>().is_err());
        assert_eq!(
            "write".parse::<AclEntryLevel>().unwrap(),
            AclEntryLevel::Write
        );
    }

    #[test]
    fn test_acl_entry_type_parse() {
        assert_eq!("user".parse::<AclEntryType>().unwrap(), AclEntryType::User);
        assert!("role".parse::<AclEntryType>().is_err());
    }

    #[test]
    fn test_acl_entry_wire_shape() {
        let entry = AclEntry::group("editors", AclEntryLevel::Write);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({"name": "editors", "type": "group", "level": "write"})
        );
    }

    #[test]
    fn test_one_or_many_normalization() {
        let single: OneOrMany<Identifier> = serde_json::from_value(json!({
            "type": "page",
            "path": {"path": "a", "siteName": "s"}
        }))
        .unwrap();
        assert_eq!(single.into_vec().len(), 1);

        let many: OneOrMany<Identifier> = serde_json::from_value(json!([
            {"type": "page", "path": {"path": "a", "siteName": "s"}},
            {"type": "page", "path": {"path": "b", "siteName": "s"}}
        ]))
        .unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }
}

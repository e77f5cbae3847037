//! Entity structs shared by every store implementation.
//!
//! These types mirror what the store persists. They are plain data: identity
//! and parent links are opaque [`EntityId`]s, and nothing here talks to a
//! store directly.

use derive_more::Display;
use time::UtcDateTime;

/// Opaque identifier assigned by the entity store.
///
/// Stores are free to use whatever scheme they like (UUIDs, integers as
/// strings); this crate only ever compares identifiers for equality.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);
impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A hierarchical container (shot or asset location) in the project.
///
/// Folders are addressed by their full path, compared as an opaque
/// case-sensitive string (`"seq01/sh010"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntity {
    pub id: EntityId,
    pub path: String,
}
impl FolderEntity {
    pub fn new(id: impl Into<EntityId>, path: impl Into<String>) -> Self {
        Self { id: id.into(), path: path.into() }
    }
}

/// A named, versioned deliverable type produced for one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntity {
    pub id: EntityId,
    pub folder_id: EntityId,
    pub name: String,
}
impl ProductEntity {
    pub fn new(id: impl Into<EntityId>, folder_id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folder_id: folder_id.into(),
            name: name.into(),
        }
    }
}

/// An immutable snapshot of a product at a point in time.
///
/// Versions are ordered by `number`; "latest" always means the highest
/// number the store knows about for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntity {
    pub id: EntityId,
    pub product_id: EntityId,
    pub number: i64,
    pub created_at: UtcDateTime,
}
impl VersionEntity {
    pub fn new(id: impl Into<EntityId>, product_id: impl Into<EntityId>, number: i64) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            number,
            created_at: UtcDateTime::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: UtcDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A concrete file variant of a version.
///
/// The `context` carries everything a path template needs to turn this
/// descriptor into a filesystem location; the store persists it alongside
/// the representation so resolution never needs extra lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentationEntity {
    pub id: EntityId,
    pub version_id: EntityId,
    pub name: String,
    pub context: RepresentationContext,
}
impl RepresentationEntity {
    pub fn new(
        id: impl Into<EntityId>,
        version_id: impl Into<EntityId>,
        name: impl Into<String>,
        context: RepresentationContext,
    ) -> Self {
        Self {
            id: id.into(),
            version_id: version_id.into(),
            name: name.into(),
            context,
        }
    }
}

/// Template variables captured when a representation was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentationContext {
    /// Short folder name (last path segment), not the full path.
    pub folder: String,
    pub product: String,
    pub version: i64,
    /// File stem of the published representation.
    pub representation: String,
    /// File extension without the leading dot.
    pub ext: String,
}
impl RepresentationContext {
    pub fn new(
        folder: impl Into<String>,
        product: impl Into<String>,
        version: i64,
        representation: impl Into<String>,
        ext: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into(),
            product: product.into(),
            version,
            representation: representation.into(),
            ext: ext.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", "abc", true)]
    #[case("abc", "ABC", false)]
    #[case("f1", "f01", false)]
    fn test_entity_id_compares_as_opaque_string(#[case] left: &str, #[case] right: &str, #[case] equal: bool) {
        assert_eq!(EntityId::from(left) == EntityId::from(right), equal);
        assert_eq!(EntityId::from(left) == EntityId::new(right.to_string()), equal);
    }
}

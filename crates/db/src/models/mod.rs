mod facet;
mod folder;
mod product;
mod representation;
mod version;

pub(crate) use self::folder::FolderRow;
pub(crate) use self::product::ProductRow;
pub(crate) use self::representation::RepresentationRow;
pub(crate) use self::version::VersionRow;

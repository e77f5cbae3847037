use slate_entity::FolderEntity;

#[derive(sqlx::FromRow)]
pub(crate) struct FolderRow {
    pub(crate) id: String,
    pub(crate) path: String,
}
impl From<&FolderEntity> for FolderRow {
    fn from(folder: &FolderEntity) -> Self {
        Self {
            id: folder.id.as_str().to_string(),
            path: folder.path.clone(),
        }
    }
}
impl From<FolderRow> for FolderEntity {
    fn from(row: FolderRow) -> Self {
        Self::new(row.id, row.path)
    }
}

use slate_entity::ProductEntity;

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: String,
    pub(crate) folder_id: String,
    pub(crate) name: String,
}
impl From<&ProductEntity> for ProductRow {
    fn from(product: &ProductEntity) -> Self {
        Self {
            id: product.id.as_str().to_string(),
            folder_id: product.folder_id.as_str().to_string(),
            name: product.name.clone(),
        }
    }
}
impl From<ProductRow> for ProductEntity {
    fn from(row: ProductRow) -> Self {
        Self::new(row.id, row.folder_id, row.name)
    }
}

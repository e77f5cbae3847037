use slate_entity::RepresentationContext;

/// JSON shape of the `representations.context` column.
///
/// Kept separate from [`RepresentationContext`] so the stored format can
/// abbreviate or reorder fields without touching the entity type.
#[derive(facet::Facet)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct ContextProxy {
    folder: String,
    product: String,
    version: i64,
    representation: String,
    ext: String,
}
impl From<&RepresentationContext> for ContextProxy {
    fn from(ctx: &RepresentationContext) -> Self {
        Self {
            folder: ctx.folder.clone(),
            product: ctx.product.clone(),
            version: ctx.version,
            representation: ctx.representation.clone(),
            ext: ctx.ext.clone(),
        }
    }
}
impl From<ContextProxy> for RepresentationContext {
    fn from(proxy: ContextProxy) -> Self {
        Self {
            folder: proxy.folder,
            product: proxy.product,
            version: proxy.version,
            representation: proxy.representation,
            ext: proxy.ext,
        }
    }
}

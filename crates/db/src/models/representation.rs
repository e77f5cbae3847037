use crate::error::{Error, ErrorKind};
use crate::models::facet::ContextProxy;
use exn::ResultExt;
use facet_json::{from_str as from_json, to_string as to_json};
use slate_entity::{RepresentationContext, RepresentationEntity};

#[derive(sqlx::FromRow)]
pub(crate) struct RepresentationRow {
    pub(crate) id: String,
    pub(crate) version_id: String,
    pub(crate) name: String,
    pub(crate) context: String,
}
impl TryFrom<&RepresentationEntity> for RepresentationRow {
    type Error = Error;
    fn try_from(repre: &RepresentationEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: repre.id.as_str().to_string(),
            version_id: repre.version_id.as_str().to_string(),
            name: repre.name.clone(),
            context: to_json(&ContextProxy::from(&repre.context)).or_raise(|| ErrorKind::InvalidData("context"))?,
        })
    }
}
impl TryFrom<RepresentationRow> for RepresentationEntity {
    type Error = Error;
    fn try_from(row: RepresentationRow) -> Result<Self, Self::Error> {
        let context = from_json::<ContextProxy>(&row.context).or_raise(|| ErrorKind::InvalidData("context"))?;
        Ok(Self::new(row.id, row.version_id, row.name, RepresentationContext::from(context)))
    }
}

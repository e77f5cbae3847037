use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use slate_entity::VersionEntity;
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct VersionRow {
    pub(crate) id: String,
    pub(crate) product_id: String,
    pub(crate) number: i64,
    pub(crate) created_at: i64,
}
impl From<&VersionEntity> for VersionRow {
    fn from(version: &VersionEntity) -> Self {
        Self {
            id: version.id.as_str().to_string(),
            product_id: version.product_id.as_str().to_string(),
            number: version.number,
            created_at: version.created_at.unix_timestamp(),
        }
    }
}
impl TryFrom<VersionRow> for VersionEntity {
    type Error = Error;
    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let created_at =
            UtcDateTime::from_unix_timestamp(row.created_at).or_raise(|| ErrorKind::InvalidData("creation date"))?;
        Ok(Self::new(row.id, row.product_id, row.number).with_created_at(created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_round_trip() {
        let created = UtcDateTime::now().replace_nanosecond(0).unwrap();
        let version = VersionEntity::new("v1", "p1", 7).with_created_at(created);
        let row = VersionRow::from(&version);
        let back = VersionEntity::try_from(row).unwrap();
        // Unix timestamps are whole seconds; nanoseconds never survive.
        assert_eq!(back, version);
    }

    #[test]
    fn test_out_of_range_timestamp_is_rejected() {
        let row = VersionRow {
            id: "v1".to_string(),
            product_id: "p1".to_string(),
            number: 1,
            created_at: i64::MAX,
        };
        let err = VersionEntity::try_from(row).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData("creation date")));
    }
}

use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use std::sync::Arc;

use crate::constants::*;

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;

/// Generates the next val for a given sequence id.
/// The sequence document is created on first use.
pub async fn get_seq_nxt_val(seq_id: &str, db: &Arc<AppDatabase>) -> anyhow::Result<u32> {
    let filter = doc! {"_id": seq_id};
    let update = doc! {"$inc": {"val": 1}};
    let options = FindOneAndUpdateOptions::builder()
        .upsert(Some(true))
        .return_document(Some(ReturnDocument::After))
        .build();
    let result = db
        .find_one_and_update::<Document>(DB_NAME, COLL_SEQUENCES, filter, update, Some(options))
        .await?
        .ok_or(anyhow::anyhow!("Not able to get next sequence value for {seq_id}"))?;
    let val = match result.get("val") {
        Some(Bson::Int32(val)) => *val as i64,
        Some(Bson::Int64(val)) => *val,
        other => {
            let err = anyhow::anyhow!("Unexpected sequence value {other:?} for {seq_id}");
            return Err(err);
        }
    };
    // sequence values start from 1
    match u32::try_from(val) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err(anyhow::anyhow!("Invalid sequence value received: {val} for {seq_id}")),
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{eq, function};

    use super::*;

    fn upsert_after(options: &Option<FindOneAndUpdateOptions>) -> bool {
        options
            .as_ref()
            .map(|option| {
                matches!(option.return_document, Some(ReturnDocument::After))
                    && option.upsert == Some(true)
            })
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_get_seq_nxt_val() {
        let seq_id = "TEST_SEQ_ID";
        let filter = doc! {"_id": seq_id};
        let update = doc! {"$inc": {"val": 1}};
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one_and_update::<Document>()
            .with(
                eq(DB_NAME),
                eq(COLL_SEQUENCES),
                eq(filter),
                eq(update),
                function(upsert_after),
            )
            .times(1)
            .returning(|_, _, _, _, _| Ok(Some(doc! {"val": 5})));
        let db = Arc::new(mock_db);
        let result = get_seq_nxt_val(seq_id, &db).await.unwrap();
        assert_eq!(result, 5);
    }

    #[tokio::test]
    async fn test_get_seq_nxt_val_accepts_int64() {
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one_and_update::<Document>()
            .times(1)
            .returning(|_, _, _, _, _| Ok(Some(doc! {"val": 7_i64})));
        let db = Arc::new(mock_db);
        assert_eq!(get_seq_nxt_val(VILLAGER_ID_SEQ, &db).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_get_seq_nxt_val_rejects_non_positive() {
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one_and_update::<Document>()
            .times(1)
            .returning(|_, _, _, _, _| Ok(Some(doc! {"val": 0})));
        let db = Arc::new(mock_db);
        assert!(get_seq_nxt_val(VILLAGER_ID_SEQ, &db).await.is_err());
    }
}

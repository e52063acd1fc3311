use mongodb::bson::{doc, Document};
use std::sync::Arc;

use crate::{constants::*, models::Villager, utils::AppError};

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;

/// Fetch the villager matching `filter` and make sure the record is active
pub async fn active_villager(
    db: &Arc<AppDatabase>,
    filter: Document,
    not_found: &str,
) -> Result<Villager, AppError> {
    let villager = db
        .find_one::<Villager>(DB_NAME, COLL_VILLAGERS, Some(filter), None)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found.to_owned()))?;
    if !villager.is_active {
        let err = AppError::Auth("Villager account is inactive".into());
        return Err(err);
    }
    Ok(villager)
}

pub async fn villager_by_id(db: &Arc<AppDatabase>, id: u32) -> Result<Villager, AppError> {
    db.find_one::<Villager>(DB_NAME, COLL_VILLAGERS, Some(doc! {"id": id}), None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Villager not found with id: {id}")))
}

// check that no other villager uses the given value for `field`
async fn check_uniq(
    db: &Arc<AppDatabase>,
    field: &str,
    label: &str,
    value: &str,
    exclude_id: Option<u32>,
) -> Result<(), AppError> {
    let mut filter = Document::new();
    filter.insert(field, value);
    if let Some(id) = exclude_id {
        filter.insert("id", doc! {"$ne": id});
    }
    let result = db
        .find_one::<Document>(DB_NAME, COLL_VILLAGERS, Some(filter), None)
        .await?;
    if result.is_some() {
        let err = format!("Villager already exists with same {label}: {value}");
        return Err(AppError::Conflict(err));
    }
    Ok(())
}

pub async fn check_uniq_phone(
    db: &Arc<AppDatabase>,
    phone: &str,
    exclude_id: Option<u32>,
) -> Result<(), AppError> {
    check_uniq(db, "phone", "phone", phone, exclude_id).await
}

pub async fn check_uniq_aadhaar(
    db: &Arc<AppDatabase>,
    aadhaar: &str,
    exclude_id: Option<u32>,
) -> Result<(), AppError> {
    check_uniq(db, "aadhaar", "Aadhaar", aadhaar, exclude_id).await
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{eq, function};
    use mongodb::options::FindOneOptions;

    use super::*;
    use crate::state::test_support::sample_villager;

    fn no_options(options: &Option<FindOneOptions>) -> bool {
        options.is_none()
    }

    #[tokio::test]
    async fn test_check_uniq_phone() {
        let phone = "9876543210";
        let filter = Some(doc! {"phone": phone});
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one::<Document>()
            .with(eq(DB_NAME), eq(COLL_VILLAGERS), eq(filter), function(no_options))
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        let db = Arc::new(mock_db);
        check_uniq_phone(&db, phone, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_uniq_aadhaar_exists() {
        let aadhaar = "123412341234";
        let filter = Some(doc! {"aadhaar": aadhaar, "id": {"$ne": 7}});
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one::<Document>()
            .with(eq(DB_NAME), eq(COLL_VILLAGERS), eq(filter), function(no_options))
            .times(1)
            .returning(|_, _, _, _| Ok(Some(doc! {"id": 1})));
        let db = Arc::new(mock_db);
        let result = check_uniq_aadhaar(&db, aadhaar, Some(7)).await;
        let msg = format!("Villager already exists with same Aadhaar: {}", aadhaar);
        if let Err(AppError::Conflict(err)) = result {
            assert_eq!(err, msg);
        } else {
            panic!("AppError::Conflict should be received");
        }
    }

    #[tokio::test]
    async fn test_active_villager_rejects_inactive() {
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one::<Villager>()
            .times(1)
            .returning(|_, _, _, _| {
                let mut villager = sample_villager(3);
                villager.is_active = false;
                Ok(Some(villager))
            });
        let db = Arc::new(mock_db);
        let filter = doc! {"phone": "9876543210"};
        let result = active_villager(&db, filter, "not registered").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_villager_by_id_not_found() {
        let mut mock_db = AppDatabase::default();
        mock_db
            .expect_find_one::<Villager>()
            .with(
                eq(DB_NAME),
                eq(COLL_VILLAGERS),
                eq(Some(doc! {"id": 11})),
                function(no_options),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        let db = Arc::new(mock_db);
        let result = villager_by_id(&db, 11).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

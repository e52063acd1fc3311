use futures::stream::StreamExt;
use mongodb::bson::Document;
use mongodb::error::Result as MongoResult;
use mongodb::options::{
    ClientOptions, CountOptions, DeleteOptions, FindOneAndUpdateOptions, FindOneOptions,
    FindOptions, InsertOneOptions, UpdateOptions,
};
use mongodb::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::{config::AppConfig, constants::*};

#[cfg(test)]
use mockall::automock;

/// Thin wrapper over the mongodb client used for both the record store
/// and the telemetry store, the database name selects which one
pub struct AppDatabase(Client);

#[cfg_attr(test, automock)]
impl AppDatabase {
    pub async fn new(config: &AppConfig) -> MongoResult<Self> {
        let timeout = Duration::from_secs(MONGO_CONN_TIMEOUT);
        // create the mongodb client options
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_owned());
        client_options.max_pool_size = Some(config.mongodb_max_pool_size);
        client_options.min_pool_size = Some(config.mongodb_min_pool_size);
        client_options.connect_timeout = Some(timeout);
        client_options.server_selection_timeout = Some(timeout);
        // the client connects lazily on the first operation
        let client = Client::with_options(client_options)?;
        Ok(Self(client))
    }

    pub async fn find_one<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOneOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one(filter, options).await
    }

    pub async fn find<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOptions>,
    ) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        let mut cursor = coll.find(filter, options).await?;
        let mut data = vec![];
        while let Some(doc) = cursor.next().await {
            data.push(doc?);
        }
        Ok(data)
    }

    pub async fn insert_one<T>(
        &self,
        db: &str,
        coll: &str,
        doc: &T,
        options: Option<InsertOneOptions>,
    ) -> MongoResult<()>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.insert_one(doc, options).await?;
        Ok(())
    }

    /// Returns the number of matched documents
    pub async fn update_one(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> MongoResult<u64> {
        let coll = self.0.database(db).collection::<Document>(coll);
        let result = coll.update_one(filter, update, options).await?;
        Ok(result.matched_count)
    }

    /// Returns the number of modified documents
    pub async fn update_many(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> MongoResult<u64> {
        let coll = self.0.database(db).collection::<Document>(coll);
        let result = coll.update_many(filter, update, options).await?;
        Ok(result.modified_count)
    }

    pub async fn find_one_and_update<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<FindOneAndUpdateOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one_and_update(filter, update, options).await
    }

    /// Returns the number of deleted documents
    pub async fn delete_one(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        options: Option<DeleteOptions>,
    ) -> MongoResult<u64> {
        let coll = self.0.database(db).collection::<Document>(coll);
        let result = coll.delete_one(filter, options).await?;
        Ok(result.deleted_count)
    }

    pub async fn count_documents(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<CountOptions>,
    ) -> MongoResult<u64> {
        let coll = self.0.database(db).collection::<Document>(coll);
        coll.count_documents(filter, options).await
    }
}

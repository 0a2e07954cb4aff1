//! Unit of Work pattern implementation.
//!
//! A unit of work is opened per service call. Every repository handed out by
//! a unit shares its transaction, and nothing becomes durable until `save`.
//! Dropping a unit without saving discards its writes.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use common::AppResult;
use domain::{Attachment, Inventory, OrderItem, Product, ProductCategory, Warehouse};

use crate::repository::{Repository, SeaTable};

/// Request-scoped access to every repository plus a single commit point.
///
/// ```ignore
/// let uow = factory.begin().await?;
/// let created = uow.products().create(product).await?;
/// uow.save().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn products(&self) -> Box<dyn Repository<Product> + '_>;

    fn categories(&self) -> Box<dyn Repository<ProductCategory> + '_>;

    fn inventories(&self) -> Box<dyn Repository<Inventory> + '_>;

    fn warehouses(&self) -> Box<dyn Repository<Warehouse> + '_>;

    fn attachments(&self) -> Box<dyn Repository<Attachment> + '_>;

    fn order_items(&self) -> Box<dyn Repository<OrderItem> + '_>;

    /// Commit every staged write.
    async fn save(self: Box<Self>) -> AppResult<()>;
}

/// Opens units of work against one backing store.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

/// SeaORM-backed factory; each unit is one database transaction.
#[derive(Clone)]
pub struct SeaPersistence {
    db: DatabaseConnection,
}

impl SeaPersistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkFactory for SeaPersistence {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        Ok(Box::new(SeaUnit { txn }))
    }
}

struct SeaUnit {
    txn: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for SeaUnit {
    fn products(&self) -> Box<dyn Repository<Product> + '_> {
        Box::new(SeaTable::<Product>::new(&self.txn))
    }

    fn categories(&self) -> Box<dyn Repository<ProductCategory> + '_> {
        Box::new(SeaTable::<ProductCategory>::new(&self.txn))
    }

    fn inventories(&self) -> Box<dyn Repository<Inventory> + '_> {
        Box::new(SeaTable::<Inventory>::new(&self.txn))
    }

    fn warehouses(&self) -> Box<dyn Repository<Warehouse> + '_> {
        Box::new(SeaTable::<Warehouse>::new(&self.txn))
    }

    fn attachments(&self) -> Box<dyn Repository<Attachment> + '_> {
        Box::new(SeaTable::<Attachment>::new(&self.txn))
    }

    fn order_items(&self) -> Box<dyn Repository<OrderItem> + '_> {
        Box::new(SeaTable::<OrderItem>::new(&self.txn))
    }

    async fn save(self: Box<Self>) -> AppResult<()> {
        self.txn.commit().await?;
        tracing::debug!("Transaction committed");
        Ok(())
    }
}

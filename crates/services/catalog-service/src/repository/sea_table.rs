//! SeaORM implementation of the repository contract.
//!
//! One generic table type serves every entity; each entity only states how
//! its fields map to columns and how it converts to and from SeaORM models.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::sea_query::{SimpleExpr, Value};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, Order, QueryFilter, QueryOrder, QuerySelect, Select,
};

use common::{AppError, AppResult};

use super::base::{Condition, Direction, FieldValue, Query, Record, Repository};

/// Mapping between a domain record and its SeaORM entity.
#[async_trait]
pub trait Persisted: Record {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    fn column(field: Self::Field) -> <Self::Entity as EntityTrait>::Column;

    fn from_model(model: <Self::Entity as EntityTrait>::Model) -> Self;

    /// Full active model with the primary key left unchanged
    fn to_active_model(&self) -> Self::ActiveModel;

    /// Populate requested relations on freshly loaded rows
    async fn load_relations(
        _rows: &mut [Self],
        _includes: &[Self::Relation],
        _txn: &DatabaseTransaction,
    ) -> AppResult<()> {
        Ok(())
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Value::BigInt(None),
            FieldValue::Int(v) => Value::BigInt(Some(v)),
            FieldValue::Decimal(v) => Value::from(v),
            FieldValue::Text(v) => Value::from(v),
            FieldValue::Time(v) => Value::from(v),
        }
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

fn condition_expr<T: Persisted>(condition: &Condition<T::Field>) -> SimpleExpr {
    match condition {
        Condition::Eq(field, FieldValue::Null) => T::column(*field).is_null(),
        Condition::Eq(field, value) => T::column(*field).eq(value.clone()),
        Condition::In(field, values) => T::column(*field).is_in(values.iter().cloned()),
    }
}

/// Repository over one SeaORM entity, bound to a unit-of-work transaction.
pub struct SeaTable<'a, T> {
    txn: &'a DatabaseTransaction,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Persisted> SeaTable<'a, T> {
    pub fn new(txn: &'a DatabaseTransaction) -> Self {
        Self {
            txn,
            _record: PhantomData,
        }
    }

    fn build(query: &Query<T>) -> Select<T::Entity> {
        let mut select = T::Entity::find();
        for condition in query.conditions() {
            select = select.filter(condition_expr::<T>(condition));
        }

        let (field, direction) = query.order().unwrap_or((T::ID, Direction::Asc));
        select = select.order_by(T::column(field), direction.into());
        if field != T::ID {
            // Stable pages when the sort column has duplicates
            select = select.order_by(T::column(T::ID), Order::Asc);
        }

        if let Some(window) = query.window() {
            select = select.offset(window.offset).limit(window.limit);
        }
        select
    }
}

#[async_trait]
impl<'a, T> Repository<T> for SeaTable<'a, T>
where
    T: Persisted,
    <T::Entity as EntityTrait>::Model: IntoActiveModel<T::ActiveModel> + Send + Sync,
{
    async fn select(&self, query: Query<T>) -> AppResult<Option<T>> {
        let model = Self::build(&query).one(self.txn).await?;
        let mut rows: Vec<T> = model.into_iter().map(T::from_model).collect();
        if !query.includes().is_empty() {
            T::load_relations(&mut rows, query.includes(), self.txn).await?;
        }
        Ok(rows.pop())
    }

    async fn select_all(&self, query: Query<T>) -> AppResult<Vec<T>> {
        let models = Self::build(&query).all(self.txn).await?;
        let mut rows: Vec<T> = models.into_iter().map(T::from_model).collect();
        if !query.includes().is_empty() && !rows.is_empty() {
            T::load_relations(&mut rows, query.includes(), self.txn).await?;
        }
        Ok(rows)
    }

    async fn create(&self, entity: T) -> AppResult<T> {
        let mut active = entity.to_active_model();
        active.not_set(T::column(T::ID));
        let model = active.insert(self.txn).await?;
        Ok(T::from_model(model))
    }

    async fn update(&self, entity: T) -> AppResult<T> {
        let model = entity
            .to_active_model()
            .update(self.txn)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::not_found(T::NAME),
                other => AppError::from(other),
            })?;
        Ok(T::from_model(model))
    }

    async fn delete(&self, entity: &T) -> AppResult<()> {
        let result = T::Entity::delete_many()
            .filter(T::column(T::ID).eq(entity.id()))
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(T::NAME));
        }

        Ok(())
    }
}

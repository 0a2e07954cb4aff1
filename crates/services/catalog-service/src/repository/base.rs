//! Generic repository contract shared by every backing store.
//!
//! A `Query` is the composable, not yet executed part of a lookup: callers
//! stack conditions, includes, ordering and a pagination window onto it and a
//! `Repository` materializes it. Each entity describes its filterable columns
//! and includable relations through `Record`.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use common::{AppError, AppResult};
use domain::{Filter, PaginationParams};

/// Backend-neutral column value used in conditions and ordering.
///
/// Values are only ever compared with values of the same column, so the
/// derived cross-variant ordering never decides a result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Null,
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Time(DateTime<Utc>),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        FieldValue::Decimal(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Time(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// An entity managed by a repository.
pub trait Record: Clone + Send + Sync + 'static {
    /// Columns usable in conditions and ordering
    type Field: Copy + Eq + Debug + FromStr<Err = AppError> + Send + Sync + 'static;
    /// Relations that can be loaded alongside the entity
    type Relation: Copy + Eq + Debug + Send + Sync + 'static;

    /// Primary key column
    const ID: Self::Field;
    /// Entity name used in error messages
    const NAME: &'static str;

    fn id(&self) -> i64;

    fn value(&self, field: Self::Field) -> FieldValue;
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A single predicate on one column
#[derive(Debug, Clone)]
pub enum Condition<F> {
    Eq(F, FieldValue),
    In(F, Vec<FieldValue>),
}

impl<F: Copy> Condition<F> {
    /// Evaluate the predicate against an in-memory row
    pub fn matches<T: Record<Field = F>>(&self, row: &T) -> bool {
        match self {
            Condition::Eq(field, expected) => row.value(*field) == *expected,
            Condition::In(field, values) => values.contains(&row.value(*field)),
        }
    }
}

/// Offset/limit pair derived from pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Lookup specification for a single entity type.
pub struct Query<T: Record> {
    conditions: Vec<Condition<T::Field>>,
    includes: Vec<T::Relation>,
    order: Option<(T::Field, Direction)>,
    window: Option<Window>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Default for Query<T> {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            includes: Vec::new(),
            order: None,
            window: None,
            _record: PhantomData,
        }
    }
}

impl<T: Record> Query<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an equality lookup on the primary key
    pub fn by_id(id: i64) -> Self {
        Self::new().filter(T::ID, id)
    }

    pub fn filter(mut self, field: T::Field, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    pub fn filter_in<I, V>(mut self, field: T::Field, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(field, values));
        self
    }

    pub fn include(mut self, relation: T::Relation) -> Self {
        if !self.includes.contains(&relation) {
            self.includes.push(relation);
        }
        self
    }

    pub fn order_by(mut self, field: T::Field, direction: Direction) -> Self {
        self.order = Some((field, direction));
        self
    }

    /// Apply a by-name ordering. A blank or absent field name leaves the
    /// default order in place; an unknown name is a validation error.
    pub fn sorted(self, filter: &Filter) -> AppResult<Self> {
        let name = match filter.order_by.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(self),
        };
        let field = name.parse::<T::Field>()?;
        let direction = if filter.is_desc {
            Direction::Desc
        } else {
            Direction::Asc
        };
        Ok(self.order_by(field, direction))
    }

    pub fn paginate(mut self, params: &PaginationParams) -> Self {
        self.window = Some(Window {
            offset: params.offset(),
            limit: params.limit(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition<T::Field>] {
        &self.conditions
    }

    pub fn includes(&self) -> &[T::Relation] {
        &self.includes
    }

    /// Requested ordering; stores fall back to ascending id
    pub fn order(&self) -> Option<(T::Field, Direction)> {
        self.order
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }
}

/// Persistence gateway for one entity type.
///
/// Writes are staged in the enclosing unit of work and only become durable
/// when that unit is saved.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// First entity matching the query, if any
    async fn select(&self, query: Query<T>) -> AppResult<Option<T>>;

    /// Every entity matching the query, in query order
    async fn select_all(&self, query: Query<T>) -> AppResult<Vec<T>>;

    /// Insert a new entity; the returned copy carries its assigned id
    async fn create(&self, entity: T) -> AppResult<T>;

    /// Overwrite an existing entity
    async fn update(&self, entity: T) -> AppResult<T>;

    /// Delete an existing entity
    async fn delete(&self, entity: &T) -> AppResult<()>;
}

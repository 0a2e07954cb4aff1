//! In-memory unit of work backend.
//!
//! Committed rows live in one table set behind a mutex shared by every unit.
//! A unit records its writes in order and reads through them, so it always
//! sees its own changes; `save` replays the log onto the shared tables in one
//! critical section. Locks are never held across an await point.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use common::{AppError, AppResult};
use domain::{Attachment, Inventory, OrderItem, Product, ProductCategory, Warehouse};

use super::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::repository::{Direction, ProductRelation, Query, Record, Repository};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Default)]
struct Tables {
    products: Table<Product>,
    categories: Table<ProductCategory>,
    inventories: Table<Inventory>,
    warehouses: Table<Warehouse>,
    attachments: Table<Attachment>,
    order_items: Table<OrderItem>,
}

enum Write<T> {
    Put(T),
    Remove(i64),
}

#[derive(Default)]
struct Staged {
    products: Vec<Write<Product>>,
    categories: Vec<Write<ProductCategory>>,
    inventories: Vec<Write<Inventory>>,
    warehouses: Vec<Write<Warehouse>>,
    attachments: Vec<Write<Attachment>>,
    order_items: Vec<Write<OrderItem>>,
}

fn apply<T: Record>(table: &mut Table<T>, writes: Vec<Write<T>>) {
    for write in writes {
        match write {
            Write::Put(row) => {
                table.rows.insert(row.id(), row);
            }
            Write::Remove(id) => {
                table.rows.remove(&id);
            }
        }
    }
}

/// Binds a record type to its slot in the table set and write log.
trait Stored: Record {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
    fn staged(staged: &Staged) -> &Vec<Write<Self>>;
    fn staged_mut(staged: &mut Staged) -> &mut Vec<Write<Self>>;
    fn set_id(&mut self, id: i64);

    /// Populate requested relations from the unit's view
    fn resolve(_rows: &mut [Self], _includes: &[Self::Relation], _unit: &MemoryUnit) {}
}

macro_rules! stored {
    ($ty:ty, $slot:ident) => {
        fn table(tables: &Tables) -> &Table<$ty> {
            &tables.$slot
        }

        fn table_mut(tables: &mut Tables) -> &mut Table<$ty> {
            &mut tables.$slot
        }

        fn staged(staged: &Staged) -> &Vec<Write<$ty>> {
            &staged.$slot
        }

        fn staged_mut(staged: &mut Staged) -> &mut Vec<Write<$ty>> {
            &mut staged.$slot
        }

        fn set_id(&mut self, id: i64) {
            self.id = id;
        }
    };
}

impl Stored for ProductCategory {
    stored!(ProductCategory, categories);
}

impl Stored for Inventory {
    stored!(Inventory, inventories);
}

impl Stored for Warehouse {
    stored!(Warehouse, warehouses);
}

impl Stored for Attachment {
    stored!(Attachment, attachments);
}

impl Stored for OrderItem {
    stored!(OrderItem, order_items);
}

impl Stored for Product {
    stored!(Product, products);

    fn resolve(rows: &mut [Self], includes: &[ProductRelation], unit: &MemoryUnit) {
        let categories = includes
            .contains(&ProductRelation::Category)
            .then(|| unit.visible::<ProductCategory>());
        let attachments = includes
            .contains(&ProductRelation::Attachment)
            .then(|| unit.visible::<Attachment>());

        // Stored copies may still carry whatever the caller attached
        for row in rows.iter_mut() {
            row.category = categories
                .as_ref()
                .and_then(|c| c.get(&row.category_id).cloned());
            row.attachment = match (attachments.as_ref(), row.attachment_id) {
                (Some(a), Some(id)) => a.get(&id).cloned(),
                _ => None,
            };
        }
    }
}

/// In-memory store shared by every unit it opens.
///
/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWorkFactory for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnit {
            tables: Arc::clone(&self.tables),
            staged: Mutex::new(Staged::default()),
        }))
    }
}

struct MemoryUnit {
    tables: Arc<Mutex<Tables>>,
    staged: Mutex<Staged>,
}

impl MemoryUnit {
    /// Committed rows with this unit's pending writes applied
    fn visible<T: Stored>(&self) -> BTreeMap<i64, T> {
        let mut rows = T::table(&self.tables.lock()).rows.clone();
        let staged = self.staged.lock();
        for write in T::staged(&staged) {
            match write {
                Write::Put(row) => {
                    rows.insert(row.id(), row.clone());
                }
                Write::Remove(id) => {
                    rows.remove(id);
                }
            }
        }
        rows
    }

    fn exists<T: Stored>(&self, id: i64) -> bool {
        {
            let staged = self.staged.lock();
            for write in T::staged(&staged).iter().rev() {
                match write {
                    Write::Put(row) if row.id() == id => return true,
                    Write::Remove(removed) if *removed == id => return false,
                    _ => {}
                }
            }
        }
        T::table(&self.tables.lock()).rows.contains_key(&id)
    }

    fn allocate_id<T: Stored>(&self) -> i64 {
        let mut tables = self.tables.lock();
        let table = T::table_mut(&mut tables);
        let id = table.next_id;
        table.next_id += 1;
        id
    }

    fn stage<T: Stored>(&self, write: Write<T>) {
        T::staged_mut(&mut self.staged.lock()).push(write);
    }
}

struct MemoryTable<'a, T> {
    unit: &'a MemoryUnit,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Stored> MemoryTable<'a, T> {
    fn new(unit: &'a MemoryUnit) -> Box<Self> {
        Box::new(Self {
            unit,
            _record: PhantomData,
        })
    }
}

#[async_trait]
impl<'a, T: Stored> Repository<T> for MemoryTable<'a, T> {
    async fn select(&self, query: Query<T>) -> AppResult<Option<T>> {
        Ok(self.select_all(query).await?.into_iter().next())
    }

    async fn select_all(&self, query: Query<T>) -> AppResult<Vec<T>> {
        let mut rows: Vec<T> = self
            .unit
            .visible::<T>()
            .into_values()
            .filter(|row| query.conditions().iter().all(|c| c.matches(row)))
            .collect();

        let (field, direction) = query.order().unwrap_or((T::ID, Direction::Asc));
        rows.sort_by(|a, b| {
            let ordering = a.value(field).cmp(&b.value(field));
            let ordering = match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id().cmp(&b.id()))
        });

        let mut rows: Vec<T> = match query.window() {
            Some(window) => rows
                .into_iter()
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .collect(),
            None => rows,
        };

        T::resolve(&mut rows, query.includes(), self.unit);
        Ok(rows)
    }

    async fn create(&self, mut entity: T) -> AppResult<T> {
        entity.set_id(self.unit.allocate_id::<T>());
        self.unit.stage(Write::Put(entity.clone()));
        Ok(entity)
    }

    async fn update(&self, entity: T) -> AppResult<T> {
        if !self.unit.exists::<T>(entity.id()) {
            return Err(AppError::not_found(T::NAME));
        }
        self.unit.stage(Write::Put(entity.clone()));
        Ok(entity)
    }

    async fn delete(&self, entity: &T) -> AppResult<()> {
        if !self.unit.exists::<T>(entity.id()) {
            return Err(AppError::not_found(T::NAME));
        }
        self.unit.stage(Write::<T>::Remove(entity.id()));
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    fn products(&self) -> Box<dyn Repository<Product> + '_> {
        MemoryTable::<Product>::new(self)
    }

    fn categories(&self) -> Box<dyn Repository<ProductCategory> + '_> {
        MemoryTable::<ProductCategory>::new(self)
    }

    fn inventories(&self) -> Box<dyn Repository<Inventory> + '_> {
        MemoryTable::<Inventory>::new(self)
    }

    fn warehouses(&self) -> Box<dyn Repository<Warehouse> + '_> {
        MemoryTable::<Warehouse>::new(self)
    }

    fn attachments(&self) -> Box<dyn Repository<Attachment> + '_> {
        MemoryTable::<Attachment>::new(self)
    }

    fn order_items(&self) -> Box<dyn Repository<OrderItem> + '_> {
        MemoryTable::<OrderItem>::new(self)
    }

    async fn save(self: Box<Self>) -> AppResult<()> {
        let MemoryUnit { tables, staged } = *self;
        let staged = staged.into_inner();

        let mut tables = tables.lock();
        apply(&mut tables.products, staged.products);
        apply(&mut tables.categories, staged.categories);
        apply(&mut tables.inventories, staged.inventories);
        apply(&mut tables.warehouses, staged.warehouses);
        apply(&mut tables.attachments, staged.attachments);
        apply(&mut tables.order_items, staged.order_items);
        Ok(())
    }
}

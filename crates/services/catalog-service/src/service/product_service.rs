//! Product service - catalog CRUD, stock enrichment and product images.
//!
//! Every public call opens one unit of work and saves it at most once, after
//! all of its mutations are staged.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{
    AttachmentCreationDto, DomainError, Filter, Inventory, PaginationParams, Product,
    ProductCreationDto, ProductResultDto, ProductUpdateDto,
};

use super::AttachmentService;
use crate::infra::{UnitOfWork, UnitOfWorkFactory};
use crate::repository::{
    Direction, InventoryField, OrderItemField, ProductField, ProductRelation, Query,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Create a product under an existing category; names are unique
    async fn add(&self, dto: ProductCreationDto) -> AppResult<ProductResultDto>;

    /// Overwrite every writable field of an existing product
    async fn modify(&self, dto: ProductUpdateDto) -> AppResult<ProductResultDto>;

    async fn remove(&self, id: i64) -> AppResult<bool>;

    async fn retrieve_by_id(&self, id: i64) -> AppResult<ProductResultDto>;

    /// One page of products in the requested order
    async fn retrieve_all(
        &self,
        params: PaginationParams,
        filter: Filter,
    ) -> AppResult<Vec<ProductResultDto>>;

    async fn retrieve_all_unpaged(&self) -> AppResult<Vec<ProductResultDto>>;

    async fn retrieve_by_category(&self, category_id: i64) -> AppResult<Vec<ProductResultDto>>;

    /// Upload an image and point the product at it
    async fn image_upload(
        &self,
        product_id: i64,
        dto: AttachmentCreationDto,
    ) -> AppResult<ProductResultDto>;

    /// Replace the product's image, removing the previous one first
    async fn modify_image(
        &self,
        product_id: i64,
        dto: AttachmentCreationDto,
    ) -> AppResult<ProductResultDto>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager {
    uow: Arc<dyn UnitOfWorkFactory>,
    attachments: Arc<dyn AttachmentService>,
}

impl ProductManager {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>, attachments: Arc<dyn AttachmentService>) -> Self {
        Self { uow, attachments }
    }

    fn with_relations(query: Query<Product>) -> Query<Product> {
        query
            .include(ProductRelation::Category)
            .include(ProductRelation::Attachment)
    }

    async fn load(&self, query: Query<Product>) -> AppResult<Vec<ProductResultDto>> {
        let uow = self.uow.begin().await?;
        let products = uow.products().select_all(query).await?;
        enrich(&*uow, &products).await
    }
}

/// Map products to results carrying their current stock.
///
/// Inventory rows for every product are fetched in one query; the row with
/// the highest id is the current one for its product.
async fn enrich(uow: &dyn UnitOfWork, products: &[Product]) -> AppResult<Vec<ProductResultDto>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let rows = uow
        .inventories()
        .select_all(
            Query::new()
                .filter_in(InventoryField::ProductId, ids)
                .order_by(InventoryField::Id, Direction::Asc),
        )
        .await?;

    // Ascending ids, so later rows replace earlier ones
    let latest: HashMap<i64, Inventory> = rows.into_iter().map(|r| (r.product_id, r)).collect();

    Ok(products
        .iter()
        .map(|product| {
            let mut result = ProductResultDto::from(product);
            if let Some(inventory) = latest.get(&product.id) {
                result.apply_stock(inventory.quantity);
            }
            result
        })
        .collect())
}

#[async_trait]
impl ProductService for ProductManager {
    async fn add(&self, dto: ProductCreationDto) -> AppResult<ProductResultDto> {
        dto.validate().map_err(DomainError::from)?;

        let uow = self.uow.begin().await?;
        let duplicate = uow
            .products()
            .select(Query::new().filter(ProductField::Name, &dto.name))
            .await?;
        if duplicate.is_some() {
            return Err(DomainError::already_exists(format!("Product '{}'", dto.name)).into());
        }

        let category = uow
            .categories()
            .select(Query::by_id(dto.category_id))
            .await?
            .ok_or_not_found("Category")?;

        let mut product = uow.products().create(Product::from(dto)).await?;
        product.assign_category(category);
        uow.save().await?;

        info!(
            product_id = product.id,
            category_id = product.category_id,
            "Product created"
        );
        Ok(ProductResultDto::from(product))
    }

    async fn modify(&self, dto: ProductUpdateDto) -> AppResult<ProductResultDto> {
        dto.validate().map_err(DomainError::from)?;

        let uow = self.uow.begin().await?;
        let mut product = uow
            .products()
            .select(Self::with_relations(Query::by_id(dto.id)))
            .await?
            .ok_or_not_found("Product")?;

        let category = uow
            .categories()
            .select(Query::by_id(dto.category_id))
            .await?
            .ok_or_not_found("Category")?;

        product.apply_update(dto);
        product.assign_category(category);
        uow.products().update(product.clone()).await?;
        uow.save().await?;

        info!(product_id = product.id, "Product updated");
        Ok(ProductResultDto::from(product))
    }

    async fn remove(&self, id: i64) -> AppResult<bool> {
        let uow = self.uow.begin().await?;
        let product = uow
            .products()
            .select(Query::by_id(id))
            .await?
            .ok_or_not_found("Product")?;

        // Order lines keep their product; surface this before the store refuses
        let ordered = uow
            .order_items()
            .select(Query::new().filter(OrderItemField::ProductId, id))
            .await?;
        if ordered.is_some() {
            return Err(AppError::validation(format!(
                "Product {} is referenced by order items",
                id
            )));
        }

        uow.products().delete(&product).await?;
        uow.save().await?;

        info!(product_id = id, "Product removed");
        Ok(true)
    }

    async fn retrieve_by_id(&self, id: i64) -> AppResult<ProductResultDto> {
        let uow = self.uow.begin().await?;
        let product = uow
            .products()
            .select(Self::with_relations(Query::by_id(id)))
            .await?
            .ok_or_not_found("Product")?;

        debug!(product_id = id, "Product retrieved");
        let mut results = enrich(&*uow, std::slice::from_ref(&product)).await?;
        results.pop().ok_or_not_found("Product")
    }

    async fn retrieve_all(
        &self,
        params: PaginationParams,
        filter: Filter,
    ) -> AppResult<Vec<ProductResultDto>> {
        params.validate().map_err(DomainError::from)?;

        let query = Self::with_relations(Query::new())
            .sorted(&filter)?
            .paginate(&params);
        let results = self.load(query).await?;

        debug!(
            page = params.page,
            per_page = params.per_page,
            count = results.len(),
            "Products listed"
        );
        Ok(results)
    }

    async fn retrieve_all_unpaged(&self) -> AppResult<Vec<ProductResultDto>> {
        let results = self.load(Self::with_relations(Query::new())).await?;
        debug!(count = results.len(), "All products listed");
        Ok(results)
    }

    async fn retrieve_by_category(&self, category_id: i64) -> AppResult<Vec<ProductResultDto>> {
        let query = Self::with_relations(Query::new()).filter(ProductField::CategoryId, category_id);
        let results = self.load(query).await?;
        debug!(category_id, count = results.len(), "Products listed by category");
        Ok(results)
    }

    async fn image_upload(
        &self,
        product_id: i64,
        dto: AttachmentCreationDto,
    ) -> AppResult<ProductResultDto> {
        let uow = self.uow.begin().await?;
        let mut product = uow
            .products()
            .select(Query::by_id(product_id).include(ProductRelation::Category))
            .await?
            .ok_or_not_found("Product")?;

        let attachment = self.attachments.upload(dto).await?;
        product.assign_attachment(attachment);
        uow.products().update(product.clone()).await?;
        uow.save().await?;

        info!(product_id, attachment_id = ?product.attachment_id, "Product image uploaded");
        Ok(ProductResultDto::from(product))
    }

    async fn modify_image(
        &self,
        product_id: i64,
        dto: AttachmentCreationDto,
    ) -> AppResult<ProductResultDto> {
        // Reject a bad upload before the current image is gone
        dto.validate().map_err(DomainError::from)?;

        let uow = self.uow.begin().await?;
        let mut product = uow
            .products()
            .select(Self::with_relations(Query::by_id(product_id)))
            .await?
            .ok_or_not_found("Product")?;

        if let Some(previous) = product.attachment.take() {
            self.attachments.remove(&previous).await?;
            debug!(product_id, attachment_id = previous.id, "Previous image removed");
        }

        let attachment = self.attachments.upload(dto).await?;
        product.assign_attachment(attachment);
        uow.products().update(product.clone()).await?;
        uow.save().await?;

        info!(product_id, attachment_id = ?product.attachment_id, "Product image replaced");
        Ok(ProductResultDto::from(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MemoryStore;
    use crate::service::MockAttachmentService;
    use domain::{Attachment, ProductCategory};
    use mockall::predicate::function;
    use rust_decimal::Decimal;

    async fn seed_category(store: &MemoryStore, name: &str) -> ProductCategory {
        let uow = store.begin().await.unwrap();
        let category = uow
            .categories()
            .create(ProductCategory::new(name, None))
            .await
            .unwrap();
        uow.save().await.unwrap();
        category
    }

    async fn seed_stock(store: &MemoryStore, product_id: i64, quantity: i32) {
        let uow = store.begin().await.unwrap();
        uow.inventories()
            .create(Inventory::new(product_id, None, quantity))
            .await
            .unwrap();
        uow.save().await.unwrap();
    }

    fn creation(name: &str, category_id: i64) -> ProductCreationDto {
        ProductCreationDto {
            name: name.to_string(),
            description: Some("desc".to_string()),
            price: Decimal::new(1999, 2),
            category_id,
        }
    }

    fn service(store: &MemoryStore, attachments: MockAttachmentService) -> ProductManager {
        ProductManager::new(Arc::new(store.clone()), Arc::new(attachments))
    }

    fn stored_attachment(id: i64, name: &str) -> Attachment {
        let mut attachment = Attachment::new(name, format!("/tmp/{}", name));
        attachment.id = id;
        attachment
    }

    #[tokio::test]
    async fn test_add_returns_mapped_product_with_category() {
        let store = MemoryStore::new();
        let category = seed_category(&store, "Coffee").await;
        let service = service(&store, MockAttachmentService::new());

        let result = service.add(creation("Beans", category.id)).await.unwrap();

        assert_eq!(result.name, "Beans");
        assert_eq!(result.price, Decimal::new(1999, 2));
        assert_eq!(result.category.map(|c| c.name), Some("Coffee".to_string()));
        assert!(result.quantity.is_none());
        assert!(!result.is_available);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_dto() {
        let store = MemoryStore::new();
        let category = seed_category(&store, "Coffee").await;
        let service = service(&store, MockAttachmentService::new());

        let mut dto = creation("Beans", category.id);
        dto.price = Decimal::new(-1, 0);
        let result = service.add(dto).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_with_missing_category_is_not_found() {
        let store = MemoryStore::new();
        let service = service(&store, MockAttachmentService::new());

        let result = service.add(creation("Beans", 404)).await;

        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Category"));
        assert!(service.retrieve_all_unpaged().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_by_id_enriches_stock() {
        let store = MemoryStore::new();
        let category = seed_category(&store, "Coffee").await;
        let service = service(&store, MockAttachmentService::new());
        let created = service.add(creation("Beans", category.id)).await.unwrap();
        seed_stock(&store, created.id, 0).await;
        seed_stock(&store, created.id, 12).await;

        let result = service.retrieve_by_id(created.id).await.unwrap();

        assert_eq!(result.quantity, Some(12));
        assert!(result.is_available);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_is_validation_error() {
        let store = MemoryStore::new();
        let service = service(&store, MockAttachmentService::new());

        let result = service
            .retrieve_all(PaginationParams::default(), Filter::order_by("colour"))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_image_upload_assigns_attachment() {
        let store = MemoryStore::new();
        let category = seed_category(&store, "Coffee").await;

        let mut attachments = MockAttachmentService::new();
        attachments
            .expect_upload()
            .times(1)
            .returning(|dto| Ok(stored_attachment(7, &dto.file_name)));
        attachments.expect_remove().never();

        let service = service(&store, attachments);
        let created = service.add(creation("Beans", category.id)).await.unwrap();

        let result = service
            .image_upload(created.id, AttachmentCreationDto::new("beans.png", vec![1]))
            .await
            .unwrap();

        assert_eq!(result.attachment.map(|a| a.id), Some(7));
        assert_eq!(result.category.map(|c| c.id), Some(category.id));
    }

    #[tokio::test]
    async fn test_image_upload_on_missing_product_uploads_nothing() {
        let store = MemoryStore::new();
        let mut attachments = MockAttachmentService::new();
        attachments.expect_upload().never();
        let service = service(&store, attachments);

        let result = service
            .image_upload(1, AttachmentCreationDto::new("a.png", vec![1]))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_modify_image_removes_previous_once() {
        let store = MemoryStore::new();
        let category = seed_category(&store, "Coffee").await;

        // Store the previous attachment so the product can include it
        let previous = {
            let uow = store.begin().await.unwrap();
            let previous = uow
                .attachments()
                .create(Attachment::new("old.png", "/tmp/old.png"))
                .await
                .unwrap();
            uow.save().await.unwrap();
            previous
        };

        let previous_id = previous.id;
        let mut attachments = MockAttachmentService::new();
        attachments
            .expect_upload()
            .times(1)
            .returning(move |dto| Ok(stored_attachment(previous_id + 1, &dto.file_name)));
        attachments
            .expect_remove()
            .with(function(move |a: &Attachment| a.id == previous_id))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(&store, attachments);
        let created = service.add(creation("Beans", category.id)).await.unwrap();
        {
            let uow = store.begin().await.unwrap();
            let mut product = uow
                .products()
                .select(Query::by_id(created.id))
                .await
                .unwrap()
                .unwrap();
            product.assign_attachment(previous);
            uow.products().update(product).await.unwrap();
            uow.save().await.unwrap();
        }

        let result = service
            .modify_image(created.id, AttachmentCreationDto::new("new.png", vec![2]))
            .await
            .unwrap();

        assert_eq!(result.attachment.map(|a| a.id), Some(previous_id + 1));
    }
}

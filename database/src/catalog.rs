use std::collections::HashMap;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use storefront_models::catalog::{
    Category, CategoryWithProducts, CreateCategoryRequest, CreateProductRequest, Product,
    ProductFilterQuery, ProductWithCategory, UpdateCategoryRequest, UpdateProductRequest,
};

use crate::error::StoreError;

const PRODUCT_WITH_CATEGORY_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.price, p.stock, p.images, p.ratings,
    p.category_id, p.created_at, p.updated_at,
    c.id AS c_id, c.name AS c_name, c.created_at AS c_created_at, c.updated_at AS c_updated_at
"#;

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock, images, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, stock, images, ratings,
                      category_id, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.stock)
        .bind(request.images.clone().unwrap_or_default())
        .bind(request.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write_error)?;

        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<ProductWithCategory>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_WITH_CATEGORY_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             ORDER BY p.id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_with_category).collect())
    }

    pub async fn find_product(&self, id: i64) -> Result<Option<ProductWithCategory>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_WITH_CATEGORY_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(product_with_category))
    }

    pub async fn filter_products(
        &self,
        filter: &ProductFilterQuery,
    ) -> Result<Vec<ProductWithCategory>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_WITH_CATEGORY_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE ($1::BIGINT IS NULL OR p.category_id = $1)
               AND ($2::DOUBLE PRECISION IS NULL OR p.price >= $2)
               AND ($3::DOUBLE PRECISION IS NULL OR p.price <= $3)
               AND ($4::DOUBLE PRECISION IS NULL OR p.ratings >= $4)
             ORDER BY p.id"
        ))
        .bind(filter.category_id)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.min_rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_with_category).collect())
    }

    pub async fn update_product(
        &self,
        id: i64,
        changes: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                images = COALESCE($6, images),
                category_id = COALESCE($7, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, price, stock, images, ratings,
                      category_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.price)
        .bind(changes.stock)
        .bind(changes.images.clone())
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_write_error)?;

        Ok(product)
    }

    pub async fn delete_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = $1
             RETURNING id, name, description, price, stock, images, ratings,
                       category_id, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&request.name)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write_error)?;

        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithProducts>, StoreError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, stock, images, ratings,
                    category_id, created_at, updated_at
             FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_category: HashMap<i64, Vec<Product>> = HashMap::new();
        for product in products {
            by_category
                .entry(product.category_id)
                .or_default()
                .push(product);
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let products = by_category.remove(&category.id).unwrap_or_default();
                CategoryWithProducts { category, products }
            })
            .collect())
    }

    pub async fn find_category(&self, id: i64) -> Result<Option<CategoryWithProducts>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(category) = category else {
            return Ok(None);
        };

        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, stock, images, ratings,
                    category_id, created_at, updated_at
             FROM products WHERE category_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(CategoryWithProducts { category, products }))
    }

    pub async fn update_category(
        &self,
        id: i64,
        changes: &UpdateCategoryRequest,
    ) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET name = COALESCE($2, name), updated_at = now()
             WHERE id = $1
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_write_error)?;

        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "DELETE FROM categories WHERE id = $1
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}

fn product_with_category(row: &PgRow) -> ProductWithCategory {
    let product = Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        stock: row.get("stock"),
        images: row.get("images"),
        ratings: row.get("ratings"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };

    let category = row
        .get::<Option<i64>, _>("c_id")
        .map(|category_id| Category {
            id: category_id,
            name: row.get("c_name"),
            created_at: row.get("c_created_at"),
            updated_at: row.get("c_updated_at"),
        });

    ProductWithCategory { product, category }
}

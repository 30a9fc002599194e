//! Product and product image models for database operations.

use diesel::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Slug normalization
// ============================================================================

/// Normalizes a slug candidate into its stored form.
///
/// Lower-cases the input, replaces spaces with `_` and strips apostrophes.
/// Applying it twice yields the same result as applying it once.
pub fn normalize_slug(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_").replace('\'', "")
}

// ============================================================================
// Product Models (Query/Insert/Update)
// ============================================================================

/// Product query model for SELECT operations
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
}

impl Product {
    /// Returns a copy of this product with every present field of `changes` applied.
    ///
    /// Nothing is written to the database; the caller decides when to persist.
    pub fn merged(&self, changes: &UpdateProduct) -> Product {
        let mut merged = self.clone();
        if let Some(title) = &changes.title {
            merged.title = title.clone();
        }
        if let Some(price) = changes.price {
            merged.price = price;
        }
        if let Some(description) = &changes.description {
            merged.description = description.clone();
        }
        if let Some(slug) = &changes.slug {
            merged.slug = slug.clone();
        }
        if let Some(stock) = changes.stock {
            merged.stock = stock;
        }
        if let Some(sizes) = &changes.sizes {
            merged.sizes = sizes.clone();
        }
        if let Some(gender) = &changes.gender {
            merged.gender = gender.clone();
        }
        merged
    }
}

/// NewProduct insert model for INSERT operations
#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
}

impl NewProduct {
    /// Prepares the row for its first write.
    ///
    /// An empty slug falls back to the title, and the result is normalized.
    pub fn before_insert(mut self) -> Self {
        let source = if self.slug.trim().is_empty() {
            self.title.as_str()
        } else {
            self.slug.as_str()
        };
        self.slug = normalize_slug(source);
        self
    }
}

/// UpdateProduct model for partial updates.
///
/// `None` fields keep the stored value. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<Option<String>>,
    pub slug: Option<String>,
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<String>,
}

impl UpdateProduct {
    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.slug.is_none()
            && self.stock.is_none()
            && self.sizes.is_none()
            && self.gender.is_none()
    }
}

// ============================================================================
// ProductImage Models
// ============================================================================

/// ProductImage query model, owned by exactly one product
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = crate::schema::product_images)]
#[diesel(belongs_to(Product))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductImage {
    pub id: i32,
    pub url: String,
    pub product_id: Uuid,
}

/// NewProductImage insert model
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage {
    pub url: String,
    pub product_id: Uuid,
}

impl NewProductImage {
    /// Builds one insert row per URL, all attached to `product_id`.
    pub fn for_product(product_id: Uuid, urls: &[String]) -> Vec<NewProductImage> {
        urls.iter()
            .map(|url| NewProductImage {
                url: url.clone(),
                product_id,
            })
            .collect()
    }
}

/// A product together with its image rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithImages {
    pub product: Product,
    pub images: Vec<ProductImage>,
}

impl ProductWithImages {
    /// Flattens the image rows into their URLs, preserving order.
    pub fn image_urls(&self) -> Vec<String> {
        self.images.iter().map(|image| image.url.clone()).collect()
    }

    /// Flattens into the shape returned to clients.
    pub fn into_plain(self) -> PlainProduct {
        let images = self.image_urls();
        let Product {
            id,
            title,
            price,
            description,
            slug,
            stock,
            sizes,
            gender,
        } = self.product;

        PlainProduct {
            id,
            title,
            price,
            description,
            slug,
            stock,
            sizes,
            gender,
            images,
        }
    }
}

/// A product with its images reduced to URL strings.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainProduct {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_product() -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Men's Chill Crew Neck Sweatshirt".to_string(),
            price: 75.0,
            description: None,
            slug: "mens_chill_crew_neck_sweatshirt".to_string(),
            stock: 7,
            sizes: vec!["XS".to_string(), "S".to_string()],
            gender: "men".to_string(),
        }
    }

    fn new_product(title: &str, slug: &str) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            price: 0.0,
            description: None,
            slug: slug.to_string(),
            stock: 0,
            sizes: vec!["M".to_string()],
            gender: "unisex".to_string(),
        }
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(
            normalize_slug("Men's Chill Crew Neck Sweatshirt"),
            "mens_chill_crew_neck_sweatshirt"
        );
        assert_eq!(normalize_slug("already_fine"), "already_fine");
        assert_eq!(normalize_slug(""), "");
    }

    #[test]
    fn test_before_insert_derives_slug_from_title() {
        let product = new_product("Kids' Cybertruck Tee", "").before_insert();
        assert_eq!(product.slug, "kids_cybertruck_tee");
        assert_eq!(product.title, "Kids' Cybertruck Tee");
    }

    #[test]
    fn test_before_insert_normalizes_explicit_slug() {
        let product = new_product("Whatever", "My Custom SLUG's").before_insert();
        assert_eq!(product.slug, "my_custom_slugs");
    }

    #[test]
    fn test_merged_applies_only_present_fields() {
        let product = sample_product();
        let changes = UpdateProduct {
            price: Some(80.5),
            stock: Some(0),
            ..Default::default()
        };

        let merged = product.merged(&changes);
        assert_eq!(merged.price, 80.5);
        assert_eq!(merged.stock, 0);
        assert_eq!(merged.id, product.id);
        assert_eq!(merged.title, product.title);
        assert_eq!(merged.sizes, product.sizes);
    }

    #[test]
    fn test_merged_clears_or_keeps_description() {
        let mut product = sample_product();
        product.description = Some("Warm".to_string());

        let kept = product.merged(&UpdateProduct::default());
        assert_eq!(kept.description.as_deref(), Some("Warm"));

        let cleared = product.merged(&UpdateProduct {
            description: Some(None),
            ..Default::default()
        });
        assert_eq!(cleared.description, None);

        let replaced = product.merged(&UpdateProduct {
            description: Some(Some("Light".to_string())),
            ..Default::default()
        });
        assert_eq!(replaced.description.as_deref(), Some("Light"));
    }

    #[test]
    fn test_merged_does_not_normalize_slug() {
        let product = sample_product();
        let changes = UpdateProduct {
            slug: Some("Raw Slug".to_string()),
            ..Default::default()
        };
        assert_eq!(product.merged(&changes).slug, "Raw Slug");
    }

    #[test]
    fn test_image_urls_preserve_order() {
        let product = sample_product();
        let images = NewProductImage::for_product(
            product.id,
            &["a.jpg".to_string(), "b.jpg".to_string()],
        )
        .into_iter()
        .enumerate()
        .map(|(i, image)| ProductImage {
            id: i as i32 + 1,
            url: image.url,
            product_id: image.product_id,
        })
        .collect();

        let with_images = ProductWithImages { product, images };
        assert_eq!(with_images.image_urls(), vec!["a.jpg", "b.jpg"]);

        let plain = with_images.clone().into_plain();
        assert_eq!(plain.id, with_images.product.id);
        assert_eq!(plain.images, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_update_product_is_empty() {
        assert!(UpdateProduct::default().is_empty());
        let changes = UpdateProduct {
            stock: Some(3),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalized_slug_has_no_spaces_quotes_or_uppercase(raw in "[A-Za-z' ]{0,40}") {
            let slug = normalize_slug(&raw);
            prop_assert!(!slug.contains(' '));
            prop_assert!(!slug.contains('\''));
            prop_assert_eq!(slug.clone(), slug.to_lowercase());
            prop_assert_eq!(normalize_slug(&slug), slug);
        }
    }
}

//! Demo data loader.
//!
//! Wipes the catalog and users, then inserts a small fixed data set so a fresh
//! database has something to browse.

use crate::error::AppResult;
use crate::models::{NewProduct, NewUser};
use crate::repositories::UserRepository;
use crate::services::ProductService;
use crate::utils::password::hash_password;

/// Counts of rows written by a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub products_removed: usize,
    pub products_inserted: usize,
    pub users_inserted: usize,
}

struct SeedProduct {
    title: &'static str,
    price: f64,
    description: &'static str,
    stock: i32,
    sizes: &'static [&'static str],
    gender: &'static str,
    images: &'static [&'static str],
}

struct SeedUser {
    email: &'static str,
    full_name: &'static str,
    password: &'static str,
    roles: &'static [&'static str],
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Men's Chill Crew Neck Sweatshirt",
        price: 75.0,
        description: "Premium heavyweight crew neck sweatshirt with a relaxed fit.",
        stock: 7,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: "men",
        images: &["1740176-00-A_0_2000.jpg", "1740176-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Quilted Shirt Jacket",
        price: 200.0,
        description: "Water-resistant quilted shirt jacket for cold weather.",
        stock: 5,
        sizes: &["XS", "S", "M", "XL", "XXL"],
        gender: "men",
        images: &["1740507-00-A_0_2000.jpg", "1740507-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Cropped Puffer Jacket",
        price: 225.0,
        description: "Cropped puffer jacket with a soft hand feel.",
        stock: 85,
        sizes: &["XS", "S", "M"],
        gender: "women",
        images: &["1740535-00-A_0_2000.jpg", "1740535-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Raven Slouchy Crew Sweatshirt",
        price: 110.0,
        description: "Slouchy crew neck sweatshirt with dropped shoulders.",
        stock: 9,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: "women",
        images: &["1740250-00-A_0_2000.jpg"],
    },
    SeedProduct {
        title: "Kids Cybertruck Long Sleeve Tee",
        price: 30.0,
        description: "Long sleeve tee with a printed graphic on the chest.",
        stock: 10,
        sizes: &["XS", "S", "M"],
        gender: "kid",
        images: &["1742694-00-A_1_2000.jpg"],
    },
    SeedProduct {
        title: "Cybertruck Graffiti Hoodie",
        price: 60.0,
        description: "Unisex hoodie with a graffiti print on the front.",
        stock: 0,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: "unisex",
        images: &["7654420-00-A_0_2000.jpg"],
    },
];

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        email: "test1@google.com",
        full_name: "Test One",
        password: "Abc123",
        roles: &["admin"],
    },
    SeedUser {
        email: "test2@google.com",
        full_name: "Test Two",
        password: "Abc123",
        roles: &["user", "super"],
    },
];

#[derive(Clone)]
pub struct SeedService {
    products: ProductService,
    users: UserRepository,
}

impl SeedService {
    pub fn new(products: ProductService, users: UserRepository) -> Self {
        Self { products, users }
    }

    /// Replaces all products and users with the demo data set.
    ///
    /// Image file names are stored as given; the files themselves are
    /// expected under the upload directory.
    pub async fn run(&self) -> AppResult<SeedReport> {
        let products_removed = self.products.delete_all_products().await?;
        self.users.delete_all().await?;

        let new_users = SEED_USERS
            .iter()
            .map(|user| {
                let mut new_user = NewUser::new(user.email, hash_password(user.password)?, user.full_name);
                new_user.roles = user.roles.iter().map(|r| r.to_string()).collect();
                Ok(new_user)
            })
            .collect::<AppResult<Vec<_>>>()?;
        let users_inserted = self.users.create_many(&new_users).await?.len();

        let mut products_inserted = 0;
        for seed in SEED_PRODUCTS {
            let product = NewProduct {
                title: seed.title.to_string(),
                price: seed.price,
                description: Some(seed.description.to_string()),
                slug: String::new(),
                stock: seed.stock,
                sizes: seed.sizes.iter().map(|s| s.to_string()).collect(),
                gender: seed.gender.to_string(),
            };
            let images = seed.images.iter().map(|i| i.to_string()).collect();
            self.products.create(product, images).await?;
            products_inserted += 1;
        }

        tracing::info!(products_removed, products_inserted, users_inserted, "Seed completed");
        Ok(SeedReport {
            products_removed,
            products_inserted,
            users_inserted,
        })
    }
}

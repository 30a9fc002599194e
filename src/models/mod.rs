mod product;
mod user;

pub use product::{
    NewProduct, NewProductImage, PlainProduct, Product, ProductImage, ProductWithImages,
    UpdateProduct,
    normalize_slug,
};
pub use user::{DEFAULT_ROLE, NewUser, User};

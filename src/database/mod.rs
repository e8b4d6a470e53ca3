pub mod manager;
pub mod repository;
pub mod users;

pub use manager::{DatabaseManager, DatabaseError};
pub use repository::{
    MenuItemRepository, MenuRepository, MenuSectionRepository, PgSiblingLookup,
    RestaurantRepository,
};
pub use users::{User, UserRepository};

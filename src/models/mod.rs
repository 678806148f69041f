//! Request and Response models for the wish relay
//!
//! DTOs for the relay's own API and for the backend it fronts.

pub mod requests;
pub mod responses;
pub mod wish;

// Re-export commonly used types
pub use requests::{ClearCacheQuery, NewWish, WishQuery};
pub use responses::{
    CacheSource, CreatedWishResponse, ErrorResponse, HealthResponse, RemovedResponse,
    StatsResponse, WishesResponse,
};
pub use wish::{Envelope, FieldError, Pagination, Wish, WishPage};

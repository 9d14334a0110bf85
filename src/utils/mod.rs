pub mod http;
pub mod ordered_set;
pub mod pagination;
pub mod rate_limiter;

pub use http::{ApiClient, HttpClient, HttpResponse};
pub use ordered_set::{IdentitySet, OrderedSet};
pub use pagination::{Page, Paged, PER_PAGE};
pub use rate_limiter::RateLimiter;

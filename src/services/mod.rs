pub mod post_service;
pub mod user_service;
pub mod validation;

pub use post_service::{CreatePost, PostService, UpdatePost};
pub use user_service::{LoginRequest, LoginResponse, RefreshRequest, RegisterUser, UpdateUser, UserService};

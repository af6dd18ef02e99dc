pub mod post;
pub mod user;

pub use post::{NewPost, Post, PostChanges};
pub use user::{NewUser, User, UserChanges};

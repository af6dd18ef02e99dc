/// Shared types used across the codebase

/// Primary key of a row in `users` (SERIAL).
pub type UserId = i32;

/// Primary key of a row in `posts` (SERIAL).
pub type PostId = i32;

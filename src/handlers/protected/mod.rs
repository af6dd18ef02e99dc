// handlers/protected/mod.rs - Protected handlers (access token required)
//
// Security Level: Bearer access token
// Middleware: auth_middleware (401 before any handler runs)

pub mod posts; // /posts, /posts/:id, /posts/:id/delete
pub mod users; // /users/:id

/*
PROTECTED HANDLER ARCHITECTURE:

Every route in this module sits behind `auth_middleware`, which verifies the
access token and stores an `AuthUser` in the request extensions. Handlers take
`AuthUser` as an extractor argument; if the middleware was not layered on a
route the extractor rejects with 401 instead of running unauthenticated.

```rust
Router::new()
    .route("/posts", get(protected::posts::list).post(protected::posts::create))
    .route("/users/:id", get(protected::users::get))
    .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
```

Ownership:
- users: the caller may only address their own id. Checked before lookup.
- posts: the post is loaded first (404 if missing or deleted), then the
  author is compared with the caller (403 on mismatch).
*/

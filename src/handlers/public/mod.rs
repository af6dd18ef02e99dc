// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation, token acquisition, the user directory and the
// informational endpoints.
//
// Security Level: None (completely public access)
// Middleware: CORS + tracing only

pub mod info;  // GET /, /about, /health
pub mod users; // POST /users, /users/login, /users/refresh; GET /users

/*
PUBLIC HANDLER ARCHITECTURE:

Handlers here never see an `AuthUser`. Everything they read comes from the
request body, so every input goes through the service-layer validation
before touching storage.

Usage Pattern:
```rust
use handlers::public;

Router::new()
    .route("/users", get(public::users::list).post(public::users::register))
    .route("/users/login", post(public::users::login))
    .route("/users/refresh", post(public::users::refresh))
    // No auth layer
```

Token flow:

1. **Register**: POST /users creates the account. No token is issued.
2. **Login**: POST /users/login returns an access token (short-lived, sent as
   `Authorization: Bearer ...`) and a refresh token.
3. **Refresh**: POST /users/refresh takes the refresh token in the body and
   returns a new pair, as long as the user still exists and is live.

Unknown email and wrong password produce the same 401 so the endpoint does
not reveal which emails are registered.
*/

// handlers/mod.rs - 2-Tier Handler Architecture
//
// Public (no auth) → Protected (access token)

pub mod public;    // Tier 1: No authentication required
pub mod protected; // Tier 2: Bearer access token required

/*
Handlers are thin: extract, call the service on `AppState`, wrap the result in
`ApiResponse`. Rejections from `Json` and `Path` extractors are taken as
`Result<_, Rejection>` and converted with `?`, so malformed bodies and
non-numeric ids come back as 400 in the normal error envelope.

src/
├── handlers/
│   ├── mod.rs            ← This file
│   ├── public/
│   │   ├── info.rs       ← GET /, /about, /health
│   │   └── users.rs      ← register, login, refresh, list
│   └── protected/
│       ├── users.rs      ← GET/PUT/DELETE /users/:id
│       └── posts.rs      ← /posts CRUD
│
└── routes.rs             ← Router assembly
*/

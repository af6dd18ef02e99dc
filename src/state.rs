use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::database::Storage;
use crate::services::{PostService, UserService};

/// Shared handles every handler receives. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub tokens: Arc<TokenCodec>,
    pub users: UserService,
    pub posts: PostService,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, tokens: TokenCodec) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            users: UserService::new(storage.clone(), tokens.clone()),
            posts: PostService::new(storage.clone()),
            storage,
            tokens,
        }
    }
}

use std::sync::Arc;

use serde::Deserialize;

use crate::auth::require_owner;
use crate::database::models::{NewPost, Post, PostChanges};
use crate::database::Storage;
use crate::error::ApiError;
use crate::types::{PostId, UserId};

use super::validation::{require, require_if_present};

const POST_NOT_FOUND: &str = "Post not found";
const POST_GONE: &str = "Post not found or already deleted";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePost {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.is_none() && self.content.is_none() {
            errors.push("at least one of title, content is required".to_string());
        }
        require_if_present("title", self.title.as_deref(), &mut errors);
        require_if_present("content", self.content.as_deref(), &mut errors);
        errors
    }
}

/// Post CRUD. Reads list every visible post; single-post access and all
/// writes are restricted to the author.
#[derive(Clone)]
pub struct PostService {
    storage: Arc<dyn Storage>,
}

impl PostService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Post>, ApiError> {
        Ok(self.storage.posts().list_visible().await?)
    }

    /// Author is always the caller; any `user_id` in the body is ignored.
    pub async fn create(&self, caller: UserId, input: CreatePost) -> Result<Post, ApiError> {
        let mut errors = Vec::new();
        require("title", &input.title, &mut errors);
        require("content", &input.content, &mut errors);
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation failed", errors));
        }

        let post = self
            .storage
            .posts()
            .insert(NewPost {
                user_id: caller,
                title: input.title.trim().to_string(),
                content: input.content,
            })
            .await?;

        tracing::info!("User {} created post {}", caller, post.id);
        Ok(post)
    }

    /// Missing posts are reported before ownership.
    pub async fn get(&self, caller: UserId, id: PostId) -> Result<Post, ApiError> {
        let post = self.find(id).await?;
        require_owner(caller, post.user_id)?;
        Ok(post)
    }

    pub async fn update(&self, caller: UserId, id: PostId, input: UpdatePost) -> Result<Post, ApiError> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation failed", errors));
        }

        let post = self.find(id).await?;
        require_owner(caller, post.user_id)?;

        let changes = PostChanges {
            title: input.title.map(|t| t.trim().to_string()),
            content: input.content,
        };

        // A concurrent delete can land between the lookup and the write
        self.storage
            .posts()
            .update(id, &changes)
            .await?
            .ok_or_else(|| ApiError::not_found(POST_GONE))
    }

    /// Soft delete; returns the post as it was before.
    pub async fn delete(&self, caller: UserId, id: PostId) -> Result<Post, ApiError> {
        let post = self.find(id).await?;
        require_owner(caller, post.user_id)?;

        let snapshot = self
            .storage
            .posts()
            .soft_delete(id)
            .await?
            .ok_or_else(|| ApiError::not_found(POST_GONE))?;

        tracing::info!("User {} deleted post {}", caller, id);
        Ok(snapshot)
    }

    async fn find(&self, id: PostId) -> Result<Post, ApiError> {
        self.storage
            .posts()
            .find_visible(id)
            .await?
            .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStorage;

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStorage::new()))
    }

    fn draft(title: &str, content: &str) -> CreatePost {
        CreatePost { title: title.to_string(), content: content.to_string() }
    }

    #[tokio::test]
    async fn create_stamps_caller_as_author() {
        let posts = service();
        let post = posts.create(7, draft("Hello", "World")).await.unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.user_id, 7);
        assert!(post.is_active);
    }

    #[tokio::test]
    async fn create_requires_title_and_content() {
        let err = service().create(1, draft("", " ")).await.unwrap_err();
        let errors = match err {
            ApiError::ValidationError { errors, .. } => errors,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert_eq!(errors, vec!["title is required", "content is required"]);
    }

    #[tokio::test]
    async fn list_shows_everyone_s_posts() {
        let posts = service();
        posts.create(1, draft("a", "a")).await.unwrap();
        posts.create(2, draft("b", "b")).await.unwrap();

        let all = posts.list().await.unwrap();
        assert_eq!(all.iter().map(|p| p.user_id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn get_checks_existence_before_ownership() {
        let posts = service();
        let post = posts.create(1, draft("a", "a")).await.unwrap();

        assert_eq!(posts.get(1, post.id).await.unwrap().title, "a");
        assert_eq!(posts.get(2, post.id).await.unwrap_err(), ApiError::forbidden("Forbidden"));
        assert_eq!(posts.get(2, 99).await.unwrap_err(), ApiError::not_found(POST_NOT_FOUND));
    }

    #[tokio::test]
    async fn only_the_author_can_update() {
        let posts = service();
        let post = posts.create(1, draft("a", "body")).await.unwrap();
        let change = UpdatePost { title: Some("b".into()), content: None };

        assert!(matches!(posts.update(2, post.id, change.clone()).await, Err(ApiError::Forbidden(_))));

        let updated = posts.update(1, post.id, change).await.unwrap();
        assert_eq!(updated.title, "b");
        assert_eq!(updated.content, "body");
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let posts = service();
        let err = posts.update(1, 99, UpdatePost::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));

        let blank = UpdatePost { title: Some("".into()), content: None };
        let err = posts.update(1, 99, blank).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { errors, .. } if errors == vec!["title cannot be empty"]));
    }

    #[tokio::test]
    async fn delete_hides_the_post() {
        let posts = service();
        let post = posts.create(1, draft("a", "a")).await.unwrap();

        assert!(matches!(posts.delete(2, post.id).await, Err(ApiError::Forbidden(_))));

        let snapshot = posts.delete(1, post.id).await.unwrap();
        assert!(snapshot.is_active);
        assert!(posts.list().await.unwrap().is_empty());
        assert_eq!(posts.get(1, post.id).await.unwrap_err(), ApiError::not_found(POST_NOT_FOUND));
        assert!(matches!(posts.delete(1, post.id).await, Err(ApiError::NotFound(_))));
    }
}

use std::path::Path;

use trek_core::PostsConfig;
use trek_services::{Post, PostComposer, Uuid};

/// Post screen: the composer plus an error banner.
#[derive(Debug, Default)]
pub struct PostsModel {
    composer: PostComposer,
    banner: Option<String>,
}

impl PostsModel {
    pub fn new(config: &PostsConfig) -> Self {
        Self {
            composer: PostComposer::from_config(config),
            banner: None,
        }
    }

    pub fn composer(&self) -> &PostComposer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut PostComposer {
        &mut self.composer
    }

    pub fn posts(&self) -> &[Post] {
        self.composer.posts()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn attach_image(&mut self, path: &Path) -> bool {
        match self.composer.attach_image(path) {
            Ok(()) => {
                self.banner = None;
                true
            }
            Err(e) => {
                tracing::warn!("Image rejected: {}", e);
                self.banner = Some(e.user_message());
                false
            }
        }
    }

    /// Publish the draft. Returns the new post's id on success.
    pub fn submit(&mut self) -> Option<Uuid> {
        match self.composer.submit().map(|post| post.id) {
            Ok(id) => {
                self.banner = None;
                Some(id)
            }
            Err(e) => {
                tracing::warn!("Post rejected: {}", e);
                self.banner = Some(e.user_message());
                None
            }
        }
    }

    pub fn like(&mut self, id: Uuid) {
        if !self.composer.like(id) {
            tracing::debug!("Like for unknown post {}", id);
        }
    }
}

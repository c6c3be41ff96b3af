//! Travel post composition. Posts are kept in memory for the session.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use std::path::Path;
use trek_core::{PostError, PostsConfig};
use uuid::Uuid;

pub const DEFAULT_AUTHOR: &str = "User";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub location: String,
    pub description: String,
    /// `data:<mime>;base64,...`
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub comments: Vec<Comment>,
}

/// Draft editing plus the session's post list, newest first.
#[derive(Debug, Clone)]
pub struct PostComposer {
    draft: PostDraft,
    posts: Vec<Post>,
    max_image_bytes: u64,
    max_description_chars: usize,
}

impl Default for PostComposer {
    fn default() -> Self {
        Self::from_config(&PostsConfig::default())
    }
}

impl PostComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PostsConfig) -> Self {
        Self {
            draft: PostDraft::default(),
            posts: Vec::new(),
            max_image_bytes: config.max_image_bytes,
            max_description_chars: config.max_description_chars,
        }
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.draft.location = location.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// e.g. `42/500`
    pub fn description_counter(&self) -> String {
        format!(
            "{}/{}",
            self.draft.description.chars().count(),
            self.max_description_chars
        )
    }

    /// Read an image file into the draft as a data URL. On error the draft
    /// keeps whatever image it had.
    pub fn attach_image(&mut self, path: &Path) -> Result<(), PostError> {
        let size = std::fs::metadata(path)?.len();
        if size > self.max_image_bytes {
            return Err(PostError::ImageTooLarge {
                size,
                max: self.max_image_bytes,
            });
        }

        let mime = image_mime(path)
            .ok_or_else(|| PostError::UnsupportedImage(path.display().to_string()))?;

        let bytes = std::fs::read(path)?;
        self.draft.image = Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)));

        tracing::debug!("Attached {} ({} bytes)", path.display(), size);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.draft.image = None;
    }

    /// Publish the draft. The new post goes to the front of the list and the
    /// draft is reset.
    pub fn submit(&mut self) -> Result<&Post, PostError> {
        self.validate()?;

        let draft = std::mem::take(&mut self.draft);
        let post = Post {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            location: draft.location.trim().to_string(),
            description: draft.description.trim().to_string(),
            image: draft.image,
            author: DEFAULT_AUTHOR.to_string(),
            timestamp: Utc::now(),
            likes: 0,
            comments: Vec::new(),
        };

        tracing::info!("Created post {} at {}", post.id, post.location);
        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }

    /// Returns false for unknown ids.
    pub fn like(&mut self, id: Uuid) -> bool {
        match self.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.likes += 1;
                true
            }
            None => false,
        }
    }

    fn validate(&self) -> Result<(), PostError> {
        if self.draft.title.trim().is_empty() {
            return Err(PostError::MissingField("title"));
        }
        if self.draft.location.trim().is_empty() {
            return Err(PostError::MissingField("location"));
        }
        if self.draft.description.trim().is_empty() {
            return Err(PostError::MissingField("description"));
        }

        let len = self.draft.description.chars().count();
        if len > self.max_description_chars {
            return Err(PostError::DescriptionTooLong {
                len,
                max: self.max_description_chars,
            });
        }
        Ok(())
    }
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

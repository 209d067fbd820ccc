use serde::{Deserialize, Serialize};

use super::{Editable, Entity, EntityKind};
use crate::forms::{FormFields, FormShape};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    /// ISO date as entered by staff
    pub published_on: String,
    pub image_url: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub location: String,
    pub held_on: String,
    pub image_url: String,
    pub participants: u32,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryItem {
    pub title: String,
    pub caption: String,
    pub category: String,
    pub image_url: String,
}

impl Entity for NewsItem {
    const KIND: EntityKind = EntityKind::News;
    type Draft = Self;
}
impl Editable for NewsItem {}

impl Entity for Activity {
    const KIND: EntityKind = EntityKind::Activity;
    type Draft = Self;
}
impl Editable for Activity {}

impl Entity for Video {
    const KIND: EntityKind = EntityKind::Video;
    type Draft = Self;
}
impl Editable for Video {}

impl Entity for GalleryItem {
    const KIND: EntityKind = EntityKind::Gallery;
    type Draft = Self;
}
impl Editable for GalleryItem {}

impl FormShape for NewsItem {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let item = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("title", item.title);
        fields.set("summary", item.summary);
        fields.set("content", item.content);
        fields.set("author", item.author);
        fields.set("published_on", item.published_on);
        fields.set("image_url", item.image_url);
        fields.set_free_text("tags", &item.tags);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            title: fields.text("title"),
            summary: fields.text("summary"),
            content: fields.text("content"),
            author: fields.text("author"),
            published_on: fields.text("published_on"),
            image_url: fields.text("image_url"),
            tags: fields.free_text("tags"),
        }
    }
}

impl FormShape for Activity {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let activity = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("title", activity.title);
        fields.set("description", activity.description);
        fields.set("location", activity.location);
        fields.set("held_on", activity.held_on);
        fields.set("image_url", activity.image_url);
        fields.set_number("participants", activity.participants);
        fields.set_exact("milestones", &activity.milestones);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            title: fields.text("title"),
            description: fields.text("description"),
            location: fields.text("location"),
            held_on: fields.text("held_on"),
            image_url: fields.text("image_url"),
            participants: fields.number("participants"),
            milestones: fields.exact("milestones"),
        }
    }
}

impl FormShape for Video {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let video = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("title", video.title);
        fields.set("description", video.description);
        fields.set("video_url", video.video_url);
        fields.set("thumbnail_url", video.thumbnail_url);
        fields.set_number("duration_seconds", video.duration_seconds);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            title: fields.text("title"),
            description: fields.text("description"),
            video_url: fields.text("video_url"),
            thumbnail_url: fields.text("thumbnail_url"),
            duration_seconds: fields.number("duration_seconds"),
        }
    }
}

impl FormShape for GalleryItem {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let item = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("title", item.title);
        fields.set("caption", item.caption);
        fields.set("category", item.category);
        fields.set("image_url", item.image_url);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            title: fields.text("title"),
            caption: fields.text("caption"),
            category: fields.text("category"),
            image_url: fields.text("image_url"),
        }
    }
}

//! Reference-table loading.
//!
//! Builds the read-only keyed containers used by every item in the run.

use std::collections::HashMap;

use crate::domain::{AdditionalData, Author, ExportOptions, MediaReference, Result, Tag};
use crate::infrastructure::SiteSource;

use super::parser::{parse_author, parse_image, parse_lenient, parse_tag};

/// Immutable lookups loaded once per export run.
///
/// Disabled toggles leave the matching containers empty.
#[derive(Debug, Default)]
pub struct Lookups {
    authors: Vec<Author>,
    author_usernames: HashMap<i64, String>,
    tags: Vec<Tag>,
    tag_slugs: HashMap<i64, String>,
    post_tags: HashMap<i64, Vec<i64>>,
    additional_data: HashMap<i64, AdditionalData>,
    media: Vec<MediaReference>,
    media_by_id: HashMap<i64, usize>,
    media_by_post: HashMap<i64, Vec<usize>>,
}

impl Lookups {
    /// Loads all reference tables from `source`.
    ///
    /// # Errors
    /// Returns error if a query fails.
    pub fn load(source: &impl SiteSource, options: &ExportOptions) -> Result<Self> {
        let mut lookups = Self::default();

        if options.export_authors {
            lookups.authors = source.fetch_authors()?.into_iter().map(parse_author).collect();
            lookups.author_usernames = lookups
                .authors
                .iter()
                .map(|a| (a.id, a.username.clone()))
                .collect();
        }

        if options.export_tags {
            lookups.tags = source.fetch_tags()?.into_iter().map(parse_tag).collect();
            lookups.tag_slugs = lookups
                .tags
                .iter()
                .map(|t| (t.id, t.slug.clone()))
                .collect();
            for link in source.fetch_post_tags()? {
                lookups
                    .post_tags
                    .entry(link.post_id)
                    .or_default()
                    .push(link.tag_id);
            }
        }

        for row in source.fetch_additional_data()? {
            lookups
                .additional_data
                .entry(row.post_id)
                .or_default()
                .insert(row.key, parse_lenient(row.value.as_deref()));
        }

        if options.export_images {
            for (idx, image) in source
                .fetch_images()?
                .into_iter()
                .map(parse_image)
                .enumerate()
            {
                lookups.media_by_id.insert(image.id, idx);
                if let Some(post_id) = image.post_id {
                    lookups.media_by_post.entry(post_id).or_default().push(idx);
                }
                lookups.media.push(image);
            }
        }

        tracing::debug!(
            authors = lookups.authors.len(),
            tags = lookups.tags.len(),
            items_with_data = lookups.additional_data.len(),
            media = lookups.media.len(),
            "Loaded lookup tables"
        );

        Ok(lookups)
    }

    /// Authors in source order.
    #[must_use]
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Tags in source order.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub const fn author_usernames(&self) -> &HashMap<i64, String> {
        &self.author_usernames
    }

    #[must_use]
    pub const fn tag_slugs(&self) -> &HashMap<i64, String> {
        &self.tag_slugs
    }

    /// Tag identifiers linked to an item, in link order.
    #[must_use]
    pub fn tag_ids(&self, post_id: i64) -> &[i64] {
        self.post_tags.get(&post_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Additional data bag of an item, if it has any.
    #[must_use]
    pub fn additional_data(&self, post_id: i64) -> Option<&AdditionalData> {
        self.additional_data.get(&post_id)
    }

    /// Media record by identifier.
    #[must_use]
    pub fn media(&self, id: i64) -> Option<&MediaReference> {
        self.media_by_id.get(&id).map(|&idx| &self.media[idx])
    }

    /// Images of an item other than `featured_id` that carry a URL.
    pub fn inline_images(
        &self,
        post_id: i64,
        featured_id: Option<i64>,
    ) -> impl Iterator<Item = &MediaReference> {
        self.media_by_post
            .get(&post_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.media[idx])
            .filter(move |m| Some(m.id) != featured_id && m.has_url())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::ContentItem;
    use crate::infrastructure::sqlite_reader::{
        RawAdditionalData, RawAuthor, RawImage, RawPostTag, RawTag,
    };
    use serde_json::json;

    /// In-memory site used by the application-layer tests.
    #[derive(Default)]
    pub(crate) struct MemorySite {
        pub authors: Vec<RawAuthor>,
        pub tags: Vec<RawTag>,
        pub post_tags: Vec<RawPostTag>,
        pub additional: Vec<RawAdditionalData>,
        pub images: Vec<RawImage>,
        pub posts: Vec<ContentItem>,
    }

    impl SiteSource for MemorySite {
        fn fetch_authors(&self) -> Result<Vec<RawAuthor>> {
            Ok(self.authors.clone())
        }

        fn fetch_tags(&self) -> Result<Vec<RawTag>> {
            Ok(self.tags.clone())
        }

        fn fetch_post_tags(&self) -> Result<Vec<RawPostTag>> {
            Ok(self.post_tags.clone())
        }

        fn fetch_additional_data(&self) -> Result<Vec<RawAdditionalData>> {
            Ok(self.additional.clone())
        }

        fn fetch_images(&self) -> Result<Vec<RawImage>> {
            Ok(self.images.clone())
        }

        fn fetch_posts(&self, ids: Option<&[i64]>) -> Result<Vec<ContentItem>> {
            Ok(self
                .posts
                .iter()
                .filter(|p| ids.map_or(true, |ids| ids.is_empty() || ids.contains(&p.id)))
                .cloned()
                .collect())
        }
    }

    pub(crate) fn raw_image(id: i64, post_id: i64, url: &str) -> RawImage {
        RawImage {
            id,
            post_id: Some(post_id),
            url: Some(url.to_string()),
            title: Some(format!("Image {id}")),
            caption: None,
            additional_data: Some("{}".into()),
        }
    }

    fn site() -> MemorySite {
        MemorySite {
            authors: vec![RawAuthor {
                id: 1,
                name: Some("Ann".into()),
                username: "ann".into(),
                password: None,
                config: None,
                additional_data: None,
            }],
            tags: vec![RawTag {
                id: 5,
                name: Some("Rust".into()),
                slug: "rust".into(),
                description: None,
                additional_data: None,
            }],
            post_tags: vec![RawPostTag { post_id: 10, tag_id: 5 }],
            additional: vec![
                RawAdditionalData {
                    post_id: 10,
                    key: "_core".into(),
                    value: Some(r#"{"editor":"markdown"}"#.into()),
                },
                RawAdditionalData {
                    post_id: 10,
                    key: "seo".into(),
                    value: Some("plain text".into()),
                },
            ],
            images: vec![
                raw_image(1, 10, "media/posts/10/cover.jpg"),
                raw_image(2, 10, "media/posts/10/inline.png"),
                raw_image(3, 10, ""),
                raw_image(4, 11, "media/posts/11/other.png"),
            ],
            posts: Vec::new(),
        }
    }

    #[test]
    fn test_load_builds_all_mappings() {
        let lookups = Lookups::load(&site(), &ExportOptions::default()).unwrap();

        assert_eq!(lookups.author_usernames().get(&1).map(String::as_str), Some("ann"));
        assert_eq!(lookups.tag_slugs().get(&5).map(String::as_str), Some("rust"));
        assert_eq!(lookups.tag_ids(10), &[5_i64]);
        assert!(lookups.tag_ids(99).is_empty());

        let data = lookups.additional_data(10).unwrap();
        assert_eq!(data["_core"], json!({ "editor": "markdown" }));
        assert_eq!(data["seo"], json!("plain text"));
        let keys: Vec<_> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["_core", "seo"]);

        assert_eq!(lookups.media(2).map(MediaReference::filename), Some("inline.png"));
    }

    #[test]
    fn test_inline_images_exclude_featured_and_empty_urls() {
        let lookups = Lookups::load(&site(), &ExportOptions::default()).unwrap();

        let ids: Vec<_> = lookups.inline_images(10, Some(1)).map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);

        let ids: Vec<_> = lookups.inline_images(10, None).map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(lookups.inline_images(12, None).count(), 0);
    }

    #[test]
    fn test_image_without_owner_is_addressable_by_id() {
        let mut site = site();
        site.images.push(RawImage {
            post_id: None,
            ..raw_image(20, 0, "media/posts/10/orphan.jpg")
        });
        let lookups = Lookups::load(&site, &ExportOptions::default()).unwrap();

        assert_eq!(lookups.media(20).map(MediaReference::filename), Some("orphan.jpg"));
        let ids: Vec<_> = lookups.inline_images(10, Some(1)).map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_disabled_toggles_yield_empty_mappings() {
        let options = ExportOptions {
            export_authors: false,
            export_tags: false,
            export_images: false,
            ..ExportOptions::default()
        };
        let lookups = Lookups::load(&site(), &options).unwrap();

        assert!(lookups.authors().is_empty());
        assert!(lookups.author_usernames().is_empty());
        assert!(lookups.tags().is_empty());
        assert!(lookups.tag_ids(10).is_empty());
        assert!(lookups.media(1).is_none());
        assert!(lookups.additional_data(10).is_some());
    }
}

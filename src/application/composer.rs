//! Metadata composition.
//!
//! Joins an item with the lookup tables into its `ExportRecord`.

use std::collections::HashMap;

use crate::domain::{ContentItem, ExportOptions, ExportRecord, FeaturedImage, MediaReference};

use super::lookup::Lookups;

/// Parses the comma-separated author field, ignoring blank and non-numeric
/// tokens.
#[must_use]
pub fn parse_author_ids(field: Option<&str>) -> Vec<i64> {
    field
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::debug!("Ignoring non-numeric author id '{}'", token);
                None
            }
        })
        .collect()
}

/// Maps identifiers through `map`, dropping unknown ones and keeping order.
#[must_use]
pub fn resolve(ids: &[i64], map: &HashMap<i64, String>) -> Vec<String> {
    ids.iter().filter_map(|id| map.get(id).cloned()).collect()
}

/// The item's featured media record, when images are enabled and it is known.
#[must_use]
pub fn featured_media<'a>(item: &ContentItem, lookups: &'a Lookups) -> Option<&'a MediaReference> {
    item.featured_image_id.and_then(|id| lookups.media(id))
}

/// Builds the metadata record for one item.
#[must_use]
pub fn compose(item: &ContentItem, lookups: &Lookups, options: &ExportOptions) -> ExportRecord {
    let authors = resolve(
        &parse_author_ids(item.authors.as_deref()),
        lookups.author_usernames(),
    );
    let tags = resolve(lookups.tag_ids(item.id), lookups.tag_slugs());

    let featured_image = if options.export_images {
        featured_media(item, lookups).map(|media| FeaturedImage {
            filename: media.filename().to_string(),
            title: media.title.clone(),
            caption: media.caption.clone(),
            additional_data: media.additional_data.clone(),
        })
    } else {
        None
    };

    ExportRecord {
        title: item.title.clone(),
        status: item.status.clone(),
        template: item.template.clone(),
        created_at: item.created_at.clone(),
        modified_at: item.modified_at.clone(),
        authors,
        tags,
        additional_data: lookups.additional_data(item.id).cloned().unwrap_or_default(),
        featured_image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::lookup::tests::{raw_image, MemorySite};
    use crate::infrastructure::sqlite_reader::{RawAuthor, RawPostTag, RawTag};
    use serde_json::{json, Value};

    fn item(id: i64, authors: Option<&str>, featured: Option<i64>) -> ContentItem {
        ContentItem {
            id,
            slug: format!("item-{id}"),
            title: Some(format!("Item {id}")),
            status: Some("published".into()),
            template: None,
            created_at: json!(1_700_000_000_000_i64),
            modified_at: json!(1_700_000_100_000_i64),
            text: Some(String::new()),
            authors: authors.map(str::to_string),
            featured_image_id: featured,
        }
    }

    fn author(id: i64, username: &str) -> RawAuthor {
        RawAuthor {
            id,
            name: None,
            username: username.into(),
            password: None,
            config: None,
            additional_data: None,
        }
    }

    fn tag(id: i64, slug: &str) -> RawTag {
        RawTag {
            id,
            name: None,
            slug: slug.into(),
            description: None,
            additional_data: None,
        }
    }

    fn site() -> MemorySite {
        MemorySite {
            authors: vec![author(1, "ann"), author(2, "bob")],
            tags: vec![tag(7, "rust"), tag(8, "cli")],
            post_tags: vec![
                RawPostTag { post_id: 1, tag_id: 8 },
                RawPostTag { post_id: 1, tag_id: 99 },
                RawPostTag { post_id: 1, tag_id: 7 },
            ],
            images: vec![raw_image(5, 1, "media/posts/1/cover.webp")],
            ..MemorySite::default()
        }
    }

    #[test]
    fn test_parse_author_ids() {
        assert_eq!(parse_author_ids(Some("1,2")), vec![1, 2]);
        assert_eq!(parse_author_ids(Some(" 3 , ,4,")), vec![3, 4]);
        assert_eq!(parse_author_ids(Some("x,5")), vec![5]);
        assert!(parse_author_ids(Some("")).is_empty());
        assert!(parse_author_ids(None).is_empty());
    }

    #[test]
    fn test_resolve_is_order_preserving_filter() {
        let map = HashMap::from([(1, "a".to_string()), (2, "b".to_string())]);
        assert_eq!(resolve(&[2, 9, 1, 2], &map), vec!["b", "a", "b"]);
        assert!(resolve(&[9], &map).is_empty());
        assert!(resolve(&[1], &HashMap::new()).is_empty());
    }

    #[test]
    fn test_compose_resolves_authors_and_tags() {
        let options = ExportOptions::default();
        let lookups = Lookups::load(&site(), &options).unwrap();

        let record = compose(&item(1, Some("2,42,1"), None), &lookups, &options);

        assert_eq!(record.authors, vec!["bob", "ann"]);
        assert_eq!(record.tags, vec!["cli", "rust"]);
        assert!(record.additional_data.is_empty());
        assert!(record.featured_image.is_none());
    }

    #[test]
    fn test_compose_attaches_featured_descriptor() {
        let options = ExportOptions::default();
        let lookups = Lookups::load(&site(), &options).unwrap();

        let record = compose(&item(1, None, Some(5)), &lookups, &options);
        let featured = record.featured_image.unwrap();

        assert_eq!(featured.filename, "cover.webp");
        assert_eq!(featured.title.as_deref(), Some("Image 5"));
        assert_eq!(featured.additional_data, json!({}));
    }

    #[test]
    fn test_compose_without_images_has_no_featured_key() {
        let options = ExportOptions {
            export_images: false,
            ..ExportOptions::default()
        };
        let lookups = Lookups::load(&site(), &options).unwrap();

        let record = compose(&item(1, None, Some(5)), &lookups, &options);
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("featured_image").is_none());
    }

    #[test]
    fn test_record_key_order() {
        let options = ExportOptions::default();
        let lookups = Lookups::load(&site(), &options).unwrap();
        let record = compose(&item(1, Some("1"), Some(5)), &lookups, &options);

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<_> = match &json {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };

        assert_eq!(
            keys,
            vec![
                "title",
                "status",
                "template",
                "created_at",
                "modified_at",
                "authors",
                "tags",
                "additional_data",
                "featured_image"
            ]
        );
    }
}

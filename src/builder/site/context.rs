use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;

use chrono::NaiveDateTime;
use futures_util::future::{self, BoxFuture};
use log::debug;

use crate::builder::page::Page;
use crate::liquid::{json_to_liquid, page_to_liquid};
use crate::utils::date::parse_date;
use crate::utils::error::{BoxResult, PagemillError, Result};

/// Data shared by every page during rendering: the collections plus whatever
/// the context processor adds.
#[derive(Debug, Clone, Default)]
pub struct Context {
    collections: BTreeMap<String, Vec<Page>>,
    values: BTreeMap<String, serde_json::Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, name: &str) -> Option<&[Page]> {
        self.collections.get(name).map(Vec::as_slice)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Vec<Page>> {
        self.collections.get_mut(name)
    }

    pub fn collections(&self) -> &BTreeMap<String, Vec<Page>> {
        &self.collections
    }

    pub fn collections_mut(&mut self) -> &mut BTreeMap<String, Vec<Page>> {
        &mut self.collections
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Add a derived value. A key equal to a collection name hides that
    /// collection from templates.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) -> Option<serde_json::Value> {
        self.values.insert(key.into(), value)
    }

    pub fn values(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.values
    }

    /// Template view: one array per collection, then every added value.
    /// Added values shadow collections of the same name.
    pub fn to_liquid(&self) -> liquid::Object {
        let mut obj = liquid::Object::new();
        for (name, pages) in &self.collections {
            let pages = pages
                .iter()
                .map(|page| liquid::model::Value::Object(page_to_liquid(page)))
                .collect();
            obj.insert(name.clone().into(), liquid::model::Value::Array(pages));
        }
        for (key, value) in &self.values {
            obj.insert(key.clone().into(), json_to_liquid(value));
        }
        obj
    }
}

/// Caller-supplied transformation applied to the assembled context.
///
/// This is the one place to compute data that spans pages, such as formatted
/// dates or feed timestamps. It runs once per build, before any page renders,
/// and is awaited, so it may do I/O. Closures returning a future implement it.
pub trait ContextProcessor: Send + Sync {
    fn process(&self, context: Context) -> BoxFuture<'_, BoxResult<Context>>;
}

impl<F, Fut> ContextProcessor for F
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = BoxResult<Context>> + Send + 'static,
{
    fn process(&self, context: Context) -> BoxFuture<'_, BoxResult<Context>> {
        Box::pin(self(context))
    }
}

/// Context processor that returns its input
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProcessor;

impl ContextProcessor for IdentityProcessor {
    fn process(&self, context: Context) -> BoxFuture<'_, BoxResult<Context>> {
        let result: BoxResult<Context> = Ok(context);
        Box::pin(future::ready(result))
    }
}

/// Group dated pages into collections and run the context processor.
///
/// Only pages with a non-empty `published_date` are considered. They are
/// ordered newest first and each lands in the first configured collection
/// whose directory (`<pages_dir>/<name>`) contains it. Every configured
/// collection is present in the result, possibly empty. `site` is exposed to
/// the processor and to templates under the `site` key.
pub async fn build_context(
    pages: &[Page],
    collection_names: &[String],
    pages_dir: &Path,
    site: &BTreeMap<String, serde_json::Value>,
    processor: &dyn ContextProcessor,
) -> Result<Context> {
    let mut context = Context::new();
    for name in collection_names {
        context.collections.entry(name.clone()).or_default();
    }
    context.insert("site", serde_json::Value::Object(site.clone().into_iter().collect()));

    let mut dated: Vec<(&Page, Option<NaiveDateTime>)> = pages
        .iter()
        .filter_map(|page| {
            page.front_matter
                .published_date()
                .map(|date| (page, parse_date(&date)))
        })
        .collect();

    dated.sort_by(|(_, a), (_, b)| compare_newest_first(a, b));

    let roots: Vec<(&String, std::path::PathBuf)> = collection_names
        .iter()
        .map(|name| (name, pages_dir.join(name)))
        .collect();

    for (page, _) in dated {
        match roots.iter().find(|(_, root)| page.path.starts_with(root)) {
            Some((name, _)) => {
                if let Some(members) = context.collections.get_mut(name.as_str()) {
                    members.push(page.clone());
                }
            }
            None => debug!("{} is dated but in no collection", page.path.display()),
        }
    }

    for (name, members) in &context.collections {
        debug!("Collection '{}' has {} pages", name, members.len());
    }

    processor
        .process(context)
        .await
        .map_err(|e| PagemillError::Context(e.to_string()))
}

// Unparseable dates go after every parseable one.
fn compare_newest_first(a: &Option<NaiveDateTime>, b: &Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_matter::FrontMatter;
    use std::path::PathBuf;

    fn page(path: &str, date: Option<&str>) -> Page {
        let mut front_matter = FrontMatter::default();
        if let Some(date) = date {
            front_matter.insert("published_date", date);
        }
        Page {
            path: PathBuf::from(path),
            slug: String::from("/"),
            front_matter,
            content: String::new(),
        }
    }

    fn names(pages: &[Page]) -> Vec<String> {
        pages.iter().map(|p| p.path.display().to_string()).collect()
    }

    async fn build(pages: &[Page], collections: &[&str]) -> Context {
        let collections: Vec<String> = collections.iter().map(|s| s.to_string()).collect();
        build_context(
            pages,
            &collections,
            Path::new("/site/pages"),
            &BTreeMap::new(),
            &IdentityProcessor,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_collection_sorted_newest_first() {
        let pages = vec![
            page("/site/pages/posts/a.md", Some("2024-01-01")),
            page("/site/pages/posts/b.md", Some("2023-06-01")),
            page("/site/pages/posts/c.md", Some("2024-06-01")),
        ];
        let context = build(&pages, &["posts"]).await;
        assert_eq!(
            names(context.collection("posts").unwrap()),
            vec!["/site/pages/posts/c.md", "/site/pages/posts/a.md", "/site/pages/posts/b.md"]
        );
    }

    #[tokio::test]
    async fn test_undated_pages_excluded() {
        let pages = vec![
            page("/site/pages/posts/dated.md", Some("2024-01-01")),
            page("/site/pages/posts/undated.md", None),
            page("/site/pages/posts/blank.md", Some("  ")),
        ];
        let context = build(&pages, &["posts"]).await;
        assert_eq!(names(context.collection("posts").unwrap()), vec!["/site/pages/posts/dated.md"]);
    }

    #[tokio::test]
    async fn test_first_matching_collection_wins() {
        let pages = vec![page("/site/pages/posts/recipes/soup.md", Some("2024-01-01"))];
        let context = build(&pages, &["posts", "posts/recipes"]).await;
        assert_eq!(context.collection("posts").unwrap().len(), 1);
        assert!(context.collection("posts/recipes").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_membership_is_by_path_segment() {
        let pages = vec![
            page("/site/pages/posts-archive/old.md", Some("2020-01-01")),
            page("/site/pages/about.md", Some("2020-01-01")),
        ];
        let context = build(&pages, &["posts"]).await;
        assert!(context.collection("posts").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_dates_sort_last() {
        let pages = vec![
            page("/site/pages/posts/bad.md", Some("someday")),
            page("/site/pages/posts/good.md", Some("2021-03-04 10:00:00")),
        ];
        let context = build(&pages, &["posts"]).await;
        assert_eq!(
            names(context.collection("posts").unwrap()),
            vec!["/site/pages/posts/good.md", "/site/pages/posts/bad.md"]
        );
    }

    #[tokio::test]
    async fn test_processor_adds_keys() {
        let pages = vec![page("/site/pages/posts/a.md", Some("2024-01-01"))];
        let processor = |mut context: Context| {
            let count = context.collection("posts").map_or(0, |p| p.len());
            context.insert("post_count", serde_json::json!(count));
            future::ready(BoxResult::<Context>::Ok(context))
        };
        let context = build_context(
            &pages,
            &["posts".to_string()],
            Path::new("/site/pages"),
            &BTreeMap::new(),
            &processor,
        )
        .await
        .unwrap();
        assert_eq!(context.get("post_count"), Some(&serde_json::json!(1)));
    }

    #[tokio::test]
    async fn test_to_liquid_values_shadow_collections() {
        use liquid::ValueView;

        let pages = vec![page("/site/pages/posts/a.md", Some("2024-01-01"))];
        let mut context = build(&pages, &["posts", "notes"]).await;
        assert_eq!(context.to_liquid().get("posts").unwrap().as_array().unwrap().size(), 1);
        assert!(context.to_liquid().get("site").unwrap().is_object());

        context.insert("notes", serde_json::json!("hidden"));
        assert_eq!(context.to_liquid().get("notes").unwrap().to_kstr().as_str(), "hidden");
    }

    #[tokio::test]
    async fn test_processor_failure_is_fatal() {
        let processor =
            |_context: Context| future::ready(BoxResult::<Context>::Err("no feed for you".into()));
        let err = build_context(&[], &[], Path::new("/site/pages"), &BTreeMap::new(), &processor)
            .await
            .unwrap_err();
        assert!(matches!(err, PagemillError::Context(_)));
    }
}

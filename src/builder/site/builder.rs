use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future;
use log::{debug, error, info, warn};
use tokio::sync::Semaphore;

use crate::builder::page::{collect_pages, Page};
use crate::builder::scripts::{BuildScript, ScriptRegistry};
use crate::builder::site::context::{build_context, Context, ContextProcessor, IdentityProcessor};
use crate::builder::site::converter::convert_markdown_pages;
use crate::builder::site::loader::{load_partials, load_templates};
use crate::builder::site::output::resolve_output_path;
use crate::builder::site::renderer::{render_to_file, RenderEnv, RenderError};
use crate::builder::site::report::{BuildReport, PageOutcome};
use crate::config::{Config, FailurePolicy};
use crate::directory::{clean_directory_async, copy_public_dir_async};
use crate::front_matter::FrontMatter;
use crate::liquid::ScopeObject;
use crate::markdown::{plugin_by_name, MarkdownConverter, MarkdownPlugin};
use crate::minify::{HtmlMinifier, Minifier, NoopMinifier};
use crate::utils::error::{BoxResult, PagemillError, Result};

/// A configured site build.
///
/// Holds the configuration plus the programmatic extension points: the
/// context processor, build scripts, markdown plugins and the minifier.
/// Every call to [`Pipeline::build`] is a full rebuild.
pub struct Pipeline {
    config: Config,
    processor: Arc<dyn ContextProcessor>,
    scripts: ScriptRegistry,
    converter: MarkdownConverter,
    minifier: Arc<dyn Minifier>,
}

impl Pipeline {
    /// Create a pipeline, enabling the markdown plugins named in the config
    pub fn new(config: Config) -> Result<Self> {
        let mut converter = MarkdownConverter::new();
        for name in &config.markdown_plugins {
            let plugin = plugin_by_name(name)
                .ok_or_else(|| PagemillError::Config(format!("Unknown markdown plugin: '{}'", name)))?;
            converter.add_plugin(plugin);
        }

        let minifier: Arc<dyn Minifier> = if config.minify {
            Arc::new(HtmlMinifier::new(config.minify_options.clone()))
        } else {
            Arc::new(NoopMinifier)
        };

        Ok(Pipeline {
            config,
            processor: Arc::new(IdentityProcessor),
            scripts: ScriptRegistry::new(),
            converter,
            minifier,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }

    /// Set the context processor from a synchronous closure
    pub fn context_processor<F>(self, processor: F) -> Self
    where
        F: Fn(Context) -> BoxResult<Context> + Send + Sync + 'static,
    {
        self.async_context_processor(move |context: Context| future::ready(processor(context)))
    }

    /// Set the context processor from a closure returning a future
    pub fn async_context_processor<F, Fut>(self, processor: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BoxResult<Context>> + Send + 'static,
    {
        self.with_context_processor(Arc::new(processor))
    }

    pub fn with_context_processor(mut self, processor: Arc<dyn ContextProcessor>) -> Self {
        self.processor = processor;
        self
    }

    /// Register a build script closure under `id`
    pub fn build_script<F>(mut self, id: impl Into<String>, script: F) -> Result<Self>
    where
        F: Fn(String, &FrontMatter, &str) -> BoxResult<String> + Send + Sync + 'static,
    {
        self.scripts.register_fn(id, script)?;
        Ok(self)
    }

    /// Register a build script closure returning a future
    pub fn async_build_script<F, Fut>(mut self, id: impl Into<String>, script: F) -> Result<Self>
    where
        F: Fn(String, FrontMatter, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BoxResult<String>> + Send + 'static,
    {
        self.scripts.register_async(id, script)?;
        Ok(self)
    }

    pub fn with_build_script(mut self, id: impl Into<String>, script: Arc<dyn BuildScript>) -> Result<Self> {
        self.scripts.register(id, script)?;
        Ok(self)
    }

    /// Add a markdown plugin after those enabled in the config
    pub fn markdown_plugin(mut self, plugin: Arc<dyn MarkdownPlugin>) -> Self {
        self.converter.add_plugin(plugin);
        self
    }

    /// Replace the minifier chosen from the config
    pub fn minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.minifier = minifier;
        self
    }

    /// Run a full build.
    ///
    /// Loading, templating and context errors abort the build. Page errors
    /// are collected in the report; with [`FailurePolicy::FailBuild`] any page
    /// error fails the build once every page has been attempted.
    pub async fn build(&self) -> Result<BuildReport> {
        let start_time = Instant::now();
        let config = &self.config;
        let concurrency = config.concurrency.max(1);

        info!("Building {} into {}", config.source.display(), config.out_dir.display());

        if config.clean_output {
            clean_directory_async(&config.out_dir).await?;
        }

        let (pages, templates, partials, assets_copied) = tokio::try_join!(
            collect_pages(&config.pages_dir, concurrency),
            load_templates(&config.templates_dir, config.strict_names, concurrency),
            load_partials(&config.partials_dir, config.strict_names, concurrency),
            async {
                copy_public_dir_async(&config.public_dir, &config.out_dir)
                    .await
                    .map_err(PagemillError::from)
            },
        )?;
        info!(
            "Loaded {} pages, {} templates, {} partials",
            pages.len(),
            templates.len(),
            partials.len()
        );

        let pages =
            convert_markdown_pages(pages, Arc::new(self.converter.clone()), concurrency).await?;

        let context = build_context(
            &pages,
            &config.collections,
            &config.pages_dir,
            &config.site,
            self.processor.as_ref(),
        )
        .await?;

        let (template_count, partial_count) = (templates.len(), partials.len());
        let env = Arc::new(RenderEnv {
            templates,
            partials,
            context: ScopeObject::from(&context.to_liquid()).into(),
            scripts: self.scripts.clone(),
            minifier: Arc::clone(&self.minifier),
        });

        let jobs = group_by_destination(pages, config);
        let outcomes = render_all(jobs, env, concurrency).await;

        let report = BuildReport {
            outcomes,
            templates: template_count,
            partials: partial_count,
            assets_copied,
            duration: start_time.elapsed(),
        };
        report.log_summary();

        match config.failure_policy {
            FailurePolicy::FailBuild if !report.is_success() => Err(PagemillError::PageFailures {
                failed: report.failed(),
                total: report.total(),
            }),
            _ => Ok(report),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("scripts", &self.scripts)
            .field("converter", &self.converter)
            .field("minifier", &self.minifier)
            .finish()
    }
}

/// Build a site with the default extension points
pub async fn build_site(config: &Config) -> Result<BuildReport> {
    Pipeline::new(config.clone())?.build().await
}

/// Pages sharing a destination are rendered by one task, in source path
/// order, so the last of them deterministically ends up on disk.
fn group_by_destination(pages: Vec<Page>, config: &Config) -> BTreeMap<PathBuf, Vec<Page>> {
    let mut groups: BTreeMap<PathBuf, Vec<Page>> = BTreeMap::new();

    for page in pages {
        let destination = resolve_output_path(&config.out_dir, &page.slug);
        if let Some(previous) = groups.get(&destination).and_then(|group| group.last()) {
            warn!(
                "{} and {} both write {}",
                previous.path.display(),
                page.path.display(),
                destination.display()
            );
        }
        groups.entry(destination).or_default().push(page);
    }

    groups
}

async fn render_all(
    jobs: BTreeMap<PathBuf, Vec<Page>>,
    env: Arc<RenderEnv>,
    concurrency: usize,
) -> Vec<PageOutcome> {
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(jobs.len());

    for (destination, group) in jobs {
        let identities: Vec<(PathBuf, String)> =
            group.iter().map(|p| (p.path.clone(), p.slug.clone())).collect();
        let sem = Arc::clone(&semaphore);
        let env = Arc::clone(&env);
        let task_destination = destination.clone();

        let handle = tokio::spawn(async move {
            let permit = sem.acquire_owned().await;
            let mut outcomes = Vec::with_capacity(group.len());

            for page in group {
                let result = match &permit {
                    Ok(_) => render_to_file(&page, &task_destination, &env).await,
                    Err(_) => Err(RenderError::Cancelled),
                };
                if let Err(e) = &result {
                    error!("Failed to build {}: {}", page.path.display(), e);
                }
                outcomes.push(PageOutcome {
                    path: page.path,
                    slug: page.slug,
                    destination: task_destination.clone(),
                    result,
                });
            }
            outcomes
        });
        handles.push((identities, destination, handle));
    }

    let mut outcomes = Vec::new();
    for (identities, destination, handle) in handles {
        match handle.await {
            Ok(mut group_outcomes) => outcomes.append(&mut group_outcomes),
            Err(e) => {
                error!("Render task for {} failed: {}", destination.display(), e);
                for (path, slug) in identities {
                    outcomes.push(PageOutcome {
                        path,
                        slug,
                        destination: destination.clone(),
                        result: Err(RenderError::Panicked(e.to_string())),
                    });
                }
            }
        }
    }

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Rendered {} pages", outcomes.len());
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn site() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pages/posts")).unwrap();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::create_dir_all(root.join("partials")).unwrap();
        fs::create_dir_all(root.join("public")).unwrap();

        fs::write(root.join("templates/post.html"), "<article>{% include \"content\" %}</article>").unwrap();
        fs::write(root.join("partials/nav.html"), "<nav>{{ context.site.name }}</nav>").unwrap();
        fs::write(root.join("public/robots.txt"), "User-agent: *").unwrap();
        fs::write(
            root.join("pages/index.html"),
            "{% include \"nav\" %}{% for p in context.posts %}<a href=\"{{ p.slug }}\">{{ p.title }}</a>{% endfor %}",
        )
        .unwrap();
        fs::write(
            root.join("pages/posts/first.md"),
            "---\ntitle: First\npublished_date: 2024-01-01\ntemplate: post\n---\n# First\n",
        )
        .unwrap();

        let mut config = Config::for_site(root);
        config.minify = false;
        config.site.insert("name".into(), serde_json::json!("Mill"));
        (dir, config)
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join("dist").join(rel)).unwrap()
    }

    #[tokio::test]
    async fn test_build_writes_pages_and_assets() {
        let (dir, config) = site();
        let report = build_site(&config).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.total(), 2);
        assert_eq!(report.assets_copied, 1);
        assert_eq!(
            read(dir.path(), "index.html"),
            "<nav>Mill</nav><a href=\"/posts/first/\">First</a>"
        );
        assert_eq!(read(dir.path(), "posts/first/index.html"), "<article><h1>First</h1>\n</article>");
        assert_eq!(read(dir.path(), "robots.txt"), "User-agent: *");
    }

    #[tokio::test]
    async fn test_clean_output_removes_stale_files() {
        let (dir, config) = site();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/stale.html"), "old").unwrap();

        build_site(&config).await.unwrap();
        assert!(!dir.path().join("dist/stale.html").exists());
    }

    #[tokio::test]
    async fn test_context_processor_and_build_script() {
        let (dir, config) = site();
        fs::write(
            dir.path().join("pages/about.html"),
            "---\nbuildScript: sign\n---\n<p>{{ context.count }}</p>",
        )
        .unwrap();

        let pipeline = Pipeline::new(config)
            .unwrap()
            .context_processor(|mut context: Context| {
                let count = context.collection("posts").map_or(0, |p| p.len());
                context.insert("count", serde_json::json!(count));
                Ok(context)
            })
            .build_script("sign", |html: String, _: &FrontMatter, slug: &str| {
                Ok(format!("{}<!-- {} -->", html, slug))
            })
            .unwrap();

        pipeline.build().await.unwrap();
        assert_eq!(read(dir.path(), "about/index.html"), "<p>1</p><!-- /about/ -->");
    }

    #[tokio::test]
    async fn test_failure_policy() {
        let (dir, mut config) = site();
        fs::write(dir.path().join("pages/broken.html"), "---\ntemplate: missing\n---\nx").unwrap();

        let report = build_site(&config).await.unwrap();
        assert_eq!(report.failed(), 1);
        assert!(dir.path().join("dist/index.html").exists());

        config.failure_policy = FailurePolicy::FailBuild;
        let err = build_site(&config).await.unwrap_err();
        assert!(matches!(err, PagemillError::PageFailures { failed: 1, total: 3 }));
    }

    #[tokio::test]
    async fn test_panicking_build_script_is_isolated() {
        let (dir, config) = site();
        fs::write(dir.path().join("pages/boom.html"), "---\nbuildScript: boom\n---\nx").unwrap();

        let report = Pipeline::new(config)
            .unwrap()
            .build_script("boom", |_: String, _: &FrontMatter, _: &str| -> BoxResult<String> {
                panic!("script bug")
            })
            .unwrap()
            .build()
            .await
            .unwrap();

        assert_eq!(report.failed(), 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.slug, "/boom/");
        assert!(matches!(failure.result, Err(RenderError::Panicked(_))));
        assert!(dir.path().join("dist/index.html").exists());
    }

    #[tokio::test]
    async fn test_async_extension_points() {
        let (dir, config) = site();
        fs::write(dir.path().join("banner.txt"), "Sale").unwrap();
        fs::write(
            dir.path().join("pages/shop.html"),
            "---\nbuildScript: banner\n---\n<p>{{ context.banner }}</p>",
        )
        .unwrap();
        let banner = dir.path().join("banner.txt");
        let footer = banner.clone();

        Pipeline::new(config)
            .unwrap()
            .async_context_processor(move |mut context: Context| {
                let banner = banner.clone();
                async move {
                    let text = tokio::fs::read_to_string(&banner).await?;
                    context.insert("banner", serde_json::json!(text));
                    Ok::<_, Box<dyn std::error::Error + Send + Sync>>(context)
                }
            })
            .async_build_script("banner", move |html: String, _: FrontMatter, _: String| {
                let footer = footer.clone();
                async move {
                    let text = tokio::fs::read_to_string(&footer).await?;
                    Ok::<_, Box<dyn std::error::Error + Send + Sync>>(format!("{}<footer>{}</footer>", html, text))
                }
            })
            .unwrap()
            .build()
            .await
            .unwrap();

        assert_eq!(read(dir.path(), "shop/index.html"), "<p>Sale</p><footer>Sale</footer>");
    }

    #[tokio::test]
    async fn test_missing_site_values_render_empty() {
        let (dir, mut config) = site();
        config.site.clear();

        let report = build_site(&config).await.unwrap();
        assert!(report.is_success());
        assert!(read(dir.path(), "index.html").starts_with("<nav></nav>"));
    }

    #[tokio::test]
    async fn test_duplicate_destinations_last_in_path_order_wins() {
        let (dir, config) = site();
        fs::write(dir.path().join("pages/a.html"), "---\npermalink: /same/\n---\nA").unwrap();
        fs::write(dir.path().join("pages/b.html"), "---\npermalink: /same/\n---\nB").unwrap();

        let report = build_site(&config).await.unwrap();
        assert!(report.is_success());
        assert_eq!(read(dir.path(), "same/index.html"), "B");
    }

    #[tokio::test]
    async fn test_name_collision_is_fatal() {
        let (dir, config) = site();
        fs::create_dir_all(dir.path().join("partials/more")).unwrap();
        fs::write(dir.path().join("partials/more/nav.html"), "dup").unwrap();

        let err = build_site(&config).await.unwrap_err();
        assert!(matches!(err, PagemillError::NameCollision { .. }));
    }
}

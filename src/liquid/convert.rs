use liquid::model::Value as LiquidValue;
use liquid::Object;
use serde_yaml::Value as YamlValue;

use crate::builder::page::Page;

/// Keys every page object carries; front matter never overrides them
pub const PAGE_FIXED_KEYS: [&str; 4] = ["path", "slug", "content", "frontmatter"];

/// Convert YAML value to Liquid value
pub fn yaml_to_liquid(yaml: &YamlValue) -> LiquidValue {
    match yaml {
        YamlValue::Null => LiquidValue::Nil,
        YamlValue::Bool(b) => LiquidValue::scalar(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                LiquidValue::scalar(i)
            } else if let Some(f) = n.as_f64() {
                LiquidValue::scalar(f)
            } else {
                LiquidValue::scalar(n.to_string())
            }
        }
        YamlValue::String(s) => LiquidValue::scalar(s.clone()),
        YamlValue::Sequence(seq) => LiquidValue::Array(seq.iter().map(yaml_to_liquid).collect()),
        YamlValue::Mapping(map) => {
            let mut obj = Object::new();
            for (k, v) in map {
                let key = match k {
                    YamlValue::String(key) => key.clone(),
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    other => format!("{:?}", other),
                };
                obj.insert(key.into(), yaml_to_liquid(v));
            }
            LiquidValue::Object(obj)
        }
        YamlValue::Tagged(tagged) => yaml_to_liquid(&tagged.value),
    }
}

/// Convert JSON value to Liquid value
pub fn json_to_liquid(json: &serde_json::Value) -> LiquidValue {
    match json {
        serde_json::Value::Null => LiquidValue::Nil,
        serde_json::Value::Bool(b) => LiquidValue::scalar(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                LiquidValue::scalar(i)
            } else if let Some(f) = n.as_f64() {
                LiquidValue::scalar(f)
            } else {
                LiquidValue::scalar(n.to_string())
            }
        }
        serde_json::Value::String(s) => LiquidValue::scalar(s.clone()),
        serde_json::Value::Array(arr) => LiquidValue::Array(arr.iter().map(json_to_liquid).collect()),
        serde_json::Value::Object(map) => {
            let mut obj = Object::new();
            for (k, v) in map {
                obj.insert(k.clone().into(), json_to_liquid(v));
            }
            LiquidValue::Object(obj)
        }
    }
}

/// Template view of a page.
///
/// Front matter is available both under `frontmatter` and directly on the
/// page, so `{{ page.title }}` and `{{ page.frontmatter.title }}` agree.
pub fn page_to_liquid(page: &Page) -> Object {
    let mut front_matter = Object::new();
    for (key, value) in &page.front_matter {
        front_matter.insert(key.clone().into(), yaml_to_liquid(value));
    }

    let mut obj = Object::new();
    for (key, value) in &front_matter {
        if !PAGE_FIXED_KEYS.contains(&key.as_str()) {
            obj.insert(key.clone(), value.clone());
        }
    }

    obj.insert("path".into(), LiquidValue::scalar(page.path.display().to_string()));
    obj.insert("slug".into(), LiquidValue::scalar(page.slug.clone()));
    obj.insert("content".into(), LiquidValue::scalar(page.content.clone()));
    obj.insert("frontmatter".into(), LiquidValue::Object(front_matter));

    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_matter::FrontMatter;
    use liquid::ValueView;
    use std::path::PathBuf;

    #[test]
    fn test_yaml_nested_values() {
        let yaml: YamlValue = serde_yaml::from_str("tags: [a, b]\nauthor:\n  name: Ann\ncount: 2").unwrap();
        let value = yaml_to_liquid(&yaml);
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("tags").unwrap().as_array().unwrap().size(), 2);
        assert_eq!(
            obj.get("author").unwrap().as_object().unwrap().get("name").unwrap().to_kstr().as_str(),
            "Ann"
        );
        assert_eq!(obj.get("count").unwrap().to_kstr().as_str(), "2");
    }

    #[test]
    fn test_json_values() {
        let value = json_to_liquid(&serde_json::json!({"title": "Site", "n": 1.5, "flags": [true]}));
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("title").unwrap().to_kstr().as_str(), "Site");
        assert_eq!(obj.get("n").unwrap().to_kstr().as_str(), "1.5");
    }

    #[test]
    fn test_page_object() {
        let mut front_matter = FrontMatter::default();
        front_matter.insert("title", "Hello");
        front_matter.insert("slug", "/sneaky/");
        let page = Page {
            path: PathBuf::from("/site/pages/hello.md"),
            slug: "/hello/".into(),
            front_matter,
            content: "<p>hi</p>".into(),
        };

        let obj = page_to_liquid(&page);
        assert_eq!(obj.get("title").unwrap().to_kstr().as_str(), "Hello");
        assert_eq!(obj.get("slug").unwrap().to_kstr().as_str(), "/hello/");
        assert_eq!(obj.get("content").unwrap().to_kstr().as_str(), "<p>hi</p>");
        assert_eq!(obj.get("path").unwrap().to_kstr().as_str(), "/site/pages/hello.md");

        let fm = obj.get("frontmatter").unwrap().as_object().unwrap();
        assert_eq!(fm.get("slug").unwrap().to_kstr().as_str(), "/sneaky/");
    }
}

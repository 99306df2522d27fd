//! Template engine for rendering site pages.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::page::{CategoryView, HomeView, NavItem, TopicView};

/// Site-wide values available to every template.
#[derive(Debug, Clone, Serialize)]
pub struct SiteMeta {
    /// Site title
    pub title: String,
    /// Base URL, ending in `/`
    pub base_url: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("nav.html", NAV_TEMPLATE)?;
        env.add_template("topic.html", TOPIC_TEMPLATE)?;
        env.add_template("category.html", CATEGORY_TEMPLATE)?;
        env.add_template("home.html", HOME_TEMPLATE)?;
        env.add_template("not_found.html", NOT_FOUND_TEMPLATE)?;

        Ok(Self { env })
    }

    pub fn render_topic(&self, site: &SiteMeta, page: &TopicView) -> Result<String, minijinja::Error> {
        self.env.get_template("topic.html")?.render(context! {
            site => site,
            title => &page.topic.title,
            nav => &page.nav,
            page => page,
        })
    }

    pub fn render_category(
        &self,
        site: &SiteMeta,
        page: &CategoryView,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("category.html")?.render(context! {
            site => site,
            title => &page.category.title,
            nav => &page.nav,
            page => page,
        })
    }

    pub fn render_home(&self, site: &SiteMeta, page: &HomeView) -> Result<String, minijinja::Error> {
        self.env.get_template("home.html")?.render(context! {
            site => site,
            title => &site.title,
            nav => &page.nav,
            page => page,
        })
    }

    pub fn render_not_found(
        &self,
        site: &SiteMeta,
        nav: &[NavItem],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("not_found.html")?.render(context! {
            site => site,
            title => "Page not found",
            nav => nav,
        })
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site.title }}</title>
  {% block meta %}{% endblock %}
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ site.base_url }}" class="nav-logo">{{ site.title }}</a>
</div>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
  </li>
{% endfor %}
</ul>"##;

const TOPIC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block meta %}{% if page.topic.description %}<meta name="description" content="{{ page.topic.description }}">{% endif %}{% endblock %}

{% block content %}
<nav class="breadcrumbs">
  <a href="{{ site.base_url }}">Home</a> / <a href="{{ page.category.url }}">{{ page.category.title }}</a>
</nav>
<article class="topic">
  <header class="topic-meta">
    {% if page.topic.difficulty %}<span class="difficulty difficulty-{{ page.topic.difficulty }}">{{ page.topic.difficulty }}</span>{% endif %}
    <span class="read-time">{{ page.topic.read_time }} min read</span>
    {% if page.last_updated %}<time datetime="{{ page.last_updated }}">Updated {{ page.last_updated }}</time>{% endif %}
    {% if page.topic.tags %}
    <ul class="tags">
      {% for tag in page.topic.tags %}<li class="tag">{{ tag }}</li>{% endfor %}
    </ul>
    {% endif %}
  </header>
  <div class="content">
    {{ page.content | safe }}
  </div>
</article>

{% if page.toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in page.toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}

{% if page.related %}
<section class="related">
  <h2>Related topics</h2>
  <ul>
  {% for item in page.related %}
    <li><a href="{{ item.topic.url }}">{{ item.topic.title }}</a></li>
  {% endfor %}
  </ul>
</section>
{% endif %}
{% endblock %}"##;

const CATEGORY_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="category">
  <h1>{{ page.category.title }}</h1>
  {% if page.description %}<p class="category-description">{{ page.description }}</p>{% endif %}
  <ul class="topic-list">
  {% for topic in page.topics %}
    <li>
      <a href="{{ topic.url }}">{{ topic.title }}</a>
      {% if topic.difficulty %}<span class="difficulty">{{ topic.difficulty }}</span>{% endif %}
      <span class="read-time">{{ topic.read_time }} min</span>
    </li>
  {% endfor %}
  </ul>
</section>
{% endblock %}"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="home">
  <h1>{{ site.title }}</h1>
  <p>{{ page.topic_count }} topics</p>
  {% for section in page.categories %}
  <section class="home-category">
    <h2><a href="{{ section.category.url }}">{{ section.category.title }}</a></h2>
    <ul>
    {% for topic in section.topics %}
      <li><a href="{{ topic.url }}">{{ topic.title }}</a></li>
    {% endfor %}
    </ul>
  </section>
  {% endfor %}
</section>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="not-found">
  <h1>Page not found</h1>
  <p>There is no topic at this address. <a href="{{ site.base_url }}">Back to all topics</a>.</p>
</section>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{CategoryLink, RelatedCard, TopicCard};

    fn site() -> SiteMeta {
        SiteMeta {
            title: "Guides".to_string(),
            base_url: "/".to_string(),
        }
    }

    fn card(title: &str, url: &str) -> TopicCard {
        TopicCard {
            slug: title.to_lowercase(),
            title: title.to_string(),
            url: url.to_string(),
            description: None,
            difficulty: Some("advanced".to_string()),
            read_time: 4,
            tags: vec!["sql".to_string()],
        }
    }

    #[test]
    fn renders_topic_page() {
        let engine = TemplateEngine::new().unwrap();

        let page = TopicView {
            topic: card("SQL", "/databases/sql/"),
            category: CategoryLink {
                slug: "databases".to_string(),
                title: "Databases".to_string(),
                url: "/databases/".to_string(),
            },
            content: "<p>Hello world</p>".to_string(),
            toc: vec![],
            related: vec![RelatedCard {
                topic: card("NoSQL", "/databases/nosql/"),
                category: "databases".to_string(),
                score: 15,
                shared_tags: vec![],
            }],
            last_updated: Some("2024-01-02".to_string()),
            read_time_estimated: false,
            nav: vec![NavItem {
                title: "Databases".to_string(),
                path: "/databases/".to_string(),
                active: true,
            }],
        };

        let html = engine.render_topic(&site(), &page).unwrap();

        assert!(html.contains("<title>SQL - Guides</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains(r#"<a href="/databases/nosql/">NoSQL</a>"#));
        assert!(html.contains("4 min read"));
        assert!(html.contains(r#"<li class="nav-item active">"#));
    }

    #[test]
    fn escapes_metadata() {
        let engine = TemplateEngine::new().unwrap();

        let page = CategoryView {
            category: CategoryLink {
                slug: "x".to_string(),
                title: "<script>".to_string(),
                url: "/x/".to_string(),
            },
            description: None,
            topics: vec![],
            nav: vec![],
        };

        let html = engine.render_category(&site(), &page).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn renders_not_found_page() {
        let engine = TemplateEngine::new().unwrap();

        let html = engine.render_not_found(&site(), &[]).unwrap();

        assert!(html.contains("<title>Page not found - Guides</title>"));
    }
}

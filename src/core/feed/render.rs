use super::types::{FeedEntry, FeedView};
use crate::core::text::escape;

pub fn skeleton() -> String {
    r#"<div class="latest-post">
  <div class="skeleton" style="width: 40%"></div>
  <div class="skeleton" style="width: 75%"></div>
  <div class="skeleton" style="width: 60%"></div>
</div>"#
        .to_string()
}

pub fn latest(entry: &FeedEntry, blog_home_url: &str) -> String {
    let link = escape(&entry.link);
    let excerpt = if entry.excerpt.is_empty() {
        String::new()
    } else {
        format!("\n  <p>{}</p>", escape(&entry.excerpt))
    };
    format!(
        r#"<div class="latest-post">
  <p class="eyebrow">Latest from the blog</p>
  <h3><a class="text-link" href="{link}" target="_blank" rel="noopener">{title}</a></h3>
  <p class="muted">{date}</p>{excerpt}
  <div class="card-actions">
    <a class="button secondary" href="{link}" target="_blank" rel="noopener">Read latest</a>
    <a class="button ghost" href="{home}" target="_blank" rel="noopener">Read the blog</a>
  </div>
</div>"#,
        title = escape(&entry.title),
        date = escape(&entry.date),
        home = escape(blog_home_url),
    )
}

pub fn fallback(blog_home_url: &str) -> String {
    format!(
        r#"<div class="latest-post">
  <p class="eyebrow">Latest from the blog</p>
  <p class="muted">The feed is taking a nap. You can still visit the blog directly.</p>
  <a class="button ghost" href="{}" target="_blank" rel="noopener">Visit the blog</a>
</div>"#,
        escape(blog_home_url)
    )
}

pub fn view(view: &FeedView, blog_home_url: &str) -> String {
    match view.entry() {
        Some(entry) => latest(entry, blog_home_url),
        None => fallback(blog_home_url),
    }
}

use super::filter::{Facet, FilterState};
use super::types::ProjectRecord;
use crate::core::text::{escape, format_date};

pub fn project_card(project: &ProjectRecord) -> String {
    let mut chips = Vec::with_capacity(project.topics.len() + 1);
    if !project.language.is_empty() {
        chips.push(project.language.as_str());
    }
    chips.extend(project.topics.iter().map(String::as_str));

    let status_badge = if project.status.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="status-badge {}">{}</span>"#,
            escape(&project.status),
            escape(&project.status.to_uppercase())
        )
    };
    let updated = if project.updated.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="muted">Updated {}</span>"#,
            escape(&format_date(&project.updated))
        )
    };
    let mut actions = String::new();
    if !project.repo.is_empty() {
        actions.push_str(&format!(
            r#"<a class="button ghost" href="{}" target="_blank" rel="noopener">Repo</a>"#,
            escape(&project.repo)
        ));
    }
    if !project.demo.is_empty() {
        actions.push_str(&format!(
            r#"<a class="button secondary" href="{}" target="_blank" rel="noopener">Demo</a>"#,
            escape(&project.demo)
        ));
    }

    format!(
        r#"<article class="card reveal is-visible" data-language="{language}" data-tags="{tags}" data-status="{status}">
  <div class="section-header">
    <div>
      <h3>{title}</h3>
      {status_badge}
    </div>
    {updated}
  </div>
  <p class="muted">{description}</p>
  <div class="tag-row">{chips}</div>
  <div class="card-actions">{actions}</div>
</article>"#,
        language = escape(&project.language),
        tags = escape(&project.topics.join(",")),
        status = escape(&project.status),
        title = escape(&project.title),
        description = escape(&project.description),
        chips = chips
            .iter()
            .map(|chip| format!(r#"<span class="chip">{}</span>"#, escape(chip)))
            .collect::<String>(),
    )
}

/// Renders up to `limit` cards.
pub fn project_list<'a, I>(projects: I, limit: Option<usize>) -> String
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    projects
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(project_card)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn filter_chips<'a, I>(facet: Facet, values: I, filters: &FilterState) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .map(|value| {
            let class = if filters.is_active(facet, value) {
                "chip is-active"
            } else {
                "chip"
            };
            let label = match facet {
                Facet::Status => value.to_uppercase(),
                Facet::Language | Facet::Tag => value.clone(),
            };
            format!(
                r#"<button class="{class}" {attribute}="{value}">{label}</button>"#,
                attribute = facet.data_attribute(),
                value = escape(value),
                label = escape(&label),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProjectRecord {
        ProjectRecord {
            title: "ringbuf <rs>".to_string(),
            description: "Lock-free ring buffer.".to_string(),
            repo: "https://github.com/example/ringbuf-rs".to_string(),
            demo: String::new(),
            language: "Rust".to_string(),
            updated: "2026-02-10".to_string(),
            topics: vec!["concurrency".to_string(), "cli".to_string()],
            status: "wip".to_string(),
            featured: true,
        }
    }

    #[test]
    fn card_lists_language_then_topics() {
        let html = project_card(&record());

        assert!(html.contains("<h3>ringbuf &lt;rs&gt;</h3>"));
        assert!(html.contains(r#"data-tags="concurrency,cli""#));
        assert!(html.contains(r#"<span class="status-badge wip">WIP</span>"#));
        assert!(html.contains("Updated Feb 10, 2026"));
        assert!(html.contains(
            r#"<span class="chip">Rust</span><span class="chip">concurrency</span><span class="chip">cli</span>"#
        ));
        assert!(html.contains(">Repo</a>"));
        assert!(!html.contains(">Demo</a>"));
    }

    #[test]
    fn list_honors_limit() {
        let records = vec![record(), record(), record()];
        let html = project_list(&records, Some(2));
        assert_eq!(html.matches("<article").count(), 2);
        assert_eq!(project_list(&records, None).matches("<article").count(), 3);
    }

    #[test]
    fn chips_mark_active_values() {
        let filters = FilterState::default().toggled(Facet::Status, "wip");
        let values = ["done".to_string(), "wip".to_string()];
        let html = filter_chips(Facet::Status, &values, &filters);

        assert_eq!(
            html,
            r#"<button class="chip" data-status="done">DONE</button><button class="chip is-active" data-status="wip">WIP</button>"#
        );
    }
}

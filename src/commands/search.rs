use super::helpers::{installed_stores, open_registry};
use crate::catalog::Catalog;
use crate::cli::SearchCmd;
use crate::config::Config;
use crate::error::Result;
use crate::project::Project;
use crate::search::{self, SearchQuery, SearchResult};

pub fn execute(project: &Project, config: &Config, cmd: &SearchCmd) -> Result<()> {
    let query = SearchQuery::new(&cmd.terms.join(" "), &cmd.tags)?;

    let catalog = if cmd.installed {
        let mut catalog = Catalog::default();
        for (_, store) in installed_stores(project, config, false)? {
            catalog.extend(store.installed_all()?);
        }
        catalog
    } else {
        open_registry(project, config)?.load_index()?
    };

    let results = search::search(catalog.entries(), &query);
    let results = search::truncate(results, cmd.limit.or(config.search.limit));

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No matching assets.");
    } else {
        print!("{}", format_results(&results));
    }

    Ok(())
}

/// Render results as an aligned table.
pub fn format_results(results: &[SearchResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.entry.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!("{:<8} {:<width$} {:>5}  DESCRIPTION\n", "CATEGORY", "NAME", "SCORE");
    for result in results {
        let entry = &result.entry;
        out.push_str(&format!(
            "{:<8} {:<width$} {:>5}  {}",
            entry.category.as_str(),
            entry.name,
            result.score,
            entry.description
        ));
        if !entry.tags.is_empty() {
            out.push_str(&format!(" [{}]", entry.tags.join(", ")));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, Category};

    #[test]
    fn test_format_results() {
        let results = vec![
            SearchResult {
                entry: CatalogEntry {
                    category: Category::Role,
                    name: "golang/code-review".to_string(),
                    module: None,
                    description: "Review Go code".to_string(),
                    tags: vec!["golang".to_string(), "review".to_string()],
                },
                score: 8,
            },
            SearchResult {
                entry: CatalogEntry {
                    category: Category::Task,
                    name: "review".to_string(),
                    module: None,
                    description: String::new(),
                    tags: vec![],
                },
                score: 3,
            },
        ];
        let table = format_results(&results);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CATEGORY NAME"));
        assert!(lines[1].starts_with("role     golang/code-review     8  Review Go code [golang, review]"));
        assert!(lines[2].starts_with("task     review                 3"));
    }
}

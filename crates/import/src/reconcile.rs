//! Matches the category titles of a batch against the catalog and creates
//! exactly the ones that are missing.

use std::collections::{HashMap, HashSet};
use tally_core::{Category, GatewayError, LedgerGateway};

use crate::error::ImportError;

pub type CategoryMap = HashMap<String, Category>;

/// Titles with duplicates removed, in first-occurrence order.
pub fn distinct_titles(titles: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .iter()
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

/// Resolves every title in `titles` to a stored category.
///
/// Existing categories are fetched with a single batched lookup; the
/// missing ones are created in one atomic save. If another writer creates
/// one of the missing titles in between, the save is rejected by the
/// catalog's uniqueness rule and this returns
/// [`ImportError::ReconciliationConflict`].
pub async fn reconcile<G>(gateway: &G, titles: &[String]) -> Result<CategoryMap, ImportError>
where
    G: LedgerGateway + ?Sized,
{
    let distinct = distinct_titles(titles);
    if distinct.is_empty() {
        return Ok(CategoryMap::new());
    }

    let existing = gateway.find_categories_by_title(&distinct).await?;
    let existing_titles: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();

    let missing: Vec<String> = distinct
        .iter()
        .filter(|t| !existing_titles.contains(t.as_str()))
        .cloned()
        .collect();

    let created = if missing.is_empty() {
        Vec::new()
    } else {
        let drafts = gateway.create_categories(&missing);
        gateway
            .save_categories(drafts)
            .await
            .map_err(|e| match e {
                GatewayError::Conflict { title } => ImportError::ReconciliationConflict { title },
                other => ImportError::Persistence(other),
            })?
    };

    tracing::debug!(
        distinct = distinct.len(),
        existing = existing.len(),
        created = created.len(),
        "categories reconciled"
    );

    Ok(created
        .into_iter()
        .chain(existing)
        .map(|c| (c.title.clone(), c))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaleGateway;
    use tally_core::MemoryGateway;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let input = titles(&["Food", "Travel", "Food", "Rent", "Travel"]);
        assert_eq!(distinct_titles(&input), titles(&["Food", "Travel", "Rent"]));
    }

    #[test]
    fn distinct_is_case_sensitive() {
        let input = titles(&["Food", "food", "Food"]);
        assert_eq!(distinct_titles(&input), titles(&["Food", "food"]));
    }

    #[tokio::test]
    async fn creates_repeated_title_once() {
        let gateway = MemoryGateway::new();
        let map = reconcile(&gateway, &titles(&["Food", "Food", "Food"]))
            .await
            .unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(gateway.categories().len(), 1);
        assert_eq!(map["Food"], gateway.categories()[0]);
    }

    #[tokio::test]
    async fn reuses_existing_and_creates_missing() {
        let gateway = MemoryGateway::with_categories(&["Food"]);
        let food = gateway.categories()[0].clone();

        let map = reconcile(&gateway, &titles(&["Food", "Travel", "Food"]))
            .await
            .unwrap();

        assert_eq!(map["Food"], food);
        assert_eq!(map["Travel"].title, "Travel");
        let catalog = gateway.categories();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().filter(|c| c.title == "Food").count(), 1);
    }

    #[tokio::test]
    async fn missing_titles_are_created_in_first_occurrence_order() {
        let gateway = MemoryGateway::new();
        reconcile(&gateway, &titles(&["Rent", "Food", "Rent", "Gym"]))
            .await
            .unwrap();

        let created: Vec<_> = gateway.categories().into_iter().map(|c| c.title).collect();
        assert_eq!(created, titles(&["Rent", "Food", "Gym"]));
    }

    #[tokio::test]
    async fn second_reconcile_returns_same_identities() {
        let gateway = MemoryGateway::new();
        let input = titles(&["Housing", "Income"]);

        let first = reconcile(&gateway, &input).await.unwrap();
        let second = reconcile(&gateway, &input).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(gateway.categories().len(), 2);
    }

    #[tokio::test]
    async fn empty_title_is_reconciled_literally() {
        let gateway = MemoryGateway::new();
        let map = reconcile(&gateway, &titles(&["", "Food", ""])).await.unwrap();
        assert!(map.contains_key(""));
        assert_eq!(gateway.categories().len(), 2);
    }

    #[tokio::test]
    async fn nothing_to_reconcile() {
        let gateway = MemoryGateway::new();
        assert!(reconcile(&gateway, &[]).await.unwrap().is_empty());
        assert!(gateway.categories().is_empty());
    }

    #[tokio::test]
    async fn concurrent_creation_surfaces_as_conflict() {
        // The catalog already has "Food" but the lookup does not see it,
        // as when another import commits between lookup and save.
        let gateway = StaleGateway::new(MemoryGateway::with_categories(&["Food"]));

        let result = reconcile(&gateway, &titles(&["Travel", "Food"])).await;

        assert!(matches!(
            result,
            Err(ImportError::ReconciliationConflict { title }) if title == "Food"
        ));
        assert_eq!(gateway.inner().categories().len(), 1);
    }
}

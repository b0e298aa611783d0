use tally_core::NewTransaction;

use crate::error::ImportError;
use crate::reconcile::CategoryMap;
use crate::source::RawRow;

/// Binds each row to its reconciled category, one transaction per row, in
/// row order.
pub fn materialize(
    rows: &[RawRow],
    categories: &CategoryMap,
) -> Result<Vec<NewTransaction>, ImportError> {
    rows.iter()
        .map(|row| {
            let category = categories
                .get(&row.category)
                .ok_or_else(|| ImportError::UnresolvedCategory(row.category.clone()))?;

            Ok(NewTransaction {
                title: row.title.clone(),
                kind: row.kind.clone(),
                value: row.value.clone(),
                category: category.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::{Category, CategoryId};

    fn category(id: i64, title: &str) -> Category {
        Category {
            id: CategoryId(id),
            title: title.to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn row(title: &str, kind: &str, value: &str, category: &str) -> RawRow {
        RawRow {
            title: title.to_string(),
            kind: kind.to_string(),
            value: value.to_string(),
            category: category.to_string(),
        }
    }

    fn map(categories: &[Category]) -> CategoryMap {
        categories
            .iter()
            .map(|c| (c.title.clone(), c.clone()))
            .collect()
    }

    #[test]
    fn binds_rows_in_order() {
        let categories = map(&[category(1, "Housing"), category(2, "Income")]);
        let rows = vec![
            row("Rent", "outcome", "1200", "Housing"),
            row("Salary", "income", "3000", "Income"),
            row("Gift", "income", "50", "Income"),
        ];

        let txs = materialize(&rows, &categories).unwrap();

        let titles: Vec<_> = txs.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Rent", "Salary", "Gift"]);
        assert_eq!(txs[0].category.id, CategoryId(1));
        assert_eq!(txs[1].category.id, txs[2].category.id);
        assert_eq!(txs[2].value, "50");
    }

    #[test]
    fn passes_type_and_value_text_through() {
        let categories = map(&[category(1, "Misc")]);
        let rows = vec![row("Odd", "transfer", "1,000", "Misc")];

        let txs = materialize(&rows, &categories).unwrap();
        assert_eq!(txs[0].kind, "transfer");
        assert_eq!(txs[0].value, "1,000");
    }

    #[test]
    fn unresolved_category_is_an_error() {
        let categories = map(&[category(1, "Housing")]);
        let rows = vec![
            row("Rent", "outcome", "1200", "Housing"),
            row("Flight", "outcome", "400", "Travel"),
        ];

        assert!(matches!(
            materialize(&rows, &categories),
            Err(ImportError::UnresolvedCategory(t)) if t == "Travel"
        ));
    }

    #[test]
    fn empty_batch() {
        assert!(materialize(&[], &CategoryMap::new()).unwrap().is_empty());
    }
}

//! Client-side ordering of the expense table.
//!
//! [sorted] is a pure function of the records and the [SortConfig]: it never
//! touches the input slice and always returns a fresh copy, so calling it
//! again with the same arguments gives the same result.

use std::cmp::Ordering;

use crate::expense::Expense;

/// The columns the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    BusinessName,
    TransactionDate,
    AmountBeforeVat,
    AmountAfterVat,
    Category,
    InvoiceNumber,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::BusinessName,
        SortKey::TransactionDate,
        SortKey::AmountBeforeVat,
        SortKey::AmountAfterVat,
        SortKey::Category,
        SortKey::InvoiceNumber,
    ];

    /// Column heading.
    pub fn title(self) -> &'static str {
        match self {
            SortKey::BusinessName => "Business",
            SortKey::TransactionDate => "Date",
            SortKey::AmountBeforeVat => "Before VAT",
            SortKey::AmountAfterVat => "Incl. VAT",
            SortKey::Category => "Category",
            SortKey::InvoiceNumber => "Invoice #",
        }
    }
}

/// The order to sort rows in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Which column the table is sorted by, if any, and in which direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    key: Option<SortKey>,
    direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    pub fn key(&self) -> Option<SortKey> {
        self.key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// The configuration after the user clicks the `key` column.
    ///
    /// Clicking the active column flips the direction, clicking any other
    /// column sorts by it in ascending order.
    pub fn clicked(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            Self {
                key: self.key,
                direction: self.direction.reversed(),
            }
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }

    /// The direction `key` is sorted in, or `None` if it is not the active column.
    pub fn direction_of(&self, key: SortKey) -> Option<SortDirection> {
        (self.key == Some(key)).then_some(self.direction)
    }
}

/// A sorted copy of `records`.
///
/// Without a sort key the backend order is kept. Dates compare
/// chronologically and amounts numerically; values that did not parse are
/// placed after every parsed value in both directions. The sort is stable, so
/// rows that compare equal keep their backend order.
pub fn sorted(records: &[Expense], config: SortConfig) -> Vec<Expense> {
    let mut rows = records.to_vec();

    if let Some(key) = config.key {
        rows.sort_by(|a, b| compare(a, b, key, config.direction));
    }

    rows
}

fn compare(a: &Expense, b: &Expense, key: SortKey, direction: SortDirection) -> Ordering {
    match key {
        SortKey::TransactionDate => compare_parsed(
            a.transaction_date.value(),
            b.transaction_date.value(),
            direction,
        ),
        SortKey::AmountBeforeVat => compare_parsed(
            a.amount_before_vat.value(),
            b.amount_before_vat.value(),
            direction,
        ),
        SortKey::AmountAfterVat => compare_parsed(
            a.amount_after_vat.value(),
            b.amount_after_vat.value(),
            direction,
        ),
        SortKey::BusinessName => direction.apply(a.business_name.cmp(&b.business_name)),
        SortKey::Category => direction.apply(a.category.label().cmp(b.category.label())),
        SortKey::InvoiceNumber => direction.apply(a.invoice_number.cmp(&b.invoice_number)),
    }
}

fn compare_parsed<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use crate::{expense::Category, test_utils::expense};

    use super::{sorted, SortConfig, SortDirection, SortKey};

    fn ids(rows: &[crate::expense::Expense]) -> Vec<i64> {
        rows.iter().map(|row| row.id).collect()
    }

    #[test]
    fn no_key_keeps_backend_order() {
        let records = vec![
            expense(3, "C", "2024-01-03", "30", Category::Food),
            expense(1, "A", "2024-01-01", "10", Category::Food),
            expense(2, "B", "2024-01-02", "20", Category::Food),
        ];

        assert_eq!(ids(&sorted(&records, SortConfig::default())), vec![3, 1, 2]);
    }

    #[test]
    fn clicking_same_key_reverses_direction() {
        let config = SortConfig::default().clicked(SortKey::BusinessName);
        assert_eq!(config.direction(), SortDirection::Ascending);

        let config = config.clicked(SortKey::BusinessName);
        assert_eq!(config.key(), Some(SortKey::BusinessName));
        assert_eq!(config.direction(), SortDirection::Descending);

        let config = config.clicked(SortKey::BusinessName);
        assert_eq!(config.direction(), SortDirection::Ascending);
    }

    #[test]
    fn clicking_other_key_resets_to_ascending() {
        let config = SortConfig::default()
            .clicked(SortKey::TransactionDate)
            .clicked(SortKey::TransactionDate)
            .clicked(SortKey::AmountAfterVat);

        assert_eq!(
            config,
            SortConfig::new(SortKey::AmountAfterVat, SortDirection::Ascending)
        );
    }

    #[test]
    fn direction_of_reports_only_active_column() {
        let config = SortConfig::new(SortKey::Category, SortDirection::Descending);

        assert_eq!(
            config.direction_of(SortKey::Category),
            Some(SortDirection::Descending)
        );
        assert_eq!(config.direction_of(SortKey::BusinessName), None);
    }

    #[test]
    fn amounts_sort_numerically_not_lexically() {
        let records = vec![
            expense(1, "A", "2024-01-01", "10", Category::Other),
            expense(2, "B", "2024-01-01", "2", Category::Other),
            expense(3, "C", "2024-01-01", "30", Category::Other),
        ];

        let ascending = sorted(
            &records,
            SortConfig::new(SortKey::AmountAfterVat, SortDirection::Ascending),
        );
        let descending = sorted(
            &records,
            SortConfig::new(SortKey::AmountAfterVat, SortDirection::Descending),
        );

        assert_eq!(ids(&ascending), vec![2, 1, 3]);
        assert_eq!(ids(&descending), vec![3, 1, 2]);
    }

    #[test]
    fn dates_sort_chronologically() {
        let records = vec![
            expense(1, "A", "2024-12-01", "1", Category::Other),
            expense(2, "B", "2024-03-01", "1", Category::Other),
        ];

        let rows = sorted(
            &records,
            SortConfig::new(SortKey::TransactionDate, SortDirection::Ascending),
        );

        assert_eq!(ids(&rows), vec![2, 1]);
    }

    #[test]
    fn dates_with_time_sort_by_date() {
        let records = vec![
            expense(1, "A", "2024-12-01T00:00:00", "1", Category::Other),
            expense(2, "B", "2024-03-01T23:59:59", "1", Category::Other),
        ];

        let rows = sorted(
            &records,
            SortConfig::new(SortKey::TransactionDate, SortDirection::Ascending),
        );

        assert_eq!(ids(&rows), vec![2, 1]);
    }

    #[test]
    fn unparsable_values_sort_last_in_both_directions() {
        let records = vec![
            expense(1, "A", "2024-01-01", "n/a", Category::Other),
            expense(2, "B", "2024-01-01", "5", Category::Other),
            expense(3, "C", "2024-01-01", "", Category::Other),
            expense(4, "D", "2024-01-01", "50", Category::Other),
        ];

        let ascending = sorted(
            &records,
            SortConfig::new(SortKey::AmountAfterVat, SortDirection::Ascending),
        );
        let descending = sorted(
            &records,
            SortConfig::new(SortKey::AmountAfterVat, SortDirection::Descending),
        );

        assert_eq!(ids(&ascending), vec![2, 4, 1, 3]);
        assert_eq!(ids(&descending), vec![4, 2, 1, 3]);
    }

    #[test]
    fn ties_keep_backend_order() {
        let records = vec![
            expense(1, "Same", "2024-01-01", "1", Category::Other),
            expense(2, "Other", "2024-01-01", "1", Category::Other),
            expense(3, "Same", "2024-01-01", "1", Category::Other),
        ];

        let rows = sorted(
            &records,
            SortConfig::new(SortKey::BusinessName, SortDirection::Ascending),
        );

        assert_eq!(ids(&rows), vec![2, 1, 3]);
    }

    #[test]
    fn categories_sort_by_label() {
        let records = vec![
            expense(1, "A", "2024-01-01", "1", Category::Vehicle),
            expense(2, "B", "2024-01-01", "1", Category::Food),
            expense(3, "C", "2024-01-01", "1", Category::It),
        ];

        let rows = sorted(
            &records,
            SortConfig::new(SortKey::Category, SortDirection::Ascending),
        );

        assert_eq!(ids(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn sorting_is_repeatable_and_leaves_input_untouched() {
        let records = vec![
            expense(1, "A", "2024-01-01", "10", Category::Other),
            expense(2, "B", "2024-01-01", "2", Category::Other),
        ];
        let config = SortConfig::new(SortKey::AmountAfterVat, SortDirection::Ascending);

        let first = sorted(&records, config);
        let second = sorted(&records, config);

        assert_eq!(first, second);
        assert_eq!(ids(&records), vec![1, 2]);
    }
}

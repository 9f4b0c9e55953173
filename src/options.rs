use crate::models::AddressSuggestion;

/// Ordered suggestions shown in the dropdown.
///
/// The list never holds two entries with the same id. The constructors below
/// are the only way to build one, and every one of them puts the selected
/// value (if any) at index 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList(Vec<AddressSuggestion>);

impl OptionList {
    /// List holding only the selection, or empty.
    pub fn selection_only(selected: Option<&AddressSuggestion>) -> Self {
        Self(selected.cloned().into_iter().collect())
    }

    /// Merge fetched results with the current selection. The selection is
    /// prepended and fetched entries sharing its id are dropped. Without a
    /// selection the list is the fetched results, deduplicated by id.
    pub fn merge(selected: Option<&AddressSuggestion>, fetched: Vec<AddressSuggestion>) -> Self {
        let mut out = Self::selection_only(selected);
        for s in fetched {
            out.push_unique(s);
        }
        out
    }

    /// Prepend a newly selected value, removing any existing entry with its id.
    pub fn prepend(&mut self, selected: AddressSuggestion) {
        self.0.retain(|o| o.id != selected.id);
        self.0.insert(0, selected);
    }

    pub fn get(&self, idx: usize) -> Option<&AddressSuggestion> {
        self.0.get(idx)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.iter().any(|o| o.id == id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.0.iter().map(|o| o.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressSuggestion> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push_unique(&mut self, s: AddressSuggestion) {
        if !self.contains(s.id) {
            self.0.push(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sug(id: i64, addr: &str) -> AddressSuggestion {
        AddressSuggestion {
            id,
            unit: None,
            street_number: String::new(),
            street_name: String::new(),
            suburb: String::new(),
            state: String::new(),
            postcode: String::new(),
            full_address: addr.to_string(),
        }
    }

    #[test]
    fn test_selection_only() {
        assert!(OptionList::selection_only(None).is_empty());

        let sel = sug(1, "123 Main St");
        let list = OptionList::selection_only(Some(&sel));
        assert_eq!(list.ids(), vec![1]);
    }

    #[test]
    fn test_merge_without_selection_keeps_fetched_order() {
        let list = OptionList::merge(None, vec![sug(3, "c"), sug(1, "a"), sug(2, "b")]);
        assert_eq!(list.ids(), vec![3, 1, 2]);
    }

    #[test]
    fn test_merge_with_selection_dedups_tail() {
        let sel = sug(1, "123 Main St");
        let list = OptionList::merge(
            Some(&sel),
            vec![sug(5, "456 Oak"), sug(1, "123 Main St"), sug(6, "456 Oak Ln")],
        );
        assert_eq!(list.ids(), vec![1, 5, 6]);
        assert_eq!(list.get(0), Some(&sel));
    }

    #[test]
    fn test_merge_drops_duplicate_fetched_ids() {
        let list = OptionList::merge(None, vec![sug(1, "a"), sug(1, "a again"), sug(2, "b")]);
        assert_eq!(list.ids(), vec![1, 2]);
        assert_eq!(list.get(0).map(|s| s.full_address.as_str()), Some("a"));
    }

    #[test]
    fn test_prepend_is_idempotent() {
        let mut list = OptionList::merge(None, vec![sug(4, "d"), sug(1, "a"), sug(2, "b")]);

        list.prepend(sug(1, "a"));
        assert_eq!(list.ids(), vec![1, 4, 2]);

        list.prepend(sug(1, "a"));
        assert_eq!(list.ids(), vec![1, 4, 2]);
    }
}

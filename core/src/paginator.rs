use std::fmt;

/// One contiguous slice of results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        if page_size == 0 {
            return Self { pages: Vec::new() };
        }
        let pages = items.chunks(page_size).map(|items| Page { items }).collect();
        Self { pages }
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of items across all pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page<'a, T>> {
        self.pages.iter()
    }
}

impl<'p, 'a, T> IntoIterator for &'p Paginator<'a, T> {
    type Item = &'p Page<'a, T>;
    type IntoIter = std::slice::Iter<'p, Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Split `items` into pages of `page_size`; the last page may be shorter.
pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_holds_the_remainder() {
        let items = [1, 2, 3, 4, 5];
        let pages = paginate(&items, 2);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.item_count(), 5);
        let sizes: Vec<_> = pages.iter().map(Page::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(pages.iter().last().map(|page| page.items()), Some(&[5][..]));
    }

    #[test]
    fn empty_input_or_zero_size_yields_no_pages() {
        assert!(paginate::<i32>(&[], 3).is_empty());
        assert!(paginate(&[1, 2], 0).is_empty());
    }

    #[test]
    fn pages_display_their_items() {
        let items = ["a", "b", "c"];
        let rendered: Vec<String> = paginate(&items, 2).iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["ab", "c"]);
    }
}

use std::ops::Range;

use super::Revision;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Fixed-size page over a list whose contents may change between renders.
///
/// The window remembers the [`Revision`] of the rows it last saw. Observing a
/// different revision moves it back to page 1 before any slice is taken, so
/// the current page never addresses a range that no longer exists.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PageWindow {
    page_size: usize,
    current_page: usize,
    len: usize,
    revision: Option<Revision>,
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageWindow {
    /// A page size of 0 falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn new(page_size: usize) -> PageWindow {
        PageWindow {
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            current_page: 1,
            len: 0,
            revision: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of rows last observed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `ceil(len / page_size)`; 0 for an empty list.
    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size)
    }

    /// Records the rows' length, returning to page 1 when `revision` differs
    /// from the last one seen.
    pub fn observe(&mut self, len: usize, revision: Revision) {
        if self.revision != Some(revision) {
            self.revision = Some(revision);
            self.current_page = 1;
        }
        self.len = len;
    }

    /// Moves to `page`, clamped into `[1, total_pages]` (`[1, 1]` when empty).
    pub fn go_to_page(&mut self, page: usize) {
        let last = self.total_pages().max(1);
        self.current_page = page.clamp(1, last);
    }

    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.len);
        let end = (start + self.page_size).min(self.len);
        start..end
    }

    /// Observes `rows` under `revision` and returns the current page of them.
    pub fn slice<'a, T>(&mut self, rows: &'a [T], revision: Revision) -> &'a [T] {
        self.observe(rows.len(), revision);
        &rows[self.range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn forty_five_rows_make_three_pages() {
        let rows = numbers(45);
        let mut window = PageWindow::default();
        let rev = Revision::new(1, 0);

        assert_eq!(window.slice(&rows, rev).len(), 20);
        assert_eq!(window.total_pages(), 3);

        window.go_to_page(3);
        let last = window.slice(&rows, rev);
        assert_eq!(last.len(), 5);
        assert_eq!(last, &[40, 41, 42, 43, 44]);
    }

    #[test]
    fn pages_reconstruct_the_rows() {
        for size in [1, 3, 7, 20, 64] {
            for n in [0, 1, 6, 21, 50] {
                let rows = numbers(n);
                let rev = Revision::new(n as u64, 0);
                let mut window = PageWindow::new(size);
                window.observe(rows.len(), rev);

                let mut joined = Vec::new();
                for page in 1..=window.total_pages() {
                    window.go_to_page(page);
                    joined.extend_from_slice(window.slice(&rows, rev));
                }
                assert_eq!(joined, rows, "page size {} over {} rows", size, n);
            }
        }
    }

    #[test]
    fn navigation_is_clamped() {
        let rows = numbers(45);
        let rev = Revision::new(1, 0);
        let mut window = PageWindow::default();
        window.observe(rows.len(), rev);

        window.go_to_page(0);
        assert_eq!(window.current_page(), 1);
        window.go_to_page(99);
        assert_eq!(window.current_page(), 3);
    }

    #[test]
    fn empty_rows_have_zero_pages_and_stay_on_page_one() {
        let rows: Vec<usize> = Vec::new();
        let mut window = PageWindow::default();
        assert!(window.slice(&rows, Revision::default()).is_empty());
        assert_eq!(window.total_pages(), 0);

        window.go_to_page(4);
        assert_eq!(window.current_page(), 1);
        assert!(window.range().is_empty());
    }

    #[test]
    fn changed_revision_resets_to_first_page() {
        let rows = numbers(45);
        let mut window = PageWindow::default();
        window.observe(rows.len(), Revision::new(1, 0));
        window.go_to_page(3);

        // narrower input, e.g. after a search
        let narrowed = numbers(4);
        let page = window.slice(&narrowed, Revision::new(1, 1));
        assert_eq!(window.current_page(), 1);
        assert_eq!(page, &[0, 1, 2, 3]);
    }

    #[test]
    fn same_revision_keeps_the_page() {
        let rows = numbers(45);
        let rev = Revision::new(1, 0);
        let mut window = PageWindow::default();
        window.observe(rows.len(), rev);
        window.go_to_page(2);
        window.observe(rows.len(), rev);
        assert_eq!(window.current_page(), 2);
    }
}

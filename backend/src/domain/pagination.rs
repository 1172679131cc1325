//! Page window for scoped listings.

use super::Error;

/// Largest page a caller may request.
pub const MAX_PER_PAGE: u32 = 100;
/// Page size used when the caller does not choose one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate a page request.
    ///
    /// # Examples
    /// ```
    /// use stockroom::domain::PageRequest;
    ///
    /// let page = PageRequest::new(3, 20).expect("valid page");
    /// assert_eq!(page.offset(), 40);
    /// assert!(PageRequest::new(0, 20).is_err());
    /// ```
    pub fn new(page: u32, per_page: u32) -> Result<Self, Error> {
        if page == 0 {
            return Err(Error::invalid_request("page numbers start at 1"));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(Error::invalid_request(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(Self { page, per_page })
    }

    /// A single-row window, used for "first match" lookups.
    pub const fn single() -> Self {
        Self {
            page: 1,
            per_page: 1,
        }
    }

    /// The widest first page.
    pub const fn widest() -> Self {
        Self {
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }

    /// One-based page number.
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Rows to return.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

pub mod comments;
pub mod favourites;
pub mod posts;
pub mod roles;
pub mod token;
pub mod users;

use roost_core::store::Page;
use serde::Deserialize;

use crate::error::ApiError;

pub(crate) const DEFAULT_PAGE_SIZE: usize = 10;
pub(crate) const MAX_PAGE_SIZE: usize = 100;

/// Optional `?page=<n>&page_size=<m>` on list endpoints. Pages are numbered
/// from 1; without either parameter the whole list is returned.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page:      Option<usize>,
  pub page_size: Option<usize>,
}

impl PageParams {
  pub fn to_page(&self) -> Result<Option<Page>, ApiError> {
    if self.page.is_none() && self.page_size.is_none() {
      return Ok(None);
    }
    let page = self.page.unwrap_or(1);
    let size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 {
      return Err(ApiError::BadRequest("page numbers start at 1".into()));
    }
    if size == 0 || size > MAX_PAGE_SIZE {
      return Err(ApiError::BadRequest(format!(
        "page_size must be between 1 and {MAX_PAGE_SIZE}"
      )));
    }
    Ok(Some(Page { index: page - 1, size }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_params_means_everything() {
    assert_eq!(PageParams::default().to_page().unwrap(), None);
  }

  #[test]
  fn pages_are_one_based() {
    let params = PageParams { page: Some(3), page_size: None };
    assert_eq!(
      params.to_page().unwrap(),
      Some(Page { index: 2, size: DEFAULT_PAGE_SIZE })
    );
  }

  #[test]
  fn rejects_out_of_range() {
    assert!(PageParams { page: Some(0), page_size: None }.to_page().is_err());
    assert!(PageParams { page: None, page_size: Some(0) }.to_page().is_err());
    assert!(PageParams { page: None, page_size: Some(101) }.to_page().is_err());
  }
}

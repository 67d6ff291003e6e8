use vb_config::ListingConfig;
use vb_core::listing::PageRequest;

/// Page request with the configured default and ceiling applied.
pub fn page_request(page: u32, page_size: Option<u32>, config: &ListingConfig) -> PageRequest {
    PageRequest::new(page, config.effective_page_size(page_size))
}

mod cache;

pub use cache::{CACHE_FILE_NAME, CachedTaxonomy, TaxonomyCache, load_taxonomy};

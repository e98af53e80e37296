//! URL-persisted search state: value codecs, typed parameters and the
//! synchronizer that mirrors them into the page's query string.

pub mod codec;
pub mod params;
pub mod sync;

pub use codec::{CompanySlug, FilterCodec};
pub use params::{SearchParam, SearchParamSingle, UrlParam};
pub use sync::{MemoryHistory, QuerySync, UrlHistory};

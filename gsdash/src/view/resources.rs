//! Resource list screen.

use gsdash_proto::{ResourceList, ResourceQuery, ResourceRecord};

use super::list::{ListSource, ListView, Listing};
use crate::api::{ApiError, Backend};

/// The resource list view-model.
pub type ResourceListView = ListView<ResourceQuery>;

impl Listing for ResourceList {
    type Record = ResourceRecord;

    fn into_parts(self) -> (Vec<Self::Record>, Option<u64>) {
        (self.resources, self.total)
    }
}

impl ListSource for ResourceQuery {
    type Listing = ResourceList;

    const NAME: &'static str = "resources";

    fn fetch<B: Backend>(
        backend: &B,
        query: &Self,
    ) -> impl Future<Output = Result<ResourceList, ApiError>> + Send {
        backend.list_resources(query)
    }
}

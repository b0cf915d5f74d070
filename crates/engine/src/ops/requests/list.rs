use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    ProcurementRequest, RequestStatus, ResultEngine, officials, requests,
};

use super::super::{Engine, normalize_required_id, with_tx};

/// Filters for listing requests.
#[derive(Clone, Debug, Default)]
pub struct RequestListFilter {
    /// Free-text match against request id, department id and status.
    pub search: Option<String>,
    /// If present, only requests in this state.
    pub status: Option<RequestStatus>,
    /// If present, only requests of this department.
    pub dept_id: Option<String>,
}

/// Listing order by request id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    /// Newest first: ids are sequential, so id order is creation order.
    #[default]
    Desc,
}

impl Engine {
    /// Lists requests with the approver name resolved.
    ///
    /// The second tuple element is the official's name when the stored
    /// authority is an admin id from pre-existing data; callers fall back to
    /// the stored authority string otherwise. Reads committed state only.
    pub async fn list_requests(
        &self,
        filter: &RequestListFilter,
        sort: SortOrder,
    ) -> ResultEngine<Vec<(ProcurementRequest, Option<String>)>> {
        with_tx!(self, |db_tx| {
            let mut query = requests::Entity::find().find_also_related(officials::Entity);

            if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
            {
                query = query.filter(
                    Condition::any()
                        .add(requests::Column::Id.contains(search))
                        .add(requests::Column::DeptId.contains(search))
                        .add(requests::Column::Status.contains(search)),
                );
            }
            if let Some(status) = filter.status {
                query = query.filter(requests::Column::Status.eq(status.as_str()));
            }
            if let Some(dept_id) = &filter.dept_id {
                query = query.filter(requests::Column::DeptId.eq(dept_id.clone()));
            }

            query = match sort {
                SortOrder::Asc => query.order_by_asc(requests::Column::Id),
                SortOrder::Desc => query.order_by_desc(requests::Column::Id),
            };

            let rows = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(rows.len());
            for (request_model, official_model) in rows {
                let request = ProcurementRequest::try_from(request_model)?;
                out.push((request, official_model.map(|o| o.name)));
            }
            Ok(out)
        })
    }

    /// Fetches a single request by id.
    pub async fn get_request(&self, request_id: &str) -> ResultEngine<ProcurementRequest> {
        let request_id = normalize_required_id(request_id, "request id")?;
        with_tx!(self, |db_tx| {
            let model = self.require_request(&db_tx, &request_id).await?;
            ProcurementRequest::try_from(model)
        })
    }
}

use std::{future::Future, marker::PhantomData};

use api_types::list::ListResponse;
use futures::{FutureExt, future::BoxFuture};
use listing::{DataSource, FetchParams, MemorySource, Page, ServiceError};

use super::{Client, list_request};
use crate::rows::Remote;

/// Pages of `R` fetched from the admin API.
pub struct HttpSource<R> {
    client: Client,
    _row: PhantomData<fn() -> R>,
}

impl<R: Remote> HttpSource<R> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _row: PhantomData,
        }
    }
}

impl<R: Remote> DataSource for HttpSource<R> {
    type Row = R;

    fn fetch(
        &self,
        params: FetchParams,
    ) -> impl Future<Output = Result<Page<R>, ServiceError>> + Send {
        let client = self.client.clone();
        async move {
            let request = list_request(&params)?;
            let response: ListResponse<R::Dto> = client.post(R::LIST_PATH, &request).await?;
            let total = usize::try_from(response.total).unwrap_or(usize::MAX);
            Ok(Page::new(
                response.items.into_iter().map(R::from_dto).collect(),
                total,
            ))
        }
    }
}

/// Either the real API or the demo fixtures.
pub enum AdminSource<R> {
    Http(HttpSource<R>),
    Memory(MemorySource<R>),
}

impl<R: Remote> DataSource for AdminSource<R> {
    type Row = R;

    fn fetch(
        &self,
        params: FetchParams,
    ) -> impl Future<Output = Result<Page<R>, ServiceError>> + Send {
        let future: BoxFuture<'_, Result<Page<R>, ServiceError>> = match self {
            Self::Http(source) => source.fetch(params).boxed(),
            Self::Memory(source) => source.fetch(params).boxed(),
        };
        future
    }
}

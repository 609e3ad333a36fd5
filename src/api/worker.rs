//! Channel plumbing between the UI thread and the remote API.
//!
//! The draw loop must never block on the network, so remote calls run on a
//! dedicated thread: the UI sends [`ApiRequest`] messages and drains
//! [`ApiEvent`] responses at the top of every tick. Requests are served
//! strictly in order. List requests carry the sequence number the controller
//! stamped them with so stale responses can be recognized on arrival.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::{UserApi, UserDraft, UserId, UserRecord};
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq)]
pub enum ApiRequest {
    List { seq: u64 },
    Create { draft: UserDraft },
    Fetch { id: UserId },
    Update { id: UserId, draft: UserDraft },
    Delete { id: UserId },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ApiEvent {
    Listed {
        seq: u64,
        outcome: Result<Vec<UserRecord>, ApiError>,
    },
    Created {
        outcome: Result<(), ApiError>,
    },
    Fetched {
        id: UserId,
        outcome: Result<UserRecord, ApiError>,
    },
    Updated {
        id: UserId,
        outcome: Result<(), ApiError>,
    },
    Deleted {
        id: UserId,
        outcome: Result<(), ApiError>,
    },
}

/// Start the worker thread. Dropping the request sender shuts it down; a
/// closed event receiver does too, after the in-flight call finishes.
pub fn spawn<A>(api: A) -> (Sender<ApiRequest>, Receiver<ApiEvent>)
where
    A: UserApi + 'static,
{
    let (request_tx, request_rx) = mpsc::channel::<ApiRequest>();
    let (event_tx, event_rx) = mpsc::channel::<ApiEvent>();

    thread::spawn(move || {
        for request in request_rx {
            let event = serve(&api, request);
            if event_tx.send(event).is_err() {
                break;
            }
        }
    });

    (request_tx, event_rx)
}

fn serve<A: UserApi>(api: &A, request: ApiRequest) -> ApiEvent {
    match request {
        ApiRequest::List { seq } => ApiEvent::Listed {
            seq,
            outcome: api.list(),
        },
        ApiRequest::Create { draft } => ApiEvent::Created {
            outcome: api.create(&draft),
        },
        ApiRequest::Fetch { id } => {
            let outcome = api.fetch(&id);
            ApiEvent::Fetched { id, outcome }
        }
        ApiRequest::Update { id, draft } => {
            let outcome = api.update(&id, &draft);
            ApiEvent::Updated { id, outcome }
        }
        ApiRequest::Delete { id } => {
            let outcome = api.delete(&id);
            ApiEvent::Deleted { id, outcome }
        }
    }
}
